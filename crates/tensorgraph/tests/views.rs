use tensorgraph::{Graph, GraphError, NodeKind, NodeOp, ShapeError};

#[test]
fn reshape_resolves_the_implicit_dim() {
    let graph = Graph::new();
    let x = graph.input([2, 3, 4]);
    let view = x.reshape([6, -1]);
    assert_eq!(view.kind(), NodeKind::View);
    assert_eq!(view.shape(), [6, 4]);
    assert_eq!(view.strides().as_slice(), &[4, 1]);
    assert_eq!(view.operands()[0], x);
}

#[test]
fn reshape_without_implicit_dim_checks_element_count() {
    let graph = Graph::new();
    let x = graph.input([2, 3]);
    let err = x.try_reshape([4]).expect_err("6 elements cannot become 4");
    assert!(matches!(
        err,
        GraphError::Shape(ShapeError::ElementCountMismatch { op: "reshape", .. })
    ));
}

#[test]
fn reshape_rejects_two_implicit_dims() {
    let graph = Graph::new();
    let x = graph.input([2, 3, 4]);
    let err = x.try_reshape([-1, -1, 6]).expect_err("two -1s are ambiguous");
    assert!(matches!(
        err,
        GraphError::Shape(ShapeError::MultipleImplicitDims { op: "reshape" })
    ));
}

#[test]
fn reshape_rejects_indivisible_implicit_dim() {
    let graph = Graph::new();
    let x = graph.input([2, 3, 4]);
    let err = x.try_reshape([5, -1]).expect_err("24 is not divisible by 5");
    assert!(matches!(
        err,
        GraphError::Shape(ShapeError::ImplicitDimIndivisible {
            op: "reshape",
            total: 24,
            explicit: 5,
        })
    ));
}

#[test]
fn reshape_rejects_zero_and_negative_dims() {
    let graph = Graph::new();
    let x = graph.input([2, 3]);
    for bad in [0, -2] {
        let err = x.try_reshape([bad, 6]).expect_err("dims must be >= 1 or -1");
        assert!(matches!(
            err,
            GraphError::Shape(ShapeError::InvalidDimension { op: "reshape", .. })
        ));
    }
}

#[test]
fn reshape_1d_flattens() {
    let graph = Graph::new();
    let x = graph.input([2, 3, 4]);
    assert_eq!(x.reshape_1d(24).shape(), [24]);
    assert_eq!(x.reshape_1d(-1).shape(), [24]);
}

#[test]
fn reshape_to_scalar_is_allowed_for_single_elements() {
    let graph = Graph::new();
    let x = graph.input([1, 1]);
    let scalar = x.reshape([]);
    assert_eq!(scalar.rank(), 0);
    assert!(scalar.strides().is_empty());
}

#[test]
fn reshape_round_trip_restores_the_shape() {
    let graph = Graph::new();
    let x = graph.input([2, 3, 4]);
    let round = x.reshape([6, 4]).reshape([2, 3, 4]);
    assert_eq!(round.shape(), x.shape());
    assert_eq!(round.strides(), x.strides());
}

#[test]
fn permute_sends_source_axis_to_destination() {
    let graph = Graph::new();
    let x = graph.input([2, 3, 4]);
    // dims[i] is where source axis i goes: 2->1, 3->2, 4->0.
    let view = x.permute([1, 2, 0]);
    assert_eq!(view.shape(), [4, 2, 3]);
    assert_eq!(view.strides().as_slice(), &[6, 3, 1]);
}

#[test]
fn permute_normalizes_negative_destinations() {
    let graph = Graph::new();
    let x = graph.input([2, 3, 4]);
    let view = x.permute([-1, 0, 1]);
    assert_eq!(view.shape(), [3, 4, 2]);
}

#[test]
fn permute_rejects_repeated_destinations() {
    let graph = Graph::new();
    let x = graph.input([2, 3, 4]);
    let err = x.try_permute([0, 0, 2]).expect_err("destination 0 repeats");
    assert!(matches!(
        err,
        GraphError::Shape(ShapeError::DuplicateAxis { op: "permute", .. })
    ));
}

#[test]
fn permute_rejects_wrong_arity() {
    let graph = Graph::new();
    let x = graph.input([2, 3, 4]);
    let err = x.try_permute([0, 1]).expect_err("rank 3 needs 3 entries");
    assert!(matches!(
        err,
        GraphError::Shape(ShapeError::RankMismatch {
            op: "permute",
            expected: 3,
            actual: 2,
        })
    ));
}

#[test]
fn permute_then_inverse_restores_the_shape() {
    let graph = Graph::new();
    let x = graph.input([2, 3, 4]);
    // The inverse of a destination map p is q with q[p[i]] = i.
    let round = x.permute([2, 0, 1]).permute([1, 2, 0]);
    assert_eq!(round.shape(), x.shape());
}

#[test]
fn transpose_reverses_every_axis() {
    let graph = Graph::new();
    let x = graph.input([2, 3, 4]);
    let t = x.transpose();
    assert_eq!(t.shape(), [4, 3, 2]);
    assert_eq!(t.transpose().shape(), x.shape());
}

#[test]
fn transpose_of_matrix_swaps_dims() {
    let graph = Graph::new();
    let x = graph.input([5, 7]);
    assert_eq!(x.transpose().shape(), [7, 5]);
}

#[test]
fn views_never_store_an_implicit_dim() {
    let graph = Graph::new();
    let x = graph.input([2, 3, 4]);
    let _ = x.reshape([-1]);
    let _ = x.reshape([4, -1, 3]);
    let nodes = graph.nodes();
    for node in nodes.iter() {
        if matches!(node.op, NodeOp::View { .. }) {
            for &dim in node.shape.dims() {
                assert!(dim >= 1, "resolved view shapes hold concrete dims");
            }
        }
    }
}
