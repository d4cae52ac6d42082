use std::f32::consts::FRAC_PI_2;

use tensorgraph::{BinaryKind, Graph, NodeKind, NodeOp, UnaryKind};

fn binary_parts(graph: &Graph, handle: tensorgraph::NodeHandle<'_>) -> (BinaryKind, NodeOp, NodeOp) {
    match handle.node().op {
        NodeOp::Binary { kind, lhs, rhs } => (
            kind,
            graph.node(lhs).unwrap().op,
            graph.node(rhs).unwrap().op,
        ),
        ref other => panic!("expected a binary node, got {other:?}"),
    }
}

#[test]
fn unary_ops_copy_the_operand_layout() {
    let graph = Graph::new();
    let x = graph.input([4, 1]);
    for op in [x.exp(), x.log(), x.sin()] {
        assert_eq!(op.kind(), NodeKind::Unary);
        assert_eq!(op.shape(), x.shape());
        assert_eq!(op.strides(), x.strides());
        assert_eq!(op.operands()[0], x);
    }
    assert_eq!(x.strides().as_slice(), &[1, 0]);
}

#[test]
fn unary_kinds_are_recorded() {
    let graph = Graph::new();
    let x = graph.input([2]);
    match x.log().node().op {
        NodeOp::Unary { kind, x: operand } => {
            assert_eq!(kind, UnaryKind::Log);
            assert_eq!(operand, x.id());
        }
        ref other => panic!("expected a unary node, got {other:?}"),
    }
}

#[test]
fn neg_multiplies_by_minus_one() {
    let graph = Graph::new();
    let x = graph.input([2, 2]);
    let neg = -x;
    let (kind, lhs, rhs) = binary_parts(&graph, neg);
    assert_eq!(kind, BinaryKind::Mul);
    assert!(matches!(lhs, NodeOp::Immediate(v) if v == -1.0));
    assert!(matches!(rhs, NodeOp::Tensor { .. }));
    assert_eq!(neg.shape(), x.shape());
}

#[test]
fn cos_is_sin_shifted_by_half_pi() {
    let graph = Graph::new();
    let x = graph.input([3]);
    let cos = x.cos();
    let (shift, sin) = match cos.node().op {
        NodeOp::Unary {
            kind: UnaryKind::Sin,
            x: shifted,
        } => (graph.node(shifted).unwrap(), cos),
        ref other => panic!("cos must end in a SIN node, got {other:?}"),
    };
    assert_eq!(sin.shape(), [3]);
    match shift.op {
        NodeOp::Binary { kind, rhs, .. } => {
            assert_eq!(kind, BinaryKind::Add);
            let imm = graph.node(rhs).unwrap();
            assert!(matches!(imm.op, NodeOp::Immediate(v) if v == FRAC_PI_2));
        }
        ref other => panic!("sin operand must be x + pi/2, got {other:?}"),
    }
}

#[test]
fn sigmoid_builds_the_logistic_quotient() {
    let graph = Graph::new();
    let x = graph.input([4]);
    let sig = x.sigmoid();
    assert_eq!(sig.shape(), x.shape());
    let (kind, lhs, rhs) = binary_parts(&graph, sig);
    assert_eq!(kind, BinaryKind::Div);
    assert!(matches!(lhs, NodeOp::Immediate(v) if v == 1.0));
    assert!(matches!(rhs, NodeOp::Binary { kind: BinaryKind::Add, .. }));
}

#[test]
fn scalar_operands_lift_through_immediates() {
    let graph = Graph::new();
    let x = graph.input([2, 3]);
    let shifted = x + 10.0;
    let (kind, lhs, rhs) = binary_parts(&graph, shifted);
    assert_eq!(kind, BinaryKind::Add);
    assert!(matches!(lhs, NodeOp::Tensor { .. }));
    assert!(matches!(rhs, NodeOp::Immediate(v) if v == 10.0));
    assert_eq!(shifted.shape(), [2, 3]);
}

#[test]
fn scalar_on_the_left_keeps_operand_order() {
    let graph = Graph::new();
    let x = graph.input([2]);
    let diff = 1.0 - x;
    let (kind, lhs, rhs) = binary_parts(&graph, diff);
    assert_eq!(kind, BinaryKind::Sub);
    assert!(matches!(lhs, NodeOp::Immediate(v) if v == 1.0));
    assert!(matches!(rhs, NodeOp::Tensor { .. }));

    let quot = 2.0 / x;
    let (kind, lhs, _) = binary_parts(&graph, quot);
    assert_eq!(kind, BinaryKind::Div);
    assert!(matches!(lhs, NodeOp::Immediate(v) if v == 2.0));
}

#[test]
fn subtraction_directions_build_different_trees() {
    let graph = Graph::new();
    let x = graph.input([2]);
    let (_, lhs, rhs) = binary_parts(&graph, x - 3.0);
    assert!(matches!(lhs, NodeOp::Tensor { .. }));
    assert!(matches!(rhs, NodeOp::Immediate(v) if v == 3.0));
    let (_, lhs, rhs) = binary_parts(&graph, 3.0 - x);
    assert!(matches!(lhs, NodeOp::Immediate(v) if v == 3.0));
    assert!(matches!(rhs, NodeOp::Tensor { .. }));
}

#[test]
fn pow_supports_scalar_exponent_and_base() {
    let graph = Graph::new();
    let x = graph.input([2]);
    let (kind, lhs, rhs) = binary_parts(&graph, x.pow_scalar(3.0));
    assert_eq!(kind, BinaryKind::Pow);
    assert!(matches!(lhs, NodeOp::Tensor { .. }));
    assert!(matches!(rhs, NodeOp::Immediate(v) if v == 3.0));

    let (kind, lhs, rhs) = binary_parts(&graph, x.rpow_scalar(2.0));
    assert_eq!(kind, BinaryKind::Pow);
    assert!(matches!(lhs, NodeOp::Immediate(v) if v == 2.0));
    assert!(matches!(rhs, NodeOp::Tensor { .. }));
}

#[test]
fn pow_of_two_tensors_is_a_single_binary_node() {
    let graph = Graph::new();
    let x = graph.input([2]);
    let y = graph.input([2]);
    let (kind, lhs, rhs) = binary_parts(&graph, x.pow(&y));
    assert_eq!(kind, BinaryKind::Pow);
    assert!(matches!(lhs, NodeOp::Tensor { .. }));
    assert!(matches!(rhs, NodeOp::Tensor { .. }));
}

#[test]
fn maximum_is_primitive_and_minimum_is_rewritten() {
    let graph = Graph::new();
    let x = graph.input([3]);
    let y = graph.input([3]);
    let (kind, _, _) = binary_parts(&graph, x.maximum(&y));
    assert_eq!(kind, BinaryKind::Max);

    let min = x.minimum(&y);
    let (kind, lhs, _) = binary_parts(&graph, min);
    // -max(-x, -y): outermost node is the final negation.
    assert_eq!(kind, BinaryKind::Mul);
    assert!(matches!(lhs, NodeOp::Immediate(v) if v == -1.0));
    let nodes = graph.nodes();
    let has_max = nodes
        .iter()
        .any(|node| matches!(node.op, NodeOp::Binary { kind: BinaryKind::Max, .. }));
    assert!(has_max, "min must lower through MAX");
}

#[test]
fn operators_broadcast_like_the_store() {
    let graph = Graph::new();
    let x = graph.input([3, 1]);
    let y = graph.input([4]);
    for out in [x * y, x.maximum(&y), x.minimum(&y)] {
        assert_eq!(out.shape(), [3, 4]);
    }
}
