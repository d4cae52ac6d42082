//! Builds the graph of a one-layer classifier and walks it the way a
//! downstream pass would: nodes in index order, operands always behind.

use std::ptr::NonNull;

use tensorgraph::{Graph, Result};

fn main() -> Result<()> {
    let graph = Graph::new();

    let x = graph.try_input([64, 784])?;
    let w = graph.try_weight([784, 10])?;
    let b = graph.try_weight([10])?;

    let logits = x.try_matmul(&w)?.try_add(&b)?;
    let probs = logits.try_sigmoid()?;
    let confident = probs.try_greater_scalar(0.5)?;
    let per_class = confident.try_reduce_sum_axis(0, false)?;

    // The runtime would bind real buffers here; the builder never reads them.
    let mut pixels = vec![0.0f32; 64 * 784];
    x.set_tensor_data(NonNull::new(pixels.as_mut_ptr()))?;

    println!("graph: {:?}", graph);
    println!("output: {:?} strides {:?}", per_class.shape(), per_class.strides());
    println!();
    for (index, node) in graph.nodes().iter().enumerate() {
        let operands: Vec<usize> = node.op.operands().iter().map(|id| id.index()).collect();
        println!(
            "{index:>3}  {:<10} {:<16} <- {operands:?}",
            format!("{:?}", node.kind()),
            format!("{:?}", node.shape),
        );
    }

    Ok(())
}
