//! Matrix multiplication decomposed through broadcast and reduction.
//!
//! There is no MATMUL opcode. For operands shaped `(.., A, K)` and
//! `(.., K, B)` the constructor reshapes them to `(.., A, K, 1)` and
//! `(.., 1, K, B)`, multiplies (broadcasting expands the product to
//! `(.., A, K, B)`), and sums away axis `-2`. Rank-1 operands are padded to
//! matrices first and the synthetic axes are squeezed off the result, so
//! vector-vector products come back as scalars.

use smallvec::SmallVec;

use crate::graph::{InternalError, NodeHandle, Result};
use crate::shape::{broadcast_shapes, Shape, ShapeError};

impl<'g> NodeHandle<'g> {
    pub fn try_matmul(&self, rhs: &Self) -> Result<Self> {
        const OP: &str = "matmul";
        if !std::ptr::eq(self.graph(), rhs.graph()) {
            return Err(InternalError::ForeignHandle.into());
        }
        let x_shape = self.shape();
        let y_shape = rhs.shape();
        for shape in [&x_shape, &y_shape] {
            if shape.rank() == 0 {
                return Err(ShapeError::RankTooSmall {
                    op: OP,
                    rank: 0,
                    min: 1,
                }
                .into());
            }
        }

        let mut x_dims: SmallVec<[usize; 6]> = SmallVec::from_slice(x_shape.dims());
        let mut y_dims: SmallVec<[usize; 6]> = SmallVec::from_slice(y_shape.dims());
        let x_vec = x_dims.len() == 1;
        if x_vec {
            x_dims.insert(0, 1);
        }
        let y_vec = y_dims.len() == 1;
        if y_vec {
            y_dims.push(1);
        }
        if x_dims[x_dims.len() - 1] != y_dims[y_dims.len() - 2] {
            return Err(ShapeError::InnerDimMismatch {
                op: OP,
                lhs: x_shape,
                rhs: y_shape,
            }
            .into());
        }

        // Extended layouts (.., A, K, 1) and (.., 1, K, B).
        x_dims.push(1);
        y_dims.insert(y_dims.len() - 2, 1);

        // Validate the batch-dimension broadcast before emitting any node so
        // a mismatch leaves the graph untouched.
        broadcast_shapes(
            OP,
            &Shape::new(x_dims.iter().copied()),
            &Shape::new(y_dims.iter().copied()),
        )?;

        let x_view = self.try_reshape(x_dims.iter().map(|&d| d as isize))?;
        let y_view = rhs.try_reshape(y_dims.iter().map(|&d| d as isize))?;
        let summed = x_view.try_mul(&y_view)?.try_reduce_sum_axis(-2, false)?;

        if !(x_vec || y_vec) {
            return Ok(summed);
        }
        let mut out: SmallVec<[isize; 4]> = summed
            .shape()
            .dims()
            .iter()
            .map(|&d| d as isize)
            .collect();
        if x_vec {
            let idx = out.len() - 2;
            out.remove(idx);
        }
        if y_vec {
            out.pop();
        }
        summed.try_reshape(out)
    }

    pub fn matmul(&self, rhs: &Self) -> Self {
        Self::unwrap(self.try_matmul(rhs), "matmul")
    }
}
