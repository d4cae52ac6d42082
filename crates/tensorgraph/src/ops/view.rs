//! View constructors: reshape, permute, transpose.
//!
//! Views share the operand's data behind a different layout. The resolved
//! shape always gets freshly computed canonical strides; the store re-checks
//! that the element count is preserved.

use smallvec::SmallVec;

use crate::graph::{NodeHandle, Result};
use crate::shape::{canonical_strides, element_count, normalize_axis, Shape, ShapeError};

impl<'g> NodeHandle<'g> {
    /// Reinterprets the node under a new shape.
    ///
    /// At most one entry may be `-1`; it is replaced by whatever dimension
    /// makes the element counts agree. The stored node never contains a `-1`.
    pub fn try_reshape(&self, dims: impl IntoIterator<Item = isize>) -> Result<Self> {
        const OP: &str = "reshape";
        let requested: SmallVec<[isize; 4]> = dims.into_iter().collect();
        let total = element_count(OP, &self.shape())?;

        let mut implicit = None;
        let mut explicit = 1usize;
        for (i, &dim) in requested.iter().enumerate() {
            if dim == -1 {
                if implicit.is_some() {
                    return Err(ShapeError::MultipleImplicitDims { op: OP }.into());
                }
                implicit = Some(i);
            } else if dim < 1 {
                return Err(ShapeError::InvalidDimension { op: OP, dim }.into());
            } else {
                explicit = explicit
                    .checked_mul(dim as usize)
                    .ok_or(ShapeError::Overflow { op: OP })?;
            }
        }

        let filler = match implicit {
            None => {
                if explicit != total {
                    return Err(ShapeError::ElementCountMismatch {
                        op: OP,
                        src: self.shape(),
                        src_elems: total,
                        dst_elems: explicit,
                    }
                    .into());
                }
                0
            }
            Some(_) => {
                if total % explicit != 0 {
                    return Err(ShapeError::ImplicitDimIndivisible {
                        op: OP,
                        total,
                        explicit,
                    }
                    .into());
                }
                total / explicit
            }
        };

        let shape = Shape::new(
            requested
                .iter()
                .map(|&dim| if dim == -1 { filler } else { dim as usize }),
        );
        let strides = canonical_strides(OP, &shape)?;
        self.graph().try_view(*self, shape, strides)
    }

    pub fn reshape(&self, dims: impl IntoIterator<Item = isize>) -> Self {
        Self::unwrap(self.try_reshape(dims), "reshape")
    }

    /// Rank-1 convenience; `-1` flattens the node.
    pub fn try_reshape_1d(&self, length: isize) -> Result<Self> {
        self.try_reshape([length])
    }

    pub fn reshape_1d(&self, length: isize) -> Self {
        Self::unwrap(self.try_reshape_1d(length), "reshape")
    }

    /// Reorders axes. `dims[i]` names the *destination* of source axis `i`:
    /// `out_shape[dims[i]] = shape[i]`. Entries may be negative and must form
    /// a permutation of `0..rank`.
    pub fn try_permute(&self, dims: impl IntoIterator<Item = isize>) -> Result<Self> {
        const OP: &str = "permute";
        let shape = self.shape();
        let rank = shape.rank();
        let requested: SmallVec<[isize; 4]> = dims.into_iter().collect();
        if requested.len() != rank {
            return Err(ShapeError::RankMismatch {
                op: OP,
                expected: rank,
                actual: requested.len(),
            }
            .into());
        }

        let mut out = SmallVec::<[usize; 4]>::from_elem(0, rank);
        let mut seen = SmallVec::<[bool; 4]>::from_elem(false, rank);
        for (i, &dim) in requested.iter().enumerate() {
            let dest = normalize_axis(OP, dim, rank)?;
            if seen[dest] {
                return Err(ShapeError::DuplicateAxis { op: OP, axis: dim }.into());
            }
            seen[dest] = true;
            out[dest] = shape.dims()[i];
        }

        let out_shape = Shape::new(out);
        let strides = canonical_strides(OP, &out_shape)?;
        self.graph().try_view(*self, out_shape, strides)
    }

    pub fn permute(&self, dims: impl IntoIterator<Item = isize>) -> Self {
        Self::unwrap(self.try_permute(dims), "permute")
    }

    /// Reverses every axis: `permute([rank-1, ..., 1, 0])`.
    pub fn try_transpose(&self) -> Result<Self> {
        let rank = self.rank() as isize;
        self.try_permute((0..rank).rev())
    }

    pub fn transpose(&self) -> Self {
        Self::unwrap(self.try_transpose(), "permute")
    }
}
