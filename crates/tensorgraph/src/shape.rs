//! Shape and stride algebra shared by every op constructor.
//!
//! All functions here are pure and deterministic: they either produce a fully
//! resolved result or fail with a [`ShapeError`] naming the operator that
//! asked. Broadcasting follows the right-aligned rule, and canonical strides
//! give size-1 dimensions a stride of 0 so broadcast operands can be walked
//! without materializing the expanded tensor.

use std::fmt;

use smallvec::SmallVec;
use thiserror::Error;

/// Compact stride storage; ranks above 4 spill to the heap.
pub type Strides = SmallVec<[usize; 4]>;

/// Normalized (non-negative, in-range) axis list.
pub type Axes = SmallVec<[usize; 4]>;

type DimVec = SmallVec<[usize; 4]>;

/// Logical dimensions of a tensor value. Rank 0 (no dimensions) is a scalar.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: DimVec,
}

impl Shape {
    /// Builds a shape from any sequence of dimension sizes.
    pub fn new(dims: impl IntoIterator<Item = usize>) -> Self {
        Shape {
            dims: dims.into_iter().collect(),
        }
    }

    /// The rank-0 shape of scalars and immediates.
    pub fn scalar() -> Self {
        Shape::default()
    }

    /// Borrow the raw dimension slice.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Number of axes.
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    pub fn is_scalar(&self) -> bool {
        self.dims.is_empty()
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.dims.iter()).finish()
    }
}

impl FromIterator<usize> for Shape {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Shape::new(iter)
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Shape::new(dims.iter().copied())
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(dims: [usize; N]) -> Self {
        Shape::new(dims)
    }
}

impl<const N: usize> PartialEq<[usize; N]> for Shape {
    fn eq(&self, other: &[usize; N]) -> bool {
        self.dims() == other
    }
}

/// Validation failure raised while resolving shapes, strides, or axes.
///
/// Every variant names the operator that was being constructed so failures
/// surfaced through [`GraphError`](crate::GraphError) stay attributable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("{op}: cannot broadcast {lhs:?} against {rhs:?}")]
    BroadcastMismatch {
        op: &'static str,
        lhs: Shape,
        rhs: Shape,
    },
    #[error("{op}: axis {axis} is out of range for rank {rank}")]
    AxisOutOfRange {
        op: &'static str,
        axis: isize,
        rank: usize,
    },
    #[error("{op}: axis {axis} appears more than once")]
    DuplicateAxis { op: &'static str, axis: isize },
    #[error("{op}: {requested} reduction axes exceed rank {rank}")]
    TooManyAxes {
        op: &'static str,
        requested: usize,
        rank: usize,
    },
    #[error("{op}: expected {expected} entries, got {actual}")]
    RankMismatch {
        op: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("{op}: cannot view {src:?} ({src_elems} elements) as {dst_elems} elements")]
    ElementCountMismatch {
        op: &'static str,
        src: Shape,
        src_elems: usize,
        dst_elems: usize,
    },
    #[error("{op}: at most one dimension may be -1")]
    MultipleImplicitDims { op: &'static str },
    #[error("{op}: {total} elements are not divisible by the {explicit} explicitly requested")]
    ImplicitDimIndivisible {
        op: &'static str,
        total: usize,
        explicit: usize,
    },
    #[error("{op}: dimension {dim} is invalid; dimensions must be >= 1")]
    InvalidDimension { op: &'static str, dim: isize },
    #[error("{op}: operand of rank {rank} where at least rank {min} is required")]
    RankTooSmall {
        op: &'static str,
        rank: usize,
        min: usize,
    },
    #[error("{op}: inner dimensions of {lhs:?} and {rhs:?} do not match")]
    InnerDimMismatch {
        op: &'static str,
        lhs: Shape,
        rhs: Shape,
    },
    #[error("{op}: dimension product overflows")]
    Overflow { op: &'static str },
}

/// Maps a possibly negative axis into `[0, rank)` by wrapping modulo `rank`.
///
/// Fails only for rank-0 shapes, which have no axes to address.
pub fn normalize_axis(op: &'static str, axis: isize, rank: usize) -> Result<usize, ShapeError> {
    if rank == 0 {
        return Err(ShapeError::AxisOutOfRange { op, axis, rank });
    }
    let rank = rank as isize;
    Ok((((axis % rank) + rank) % rank) as usize)
}

/// Normalizes an axis list for a reduction: wraps each entry, sorts, and
/// rejects duplicates. The returned list is strictly increasing.
pub fn normalize_reduce_axes(
    op: &'static str,
    axes: &[isize],
    rank: usize,
) -> Result<Axes, ShapeError> {
    let mut normalized = Axes::with_capacity(axes.len());
    for &axis in axes {
        normalized.push(normalize_axis(op, axis, rank)?);
    }
    normalized.sort_unstable();
    for pair in normalized.windows(2) {
        if pair[0] == pair[1] {
            return Err(ShapeError::DuplicateAxis {
                op,
                axis: pair[0] as isize,
            });
        }
    }
    Ok(normalized)
}

/// Right-aligns two shapes and expands size-1 dimensions to match the other
/// side. Unmatched leading dimensions of the longer shape pass through.
pub fn broadcast_shapes(op: &'static str, a: &Shape, b: &Shape) -> Result<Shape, ShapeError> {
    let (longer, shorter) = if a.rank() >= b.rank() { (a, b) } else { (b, a) };
    let mut out = DimVec::from_slice(longer.dims());
    let offset = longer.rank() - shorter.rank();
    for (i, &small) in shorter.dims().iter().enumerate() {
        let big = &mut out[offset + i];
        if *big == small || small == 1 {
            continue;
        }
        if *big == 1 {
            *big = small;
        } else {
            return Err(ShapeError::BroadcastMismatch {
                op,
                lhs: a.clone(),
                rhs: b.clone(),
            });
        }
    }
    Ok(Shape { dims: out })
}

/// Computes the one stride layout the builder emits: a right-to-left running
/// product, with size-1 dimensions pinned to stride 0 so broadcasting is free
/// at the consumer.
pub fn canonical_strides(op: &'static str, shape: &Shape) -> Result<Strides, ShapeError> {
    let mut strides = Strides::from_elem(0, shape.rank());
    let mut step = 1usize;
    for (i, &dim) in shape.dims().iter().enumerate().rev() {
        strides[i] = if dim == 1 { 0 } else { step };
        step = step
            .checked_mul(dim)
            .ok_or(ShapeError::Overflow { op })?;
    }
    Ok(strides)
}

/// Output shape of a reduction over `axes` (already normalized and sorted).
///
/// An empty axis list collapses every dimension: the scalar shape, or a
/// vector of ones under `keepdim`.
pub fn reduced_shape(
    op: &'static str,
    shape: &Shape,
    axes: &[usize],
    keepdim: bool,
) -> Result<Shape, ShapeError> {
    if axes.is_empty() {
        if keepdim {
            return Ok(Shape::new(std::iter::repeat(1).take(shape.rank())));
        }
        return Ok(Shape::scalar());
    }
    if axes.len() > shape.rank() {
        return Err(ShapeError::TooManyAxes {
            op,
            requested: axes.len(),
            rank: shape.rank(),
        });
    }
    for &axis in axes {
        if axis >= shape.rank() {
            return Err(ShapeError::AxisOutOfRange {
                op,
                axis: axis as isize,
                rank: shape.rank(),
            });
        }
    }
    let dims = shape.dims().iter().enumerate();
    if keepdim {
        Ok(dims
            .map(|(i, &d)| if axes.contains(&i) { 1 } else { d })
            .collect())
    } else {
        Ok(dims
            .filter(|(i, _)| !axes.contains(i))
            .map(|(_, &d)| d)
            .collect())
    }
}

/// `product(dims)` with overflow checking.
pub fn element_count(op: &'static str, shape: &Shape) -> Result<usize, ShapeError> {
    let mut count = 1usize;
    for &dim in shape.dims() {
        count = count
            .checked_mul(dim)
            .ok_or(ShapeError::Overflow { op })?;
    }
    Ok(count)
}
