//! Reduction constructors in the three arities: every axis, one axis, or an
//! explicit axis list. Axes may be negative and are normalized before they
//! are stored on the node.

use smallvec::SmallVec;

use crate::graph::{NodeHandle, ReduceKind, Result};
use crate::shape::normalize_reduce_axes;

impl<'g> NodeHandle<'g> {
    /// Sums over every dimension.
    pub fn try_reduce_sum_all(&self, keepdim: bool) -> Result<Self> {
        let axes = all_axes(self.rank());
        self.graph()
            .try_reduce(ReduceKind::Sum, *self, &axes, keepdim)
    }

    pub fn reduce_sum_all(&self, keepdim: bool) -> Self {
        Self::unwrap(self.try_reduce_sum_all(keepdim), "sum")
    }

    pub fn try_reduce_sum_axis(&self, axis: isize, keepdim: bool) -> Result<Self> {
        self.graph()
            .try_reduce(ReduceKind::Sum, *self, &[axis], keepdim)
    }

    pub fn reduce_sum_axis(&self, axis: isize, keepdim: bool) -> Self {
        Self::unwrap(self.try_reduce_sum_axis(axis, keepdim), "sum")
    }

    pub fn try_reduce_sum(&self, axes: &[isize], keepdim: bool) -> Result<Self> {
        self.graph().try_reduce(ReduceKind::Sum, *self, axes, keepdim)
    }

    pub fn reduce_sum(&self, axes: &[isize], keepdim: bool) -> Self {
        Self::unwrap(self.try_reduce_sum(axes, keepdim), "sum")
    }

    /// Takes the maximum over every dimension.
    pub fn try_reduce_max_all(&self, keepdim: bool) -> Result<Self> {
        let axes = all_axes(self.rank());
        self.graph()
            .try_reduce(ReduceKind::Max, *self, &axes, keepdim)
    }

    pub fn reduce_max_all(&self, keepdim: bool) -> Self {
        Self::unwrap(self.try_reduce_max_all(keepdim), "max")
    }

    pub fn try_reduce_max_axis(&self, axis: isize, keepdim: bool) -> Result<Self> {
        self.graph()
            .try_reduce(ReduceKind::Max, *self, &[axis], keepdim)
    }

    pub fn reduce_max_axis(&self, axis: isize, keepdim: bool) -> Self {
        Self::unwrap(self.try_reduce_max_axis(axis, keepdim), "max")
    }

    pub fn try_reduce_max(&self, axes: &[isize], keepdim: bool) -> Result<Self> {
        self.graph().try_reduce(ReduceKind::Max, *self, axes, keepdim)
    }

    pub fn reduce_max(&self, axes: &[isize], keepdim: bool) -> Self {
        Self::unwrap(self.try_reduce_max(axes, keepdim), "max")
    }

    /// Minimum over every dimension, decomposed as `-max(-x)`; there is no
    /// MIN reduction opcode.
    pub fn try_reduce_min_all(&self, keepdim: bool) -> Result<Self> {
        self.try_neg()?.try_reduce_max_all(keepdim)?.try_neg()
    }

    pub fn reduce_min_all(&self, keepdim: bool) -> Self {
        Self::unwrap(self.try_reduce_min_all(keepdim), "min")
    }

    pub fn try_reduce_min_axis(&self, axis: isize, keepdim: bool) -> Result<Self> {
        normalize_reduce_axes("min", &[axis], self.rank())?;
        self.try_neg()?
            .try_reduce_max_axis(axis, keepdim)?
            .try_neg()
    }

    pub fn reduce_min_axis(&self, axis: isize, keepdim: bool) -> Self {
        Self::unwrap(self.try_reduce_min_axis(axis, keepdim), "min")
    }

    pub fn try_reduce_min(&self, axes: &[isize], keepdim: bool) -> Result<Self> {
        normalize_reduce_axes("min", axes, self.rank())?;
        self.try_neg()?.try_reduce_max(axes, keepdim)?.try_neg()
    }

    pub fn reduce_min(&self, axes: &[isize], keepdim: bool) -> Self {
        Self::unwrap(self.try_reduce_min(axes, keepdim), "min")
    }
}

fn all_axes(rank: usize) -> SmallVec<[isize; 4]> {
    (0..rank as isize).collect()
}
