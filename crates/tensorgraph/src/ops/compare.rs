//! Comparison constructors.
//!
//! Every comparison lowers to a MAX/CMP_EQ tree that evaluates to a
//! 0/1-valued tensor of the broadcast shape:
//!
//! ```text
//! x == y   ->  cmp_eq(x, y)
//! x >  y   ->  cmp_eq(max(x, y), x)
//! x <  y   ->  y > x
//! x <= y   ->  cmp_eq(max(x - y, 0), 0)
//! x >= y   ->  cmp_eq(min(x - y, 0), 0)
//! ```
//!
//! Scalar forms lift the scalar through an Immediate node and delegate.

use crate::graph::{BinaryKind, NodeHandle, Result};

impl<'g> NodeHandle<'g> {
    /// Elementwise equality; 1.0 where equal, 0.0 elsewhere.
    pub fn try_equal(&self, rhs: &Self) -> Result<Self> {
        self.graph().try_binary(BinaryKind::CmpEq, *self, *rhs)
    }

    pub fn equal(&self, rhs: &Self) -> Self {
        Self::unwrap(self.try_equal(rhs), "cmp_eq")
    }

    pub fn try_greater(&self, rhs: &Self) -> Result<Self> {
        self.try_maximum(rhs)?.try_equal(self)
    }

    pub fn greater(&self, rhs: &Self) -> Self {
        Self::unwrap(self.try_greater(rhs), "cmp_gt")
    }

    pub fn try_less(&self, rhs: &Self) -> Result<Self> {
        rhs.try_greater(self)
    }

    pub fn less(&self, rhs: &Self) -> Self {
        Self::unwrap(self.try_less(rhs), "cmp_lt")
    }

    pub fn try_less_equal(&self, rhs: &Self) -> Result<Self> {
        self.try_sub(rhs)?
            .try_maximum_scalar(0.0)?
            .try_equal_scalar(0.0)
    }

    pub fn less_equal(&self, rhs: &Self) -> Self {
        Self::unwrap(self.try_less_equal(rhs), "cmp_le")
    }

    pub fn try_greater_equal(&self, rhs: &Self) -> Result<Self> {
        self.try_sub(rhs)?
            .try_minimum_scalar(0.0)?
            .try_equal_scalar(0.0)
    }

    pub fn greater_equal(&self, rhs: &Self) -> Self {
        Self::unwrap(self.try_greater_equal(rhs), "cmp_ge")
    }

    pub fn try_equal_scalar(&self, scalar: f32) -> Result<Self> {
        let imm = self.graph().immediate(scalar);
        self.try_equal(&imm)
    }

    pub fn equal_scalar(&self, scalar: f32) -> Self {
        Self::unwrap(self.try_equal_scalar(scalar), "cmp_eq")
    }

    pub fn try_greater_scalar(&self, scalar: f32) -> Result<Self> {
        let imm = self.graph().immediate(scalar);
        self.try_greater(&imm)
    }

    pub fn greater_scalar(&self, scalar: f32) -> Self {
        Self::unwrap(self.try_greater_scalar(scalar), "cmp_gt")
    }

    pub fn try_less_scalar(&self, scalar: f32) -> Result<Self> {
        let imm = self.graph().immediate(scalar);
        self.try_less(&imm)
    }

    pub fn less_scalar(&self, scalar: f32) -> Self {
        Self::unwrap(self.try_less_scalar(scalar), "cmp_lt")
    }

    pub fn try_less_equal_scalar(&self, scalar: f32) -> Result<Self> {
        let imm = self.graph().immediate(scalar);
        self.try_less_equal(&imm)
    }

    pub fn less_equal_scalar(&self, scalar: f32) -> Self {
        Self::unwrap(self.try_less_equal_scalar(scalar), "cmp_le")
    }

    pub fn try_greater_equal_scalar(&self, scalar: f32) -> Result<Self> {
        let imm = self.graph().immediate(scalar);
        self.try_greater_equal(&imm)
    }

    pub fn greater_equal_scalar(&self, scalar: f32) -> Self {
        Self::unwrap(self.try_greater_equal_scalar(scalar), "cmp_ge")
    }
}
