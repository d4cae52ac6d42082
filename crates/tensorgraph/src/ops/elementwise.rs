//! Elementwise operator constructors and their scalar-lifting overloads.
//!
//! There is no mixed scalar/tensor binary node: scalars are always
//! materialized as an Immediate node first, which keeps the operator algebra
//! closed. Negation, cosine, and sigmoid are construction-time rewrites over
//! the primitive kinds rather than opcodes of their own.

use std::f32::consts::FRAC_PI_2;
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::graph::{BinaryKind, InternalError, NodeHandle, Result, UnaryKind};
use crate::shape::broadcast_shapes;

impl<'g> NodeHandle<'g> {
    pub fn try_exp(&self) -> Result<Self> {
        self.graph().try_unary(UnaryKind::Exp, *self)
    }

    pub fn exp(&self) -> Self {
        Self::unwrap(self.try_exp(), "exp")
    }

    pub fn try_log(&self) -> Result<Self> {
        self.graph().try_unary(UnaryKind::Log, *self)
    }

    pub fn log(&self) -> Self {
        Self::unwrap(self.try_log(), "log")
    }

    pub fn try_sin(&self) -> Result<Self> {
        self.graph().try_unary(UnaryKind::Sin, *self)
    }

    pub fn sin(&self) -> Self {
        Self::unwrap(self.try_sin(), "sin")
    }

    /// `cos(x)` built as `sin(x + pi/2)`; there is no COS opcode.
    pub fn try_cos(&self) -> Result<Self> {
        self.try_add_scalar(FRAC_PI_2)?.try_sin()
    }

    pub fn cos(&self) -> Self {
        Self::unwrap(self.try_cos(), "cos")
    }

    /// `-x` built as `(-1) * x`; there is no NEG opcode.
    pub fn try_neg(&self) -> Result<Self> {
        let minus_one = self.graph().immediate(-1.0);
        minus_one.try_mul(self)
    }

    pub fn neg(&self) -> Self {
        Self::unwrap(self.try_neg(), "neg")
    }

    /// `1 / (1 + exp(-x))`.
    pub fn try_sigmoid(&self) -> Result<Self> {
        let exp = self.try_neg()?.try_exp()?;
        let denom = self.graph().immediate(1.0).try_add(&exp)?;
        self.graph().immediate(1.0).try_div(&denom)
    }

    pub fn sigmoid(&self) -> Self {
        Self::unwrap(self.try_sigmoid(), "sigmoid")
    }

    pub fn try_add(&self, rhs: &Self) -> Result<Self> {
        self.graph().try_binary(BinaryKind::Add, *self, *rhs)
    }

    pub fn add(&self, rhs: &Self) -> Self {
        Self::unwrap(self.try_add(rhs), "add")
    }

    pub fn try_sub(&self, rhs: &Self) -> Result<Self> {
        self.graph().try_binary(BinaryKind::Sub, *self, *rhs)
    }

    pub fn sub(&self, rhs: &Self) -> Self {
        Self::unwrap(self.try_sub(rhs), "sub")
    }

    pub fn try_mul(&self, rhs: &Self) -> Result<Self> {
        self.graph().try_binary(BinaryKind::Mul, *self, *rhs)
    }

    pub fn mul(&self, rhs: &Self) -> Self {
        Self::unwrap(self.try_mul(rhs), "mul")
    }

    pub fn try_div(&self, rhs: &Self) -> Result<Self> {
        self.graph().try_binary(BinaryKind::Div, *self, *rhs)
    }

    pub fn div(&self, rhs: &Self) -> Self {
        Self::unwrap(self.try_div(rhs), "div")
    }

    pub fn try_pow(&self, rhs: &Self) -> Result<Self> {
        self.graph().try_binary(BinaryKind::Pow, *self, *rhs)
    }

    pub fn pow(&self, rhs: &Self) -> Self {
        Self::unwrap(self.try_pow(rhs), "pow")
    }

    pub fn try_maximum(&self, rhs: &Self) -> Result<Self> {
        self.graph().try_binary(BinaryKind::Max, *self, *rhs)
    }

    pub fn maximum(&self, rhs: &Self) -> Self {
        Self::unwrap(self.try_maximum(rhs), "max")
    }

    /// `min(x, y)` built as `-max(-x, -y)`; there is no MIN opcode.
    pub fn try_minimum(&self, rhs: &Self) -> Result<Self> {
        // Validate up front: the decomposition must not leave the negated
        // halves behind when the MAX broadcast would fail.
        if !std::ptr::eq(self.graph(), rhs.graph()) {
            return Err(InternalError::ForeignHandle.into());
        }
        broadcast_shapes("min", &self.shape(), &rhs.shape())?;
        let lhs = self.try_neg()?;
        let rhs = rhs.try_neg()?;
        lhs.try_maximum(&rhs)?.try_neg()
    }

    pub fn minimum(&self, rhs: &Self) -> Self {
        Self::unwrap(self.try_minimum(rhs), "min")
    }

    pub fn try_add_scalar(&self, scalar: f32) -> Result<Self> {
        let imm = self.graph().immediate(scalar);
        self.try_add(&imm)
    }

    pub fn add_scalar(&self, scalar: f32) -> Self {
        Self::unwrap(self.try_add_scalar(scalar), "add")
    }

    /// `self - scalar`; the reversed form is `scalar - handle` via `Sub`.
    pub fn try_sub_scalar(&self, scalar: f32) -> Result<Self> {
        let imm = self.graph().immediate(scalar);
        self.try_sub(&imm)
    }

    pub fn sub_scalar(&self, scalar: f32) -> Self {
        Self::unwrap(self.try_sub_scalar(scalar), "sub")
    }

    pub fn try_mul_scalar(&self, scalar: f32) -> Result<Self> {
        let imm = self.graph().immediate(scalar);
        self.try_mul(&imm)
    }

    pub fn mul_scalar(&self, scalar: f32) -> Self {
        Self::unwrap(self.try_mul_scalar(scalar), "mul")
    }

    /// `self / scalar`; the reversed form is `scalar / handle` via `Div`.
    pub fn try_div_scalar(&self, scalar: f32) -> Result<Self> {
        let imm = self.graph().immediate(scalar);
        self.try_div(&imm)
    }

    pub fn div_scalar(&self, scalar: f32) -> Self {
        Self::unwrap(self.try_div_scalar(scalar), "div")
    }

    /// `self ** scalar`.
    pub fn try_pow_scalar(&self, scalar: f32) -> Result<Self> {
        let imm = self.graph().immediate(scalar);
        self.try_pow(&imm)
    }

    pub fn pow_scalar(&self, scalar: f32) -> Self {
        Self::unwrap(self.try_pow_scalar(scalar), "pow")
    }

    /// `scalar ** self`, the scalar-base form of [`NodeHandle::try_pow`].
    pub fn try_rpow_scalar(&self, base: f32) -> Result<Self> {
        let imm = self.graph().immediate(base);
        imm.try_pow(self)
    }

    pub fn rpow_scalar(&self, base: f32) -> Self {
        Self::unwrap(self.try_rpow_scalar(base), "pow")
    }

    pub fn try_maximum_scalar(&self, scalar: f32) -> Result<Self> {
        let imm = self.graph().immediate(scalar);
        self.try_maximum(&imm)
    }

    pub fn maximum_scalar(&self, scalar: f32) -> Self {
        Self::unwrap(self.try_maximum_scalar(scalar), "max")
    }

    pub fn try_minimum_scalar(&self, scalar: f32) -> Result<Self> {
        let imm = self.graph().immediate(scalar);
        self.try_minimum(&imm)
    }

    pub fn minimum_scalar(&self, scalar: f32) -> Self {
        Self::unwrap(self.try_minimum_scalar(scalar), "min")
    }
}

impl<'g> Add for NodeHandle<'g> {
    type Output = NodeHandle<'g>;

    fn add(self, rhs: Self) -> Self::Output {
        NodeHandle::unwrap(self.try_add(&rhs), "add")
    }
}

impl<'g> Add<f32> for NodeHandle<'g> {
    type Output = NodeHandle<'g>;

    fn add(self, rhs: f32) -> Self::Output {
        self.add_scalar(rhs)
    }
}

impl<'g> Add<NodeHandle<'g>> for f32 {
    type Output = NodeHandle<'g>;

    fn add(self, rhs: NodeHandle<'g>) -> Self::Output {
        let imm = rhs.graph().immediate(self);
        NodeHandle::unwrap(imm.try_add(&rhs), "add")
    }
}

impl<'g> Sub for NodeHandle<'g> {
    type Output = NodeHandle<'g>;

    fn sub(self, rhs: Self) -> Self::Output {
        NodeHandle::unwrap(self.try_sub(&rhs), "sub")
    }
}

impl<'g> Sub<f32> for NodeHandle<'g> {
    type Output = NodeHandle<'g>;

    fn sub(self, rhs: f32) -> Self::Output {
        self.sub_scalar(rhs)
    }
}

impl<'g> Sub<NodeHandle<'g>> for f32 {
    type Output = NodeHandle<'g>;

    fn sub(self, rhs: NodeHandle<'g>) -> Self::Output {
        let imm = rhs.graph().immediate(self);
        NodeHandle::unwrap(imm.try_sub(&rhs), "sub")
    }
}

impl<'g> Mul for NodeHandle<'g> {
    type Output = NodeHandle<'g>;

    fn mul(self, rhs: Self) -> Self::Output {
        NodeHandle::unwrap(self.try_mul(&rhs), "mul")
    }
}

impl<'g> Mul<f32> for NodeHandle<'g> {
    type Output = NodeHandle<'g>;

    fn mul(self, rhs: f32) -> Self::Output {
        self.mul_scalar(rhs)
    }
}

impl<'g> Mul<NodeHandle<'g>> for f32 {
    type Output = NodeHandle<'g>;

    fn mul(self, rhs: NodeHandle<'g>) -> Self::Output {
        let imm = rhs.graph().immediate(self);
        NodeHandle::unwrap(imm.try_mul(&rhs), "mul")
    }
}

impl<'g> Div for NodeHandle<'g> {
    type Output = NodeHandle<'g>;

    fn div(self, rhs: Self) -> Self::Output {
        NodeHandle::unwrap(self.try_div(&rhs), "div")
    }
}

impl<'g> Div<f32> for NodeHandle<'g> {
    type Output = NodeHandle<'g>;

    fn div(self, rhs: f32) -> Self::Output {
        self.div_scalar(rhs)
    }
}

impl<'g> Div<NodeHandle<'g>> for f32 {
    type Output = NodeHandle<'g>;

    fn div(self, rhs: NodeHandle<'g>) -> Self::Output {
        let imm = rhs.graph().immediate(self);
        NodeHandle::unwrap(imm.try_div(&rhs), "div")
    }
}

impl<'g> Neg for NodeHandle<'g> {
    type Output = NodeHandle<'g>;

    fn neg(self) -> Self::Output {
        NodeHandle::unwrap(self.try_neg(), "neg")
    }
}
