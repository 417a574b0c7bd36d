//! Families and strategies shared by unit tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::Family;
use crate::typed::Strategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operands {
    pub a: i64,
    pub b: i64,
}

impl Operands {
    pub fn new(a: i64, b: i64) -> Self {
        Self { a, b }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArithmeticError {
    #[error("arithmetic overflow")]
    Overflow,
}

pub enum Arithmetic {}

impl Family for Arithmetic {
    type Input = Operands;
    type Output = i64;
    type Error = ArithmeticError;
    const NAME: &'static str = "arithmetic";
}

/// Same input/output types as [`Arithmetic`], different partition.
pub enum Comparison {}

impl Family for Comparison {
    type Input = Operands;
    type Output = i64;
    type Error = ArithmeticError;
    const NAME: &'static str = "comparison";
}

pub struct Add;

#[async_trait]
impl Strategy<Arithmetic> for Add {
    async fn execute(&self, input: Operands) -> Result<i64, ArithmeticError> {
        input.a.checked_add(input.b).ok_or(ArithmeticError::Overflow)
    }
}

pub struct Sub;

#[async_trait]
impl Strategy<Arithmetic> for Sub {
    async fn execute(&self, input: Operands) -> Result<i64, ArithmeticError> {
        input.a.checked_sub(input.b).ok_or(ArithmeticError::Overflow)
    }
}

/// Registered as "Add" in [`Comparison`] to collide with [`Add`].
pub struct Max;

#[async_trait]
impl Strategy<Comparison> for Max {
    async fn execute(&self, input: Operands) -> Result<i64, ArithmeticError> {
        Ok(input.a.max(input.b))
    }
}
