//! Arithmetic strategies served by the demo binary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use switchyard_core::{Family, RegistryBuilder, RegistryError, Strategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operands {
    pub a: i64,
    pub b: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArithmeticError {
    #[error("{op} overflowed for a={a} b={b}")]
    Overflow { op: &'static str, a: i64, b: i64 },
}

pub enum Arithmetic {}

impl Family for Arithmetic {
    type Input = Operands;
    type Output = i64;
    type Error = ArithmeticError;
    const NAME: &'static str = "arithmetic";
}

pub struct Add;

#[async_trait]
impl Strategy<Arithmetic> for Add {
    async fn execute(&self, input: Operands) -> Result<i64, ArithmeticError> {
        input
            .a
            .checked_add(input.b)
            .ok_or(ArithmeticError::Overflow { op: "Add", a: input.a, b: input.b })
    }
}

pub struct Sub;

#[async_trait]
impl Strategy<Arithmetic> for Sub {
    async fn execute(&self, input: Operands) -> Result<i64, ArithmeticError> {
        input
            .a
            .checked_sub(input.b)
            .ok_or(ArithmeticError::Overflow { op: "Sub", a: input.a, b: input.b })
    }
}

/// Every arithmetic key the binary knows about.
pub const KEYS: &[&str] = &["Add", "Sub"];

pub fn register(builder: RegistryBuilder) -> Result<RegistryBuilder, RegistryError> {
    Ok(builder
        .register::<Arithmetic, _>("Add", Add)?
        .register::<Arithmetic, _>("Sub", Sub)?
        .expect_keys::<Arithmetic>(KEYS))
}
