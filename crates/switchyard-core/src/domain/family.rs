//! Family - capability family marker types.
//!
//! A family fixes the input, output and error types of a group of
//! interchangeable strategies, and scopes which registry partition a key is
//! looked up in. The marker itself is never instantiated; uninhabited enums
//! work well:
//!
//! ```ignore
//! pub enum Arithmetic {}
//!
//! impl Family for Arithmetic {
//!     type Input = Operands;
//!     type Output = i64;
//!     type Error = ArithmeticError;
//!     const NAME: &'static str = "arithmetic";
//! }
//! ```
//!
//! Two families may share identical `Input`/`Output` types and still stay
//! isolated, because partitions are keyed by the marker's `TypeId`.

/// Family is implemented by marker types that name a capability family.
pub trait Family: Send + Sync + 'static {
    /// Value handed to a strategy on each call.
    type Input: Send + 'static;

    /// Value a strategy produces on success.
    type Output: Send + 'static;

    /// Failure raised by a strategy's own execution. Dispatch relays it as-is.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Human-readable family name used in errors and logs.
    const NAME: &'static str;
}
