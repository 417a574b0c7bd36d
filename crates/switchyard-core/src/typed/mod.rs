//! Typed - strategies and the registry that stores them.
//!
//! # Two layers
//! - **Typed**: `Strategy<F>` ties an implementation to one family at compile time.
//! - **Erased**: `StrategyRegistry` stores each family's table as `dyn Any`
//!   and recovers the typed view on lookup.

pub mod registry;
pub mod strategy;

pub use self::registry::{DuplicatePolicy, RegistryError, StrategyRegistry};
pub use self::strategy::{FnStrategy, Strategy, strategy_fn};
