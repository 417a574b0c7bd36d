//! switchyard-core
//!
//! Keyed strategy dispatch: pick one of several interchangeable
//! implementations by string key and run it against typed input.
//!
//! # Modules
//! - **domain**: keys, capability families, requests, errors
//! - **typed**: the `Strategy<F>` trait and `StrategyRegistry`
//! - **ports**: `StrategyResolver`, the lookup seam the dispatcher depends on
//! - **app**: `RegistryBuilder` (startup wiring) and `Dispatcher`
//!
//! # Flow
//! caller -> `Dispatcher::execute::<F>(key, input)` -> `StrategyResolver::resolve::<F>(key)`
//! -> `Strategy::execute(input)` -> caller

pub mod app;
pub mod domain;
pub mod ports;
pub mod typed;

#[cfg(test)]
pub(crate) mod test_support;

pub use app::{BuildError, Dispatcher, RegistryBuilder};
pub use domain::{
    ArgumentError, DispatchError, ErrorKind, ExecutionRequest, Family, KeyError, StrategyKey,
};
pub use ports::StrategyResolver;
pub use typed::{
    DuplicatePolicy, FnStrategy, RegistryError, Strategy, StrategyRegistry, strategy_fn,
};
