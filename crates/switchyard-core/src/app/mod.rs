//! App - wiring and the dispatch entry point.
//!
//! - **RegistryBuilder**: startup registration and validation
//! - **Dispatcher**: validate -> resolve -> invoke

pub mod builder;
pub mod dispatcher;

pub use self::builder::{BuildError, RegistryBuilder};
pub use self::dispatcher::Dispatcher;
