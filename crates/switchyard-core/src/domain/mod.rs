//! Domain model (keys, families, requests, errors).

pub mod errors;
pub mod family;
pub mod key;
pub mod request;

pub use self::errors::{ArgumentError, DispatchError, ErrorKind};
pub use self::family::Family;
pub use self::key::{KeyError, StrategyKey};
pub use self::request::ExecutionRequest;
