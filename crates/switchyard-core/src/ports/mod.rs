//! Ports - seams the core consumes from its host.

pub mod resolver;

pub use self::resolver::StrategyResolver;
