//! StrategyResolver port - where the dispatcher looks strategies up.
//!
//! The in-memory `StrategyRegistry` is the default implementation. Hosts with
//! their own container (or tests that want to observe lookups) implement this
//! trait instead.

use std::sync::Arc;

use crate::domain::{Family, StrategyKey};
use crate::typed::Strategy;

/// StrategyResolver answers "which strategy of family `F` is registered under `key`?"
///
/// # Contract
/// - Pure lookup: no side effects on the mapping.
/// - `None` for unknown keys; never a placeholder implementation.
/// - Must not hand out a strategy registered under a different family.
pub trait StrategyResolver: Send + Sync {
    fn resolve<F: Family>(&self, key: &StrategyKey) -> Option<Arc<dyn Strategy<F>>>;
}

impl<R: StrategyResolver> StrategyResolver for Arc<R> {
    fn resolve<F: Family>(&self, key: &StrategyKey) -> Option<Arc<dyn Strategy<F>>> {
        R::resolve::<F>(self, key)
    }
}
