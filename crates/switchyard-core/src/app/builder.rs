//! RegistryBuilder - startup wiring for strategies.
//!
//! Registration happens once, before the first dispatch. The builder collects
//! strategies, records which keys the host expects to exist, and refuses to
//! build when any of them is missing, so a typo'd registration fails at
//! startup instead of as `StrategyNotFound` on the first request.

use std::any::TypeId;
use std::sync::Arc;

use crate::domain::Family;
use crate::typed::{DuplicatePolicy, RegistryError, Strategy, StrategyRegistry};

use super::dispatcher::Dispatcher;

/// RegistryBuilder assembles a frozen [`StrategyRegistry`].
///
/// # Example
/// ```ignore
/// let dispatcher = RegistryBuilder::new()
///     .register::<Arithmetic, _>("Add", Add)?
///     .register::<Arithmetic, _>("Sub", Sub)?
///     .expect_keys::<Arithmetic>(&["Add", "Sub"])
///     .build_dispatcher()?;
/// ```
pub struct RegistryBuilder {
    registry: StrategyRegistry,
    expected: Vec<Expectation>,
}

struct Expectation {
    family: &'static str,
    type_id: TypeId,
    keys: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("missing strategies for family={family}: {keys:?}")]
    MissingKeys {
        family: &'static str,
        keys: Vec<String>,
    },
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            registry: StrategyRegistry::new(),
            expected: Vec::new(),
        }
    }

    /// Applies to registrations made after this call.
    pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.registry.set_policy(policy);
        self
    }

    pub fn register<F, S>(mut self, key: impl Into<String>, strategy: S) -> Result<Self, RegistryError>
    where
        F: Family,
        S: Strategy<F> + 'static,
    {
        self.registry.register::<F, S>(key, strategy)?;
        Ok(self)
    }

    pub fn register_shared<F: Family>(
        mut self,
        key: impl Into<String>,
        strategy: Arc<dyn Strategy<F>>,
    ) -> Result<Self, RegistryError> {
        self.registry.register_shared::<F>(key, strategy)?;
        Ok(self)
    }

    /// Declare keys of family `F` that must be registered by `build()`.
    ///
    /// Repeated calls accumulate.
    pub fn expect_keys<F: Family>(mut self, keys: &[&str]) -> Self {
        self.expected.push(Expectation {
            family: F::NAME,
            type_id: TypeId::of::<F>(),
            keys: keys.iter().map(|key| key.to_string()).collect(),
        });
        self
    }

    /// Check expectations and hand out the registry.
    ///
    /// The first family with missing keys is reported, listing all of its
    /// missing keys.
    pub fn build(self) -> Result<StrategyRegistry, BuildError> {
        for expectation in &self.expected {
            let missing: Vec<String> = expectation
                .keys
                .iter()
                .filter(|key| !self.registry.contains_erased(expectation.type_id, key))
                .cloned()
                .collect();
            if !missing.is_empty() {
                return Err(BuildError::MissingKeys {
                    family: expectation.family,
                    keys: missing,
                });
            }
        }

        tracing::debug!(
            strategies = self.registry.len(),
            families = ?self.registry.families(),
            "strategy registry built"
        );
        Ok(self.registry)
    }

    pub fn build_dispatcher(self) -> Result<Dispatcher, BuildError> {
        Ok(Dispatcher::new(Arc::new(self.build()?)))
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
