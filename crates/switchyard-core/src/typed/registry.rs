//! StrategyRegistry - keyed strategies partitioned by family.
//!
//! Each family gets its own table, found through the family marker's `TypeId`.
//! A table is type-erased to `dyn Any` for storage and downcast back to
//! `HashMap<StrategyKey, Arc<dyn Strategy<F>>>` on lookup, so a key can only
//! ever resolve to a strategy of the family it was registered under.
//!
//! The registry is mutable while it is being built and read-only afterwards;
//! share it behind `Arc` and it needs no locking.

use std::any::{Any, TypeId};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::domain::{Family, KeyError, StrategyKey};
use crate::ports::StrategyResolver;

use super::strategy::Strategy;

type Table<F> = HashMap<StrategyKey, Arc<dyn Strategy<F>>>;

/// What to do when a key is registered twice in the same family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Fail with [`RegistryError::AlreadyRegistered`].
    #[default]
    Reject,
    /// Keep the newest registration.
    Replace,
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("invalid strategy key {key:?} for family={family}")]
    InvalidKey {
        family: &'static str,
        key: String,
        #[source]
        source: KeyError,
    },

    #[error("strategy already registered: family={family} key={key}")]
    AlreadyRegistered { family: &'static str, key: StrategyKey },
}

struct FamilySlot {
    name: &'static str,
    table: Box<dyn Any + Send + Sync>,
    // Key index readable without knowing `F`.
    keys: BTreeSet<StrategyKey>,
}

impl FamilySlot {
    fn new<F: Family>() -> Self {
        Self {
            name: F::NAME,
            table: Box::new(Table::<F>::new()),
            keys: BTreeSet::new(),
        }
    }

    fn table<F: Family>(&self) -> Option<&Table<F>> {
        self.table.downcast_ref::<Table<F>>()
    }

    fn table_mut<F: Family>(&mut self) -> Option<&mut Table<F>> {
        self.table.downcast_mut::<Table<F>>()
    }
}

/// StrategyRegistry maps (family, key) to a shared strategy instance.
///
/// # Example
/// ```ignore
/// let mut registry = StrategyRegistry::new();
/// registry.register::<Arithmetic, _>("Add", Add)?;
/// registry.register::<Arithmetic, _>("Sub", Sub)?;
///
/// let add = registry.resolve::<Arithmetic>("Add").unwrap();
/// ```
#[derive(Default)]
pub struct StrategyRegistry {
    families: HashMap<TypeId, FamilySlot>,
    policy: DuplicatePolicy,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            families: HashMap::new(),
            policy,
        }
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: DuplicatePolicy) {
        self.policy = policy;
    }

    /// Register `strategy` under `key` in family `F`.
    pub fn register<F, S>(&mut self, key: impl Into<String>, strategy: S) -> Result<(), RegistryError>
    where
        F: Family,
        S: Strategy<F> + 'static,
    {
        self.register_shared::<F>(key, Arc::new(strategy))
    }

    /// Register an already shared strategy, e.g. one instance under several keys.
    pub fn register_shared<F: Family>(
        &mut self,
        key: impl Into<String>,
        strategy: Arc<dyn Strategy<F>>,
    ) -> Result<(), RegistryError> {
        let raw = key.into();
        let key = match StrategyKey::parse(raw.as_str()) {
            Ok(key) => key,
            Err(source) => {
                return Err(RegistryError::InvalidKey {
                    family: F::NAME,
                    key: raw,
                    source,
                });
            }
        };

        let policy = self.policy;
        let slot = self
            .families
            .entry(TypeId::of::<F>())
            .or_insert_with(FamilySlot::new::<F>);
        // Slots are keyed by `TypeId::of::<F>()` and only ever created by
        // `FamilySlot::new::<F>`, so the table is always `Table<F>`.
        let Some(table) = slot.table_mut::<F>() else {
            unreachable!("family slot for {} holds a foreign table", F::NAME);
        };

        if table.contains_key(&key) {
            match policy {
                DuplicatePolicy::Reject => {
                    return Err(RegistryError::AlreadyRegistered { family: F::NAME, key });
                }
                DuplicatePolicy::Replace => {
                    tracing::warn!(family = F::NAME, %key, "replacing registered strategy");
                }
            }
        } else {
            tracing::debug!(family = F::NAME, %key, "registered strategy");
        }
        table.insert(key.clone(), strategy);
        slot.keys.insert(key);
        Ok(())
    }

    /// Look up the strategy registered under `key` in family `F`.
    ///
    /// Never mutates the registry. Keys that could not have been registered
    /// (empty, blank) simply resolve to `None`.
    pub fn resolve<F: Family>(&self, key: &str) -> Option<Arc<dyn Strategy<F>>> {
        self.table::<F>()?.get(key).cloned()
    }

    pub fn contains<F: Family>(&self, key: &str) -> bool {
        self.table::<F>().is_some_and(|table| table.contains_key(key))
    }

    /// Registered keys of family `F`, sorted.
    pub fn keys<F: Family>(&self) -> Vec<StrategyKey> {
        self.families
            .get(&TypeId::of::<F>())
            .map(|slot| slot.keys.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Names of families that have at least one strategy, sorted.
    pub fn families(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.families.values().map(|slot| slot.name).collect();
        names.sort_unstable();
        names
    }

    /// Total number of strategies across all families.
    pub fn len(&self) -> usize {
        self.families.values().map(|slot| slot.keys.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn contains_erased(&self, family: TypeId, key: &str) -> bool {
        self.families
            .get(&family)
            .is_some_and(|slot| slot.keys.contains(key))
    }

    fn table<F: Family>(&self) -> Option<&Table<F>> {
        self.families.get(&TypeId::of::<F>())?.table::<F>()
    }
}

impl StrategyResolver for StrategyRegistry {
    fn resolve<F: Family>(&self, key: &StrategyKey) -> Option<Arc<dyn Strategy<F>>> {
        StrategyRegistry::resolve::<F>(self, key.as_str())
    }
}
