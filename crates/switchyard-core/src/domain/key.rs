//! StrategyKey - validated lookup key for a strategy within a family.
//!
//! Keys are case-sensitive and compared byte-for-byte. The only format rule is
//! that a key must contain at least one non-whitespace character.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a string was rejected as a [`StrategyKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("strategy key is empty")]
    Empty,

    #[error("strategy key contains only whitespace")]
    Blank,
}

/// StrategyKey identifies one implementation inside a capability family.
///
/// # Example
/// ```ignore
/// let key = StrategyKey::parse("Add")?;
/// assert_eq!(key.as_str(), "Add");
/// assert!(StrategyKey::parse("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StrategyKey(String);

impl StrategyKey {
    /// Validate `value` and wrap it.
    pub fn parse(value: impl Into<String>) -> Result<Self, KeyError> {
        let value = value.into();
        Self::validate(&value)?;
        Ok(Self(value))
    }

    /// Check a raw key without allocating.
    pub fn validate(value: &str) -> Result<(), KeyError> {
        if value.is_empty() {
            return Err(KeyError::Empty);
        }
        if value.trim().is_empty() {
            return Err(KeyError::Blank);
        }
        Ok(())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StrategyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Lets `HashMap<StrategyKey, _>` be queried with a plain `&str`.
impl Borrow<str> for StrategyKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for StrategyKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StrategyKey {
    type Error = KeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for StrategyKey {
    type Error = KeyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<StrategyKey> for String {
    fn from(key: StrategyKey) -> Self {
        key.0
    }
}
