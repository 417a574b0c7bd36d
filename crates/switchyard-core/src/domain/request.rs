//! ExecutionRequest - one dispatch call's key and input.

use serde::{Deserialize, Serialize};

/// A key paired with an optional input value.
///
/// Requests usually arrive from outside the process (JSON, CLI flags), where
/// the input may be missing. `Dispatcher::dispatch` rejects a request with no
/// input as an invalid argument before looking anything up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRequest<In> {
    pub key: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<In>,
}

impl<In> ExecutionRequest<In> {
    pub fn new(key: impl Into<String>, input: In) -> Self {
        Self {
            key: key.into(),
            input: Some(input),
        }
    }

    pub fn without_input(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            input: None,
        }
    }
}
