//! Errors - dispatch failures and their classification.

use super::key::KeyError;

/// ErrorKind is the coarse classification of a failed dispatch.
///
/// None of these is fatal; every kind is returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Key or input was unusable. Retrying the same call cannot succeed.
    InvalidArgument,
    /// No strategy is registered under the key in the requested family.
    StrategyNotFound,
    /// The strategy itself failed.
    ImplementationFailure,
    /// The caller cancelled the call while the strategy was running.
    Cancelled,
}

/// ArgumentError explains an `InvalidArgument` rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    #[error(transparent)]
    Key(#[from] KeyError),

    #[error("input is missing")]
    MissingInput,
}

/// DispatchError is returned by every `Dispatcher` entry point.
///
/// `E` is the family's own error type. `Implementation` wraps it transparently
/// so its message and source chain reach the caller unchanged.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError<E> {
    #[error("invalid argument: {0}")]
    InvalidArgument(ArgumentError),

    #[error("strategy not found: family={family} key={key}")]
    StrategyNotFound { family: &'static str, key: String },

    #[error("dispatch cancelled: family={family} key={key}")]
    Cancelled { family: &'static str, key: String },

    #[error(transparent)]
    Implementation(E),
}

impl<E> DispatchError<E> {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            DispatchError::StrategyNotFound { .. } => ErrorKind::StrategyNotFound,
            DispatchError::Cancelled { .. } => ErrorKind::Cancelled,
            DispatchError::Implementation(_) => ErrorKind::ImplementationFailure,
        }
    }

    /// The strategy's own error, if that is what failed.
    pub fn into_implementation(self) -> Option<E> {
        match self {
            DispatchError::Implementation(err) => Some(err),
            _ => None,
        }
    }
}

impl<E> From<ArgumentError> for DispatchError<E> {
    fn from(err: ArgumentError) -> Self {
        DispatchError::InvalidArgument(err)
    }
}

impl<E> From<KeyError> for DispatchError<E> {
    fn from(err: KeyError) -> Self {
        DispatchError::InvalidArgument(ArgumentError::Key(err))
    }
}
