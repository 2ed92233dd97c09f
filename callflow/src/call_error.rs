use thiserror::Error;

/// The reason a call was rejected.
///
/// Operation failures are modeled in-band: they are captured here and
/// published through the normal snapshot, never thrown. Callers decide
/// whether to retry by triggering `execute` again.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CallError {
    /// The operation failed with a message describing what went wrong.
    #[error("{0}")]
    Failure(String),

    /// The operation produced no value where one was expected.
    #[error("operation produced no value")]
    Empty,
}

impl CallError {
    /// Builds a [`CallError::Failure`] from anything message-like.
    pub fn failure(message: impl Into<String>) -> Self {
        CallError::Failure(message.into())
    }

    /// Returns true if this is a failure carrying a message.
    pub fn is_failure(&self) -> bool {
        matches!(self, CallError::Failure(_))
    }

    /// Returns true if the operation produced no value.
    pub fn is_empty(&self) -> bool {
        matches!(self, CallError::Empty)
    }
}
