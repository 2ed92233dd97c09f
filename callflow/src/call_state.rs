use crate::CallError;

/// Lifecycle of a single bound async call.
///
/// Exactly one variant is observable at any instant: `Idle` before a lazy
/// controller is first triggered, `Running` while an invocation is
/// outstanding, `Resolved`/`Rejected` once the latest invocation has settled.
/// Starting a new invocation replaces any settled value with `Running`, so a
/// prior result or reject reason is never visible alongside a newer run.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CallState<T: Clone> {
    Idle,
    Running,
    Resolved(T),
    Rejected(CallError),
}

impl<T: Clone> CallState<T> {
    pub fn resolved(value: T) -> Self {
        CallState::Resolved(value)
    }

    pub fn rejected(error: CallError) -> Self {
        CallState::Rejected(error)
    }

    pub fn rejected_with_message(message: impl Into<String>) -> Self {
        CallState::Rejected(CallError::failure(message))
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, CallState::Idle)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, CallState::Running)
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, CallState::Resolved(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, CallState::Rejected(_))
    }

    /// True once the latest invocation has settled, either way.
    pub fn is_completed(&self) -> bool {
        matches!(self, CallState::Resolved(_) | CallState::Rejected(_))
    }

    pub fn result(&self) -> Option<&T> {
        match self {
            CallState::Resolved(value) => Some(value),
            _ => None,
        }
    }

    pub fn reject_reason(&self) -> Option<&CallError> {
        match self {
            CallState::Rejected(error) => Some(error),
            _ => None,
        }
    }

    pub fn into_result(self) -> Option<T> {
        match self {
            CallState::Resolved(value) => Some(value),
            _ => None,
        }
    }
}

impl<T: Clone> Default for CallState<T> {
    fn default() -> Self {
        CallState::Idle
    }
}

impl<T: Clone> From<&CallState<T>> for Option<T> {
    fn from(state: &CallState<T>) -> Self {
        state.result().cloned()
    }
}
