use crate::{CallError, CallState};

/// Conversion from an operation's return value into a settled [`CallState`].
///
/// The bound operation stays opaque to the controller: whatever it returns is
/// folded into the snapshot through this seam.
pub trait CallOutcome<T: Clone> {
    fn into_state(self) -> CallState<T>;
}

impl<T: Clone> CallOutcome<T> for T {
    fn into_state(self) -> CallState<T> {
        CallState::resolved(self)
    }
}

impl<T: Clone, E> CallOutcome<T> for Result<T, E>
where
    E: ToString,
{
    fn into_state(self) -> CallState<T> {
        match self {
            Ok(value) => CallState::resolved(value),
            Err(error) => CallState::rejected(CallError::failure(error.to_string())),
        }
    }
}

impl<T: Clone> CallOutcome<T> for Option<T> {
    fn into_state(self) -> CallState<T> {
        match self {
            Some(value) => CallState::resolved(value),
            None => CallState::rejected(CallError::Empty),
        }
    }
}
