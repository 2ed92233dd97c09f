//! Projections over a [`CallChannel`], one per lifecycle condition.
//!
//! Each reader pairs a pure `project` over a snapshot with a live `signal`
//! over the channel. The closed set mirrors the conditional-render family:
//! consumers render their content when the projection is `true`/`Some`, and
//! nothing otherwise.

use futures_signals::signal::{Signal, SignalExt};

use crate::{CallChannel, CallError, CallState, ExecuteHandle};

/// Active while an invocation is outstanding.
#[derive(Clone)]
pub struct Running<T: Clone> {
    channel: CallChannel<T>,
}

impl<T: Clone + Send + Sync + 'static> Running<T> {
    pub fn new(channel: &CallChannel<T>) -> Self {
        Running {
            channel: channel.clone(),
        }
    }

    pub fn project(state: &CallState<T>) -> bool {
        state.is_running()
    }

    pub fn signal(&self) -> impl Signal<Item = bool> {
        self.channel.to_signal().map(|state| Self::project(&state))
    }
}

/// Active once the latest invocation resolved, carrying the result.
#[derive(Clone)]
pub struct Resolved<T: Clone> {
    channel: CallChannel<T>,
}

impl<T: Clone + Send + Sync + 'static> Resolved<T> {
    pub fn new(channel: &CallChannel<T>) -> Self {
        Resolved {
            channel: channel.clone(),
        }
    }

    pub fn project(state: &CallState<T>) -> Option<&T> {
        state.result()
    }

    pub fn signal(&self) -> impl Signal<Item = Option<T>> {
        self.channel.to_signal().map(CallState::into_result)
    }
}

/// Active once the latest invocation was rejected, carrying the reason.
#[derive(Clone)]
pub struct Rejected<T: Clone> {
    channel: CallChannel<T>,
}

impl<T: Clone + Send + Sync + 'static> Rejected<T> {
    pub fn new(channel: &CallChannel<T>) -> Self {
        Rejected {
            channel: channel.clone(),
        }
    }

    pub fn project(state: &CallState<T>) -> Option<&CallError> {
        state.reject_reason()
    }

    pub fn signal(&self) -> impl Signal<Item = Option<CallError>> {
        self.channel
            .to_signal()
            .map(|state| state.reject_reason().cloned())
    }
}

/// Active once the latest invocation settled, either way.
#[derive(Clone)]
pub struct Completed<T: Clone> {
    channel: CallChannel<T>,
}

impl<T: Clone + Send + Sync + 'static> Completed<T> {
    pub fn new(channel: &CallChannel<T>) -> Self {
        Completed {
            channel: channel.clone(),
        }
    }

    pub fn project(state: &CallState<T>) -> bool {
        state.is_completed()
    }

    pub fn signal(&self) -> impl Signal<Item = bool> {
        self.channel.to_signal().map(|state| Self::project(&state))
    }
}

/// Always active; exposes only the manual trigger.
#[derive(Clone, Debug)]
pub struct Executor {
    execute: ExecuteHandle,
}

impl Executor {
    pub fn new<T: Clone>(channel: &CallChannel<T>) -> Self {
        Executor {
            execute: channel.execute_handle(),
        }
    }

    pub fn handle(&self) -> ExecuteHandle {
        self.execute.clone()
    }

    pub fn execute(&self) {
        self.execute.execute();
    }
}

/// Always active; exposes the full snapshot.
#[derive(Clone)]
pub struct State<T: Clone> {
    channel: CallChannel<T>,
}

impl<T: Clone + Send + Sync + 'static> State<T> {
    pub fn new(channel: &CallChannel<T>) -> Self {
        State {
            channel: channel.clone(),
        }
    }

    pub fn snapshot(&self) -> CallState<T> {
        self.channel.snapshot()
    }

    pub fn signal(&self) -> impl Signal<Item = CallState<T>> {
        self.channel.to_signal()
    }
}
