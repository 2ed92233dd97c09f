use std::fmt;
use std::sync::Arc;

use futures_signals::signal::{MutableSignalCloned, ReadOnlyMutable, SignalExt, SignalStream};
use tokio::sync::mpsc::UnboundedSender;

use crate::CallState;

/// Opaque identity of one mounted controller instance.
///
/// Compared by pointer, so two tokens are equal only if they were cloned from
/// the same mount. There is no process-wide counter behind this.
#[derive(Clone)]
pub struct InstanceId(Arc<()>);

impl InstanceId {
    pub(crate) fn new() -> Self {
        InstanceId(Arc::new(()))
    }
}

impl PartialEq for InstanceId {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for InstanceId {}

impl fmt::Debug for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstanceId({:p})", Arc::as_ptr(&self.0))
    }
}

/// Re-invokes the bound operation with the controller's current parameters.
///
/// One trigger is created per mounted controller; clones share it, so the
/// handle keeps a stable identity for the controller's whole lifetime and can
/// be stored as an event-handler reference. Triggering after the controller
/// has been torn down is a no-op.
#[derive(Clone)]
pub struct ExecuteHandle {
    trigger: Arc<dyn Fn() + Send + Sync>,
}

impl ExecuteHandle {
    pub(crate) fn new(trigger: Arc<dyn Fn() + Send + Sync>) -> Self {
        ExecuteHandle { trigger }
    }

    pub fn execute(&self) {
        (self.trigger)();
    }
}

impl fmt::Debug for ExecuteHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ExecuteHandle")
    }
}

/// Instance-scoped fan-out of one controller's [`CallState`].
///
/// A channel is a cloneable read-side handle: any number of holders, at any
/// depth, observe the latest snapshot and wake when it changes. Consumers
/// never write back; the only routes into the controller are the exposed
/// triggers.
#[derive(Clone)]
pub struct CallChannel<T: Clone> {
    state: ReadOnlyMutable<CallState<T>>,
    execute: ExecuteHandle,
    attach: Arc<dyn Fn(UnboundedSender<T>) + Send + Sync>,
    id: InstanceId,
    label: Option<Arc<str>>,
}

impl<T: Clone> CallChannel<T> {
    pub(crate) fn new(
        state: ReadOnlyMutable<CallState<T>>,
        execute: ExecuteHandle,
        attach: Arc<dyn Fn(UnboundedSender<T>) + Send + Sync>,
        id: InstanceId,
        label: Option<Arc<str>>,
    ) -> Self {
        CallChannel {
            state,
            execute,
            attach,
            id,
            label,
        }
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> CallState<T> {
        self.state.get_cloned()
    }

    pub fn to_signal(&self) -> MutableSignalCloned<CallState<T>> {
        self.state.signal_cloned()
    }

    pub fn to_stream(&self) -> SignalStream<MutableSignalCloned<CallState<T>>> {
        self.to_signal().to_stream()
    }

    /// Re-invokes the bound operation with the controller's current params.
    pub fn execute(&self) {
        self.execute.execute();
    }

    pub fn execute_handle(&self) -> ExecuteHandle {
        self.execute.clone()
    }

    /// Registers a sink that receives every resolution published after this
    /// point. Used by result stores; closed sinks are pruned by the owner.
    pub(crate) fn attach_sink(&self, sink: UnboundedSender<T>) {
        (self.attach)(sink);
    }

    pub fn id(&self) -> &InstanceId {
        &self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl<T: Clone> fmt::Debug for CallChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallChannel")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
