use std::fmt;
use std::sync::Arc;

use futures_signals::signal::{
    Mutable, MutableSignalCloned, ReadOnlyMutable, Signal, SignalExt, SignalStream,
};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{CallChannel, ExecuteHandle, InstanceId};

/// Value retained by a [`ResultStore`] across successive resolutions.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Retained<T: Clone> {
    Empty,
    Value(T),
}

impl<T: Clone> Retained<T> {
    pub fn has_result(&self) -> bool {
        matches!(self, Retained::Value(_))
    }

    pub fn result(&self) -> Option<&T> {
        match self {
            Retained::Value(value) => Some(value),
            Retained::Empty => None,
        }
    }

    pub fn into_result(self) -> Option<T> {
        match self {
            Retained::Value(value) => Some(value),
            Retained::Empty => None,
        }
    }
}

impl<T: Clone> Default for Retained<T> {
    fn default() -> Self {
        Retained::Empty
    }
}

type ReduceFn<T> = Arc<dyn Fn(&T, &T) -> T + Send + Sync>;

enum StoreCommand {
    Reset { execute: bool },
}

/// Configures and attaches a [`ResultStore`].
pub struct ResultStoreBuilder<T: Clone> {
    reduce: Option<ReduceFn<T>>,
    initial: Option<T>,
}

impl<T: Clone + Send + Sync + 'static> ResultStoreBuilder<T> {
    /// Combining function folding the previous retained value with a new
    /// resolution. Defaults to taking the newer value.
    pub fn reduce(mut self, reduce: impl Fn(&T, &T) -> T + Send + Sync + 'static) -> Self {
        self.reduce = Some(Arc::new(reduce));
        self
    }

    /// Starts the store populated with `value`, and makes `reset` restore it.
    /// Presence alone decides the initial non-empty state.
    pub fn initial_value(mut self, value: T) -> Self {
        self.initial = Some(value);
        self
    }

    /// Legacy inline reset flag.
    #[deprecated(note = "call `reset` on the attached store instead")]
    pub fn reset(self, _reset: bool) -> Self {
        warn!("the inline `reset` flag is deprecated and has no effect; call `reset` on the attached store instead");
        self
    }

    /// Attaches the store to a controller's channel. The store observes every
    /// resolution published from this point on.
    pub fn attach(self, channel: &CallChannel<T>) -> ResultStore<T> {
        ResultStore::attach_with(channel, self)
    }
}

/// Folds successive resolutions of one controller into a retained value.
///
/// The store treats the parent snapshot as a read-only upstream signal: it
/// adopts the first resolution it observes verbatim and reduces every later
/// one into the retained value. It republishes [`Retained`] through its own
/// nested channel for its reader family.
pub struct ResultStore<T: Clone + Send + Sync + 'static> {
    state: Mutable<Retained<T>>,
    reset: ResetHandle,
    execute: ExecuteHandle,
    shutdown: CancellationToken,
    id: InstanceId,
}

impl<T: Clone + Send + Sync + 'static> ResultStore<T> {
    pub fn builder() -> ResultStoreBuilder<T> {
        ResultStoreBuilder {
            reduce: None,
            initial: None,
        }
    }

    /// Attaches a store with default configuration: no initial value, reduce
    /// takes the newer resolution.
    pub fn attach(channel: &CallChannel<T>) -> Self {
        Self::builder().attach(channel)
    }

    fn attach_with(channel: &CallChannel<T>, builder: ResultStoreBuilder<T>) -> Self {
        let reduce = builder
            .reduce
            .unwrap_or_else(|| Arc::new(|_previous: &T, newer: &T| newer.clone()));
        let initial = builder.initial;

        let state = Mutable::new(
            initial
                .clone()
                .map_or(Retained::Empty, Retained::Value),
        );
        let (cmd_tx, cmd_rx) = tokio::sync::mpsc::unbounded_channel();
        let (resolution_tx, resolution_rx) = tokio::sync::mpsc::unbounded_channel();
        channel.attach_sink(resolution_tx);
        let shutdown = CancellationToken::new();

        debug!(parent = ?channel.id(), "attaching result store");
        let worker = StoreWorker {
            state: state.clone(),
            reduce,
            initial,
            execute: channel.execute_handle(),
        };
        tokio::spawn(worker.run(resolution_rx, cmd_rx, shutdown.clone()));

        ResultStore {
            state,
            reset: ResetHandle { tx: cmd_tx },
            execute: channel.execute_handle(),
            shutdown,
            id: InstanceId::new(),
        }
    }

    pub fn snapshot(&self) -> Retained<T> {
        self.state.get_cloned()
    }

    pub fn to_signal(&self) -> MutableSignalCloned<Retained<T>> {
        self.state.signal_cloned()
    }

    pub fn to_stream(&self) -> SignalStream<MutableSignalCloned<Retained<T>>> {
        self.to_signal().to_stream()
    }

    /// Clears the retained value back to the configured initial state and
    /// re-triggers the parent operation.
    pub fn reset(&self) {
        self.reset.reset();
    }

    /// Clears the retained value; re-triggers the parent operation only when
    /// `execute` is true.
    pub fn reset_with(&self, execute: bool) {
        self.reset.reset_with(execute);
    }

    pub fn reset_handle(&self) -> ResetHandle {
        self.reset.clone()
    }

    /// Read-side handle for the store's reader family.
    pub fn channel(&self) -> StoreChannel<T> {
        StoreChannel {
            state: self.state.read_only(),
            reset: self.reset.clone(),
            id: self.id.clone(),
        }
    }

    pub fn id(&self) -> &InstanceId {
        &self.id
    }

    /// The parent controller's trigger, as seen by this store.
    pub fn execute_handle(&self) -> ExecuteHandle {
        self.execute.clone()
    }
}

impl<T: Clone + Send + Sync + 'static> Drop for ResultStore<T> {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

impl<T: Clone + Send + Sync + 'static> fmt::Debug for ResultStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultStore")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Clears a [`ResultStore`] back to its configured initial state.
///
/// Clones share one route into the store, so the handle keeps a stable
/// identity for the store's whole lifetime.
#[derive(Clone)]
pub struct ResetHandle {
    tx: UnboundedSender<StoreCommand>,
}

impl ResetHandle {
    /// Resets and re-triggers the parent operation.
    pub fn reset(&self) {
        self.reset_with(true);
    }

    /// Resets; re-triggers the parent operation only when `execute` is true.
    pub fn reset_with(&self, execute: bool) {
        let _ = self.tx.send(StoreCommand::Reset { execute });
    }
}

impl fmt::Debug for ResetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResetHandle")
    }
}

/// Instance-scoped fan-out of one store's [`Retained`] value.
#[derive(Clone)]
pub struct StoreChannel<T: Clone> {
    state: ReadOnlyMutable<Retained<T>>,
    reset: ResetHandle,
    id: InstanceId,
}

impl<T: Clone> StoreChannel<T> {
    pub fn snapshot(&self) -> Retained<T> {
        self.state.get_cloned()
    }

    pub fn to_signal(&self) -> MutableSignalCloned<Retained<T>> {
        self.state.signal_cloned()
    }

    pub fn to_stream(&self) -> SignalStream<MutableSignalCloned<Retained<T>>> {
        self.to_signal().to_stream()
    }

    pub fn reset_handle(&self) -> ResetHandle {
        self.reset.clone()
    }

    pub fn id(&self) -> &InstanceId {
        &self.id
    }
}

impl<T: Clone> fmt::Debug for StoreChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreChannel")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

struct StoreWorker<T: Clone + Send + Sync + 'static> {
    state: Mutable<Retained<T>>,
    reduce: ReduceFn<T>,
    initial: Option<T>,
    execute: ExecuteHandle,
}

impl<T: Clone + Send + Sync + 'static> StoreWorker<T> {
    async fn run(
        self,
        mut resolutions: UnboundedReceiver<T>,
        mut commands: UnboundedReceiver<StoreCommand>,
        shutdown: CancellationToken,
    ) {
        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                Some(command) = commands.recv() => self.handle(command),
                Some(value) = resolutions.recv() => self.observe(value),
                else => break,
            }
        }
    }

    fn observe(&self, value: T) {
        let next = match self.state.get_cloned() {
            Retained::Empty => Retained::Value(value),
            Retained::Value(previous) => Retained::Value((self.reduce)(&previous, &value)),
        };
        self.state.set(next);
    }

    fn handle(&self, command: StoreCommand) {
        match command {
            StoreCommand::Reset { execute } => {
                self.state.set(
                    self.initial
                        .clone()
                        .map_or(Retained::Empty, Retained::Value),
                );
                if execute {
                    self.execute.execute();
                }
            }
        }
    }
}

/// Active while the store retains a value, carrying that value.
#[derive(Clone)]
pub struct HasResult<T: Clone> {
    channel: StoreChannel<T>,
}

impl<T: Clone + Send + Sync + 'static> HasResult<T> {
    pub fn new(channel: &StoreChannel<T>) -> Self {
        HasResult {
            channel: channel.clone(),
        }
    }

    pub fn project(retained: &Retained<T>) -> Option<&T> {
        retained.result()
    }

    pub fn signal(&self) -> impl Signal<Item = Option<T>> {
        self.channel.to_signal().map(Retained::into_result)
    }
}

/// Always active; exposes only the reset trigger.
#[derive(Clone, Debug)]
pub struct Resetter {
    reset: ResetHandle,
}

impl Resetter {
    pub fn new<T: Clone>(channel: &StoreChannel<T>) -> Self {
        Resetter {
            reset: channel.reset_handle(),
        }
    }

    pub fn handle(&self) -> ResetHandle {
        self.reset.clone()
    }

    pub fn reset(&self) {
        self.reset.reset();
    }

    pub fn reset_with(&self, execute: bool) {
        self.reset.reset_with(execute);
    }
}
