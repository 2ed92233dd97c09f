use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use futures_core::Stream;
use futures_signals::signal::{Mutable, MutableSignalCloned, SignalExt, SignalStream};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{CallChannel, CallOutcome, CallParams, CallState, ExecuteHandle, InstanceId};

type BoxedOp<P, T> =
    Arc<dyn Fn(P) -> Pin<Box<dyn Future<Output = CallState<T>> + Send>> + Send + Sync>;

/// A bound async operation, from which independent controllers are mounted.
///
/// Binding happens once; each [`mount`](AsyncCall::mount) produces a fully
/// independent [`CallController`] with its own state, channel, and identity.
pub struct AsyncCall<P, T: Clone> {
    op: BoxedOp<P, T>,
    label: Option<Arc<str>>,
}

impl<P, T> AsyncCall<P, T>
where
    P: CallParams,
    T: Clone + Send + Sync + 'static,
{
    /// Binds an async operation.
    ///
    /// The operation maps a parameter value to a future; whatever the future
    /// yields is folded into a settled [`CallState`] through [`CallOutcome`],
    /// so plain values, `Result`s, and `Option`s all work.
    pub fn bind<F, Fut, R>(op: F) -> Self
    where
        F: Fn(P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: CallOutcome<T> + Send + 'static,
    {
        let op: BoxedOp<P, T> = Arc::new(move |params| {
            let fut = op(params);
            Box::pin(async move { fut.await.into_state() })
        });
        AsyncCall { op, label: None }
    }

    /// Attaches a display label, surfaced in `Debug` output and log events.
    pub fn with_label(mut self, label: impl Into<Arc<str>>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Mounts a controller and immediately invokes the operation with
    /// `params`. The first observable snapshot is `Running`.
    pub fn mount(&self, params: P) -> CallController<P, T> {
        self.mount_inner(params, false)
    }

    /// Mounts a controller without invoking; the snapshot stays `Idle` until
    /// `execute` is triggered. Parameter changes do not invoke either.
    pub fn mount_lazy(&self, params: P) -> CallController<P, T> {
        self.mount_inner(params, true)
    }

    fn mount_inner(&self, params: P, lazy: bool) -> CallController<P, T> {
        let id = InstanceId::new();
        let label = self.label.clone();
        let state = Mutable::new(CallState::Idle);
        let (cmd_tx, cmd_rx) = tokio::sync::mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();

        let execute = {
            let tx = cmd_tx.clone();
            ExecuteHandle::new(Arc::new(move || {
                let _ = tx.send(Command::Execute);
            }))
        };
        let attach = {
            let tx = cmd_tx.clone();
            Arc::new(move |sink: UnboundedSender<T>| {
                let _ = tx.send(Command::Attach(sink));
            })
        };

        let mut worker = Worker {
            op: self.op.clone(),
            state: state.clone(),
            cmd_tx: cmd_tx.clone(),
            params,
            lazy,
            latest_seq: 0,
            sinks: Vec::new(),
            label: label.clone(),
        };
        if !lazy {
            worker.invoke();
        }
        tokio::spawn(worker.run(cmd_rx, shutdown.clone()));

        CallController {
            state,
            cmd_tx,
            execute,
            attach,
            shutdown,
            id,
            label,
        }
    }
}

enum Command<P, T: Clone> {
    SetParams(P),
    Execute,
    Settle { seq: u64, state: CallState<T> },
    Attach(UnboundedSender<T>),
    Inspect(Box<dyn FnOnce(CallState<T>) + Send>),
}

/// Owns the lifecycle state machine of one mounted async binding.
///
/// The controller is the snapshot's single writer: mount, parameter changes,
/// manual triggers, and settlements are serialized through one worker task,
/// so snapshots are observed in trigger order. Dropping the controller tears
/// the worker down and discards any settlement still in flight.
pub struct CallController<P, T>
where
    P: CallParams,
    T: Clone + Send + Sync + 'static,
{
    state: Mutable<CallState<T>>,
    cmd_tx: UnboundedSender<Command<P, T>>,
    execute: ExecuteHandle,
    attach: Arc<dyn Fn(UnboundedSender<T>) + Send + Sync>,
    shutdown: CancellationToken,
    id: InstanceId,
    label: Option<Arc<str>>,
}

impl<P, T> CallController<P, T>
where
    P: CallParams,
    T: Clone + Send + Sync + 'static,
{
    /// Supplies a new parameter value.
    ///
    /// The value always becomes the controller's current params. It triggers
    /// a re-invocation only when it is not shallow-equal to the previous
    /// value and the controller is not lazy.
    pub fn set_params(&self, params: P) {
        let _ = self.cmd_tx.send(Command::SetParams(params));
    }

    /// Re-invokes the bound operation with the current params, regardless of
    /// laziness or parameter equality.
    pub fn execute(&self) {
        self.execute.execute();
    }

    pub fn execute_handle(&self) -> ExecuteHandle {
        self.execute.clone()
    }

    /// Read-side handle for descendant readers and result stores.
    pub fn channel(&self) -> CallChannel<T> {
        CallChannel::new(
            self.state.read_only(),
            self.execute.clone(),
            self.attach.clone(),
            self.id.clone(),
            self.label.clone(),
        )
    }

    pub fn snapshot(&self) -> CallState<T> {
        self.state.get_cloned()
    }

    pub fn to_signal(&self) -> MutableSignalCloned<CallState<T>> {
        self.state.signal_cloned()
    }

    pub fn to_stream(&self) -> SignalStream<MutableSignalCloned<CallState<T>>> {
        self.to_signal().to_stream()
    }

    /// Observes the snapshot after every previously queued command has been
    /// applied. Errs only if the controller was torn down.
    pub async fn await_snapshot(&self) -> Result<CallState<T>, RecvError> {
        let (tx, rx) = tokio::sync::oneshot::channel();
        let _ = self.cmd_tx.send(Command::Inspect(Box::new(move |state| {
            let _ = tx.send(state);
        })));
        rx.await
    }

    /// Waits until the latest invocation settles and returns that snapshot.
    /// Returns immediately if the current snapshot is already settled.
    pub async fn await_settled(&self) -> CallState<T> {
        let mut stream = self.state.signal_cloned().to_stream();
        loop {
            let next = std::future::poll_fn(|cx| Pin::new(&mut stream).poll_next(cx)).await;
            match next {
                Some(state) if state.is_completed() => return state,
                Some(_) => {}
                None => return self.state.get_cloned(),
            }
        }
    }

    pub fn id(&self) -> &InstanceId {
        &self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl<P, T> Drop for CallController<P, T>
where
    P: CallParams,
    T: Clone + Send + Sync + 'static,
{
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

impl<P, T> std::fmt::Debug for CallController<P, T>
where
    P: CallParams,
    T: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallController")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

struct Worker<P, T>
where
    P: CallParams,
    T: Clone + Send + Sync + 'static,
{
    op: BoxedOp<P, T>,
    state: Mutable<CallState<T>>,
    cmd_tx: UnboundedSender<Command<P, T>>,
    params: P,
    lazy: bool,
    latest_seq: u64,
    sinks: Vec<UnboundedSender<T>>,
    label: Option<Arc<str>>,
}

impl<P, T> Worker<P, T>
where
    P: CallParams,
    T: Clone + Send + Sync + 'static,
{
    async fn run(
        mut self,
        mut cmd_rx: UnboundedReceiver<Command<P, T>>,
        shutdown: CancellationToken,
    ) {
        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                cmd = cmd_rx.recv() => match cmd {
                    Some(cmd) => self.handle(cmd),
                    None => break,
                },
            }
        }
    }

    fn handle(&mut self, cmd: Command<P, T>) {
        match cmd {
            Command::SetParams(params) => {
                let changed = !params.shallow_eq(&self.params);
                self.params = params;
                if changed && !self.lazy {
                    self.invoke();
                }
            }
            Command::Execute => self.invoke(),
            Command::Settle { seq, state } => self.settle(seq, state),
            Command::Attach(sink) => self.sinks.push(sink),
            Command::Inspect(inspect) => inspect(self.state.get_cloned()),
        }
    }

    fn invoke(&mut self) {
        self.latest_seq += 1;
        let seq = self.latest_seq;
        debug!(
            label = self.label.as_deref().unwrap_or(""),
            seq, "invoking bound operation"
        );
        self.state.set(CallState::Running);
        let fut = (self.op)(self.params.clone());
        let cmd_tx = self.cmd_tx.clone();
        tokio::spawn(async move {
            let state = fut.await;
            let _ = cmd_tx.send(Command::Settle { seq, state });
        });
    }

    fn settle(&mut self, seq: u64, state: CallState<T>) {
        if seq != self.latest_seq {
            debug!(
                label = self.label.as_deref().unwrap_or(""),
                seq,
                latest = self.latest_seq,
                "discarding stale settlement"
            );
            return;
        }
        if let CallState::Resolved(value) = &state {
            self.sinks.retain(|sink| sink.send(value.clone()).is_ok());
        }
        self.state.set(state);
    }
}
