use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::StreamExt;
use futures_signals::signal::SignalExt;

use crate::readers::{Completed, Executor, Rejected, Resolved, Running, State};
use crate::unit_tests::{counting_echo, echo};
use crate::{AsyncCall, CallError, CallState, CallStreamExt};

#[test]
fn test_projections() {
    let running: CallState<u64> = CallState::Running;
    let resolved = CallState::resolved(3_u64);
    let rejected: CallState<u64> = CallState::rejected(CallError::failure("boom"));

    assert!(Running::project(&running));
    assert!(!Running::project(&resolved));

    assert_eq!(Resolved::project(&resolved), Some(&3));
    assert_eq!(Resolved::project(&running), None);
    assert_eq!(Resolved::project(&rejected), None);

    assert_eq!(
        Rejected::project(&rejected),
        Some(&CallError::failure("boom"))
    );
    assert_eq!(Rejected::project(&resolved), None);

    assert!(Completed::project(&resolved));
    assert!(Completed::project(&rejected));
    assert!(!Completed::project(&running));
}

#[tokio::test]
async fn test_resolved_signal() {
    let controller = echo().mount(3);
    let reader = Resolved::new(&controller.channel());

    let values: Vec<_> = reader
        .signal()
        .to_stream()
        .finish_on(|value: &Option<u64>| value.is_some())
        .collect()
        .await;

    assert_eq!(values.first(), Some(&None));
    assert_eq!(values.last(), Some(&Some(3)));
}

#[tokio::test]
async fn test_rejected_signal() {
    let call: AsyncCall<u64, u64> = AsyncCall::bind(|_: u64| async move { Err::<u64, _>("boom") });
    let controller = call.mount(1);
    let reader = Rejected::new(&controller.channel());

    let values: Vec<_> = reader
        .signal()
        .to_stream()
        .finish_on(|value: &Option<CallError>| value.is_some())
        .collect()
        .await;

    assert_eq!(values.last(), Some(&Some(CallError::failure("boom"))));
}

#[tokio::test]
async fn test_completed_signal() {
    let controller = echo().mount(9);
    let reader = Completed::new(&controller.channel());

    let flags: Vec<_> = reader
        .signal()
        .to_stream()
        .finish_on(|completed: &bool| *completed)
        .collect()
        .await;

    assert_eq!(flags, vec![false, true]);
}

#[tokio::test]
async fn test_executor_reader_triggers_owner() {
    let calls = Arc::new(AtomicUsize::new(0));
    let controller = counting_echo(calls.clone()).mount_lazy(4);
    let executor = Executor::new(&controller.channel());

    executor.execute();
    assert_eq!(controller.await_settled().await, CallState::resolved(4));

    executor.handle().execute();
    assert_eq!(controller.await_settled().await, CallState::resolved(4));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_state_reader_exposes_full_snapshot() {
    let controller = echo().mount(2);
    let reader = State::new(&controller.channel());

    let states: Vec<_> = reader.signal().to_stream().until_settled().collect().await;
    assert_eq!(states.last(), Some(&CallState::resolved(2)));
    assert_eq!(reader.snapshot(), CallState::resolved(2));
}
