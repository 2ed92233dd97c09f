use crate::{AsyncCall, CallError, CallOutcome, CallState};

#[test]
fn test_bare_value_resolves() {
    assert_eq!(7_u64.into_state(), CallState::resolved(7));
    assert_eq!(
        "done".to_string().into_state(),
        CallState::resolved("done".to_string())
    );
}

#[test]
fn test_result_maps_into_state() {
    let ok: Result<u64, String> = Ok(3);
    assert_eq!(ok.into_state(), CallState::resolved(3));

    let err: Result<u64, String> = Err("boom".to_string());
    assert_eq!(
        err.into_state(),
        CallState::<u64>::rejected(CallError::failure("boom"))
    );
}

#[test]
fn test_option_maps_into_state() {
    assert_eq!(Some(5_u64).into_state(), CallState::resolved(5));
    assert_eq!(
        None::<u64>.into_state(),
        CallState::<u64>::rejected(CallError::Empty)
    );
}

#[tokio::test]
async fn test_option_operation_rejects_on_none() {
    let call = AsyncCall::bind(|n: u64| async move { (n % 2 == 0).then_some(n) });

    let controller = call.mount(4);
    assert_eq!(controller.await_settled().await, CallState::resolved(4));

    controller.set_params(5);
    assert!(controller.await_snapshot().await.unwrap().is_running());
    let rejected = controller.await_settled().await;
    assert!(rejected
        .reject_reason()
        .is_some_and(CallError::is_empty));
}
