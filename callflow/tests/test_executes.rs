#[cfg(test)]
mod tests {
    use callflow::{AsyncCall, CallState};

    #[tokio::test]
    async fn test_execute() {
        let call = AsyncCall::bind(|n: u64| async move { n * 2 }).with_label("double");
        let controller = call.mount(5);
        assert_eq!(controller.await_settled().await, CallState::resolved(10));

        controller.execute();
        assert!(controller.await_snapshot().await.unwrap().is_running());
        assert_eq!(controller.await_settled().await, CallState::resolved(10));
    }

    #[tokio::test]
    async fn test_execute_reports_failure_in_band() {
        let call = AsyncCall::bind(|n: u64| async move {
            if n > 100 {
                Err(format!("{n} is out of range"))
            } else {
                Ok(n)
            }
        });

        let controller = call.mount(101);
        let rejected = controller.await_settled().await;
        assert!(rejected.is_rejected());

        controller.set_params(3);
        assert!(controller.await_snapshot().await.unwrap().is_running());
        assert_eq!(controller.await_settled().await, CallState::resolved(3));
    }
}
