use std::time::Duration;

use callflow::readers::{Executor, State};
use callflow::AsyncCall;
use futures_signals::signal::SignalExt;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::tracing_setup::tracing_init;

mod tracing_setup;

#[tokio::main]
async fn main() {
    tracing_init();

    info!("==========================================");
    warn!("A. a lazy mount stays Idle until a trigger fires");

    let call = AsyncCall::bind(|name: String| async move {
        sleep(Duration::from_millis(80)).await;
        format!("hello, {name}")
    })
    .with_label("greet");

    let controller = call.mount_lazy("world".to_string());
    sleep(Duration::from_millis(50)).await;
    info!("  Main thread | snapshot: {:?}", controller.snapshot());

    info!("==========================================");
    warn!("B. descendants hold readers, not the controller itself");

    let channel = controller.channel();
    let executor = Executor::new(&channel);
    let state = State::new(&channel);

    let watcher = tokio::spawn(
        state
            .signal()
            .stop_if(|snapshot| snapshot.is_resolved())
            .for_each(|snapshot| async move {
                info!("Watcher thread | snapshot: {:?}", snapshot);
            }),
    );
    executor.execute();
    watcher.await.unwrap();

    info!("==========================================");
    warn!("C. params set while lazy are picked up by the next trigger");

    controller.set_params("callflow".to_string());
    sleep(Duration::from_millis(50)).await;
    info!(
        "  Main thread | snapshot after new params: {:?}",
        controller.snapshot()
    );

    executor.execute();
    controller
        .to_signal()
        .stop_if(|snapshot| {
            snapshot
                .result()
                .is_some_and(|greeting| greeting.contains("callflow"))
        })
        .for_each(|snapshot| async move {
            info!("  Main thread | snapshot: {:?}", snapshot);
        })
        .await;

    info!("  Main thread | Finish");
}
