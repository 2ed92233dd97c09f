use std::time::Duration;

use callflow::{AsyncCall, CallState};
use futures_signals::signal::SignalExt;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::tracing_setup::tracing_init;

mod tracing_setup;

async fn fetch_square(n: u64) -> Result<u64, String> {
    sleep(Duration::from_millis(100)).await;
    if n == 13 {
        return Err("unlucky input".to_string());
    }
    Ok(n * n)
}

#[tokio::main]
async fn main() {
    tracing_init();

    info!("==========================================");
    warn!("A. mounting invokes immediately; the snapshot goes Running then Resolved");

    let call = AsyncCall::bind(fetch_square).with_label("square");
    let controller = call.mount(4);

    controller
        .to_signal()
        .stop_if(|state| state.is_completed())
        .for_each(|state| async move {
            info!("  Main thread | snapshot: {:?}", state);
        })
        .await;

    info!("==========================================");
    warn!("B. shallow-equal params never re-invoke; a changed value does");

    controller.set_params(4);
    sleep(Duration::from_millis(50)).await;
    info!(
        "  Main thread | snapshot after equal params: {:?}",
        controller.snapshot()
    );

    controller.set_params(7);
    controller
        .to_signal()
        .stop_if(|state| *state == CallState::resolved(49))
        .for_each(|state| async move {
            info!("  Main thread | snapshot: {:?}", state);
        })
        .await;

    info!("==========================================");
    warn!("C. a failing run is captured as a reject reason, never thrown");

    controller.set_params(13);
    controller
        .to_signal()
        .stop_if(|state| state.is_rejected())
        .for_each(|state| async move {
            info!("  Main thread | snapshot: {:?}", state);
        })
        .await;

    info!("  Main thread | Finish");
}
