use callflow::{AsyncCall, HasResult, Resetter, ResultStore, Retained};
use futures_signals::signal::SignalExt;
use tracing::{info, warn};

use crate::tracing_setup::tracing_init;

mod tracing_setup;

#[tokio::main]
async fn main() {
    tracing_init();

    info!("==========================================");
    warn!("A. the store adopts the first resolution and reduces later ones");

    let call = AsyncCall::bind(|n: u64| async move { n }).with_label("echo");
    let controller = call.mount_lazy(42);
    let store = ResultStore::builder()
        .reduce(|total: &u64, newer: &u64| total + newer)
        .attach(&controller.channel());

    controller.execute();
    store
        .to_signal()
        .stop_if(|retained| *retained == Retained::Value(42))
        .for_each(|retained| async move {
            info!("  Main thread | retained: {:?}", retained);
        })
        .await;

    controller.set_params(8);
    controller.execute();
    store
        .to_signal()
        .stop_if(|retained| *retained == Retained::Value(50))
        .for_each(|retained| async move {
            info!("  Main thread | retained: {:?}", retained);
        })
        .await;

    info!("==========================================");
    warn!("B. reset clears the store; a plain reset also re-triggers the parent");

    let resetter = Resetter::new(&store.channel());
    resetter.reset_with(false);
    store
        .to_signal()
        .stop_if(|retained| *retained == Retained::Empty)
        .for_each(|retained| async move {
            info!("  Main thread | retained: {:?}", retained);
        })
        .await;

    resetter.reset();
    store
        .to_signal()
        .stop_if(|retained| *retained == Retained::Value(8))
        .for_each(|retained| async move {
            info!("  Main thread | retained: {:?}", retained);
        })
        .await;

    info!("==========================================");
    warn!("C. HasResult is active only while a value is retained");

    let reader = HasResult::new(&store.channel());
    reader
        .signal()
        .stop_if(|value| value.is_some())
        .for_each(|value| async move {
            info!("  Main thread | has result: {:?}", value);
        })
        .await;

    info!("  Main thread | Finish");
}
