use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::StreamExt;

use crate::{impl_shallow_eq, AsyncCall, ResultStore, Retained};

mod outcome_test;
mod readers_test;

#[derive(Clone, Debug)]
pub struct Query {
    pub user: u64,
    pub tags: Arc<Vec<String>>,
}

impl_shallow_eq!(Query { user, tags });

pub fn echo() -> AsyncCall<u64, u64> {
    AsyncCall::bind(|n: u64| async move { n })
}

pub fn counting_echo(calls: Arc<AtomicUsize>) -> AsyncCall<u64, u64> {
    AsyncCall::bind(move |n: u64| {
        calls.fetch_add(1, Ordering::SeqCst);
        async move { n }
    })
}

/// Waits until the store publishes `expected`.
pub async fn await_retained<T>(store: &ResultStore<T>, expected: Retained<T>)
where
    T: Clone + Send + Sync + PartialEq + std::fmt::Debug + 'static,
{
    let mut stream = store.to_stream();
    while let Some(value) = stream.next().await {
        if value == expected {
            return;
        }
    }
    panic!("store stream ended before publishing {expected:?}");
}
