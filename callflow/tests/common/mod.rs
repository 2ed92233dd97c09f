use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use callflow::{impl_shallow_eq, AsyncCall};

#[derive(Clone, Debug)]
pub struct Lookup {
    pub key: u64,
    pub scope: Arc<String>,
}

impl_shallow_eq!(Lookup { key, scope });

impl Lookup {
    pub fn new(key: u64) -> Self {
        Lookup {
            key,
            scope: Arc::new("default".to_string()),
        }
    }
}

/// Binds a lookup operation that echoes the key and counts invocations.
pub fn counting_lookup(calls: Arc<AtomicUsize>) -> AsyncCall<Lookup, u64> {
    AsyncCall::bind(move |lookup: Lookup| {
        calls.fetch_add(1, Ordering::SeqCst);
        async move { lookup.key }
    })
}
