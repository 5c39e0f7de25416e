//! Single-flight memoization of fallible async fetches.

use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures_util::future::{BoxFuture, FutureExt, Shared};

use crate::fetch::FetchError;

type Pending<V> = Shared<BoxFuture<'static, Result<Arc<V>, FetchError>>>;

/// Whether a lookup found an existing slot or started a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Hit,
    Miss,
}

/// Map from key to an in-flight or resolved fetch.
///
/// The first caller for a key stores the fetch itself, so later callers await
/// the same attempt instead of starting their own. A fetch that fails removes
/// its slot before any waiter observes the error. Slots are removed nowhere
/// else, so the slot under a key is always the one the failing fetch stored.
pub struct Memo<K, V> {
    slots: Arc<DashMap<K, Pending<V>>>,
}

impl<K, V> Memo<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            slots: Arc::new(DashMap::new()),
        }
    }

    /// Return the value for `key`, running `fetch` only if no slot exists.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: K,
        fetch: F,
    ) -> (Lookup, Result<Arc<V>, FetchError>)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, FetchError>> + Send + 'static,
    {
        let (lookup, pending) = match self.slots.entry(key.clone()) {
            Entry::Occupied(entry) => (Lookup::Hit, entry.get().clone()),
            Entry::Vacant(entry) => {
                let slots = Arc::clone(&self.slots);
                let fut = fetch();

                let pending = async move {
                    let outcome = fut.await.map(Arc::new);
                    if outcome.is_err() {
                        slots.remove(&key);
                    }
                    outcome
                }
                .boxed()
                .shared();

                entry.insert(pending.clone());
                (Lookup::Miss, pending)
            }
        };

        // The map guard is released above; only the shared future is awaited.
        (lookup, pending.await)
    }

    /// Whether a slot (pending or resolved) exists for `key`.
    pub fn contains(&self, key: &K) -> bool {
        self.slots.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<K, V> Default for Memo<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
