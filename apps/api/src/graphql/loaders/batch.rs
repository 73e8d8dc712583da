//! Request-scoped batching loader
//!
//! Collapses the point lookups issued while resolving a single GraphQL
//! request into batched storage fetches. Loads arriving inside the open
//! window are coalesced into one fetch keyed by the distinct ids, with the
//! union of every caller's field hints; duplicate keys share one pending
//! future and one cache slot, so a key is fetched at most once per request.
//!
//! The window flushes on a short timer rather than at an explicit
//! "all resolvers enqueued" signal: once the first load opens a window, a
//! flush task sleeps for the configured delay and then takes whatever the
//! window accumulated. Loads that arrive after the flush began join the
//! in-flight result but no longer influence which fields are fetched.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::{BoxFuture, Shared};
use futures_util::FutureExt;
use tokio::sync::oneshot;

use crate::error::{ApiResult, BatchError};
use crate::graphql::projection::FieldSet;

/// Default window length between the first load and its flush.
const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(1);

/// Tuning for [`BatchedLoader`] instances.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// How long a window stays open after its first load
    pub batch_delay: Duration,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_delay: DEFAULT_BATCH_DELAY,
        }
    }
}

/// Batched lookup against one entity's storage.
///
/// Implementations receive the distinct keys of a window and the unioned
/// field hints, and return whatever rows exist; absent keys are simply
/// left out of the map.
pub trait BatchFetcher: Send + Sync + 'static {
    type Key: Eq + Hash + Clone + Debug + Send + Sync + 'static;
    type Value: Clone + Send + Sync + 'static;

    /// Entity name used in errors and logs
    const ENTITY: &'static str;

    fn fetch(
        &self,
        keys: &[Self::Key],
        fields: &FieldSet,
    ) -> impl Future<Output = ApiResult<HashMap<Self::Key, Self::Value>>> + Send;
}

/// Outcome of a single load: the row, an absence marker, or the window's
/// shared failure.
pub type LoadResult<V> = Result<Option<V>, BatchError>;

type SharedLoad<V> = Shared<BoxFuture<'static, LoadResult<V>>>;

/// One open batch window.
struct BatchWindow<K, V> {
    /// Distinct keys in first-seen order
    keys: Vec<K>,

    /// Union of the field hints of every load in the window
    fields: FieldSet,

    /// Fulfillment channel per key
    slots: HashMap<K, oneshot::Sender<LoadResult<V>>>,
}

impl<K, V> BatchWindow<K, V> {
    fn new() -> Self {
        Self {
            keys: Vec::new(),
            fields: FieldSet::new(),
            slots: HashMap::new(),
        }
    }
}

struct LoaderState<K, V> {
    /// Every key this loader has ever been asked for, resolved or pending.
    /// Never evicted; the loader lives only as long as its request.
    cache: HashMap<K, SharedLoad<V>>,

    /// The currently open window, if any
    window: Option<BatchWindow<K, V>>,
}

/// Per-request deduplicating batch loader over a [`BatchFetcher`].
pub struct BatchedLoader<F: BatchFetcher> {
    fetcher: Arc<F>,
    delay: Duration,
    state: Arc<Mutex<LoaderState<F::Key, F::Value>>>,
}

impl<F: BatchFetcher> BatchedLoader<F> {
    pub fn new(fetcher: F, config: &LoaderConfig) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            delay: config.batch_delay,
            state: Arc::new(Mutex::new(LoaderState {
                cache: HashMap::new(),
                window: None,
            })),
        }
    }

    /// Load one row, batching with every other load in the current window.
    ///
    /// `hint` names the GraphQL fields the caller is about to read; the
    /// flushed fetch sees the union of all hints in the window. `Ok(None)`
    /// means the key has no row, and that absence is cached like any hit.
    pub async fn load(&self, key: F::Key, hint: &FieldSet) -> LoadResult<F::Value> {
        self.enqueue(key, hint).await
    }

    /// Load several rows through the same window.
    ///
    /// Results come back in input order; duplicate keys each get a clone of
    /// the single fetched row.
    pub async fn load_many(
        &self,
        keys: impl IntoIterator<Item = F::Key>,
        hint: &FieldSet,
    ) -> Result<Vec<Option<F::Value>>, BatchError> {
        let pending: Vec<_> = keys
            .into_iter()
            .map(|key| self.enqueue(key, hint))
            .collect();
        futures_util::future::try_join_all(pending).await
    }

    /// Register a key in the current window (opening one if needed) or join
    /// the key's existing pending/resolved slot.
    fn enqueue(&self, key: F::Key, hint: &FieldSet) -> SharedLoad<F::Value> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(existing) = state.cache.get(&key).cloned() {
            // A duplicate load while the key's window is still open widens
            // the fetch; after the flush it just shares the result.
            if let Some(window) = state.window.as_mut() {
                if window.slots.contains_key(&key) {
                    window.fields.extend(hint.iter().cloned());
                }
            }
            return existing;
        }

        let (tx, rx) = oneshot::channel();
        let shared: SharedLoad<F::Value> = rx
            .map(|result| match result {
                Ok(outcome) => outcome,
                Err(_) => Err(BatchError::aborted(F::ENTITY)),
            })
            .boxed()
            .shared();
        state.cache.insert(key.clone(), shared.clone());

        match state.window.as_mut() {
            Some(window) => {
                window.keys.push(key.clone());
                window.fields.extend(hint.iter().cloned());
                window.slots.insert(key, tx);
            }
            None => {
                let mut window = BatchWindow::new();
                window.keys.push(key.clone());
                window.fields.extend(hint.iter().cloned());
                window.slots.insert(key, tx);
                state.window = Some(window);
                self.schedule_flush();
            }
        }

        shared
    }

    /// Arrange for the window just opened to be flushed after the delay.
    fn schedule_flush(&self) {
        let state = Arc::clone(&self.state);
        let fetcher = Arc::clone(&self.fetcher);
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            Self::flush(state, fetcher).await;
        });
    }

    /// Take the open window and fulfill every slot in it.
    ///
    /// On fetch failure, every pending load in the window receives the same
    /// [`BatchError`] wrapping the one underlying cause.
    async fn flush(state: Arc<Mutex<LoaderState<F::Key, F::Value>>>, fetcher: Arc<F>) {
        let window = {
            let mut state = state.lock().unwrap_or_else(|e| e.into_inner());
            state.window.take()
        };
        let Some(window) = window else {
            return;
        };
        let BatchWindow {
            keys,
            fields,
            mut slots,
        } = window;

        tracing::debug!(
            entity = F::ENTITY,
            keys = keys.len(),
            fields = fields.len(),
            "flushing batch window"
        );

        match fetcher.fetch(&keys, &fields).await {
            Ok(mut rows) => {
                for key in &keys {
                    if let Some(slot) = slots.remove(key) {
                        let _ = slot.send(Ok(rows.remove(key)));
                    }
                }
            }
            Err(error) => {
                tracing::warn!(entity = F::ENTITY, error = %error, "batch fetch failed");
                let cause = Arc::new(error);
                for (_, slot) in slots.drain() {
                    let _ = slot.send(Err(BatchError::fetch(F::ENTITY, Arc::clone(&cause))));
                }
            }
        }
    }
}
