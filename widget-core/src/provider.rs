use std::{
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

use parking_lot::RwLock;

use crate::{
    error::CacheError,
    model::{RowDescriptor, WeatherRecord, decode_records},
    render::{ItemViewRenderer, RowRenderer, panic_message, placeholder_row},
    store::{CACHE_KEY, KeyValueStore},
};

/// Callbacks the host shell invokes on a list backing one widget instance.
///
/// The host never calls these concurrently for the same instance, but may
/// drive several instances on different threads.
pub trait ListAdapter: Send + Sync {
    /// Instance created. Must not perform I/O.
    fn on_create(&self);

    /// The host marked the list stale; reload the data.
    fn on_data_set_changed(&self);

    /// Instance torn down; release the data.
    fn on_destroy(&self);

    fn count(&self) -> usize;

    /// Row for `position`. Never fails; out-of-range positions get a placeholder.
    fn row_at(&self, position: i32) -> RowDescriptor;

    /// Row shown while rows are being produced; `None` uses the host default.
    fn loading_row(&self) -> Option<RowDescriptor> {
        None
    }

    /// Number of distinct row templates.
    fn row_kind_count(&self) -> usize {
        1
    }

    /// Identity of the row at `position`.
    ///
    /// Positional: only stable within one reload generation.
    fn stable_id(&self, position: i32) -> i64 {
        i64::from(position)
    }

    fn has_stable_ids(&self) -> bool {
        true
    }
}

/// Lifecycle of one provider instance.
#[derive(Debug, Clone)]
pub enum ProviderState {
    Uninitialized,
    Loaded {
        generation: u64,
        items: Arc<[WeatherRecord]>,
    },
    Destroyed,
}

impl ProviderState {
    pub fn items(&self) -> Arc<[WeatherRecord]> {
        match self {
            ProviderState::Loaded { items, .. } => Arc::clone(items),
            ProviderState::Uninitialized | ProviderState::Destroyed => empty_items(),
        }
    }

    pub fn generation(&self) -> u64 {
        match self {
            ProviderState::Loaded { generation, .. } => *generation,
            ProviderState::Uninitialized | ProviderState::Destroyed => 0,
        }
    }

    pub fn is_destroyed(&self) -> bool {
        matches!(self, ProviderState::Destroyed)
    }
}

/// What a reload ended up publishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// Cache decoded; list holds this many records.
    Loaded(usize),
    /// Nothing stored (or the store could not be read); list is empty.
    Missing,
    /// Stored value could not be decoded; list is empty.
    Malformed,
    /// Provider already torn down; nothing changed.
    Ignored,
}

/// Holds the decoded location list for one widget instance.
pub struct WidgetListDataProvider<S, R = ItemViewRenderer> {
    store: S,
    cache_key: String,
    renderer: R,
    state: RwLock<ProviderState>,
}

impl<S: std::fmt::Debug, R> std::fmt::Debug for WidgetListDataProvider<S, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetListDataProvider")
            .field("store", &self.store)
            .field("cache_key", &self.cache_key)
            .field("state", &*self.state.read())
            .finish()
    }
}

impl<S: KeyValueStore, R: RowRenderer> WidgetListDataProvider<S, R> {
    /// New provider in the `Uninitialized` state. Performs no I/O.
    pub fn new(store: S, renderer: R) -> Self {
        Self::with_cache_key(store, renderer, CACHE_KEY)
    }

    pub fn with_cache_key(store: S, renderer: R, cache_key: &str) -> Self {
        Self {
            store,
            cache_key: cache_key.to_string(),
            renderer,
            state: RwLock::new(ProviderState::Uninitialized),
        }
    }

    pub fn state(&self) -> ProviderState {
        self.state.read().clone()
    }

    /// Current generation of records; empty unless loaded.
    pub fn snapshot(&self) -> Arc<[WeatherRecord]> {
        self.state.read().items()
    }

    /// Number of completed reloads.
    pub fn generation(&self) -> u64 {
        self.state.read().generation()
    }

    /// Re-read the cache and publish the result as a new generation.
    ///
    /// Decoding happens before the swap; readers see either the previous
    /// list or the new one.
    pub fn reload(&self) -> ReloadOutcome {
        if self.state.read().is_destroyed() {
            tracing::debug!("Ignoring reload of torn-down widget list");
            return ReloadOutcome::Ignored;
        }

        let (items, outcome) = match self.load_items() {
            Ok(items) => {
                let count = items.len();
                (items, ReloadOutcome::Loaded(count))
            }
            Err(CacheError::Missing(key)) => {
                tracing::debug!("No cached weather data under '{key}'");
                (Vec::new(), ReloadOutcome::Missing)
            }
            Err(err @ CacheError::Store(_)) => {
                tracing::warn!("{err}");
                (Vec::new(), ReloadOutcome::Missing)
            }
            Err(err @ CacheError::Malformed(_)) => {
                tracing::warn!("{err}");
                (Vec::new(), ReloadOutcome::Malformed)
            }
        };

        let mut state = self.state.write();
        if state.is_destroyed() {
            return ReloadOutcome::Ignored;
        }

        let generation = state.generation() + 1;
        *state = ProviderState::Loaded { generation, items: items.into() };
        tracing::debug!(generation, ?outcome, "Widget list reloaded");

        outcome
    }

    /// Drop the list. Terminal: later reloads are ignored.
    pub fn teardown(&self) {
        *self.state.write() = ProviderState::Destroyed;
    }

    /// Read and decode the cached payload without touching the state.
    pub fn load_items(&self) -> Result<Vec<WeatherRecord>, CacheError> {
        let payload = self
            .store
            .get(&self.cache_key)?
            .ok_or_else(|| CacheError::Missing(self.cache_key.clone()))?;

        Ok(decode_records(&payload)?)
    }

    pub fn len(&self) -> usize {
        self.state.read().items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row for `position`, or the placeholder when out of range.
    ///
    /// The renderer should already be total; a panic escaping it still only
    /// costs this row.
    pub fn row(&self, position: i32) -> RowDescriptor {
        let items = self.snapshot();
        let Some(record) = usize::try_from(position).ok().and_then(|i| items.get(i)) else {
            return placeholder_row();
        };

        let renderer = &self.renderer;
        match panic::catch_unwind(AssertUnwindSafe(|| renderer.render(record))) {
            Ok(row) => row,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::error!(position, "Widget row renderer panicked: {message}");
                renderer.fallback_row()
            }
        }
    }
}

impl<S: KeyValueStore, R: RowRenderer> ListAdapter for WidgetListDataProvider<S, R> {
    fn on_create(&self) {
        tracing::debug!("Widget list created");
    }

    fn on_data_set_changed(&self) {
        self.reload();
    }

    fn on_destroy(&self) {
        self.teardown();
    }

    fn count(&self) -> usize {
        self.len()
    }

    fn row_at(&self, position: i32) -> RowDescriptor {
        self.row(position)
    }
}

fn empty_items() -> Arc<[WeatherRecord]> {
    Arc::from(Vec::new())
}
