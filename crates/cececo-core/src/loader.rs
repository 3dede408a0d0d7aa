// ── Screen loader ──
//
// Runs the combined fetch a listing needs for one filter key and publishes
// the outcome through a `watch` channel. Every load takes a generation from
// a monotonically increasing counter; a result that is no longer the latest
// is dropped instead of overwriting newer data.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwapOption;
use cececo_api::Country;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::facet::{FacetDimension, Faceted};
use crate::filter::{FilterField, FilterState};

// ── Snapshot ─────────────────────────────────────────────────────────

/// Everything one load produced: the reference list and the primary list.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<T> {
    pub countries: Vec<Country>,
    pub items: Vec<T>,
    /// Server-side total when the endpoint pages its results.
    pub total: Option<u64>,
}

impl<T> Listing<T> {
    pub fn new(countries: Vec<Country>, items: Vec<T>) -> Self {
        Self {
            countries,
            items,
            total: None,
        }
    }

    /// Display name for a country id, `#id` when the id is unknown.
    pub fn country_name(&self, id: u32) -> String {
        self.countries
            .iter()
            .find(|c| c.id == id)
            .map_or_else(|| format!("#{id}"), |c| c.name.clone())
    }
}

/// Fetches the data behind one listing screen.
pub trait ScreenSource: Send + Sync + 'static {
    type Item: Faceted + Clone + Send + Sync + 'static;

    /// Filters this screen mirrors to the location.
    fn fields(&self) -> &'static [FilterField];

    /// Facet dimensions offered for client-side narrowing.
    fn dimensions(&self) -> &'static [FacetDimension];

    /// Fetch the reference and primary lists for `filters`. All requests
    /// either succeed together or the whole load fails.
    fn load(
        &self,
        filters: &FilterState,
    ) -> impl Future<Output = Result<Listing<Self::Item>, CoreError>> + Send;
}

// ── LoadState ────────────────────────────────────────────────────────

/// Observable state of a screen's primary load.
#[derive(Debug)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Ready(Arc<Listing<T>>),
    Failed { message: String },
}

impl<T> Clone for LoadState<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Idle => Self::Idle,
            Self::Loading => Self::Loading,
            Self::Ready(listing) => Self::Ready(Arc::clone(listing)),
            Self::Failed { message } => Self::Failed {
                message: message.clone(),
            },
        }
    }
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn listing(&self) -> Option<&Arc<Listing<T>>> {
        match self {
            Self::Ready(listing) => Some(listing),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { message } => Some(message),
            _ => None,
        }
    }
}

/// What happened to one call of [`ResourceLoader::load`].
#[derive(Debug)]
pub enum LoadOutcome<T> {
    Applied(Arc<Listing<T>>),
    /// The load failed as a whole; no partial result was applied.
    Failed(CoreError),
    /// A newer load started while this one was in flight; its result was
    /// discarded.
    Superseded,
}

impl<T> LoadOutcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

// ── ResourceLoader ───────────────────────────────────────────────────

pub struct ResourceLoader<S: ScreenSource> {
    source: S,
    generation: AtomicU64,
    last: ArcSwapOption<FilterState>,
    state: watch::Sender<LoadState<S::Item>>,
}

impl<S: ScreenSource> ResourceLoader<S> {
    pub fn new(source: S) -> Self {
        let (state, _) = watch::channel(LoadState::Idle);
        Self {
            source,
            generation: AtomicU64::new(0),
            last: ArcSwapOption::empty(),
            state,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn state(&self) -> LoadState<S::Item> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadState<S::Item>> {
        self.state.subscribe()
    }

    /// Generation of the most recently started load (0 before the first).
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Load `filters`, superseding any load still in flight.
    pub async fn load(&self, filters: FilterState) -> LoadOutcome<S::Item> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.last.store(Some(Arc::new(filters.clone())));
        self.publish(generation, |state| *state = LoadState::Loading);
        debug!(generation, ?filters, "load started");

        let result = self.source.load(&filters).await;

        let mut outcome = LoadOutcome::Superseded;
        let applied = self.publish(generation, |state| match result {
            Ok(listing) => {
                let listing = Arc::new(listing);
                debug!(generation, items = listing.items.len(), "load applied");
                *state = LoadState::Ready(Arc::clone(&listing));
                outcome = LoadOutcome::Applied(listing);
            }
            Err(e) => {
                warn!(generation, error = %e, "load failed");
                *state = LoadState::Failed {
                    message: e.to_string(),
                };
                outcome = LoadOutcome::Failed(e);
            }
        });
        if !applied {
            debug!(generation, latest = self.generation(), "load superseded");
        }
        outcome
    }

    /// Run `update` on the published state only if `generation` is still
    /// the latest. The check and the write happen under the channel lock.
    fn publish(&self, generation: u64, update: impl FnOnce(&mut LoadState<S::Item>)) -> bool {
        self.state.send_if_modified(|state| {
            if self.generation() != generation {
                return false;
            }
            update(state);
            true
        })
    }

    /// Re-run the last requested load. `None` if nothing was loaded yet.
    pub async fn retry(&self) -> Option<LoadOutcome<S::Item>> {
        let last = self.last.load_full()?;
        Some(self.load((*last).clone()).await)
    }
}
