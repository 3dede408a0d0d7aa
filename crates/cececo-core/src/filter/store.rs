// ── Filter store ──
//
// Owns the current `FilterState` and keeps it consistent with a navigable
// location in both directions. Each edge has a change guard: the state is
// only overwritten when the parsed location differs, and the location is
// only replaced when the re-serialised query differs.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::{ArcSwap, ArcSwapOption};
use tokio::sync::watch;
use tracing::debug;

use super::codec::UrlCodec;
use super::state::{FilterField, FilterState};

// ── Location ─────────────────────────────────────────────────────────

/// A navigable location whose query string mirrors the filters.
pub trait Location: Send + Sync {
    /// Current query string, without the leading `?`.
    fn query(&self) -> String;

    /// Replace the current query without adding a history entry.
    fn replace(&self, query: &str);
}

/// In-memory location with a history stack.
///
/// `push` and `back` model user navigation; `replace` is what the store
/// uses and never grows the history.
#[derive(Debug, Default)]
pub struct MemoryLocation {
    inner: Mutex<History>,
    replaces: AtomicUsize,
}

#[derive(Debug, Default)]
struct History {
    entries: Vec<String>,
    cursor: usize,
}

impl MemoryLocation {
    pub fn new(initial: &str) -> Self {
        Self {
            inner: Mutex::new(History {
                entries: vec![initial.trim_start_matches('?').to_owned()],
                cursor: 0,
            }),
            replaces: AtomicUsize::new(0),
        }
    }

    /// Navigate to a new query, discarding any forward entries.
    pub fn push(&self, query: &str) {
        let mut h = self.history();
        let keep = h.cursor + 1;
        h.entries.truncate(keep);
        h.entries.push(query.trim_start_matches('?').to_owned());
        h.cursor = h.entries.len() - 1;
    }

    /// Step back one entry. Returns `false` at the start of history.
    pub fn back(&self) -> bool {
        let mut h = self.history();
        if h.cursor == 0 {
            return false;
        }
        h.cursor -= 1;
        true
    }

    pub fn history_len(&self) -> usize {
        self.history().entries.len()
    }

    /// Number of `replace` calls observed so far.
    pub fn replace_count(&self) -> usize {
        self.replaces.load(Ordering::Relaxed)
    }

    fn history(&self) -> std::sync::MutexGuard<'_, History> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Location for MemoryLocation {
    fn query(&self) -> String {
        let h = self.history();
        h.entries.get(h.cursor).cloned().unwrap_or_default()
    }

    fn replace(&self, query: &str) {
        let mut h = self.history();
        let cursor = h.cursor;
        if h.entries.is_empty() {
            h.entries.push(query.to_owned());
        } else if let Some(entry) = h.entries.get_mut(cursor) {
            query.clone_into(entry);
        }
        self.replaces.fetch_add(1, Ordering::Relaxed);
    }
}

// ── FilterStore ──────────────────────────────────────────────────────

/// Filter state bound to a [`Location`].
///
/// Consumers react to [`subscribe`](Self::subscribe): the channel carries the
/// canonical key and only changes when the effective filters do.
pub struct FilterStore {
    codec: UrlCodec,
    location: Arc<dyn Location>,
    state: ArcSwap<FilterState>,
    key: watch::Sender<String>,
    error: ArcSwapOption<String>,
}

impl FilterStore {
    /// Seed the store from the location, then write back the canonical
    /// form if the location held anything non-canonical.
    pub fn new(codec: UrlCodec, location: Arc<dyn Location>) -> Self {
        let state = codec.parse(&location.query());
        let (key, _) = watch::channel(codec.serialize(&state));
        let store = Self {
            codec,
            location,
            state: ArcSwap::from_pointee(state),
            key,
            error: ArcSwapOption::empty(),
        };
        store.write_location();
        store
    }

    pub fn codec(&self) -> UrlCodec {
        self.codec
    }

    pub fn state(&self) -> Arc<FilterState> {
        self.state.load_full()
    }

    /// Canonical serialised form of the current filters.
    pub fn current_key(&self) -> String {
        self.key.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.key.subscribe()
    }

    /// Set one field from raw input and mirror the result to the location.
    ///
    /// Clears the error display. Never fetches. Returns `true` when the
    /// effective filters changed; fields this screen does not expose are
    /// ignored.
    pub fn set_field(&self, field: FilterField, raw: &str) -> bool {
        self.error.store(None);
        if !self.codec.handles(field) {
            debug!(%field, "ignoring filter not exposed by this screen");
            return false;
        }
        let next = self.state.load().with(field, raw);
        let changed = self.apply(next);
        self.write_location();
        changed
    }

    /// Clear every filter.
    pub fn clear(&self) -> bool {
        self.error.store(None);
        let changed = self.apply(FilterState::default());
        self.write_location();
        changed
    }

    /// Re-read the location after external navigation (back/forward, a
    /// pasted link). Overwrites the state only if it differs; does not
    /// write the location back.
    pub fn sync_from_location(&self) -> bool {
        let parsed = self.codec.parse(&self.location.query());
        self.apply(parsed)
    }

    // ── Error display ────────────────────────────────────────────────

    pub fn error(&self) -> Option<String> {
        self.error.load_full().map(|e| (*e).clone())
    }

    pub fn set_error(&self, message: impl Into<String>) {
        self.error.store(Some(Arc::new(message.into())));
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn apply(&self, next: FilterState) -> bool {
        if **self.state.load() == next {
            return false;
        }
        let key = self.codec.serialize(&next);
        debug!(%key, "filters changed");
        self.state.store(Arc::new(next));
        self.key.send_if_modified(|current| {
            if *current == key {
                false
            } else {
                *current = key;
                true
            }
        });
        true
    }

    fn write_location(&self) {
        let current = self.location.query();
        let next = self.codec.merge_into(&current, &self.state.load());
        if next != current {
            debug!(from = %current, to = %next, "replacing location");
            self.location.replace(&next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FIELDS: &[FilterField] = &[
        FilterField::Q,
        FilterField::InvestorType,
        FilterField::CountryId,
    ];

    fn store_at(query: &str) -> (Arc<MemoryLocation>, FilterStore) {
        let location = Arc::new(MemoryLocation::new(query));
        let store = FilterStore::new(UrlCodec::new(FIELDS), location.clone());
        (location, store)
    }

    #[test]
    fn seeds_from_location() {
        let (location, store) = store_at("?country_id=7&q=solar");
        assert_eq!(store.state().country_id(), Some(7));
        assert_eq!(store.current_key(), "q=solar&country_id=7");
        // Non-canonical order was rewritten once.
        assert_eq!(location.query(), "q=solar&country_id=7");
        assert_eq!(location.replace_count(), 1);
    }

    #[test]
    fn canonical_location_is_not_rewritten() {
        let (location, _store) = store_at("q=solar");
        assert_eq!(location.replace_count(), 0);
    }

    #[test]
    fn set_field_replaces_without_growing_history() {
        let (location, store) = store_at("");
        assert!(store.set_field(FilterField::CountryId, "7"));
        assert_eq!(location.query(), "country_id=7");
        assert_eq!(location.history_len(), 1);
    }

    #[test]
    fn unchanged_value_does_not_touch_location() {
        let (location, store) = store_at("country_id=7");
        assert!(!store.set_field(FilterField::CountryId, " 7 "));
        assert_eq!(location.replace_count(), 0);
    }

    #[test]
    fn set_field_keeps_unrelated_params() {
        let (location, store) = store_at("view=map");
        store.set_field(FilterField::Q, "wind");
        assert_eq!(location.query(), "view=map&q=wind");
        assert_eq!(store.current_key(), "q=wind");
    }

    #[test]
    fn set_field_clears_error() {
        let (_location, store) = store_at("");
        store.set_error("boom");
        store.set_field(FilterField::Q, "x");
        assert_eq!(store.error(), None);
    }

    #[test]
    fn back_navigation_restores_previous_filters() {
        let (location, store) = store_at("q=solar");
        location.push("q=wind&country_id=3");
        assert!(store.sync_from_location());
        assert_eq!(store.state().q(), Some("wind"));

        assert!(location.back());
        assert!(store.sync_from_location());
        assert_eq!(store.state().q(), Some("solar"));
        assert_eq!(store.state().country_id(), None);

        // Nothing changed since the last sync.
        assert!(!store.sync_from_location());
        assert_eq!(location.replace_count(), 0);
    }

    #[test]
    fn key_channel_fires_only_on_change() {
        let (_location, store) = store_at("");
        let mut rx = store.subscribe();
        rx.mark_unchanged();

        store.set_field(FilterField::Q, "  ");
        assert!(!rx.has_changed().unwrap_or(false));

        store.set_field(FilterField::Q, "solar");
        assert!(rx.has_changed().unwrap_or(false));
        assert_eq!(*rx.borrow_and_update(), "q=solar");
    }

    #[test]
    fn fields_outside_codec_are_ignored() {
        let location = Arc::new(MemoryLocation::new(""));
        let store = FilterStore::new(UrlCodec::new(&[FilterField::Q]), location.clone());
        assert!(!store.set_field(FilterField::InvestorType, "angel"));
        assert_eq!(store.state().investor_type(), None);
        assert_eq!(location.query(), "");
    }
}
