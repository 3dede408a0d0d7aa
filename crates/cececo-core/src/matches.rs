// ── Per-entity match cache ──
//
// Keyed store of lazily loaded match lists, one independent state machine
// per listed project. Entries are immutable `Arc` snapshots replaced
// wholesale on every transition; a ticket records which in-flight request
// is authoritative so late or superseded answers are dropped.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use cececo_api::{HubClient, MatchQuery, ScoredMatch};
use dashmap::DashMap;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::CoreError;

// ── Source ───────────────────────────────────────────────────────────

/// Fetches the match list for one entity.
pub trait MatchSource: Send + Sync + 'static {
    fn fetch(
        &self,
        entity_id: u32,
        strict: bool,
    ) -> impl Future<Output = Result<Vec<ScoredMatch>, CoreError>> + Send;
}

/// Matches from `GET /api/v1/projects/{id}/matches`.
#[derive(Debug, Clone)]
pub struct HubMatchSource {
    client: HubClient,
    limit: u32,
}

impl HubMatchSource {
    pub fn new(client: HubClient, limit: u32) -> Self {
        Self { client, limit }
    }
}

impl MatchSource for HubMatchSource {
    fn fetch(
        &self,
        entity_id: u32,
        strict: bool,
    ) -> impl Future<Output = Result<Vec<ScoredMatch>, CoreError>> + Send {
        let client = self.client.clone();
        let query = MatchQuery {
            strict_country: strict,
            limit: Some(self.limit),
        };
        async move { Ok(client.project_matches(entity_id, query).await?) }
    }
}

// ── Entry ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EntryStatus {
    #[default]
    Closed,
    Loading,
    Loaded,
    Errored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InFlight {
    ticket: u64,
    strict: bool,
}

/// State of one entity's match panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubResourceEntry {
    pub status: EntryStatus,
    pub data: Option<Arc<Vec<ScoredMatch>>>,
    pub error: Option<CoreError>,
    pub expanded: bool,
    /// Only investors supporting the entity's country.
    pub strict: bool,
    pub show_all: bool,
    /// Mode `data` was fetched with.
    data_mode: Option<bool>,
    in_flight: Option<InFlight>,
}

impl SubResourceEntry {
    /// Whether cached data was fetched with `strict`.
    pub fn has_data_for(&self, strict: bool) -> bool {
        self.data.is_some() && self.data_mode == Some(strict)
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn total(&self) -> usize {
        self.data.as_ref().map_or(0, |d| d.len())
    }

    /// Matches to show: the first `preview` unless show-all is on.
    pub fn visible(&self, preview: usize) -> &[ScoredMatch] {
        let Some(data) = self.data.as_deref() else {
            return &[];
        };
        if self.show_all {
            data
        } else {
            &data[..preview.min(data.len())]
        }
    }

    pub fn shown_count(&self, preview: usize) -> usize {
        self.visible(preview).len()
    }

    /// `"Showing X of Y"`, or `None` when there is nothing loaded.
    pub fn summary(&self, preview: usize) -> Option<String> {
        let total = self.total();
        (total > 0).then(|| format!("Showing {} of {total}", self.shown_count(preview)))
    }
}

// ── Cache ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct Request {
    entity_id: u32,
    ticket: u64,
    strict: bool,
}

/// Lazily loaded match lists keyed by entity id.
///
/// Different ids load concurrently. Within one id at most one request is
/// authoritative; reopening a panel whose request is still running never
/// issues a second one.
pub struct EntitySubResourceCache<M: MatchSource> {
    source: M,
    entries: DashMap<u32, Arc<SubResourceEntry>>,
    tickets: AtomicU64,
    preview: usize,
    version: watch::Sender<u64>,
}

impl<M: MatchSource> EntitySubResourceCache<M> {
    pub fn new(source: M, preview: usize) -> Self {
        let (version, _) = watch::channel(0);
        Self {
            source,
            entries: DashMap::new(),
            tickets: AtomicU64::new(0),
            preview,
            version,
        }
    }

    pub fn source(&self) -> &M {
        &self.source
    }

    pub fn preview(&self) -> usize {
        self.preview
    }

    pub fn entry(&self, entity_id: u32) -> Option<Arc<SubResourceEntry>> {
        self.entries.get(&entity_id).map(|r| Arc::clone(r.value()))
    }

    /// Matches currently shown for `entity_id`.
    pub fn visible(&self, entity_id: u32) -> Vec<ScoredMatch> {
        self.entry(entity_id)
            .map(|e| e.visible(self.preview).to_vec())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bumped on every entry replacement.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Open or close the panel. Opening fetches only when there is no data
    /// for the current mode and no matching request already running.
    /// Closing keeps both the data and any running request.
    pub async fn toggle_open(&self, entity_id: u32) {
        let request = self.transition(entity_id, |e| {
            if e.expanded {
                e.expanded = false;
                e.status = EntryStatus::Closed;
                return false;
            }
            e.expanded = true;
            resume_or_fetch(e)
        });
        self.run(request).await;
    }

    /// Switch between strict and broad matching. While closed the mode is
    /// only recorded; the next open refetches if the cached data was
    /// fetched under the other mode.
    pub async fn set_mode(&self, entity_id: u32, strict: bool) {
        let request = self.transition(entity_id, |e| {
            let changed = e.strict != strict;
            e.strict = strict;
            if !e.expanded || (!changed && e.status != EntryStatus::Errored) {
                return false;
            }
            if e.has_data_for(strict) {
                // Back to the cached mode: whatever is running is now stale.
                e.in_flight = None;
            }
            resume_or_fetch(e)
        });
        self.run(request).await;
    }

    /// Flip between the preview and the full list. Never fetches.
    pub fn toggle_show_all(&self, entity_id: u32) {
        self.transition(entity_id, |e| {
            e.show_all = !e.show_all;
            false
        });
    }

    /// Re-fetch an open entry that failed.
    pub async fn retry(&self, entity_id: u32) {
        let request = self.transition(entity_id, |e| {
            e.expanded && e.status == EntryStatus::Errored
        });
        self.run(request).await;
    }

    /// Discard every entry. Answers to requests issued before the reset are
    /// dropped when they arrive.
    pub fn reset(&self) {
        if self.entries.is_empty() {
            return;
        }
        debug!(entries = self.entries.len(), "resetting match cache");
        self.entries.clear();
        self.bump();
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Replace one entry with the result of `update`. When `update` asks
    /// for a fetch, a new ticket becomes authoritative for the entry.
    fn transition<F>(&self, entity_id: u32, update: F) -> Option<Request>
    where
        F: FnOnce(&mut SubResourceEntry) -> bool,
    {
        let request = {
            let mut slot = self.entries.entry(entity_id).or_default();
            let mut next = SubResourceEntry::clone(&slot);
            let request = update(&mut next).then(|| {
                let ticket = self.tickets.fetch_add(1, Ordering::SeqCst) + 1;
                next.in_flight = Some(InFlight {
                    ticket,
                    strict: next.strict,
                });
                next.status = EntryStatus::Loading;
                next.error = None;
                Request {
                    entity_id,
                    ticket,
                    strict: next.strict,
                }
            });
            *slot = Arc::new(next);
            request
        };
        self.bump();
        request
    }

    async fn run(&self, request: Option<Request>) {
        let Some(request) = request else {
            return;
        };
        debug!(
            entity_id = request.entity_id,
            ticket = request.ticket,
            strict = request.strict,
            "fetching matches"
        );
        let result = self.source.fetch(request.entity_id, request.strict).await;
        self.complete(request, result);
    }

    fn complete(&self, request: Request, result: Result<Vec<ScoredMatch>, CoreError>) {
        {
            let Some(mut slot) = self.entries.get_mut(&request.entity_id) else {
                debug!(entity_id = request.entity_id, "entry reset, dropping matches");
                return;
            };
            if slot.in_flight.map(|f| f.ticket) != Some(request.ticket) {
                debug!(
                    entity_id = request.entity_id,
                    ticket = request.ticket,
                    "superseded, dropping matches"
                );
                return;
            }

            let mut next = SubResourceEntry::clone(&slot);
            next.in_flight = None;
            match result {
                Ok(matches) => {
                    debug!(entity_id = request.entity_id, count = matches.len(), "matches loaded");
                    next.data = Some(Arc::new(matches));
                    next.data_mode = Some(request.strict);
                    next.error = None;
                    next.status = if next.expanded {
                        EntryStatus::Loaded
                    } else {
                        EntryStatus::Closed
                    };
                }
                Err(e) => {
                    warn!(entity_id = request.entity_id, error = %e, "match fetch failed");
                    next.error = Some(e);
                    next.status = if next.expanded {
                        EntryStatus::Errored
                    } else {
                        EntryStatus::Closed
                    };
                }
            }
            *slot = Arc::new(next);
        }
        self.bump();
    }

    fn bump(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}

/// Show cached data or a running request for the entry's mode; otherwise
/// ask for a fetch.
fn resume_or_fetch(e: &mut SubResourceEntry) -> bool {
    if e.has_data_for(e.strict) {
        e.status = EntryStatus::Loaded;
        e.error = None;
        false
    } else if e.in_flight.is_some_and(|f| f.strict == e.strict) {
        e.status = EntryStatus::Loading;
        false
    } else {
        true
    }
}
