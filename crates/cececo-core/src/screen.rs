// ── Listing screens ──
//
// Composes a filter store, a generation-tracked loader and facet selection
// into one screen. The project/startup screen additionally owns the
// per-project match cache, which is reset whenever its list reloads.

use std::future::Future;
use std::sync::Arc;

use arc_swap::{ArcSwap, ArcSwapOption};
use cececo_api::{
    HubClient, Investor, InvestorQuery, NewsItem, NewsQuery, Project, ProjectKind, ProjectQuery,
};
use tracing::debug;

use crate::config::HubConfig;
use crate::error::CoreError;
use crate::facet::{self, FacetDimension, FacetIndex, SelectedFacets};
use crate::filter::{FilterField, FilterState, FilterStore, Location, UrlCodec};
use crate::loader::{Listing, LoadOutcome, LoadState, ResourceLoader, ScreenSource};
use crate::matches::{EntitySubResourceCache, HubMatchSource};

// ── Sources ──────────────────────────────────────────────────────────

/// Investors with country reference data.
#[derive(Debug, Clone)]
pub struct InvestorSource {
    client: HubClient,
}

impl InvestorSource {
    pub fn new(client: HubClient) -> Self {
        Self { client }
    }
}

impl ScreenSource for InvestorSource {
    type Item = Investor;

    fn fields(&self) -> &'static [FilterField] {
        &[
            FilterField::Q,
            FilterField::InvestorType,
            FilterField::CountryId,
        ]
    }

    fn dimensions(&self) -> &'static [FacetDimension] {
        &[FacetDimension::Sector, FacetDimension::Stage]
    }

    fn load(
        &self,
        filters: &FilterState,
    ) -> impl Future<Output = Result<Listing<Investor>, CoreError>> + Send {
        let client = self.client.clone();
        let query = InvestorQuery {
            q: filters.q().map(str::to_owned),
            investor_type: filters.investor_type(),
            country_id: filters.country_id(),
        };
        async move {
            let (countries, investors) =
                tokio::try_join!(client.list_countries(), client.list_investors(&query))?;
            Ok(Listing::new(countries, investors))
        }
    }
}

/// Projects or startups; the kind is fixed per screen and never part of
/// the location.
#[derive(Debug, Clone)]
pub struct ProjectSource {
    client: HubClient,
    kind: ProjectKind,
}

impl ProjectSource {
    pub fn new(client: HubClient, kind: ProjectKind) -> Self {
        Self { client, kind }
    }

    pub fn kind(&self) -> ProjectKind {
        self.kind
    }
}

impl ScreenSource for ProjectSource {
    type Item = Project;

    fn fields(&self) -> &'static [FilterField] {
        &[FilterField::Q, FilterField::CountryId]
    }

    fn dimensions(&self) -> &'static [FacetDimension] {
        &[FacetDimension::Sector, FacetDimension::Stage]
    }

    fn load(
        &self,
        filters: &FilterState,
    ) -> impl Future<Output = Result<Listing<Project>, CoreError>> + Send {
        let client = self.client.clone();
        let query = ProjectQuery {
            kind: self.kind,
            country_id: filters.country_id(),
            q: filters.q().map(str::to_owned),
        };
        async move {
            let (countries, projects) =
                tokio::try_join!(client.list_countries(), client.list_projects(&query))?;
            Ok(Listing::new(countries, projects))
        }
    }
}

/// One page of approved news.
#[derive(Debug, Clone)]
pub struct NewsSource {
    client: HubClient,
    limit: Option<u32>,
}

impl NewsSource {
    pub fn new(client: HubClient, limit: Option<u32>) -> Self {
        Self { client, limit }
    }
}

impl ScreenSource for NewsSource {
    type Item = NewsItem;

    fn fields(&self) -> &'static [FilterField] {
        &[FilterField::Q, FilterField::CountryId]
    }

    fn dimensions(&self) -> &'static [FacetDimension] {
        &[FacetDimension::Tag]
    }

    fn load(
        &self,
        filters: &FilterState,
    ) -> impl Future<Output = Result<Listing<NewsItem>, CoreError>> + Send {
        let client = self.client.clone();
        let query = NewsQuery {
            country_id: filters.country_id(),
            q: filters.q().map(str::to_owned),
            limit: self.limit,
            offset: None,
        };
        async move {
            let (countries, page) =
                tokio::try_join!(client.list_countries(), client.list_news(&query))?;
            let mut listing = Listing::new(countries, page.items);
            listing.total = Some(page.total);
            Ok(listing)
        }
    }
}

// ── ListingScreen ────────────────────────────────────────────────────

/// A filterable list backed by one [`ScreenSource`].
pub struct ListingScreen<S: ScreenSource> {
    store: FilterStore,
    loader: ResourceLoader<S>,
    facets: ArcSwap<FacetIndex>,
    selected: ArcSwap<SelectedFacets>,
    requested_key: ArcSwapOption<String>,
}

pub type InvestorScreen = ListingScreen<InvestorSource>;
pub type NewsScreen = ListingScreen<NewsSource>;

impl<S: ScreenSource> ListingScreen<S> {
    pub fn new(source: S, location: Arc<dyn Location>) -> Self {
        let store = FilterStore::new(UrlCodec::new(source.fields()), location);
        Self {
            store,
            loader: ResourceLoader::new(source),
            facets: ArcSwap::from_pointee(FacetIndex::default()),
            selected: ArcSwap::from_pointee(SelectedFacets::default()),
            requested_key: ArcSwapOption::empty(),
        }
    }

    pub fn store(&self) -> &FilterStore {
        &self.store
    }

    pub fn loader(&self) -> &ResourceLoader<S> {
        &self.loader
    }

    pub fn state(&self) -> LoadState<S::Item> {
        self.loader.state()
    }

    /// Message for the error display, if the last load failed and no
    /// filter changed since.
    pub fn error(&self) -> Option<String> {
        self.store.error()
    }

    pub fn set_field(&self, field: FilterField, raw: &str) -> bool {
        self.store.set_field(field, raw)
    }

    // ── Loading ──────────────────────────────────────────────────────

    /// Load the current filters unconditionally.
    pub async fn load(&self) -> LoadOutcome<S::Item> {
        let key = self.store.current_key();
        self.requested_key.store(Some(Arc::new(key)));
        let filters = FilterState::clone(&self.store.state());
        let outcome = self.loader.load(filters).await;
        self.absorb(&outcome);
        outcome
    }

    /// Load only if the filter key changed since the last requested load.
    pub async fn sync(&self) -> Option<LoadOutcome<S::Item>> {
        let key = self.store.current_key();
        let unchanged = self
            .requested_key
            .load()
            .as_deref()
            .is_some_and(|k| *k == key);
        if unchanged {
            debug!(%key, "filters unchanged, not reloading");
            return None;
        }
        Some(self.load().await)
    }

    /// Pick up external navigation, then load if the key moved.
    pub async fn navigate(&self) -> Option<LoadOutcome<S::Item>> {
        self.store.sync_from_location();
        self.sync().await
    }

    pub async fn retry(&self) -> Option<LoadOutcome<S::Item>> {
        let outcome = self.loader.retry().await?;
        self.absorb(&outcome);
        Some(outcome)
    }

    // ── Derived views ────────────────────────────────────────────────

    /// Loaded items narrowed by the selected facets.
    pub fn items(&self) -> Vec<S::Item> {
        let state = self.loader.state();
        let Some(listing) = state.listing() else {
            return Vec::new();
        };
        facet::apply(&listing.items, &self.selected.load())
    }

    /// Items the server returned before facet narrowing.
    pub fn loaded_count(&self) -> usize {
        self.loader
            .state()
            .listing()
            .map_or(0, |l| l.items.len())
    }

    pub fn facets(&self) -> Arc<FacetIndex> {
        self.facets.load_full()
    }

    pub fn selected(&self) -> Arc<SelectedFacets> {
        self.selected.load_full()
    }

    /// Toggle one facet value. Returns `true` if it is now selected.
    pub fn toggle_facet(&self, dimension: FacetDimension, value: &str) -> bool {
        let mut next = SelectedFacets::clone(&self.selected.load());
        let on = next.toggle(dimension, value);
        self.selected.store(Arc::new(next));
        on
    }

    pub fn clear_facets(&self) {
        self.selected.store(Arc::new(SelectedFacets::default()));
    }

    /// Country display name from the loaded reference list.
    pub fn country_name(&self, id: u32) -> String {
        match self.loader.state().listing() {
            Some(listing) => listing.country_name(id),
            None => format!("#{id}"),
        }
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn absorb(&self, outcome: &LoadOutcome<S::Item>) {
        match outcome {
            LoadOutcome::Applied(listing) => {
                let index = FacetIndex::build(&listing.items, self.loader.source().dimensions());
                let mut selected = SelectedFacets::clone(&self.selected.load());
                if selected.retain_available(&index) {
                    debug!("dropped facet selections missing from reloaded list");
                }
                self.selected.store(Arc::new(selected));
                self.facets.store(Arc::new(index));
            }
            LoadOutcome::Failed(e) => self.store.set_error(e.to_string()),
            LoadOutcome::Superseded => {}
        }
    }
}

impl ListingScreen<InvestorSource> {
    pub fn investors(client: HubClient, location: Arc<dyn Location>) -> Self {
        Self::new(InvestorSource::new(client), location)
    }
}

impl ListingScreen<NewsSource> {
    pub fn news(client: HubClient, limit: Option<u32>, location: Arc<dyn Location>) -> Self {
        Self::new(NewsSource::new(client, limit), location)
    }
}

// ── ProjectScreen ────────────────────────────────────────────────────

/// Project or startup listing with expandable match panels.
pub struct ProjectScreen {
    listing: ListingScreen<ProjectSource>,
    matches: EntitySubResourceCache<HubMatchSource>,
}

impl ProjectScreen {
    pub fn new(
        client: HubClient,
        kind: ProjectKind,
        config: &HubConfig,
        location: Arc<dyn Location>,
    ) -> Self {
        let matches = EntitySubResourceCache::new(
            HubMatchSource::new(client.clone(), config.match_limit),
            config.preview,
        );
        Self {
            listing: ListingScreen::new(ProjectSource::new(client, kind), location),
            matches,
        }
    }

    pub fn kind(&self) -> ProjectKind {
        self.listing.loader().source().kind()
    }

    pub fn listing(&self) -> &ListingScreen<ProjectSource> {
        &self.listing
    }

    pub fn matches(&self) -> &EntitySubResourceCache<HubMatchSource> {
        &self.matches
    }

    pub fn set_field(&self, field: FilterField, raw: &str) -> bool {
        self.listing.set_field(field, raw)
    }

    pub async fn load(&self) -> LoadOutcome<Project> {
        let outcome = self.listing.load().await;
        self.after_load(&outcome);
        outcome
    }

    pub async fn sync(&self) -> Option<LoadOutcome<Project>> {
        let outcome = self.listing.sync().await?;
        self.after_load(&outcome);
        Some(outcome)
    }

    pub async fn navigate(&self) -> Option<LoadOutcome<Project>> {
        let outcome = self.listing.navigate().await?;
        self.after_load(&outcome);
        Some(outcome)
    }

    pub async fn retry(&self) -> Option<LoadOutcome<Project>> {
        let outcome = self.listing.retry().await?;
        self.after_load(&outcome);
        Some(outcome)
    }

    fn after_load(&self, outcome: &LoadOutcome<Project>) {
        if outcome.is_applied() {
            self.matches.reset();
        }
    }
}
