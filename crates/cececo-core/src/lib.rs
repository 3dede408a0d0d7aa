//! Client-side engine behind the CECECO hub listing screens.
//!
//! - **[`FilterStore`]** keeps the user-editable [`FilterState`] and a
//!   navigable [`Location`] consistent in both directions, with change
//!   guards on each edge so neither side echoes the other.
//!
//! - **[`ResourceLoader`]** runs the combined fetch a screen needs for one
//!   filter key. Loads are generation-tracked: a slow answer to an older key
//!   never overwrites a newer one.
//!
//! - **[`facet`]** derives sector/stage/tag facets from the loaded list and
//!   narrows it client-side.
//!
//! - **[`EntitySubResourceCache`]** lazily loads per-project investor matches,
//!   one independent state machine per project.
//!
//! - **[`ListingScreen`] / [`ProjectScreen`]** compose the above for the
//!   investors, projects, startups and news screens.

pub mod config;
pub mod error;
pub mod facet;
pub mod filter;
pub mod loader;
pub mod matches;
pub mod screen;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::HubConfig;
pub use error::CoreError;
pub use facet::{FacetDimension, FacetIndex, Faceted, SelectedFacets};
pub use filter::{FilterField, FilterState, FilterStore, Location, MemoryLocation, UrlCodec};
pub use loader::{Listing, LoadOutcome, LoadState, ResourceLoader, ScreenSource};
pub use matches::{
    EntitySubResourceCache, EntryStatus, HubMatchSource, MatchSource, SubResourceEntry,
};
pub use screen::{
    InvestorScreen, InvestorSource, ListingScreen, NewsScreen, NewsSource, ProjectScreen,
    ProjectSource,
};

// Domain types consumers need alongside the screens.
pub use cececo_api::{
    Country, HubClient, Investor, InvestorType, NewsItem, Project, ProjectKind, ScoredMatch,
};
