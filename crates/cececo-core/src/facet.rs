//! Facet extraction and client-side facet filtering.
//!
//! Facets are derived from the loaded list, never from the server: each
//! dimension maps to a comma-separated field on the item. Selections narrow
//! the already server-filtered list with OR inside a dimension and AND
//! across dimensions.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use cececo_api::{Investor, NewsItem, Project};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum FacetDimension {
    Sector,
    Stage,
    Tag,
}

/// An item with delimited multi-value fields.
pub trait Faceted {
    /// Raw (still delimited) value for `dimension`, if the item has one.
    fn facet_raw(&self, dimension: FacetDimension) -> Option<&str>;
}

impl Faceted for Investor {
    fn facet_raw(&self, dimension: FacetDimension) -> Option<&str> {
        match dimension {
            FacetDimension::Sector => self.focus_sectors.as_deref(),
            FacetDimension::Stage => self.stages.as_deref(),
            FacetDimension::Tag => None,
        }
    }
}

impl Faceted for Project {
    fn facet_raw(&self, dimension: FacetDimension) -> Option<&str> {
        match dimension {
            FacetDimension::Sector => self.sector.as_deref(),
            FacetDimension::Stage => self.stage.as_deref(),
            FacetDimension::Tag => None,
        }
    }
}

impl Faceted for NewsItem {
    fn facet_raw(&self, dimension: FacetDimension) -> Option<&str> {
        match dimension {
            FacetDimension::Tag => self.tags.as_deref(),
            FacetDimension::Sector | FacetDimension::Stage => None,
        }
    }
}

/// Split a delimited field into trimmed, non-empty tags.
pub fn split_tags(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|t| !t.is_empty())
}

/// Case-insensitive tag equality, Unicode-aware like the stored selections.
pub fn same_tag(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

fn tags_of<T: Faceted>(item: &T, dimension: FacetDimension) -> impl Iterator<Item = &str> {
    item.facet_raw(dimension).into_iter().flat_map(split_tags)
}

// ── Extraction ───────────────────────────────────────────────────────

/// Distinct tag values of `dimension` across `items`, sorted.
pub fn extract<T: Faceted>(items: &[T], dimension: FacetDimension) -> Vec<String> {
    let distinct: HashSet<&str> = items.iter().flat_map(|i| tags_of(i, dimension)).collect();
    let mut values: Vec<String> = distinct.into_iter().map(str::to_owned).collect();
    values.sort_unstable();
    values
}

/// Facet sets for several dimensions, recomputed whenever the list changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetIndex {
    sets: BTreeMap<FacetDimension, Vec<String>>,
}

impl FacetIndex {
    pub fn build<T: Faceted>(items: &[T], dimensions: &[FacetDimension]) -> Self {
        let sets = dimensions
            .iter()
            .map(|&d| (d, extract(items, d)))
            .collect();
        Self { sets }
    }

    pub fn values(&self, dimension: FacetDimension) -> &[String] {
        self.sets.get(&dimension).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn dimensions(&self) -> impl Iterator<Item = FacetDimension> + '_ {
        self.sets.keys().copied()
    }

    fn contains(&self, dimension: FacetDimension, value: &str) -> bool {
        self.values(dimension).iter().any(|v| same_tag(v, value))
    }
}

// ── Selection ────────────────────────────────────────────────────────

/// Chosen facet values per dimension. Held by the screen, never written to
/// the location. Values are stored lower-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedFacets {
    by_dimension: BTreeMap<FacetDimension, BTreeSet<String>>,
}

impl SelectedFacets {
    pub fn is_empty(&self) -> bool {
        self.by_dimension.values().all(BTreeSet::is_empty)
    }

    pub fn select(&mut self, dimension: FacetDimension, value: &str) {
        let value = value.trim().to_lowercase();
        if !value.is_empty() {
            self.by_dimension.entry(dimension).or_default().insert(value);
        }
    }

    pub fn deselect(&mut self, dimension: FacetDimension, value: &str) {
        if let Some(set) = self.by_dimension.get_mut(&dimension) {
            set.remove(&value.trim().to_lowercase());
        }
    }

    /// Flip one value. Returns `true` if it is now selected.
    pub fn toggle(&mut self, dimension: FacetDimension, value: &str) -> bool {
        if self.is_selected(dimension, value) {
            self.deselect(dimension, value);
            false
        } else {
            self.select(dimension, value);
            true
        }
    }

    pub fn is_selected(&self, dimension: FacetDimension, value: &str) -> bool {
        self.by_dimension
            .get(&dimension)
            .is_some_and(|set| set.contains(&value.trim().to_lowercase()))
    }

    pub fn values(&self, dimension: FacetDimension) -> impl Iterator<Item = &str> {
        self.by_dimension
            .get(&dimension)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.by_dimension.clear();
    }

    /// Drop selections that no longer occur in `index` after a reload.
    /// Returns `true` if anything was dropped.
    pub fn retain_available(&mut self, index: &FacetIndex) -> bool {
        let mut dropped = false;
        for (&dimension, set) in &mut self.by_dimension {
            let before = set.len();
            set.retain(|v| index.contains(dimension, v));
            dropped |= set.len() != before;
        }
        dropped
    }

    /// Whether `item` satisfies every non-empty dimension.
    pub fn matches<T: Faceted>(&self, item: &T) -> bool {
        self.by_dimension
            .iter()
            .filter(|(_, wanted)| !wanted.is_empty())
            .all(|(&dimension, wanted)| {
                tags_of(item, dimension).any(|tag| wanted.contains(&tag.to_lowercase()))
            })
    }
}

/// Items passing `selected`, in their original order.
pub fn apply<T: Faceted + Clone>(items: &[T], selected: &SelectedFacets) -> Vec<T> {
    if selected.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| selected.matches(*item))
        .cloned()
        .collect()
}
