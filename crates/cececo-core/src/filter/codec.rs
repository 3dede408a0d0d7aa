//! Query-string encoding of [`FilterState`].

use strum::IntoEnumIterator;
use url::form_urlencoded;

use super::state::{FilterField, FilterState};

/// Serialises and parses the filter fields a screen exposes.
///
/// Only the configured fields are read or written; everything else in a
/// query string belongs to somebody else and is left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlCodec {
    fields: &'static [FilterField],
}

impl UrlCodec {
    pub const fn new(fields: &'static [FilterField]) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &'static [FilterField] {
        self.fields
    }

    pub fn handles(&self, field: FilterField) -> bool {
        self.fields.contains(&field)
    }

    /// Canonical query string (no leading `?`). Fields appear in
    /// [`FilterField`] declaration order; absent fields are omitted.
    pub fn serialize(&self, state: &FilterState) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        for (field, value) in self.present(state) {
            out.append_pair(field.key(), &value);
        }
        out.finish()
    }

    /// Parse a query string (leading `?` optional). Unknown parameters are
    /// ignored, malformed values yield absent fields, and the first
    /// occurrence of a repeated parameter wins.
    pub fn parse(&self, query: &str) -> FilterState {
        let mut state = FilterState::default();
        let mut seen = Vec::with_capacity(self.fields.len());
        for (key, value) in form_urlencoded::parse(strip_question(query).as_bytes()) {
            let Ok(field) = key.parse::<FilterField>() else {
                continue;
            };
            if !self.handles(field) || seen.contains(&field) {
                continue;
            }
            seen.push(field);
            state = state.with(field, &value);
        }
        state
    }

    /// Rewrite `existing` so its filter parameters match `state`, keeping
    /// every unrelated parameter in its original position.
    pub fn merge_into(&self, existing: &str, state: &FilterState) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        for (key, value) in form_urlencoded::parse(strip_question(existing).as_bytes()) {
            if !self.owns_key(&key) {
                out.append_pair(&key, &value);
            }
        }
        for (field, value) in self.present(state) {
            out.append_pair(field.key(), &value);
        }
        out.finish()
    }

    fn present(&self, state: &FilterState) -> Vec<(FilterField, String)> {
        FilterField::iter()
            .filter(|f| self.handles(*f))
            .filter_map(|f| state.value(f).map(|v| (f, v)))
            .collect()
    }

    fn owns_key(&self, key: &str) -> bool {
        key.parse::<FilterField>()
            .is_ok_and(|field| self.handles(field))
    }
}

fn strip_question(query: &str) -> &str {
    query.strip_prefix('?').unwrap_or(query)
}
