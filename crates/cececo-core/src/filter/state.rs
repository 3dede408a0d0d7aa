//! Filter field values shared by every listing screen.

use cececo_api::InvestorType;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// A user-editable filter. The snake_case name doubles as the query
/// parameter name; declaration order is the canonical serialisation order.
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
pub enum FilterField {
    Q,
    InvestorType,
    CountryId,
}

impl FilterField {
    /// Query parameter name.
    pub fn key(self) -> &'static str {
        self.into()
    }
}

/// Current filter values. Always normalised: text is trimmed, blank or
/// unparseable input is stored as "not filtering".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterState {
    q: Option<String>,
    investor_type: Option<InvestorType>,
    country_id: Option<u32>,
}

impl FilterState {
    pub fn q(&self) -> Option<&str> {
        self.q.as_deref()
    }

    pub fn investor_type(&self) -> Option<InvestorType> {
        self.investor_type
    }

    pub fn country_id(&self) -> Option<u32> {
        self.country_id
    }

    pub fn is_empty(&self) -> bool {
        self.q.is_none() && self.investor_type.is_none() && self.country_id.is_none()
    }

    /// Return a copy with `field` set from raw user input.
    pub fn with(&self, field: FilterField, raw: &str) -> Self {
        let mut next = self.clone();
        let raw = raw.trim();
        match field {
            FilterField::Q => next.q = (!raw.is_empty()).then(|| raw.to_owned()),
            FilterField::InvestorType => {
                next.investor_type = raw.to_ascii_lowercase().parse().ok();
            }
            FilterField::CountryId => next.country_id = raw.parse().ok(),
        }
        next
    }

    /// Return a copy with `field` cleared.
    pub fn without(&self, field: FilterField) -> Self {
        self.with(field, "")
    }

    /// Serialised value of `field`, `None` when it is not filtering.
    pub fn value(&self, field: FilterField) -> Option<String> {
        match field {
            FilterField::Q => self.q.clone(),
            FilterField::InvestorType => self.investor_type.map(|t| t.to_string()),
            FilterField::CountryId => self.country_id.map(|id| id.to_string()),
        }
    }
}
