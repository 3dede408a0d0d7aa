//! Response and request types for the hub REST API (`/api/v1/`).
//!
//! Field names follow the server's snake_case JSON. Optional fields use
//! `#[serde(default)]` so older server builds that omit them still decode.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

// ── Countries ────────────────────────────────────────────────────────

/// Country reference record from `GET /api/v1/countries`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: u32,
    pub name: String,
    pub iso2: String,
    #[serde(default)]
    pub region: Option<String>,
}

/// Compact country embedded in investor records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryMini {
    pub id: u32,
    pub name: String,
    pub iso2: String,
}

// ── Investors ────────────────────────────────────────────────────────

/// Investor category, sent as the `investor_type` query parameter.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InvestorType {
    Fund,
    Angel,
    Corporate,
    Public,
    Ngo,
}

/// Investor record from `GET /api/v1/investors`.
///
/// `focus_sectors` and `stages` are comma-separated tag lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investor {
    pub id: u32,
    pub name: String,
    /// Raw category string; see [`Investor::kind`] for the typed view.
    pub investor_type: String,
    #[serde(default)]
    pub focus_sectors: Option<String>,
    #[serde(default)]
    pub stages: Option<String>,
    #[serde(default)]
    pub ticket_min: Option<i64>,
    #[serde(default)]
    pub ticket_max: Option<i64>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub countries: Vec<CountryMini>,
    #[serde(default, deserialize_with = "de_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Investor {
    /// Typed category, `None` if the server sent a value this client
    /// does not know about.
    pub fn kind(&self) -> Option<InvestorType> {
        self.investor_type.parse().ok()
    }
}

/// Body for `POST /api/v1/investors`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInvestorRequest {
    pub name: String,
    pub investor_type: InvestorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus_sectors: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stages: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_max: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub country_ids: Vec<u32>,
}

// ── Projects ─────────────────────────────────────────────────────────

/// Listing kind, sent as the `kind` query parameter.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProjectKind {
    #[default]
    Project,
    Startup,
}

/// Project or startup record from `GET /api/v1/projects`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u32,
    pub kind: ProjectKind,
    pub country_id: u32,
    #[serde(default)]
    pub country: Option<Country>,
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "de_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body for `POST /api/v1/projects`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    pub kind: ProjectKind,
    pub country_id: u32,
    pub title: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

// ── Matches ──────────────────────────────────────────────────────────

/// Investor payload embedded in a match. Same shape as [`Investor`]
/// minus the timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedInvestor {
    pub id: u32,
    pub name: String,
    pub investor_type: String,
    #[serde(default)]
    pub focus_sectors: Option<String>,
    #[serde(default)]
    pub stages: Option<String>,
    #[serde(default)]
    pub ticket_min: Option<i64>,
    #[serde(default)]
    pub ticket_max: Option<i64>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub countries: Vec<CountryMini>,
}

/// One labelled contribution to a match score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasonPoint {
    pub label: String,
    #[serde(default)]
    pub points: Option<f64>,
}

/// Scored match from `GET /api/v1/projects/{id}/matches`.
///
/// Opaque to the client beyond display: it is stored and sliced, never
/// re-ranked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMatch {
    pub investor: MatchedInvestor,
    #[serde(default)]
    pub score: f64,
    /// Normalised 0..100 score.
    #[serde(default)]
    pub score_100: Option<f64>,
    #[serde(default)]
    pub why: Option<String>,
    #[serde(default)]
    pub reasons: Vec<String>,
    #[serde(default)]
    pub reason_points: Vec<ReasonPoint>,
    #[serde(default)]
    pub score_breakdown: Option<Value>,
}

impl ScoredMatch {
    /// Labels to show for this match: the point-annotated reasons when
    /// present, else the plain reason strings.
    pub fn reason_labels(&self) -> Vec<String> {
        if self.reason_points.is_empty() {
            return self.reasons.clone();
        }
        self.reason_points
            .iter()
            .map(|rp| match rp.points {
                Some(p) => format!("{} (+{p})", rp.label),
                None => rp.label.clone(),
            })
            .collect()
    }
}

// ── News ─────────────────────────────────────────────────────────────

/// News item in `GET /api/v1/news`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: u32,
    #[serde(default)]
    pub country_id: Option<u32>,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub country_iso2: Option<String>,
    #[serde(default)]
    pub impact_type: Option<String>,
    #[serde(default)]
    pub impact_score: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    /// Comma-separated tags.
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub source_name: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default, deserialize_with = "de_timestamp")]
    pub published_at: Option<DateTime<Utc>>,
}

/// Paginated news envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsPage {
    pub items: Vec<NewsItem>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub has_more: bool,
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Accept RFC 3339 timestamps and the naive ISO form the server emits
/// for timezone-less columns (interpreted as UTC).
fn de_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Some(naive.and_utc()))
        .map_err(serde::de::Error::custom)
}
