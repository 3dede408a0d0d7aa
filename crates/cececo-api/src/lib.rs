// cececo-api: Async Rust client for the CECECO hub directory API

pub mod client;
pub mod countries;
pub mod error;
pub mod investors;
pub mod news;
pub mod projects;
pub mod transport;
pub mod types;

pub use client::HubClient;
pub use error::Error;
pub use investors::InvestorQuery;
pub use news::NewsQuery;
pub use projects::{MatchQuery, ProjectQuery};
pub use transport::TransportConfig;
pub use types::{
    Country, CountryMini, CreateInvestorRequest, CreateProjectRequest, Investor, InvestorType,
    MatchedInvestor, NewsItem, NewsPage, Project, ProjectKind, ReasonPoint, ScoredMatch,
};
