// News endpoints

use tracing::debug;

use crate::client::HubClient;
use crate::error::Error;
use crate::types::NewsPage;

/// Filters and paging for `GET /api/v1/news`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsQuery {
    pub country_id: Option<u32>,
    pub q: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl HubClient {
    /// One page of approved news items.
    ///
    /// `GET /api/v1/news?country_id=&q=&limit=&offset=`
    pub async fn list_news(&self, query: &NewsQuery) -> Result<NewsPage, Error> {
        debug!(?query, "listing news");
        let opt = |v: Option<u32>| v.map(|n| n.to_string()).unwrap_or_default();
        let params = [
            ("country_id", opt(query.country_id)),
            ("q", query.q.clone().unwrap_or_default()),
            ("limit", opt(query.limit)),
            ("offset", opt(query.offset)),
        ];
        self.get("news", &params).await
    }
}
