// Investor endpoints

use tracing::debug;

use crate::client::HubClient;
use crate::error::Error;
use crate::types::{CreateInvestorRequest, Investor, InvestorType};

/// Server-side filters for `GET /api/v1/investors`. `None` fields are
/// omitted from the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvestorQuery {
    /// Free-text search over name, sectors and stages.
    pub q: Option<String>,
    pub investor_type: Option<InvestorType>,
    pub country_id: Option<u32>,
}

impl InvestorQuery {
    pub(crate) fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("q", self.q.clone().unwrap_or_default()),
            (
                "investor_type",
                self.investor_type.map(|t| t.to_string()).unwrap_or_default(),
            ),
            (
                "country_id",
                self.country_id.map(|id| id.to_string()).unwrap_or_default(),
            ),
        ]
    }
}

impl HubClient {
    /// List investors matching `query`, ordered by name.
    ///
    /// `GET /api/v1/investors?q=&investor_type=&country_id=`
    pub async fn list_investors(&self, query: &InvestorQuery) -> Result<Vec<Investor>, Error> {
        debug!(?query, "listing investors");
        self.get("investors", &query.to_params()).await
    }

    /// Create an investor record.
    ///
    /// `POST /api/v1/investors`
    pub async fn create_investor(&self, req: &CreateInvestorRequest) -> Result<Investor, Error> {
        debug!(name = %req.name, "creating investor");
        self.post("investors", req).await
    }
}
