// Project / startup endpoints, including per-project investor matches

use tracing::debug;

use crate::client::HubClient;
use crate::error::Error;
use crate::types::{CreateProjectRequest, Project, ProjectKind, ScoredMatch};

/// Server-side filters for `GET /api/v1/projects`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectQuery {
    pub kind: ProjectKind,
    pub country_id: Option<u32>,
    /// Free-text search over title and summary.
    pub q: Option<String>,
}

impl ProjectQuery {
    pub(crate) fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("kind", self.kind.to_string()),
            (
                "country_id",
                self.country_id.map(|id| id.to_string()).unwrap_or_default(),
            ),
            ("q", self.q.clone().unwrap_or_default()),
        ]
    }
}

/// Parameters for `GET /api/v1/projects/{id}/matches`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchQuery {
    /// Only return investors that support the project's country.
    pub strict_country: bool,
    /// Server caps this at 50.
    pub limit: Option<u32>,
}

impl MatchQuery {
    pub fn strict(strict_country: bool) -> Self {
        Self {
            strict_country,
            limit: None,
        }
    }
}

impl HubClient {
    /// List projects or startups matching `query`, newest first.
    ///
    /// `GET /api/v1/projects?kind=&country_id=&q=`
    pub async fn list_projects(&self, query: &ProjectQuery) -> Result<Vec<Project>, Error> {
        debug!(?query, "listing projects");
        self.get("projects", &query.to_params()).await
    }

    /// Ranked investor matches for one project.
    ///
    /// `GET /api/v1/projects/{id}/matches?strict_country=&limit=`
    pub async fn project_matches(
        &self,
        project_id: u32,
        query: MatchQuery,
    ) -> Result<Vec<ScoredMatch>, Error> {
        debug!(project_id, strict = query.strict_country, "fetching matches");
        let params = [
            ("strict_country", query.strict_country.to_string()),
            (
                "limit",
                query.limit.map(|l| l.to_string()).unwrap_or_default(),
            ),
        ];
        self.get(&format!("projects/{project_id}/matches"), &params)
            .await
    }

    /// Create a project or startup.
    ///
    /// `POST /api/v1/projects`
    pub async fn create_project(&self, req: &CreateProjectRequest) -> Result<Project, Error> {
        debug!(title = %req.title, kind = %req.kind, "creating project");
        self.post("projects", req).await
    }
}
