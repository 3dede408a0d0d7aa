// Country reference endpoints

use tracing::debug;

use crate::client::HubClient;
use crate::error::Error;
use crate::types::Country;

impl HubClient {
    /// List all countries, ordered by id.
    ///
    /// `GET /api/v1/countries`
    pub async fn list_countries(&self) -> Result<Vec<Country>, Error> {
        debug!("listing countries");
        self.get("countries", &[]).await
    }
}
