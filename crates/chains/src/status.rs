//! Campaign status lookup over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use common::{CampaignStatus, FundraiserError, StatusService};
use serde::Deserialize;
use tracing::debug;

/// Status document served by the campaign.
#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default = "default_started")]
    started: bool,
    #[serde(alias = "fundraiserEnded")]
    ended: bool,
}

fn default_started() -> bool {
    true
}

impl From<StatusResponse> for CampaignStatus {
    fn from(response: StatusResponse) -> Self {
        CampaignStatus {
            started: response.started,
            ended: response.ended,
        }
    }
}

/// Fetches [`CampaignStatus`] from a JSON endpoint.
pub struct HttpStatusService {
    url: String,
    client: reqwest::Client,
}

impl HttpStatusService {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FundraiserError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FundraiserError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait]
impl StatusService for HttpStatusService {
    async fn fetch_status(&self) -> Result<CampaignStatus, FundraiserError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FundraiserError::Status(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(FundraiserError::Status(format!(
                "Status endpoint returned {}",
                response.status()
            )));
        }

        let body: StatusResponse = response
            .json()
            .await
            .map_err(|e| FundraiserError::Status(format!("Invalid status document: {}", e)))?;

        let status = CampaignStatus::from(body);
        debug!("Campaign status: {:?}", status);
        Ok(status)
    }
}
