use tracing::{debug, error, instrument};

use crate::fetch_error::FetchError;
use crate::model::{TimeSeriesItem, TimeSeriesResponse};

/// Client for the record time-series endpoint.
#[derive(Clone)]
pub struct TimeSeriesFetcher {
    client: reqwest::Client,
    api_base: String,
    site_id: String,
    topic: String,
}

impl TimeSeriesFetcher {
    pub fn new(
        client: reqwest::Client,
        api_base: String,
        site_id: String,
        topic: String,
    ) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            site_id,
            topic,
        }
    }

    /// `<api_base>/v3/alertdata/<site_id>/topics/<topic>/records/<record_code>/timeserie`
    pub fn timeseries_url(&self, record_code: &str) -> String {
        format!(
            "{}/v3/alertdata/{}/topics/{}/records/{}/timeserie",
            self.api_base, self.site_id, self.topic, record_code
        )
    }

    #[instrument(skip(self, token, record_code), fields(record_code = %record_code))]
    pub async fn fetch_items(
        &self,
        token: &str,
        record_code: &str,
    ) -> Result<Vec<TimeSeriesItem>, FetchError> {
        let url = self.timeseries_url(record_code);
        debug!("Sending HTTP request to {}", url);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        debug!("Received HTTP response with status: {}", status);
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                record_code: record_code.to_string(),
            });
        }

        let body = response.text().await?;
        debug!("Retrieved JSON content, size: {} bytes", body.len());

        Self::parse_items(&body)
    }

    fn parse_items(body: &str) -> Result<Vec<TimeSeriesItem>, FetchError> {
        serde_json::from_str::<TimeSeriesResponse>(body)
            .map(|response| response.items)
            .map_err(|e| {
                error!("Time series response is not valid JSON: {}", e);
                debug!(
                    "Body preview (first 500 chars): {}",
                    body.chars().take(500).collect::<String>()
                );
                FetchError::ParseError(e.to_string())
            })
    }
}
