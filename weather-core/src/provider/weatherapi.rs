use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url, header::ACCEPT};
use std::fmt;
use tracing::{debug, instrument};

use crate::{
    config::Config,
    error::QueryError,
    model::{ApiErrorResponse, WeatherPayload, WeatherQueryResult},
};

use super::WeatherClient;

/// Client for the WeatherAPI.com current-conditions endpoint.
#[derive(Clone)]
pub struct WeatherApiClient {
    api_key: String,
    endpoint: String,
    http: Client,
}

impl WeatherApiClient {
    pub fn new(api_key: String) -> Self {
        Self::with_endpoint(api_key, crate::config::DEFAULT_ENDPOINT.to_string())
    }

    pub fn with_endpoint(api_key: String, endpoint: String) -> Self {
        Self { api_key, endpoint, http: Client::new() }
    }

    /// Construct a client from the stored config.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.api_key().ok_or_else(|| {
            anyhow!(
                "No API key configured.\n\
                 Hint: run `weather configure` and enter your WeatherAPI.com key."
            )
        })?;

        Ok(Self::with_endpoint(api_key.to_owned(), config.endpoint().to_owned()))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

// The API key stays out of logs and panics.
impl fmt::Debug for WeatherApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherApiClient").field("endpoint", &self.endpoint).finish_non_exhaustive()
    }
}

#[async_trait]
impl WeatherClient for WeatherApiClient {
    #[instrument(skip(self), level = "debug")]
    async fn perform_query(&self, term: &str) -> Result<WeatherQueryResult, QueryError> {
        let url = Url::parse(&self.endpoint).map_err(|e| QueryError::InvalidUrl {
            url: self.endpoint.clone(),
            reason: e.to_string(),
        })?;

        let res = self
            .http
            .get(url)
            .query(&[("q", term), ("key", self.api_key.as_str())])
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = res.status();
        let body = res.bytes().await?;

        if status == StatusCode::OK {
            let payload: WeatherPayload = serde_json::from_slice(&body)?;
            debug!("weather query succeeded");
            return Ok(WeatherQueryResult::Success(payload));
        }

        let parsed: ApiErrorResponse = serde_json::from_slice(&body)?;
        let failure = parsed.error.unwrap_or_default();
        debug!(%status, code = ?failure.code, "weather service returned an error body");

        Ok(WeatherQueryResult::Failure(failure))
    }
}
