//! HTTP parameter endpoint source.
//!
//! Issues `GET <endpoint>?id=<line>` and expects a JSON array of readings.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use super::{FetchError, ParamsSource};
use crate::config::ConfigError;
use crate::data::Reading;
use crate::lines::LineId;

/// A source that polls the remote parameter endpoint.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    endpoint: Url,
    description: String,
}

impl HttpSource {
    /// Create a source for `endpoint` using the transport's default timeout.
    pub fn new(endpoint: &str) -> Result<Self, ConfigError> {
        Self::with_timeout(endpoint, None)
    }

    /// Create a source that gives up on a request after `timeout`.
    pub fn with_timeout(endpoint: &str, timeout: Option<Duration>) -> Result<Self, ConfigError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| ConfigError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ConfigError::InvalidEndpoint(e.to_string()))?;

        let description = format!("http: {}", endpoint);
        Ok(Self {
            client,
            endpoint,
            description,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ParamsSource for HttpSource {
    async fn fetch(&self, line: LineId) -> Result<Vec<Reading>, FetchError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("id", line)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let readings: Vec<Reading> = response
            .json()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))?;

        Ok(readings)
    }

    fn description(&self) -> &str {
        &self.description
    }
}
