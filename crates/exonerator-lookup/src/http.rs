//! HTTP client for the backend's `query.json` endpoint.

use crate::response::QueryResponse;
use crate::{ConsensusBackend, LookupError};
use async_trait::async_trait;
use chrono::NaiveDate;
use exonerator_core::{ExoneratorConfig, IpAddress};
use reqwest::{Client, Url};
use std::time::Duration;

/// Backend reached over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    query_url: Url,
}

impl HttpBackend {
    /// Create a client for `{base_url}/query.json`
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, LookupError> {
        let query_url = format!("{}/query.json", base_url.as_str().trim_end_matches('/'));
        let query_url = Url::parse(&query_url).map_err(|e| LookupError::Setup(e.to_string()))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::Setup(e.to_string()))?;
        Ok(Self { client, query_url })
    }

    pub fn from_config(config: &ExoneratorConfig) -> Result<Self, LookupError> {
        Self::new(&config.backend_url, config.backend_timeout)
    }

    pub fn query_url(&self) -> &Url {
        &self.query_url
    }
}

#[async_trait]
impl ConsensusBackend for HttpBackend {
    async fn query(
        &self,
        address: &IpAddress,
        date: NaiveDate,
    ) -> Result<QueryResponse, LookupError> {
        let timestamp = date.format("%Y-%m-%d").to_string();
        let response = self
            .client
            .get(self.query_url.clone())
            .query(&[("ip", address.expanded()), ("timestamp", timestamp)])
            .send()
            .await
            .map_err(LookupError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(LookupError::from_transport)?;
        QueryResponse::from_slice(&body).map_err(|e| LookupError::Decode(e.to_string()))
    }
}
