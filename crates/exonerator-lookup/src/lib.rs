//! ExoneraTor Lookup: gateway to the consensus database service
//!
//! Performs exactly one round trip per request. Every failure (transport,
//! timeout, HTTP status, undecodable body) is reported as
//! [`LookupResult::Unreachable`]; nothing is retried or cached.

pub mod http;
pub mod response;

pub use http::HttpBackend;
pub use response::QueryResponse;

use async_trait::async_trait;
use chrono::NaiveDate;
use exonerator_core::{CanonicalAddress, IpAddress, LookupResult, ValidatedDate};
use thiserror::Error;

/// Errors talking to the backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("LOOKUP/SETUP: {0}")]
    Setup(String),

    #[error("LOOKUP/TRANSPORT: {0}")]
    Transport(String),

    #[error("LOOKUP/TIMEOUT")]
    Timeout,

    #[error("LOOKUP/STATUS: backend answered with HTTP {0}")]
    Status(u16),

    #[error("LOOKUP/DECODE: {0}")]
    Decode(String),
}

impl LookupError {
    fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            LookupError::Timeout
        } else {
            LookupError::Transport(error.to_string())
        }
    }
}

/// Source of consensus lookups
#[async_trait]
pub trait ConsensusBackend: Send + Sync {
    /// Query relay-consensus entries for `address` around `date`
    async fn query(&self, address: &IpAddress, date: NaiveDate)
        -> Result<QueryResponse, LookupError>;
}

/// The address and date to look up, if both are usable.
///
/// This is the only combination for which the backend may be queried:
/// a valid address and a valid date that is not too recent.
pub fn lookup_inputs<'a>(
    address: &'a CanonicalAddress,
    date: &ValidatedDate,
) -> Option<(&'a IpAddress, NaiveDate)> {
    Some((address.as_valid()?, date.queryable()?))
}

/// Query the backend once and map the answer into a [`LookupResult`]
pub async fn lookup(
    backend: &dyn ConsensusBackend,
    address: &IpAddress,
    date: NaiveDate,
) -> LookupResult {
    match backend.query(address, date).await {
        Ok(response) => LookupResult::Reachable(response.into_lookup_data()),
        Err(e) => {
            tracing::error!(error = %e, "Backend query failed");
            LookupResult::Unreachable
        }
    }
}

/// Run [`lookup`] if [`lookup_inputs`] allows it
pub async fn lookup_if_queryable(
    backend: &dyn ConsensusBackend,
    address: &CanonicalAddress,
    date: &ValidatedDate,
) -> Option<LookupResult> {
    let (address, date) = lookup_inputs(address, date)?;
    Some(lookup(backend, address, date).await)
}
