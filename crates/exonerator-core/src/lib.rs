//! ExoneraTor Core: data model, configuration and error types
//!
//! Shared by the input validators, the lookup gateway, the outcome
//! resolver and the web front end.

pub mod config;
pub mod context;
pub mod data_model;
pub mod error;

pub use config::ExoneratorConfig;
pub use context::{Clock, RequestContext};
pub use data_model::{
    AddressFamily, CanonicalAddress, CoverageRange, ExitFlag, IpAddress, LookupData,
    LookupResult, MatchRecord, ValidatedDate, last_available_date, TOO_RECENT_DAYS,
};
pub use error::ConfigError;

/// Version reported by the health endpoint
pub const EXONERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");
