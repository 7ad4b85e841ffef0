//! Request Context: per-request values threaded through the pipeline
use chrono::{NaiveDate, Utc};

/// Source of "today" for date validation and resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clock {
    /// Current UTC date
    #[default]
    System,
    /// A fixed date, for tests and reproducible runs
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System => Utc::now().date_naive(),
            Clock::Fixed(date) => *date,
        }
    }
}

/// Values fixed for the lifetime of one request
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub trace_id: String,
    /// Selected language tag
    pub lang: String,
    /// "Today" in UTC, read once per request
    pub today: NaiveDate,
}

impl RequestContext {
    pub fn new(lang: String, clock: &Clock) -> Self {
        Self {
            trace_id: uuid::Uuid::new_v4().to_string(),
            lang,
            today: clock.today(),
        }
    }
}
