//! ExoneraTor-OUT: outcome to HTML page renderer
//!
//! Renders an [`OutcomeState`](exonerator_outcome::OutcomeState) into a
//! complete HTML page: search form, summary panel, technical details,
//! permanent link and footer. Layout lives in a YAML templates file,
//! wording in one YAML string table per language.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use exonerator_out::{PageContext, PageRenderer};
//! use exonerator_outcome::{OutcomeState, QueryEcho};
//!
//! let renderer = PageRenderer::embedded().unwrap();
//! let ctx = PageContext {
//!     lang: "en".to_string(),
//!     path: "/".to_string(),
//!     base_url: "https://exonerator.example".to_string(),
//!     today: NaiveDate::from_ymd_opt(2021, 3, 10).unwrap(),
//!     echo: QueryEcho::default(),
//! };
//! let html = renderer.render(&OutcomeState::MissingDate, &ctx).unwrap();
//! assert!(html.contains("No date parameter given"));
//! ```

pub mod locale;
pub mod renderer;
pub mod templates;

pub use locale::{LocaleSet, LocaleTable};
pub use renderer::{escape_html, PageContext, PageRenderer};
pub use templates::{Template, TemplatesFile};

use thiserror::Error;

/// Errors that can occur while loading or rendering pages
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template load failed: {0}")]
    Template(String),
    #[error("Locale load failed: {0}")]
    Locale(String),
    #[error("Render failed: {0}")]
    Render(String),
}
