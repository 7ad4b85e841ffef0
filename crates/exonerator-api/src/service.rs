//! Request orchestration: validate, look up, resolve, render.

use crate::metrics::Metrics;
use crate::middleware::general_error;
use axum::response::{IntoResponse, Response};
use exonerator_core::{ExoneratorConfig, LookupResult, RequestContext};
use exonerator_in::{parse_query, QueryParams};
use exonerator_lookup::{lookup_if_queryable, ConsensusBackend, HttpBackend, LookupError};
use exonerator_out::{PageContext, PageRenderer, RenderError};
use exonerator_outcome::{resolve, OutcomeKind, QueryEcho};
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by the web service
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("SERVICE/RENDER: {0}")]
    Render(#[from] RenderError),

    #[error("SERVICE/BACKEND: {0}")]
    Backend(#[from] LookupError),

    #[error("SERVICE/METRICS: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("SERVICE/IO: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");
        general_error()
    }
}

/// Shared, read-only service state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ExoneratorConfig>,
    pub backend: Arc<dyn ConsensusBackend>,
    pub renderer: Arc<PageRenderer>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(
        config: ExoneratorConfig,
        backend: Arc<dyn ConsensusBackend>,
        renderer: PageRenderer,
    ) -> Result<Self, ServiceError> {
        Ok(Self {
            config: Arc::new(config),
            backend,
            renderer: Arc::new(renderer),
            metrics: Arc::new(Metrics::new()?),
        })
    }

    /// HTTP backend and string tables as configured
    pub fn from_config(config: ExoneratorConfig) -> Result<Self, ServiceError> {
        let backend = HttpBackend::from_config(&config)?;
        tracing::info!(backend = %backend.query_url(), "Consensus backend configured");
        let renderer = PageRenderer::from_config(&config)?;
        Self::new(config, Arc::new(backend), renderer)
    }
}

/// A rendered answer page
#[derive(Debug, Clone)]
pub struct Page {
    pub kind: OutcomeKind,
    pub html: String,
}

/// Answer one query.
///
/// `path` is the request path used for relative links; `base_url` the
/// absolute origin used for the permanent link.
pub async fn answer(
    state: &AppState,
    params: &QueryParams,
    path: &str,
    base_url: &str,
) -> Result<Page, ServiceError> {
    let lang = state.config.select_language(params.lang.as_deref()).to_string();
    let ctx = RequestContext::new(lang, &state.config.clock);

    let parsed = parse_query(params, ctx.today);
    let lookup = lookup_if_queryable(state.backend.as_ref(), &parsed.address, &parsed.date).await;
    if matches!(lookup, Some(LookupResult::Unreachable)) {
        state.metrics.record_backend_failure();
    }

    let outcome = resolve(&parsed.address, &parsed.date, lookup.as_ref(), ctx.today);
    let kind = outcome.kind();
    state.metrics.record_outcome(kind);
    tracing::info!(
        trace_id = %ctx.trace_id,
        lang = %ctx.lang,
        outcome = %kind,
        looked_up = lookup.is_some(),
        "Resolved query"
    );

    let page = PageContext {
        lang: ctx.lang,
        path: path.to_string(),
        base_url: base_url.to_string(),
        today: ctx.today,
        echo: QueryEcho::from_inputs(&parsed.address, &parsed.date),
    };
    let html = state.renderer.render(&outcome, &page)?;

    Ok(Page { kind, html })
}
