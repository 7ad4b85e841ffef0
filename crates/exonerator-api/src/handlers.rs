//! HTTP handlers
use crate::service::{answer, AppState, ServiceError};
use axum::{
    extract::{OriginalUri, RawQuery, State},
    http::{header, HeaderMap, StatusCode},
    response::Html,
    Json,
};
use exonerator_core::EXONERATOR_VERSION;
use exonerator_in::QueryParams;
use serde_json::{json, Value};
use url::form_urlencoded;

/// The search page and its answers
pub async fn exonerator(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Result<Html<String>, ServiceError> {
    let params = QueryParams::from_pairs(
        form_urlencoded::parse(query.unwrap_or_default().as_bytes()).into_owned(),
    );
    let base_url = match &state.config.public_url {
        Some(url) => url.clone(),
        None => request_origin(&headers),
    };

    let page = answer(&state, &params, uri.path(), &base_url).await?;
    Ok(Html(page.html))
}

/// `http://{Host}` of the request, or empty without a usable Host header
fn request_origin(headers: &HeaderMap) -> String {
    headers
        .get(header::HOST)
        .and_then(|host| host.to_str().ok())
        .map(|host| format!("http://{}", host))
        .unwrap_or_default()
}

pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "version": EXONERATOR_VERSION })),
    )
}

pub async fn metrics(State(state): State<AppState>) -> Result<String, ServiceError> {
    Ok(state.metrics.encode()?)
}
