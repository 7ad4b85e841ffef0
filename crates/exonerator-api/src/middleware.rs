//! Layers applied to every route.
use axum::body::Body;
use axum::http::{Response, StatusCode};
use axum::response::IntoResponse;
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::TraceLayer;

/// Body of every 500 response; no detail reaches the client
pub const GENERAL_ERROR: &str = "General error.";

pub type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response<Body>;

pub fn trace() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
}

/// Turn a panic in a handler into the generic 500 page
pub fn catch_panic() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(general_error_on_panic as PanicHandler)
}

fn general_error_on_panic(panic: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(panic = %detail, "Request handler panicked");
    general_error()
}

pub fn general_error() -> Response<Body> {
    (StatusCode::INTERNAL_SERVER_ERROR, GENERAL_ERROR).into_response()
}
