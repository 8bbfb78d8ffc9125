pub mod customers;
pub mod delivery;
pub mod orders;
pub mod status;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Json;
use axum::Router;
use roxmltree::Document;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::error::{AppError, ServiceError};
use crate::state::AppState;
use crate::store::{CUSTOMERS, ORDERS};
use crate::xml::Fragment;
use crate::xml::envelope::{XML_CONTENT_TYPE, wrap, wsdl_placeholder};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(customers::router())
        .merge(orders::router())
        .merge(status::router())
        .merge(delivery::router())
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub(crate) fn parse_document(body: &str) -> Result<Document<'_>, AppError> {
    Document::parse(body).map_err(|err| AppError::InvalidDocument(err.to_string()))
}

pub(crate) fn xml_response(status: StatusCode, body: String) -> Response {
    (status, [(CONTENT_TYPE, XML_CONTENT_TYPE)], body).into_response()
}

/// Renders a service outcome as `<{operation}_response>` inside the envelope.
///
/// Business failures still answer 200; the caller has to read `<status>`.
pub(crate) fn respond<T>(
    state: &AppState,
    endpoint: &'static str,
    operation: &'static str,
    started: Instant,
    result: Result<T, ServiceError>,
    render: impl FnOnce(Fragment, T) -> Fragment,
) -> Response {
    let fragment = Fragment::new(&format!("{operation}_response"), state.escape_xml_values);

    let (outcome, fragment) = match result {
        Ok(value) => ("success", render(fragment.field("status", "Success"), value)),
        Err(err) => {
            warn!(endpoint, operation, code = err.code(), error = %err, "request failed");
            (
                "error",
                fragment
                    .field("status", "Error")
                    .field("error_code", err.code())
                    .field("message", err),
            )
        }
    };

    state
        .metrics
        .record_request(endpoint, operation, outcome, started.elapsed().as_secs_f64());

    xml_response(StatusCode::OK, wrap(&fragment.finish()))
}

/// Counts a request that never reached a service.
pub(crate) fn rejected(state: &AppState, endpoint: &'static str, started: Instant) {
    state
        .metrics
        .record_request(endpoint, "none", "rejected", started.elapsed().as_secs_f64());
}

/// `GET` on a service path: placeholder WSDL when `?wsdl` is present.
pub(crate) fn describe(service: &str, query: &HashMap<String, String>) -> Response {
    if query.contains_key("wsdl") {
        xml_response(StatusCode::OK, wsdl_placeholder(service))
    } else {
        (StatusCode::OK, "SOAP Service").into_response()
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    districts: usize,
    packages: usize,
    customers: Option<usize>,
    orders: Option<usize>,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let customers = state.store.count(CUSTOMERS).await.ok();
    let orders = state.store.count(ORDERS).await.ok();

    Json(HealthResponse {
        status: if customers.is_some() && orders.is_some() {
            "ok"
        } else {
            "degraded"
        },
        districts: state.gazetteer.len(),
        packages: state.packages.len(),
        customers,
        orders,
    })
}

async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err).into_response(),
    }
}
