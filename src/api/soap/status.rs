use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::response::Response;
use axum::routing::post;
use axum::Router;

use super::orders::order_fragment;
use super::{parse_document, rejected, respond};
use crate::error::AppError;
use crate::services::orders;
use crate::state::AppState;
use crate::xml::extract::extract_child_field;
use crate::xml::{Operation, extract_field, find_operation};

const ENDPOINT: &str = "updateOrderStatus";

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/updateOrderStatus", post(update_order_status))
}

/// Optional wrapping element; the endpoint accepts bare fields as well.
#[derive(Debug, Clone, Copy)]
struct UpdateOrderStatus;

impl Operation for UpdateOrderStatus {
    fn from_local_name(name: &str) -> Option<Self> {
        (name == "update_order_status").then_some(UpdateOrderStatus)
    }

    fn name(self) -> &'static str {
        "update_order_status"
    }
}

fn parse_fields(body: &str) -> Result<(Option<String>, Option<String>), AppError> {
    let doc = parse_document(body)?;
    let root = doc.root();

    let field = |name: &str| match find_operation::<UpdateOrderStatus>(&doc) {
        Some((_, wrapper)) => {
            extract_child_field(wrapper, name).or_else(|| extract_field(root, name))
        }
        None => extract_field(root, name),
    };

    Ok((field("orderID"), field("status")))
}

async fn update_order_status(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Response, AppError> {
    let started = Instant::now();
    let (order_id, status) =
        parse_fields(&body).inspect_err(|_| rejected(&state, ENDPOINT, started))?;

    let result = orders::update_order_status(state.store.as_ref(), order_id, status).await;

    Ok(respond(
        &state,
        ENDPOINT,
        UpdateOrderStatus.name(),
        started,
        result,
        |f, order| order_fragment(f, &order),
    ))
}
