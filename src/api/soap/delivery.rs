use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::response::Response;
use axum::routing::post;
use axum::Router;

use super::{parse_document, rejected, respond};
use crate::error::AppError;
use crate::services::delivery;
use crate::state::AppState;
use crate::xml::extract_field;

const ENDPOINT: &str = "deliveryLocation";
const OPERATION: &str = "get_delivery_location";

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/deliveryLocation", post(delivery_location))
}

async fn delivery_location(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Response, AppError> {
    let started = Instant::now();
    let order_id = parse_document(&body)
        .map(|doc| extract_field(doc.root(), "orderID"))
        .inspect_err(|_| rejected(&state, ENDPOINT, started))?;

    let result = delivery::delivery_location(state.store.as_ref(), order_id).await;

    Ok(respond(&state, ENDPOINT, OPERATION, started, result, |f, joined| {
        let location = &joined.location;
        f.field("orderID", &joined.order.order_id)
            .field("order_status", &joined.order.status)
            .field("customerID", &joined.customer.customer_id)
            .field("customer_name", &joined.customer.name)
            .field("phone", &joined.customer.phone)
            .optional("address", location.address.as_ref())
            .optional("latitude", location.latitude)
            .optional("longitude", location.longitude)
    }))
}
