use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Query, State};
use axum::response::Response;
use axum::routing::post;
use axum::Router;

use super::{describe, parse_document, rejected, respond};
use crate::error::AppError;
use crate::models::customer::Customer;
use crate::services::customers::{self, CreatedCustomer, NewCustomer};
use crate::state::AppState;
use crate::xml::{Fragment, Operation, extract_field, find_operation};

const ENDPOINT: &str = "customerService";

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/customerService", post(customer_service).get(describe_service))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerOperation {
    CreateCustomer,
    GetCustomer,
}

impl Operation for CustomerOperation {
    fn from_local_name(name: &str) -> Option<Self> {
        match name {
            "create_customer" => Some(CustomerOperation::CreateCustomer),
            "get_customer" => Some(CustomerOperation::GetCustomer),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            CustomerOperation::CreateCustomer => "create_customer",
            CustomerOperation::GetCustomer => "get_customer",
        }
    }
}

enum CustomerCall {
    Create(NewCustomer),
    Get { customer_id: Option<String> },
}

fn parse_call(body: &str) -> Result<(CustomerOperation, CustomerCall), AppError> {
    let doc = parse_document(body)?;
    let (operation, _) =
        find_operation::<CustomerOperation>(&doc).ok_or(AppError::UnknownOperation)?;
    let root = doc.root();

    let call = match operation {
        CustomerOperation::CreateCustomer => CustomerCall::Create(NewCustomer {
            firebase_uid: extract_field(root, "firebaseUID"),
            name: extract_field(root, "name"),
            email: extract_field(root, "email"),
            phone: extract_field(root, "phone"),
            address: extract_field(root, "address"),
            latitude: extract_field(root, "latitude"),
            longitude: extract_field(root, "longitude"),
        }),
        CustomerOperation::GetCustomer => CustomerCall::Get {
            customer_id: extract_field(root, "customer_id"),
        },
    };

    Ok((operation, call))
}

async fn customer_service(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Response, AppError> {
    let started = Instant::now();
    let (operation, call) = parse_call(&body).inspect_err(|_| rejected(&state, ENDPOINT, started))?;

    let response = match call {
        CustomerCall::Create(input) => {
            let result =
                customers::create_customer(state.store.as_ref(), &state.gazetteer, input).await;

            if let Ok(created) = &result {
                let label = created
                    .location
                    .matched
                    .as_ref()
                    .map(|hit| hit.match_type.as_str())
                    .unwrap_or("none");
                if created.location.address.is_some() {
                    state
                        .metrics
                        .location_resolutions_total
                        .with_label_values(&[label])
                        .inc();
                }
            }

            respond(&state, ENDPOINT, operation.name(), started, result, render_created)
        }
        CustomerCall::Get { customer_id } => {
            let result = customers::get_customer(state.store.as_ref(), customer_id).await;
            respond(&state, ENDPOINT, operation.name(), started, result, |f, customer| {
                customer_fragment(f, &customer)
            })
        }
    };

    Ok(response)
}

async fn describe_service(Query(query): Query<HashMap<String, String>>) -> Response {
    describe("CustomerService", &query)
}

fn render_created(fragment: Fragment, created: CreatedCustomer) -> Fragment {
    let fragment = customer_fragment(fragment, &created.customer);
    let location = created.location;

    if location.address.is_none() {
        return fragment;
    }

    let fragment = fragment.open("location_detection");
    let fragment = match &location.matched {
        Some(hit) => fragment
            .field("district", &hit.district_name)
            .field("match_type", hit.match_type)
            .field("matched_text", &hit.matched_text),
        None => fragment.field("match_type", "none"),
    };

    fragment
        .field("auto_detected", location.auto_detected)
        .field("overridden", location.overridden)
        .close()
}

pub(crate) fn customer_fragment(fragment: Fragment, customer: &Customer) -> Fragment {
    let location = &customer.current_location;

    fragment
        .open("customer")
        .field("customerID", &customer.customer_id)
        .field("firebaseUID", &customer.firebase_uid)
        .field("name", &customer.name)
        .field("email", &customer.email)
        .field("phone", &customer.phone)
        .field("role", &customer.role)
        .open("currentLocation")
        .optional("address", location.address.as_ref())
        .optional("latitude", location.latitude)
        .optional("longitude", location.longitude)
        .close()
        .field("createdAt", customer.created_at.to_rfc3339())
        .field("updatedAt", customer.updated_at.to_rfc3339())
        .close()
}
