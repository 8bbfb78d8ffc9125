use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;

use super::{describe, parse_document, rejected, respond};
use crate::error::AppError;
use crate::models::order::Order;
use crate::services::orders::{self, NewOrder};
use crate::state::AppState;
use crate::xml::{Fragment, Operation, extract_field, extract_items, find_operation};

const ENDPOINT: &str = "orderService";

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orderService", post(order_service).get(describe_service))
        .route("/customers/:customer_id/orders", get(customer_orders))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderOperation {
    NewPackage,
    UpdatePackage,
    GetPackageStatus,
    CreateOrder,
    GetCustomerOrders,
    GetOrder,
}

impl Operation for OrderOperation {
    fn from_local_name(name: &str) -> Option<Self> {
        match name {
            "new_package" => Some(OrderOperation::NewPackage),
            "update_package" => Some(OrderOperation::UpdatePackage),
            "get_package_status" => Some(OrderOperation::GetPackageStatus),
            "create_order" => Some(OrderOperation::CreateOrder),
            "get_customer_orders" => Some(OrderOperation::GetCustomerOrders),
            "get_order" => Some(OrderOperation::GetOrder),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            OrderOperation::NewPackage => "new_package",
            OrderOperation::UpdatePackage => "update_package",
            OrderOperation::GetPackageStatus => "get_package_status",
            OrderOperation::CreateOrder => "create_order",
            OrderOperation::GetCustomerOrders => "get_customer_orders",
            OrderOperation::GetOrder => "get_order",
        }
    }
}

enum OrderCall {
    NewPackage,
    UpdatePackage {
        package_id: Option<String>,
        status_code: Option<String>,
    },
    GetPackageStatus {
        package_id: Option<String>,
    },
    CreateOrder(NewOrder),
    GetCustomerOrders {
        customer_id: Option<String>,
    },
    GetOrder {
        order_id: Option<String>,
    },
}

fn parse_call(body: &str) -> Result<(OrderOperation, OrderCall), AppError> {
    let doc = parse_document(body)?;
    let (operation, node) =
        find_operation::<OrderOperation>(&doc).ok_or(AppError::UnknownOperation)?;
    let root = doc.root();

    let call = match operation {
        OrderOperation::NewPackage => OrderCall::NewPackage,
        OrderOperation::UpdatePackage => OrderCall::UpdatePackage {
            package_id: extract_field(root, "package_id"),
            status_code: extract_field(root, "status_code"),
        },
        // Read inside the operation element first.
        OrderOperation::GetPackageStatus => OrderCall::GetPackageStatus {
            package_id: extract_field(node, "package_id")
                .or_else(|| extract_field(root, "package_id")),
        },
        OrderOperation::CreateOrder => OrderCall::CreateOrder(NewOrder {
            order_id: extract_field(root, "orderID"),
            customer_id: extract_field(root, "customer_id"),
            total_amount: extract_field(root, "totalAmount"),
            priority: extract_field(root, "priority"),
            items: extract_items(&doc),
        }),
        OrderOperation::GetCustomerOrders => OrderCall::GetCustomerOrders {
            customer_id: extract_field(root, "customer_id"),
        },
        OrderOperation::GetOrder => OrderCall::GetOrder {
            order_id: extract_field(root, "orderID"),
        },
    };

    Ok((operation, call))
}

async fn order_service(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Response, AppError> {
    let started = Instant::now();
    let (operation, call) = parse_call(&body).inspect_err(|_| rejected(&state, ENDPOINT, started))?;
    let op = operation.name();

    let response = match call {
        OrderCall::NewPackage => {
            let package_id = state.packages.create();
            state.metrics.packages_tracked.set(state.packages.len() as i64);
            respond(&state, ENDPOINT, op, started, Ok(package_id), |f, id| {
                f.field("package_id", id)
            })
        }
        OrderCall::UpdatePackage {
            package_id,
            status_code,
        } => {
            let result = state
                .packages
                .update(package_id.clone(), status_code.clone())
                .and_then(|()| state.packages.status(package_id));
            respond(&state, ENDPOINT, op, started, result, |f, status| {
                f.field("package_status", status)
            })
        }
        OrderCall::GetPackageStatus { package_id } => {
            let result = state.packages.status(package_id);
            respond(&state, ENDPOINT, op, started, result, |f, status| {
                f.field("package_status", status)
            })
        }
        OrderCall::CreateOrder(input) => {
            let result = orders::create_order(state.store.as_ref(), input).await;
            respond(&state, ENDPOINT, op, started, result, |f, order| {
                order_fragment(f, &order)
            })
        }
        OrderCall::GetCustomerOrders { customer_id } => {
            list_response(&state, op, started, customer_id).await
        }
        OrderCall::GetOrder { order_id } => {
            let result = orders::get_order(state.store.as_ref(), order_id).await;
            respond(&state, ENDPOINT, op, started, result, |f, order| {
                order_fragment(f, &order)
            })
        }
    };

    Ok(response)
}

async fn customer_orders(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<String>,
) -> Response {
    let started = Instant::now();
    list_response(
        &state,
        OrderOperation::GetCustomerOrders.name(),
        started,
        Some(customer_id),
    )
    .await
}

async fn list_response(
    state: &AppState,
    operation: &'static str,
    started: Instant,
    customer_id: Option<String>,
) -> Response {
    let result = orders::list_orders_for_customer(state.store.as_ref(), customer_id.clone())
        .await
        .map(|orders| (customer_id.unwrap_or_default(), orders));

    respond(state, ENDPOINT, operation, started, result, |f, (customer_id, orders)| {
        let mut f = f
            .field("customer_id", customer_id.trim())
            .field("count", orders.len())
            .open("orders");
        for order in &orders {
            f = order_fragment(f, order);
        }
        f.close()
    })
}

async fn describe_service(Query(query): Query<HashMap<String, String>>) -> Response {
    describe("OrderService", &query)
}

pub(crate) fn order_fragment(fragment: Fragment, order: &Order) -> Fragment {
    let mut fragment = fragment
        .open("order")
        .field("orderID", &order.order_id)
        .optional("customerID", order.customer_id.as_ref())
        .field("totalAmount", order.total_amount)
        .field("priority", order.priority)
        .field("status", &order.status)
        .field("createdAt", order.created_at.to_rfc3339())
        .field("updatedAt", order.updated_at.to_rfc3339())
        .open("items");

    for item in &order.items {
        fragment = fragment
            .open("item")
            .optional("product_id", item.product_id.as_ref())
            .optional("name", item.name.as_ref())
            .field("quantity", item.quantity)
            .field("price", item.price)
            .close();
    }

    fragment.close().close()
}
