use chrono::Utc;
use serde_json::{Map, Value, json};
use tracing::{info, warn};

use super::{decode, encode, missing_fields, parse_number, present};
use crate::error::ServiceError;
use crate::models::customer::CustomerId;
use crate::models::order::{DEFAULT_ORDER_STATUS, Order, OrderItem, Priority};
use crate::store::{CUSTOMERS, DocumentStore, Filter, ORDERS};

/// Raw `create_order` fields as extracted from the request.
#[derive(Debug, Clone, Default)]
pub struct NewOrder {
    pub order_id: Option<String>,
    pub customer_id: Option<String>,
    pub total_amount: Option<String>,
    pub priority: Option<String>,
    pub items: Vec<OrderItem>,
}

pub async fn create_order(store: &dyn DocumentStore, input: NewOrder) -> Result<Order, ServiceError> {
    let (order_id, customer_id, total_amount) = match (
        present(input.order_id),
        present(input.customer_id),
        present(input.total_amount),
    ) {
        (Some(order_id), Some(customer_id), Some(total)) => (order_id, customer_id, total),
        (order_id, customer_id, total) => {
            return Err(missing_fields(&[
                ("orderID", &order_id),
                ("customer_id", &customer_id),
                ("totalAmount", &total),
            ]));
        }
    };

    let total_amount = parse_number("totalAmount", &total_amount)?;
    let priority = match present(input.priority) {
        Some(raw) => raw
            .parse::<Priority>()
            .map_err(|reason| ServiceError::InvalidField {
                field: "priority",
                reason,
            })?,
        None => Priority::default(),
    };
    if let Some(item) = input.items.iter().find(|item| !item.price.is_finite()) {
        return Err(ServiceError::InvalidField {
            field: "price",
            reason: format!("{} is not a finite number", item.price),
        });
    }

    let customer = store
        .find_one(CUSTOMERS, &Filter::eq("customerID", customer_id.as_str()))
        .await?;
    if customer.is_none() {
        warn!(order_id = %order_id, customer_id = %customer_id, "order references unknown customer");
        return Err(ServiceError::CustomerNotFound(customer_id));
    }

    if store
        .find_one(ORDERS, &Filter::eq("orderID", order_id.as_str()))
        .await?
        .is_some()
    {
        return Err(ServiceError::DuplicateOrder(order_id));
    }

    let now = Utc::now();
    let order = Order {
        order_id,
        customer_id: Some(CustomerId::from_auth_subject(customer_id)),
        items: input.items,
        total_amount,
        priority,
        status: DEFAULT_ORDER_STATUS.to_string(),
        created_at: now,
        updated_at: now,
    };

    store.insert(ORDERS, encode(&order)?).await?;
    info!(
        order_id = %order.order_id,
        items = order.items.len(),
        priority = %order.priority,
        "order created"
    );

    Ok(order)
}

pub async fn get_order(
    store: &dyn DocumentStore,
    order_id: Option<String>,
) -> Result<Order, ServiceError> {
    let order_id = present(order_id).ok_or(ServiceError::MissingFields(vec!["orderID"]))?;
    find_order(store, order_id).await
}

pub async fn list_orders_for_customer(
    store: &dyn DocumentStore,
    customer_id: Option<String>,
) -> Result<Vec<Order>, ServiceError> {
    let customer_id =
        present(customer_id).ok_or(ServiceError::MissingFields(vec!["customer_id"]))?;

    store
        .find(ORDERS, &Filter::eq("customerID", customer_id))
        .await?
        .into_iter()
        .map(decode)
        .collect()
}

/// Sets a new status and refreshes `updatedAt`. A blank status is rejected
/// before the store is touched.
pub async fn update_order_status(
    store: &dyn DocumentStore,
    order_id: Option<String>,
    status: Option<String>,
) -> Result<Order, ServiceError> {
    let order_id = present(order_id).ok_or(ServiceError::MissingFields(vec!["orderID"]))?;
    let status = present(status).ok_or(ServiceError::EmptyStatus)?;

    let mut fields = Map::new();
    fields.insert("status".to_string(), Value::String(status.clone()));
    fields.insert("updatedAt".to_string(), json!(Utc::now()));

    let matched = store
        .update_one(ORDERS, &Filter::eq("orderID", order_id.as_str()), fields)
        .await?;
    if !matched {
        return Err(ServiceError::OrderNotFound(order_id));
    }

    info!(order_id = %order_id, status = %status, "order status updated");
    find_order(store, order_id).await
}

pub(crate) async fn find_order(
    store: &dyn DocumentStore,
    order_id: String,
) -> Result<Order, ServiceError> {
    let doc = store
        .find_one(ORDERS, &Filter::eq("orderID", order_id.as_str()))
        .await?
        .ok_or(ServiceError::OrderNotFound(order_id))?;

    decode(doc)
}
