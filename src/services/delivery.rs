use super::orders::find_order;
use super::{decode, present};
use crate::error::ServiceError;
use crate::models::customer::{CurrentLocation, Customer};
use crate::models::order::Order;
use crate::store::{CUSTOMERS, DocumentStore, Filter};

#[derive(Debug, Clone)]
pub struct DeliveryLocation {
    pub order: Order,
    pub customer: Customer,
    pub location: CurrentLocation,
}

/// Follows order -> customer -> current location, failing with the kind of
/// the first missing link.
pub async fn delivery_location(
    store: &dyn DocumentStore,
    order_id: Option<String>,
) -> Result<DeliveryLocation, ServiceError> {
    let order_id = present(order_id).ok_or(ServiceError::MissingFields(vec!["orderID"]))?;
    let order = find_order(store, order_id).await?;

    let customer_id = order
        .customer_id
        .clone()
        .filter(|id| !id.as_str().trim().is_empty())
        .ok_or_else(|| ServiceError::CustomerIdMissing(order.order_id.clone()))?;

    let doc = store
        .find_one(CUSTOMERS, &Filter::eq("customerID", customer_id.as_str()))
        .await?
        .ok_or_else(|| ServiceError::CustomerNotFound(customer_id.to_string()))?;
    let customer: Customer = decode(doc)?;

    if customer.current_location.is_empty() {
        return Err(ServiceError::NoLocation(customer_id.to_string()));
    }

    Ok(DeliveryLocation {
        location: customer.current_location.clone(),
        order,
        customer,
    })
}
