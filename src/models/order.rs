use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::customer::CustomerId;

pub const DEFAULT_ORDER_STATUS: &str = "pending";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("expected low, medium or high, got {other:?}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(rename = "productID", default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub quantity: i64,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "orderID")]
    pub order_id: String,
    #[serde(rename = "customerID", default)]
    pub customer_id: Option<CustomerId>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    #[serde(default)]
    pub priority: Priority,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_parses_case_insensitively() {
        assert_eq!(" HIGH ".parse::<Priority>(), Ok(Priority::High));
        assert_eq!("low".parse::<Priority>(), Ok(Priority::Low));
        assert!("urgent".parse::<Priority>().is_err());
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn order_without_customer_id_still_deserializes() {
        let doc = serde_json::json!({
            "orderID": "o-1",
            "totalAmount": 12.5,
            "status": "pending",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        });

        let order: Order = serde_json::from_value(doc).unwrap();
        assert_eq!(order.customer_id, None);
        assert_eq!(order.priority, Priority::Medium);
        assert!(order.items.is_empty());
    }
}
