use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Customer identity. Always the subject identifier issued by the auth
/// provider (the Firebase UID); no separate id is ever generated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
    pub fn from_auth_subject(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentLocation {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl CurrentLocation {
    pub fn is_empty(&self) -> bool {
        self.address.is_none() && self.latitude.is_none() && self.longitude.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(rename = "firebaseUID")]
    pub firebase_uid: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    #[serde(rename = "customerID")]
    pub customer_id: CustomerId,
    #[serde(default)]
    pub current_location: CurrentLocation,
    #[serde(default)]
    pub order_history: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const CUSTOMER_ROLE: &str = "customer";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_uses_store_field_names() {
        let now = Utc::now();
        let customer = Customer {
            firebase_uid: "uid-1".to_string(),
            name: "Rahim".to_string(),
            email: "rahim@example.com".to_string(),
            phone: "01700000000".to_string(),
            role: CUSTOMER_ROLE.to_string(),
            customer_id: CustomerId::from_auth_subject("uid-1"),
            current_location: CurrentLocation::default(),
            order_history: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let doc = serde_json::to_value(&customer).unwrap();
        assert_eq!(doc["firebaseUID"], "uid-1");
        assert_eq!(doc["customerID"], "uid-1");
        assert!(doc["currentLocation"]["address"].is_null());
        assert_eq!(doc["orderHistory"].as_array().unwrap().len(), 0);
        assert!(doc.get("createdAt").is_some());
    }
}
