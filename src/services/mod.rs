//! Entity operations behind the SOAP endpoints.
//!
//! Services take already-extracted field values (raw text, `None` when the
//! element was absent) and return domain records or a [`ServiceError`].

pub mod customers;
pub mod delivery;
pub mod orders;
pub mod packages;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ServiceError;
use crate::store::StoreError;

/// Trimmed value, or `None` when absent or blank.
pub fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `MissingFields` naming every listed field that is absent, in order.
pub fn missing_fields(fields: &[(&'static str, &Option<String>)]) -> ServiceError {
    ServiceError::MissingFields(
        fields
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .collect(),
    )
}

pub fn parse_number(field: &'static str, raw: &str) -> Result<f64, ServiceError> {
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ServiceError::InvalidField {
            field,
            reason: format!("{raw:?} is not a number"),
        })
}

fn encode<T: Serialize>(record: &T) -> Result<Value, ServiceError> {
    serde_json::to_value(record).map_err(|err| StoreError::from(err).into())
}

fn decode<T: DeserializeOwned>(doc: Value) -> Result<T, ServiceError> {
    serde_json::from_value(doc).map_err(|err| StoreError::from(err).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_not_present() {
        assert_eq!(present(Some("  ".to_string())), None);
        assert_eq!(present(Some(" x ".to_string())).as_deref(), Some("x"));
        assert_eq!(present(None), None);
    }

    #[test]
    fn missing_fields_lists_only_absent_names() {
        let a = Some("a".to_string());
        let err = missing_fields(&[("orderID", &None), ("customer_id", &a), ("totalAmount", &None)]);
        assert_eq!(err, ServiceError::MissingFields(vec!["orderID", "totalAmount"]));
    }

    #[test]
    fn numbers_must_be_finite() {
        assert_eq!(parse_number("totalAmount", "12.5"), Ok(12.5));
        assert!(parse_number("totalAmount", "NaN").is_err());
        assert!(parse_number("totalAmount", "ten").is_err());
    }
}
