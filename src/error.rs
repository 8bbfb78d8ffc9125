use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::store::StoreError;
use crate::xml::envelope::{XML_CONTENT_TYPE, wrap};
use crate::xml::fragment::escape;

/// Transport-level failures. These become HTTP 400/500 responses; everything a
/// caller can fix by changing field values is a [`ServiceError`] instead.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("Method not found")]
    UnknownOperation,

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidDocument(_) | AppError::UnknownOperation => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = wrap(&format!(
            "<fault><status>Error</status><message>{}</message></fault>",
            escape(&self.to_string())
        ));

        (status, [(CONTENT_TYPE, XML_CONTENT_TYPE)], body).into_response()
    }
}

/// Business-rule failures, rendered as HTTP 200 with `<status>Error</status>`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("customer {0} not found")]
    CustomerNotFound(String),

    #[error("order {0} not found")]
    OrderNotFound(String),

    #[error("package {0} not found")]
    PackageNotFound(String),

    #[error("customer already exists with this email or firebaseUID")]
    DuplicateCustomer,

    #[error("order {0} already exists")]
    DuplicateOrder(String),

    #[error("order {0} has no customerID")]
    CustomerIdMissing(String),

    #[error("customer {0} has no delivery location")]
    NoLocation(String),

    #[error("status cannot be empty")]
    EmptyStatus,

    #[error("document store unavailable")]
    StoreUnavailable,

    #[error("document store error: {0}")]
    Store(String),
}

impl ServiceError {
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::MissingFields(_) => "MissingFields",
            ServiceError::InvalidField { .. } => "InvalidField",
            ServiceError::CustomerNotFound(_) => "CustomerNotFound",
            ServiceError::OrderNotFound(_) => "OrderNotFound",
            ServiceError::PackageNotFound(_) => "PackageNotFound",
            ServiceError::DuplicateCustomer => "DuplicateCustomer",
            ServiceError::DuplicateOrder(_) => "DuplicateOrder",
            ServiceError::CustomerIdMissing(_) => "CustomerIDMissing",
            ServiceError::NoLocation(_) => "NoLocation",
            ServiceError::EmptyStatus => "EmptyStatus",
            ServiceError::StoreUnavailable => "StoreUnavailable",
            ServiceError::Store(_) => "StoreError",
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable => ServiceError::StoreUnavailable,
            other => ServiceError::Store(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_lists_every_name() {
        let err = ServiceError::MissingFields(vec!["email", "phone"]);
        assert_eq!(err.to_string(), "missing required fields: email, phone");
        assert_eq!(err.code(), "MissingFields");
    }

    #[test]
    fn unavailable_store_maps_to_its_own_kind() {
        assert_eq!(
            ServiceError::from(StoreError::Unavailable),
            ServiceError::StoreUnavailable
        );
        assert_eq!(
            ServiceError::from(StoreError::Backend("disk full".to_string())).code(),
            "StoreError"
        );
    }
}
