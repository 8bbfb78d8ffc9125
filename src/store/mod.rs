//! Document store seam.
//!
//! Services talk to persistence only through [`DocumentStore`]: named
//! collections of JSON documents with insert, find and update-by-filter.

pub mod memory;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

pub use memory::MemoryStore;

pub const CUSTOMERS: &str = "customers";
pub const ORDERS: &str = "orders";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable")]
    Unavailable,

    #[error("store backend failure: {0}")]
    Backend(String),

    #[error("document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Top-level field equality; a document matches when any clause matches.
/// A filter without clauses matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    any_of: Vec<(String, Value)>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::default().or(field, value)
    }

    pub fn or(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.any_of.push((field.into(), value.into()));
        self
    }

    pub fn matches(&self, doc: &Value) -> bool {
        if self.any_of.is_empty() {
            return true;
        }

        self.any_of
            .iter()
            .any(|(field, expected)| doc.get(field) == Some(expected))
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Cheap reachability check.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn insert(&self, collection: &str, doc: Value) -> Result<(), StoreError>;

    async fn find_one(&self, collection: &str, filter: &Filter)
    -> Result<Option<Value>, StoreError>;

    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>, StoreError>;

    /// Sets `fields` on the first matching document. Returns whether one matched.
    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        fields: Map<String, Value>,
    ) -> Result<bool, StoreError>;

    async fn count(&self, collection: &str) -> Result<usize, StoreError>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::Filter;

    #[test]
    fn any_clause_matches() {
        let filter = Filter::eq("email", "a@b.c").or("firebaseUID", "uid-9");
        assert!(filter.matches(&json!({ "email": "x@y.z", "firebaseUID": "uid-9" })));
        assert!(filter.matches(&json!({ "email": "a@b.c" })));
        assert!(!filter.matches(&json!({ "email": "x@y.z", "firebaseUID": "uid-1" })));
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(Filter::all().matches(&json!({})));
    }
}
