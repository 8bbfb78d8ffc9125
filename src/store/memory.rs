use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::{Map, Value};

use super::{DocumentStore, Filter, StoreError};

/// In-process store keeping each collection in insertion order.
pub struct MemoryStore {
    collections: DashMap<String, Vec<Value>>,
    online: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            collections: DashMap::new(),
            online: AtomicBool::new(true),
        }
    }

    /// Simulates losing (or regaining) the backend connection.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable)
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.ensure_online()
    }

    async fn insert(&self, collection: &str, doc: Value) -> Result<(), StoreError> {
        self.ensure_online()?;

        if !doc.is_object() {
            return Err(StoreError::Backend("documents must be objects".to_string()));
        }

        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(doc);
        Ok(())
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Value>, StoreError> {
        self.ensure_online()?;

        Ok(self.collections.get(collection).and_then(|docs| {
            docs.iter().find(|doc| filter.matches(doc)).cloned()
        }))
    }

    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>, StoreError> {
        self.ensure_online()?;

        Ok(self
            .collections
            .get(collection)
            .map(|docs| docs.iter().filter(|doc| filter.matches(doc)).cloned().collect())
            .unwrap_or_default())
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        fields: Map<String, Value>,
    ) -> Result<bool, StoreError> {
        self.ensure_online()?;

        let Some(mut docs) = self.collections.get_mut(collection) else {
            return Ok(false);
        };

        match docs.iter_mut().find(|doc| filter.matches(doc)) {
            Some(Value::Object(doc)) => {
                doc.extend(fields);
                Ok(true)
            }
            Some(_) => Err(StoreError::Backend("stored document is not an object".to_string())),
            None => Ok(false),
        }
    }

    async fn count(&self, collection: &str) -> Result<usize, StoreError> {
        self.ensure_online()?;
        Ok(self.collections.get(collection).map(|docs| docs.len()).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, json};

    use super::*;

    #[tokio::test]
    async fn find_returns_matches_in_insertion_order() {
        let store = MemoryStore::new();
        store.insert("orders", json!({ "orderID": "a", "customerID": "c1" })).await.unwrap();
        store.insert("orders", json!({ "orderID": "b", "customerID": "c2" })).await.unwrap();
        store.insert("orders", json!({ "orderID": "c", "customerID": "c1" })).await.unwrap();

        let found = store.find("orders", &Filter::eq("customerID", "c1")).await.unwrap();
        let ids: Vec<_> = found.iter().map(|d| d["orderID"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(store.count("orders").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn update_one_touches_only_the_first_match() {
        let store = MemoryStore::new();
        store.insert("orders", json!({ "orderID": "a", "status": "pending" })).await.unwrap();
        store.insert("orders", json!({ "orderID": "a", "status": "pending" })).await.unwrap();

        let mut fields = Map::new();
        fields.insert("status".to_string(), json!("shipped"));
        let matched = store
            .update_one("orders", &Filter::eq("orderID", "a"), fields)
            .await
            .unwrap();

        assert!(matched);
        let docs = store.find("orders", &Filter::all()).await.unwrap();
        assert_eq!(docs[0]["status"], "shipped");
        assert_eq!(docs[1]["status"], "pending");
    }

    #[tokio::test]
    async fn update_on_missing_document_reports_no_match() {
        let store = MemoryStore::new();
        let matched = store
            .update_one("orders", &Filter::eq("orderID", "zz"), Map::new())
            .await
            .unwrap();
        assert!(!matched);
    }

    #[tokio::test]
    async fn offline_store_rejects_every_call() {
        let store = MemoryStore::new();
        store.set_online(false);

        assert!(matches!(store.ping().await, Err(StoreError::Unavailable)));
        assert!(matches!(
            store.insert("customers", json!({})).await,
            Err(StoreError::Unavailable)
        ));

        store.set_online(true);
        assert!(store.ping().await.is_ok());
    }
}
