//! In-memory store backends
//!
//! Used by the test suites and by embedding callers that resolve records
//! ahead of time. Behavior mirrors the hosted backend: inserts assign an id
//! when the row has none, updates merge field-by-field.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::store::{AssetStore, Filter, RecordStore, StoreError};

/// In-memory record store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn record_id(record: &Value) -> Option<String> {
    record.get("id").and_then(Value::as_str).map(str::to_string)
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn select(&self, set: &str, filters: &[Filter]) -> Result<Vec<Value>, StoreError> {
        let rows = self.rows.lock().expect("store lock");
        Ok(rows
            .get(set)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| filters.iter().all(|f| f.matches(r)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert(&self, set: &str, mut record: Value) -> Result<Value, StoreError> {
        let map = record
            .as_object_mut()
            .ok_or_else(|| StoreError::Serialization("record must be an object".to_string()))?;
        map.entry("id")
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
        let mut rows = self.rows.lock().expect("store lock");
        rows.entry(set.to_string()).or_default().push(record.clone());
        Ok(record)
    }

    async fn update(&self, set: &str, id: &str, patch: Value) -> Result<Value, StoreError> {
        let patch_map = patch
            .as_object()
            .ok_or_else(|| StoreError::Serialization("patch must be an object".to_string()))?;
        let mut rows = self.rows.lock().expect("store lock");
        let records = rows
            .get_mut(set)
            .ok_or_else(|| StoreError::NotFound(format!("{set}/{id}")))?;
        let record = records
            .iter_mut()
            .find(|r| record_id(r).as_deref() == Some(id))
            .ok_or_else(|| StoreError::NotFound(format!("{set}/{id}")))?;
        if let Some(map) = record.as_object_mut() {
            for (key, value) in patch_map {
                map.insert(key.clone(), value.clone());
            }
        }
        Ok(record.clone())
    }

    async fn delete(&self, set: &str, id: &str) -> Result<bool, StoreError> {
        let mut rows = self.rows.lock().expect("store lock");
        let Some(records) = rows.get_mut(set) else {
            return Ok(false);
        };
        let before = records.len();
        records.retain(|r| record_id(r).as_deref() != Some(id));
        Ok(records.len() < before)
    }
}

/// In-memory asset store.
#[derive(Debug)]
pub struct MemoryAssets {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
    base_url: String,
}

impl Default for MemoryAssets {
    fn default() -> Self {
        MemoryAssets {
            objects: Mutex::new(BTreeMap::new()),
            base_url: "memory://assets".to_string(),
        }
    }
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AssetStore for MemoryAssets {
    async fn download(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        let objects = self.objects.lock().expect("asset lock");
        objects
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::AssetMissing(name.to_string()))
    }

    async fn upload(&self, name: &str, bytes: Vec<u8>, overwrite: bool) -> Result<(), StoreError> {
        let mut objects = self.objects.lock().expect("asset lock");
        if !overwrite && objects.contains_key(name) {
            return Err(StoreError::Backend(format!("asset already exists: {name}")));
        }
        objects.insert(name.to_string(), bytes);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let objects = self.objects.lock().expect("asset lock");
        Ok(objects
            .keys()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn public_url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn insert_assigns_id_and_select_filters() {
        let store = MemoryStore::new();
        let stored = store
            .insert("trainings", json!({"title": "Rust"}))
            .await
            .unwrap();
        assert!(stored.get("id").is_some());
        store
            .insert("trainings", json!({"id": "t-2", "title": "Go"}))
            .await
            .unwrap();

        let hits = store
            .select("trainings", &[Filter::eq("title", "Go")])
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0]["id"], "t-2");
    }

    #[tokio::test]
    async fn is_null_matches_absent_and_null_fields() {
        let store = MemoryStore::new();
        store.insert("documents", json!({"id": "a"})).await.unwrap();
        store
            .insert("documents", json!({"id": "b", "user_id": null}))
            .await
            .unwrap();
        store
            .insert("documents", json!({"id": "c", "user_id": "u-1"}))
            .await
            .unwrap();
        let hits = store
            .select("documents", &[Filter::is_null("user_id")])
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn update_merges_and_delete_reports() {
        let store = MemoryStore::new();
        store
            .insert("companies", json!({"id": "c-1", "name": "Acme"}))
            .await
            .unwrap();
        let updated = store
            .update("companies", "c-1", json!({"city": "Lyon"}))
            .await
            .unwrap();
        assert_eq!(updated["name"], "Acme");
        assert_eq!(updated["city"], "Lyon");
        assert!(store.delete("companies", "c-1").await.unwrap());
        assert!(!store.delete("companies", "c-1").await.unwrap());
    }

    #[tokio::test]
    async fn assets_respect_overwrite_flag() {
        let assets = MemoryAssets::new();
        assets.upload("a.png", vec![1], false).await.unwrap();
        assert!(assets.upload("a.png", vec![2], false).await.is_err());
        assets.upload("a.png", vec![2], true).await.unwrap();
        assert_eq!(assets.download("a.png").await.unwrap(), vec![2]);
        assert_eq!(assets.list("a").await.unwrap(), vec!["a.png"]);
    }
}
