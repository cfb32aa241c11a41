//! Hosted store backends
//!
//! Talks to a PostgREST-style HTTP API for records and a bucket-style
//! object API for assets, authenticated with a bearer key. These are the
//! backends the operator CLI uses against the production store.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

use crate::store::{AssetStore, Filter, RecordStore, StoreError};

fn auth_headers(api_key: &str) -> Result<HeaderMap, StoreError> {
    let mut headers = HeaderMap::new();
    let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    let key = HeaderValue::from_str(api_key).map_err(|e| StoreError::Backend(e.to_string()))?;
    headers.insert(AUTHORIZATION, bearer);
    headers.insert("apikey", key);
    Ok(headers)
}

fn filter_param(filter: &Filter) -> (String, String) {
    match filter {
        Filter::Eq(field, value) => {
            let literal = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (field.clone(), format!("eq.{literal}"))
        }
        Filter::IsNull(field) => (field.clone(), "is.null".to_string()),
    }
}

async fn error_body(response: reqwest::Response) -> StoreError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    StoreError::Http(format!("status {status}: {body}"))
}

/// PostgREST-style record store client.
pub struct RestStore {
    client: reqwest::Client,
    base_url: String,
    headers: HeaderMap,
}

impl RestStore {
    pub fn new(base_url: impl Into<String>, api_key: &str) -> Result<Self, StoreError> {
        Ok(RestStore {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            headers: auth_headers(api_key)?,
        })
    }

    fn set_url(&self, set: &str) -> String {
        format!("{}/{}", self.base_url, set)
    }
}

#[async_trait]
impl RecordStore for RestStore {
    async fn select(&self, set: &str, filters: &[Filter]) -> Result<Vec<Value>, StoreError> {
        let query: Vec<(String, String)> = filters.iter().map(filter_param).collect();
        let response = self
            .client
            .get(self.set_url(set))
            .headers(self.headers.clone())
            .query(&query)
            .send()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;
        if !response.status().is_success() {
            return Err(error_body(response).await);
        }
        response
            .json()
            .await
            .map_err(|e| StoreError::Serialization(e.to_string()))
    }

    async fn insert(&self, set: &str, record: Value) -> Result<Value, StoreError> {
        let response = self
            .client
            .post(self.set_url(set))
            .headers(self.headers.clone())
            .header("Prefer", "return=representation")
            .json(&record)
            .send()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;
        if !response.status().is_success() {
            return Err(error_body(response).await);
        }
        let mut rows: Vec<Value> = response
            .json()
            .await
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        rows.pop()
            .ok_or_else(|| StoreError::Backend("insert returned no row".to_string()))
    }

    async fn update(&self, set: &str, id: &str, patch: Value) -> Result<Value, StoreError> {
        let response = self
            .client
            .patch(self.set_url(set))
            .headers(self.headers.clone())
            .header("Prefer", "return=representation")
            .query(&[("id", format!("eq.{id}"))])
            .json(&patch)
            .send()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;
        if !response.status().is_success() {
            return Err(error_body(response).await);
        }
        let mut rows: Vec<Value> = response
            .json()
            .await
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        rows.pop()
            .ok_or_else(|| StoreError::NotFound(format!("{set}/{id}")))
    }

    async fn delete(&self, set: &str, id: &str) -> Result<bool, StoreError> {
        let response = self
            .client
            .delete(self.set_url(set))
            .headers(self.headers.clone())
            .header("Prefer", "return=representation")
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;
        if !response.status().is_success() {
            return Err(error_body(response).await);
        }
        let rows: Vec<Value> = response
            .json()
            .await
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(!rows.is_empty())
    }
}

/// Bucket-style asset store client.
pub struct RestAssets {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
    headers: HeaderMap,
}

impl RestAssets {
    pub fn new(
        base_url: impl Into<String>,
        bucket: impl Into<String>,
        api_key: &str,
    ) -> Result<Self, StoreError> {
        Ok(RestAssets {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
            headers: auth_headers(api_key)?,
        })
    }
}

#[async_trait]
impl AssetStore for RestAssets {
    async fn download(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        let url = format!("{}/object/{}/{}", self.base_url, self.bucket, name);
        let response = self
            .client
            .get(url)
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::AssetMissing(name.to_string()));
        }
        if !response.status().is_success() {
            return Err(error_body(response).await);
        }
        Ok(response
            .bytes()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?
            .to_vec())
    }

    async fn upload(&self, name: &str, bytes: Vec<u8>, overwrite: bool) -> Result<(), StoreError> {
        let url = format!("{}/object/{}/{}", self.base_url, self.bucket, name);
        let response = self
            .client
            .post(url)
            .headers(self.headers.clone())
            .header("x-upsert", if overwrite { "true" } else { "false" })
            .body(bytes)
            .send()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;
        if !response.status().is_success() {
            return Err(error_body(response).await);
        }
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let url = format!("{}/object/list/{}", self.base_url, self.bucket);
        let response = self
            .client
            .post(url)
            .headers(self.headers.clone())
            .json(&serde_json::json!({ "prefix": prefix, "limit": 1000 }))
            .send()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;
        if !response.status().is_success() {
            return Err(error_body(response).await);
        }
        let entries: Vec<Value> = response
            .json()
            .await
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(entries
            .iter()
            .filter_map(|e| e.get("name").and_then(Value::as_str).map(str::to_string))
            .collect())
    }

    fn public_url(&self, name: &str) -> String {
        format!("{}/object/public/{}/{}", self.base_url, self.bucket, name)
    }
}
