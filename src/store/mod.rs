//! Persistent store interfaces
//!
//! The relational data store and the binary asset bucket are external
//! collaborators, abstracted behind two async traits. Rows travel as
//! `serde_json::Value`; decoding into typed records happens in
//! [`crate::models`] immediately after every read.

pub mod memory;
#[cfg(feature = "api-backend")]
pub mod rest;

pub use memory::{MemoryAssets, MemoryStore};
#[cfg(feature = "api-backend")]
pub use rest::{RestAssets, RestStore};

use async_trait::async_trait;
use serde_json::Value;

/// Record set names used by this subsystem.
pub mod sets {
    pub const TRAININGS: &str = "trainings";
    pub const PARTICIPANTS: &str = "participants";
    pub const COMPANIES: &str = "companies";
    pub const ORGANIZATION_SETTINGS: &str = "organization_settings";
    /// Legacy ad-hoc signature rows, read-only once migrated.
    pub const DOCUMENTS: &str = "documents";
    /// Canonical signature rows.
    pub const DOCUMENT_SIGNATURES: &str = "document_signatures";
}

/// Error from a store backend
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("asset not found: {0}")]
    AssetMissing(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("http error: {0}")]
    Http(String),

    #[error("backend error: {0}")]
    Backend(String),
}

/// One select predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(String, Value),
    IsNull(String),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq(field.into(), value.into())
    }

    pub fn is_null(field: impl Into<String>) -> Self {
        Filter::IsNull(field.into())
    }

    /// Whether a raw row matches this predicate. Absent fields count as
    /// null.
    pub fn matches(&self, record: &Value) -> bool {
        match self {
            Filter::Eq(field, expected) => record.get(field) == Some(expected),
            Filter::IsNull(field) => matches!(record.get(field), None | Some(Value::Null)),
        }
    }
}

/// Generic record store: select-with-filter, insert, update-by-id,
/// delete-by-id over named record sets.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn select(&self, set: &str, filters: &[Filter]) -> Result<Vec<Value>, StoreError>;

    /// Insert one row; the stored row (with its id) is returned.
    async fn insert(&self, set: &str, record: Value) -> Result<Value, StoreError>;

    /// Merge `patch`'s fields into the row with the given id.
    async fn update(&self, set: &str, id: &str, patch: Value) -> Result<Value, StoreError>;

    /// Returns false when no row had the given id.
    async fn delete(&self, set: &str, id: &str) -> Result<bool, StoreError>;
}

/// Name-addressed binary asset store.
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn download(&self, name: &str) -> Result<Vec<u8>, StoreError>;

    async fn upload(&self, name: &str, bytes: Vec<u8>, overwrite: bool) -> Result<(), StoreError>;

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError>;

    fn public_url(&self, name: &str) -> String;
}
