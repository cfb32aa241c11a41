//! CLI command implementations

pub mod diagnose;
pub mod migrate;
pub mod render;

use serde::Serialize;

use crate::cli::error::CliError;
use crate::store::{RestAssets, RestStore};

/// Hosted-store connection settings, read from the environment.
pub struct StoreConfig {
    pub store_url: String,
    pub api_key: String,
    pub asset_store_url: String,
    pub asset_bucket: String,
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, CliError> {
        fn var(name: &'static str) -> Result<String, CliError> {
            std::env::var(name).map_err(|_| CliError::MissingEnv(name))
        }
        Ok(StoreConfig {
            store_url: var("STORE_URL")?,
            api_key: var("STORE_API_KEY")?,
            asset_store_url: var("ASSET_STORE_URL")?,
            asset_bucket: std::env::var("ASSET_BUCKET").unwrap_or_else(|_| "signatures".to_string()),
        })
    }

    pub fn open(&self) -> Result<(RestStore, RestAssets), CliError> {
        let records = RestStore::new(&self.store_url, &self.api_key)?;
        let assets = RestAssets::new(&self.asset_store_url, &self.asset_bucket, &self.api_key)?;
        Ok((records, assets))
    }
}

/// Print a report as pretty JSON on stdout.
pub fn print_report<T: Serialize>(report: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| CliError::SerializationError(e.to_string()))?;
    println!("{json}");
    Ok(())
}
