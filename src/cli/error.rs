//! CLI-specific error types

use std::path::PathBuf;
use thiserror::Error;

use crate::models::DecodeError;
use crate::render::RenderError;
use crate::signatures::SignatureError;
use crate::store::StoreError;

/// CLI-specific error type
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to read file {0}: {1}")]
    FileReadError(PathBuf, String),

    #[error("Failed to write file {0}: {1}")]
    FileWriteError(PathBuf, String),

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),

    #[error("Signature error: {0}")]
    SignatureError(#[from] SignatureError),

    #[error("Decode error: {0}")]
    DecodeError(#[from] DecodeError),

    #[error("Render error: {0}")]
    RenderError(#[from] RenderError),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Migration error: {0}")]
    MigrationError(String),
}
