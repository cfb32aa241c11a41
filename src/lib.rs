//! Training Docs SDK - Document generation and signature reconciliation
//!
//! Provides the back-office building blocks shared by the admin tooling:
//! - Field normalization for heterogeneous training metadata
//! - Document view-model building and content templates
//! - Paginated bitmap-to-PDF rendering (A4, JPEG page images)
//! - Signature record store adapter over the canonical table
//! - Diagnostic and migration engines for the legacy signature table

pub mod document;
pub mod models;
pub mod normalize;
pub mod render;
pub mod signatures;
pub mod store;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export commonly used types
#[cfg(feature = "api-backend")]
pub use store::{RestAssets, RestStore};
pub use store::{AssetStore, Filter, MemoryAssets, MemoryStore, RecordStore, StoreError};

pub use document::{build_document_model, document_content, output_filename, DocumentViewModel};
pub use models::{
    canonical_asset_name, Company, DocumentType, OrganizationSettings, Participant,
    SignatureRecord, SignatureType, Training, TrainingStatus,
};
pub use render::{render_to_pdf, PageConfig, PdfRender, RenderError, TextRasterizer};
pub use signatures::diagnostic::{DiagnosticEngine, DiagnosticReport};
pub use signatures::migration::{MigrationEngine, MigrationReport};
pub use signatures::{AssetSource, NewSignature, SignatureError, SignatureQuery, SignatureStore};
