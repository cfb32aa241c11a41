//! Render command: training + participant → A4 PDF on disk

use std::path::{Path, PathBuf};

use tracing::info;

use crate::cli::error::CliError;
use crate::document::{build_document_model, document_content, output_filename};
use crate::models::{Company, DocumentType, OrganizationSettings, Participant, Training};
use crate::render::{render_to_pdf, PageConfig, TextRasterizer};
use crate::store::{sets, Filter, RecordStore};

pub struct RenderArgs {
    pub kind: DocumentType,
    pub training_id: String,
    pub participant_id: String,
    pub font: PathBuf,
    /// Output file; defaults to the standard filename in the current
    /// directory.
    pub output: Option<PathBuf>,
}

async fn load_one(
    records: &dyn RecordStore,
    set: &str,
    id: &str,
) -> Result<serde_json::Value, CliError> {
    let rows = records.select(set, &[Filter::eq("id", id)]).await?;
    rows.into_iter()
        .next()
        .ok_or_else(|| CliError::RecordNotFound(format!("{set}/{id}")))
}

/// Resolve all records, build the view model, rasterize and write the PDF.
pub async fn handle_render(records: &dyn RecordStore, args: RenderArgs) -> Result<(), CliError> {
    let training =
        Training::from_record(&load_one(records, sets::TRAININGS, &args.training_id).await?)?;
    let participant = Participant::from_record(
        &load_one(records, sets::PARTICIPANTS, &args.participant_id).await?,
    )?;

    let company = match &participant.company_id {
        Some(company_id) => Some(Company::from_record(
            &load_one(records, sets::COMPANIES, company_id).await?,
        )?),
        None => None,
    };
    let organization = records
        .select(sets::ORGANIZATION_SETTINGS, &[])
        .await?
        .first()
        .map(OrganizationSettings::from_record)
        .unwrap_or_default();

    let view = build_document_model(&training, &participant, company.as_ref(), &organization);
    let content = document_content(args.kind, &view);

    let font_bytes = std::fs::read(&args.font)
        .map_err(|e| CliError::FileReadError(args.font.clone(), e.to_string()))?;
    let config = PageConfig::default();
    let region = TextRasterizer::new(font_bytes)?.rasterize(&content, &config)?;
    let pdf = render_to_pdf(&region, &config)?;

    let output = args
        .output
        .unwrap_or_else(|| Path::new(&output_filename(args.kind, &view)).to_path_buf());
    std::fs::write(&output, &pdf.bytes)
        .map_err(|e| CliError::FileWriteError(output.clone(), e.to_string()))?;
    info!(path = %output.display(), pages = pdf.page_count, "document rendered");
    println!("{}", output.display());
    Ok(())
}
