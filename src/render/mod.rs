//! Paginated PDF renderer
//!
//! Rendering happens in three steps with no partial output on failure:
//!
//! 1. [`raster::TextRasterizer`] draws the document content once into a
//!    single tall bitmap at a fixed device-pixel ratio, recording the bounds
//!    of each logical section;
//! 2. [`paginate::compute_page_breaks`] slices the bitmap into page-height
//!    regions, never splitting a tagged section;
//! 3. [`pdf::assemble_pdf`] JPEG-encodes each slice and places it on one A4
//!    page at the configured margins.
//!
//! The rasterization surface is an explicit value with a controlled
//! lifecycle; nothing here touches shared mutable state.

pub mod paginate;
pub mod pdf;
pub mod raster;

pub use paginate::{compute_page_breaks, PageSlice};
pub use raster::{apply_french_spacing, TextRasterizer};

use base64::Engine;
use image::RgbaImage;
use serde::{Deserialize, Serialize};

pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;
pub const MM_TO_PT: f32 = 2.834_646;
/// CSS reference pixel density (96 dpi) per millimetre.
const CSS_PX_PER_MM: f32 = 96.0 / 25.4;

/// Output page geometry. A4 portrait with uniform margins and a reserved
/// footer band excluded from the per-page content height.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    pub margin_mm: f32,
    pub footer_margin_mm: f32,
    /// Device-pixel ratio of the rasterized bitmap.
    pub scale: u32,
    pub jpeg_quality: u8,
}

impl Default for PageConfig {
    fn default() -> Self {
        PageConfig { margin_mm: 10.0, footer_margin_mm: 15.0, scale: 2, jpeg_quality: 85 }
    }
}

impl PageConfig {
    pub fn px_per_mm(&self) -> f32 {
        CSS_PX_PER_MM * self.scale as f32
    }

    /// Bitmap width covering the printable width of one page.
    pub fn content_width_px(&self) -> u32 {
        ((A4_WIDTH_MM - 2.0 * self.margin_mm) * self.px_per_mm()).round() as u32
    }

    /// Bitmap height available for content on one page.
    pub fn content_height_px(&self) -> u32 {
        ((A4_HEIGHT_MM - 2.0 * self.margin_mm - self.footer_margin_mm) * self.px_per_mm()).round()
            as u32
    }
}

/// Bounds of one tagged section inside the rasterized bitmap, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub top: u32,
    pub height: u32,
}

/// One fully rasterized content region: the bitmap plus the tagged section
/// bounds. An empty section list selects the naive fixed-height slicing
/// fallback.
#[derive(Debug, Clone)]
pub struct RenderedRegion {
    pub image: RgbaImage,
    pub sections: Vec<Section>,
}

/// Error while rendering. Any variant aborts the whole render; a partial
/// PDF is never produced.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("nothing to render")]
    EmptyContent,

    #[error("font error: {0}")]
    Font(String),

    #[error("image encoding error: {0}")]
    Encode(String),

    #[error("PDF assembly error: {0}")]
    Pdf(String),
}

/// A finished render.
#[derive(Debug, Clone)]
pub struct PdfRender {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

impl PdfRender {
    /// Base64 form for embedding contexts (API responses, data URLs).
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }
}

/// Slice a rasterized region into A4 pages and assemble the PDF.
///
/// Pages come out in top-to-bottom order and none is empty; zero-height
/// slices are skipped by the paginator.
pub fn render_to_pdf(region: &RenderedRegion, config: &PageConfig) -> Result<PdfRender, RenderError> {
    if region.image.width() == 0 || region.image.height() == 0 {
        return Err(RenderError::EmptyContent);
    }
    let slices = compute_page_breaks(region, config);
    if slices.is_empty() {
        return Err(RenderError::EmptyContent);
    }
    tracing::info!(pages = slices.len(), "rendering pdf");
    let bytes = pdf::assemble_pdf(&region.image, &slices, config)?;
    Ok(PdfRender { bytes, page_count: slices.len() })
}
