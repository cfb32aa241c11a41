//! Text rasterization
//!
//! Draws document content into one tall bitmap, recording each section's
//! pixel bounds for the paginator. The drawing surface is an explicit value
//! created, drawn and returned in a single call; nothing here touches
//! shared state.
//!
//! Print typography applied before drawing: non-breaking space before the
//! French double punctuation `: ! ? ;` and after `«`. Wrapping breaks on
//! ordinary spaces only, so those groups never split at line ends.

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use once_cell::sync::Lazy;
use regex::Regex;
use rusttype::{point, Font, Scale};

use crate::document::{DocumentContent, LineStyle};
use crate::render::{PageConfig, RenderError, RenderedRegion, Section};

static DOUBLE_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+([!?;:])").unwrap());
static OPENING_GUILLEMET: Lazy<Regex> = Lazy::new(|| Regex::new(r"«\s+").unwrap());

/// Replace breakable spaces around French punctuation with non-breaking
/// ones. Only existing whitespace is rewritten; text without the spaces is
/// left alone.
pub fn apply_french_spacing(text: &str) -> String {
    let out = DOUBLE_PUNCT.replace_all(text, "\u{00A0}$1");
    OPENING_GUILLEMET.replace_all(&out, "«\u{00A0}").into_owned()
}

/// Font sizes in CSS pixels at scale 1.
fn font_px(style: LineStyle) -> f32 {
    match style {
        LineStyle::Title => 18.0,
        LineStyle::Heading => 13.0,
        LineStyle::Body => 11.0,
        LineStyle::Small => 9.0,
    }
}

const LINE_SPACING: f32 = 1.45;
const SECTION_GAP_PX: f32 = 18.0;
const TEXT_COLOR: Rgba<u8> = Rgba([20, 20, 20, 255]);
const PAGE_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

struct LaidOutLine {
    text: String,
    size: f32,
    y: u32,
}

/// Rasterizes document content with one loaded font.
pub struct TextRasterizer {
    font: Font<'static>,
}

impl TextRasterizer {
    /// Load a TTF font from raw bytes.
    pub fn new(font_bytes: Vec<u8>) -> Result<Self, RenderError> {
        let font = Font::try_from_vec(font_bytes)
            .ok_or_else(|| RenderError::Font("unreadable font data".to_string()))?;
        Ok(TextRasterizer { font })
    }

    /// Rasterize content into a region ready for pagination.
    pub fn rasterize(
        &self,
        content: &DocumentContent,
        config: &PageConfig,
    ) -> Result<RenderedRegion, RenderError> {
        if content.sections.iter().all(|s| s.lines.is_empty()) {
            return Err(RenderError::EmptyContent);
        }
        let width = config.content_width_px();
        let scale_factor = config.scale as f32;

        // First pass: wrap and position every line, tracking section bounds.
        let mut lines: Vec<LaidOutLine> = Vec::new();
        let mut sections: Vec<Section> = Vec::new();
        let mut cursor = 0f32;
        for section in &content.sections {
            let section_top = cursor;
            for line in &section.lines {
                let size = font_px(line.style) * scale_factor;
                let text = apply_french_spacing(&line.text);
                for wrapped in self.wrap(&text, size, width) {
                    lines.push(LaidOutLine { text: wrapped, size, y: cursor.round() as u32 });
                    cursor += size * LINE_SPACING;
                }
            }
            let height = (cursor - section_top).round() as u32;
            if height > 0 {
                sections.push(Section { top: section_top.round() as u32, height });
            }
            cursor += SECTION_GAP_PX * scale_factor;
        }

        let total_height = (cursor.round() as u32).max(1);
        let mut image = RgbaImage::from_pixel(width.max(1), total_height, PAGE_COLOR);
        for line in &lines {
            draw_text_mut(
                &mut image,
                TEXT_COLOR,
                0,
                line.y as i32,
                Scale::uniform(line.size),
                &self.font,
                &line.text,
            );
        }
        Ok(RenderedRegion { image, sections })
    }

    /// Greedy word wrap on ordinary spaces; non-breaking spaces keep their
    /// group on one line. A single word wider than the page stays whole.
    fn wrap(&self, text: &str, size: f32, max_width: u32) -> Vec<String> {
        let mut wrapped = Vec::new();
        let mut current = String::new();
        for word in text.split(' ').filter(|w| !w.is_empty()) {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if self.text_width(&candidate, size) <= max_width as f32 || current.is_empty() {
                current = candidate;
            } else {
                wrapped.push(std::mem::take(&mut current));
                current = word.to_string();
            }
        }
        if !current.is_empty() {
            wrapped.push(current);
        }
        if wrapped.is_empty() {
            wrapped.push(String::new());
        }
        wrapped
    }

    fn text_width(&self, text: &str, size: f32) -> f32 {
        let scale = Scale::uniform(size);
        self.font
            .layout(text, scale, point(0.0, 0.0))
            .last()
            .map(|glyph| glyph.position().x + glyph.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }
}
