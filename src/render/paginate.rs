//! Page-break computation
//!
//! Two strategies, selected by whether the region carries tagged sections:
//!
//! - section-aware: accumulate section heights and break whenever the next
//!   section would exceed the per-page content height. A tagged section is
//!   never split; one taller than a whole page gets its own page and is
//!   clipped by the page box.
//! - naive fallback: fixed-height slicing of the full bitmap. This can
//!   split a text line across two pages; kept as the observed behavior of
//!   the fallback path.

use crate::render::{PageConfig, RenderedRegion};

/// One vertical slice of the rasterized bitmap, destined for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSlice {
    pub top: u32,
    pub height: u32,
}

/// Compute the page slices for a region. Zero-height slices are never
/// emitted.
pub fn compute_page_breaks(region: &RenderedRegion, config: &PageConfig) -> Vec<PageSlice> {
    let total_height = region.image.height();
    let page_height = config.content_height_px().max(1);
    if total_height == 0 {
        return Vec::new();
    }
    if region.sections.is_empty() {
        naive_slices(total_height, page_height)
    } else {
        section_slices(region, total_height, page_height)
    }
}

fn naive_slices(total_height: u32, page_height: u32) -> Vec<PageSlice> {
    let mut slices = Vec::new();
    let mut top = 0;
    while top < total_height {
        let height = page_height.min(total_height - top);
        if height > 0 {
            slices.push(PageSlice { top, height });
        }
        top += page_height;
    }
    slices
}

fn section_slices(region: &RenderedRegion, total_height: u32, page_height: u32) -> Vec<PageSlice> {
    let mut sections: Vec<_> = region
        .sections
        .iter()
        .copied()
        .filter(|s| s.height > 0 && s.top < total_height)
        .collect();
    sections.sort_by_key(|s| s.top);
    if sections.is_empty() {
        return naive_slices(total_height, page_height);
    }

    let mut slices = Vec::new();
    let mut page_top = 0u32;
    let mut filled_to = 0u32;
    for section in &sections {
        let section_end = (section.top + section.height).min(total_height);
        let fits = section_end.saturating_sub(page_top) <= page_height;
        if !fits && filled_to > page_top {
            slices.push(PageSlice { top: page_top, height: filled_to - page_top });
            page_top = section.top;
        }
        filled_to = filled_to.max(section_end);
    }
    // Last page runs to the bottom of the bitmap so trailing padding is kept.
    if total_height > page_top {
        slices.push(PageSlice { top: page_top, height: total_height - page_top });
    }
    slices
}
