//! PDF assembly
//!
//! Each page slice is JPEG-encoded and embedded as a `DCTDecode` image
//! XObject on one A4 page, top-aligned inside the configured margins. A
//! slice taller than the printable height is clipped by the page box.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{imageops, ColorType, RgbaImage};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};

use crate::render::{PageConfig, PageSlice, RenderError, A4_HEIGHT_MM, A4_WIDTH_MM, MM_TO_PT};

/// Crop one slice out of the bitmap and encode it as JPEG.
fn encode_slice_jpeg(
    image: &RgbaImage,
    slice: &PageSlice,
    quality: u8,
) -> Result<(Vec<u8>, u32, u32), RenderError> {
    let width = image.width();
    let height = slice.height.min(image.height().saturating_sub(slice.top));
    let cropped = imageops::crop_imm(image, 0, slice.top, width, height).to_image();
    let rgb = image::DynamicImage::ImageRgba8(cropped).to_rgb8();
    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .encode(rgb.as_raw(), width, height, ColorType::Rgb8)
        .map_err(|e| RenderError::Encode(e.to_string()))?;
    Ok((buffer.into_inner(), width, height))
}

/// Assemble the output PDF from the computed slices.
pub fn assemble_pdf(
    image: &RgbaImage,
    slices: &[PageSlice],
    config: &PageConfig,
) -> Result<Vec<u8>, RenderError> {
    let page_width_pt = A4_WIDTH_MM * MM_TO_PT;
    let page_height_pt = A4_HEIGHT_MM * MM_TO_PT;
    let margin_pt = config.margin_mm * MM_TO_PT;
    let content_width_pt = page_width_pt - 2.0 * margin_pt;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids: Vec<Object> = Vec::with_capacity(slices.len());

    for (index, slice) in slices.iter().enumerate() {
        let (jpeg, px_width, px_height) = encode_slice_jpeg(image, slice, config.jpeg_quality)?;

        let xobject_dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => px_width as i64,
            "Height" => px_height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        };
        let xobject_id = doc.add_object(Object::Stream(Stream::new(xobject_dict, jpeg)));

        // Map bitmap pixels back to points; width always fills the printable
        // width, height stays proportional.
        let draw_width_pt = content_width_pt;
        let draw_height_pt = px_height as f32 / config.px_per_mm() * MM_TO_PT;
        let x = margin_pt;
        let y = page_height_pt - margin_pt - draw_height_pt;
        let content = format!(
            "q\n{:.2} 0 0 {:.2} {:.2} {:.2} cm\n/Im0 Do\nQ",
            draw_width_pt, draw_height_pt, x, y
        );
        let content_id = doc.add_object(Object::Stream(Stream::new(
            Dictionary::new(),
            content.into_bytes(),
        )));

        let mut xobjects = Dictionary::new();
        xobjects.set("Im0", Object::Reference(xobject_id));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![
                0.into(),
                0.into(),
                (page_width_pt.round() as i64).into(),
                (page_height_pt.round() as i64).into(),
            ],
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! { "XObject" => Object::Dictionary(xobjects) },
        });
        kids.push(Object::Reference(page_id));
        tracing::debug!(page = index + 1, slice_top = slice.top, "page assembled");
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => slices.len() as i64,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    Ok(bytes)
}
