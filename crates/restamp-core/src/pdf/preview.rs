//! First-page preview rendering.
//!
//! There is no PDF rasterizer in the stack, so the preview comes from the
//! document's own raster content: the largest embedded image is used when
//! one exists (scanned invoices), otherwise a blank page-shaped canvas is
//! returned so text-only documents still preview as an image.

use std::io::Cursor;

use image::{DynamicImage, ImageBuffer, Rgb};
use lopdf::{Document, Object};
use tracing::debug;

use super::stamper::page_size;
use super::Result;
use crate::error::DocumentError;

/// Scale factor for the blank-canvas fallback, matching the 2x preview
/// zoom the UI expects.
const CANVAS_SCALE: f32 = 2.0;

/// Render a PNG preview of the document's first page.
pub fn render_preview(pdf_bytes: &[u8]) -> Result<Vec<u8>> {
    let doc = Document::load_mem(pdf_bytes).map_err(|e| DocumentError::Parse(e.to_string()))?;

    let pages = doc.get_pages();
    let (_, &first_page) = pages.iter().next().ok_or(DocumentError::NoPages)?;

    let image = match largest_embedded_image(&doc) {
        Some(image) => {
            debug!(width = image.width(), height = image.height(), "preview from embedded image");
            image
        }
        None => blank_canvas(&doc, first_page),
    };

    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| DocumentError::Preview(e.to_string()))?;
    Ok(png)
}

/// Largest decodable image XObject in the document.
fn largest_embedded_image(doc: &Document) -> Option<DynamicImage> {
    let mut best: Option<DynamicImage> = None;

    for (_, object) in doc.objects.iter() {
        let Some(image) = decode_image_object(object) else {
            continue;
        };
        let replace = best
            .as_ref()
            .map(|b| image.width() * image.height() > b.width() * b.height())
            .unwrap_or(true);
        if replace {
            best = Some(image);
        }
    }

    best
}

fn decode_image_object(object: &Object) -> Option<DynamicImage> {
    let Object::Stream(stream) = object else {
        return None;
    };
    let dict = &stream.dict;

    if dict.get(b"Subtype").ok()?.as_name().ok()? != b"Image" {
        return None;
    }

    let width = dict.get(b"Width").ok()?.as_i64().ok()? as u32;
    let height = dict.get(b"Height").ok()?.as_i64().ok()? as u32;
    if width == 0 || height == 0 {
        return None;
    }

    let filter = dict.get(b"Filter").ok().and_then(|f| match f {
        Object::Name(name) => Some(name.as_slice()),
        Object::Array(arr) => arr.first().and_then(|o| o.as_name().ok()),
        _ => None,
    });

    if filter == Some(b"DCTDecode") {
        // JPEG stream, decodable as-is.
        return image::load_from_memory_with_format(&stream.content, image::ImageFormat::Jpeg)
            .ok();
    }

    // Uncompressed (or flate-compressed) raw samples: 8-bit RGB or gray.
    let data = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());

    let rgb_len = (width * height * 3) as usize;
    let gray_len = (width * height) as usize;

    if data.len() >= rgb_len {
        let buf = ImageBuffer::from_raw(width, height, data[..rgb_len].to_vec())?;
        return Some(DynamicImage::ImageRgb8(buf));
    }
    if data.len() >= gray_len {
        let buf = ImageBuffer::from_raw(width, height, data[..gray_len].to_vec())?;
        return Some(DynamicImage::ImageLuma8(buf));
    }
    None
}

/// White page-shaped canvas for documents with no raster content.
fn blank_canvas(doc: &Document, page_id: lopdf::ObjectId) -> DynamicImage {
    let (width, height) = page_size(doc, page_id);
    let w = (width * CANVAS_SCALE).round().max(1.0) as u32;
    let h = (height * CANVAS_SCALE).round().max(1.0) as u32;

    debug!(w, h, "preview from blank canvas");
    DynamicImage::ImageRgb8(ImageBuffer::from_pixel(w, h, Rgb([255, 255, 255])))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Stream};

    fn text_only_pdf() -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let content_id = doc.add_object(Object::Stream(Stream::new(dictionary! {}, Vec::new())));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(595),
                Object::Integer(842),
            ],
            "Contents" => Object::Reference(content_id),
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut out = Vec::new();
        doc.save_to(&mut out).unwrap();
        out
    }

    #[test]
    fn text_only_pdf_previews_as_blank_page_canvas() {
        let png = render_preview(&text_only_pdf()).unwrap();

        let image = image::load_from_memory_with_format(&png, image::ImageFormat::Png).unwrap();
        assert_eq!(image.width(), 1190);
        assert_eq!(image.height(), 1684);
    }

    #[test]
    fn garbage_input_is_a_parse_error() {
        let err = render_preview(b"not a pdf").unwrap_err();

        assert!(matches!(err, DocumentError::Parse(_)));
    }
}
