//! Invoice stamping: redaction bands and header-field overlay.
//!
//! The stamp is burned into each page's content stream (not annotations),
//! so viewers and printers cannot toggle it off. Layout coordinates come
//! from [`StampLayout`] in top-left page coordinates and are flipped
//! against the page MediaBox here.

use chrono::NaiveDate;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId};
use tracing::{debug, info};

use super::Result;
use crate::config::{Anchor, Region, StampLayout};
use crate::error::DocumentError;

/// Resource names under which the stamp fonts are registered on each page.
const FONT_REGULAR: &str = "StampHelv";
const FONT_BOLD: &str = "StampHelvB";

/// Fields to stamp onto an invoice.
#[derive(Debug, Clone)]
pub struct StampRequest {
    /// Invoice number to write into the header table.
    pub invoice_number: String,

    /// Invoice date in `YYYY-MM-DD` form; rendered as `DD/MM/YYYY`.
    pub invoice_date: String,

    /// Customer ABN; omitted from the page when `None` or empty.
    pub customer_abn: Option<String>,

    /// Hide the amount-paid line on page 2.
    pub exclude_discount: bool,
}

/// Stamp an invoice PDF and return the rewritten document bytes.
///
/// Every page gets its header and footer bands painted over. Page 1
/// additionally gets the `Customer PO No` label covered and the invoice
/// number/date (and optional ABN) written into the header table; page 2
/// gets the amount-paid line covered when requested.
pub fn stamp_invoice(
    pdf_bytes: &[u8],
    request: &StampRequest,
    layout: &StampLayout,
) -> Result<Vec<u8>> {
    let mut doc =
        Document::load_mem(pdf_bytes).map_err(|e| DocumentError::Parse(e.to_string()))?;

    let pages: Vec<(u32, ObjectId)> = doc.get_pages().into_iter().collect();
    if pages.is_empty() {
        return Err(DocumentError::NoPages);
    }

    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });

    let date_text = format_stamp_date(&request.invoice_date);

    for (page_no, page_id) in &pages {
        let (width, height) = page_size(&doc, *page_id);
        debug!(page = *page_no, width, height, "stamping page");

        let mut ops = Vec::new();

        // Print header (timestamp) and footer (URL) bands, every page.
        push_fill_rect(
            &mut ops,
            0.0,
            height - layout.header_band_height,
            width,
            layout.header_band_height,
        );
        push_fill_rect(&mut ops, 0.0, 0.0, width, layout.footer_band_height);

        if *page_no == 2 && request.exclude_discount {
            push_region(&mut ops, layout.discount_region, height);
        }

        if *page_no == 1 {
            push_region(&mut ops, layout.po_label_region, height);

            push_field(
                &mut ops,
                layout,
                height,
                layout.invoice_number_anchor,
                "Invoice No",
                &request.invoice_number,
            );
            push_field(
                &mut ops,
                layout,
                height,
                layout.invoice_date_anchor,
                "Invoice Date",
                &date_text,
            );
            if let Some(abn) = request.customer_abn.as_deref().filter(|abn| !abn.is_empty()) {
                push_field(
                    &mut ops,
                    layout,
                    height,
                    layout.customer_abn_anchor,
                    "Customer ABN",
                    abn,
                );
            }
        }

        register_stamp_fonts(&mut doc, *page_id, regular, bold)?;
        append_page_ops(&mut doc, *page_id, ops)?;
    }

    info!(
        invoice_number = %request.invoice_number,
        invoice_date = %date_text,
        pages = pages.len(),
        "stamped invoice"
    );

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| DocumentError::Stamp(e.to_string()))?;
    Ok(out)
}

/// Render `YYYY-MM-DD` as `DD/MM/YYYY`; anything else passes through as-is.
fn format_stamp_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => parsed.format("%d/%m/%Y").to_string(),
        Err(_) => date.to_string(),
    }
}

/// Opaque white rectangle in PDF (bottom-left origin) coordinates.
fn push_fill_rect(ops: &mut Vec<Operation>, x: f32, y: f32, w: f32, h: f32) {
    ops.push(Operation::new("q", vec![]));
    ops.push(Operation::new(
        "rg",
        vec![Object::Real(1.0), Object::Real(1.0), Object::Real(1.0)],
    ));
    ops.push(Operation::new(
        "re",
        vec![
            Object::Real(x),
            Object::Real(y),
            Object::Real(w),
            Object::Real(h),
        ],
    ));
    ops.push(Operation::new("f", vec![]));
    ops.push(Operation::new("Q", vec![]));
}

/// Opaque white rectangle over a top-left-origin region.
fn push_region(ops: &mut Vec<Operation>, region: Region, page_height: f32) {
    push_fill_rect(
        ops,
        region.x0,
        page_height - region.y1,
        region.x1 - region.x0,
        region.y1 - region.y0,
    );
}

/// Bold label above a regular-weight value at the given anchor.
fn push_field(
    ops: &mut Vec<Operation>,
    layout: &StampLayout,
    page_height: f32,
    anchor: Anchor,
    label: &str,
    value: &str,
) {
    push_text(
        ops,
        FONT_BOLD,
        layout.font_size,
        anchor.x,
        page_height - (anchor.y - layout.label_offset),
        label,
    );
    push_text(
        ops,
        FONT_REGULAR,
        layout.font_size,
        anchor.x,
        page_height - anchor.y,
        value,
    );
}

fn push_text(ops: &mut Vec<Operation>, font: &str, size: f32, x: f32, y: f32, text: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![Object::Name(font.as_bytes().to_vec()), Object::Real(size)],
    ));
    ops.push(Operation::new(
        "rg",
        vec![Object::Real(0.0), Object::Real(0.0), Object::Real(0.0)],
    ));
    ops.push(Operation::new(
        "Td",
        vec![Object::Real(x), Object::Real(y)],
    ));
    ops.push(Operation::new("Tj", vec![Object::string_literal(text)]));
    ops.push(Operation::new("ET", vec![]));
}

/// Page dimensions from the MediaBox, walking up the page tree for
/// inherited boxes. Falls back to A4.
pub(crate) fn page_size(doc: &Document, page_id: ObjectId) -> (f32, f32) {
    let mut current = page_id;
    for _ in 0..8 {
        let Ok(dict) = doc.get_dictionary(current) else { break };

        if let Ok(obj) = dict.get(b"MediaBox") {
            let resolved = match obj {
                Object::Reference(id) => doc.get_object(*id).ok(),
                other => Some(other),
            };
            if let Some(arr) = resolved.and_then(|o| o.as_array().ok()) {
                let nums: Vec<f32> = arr.iter().filter_map(as_number).collect();
                if nums.len() == 4 {
                    return (nums[2] - nums[0], nums[3] - nums[1]);
                }
            }
        }

        match dict.get(b"Parent").and_then(|o| o.as_reference()) {
            Ok(parent) => current = parent,
            Err(_) => break,
        }
    }
    (595.0, 842.0)
}

fn as_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Make the stamp fonts reachable from the page's resource dictionary,
/// whether that dictionary is inline, referenced, or missing.
fn register_stamp_fonts(
    doc: &mut Document,
    page_id: ObjectId,
    regular: ObjectId,
    bold: ObjectId,
) -> Result<()> {
    let (target, mut resources) = {
        let page = doc
            .get_dictionary(page_id)
            .map_err(|e| DocumentError::Stamp(e.to_string()))?;
        match page.get(b"Resources") {
            Ok(Object::Reference(id)) => {
                let dict = doc
                    .get_dictionary(*id)
                    .map_err(|e| DocumentError::Stamp(e.to_string()))?
                    .clone();
                (Some(*id), dict)
            }
            Ok(Object::Dictionary(dict)) => (None, dict.clone()),
            _ => (None, Dictionary::new()),
        }
    };

    let mut fonts = match resources.get(b"Font") {
        Ok(Object::Dictionary(dict)) => dict.clone(),
        Ok(Object::Reference(id)) => doc
            .get_dictionary(*id)
            .map(|d| d.clone())
            .unwrap_or_default(),
        _ => Dictionary::new(),
    };
    fonts.set(FONT_REGULAR, Object::Reference(regular));
    fonts.set(FONT_BOLD, Object::Reference(bold));
    resources.set("Font", Object::Dictionary(fonts));

    match target {
        Some(res_id) => {
            doc.objects.insert(res_id, Object::Dictionary(resources));
        }
        None => {
            let page = doc
                .get_object_mut(page_id)
                .and_then(Object::as_dict_mut)
                .map_err(|e| DocumentError::Stamp(e.to_string()))?;
            page.set("Resources", Object::Dictionary(resources));
        }
    }
    Ok(())
}

/// Append stamp operations after the page's existing content, bracketing
/// the original stream in q/Q so its graphics state cannot displace the
/// stamp coordinates.
fn append_page_ops(doc: &mut Document, page_id: ObjectId, ops: Vec<Operation>) -> Result<()> {
    let existing = doc
        .get_page_content(page_id)
        .map_err(|e| DocumentError::Stamp(e.to_string()))?;
    let content = Content::decode(&existing).map_err(|e| DocumentError::Stamp(e.to_string()))?;

    let mut combined = Vec::with_capacity(content.operations.len() + ops.len() + 2);
    combined.push(Operation::new("q", vec![]));
    combined.extend(content.operations);
    combined.push(Operation::new("Q", vec![]));
    combined.extend(ops);

    let encoded = Content {
        operations: combined,
    }
    .encode()
    .map_err(|e| DocumentError::Stamp(e.to_string()))?;
    doc.change_page_content(page_id, encoded)
        .map_err(|e| DocumentError::Stamp(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::Stream;
    use pretty_assertions::assert_eq;

    fn request() -> StampRequest {
        StampRequest {
            invoice_number: "23432".to_string(),
            invoice_date: "2025-12-09".to_string(),
            customer_abn: None,
            exclude_discount: true,
        }
    }

    fn test_pdf(page_count: usize) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut kids = Vec::new();
        for _ in 0..page_count {
            let content_id =
                doc.add_object(Object::Stream(Stream::new(dictionary! {}, Vec::new())));
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
            kids.push(Object::Reference(page_id));
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count as i64,
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

    fn page_content(pdf: &[u8], page: u32) -> String {
        let doc = Document::load_mem(pdf).unwrap();
        let page_id = doc.get_pages()[&page];
        String::from_utf8_lossy(&doc.get_page_content(page_id).unwrap()).into_owned()
    }

    #[test]
    fn stamps_number_date_and_labels_on_first_page() {
        let stamped = stamp_invoice(&test_pdf(1), &request(), &StampLayout::default()).unwrap();
        let content = page_content(&stamped, 1);

        assert!(content.contains("(Invoice No) Tj"));
        assert!(content.contains("(23432) Tj"));
        assert!(content.contains("(Invoice Date) Tj"));
        assert!(content.contains("(09/12/2025) Tj"));
        assert!(!content.contains("Customer ABN"));
    }

    #[test]
    fn stamps_abn_when_provided() {
        let mut req = request();
        req.customer_abn = Some("51 824 753 556".to_string());

        let stamped = stamp_invoice(&test_pdf(1), &req, &StampLayout::default()).unwrap();
        let content = page_content(&stamped, 1);

        assert!(content.contains("(Customer ABN) Tj"));
        assert!(content.contains("(51 824 753 556) Tj"));
    }

    #[test]
    fn empty_abn_is_not_stamped() {
        let mut req = request();
        req.customer_abn = Some(String::new());

        let stamped = stamp_invoice(&test_pdf(1), &req, &StampLayout::default()).unwrap();

        assert!(!page_content(&stamped, 1).contains("Customer ABN"));
    }

    #[test]
    fn discount_region_is_covered_only_when_excluded() {
        let layout = StampLayout::default();

        let covered = stamp_invoice(&test_pdf(2), &request(), &layout).unwrap();
        // 842 - 335 = 507: bottom edge of the discount cover in PDF space.
        assert!(page_content(&covered, 2).contains("507"));

        let mut req = request();
        req.exclude_discount = false;
        let untouched = stamp_invoice(&test_pdf(2), &req, &layout).unwrap();
        assert!(!page_content(&untouched, 2).contains("507"));
    }

    #[test]
    fn every_page_gets_header_and_footer_bands() {
        let stamped = stamp_invoice(&test_pdf(2), &request(), &StampLayout::default()).unwrap();

        for page in 1..=2 {
            let content = page_content(&stamped, page);
            // Header band starts at 842 - 15 = 827.
            assert!(content.contains("827"), "page {page} missing header band");
            // Footer band is 30 points tall from the page bottom.
            assert!(content.contains("re"), "page {page} missing fill rect");
        }
    }

    #[test]
    fn second_page_carries_no_header_fields() {
        let stamped = stamp_invoice(&test_pdf(2), &request(), &StampLayout::default()).unwrap();

        assert!(!page_content(&stamped, 2).contains("(Invoice No) Tj"));
    }

    #[test]
    fn malformed_date_passes_through_verbatim() {
        assert_eq!(format_stamp_date("2025-12-09"), "09/12/2025");
        assert_eq!(format_stamp_date("not-a-date"), "not-a-date");
    }

    #[test]
    fn garbage_input_is_a_parse_error() {
        let err = stamp_invoice(b"not a pdf", &request(), &StampLayout::default()).unwrap_err();

        assert!(matches!(err, DocumentError::Parse(_)));
    }

    #[test]
    fn stamped_output_reparses() {
        let stamped = stamp_invoice(&test_pdf(2), &request(), &StampLayout::default()).unwrap();

        let doc = Document::load_mem(&stamped).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }
}
