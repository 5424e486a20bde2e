//! PDF page splitting and cropping
//!
//! This crate provides client-side PDF manipulation using lopdf.
//!
//! - `split_document`: cut selected pages in two along their longer side,
//!   optionally with a 10% overlap between the halves
//! - `crop_document`: apply percentage margins as a crop box to every page
//!
//! The geometry behind both (`geometry`, `crop`, `crop_rect`, `gesture`) is
//! pure arithmetic and usable without touching a PDF.

pub mod crop;
pub mod crop_document;
pub mod crop_rect;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod page_info;
pub mod page_range;
pub mod split;

#[cfg(test)]
pub(crate) mod test_support;

pub use crop::{crop_box, CropMargins};
pub use crop_document::crop_document;
pub use crop_rect::{CanvasSize, CropRectangle, Handle};
pub use error::PdfSplitError;
pub use geometry::{split_geometry, PageGeometry, Rect, SplitMode, SplitResult};
pub use gesture::{Cropper, Gesture, PointerTarget};
pub use page_info::PageInfo;
pub use page_range::{default_page_range, parse_page_ranges, validate_page_range};
pub use split::{split_document, SplitOptions};

use lopdf::Document;

/// Parse PDF bytes and return page count
pub fn get_page_count(bytes: &[u8]) -> Result<u32, PdfSplitError> {
    Ok(load_document(bytes)?.get_pages().len() as u32)
}

/// Whole-percent progress after `done` of `total` pages.
pub fn progress_percent(done: u32, total: u32) -> u32 {
    if total == 0 {
        return 100;
    }
    ((done as f64 / total as f64) * 100.0).round() as u32
}

pub(crate) fn load_document(bytes: &[u8]) -> Result<Document, PdfSplitError> {
    Document::load_mem(bytes).map_err(|e| PdfSplitError::ParseError(e.to_string()))
}

pub(crate) fn save_document(doc: &mut Document) -> Result<Vec<u8>, PdfSplitError> {
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| PdfSplitError::OperationError(format!("Save failed: {}", e)))?;
    Ok(buffer)
}
