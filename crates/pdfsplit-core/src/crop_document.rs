//! PDF cropping
//!
//! Sets the same percentage crop on every page by writing its `/CropBox`.
//! Margins refer to the page as displayed, so they are turned back through
//! the page's `/Rotate` before the box is computed.

use crate::crop::{crop_box, CropMargins};
use crate::error::PdfSplitError;
use crate::geometry::PageGeometry;
use crate::page_info::{media_box, rotation};
use crate::{load_document, save_document};
use lopdf::Object;
use tracing::{debug, info, instrument};

/// Crop every page of a PDF by the given margins.
///
/// Margins are checked before the document is parsed, so degenerate input
/// fails fast. `progress` is called with `(pages_done, total_pages)`.
#[instrument(skip_all, fields(margins = ?margins))]
pub fn crop_document<F>(
    bytes: &[u8],
    margins: &CropMargins,
    mut progress: F,
) -> Result<Vec<u8>, PdfSplitError>
where
    F: FnMut(u32, u32),
{
    margins.validate()?;

    let mut doc = load_document(bytes)?;
    let pages = doc.get_pages();
    let page_count = pages.len() as u32;

    for (page_num, page_id) in pages {
        let bounds = media_box(&doc, page_id)?;
        let page = PageGeometry::new(bounds[2] - bounds[0], bounds[3] - bounds[1]);
        let angle = rotation(&doc, page_id);
        let rect = crop_box(page, &margins.unrotated(angle))?;

        let (x1, y1) = (bounds[0] + rect.x, bounds[1] + rect.y);
        let crop = vec![
            Object::Real(x1 as f32),
            Object::Real(y1 as f32),
            Object::Real((x1 + rect.width) as f32),
            Object::Real((y1 + rect.height) as f32),
        ];
        doc.get_dictionary_mut(page_id)
            .map_err(|e| PdfSplitError::OperationError(format!("Page {}: {}", page_num, e)))?
            .set("CropBox", Object::Array(crop));
        debug!(page = page_num, rotation = angle, ?rect, "cropped page");

        progress(page_num, page_count);
    }

    let output = save_document(&mut doc)?;
    info!(pages = page_count, bytes = output.len(), "crop complete");
    Ok(output)
}
