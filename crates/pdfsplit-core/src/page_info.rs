//! Page-level information extraction
//!
//! Reads page sizes from the page tree, following inherited attributes, and
//! scales them to viewport pixels for the page inspector.

use crate::error::PdfSplitError;
use crate::geometry::PageGeometry;
use lopdf::{Dictionary, Document, Object, ObjectId};
use serde::Serialize;

/// Used when neither the page nor any ancestor carries a MediaBox.
pub const DEFAULT_MEDIA_BOX: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

/// Information about a single PDF page
#[derive(Debug, Clone, Serialize)]
pub struct PageInfo {
    /// Page number (1-indexed)
    pub page_num: u32,
    /// Page width in points (1 point = 1/72 inch)
    pub width: f64,
    /// Page height in points
    pub height: f64,
    /// Page rotation in degrees (0, 90, 180, 270)
    pub rotation: i64,
    /// Estimated orientation based on dimensions
    pub orientation: PageOrientation,
}

/// Page orientation
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub enum PageOrientation {
    Portrait,
    Landscape,
    Square,
}

/// Page size in viewport pixels at a given scale
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct ScaledDimensions {
    pub width: f64,
    pub height: f64,
    pub scale: f64,
}

impl PageInfo {
    /// Extract page info from a document
    pub fn from_document(doc: &Document, page_num: u32) -> Result<Self, PdfSplitError> {
        let page_id = *doc
            .get_pages()
            .get(&page_num)
            .ok_or_else(|| PdfSplitError::InvalidRange(format!("Page {} not found", page_num)))?;

        let media_box = media_box(doc, page_id)?;
        let (width, height) = (media_box[2] - media_box[0], media_box[3] - media_box[1]);
        let rotation = rotation(doc, page_id);

        let (effective_width, effective_height) = if rotation == 90 || rotation == 270 {
            (height, width)
        } else {
            (width, height)
        };
        let orientation = if (effective_width - effective_height).abs() < 1.0 {
            PageOrientation::Square
        } else if effective_width > effective_height {
            PageOrientation::Landscape
        } else {
            PageOrientation::Portrait
        };

        Ok(Self {
            page_num,
            width,
            height,
            rotation,
            orientation,
        })
    }

    /// Get all page infos for a document
    pub fn all_from_document(doc: &Document) -> Result<Vec<Self>, PdfSplitError> {
        let count = doc.get_pages().len() as u32;
        (1..=count).map(|n| Self::from_document(doc, n)).collect()
    }

    pub fn geometry(&self) -> PageGeometry {
        PageGeometry::new(self.width, self.height)
    }

    /// Pixel size of the page rendered at `scale` pixels per point.
    pub fn scaled(&self, scale: f64) -> ScaledDimensions {
        ScaledDimensions {
            width: (self.width * scale).floor(),
            height: (self.height * scale).floor(),
            scale,
        }
    }

    /// Scale that makes the page `target_width` pixels wide.
    pub fn scale_to_width(&self, target_width: f64) -> ScaledDimensions {
        self.scaled(target_width / self.width)
    }
}

/// Look up `key` on the page or the nearest ancestor in the page tree.
pub(crate) fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut node = doc.get_dictionary(page_id).ok();
    // Bounded walk; malformed files can contain Parent cycles.
    for _ in 0..64 {
        let dict: &Dictionary = node?;
        if let Ok(value) = dict.get(key) {
            return Some(value);
        }
        node = dict
            .get(b"Parent")
            .and_then(Object::as_reference)
            .and_then(|id| doc.get_dictionary(id))
            .ok();
    }
    None
}

/// MediaBox as `[x1, y1, x2, y2]`, inheriting from ancestors.
pub fn media_box(doc: &Document, page_id: ObjectId) -> Result<[f64; 4], PdfSplitError> {
    match inherited_attribute(doc, page_id, b"MediaBox") {
        Some(obj) => parse_box(doc, obj),
        None => Ok(DEFAULT_MEDIA_BOX),
    }
}

/// Parse a box array, resolving an indirect reference if needed.
fn parse_box(doc: &Document, obj: &Object) -> Result<[f64; 4], PdfSplitError> {
    let obj = match obj {
        Object::Reference(id) => doc
            .get_object(*id)
            .map_err(|e| PdfSplitError::ParseError(format!("MediaBox reference: {}", e)))?,
        other => other,
    };
    let array = obj
        .as_array()
        .map_err(|_| PdfSplitError::ParseError("MediaBox is not an array".into()))?;
    if array.len() != 4 {
        return Err(PdfSplitError::ParseError(format!(
            "MediaBox has {} elements, expected 4",
            array.len()
        )));
    }

    let mut result = [0.0; 4];
    for (i, value) in array.iter().enumerate() {
        result[i] = match value {
            Object::Integer(n) => *n as f64,
            Object::Real(n) => *n as f64,
            _ => {
                return Err(PdfSplitError::ParseError(format!(
                    "MediaBox element {} is not a number",
                    i
                )))
            }
        };
    }

    // Normalize so (x1, y1) is the lower-left corner.
    Ok([
        result[0].min(result[2]),
        result[1].min(result[3]),
        result[0].max(result[2]),
        result[1].max(result[3]),
    ])
}

/// Rotation in degrees, inheriting from ancestors
pub fn rotation(doc: &Document, page_id: ObjectId) -> i64 {
    inherited_attribute(doc, page_id, b"Rotate")
        .and_then(|obj| obj.as_i64().ok())
        .map(normalize_rotation)
        .unwrap_or(0)
}

/// Normalize rotation to 0, 90, 180, or 270
fn normalize_rotation(angle: i64) -> i64 {
    angle.rem_euclid(360)
}
