//! PDF page splitting
//!
//! Each selected page is embedded once as a Form XObject and drawn onto two
//! new pages, translated and clipped per [`split_geometry`]. Pages that are
//! not selected are kept as they are. Output order follows the source, with
//! the two halves taking the place of the page they came from.

use crate::error::PdfSplitError;
use crate::geometry::{split_geometry, HalfPage, PageGeometry, SplitMode};
use crate::page_info::{inherited_attribute, media_box, rotation};
use crate::{load_document, save_document};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, instrument};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"Resources", b"CropBox", b"Rotate"];

/// Resource name the embedded source page is registered under.
const SOURCE_XOBJECT: &[u8] = b"Src";

/// Options for a split run
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitOptions {
    /// Enlarge each half to 55% so the halves overlap by 10%.
    pub extended: bool,
}

impl SplitOptions {
    pub fn mode(&self) -> SplitMode {
        SplitMode::from(self.extended)
    }
}

/// Split the selected pages (1-indexed) of a PDF into halves.
///
/// `progress` is called with `(pages_done, total_pages)` after every source
/// page. An empty selection copies the document through unchanged.
#[instrument(skip_all, fields(selected = pages.len(), extended = options.extended))]
pub fn split_document<F>(
    bytes: &[u8],
    pages: &[u32],
    options: SplitOptions,
    mut progress: F,
) -> Result<Vec<u8>, PdfSplitError>
where
    F: FnMut(u32, u32),
{
    let mut doc = load_document(bytes)?;
    let source_pages = doc.get_pages();
    let page_count = source_pages.len() as u32;

    for &page in pages {
        if page == 0 || page > page_count {
            return Err(PdfSplitError::InvalidRange(format!(
                "Page {} does not exist (document has {} pages)",
                page, page_count
            )));
        }
    }
    let selected: HashSet<u32> = pages.iter().copied().collect();

    let root_id = page_tree_root(&doc)?;
    let mode = options.mode();
    let mut kids = Vec::with_capacity(source_pages.len() + selected.len());

    for (page_num, page_id) in source_pages {
        pin_inherited_attributes(&mut doc, page_id, root_id)?;

        if selected.contains(&page_num) {
            let (first, second) = split_page(&mut doc, page_id, root_id, mode)?;
            debug!(page = page_num, "split page");
            kids.push(first);
            kids.push(second);
        } else {
            kids.push(page_id);
        }

        progress(page_num, page_count);
    }

    update_page_tree(&mut doc, root_id, &kids)?;

    // Split originals and flattened intermediate nodes are now unreachable.
    doc.prune_objects();
    doc.compress();

    let output = save_document(&mut doc)?;
    info!(
        input_pages = page_count,
        output_pages = kids.len(),
        bytes = output.len(),
        "split complete"
    );
    Ok(output)
}

/// Replace one page with its two halves. Returns the new page ids in order.
fn split_page(
    doc: &mut Document,
    page_id: ObjectId,
    root_id: ObjectId,
    mode: SplitMode,
) -> Result<(ObjectId, ObjectId), PdfSplitError> {
    let bounds = media_box(doc, page_id)?;
    let geometry = PageGeometry::new(bounds[2] - bounds[0], bounds[3] - bounds[1]);
    let rotate = rotation(doc, page_id);

    let form_id = embed_page(doc, page_id, bounds)?;
    let result = split_geometry(geometry, mode);

    let first = add_half_page(doc, root_id, form_id, &result.first, rotate)?;
    let second = add_half_page(doc, root_id, form_id, &result.second, rotate)?;
    Ok((first, second))
}

/// Wrap a page's content and resources in a Form XObject.
///
/// The form's matrix moves the MediaBox origin to (0, 0) so offsets from
/// [`split_geometry`] apply directly.
fn embed_page(
    doc: &mut Document,
    page_id: ObjectId,
    bounds: [f64; 4],
) -> Result<ObjectId, PdfSplitError> {
    let content = doc
        .get_page_content(page_id)
        .map_err(|e| PdfSplitError::OperationError(format!("Read page content: {}", e)))?;
    let resources = inherited_attribute(doc, page_id, b"Resources")
        .cloned()
        .unwrap_or_else(|| Object::Dictionary(Dictionary::new()));

    let form = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"XObject".to_vec())),
        ("Subtype", Object::Name(b"Form".to_vec())),
        ("FormType", Object::Integer(1)),
        ("BBox", Object::Array(bounds.iter().map(|&v| real(v)).collect())),
        (
            "Matrix",
            Object::Array(vec![
                Object::Integer(1),
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(1),
                real(-bounds[0]),
                real(-bounds[1]),
            ]),
        ),
        ("Resources", resources),
    ]);

    Ok(doc.add_object(Stream::new(form, content)))
}

/// Add a page that draws the embedded source at the half's offset, clipped
/// to the half's bounds.
fn add_half_page(
    doc: &mut Document,
    root_id: ObjectId,
    form_id: ObjectId,
    half: &HalfPage,
    rotate: i64,
) -> Result<ObjectId, PdfSplitError> {
    let clip = half.clip;
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "re",
                vec![
                    real(clip.x),
                    real(clip.y),
                    real(clip.width),
                    real(clip.height),
                ],
            ),
            Operation::new("W", vec![]),
            Operation::new("n", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Integer(1),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(1),
                    real(half.offset_x),
                    real(half.offset_y),
                ],
            ),
            Operation::new("Do", vec![Object::Name(SOURCE_XOBJECT.to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let encoded = content
        .encode()
        .map_err(|e| PdfSplitError::SerializationError(e.to_string()))?;
    let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));

    let resources = Dictionary::from_iter(vec![(
        "XObject",
        Object::Dictionary(Dictionary::from_iter(vec![(
            SOURCE_XOBJECT.to_vec(),
            Object::Reference(form_id),
        )])),
    )]);

    let mut page = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(root_id)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                real(half.size.width),
                real(half.size.height),
            ]),
        ),
        ("Resources", Object::Dictionary(resources)),
        ("Contents", Object::Reference(content_id)),
    ]);
    if rotate != 0 {
        page.set("Rotate", Object::Integer(rotate));
    }

    Ok(doc.add_object(page))
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

/// Copy inherited attributes onto the page and hang it directly off the root.
///
/// The rebuilt page tree is flat, so anything a page used to inherit from an
/// intermediate node has to live on the page itself.
pub(crate) fn pin_inherited_attributes(
    doc: &mut Document,
    page_id: ObjectId,
    root_id: ObjectId,
) -> Result<(), PdfSplitError> {
    let inherited: Vec<(&[u8], Object)> = INHERITABLE
        .iter()
        .filter_map(|key| {
            inherited_attribute(doc, page_id, key)
                .cloned()
                .map(|value| (*key, value))
        })
        .collect();

    let page = doc
        .get_dictionary_mut(page_id)
        .map_err(|e| PdfSplitError::OperationError(format!("Page object: {}", e)))?;
    for (key, value) in inherited {
        if !page.has(key) {
            page.set(key.to_vec(), value);
        }
    }
    page.set("Parent", Object::Reference(root_id));
    Ok(())
}

/// Object id of the root Pages node
pub(crate) fn page_tree_root(doc: &Document) -> Result<ObjectId, PdfSplitError> {
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| PdfSplitError::OperationError("No Root in trailer".into()))?;

    doc.get_dictionary(catalog_id)
        .map_err(|_| PdfSplitError::OperationError("Invalid catalog".into()))?
        .get(b"Pages")
        .and_then(Object::as_reference)
        .map_err(|_| PdfSplitError::OperationError("No Pages in catalog".into()))
}

/// Point the root Pages node at `page_refs`
fn update_page_tree(
    doc: &mut Document,
    root_id: ObjectId,
    page_refs: &[ObjectId],
) -> Result<(), PdfSplitError> {
    let pages_dict = doc
        .get_dictionary_mut(root_id)
        .map_err(|_| PdfSplitError::OperationError("Invalid pages dictionary".into()))?;

    let kids = page_refs
        .iter()
        .map(|&id| Object::Reference(id))
        .collect::<Vec<_>>();
    pages_dict.set("Kids", Object::Array(kids));
    pages_dict.set("Count", Object::Integer(page_refs.len() as i64));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_info::PageInfo;
    use crate::test_support::{create_nested_test_pdf, create_test_pdf, create_test_pdf_with_size};
    use pretty_assertions::assert_eq;

    fn sizes(bytes: &[u8]) -> Vec<(f64, f64)> {
        let doc = Document::load_mem(bytes).unwrap();
        PageInfo::all_from_document(&doc)
            .unwrap()
            .iter()
            .map(|p| ((p.width * 100.0).round() / 100.0, (p.height * 100.0).round() / 100.0))
            .collect()
    }

    /// Translation operands of the page's `cm` operator.
    fn translation_of(bytes: &[u8], page_num: u32) -> (f32, f32) {
        let doc = Document::load_mem(bytes).unwrap();
        let page_id = doc.get_pages()[&page_num];
        let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
        let cm = content
            .operations
            .iter()
            .find(|op| op.operator == "cm")
            .expect("cm operator");
        (
            cm.operands[4].as_float().unwrap(),
            cm.operands[5].as_float().unwrap(),
        )
    }

    fn content_of(bytes: &[u8], page_num: u32) -> String {
        let doc = Document::load_mem(bytes).unwrap();
        let page_id = doc.get_pages()[&page_num];
        String::from_utf8_lossy(&doc.get_page_content(page_id).unwrap()).into_owned()
    }

    #[test]
    fn test_ten_page_portrait_range_two_to_four() {
        let pdf = create_test_pdf(10);
        let output = split_document(&pdf, &[2, 3, 4], SplitOptions::default(), |_, _| {}).unwrap();

        let sizes = sizes(&output);
        assert_eq!(sizes.len(), 13);
        assert_eq!(sizes[0], (612.0, 792.0));
        for half in &sizes[1..7] {
            assert_eq!(*half, (612.0, 396.0));
        }
        for page in &sizes[7..] {
            assert_eq!(*page, (612.0, 792.0));
        }

        // Unsplit pages keep their content and order.
        assert!(content_of(&output, 1).contains("Page 1"));
        assert!(content_of(&output, 8).contains("Page 5"));
        assert!(content_of(&output, 13).contains("Page 10"));
    }

    #[test]
    fn test_halves_draw_embedded_source() {
        let pdf = create_test_pdf(1);
        let output = split_document(&pdf, &[1], SplitOptions::default(), |_, _| {}).unwrap();

        assert!(content_of(&output, 1).contains("/Src Do"));
        // Portrait halves come out in reading order: upper half first.
        assert_eq!(translation_of(&output, 1), (0.0, -396.0));
        assert_eq!(translation_of(&output, 2), (0.0, 0.0));
    }

    #[test]
    fn test_extended_portrait_upper_half_first() {
        let pdf = create_test_pdf_with_size(1, 600, 1000);
        let options = SplitOptions { extended: true };
        let output = split_document(&pdf, &[1], options, |_, _| {}).unwrap();

        assert_eq!(sizes(&output), vec![(600.0, 550.0), (600.0, 550.0)]);
        assert_eq!(translation_of(&output, 1), (0.0, -450.0));
        assert_eq!(translation_of(&output, 2), (0.0, 0.0));
    }

    #[test]
    fn test_landscape_extended_split() {
        let pdf = create_test_pdf_with_size(1, 1000, 600);
        let options = SplitOptions { extended: true };
        let output = split_document(&pdf, &[1], options, |_, _| {}).unwrap();

        assert_eq!(sizes(&output), vec![(550.0, 600.0), (550.0, 600.0)]);
        assert_eq!(translation_of(&output, 1), (0.0, 0.0));
        assert_eq!(translation_of(&output, 2), (-450.0, 0.0));
    }

    #[test]
    fn test_empty_selection_copies_through() {
        let pdf = create_test_pdf(3);
        let output = split_document(&pdf, &[], SplitOptions::default(), |_, _| {}).unwrap();
        assert_eq!(sizes(&output), vec![(612.0, 792.0); 3]);
    }

    #[test]
    fn test_out_of_range_selection_fails() {
        let pdf = create_test_pdf(3);
        let result = split_document(&pdf, &[4], SplitOptions::default(), |_, _| {});
        assert!(matches!(result, Err(PdfSplitError::InvalidRange(_))));
        let result = split_document(&pdf, &[0], SplitOptions::default(), |_, _| {});
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_pdf_fails() {
        let result = split_document(b"garbage", &[1], SplitOptions::default(), |_, _| {});
        assert!(matches!(result, Err(PdfSplitError::ParseError(_))));
    }

    #[test]
    fn test_progress_reported_per_page() {
        let pdf = create_test_pdf(4);
        let mut calls = Vec::new();
        split_document(&pdf, &[2], SplitOptions::default(), |done, total| {
            calls.push((done, total))
        })
        .unwrap();
        assert_eq!(calls, vec![(1, 4), (2, 4), (3, 4), (4, 4)]);
    }

    #[test]
    fn test_nested_page_tree_inherits_attributes() {
        let pdf = create_nested_test_pdf();
        let output = split_document(&pdf, &[2], SplitOptions::default(), |_, _| {}).unwrap();

        let doc = Document::load_mem(&output).unwrap();
        let infos = PageInfo::all_from_document(&doc).unwrap();
        assert_eq!(infos.len(), 3);
        assert_eq!((infos[0].width, infos[0].height), (842.0, 595.0));
        assert_eq!((infos[1].width, infos[1].height), (421.0, 595.0));
        assert!(infos.iter().all(|p| p.rotation == 90));
    }

    #[test]
    fn test_options_deserialize() {
        let options: SplitOptions = serde_json::from_str(r#"{"extended": true}"#).unwrap();
        assert_eq!(options.mode(), SplitMode::Extended);
        let options: SplitOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options.mode(), SplitMode::Normal);
    }
}
