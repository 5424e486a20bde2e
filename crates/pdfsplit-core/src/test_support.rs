//! In-memory PDFs for unit tests

use lopdf::{content::Content, content::Operation, Dictionary, Document, Object, Stream};

/// Create a simple letter-size PDF with N pages
pub(crate) fn create_test_pdf(num_pages: u32) -> Vec<u8> {
    create_test_pdf_with_size(num_pages, 612, 792)
}

/// Create a PDF with N pages of the given size, each labelled "Page i"
pub(crate) fn create_test_pdf_with_size(num_pages: u32, width: i64, height: i64) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
    ]));
    let resources_id = doc.add_object(Dictionary::from_iter(vec![(
        "Font",
        Object::Dictionary(Dictionary::from_iter(vec![("F1", Object::Reference(font_id))])),
    )]));

    let mut page_ids = Vec::new();

    for i in 0..num_pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new(
                    "Tf",
                    vec![Object::Name(b"F1".to_vec()), Object::Integer(12)],
                ),
                Operation::new("Td", vec![Object::Integer(100), Object::Integer(100)]),
                Operation::new(
                    "Tj",
                    vec![Object::String(
                        format!("Page {}", i + 1).into_bytes(),
                        lopdf::StringFormat::Literal,
                    )],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));

        let page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(width),
                    Object::Integer(height),
                ]),
            ),
            ("Resources", Object::Reference(resources_id)),
            ("Contents", Object::Reference(content_id)),
        ]);
        page_ids.push(doc.add_object(page));
    }

    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(num_pages as i64)),
        (
            "Kids",
            Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
        ),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    finish(doc, pages_id)
}

/// Two pages under an intermediate Pages node that carries MediaBox and Rotate.
pub(crate) fn create_nested_test_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let root_pages_id = doc.new_object_id();
    let inner_pages_id = doc.new_object_id();

    let mut page_ids = Vec::new();
    for i in 0..2 {
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            format!("0 0 m {} 100 l S", 50 * (i + 1)).into_bytes(),
        ));
        let page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(inner_pages_id)),
            ("Contents", Object::Reference(content_id)),
        ]);
        page_ids.push(doc.add_object(page));
    }

    let inner = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Parent", Object::Reference(root_pages_id)),
        ("Count", Object::Integer(2)),
        (
            "Kids",
            Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
        ),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(842),
                Object::Integer(595),
            ]),
        ),
        ("Rotate", Object::Integer(90)),
        ("Resources", Object::Dictionary(Dictionary::new())),
    ]);
    doc.objects.insert(inner_pages_id, Object::Dictionary(inner));

    let root = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(2)),
        ("Kids", Object::Array(vec![Object::Reference(inner_pages_id)])),
    ]);
    doc.objects.insert(root_pages_id, Object::Dictionary(root));

    finish(doc, root_pages_id)
}

fn finish(mut doc: Document, pages_id: lopdf::ObjectId) -> Vec<u8> {
    let catalog = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]);
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}
