//! Encrypted fixtures shared by the integration tests.

use lopdf::{Document, EncryptionState, EncryptionVersion, Object, Permissions, Stream, dictionary};

pub const TEXT: &str = "Hello, Encrypted World!";

/// One-page document; returns the plain bytes and the bytes encrypted with
/// `password` as the user password.
pub fn fixture(password: &str) -> (Vec<u8>, Vec<u8>) {
    let mut doc = Document::with_version("1.5");
    doc.trailer.set(
        "ID",
        Object::Array(vec![
            Object::string_literal(b"pwrecover-fixture".to_vec()),
            Object::string_literal(b"pwrecover-fixture".to_vec()),
        ]),
    );

    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let content = format!("BT\n/F1 12 Tf\n100 700 Td\n({TEXT}) Tj\nET\n");
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(612),
            Object::Integer(792),
        ],
        "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
        "Contents" => content_id,
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
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut plain = Vec::new();
    doc.save_to(&mut plain).unwrap();

    let version = EncryptionVersion::V2 {
        document: &doc,
        owner_password: "owner-secret",
        user_password: password,
        key_length: 128,
        permissions: Permissions::all(),
    };
    let state = EncryptionState::try_from(version).unwrap();
    doc.encrypt(&state).unwrap();

    let mut encrypted = Vec::new();
    doc.save_to(&mut encrypted).unwrap();
    (plain, encrypted)
}

pub fn page_text(bytes: &[u8]) -> String {
    let doc = Document::load_mem(bytes).unwrap();
    let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
    doc.extract_text(&pages).unwrap()
}

/// Reloads `bytes` and returns the object and page counts.
pub fn shape(bytes: &[u8]) -> (usize, usize) {
    let doc = Document::load_mem(bytes).unwrap();
    (doc.objects.len(), doc.get_pages().len())
}
