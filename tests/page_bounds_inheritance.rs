//! A page without its own `/MediaBox` inherits its parent's.

mod support;

use pdf_lite::ByteSource;

#[test]
fn mediabox_is_inherited_from_parent_when_absent_on_page() {
    let bodies = vec![
        (1, "1 0 obj<</Type/Catalog/Pages 2 0 R>>endobj\n".to_string()),
        (
            2,
            "2 0 obj<</Type/Pages/Kids[3 0 R]/Count 1/MediaBox[0 0 595 842]>>endobj\n".to_string(),
        ),
        (3, "3 0 obj<</Type/Page/Parent 2 0 R>>endobj\n".to_string()),
        (4, "4 0 obj<</Type/Font/Subtype/Type1/BaseFont/Helvetica>>endobj\n".to_string()),
    ];
    let bytes = support::assemble(5, &bodies, 1);
    let doc = pdf_lite::open_from_byte_source(ByteSource::new(bytes)).unwrap();

    assert_eq!(doc.get_page_bounds(0).unwrap(), [0, 0, 595, 842]);
}
