//! An indirectly-specified `/Length`, and a stream naming a filter this
//! crate does not implement.

mod support;

use pdf_lite::{ByteSource, Error};

#[test]
fn indirect_length_reads_exact_byte_count() {
    let data = b"hello world";
    let bodies = vec![
        (1, "1 0 obj<</Type/Catalog/Pages 2 0 R>>endobj\n".to_string()),
        (2, "2 0 obj<</Type/Pages/Kids[3 0 R]/Count 1>>endobj\n".to_string()),
        (
            3,
            "3 0 obj<</Type/Page/Parent 2 0 R/MediaBox[0 0 612 792]/Contents 4 0 R>>endobj\n".to_string(),
        ),
        (
            4,
            format!(
                "4 0 obj<</Length 9 0 R>>stream\n{}\nendstream\nendobj\n",
                std::str::from_utf8(data).unwrap()
            ),
        ),
        (9, format!("9 0 obj {} endobj\n", data.len())),
    ];
    let bytes = support::assemble(4, &bodies, 1);
    let doc = pdf_lite::open_from_byte_source(ByteSource::new(bytes)).unwrap();

    let page = doc.get_page(0).unwrap();
    let contents_id = page.as_dict().unwrap().get(b"Contents").unwrap().as_reference().unwrap();
    let stream_obj = doc.get_object(contents_id).unwrap();
    assert_eq!(stream_obj.stream.as_deref(), Some(&data[..]));
}

#[test]
fn unsupported_filter_fails_dereference() {
    let bodies = vec![
        (1, "1 0 obj<</Type/Catalog/Pages 2 0 R>>endobj\n".to_string()),
        (2, "2 0 obj<</Type/Pages/Kids[3 0 R]/Count 1>>endobj\n".to_string()),
        (
            3,
            "3 0 obj<</Type/Page/Parent 2 0 R/MediaBox[0 0 612 792]/Contents 4 0 R>>endobj\n".to_string(),
        ),
        (
            4,
            "4 0 obj<</Length 4/Filter/LZWDecode>>stream\nabcd\nendstream\nendobj\n".to_string(),
        ),
    ];
    let bytes = support::assemble(4, &bodies, 1);
    let doc = pdf_lite::open_from_byte_source(ByteSource::new(bytes)).unwrap();

    let page = doc.get_page(0).unwrap();
    let contents_id = page.as_dict().unwrap().get(b"Contents").unwrap().as_reference().unwrap();
    let err = doc.get_object(contents_id).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFilter(name) if name == "LZWDecode"));
}
