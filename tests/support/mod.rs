//! Builds minimal synthetic PDF byte strings for whole-document
//! integration tests. Offsets and `/Size` are computed from the assembled
//! buffer rather than hand-counted, the way lopdf's own
//! `reader::tests::load_many_shallow_brackets` builds its fixture with
//! `format!` instead of shipping a binary asset.

use std::collections::BTreeMap;

/// One 20-byte fixed-width xref entry: `nnnnnnnnnn ggggg u\r\n`.
fn xref_line(offset: usize, gen: u16, in_use: bool) -> String {
    format!("{:010} {:05} {}\r\n", offset, gen, if in_use { 'n' } else { 'f' })
}

/// Assemble `%PDF-1.N` + each body object (in the order given) + a
/// single-subsection xref table + trailer + startxref footer.
///
/// `bodies` is `(object_number, "N G obj ... endobj\n")`. Object numbers
/// need not be contiguous; a gap is recorded as a free ('f') entry.
pub fn assemble(minor_version: u8, bodies: &[(u32, String)], root_num: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(format!("%PDF-1.{minor_version}\n").as_bytes());

    let mut offsets: BTreeMap<u32, usize> = BTreeMap::new();
    let max_num = bodies.iter().map(|(n, _)| *n).max().expect("at least one body object");
    for (num, body) in bodies {
        offsets.insert(*num, buf.len());
        buf.extend_from_slice(body.as_bytes());
    }

    let xref_start = buf.len();
    buf.extend_from_slice(b"xref\n");
    buf.extend_from_slice(format!("0 {}\n", max_num + 1).as_bytes());
    buf.extend_from_slice(xref_line(0, 65535, false).as_bytes());
    for num in 1..=max_num {
        match offsets.get(&num) {
            Some(&offset) => buf.extend_from_slice(xref_line(offset, 0, true).as_bytes()),
            None => buf.extend_from_slice(xref_line(0, 0, false).as_bytes()),
        }
    }

    buf.extend_from_slice(format!("trailer\n<< /Size {} /Root {} 0 R >>\n", max_num + 1, root_num).as_bytes());
    buf.extend_from_slice(format!("startxref\n{xref_start}\n%%EOF").as_bytes());
    buf
}

/// The catalog/pages/page/font/content-stream quintet a minimal
/// well-formed document needs, with a one-line content stream that
/// exercises the text sub-grammar.
pub fn minimal_document() -> Vec<u8> {
    let content = b"q 1 0 0 1 72 720 cm BT /F1 12 Tf (Hello) Tj ET Q";
    let bodies = vec![
        (1, "1 0 obj<</Type/Catalog/Pages 2 0 R>>endobj\n".to_string()),
        (2, "2 0 obj<</Type/Pages/Kids[3 0 R]/Count 1>>endobj\n".to_string()),
        (
            3,
            "3 0 obj<</Type/Page/Parent 2 0 R/MediaBox[0 0 612 792]/Contents 5 0 R\
             /Resources<</Font<</F1 4 0 R>>>>>>endobj\n"
                .to_string(),
        ),
        (4, "4 0 obj<</Type/Font/Subtype/Type1/BaseFont/Helvetica>>endobj\n".to_string()),
        (
            5,
            format!(
                "5 0 obj<</Length {}>>stream\n{}\nendstream\nendobj\n",
                content.len(),
                std::str::from_utf8(content).unwrap()
            ),
        ),
    ];
    assemble(4, &bodies, 1)
}
