//! Header, cross-reference table, and trailer grammar.

use nom::bytes::complete::{tag, take};
use nom::multi::{count, many1};
use nom::sequence::{pair, preceded, terminated};
use nom::Parser;

use super::object::dictionary;
use super::{eol, space, unsigned_int, NomResult, ParserInput};
use crate::object::Dictionary;

/// `%PDF-1.N` followed by a line ending. The version digit is returned
/// unchecked; range validation (`0..=7`) is the caller's job
/// so that an out-of-range version can be reported with the value that
/// was actually found.
pub(crate) fn header(input: ParserInput) -> NomResult<u32> {
    terminated(preceded(tag(&b"%PDF-1."[..]), unsigned_int::<u32>), eol).parse(input)
}

/// One 20-byte fixed-width cross-reference entry: `nnnnnnnnnn ggggg u\r\n`
/// (or one of the other permitted two-byte line endings). Anything that
/// doesn't fit this exact shape is rejected rather than guessed at.
fn xref_entry(input: ParserInput) -> NomResult<(u64, u16, bool)> {
    nom::combinator::map_opt(take(20usize), |record: ParserInput| {
        let text = std::str::from_utf8(&record).ok()?;
        let offset: u64 = text.get(0..10)?.trim().parse().ok()?;
        let gen: u16 = text.get(11..16)?.trim().parse().ok()?;
        let flag = text.as_bytes().get(17).copied()?;
        match flag {
            b'n' => Some((offset, gen, true)),
            b'f' => Some((offset, gen, false)),
            _ => None,
        }
    })
    .parse(input)
}

/// One subsection: `firstObjNum count` header line followed by exactly
/// `count` fixed-width entries.
fn xref_subsection(input: ParserInput) -> NomResult<(u32, Vec<(u64, u16, bool)>)> {
    let (i, (first, entry_count)) = terminated(
        nom::sequence::separated_pair(unsigned_int::<u32>, tag(&b" "[..]), unsigned_int::<u32>),
        eol,
    )
    .parse(input)?;
    let (i, entries) = count(xref_entry, entry_count as usize).parse(i)?;
    Ok((i, (first, entries)))
}

/// The `xref` keyword followed by one or more subsections.
pub(crate) fn xref_table(input: ParserInput) -> NomResult<Vec<(u32, Vec<(u64, u16, bool)>)>> {
    preceded(pair(tag(&b"xref"[..]), eol), many1(xref_subsection)).parse(input)
}

/// `trailer` followed by the trailer dictionary.
pub(crate) fn trailer(input: ParserInput) -> NomResult<Dictionary> {
    preceded(pair(tag(&b"trailer"[..]), space), dictionary).parse(input)
}

/// The byte offset recorded after `startxref`.
pub(crate) fn xref_start_value(input: ParserInput) -> NomResult<u64> {
    preceded(pair(tag(&b"startxref"[..]), eol), unsigned_int::<u64>).parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(s: &[u8]) -> ParserInput<'_> {
        ParserInput::new_extra(s, "test")
    }

    #[test]
    fn parses_header_version() {
        let (_, v) = header(span(b"%PDF-1.4\n")).unwrap();
        assert_eq!(v, 4);
    }

    #[test]
    fn parses_single_subsection() {
        let text = b"xref\n0 2\n0000000000 65535 f\r\n0000000009 00000 n\r\n";
        let (_, sections) = xref_table(span(text)).unwrap();
        assert_eq!(sections.len(), 1);
        let (first, entries) = &sections[0];
        assert_eq!(*first, 0);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], (0, 65535, false));
        assert_eq!(entries[1], (9, 0, true));
    }

    #[test]
    fn rejects_short_entry_line() {
        let text = b"xref\n0 1\n0000000000 six f\r\n";
        assert!(xref_table(span(text)).is_err());
    }

    #[test]
    fn parses_trailer_dictionary() {
        let (_, dict) = trailer(span(b"trailer\n<< /Size 4 /Root 1 0 R >>\n")).unwrap();
        assert_eq!(dict.get(b"Size").unwrap().as_i64().unwrap(), 4);
    }

    #[test]
    fn parses_startxref_value() {
        let (_, offset) = xref_start_value(span(b"startxref\n564\n")).unwrap();
        assert_eq!(offset, 564);
    }
}
