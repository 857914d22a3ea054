//! Nom-combinator parsing for the PDF object grammar.
//!
//! Numeric tokens are ambiguous until whatever follows them is seen: a
//! bare integer, the first half of `N G obj`, and the first half of
//! `N G R` all start identically. Rather than a hand-rolled lookahead
//! queue, this follows lopdf's own approach: `reference` is tried before
//! `integer` in the object alternative, so a `N G R` is recognized by
//! successfully matching the longer alternative first and plain integers
//! fall out of the backtrack.

pub(crate) mod content;
pub(crate) mod object;
pub(crate) mod xref;

use std::str::{self, FromStr};

use nom::branch::alt;
use nom::bytes::complete::{tag, take, take_while, take_while1};
use nom::character::complete::{digit1, one_of};
use nom::combinator::{map, map_res, opt};
use nom::error::ErrorKind;
use nom::multi::many0_count;
use nom::sequence::pair;
use nom::{AsChar, Parser};
use nom_locate::LocatedSpan;

pub(crate) type ParserInput<'a> = LocatedSpan<&'a [u8], &'a str>;
pub(crate) type NomError<'a> = nom::error::Error<ParserInput<'a>>;
pub(crate) type NomResult<'a, O, E = NomError<'a>> = nom::IResult<ParserInput<'a>, O, E>;

#[inline]
pub(crate) fn strip_nom<O>(r: NomResult<O>) -> Option<O> {
    r.ok().map(|(_, o)| o)
}

pub(crate) fn eol(input: ParserInput) -> NomResult<ParserInput> {
    alt((tag(&b"\r\n"[..]), tag(&b"\n"[..]), tag(&b"\r"[..]))).parse(input)
}

pub(crate) fn comment(input: ParserInput) -> NomResult<()> {
    map(
        (tag(&b"%"[..]), take_while(|c: u8| !b"\r\n".contains(&c)), eol),
        |_| (),
    )
    .parse(input)
}

#[inline]
pub(crate) fn is_whitespace(c: u8) -> bool {
    b" \t\n\r\0\x0C".contains(&c)
}

#[inline]
pub(crate) fn is_delimiter(c: u8) -> bool {
    b"()<>[]/%".contains(&c)
}

#[inline]
pub(crate) fn is_regular(c: u8) -> bool {
    !is_whitespace(c) && !is_delimiter(c)
}

/// Whitespace and comments, zero or more.
pub(crate) fn space(input: ParserInput) -> NomResult<()> {
    map(
        pair(
            take_while(is_whitespace),
            many0_count(pair(comment, take_while(is_whitespace))),
        ),
        |_| (),
    )
    .parse(input)
}

pub(crate) fn unsigned_int<I: FromStr>(input: ParserInput) -> NomResult<I> {
    map_res(digit1, |digits: ParserInput| {
        I::from_str(str::from_utf8(&digits).unwrap())
    })
    .parse(input)
}

pub(crate) fn integer(input: ParserInput) -> NomResult<i32> {
    let (i, _) = pair(opt(one_of("+-")), digit1).parse(input)?;
    let int_input = &input[..input.len() - i.len()];
    let text = str::from_utf8(int_input).unwrap();
    i32::from_str(text)
        .map(|v| (i, v))
        .map_err(|_| nom::Err::Error(NomError::from_error_kind(i, ErrorKind::Digit)))
}

#[inline]
pub(crate) fn hex_digit(input: ParserInput) -> NomResult<u8> {
    nom::combinator::map_opt(take(1usize), |c: ParserInput| {
        str::from_utf8(&c).ok().and_then(|c| u8::from_str_radix(c, 16).ok())
    })
    .parse(input)
}

/// A `/Name`: bytes up to the next whitespace or delimiter (unlike full
/// PDF this reader does not interpret `#xx` escapes).
pub(crate) fn name(input: ParserInput) -> NomResult<Vec<u8>> {
    let (i, _) = tag(&b"/"[..]).parse(input)?;
    let (i, bytes) = take_while1(|c: u8| is_regular(c)).parse(i)?;
    Ok((i, bytes.to_vec()))
}

pub(crate) fn is_hex_digit_byte(c: u8) -> bool {
    AsChar::is_hex_digit(c)
}
