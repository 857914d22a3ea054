//! The object grammar: dictionaries, arrays, names, strings, hex strings,
//! integers, and indirect references, plus the enclosing
//! `N G obj … endobj` / stream framing a full body object is parsed from.

use nom::branch::alt;
use nom::bytes::complete::{tag, take};
use nom::multi::{fold_many0, many0};
use nom::sequence::{delimited, pair, preceded, terminated};
use nom::Parser;

use super::{hex_digit, integer, name, space, strip_nom, unsigned_int, NomError, NomResult, ParserInput};
use crate::error::{Error, ParseError};
use crate::object::{BaseObject, Dictionary, Object, ObjectId};

/// Bound on nested `(` `)` depth in a literal string, guarding against
/// pathological input.
pub(crate) const MAX_BRACKET: usize = 100;

fn inner_literal_string(depth: usize) -> impl Fn(ParserInput) -> NomResult<Vec<u8>> {
    move |input| {
        fold_many0(
            alt((
                nom::combinator::map(
                    nom::bytes::complete::take_while1(|c: u8| c != b'(' && c != b')'),
                    |s: ParserInput| s.to_vec(),
                ),
                nested_literal_string(depth),
            )),
            Vec::new,
            |mut out: Vec<u8>, mut part: Vec<u8>| {
                out.append(&mut part);
                out
            },
        )
        .parse(input)
    }
}

fn nested_literal_string(depth: usize) -> impl Fn(ParserInput) -> NomResult<Vec<u8>> {
    move |input| {
        if depth == 0 {
            Err(nom::Err::Error(NomError::from_error_kind(
                input,
                nom::error::ErrorKind::TooLarge,
            )))
        } else {
            nom::combinator::map(
                delimited(tag(&b"("[..]), inner_literal_string(depth - 1), tag(&b")"[..])),
                |content| {
                    let mut v = Vec::with_capacity(content.len() + 2);
                    v.push(b'(');
                    v.extend_from_slice(&content);
                    v.push(b')');
                    v
                },
            )
            .parse(input)
        }
    }
}

/// A literal string is balanced parentheses; escape sequences are out of
/// scope for this reader.
pub(crate) fn literal_string(input: ParserInput) -> NomResult<Vec<u8>> {
    delimited(tag(&b"("[..]), inner_literal_string(MAX_BRACKET), tag(&b")"[..])).parse(input)
}

/// A hex string: pairs of hex digits with whitespace ignored between
/// them; a trailing odd nibble is padded with a zero low nibble.
pub(crate) fn hex_string(input: ParserInput) -> NomResult<Vec<u8>> {
    nom::combinator::map(
        delimited(
            tag(&b"<"[..]),
            terminated(
                fold_many0(
                    nom::sequence::preceded(space, hex_digit),
                    || (Vec::new(), false),
                    |(mut out, half_written), c| {
                        if !half_written {
                            out.push(c << 4);
                        } else {
                            *out.last_mut().unwrap() |= c;
                        }
                        (out, !half_written)
                    },
                ),
                space,
            ),
            tag(&b">"[..]),
        ),
        |(bytes, _)| bytes,
    )
    .parse(input)
}

pub(crate) fn object_id(input: ParserInput) -> NomResult<ObjectId> {
    nom::combinator::map(
        pair(
            terminated(unsigned_int::<u16>, space),
            terminated(unsigned_int::<u16>, space),
        ),
        |(num, gen)| ObjectId::new(num, gen),
    )
    .parse(input)
}

fn reference(input: ParserInput) -> NomResult<Object> {
    nom::combinator::map(terminated(object_id, tag(&b"R"[..])), Object::Reference).parse(input)
}

fn array(input: ParserInput) -> NomResult<Vec<Object>> {
    delimited(pair(tag(&b"["[..]), space), many0(direct_object_inner), tag(&b"]"[..])).parse(input)
}

fn inner_dictionary(input: ParserInput) -> NomResult<Dictionary> {
    fold_many0(
        pair(terminated(name, space), direct_object_inner),
        Dictionary::new,
        |mut dict, (key, value)| {
            dict.insert_parsed(key, value);
            dict
        },
    )
    .parse(input)
}

pub(crate) fn dictionary(input: ParserInput) -> NomResult<Dictionary> {
    delimited(pair(tag(&b"<<"[..]), space), inner_dictionary, tag(&b">>"[..])).parse(input)
}

/// `N G R` is tried before a bare integer so that the longer, more
/// specific grammar production wins; a failed match backtracks into the
/// plain-integer alternative. See the module doc for why this stands in
/// for an explicit lookahead queue.
fn direct_object_inner(input: ParserInput) -> NomResult<Object> {
    terminated(
        alt((
            reference,
            nom::combinator::map(integer, Object::Integer),
            nom::combinator::map(name, Object::Name),
            nom::combinator::map(literal_string, Object::String),
            nom::combinator::map(hex_string, Object::HexString),
            nom::combinator::map(array, Object::Array),
            nom::combinator::map(dictionary, Object::Dictionary),
        )),
        space,
    )
    .parse(input)
}

/// Parse one self-contained object value (used for array elements,
/// dictionary values, and anywhere else a bare object is expected).
pub fn direct_object(input: ParserInput) -> Option<Object> {
    strip_nom(direct_object_inner(input))
}

/// The body-object header `N G obj`. Unlike `object_id` (used by the
/// `N G R` reference production, where surrounding whitespace is
/// unremarkable), the generation number here must be followed by
/// exactly one literal space before the `obj` keyword — `"7 0obj"` and
/// `"7 0   obj"` are both rejected rather than accepted, matching what
/// the id pair's header line actually looks like on disk.
fn indirect_object_header(input: ParserInput) -> NomResult<ObjectId> {
    nom::combinator::map(
        terminated(
            pair(preceded(space, terminated(unsigned_int::<u16>, space)), unsigned_int::<u16>),
            pair(tag(&b" "[..]), pair(tag(&b"obj"[..]), space)),
        ),
        |(num, gen)| ObjectId::new(num, gen),
    )
    .parse(input)
}

fn stream_length(dict: &Dictionary, resolve_length: &mut dyn FnMut(ObjectId) -> Option<i64>) -> Option<i64> {
    match dict.get(b"Length")? {
        Object::Integer(n) => Some(*n as i64),
        Object::Reference(id) => resolve_length(*id),
        _ => None,
    }
}

fn stream_after_dict<'a>(
    input: ParserInput<'a>,
    dict: &Dictionary,
    id: ObjectId,
    resolve_length: &mut dyn FnMut(ObjectId) -> Option<i64>,
) -> Result<(ParserInput<'a>, Option<Vec<u8>>), Error> {
    let probe = pair(
        space,
        pair(tag::<_, _, NomError>(&b"stream"[..]), alt((tag(&b"\r\n"[..]), tag(&b"\n"[..])))),
    )
    .parse(input);

    let Ok((after_kw, _)) = probe else {
        return Ok((input, None));
    };

    let length = stream_length(dict, resolve_length).ok_or(ParseError::MalformedStream {
        id,
        reason: "missing or non-integer /Length",
    })?;
    if length < 0 {
        return Err(ParseError::MalformedStream {
            id,
            reason: "negative /Length",
        }
        .into());
    }

    let (after_data, data) = take::<_, _, NomError>(length as usize)
        .parse(after_kw)
        .map_err(|_| ParseError::MalformedStream {
            id,
            reason: "stream runs past end of file",
        })?;

    let (after_endstream, _) = pair(space, tag::<_, _, NomError>(&b"endstream"[..]))
        .parse(after_data)
        .map_err(|_| ParseError::MalformedStream {
            id,
            reason: "missing 'endstream'",
        })?;

    Ok((after_endstream, Some(data.to_vec())))
}

/// Parse a complete `N G obj … [stream …] endobj` body at a known byte
/// offset, resolving `/Length` through `resolve_length` when it is an
/// indirect reference.
pub(crate) fn parse_indirect_object(
    buffer: &[u8],
    offset: usize,
    expected_id: Option<ObjectId>,
    resolve_length: &mut dyn FnMut(ObjectId) -> Option<i64>,
) -> Result<(ObjectId, BaseObject), Error> {
    if offset > buffer.len() {
        return Err(ParseError::MalformedObject {
            offset,
            reason: "offset past end of file",
        }
        .into());
    }

    let start = ParserInput::new_extra(&buffer[offset..], "object");
    let (rest, id) = indirect_object_header(start).map_err(|_| ParseError::MalformedObject {
        offset,
        reason: "missing 'N G obj' header",
    })?;

    if let Some(expected) = expected_id {
        if id != expected {
            return Err(ParseError::ObjectIdMismatch { expected, found: id }.into());
        }
    }

    let (rest, value) = direct_object_inner(rest).map_err(|_| ParseError::MalformedObject {
        offset,
        reason: "failed to parse object body",
    })?;

    let (rest, stream) = match &value {
        Object::Dictionary(dict) => stream_after_dict(rest, dict, id, resolve_length)?,
        _ => (rest, None),
    };

    pair(space, tag::<_, _, NomError>(&b"endobj"[..]))
        .parse(rest)
        .map_err(|_| ParseError::MalformedObject {
            offset,
            reason: "missing 'endobj'",
        })?;

    Ok((id, BaseObject { value, stream }))
}
