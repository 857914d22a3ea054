//! Content-stream operand/operator grammar: a flat postfix
//! sequence of operands followed by an operator keyword, repeated to the
//! end of the stream. This module only recognizes the token shapes; arity
//! and type checking against a specific operator belong to the
//! interpreter, which dispatches on [`RawOperation`].

use nom::branch::alt;
use nom::bytes::complete::{tag, take_while, take_while1};
use nom::character::complete::{digit1, one_of};
use nom::combinator::{map, opt};
use nom::multi::many0;
use nom::sequence::{delimited, pair, terminated};
use nom::Parser;

use super::object::{literal_string, name};
use super::{is_delimiter, is_whitespace, space, strip_nom, NomResult, ParserInput};

/// One operand on the content-stream operand stack.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentValue {
    Name(Vec<u8>),
    Real(f32),
    Str(Vec<u8>),
    Array(Vec<ContentValue>),
}

/// One unparsed operator application: the operands that preceded it (in
/// the order they were pushed) and the operator keyword itself.
#[derive(Debug, Clone, PartialEq)]
pub struct RawOperation {
    pub operator: String,
    pub operands: Vec<ContentValue>,
}

fn real(input: ParserInput) -> NomResult<f32> {
    let (rest, _) = pair(opt(one_of("+-")), alt((pair(digit1, opt(pair(tag(&b"."[..]), opt(digit1)))).map(|_| ()), pair(tag(&b"."[..]), digit1).map(|_| ())))).parse(input)?;
    let consumed = &input[..input.len() - rest.len()];
    let text = std::str::from_utf8(consumed).unwrap();
    match text.parse::<f32>() {
        Ok(v) => Ok((rest, v)),
        Err(_) => Err(nom::Err::Error(super::NomError::from_error_kind(
            input,
            nom::error::ErrorKind::Float,
        ))),
    }
}

/// A content-stream string: balanced-paren text with no escape handling,
/// reusing the object grammar's literal-string reader.
fn content_string(input: ParserInput) -> NomResult<Vec<u8>> {
    literal_string(input)
}

fn operand(input: ParserInput) -> NomResult<ContentValue> {
    terminated(
        alt((
            map(name, ContentValue::Name),
            map(content_string, ContentValue::Str),
            map(real, ContentValue::Real),
            map(array, ContentValue::Array),
        )),
        space,
    )
    .parse(input)
}

fn array(input: ParserInput) -> NomResult<Vec<ContentValue>> {
    delimited(pair(tag(&b"["[..]), space), many0(operand), tag(&b"]"[..])).parse(input)
}

/// An operator keyword: one or two letters, matching the small table of
/// drawing operators this interpreter understands. Unknown
/// words are still lexed here; rejecting them is the interpreter's job
/// so it can report which operator was bad.
fn operator(input: ParserInput) -> NomResult<String> {
    map(take_while1(|c: u8| !is_whitespace(c) && !is_delimiter(c)), |s: ParserInput| {
        String::from_utf8_lossy(&s).into_owned()
    })
    .parse(input)
}

fn operation(input: ParserInput) -> NomResult<RawOperation> {
    map(pair(many0(operand), terminated(operator, space)), |(operands, operator)| RawOperation {
        operator,
        operands,
    })
    .parse(input)
}

/// Parse an entire content stream into its sequence of operations,
/// skipping leading whitespace/comments.
pub fn content(input: &[u8]) -> Option<Vec<RawOperation>> {
    let input = ParserInput::new_extra(input, "content");
    let (input, _) = strip_nom(space(input).map(|(i, o)| (i, o)))?;
    strip_nom(terminated(many0(operation), take_while(is_whitespace)).parse(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_graphics_state_and_path_ops() {
        let ops = content(b"q 1 0 0 1 72 720 cm Q").unwrap();
        assert_eq!(ops.len(), 3);
        assert_eq!(ops[0].operator, "q");
        assert_eq!(ops[0].operands.len(), 0);
        assert_eq!(ops[1].operator, "cm");
        assert_eq!(
            ops[1].operands,
            vec![
                ContentValue::Real(1.0),
                ContentValue::Real(0.0),
                ContentValue::Real(0.0),
                ContentValue::Real(1.0),
                ContentValue::Real(72.0),
                ContentValue::Real(720.0),
            ]
        );
        assert_eq!(ops[2].operator, "Q");
    }

    #[test]
    fn parses_text_object() {
        let ops = content(b"BT /F1 12 Tf (Hello) Tj ET").unwrap();
        let operators: Vec<_> = ops.iter().map(|o| o.operator.as_str()).collect();
        assert_eq!(operators, vec!["BT", "Tf", "Tj", "ET"]);
        assert_eq!(
            ops[1].operands,
            vec![ContentValue::Name(b"F1".to_vec()), ContentValue::Real(12.0)]
        );
        assert_eq!(ops[2].operands, vec![ContentValue::Str(b"Hello".to_vec())]);
    }

    #[test]
    fn parses_negative_reals() {
        let ops = content(b"-1.5 0 0 1 0 0 cm").unwrap();
        assert_eq!(ops[0].operands[0], ContentValue::Real(-1.5));
    }
}
