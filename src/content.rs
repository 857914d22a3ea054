//! The content-stream interpreter: a postfix operand
//! stack feeding an operator dispatch table, with nested state for
//! `BT`/`ET` text blocks. [`crate::parser::content`] already
//! tokenizes the whole stream into operand/operator pairs; this module
//! walks that sequence one operation at a time, enforcing the
//! text-object sub-grammar and turning each recognized operator into a
//! typed [`Command`].
//!
//! Some content-stream interpreters NUL-terminate operand ends in a
//! mutable scratch buffer and restore them on teardown to avoid
//! allocating; this crate takes the simpler owned-copy route instead —
//! every yielded [`Command`] owns its bytes outright, so there is no
//! lifetime tied to the step call that produced it.

use crate::error::{ContentError, Error, Result};
use crate::parser::content::{content, ContentValue, RawOperation};

/// A single drawing operation produced by the interpreter.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SaveState,
    RestoreState,
    SetFillCmyk { c: f32, m: f32, y: f32, k: f32 },
    SetStrokeCmyk { c: f32, m: f32, y: f32, k: f32 },
    SetFillGray(f32),
    SetStrokeGray(f32),
    Transform { a: f32, b: f32, c: f32, d: f32, e: f32, f: f32 },
    Rectangle { x: f32, y: f32, w: f32, h: f32 },
    Fill,
    MoveTextOrigin { tx: f32, ty: f32 },
    SetFont { name: Vec<u8>, size: f32 },
    ShowText(Vec<u8>),
    PaintExternalObject(Vec<u8>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextState {
    Base,
    Text,
}

/// Walks a decoded content stream, yielding one [`Command`] per `step()`
/// call. `BT`/`ET` are pure state transitions — they never yield a
/// `Command` themselves, since they enter and leave text state rather
/// than draw anything.
pub struct Interpreter {
    operations: Vec<RawOperation>,
    pos: usize,
    state: TextState,
}

impl Interpreter {
    /// Tokenize `buffer` as a PostScript-subset content stream.
    pub fn init(buffer: &[u8]) -> Result<Self> {
        let operations = content(buffer).ok_or(ContentError::MalformedToken(
            "content stream does not match the operand/operator grammar",
        ))?;
        Ok(Interpreter {
            operations,
            pos: 0,
            state: TextState::Base,
        })
    }

    /// Yield the next command, or `Ok(None)` at a well-formed end of
    /// stream. Returns an error — and leaves the interpreter usable for
    /// subsequent calls — if the next operator has the wrong operand
    /// shape or is not permitted in the current state.
    pub fn step(&mut self) -> Result<Option<Command>> {
        loop {
            let Some(op) = self.operations.get(self.pos) else {
                return if self.state == TextState::Text {
                    Err(ContentError::UnterminatedTextObject.into())
                } else {
                    Ok(None)
                };
            };
            self.pos += 1;

            match self.state {
                TextState::Base => match op.operator.as_str() {
                    "q" => return Ok(Some(nullary(op, Command::SaveState)?)),
                    "Q" => return Ok(Some(nullary(op, Command::RestoreState)?)),
                    "f" | "F" => return Ok(Some(nullary(op, Command::Fill)?)),
                    "g" => return Ok(Some(Command::SetFillGray(one_real(op)?))),
                    "G" => return Ok(Some(Command::SetStrokeGray(one_real(op)?))),
                    "k" => {
                        let [c, m, y, k] = four_reals(op)?;
                        return Ok(Some(Command::SetFillCmyk { c, m, y, k }));
                    }
                    "K" => {
                        let [c, m, y, k] = four_reals(op)?;
                        return Ok(Some(Command::SetStrokeCmyk { c, m, y, k }));
                    }
                    "re" => {
                        let [x, y, w, h] = four_reals(op)?;
                        return Ok(Some(Command::Rectangle { x, y, w, h }));
                    }
                    "cm" => {
                        let [a, b, c, d, e, f] = six_reals(op)?;
                        return Ok(Some(Command::Transform { a, b, c, d, e, f }));
                    }
                    "Do" => return Ok(Some(Command::PaintExternalObject(one_name(op)?))),
                    "BT" => {
                        nullary(op, ())?;
                        self.state = TextState::Text;
                    }
                    other => return Err(ContentError::InvalidOperator(other.to_string()).into()),
                },
                TextState::Text => match op.operator.as_str() {
                    "Tf" => {
                        let (name, size) = name_and_real(op)?;
                        return Ok(Some(Command::SetFont { name, size }));
                    }
                    "Td" => {
                        let [tx, ty] = two_reals(op)?;
                        return Ok(Some(Command::MoveTextOrigin { tx, ty }));
                    }
                    "Tj" => return Ok(Some(Command::ShowText(one_str(op)?))),
                    "ET" => {
                        nullary(op, ())?;
                        self.state = TextState::Base;
                    }
                    other => return Err(ContentError::NotPermittedInTextObject(other.to_string()).into()),
                },
            }
        }
    }
}

fn wrong_shape(op: &RawOperation) -> Error {
    ContentError::InvalidOperands {
        operator: op.operator.clone(),
        found: op.operands.len(),
    }
    .into()
}

fn nullary<T>(op: &RawOperation, value: T) -> Result<T> {
    if op.operands.is_empty() {
        Ok(value)
    } else {
        Err(wrong_shape(op))
    }
}

fn one_real(op: &RawOperation) -> Result<f32> {
    match op.operands.as_slice() {
        [ContentValue::Real(v)] => Ok(*v),
        _ => Err(wrong_shape(op)),
    }
}

fn two_reals(op: &RawOperation) -> Result<[f32; 2]> {
    match op.operands.as_slice() {
        [ContentValue::Real(a), ContentValue::Real(b)] => Ok([*a, *b]),
        _ => Err(wrong_shape(op)),
    }
}

fn four_reals(op: &RawOperation) -> Result<[f32; 4]> {
    match op.operands.as_slice() {
        [ContentValue::Real(a), ContentValue::Real(b), ContentValue::Real(c), ContentValue::Real(d)] => {
            Ok([*a, *b, *c, *d])
        }
        _ => Err(wrong_shape(op)),
    }
}

fn six_reals(op: &RawOperation) -> Result<[f32; 6]> {
    match op.operands.as_slice() {
        [ContentValue::Real(a), ContentValue::Real(b), ContentValue::Real(c), ContentValue::Real(d), ContentValue::Real(e), ContentValue::Real(f)] => {
            Ok([*a, *b, *c, *d, *e, *f])
        }
        _ => Err(wrong_shape(op)),
    }
}

fn one_name(op: &RawOperation) -> Result<Vec<u8>> {
    match op.operands.as_slice() {
        [ContentValue::Name(n)] => Ok(n.clone()),
        _ => Err(wrong_shape(op)),
    }
}

fn one_str(op: &RawOperation) -> Result<Vec<u8>> {
    match op.operands.as_slice() {
        [ContentValue::Str(s)] => Ok(s.clone()),
        _ => Err(wrong_shape(op)),
    }
}

fn name_and_real(op: &RawOperation) -> Result<(Vec<u8>, f32)> {
    match op.operands.as_slice() {
        [ContentValue::Name(n), ContentValue::Real(size)] => Ok((n.clone(), *size)),
        _ => Err(wrong_shape(op)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(buf: &[u8]) -> Vec<Command> {
        let mut interp = Interpreter::init(buf).unwrap();
        let mut out = Vec::new();
        while let Some(cmd) = interp.step().unwrap() {
            out.push(cmd);
        }
        out
    }

    #[test]
    fn end_to_end_text_block() {
        let commands = run(b"q 1 0 0 1 72 720 cm BT /F1 12 Tf (Hello) Tj ET Q");
        assert_eq!(
            commands,
            vec![
                Command::SaveState,
                Command::Transform {
                    a: 1.0,
                    b: 0.0,
                    c: 0.0,
                    d: 1.0,
                    e: 72.0,
                    f: 720.0
                },
                Command::SetFont {
                    name: b"F1".to_vec(),
                    size: 12.0
                },
                Command::ShowText(b"Hello".to_vec()),
                Command::RestoreState,
            ]
        );
    }

    #[test]
    fn rectangle_and_fill() {
        let commands = run(b"0 0 612 792 re f");
        assert_eq!(
            commands,
            vec![
                Command::Rectangle {
                    x: 0.0,
                    y: 0.0,
                    w: 612.0,
                    h: 792.0
                },
                Command::Fill,
            ]
        );
    }

    #[test]
    fn gray_and_cmyk_color_ops() {
        let commands = run(b"0.5 g 1 G 0 0 0 1 k 1 0 0 0 K");
        assert_eq!(
            commands,
            vec![
                Command::SetFillGray(0.5),
                Command::SetStrokeGray(1.0),
                Command::SetFillCmyk {
                    c: 0.0,
                    m: 0.0,
                    y: 0.0,
                    k: 1.0
                },
                Command::SetStrokeCmyk {
                    c: 1.0,
                    m: 0.0,
                    y: 0.0,
                    k: 0.0
                },
            ]
        );
    }

    #[test]
    fn paint_external_object() {
        let commands = run(b"/Im1 Do");
        assert_eq!(commands, vec![Command::PaintExternalObject(b"Im1".to_vec())]);
    }

    #[test]
    fn wrong_arity_reports_invalid_operands_but_stays_usable() {
        let mut interp = Interpreter::init(b"1 0 0 cm 0 0 612 792 re").unwrap();
        let err = interp.step().unwrap_err();
        assert!(matches!(err, Error::Content(ContentError::InvalidOperands { .. })));
        // The interpreter keeps going on the next call.
        let next = interp.step().unwrap();
        assert_eq!(
            next,
            Some(Command::Rectangle {
                x: 0.0,
                y: 0.0,
                w: 612.0,
                h: 792.0
            })
        );
    }

    #[test]
    fn operator_disallowed_inside_text_object() {
        let mut interp = Interpreter::init(b"BT q ET").unwrap();
        let err = interp.step().unwrap_err();
        assert!(matches!(err, Error::Content(ContentError::NotPermittedInTextObject(op)) if op == "q"));
    }

    #[test]
    fn unterminated_text_object_is_an_error() {
        let mut interp = Interpreter::init(b"BT /F1 12 Tf").unwrap();
        assert_eq!(
            interp.step().unwrap(),
            Some(Command::SetFont {
                name: b"F1".to_vec(),
                size: 12.0
            })
        );
        let err = interp.step().unwrap_err();
        assert!(matches!(err, Error::Content(ContentError::UnterminatedTextObject)));
    }

    #[test]
    fn unknown_operator_is_invalid() {
        let mut interp = Interpreter::init(b"xyz").unwrap();
        let err = interp.step().unwrap_err();
        assert!(matches!(err, Error::Content(ContentError::InvalidOperator(op)) if op == "xyz"));
    }

    #[test]
    fn two_passes_over_same_stream_are_identical() {
        let buf: &[u8] = b"q 1 0 0 1 72 720 cm BT /F1 12 Tf (Hello) Tj ET Q";
        assert_eq!(run(buf), run(buf));
    }
}
