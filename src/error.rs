use crate::object::ObjectId;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type. Every fallible public operation returns one of
/// these; the core never panics on malformed input.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Xref(#[from] XrefError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("unsupported PDF version '1.{0}'")]
    VersionUnsupported(u8),

    #[error("object {}.{} not found in cross-reference table", .0 .0, .0 .1)]
    ObjectNotFound(ObjectId),

    #[error("expected a {expected} object, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("stream names unsupported filter '{0}'")]
    UnsupportedFilter(String),

    #[error("page index {index} out of range (page tree has {count} kid(s))")]
    PageIndexOutOfRange { index: usize, count: usize },
}

/// Errors produced while a document's structure is being materialized:
/// header, body objects, and streams.
#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("malformed PDF header")]
    MalformedHeader,

    #[error("malformed trailer dictionary")]
    MalformedTrailer,

    #[error("malformed object at offset {offset}: {reason}")]
    MalformedObject { offset: usize, reason: &'static str },

    #[error("malformed stream for object {}.{}: {reason}", .id.0, .id.1)]
    MalformedStream { id: ObjectId, reason: &'static str },

    #[error("object id mismatch: xref says {expected:?}, body says {found:?}")]
    ObjectIdMismatch {
        expected: ObjectId,
        found: ObjectId,
    },
}

/// Errors produced while locating and materializing the cross-reference
/// table and trailer.
#[derive(thiserror::Error, Debug)]
pub enum XrefError {
    #[error("could not locate 'startxref'/xref table from the end of the file")]
    Start,

    #[error("malformed cross-reference table: {0}")]
    MalformedTable(&'static str),

    #[error("cross-reference table has {found} entries, fewer than the required minimum of 4")]
    TooFewEntries { found: usize },

    #[error("trailer Size ({size}) does not match xref table length + 1 ({expected})")]
    SizeMismatch { size: i64, expected: usize },
}

/// Errors produced by the content-stream interpreter.
#[derive(thiserror::Error, Debug)]
pub enum ContentError {
    #[error("unrecognized content-stream operator '{0}'")]
    InvalidOperator(String),

    #[error("operator '{operator}' received {found} operand(s) of the wrong shape")]
    InvalidOperands { operator: String, found: usize },

    #[error("operator '{0}' is not permitted inside a BT/ET text object")]
    NotPermittedInTextObject(String),

    #[error("unterminated text object: 'ET' never seen before end of stream")]
    UnterminatedTextObject,

    #[error("malformed content-stream token: {0}")]
    MalformedToken(&'static str),
}
