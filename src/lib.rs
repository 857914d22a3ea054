//! A read-only PDF object model, cross-reference resolver, and
//! content-stream interpreter.
//!
//! Two coupled subsystems do the real work:
//!
//! - The object parser and random-access object store ([`document`],
//!   [`parser`]): locates the trailer and xref table from the end of the
//!   file, then lazily resolves indirect references by seeking to their
//!   recorded byte offset.
//! - The content-stream interpreter ([`content`]): walks a page's
//!   decoded content stream as a postfix operand/operator grammar,
//!   yielding one typed [`content::Command`] per `step()` call.
//!
//! Encryption, incremental updates, linearization, cross-reference
//! streams, rendering, and PDF *writing* are out of scope.

pub mod content;
mod document;
mod error;
mod filter;
mod object;
mod pages;
pub(crate) mod parser;
mod source;
mod xref;

pub use content::{Command, Interpreter};
pub use document::Document;
pub use error::{ContentError, Error, ParseError, Result, XrefError};
pub use object::{BaseObject, Dictionary, Object, ObjectId};
pub use source::ByteSource;
pub use xref::{XrefEntry, XrefTable};

/// Read a whole file and parse it into a [`Document`].
pub fn open_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Document> {
    Document::open_from_path(path)
}

/// Parse a [`Document`] from an in-memory byte source.
pub fn open_from_byte_source(source: ByteSource) -> Result<Document> {
    Document::open_from_byte_source(source)
}

/// Release a document and every base object it cached. Equivalent to
/// simply dropping the value; provided as an explicit, named
/// counterpart for callers that prefer not to rely on `Drop`.
pub fn close(document: Document) {
    document.close()
}
