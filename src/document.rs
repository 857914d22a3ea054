//! Document construction and the lazy object store: the reverse-anchored
//! locator that finds the trailer and xref table from the end of the
//! file, and the `get` operation that seeks to an entry's
//! offset, parses the body object, and caches it on the xref slot.

use std::rc::Rc;

use log::{error, warn};

use crate::error::{Error, ParseError, Result, XrefError};
use crate::filter;
use crate::object::{BaseObject, Dictionary, Object, ObjectId};
use crate::parser::{self, object::parse_indirect_object, xref::header as parse_header, ParserInput};
use crate::source::ByteSource;
use crate::xref::{XrefEntry, XrefTable};

/// How far from the end of the file to search for `startxref`. Real
/// trailers carry `startxref\n`, an offset of up to 10 digits, and
/// `\n%%EOF`, so a small multiple of that gives headroom without
/// scanning the whole file.
const TRAILING_WINDOW: usize = 128;

/// A parsed PDF document: the byte source, the frozen cross-reference
/// table, the version, and the root catalog's id. Owns every
/// base object materialized through it; dropping it frees them all.
pub struct Document {
    source: ByteSource,
    xref: XrefTable,
    version: u8,
    root_id: ObjectId,
}

impl Document {
    /// Read a whole file into memory and parse it.
    pub fn open_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::open_from_byte_source(ByteSource::new(bytes))
    }

    /// Parse a document from an already-materialized byte source.
    pub fn open_from_byte_source(source: ByteSource) -> Result<Self> {
        let buffer = source.as_slice();

        let header_span = ParserInput::new_extra(buffer, "header");
        let (_, version) = parse_header(header_span).map_err(|_| ParseError::MalformedHeader)?;
        if version > 7 {
            return Err(Error::VersionUnsupported(version as u8));
        }

        let xref_offset = Self::locate_xref_start(buffer)?;
        if xref_offset > buffer.len() {
            return Err(XrefError::Start.into());
        }

        let xref_span = ParserInput::new_extra(&buffer[xref_offset..], "xref");
        let (rest, subsections) =
            parser::xref::xref_table(xref_span).map_err(|_| XrefError::MalformedTable("unparsable xref table"))?;

        let mut entries = Vec::new();
        for (first, rows) in subsections {
            if rows.is_empty() {
                return Err(XrefError::MalformedTable("xref subsection has zero entries").into());
            }
            for (i, (offset, gen, in_use)) in rows.into_iter().enumerate() {
                // The implicit object 0 (free-list head) is always skipped,
                // regardless of which subsection it falls in.
                let obj_num = first + i as u32;
                if obj_num == 0 {
                    continue;
                }
                let obj_num: u16 = obj_num
                    .try_into()
                    .map_err(|_| XrefError::MalformedTable("object number exceeds u16 range"))?;
                entries.push(XrefEntry::new(ObjectId::new(obj_num, gen), offset, in_use));
            }
        }

        if entries.len() < 4 {
            error!("xref table has only {} entries, fewer than the required minimum of 4", entries.len());
            return Err(XrefError::TooFewEntries { found: entries.len() }.into());
        }

        let (_, trailer) = parser::xref::trailer(rest).map_err(|_| ParseError::MalformedTrailer)?;

        let size = trailer
            .get(b"Size")
            .ok_or(ParseError::MalformedTrailer)?
            .as_i64()
            .map_err(|_| ParseError::MalformedTrailer)?;
        if size != entries.len() as i64 + 1 {
            warn!(
                "trailer Size ({}) does not match xref table length + 1 ({})",
                size,
                entries.len() + 1
            );
            return Err(XrefError::SizeMismatch {
                size,
                expected: entries.len() + 1,
            }
            .into());
        }

        let root_id = trailer
            .get(b"Root")
            .ok_or(ParseError::MalformedTrailer)?
            .as_reference()
            .map_err(|_| ParseError::MalformedTrailer)?;

        let xref = XrefTable::new(entries);
        match xref.get(root_id) {
            Some(entry) if entry.in_use => {}
            _ => {
                warn!("trailer Root {root_id:?} is not a live xref entry");
                return Err(XrefError::MalformedTable("trailer Root is not a live xref entry").into());
            }
        }

        Ok(Document {
            source,
            xref,
            version: version as u8,
            root_id,
        })
    }

    /// Scan backward from a small trailing window for the literal
    /// `startxref`, then parse the offset that follows it.
    fn locate_xref_start(buffer: &[u8]) -> Result<usize> {
        let window_start = buffer.len().saturating_sub(TRAILING_WINDOW);
        let keyword_at = buffer
            .get(window_start..)
            .and_then(|tail| {
                tail.windows(b"startxref".len())
                    .rposition(|w| w == b"startxref")
            })
            .map(|pos| window_start + pos)
            .ok_or(XrefError::Start)?;

        let span = ParserInput::new_extra(&buffer[keyword_at..], "startxref");
        let (_, offset) = parser::xref::xref_start_value(span).map_err(|_| XrefError::Start)?;
        Ok(offset as usize)
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn root_id(&self) -> ObjectId {
        self.root_id
    }

    pub fn xref_iter(&self) -> impl Iterator<Item = &XrefEntry> {
        self.xref.iter()
    }

    pub fn xref_len(&self) -> usize {
        self.xref.len()
    }

    /// Lazily dereference `id`: on a cache miss, seek to the entry's
    /// offset, parse `N G obj … endobj`, decode the stream if present,
    /// and fill the slot. Two dereferences of the same id return the
    /// same cached object by `Rc` identity.
    pub fn get_object(&self, id: ObjectId) -> Result<Rc<BaseObject>> {
        let Some(entry) = self.xref.get(id) else {
            warn!("get_object({id:?}): not present in the cross-reference table");
            return Err(Error::ObjectNotFound(id));
        };
        if !entry.in_use {
            warn!("get_object({id:?}): entry is marked free, skipping");
            return Err(Error::ObjectNotFound(id));
        }
        if let Some(cached) = entry.cached() {
            return Ok(cached);
        }

        let mut resolve_length = |length_id: ObjectId| -> Option<i64> {
            self.get_object(length_id).ok().and_then(|base| base.value.as_i64().ok())
        };
        let (_, base) = match parse_indirect_object(self.source.as_slice(), entry.offset as usize, Some(id), &mut resolve_length) {
            Ok(parsed) => parsed,
            Err(err) => {
                error!("get_object({id:?}): failed to parse body object: {err}");
                return Err(err);
            }
        };
        let base = self.decode_stream(id, base)?;
        Ok(entry.fill(Rc::new(base)))
    }

    /// If the object is a dictionary carrying a stream payload, run the
    /// named `/Filter` over it. Absence of `/Filter` passes
    /// the bytes through unchanged.
    fn decode_stream(&self, id: ObjectId, base: BaseObject) -> Result<BaseObject> {
        let BaseObject { value, stream } = base;
        let stream = match (&value, stream) {
            (Object::Dictionary(dict), Some(raw)) => match dict.get(b"Filter") {
                Some(Object::Name(filter_name)) => Some(filter::decode(filter_name, &raw)?),
                Some(_) => {
                    return Err(ParseError::MalformedStream {
                        id,
                        reason: "/Filter must be a name",
                    }
                    .into())
                }
                None => Some(raw),
            },
            (_, s) => s,
        };
        Ok(BaseObject { value, stream })
    }

    /// Deref-aware dictionary lookup: resolves a reference
    /// through the object store, following exactly one level. If the
    /// resolved target is itself a reference, this reports absent rather
    /// than chasing it further.
    pub fn find_deref(&self, dict: &Dictionary, name: &[u8]) -> Option<Object> {
        match dict.get(name)? {
            Object::Reference(id) => {
                let base = self.get_object(*id).ok()?;
                match &base.value {
                    Object::Reference(_) => {
                        warn!("find_deref({:?}): target is itself a reference, not following further", name);
                        None
                    }
                    other => Some(other.clone()),
                }
            }
            other => Some(other.clone()),
        }
    }

    pub fn close(self) {
        drop(self)
    }
}
