//! Page-tree navigation: `/Root → /Pages`, its `/Kids` array
//! (treated as flat, matching this reader's scope), and media-box
//! resolution that walks `/Parent` when a page omits its own `/MediaBox`.

use std::rc::Rc;

use log::warn;

use crate::error::{Error, ParseError, Result};
use crate::object::BaseObject;
use crate::Document;

/// Bound on `/Parent` hops while resolving an inherited attribute. Guards
/// against a cyclic page tree the way [`Document::get_object`]'s own
/// cached-slot design guards against infinite re-parsing.
const MAX_PARENT_DEPTH: usize = 64;

impl Document {
    fn pages_root(&self) -> Result<Rc<BaseObject>> {
        let root = self.get_object(self.root_id())?;
        let pages_ref = root
            .as_dict()?
            .get(b"Pages")
            .ok_or(ParseError::MalformedObject {
                offset: 0,
                reason: "catalog missing /Pages",
            })?
            .as_reference()?;
        self.get_object(pages_ref)
    }

    /// `pdf_page_cnt`: dereference `Root → /Pages`, read `/Count`.
    pub fn page_count(&self) -> Result<i64> {
        self.pages_root()?
            .as_dict()?
            .get(b"Count")
            .ok_or(ParseError::MalformedObject {
                offset: 0,
                reason: "pages tree missing /Count",
            })?
            .as_i64()
    }

    /// `pdf_get_page`: dereference `Root → /Pages`, read `/Kids`,
    /// bounds-check `index`, dereference `Kids[index]`.
    pub fn get_page(&self, index: usize) -> Result<Rc<BaseObject>> {
        let pages = self.pages_root()?;
        let kids = pages
            .as_dict()?
            .get(b"Kids")
            .ok_or(ParseError::MalformedObject {
                offset: 0,
                reason: "pages tree missing /Kids",
            })?
            .as_array()?;
        let kid = kids.get(index).ok_or(Error::PageIndexOutOfRange {
            index,
            count: kids.len(),
        })?;
        self.get_object(kid.as_reference()?)
    }

    /// `pdf_get_page_bounds`: find `/MediaBox` on the page; if absent,
    /// follow `/Parent` until one is found.
    pub fn get_page_bounds(&self, index: usize) -> Result<[i32; 4]> {
        let mut current = self.get_page(index)?;
        let mut seen = std::collections::HashSet::new();

        for _ in 0..MAX_PARENT_DEPTH {
            let dict = current.as_dict()?;
            if let Some(media_box) = dict.get(b"MediaBox") {
                return parse_media_box(media_box);
            }

            let parent_id = dict
                .get(b"Parent")
                .ok_or(ParseError::MalformedObject {
                    offset: 0,
                    reason: "page has no /MediaBox and no /Parent to inherit from",
                })?
                .as_reference()?;
            if !seen.insert(parent_id) {
                warn!("get_page_bounds({index}): reference cycle detected in /Parent chain at {parent_id:?}");
                return Err(ParseError::MalformedObject {
                    offset: 0,
                    reason: "cyclic /Parent chain while resolving /MediaBox",
                }
                .into());
            }
            current = self.get_object(parent_id)?;
        }

        Err(ParseError::MalformedObject {
            offset: 0,
            reason: "/Parent chain exceeds maximum depth while resolving /MediaBox",
        }
        .into())
    }
}

fn parse_media_box(value: &crate::object::Object) -> Result<[i32; 4]> {
    let array = value.as_array()?;
    if array.len() != 4 {
        return Err(ParseError::MalformedObject {
            offset: 0,
            reason: "/MediaBox does not have exactly four entries",
        }
        .into());
    }
    let mut out = [0i32; 4];
    for (slot, entry) in out.iter_mut().zip(array) {
        *slot = entry.as_i64()? as i32;
    }
    Ok(out)
}
