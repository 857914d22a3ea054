use std::cell::OnceCell;
use std::rc::Rc;

use crate::object::{BaseObject, ObjectId};

/// One row of the cross-reference table: `(id, file offset, in-use flag,
/// cached base-object slot)`. The slot is empty at construction and
/// filled at most once, on first dereference; its address is stable
/// because the table is frozen (never reallocated) once construction
/// completes.
pub struct XrefEntry {
    pub id: ObjectId,
    pub offset: u64,
    pub in_use: bool,
    cached: OnceCell<Rc<BaseObject>>,
}

impl XrefEntry {
    pub fn new(id: ObjectId, offset: u64, in_use: bool) -> Self {
        XrefEntry {
            id,
            offset,
            in_use,
            cached: OnceCell::new(),
        }
    }

    pub fn cached(&self) -> Option<Rc<BaseObject>> {
        self.cached.get().cloned()
    }

    /// Fills the slot if empty and returns the (now certainly present)
    /// cached value. Filling twice is a programmer error upstream (the
    /// object loader always checks `cached()` first) but is harmless
    /// here: the first write wins, matching the "never recomputed"
    /// invariant.
    pub(crate) fn fill(&self, object: Rc<BaseObject>) -> Rc<BaseObject> {
        match self.cached.set(object) {
            Ok(()) => self.cached.get().cloned().unwrap(),
            Err(_already_there) => self.cached.get().cloned().unwrap(),
        }
    }
}

/// The full cross-reference table, ordered by insertion (the order
/// subsections appeared in the file). Lookup is a linear scan: documents
/// are small enough that this is acceptable.
pub struct XrefTable {
    entries: Vec<XrefEntry>,
}

impl XrefTable {
    pub fn new(entries: Vec<XrefEntry>) -> Self {
        XrefTable { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: ObjectId) -> Option<&XrefEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &XrefEntry> {
        self.entries.iter()
    }
}
