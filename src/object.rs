use indexmap::IndexMap;

use crate::error::Error;

/// An indirect object identifier: `(num, gen)`. Two ids are equal iff both
/// components match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u16, pub u16);

impl ObjectId {
    pub fn new(num: u16, gen: u16) -> Self {
        ObjectId(num, gen)
    }

    pub fn num(self) -> u16 {
        self.0
    }

    pub fn gen(self) -> u16 {
        self.1
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} R", self.0, self.1)
    }
}

/// A parsed PDF object value. Only the variants this reader's grammar
/// produces exist here: there is no Boolean/Real/Null at this level,
/// since the object grammar this crate implements never produces them
/// as a base object value (reals only ever appear as content-stream
/// operands, see [`crate::content::ContentValue`]).
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Integer(i32),
    Name(Vec<u8>),
    String(Vec<u8>),
    HexString(Vec<u8>),
    Array(Vec<Object>),
    Dictionary(Dictionary),
    Reference(ObjectId),
}

impl Object {
    pub fn as_i64(&self) -> Result<i64, Error> {
        match self {
            Object::Integer(i) => Ok(*i as i64),
            _ => Err(Error::TypeMismatch {
                expected: "Integer",
                found: self.type_name(),
            }),
        }
    }

    pub fn as_name(&self) -> Result<&[u8], Error> {
        match self {
            Object::Name(n) => Ok(n),
            _ => Err(Error::TypeMismatch {
                expected: "Name",
                found: self.type_name(),
            }),
        }
    }

    pub fn as_array(&self) -> Result<&[Object], Error> {
        match self {
            Object::Array(a) => Ok(a),
            _ => Err(Error::TypeMismatch {
                expected: "Array",
                found: self.type_name(),
            }),
        }
    }

    pub fn as_dict(&self) -> Result<&Dictionary, Error> {
        match self {
            Object::Dictionary(d) => Ok(d),
            _ => Err(Error::TypeMismatch {
                expected: "Dictionary",
                found: self.type_name(),
            }),
        }
    }

    pub fn as_reference(&self) -> Result<ObjectId, Error> {
        match self {
            Object::Reference(id) => Ok(*id),
            _ => Err(Error::TypeMismatch {
                expected: "Reference",
                found: self.type_name(),
            }),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Integer(_) => "Integer",
            Object::Name(_) => "Name",
            Object::String(_) => "String",
            Object::HexString(_) => "HexString",
            Object::Array(_) => "Array",
            Object::Dictionary(_) => "Dictionary",
            Object::Reference(_) => "Reference",
        }
    }
}

/// An ordered `(name, value)` dictionary. Lookup is a linear scan by name
/// equality (PDF dictionaries are small). Construction
/// never deduplicates: if a name repeats, [`Dictionary::insert_parsed`]
/// keeps the first occurrence and the later ones become unreachable,
/// exactly as the grammar that produced them intends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary(IndexMap<Vec<u8>, Object>);

impl Dictionary {
    pub fn new() -> Self {
        Dictionary(IndexMap::new())
    }

    /// Used by the parser: first occurrence of a name wins.
    pub(crate) fn insert_parsed(&mut self, name: Vec<u8>, value: Object) {
        self.0.entry(name).or_insert(value);
    }

    /// Used by callers building a dictionary programmatically (tests,
    /// synthetic fixtures): later writes overwrite earlier ones.
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<Vec<u8>>,
        V: Into<Object>,
    {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, name: &[u8]) -> Option<&Object> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Vec<u8>, &Object)> {
        self.0.iter()
    }

    /// `/Type` is the conventional discriminator name; callers look it up
    /// often enough (page-tree walking, stream detection) to warrant a
    /// helper.
    pub fn get_type(&self) -> Option<&[u8]> {
        self.get(b"Type").and_then(|o| o.as_name().ok())
    }
}

impl From<i32> for Object {
    fn from(v: i32) -> Self {
        Object::Integer(v)
    }
}

impl From<Vec<u8>> for Object {
    fn from(v: Vec<u8>) -> Self {
        Object::String(v)
    }
}

impl From<Dictionary> for Object {
    fn from(v: Dictionary) -> Self {
        Object::Dictionary(v)
    }
}

impl From<Vec<Object>> for Object {
    fn from(v: Vec<Object>) -> Self {
        Object::Array(v)
    }
}

impl From<ObjectId> for Object {
    fn from(v: ObjectId) -> Self {
        Object::Reference(v)
    }
}

/// The result of dereferencing an xref entry: an object value plus an
/// optional decoded stream payload. Streams only ever follow a
/// dictionary-typed value.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseObject {
    pub value: Object,
    pub stream: Option<Vec<u8>>,
}

impl BaseObject {
    pub fn new(value: Object) -> Self {
        BaseObject { value, stream: None }
    }

    pub fn with_stream(value: Object, stream: Vec<u8>) -> Self {
        BaseObject {
            value,
            stream: Some(stream),
        }
    }

    pub fn as_dict(&self) -> Result<&Dictionary, Error> {
        self.value.as_dict()
    }
}
