//! Transportable value algebra for actor messages.
//!
//! Every message that enters a mailbox is built from [`Value`]: a closed set
//! of primitives and containers, plus two runtime-aware leaves: actor
//! addresses and opaque binary blobs. Anything expressible as a `Value` can
//! cross the wire envelope; nothing else can, which is what keeps actors
//! isolated from each other's heaps.
//!
//! # Containers
//!
//! Mappings are keyed by strings only. Tuples carry a fixed arity, sequences
//! and sets are homogeneous as far as the shape matcher is concerned; on the
//! wire all three flatten to JSON arrays.

// Layer 1: Standard library imports
use std::collections::BTreeMap;
use std::fmt;

// Layer 2: Third-party crate imports
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

// Layer 3: Internal module imports
use crate::actor::address::Address;

/// A transportable message value.
///
/// The set is closed: null, booleans, integers, floats, strings, ordered
/// sequences, fixed-arity tuples, sets, string-keyed mappings, actor
/// [`Address`]es, and opaque [`Binary`] blobs.
///
/// # Example
///
/// ```rust
/// use castor_rt::message::Value;
///
/// let record = Value::map([
///     ("credit", Value::Int(250)),
///     ("currency", Value::from("EUR")),
/// ]);
/// assert_eq!(record.get("credit"), Some(&Value::Int(250)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The null value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// A UTF-8 string.
    Str(String),
    /// An ordered sequence.
    List(Vec<Value>),
    /// A fixed-arity tuple.
    Tuple(Vec<Value>),
    /// A set. Insertion order is preserved; the distinction from `List`
    /// only matters to the shape matcher.
    Set(Vec<Value>),
    /// A mapping with string keys.
    Map(BTreeMap<String, Value>),
    /// A reference to an actor.
    Address(Address),
    /// An opaque byte string.
    Binary(Binary),
}

impl Value {
    /// Build a mapping value from key/value pairs.
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }

    /// Build a tuple value.
    pub fn tuple<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Self::Tuple(items.into_iter().collect())
    }

    /// Build a set value.
    pub fn set<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Self::Set(items.into_iter().collect())
    }

    /// Short name of this value's kind, used in mismatch reports.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::List(_) => "list",
            Self::Tuple(_) => "tuple",
            Self::Set(_) => "set",
            Self::Map(_) => "map",
            Self::Address(_) => "address",
            Self::Binary(_) => "binary",
        }
    }

    /// Look up a key in a mapping value. `None` for other kinds.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Map(entries) => entries.get(key),
            _ => None,
        }
    }

    /// Remove and return a key from a mapping value.
    pub fn take(&mut self, key: &str) -> Option<Value> {
        match self {
            Self::Map(entries) => entries.remove(key),
            _ => None,
        }
    }

    /// Borrow the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(text) => Some(text),
            _ => None,
        }
    }

    /// The integer payload, if this is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(number) => Some(*number),
            _ => None,
        }
    }

    /// Borrow the address payload, if this is an address.
    pub fn as_address(&self) -> Option<&Address> {
        match self {
            Self::Address(address) => Some(address),
            _ => None,
        }
    }

    /// Borrow the binary payload, if this is a binary blob.
    pub fn as_binary(&self) -> Option<&Binary> {
        match self {
            Self::Binary(binary) => Some(binary),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Self::Map(entries)
    }
}

impl From<Address> for Value {
    fn from(address: Address) -> Self {
        Self::Address(address)
    }
}

impl From<Binary> for Value {
    fn from(binary: Binary) -> Self {
        Self::Binary(binary)
    }
}

/// An opaque byte string.
///
/// Wrap raw bytes in `Binary` before embedding them in a message; the wire
/// envelope carries them base64-encoded. Equality and hashing go by the
/// underlying bytes.
///
/// # Example
///
/// ```rust
/// use castor_rt::message::Binary;
///
/// let blob = Binary::new([0x00, 0x4d, 0x4d, 0xff]);
/// assert_eq!(blob.to_base64(), "AE1N/w==");
/// assert_eq!(Binary::from_base64("AE1N/w==").as_ref(), Some(&blob));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Binary(Vec<u8>);

impl Binary {
    /// Wrap a byte string.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Borrow the underlying bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The base64 text form used on the wire.
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.0)
    }

    /// Parse the base64 text form. `None` if the text is not valid base64.
    pub fn from_base64(text: &str) -> Option<Self> {
        BASE64.decode(text).ok().map(Self)
    }

    /// Number of bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the blob is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Binary({} bytes)", self.0.len())
    }
}

impl From<Vec<u8>> for Binary {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Binary {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl PartialEq<[u8]> for Binary {
    fn eq(&self, other: &[u8]) -> bool {
        self.0 == other
    }
}

impl PartialEq<Vec<u8>> for Binary {
    fn eq(&self, other: &Vec<u8>) -> bool {
        &self.0 == other
    }
}
