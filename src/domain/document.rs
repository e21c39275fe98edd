//! Document model
//!
//! A [`Document`] is the tagged tree the anonymizer walks: mappings,
//! sequences and scalars. Mappings keep insertion order and may use any
//! scalar as a key, matching what YAML allows.
//!
//! Foreign trees are converted at the edges:
//!
//! - `serde_yml::Value` ⇄ [`Document`] (tagged YAML nodes are rejected)
//! - `serde_json::Value` ⇄ [`Document`] (keys are stringified on the way out)
//!
//! # Examples
//!
//! ```
//! use task_anonymizer::domain::Document;
//! use serde_json::json;
//!
//! let doc = Document::from(json!({"apt": {"name": ["nginx"], "state": "latest"}}));
//! let state = doc.get("apt").and_then(|apt| apt.get("state"));
//! assert_eq!(state.and_then(Document::as_str), Some("latest"));
//! ```

use super::errors::AnonymizerError;
use super::result::Result;
use indexmap::IndexMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;

/// Numeric scalar
///
/// Split the same way serde splits numbers so that round-trips through YAML
/// and JSON stay exact. Floats compare and hash by bit pattern so that any
/// number can be a mapping key.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    /// Non-negative integer
    PosInt(u64),
    /// Negative integer
    NegInt(i64),
    /// Floating point value
    Float(f64),
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::PosInt(a), Number::PosInt(b)) => a == b,
            (Number::NegInt(a), Number::NegInt(b)) => a == b,
            (Number::Float(a), Number::Float(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl Eq for Number {}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(self).hash(state);
        match self {
            Number::PosInt(n) => n.hash(state),
            Number::NegInt(n) => n.hash(state),
            Number::Float(n) => n.to_bits().hash(state),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::PosInt(n) => write!(f, "{n}"),
            Number::NegInt(n) => write!(f, "{n}"),
            Number::Float(n) => write!(f, "{n}"),
        }
    }
}

/// Leaf value of a document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl Scalar {
    /// Returns the string payload, if this is a string scalar
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    /// Textual form of the scalar when used as a mapping key
    ///
    /// Only used to evaluate key-name policy; the key itself is never
    /// rewritten.
    pub fn to_key_string(&self) -> String {
        match self {
            Scalar::Null => "null".to_string(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Number(n) => n.to_string(),
            Scalar::String(s) => s.clone(),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}

/// Ordered mapping from scalar keys to documents
///
/// Equality is order-sensitive: two mappings are equal only if they hold the
/// same entries in the same order.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    entries: IndexMap<Scalar, Document>,
}

impl Mapping {
    /// Creates an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty mapping with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Inserts an entry, replacing the value in place if the key exists
    pub fn insert(&mut self, key: impl Into<Scalar>, value: impl Into<Document>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Looks up the value stored under a string key
    pub fn get(&self, key: &str) -> Option<&Document> {
        self.entries.get(&Scalar::from(key))
    }

    /// Iterates over entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&Scalar, &Document)> {
        self.entries.iter()
    }

    /// Iterates over keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &Scalar> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl FromIterator<(Scalar, Document)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (Scalar, Document)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Mapping {
    type Item = (Scalar, Document);
    type IntoIter = indexmap::map::IntoIter<Scalar, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// A structured document: mapping, sequence or scalar
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Mapping(Mapping),
    Sequence(Vec<Document>),
    Scalar(Scalar),
}

/// Container layout of a document, ignoring scalar values
///
/// Two documents with equal shapes have the same container kind at every
/// position, the same mapping keys in the same order and the same sequence
/// lengths.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Scalar,
    Sequence(Vec<Shape>),
    Mapping(Vec<(Scalar, Shape)>),
}

impl Document {
    /// Returns the string payload of a string scalar
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Document::Scalar(scalar) => scalar.as_str(),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Document::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Document]> {
        match self {
            Document::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Looks up a string key when this document is a mapping
    pub fn get(&self, key: &str) -> Option<&Document> {
        self.as_mapping().and_then(|mapping| mapping.get(key))
    }

    /// Computes the container layout of this document
    pub fn shape(&self) -> Shape {
        match self {
            Document::Scalar(_) => Shape::Scalar,
            Document::Sequence(items) => Shape::Sequence(items.iter().map(Document::shape).collect()),
            Document::Mapping(mapping) => Shape::Mapping(
                mapping
                    .iter()
                    .map(|(key, value)| (key.clone(), value.shape()))
                    .collect(),
            ),
        }
    }

    /// Visits every scalar depth-first, mapping entries in order
    pub fn for_each_scalar<'a>(&'a self, visit: &mut impl FnMut(&'a Scalar)) {
        match self {
            Document::Scalar(scalar) => visit(scalar),
            Document::Sequence(items) => {
                for item in items {
                    item.for_each_scalar(&mut *visit);
                }
            }
            Document::Mapping(mapping) => {
                for (_, value) in mapping.iter() {
                    value.for_each_scalar(&mut *visit);
                }
            }
        }
    }
}

impl From<Scalar> for Document {
    fn from(value: Scalar) -> Self {
        Document::Scalar(value)
    }
}

impl From<&str> for Document {
    fn from(value: &str) -> Self {
        Document::Scalar(Scalar::from(value))
    }
}

impl From<String> for Document {
    fn from(value: String) -> Self {
        Document::Scalar(Scalar::String(value))
    }
}

impl From<Mapping> for Document {
    fn from(value: Mapping) -> Self {
        Document::Mapping(value)
    }
}

impl From<Vec<Document>> for Document {
    fn from(value: Vec<Document>) -> Self {
        Document::Sequence(value)
    }
}

// ---------------------------------------------------------------------------
// YAML
// ---------------------------------------------------------------------------

fn number_from_yaml(n: &serde_yml::Number) -> Number {
    if let Some(u) = n.as_u64() {
        Number::PosInt(u)
    } else if let Some(i) = n.as_i64() {
        Number::NegInt(i)
    } else {
        Number::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

fn key_from_yaml(key: serde_yml::Value, path: &str) -> Result<Scalar> {
    match document_from_yaml(key, path)? {
        Document::Scalar(scalar) => Ok(scalar),
        _ => Err(AnonymizerError::invalid_input(
            path,
            "mapping keys must be scalars",
        )),
    }
}

fn document_from_yaml(value: serde_yml::Value, path: &str) -> Result<Document> {
    use serde_yml::Value;

    let document = match value {
        Value::Null => Document::Scalar(Scalar::Null),
        Value::Bool(b) => Document::Scalar(Scalar::Bool(b)),
        Value::Number(n) => Document::Scalar(Scalar::Number(number_from_yaml(&n))),
        Value::String(s) => Document::Scalar(Scalar::String(s)),
        Value::Sequence(items) => Document::Sequence(
            items
                .into_iter()
                .enumerate()
                .map(|(idx, item)| document_from_yaml(item, &format!("{path}[{idx}]")))
                .collect::<Result<_>>()?,
        ),
        Value::Mapping(map) => {
            let mut mapping = Mapping::with_capacity(map.len());
            for (key, value) in map {
                let key = key_from_yaml(key, path)?;
                let child_path = if path.is_empty() {
                    key.to_key_string()
                } else {
                    format!("{path}.{}", key.to_key_string())
                };
                mapping.insert(key, document_from_yaml(value, &child_path)?);
            }
            Document::Mapping(mapping)
        }
        Value::Tagged(tagged) => {
            return Err(AnonymizerError::invalid_input(
                if path.is_empty() { "<root>" } else { path },
                format!("unsupported tagged node {}", tagged.tag),
            ));
        }
    };
    Ok(document)
}

impl TryFrom<serde_yml::Value> for Document {
    type Error = AnonymizerError;

    fn try_from(value: serde_yml::Value) -> Result<Self> {
        document_from_yaml(value, "")
    }
}

impl From<Scalar> for serde_yml::Value {
    fn from(scalar: Scalar) -> Self {
        use serde_yml::Value;

        match scalar {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(b),
            Scalar::Number(Number::PosInt(n)) => Value::Number(n.into()),
            Scalar::Number(Number::NegInt(n)) => Value::Number(n.into()),
            Scalar::Number(Number::Float(n)) => Value::Number(n.into()),
            Scalar::String(s) => Value::String(s),
        }
    }
}

impl From<Document> for serde_yml::Value {
    fn from(document: Document) -> Self {
        match document {
            Document::Scalar(scalar) => scalar.into(),
            Document::Sequence(items) => {
                serde_yml::Value::Sequence(items.into_iter().map(Into::into).collect())
            }
            Document::Mapping(mapping) => {
                let mut map = serde_yml::Mapping::new();
                for (key, value) in mapping {
                    map.insert(key.into(), value.into());
                }
                serde_yml::Value::Mapping(map)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

impl From<serde_json::Value> for Document {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Document::Scalar(Scalar::Null),
            Value::Bool(b) => Document::Scalar(Scalar::Bool(b)),
            Value::Number(n) => {
                let number = if let Some(u) = n.as_u64() {
                    Number::PosInt(u)
                } else if let Some(i) = n.as_i64() {
                    Number::NegInt(i)
                } else {
                    Number::Float(n.as_f64().unwrap_or(f64::NAN))
                };
                Document::Scalar(Scalar::Number(number))
            }
            Value::String(s) => Document::Scalar(Scalar::String(s)),
            Value::Array(items) => Document::Sequence(items.into_iter().map(Document::from).collect()),
            Value::Object(map) => Document::Mapping(
                map.into_iter()
                    .map(|(key, value)| (Scalar::String(key), Document::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<Document> for serde_json::Value {
    fn from(document: Document) -> Self {
        use serde_json::Value;

        match document {
            Document::Scalar(Scalar::Null) => Value::Null,
            Document::Scalar(Scalar::Bool(b)) => Value::Bool(b),
            Document::Scalar(Scalar::Number(Number::PosInt(n))) => Value::Number(n.into()),
            Document::Scalar(Scalar::Number(Number::NegInt(n))) => Value::Number(n.into()),
            Document::Scalar(Scalar::Number(Number::Float(n))) => {
                serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
            }
            Document::Scalar(Scalar::String(s)) => Value::String(s),
            Document::Sequence(items) => Value::Array(items.into_iter().map(Into::into).collect()),
            Document::Mapping(mapping) => Value::Object(
                mapping
                    .into_iter()
                    .map(|(key, value)| (key.to_key_string(), value.into()))
                    .collect(),
            ),
        }
    }
}
