//! Self-describing documents and their stored values.
//!
//! A [`Document`] is one decoded unit of the binary format: an ordered
//! mapping from unique string keys to tagged [`Value`]s, supporting type-tag
//! introspection per key without a full decode. A document marked as an
//! array is the same structure interpreted positionally, with ascending
//! indices for keys.

pub mod value;

pub use value::{Binary, ElementType, ObjectId, Timestamp, Value};

/// An ordered mapping from string keys to tagged values.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    fields: Vec<(String, Value)>,
    array: bool,
}

impl Document {
    /// An empty document.
    pub const fn new() -> Self {
        Self {
            fields: Vec::new(),
            array: false,
        }
    }

    /// An empty document interpreted as a positional sequence.
    pub const fn array() -> Self {
        Self {
            fields: Vec::new(),
            array: true,
        }
    }

    /// Whether this document is interpreted as a positional sequence.
    pub fn is_array(&self) -> bool {
        self.array
    }

    /// The number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether this document has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Insert a value for a key, replacing any existing value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();

        match self.fields.iter_mut().find(|(name, _)| *name == key) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Append a value under the next index key.
    pub fn push(&mut self, value: impl Into<Value>) {
        let key = self.fields.len().to_string();
        self.fields.push((key, value.into()));
    }

    /// Look up the value for a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    /// Look up the embedded document for a key.
    ///
    /// Returns `None` when the key is absent or holds a non-document value.
    pub fn get_document(&self, key: &str) -> Option<&Document> {
        self.get(key).and_then(Value::as_document)
    }

    /// The type tag of the value for a key.
    pub fn type_tag(&self, key: &str) -> Option<ElementType> {
        self.get(key).map(Value::element_type)
    }

    /// Whether a key is present, regardless of the stored value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == key)
    }

    /// The keys of this document, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// The values of this document, in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.iter().map(|(_, value)| value)
    }

    /// The value at a position, in insertion order.
    pub fn value_at(&self, index: usize) -> Option<&Value> {
        self.fields.get(index).map(|(_, value)| value)
    }

    /// Iterate over key-value pairs, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(pairs: I) -> Self {
        let mut document = Self::new();
        for (key, value) in pairs {
            document.insert(key, value);
        }
        document
    }
}

impl FromIterator<Value> for Document {
    fn from_iter<I: IntoIterator<Item = Value>>(values: I) -> Self {
        let mut document = Self::array();
        for value in values {
            document.push(value);
        }
        document
    }
}
