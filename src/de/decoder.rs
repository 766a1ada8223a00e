//! The decoding context carried through a decode tree.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use crate::document::{Document, ElementType, Value};

use super::{
    CodingPath, DecodeError, DecoderSettings, Key, KeyedDecoder, PathSegment, UnkeyedDecoder,
};

/// The value a decoding context operates over.
#[derive(Debug, Clone, Copy)]
pub enum DecoderValue<'a> {
    /// The context represents a whole document.
    Document(&'a Document),
    /// The context represents a single stored value.
    Primitive(&'a Value),
}

impl DecoderValue<'_> {
    /// The type tag of the wrapped value.
    pub fn element_type(&self) -> ElementType {
        match self {
            DecoderValue::Document(document) if document.is_array() => ElementType::Array,
            DecoderValue::Document(_) => ElementType::Document,
            DecoderValue::Primitive(value) => value.element_type(),
        }
    }
}

/// A decoding context: one wrapped value, the path that led to it, and the
/// settings and caller context shared across the decode tree.
///
/// Decoders are immutable once constructed. Recursing into a nested value
/// constructs a new child decoder per level, so sibling subtrees never share
/// mutable state.
///
/// A decoder wrapping a single value doubles as the single-value container
/// view: the `decode_*` methods convert the wrapped value through the
/// strategy configured for the requested kind.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    value: DecoderValue<'a>,
    settings: &'a DecoderSettings,
    path: CodingPath,
    context: &'a UserContext,
}

macro_rules! decode_integer {
    ($($method:ident, $field:ident, $t:ty;)*) => { $(
        #[doc = concat!("Decode the wrapped value as an `", stringify!($t), "`, using the configured strategy.")]
        pub fn $method(&self) -> Result<$t, DecodeError> {
            self.settings
                .$field
                .decode(Some(self.scalar(stringify!($t))?), &self.path)
        }
    )* };
}

impl<'a> Decoder<'a> {
    /// Construct a root decoder over a document.
    pub fn new(
        document: &'a Document,
        settings: &'a DecoderSettings,
        context: &'a UserContext,
    ) -> Self {
        Self {
            value: DecoderValue::Document(document),
            settings,
            path: CodingPath::root(),
            context,
        }
    }

    /// Construct the child decoder for a stored value one segment deeper.
    pub(crate) fn child(&self, value: &'a Value, segment: PathSegment) -> Self {
        let wrapped = match value {
            Value::Document(document) => DecoderValue::Document(document),
            value => DecoderValue::Primitive(value),
        };

        Self {
            value: wrapped,
            settings: self.settings,
            path: self.path.child(segment),
            context: self.context,
        }
    }

    /// Construct a sibling decoder over an explicit value and path.
    pub(crate) fn derived(&self, value: DecoderValue<'a>, path: CodingPath) -> Self {
        Self {
            value,
            settings: self.settings,
            path,
            context: self.context,
        }
    }

    /// The wrapped value.
    pub fn value(&self) -> DecoderValue<'a> {
        self.value
    }

    /// The path from the document root to this decoder.
    pub fn path(&self) -> &CodingPath {
        &self.path
    }

    /// The settings shared across this decode tree.
    pub fn settings(&self) -> &'a DecoderSettings {
        self.settings
    }

    /// The caller context shared across this decode tree.
    pub fn context(&self) -> &'a UserContext {
        self.context
    }

    /// A keyed view over the wrapped document.
    ///
    /// Requesting keyed access on a decoder wrapping a single value is a
    /// contract violation, surfaced as a type mismatch.
    pub fn keyed<K: Key>(&self) -> Result<KeyedDecoder<'a, K>, DecodeError> {
        match self.value {
            DecoderValue::Document(_) => Ok(KeyedDecoder::new(self.clone())),
            DecoderValue::Primitive(value) => Err(DecodeError::mismatch(
                "document",
                value.element_type(),
                self.path.clone(),
            )),
        }
    }

    /// A positional view over the wrapped document.
    pub fn unkeyed(&self) -> Result<UnkeyedDecoder<'a>, DecodeError> {
        match self.value {
            DecoderValue::Document(_) => Ok(UnkeyedDecoder::new(self.clone())),
            DecoderValue::Primitive(value) => Err(DecodeError::mismatch(
                "array",
                value.element_type(),
                self.path.clone(),
            )),
        }
    }

    /// Whether the wrapped value is an explicit null.
    pub fn decode_nil(&self) -> bool {
        matches!(self.value, DecoderValue::Primitive(Value::Null))
    }

    /// Decode the wrapped value as a boolean.
    pub fn decode_bool(&self) -> Result<bool, DecodeError> {
        match self.scalar("bool")? {
            Value::Boolean(value) => Ok(*value),
            value => Err(DecodeError::mismatch(
                "bool",
                value.element_type(),
                self.path.clone(),
            )),
        }
    }

    /// Decode the wrapped value as a string, using the configured strategy.
    pub fn decode_string(&self) -> Result<String, DecodeError> {
        self.settings
            .string
            .decode(Some(self.scalar("string")?), &self.path)
    }

    /// Decode the wrapped value as an `f64`, using the configured strategy.
    pub fn decode_f64(&self) -> Result<f64, DecodeError> {
        self.settings
            .double
            .decode(Some(self.scalar("f64")?), &self.path)
    }

    /// Decode the wrapped value as an `f32`, using the configured strategy.
    pub fn decode_f32(&self) -> Result<f32, DecodeError> {
        self.settings
            .float
            .decode(Some(self.scalar("f32")?), &self.path)
    }

    decode_integer! {
        decode_i8, i8, i8;
        decode_i16, i16, i16;
        decode_i32, i32, i32;
        decode_i64, i64, i64;
        decode_isize, isize, isize;
        decode_u8, u8, u8;
        decode_u16, u16, u16;
        decode_u32, u32, u32;
        decode_u64, u64, u64;
        decode_usize, usize, usize;
    }

    fn scalar(&self, expected: &'static str) -> Result<&'a Value, DecodeError> {
        match self.value {
            DecoderValue::Primitive(value) => Ok(value),
            DecoderValue::Document(_) => Err(DecodeError::mismatch(
                expected,
                self.value.element_type(),
                self.path.clone(),
            )),
        }
    }
}

/// Opaque caller-supplied context, shared read-only with every decoder in a
/// decode tree.
///
/// Entries are keyed by type; at most one value is stored per type.
#[derive(Default)]
pub struct UserContext {
    entries: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl UserContext {
    /// An empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, replacing any existing value of the same type.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.entries.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Retrieve the stored value of a type.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref())
    }
}

impl fmt::Debug for UserContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserContext")
            .field("entries", &self.entries.len())
            .finish()
    }
}
