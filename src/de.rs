//! Decoding of documents into strongly-typed values.
//!
//! A decode begins at [`decode`] (or [`decode_with`], to supply settings and
//! caller context), which hands a root [`Decoder`] to the target type's
//! [`Decode`] implementation. Composite types request a [`KeyedDecoder`] or
//! [`UnkeyedDecoder`] view of the decoder and resolve their fields through
//! it; scalars are produced by the conversion strategy configured for their
//! kind in [`DecoderSettings`]. Nested documents recurse through child
//! decoders, each extending by one segment the [`CodingPath`] reported in
//! errors.
//!
//! Decoding is synchronous and depth-first. Every context derived from a
//! document borrows it read-only, so independent decodes of one document may
//! run concurrently.

use std::fmt;

use thiserror::Error;

use crate::document::{Binary, Document, ElementType, ObjectId, Timestamp, Value};

pub mod decoder;
pub mod keyed;
pub mod settings;
pub mod unkeyed;

pub use decoder::{Decoder, DecoderValue, UserContext};
pub use keyed::{Key, KeyedDecoder};
pub use settings::{
    DecoderSettings, DoubleStrategy, FloatStrategy, Integer, IntegerStrategy, StringStrategy,
};
pub use unkeyed::UnkeyedDecoder;

/// Derive [`Decode`] for a struct with named fields.
///
/// _Requires Cargo feature `derive`._
///
/// Each field decodes from the document key matching its name; a
/// `#[key("…")]` attribute substitutes a different key. Fields of type
/// `Option<T>` tolerate absent and null values.
///
/// ```
/// #[derive(Debug, Decode)]
/// struct Specimen {
///     #[key("catalogNumber")]
///     catalog_number: String,
///     length_mm: i64,
///     notes: Option<String>,
/// }
/// ```
#[cfg(feature = "derive")]
pub use bindery_derive::Decode;

/// Construct a value of this type from a decoder.
///
/// Implementations describe how a type reassembles itself from a decoding
/// context, without knowledge of the underlying document format. See the
/// [`Decode`](macro@Decode) derive macro for an automatic implementation
/// covering structs with named fields.
pub trait Decode: Sized {
    /// Decode a value of this type from the given decoder.
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError>;
}

/// Construct a value of type `T` from a document, with default settings.
pub fn decode<T: Decode>(document: &Document) -> Result<T, DecodeError> {
    decode_with(document, &DecoderSettings::default(), &UserContext::new())
}

/// Construct a value of type `T` from a document, with the given settings
/// and caller context.
pub fn decode_with<T: Decode>(
    document: &Document,
    settings: &DecoderSettings,
    context: &UserContext,
) -> Result<T, DecodeError> {
    let decoder = Decoder::new(document, settings, context);
    T::decode(&decoder)
}

/// Errors occurring while decoding a document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// No value could be produced for the requested type.
    ///
    /// Raised for an absent key or position, and for a present value that
    /// the applied strategy could not coerce to the needed shape.
    #[error("No value of type `{expected}` found at `{path}`.")]
    ValueNotFound {
        /// The requested type.
        expected: &'static str,
        /// The location of the failed lookup.
        path: CodingPath,
    },
    /// A value is present, with a type tag incompatible with the request.
    #[error("Mismatched type at `{path}`: expected `{expected}`, found `{found:?}`.")]
    TypeMismatch {
        /// The requested type.
        expected: &'static str,
        /// The tag of the stored value.
        found: ElementType,
        /// The location of the failed lookup.
        path: CodingPath,
    },
}

impl DecodeError {
    pub(crate) fn not_found(expected: &'static str, path: CodingPath) -> Self {
        Self::ValueNotFound { expected, path }
    }

    pub(crate) fn mismatch(expected: &'static str, found: ElementType, path: CodingPath) -> Self {
        Self::TypeMismatch {
            expected,
            found,
            path,
        }
    }
}

/// One traversal step of a [`CodingPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A named document field.
    Key(String),
    /// A position in a sequence.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(name) => f.write_str(name),
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

/// The path from a document root to a decoding location.
///
/// Paths grow by exactly one segment per recursion level and serve only
/// diagnostics; lookups never consult them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodingPath(Vec<PathSegment>);

impl CodingPath {
    /// The path of a document root.
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// The traversal segments, root first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Extend this path by one segment.
    pub(crate) fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        Self(segments)
    }

    pub(crate) fn child_key(&self, name: &str) -> Self {
        self.child(PathSegment::Key(name.to_owned()))
    }

    pub(crate) fn child_index(&self, index: usize) -> Self {
        self.child(PathSegment::Index(index))
    }
}

impl fmt::Display for CodingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(root)");
        }

        for (position, segment) in self.0.iter().enumerate() {
            if position != 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }

        Ok(())
    }
}

macro_rules! decode_scalar {
    ($($t:ty => $method:ident,)*) => { $(
        impl Decode for $t {
            fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
                decoder.$method()
            }
        }
    )* };
}

decode_scalar! {
    bool => decode_bool,
    String => decode_string,
    f64 => decode_f64,
    f32 => decode_f32,
    i8 => decode_i8,
    i16 => decode_i16,
    i32 => decode_i32,
    i64 => decode_i64,
    isize => decode_isize,
    u8 => decode_u8,
    u16 => decode_u16,
    u32 => decode_u32,
    u64 => decode_u64,
    usize => decode_usize,
}

macro_rules! decode_payload {
    ($($t:ty => $variant:ident, $name:literal,)*) => { $(
        impl Decode for $t {
            fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
                match decoder.value() {
                    DecoderValue::Primitive(Value::$variant(payload)) => Ok(payload.clone()),
                    value => Err(DecodeError::mismatch(
                        $name,
                        value.element_type(),
                        decoder.path().clone(),
                    )),
                }
            }
        }
    )* };
}

decode_payload! {
    Binary => Binary, "binary",
    ObjectId => ObjectId, "objectId",
    Timestamp => Timestamp, "timestamp",
}

impl Decode for Document {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
        match decoder.value() {
            DecoderValue::Document(document) => Ok(document.clone()),
            DecoderValue::Primitive(value) => Err(DecodeError::mismatch(
                "document",
                value.element_type(),
                decoder.path().clone(),
            )),
        }
    }
}

impl Decode for Value {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
        match decoder.value() {
            DecoderValue::Document(document) => Ok(Value::Document(document.clone())),
            DecoderValue::Primitive(value) => Ok(value.clone()),
        }
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
        match decoder.value() {
            DecoderValue::Primitive(Value::Null) => Ok(None),
            _ => T::decode(decoder).map(Some),
        }
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
        let mut elements = decoder.unkeyed()?;
        let mut values = Vec::with_capacity(elements.count());

        while !elements.is_at_end() {
            values.push(elements.decode()?);
        }

        Ok(values)
    }
}