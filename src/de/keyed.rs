//! Keyed views resolving named document fields into typed values.

use std::any;
use std::marker::PhantomData;

use crate::document::{Document, ElementType, Value};

use super::{
    CodingPath, Decode, DecodeError, Decoder, DecoderValue, PathSegment, UnkeyedDecoder,
};

/// A key space for keyed decoding.
///
/// Implementations tie a container to the set of field names a target type
/// expects. `String` accepts every key.
pub trait Key: Sized {
    /// Parse a stored key name into this key space.
    fn from_name(name: &str) -> Option<Self>;

    /// The name of this key as stored in a document.
    fn name(&self) -> &str;
}

impl Key for String {
    fn from_name(name: &str) -> Option<Self> {
        Some(name.to_owned())
    }

    fn name(&self) -> &str {
        self
    }
}

/// A keyed view over a decoder's document, resolving named fields into typed
/// values.
///
/// Scalar lookups dispatch to the strategy configured for the requested
/// kind; nested documents and custom types recurse through a child decoder
/// sharing this container's settings and caller context, with the key
/// appended to the decoding path.
///
/// Containers are created once per composite-type decode and hold no state
/// beyond their decoder.
#[derive(Debug, Clone)]
pub struct KeyedDecoder<'a, K> {
    decoder: Decoder<'a>,
    _keys: PhantomData<K>,
}

macro_rules! decode_integer {
    ($($method:ident, $field:ident, $t:ty;)*) => { $(
        #[doc = concat!("Decode an `", stringify!($t), "` stored for a key, using the configured strategy.")]
        pub fn $method(&self, key: &K) -> Result<$t, DecodeError> {
            self.decoder
                .settings()
                .$field
                .decode(self.value(key), &self.path_for(key))
        }
    )* };
}

impl<'a, K: Key> KeyedDecoder<'a, K> {
    pub(crate) fn new(decoder: Decoder<'a>) -> Self {
        Self {
            decoder,
            _keys: PhantomData,
        }
    }

    fn document(&self) -> &'a Document {
        match self.decoder.value() {
            DecoderValue::Document(document) => document,
            // Guaranteed by construction in `Decoder::keyed`.
            DecoderValue::Primitive(_) => unreachable!(),
        }
    }

    fn value(&self, key: &K) -> Option<&'a Value> {
        self.document().get(key.name())
    }

    fn path_for(&self, key: &K) -> CodingPath {
        self.decoder.path().child_key(key.name())
    }

    /// The path from the document root to this container.
    pub fn path(&self) -> &CodingPath {
        self.decoder.path()
    }

    /// Every document key representable in the key space `K`, in document
    /// order.
    ///
    /// Keys not representable in `K` are dropped, not an error.
    pub fn all_keys(&self) -> Vec<K> {
        self.document().keys().filter_map(K::from_name).collect()
    }

    /// Whether the document has a key, regardless of the stored value.
    pub fn contains(&self, key: &K) -> bool {
        self.document().contains_key(key.name())
    }

    /// Whether a key is present and holds an explicit null.
    ///
    /// An absent key is not null; pair with [`contains`](Self::contains) to
    /// distinguish missing from present-but-null.
    pub fn decode_nil(&self, key: &K) -> bool {
        self.document().type_tag(key.name()) == Some(ElementType::Null)
    }

    /// Decode a boolean stored for a key.
    pub fn decode_bool(&self, key: &K) -> Result<bool, DecodeError> {
        match self.value(key) {
            Some(Value::Boolean(value)) => Ok(*value),
            Some(value) => Err(DecodeError::mismatch(
                "bool",
                value.element_type(),
                self.path_for(key),
            )),
            None => Err(DecodeError::not_found("bool", self.path_for(key))),
        }
    }

    /// Decode a string stored for a key, using the configured strategy.
    pub fn decode_string(&self, key: &K) -> Result<String, DecodeError> {
        self.decoder
            .settings()
            .string
            .decode(self.value(key), &self.path_for(key))
    }

    /// Decode an `f64` stored for a key, using the configured strategy.
    pub fn decode_f64(&self, key: &K) -> Result<f64, DecodeError> {
        self.decoder
            .settings()
            .double
            .decode(self.value(key), &self.path_for(key))
    }

    /// Decode an `f32` stored for a key, using the configured strategy.
    pub fn decode_f32(&self, key: &K) -> Result<f32, DecodeError> {
        self.decoder
            .settings()
            .float
            .decode(self.value(key), &self.path_for(key))
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

    /// Decode the stored value for a key, untyped.
    pub fn decode_value(&self, key: &K) -> Result<&'a Value, DecodeError> {
        self.value(key)
            .ok_or_else(|| DecodeError::not_found("value", self.path_for(key)))
    }

    /// Decode the stored value for a key, untyped, or `None` when absent.
    pub fn decode_value_if_present(&self, key: &K) -> Option<&'a Value> {
        self.value(key)
    }

    /// Decode a value of type `T` stored for a key.
    ///
    /// Fails with [`DecodeError::ValueNotFound`] when the key is absent;
    /// otherwise hands a child decoder over the stored value to `T`'s
    /// [`Decode`] implementation.
    pub fn decode<T: Decode>(&self, key: &K) -> Result<T, DecodeError> {
        let Some(value) = self.value(key) else {
            return Err(DecodeError::not_found(
                any::type_name::<T>(),
                self.path_for(key),
            ));
        };

        let decoder = self
            .decoder
            .child(value, PathSegment::Key(key.name().to_owned()));

        T::decode(&decoder)
    }

    /// Decode a value of type `T` stored for a key, or `None` when the key
    /// is absent or holds an explicit null.
    pub fn decode_if_present<T: Decode>(&self, key: &K) -> Result<Option<T>, DecodeError> {
        if !self.contains(key) || self.decode_nil(key) {
            return Ok(None);
        }

        self.decode(key).map(Some)
    }

    /// A keyed container over the document stored for a key.
    ///
    /// Substitutes an empty document when the key is absent or does not hold
    /// one, so access to an optional nested structure never fails.
    pub fn nested_container<N: Key>(&self, key: &K) -> KeyedDecoder<'a, N> {
        static EMPTY: Document = Document::new();

        let document = self.document().get_document(key.name()).unwrap_or(&EMPTY);
        let decoder = self
            .decoder
            .derived(DecoderValue::Document(document), self.path_for(key));

        KeyedDecoder::new(decoder)
    }

    /// An unkeyed container over the sequence stored for a key.
    ///
    /// Unlike [`nested_container`](Self::nested_container), absence and
    /// non-document values fail here.
    pub fn nested_unkeyed(&self, key: &K) -> Result<UnkeyedDecoder<'a>, DecodeError> {
        match self.value(key) {
            Some(Value::Document(document)) => {
                let decoder = self
                    .decoder
                    .derived(DecoderValue::Document(document), self.path_for(key));

                Ok(UnkeyedDecoder::new(decoder))
            }
            Some(value) => Err(DecodeError::mismatch(
                "array",
                value.element_type(),
                self.path_for(key),
            )),
            None => Err(DecodeError::not_found("array", self.path_for(key))),
        }
    }

    /// A decoder for escalating to a supertype's decoding logic.
    ///
    /// The returned decoder wraps the same document as this container.
    pub fn super_decoder(&self) -> Decoder<'a> {
        self.decoder.clone()
    }

    /// A decoder for escalating to a supertype's decoding logic.
    ///
    /// The returned decoder wraps the same document as this container.
    // TODO: Route escalation through the given key.
    pub fn super_decoder_for_key(&self, _key: &K) -> Decoder<'a> {
        self.decoder.clone()
    }
}
