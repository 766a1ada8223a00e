//! Positional views resolving sequence elements into typed values.

use std::any;

use crate::document::{Document, Value};

use super::{
    CodingPath, Decode, DecodeError, Decoder, DecoderValue, Key, KeyedDecoder, PathSegment,
};

/// A positional view over a decoder's document, reading values in order.
///
/// Shares the keyed container's dispatch: scalars go through the strategy
/// configured for the requested kind, nested values recurse through a child
/// decoder. Path segments are element indices. The cursor advances past each
/// successfully decoded element; failures leave it in place.
#[derive(Debug, Clone)]
pub struct UnkeyedDecoder<'a> {
    decoder: Decoder<'a>,
    index: usize,
}

macro_rules! decode_integer {
    ($($method:ident, $field:ident, $t:ty;)*) => { $(
        #[doc = concat!("Decode the next element as an `", stringify!($t), "`, using the configured strategy.")]
        pub fn $method(&mut self) -> Result<$t, DecodeError> {
            let value = self
                .decoder
                .settings()
                .$field
                .decode(self.value(), &self.path_here())?;

            self.index += 1;
            Ok(value)
        }
    )* };
}

impl<'a> UnkeyedDecoder<'a> {
    pub(crate) fn new(decoder: Decoder<'a>) -> Self {
        Self { decoder, index: 0 }
    }

    fn document(&self) -> &'a Document {
        match self.decoder.value() {
            DecoderValue::Document(document) => document,
            // Guaranteed by construction in `Decoder::unkeyed`.
            DecoderValue::Primitive(_) => unreachable!(),
        }
    }

    fn value(&self) -> Option<&'a Value> {
        self.document().value_at(self.index)
    }

    fn path_here(&self) -> CodingPath {
        self.decoder.path().child_index(self.index)
    }

    /// The path from the document root to this container.
    pub fn path(&self) -> &CodingPath {
        self.decoder.path()
    }

    /// The number of elements.
    pub fn count(&self) -> usize {
        self.document().len()
    }

    /// The position of the next element to decode.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether every element has been decoded.
    pub fn is_at_end(&self) -> bool {
        self.index >= self.count()
    }

    /// Whether the next element is an explicit null, advancing past it if
    /// so.
    pub fn decode_nil(&mut self) -> bool {
        if matches!(self.value(), Some(Value::Null)) {
            self.index += 1;
            return true;
        }

        false
    }

    /// Decode the next element as a boolean.
    pub fn decode_bool(&mut self) -> Result<bool, DecodeError> {
        let value = match self.value() {
            Some(Value::Boolean(value)) => Ok(*value),
            Some(value) => Err(DecodeError::mismatch(
                "bool",
                value.element_type(),
                self.path_here(),
            )),
            None => Err(DecodeError::not_found("bool", self.path_here())),
        }?;

        self.index += 1;
        Ok(value)
    }

    /// Decode the next element as a string, using the configured strategy.
    pub fn decode_string(&mut self) -> Result<String, DecodeError> {
        let value = self
            .decoder
            .settings()
            .string
            .decode(self.value(), &self.path_here())?;

        self.index += 1;
        Ok(value)
    }

    /// Decode the next element as an `f64`, using the configured strategy.
    pub fn decode_f64(&mut self) -> Result<f64, DecodeError> {
        let value = self
            .decoder
            .settings()
            .double
            .decode(self.value(), &self.path_here())?;

        self.index += 1;
        Ok(value)
    }

    /// Decode the next element as an `f32`, using the configured strategy.
    pub fn decode_f32(&mut self) -> Result<f32, DecodeError> {
        let value = self
            .decoder
            .settings()
            .float
            .decode(self.value(), &self.path_here())?;

        self.index += 1;
        Ok(value)
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

    /// Decode the next element as a value of type `T`.
    pub fn decode<T: Decode>(&mut self) -> Result<T, DecodeError> {
        let Some(value) = self.value() else {
            return Err(DecodeError::not_found(
                any::type_name::<T>(),
                self.path_here(),
            ));
        };

        let decoder = self.decoder.child(value, PathSegment::Index(self.index));
        let decoded = T::decode(&decoder)?;

        self.index += 1;
        Ok(decoded)
    }

    /// A keyed container over the document stored at the next position.
    pub fn nested_container<N: Key>(&mut self) -> Result<KeyedDecoder<'a, N>, DecodeError> {
        match self.value() {
            Some(Value::Document(document)) => {
                let decoder = self
                    .decoder
                    .derived(DecoderValue::Document(document), self.path_here());

                self.index += 1;
                Ok(KeyedDecoder::new(decoder))
            }
            Some(value) => Err(DecodeError::mismatch(
                "document",
                value.element_type(),
                self.path_here(),
            )),
            None => Err(DecodeError::not_found("document", self.path_here())),
        }
    }

    /// An unkeyed container over the sequence stored at the next position.
    pub fn nested_unkeyed(&mut self) -> Result<UnkeyedDecoder<'a>, DecodeError> {
        match self.value() {
            Some(Value::Document(document)) => {
                let decoder = self
                    .decoder
                    .derived(DecoderValue::Document(document), self.path_here());

                self.index += 1;
                Ok(UnkeyedDecoder::new(decoder))
            }
            Some(value) => Err(DecodeError::mismatch(
                "array",
                value.element_type(),
                self.path_here(),
            )),
            None => Err(DecodeError::not_found("array", self.path_here())),
        }
    }
}
