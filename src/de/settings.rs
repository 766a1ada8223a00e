//! Per-scalar-kind conversion strategies.

use crate::document::Value;

use super::{CodingPath, DecodeError};

/// The conversion strategies one decode tree applies per scalar kind.
///
/// Settings are constructed once at the root of a decode and shared by
/// reference with every descendant context, so coercion behavior stays
/// uniform throughout one decode operation. Each integer width carries its
/// own strategy; widths never share a configured policy. Booleans have no
/// strategy: a stored boolean decodes only as itself.
#[derive(Debug, Clone, Default)]
pub struct DecoderSettings {
    /// Conversion policy for strings.
    pub string: StringStrategy,
    /// Conversion policy for 64-bit floating point values.
    pub double: DoubleStrategy,
    /// Conversion policy for 32-bit floating point values.
    pub float: FloatStrategy,
    /// Conversion policy for `i8` values.
    pub i8: IntegerStrategy<i8>,
    /// Conversion policy for `i16` values.
    pub i16: IntegerStrategy<i16>,
    /// Conversion policy for `i32` values.
    pub i32: IntegerStrategy<i32>,
    /// Conversion policy for `i64` values.
    pub i64: IntegerStrategy<i64>,
    /// Conversion policy for `isize` values.
    pub isize: IntegerStrategy<isize>,
    /// Conversion policy for `u8` values.
    pub u8: IntegerStrategy<u8>,
    /// Conversion policy for `u16` values.
    pub u16: IntegerStrategy<u16>,
    /// Conversion policy for `u32` values.
    pub u32: IntegerStrategy<u32>,
    /// Conversion policy for `u64` values.
    pub u64: IntegerStrategy<u64>,
    /// Conversion policy for `usize` values.
    pub usize: IntegerStrategy<usize>,
}

/// How stored values convert to strings.
#[derive(Debug, Clone, Copy, Default)]
pub enum StringStrategy {
    /// Accept only stored strings.
    #[default]
    Strict,
    /// Also accept stored integers, formatted decimally.
    Integers,
    /// Also accept stored integers and doubles, formatted decimally.
    Numerical,
    /// Convert with a caller-supplied function.
    Custom(fn(Option<&Value>) -> Option<String>),
}

impl StringStrategy {
    pub(crate) fn decode(
        &self,
        value: Option<&Value>,
        path: &CodingPath,
    ) -> Result<String, DecodeError> {
        let not_found = || DecodeError::not_found("string", path.clone());

        let Some(found) = value else {
            return match self {
                Self::Custom(convert) => convert(None).ok_or_else(not_found),
                _ => Err(not_found()),
            };
        };

        match (self, found) {
            (Self::Custom(convert), _) => convert(Some(found)).ok_or_else(not_found),
            (_, Value::String(value)) => Ok(value.clone()),
            (Self::Integers | Self::Numerical, Value::Int32(value)) => Ok(value.to_string()),
            (Self::Integers | Self::Numerical, Value::Int64(value)) => Ok(value.to_string()),
            (Self::Numerical, Value::Double(value)) => Ok(value.to_string()),
            (_, value) => Err(DecodeError::mismatch(
                "string",
                value.element_type(),
                path.clone(),
            )),
        }
    }
}

/// How stored values convert to 64-bit floating point.
#[derive(Debug, Clone, Copy, Default)]
pub enum DoubleStrategy {
    /// Accept only stored doubles.
    #[default]
    Strict,
    /// Also accept stored integers.
    Numerical,
    /// Accept stored strings parseable as a double.
    Textual,
    /// Convert with a caller-supplied function.
    Custom(fn(Option<&Value>) -> Option<f64>),
}

impl DoubleStrategy {
    pub(crate) fn decode(
        &self,
        value: Option<&Value>,
        path: &CodingPath,
    ) -> Result<f64, DecodeError> {
        let not_found = || DecodeError::not_found("f64", path.clone());

        let Some(found) = value else {
            return match self {
                Self::Custom(convert) => convert(None).ok_or_else(not_found),
                _ => Err(not_found()),
            };
        };

        match (self, found) {
            (Self::Custom(convert), _) => convert(Some(found)).ok_or_else(not_found),
            (_, Value::Double(value)) => Ok(*value),
            (Self::Numerical, Value::Int32(value)) => Ok((*value).into()),
            (Self::Numerical, Value::Int64(value)) => Ok(*value as f64),
            (Self::Textual, Value::String(text)) => text.parse().map_err(|_| not_found()),
            (_, value) => Err(DecodeError::mismatch(
                "f64",
                value.element_type(),
                path.clone(),
            )),
        }
    }
}

/// How stored values convert to 32-bit floating point.
///
/// The stored representation of floating point is always 64-bit; these
/// policies govern narrowing.
#[derive(Debug, Clone, Copy, Default)]
pub enum FloatStrategy {
    /// Narrow stored doubles, accepting precision loss.
    #[default]
    Lossy,
    /// Narrow stored doubles only when the value survives unchanged.
    Exact,
    /// As [`Lossy`](Self::Lossy), also accepting stored integers.
    Numerical,
    /// Accept stored strings parseable as a float.
    Textual,
    /// Convert with a caller-supplied function.
    Custom(fn(Option<&Value>) -> Option<f32>),
}

impl FloatStrategy {
    pub(crate) fn decode(
        &self,
        value: Option<&Value>,
        path: &CodingPath,
    ) -> Result<f32, DecodeError> {
        let not_found = || DecodeError::not_found("f32", path.clone());

        let Some(found) = value else {
            return match self {
                Self::Custom(convert) => convert(None).ok_or_else(not_found),
                _ => Err(not_found()),
            };
        };

        match (self, found) {
            (Self::Custom(convert), _) => convert(Some(found)).ok_or_else(not_found),
            (Self::Lossy | Self::Numerical, Value::Double(value)) => Ok(*value as f32),
            (Self::Exact, Value::Double(value)) => {
                let narrowed = *value as f32;

                if f64::from(narrowed) == *value || value.is_nan() {
                    Ok(narrowed)
                } else {
                    Err(not_found())
                }
            }
            (Self::Numerical, Value::Int32(value)) => Ok(*value as f32),
            (Self::Numerical, Value::Int64(value)) => Ok(*value as f32),
            (Self::Textual, Value::String(text)) => text.parse().map_err(|_| not_found()),
            (_, value) => Err(DecodeError::mismatch(
                "f32",
                value.element_type(),
                path.clone(),
            )),
        }
    }
}

/// A fixed-width integer target of a decoding strategy.
///
/// Implemented for every signed and unsigned width the engine decodes.
/// Conversions funnel through `i64`, the widest stored representation.
pub trait Integer: Sized + Copy {
    /// The name of this width, for diagnostics.
    const NAME: &'static str;

    /// Convert a stored integer, if it fits this width exactly.
    fn exact(value: i64) -> Option<Self>;
    /// Convert a stored integer, clamping to this width's bounds.
    fn saturating(value: i64) -> Self;
    /// Convert a stored integer, wrapping to this width.
    fn wrapping(value: i64) -> Self;
    /// Convert a stored double, rounded to the nearest integer, if finite
    /// and within this width's bounds.
    fn rounding(value: f64) -> Option<Self>;
    /// Parse a stored string as a decimal integer.
    fn parse(text: &str) -> Option<Self>;
}

macro_rules! integer {
    ($($t:ty),*) => { $(
        impl Integer for $t {
            const NAME: &'static str = stringify!($t);

            fn exact(value: i64) -> Option<Self> {
                value.try_into().ok()
            }

            fn saturating(value: i64) -> Self {
                value
                    .try_into()
                    .unwrap_or(if value < 0 { <$t>::MIN } else { <$t>::MAX })
            }

            fn wrapping(value: i64) -> Self {
                value as $t
            }

            fn rounding(value: f64) -> Option<Self> {
                if !value.is_finite() {
                    return None;
                }

                let rounded = value.round();

                (rounded >= <$t>::MIN as f64 && rounded <= <$t>::MAX as f64)
                    .then(|| rounded as $t)
            }

            fn parse(text: &str) -> Option<Self> {
                text.parse().ok()
            }
        }
    )* };
}

integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// How stored values convert to one integer width.
///
/// Stored integers are 32- or 64-bit; every policy accepts both
/// representations and differs in how it treats values that do not fit the
/// target width, or values stored under a non-integer tag.
#[derive(Debug, Clone, Copy)]
pub enum IntegerStrategy<T> {
    /// Accept stored integers only when the value fits exactly.
    Exact,
    /// Accept stored integers, clamping to the target's bounds.
    Saturating,
    /// Accept stored integers, wrapping to the target's width.
    Wrapping,
    /// As [`Exact`](Self::Exact), also accepting stored doubles rounded to
    /// the nearest integer.
    AnyNumber,
    /// Accept stored strings parseable as a decimal integer.
    Textual,
    /// Convert with a caller-supplied function.
    Custom(fn(Option<&Value>) -> Option<T>),
}

impl<T> Default for IntegerStrategy<T> {
    fn default() -> Self {
        Self::Exact
    }
}

impl<T: Integer> IntegerStrategy<T> {
    pub(crate) fn decode(
        &self,
        value: Option<&Value>,
        path: &CodingPath,
    ) -> Result<T, DecodeError> {
        let not_found = || DecodeError::not_found(T::NAME, path.clone());

        let Some(found) = value else {
            return match self {
                Self::Custom(convert) => convert(None).ok_or_else(not_found),
                _ => Err(not_found()),
            };
        };

        let stored = match found {
            Value::Int32(value) => Some(i64::from(*value)),
            Value::Int64(value) => Some(*value),
            _ => None,
        };

        match (self, stored) {
            (Self::Custom(convert), _) => convert(Some(found)).ok_or_else(not_found),
            (Self::Exact | Self::AnyNumber, Some(stored)) => T::exact(stored).ok_or_else(not_found),
            (Self::Saturating, Some(stored)) => Ok(T::saturating(stored)),
            (Self::Wrapping, Some(stored)) => Ok(T::wrapping(stored)),
            (Self::AnyNumber, None) => match found {
                Value::Double(value) => T::rounding(*value).ok_or_else(not_found),
                value => Err(DecodeError::mismatch(
                    T::NAME,
                    value.element_type(),
                    path.clone(),
                )),
            },
            (Self::Textual, _) => match found {
                Value::String(text) => T::parse(text).ok_or_else(not_found),
                value => Err(DecodeError::mismatch(
                    T::NAME,
                    value.element_type(),
                    path.clone(),
                )),
            },
            (_, None) => Err(DecodeError::mismatch(
                T::NAME,
                found.element_type(),
                path.clone(),
            )),
        }
    }
}
