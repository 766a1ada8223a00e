//! Strongly-typed decoding of loosely-typed binary documents.
//!
//! Bindery reconstructs typed program values from self-describing documents:
//! ordered mappings from string keys to tagged values, positionally
//! interpretable as sequences. A target type declares its own decoding logic
//! through the [`de::Decode`] trait (usually derived), and the engine walks
//! the document recursively, applying a configurable conversion strategy per
//! scalar kind and reporting the full path from the document root on
//! failure.
//!
//! Most users should begin with [`de::decode`] and the
//! [`Decode`](macro@de::Decode) derive macro. Conversion behavior is
//! configured per decode tree through [`de::DecoderSettings`].
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `derive`: enable derive macros (default).

pub mod de;
pub mod document;
