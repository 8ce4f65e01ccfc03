//! Codec registry for BSON values.
//!
//! A [`Registry`] maps Rust host types to a [`ValueEncoder`] and a
//! [`ValueDecoder`]. Registries are composed from ordered [`CodecSet`] layers
//! with [`build_registry`]: [`default_codecs`] for built-in types, and
//! [`nullable_codecs`] for the [`Nullable`](mongonull_core::Nullable)
//! scalar wrappers on top of it.

mod codec;
mod defaults;
mod error;
mod host;
mod nullable;
mod registry;

pub use codec::{DecodeContext, EncodeContext, ValueDecoder, ValueEncoder};
pub use defaults::default_codecs;
pub use error::{DecodeError, EncodeError, LookupError};
pub use host::{HostType, HostValue};
pub use nullable::{NullableCodec, NullableScalar, ScalarKind, nullable_codecs};
pub use registry::{CodecSet, Registry, build_registry};
