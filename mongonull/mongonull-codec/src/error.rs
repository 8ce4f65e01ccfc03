//! Error types for encoders, decoders and registry lookups.

use mongonull_core::{ElementType, WireError};

use crate::host::HostType;

/// No codec is registered for a host type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LookupError {
    #[error("no encoder found for {host}")]
    NoEncoder { host: HostType },

    #[error("no decoder found for {host}")]
    NoDecoder { host: HostType },
}

/// Error returned by [`ValueEncoder`](crate::ValueEncoder) implementations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EncodeError {
    /// The encoder was handed a value of a type it is not bound to.
    #[error("{encoder} can only encode valid {expected}, but got {received}")]
    TypeMismatch {
        encoder: &'static str,
        expected: HostType,
        received: HostType,
    },

    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// Failure reported by the value writer, passed through as is.
    #[error(transparent)]
    Wire(#[from] WireError),
}

/// Error returned by [`ValueDecoder`](crate::ValueDecoder) implementations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    /// The destination is not of the type the decoder is bound to.
    #[error("{decoder} can only decode into {expected}, but got {received}")]
    DestinationShape {
        decoder: &'static str,
        expected: HostType,
        received: HostType,
    },

    /// The reader is positioned on a tag the decoder does not accept.
    #[error("received invalid BSON type to decode into {target}: {tag}")]
    UnsupportedTag { tag: ElementType, target: HostType },

    /// A BSON datetime that the target timestamp type cannot represent.
    #[error("datetime {millis} ms since epoch is out of range for {target}")]
    DateTimeOutOfRange { millis: i64, target: HostType },

    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// Failure reported by the value reader, passed through as is.
    #[error(transparent)]
    Wire(#[from] WireError),
}
