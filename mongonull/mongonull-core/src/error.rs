//! Error types for the BSON reader/writer layer.

use crate::element_type::ElementType;

/// Error returned by [`ValueReader`](crate::ValueReader) and
/// [`ValueWriter`](crate::ValueWriter) implementations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WireError {
    /// Input ended before the requested value could be read.
    #[error("unexpected end of input at offset {offset}: need {needed} bytes, {remaining} remaining")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// A length prefix is negative, too small, or points past the enclosing value.
    #[error("invalid length {length} at offset {offset}")]
    InvalidLength { offset: usize, length: i64 },

    /// String or key bytes are not valid UTF-8.
    #[error("invalid UTF-8 at offset {offset}")]
    InvalidUtf8 { offset: usize },

    /// A string value is missing its trailing NUL byte.
    #[error("string at offset {offset} is not NUL terminated")]
    MissingTerminator { offset: usize },

    /// Boolean byte is neither `0x00` nor `0x01`.
    #[error("invalid boolean byte 0x{byte:02x} at offset {offset}")]
    InvalidBoolean { offset: usize, byte: u8 },

    /// Element key contains an interior NUL byte and cannot be encoded as a cstring.
    #[error("element key {key:?} contains a NUL byte")]
    InvalidKey { key: String },

    /// A read was attempted for a different type than the one positioned on.
    #[error("cannot read {expected} while positioned on {actual}")]
    ElementTypeMismatch {
        expected: ElementType,
        actual: ElementType,
    },

    /// The reader is not positioned on a value.
    #[error("reader is not positioned on a value")]
    NotPositioned,

    /// The operation is not valid in the reader/writer's current state.
    #[error("invalid state: cannot {operation} {detail}")]
    InvalidState {
        operation: &'static str,
        detail: &'static str,
    },

    /// Value type cannot be skipped or read by this implementation.
    #[error("unsupported element type {0}")]
    Unsupported(ElementType),
}
