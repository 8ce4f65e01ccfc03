//! Encoder/decoder contracts and the call contexts passed to them.

use mongonull_core::{ValueReader, ValueWriter};

use crate::{
    error::{DecodeError, EncodeError},
    host::{HostType, HostValue},
    registry::Registry,
};

/// Context for a single encode call.
#[derive(Debug, Clone, Copy)]
pub struct EncodeContext<'r> {
    registry: &'r Registry,
}

impl<'r> EncodeContext<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Registry used to encode nested values.
    pub fn registry(&self) -> &'r Registry {
        self.registry
    }
}

/// Context for a single decode call.
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext<'r> {
    registry: &'r Registry,
}

impl<'r> DecodeContext<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Registry used to decode nested values.
    pub fn registry(&self) -> &'r Registry {
        self.registry
    }
}

/// Writes one value of its bound host type through a [`ValueWriter`].
pub trait ValueEncoder: Send + Sync {
    /// Encode `value`.
    ///
    /// Implementations must reject values of any other type with
    /// [`EncodeError::TypeMismatch`] before writing anything.
    fn encode_value(
        &self,
        ctx: &EncodeContext<'_>,
        vw: &mut dyn ValueWriter,
        value: &dyn HostValue,
    ) -> Result<(), EncodeError>;
}

/// Reads one value of its bound host type from a [`ValueReader`].
pub trait ValueDecoder: Send + Sync {
    /// Decode the value the reader is positioned on into `dest`.
    ///
    /// `dest` is replaced as a whole on success and left untouched on failure.
    fn decode_value(
        &self,
        ctx: &DecodeContext<'_>,
        vr: &mut dyn ValueReader,
        dest: &mut dyn HostValue,
    ) -> Result<(), DecodeError>;
}

/// Downcast an encoder input to its bound type.
pub(crate) fn expect_value<'v, T: HostValue>(
    encoder: &'static str,
    value: &'v dyn HostValue,
) -> Result<&'v T, EncodeError> {
    let received = (*value).host_type();
    value
        .as_any()
        .downcast_ref::<T>()
        .ok_or(EncodeError::TypeMismatch {
            encoder,
            expected: HostType::of::<T>(),
            received,
        })
}

/// Downcast a decoder destination to its bound type.
pub(crate) fn expect_dest<'v, T: HostValue>(
    decoder: &'static str,
    dest: &'v mut dyn HostValue,
) -> Result<&'v mut T, DecodeError> {
    let received = (*dest).host_type();
    dest.as_any_mut()
        .downcast_mut::<T>()
        .ok_or(DecodeError::DestinationShape {
            decoder,
            expected: HostType::of::<T>(),
            received,
        })
}
