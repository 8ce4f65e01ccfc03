//! Codecs for [`Nullable`] scalars.
//!
//! All five nullable kinds share one generic [`NullableCodec`]. The per-kind
//! differences (wire tag, read/write primitive and value conversion) live in
//! the sealed [`NullableScalar`] trait, so the set of kinds is closed.

use std::{fmt, marker::PhantomData};

use chrono::{DateTime, Utc};
use mongonull_core::{ElementType, Nullable, ValueReader, ValueWriter, WireError};
use tracing::trace;

use crate::{
    codec::{DecodeContext, EncodeContext, ValueDecoder, ValueEncoder, expect_dest, expect_value},
    error::{DecodeError, EncodeError},
    host::{HostType, HostValue},
    registry::CodecSet,
};

mod sealed {
    pub trait Sealed {}
}

/// Scalar kinds that have a nullable codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    String,
    Int64,
    Float64,
    Bool,
    Timestamp,
}

impl ScalarKind {
    /// Registration order used by [`nullable_codecs`].
    pub const ALL: [ScalarKind; 5] = [
        ScalarKind::String,
        ScalarKind::Int64,
        ScalarKind::Float64,
        ScalarKind::Bool,
        ScalarKind::Timestamp,
    ];

    /// Wire tag of a present value of this kind.
    pub fn element_type(&self) -> ElementType {
        match self {
            ScalarKind::String => ElementType::String,
            ScalarKind::Int64 => ElementType::Int64,
            ScalarKind::Float64 => ElementType::Double,
            ScalarKind::Bool => ElementType::Boolean,
            ScalarKind::Timestamp => ElementType::DateTime,
        }
    }

    /// Host type of the nullable wrapper for this kind.
    pub fn host_type(&self) -> HostType {
        match self {
            ScalarKind::String => HostType::of::<Nullable<String>>(),
            ScalarKind::Int64 => HostType::of::<Nullable<i64>>(),
            ScalarKind::Float64 => HostType::of::<Nullable<f64>>(),
            ScalarKind::Bool => HostType::of::<Nullable<bool>>(),
            ScalarKind::Timestamp => HostType::of::<Nullable<DateTime<Utc>>>(),
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScalarKind::String => "string",
            ScalarKind::Int64 => "int64",
            ScalarKind::Float64 => "float64",
            ScalarKind::Bool => "bool",
            ScalarKind::Timestamp => "timestamp",
        })
    }
}

/// A scalar type that can be wrapped in [`Nullable`] and encoded by
/// [`NullableCodec`].
///
/// Sealed: implemented for `String`, `i64`, `f64`, `bool` and
/// `DateTime<Utc>` only.
pub trait NullableScalar: sealed::Sealed + Default + Send + Sync + 'static {
    const KIND: ScalarKind;
    /// Name reported in [`EncodeError::TypeMismatch`].
    const ENCODER: &'static str;
    /// Name reported in [`DecodeError::DestinationShape`].
    const DECODER: &'static str;

    /// Write a present value with the kind's wire primitive.
    fn write(&self, vw: &mut dyn ValueWriter) -> Result<(), WireError>;

    /// Read a present value; the reader is positioned on the kind's tag.
    fn read(vr: &mut dyn ValueReader) -> Result<Self, DecodeError>;
}

impl sealed::Sealed for String {}

impl NullableScalar for String {
    const KIND: ScalarKind = ScalarKind::String;
    const ENCODER: &'static str = "NullStringEncodeValue";
    const DECODER: &'static str = "NullStringDecodeValue";

    fn write(&self, vw: &mut dyn ValueWriter) -> Result<(), WireError> {
        vw.write_string(self)
    }

    fn read(vr: &mut dyn ValueReader) -> Result<Self, DecodeError> {
        Ok(vr.read_string()?)
    }
}

impl sealed::Sealed for i64 {}

impl NullableScalar for i64 {
    const KIND: ScalarKind = ScalarKind::Int64;
    const ENCODER: &'static str = "NullIntEncodeValue";
    const DECODER: &'static str = "NullIntDecodeValue";

    fn write(&self, vw: &mut dyn ValueWriter) -> Result<(), WireError> {
        vw.write_int64(*self)
    }

    fn read(vr: &mut dyn ValueReader) -> Result<Self, DecodeError> {
        Ok(vr.read_int64()?)
    }
}

impl sealed::Sealed for f64 {}

impl NullableScalar for f64 {
    const KIND: ScalarKind = ScalarKind::Float64;
    const ENCODER: &'static str = "NullFloatEncodeValue";
    const DECODER: &'static str = "NullFloatDecodeValue";

    fn write(&self, vw: &mut dyn ValueWriter) -> Result<(), WireError> {
        vw.write_double(*self)
    }

    fn read(vr: &mut dyn ValueReader) -> Result<Self, DecodeError> {
        Ok(vr.read_double()?)
    }
}

impl sealed::Sealed for bool {}

impl NullableScalar for bool {
    const KIND: ScalarKind = ScalarKind::Bool;
    const ENCODER: &'static str = "NullBoolEncodeValue";
    const DECODER: &'static str = "NullBoolDecodeValue";

    fn write(&self, vw: &mut dyn ValueWriter) -> Result<(), WireError> {
        vw.write_boolean(*self)
    }

    fn read(vr: &mut dyn ValueReader) -> Result<Self, DecodeError> {
        Ok(vr.read_boolean()?)
    }
}

impl sealed::Sealed for DateTime<Utc> {}

/// BSON datetimes carry milliseconds; sub-millisecond precision is dropped on encode.
impl NullableScalar for DateTime<Utc> {
    const KIND: ScalarKind = ScalarKind::Timestamp;
    const ENCODER: &'static str = "NullTimeEncodeValue";
    const DECODER: &'static str = "NullTimeDecodeValue";

    fn write(&self, vw: &mut dyn ValueWriter) -> Result<(), WireError> {
        vw.write_datetime(self.timestamp_millis())
    }

    fn read(vr: &mut dyn ValueReader) -> Result<Self, DecodeError> {
        let millis = vr.read_datetime()?;
        DateTime::from_timestamp_millis(millis).ok_or(DecodeError::DateTimeOutOfRange {
            millis,
            target: HostType::of::<Nullable<DateTime<Utc>>>(),
        })
    }
}

/// Codec for `Nullable<K>`.
///
/// A present value is written with `K`'s wire primitive and a null one as a
/// BSON null. Decoding accepts exactly `K`'s tag or null.
pub struct NullableCodec<K>(PhantomData<fn() -> K>);

impl<K> NullableCodec<K> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<K> Default for NullableCodec<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Clone for NullableCodec<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for NullableCodec<K> {}

impl<K: NullableScalar> fmt::Debug for NullableCodec<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NullableCodec").field(&K::KIND).finish()
    }
}

impl<K: NullableScalar> ValueEncoder for NullableCodec<K> {
    fn encode_value(
        &self,
        _ctx: &EncodeContext<'_>,
        vw: &mut dyn ValueWriter,
        value: &dyn HostValue,
    ) -> Result<(), EncodeError> {
        let value = expect_value::<Nullable<K>>(K::ENCODER, value)?;
        match value.as_option() {
            Some(v) => v.write(vw)?,
            None => vw.write_null()?,
        }
        Ok(())
    }
}

impl<K: NullableScalar> ValueDecoder for NullableCodec<K> {
    fn decode_value(
        &self,
        _ctx: &DecodeContext<'_>,
        vr: &mut dyn ValueReader,
        dest: &mut dyn HostValue,
    ) -> Result<(), DecodeError> {
        let dest = expect_dest::<Nullable<K>>(K::DECODER, dest)?;
        let tag = vr.element_type()?;
        let result = if tag == K::KIND.element_type() {
            Nullable::from_value(K::read(vr)?)
        } else if tag == ElementType::Null {
            vr.read_null()?;
            Nullable::default()
        } else {
            return Err(DecodeError::UnsupportedTag {
                tag,
                target: HostType::of::<Nullable<K>>(),
            });
        };
        trace!(kind = %K::KIND, valid = result.is_valid(), "decoded nullable scalar");
        *dest = result;
        Ok(())
    }
}

fn with_nullable<K: NullableScalar>(set: CodecSet) -> CodecSet {
    set.with_codec::<Nullable<K>, _>(NullableCodec::<K>::new())
}

/// Codec layer for the five nullable scalar types.
///
/// Registers `NullString`, `NullInt`, `NullFloat`, `NullBool` and `NullTime`
/// in that order and nothing else.
pub fn nullable_codecs() -> CodecSet {
    let set = CodecSet::new("nullable");
    let set = with_nullable::<String>(set);
    let set = with_nullable::<i64>(set);
    let set = with_nullable::<f64>(set);
    let set = with_nullable::<bool>(set);
    with_nullable::<DateTime<Utc>>(set)
}
