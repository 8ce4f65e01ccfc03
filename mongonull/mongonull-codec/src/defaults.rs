//! Default codecs for built-in scalars and string-keyed maps.
//!
//! Primitive decoders are lenient the way the Go driver's defaults are: a
//! BSON null decodes to the zero value, and narrower numeric tags widen into
//! `i64`/`f64`.

use std::{
    any::Any,
    collections::{BTreeMap, HashMap},
    marker::PhantomData,
};

use chrono::{DateTime, Utc};
use mongonull_core::{
    ElementType, NullBool, NullFloat, NullInt, NullString, NullTime, ValueReader, ValueWriter,
    WireError,
};
use tracing::trace;

use crate::{
    codec::{DecodeContext, EncodeContext, ValueDecoder, ValueEncoder, expect_dest, expect_value},
    error::{DecodeError, EncodeError},
    host::{HostType, HostValue},
    registry::CodecSet,
};

trait Primitive: Any + Default + Send + Sync {
    const ENCODER: &'static str;
    const DECODER: &'static str;

    fn write(&self, vw: &mut dyn ValueWriter) -> Result<(), WireError>;

    /// Read a value positioned on `tag`, which is never null.
    fn read(vr: &mut dyn ValueReader, tag: ElementType) -> Result<Self, DecodeError>;
}

fn unsupported<T: Any>(tag: ElementType) -> DecodeError {
    DecodeError::UnsupportedTag {
        tag,
        target: HostType::of::<T>(),
    }
}

impl Primitive for bool {
    const ENCODER: &'static str = "BooleanEncodeValue";
    const DECODER: &'static str = "BooleanDecodeValue";

    fn write(&self, vw: &mut dyn ValueWriter) -> Result<(), WireError> {
        vw.write_boolean(*self)
    }

    fn read(vr: &mut dyn ValueReader, tag: ElementType) -> Result<Self, DecodeError> {
        match tag {
            ElementType::Boolean => Ok(vr.read_boolean()?),
            _ => Err(unsupported::<Self>(tag)),
        }
    }
}

impl Primitive for i32 {
    const ENCODER: &'static str = "IntEncodeValue";
    const DECODER: &'static str = "IntDecodeValue";

    fn write(&self, vw: &mut dyn ValueWriter) -> Result<(), WireError> {
        vw.write_int32(*self)
    }

    fn read(vr: &mut dyn ValueReader, tag: ElementType) -> Result<Self, DecodeError> {
        match tag {
            ElementType::Int32 => Ok(vr.read_int32()?),
            _ => Err(unsupported::<Self>(tag)),
        }
    }
}

impl Primitive for i64 {
    const ENCODER: &'static str = "IntEncodeValue";
    const DECODER: &'static str = "IntDecodeValue";

    fn write(&self, vw: &mut dyn ValueWriter) -> Result<(), WireError> {
        vw.write_int64(*self)
    }

    fn read(vr: &mut dyn ValueReader, tag: ElementType) -> Result<Self, DecodeError> {
        match tag {
            ElementType::Int32 => Ok(vr.read_int32()?.into()),
            ElementType::Int64 => Ok(vr.read_int64()?),
            _ => Err(unsupported::<Self>(tag)),
        }
    }
}

impl Primitive for f64 {
    const ENCODER: &'static str = "FloatEncodeValue";
    const DECODER: &'static str = "FloatDecodeValue";

    fn write(&self, vw: &mut dyn ValueWriter) -> Result<(), WireError> {
        vw.write_double(*self)
    }

    fn read(vr: &mut dyn ValueReader, tag: ElementType) -> Result<Self, DecodeError> {
        match tag {
            ElementType::Double => Ok(vr.read_double()?),
            ElementType::Int32 => Ok(vr.read_int32()?.into()),
            ElementType::Int64 => Ok(vr.read_int64()? as f64),
            _ => Err(unsupported::<Self>(tag)),
        }
    }
}

impl Primitive for String {
    const ENCODER: &'static str = "StringEncodeValue";
    const DECODER: &'static str = "StringDecodeValue";

    fn write(&self, vw: &mut dyn ValueWriter) -> Result<(), WireError> {
        vw.write_string(self)
    }

    fn read(vr: &mut dyn ValueReader, tag: ElementType) -> Result<Self, DecodeError> {
        match tag {
            ElementType::String => Ok(vr.read_string()?),
            _ => Err(unsupported::<Self>(tag)),
        }
    }
}

impl Primitive for DateTime<Utc> {
    const ENCODER: &'static str = "TimeEncodeValue";
    const DECODER: &'static str = "TimeDecodeValue";

    fn write(&self, vw: &mut dyn ValueWriter) -> Result<(), WireError> {
        vw.write_datetime(self.timestamp_millis())
    }

    fn read(vr: &mut dyn ValueReader, tag: ElementType) -> Result<Self, DecodeError> {
        match tag {
            ElementType::DateTime => {
                let millis = vr.read_datetime()?;
                DateTime::from_timestamp_millis(millis).ok_or(DecodeError::DateTimeOutOfRange {
                    millis,
                    target: HostType::of::<Self>(),
                })
            }
            _ => Err(unsupported::<Self>(tag)),
        }
    }
}

struct PrimitiveCodec<T>(PhantomData<fn() -> T>);

impl<T: Primitive> ValueEncoder for PrimitiveCodec<T> {
    fn encode_value(
        &self,
        _ctx: &EncodeContext<'_>,
        vw: &mut dyn ValueWriter,
        value: &dyn HostValue,
    ) -> Result<(), EncodeError> {
        expect_value::<T>(T::ENCODER, value)?.write(vw)?;
        Ok(())
    }
}

impl<T: Primitive> ValueDecoder for PrimitiveCodec<T> {
    fn decode_value(
        &self,
        _ctx: &DecodeContext<'_>,
        vr: &mut dyn ValueReader,
        dest: &mut dyn HostValue,
    ) -> Result<(), DecodeError> {
        let dest = expect_dest::<T>(T::DECODER, dest)?;
        let result = match vr.element_type()? {
            ElementType::Null => {
                vr.read_null()?;
                T::default()
            }
            tag => T::read(vr, tag)?,
        };
        *dest = result;
        Ok(())
    }
}

/// String-keyed map encoded as an embedded document.
trait StringMap: Any + Default + Send + Sync {
    type Value: Any + Default;

    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &Self::Value)> + '_>;
    fn insert_entry(&mut self, key: String, value: Self::Value);
}

impl<V: Any + Default + Send + Sync> StringMap for BTreeMap<String, V> {
    type Value = V;

    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &V)> + '_> {
        Box::new(self.iter().map(|(k, v)| (k.as_str(), v)))
    }

    fn insert_entry(&mut self, key: String, value: V) {
        self.insert(key, value);
    }
}

impl<V: Any + Default + Send + Sync> StringMap for HashMap<String, V> {
    type Value = V;

    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &V)> + '_> {
        Box::new(self.iter().map(|(k, v)| (k.as_str(), v)))
    }

    fn insert_entry(&mut self, key: String, value: V) {
        self.insert(key, value);
    }
}

/// Document codec whose element values are dispatched through the registry
/// carried by the call context.
struct MapCodec<M>(PhantomData<fn() -> M>);

impl<M: StringMap> ValueEncoder for MapCodec<M> {
    fn encode_value(
        &self,
        ctx: &EncodeContext<'_>,
        vw: &mut dyn ValueWriter,
        value: &dyn HostValue,
    ) -> Result<(), EncodeError> {
        let map = expect_value::<M>("MapEncodeValue", value)?;
        let encoder = ctx.registry().lookup_encoder(HostType::of::<M::Value>())?;
        vw.write_document_start()?;
        for (key, v) in map.entries() {
            trace!(key, "encoding document element");
            vw.write_document_element(key)?;
            encoder.encode_value(ctx, vw, v)?;
        }
        vw.write_document_end()?;
        Ok(())
    }
}

impl<M: StringMap> ValueDecoder for MapCodec<M> {
    fn decode_value(
        &self,
        ctx: &DecodeContext<'_>,
        vr: &mut dyn ValueReader,
        dest: &mut dyn HostValue,
    ) -> Result<(), DecodeError> {
        let dest = expect_dest::<M>("MapDecodeValue", dest)?;
        let result = match vr.element_type()? {
            ElementType::EmbeddedDocument => {
                let decoder = ctx.registry().lookup_decoder(HostType::of::<M::Value>())?;
                vr.read_document_start()?;
                let mut map = M::default();
                while let Some(key) = vr.read_element()? {
                    trace!(key = key.as_str(), "decoding document element");
                    let mut value = M::Value::default();
                    decoder.decode_value(ctx, vr, &mut value)?;
                    map.insert_entry(key, value);
                }
                map
            }
            ElementType::Null => {
                vr.read_null()?;
                M::default()
            }
            tag => return Err(unsupported::<M>(tag)),
        };
        *dest = result;
        Ok(())
    }
}

fn with_primitive<T: Primitive>(set: CodecSet) -> CodecSet {
    set.with_codec::<T, _>(PrimitiveCodec::<T>(PhantomData))
}

fn with_maps<V: Any + Default + Send + Sync>(set: CodecSet) -> CodecSet {
    set.with_codec::<BTreeMap<String, V>, _>(MapCodec::<BTreeMap<String, V>>(PhantomData))
        .with_codec::<HashMap<String, V>, _>(MapCodec::<HashMap<String, V>>(PhantomData))
}

/// The default codec layer.
///
/// Covers `bool`, `i32`, `i64`, `f64`, `String` and `DateTime<Utc>`, plus
/// `BTreeMap<String, V>` / `HashMap<String, V>` documents for each of those
/// and for the nullable wrappers. Map elements are encoded with whatever the
/// registry holds for `V`; the nullable scalars themselves get no codec here.
pub fn default_codecs() -> CodecSet {
    let mut set = CodecSet::new("default");
    set = with_primitive::<bool>(set);
    set = with_primitive::<i32>(set);
    set = with_primitive::<i64>(set);
    set = with_primitive::<f64>(set);
    set = with_primitive::<String>(set);
    set = with_primitive::<DateTime<Utc>>(set);

    set = with_maps::<bool>(set);
    set = with_maps::<i32>(set);
    set = with_maps::<i64>(set);
    set = with_maps::<f64>(set);
    set = with_maps::<String>(set);
    set = with_maps::<DateTime<Utc>>(set);

    set = with_maps::<NullString>(set);
    set = with_maps::<NullInt>(set);
    set = with_maps::<NullFloat>(set);
    set = with_maps::<NullBool>(set);
    with_maps::<NullTime>(set)
}
