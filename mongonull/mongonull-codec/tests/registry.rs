use std::{collections::BTreeMap, sync::Arc, thread};

use mongonull_codec::{
    CodecSet, DecodeContext, DecodeError, EncodeContext, EncodeError, HostType, HostValue,
    LookupError, Registry, ScalarKind, ValueDecoder, ValueEncoder, build_registry,
    default_codecs, nullable_codecs,
};
use mongonull_core::{
    BsonValueWriter, NullBool, ValueReader, ValueWriter,
    rwtest::{Invoked, MockValue, ValueReaderWriter},
};

/// Encodes `i64` as a 32-bit integer, truncating.
struct NarrowIntCodec;

impl ValueEncoder for NarrowIntCodec {
    fn encode_value(
        &self,
        _ctx: &EncodeContext<'_>,
        vw: &mut dyn ValueWriter,
        value: &dyn HostValue,
    ) -> Result<(), EncodeError> {
        let v = value
            .as_any()
            .downcast_ref::<i64>()
            .ok_or(EncodeError::TypeMismatch {
                encoder: "NarrowIntEncodeValue",
                expected: HostType::of::<i64>(),
                received: (*value).host_type(),
            })?;
        vw.write_int32(*v as i32)?;
        Ok(())
    }
}

impl ValueDecoder for NarrowIntCodec {
    fn decode_value(
        &self,
        _ctx: &DecodeContext<'_>,
        vr: &mut dyn ValueReader,
        dest: &mut dyn HostValue,
    ) -> Result<(), DecodeError> {
        let received = (*dest).host_type();
        let dest = dest
            .as_any_mut()
            .downcast_mut::<i64>()
            .ok_or(DecodeError::DestinationShape {
                decoder: "NarrowIntDecodeValue",
                expected: HostType::of::<i64>(),
                received,
            })?;
        *dest = vr.read_int32()?.into();
        Ok(())
    }
}

#[test]
fn nullable_hosts_resolve_to_nullable_codecs() {
    let registry = build_registry([default_codecs(), nullable_codecs()]);
    let defaults_only = build_registry([default_codecs()]);

    for kind in ScalarKind::ALL {
        let host = kind.host_type();
        assert!(registry.lookup_encoder(host).is_ok(), "{kind}");
        assert!(registry.lookup_decoder(host).is_ok(), "{kind}");
        assert_eq!(
            defaults_only.lookup_encoder(host).err(),
            Some(LookupError::NoEncoder { host })
        );
    }

    let mut vw = ValueReaderWriter::writer();
    registry.encode_value(&mut vw, &NullBool::default()).unwrap();
    assert_eq!(vw.invoked, vec![Invoked::WriteNull]);
}

#[test]
fn other_hosts_keep_their_default_codecs() {
    let defaults = default_codecs();
    let defaults_only = build_registry([defaults.clone()]);
    let composed = build_registry([defaults.clone(), nullable_codecs()]);

    for host in defaults.encoder_hosts() {
        let before = defaults_only.lookup_encoder(host).unwrap();
        let after = composed.lookup_encoder(host).unwrap();
        assert!(Arc::ptr_eq(before, after), "encoder for {host} changed");
    }
    for host in defaults.decoder_hosts() {
        let before = defaults_only.lookup_decoder(host).unwrap();
        let after = composed.lookup_decoder(host).unwrap();
        assert!(Arc::ptr_eq(before, after), "decoder for {host} changed");
    }
    assert_eq!(composed.encoder_count(), defaults_only.encoder_count() + 5);
    assert_eq!(composed.decoder_count(), defaults_only.decoder_count() + 5);
}

#[test]
fn later_layer_wins_for_the_same_host() {
    let custom = CodecSet::new("narrow").with_codec::<i64, _>(NarrowIntCodec);
    let registry = build_registry([default_codecs(), custom]);

    let mut vw = ValueReaderWriter::writer();
    registry.encode_value(&mut vw, &7i64).unwrap();
    assert_eq!(vw.written, vec![MockValue::Int32(7)]);

    let reversed = build_registry([
        CodecSet::new("narrow").with_codec::<i64, _>(NarrowIntCodec),
        default_codecs(),
    ]);
    let mut vw = ValueReaderWriter::writer();
    reversed.encode_value(&mut vw, &7i64).unwrap();
    assert_eq!(vw.written, vec![MockValue::Int64(7)]);
}

#[test]
fn encoder_and_decoder_can_be_registered_separately() {
    let set = CodecSet::new("split")
        .with_encoder::<i64>(NarrowIntCodec)
        .with_decoder::<i64>(NarrowIntCodec);
    let registry = build_registry([set]);
    assert_eq!(registry.encoder_count(), 1);
    assert_eq!(registry.decoder_count(), 1);
}

#[test]
fn lookup_of_unregistered_type_fails() {
    let registry = build_registry([default_codecs(), nullable_codecs()]);
    let host = HostType::of::<Vec<u8>>();
    let err = registry.lookup_decoder(host).err().unwrap();
    assert_eq!(err, LookupError::NoDecoder { host });
    assert_eq!(err.to_string(), format!("no decoder found for {}", host.name()));

    let mut vw = BsonValueWriter::new();
    assert!(matches!(
        registry.encode_value(&mut vw, &vec![1u8]),
        Err(EncodeError::Lookup(LookupError::NoEncoder { .. }))
    ));
}

#[test]
fn registry_is_shared_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Registry>();

    let registry = build_registry([default_codecs(), nullable_codecs()]);
    thread::scope(|s| {
        for i in 0..4i64 {
            let registry = &registry;
            s.spawn(move || {
                let map = BTreeMap::from([("n".to_string(), i)]);
                let mut vw = BsonValueWriter::new();
                registry.encode_value(&mut vw, &map).unwrap();
                assert!(vw.is_finished());
            });
        }
    });
}
