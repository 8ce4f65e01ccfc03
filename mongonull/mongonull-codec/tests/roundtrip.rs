use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use mongonull_codec::{NullableScalar, Registry, build_registry, default_codecs, nullable_codecs};
use mongonull_core::{BsonValueReader, BsonValueWriter, Nullable};
use proptest::prelude::*;

fn registry() -> Registry {
    build_registry([default_codecs(), nullable_codecs()])
}

/// Encode `value` as the single element of a document and decode it back.
fn roundtrip<K: NullableScalar + PartialEq + std::fmt::Debug>(value: Nullable<K>) -> Nullable<K> {
    let registry = registry();
    let doc = BTreeMap::from([("v".to_string(), value)]);
    let mut vw = BsonValueWriter::new();
    registry.encode_value(&mut vw, &doc).unwrap();
    let mut vr = BsonValueReader::new(vw.into_bytes());
    let mut decoded: BTreeMap<String, Nullable<K>> = registry.decode_value(&mut vr).unwrap();
    decoded.remove("v").expect("element present")
}

proptest! {
    #[test]
    fn string_roundtrip(v in ".*") {
        let value = Nullable::from_value(v);
        prop_assert_eq!(roundtrip(value.clone()), value);
    }

    #[test]
    fn int_roundtrip(v in any::<i64>()) {
        prop_assert_eq!(roundtrip(Nullable::from_value(v)), Nullable::from_value(v));
    }

    #[test]
    fn float_roundtrip(v in -1e300f64..1e300f64) {
        prop_assert_eq!(roundtrip(Nullable::from_value(v)), Nullable::from_value(v));
    }

    #[test]
    fn bool_roundtrip(v in any::<bool>()) {
        prop_assert_eq!(roundtrip(Nullable::from_value(v)), Nullable::from_value(v));
    }

    #[test]
    fn time_roundtrip(millis in -1_000_000_000_000_000i64..1_000_000_000_000_000i64) {
        let t = DateTime::<Utc>::from_timestamp_millis(millis).unwrap();
        prop_assert_eq!(roundtrip(Nullable::from_value(t)), Nullable::from_value(t));
    }
}

#[test]
fn null_roundtrip_for_every_kind() {
    assert_eq!(roundtrip(Nullable::<String>::default()), Nullable::default());
    assert_eq!(roundtrip(Nullable::<i64>::default()), Nullable::default());
    assert_eq!(roundtrip(Nullable::<f64>::default()), Nullable::default());
    assert_eq!(roundtrip(Nullable::<bool>::default()), Nullable::default());
    assert_eq!(roundtrip(Nullable::<DateTime<Utc>>::default()), Nullable::default());
}
