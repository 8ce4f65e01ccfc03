use chrono::{DateTime, Utc};
use mongonull_codec::{
    DecodeContext, DecodeError, EncodeContext, EncodeError, HostType, HostValue, NullableCodec,
    NullableScalar, ScalarKind, ValueDecoder, ValueEncoder, build_registry, nullable_codecs,
};
use mongonull_core::{
    ElementType, NullBool, NullFloat, NullInt, NullString, NullTime, WireError,
    rwtest::{Invoked, MockValue, ValueReaderWriter},
};

// ── helpers ──────────────────────────────────────────────────────────────────

fn encode<K: NullableScalar>(value: &dyn HostValue) -> (ValueReaderWriter, Result<(), EncodeError>) {
    let registry = build_registry([nullable_codecs()]);
    let mut vw = ValueReaderWriter::writer();
    let res =
        NullableCodec::<K>::new().encode_value(&EncodeContext::new(&registry), &mut vw, value);
    (vw, res)
}

fn decode<K: NullableScalar>(
    vr: &mut ValueReaderWriter,
    dest: &mut dyn HostValue,
) -> Result<(), DecodeError> {
    let registry = build_registry([nullable_codecs()]);
    NullableCodec::<K>::new().decode_value(&DecodeContext::new(&registry), vr, dest)
}

// ── encode ───────────────────────────────────────────────────────────────────

#[test]
fn encodes_present_values_with_single_primitive() {
    let cases: Vec<(Invoked, MockValue, ValueReaderWriter)> = vec![
        (
            Invoked::WriteString,
            MockValue::String("a string".to_string()),
            encode::<String>(&NullString::from_value("a string".to_string())).0,
        ),
        (
            Invoked::WriteInt64,
            MockValue::Int64(10),
            encode::<i64>(&NullInt::from_value(10)).0,
        ),
        (
            Invoked::WriteDouble,
            MockValue::Double(10.5),
            encode::<f64>(&NullFloat::from_value(10.5)).0,
        ),
        (
            Invoked::WriteBoolean,
            MockValue::Boolean(true),
            encode::<bool>(&NullBool::from_value(true)).0,
        ),
    ];
    for (op, value, vw) in cases {
        assert_eq!(vw.invoked, vec![op]);
        assert_eq!(vw.written, vec![value]);
    }
}

#[test]
fn encodes_time_as_epoch_millis() {
    let t = DateTime::from_timestamp_millis(1684328944555).unwrap();
    let (vw, res) = encode::<DateTime<Utc>>(&NullTime::from_value(t));
    res.unwrap();
    assert_eq!(vw.invoked, vec![Invoked::WriteDateTime]);
    assert_eq!(vw.written, vec![MockValue::DateTime(1684328944555)]);
}

#[test]
fn encoding_time_drops_sub_millisecond_precision() {
    let t = DateTime::from_timestamp(1, 1_999_999).unwrap();
    let (vw, res) = encode::<DateTime<Utc>>(&NullTime::from_value(t));
    res.unwrap();
    assert_eq!(vw.written, vec![MockValue::DateTime(1001)]);
}

#[test]
fn encodes_null_values_as_null_marker() {
    let outputs = [
        encode::<String>(&NullString::default()),
        encode::<i64>(&NullInt::default()),
        encode::<f64>(&NullFloat::default()),
        encode::<bool>(&NullBool::default()),
        encode::<DateTime<Utc>>(&NullTime::default()),
    ];
    for (vw, res) in outputs {
        res.unwrap();
        assert_eq!(vw.invoked, vec![Invoked::WriteNull]);
    }
}

#[test]
fn encode_rejects_other_types_without_writing() {
    let (vw, res) = encode::<String>(&NullInt::from_value(1));
    assert_eq!(
        res.unwrap_err(),
        EncodeError::TypeMismatch {
            encoder: "NullStringEncodeValue",
            expected: HostType::of::<NullString>(),
            received: HostType::of::<NullInt>(),
        }
    );
    assert!(vw.invoked.is_empty());

    // Structurally similar is not enough: the bare scalar is rejected too.
    let (vw, res) = encode::<i64>(&10i64);
    assert!(matches!(res, Err(EncodeError::TypeMismatch { .. })));
    assert!(vw.invoked.is_empty());
}

#[test]
fn encode_passes_writer_errors_through() {
    let registry = build_registry([nullable_codecs()]);
    let failure = WireError::InvalidState {
        operation: "write a value",
        detail: "for testing",
    };
    let mut vw = ValueReaderWriter::writer().fail_on(Invoked::WriteNull, failure.clone());
    let err = NullableCodec::<bool>::new()
        .encode_value(&EncodeContext::new(&registry), &mut vw, &NullBool::default())
        .unwrap_err();
    assert_eq!(err, EncodeError::Wire(failure.clone()));
    assert_eq!(err.to_string(), failure.to_string());
}

// ── decode ───────────────────────────────────────────────────────────────────

#[test]
fn decodes_present_values() {
    let mut s = NullString::default();
    let mut vr = ValueReaderWriter::reader(ElementType::String, MockValue::String("a string".into()));
    decode::<String>(&mut vr, &mut s).unwrap();
    assert_eq!(s, NullString::from_value("a string".to_string()));

    let mut i = NullInt::default();
    let mut vr = ValueReaderWriter::reader(ElementType::Int64, MockValue::Int64(10));
    decode::<i64>(&mut vr, &mut i).unwrap();
    assert_eq!(i, NullInt::from_value(10));
    assert_eq!(vr.invoked, vec![Invoked::ReadInt64]);

    let mut f = NullFloat::default();
    let mut vr = ValueReaderWriter::reader(ElementType::Double, MockValue::Double(10.5));
    decode::<f64>(&mut vr, &mut f).unwrap();
    assert_eq!(f, NullFloat::from_value(10.5));

    let mut b = NullBool::default();
    let mut vr = ValueReaderWriter::reader(ElementType::Boolean, MockValue::Boolean(true));
    decode::<bool>(&mut vr, &mut b).unwrap();
    assert_eq!(b, NullBool::from_value(true));

    let mut t = NullTime::default();
    let mut vr = ValueReaderWriter::reader(ElementType::DateTime, MockValue::DateTime(1684328944555));
    decode::<DateTime<Utc>>(&mut vr, &mut t).unwrap();
    assert_eq!(
        t,
        NullTime::from_value(DateTime::from_timestamp_millis(1684328944555).unwrap())
    );
}

#[test]
fn decodes_null_marker_as_null_replacing_previous_value() {
    let mut b = NullBool::from_value(true);
    let mut vr = ValueReaderWriter::reader(ElementType::Null, MockValue::None);
    decode::<bool>(&mut vr, &mut b).unwrap();
    assert_eq!(b, NullBool::default());
    assert_eq!(vr.invoked, vec![Invoked::ReadNull]);

    let mut s = NullString::from_value("old".to_string());
    let mut vr = ValueReaderWriter::reader(ElementType::Null, MockValue::None);
    decode::<String>(&mut vr, &mut s).unwrap();
    assert_eq!(s.value(), "");
    assert!(s.is_null());
}

#[test]
fn unsupported_tag_leaves_destination_and_reader_untouched() {
    let mut i = NullInt::from_value(7);
    let mut vr = ValueReaderWriter::reader(ElementType::String, MockValue::String("10".into()));
    let err = decode::<i64>(&mut vr, &mut i).unwrap_err();
    assert_eq!(
        err,
        DecodeError::UnsupportedTag {
            tag: ElementType::String,
            target: HostType::of::<NullInt>(),
        }
    );
    assert_eq!(
        err.to_string(),
        format!(
            "received invalid BSON type to decode into {}: string",
            HostType::of::<NullInt>()
        )
    );
    assert_eq!(i, NullInt::from_value(7));
    assert!(vr.invoked.is_empty());
}

#[test]
fn int32_is_not_accepted_for_nullable_int() {
    let mut i = NullInt::default();
    let mut vr = ValueReaderWriter::reader(ElementType::Int32, MockValue::Int32(1));
    assert!(matches!(
        decode::<i64>(&mut vr, &mut i),
        Err(DecodeError::UnsupportedTag { tag: ElementType::Int32, .. })
    ));
}

#[test]
fn decode_rejects_wrong_destination_before_reading() {
    let mut wrong = NullInt::default();
    let mut vr = ValueReaderWriter::reader(ElementType::Boolean, MockValue::Boolean(true));
    let err = decode::<bool>(&mut vr, &mut wrong).unwrap_err();
    assert_eq!(
        err,
        DecodeError::DestinationShape {
            decoder: "NullBoolDecodeValue",
            expected: HostType::of::<NullBool>(),
            received: HostType::of::<NullInt>(),
        }
    );
    assert!(vr.invoked.is_empty());
}

#[test]
fn decode_passes_reader_errors_through_and_keeps_destination() {
    let failure = WireError::UnexpectedEof {
        offset: 9,
        needed: 8,
        remaining: 2,
    };
    let mut f = NullFloat::from_value(1.5);
    let mut vr = ValueReaderWriter::reader(ElementType::Double, MockValue::Double(2.0))
        .fail_on(Invoked::ReadDouble, failure.clone());
    let err = decode::<f64>(&mut vr, &mut f).unwrap_err();
    assert_eq!(err, DecodeError::Wire(failure));
    assert_eq!(f, NullFloat::from_value(1.5));
}

#[test]
fn out_of_range_datetime_is_rejected() {
    let mut t = NullTime::default();
    let mut vr = ValueReaderWriter::reader(ElementType::DateTime, MockValue::DateTime(i64::MAX));
    assert!(matches!(
        decode::<DateTime<Utc>>(&mut vr, &mut t),
        Err(DecodeError::DateTimeOutOfRange { millis: i64::MAX, .. })
    ));
    assert_eq!(t, NullTime::default());
}

// ── kinds ────────────────────────────────────────────────────────────────────

#[test]
fn scalar_kinds_map_to_wire_tags_and_hosts() {
    let expected = [
        (ElementType::String, HostType::of::<NullString>()),
        (ElementType::Int64, HostType::of::<NullInt>()),
        (ElementType::Double, HostType::of::<NullFloat>()),
        (ElementType::Boolean, HostType::of::<NullBool>()),
        (ElementType::DateTime, HostType::of::<NullTime>()),
    ];
    for (kind, (tag, host)) in ScalarKind::ALL.iter().zip(expected) {
        assert_eq!(kind.element_type(), tag);
        assert_eq!(kind.host_type(), host);
    }
}

#[test]
fn nullable_layer_registers_exactly_the_five_kinds_in_order() {
    let set = nullable_codecs();
    let hosts: Vec<HostType> = set.encoder_hosts().collect();
    let expected: Vec<HostType> = ScalarKind::ALL.iter().map(|k| k.host_type()).collect();
    assert_eq!(hosts, expected);
    assert_eq!(set.decoder_hosts().collect::<Vec<_>>(), expected);
}
