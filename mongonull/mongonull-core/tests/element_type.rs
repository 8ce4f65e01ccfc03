use mongonull_core::ElementType;

#[test]
fn element_type_known_byte_mapping() {
    assert_eq!(ElementType::from(0x01), ElementType::Double);
    assert_eq!(ElementType::from(0x02), ElementType::String);
    assert_eq!(ElementType::from(0x08), ElementType::Boolean);
    assert_eq!(ElementType::from(0x09), ElementType::DateTime);
    assert_eq!(ElementType::from(0x0A), ElementType::Null);
    assert_eq!(ElementType::from(0x12), ElementType::Int64);
    assert_eq!(ElementType::from(0xFF), ElementType::MinKey);
    assert_eq!(ElementType::from(0x7F), ElementType::MaxKey);
}

#[test]
fn element_type_byte_roundtrip_covers_every_tag() {
    for b in 0..=u8::MAX {
        assert_eq!(ElementType::from(b).as_u8(), b);
    }
}

#[test]
fn element_type_unknown_passthrough() {
    let ty = ElementType::from(0x42);
    assert_eq!(ty, ElementType::Unknown(0x42));
    assert_eq!(ty.to_string(), "unknown element type 0x42");
}

#[test]
fn element_type_display_uses_driver_names() {
    assert_eq!(ElementType::Int64.to_string(), "64-bit integer");
    assert_eq!(ElementType::DateTime.to_string(), "UTC datetime");
    assert_eq!(ElementType::EmbeddedDocument.to_string(), "embedded document");
    assert_eq!(ElementType::Null.to_string(), ElementType::Null.as_str());
}
