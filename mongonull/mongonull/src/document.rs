//! Whole-document encode/decode helpers.

use std::any::Any;

use mongonull_codec::{DecodeError, EncodeError, Registry};
use mongonull_core::{BsonValueReader, BsonValueWriter};

/// Encode a document-shaped value (for example a `BTreeMap<String, NullString>`)
/// into BSON bytes.
pub fn to_vec<T: Any>(registry: &Registry, value: &T) -> Result<Vec<u8>, EncodeError> {
    let mut vw = BsonValueWriter::new();
    registry.encode_value(&mut vw, value)?;
    Ok(vw.into_bytes().to_vec())
}

/// Decode BSON bytes into a fresh document-shaped value.
pub fn from_slice<T: Any + Default>(registry: &Registry, data: &[u8]) -> Result<T, DecodeError> {
    let mut vr = BsonValueReader::from_slice(data);
    registry.decode_value(&mut vr)
}
