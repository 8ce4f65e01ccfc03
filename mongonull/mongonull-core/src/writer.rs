//! Value writer contract and the BSON document writer.

use bytes::{BufMut, Bytes, BytesMut};

use crate::{element_type::ElementType, error::WireError};

/// Typed write primitives used by value encoders.
///
/// Every scalar write emits exactly one value for the element most recently
/// opened with [`write_document_element`](Self::write_document_element).
pub trait ValueWriter {
    fn write_double(&mut self, value: f64) -> Result<(), WireError>;
    fn write_string(&mut self, value: &str) -> Result<(), WireError>;
    fn write_boolean(&mut self, value: bool) -> Result<(), WireError>;
    /// Write a UTC datetime given as milliseconds since the Unix epoch.
    fn write_datetime(&mut self, millis: i64) -> Result<(), WireError>;
    fn write_null(&mut self) -> Result<(), WireError>;
    fn write_int32(&mut self, value: i32) -> Result<(), WireError>;
    fn write_int64(&mut self, value: i64) -> Result<(), WireError>;

    /// Open a document, either the top-level one or the value of the pending element.
    fn write_document_start(&mut self) -> Result<(), WireError>;
    /// Open an element with the given key inside the current document.
    fn write_document_element(&mut self, key: &str) -> Result<(), WireError>;
    /// Close the current document.
    fn write_document_end(&mut self) -> Result<(), WireError>;
}

/// Writes BSON documents into an in-memory buffer.
///
/// The top-level value must be a document. Length prefixes are reserved when
/// a document is opened and patched when it is closed.
#[derive(Debug, Default)]
pub struct BsonValueWriter {
    buf: BytesMut,
    /// Start offsets of currently open documents.
    frames: Vec<usize>,
    /// Offset of the type byte of an element still waiting for its value.
    pending: Option<usize>,
    finished: bool,
}

impl BsonValueWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            ..Self::default()
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// True once the top-level document has been closed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }

    /// Claim the pending element for a value of type `ty`.
    fn begin_value(&mut self, ty: ElementType) -> Result<(), WireError> {
        let pos = self.pending.take().ok_or(WireError::InvalidState {
            operation: "write a value",
            detail: "without an open element",
        })?;
        self.buf[pos] = ty.as_u8();
        Ok(())
    }

    fn open_document(&mut self) {
        self.frames.push(self.buf.len());
        self.buf.put_i32_le(0);
    }
}

impl ValueWriter for BsonValueWriter {
    fn write_double(&mut self, value: f64) -> Result<(), WireError> {
        self.begin_value(ElementType::Double)?;
        self.buf.put_f64_le(value);
        Ok(())
    }

    fn write_string(&mut self, value: &str) -> Result<(), WireError> {
        let len = i32::try_from(value.len() + 1).map_err(|_| WireError::InvalidLength {
            offset: self.buf.len(),
            length: value.len() as i64 + 1,
        })?;
        self.begin_value(ElementType::String)?;
        self.buf.put_i32_le(len);
        self.buf.put_slice(value.as_bytes());
        self.buf.put_u8(0);
        Ok(())
    }

    fn write_boolean(&mut self, value: bool) -> Result<(), WireError> {
        self.begin_value(ElementType::Boolean)?;
        self.buf.put_u8(u8::from(value));
        Ok(())
    }

    fn write_datetime(&mut self, millis: i64) -> Result<(), WireError> {
        self.begin_value(ElementType::DateTime)?;
        self.buf.put_i64_le(millis);
        Ok(())
    }

    fn write_null(&mut self) -> Result<(), WireError> {
        self.begin_value(ElementType::Null)
    }

    fn write_int32(&mut self, value: i32) -> Result<(), WireError> {
        self.begin_value(ElementType::Int32)?;
        self.buf.put_i32_le(value);
        Ok(())
    }

    fn write_int64(&mut self, value: i64) -> Result<(), WireError> {
        self.begin_value(ElementType::Int64)?;
        self.buf.put_i64_le(value);
        Ok(())
    }

    fn write_document_start(&mut self) -> Result<(), WireError> {
        if self.pending.is_some() {
            self.begin_value(ElementType::EmbeddedDocument)?;
        } else if !self.frames.is_empty() || self.finished {
            return Err(WireError::InvalidState {
                operation: "start a document",
                detail: "without an open element",
            });
        }
        self.open_document();
        Ok(())
    }

    fn write_document_element(&mut self, key: &str) -> Result<(), WireError> {
        if self.frames.is_empty() {
            return Err(WireError::InvalidState {
                operation: "write an element",
                detail: "outside of a document",
            });
        }
        if self.pending.is_some() {
            return Err(WireError::InvalidState {
                operation: "write an element",
                detail: "while the previous element has no value",
            });
        }
        if key.as_bytes().contains(&0) {
            return Err(WireError::InvalidKey {
                key: key.to_string(),
            });
        }
        self.pending = Some(self.buf.len());
        self.buf.put_u8(0);
        self.buf.put_slice(key.as_bytes());
        self.buf.put_u8(0);
        Ok(())
    }

    fn write_document_end(&mut self) -> Result<(), WireError> {
        if self.pending.is_some() {
            return Err(WireError::InvalidState {
                operation: "end a document",
                detail: "while an element has no value",
            });
        }
        let start = self.frames.pop().ok_or(WireError::InvalidState {
            operation: "end a document",
            detail: "when no document is open",
        })?;
        self.buf.put_u8(0);
        let len = self.buf.len() - start;
        let len = i32::try_from(len).map_err(|_| WireError::InvalidLength {
            offset: start,
            length: len as i64,
        })?;
        self.buf[start..start + 4].copy_from_slice(&len.to_le_bytes());
        if self.frames.is_empty() {
            self.finished = true;
        }
        Ok(())
    }
}
