//! Value reader contract and the BSON document reader.

use bytes::{Buf, Bytes};

use crate::{element_type::ElementType, error::WireError};

/// Typed read primitives used by value decoders.
///
/// A reader is positioned on at most one value at a time. [`element_type`]
/// peeks at that value's tag without consuming anything; the `read_*`
/// methods consume it.
///
/// [`element_type`]: Self::element_type
pub trait ValueReader {
    /// Tag of the value the reader is positioned on.
    fn element_type(&self) -> Result<ElementType, WireError>;

    fn read_double(&mut self) -> Result<f64, WireError>;
    fn read_string(&mut self) -> Result<String, WireError>;
    fn read_boolean(&mut self) -> Result<bool, WireError>;
    /// Read a UTC datetime as milliseconds since the Unix epoch.
    fn read_datetime(&mut self) -> Result<i64, WireError>;
    fn read_null(&mut self) -> Result<(), WireError>;
    fn read_int32(&mut self) -> Result<i32, WireError>;
    fn read_int64(&mut self) -> Result<i64, WireError>;

    /// Enter the embedded document the reader is positioned on.
    fn read_document_start(&mut self) -> Result<(), WireError>;
    /// Advance to the next element of the current document.
    ///
    /// Returns the element key and leaves the reader positioned on its value,
    /// or `None` once the document terminator has been consumed.
    fn read_element(&mut self) -> Result<Option<String>, WireError>;
    /// Consume the current value without decoding it.
    fn skip(&mut self) -> Result<(), WireError>;
}

/// Reads a single BSON document from an in-memory buffer.
///
/// A fresh reader is positioned on the top-level document.
#[derive(Debug, Clone)]
pub struct BsonValueReader {
    buf: Bytes,
    initial_len: usize,
    /// End offsets (exclusive) of the documents currently entered.
    ends: Vec<usize>,
    current: Option<ElementType>,
}

impl BsonValueReader {
    pub fn new(buf: impl Into<Bytes>) -> Self {
        let buf = buf.into();
        let initial_len = buf.len();
        Self {
            buf,
            initial_len,
            ends: Vec::new(),
            current: Some(ElementType::EmbeddedDocument),
        }
    }

    pub fn from_slice(data: &[u8]) -> Self {
        Self::new(Bytes::copy_from_slice(data))
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.initial_len - self.buf.remaining()
    }

    /// Nesting depth of entered documents.
    pub fn depth(&self) -> usize {
        self.ends.len()
    }

    /// Bytes readable before the end of the innermost entered document.
    fn available(&self) -> usize {
        match self.ends.last() {
            Some(end) => end.saturating_sub(self.position()),
            None => self.buf.remaining(),
        }
    }

    fn ensure(&self, needed: usize) -> Result<(), WireError> {
        let remaining = self.available();
        if remaining < needed {
            return Err(WireError::UnexpectedEof {
                offset: self.position(),
                needed,
                remaining,
            });
        }
        Ok(())
    }

    /// Check that the reader is positioned on `expected` without consuming it.
    fn expect(&self, expected: ElementType) -> Result<(), WireError> {
        match self.current {
            None => Err(WireError::NotPositioned),
            Some(actual) if actual == expected => Ok(()),
            Some(actual) => Err(WireError::ElementTypeMismatch { expected, actual }),
        }
    }

    fn get_i32(&mut self) -> Result<i32, WireError> {
        self.ensure(4)?;
        Ok(self.buf.get_i32_le())
    }

    fn get_i64(&mut self) -> Result<i64, WireError> {
        self.ensure(8)?;
        Ok(self.buf.get_i64_le())
    }

    /// Read a length prefix and check it fits the enclosing document.
    fn get_length(&mut self, min: i32) -> Result<usize, WireError> {
        let offset = self.position();
        let length = self.get_i32()?;
        if length < min {
            return Err(WireError::InvalidLength {
                offset,
                length: length.into(),
            });
        }
        Ok(length as usize)
    }

    fn get_string(&mut self) -> Result<String, WireError> {
        let len = self.get_length(1)?;
        let offset = self.position();
        self.ensure(len)?;
        let bytes = self.buf.copy_to_bytes(len);
        if bytes[len - 1] != 0 {
            return Err(WireError::MissingTerminator { offset });
        }
        String::from_utf8(bytes[..len - 1].to_vec()).map_err(|_| WireError::InvalidUtf8 { offset })
    }

    fn get_cstring(&mut self) -> Result<String, WireError> {
        let offset = self.position();
        let limit = self.available().min(self.buf.remaining());
        let nul = self.buf[..limit]
            .iter()
            .position(|b| *b == 0)
            .ok_or(WireError::MissingTerminator { offset })?;
        let bytes = self.buf.copy_to_bytes(nul);
        self.buf.advance(1);
        String::from_utf8(bytes.to_vec()).map_err(|_| WireError::InvalidUtf8 { offset })
    }

    fn advance(&mut self, n: usize) -> Result<(), WireError> {
        self.ensure(n)?;
        self.buf.advance(n);
        Ok(())
    }
}

impl ValueReader for BsonValueReader {
    fn element_type(&self) -> Result<ElementType, WireError> {
        self.current.ok_or(WireError::NotPositioned)
    }

    fn read_double(&mut self) -> Result<f64, WireError> {
        self.expect(ElementType::Double)?;
        self.ensure(8)?;
        let v = self.buf.get_f64_le();
        self.current = None;
        Ok(v)
    }

    fn read_string(&mut self) -> Result<String, WireError> {
        self.expect(ElementType::String)?;
        let v = self.get_string()?;
        self.current = None;
        Ok(v)
    }

    fn read_boolean(&mut self) -> Result<bool, WireError> {
        self.expect(ElementType::Boolean)?;
        self.ensure(1)?;
        let offset = self.position();
        let v = match self.buf.get_u8() {
            0x00 => false,
            0x01 => true,
            byte => return Err(WireError::InvalidBoolean { offset, byte }),
        };
        self.current = None;
        Ok(v)
    }

    fn read_datetime(&mut self) -> Result<i64, WireError> {
        self.expect(ElementType::DateTime)?;
        let v = self.get_i64()?;
        self.current = None;
        Ok(v)
    }

    fn read_null(&mut self) -> Result<(), WireError> {
        self.expect(ElementType::Null)?;
        self.current = None;
        Ok(())
    }

    fn read_int32(&mut self) -> Result<i32, WireError> {
        self.expect(ElementType::Int32)?;
        let v = self.get_i32()?;
        self.current = None;
        Ok(v)
    }

    fn read_int64(&mut self) -> Result<i64, WireError> {
        self.expect(ElementType::Int64)?;
        let v = self.get_i64()?;
        self.current = None;
        Ok(v)
    }

    fn read_document_start(&mut self) -> Result<(), WireError> {
        self.expect(ElementType::EmbeddedDocument)?;
        let start = self.position();
        let len = self.get_length(5)?;
        // The prefix counts itself, so the body must fit in what follows it.
        if len - 4 > self.available() {
            return Err(WireError::InvalidLength {
                offset: start,
                length: len as i64,
            });
        }
        self.ends.push(start + len);
        self.current = None;
        Ok(())
    }

    fn read_element(&mut self) -> Result<Option<String>, WireError> {
        if self.current.is_some() {
            return Err(WireError::InvalidState {
                operation: "read the next element",
                detail: "before the current value is consumed",
            });
        }
        let end = *self.ends.last().ok_or(WireError::InvalidState {
            operation: "read an element",
            detail: "outside of a document",
        })?;
        let offset = self.position();
        self.ensure(1)?;
        let tag = self.buf.get_u8();
        if tag == 0 {
            if offset + 1 != end {
                return Err(WireError::InvalidLength {
                    offset,
                    length: (end - offset) as i64,
                });
            }
            self.ends.pop();
            return Ok(None);
        }
        let key = self.get_cstring()?;
        self.current = Some(ElementType::from(tag));
        Ok(Some(key))
    }

    fn skip(&mut self) -> Result<(), WireError> {
        let ty = self.current.ok_or(WireError::NotPositioned)?;
        match ty {
            ElementType::Undefined
            | ElementType::Null
            | ElementType::MinKey
            | ElementType::MaxKey => {}
            ElementType::Boolean => self.advance(1)?,
            ElementType::Int32 => self.advance(4)?,
            ElementType::Double
            | ElementType::DateTime
            | ElementType::Timestamp
            | ElementType::Int64 => self.advance(8)?,
            ElementType::ObjectId => self.advance(12)?,
            ElementType::Decimal128 => self.advance(16)?,
            ElementType::String | ElementType::JavaScript | ElementType::Symbol => {
                let len = self.get_length(1)?;
                self.advance(len)?;
            }
            ElementType::EmbeddedDocument | ElementType::Array | ElementType::CodeWithScope => {
                let len = self.get_length(5)?;
                self.advance(len - 4)?;
            }
            ElementType::Binary => {
                let len = self.get_length(0)?;
                self.advance(len + 1)?;
            }
            ElementType::Regex => {
                self.get_cstring()?;
                self.get_cstring()?;
            }
            ElementType::DbPointer => {
                let len = self.get_length(1)?;
                self.advance(len + 12)?;
            }
            ElementType::Unknown(_) => return Err(WireError::Unsupported(ty)),
        }
        self.current = None;
        Ok(())
    }
}
