//! Scriptable [`ValueReader`]/[`ValueWriter`] double for testing codecs
//! without building BSON buffers.

use crate::{ElementType, ValueReader, ValueWriter, WireError};

/// Operation invoked on a [`ValueReaderWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invoked {
    ReadDouble,
    ReadString,
    ReadBoolean,
    ReadDateTime,
    ReadNull,
    ReadInt32,
    ReadInt64,
    ReadDocumentStart,
    ReadElement,
    Skip,
    WriteDouble,
    WriteString,
    WriteBoolean,
    WriteDateTime,
    WriteNull,
    WriteInt32,
    WriteInt64,
    WriteDocumentStart,
    WriteDocumentElement,
    WriteDocumentEnd,
}

/// Scalar returned by reads or captured by writes.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MockValue {
    #[default]
    None,
    Double(f64),
    String(String),
    Boolean(bool),
    DateTime(i64),
    Int32(i32),
    Int64(i64),
}

/// Reader/writer double.
///
/// Reads return [`value`](Self::value) when it matches the requested type.
/// Every call is appended to [`invoked`](Self::invoked); writes also append
/// to [`written`](Self::written). When [`fail_on`](Self::fail_on) names the
/// invoked operation, that call returns `error` instead.
#[derive(Debug, Clone)]
pub struct ValueReaderWriter {
    pub element_type: ElementType,
    pub value: MockValue,
    pub invoked: Vec<Invoked>,
    pub written: Vec<MockValue>,
    pub fail_on: Option<(Invoked, WireError)>,
}

impl ValueReaderWriter {
    /// A reader positioned on a value of `element_type` that returns `value`.
    pub fn reader(element_type: ElementType, value: MockValue) -> Self {
        Self {
            element_type,
            value,
            invoked: Vec::new(),
            written: Vec::new(),
            fail_on: None,
        }
    }

    pub fn writer() -> Self {
        Self::reader(ElementType::Null, MockValue::None)
    }

    pub fn fail_on(mut self, op: Invoked, error: WireError) -> Self {
        self.fail_on = Some((op, error));
        self
    }

    fn invoke(&mut self, op: Invoked) -> Result<(), WireError> {
        self.invoked.push(op);
        match &self.fail_on {
            Some((target, err)) if *target == op => Err(err.clone()),
            _ => Ok(()),
        }
    }

    fn write(&mut self, op: Invoked, value: MockValue) -> Result<(), WireError> {
        self.invoke(op)?;
        self.written.push(value);
        Ok(())
    }

    fn mismatch(&self, expected: ElementType) -> WireError {
        WireError::ElementTypeMismatch {
            expected,
            actual: self.element_type,
        }
    }
}

impl ValueReader for ValueReaderWriter {
    fn element_type(&self) -> Result<ElementType, WireError> {
        Ok(self.element_type)
    }

    fn read_double(&mut self) -> Result<f64, WireError> {
        self.invoke(Invoked::ReadDouble)?;
        match self.value {
            MockValue::Double(v) => Ok(v),
            _ => Err(self.mismatch(ElementType::Double)),
        }
    }

    fn read_string(&mut self) -> Result<String, WireError> {
        self.invoke(Invoked::ReadString)?;
        match &self.value {
            MockValue::String(v) => Ok(v.clone()),
            _ => Err(self.mismatch(ElementType::String)),
        }
    }

    fn read_boolean(&mut self) -> Result<bool, WireError> {
        self.invoke(Invoked::ReadBoolean)?;
        match self.value {
            MockValue::Boolean(v) => Ok(v),
            _ => Err(self.mismatch(ElementType::Boolean)),
        }
    }

    fn read_datetime(&mut self) -> Result<i64, WireError> {
        self.invoke(Invoked::ReadDateTime)?;
        match self.value {
            MockValue::DateTime(v) => Ok(v),
            _ => Err(self.mismatch(ElementType::DateTime)),
        }
    }

    fn read_null(&mut self) -> Result<(), WireError> {
        self.invoke(Invoked::ReadNull)?;
        match self.element_type {
            ElementType::Null => Ok(()),
            _ => Err(self.mismatch(ElementType::Null)),
        }
    }

    fn read_int32(&mut self) -> Result<i32, WireError> {
        self.invoke(Invoked::ReadInt32)?;
        match self.value {
            MockValue::Int32(v) => Ok(v),
            _ => Err(self.mismatch(ElementType::Int32)),
        }
    }

    fn read_int64(&mut self) -> Result<i64, WireError> {
        self.invoke(Invoked::ReadInt64)?;
        match self.value {
            MockValue::Int64(v) => Ok(v),
            _ => Err(self.mismatch(ElementType::Int64)),
        }
    }

    fn read_document_start(&mut self) -> Result<(), WireError> {
        self.invoke(Invoked::ReadDocumentStart)
    }

    fn read_element(&mut self) -> Result<Option<String>, WireError> {
        self.invoke(Invoked::ReadElement)?;
        Ok(None)
    }

    fn skip(&mut self) -> Result<(), WireError> {
        self.invoke(Invoked::Skip)
    }
}

impl ValueWriter for ValueReaderWriter {
    fn write_double(&mut self, value: f64) -> Result<(), WireError> {
        self.write(Invoked::WriteDouble, MockValue::Double(value))
    }

    fn write_string(&mut self, value: &str) -> Result<(), WireError> {
        self.write(Invoked::WriteString, MockValue::String(value.to_string()))
    }

    fn write_boolean(&mut self, value: bool) -> Result<(), WireError> {
        self.write(Invoked::WriteBoolean, MockValue::Boolean(value))
    }

    fn write_datetime(&mut self, millis: i64) -> Result<(), WireError> {
        self.write(Invoked::WriteDateTime, MockValue::DateTime(millis))
    }

    fn write_null(&mut self) -> Result<(), WireError> {
        self.write(Invoked::WriteNull, MockValue::None)
    }

    fn write_int32(&mut self, value: i32) -> Result<(), WireError> {
        self.write(Invoked::WriteInt32, MockValue::Int32(value))
    }

    fn write_int64(&mut self, value: i64) -> Result<(), WireError> {
        self.write(Invoked::WriteInt64, MockValue::Int64(value))
    }

    fn write_document_start(&mut self) -> Result<(), WireError> {
        self.invoke(Invoked::WriteDocumentStart)
    }

    fn write_document_element(&mut self, _key: &str) -> Result<(), WireError> {
        self.invoke(Invoked::WriteDocumentElement)
    }

    fn write_document_end(&mut self) -> Result<(), WireError> {
        self.invoke(Invoked::WriteDocumentEnd)
    }
}
