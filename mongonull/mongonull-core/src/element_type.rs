use std::fmt;

/// BSON element types as defined by the BSON specification.
/// <https://bsonspec.org/spec.html>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// 64-bit binary floating point (`0x01`)
    Double,
    /// UTF-8 string (`0x02`)
    String,
    /// Embedded document (`0x03`)
    EmbeddedDocument,
    /// Array (`0x04`)
    Array,
    /// Binary data (`0x05`)
    Binary,
    /// Undefined, deprecated (`0x06`)
    Undefined,
    /// ObjectId (`0x07`)
    ObjectId,
    /// Boolean (`0x08`)
    Boolean,
    /// UTC datetime as milliseconds since the Unix epoch (`0x09`)
    DateTime,
    /// Null value (`0x0A`)
    Null,
    /// Regular expression (`0x0B`)
    Regex,
    /// DBPointer, deprecated (`0x0C`)
    DbPointer,
    /// JavaScript code (`0x0D`)
    JavaScript,
    /// Symbol, deprecated (`0x0E`)
    Symbol,
    /// JavaScript code with scope, deprecated (`0x0F`)
    CodeWithScope,
    /// 32-bit integer (`0x10`)
    Int32,
    /// Internal MongoDB timestamp (`0x11`)
    Timestamp,
    /// 64-bit integer (`0x12`)
    Int64,
    /// 128-bit decimal floating point (`0x13`)
    Decimal128,
    /// Min key (`0xFF`)
    MinKey,
    /// Max key (`0x7F`)
    MaxKey,
    /// Tag byte not defined by the specification
    Unknown(u8),
}

impl ElementType {
    pub fn as_u8(&self) -> u8 {
        match self {
            Self::Double => 0x01,
            Self::String => 0x02,
            Self::EmbeddedDocument => 0x03,
            Self::Array => 0x04,
            Self::Binary => 0x05,
            Self::Undefined => 0x06,
            Self::ObjectId => 0x07,
            Self::Boolean => 0x08,
            Self::DateTime => 0x09,
            Self::Null => 0x0A,
            Self::Regex => 0x0B,
            Self::DbPointer => 0x0C,
            Self::JavaScript => 0x0D,
            Self::Symbol => 0x0E,
            Self::CodeWithScope => 0x0F,
            Self::Int32 => 0x10,
            Self::Timestamp => 0x11,
            Self::Int64 => 0x12,
            Self::Decimal128 => 0x13,
            Self::MinKey => 0xFF,
            Self::MaxKey => 0x7F,
            Self::Unknown(b) => *b,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Double => "double",
            Self::String => "string",
            Self::EmbeddedDocument => "embedded document",
            Self::Array => "array",
            Self::Binary => "binary",
            Self::Undefined => "undefined",
            Self::ObjectId => "objectID",
            Self::Boolean => "boolean",
            Self::DateTime => "UTC datetime",
            Self::Null => "null",
            Self::Regex => "regex",
            Self::DbPointer => "dbPointer",
            Self::JavaScript => "javascript",
            Self::Symbol => "symbol",
            Self::CodeWithScope => "code with scope",
            Self::Int32 => "32-bit integer",
            Self::Timestamp => "timestamp",
            Self::Int64 => "64-bit integer",
            Self::Decimal128 => "128-bit decimal",
            Self::MinKey => "min key",
            Self::MaxKey => "max key",
            Self::Unknown(_) => "unknown",
        }
    }
}

impl From<u8> for ElementType {
    fn from(b: u8) -> Self {
        match b {
            0x01 => Self::Double,
            0x02 => Self::String,
            0x03 => Self::EmbeddedDocument,
            0x04 => Self::Array,
            0x05 => Self::Binary,
            0x06 => Self::Undefined,
            0x07 => Self::ObjectId,
            0x08 => Self::Boolean,
            0x09 => Self::DateTime,
            0x0A => Self::Null,
            0x0B => Self::Regex,
            0x0C => Self::DbPointer,
            0x0D => Self::JavaScript,
            0x0E => Self::Symbol,
            0x0F => Self::CodeWithScope,
            0x10 => Self::Int32,
            0x11 => Self::Timestamp,
            0x12 => Self::Int64,
            0x13 => Self::Decimal128,
            0xFF => Self::MinKey,
            0x7F => Self::MaxKey,
            other => Self::Unknown(other),
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(b) => write!(f, "unknown element type 0x{b:02x}"),
            other => f.write_str(other.as_str()),
        }
    }
}
