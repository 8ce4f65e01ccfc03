//! Wire-level building blocks for `mongonull`.
//!
//! This crate provides the BSON [`ElementType`] table, the [`ValueReader`] /
//! [`ValueWriter`] contracts consumed by codecs together with in-memory BSON
//! implementations, and the [`Nullable`] scalar wrappers.

mod element_type;
mod error;
mod null;
mod reader;
pub mod rwtest;
mod writer;

pub use element_type::ElementType;
pub use error::WireError;
pub use null::{NullBool, NullFloat, NullInt, NullString, NullTime, Nullable};
pub use reader::{BsonValueReader, ValueReader};
pub use writer::{BsonValueWriter, ValueWriter};
