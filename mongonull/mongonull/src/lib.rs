//! BSON codec registry with support for nullable scalars.
//!
//! [`build_default_registry`] returns a [`Registry`] holding the default
//! codecs plus codecs for [`NullString`], [`NullInt`], [`NullFloat`],
//! [`NullBool`] and [`NullTime`]. A present value is written as the matching
//! BSON scalar and a null one as BSON null.
//!
//! ```rust
//! use std::collections::BTreeMap;
//!
//! use mongonull::{NullString, from_slice, to_vec};
//!
//! let registry = mongonull::default_registry();
//! let doc = BTreeMap::from([("foo".to_string(), NullString::default())]);
//! let bytes = to_vec(registry, &doc).unwrap();
//! let back: BTreeMap<String, NullString> = from_slice(registry, &bytes).unwrap();
//! assert_eq!(back, doc);
//! ```

mod document;
mod registry;

pub use document::{from_slice, to_vec};
pub use mongonull_codec as codec;
pub use mongonull_codec::{DecodeError, EncodeError, LookupError, Registry};
pub use mongonull_core as core;
pub use mongonull_core::{NullBool, NullFloat, NullInt, NullString, NullTime, Nullable};
pub use registry::{build_default_registry, default_registry};
