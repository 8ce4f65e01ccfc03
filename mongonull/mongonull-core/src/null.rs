//! Nullable scalar wrappers distinguishing an explicit null from a present value.

use chrono::{DateTime, Utc};

/// A value that is either present or explicitly null.
///
/// Unlike an absent field, a null `Nullable` is written to documents as a BSON
/// null. The absent state is the [`Default`] value: `valid == false` with the
/// wrapped value left at `T::default()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Nullable<T> {
    value: T,
    valid: bool,
}

/// Nullable UTF-8 string.
pub type NullString = Nullable<String>;
/// Nullable 64-bit signed integer.
pub type NullInt = Nullable<i64>;
/// Nullable double precision float.
pub type NullFloat = Nullable<f64>;
/// Nullable boolean.
pub type NullBool = Nullable<bool>;
/// Nullable UTC timestamp.
pub type NullTime = Nullable<DateTime<Utc>>;

impl<T> Nullable<T> {
    pub fn new(value: T, valid: bool) -> Self {
        Self { value, valid }
    }

    /// Create a present value.
    pub fn from_value(value: T) -> Self {
        Self { value, valid: true }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn is_null(&self) -> bool {
        !self.valid
    }

    /// The wrapped value. Only meaningful when [`is_valid`](Self::is_valid) is true.
    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn as_option(&self) -> Option<&T> {
        self.valid.then_some(&self.value)
    }

    pub fn into_option(self) -> Option<T> {
        self.valid.then_some(self.value)
    }
}

impl<T: Default> Nullable<T> {
    /// Create a null value.
    pub fn null() -> Self {
        Self::default()
    }

    pub fn from_option(value: Option<T>) -> Self {
        value.map_or_else(Self::default, Self::from_value)
    }
}

impl<T: Default> From<Option<T>> for Nullable<T> {
    fn from(value: Option<T>) -> Self {
        Self::from_option(value)
    }
}

impl<T> From<Nullable<T>> for Option<T> {
    fn from(value: Nullable<T>) -> Self {
        value.into_option()
    }
}
