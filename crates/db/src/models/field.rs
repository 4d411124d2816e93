//! Tri-state field for partial updates.

use serde::{Deserialize, Deserializer};

/// A patch field that distinguishes "leave unchanged" from "set to
/// null" from "set to a value".
///
/// In JSON bodies, an absent key deserializes to `Unset` (via
/// `#[serde(default)]` on the containing struct), an explicit `null`
/// to `Null`, and a value to `Set`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Field<T> {
    /// The caller did not mention this field.
    #[default]
    Unset,
    /// The caller asked to clear this field.
    Null,
    /// The caller asked to set this field.
    Set(T),
}

impl<T> Field<T> {
    /// `true` unless the field is `Unset`.
    pub fn is_mentioned(&self) -> bool {
        !matches!(self, Field::Unset)
    }

    /// View the field as an `Option`, treating `Unset` and `Null`
    /// both as `None`.
    pub fn as_option(&self) -> Option<&T> {
        match self {
            Field::Set(v) => Some(v),
            _ => None,
        }
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => Field::Set(v),
            None => Field::Null,
        }
    }
}

impl<'de, T> Deserialize<'de> for Field<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Field::from)
    }
}
