//! Mutating registry operations.
//!
//! Every function here follows the same shape: validate caller input,
//! begin one store transaction, resolve referenced entities, write the
//! entity change together with its audit rows, commit. Any failure
//! rolls the whole call back, so a rejected call never leaves a
//! partial write or a dangling audit row.

use grove_core::error::CoreError;
use grove_db::models::field::Field;

use crate::error::Error;

pub mod credentials;
pub mod datasets;
pub mod ecosystems;
pub mod projects;

/// Normalize an optional text field on update: an empty string clears
/// the field, any other value is kept as given.
fn to_none_if_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Audit snapshot of a patch field: the value exactly as the caller
/// sent it, before any normalization. An explicit null stays null, an
/// empty string stays an empty string.
fn raw_patch_value(field: &Field<String>) -> serde_json::Value {
    match field {
        Field::Unset | Field::Null => serde_json::Value::Null,
        Field::Set(v) => serde_json::Value::String(v.clone()),
    }
}

/// Render a filter set as canonical JSON text.
///
/// Keys come out sorted, so two equal filter sets always serialize to
/// the same string and the store's uniqueness constraint can compare
/// them byte for byte.
fn canonical_filters(filters: &serde_json::Value) -> Result<String, Error> {
    if !filters.is_object() {
        return Err(CoreError::invalid("'filters' must be a JSON object").into());
    }
    serde_json::to_string(filters)
        .map_err(|e| CoreError::Internal(format!("filters serialization failed: {e}")).into())
}
