//! Input validation for registry fields and identifiers.
//!
//! Pure functions with no side effects; the engine calls them before
//! any mutation is attempted, so a rejected value never reaches the
//! store or the audit trail.

use crate::error::CoreError;

/// Validate a text field.
///
/// Rejects a missing value unless `allow_none` is set, and rejects
/// empty or whitespace-only strings in all cases.
pub fn validate_field(name: &str, value: Option<&str>, allow_none: bool) -> Result<(), CoreError> {
    let value = match value {
        Some(v) => v,
        None => {
            if allow_none {
                return Ok(());
            }
            return Err(CoreError::invalid(format!("'{name}' cannot be None")));
        }
    };

    if value.is_empty() {
        return Err(CoreError::invalid(format!(
            "'{name}' cannot be an empty string"
        )));
    }
    if value.chars().all(char::is_whitespace) {
        return Err(CoreError::invalid(format!(
            "'{name}' cannot be composed by whitespaces only"
        )));
    }

    Ok(())
}

/// Validate an entity name used as an identifier.
///
/// On top of [`validate_field`] the name must start with an
/// alphanumeric character, contain no whitespace, and contain no
/// punctuation other than hyphens.
pub fn validate_name(name: Option<&str>) -> Result<(), CoreError> {
    validate_field("name", name, false)?;

    // validate_field guarantees a non-empty value here.
    let name = name.unwrap_or_default();

    if !name.chars().next().is_some_and(char::is_alphanumeric) {
        return Err(CoreError::invalid(
            "'name' must start with an alphanumeric character",
        ));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(CoreError::invalid(
            "'name' cannot contain whitespace characters",
        ));
    }
    if name
        .chars()
        .any(|c| c.is_ascii_punctuation() && c != '-')
    {
        return Err(CoreError::invalid(
            "'name' cannot contain punctuation characters except hyphens",
        ));
    }

    Ok(())
}
