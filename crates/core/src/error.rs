//! Domain error kinds shared by every layer of the registry.

/// Errors produced by registry operations.
///
/// `InvalidValue` means the caller's input was rejected before any
/// durable write happened; it is never recorded in the audit trail.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Malformed or missing caller input.
    #[error("{0}")]
    InvalidValue(String),

    /// A referenced entity does not exist.
    #[error("{entity} not found in the registry")]
    NotFound { entity: String },

    /// A uniqueness constraint was violated.
    #[error("{entity} '{value}' already exists in the registry")]
    AlreadyExists { entity: &'static str, value: String },

    /// The caller is not authorized to act on this specific entity.
    #[error("{0}")]
    PermissionDenied(String),

    /// Anything that should not happen under normal operation.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Build a `NotFound` error for an entity described by kind and id.
    pub fn not_found(entity: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity: entity.into(),
        }
    }

    /// Build an `InvalidValue` error from a message.
    pub fn invalid(msg: impl Into<String>) -> Self {
        CoreError::InvalidValue(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_entity() {
        let err = CoreError::not_found("Ecosystem ID 42");
        assert_eq!(err.to_string(), "Ecosystem ID 42 not found in the registry");
    }

    #[test]
    fn already_exists_message_carries_the_value() {
        let err = CoreError::AlreadyExists {
            entity: "ecosystem",
            value: "sigtools".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "ecosystem 'sigtools' already exists in the registry"
        );
    }
}
