/// Domain error taxonomy
///
/// Every business-rule violation is raised here, in the service layer, and
/// mapped to a transport status exactly once at the API boundary. The
/// repository and the store never surface user-facing errors directly.
use thiserror::Error;

/// A typed domain failure.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A uniqueness invariant was violated (e.g. duplicate category name
    /// within a visible scope). Maps to 409.
    #[error("{resource} already exists")]
    AlreadyExists { resource: &'static str },

    /// The referenced entity does not exist. Maps to 404.
    #[error("{resource} does not exist")]
    NotFound { resource: &'static str },

    /// The requester is not the owner of the entity being mutated.
    /// Maps to 403.
    #[error("{0}")]
    NotAllowed(String),

    /// Invalid priority reference or invalid/unauthorized category set.
    /// Maps to 400.
    #[error("{0}")]
    Validation(String),

    /// Unanticipated store failure; propagates as a fatal request error.
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl ServiceError {
    /// Stable machine-checkable kind, independent of the message.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::AlreadyExists { .. } => "already_exists",
            ServiceError::NotFound { .. } => "not_found",
            ServiceError::NotAllowed(_) => "not_allowed",
            ServiceError::Validation(_) => "validation",
            ServiceError::Database(_) => "database",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = ServiceError::AlreadyExists {
            resource: "category name",
        };
        assert_eq!(err.to_string(), "category name already exists");

        let err = ServiceError::NotFound { resource: "todo" };
        assert_eq!(err.to_string(), "todo does not exist");

        let err = ServiceError::Validation("priority is not valid".to_string());
        assert_eq!(err.to_string(), "priority is not valid");
    }

    #[test]
    fn test_kinds_are_stable() {
        assert_eq!(
            ServiceError::Validation(String::new()).kind(),
            "validation"
        );
        assert_eq!(
            ServiceError::NotAllowed(String::new()).kind(),
            "not_allowed"
        );
    }
}
