//! Error types for join resolution
//!
//! Every failure here is a deterministic function of the declaration and the
//! entity metadata, so nothing is retried. A failure anywhere in a nested
//! declaration aborts the whole resolve call.

use thiserror::Error;

/// Result type alias for join operations
pub type JoinResult<T> = Result<T, JoinError>;

/// Error types for join declaration parsing and resolution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    /// The declared association is not registered on the model, or its
    /// target class is unknown to the entity catalog
    #[error("Association '{association}' is not defined on model '{model}'")]
    UnresolvedAssociation { model: String, association: String },

    /// Automatic conditions were requested for an association whose kind
    /// has no derivable join shape
    #[error("Cannot derive join conditions for '{model}.{association}': unsupported relationship kind, pass explicit conditions")]
    UnknownRelationshipKind { model: String, association: String },

    /// The raw declaration has a shape that cannot be interpreted
    #[error("Invalid join declaration: {0}")]
    InvalidDeclaration(String),

    /// Entity or association metadata is inconsistent
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl JoinError {
    pub(crate) fn unresolved(model: &str, association: &str) -> Self {
        JoinError::UnresolvedAssociation {
            model: model.to_string(),
            association: association.to_string(),
        }
    }

    pub(crate) fn unknown_kind(model: &str, association: &str) -> Self {
        JoinError::UnknownRelationshipKind {
            model: model.to_string(),
            association: association.to_string(),
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        JoinError::InvalidDeclaration(msg.into())
    }
}

impl From<serde_json::Error> for JoinError {
    fn from(err: serde_json::Error) -> Self {
        JoinError::InvalidDeclaration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_model_and_association() {
        let err = JoinError::unresolved("Order", "Ghost");
        assert_eq!(
            err.to_string(),
            "Association 'Ghost' is not defined on model 'Order'"
        );

        let err = JoinError::unknown_kind("Comment", "commentable");
        assert!(err.to_string().contains("Comment.commentable"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: JoinError = parse_err.into();
        assert!(matches!(err, JoinError::InvalidDeclaration(_)));
    }
}
