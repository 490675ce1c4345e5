//! Error types for series and data frame construction

use thiserror::Error;

/// Result type for seqframe operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for seqframe operations
///
/// Every error is raised by the call that received the bad input; nothing is
/// deferred into lazy evaluation.
#[derive(Error, Debug)]
pub enum Error {
    /// A configuration field, count or stream was unusable
    #[error("invalid argument '{field}': {message}")]
    InvalidArgument {
        /// Name of the offending field or parameter
        field: String,
        /// What was wrong with it
        message: String,
    },

    /// Referenced column does not exist
    #[error("column not found: {name}")]
    ColumnNotFound {
        /// The requested column name
        name: String,
    },

    /// A JSON configuration document could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid argument error naming the offending field
    pub fn invalid_argument(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a missing column error
    pub fn column_not_found(name: impl Into<String>) -> Self {
        Self::ColumnNotFound { name: name.into() }
    }

    /// The field named by an [`Error::InvalidArgument`], if this is one
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidArgument { field, .. } => Some(field),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_names_field() {
        let err = Error::invalid_argument("values", "expected an array");
        assert_eq!(err.field(), Some("values"));
        assert_eq!(
            err.to_string(),
            "invalid argument 'values': expected an array"
        );
    }

    #[test]
    fn column_not_found_has_no_field() {
        let err = Error::column_not_found("price");
        assert_eq!(err.field(), None);
        assert!(err.to_string().contains("price"));
    }
}
