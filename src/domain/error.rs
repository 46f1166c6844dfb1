use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("No API key matches prefix '{prefix}'")]
    PrefixNotFound { prefix: String },

    #[error("Prefix '{prefix}' is ambiguous: more than one API key matches")]
    AmbiguousPrefix { prefix: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn prefix_not_found(prefix: impl Into<String>) -> Self {
        Self::PrefixNotFound {
            prefix: prefix.into(),
        }
    }

    pub fn ambiguous_prefix(prefix: impl Into<String>) -> Self {
        Self::AmbiguousPrefix {
            prefix: prefix.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("API key not found");
        assert_eq!(error.to_string(), "Not found: API key not found");
    }

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("daily_limit must be > 0");
        assert_eq!(error.to_string(), "Validation error: daily_limit must be > 0");
    }

    #[test]
    fn test_prefix_errors() {
        assert_eq!(
            DomainError::prefix_not_found("abcd").to_string(),
            "No API key matches prefix 'abcd'"
        );
        assert!(DomainError::ambiguous_prefix("abcd")
            .to_string()
            .contains("ambiguous"));
    }
}
