use thiserror::Error;

/// subsleuth error types
#[derive(Error, Debug)]
pub enum SubsleuthError {
    /// Failed to parse JSON or a user-supplied value
    #[error("parse error: {0}")]
    Parse(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Store read/write failed
    #[error("store error: {0}")]
    Store(String),

    /// Input rejected before it reached the store
    #[error("invalid input: {0}")]
    Validation(String),

    /// Record with the given id does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// No session or bad credentials
    #[error("auth error: {0}")]
    Auth(String),

    /// Text generation failed (message is user-facing)
    #[error("{0}")]
    Generation(String),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for subsleuth
pub type Result<T> = std::result::Result<T, SubsleuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_the_record() {
        let err = SubsleuthError::NotFound("subscription 42".into());
        assert_eq!(err.to_string(), "not found: subscription 42");
    }

    #[test]
    fn test_validation_message() {
        let err = SubsleuthError::Validation("category 'News' already exists".into());
        assert_eq!(
            err.to_string(),
            "invalid input: category 'News' already exists"
        );
    }

    #[test]
    fn test_generation_error_is_bare_message() {
        let err = SubsleuthError::Generation("Could not generate cancellation guide.".into());
        assert_eq!(err.to_string(), "Could not generate cancellation guide.");
    }
}
