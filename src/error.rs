//! Error types for network construction and forward passes

use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, NetworkError>;

/// Errors raised while building or running a network.
#[derive(Error, Debug)]
pub enum NetworkError {
    /// Hidden-width specification could not be parsed
    #[error("invalid hidden-width specification {spec:?}: {reason}")]
    Format {
        /// The offending specification string
        spec: String,
        /// What was wrong with it
        reason: String,
    },

    /// Architecture would produce a network with no usable layers
    #[error("degenerate architecture: {0}")]
    DegenerateConfig(String),

    /// Buffer or tensor size does not match the declared width
    #[error("shape mismatch in {context}: expected {expected}, got {actual}")]
    Shape {
        /// Where the mismatch was detected
        context: String,
        /// Expected element or feature count
        expected: usize,
        /// Actual element or feature count
        actual: usize,
    },

    /// Batch statistics need at least two samples per feature
    #[error("batch normalization in training mode needs more than 1 sample, got {0}")]
    BatchTooSmall(usize),

    /// Configuration value out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error while reading a configuration file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON configuration
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NetworkError {
    pub(crate) fn shape(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        NetworkError::Shape {
            context: context.into(),
            expected,
            actual,
        }
    }

    pub(crate) fn format(spec: &str, reason: impl Into<String>) -> Self {
        NetworkError::Format {
            spec: spec.to_string(),
            reason: reason.into(),
        }
    }
}

/// Checks that a flat buffer holds exactly `expected` elements.
pub(crate) fn check_len(context: &str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(NetworkError::shape(context, expected, actual));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_error_message() {
        let err = NetworkError::shape("encoder input", 784, 10);
        assert_eq!(
            err.to_string(),
            "shape mismatch in encoder input: expected 784, got 10"
        );
    }

    #[test]
    fn test_check_len() {
        assert!(check_len("buf", 4, 4).is_ok());
        assert!(matches!(
            check_len("buf", 4, 3),
            Err(NetworkError::Shape { expected: 4, actual: 3, .. })
        ));
    }
}
