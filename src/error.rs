//! Error handling for the engines

use std::fmt::Display;

use uuid::Uuid;

/// Engine error type
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid range: start {start} is not before end {end}")]
    InvalidRange { start: String, end: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown resource: {0}")]
    UnknownResource(Uuid),

    #[error(transparent)]
    Dependency(#[from] DependencyError),
}

impl EngineError {
    pub fn invalid_range(start: impl Display, end: impl Display) -> Self {
        EngineError::InvalidRange {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        EngineError::InvalidInput(message.into())
    }
}

/// Failure reported by a collaborator (catalog, booking store, rule repository).
///
/// Carries the collaborator's own error untouched so callers can downcast it.
#[derive(Debug, thiserror::Error)]
#[error("{collaborator} failed: {source}")]
pub struct DependencyError {
    pub collaborator: &'static str,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl DependencyError {
    pub fn new<E>(collaborator: &'static str, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self {
            collaborator,
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "catalog timed out");
        let err: EngineError = DependencyError::new("resource catalog", io).into();

        assert!(err.to_string().contains("resource catalog failed"));
        assert!(err.to_string().contains("catalog timed out"));

        match err {
            EngineError::Dependency(dep) => {
                let inner = dep.source.downcast_ref::<std::io::Error>().unwrap();
                assert_eq!(inner.kind(), std::io::ErrorKind::TimedOut);
            }
            other => panic!("expected dependency error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_input_display() {
        let err = EngineError::invalid_input("party size must be positive");
        assert_eq!(err.to_string(), "Invalid input: party size must be positive");
    }
}
