use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("validation error: {0}")] Validation(String),
    #[error("configuration error: {0}")] Configuration(String),
    #[error("service error: {0}")] Service(String),
    #[error("completion timed out after {}s", .0.as_secs())] Timeout(Duration),
}

impl PipelineError {
    /// Service failures and timeouts may succeed on a later attempt; the rest never will.
    pub fn is_transient(&self) -> bool {
        matches!(self, PipelineError::Service(_) | PipelineError::Timeout(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Validation(_) => "validation",
            PipelineError::Configuration(_) => "configuration",
            PipelineError::Service(_) => "service",
            PipelineError::Timeout(_) => "timeout",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(PipelineError::Service("503".into()).is_transient());
        assert!(PipelineError::Timeout(Duration::from_secs(15)).is_transient());
        assert!(!PipelineError::Configuration("no key".into()).is_transient());
        assert!(!PipelineError::Validation("empty".into()).is_transient());
    }

    #[test]
    fn timeout_message_mentions_seconds() {
        let e = PipelineError::Timeout(Duration::from_secs(15));
        assert_eq!(e.to_string(), "completion timed out after 15s");
        assert_eq!(e.kind(), "timeout");
    }
}
