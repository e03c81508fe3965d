//! Error types for revfeed
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in revfeed
#[derive(Debug, Error)]
pub enum RevfeedError {
    /// Architecture token matches neither `Name` nor `Name(count)`
    #[error("Invalid architecture specification: {0}")]
    InvalidSpec(String),

    /// Architecture token names a stage that is not registered
    #[error("Unknown stage: {0}")]
    UnknownStage(String),

    /// A stage needs more generated feedback than the run has produced
    #[error("Step {step} ({stage}): insufficient input, found {found} generated feedback")]
    InsufficientInput { step: usize, stage: String, found: usize },

    /// A stage found none of the upstream fields it can consume
    #[error("Step {step} ({stage}): missing input, {reason}")]
    MissingInput { step: usize, stage: String, reason: String },

    /// LLM service error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Paper could not be located or downloaded
    #[error("Paper not found: {0}")]
    PaperNotFound(String),

    /// PDF text extraction failed
    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    /// Review could not be located
    #[error("Review not found: {0}")]
    ReviewNotFound(String),

    /// Prompt template could not be loaded or rendered
    #[error("Template error: {0}")]
    Template(String),

    /// Invalid configuration value
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RevfeedError {
    /// Check if the error was raised while parsing an architecture string
    pub fn is_parse_error(&self) -> bool {
        matches!(self, RevfeedError::InvalidSpec(_) | RevfeedError::UnknownStage(_))
    }

    /// Check if the error is an unmet stage precondition
    pub fn is_precondition_error(&self) -> bool {
        matches!(
            self,
            RevfeedError::InsufficientInput { .. } | RevfeedError::MissingInput { .. }
        )
    }
}

/// Result type alias for revfeed operations
pub type Result<T> = std::result::Result<T, RevfeedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_spec_error() {
        let err = RevfeedError::InvalidSpec("Actor(x)".to_string());
        assert_eq!(err.to_string(), "Invalid architecture specification: Actor(x)");
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_unknown_stage_error() {
        let err = RevfeedError::UnknownStage("Summarizer".to_string());
        assert_eq!(err.to_string(), "Unknown stage: Summarizer");
        assert!(err.is_parse_error());
        assert!(!err.is_precondition_error());
    }

    #[test]
    fn test_insufficient_input_error() {
        let err = RevfeedError::InsufficientInput {
            step: 1,
            stage: "Aggregator".to_string(),
            found: 0,
        };
        assert_eq!(
            err.to_string(),
            "Step 1 (Aggregator): insufficient input, found 0 generated feedback"
        );
        assert!(err.is_precondition_error());
    }

    #[test]
    fn test_missing_input_error() {
        let err = RevfeedError::MissingInput {
            step: 3,
            stage: "Formatter".to_string(),
            reason: "no feedback to format".to_string(),
        };
        assert_eq!(err.to_string(), "Step 3 (Formatter): missing input, no feedback to format");
        assert!(err.is_precondition_error());
    }

    #[test]
    fn test_llm_error() {
        let err = RevfeedError::Llm("rate limited".to_string());
        assert_eq!(err.to_string(), "LLM error: rate limited");
        assert!(!err.is_parse_error());
        assert!(!err.is_precondition_error());
    }

    #[test]
    fn test_ingest_errors() {
        assert_eq!(
            RevfeedError::PaperNotFound("abc123".to_string()).to_string(),
            "Paper not found: abc123"
        );
        assert_eq!(
            RevfeedError::ReviewNotFound("rev9".to_string()).to_string(),
            "Review not found: rev9"
        );
        assert_eq!(
            RevfeedError::PdfParsing("empty output".to_string()).to_string(),
            "PDF parsing failed: empty output"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RevfeedError = io_err.into();
        assert!(matches!(err, RevfeedError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: RevfeedError = json_err.into();
        assert!(matches!(err, RevfeedError::Json(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(RevfeedError::Config("bad".to_string()))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}
