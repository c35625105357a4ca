//! Error handling for the scoring core
//!
//! Library operations return [`ScoreError`] so callers can match on the
//! exact contract violation. The binary and the config loader use
//! `anyhow` for context chaining on top of it.

use thiserror::Error;

/// Contract violations surfaced by the scoring core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoreError {
    #[error("no baseline snapshot: score requested before any snapshot was recorded")]
    EmptyBaseline,

    #[error("missing quote for held asset '{asset_id}'")]
    MissingQuote { asset_id: String },

    #[error("update hook not initialized")]
    NotInitialized,

    #[error("arithmetic overflow computing {figure}")]
    Overflow { figure: String },
}

/// Result type alias for scoring operations
pub type Result<T> = std::result::Result<T, ScoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_formatting_is_readable() {
        let err = ScoreError::MissingQuote {
            asset_id: "banana".to_string(),
        };
        assert_eq!(err.to_string(), "missing quote for held asset 'banana'");
    }

    #[test]
    fn test_anyhow_context_chains_errors() {
        use anyhow::Context;
        let result: anyhow::Result<()> =
            Err(ScoreError::EmptyBaseline).context("failed to score snapshot");
        match result {
            Err(e) => {
                assert!(e.to_string().contains("failed to score snapshot"));
                let debug_msg = format!("{:?}", e);
                assert!(debug_msg.contains("no baseline snapshot"));
            }
            Ok(_) => panic!("expected error"),
        }
    }

    #[test]
    fn test_score_error_variants() {
        assert!(ScoreError::EmptyBaseline
            .to_string()
            .starts_with("no baseline snapshot"));
        assert_eq!(
            ScoreError::NotInitialized.to_string(),
            "update hook not initialized"
        );
        assert_eq!(
            ScoreError::Overflow {
                figure: "total value".to_string()
            }
            .to_string(),
            "arithmetic overflow computing total value"
        );
    }
}
