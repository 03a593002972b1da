//! Typed errors for the aggregation core and its collaborators

use thiserror::Error;

/// A glob pattern that failed to compile
#[derive(Debug, Error)]
#[error("invalid pattern '{pattern}': {message}")]
pub struct PatternError {
    pub pattern: String,
    pub message: String,
}

/// Failures reported by a token counter
#[derive(Debug, Error)]
pub enum TokenizerError {
    #[error("no Google Cloud project configured (set --project or GOOGLE_CLOUD_PROJECT)")]
    MissingProject,

    #[error("no access token available: {0}")]
    MissingCredentials(String),

    #[error("token count request failed: {0}")]
    Request(String),

    #[error("Vertex AI API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("unexpected countTokens response: {0}")]
    InvalidResponse(String),

    #[error("tokenizer encoding unavailable: {0}")]
    Encoding(String),
}

/// Fatal errors of a promptify run
#[derive(Debug, Error)]
pub enum PromptifyError {
    #[error("Model not supported: {model}. Supported models are {}", supported.join(", "))]
    UnsupportedModel {
        model: String,
        supported: Vec<String>,
    },

    #[error(transparent)]
    Tokenizer(#[from] TokenizerError),

    #[error(transparent)]
    InvalidPattern(#[from] PatternError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_model_message_lists_models() {
        let err = PromptifyError::UnsupportedModel {
            model: "not-a-model".to_string(),
            supported: vec!["a".to_string(), "b".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("not-a-model"));
        assert!(msg.contains("a, b"));
    }

    #[test]
    fn test_tokenizer_error_is_transparent() {
        let err: PromptifyError = TokenizerError::Api {
            status: 403,
            body: "denied".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Vertex AI API error 403: denied");
    }

    #[test]
    fn test_pattern_error_display() {
        let err = PatternError {
            pattern: "[".to_string(),
            message: "unclosed".to_string(),
        };
        assert_eq!(err.to_string(), "invalid pattern '[': unclosed");
    }
}
