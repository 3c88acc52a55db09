//! Error types surfaced while talking to GitHub, the chat API, or the
//! terminal.

use thiserror::Error;

use super::rate_limit::RateLimitInfo;

/// Errors that end a review session.
///
/// Nothing in the session loop recovers from these: they propagate to the
/// binary, which prints them and exits with a failure status. Invalid
/// repository selections are handled by re-prompting and never appear here.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IntakeError {
    /// The GitHub access token was missing or blank.
    #[error("GitHub access token is required (set GITHUB_TOKEN or --github-token)")]
    MissingToken,

    /// The chat API key was missing or blank.
    #[error("chat API key is required (set OPENAI_API_KEY or --openai-api-key)")]
    MissingApiKey,

    /// Configuration could not be loaded or is incomplete.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// The token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// Status and message returned with the 401/403 response.
        message: String,
    },

    /// A remote API answered with a non-success status.
    #[error("API error: {message}")]
    Api {
        /// Status and response detail describing the failure.
        message: String,
    },

    /// Networking failed before a response was received.
    #[error("network error: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// A response body did not have the expected shape.
    #[error("failed to decode {what}: {message}")]
    Decode {
        /// Which payload was being decoded.
        what: &'static str,
        /// Decoder detail, usually naming the missing field.
        message: String,
    },

    /// GitHub refused the request because the rate limit is exhausted.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Rate limit headers, when the response carried them.
        rate_limit: Option<RateLimitInfo>,
        /// Error message from GitHub.
        message: String,
    },

    /// Terminal I/O failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// Standard input closed while a selection was still required.
    #[error("input closed before a pull request was selected")]
    InputClosed,
}

impl From<std::io::Error> for IntakeError {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
        }
    }
}
