// src/infra/errors.rs — Error types for Parable

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParableError {
    // Upstream completion service errors
    #[error("Provider '{provider}' error: {message}")]
    Provider {
        provider: String,
        message: String,
    },

    #[error("Rate limited by '{provider}', retry after {retry_after_ms}ms")]
    RateLimited {
        provider: String,
        retry_after_ms: u64,
    },

    #[error("Provider '{provider}' did not answer within {seconds}s")]
    Timeout { provider: String, seconds: u64 },

    // User errors
    #[error("No API key configured. Set {env_var} before starting the server.")]
    NoProvider { env_var: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Infra
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ParableError {
    /// Failures of the external completion call. The HTTP layer collapses
    /// all of these into one "AI service error".
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            ParableError::Provider { .. }
                | ParableError::RateLimited { .. }
                | ParableError::Timeout { .. }
        )
    }
}
