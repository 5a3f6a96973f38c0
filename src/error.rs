use thiserror::Error;

/// The error taxonomy of §7 — kinds, not wire codes. `CoreError` is the
/// library-internal error type; the CLI boundary wraps it in
/// `anyhow::Result` the way the teacher's `main.rs`/`run.rs` do.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("no admissible route from {from} to {to}: {reason}")]
    NoRouteFound { from: String, to: String, reason: String },

    #[error("provider `{provider}` is not configured (missing credentials)")]
    NotConfigured { provider: String },

    #[error("transient error calling provider `{provider}`: {message}")]
    ProviderTransient { provider: String, message: String },

    #[error("permanent error calling provider `{provider}`: {message}")]
    ProviderPermanent { provider: String, message: String },

    #[error("auth error calling provider `{provider}`: {message}")]
    ProviderAuth { provider: String, message: String },

    #[error("rate limited by provider `{provider}`")]
    RateLimited { provider: String },

    #[error("funding failed for segment {segment_index} on provider `{provider}`: {message}")]
    FundingFailed { segment_index: usize, provider: String, message: String },

    #[error("confirmation polling exhausted for segment {segment_index} on provider `{provider}`")]
    ConfirmationTimeout { segment_index: usize, provider: String },

    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Short machine-readable kind name, used in logs and test assertions.
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::Validation(_) => "ValidationError",
            CoreError::NoRouteFound { .. } => "NoRouteFound",
            CoreError::NotConfigured { .. } => "NotConfigured",
            CoreError::ProviderTransient { .. } => "ProviderTransient",
            CoreError::ProviderPermanent { .. } => "ProviderPermanent",
            CoreError::ProviderAuth { .. } => "ProviderAuth",
            CoreError::RateLimited { .. } => "RateLimited",
            CoreError::FundingFailed { .. } => "FundingFailed",
            CoreError::ConfirmationTimeout { .. } => "ConfirmationTimeout",
            CoreError::PreconditionFailed(_) => "PreconditionFailed",
            CoreError::Internal(_) => "InternalError",
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
