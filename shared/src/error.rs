use thiserror::Error;

/// Error boundary for the judging core. Every public entry point returns
/// `Result<_, JudgeError>`; internal plumbing is free to use `anyhow`
/// and convert at the seam.
#[derive(Debug, Error)]
pub enum JudgeError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("rate limited, try again in {seconds_left}s")]
    RateLimited { seconds_left: u64 },

    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("security violation: disallowed keyword '{0}'")]
    SecurityViolation(String),

    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("system error: {0}")]
    SystemError(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl JudgeError {
    /// Coarse classification useful for an HTTP-facing layer, without
    /// this crate needing to depend on any web framework.
    pub fn to_http_status(&self) -> u16 {
        match self {
            JudgeError::InvalidInput(_) | JudgeError::BadRequest(_) => 400,
            JudgeError::Forbidden(_) | JudgeError::SecurityViolation(_) => 403,
            JudgeError::NotFound(_) => 404,
            JudgeError::RateLimited { .. } => 429,
            JudgeError::UnsupportedLanguage(_) => 422,
            JudgeError::ServiceUnavailable(_) => 503,
            JudgeError::SystemError(_) | JudgeError::Database(_) => 500,
        }
    }

    /// A message safe to return to the submitting user, as opposed to
    /// `Display`, which may include internal detail in `SystemError`/`Database`.
    pub fn user_message(&self) -> String {
        match self {
            JudgeError::SystemError(_) | JudgeError::Database(_) => {
                "internal error, please try again later".to_string()
            }
            other => other.to_string(),
        }
    }
}
