use thiserror::Error;

/// Application-level failures surfaced to pages.
///
/// Local guard violations (`InvalidState`) are raised synchronously and never
/// produce a backend call. `Backend` wraps whatever the Supabase call
/// reported; callers decide whether to retry.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AppError {
    #[error("inte inloggad")]
    Unauthenticated,

    #[error("{0} hittades inte")]
    NotFound(String),

    #[error("ogiltigt tillstånd: {0}")]
    InvalidState(&'static str),

    #[error("serverfel: {0}")]
    Backend(String),
}

impl AppError {
    pub fn not_found(what: &str) -> Self {
        Self::NotFound(what.to_string())
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}
