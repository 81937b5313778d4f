//! Centralized error handling.
//!
//! Provides a unified error type for the entire crate. Failure paths that
//! the caller can act on (missing registration, ambiguous lookup, unknown
//! filter field) get their own variants instead of being masked behind a
//! fallback.

use thiserror::Error;

/// Crate error types
#[derive(Error, Debug)]
pub enum AppError {
    // Resource errors
    #[error("Record not found")]
    RecordNotFound,

    #[error("Lookup matched more than one record")]
    MultipleRecords,

    // Registry errors
    #[error("No factory registered for `{0}`")]
    FactoryMissing(&'static str),

    #[error("A factory for `{0}` is already registered")]
    DuplicateFactory(&'static str),

    // Filter construction
    #[error("Unknown field `{0}`")]
    UnknownField(String),

    #[error("Field `{field}` cannot be used as a plain equality filter: {reason}")]
    UnsupportedFilterValue { field: String, reason: String },

    // External services
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Serialization error")]
    Serialization(#[from] serde_json::Error),

    // Internal
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::RecordNotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn cache(msg: impl Into<String>) -> Self {
        AppError::Cache(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn unsupported_filter(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::UnsupportedFilterValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
