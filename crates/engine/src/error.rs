//! The module contains the errors the engine can return.
//!
//! The errors callers usually branch on are:
//!
//! - [`AllocationFailed`] when the counter store could not mint an id.
//! - [`InvalidPeriod`] for an unknown `day`/`week`/`month` keyword.
//! - [`DateParse`] for a date that is not a zero-padded `YYYY-MM-DD`.
//! - [`StorageUnavailable`] for any other backend failure.
//! - [`KeyNotFound`] when an item is not found.
//!
//!  [`AllocationFailed`]: EngineError::AllocationFailed
//!  [`InvalidPeriod`]: EngineError::InvalidPeriod
//!  [`DateParse`]: EngineError::DateParse
//!  [`StorageUnavailable`]: EngineError::StorageUnavailable
//!  [`KeyNotFound`]: EngineError::KeyNotFound
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Id allocation failed: {0}")]
    AllocationFailed(String),
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),
    #[error("Invalid date: {0}")]
    DateParse(String),
    #[error("Timed out after {0} ms")]
    Timeout(u128),
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error(transparent)]
    StorageUnavailable(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::AllocationFailed(a), Self::AllocationFailed(b)) => a == b,
            (Self::InvalidPeriod(a), Self::InvalidPeriod(b)) => a == b,
            (Self::DateParse(a), Self::DateParse(b)) => a == b,
            (Self::Timeout(a), Self::Timeout(b)) => a == b,
            (Self::Decode(a), Self::Decode(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidCredentials, Self::InvalidCredentials) => true,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::StorageUnavailable(a), Self::StorageUnavailable(b)) => {
                a.to_string() == b.to_string()
            }
            _ => false,
        }
    }
}
