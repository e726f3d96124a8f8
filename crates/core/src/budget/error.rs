//! Payload validation errors.

use thiserror::Error;

/// Reasons a budget payload fails validation before any write happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// Amount must be strictly positive.
    #[error("amount must be greater than zero")]
    NonPositiveAmount,

    /// Amount has more than 2 fractional digits.
    #[error("amount must have at most 2 fractional digits")]
    TooManyFractionDigits,

    /// Amount exceeds the storable maximum.
    #[error("amount exceeds the maximum of 9999999.99")]
    AmountTooLarge,

    /// Month value is not a calendar month.
    #[error("'{0}' is not a valid month")]
    InvalidMonth(String),
}
