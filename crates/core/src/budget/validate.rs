//! Payload validation shared by every budget write path.

use rust_decimal::Decimal;

use super::error::PayloadError;

/// Maximum characters kept in a budget or transaction note.
pub const MAX_NOTE_CHARS: usize = 500;

/// Upper bound for income, limit, and transaction amounts (`numeric(9,2)`).
fn max_amount() -> Decimal {
    Decimal::new(999_999_999, 2)
}

/// Validates an income, planned-expense, or transaction amount.
///
/// # Errors
///
/// Fails when the amount is not strictly positive, carries more than 2
/// fractional digits, or exceeds 9,999,999.99.
pub fn validate_amount(amount: Decimal) -> Result<(), PayloadError> {
    if amount <= Decimal::ZERO {
        return Err(PayloadError::NonPositiveAmount);
    }

    // normalize() strips trailing zeros, so 12.50 and 12.5000 both pass.
    if amount.normalize().scale() > 2 {
        return Err(PayloadError::TooManyFractionDigits);
    }

    if amount > max_amount() {
        return Err(PayloadError::AmountTooLarge);
    }

    Ok(())
}

/// Trims a note, coerces empty input to `None`, and silently truncates at
/// `MAX_NOTE_CHARS` characters.
#[must_use]
pub fn normalize_note(note: Option<&str>) -> Option<String> {
    let trimmed = note?.trim();
    if trimmed.is_empty() {
        return None;
    }

    match trimmed.char_indices().nth(MAX_NOTE_CHARS) {
        Some((byte_idx, _)) => Some(trimmed[..byte_idx].to_string()),
        None => Some(trimmed.to_string()),
    }
}
