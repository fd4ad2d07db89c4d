//! Recovers the charged amount from the free-text final report of a work order.
//!
//! Narratives mix Arabic and Latin text. A price is recognised by the currency
//! marker [`CURRENCY_MARKER`] ("shekel") that follows it. When the narrative
//! also contains the activity marker [`ACTIVITY_MARKER`] ("work"), the amount
//! is the text between that marker and the currency marker, which skips any
//! unrelated number mentioned earlier in the narrative.
//!
//! Extraction runs in two steps: [`locate_candidate`] finds the text that
//! should hold the amount, and [`parse_amount`] turns it into an integer.
//! All splits use the first occurrence of a marker.

use thiserror::Error;

/// Arabic word for "shekel"; marks the end of a priced amount.
pub const CURRENCY_MARKER: &str = "شيكل";

/// Arabic word for "work"; the amount follows it when present.
pub const ACTIVITY_MARKER: &str = "شغل";

/// Why a narrative did not yield an amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// The narrative carries no price.
    #[error("no currency marker in narrative")]
    NoCurrencyMarker,

    /// The text in the amount position is not a plain integer.
    #[error("'{candidate}' is not a whole amount")]
    AmountParseFailure { candidate: String },
}

/// Extracts the integer amount charged in `narrative`.
pub fn extract_amount(narrative: &str) -> Result<i64, ExtractError> {
    let candidate = locate_candidate(narrative)?;
    parse_amount(candidate)
}

/// Returns the slice of `narrative` that should contain the amount.
///
/// The token directly before the currency marker is the default candidate and
/// must exist even when the activity marker later overrides it.
pub fn locate_candidate(narrative: &str) -> Result<&str, ExtractError> {
    let (before_currency, _) = narrative
        .split_once(CURRENCY_MARKER)
        .ok_or(ExtractError::NoCurrencyMarker)?;

    let trailing_token = before_currency
        .split(is_separator)
        .filter(|token| !token.is_empty())
        .next_back()
        .ok_or_else(|| ExtractError::AmountParseFailure {
            candidate: String::new(),
        })?;

    let Some((_, after_activity)) = narrative.split_once(ACTIVITY_MARKER) else {
        return Ok(trailing_token);
    };

    // Only the text up to a second activity marker belongs to the first one.
    let activity_segment = first_segment(after_activity, ACTIVITY_MARKER);
    Ok(first_segment(activity_segment, CURRENCY_MARKER).trim_matches(is_separator))
}

/// Parses an amount candidate as a non-negative base-10 integer.
///
/// Accepts surrounding whitespace, a leading `+`, single underscores between
/// digits, and ASCII, Arabic-Indic (U+0660-U+0669) and Extended Arabic-Indic
/// (U+06F0-U+06F9) digits. Decimal digits of other scripts are not recognised.
/// Signs other than `+`, decimal points and thousands separators are rejected.
pub fn parse_amount(candidate: &str) -> Result<i64, ExtractError> {
    let failure = || ExtractError::AmountParseFailure {
        candidate: candidate.to_string(),
    };

    let trimmed = candidate.trim_matches(is_separator);
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if digits.is_empty() || digits.starts_with('_') || digits.ends_with('_') || digits.contains("__")
    {
        return Err(failure());
    }

    let mut amount: i64 = 0;
    for ch in digits.chars().filter(|&ch| ch != '_') {
        let digit = decimal_digit(ch).ok_or_else(failure)?;
        amount = amount
            .checked_mul(10)
            .and_then(|value| value.checked_add(i64::from(digit)))
            .ok_or_else(failure)?;
    }
    Ok(amount)
}

fn first_segment<'a>(text: &'a str, marker: &str) -> &'a str {
    text.split_once(marker).map_or(text, |(head, _)| head)
}

/// Whitespace, plus the ASCII information separators U+001C-U+001F that
/// narrative exports sometimes carry between tokens.
fn is_separator(ch: char) -> bool {
    ch.is_whitespace() || ('\u{1C}'..='\u{1F}').contains(&ch)
}

fn decimal_digit(ch: char) -> Option<u32> {
    match ch {
        '0'..='9' => ch.to_digit(10),
        '\u{0660}'..='\u{0669}' => Some(ch as u32 - 0x0660),
        '\u{06F0}'..='\u{06F9}' => Some(ch as u32 - 0x06F0),
        _ => None,
    }
}
