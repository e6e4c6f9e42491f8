//! Parsing of numeric fields that arrive as text from a form or prompt.
//!
//! A comma is accepted as the decimal separator.

use crate::errors::{CalcError, CalcResult};

/// Parse a required numeric field.
pub fn parse_field(field: &str, raw: &str) -> CalcResult<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CalcError::missing_field(field));
    }
    let value: f64 = trimmed
        .replace(',', ".")
        .parse()
        .map_err(|_| CalcError::invalid_input(field, raw, "Not a number"))?;
    if !value.is_finite() {
        return Err(CalcError::invalid_input(field, raw, "Value must be finite"));
    }
    Ok(value)
}

/// Parse an optional numeric field. Blank text is `Ok(None)`.
pub fn parse_optional(field: &str, raw: Option<&str>) -> CalcResult<Option<f64>> {
    match raw {
        Some(text) if !text.trim().is_empty() => parse_field(field, text).map(Some),
        _ => Ok(None),
    }
}

/// Parse a strictly positive integer count (e.g. the number of loads).
pub fn parse_count(field: &str, raw: &str) -> CalcResult<usize> {
    let trimmed = raw.trim();
    match trimmed.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CalcError::invalid_input(field, raw, "Must be a positive integer")),
    }
}
