use chrono::NaiveDate;

use crate::error::AppError;

pub const INVALID_ID: &str = "Id Proporcionado inválido";

/// Parse an entity id received as text (path segment, query or form field).
/// Ids are assigned from 1, so zero and negatives are rejected.
pub fn parse_id(raw: &str) -> Result<i64, AppError> {
    parse_id_or(raw, INVALID_ID)
}

/// Same as [`parse_id`] but with a caller-chosen message.
pub fn parse_id_or(raw: &str, message: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id >= 1)
        .ok_or_else(|| AppError::BadRequest(message.into()))
}

/// Parse an ISO `YYYY-MM-DD` date, as sent by `<input type="date">`.
pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        AppError::BadRequest(format!(
            "Fecha no válida en '{field}': se esperaba AAAA-MM-DD"
        ))
    })
}
