//! Goal payload validation.
//!
//! Fields are checked in a fixed order and only the first failure is
//! reported: `userId`, `title`, `description`, `targetDate`, `status`.
//! Unknown keys, including a client-supplied `id`, are ignored.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use strum::IntoEnumIterator;

use super::types::{GoalFields, GoalStatus};
use crate::error::GoalError;

/// Minimum number of characters in a title.
pub const MIN_TITLE_LEN: usize = 3;

/// Validate a raw payload and normalize it into goal fields.
pub fn validate_goal(payload: &Value) -> Result<GoalFields, GoalError> {
    let Some(fields) = payload.as_object() else {
        return Err(invalid("\"value\" must be of type object"));
    };

    let user_id = required_string(fields, "userId")?;

    let title = required_string(fields, "title")?;
    if title.chars().count() < MIN_TITLE_LEN {
        return Err(invalid(format!(
            "\"title\" length must be at least {MIN_TITLE_LEN} characters long"
        )));
    }

    let description = match fields.get("description") {
        None => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(_) => return Err(invalid("\"description\" must be a string")),
    };

    let target_date = match fields.get("targetDate") {
        None => return Err(invalid("\"targetDate\" is required")),
        Some(value) => {
            parse_date(value).ok_or_else(|| invalid("\"targetDate\" must be a valid date"))?
        }
    };

    let status = match fields.get("status") {
        None => GoalStatus::default(),
        Some(Value::String(s)) => GoalStatus::from_str(s).map_err(|_| status_error())?,
        Some(_) => return Err(status_error()),
    };

    Ok(GoalFields {
        user_id,
        title,
        description,
        target_date,
        status,
    })
}

fn invalid(message: impl Into<String>) -> GoalError {
    GoalError::Validation(message.into())
}

fn required_string(fields: &Map<String, Value>, name: &str) -> Result<String, GoalError> {
    match fields.get(name) {
        None => Err(invalid(format!("\"{name}\" is required"))),
        Some(Value::String(s)) if s.is_empty() => {
            Err(invalid(format!("\"{name}\" is not allowed to be empty")))
        }
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(invalid(format!("\"{name}\" must be a string"))),
    }
}

fn status_error() -> GoalError {
    let allowed: Vec<String> = GoalStatus::iter().map(|s| s.to_string()).collect();
    invalid(format!("\"status\" must be one of [{}]", allowed.join(", ")))
}

/// Accepts RFC 3339, bare dates, offset-less date-times (UTC) and
/// integer Unix milliseconds.
fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(raw) => parse_date_str(raw.trim()),
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}

fn parse_date_str(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
