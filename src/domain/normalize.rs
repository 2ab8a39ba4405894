//! Typed readers for loosely-shaped API payloads.
//!
//! Every reader returns a `Result` so the caller decides what a failure
//! collapses to. Field lookup accepts several spellings of one key so the
//! flat and relational backend shapes can share the same code path.

use crate::utils::dates::{json_kind, parse_timestamp};
use crate::utils::error::CoerceError;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// First non-null value among `keys`.
pub fn lookup<'a>(raw: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .find(|value| !value.is_null())
}

pub fn read_string(value: Option<&Value>) -> Result<String, CoerceError> {
    match value {
        None | Some(Value::Null) => Err(CoerceError::Missing),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(CoerceError::WrongType {
            expected: "string",
            found: json_kind(other),
        }),
    }
}

/// Whole floats inside the `i64` range; anything else would saturate.
fn integral_to_i64(f: f64) -> Option<i64> {
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.fract() == 0.0 && in_range).then_some(f as i64)
}

pub fn read_i64(value: Option<&Value>) -> Result<i64, CoerceError> {
    match value {
        None | Some(Value::Null) => Err(CoerceError::Missing),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(integral_to_i64))
            .ok_or_else(|| CoerceError::Unparseable {
                expected: "integer",
                value: n.to_string(),
            }),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Err(CoerceError::Missing);
            }
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(integral_to_i64))
                .ok_or_else(|| CoerceError::Unparseable {
                    expected: "integer",
                    value: s.clone(),
                })
        }
        Some(other) => Err(CoerceError::WrongType {
            expected: "integer",
            found: json_kind(other),
        }),
    }
}

pub fn read_f64(value: Option<&Value>) -> Result<f64, CoerceError> {
    match value {
        None | Some(Value::Null) => Err(CoerceError::Missing),
        Some(Value::Number(n)) => n.as_f64().ok_or_else(|| CoerceError::Unparseable {
            expected: "number",
            value: n.to_string(),
        }),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Err(CoerceError::Missing);
            }
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .ok_or_else(|| CoerceError::Unparseable {
                    expected: "number",
                    value: s.clone(),
                })
        }
        Some(other) => Err(CoerceError::WrongType {
            expected: "number",
            found: json_kind(other),
        }),
    }
}

/// Integer restricted to `min..=max`, used for calendar fields.
pub fn read_bounded_u8(value: Option<&Value>, min: u8, max: u8) -> Result<u8, CoerceError> {
    let n = read_i64(value)?;
    u8::try_from(n)
        .ok()
        .filter(|v| (min..=max).contains(v))
        .ok_or_else(|| CoerceError::Unparseable {
            expected: "calendar value in range",
            value: n.to_string(),
        })
}

pub fn read_timestamp(value: Option<&Value>) -> Result<DateTime<Utc>, CoerceError> {
    value.map_or(Err(CoerceError::Missing), parse_timestamp)
}

/// Collapses a failed read to `None`, logging anything that was present
/// but unreadable.
pub fn or_null<T>(field: &str, result: Result<T, CoerceError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(CoerceError::Missing) => None,
        Err(e) => {
            tracing::debug!("Discarding company field {}: {}", field, e);
            None
        }
    }
}
