use crate::utils::error::CoerceError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

/// Parses whatever the backend sent for a timestamp.
///
/// Strings may be RFC 3339, RFC 2822, a naive date-time (taken as UTC),
/// a bare date (midnight UTC) or epoch milliseconds. JSON numbers are
/// epoch milliseconds.
pub fn parse_timestamp(value: &Value) -> Result<DateTime<Utc>, CoerceError> {
    match value {
        Value::String(s) => parse_timestamp_str(s),
        Value::Number(n) => {
            let millis = n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64));
            millis
                .and_then(DateTime::from_timestamp_millis)
                .ok_or_else(|| CoerceError::Unparseable {
                    expected: "timestamp",
                    value: n.to_string(),
                })
        }
        Value::Null => Err(CoerceError::Missing),
        other => Err(CoerceError::WrongType {
            expected: "timestamp",
            found: json_kind(other),
        }),
    }
}

pub fn parse_timestamp_str(raw: &str) -> Result<DateTime<Utc>, CoerceError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(CoerceError::Missing);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            if let Some(naive) = date.and_hms_opt(0, 0, 0) {
                return Ok(naive.and_utc());
            }
        }
    }
    if let Some(dt) = s.parse::<i64>().ok().and_then(DateTime::from_timestamp_millis) {
        return Ok(dt);
    }

    Err(CoerceError::Unparseable {
        expected: "timestamp",
        value: s.to_string(),
    })
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let dt = parse_timestamp(&json!("2024-03-05T10:30:00+02:00")).unwrap();
        assert_eq!(dt.hour(), 8);
        assert_eq!(dt.day(), 5);
    }

    #[test]
    fn test_parse_naive_and_date_only() {
        let dt = parse_timestamp(&json!("2024-03-05 10:30:00")).unwrap();
        assert_eq!((dt.hour(), dt.minute()), (10, 30));

        let dt = parse_timestamp(&json!("2024-03-05T10:30:00.123")).unwrap();
        assert_eq!(dt.hour(), 10);

        let dt = parse_timestamp(&json!("2024-03-05")).unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day(), dt.hour()), (2024, 3, 5, 0));

        let dt = parse_timestamp(&json!("05/03/2024")).unwrap();
        assert_eq!((dt.month(), dt.day()), (3, 5));
    }

    #[test]
    fn test_parse_epoch_millis() {
        let dt = parse_timestamp(&json!(1_700_000_000_000i64)).unwrap();
        assert_eq!(dt.timestamp(), 1_700_000_000);

        let dt = parse_timestamp(&json!("1700000000000")).unwrap();
        assert_eq!(dt.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_timestamp(&json!(null)), Err(CoerceError::Missing));
        assert_eq!(parse_timestamp(&json!("   ")), Err(CoerceError::Missing));
        assert!(matches!(
            parse_timestamp(&json!("yesterday-ish")),
            Err(CoerceError::Unparseable { .. })
        ));
        assert!(matches!(
            parse_timestamp(&json!({"date": "2024-01-01"})),
            Err(CoerceError::WrongType { found: "object", .. })
        ));
    }
}
