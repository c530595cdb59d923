// models/src/lenient.rs

//! Field deserializers that cast the loosely typed values a browser form
//! submits (numbers as strings, a single string for a list) into the schema
//! types. Used with `#[serde(deserialize_with = "...")]`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::{Deserializer, Error as DeError};
use serde::Deserialize;
use serde_json::Value;

fn cast_string<E: DeError>(value: Value) -> Result<String, E> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(E::custom(format!("expected a string, found {}", other))),
    }
}

fn cast_number<E: DeError>(value: Value) -> Result<f64, E> {
    let number = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match number {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(E::custom(format!("expected a number, found {}", value))),
    }
}

fn cast_integer<E: DeError>(value: Value) -> Result<u32, E> {
    let number = cast_number::<E>(value)?;
    if number.fract() != 0.0 || number < 0.0 || number > f64::from(u32::MAX) {
        return Err(E::custom(format!("expected a non-negative integer, found {}", number)));
    }
    Ok(number as u32)
}

fn cast_date<E: DeError>(value: Value) -> Result<DateTime<Utc>, E> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
                return Ok(ts.with_timezone(&Utc));
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
                .ok_or_else(|| E::custom(format!("cannot cast \"{}\" to a date", s)))
        }
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .ok_or_else(|| E::custom(format!("cannot cast {} to a date", n))),
        other => Err(E::custom(format!("cannot cast {} to a date", other))),
    }
}

pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    cast_string(Value::deserialize(deserializer)?)
}

pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    cast_number(Value::deserialize(deserializer)?)
}

pub fn string_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().map(cast_string).collect(),
        Value::Null => Ok(Vec::new()),
        single => Ok(vec![cast_string(single)?]),
    }
}

pub fn optional_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => cast_string(value).map(Some),
    }
}

pub fn optional_integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        value => cast_integer(value).map(Some),
    }
}

pub fn optional_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        value => cast_date(value).map(Some),
    }
}

pub fn optional_string_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<String>>, D::Error> {
    string_list(deserializer).map(Some)
}
