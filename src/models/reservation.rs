use chrono::{DateTime, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;

use crate::errors::ValidationError;
use crate::models::IntentEvent;

pub const DATE_PARAM: &str = "date";
pub const TIME_PARAM: &str = "time";
pub const NAME_PARAM: &str = "name";
pub const PARTY_SIZE_PARAM: &str = "groupN";
pub const PHONE_PARAM: &str = "phone";

/// One spreadsheet row, derived from the slots of a `makeRes` event.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReservationRecord {
    pub date: String,
    pub time: String,
    pub name: String,
    pub party_size: Value,
    pub phone: String,
}

impl ReservationRecord {
    pub fn from_event(event: &IntentEvent) -> Result<Self, ValidationError> {
        let date = require_date_time(event, DATE_PARAM)?;
        let time = require_date_time(event, TIME_PARAM)?;

        Ok(Self {
            date: date_portion(&date),
            time: time_portion(&time),
            name: event.text_param(NAME_PARAM).unwrap_or_default(),
            party_size: event
                .value_param(PARTY_SIZE_PARAM)
                .unwrap_or_else(|| Value::String(String::new())),
            phone: event.text_param(PHONE_PARAM).unwrap_or_default(),
        })
    }

    /// Column order: date, time, name, party size, phone.
    pub fn to_row(&self) -> Vec<Value> {
        vec![
            Value::String(self.date.clone()),
            Value::String(self.time.clone()),
            Value::String(self.name.clone()),
            self.party_size.clone(),
            Value::String(self.phone.clone()),
        ]
    }
}

fn require_date_time(event: &IntentEvent, name: &'static str) -> Result<String, ValidationError> {
    let value = event
        .text_param(name)
        .filter(|v| !v.is_empty())
        .ok_or(ValidationError::MissingParameter(name))?;
    validate_date_time(name, &value)?;
    Ok(value)
}

/// Accepts ISO-8601 date-times that start with a fixed-width
/// `YYYY-MM-DDTHH:MM` prefix, with or without seconds and offset. The slicing
/// below relies on that prefix.
pub fn validate_date_time(name: &'static str, value: &str) -> Result<(), ValidationError> {
    let parses = DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M").is_ok();

    if parses && has_fixed_width_prefix(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidDateTime {
            name,
            value: value.to_string(),
        })
    }
}

fn has_fixed_width_prefix(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() < 16 {
        return false;
    }
    bytes[..16].iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        10 => matches!(b, b'T' | b't' | b' '),
        13 => *b == b':',
        _ => b.is_ascii_digit(),
    })
}

/// Characters 0..10: the calendar date. No timezone conversion happens here.
pub fn date_portion(value: &str) -> String {
    value.chars().take(10).collect()
}

/// Characters 11..16: the wall-clock hour and minute as sent.
pub fn time_portion(value: &str) -> String {
    value.chars().skip(11).take(5).collect()
}
