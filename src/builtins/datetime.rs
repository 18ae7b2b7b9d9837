//! Datetime constructor (spec §6.2) and method table (spec §6.1).
//!
//! Properties (`year`, `month`, `weekday`, ...) are plain member access and
//! served by `ToDict` (spec §9); only `format`/`toDict` are real methods.

use super::unknown_method;
use crate::ast::Position;
use crate::error::{ErrorKind, ParsleyError};
use crate::lexer::at_literal::{DATE_RE, TIME_RE};
use crate::value::{Datetime, DatetimeKind, ToDict, Value};
use chrono::{FixedOffset, NaiveDate, NaiveTime, TimeZone};

pub fn make_datetime(raw: &str, pos: &Position) -> Result<Value, ParsleyError> {
    if let Some(caps) = DATE_RE.captures(raw) {
        if caps.get(1).is_none() {
            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|e| ParsleyError::at(ErrorKind::InvalidLiteral, format!("invalid date '{raw}': {e}"), pos.clone()))?;
            let dt = FixedOffset::east_opt(0)
                .unwrap()
                .from_local_datetime(&date.and_hms_opt(0, 0, 0).unwrap())
                .unwrap();
            return Ok(Value::Datetime(Datetime { value: dt, kind: DatetimeKind::Date }));
        }
        let dt = parse_full_datetime(raw, pos)?;
        return Ok(Value::Datetime(Datetime { value: dt, kind: DatetimeKind::DateTime }));
    }
    if TIME_RE.is_match(raw) {
        let has_seconds = raw.matches(':').count() == 2;
        let fmt = if has_seconds { "%H:%M:%S" } else { "%H:%M" };
        let time = NaiveTime::parse_from_str(raw, fmt)
            .map_err(|e| ParsleyError::at(ErrorKind::InvalidLiteral, format!("invalid time '{raw}': {e}"), pos.clone()))?;
        let today = chrono::Local::now().date_naive();
        let offset = *chrono::Local::now().offset();
        let offset = FixedOffset::east_opt(offset.local_minus_utc()).unwrap();
        let dt = offset.from_local_datetime(&today.and_time(time)).unwrap();
        let kind = if has_seconds { DatetimeKind::TimeSeconds } else { DatetimeKind::Time };
        return Ok(Value::Datetime(Datetime { value: dt, kind }));
    }
    Err(ParsleyError::at(ErrorKind::InvalidLiteral, format!("'{raw}' is not a valid datetime literal"), pos.clone()))
}

fn parse_full_datetime(raw: &str, pos: &Position) -> Result<chrono::DateTime<FixedOffset>, ParsleyError> {
    let normalized = raw.replacen(' ', "T", 1);
    for fmt in ["%Y-%m-%dT%H:%M:%S%:z", "%Y-%m-%dT%H:%M%:z"] {
        if let Ok(dt) = chrono::DateTime::parse_from_str(&normalized, fmt) {
            return Ok(dt);
        }
    }
    let naive_source = normalized.strip_suffix('Z').unwrap_or(&normalized);
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(naive_source, fmt) {
            return Ok(FixedOffset::east_opt(0).unwrap().from_local_datetime(&naive).unwrap());
        }
    }
    Err(ParsleyError::at(ErrorKind::InvalidLiteral, format!("invalid datetime '{raw}'"), pos.clone()))
}

pub fn call(d: &Datetime, method: &str, args: &[Value], _position: &Position) -> Result<Value, ParsleyError> {
    match method {
        "format" => {
            let style = match args.first() {
                Some(Value::String(s)) => s.as_str(),
                _ => "medium",
            };
            let pattern = match style {
                "short" => "%m/%d/%y %H:%M",
                "long" => "%A, %B %-d, %Y %H:%M:%S",
                "full" => "%A, %B %-d, %Y %H:%M:%S %z",
                _ => "%b %-d, %Y %H:%M",
            };
            Ok(Value::String(d.value.format(pattern).to_string()))
        }
        "toDict" => Ok(Value::Datetime(d.clone()).to_dict().unwrap()),
        _ => Err(unknown_method(&Value::Datetime(d.clone()), method)),
    }
}
