//! Duration constructor (spec §6.2.3) and method table (spec §6.1).

use super::unknown_method;
use crate::ast::Position;
use crate::error::{ErrorKind, ParsleyError};
use crate::value::{Duration, ToDict, Value};
use once_cell::sync::Lazy;
use regex::Regex;

static UNIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)(y|mo|w|d|h|m|s)").unwrap());

pub fn make_duration(raw: &str, pos: &Position) -> Result<Value, ParsleyError> {
    let (sign, body) = match raw.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, raw),
    };
    if !UNIT_RE.is_match(body) {
        return Err(ParsleyError::at(ErrorKind::InvalidLiteral, format!("'{raw}' is not a valid duration literal"), pos.clone()));
    }
    let mut d = Duration::default();
    for caps in UNIT_RE.captures_iter(body) {
        let n: i64 = caps[1].parse().unwrap_or(0);
        let n = n * sign;
        match &caps[2] {
            "y" => d.years += n,
            "mo" => d.months += n,
            "w" => d.weeks += n,
            "d" => d.days += n,
            "h" => d.hours += n,
            "m" => d.minutes += n,
            "s" => d.seconds += n,
            _ => unreachable!(),
        }
    }
    Ok(Value::Duration(d))
}

pub fn call(d: &Duration, method: &str, args: &[Value], _position: &Position) -> Result<Value, ParsleyError> {
    match method {
        "format" => {
            let relative = matches!(args.first(), Some(Value::String(s)) if s == "relative");
            Ok(Value::String(if relative { format_relative(d) } else { format_long(d) }))
        }
        "toDict" => Ok(Value::Duration(*d).to_dict().unwrap()),
        _ => Err(unknown_method(&Value::Duration(*d), method)),
    }
}

fn format_long(d: &Duration) -> String {
    let parts = [
        (d.years, "year"),
        (d.months, "month"),
        (d.weeks, "week"),
        (d.days, "day"),
        (d.hours, "hour"),
        (d.minutes, "minute"),
        (d.seconds, "second"),
    ];
    let rendered: Vec<String> = parts
        .into_iter()
        .filter(|(n, _)| *n != 0)
        .map(|(n, unit)| format!("{} {}{}", n, unit, if n.abs() == 1 { "" } else { "s" }))
        .collect();
    if rendered.is_empty() {
        "0 seconds".to_string()
    } else {
        rendered.join(", ")
    }
}

/// A coarse "tomorrow" / "in 2 days" style rendering. Only the single
/// largest nonzero unit is reported, matching how people actually speak
/// about relative time rather than a full breakdown.
fn format_relative(d: &Duration) -> String {
    let total_seconds = d.total_seconds_approx();
    if total_seconds == 0 {
        return "now".to_string();
    }
    let future = total_seconds > 0;
    let (value, unit) = largest_unit(d);
    if value == 0 {
        return "now".to_string();
    }
    if value == 1 && unit == "day" {
        return if future { "tomorrow".to_string() } else { "yesterday".to_string() };
    }
    let phrase = format!("{} {}{}", value, unit, if value == 1 { "" } else { "s" });
    if future {
        format!("in {phrase}")
    } else {
        format!("{phrase} ago")
    }
}

fn largest_unit(d: &Duration) -> (i64, &'static str) {
    if d.years != 0 {
        return (d.years.abs(), "year");
    }
    if d.months != 0 {
        return (d.months.abs(), "month");
    }
    if d.weeks != 0 {
        return (d.weeks.abs(), "week");
    }
    if d.days != 0 {
        return (d.days.abs(), "day");
    }
    if d.hours != 0 {
        return (d.hours.abs(), "hour");
    }
    if d.minutes != 0 {
        return (d.minutes.abs(), "minute");
    }
    (d.seconds.abs(), "second")
}
