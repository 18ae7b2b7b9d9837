//! Pseudo-type payload records (spec §3, §6.2, §6.4).
//!
//! Each of these used to be a dictionary with a `__type` tag in the system
//! this redesign is based on; here they carry their real fields as Rust
//! structs, which is what lets `dispatch_binary` (`value/ops.rs`) pattern
//! match on `(Value, Value)` instead of re-parsing a string tag on every
//! operation.

use chrono::{DateTime, FixedOffset};
use std::path::PathBuf;

/// Which `@`-literal form produced this value (spec §6.2) — kept alongside
/// the instant itself since `time`/`time_seconds` values are backed by
/// today's date but should not report a meaningful calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatetimeKind {
    Date,
    DateTime,
    Time,
    TimeSeconds,
}

impl DatetimeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DatetimeKind::Date => "date",
            DatetimeKind::DateTime => "datetime",
            DatetimeKind::Time => "time",
            DatetimeKind::TimeSeconds => "time_seconds",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Datetime {
    pub value: DateTime<FixedOffset>,
    pub kind: DatetimeKind,
}

/// A signed span of calendar time, stored as its constituent units rather
/// than collapsed to a single duration-of-seconds, since `1mo` and `30d`
/// need to stay distinguishable across month-length-dependent arithmetic
/// (spec §6.2.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Duration {
    pub years: i64,
    pub months: i64,
    pub weeks: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Duration {
    pub fn total_seconds_approx(&self) -> i64 {
        self.seconds
            + self.minutes * 60
            + self.hours * 3600
            + self.days * 86_400
            + self.weeks * 7 * 86_400
            + self.months * 30 * 86_400
            + self.years * 365 * 86_400
    }

    pub fn negate(&self) -> Duration {
        Duration {
            years: -self.years,
            months: -self.months,
            weeks: -self.weeks,
            days: -self.days,
            hours: -self.hours,
            minutes: -self.minutes,
            seconds: -self.seconds,
        }
    }

    pub fn add(&self, other: &Duration) -> Duration {
        Duration {
            years: self.years + other.years,
            months: self.months + other.months,
            weeks: self.weeks + other.weeks,
            days: self.days + other.days,
            hours: self.hours + other.hours,
            minutes: self.minutes + other.minutes,
            seconds: self.seconds + other.seconds,
        }
    }

    pub fn scale(&self, n: i64) -> Duration {
        Duration {
            years: self.years * n,
            months: self.months * n,
            weeks: self.weeks * n,
            days: self.days * n,
            hours: self.hours * n,
            minutes: self.minutes * n,
            seconds: self.seconds * n,
        }
    }

    pub fn scale_down(&self, n: i64) -> Duration {
        Duration {
            years: self.years / n,
            months: self.months / n,
            weeks: self.weeks / n,
            days: self.days / n,
            hours: self.hours / n,
            minutes: self.minutes / n,
            seconds: self.seconds / n,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegexValue {
    pub source: String,
    pub flags: String,
    pub compiled: regex::Regex,
}

impl PartialEq for RegexValue {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.flags == other.flags
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathValue {
    pub raw: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlValue {
    pub scheme: String,
    pub username: String,
    pub password: Option<String>,
    pub host: String,
    pub port: Option<u16>,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub fragment: Option<String>,
}

impl UrlValue {
    pub fn origin(&self) -> String {
        let mut s = format!("{}://{}", self.scheme, self.host);
        if let Some(port) = self.port {
            s.push_str(&format!(":{port}"));
        }
        s
    }

    pub fn search(&self) -> String {
        if self.query.is_empty() {
            return String::new();
        }
        let qs: Vec<String> = self.query.iter().map(|(k, v)| format!("{k}={v}")).collect();
        format!("?{}", qs.join("&"))
    }

    pub fn to_string_repr(&self) -> String {
        let mut s = format!("{}://", self.scheme);
        if !self.username.is_empty() {
            s.push_str(&self.username);
            if let Some(pass) = &self.password {
                s.push(':');
                s.push_str(pass);
            }
            s.push('@');
        }
        s.push_str(&self.host);
        if let Some(port) = self.port {
            s.push_str(&format!(":{port}"));
        }
        s.push_str(&self.path);
        s.push_str(&self.search());
        if let Some(frag) = &self.fragment {
            s.push('#');
            s.push_str(frag);
        }
        s
    }
}

/// A rendered tag tree, produced by evaluating a `Tag` AST node
/// (spec §4.7). Kept separate from the AST's `Tag` since attribute/child
/// expressions have already been evaluated to `Value`s by this point.
#[derive(Debug, Clone, PartialEq)]
pub struct TagValue {
    pub name: Option<String>,
    pub attrs: Vec<(String, super::Value)>,
    pub children: Vec<TagNode>,
    pub self_closing: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TagNode {
    Text(String),
    Value(super::Value),
    Tag(TagValue),
}

#[derive(Debug)]
pub struct FileHandle {
    pub path: PathBuf,
    pub handle: Option<std::fs::File>,
    pub mode: FileMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    Read,
    Write,
    Append,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirHandle {
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestHandle {
    pub method: String,
    pub url: UrlValue,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseHandle {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandHandle {
    pub program: String,
    pub args: Vec<String>,
    pub stdin: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConnectionHandle {
    pub dsn: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SftpConnectionHandle {
    pub host: String,
    pub user: String,
}
