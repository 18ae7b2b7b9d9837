//! `Stringify` (spec §4.3.5, used by string interpolation and tag
//! rendering) and `ToDict` (spec's redesign note §9: pseudo-types synthesize
//! their `__type`-tagged dictionary view on demand instead of always being
//! one).

use super::Value;
use std::collections::BTreeMap;
use std::fmt::Write as _;

pub trait Stringify {
    fn stringify(&self) -> String;
}

impl Stringify for Value {
    fn stringify(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Integer(n) => n.to_string(),
            Value::Float(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    format!("{n:.1}")
                } else {
                    n.to_string()
                }
            }
            Value::Boolean(b) => b.to_string(),
            Value::String(s) => s.clone(),
            Value::Array(items) => {
                let mut out = String::from("[");
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(&item.stringify());
                }
                out.push(']');
                out
            }
            Value::Dict(entries) => {
                let mut out = String::from("{");
                for (i, (k, v)) in entries.borrow().iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    let _ = write!(out, "{k}: {}", v.stringify());
                }
                out.push('}');
                out
            }
            Value::Function(f) => format!("{f:?}"),
            Value::Datetime(d) => d.value.to_rfc3339(),
            Value::Duration(d) => stringify_duration(d),
            Value::Regex(r) => format!("/{}/{}", r.source, r.flags),
            Value::Path(p) => p.raw.display().to_string(),
            Value::Url(u) => u.to_string_repr(),
            Value::Tag(t) => stringify_tag(t),
            Value::File(f) => format!("<file {}>", f.borrow().path.display()),
            Value::Dir(d) => format!("<dir {}>", d.path.display()),
            Value::Request(r) => format!("<request {} {}>", r.method, r.url.to_string_repr()),
            Value::Response(r) => format!("<response {}>", r.status),
            Value::Command(c) => format!("<command {}>", c.program),
            Value::DbConnection(c) => format!("<db {}>", c.dsn),
            Value::SftpConnection(c) => format!("<sftp {}@{}>", c.user, c.host),
            Value::Error(e) => format!("<error {}>", e.message),
        }
    }
}

fn stringify_duration(d: &super::Duration) -> String {
    let mut out = String::new();
    if d.years != 0 {
        let _ = write!(out, "{}y", d.years);
    }
    if d.months != 0 {
        let _ = write!(out, "{}mo", d.months);
    }
    if d.weeks != 0 {
        let _ = write!(out, "{}w", d.weeks);
    }
    if d.days != 0 {
        let _ = write!(out, "{}d", d.days);
    }
    if d.hours != 0 {
        let _ = write!(out, "{}h", d.hours);
    }
    if d.minutes != 0 {
        let _ = write!(out, "{}m", d.minutes);
    }
    if d.seconds != 0 || out.is_empty() {
        let _ = write!(out, "{}s", d.seconds);
    }
    out
}

fn stringify_tag(tag: &super::TagValue) -> String {
    let mut out = String::new();
    let name = tag.name.as_deref().unwrap_or("");
    out.push('<');
    out.push_str(name);
    for (k, v) in &tag.attrs {
        let _ = write!(out, " {k}=\"{}\"", v.stringify());
    }
    if tag.self_closing {
        out.push_str("/>");
        return out;
    }
    out.push('>');
    for child in &tag.children {
        match child {
            super::TagNode::Text(t) => out.push_str(t),
            super::TagNode::Value(v) => out.push_str(&v.stringify()),
            super::TagNode::Tag(t) => out.push_str(&stringify_tag(t)),
        }
    }
    out.push_str("</");
    out.push_str(name);
    out.push('>');
    out
}

pub trait ToDict {
    /// Returns `Some(dict)` only for pseudo-types (spec §9); ordinary
    /// dictionaries are already themselves. Doubles as the property table a
    /// pseudo-type exposes to plain `.field` member access (spec §6.1) and
    /// as the `.toDict()` method's result.
    fn to_dict(&self) -> Option<Value>;
}

impl ToDict for Value {
    fn to_dict(&self) -> Option<Value> {
        use chrono::{Datelike, Timelike};
        let mut map = BTreeMap::new();
        match self {
            Value::Dict(_) => return Some(self.clone()),
            Value::Datetime(d) => {
                let dt = d.value;
                map.insert("__type".into(), Value::String("datetime".into()));
                map.insert("kind".into(), Value::String(d.kind.as_str().into()));
                map.insert("year".into(), Value::Integer(dt.year() as i64));
                map.insert("month".into(), Value::Integer(dt.month() as i64));
                map.insert("day".into(), Value::Integer(dt.day() as i64));
                map.insert("hour".into(), Value::Integer(dt.hour() as i64));
                map.insert("minute".into(), Value::Integer(dt.minute() as i64));
                map.insert("second".into(), Value::Integer(dt.second() as i64));
                map.insert("weekday".into(), Value::String(dt.format("%A").to_string()));
                map.insert("iso".into(), Value::String(dt.to_rfc3339()));
                map.insert("unix".into(), Value::Integer(dt.timestamp()));
                map.insert("dayOfYear".into(), Value::Integer(dt.ordinal() as i64));
                map.insert("week".into(), Value::Integer(dt.iso_week().week() as i64));
                let midnight = dt.date_naive().and_hms_opt(0, 0, 0).unwrap().and_local_timezone(dt.timezone()).unwrap();
                map.insert(
                    "date".into(),
                    Value::Datetime(super::Datetime { value: midnight, kind: super::DatetimeKind::Date }),
                );
                map.insert(
                    "time".into(),
                    Value::Datetime(super::Datetime { value: dt, kind: super::DatetimeKind::Time }),
                );
            }
            Value::Duration(d) => {
                let months_total = d.years * 12 + d.months;
                let seconds_total =
                    d.seconds + d.minutes * 60 + d.hours * 3600 + d.days * 86_400 + d.weeks * 7 * 86_400;
                map.insert("__type".into(), Value::String("duration".into()));
                map.insert("seconds".into(), Value::Integer(seconds_total));
                map.insert("months".into(), Value::Integer(months_total));
                map.insert(
                    "totalSeconds".into(),
                    if months_total == 0 { Value::Integer(seconds_total) } else { Value::Null },
                );
            }
            Value::Path(p) => {
                let raw = &p.raw;
                map.insert("__type".into(), Value::String("path".into()));
                map.insert(
                    "basename".into(),
                    Value::String(raw.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()),
                );
                let ext = raw.extension().map(|e| e.to_string_lossy().into_owned()).unwrap_or_default();
                map.insert("ext".into(), Value::String(ext.clone()));
                map.insert("extension".into(), Value::String(ext));
                map.insert(
                    "stem".into(),
                    Value::String(raw.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()),
                );
                let parent = raw.parent().unwrap_or(std::path::Path::new(""));
                map.insert("dirname".into(), Value::Path(super::PathValue { raw: parent.to_path_buf() }));
                map.insert("parent".into(), Value::Path(super::PathValue { raw: parent.to_path_buf() }));
                map.insert("dir".into(), Value::String(parent.display().to_string()));
                map.insert("string".into(), Value::String(raw.display().to_string()));
                map.insert(
                    "components".into(),
                    Value::new_array(
                        raw.components().map(|c| Value::String(c.as_os_str().to_string_lossy().into_owned())).collect(),
                    ),
                );
                map.insert("absolute".into(), Value::Boolean(raw.is_absolute()));
            }
            Value::Url(u) => {
                map.insert("__type".into(), Value::String("url".into()));
                map.insert("scheme".into(), Value::String(u.scheme.clone()));
                map.insert("host".into(), Value::String(u.host.clone()));
                map.insert("port".into(), u.port.map(|p| Value::Integer(p as i64)).unwrap_or(Value::Null));
                map.insert("username".into(), Value::String(u.username.clone()));
                map.insert("password".into(), u.password.clone().map(Value::String).unwrap_or(Value::Null));
                map.insert("path".into(), Value::String(u.path.clone()));
                map.insert(
                    "query".into(),
                    Value::new_dict(u.query.iter().map(|(k, v)| (k.clone(), Value::String(v.clone()))).collect()),
                );
                map.insert("fragment".into(), u.fragment.clone().map(Value::String).unwrap_or(Value::Null));
                map.insert("origin".into(), Value::String(u.origin()));
                map.insert("pathname".into(), Value::String(u.path.clone()));
                map.insert("string".into(), Value::String(u.to_string_repr()));
            }
            Value::Regex(r) => {
                map.insert("__type".into(), Value::String("regex".into()));
                map.insert("pattern".into(), Value::String(r.source.clone()));
                map.insert("flags".into(), Value::String(r.flags.clone()));
            }
            Value::Response(r) => {
                map.insert("__type".into(), Value::String("response".into()));
                map.insert("status".into(), Value::Integer(r.status as i64));
                map.insert("body".into(), Value::String(r.body.clone()));
                map.insert(
                    "headers".into(),
                    Value::new_dict(r.headers.iter().map(|(k, v)| (k.clone(), Value::String(v.clone()))).collect()),
                );
            }
            _ => return None,
        }
        Some(Value::new_dict(map))
    }
}
