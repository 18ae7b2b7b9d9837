//! URL constructor and method table (spec §4.6, §6.1).
//!
//! No registry crate in the stack offers RFC 3986 parsing tuned to this
//! DSL's `@(...)`-interpolated literal syntax, so parsing is hand-rolled
//! here rather than pulled in fresh.

use super::{type_error, unknown_method};
use crate::ast::Position;
use crate::error::ParsleyError;
use crate::value::{ToDict, UrlValue, Value};

pub fn make_url(raw: &str, pos: &Position) -> Result<Value, ParsleyError> {
    let (scheme, rest) = raw
        .split_once("://")
        .ok_or_else(|| type_error(format!("'{raw}' is missing a scheme")).with_position(pos.clone()))?;

    let (authority, rest) = match rest.find('/') {
        Some(idx) => (&rest[..idx], &rest[idx..]),
        None => match rest.find(['?', '#']) {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, ""),
        },
    };

    let (userinfo, hostport) = match authority.rsplit_once('@') {
        Some((u, h)) => (Some(u), h),
        None => (None, authority),
    };
    let (username, password) = match userinfo {
        Some(u) => match u.split_once(':') {
            Some((user, pass)) => (user.to_string(), Some(pass.to_string())),
            None => (u.to_string(), None),
        },
        None => (String::new(), None),
    };
    let (host, port) = match hostport.rsplit_once(':') {
        Some((h, p)) => (h.to_string(), p.parse::<u16>().ok()),
        None => (hostport.to_string(), None),
    };

    let (path_and_query, fragment) = match rest.split_once('#') {
        Some((p, f)) => (p, Some(f.to_string())),
        None => (rest, None),
    };
    let (raw_path, raw_query) = match path_and_query.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (path_and_query, None),
    };
    let path = clean_url_path(raw_path);
    let query = raw_query
        .map(|q| {
            q.split('&')
                .filter(|s| !s.is_empty())
                .map(|pair| match pair.split_once('=') {
                    Some((k, v)) => (k.to_string(), v.to_string()),
                    None => (pair.to_string(), String::new()),
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(Value::Url(UrlValue { scheme: scheme.to_string(), username, password, host, port, path, query, fragment }))
}

/// The URL-path equivalent of `path::clean` (spec §4.6): same cleanname
/// rules, but always anchored at `/` and serialised without a leading `.`.
fn clean_url_path(raw: &str) -> String {
    if raw.is_empty() {
        return "/".to_string();
    }
    let mut out: Vec<&str> = Vec::new();
    for part in raw.split('/') {
        match part {
            "" | "." => continue,
            ".." => {
                out.pop();
            }
            p => out.push(p),
        }
    }
    format!("/{}", out.join("/"))
}

pub fn call(u: &UrlValue, method: &str, _args: &[Value], _position: &Position) -> Result<Value, ParsleyError> {
    match method {
        "origin" => Ok(Value::String(u.origin())),
        "pathname" => Ok(Value::String(u.path.clone())),
        "search" => Ok(Value::String(u.search())),
        "href" => Ok(Value::String(u.to_string_repr())),
        "toDict" => Ok(Value::Url(u.clone()).to_dict().unwrap()),
        _ => Err(unknown_method(&Value::Url(u.clone()), method)),
    }
}
