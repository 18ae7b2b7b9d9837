//! Integer/Float method table (spec §6.1).
//!
//! Real locale-aware number/currency tables are an out-of-scope external
//! collaborator (spec §1); these produce a plain default-locale (thousands
//! comma, `.` decimal point) rendering regardless of the `locale` argument,
//! which is accepted and ignored.

use super::unknown_method;
use crate::ast::Position;
use crate::error::ParsleyError;
use crate::value::Value;

pub fn call(receiver: &Value, method: &str, args: &[Value], _position: &Position) -> Result<Value, ParsleyError> {
    let n = match receiver {
        Value::Integer(i) => *i as f64,
        Value::Float(f) => *f,
        _ => unreachable!("number::call invoked on a non-numeric value"),
    };
    let is_integer = matches!(receiver, Value::Integer(_));

    match method {
        "format" => Ok(Value::String(grouped(n, if is_integer { 0 } else { 2 }))),
        "currency" => {
            let code = match args.first() {
                Some(Value::String(s)) => s.clone(),
                _ => "USD".to_string(),
            };
            let symbol = currency_symbol(&code);
            Ok(Value::String(format!("{symbol}{}", grouped(n, 2))))
        }
        "percent" => Ok(Value::String(format!("{}%", grouped(n * 100.0, 0)))),
        _ => Err(unknown_method(receiver, method)),
    }
}

fn currency_symbol(code: &str) -> String {
    match code.to_uppercase().as_str() {
        "USD" => "$".to_string(),
        "EUR" => "\u{20ac}".to_string(),
        "GBP" => "\u{a3}".to_string(),
        "JPY" => "\u{a5}".to_string(),
        other => format!("{other} "),
    }
}

fn grouped(n: f64, decimals: usize) -> String {
    let sign = if n.is_sign_negative() && n != 0.0 { "-" } else { "" };
    let scaled = format!("{:.*}", decimals, n.abs());
    let mut split = scaled.splitn(2, '.');
    let int_part = split.next().unwrap_or("0");
    let frac_part = split.next();

    let mut grouped_rev = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped_rev.push(',');
        }
        grouped_rev.push(c);
    }
    let grouped_int: String = grouped_rev.chars().rev().collect();

    match frac_part {
        Some(f) => format!("{sign}{grouped_int}.{f}"),
        None => format!("{sign}{grouped_int}"),
    }
}
