//! Binary operator dispatch (spec §4.3.1): a table keyed by
//! `(Operator, left type, right type)`, matching the system's own
//! description of overload resolution rather than a single fall-through
//! `match` that privileges one "primary" type per operator.

use super::{Duration, Value};
use crate::ast::UnaryOp;
use crate::error::{ErrorKind, ParsleyError};
use crate::token::Operator;
use std::collections::BTreeMap;

type OpResult = Result<Value, ParsleyError>;

fn type_error(op: Operator, left: &Value, right: &Value) -> ParsleyError {
    ParsleyError::new(
        ErrorKind::TypeMismatch,
        format!(
            "operator {op:?} is not defined for {} and {}",
            left.type_name(),
            right.type_name()
        ),
    )
}

pub fn dispatch_unary(op: UnaryOp, operand: &Value) -> OpResult {
    match (op, operand) {
        (UnaryOp::Neg, Value::Integer(n)) => Ok(Value::Integer(-n)),
        (UnaryOp::Neg, Value::Float(n)) => Ok(Value::Float(-n)),
        (UnaryOp::Neg, Value::Duration(d)) => Ok(Value::Duration(d.negate())),
        (UnaryOp::Not, v) => Ok(Value::Boolean(!v.is_truthy())),
        (UnaryOp::Neg, v) => Err(ParsleyError::new(
            ErrorKind::TypeMismatch,
            format!("cannot negate a {}", v.type_name()),
        )),
    }
}

pub fn dispatch_binary(op: Operator, left: &Value, right: &Value) -> OpResult {
    use Value::*;
    match op {
        Operator::EqEq => return Ok(Boolean(left.structural_eq(right))),
        Operator::NotEq => return Ok(Boolean(!left.structural_eq(right))),
        _ => {}
    }

    match (op, left, right) {
        // -- logical (bool is the scalar case; array/dict/datetime have
        // their own set-like readings, spec §4.3.1) --
        (Operator::AndAnd, Boolean(a), Boolean(b)) => Ok(Boolean(*a && *b)),
        (Operator::OrOr, Boolean(a), Boolean(b)) => Ok(Boolean(*a || *b)),
        (Operator::AndAnd, Array(a), Array(b)) => {
            Ok(Value::new_array(array_intersection(&a.borrow(), &b.borrow())))
        }
        (Operator::OrOr, Array(a), Array(b)) => Ok(Value::new_array(array_union(&a.borrow(), &b.borrow()))),
        (Operator::AndAnd, Dict(a), Dict(b)) => {
            let (a, b) = (a.borrow(), b.borrow());
            let merged: BTreeMap<String, Value> =
                a.iter().filter(|(k, _)| b.contains_key(*k)).map(|(k, v)| (k.clone(), v.clone())).collect();
            Ok(Value::new_dict(merged))
        }
        (Operator::AndAnd, Datetime(d), Datetime(t))
            if d.kind == super::DatetimeKind::Date && t.kind == super::DatetimeKind::Time =>
        {
            Ok(Value::Datetime(combine_date_time(d, t)))
        }

        // -- array/dict set-like and structural operators --
        (Operator::Minus, Array(a), Array(b)) => {
            Ok(Value::new_array(array_difference(&a.borrow(), &b.borrow())))
        }
        (Operator::Minus, Dict(a), Dict(b)) => {
            let (a, b) = (a.borrow(), b.borrow());
            let remaining: BTreeMap<String, Value> =
                a.iter().filter(|(k, _)| !b.contains_key(*k)).map(|(k, v)| (k.clone(), v.clone())).collect();
            Ok(Value::new_dict(remaining))
        }
        (Operator::PlusPlus, Array(a), Array(b)) => {
            let mut items = a.borrow().clone();
            items.extend(b.borrow().iter().cloned());
            Ok(Value::new_array(items))
        }
        (Operator::PlusPlus, Array(a), b) => {
            let mut items = a.borrow().clone();
            items.push(b.clone());
            Ok(Value::new_array(items))
        }
        (Operator::PlusPlus, a, Array(b)) => {
            let mut items = vec![a.clone()];
            items.extend(b.borrow().iter().cloned());
            Ok(Value::new_array(items))
        }
        (Operator::PlusPlus, Dict(a), Dict(b)) => {
            let mut merged = a.borrow().clone();
            merged.extend(b.borrow().iter().map(|(k, v)| (k.clone(), v.clone())));
            Ok(Value::new_dict(merged))
        }
        (Operator::Slash, Array(a), Integer(n)) => {
            if *n <= 0 {
                return Err(ParsleyError::new(ErrorKind::TypeMismatch, "chunk size must be positive"));
            }
            let items = a.borrow();
            let chunks: Vec<Value> =
                items.chunks(*n as usize).map(|c| Value::new_array(c.to_vec())).collect();
            Ok(Value::new_array(chunks))
        }
        // -- numeric --
        (Operator::Plus, Integer(a), Integer(b)) => Ok(Integer(a + b)),
        (Operator::Plus, Float(a), Float(b)) => Ok(Float(a + b)),
        (Operator::Plus, Integer(a), Float(b)) | (Operator::Plus, Float(b), Integer(a)) => {
            Ok(Float(*a as f64 + b))
        }
        (Operator::Minus, Integer(a), Integer(b)) => Ok(Integer(a - b)),
        (Operator::Minus, Float(a), Float(b)) => Ok(Float(a - b)),
        (Operator::Minus, Integer(a), Float(b)) => Ok(Float(*a as f64 - b)),
        (Operator::Minus, Float(a), Integer(b)) => Ok(Float(a - *b as f64)),
        (Operator::Star, Integer(a), Integer(b)) => Ok(Integer(a * b)),
        (Operator::Star, Float(a), Float(b)) => Ok(Float(a * b)),
        (Operator::Star, Integer(a), Float(b)) | (Operator::Star, Float(b), Integer(a)) => {
            Ok(Float(*a as f64 * b))
        }
        (Operator::Slash, Integer(_), Integer(b)) | (Operator::Percent, Integer(_), Integer(b)) if *b == 0 => {
            Err(ParsleyError::new(ErrorKind::DivisionByZero, "division by zero"))
        }
        (Operator::Slash, Integer(a), Integer(b)) => {
            if a % b == 0 {
                Ok(Integer(a / b))
            } else {
                Ok(Float(*a as f64 / *b as f64))
            }
        }
        (Operator::Slash, Float(a), Float(b)) => Ok(Float(a / b)),
        (Operator::Slash, Integer(a), Float(b)) => Ok(Float(*a as f64 / b)),
        (Operator::Slash, Float(a), Integer(b)) => Ok(Float(a / *b as f64)),
        (Operator::Percent, Integer(a), Integer(b)) => Ok(Integer(a % b)),
        (Operator::Percent, Float(a), Float(b)) => Ok(Float(a % b)),

        (Operator::Lt, Integer(a), Integer(b)) => Ok(Boolean(a < b)),
        (Operator::Le, Integer(a), Integer(b)) => Ok(Boolean(a <= b)),
        (Operator::Gt, Integer(a), Integer(b)) => Ok(Boolean(a > b)),
        (Operator::Ge, Integer(a), Integer(b)) => Ok(Boolean(a >= b)),
        (Operator::Lt, Float(a), Float(b)) => Ok(Boolean(a < b)),
        (Operator::Le, Float(a), Float(b)) => Ok(Boolean(a <= b)),
        (Operator::Gt, Float(a), Float(b)) => Ok(Boolean(a > b)),
        (Operator::Ge, Float(a), Float(b)) => Ok(Boolean(a >= b)),
        (Operator::Lt, Integer(a), Float(b)) => Ok(Boolean((*a as f64) < *b)),
        (Operator::Lt, Float(a), Integer(b)) => Ok(Boolean(*a < *b as f64)),
        (Operator::Le, Integer(a), Float(b)) => Ok(Boolean(*a as f64 <= *b)),
        (Operator::Le, Float(a), Integer(b)) => Ok(Boolean(*a <= *b as f64)),
        (Operator::Gt, Integer(a), Float(b)) => Ok(Boolean(*a as f64 > *b)),
        (Operator::Gt, Float(a), Integer(b)) => Ok(Boolean(*a > *b as f64)),
        (Operator::Ge, Integer(a), Float(b)) => Ok(Boolean(*a as f64 >= *b)),
        (Operator::Ge, Float(a), Integer(b)) => Ok(Boolean(*a >= *b as f64)),
        (Operator::Lt, String(a), String(b)) => Ok(Boolean(a < b)),
        (Operator::Le, String(a), String(b)) => Ok(Boolean(a <= b)),
        (Operator::Gt, String(a), String(b)) => Ok(Boolean(a > b)),
        (Operator::Ge, String(a), String(b)) => Ok(Boolean(a >= b)),

        // -- string concatenation --
        (Operator::Plus, String(a), String(b)) => Ok(String(format!("{a}{b}"))),
        (Operator::Plus, String(a), _) => Ok(String(format!("{a}{}", super::Stringify::stringify(right)))),
        (Operator::Plus, _, String(b)) => Ok(String(format!("{}{b}", super::Stringify::stringify(left)))),

        // -- string/array repetition --
        (Operator::Star, String(s), Integer(n)) | (Operator::Star, Integer(n), String(s)) => {
            Ok(String(s.repeat((*n).max(0) as usize)))
        }
        (Operator::Plus, Array(a), Array(b)) => {
            let mut items = a.borrow().clone();
            items.extend(b.borrow().iter().cloned());
            Ok(Value::new_array(items))
        }
        (Operator::Star, Array(a), Integer(n)) | (Operator::Star, Integer(n), Array(a)) => {
            let src = a.borrow();
            let mut items = Vec::with_capacity(src.len() * (*n).max(0) as usize);
            for _ in 0..(*n).max(0) {
                items.extend(src.iter().cloned());
            }
            Ok(Value::new_array(items))
        }

        // -- regex matching --
        (Operator::Tilde, String(s), Regex(r)) => match r.compiled.captures(s) {
            Some(caps) => {
                let groups = caps
                    .iter()
                    .map(|g| g.map(|m| Value::String(m.as_str().to_string())).unwrap_or(Value::Null))
                    .collect();
                Ok(Value::new_array(groups))
            }
            None => Ok(Value::Null),
        },
        (Operator::NotTilde, String(s), Regex(r)) => Ok(Boolean(!r.compiled.is_match(s))),

        // -- datetime/duration arithmetic --
        (Operator::Plus, Datetime(dt), Duration(d)) | (Operator::Plus, Duration(d), Datetime(dt)) => {
            Ok(Value::Datetime(super::Datetime { value: apply_duration(dt.value, *d), kind: dt.kind }))
        }
        (Operator::Minus, Datetime(dt), Duration(d)) => {
            Ok(Value::Datetime(super::Datetime { value: apply_duration(dt.value, d.negate()), kind: dt.kind }))
        }
        (Operator::Plus, Datetime(dt), Integer(secs)) | (Operator::Plus, Integer(secs), Datetime(dt)) => {
            Ok(Value::Datetime(super::Datetime {
                value: dt.value + chrono::Duration::seconds(*secs),
                kind: dt.kind,
            }))
        }
        (Operator::Minus, Datetime(dt), Integer(secs)) => Ok(Value::Datetime(super::Datetime {
            value: dt.value - chrono::Duration::seconds(*secs),
            kind: dt.kind,
        })),
        (Operator::Minus, Datetime(a), Datetime(b)) => {
            let secs = (a.value - b.value).num_seconds();
            Ok(Value::Duration(Duration { seconds: secs, ..Default::default() }))
        }
        (Operator::Plus, Duration(a), Duration(b)) => Ok(Value::Duration(a.add(b))),
        (Operator::Minus, Duration(a), Duration(b)) => Ok(Value::Duration(a.add(&b.negate()))),
        (Operator::Star, Duration(d), Integer(n)) | (Operator::Star, Integer(n), Duration(d)) => {
            Ok(Value::Duration(d.scale(*n)))
        }
        (Operator::Slash, Duration(d), Integer(n)) => {
            if *n == 0 {
                return Err(ParsleyError::new(ErrorKind::DivisionByZero, "division by zero"));
            }
            Ok(Value::Duration(d.scale_down(*n)))
        }
        (Operator::Lt, Datetime(a), Datetime(b)) => Ok(Boolean(a.value < b.value)),
        (Operator::Le, Datetime(a), Datetime(b)) => Ok(Boolean(a.value <= b.value)),
        (Operator::Gt, Datetime(a), Datetime(b)) => Ok(Boolean(a.value > b.value)),
        (Operator::Ge, Datetime(a), Datetime(b)) => Ok(Boolean(a.value >= b.value)),

        // -- path/url joining --
        (Operator::Plus, Path(p), String(s)) => {
            Ok(Value::Path(super::PathValue { raw: p.raw.join(s) }))
        }
        (Operator::Slash, Path(p), String(s)) => {
            Ok(Value::Path(super::PathValue { raw: p.raw.join(s) }))
        }

        _ => Err(type_error(op, left, right)),
    }
}

fn apply_duration(
    dt: chrono::DateTime<chrono::FixedOffset>,
    d: Duration,
) -> chrono::DateTime<chrono::FixedOffset> {
    use chrono::Months;
    let mut dt = dt;
    if d.years != 0 {
        dt = if d.years > 0 {
            dt.checked_add_months(Months::new((d.years * 12) as u32)).unwrap_or(dt)
        } else {
            dt.checked_sub_months(Months::new((-d.years * 12) as u32)).unwrap_or(dt)
        };
    }
    if d.months != 0 {
        dt = if d.months > 0 {
            dt.checked_add_months(Months::new(d.months as u32)).unwrap_or(dt)
        } else {
            dt.checked_sub_months(Months::new((-d.months) as u32)).unwrap_or(dt)
        };
    }
    let seconds = d.seconds + d.minutes * 60 + d.hours * 3600 + d.days * 86_400 + d.weeks * 7 * 86_400;
    dt + chrono::Duration::seconds(seconds)
}

fn dedup_preserve(items: Vec<Value>) -> Vec<Value> {
    let mut out: Vec<Value> = Vec::new();
    for item in items {
        if !out.iter().any(|seen| seen.structural_eq(&item)) {
            out.push(item);
        }
    }
    out
}

fn array_intersection(a: &[Value], b: &[Value]) -> Vec<Value> {
    dedup_preserve(a.iter().filter(|x| b.iter().any(|y| y.structural_eq(x))).cloned().collect())
}

fn array_union(a: &[Value], b: &[Value]) -> Vec<Value> {
    let mut items = a.to_vec();
    items.extend(b.iter().cloned());
    dedup_preserve(items)
}

fn array_difference(a: &[Value], b: &[Value]) -> Vec<Value> {
    a.iter().filter(|x| !b.iter().any(|y| y.structural_eq(x))).cloned().collect()
}

/// `Datetime(date) && Datetime(time)` combines a calendar date with a
/// time-of-day into a single datetime (spec §4.3.1), taking the date's
/// offset as the result's offset.
fn combine_date_time(date: &super::Datetime, time: &super::Datetime) -> super::Datetime {
    use chrono::Timelike;
    let combined = date
        .value
        .with_hour(time.value.hour())
        .and_then(|d| d.with_minute(time.value.minute()))
        .and_then(|d| d.with_second(time.value.second()))
        .unwrap_or(date.value);
    super::Datetime { value: combined, kind: super::DatetimeKind::DateTime }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arr(items: &[i64]) -> Value {
        Value::new_array(items.iter().map(|n| Value::Integer(*n)).collect())
    }

    fn ints(v: &Value) -> Vec<i64> {
        match v {
            Value::Array(a) => a.borrow().iter().map(|x| match x {
                Value::Integer(n) => *n,
                _ => panic!("expected integer element"),
            }).collect(),
            _ => panic!("expected array"),
        }
    }

    #[test]
    fn array_intersection_dedupes_and_preserves_left_order() {
        let result = dispatch_binary(Operator::AndAnd, &arr(&[1, 2, 3]), &arr(&[2, 3, 4])).unwrap();
        assert_eq!(ints(&result), vec![2, 3]);
    }

    #[test]
    fn array_union_dedupes_and_preserves_left_order() {
        let result = dispatch_binary(Operator::OrOr, &arr(&[1, 2, 3]), &arr(&[2, 3, 4])).unwrap();
        assert_eq!(ints(&result), vec![1, 2, 3, 4]);
    }

    #[test]
    fn array_difference_keeps_left_order() {
        let result = dispatch_binary(Operator::Minus, &arr(&[1, 2, 3]), &arr(&[2, 3, 4])).unwrap();
        assert_eq!(ints(&result), vec![1]);
    }

    #[test]
    fn array_concat_via_plusplus() {
        let result = dispatch_binary(Operator::PlusPlus, &arr(&[1, 2, 3]), &arr(&[2, 3, 4])).unwrap();
        assert_eq!(ints(&result), vec![1, 2, 3, 2, 3, 4]);
    }

    #[test]
    fn array_repeat_via_star() {
        let result = dispatch_binary(Operator::Star, &arr(&[1, 2, 3]), &Value::Integer(2)).unwrap();
        assert_eq!(ints(&result), vec![1, 2, 3, 1, 2, 3]);
    }

    #[test]
    fn array_chunk_via_slash() {
        let result = dispatch_binary(Operator::Slash, &arr(&[1, 2, 3]), &Value::Integer(2)).unwrap();
        match result {
            Value::Array(chunks) => {
                let chunks = chunks.borrow();
                assert_eq!(ints(&chunks[0]), vec![1, 2]);
                assert_eq!(ints(&chunks[1]), vec![3]);
            }
            _ => panic!("expected array of chunks"),
        }
    }

    #[test]
    fn chunk_size_zero_is_an_error() {
        assert!(dispatch_binary(Operator::Slash, &arr(&[1, 2, 3]), &Value::Integer(0)).is_err());
    }

    #[test]
    fn numeric_division_by_zero_is_an_error() {
        assert!(dispatch_binary(Operator::Slash, &Value::Integer(1), &Value::Integer(0)).is_err());
    }

    #[test]
    fn structural_equality_is_reflexive_across_int_float() {
        assert!(dispatch_binary(Operator::EqEq, &Value::Integer(2), &Value::Float(2.0)).unwrap().is_truthy());
    }

    #[test]
    fn exact_integer_division_stays_integer() {
        let result = dispatch_binary(Operator::Slash, &Value::Integer(6), &Value::Integer(2)).unwrap();
        assert!(matches!(result, Value::Integer(3)));
    }

    #[test]
    fn inexact_integer_division_promotes_to_float() {
        let result = dispatch_binary(Operator::Slash, &Value::Integer(5), &Value::Integer(2)).unwrap();
        match result {
            Value::Float(f) => assert!((f - 2.5).abs() < f64::EPSILON),
            other => panic!("expected Float(2.5), got {other:?}"),
        }
    }

    #[test]
    fn ordering_compares_mixed_integer_and_float() {
        assert!(dispatch_binary(Operator::Lt, &Value::Integer(2), &Value::Float(3.5)).unwrap().is_truthy());
        assert!(dispatch_binary(Operator::Ge, &Value::Float(3.0), &Value::Integer(1)).unwrap().is_truthy());
        assert!(!dispatch_binary(Operator::Gt, &Value::Integer(1), &Value::Float(1.0)).unwrap().is_truthy());
    }
}
