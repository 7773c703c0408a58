//! Primitive coercion rules shared by the typed getters.
//!
//! Each function reads one primitive tree node (string, number or boolean)
//! as a Rust type. Numbers narrow with a range check, fractional numbers
//! truncate toward zero for integer targets, and strings are parsed.
//! Booleans never coerce to numbers.

use serde_json::{Number, Value};
use std::str::FromStr;

use crate::error::{DocumentError, Result};

/// Short name of a node kind, used in error messages.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Whether the node is a string, number or boolean.
pub fn is_primitive(value: &Value) -> bool {
    matches!(value, Value::Bool(_) | Value::Number(_) | Value::String(_))
}

fn coercion(key: &str, target: &'static str, reason: impl Into<String>) -> DocumentError {
    DocumentError::Coercion {
        key: key.to_owned(),
        target,
        reason: reason.into(),
    }
}

fn out_of_range(key: &str, target: &'static str) -> DocumentError {
    DocumentError::OutOfRange {
        key: key.to_owned(),
        target,
    }
}

fn to_i128(key: &str, value: &Value, target: &'static str, truncate: bool) -> Result<i128> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i128::from(i));
            }
            if let Some(u) = n.as_u64() {
                return Ok(i128::from(u));
            }
            let f = n.as_f64().unwrap_or(f64::NAN);
            if !truncate && f.fract() != 0.0 {
                return Err(coercion(key, target, format!("{n} is not integral")));
            }
            let t = f.trunc();
            // i128::MAX as f64 rounds up to 2^127, which is itself out of range.
            if !t.is_finite() || t < i128::MIN as f64 || t >= i128::MAX as f64 {
                return Err(out_of_range(key, target));
            }
            Ok(t as i128)
        }
        Value::String(s) => s
            .parse::<i128>()
            .map_err(|e| coercion(key, target, format!("{s:?}: {e}"))),
        other => Err(coercion(
            key,
            target,
            format!("{} is not a number", kind_name(other)),
        )),
    }
}

macro_rules! integer_coercions {
    ($($(#[$meta:meta])* $name:ident => $ty:ty),* $(,)?) => {
        $(
            $(#[$meta])*
            pub fn $name(key: &str, value: &Value) -> Result<$ty> {
                let wide = to_i128(key, value, stringify!($ty), true)?;
                <$ty>::try_from(wide).map_err(|_| out_of_range(key, stringify!($ty)))
            }
        )*
    };
}

integer_coercions!(
    /// Reads a node as `i8`.
    to_byte => i8,
    /// Reads a node as `i16`.
    to_short => i16,
    /// Reads a node as `i32`.
    to_int => i32,
    /// Reads a node as `i64`.
    to_long => i64,
);

/// Reads a node as `i128`. Fractional numbers are rejected rather than
/// truncated.
pub fn to_big_integer(key: &str, value: &Value) -> Result<i128> {
    to_i128(key, value, "i128", false)
}

/// Reads a node as `f64`.
pub fn to_double(key: &str, value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| coercion(key, "f64", format!("{n} has no float form"))),
        Value::String(s) => s
            .parse::<f64>()
            .map_err(|e| coercion(key, "f64", format!("{s:?}: {e}"))),
        other => Err(coercion(
            key,
            "f64",
            format!("{} is not a number", kind_name(other)),
        )),
    }
}

/// Reads a node as `f32`. Values beyond the `f32` range become infinite.
pub fn to_float(key: &str, value: &Value) -> Result<f32> {
    match value {
        Value::String(s) => s
            .parse::<f32>()
            .map_err(|e| coercion(key, "f32", format!("{s:?}: {e}"))),
        other => to_double(key, other).map(|f| f as f32),
    }
}

/// Reads a node as a lossless JSON number.
pub fn to_big_decimal(key: &str, value: &Value) -> Result<Number> {
    match value {
        Value::Number(n) => Ok(n.clone()),
        Value::String(s) => {
            Number::from_str(s.trim()).map_err(|e| coercion(key, "number", format!("{s:?}: {e}")))
        }
        other => Err(coercion(
            key,
            "number",
            format!("{} is not a number", kind_name(other)),
        )),
    }
}

/// Reads a node as `bool`. Only `true` (any ASCII case) is truthy for
/// strings; numbers are always false.
pub fn to_boolean(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Renders a primitive node as a string. Non-primitives yield `None`.
pub fn to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Reads the first character of a primitive's string rendering.
pub fn to_char(key: &str, value: &Value) -> Result<char> {
    to_string(value)
        .and_then(|s| s.chars().next())
        .ok_or_else(|| coercion(key, "char", "empty string has no first character"))
}
