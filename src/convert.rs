//! Ready-made converters for the common scalar field types.
//!
//! A converter is any callable from a raw document string to a
//! [`Value`](crate::Value); these cover the usual cases so field
//! specifications can say `FieldSpec::scalar(convert::integer())` without
//! writing a closure.

use std::rc::Rc;

use crate::value::{Converter, Value};

/// Take the raw string as-is.
pub fn string() -> Converter {
    Rc::new(|raw| Ok(Value::String(raw.to_string())))
}

/// Parse a (possibly whitespace-padded) signed integer.
pub fn integer() -> Converter {
    Rc::new(|raw| {
        raw.trim()
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|e| format!("invalid integer \"{}\": {}", raw, e))
    })
}

/// Parse a floating-point number.
pub fn float() -> Converter {
    Rc::new(|raw| {
        raw.trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|e| format!("invalid number \"{}\": {}", raw, e))
    })
}

/// Parse `true`/`false` or `1`/`0`.
pub fn boolean() -> Converter {
    Rc::new(|raw| match raw.trim() {
        "true" | "1" => Ok(Value::Boolean(true)),
        "false" | "0" => Ok(Value::Boolean(false)),
        _ => Err(format!("invalid boolean \"{}\"", raw)),
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("30", 30)]
    #[case(" 7 ", 7)]
    #[case("-4", -4)]
    fn integer_accepts(#[case] raw: &str, #[case] expected: i64) {
        assert_eq!((integer())(raw).unwrap(), Value::Integer(expected));
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("1.5")]
    fn integer_rejects(#[case] raw: &str) {
        assert!((integer())(raw).is_err());
    }

    #[rstest]
    #[case("true", true)]
    #[case("1", true)]
    #[case("false", false)]
    #[case("0", false)]
    fn boolean_accepts(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!((boolean())(raw).unwrap(), Value::Boolean(expected));
    }

    #[rstest]
    #[case("yes")]
    #[case("TRUE")]
    #[case("")]
    fn boolean_rejects(#[case] raw: &str) {
        assert!((boolean())(raw).is_err());
    }

    #[rstest]
    #[case("1.5", 1.5)]
    #[case("-0.25", -0.25)]
    #[case("3", 3.0)]
    fn float_accepts(#[case] raw: &str, #[case] expected: f64) {
        assert_eq!((float())(raw).unwrap(), Value::Float(expected));
    }
}
