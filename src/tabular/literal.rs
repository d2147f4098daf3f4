//! Conversion of tabular text fields into typed values.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::EngineError;
use crate::value::{ParamType, Value};

/// Optional sign, then either `0x` hex digits or decimal digits, with single
/// underscores allowed between digits.
static INTEGER_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([+-])?(?:0[xX]([0-9A-Fa-f](?:_?[0-9A-Fa-f])*)|([0-9](?:_?[0-9])*))$").unwrap()
});

/// Parses an integer literal: decimal, `0x`-prefixed hexadecimal, `_`-grouped.
///
/// ```rust
/// use argsource::tabular::parse_integer;
/// assert_eq!(parse_integer("0xF1"), Some(241));
/// assert_eq!(parse_integer("700_000"), Some(700_000));
/// assert_eq!(parse_integer("-12"), Some(-12));
/// assert_eq!(parse_integer("notanumber"), None);
/// ```
pub fn parse_integer(text: &str) -> Option<i64> {
    let caps = INTEGER_LITERAL.captures(text)?;
    let sign = caps.get(1).map_or("", |m| m.as_str());
    let (digits, radix) = match (caps.get(2), caps.get(3)) {
        (Some(hex), _) => (hex.as_str(), 16),
        (None, Some(dec)) => (dec.as_str(), 10),
        (None, None) => return None,
    };
    let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
    i64::from_str_radix(&format!("{}{}", sign, cleaned), radix).ok()
}

/// Converts one field to the declared parameter type. `None` is a null field.
/// `row` and `column` are 1-based and only used for error reporting.
pub(crate) fn convert_field(
    field: Option<&str>,
    ty: &ParamType,
    row: usize,
    column: usize,
) -> Result<Value, EngineError> {
    let parse_error = |value: &str| EngineError::ArgumentParse {
        row,
        column,
        value: value.to_string(),
        expected: ty.to_string(),
    };

    let Some(text) = field else {
        return if ty.is_nullable() {
            Ok(Value::Null)
        } else {
            Err(parse_error("null"))
        };
    };

    match ty {
        ParamType::Str => Ok(Value::Str(text.to_string())),
        ParamType::Int => parse_integer(text).map(Value::Int).ok_or_else(|| parse_error(text)),
        ParamType::Bool => {
            if text.eq_ignore_ascii_case("true") {
                Ok(Value::Bool(true))
            } else if text.eq_ignore_ascii_case("false") {
                Ok(Value::Bool(false))
            } else {
                Err(parse_error(text))
            }
        }
        ParamType::Enum(enum_type) => enum_type.constant(text).ok_or_else(|| parse_error(text)),
        ParamType::List(_) => Err(parse_error(text)),
    }
}
