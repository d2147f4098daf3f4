//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use argsource::{ArgumentSet, EnumType, ParamType, Signature, Value};
use strum::{EnumIter, IntoStaticStr};

/// Calendar units, declared in the order a date library lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ChronoUnit {
    Nanos,
    Micros,
    Millis,
    Seconds,
    Minutes,
    Hours,
    HalfDays,
    Days,
    Weeks,
    Months,
    Years,
    Decades,
    Centuries,
    Millennia,
    Eras,
    Forever,
}

pub fn chrono_unit() -> EnumType {
    EnumType::of::<ChronoUnit>()
}

pub fn strings() -> Signature {
    Signature::new([ParamType::Str])
}

pub fn ints() -> Signature {
    Signature::new([ParamType::Int])
}

pub fn string_and_int() -> Signature {
    Signature::new([ParamType::Str, ParamType::Int])
}

/// Reads a string parameter that may be null.
pub fn text(set: &ArgumentSet) -> Option<String> {
    match set.value(0) {
        Some(Value::Str(s)) => Some(s.clone()),
        _ => None,
    }
}

pub fn is_palindrome(candidate: &str) -> bool {
    let chars: Vec<char> = candidate.chars().collect();
    chars.iter().eq(chars.iter().rev())
}
