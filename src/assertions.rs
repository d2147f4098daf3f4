//! Assertion macros for test bodies.
//!
//! Each macro returns early with an [`AssertionFailure`](crate::errors::AssertionFailure)
//! instead of panicking, so a body reads as a `Result`-returning function.

/// Fails unless the condition holds.
///
/// ```rust
/// use argsource::{ensure, AssertionFailure};
/// fn body(n: i64) -> Result<(), AssertionFailure> {
///     ensure!(n != 9, "unexpected {}", n);
///     Ok(())
/// }
/// assert!(body(9).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr $(,)?) => {
        if !($cond) {
            return Err($crate::errors::AssertionFailure::new(concat!(
                "assertion failed: ",
                stringify!($cond)
            )));
        }
    };
    ($cond:expr, $($arg:tt)+) => {
        if !($cond) {
            return Err($crate::errors::AssertionFailure::new(format!($($arg)+)));
        }
    };
}

/// Fails unless `expected == actual`. The failure carries both sides.
#[macro_export]
macro_rules! ensure_eq {
    ($expected:expr, $actual:expr $(,)?) => {
        $crate::ensure_eq!($expected, $actual, "values differ")
    };
    ($expected:expr, $actual:expr, $($arg:tt)+) => {
        match (&$expected, &$actual) {
            (expected, actual) => {
                if !(*expected == *actual) {
                    return Err($crate::errors::AssertionFailure::mismatch(
                        format!($($arg)+),
                        format!("{:?}", expected),
                        format!("{:?}", actual),
                    ));
                }
            }
        }
    };
}

/// Fails if `unexpected == actual`.
#[macro_export]
macro_rules! ensure_ne {
    ($unexpected:expr, $actual:expr $(,)?) => {
        match (&$unexpected, &$actual) {
            (unexpected, actual) => {
                if *unexpected == *actual {
                    return Err($crate::errors::AssertionFailure::new(format!(
                        "expected a value other than {:?}",
                        unexpected
                    )));
                }
            }
        }
    };
}
