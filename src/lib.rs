//! argsource: declarative argument sources for parameterized tests.
//!
//! A test case binds a body to one [`ArgumentSource`]. The engine resolves the
//! source into argument sets and invokes the body once per set, recording a
//! [`TestResult`] for each.
//!
//! ```rust
//! use argsource::{ensure, run, ArgumentSource, ParamType, Signature, TestCase};
//!
//! let case = TestCase::new(
//!     "second half of the range",
//!     Signature::new([ParamType::Int]),
//!     ArgumentSource::range(0, 20).and(ArgumentSource::values([20])),
//!     |args| {
//!         let n: i64 = args.get(0)?;
//!         ensure!(n >= 0);
//!         Ok(())
//!     },
//! );
//! let results = run(&case).unwrap();
//! assert_eq!(results.len(), 21);
//! assert!(results.iter().all(|r| r.is_pass()));
//! ```

pub use crate::config::RunConfig;
pub use crate::engine::{
    materialize, run, run_all, run_with, CaseReport, Outcome, TestCase, TestResult,
};
pub use crate::errors::{AssertionFailure, EngineError, ErrorType};
pub use crate::source::{resolve, resolve_with, ArgumentSource, Arguments, NumericRange, Provider};
pub use crate::tabular::{TabularInput, TabularSource};
pub use crate::value::{ArgumentSet, EnumType, FromValue, ParamType, Signature, Value};

pub mod assertions;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod report;
pub mod source;
pub mod suite;
pub mod tabular;
pub mod value;
