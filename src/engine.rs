//! Test case execution.
//!
//! A [`TestCase`] binds a body to one [`ArgumentSource`]. Running it happens in
//! two phases:
//!
//! 1. **Resolution**: the source is resolved and every argument set is checked
//!    against the signature. Any error here aborts the case; no body runs.
//! 2. **Invocation**: the body runs once per argument set, in order. Assertion
//!    failures and panics are recorded per set and never stop the iteration.
//!
//! Panics are caught with `catch_unwind`, but the process panic hook still
//! runs first, so a panicking body prints the usual `thread ... panicked`
//! message to stderr. Install a quiet hook with `std::panic::set_hook` around
//! the run if that output is unwanted.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::RunConfig;
use crate::errors::{AssertionFailure, EngineError};
use crate::source::{resolve_with, ArgumentSource};
use crate::value::{ArgumentSet, Signature};

/// The callable under test. Receives one argument set per invocation.
pub type TestBody = Arc<dyn Fn(&ArgumentSet) -> Result<(), AssertionFailure> + Send + Sync>;

/// A test body bound to exactly one argument source.
#[derive(Clone)]
pub struct TestCase {
    name: String,
    signature: Signature,
    source: ArgumentSource,
    body: TestBody,
}

impl TestCase {
    pub fn new<F>(
        name: impl Into<String>,
        signature: Signature,
        source: ArgumentSource,
        body: F,
    ) -> Self
    where
        F: Fn(&ArgumentSet) -> Result<(), AssertionFailure> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            signature,
            source,
            body: Arc::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn source(&self) -> &ArgumentSource {
        &self.source
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Pass,
    Fail,
}

/// The outcome of one argument set's invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    /// 1-based position of the argument set in the resolved sequence.
    pub index: usize,
    pub arguments: ArgumentSet,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<AssertionFailure>,
}

impl TestResult {
    pub fn is_pass(&self) -> bool {
        self.outcome == Outcome::Pass
    }

    pub fn is_fail(&self) -> bool {
        self.outcome == Outcome::Fail
    }
}

/// Resolves a source and checks every produced set against the signature.
/// Returns the sets in resolution order.
pub fn materialize(
    source: &ArgumentSource,
    signature: &Signature,
    config: &RunConfig,
) -> Result<Vec<ArgumentSet>, EngineError> {
    let sets: Vec<ArgumentSet> = resolve_with(source, signature, config)?.collect();
    for (i, set) in sets.iter().enumerate() {
        signature.check(i + 1, set)?;
    }
    Ok(sets)
}

/// Runs a test case with the default configuration.
pub fn run(case: &TestCase) -> Result<Vec<TestResult>, EngineError> {
    run_with(case, &RunConfig::default())
}

/// Runs a test case: one invocation per argument set, failures isolated.
#[tracing::instrument(skip_all, fields(case = %case.name))]
pub fn run_with(case: &TestCase, config: &RunConfig) -> Result<Vec<TestResult>, EngineError> {
    let sets = materialize(&case.source, &case.signature, config)?;
    debug!(count = sets.len(), "resolved argument sets");
    Ok(sets
        .into_iter()
        .enumerate()
        .map(|(i, set)| invoke(&case.body, i + 1, set))
        .collect())
}

fn invoke(body: &TestBody, index: usize, arguments: ArgumentSet) -> TestResult {
    let error = match panic::catch_unwind(AssertUnwindSafe(|| body(&arguments))) {
        Ok(Ok(())) => None,
        Ok(Err(failure)) => Some(failure),
        Err(payload) => Some(AssertionFailure::from_panic(payload.as_ref())),
    };
    match &error {
        Some(failure) => warn!(index, arguments = %arguments, error = %failure, "argument set failed"),
        None => debug!(index, "argument set passed"),
    }
    TestResult {
        index,
        outcome: if error.is_none() {
            Outcome::Pass
        } else {
            Outcome::Fail
        },
        arguments,
        error,
    }
}

/// The outcome of one test case inside a batch run.
#[derive(Debug)]
pub struct CaseReport {
    pub name: String,
    pub results: Result<Vec<TestResult>, EngineError>,
}

impl CaseReport {
    pub fn passed(&self) -> usize {
        self.results
            .as_ref()
            .map_or(0, |r| r.iter().filter(|t| t.is_pass()).count())
    }

    pub fn failed(&self) -> usize {
        self.results
            .as_ref()
            .map_or(0, |r| r.iter().filter(|t| t.is_fail()).count())
    }

    /// True when resolution succeeded and every argument set passed.
    pub fn is_success(&self) -> bool {
        self.results
            .as_ref()
            .is_ok_and(|r| r.iter().all(TestResult::is_pass))
    }
}

/// Runs every case independently. A case that fails to resolve is reported
/// with its error; the remaining cases still run.
pub fn run_all(cases: &[TestCase], config: &RunConfig) -> Vec<CaseReport> {
    cases
        .iter()
        .map(|case| CaseReport {
            name: case.name.clone(),
            results: run_with(case, config),
        })
        .collect()
}
