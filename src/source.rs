//! Argument source descriptors and their resolution.
//!
//! An [`ArgumentSource`] is a plain value built once when a test case is
//! registered. [`resolve`] turns it into a lazy iterator of argument sets.
//! Every call starts from scratch, so a source can be resolved again within
//! the same run (a retry re-invokes custom providers).
//!
//! Resolution errors surface from `resolve` itself, before the first argument
//! set is yielded. Tabular sources are converted in full at that point.

use std::fmt;
use std::iter;
use std::sync::Arc;

use tracing::debug;

use crate::config::RunConfig;
use crate::errors::EngineError;
use crate::tabular::TabularSource;
use crate::value::{ArgumentSet, EnumType, ParamType, Signature, Value};

/// A lazy, finite sequence of argument sets.
pub type Arguments = Box<dyn Iterator<Item = ArgumentSet>>;

type Generator = dyn Fn() -> Arguments + Send + Sync;

/// A zero-argument function producing argument sets on demand.
///
/// The function may consult external context (environment, files) but must be
/// deterministic given that context.
#[derive(Clone)]
pub struct Provider {
    name: Arc<str>,
    generate: Arc<Generator>,
}

impl Provider {
    pub fn new<F, I>(name: impl Into<Arc<str>>, generate: F) -> Self
    where
        F: Fn() -> I + Send + Sync + 'static,
        I: IntoIterator<Item = ArgumentSet>,
        I::IntoIter: 'static,
    {
        Self {
            name: name.into(),
            generate: Arc::new(move || Box::new(generate().into_iter()) as Arguments),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn generate(&self) -> Arguments {
        (self.generate)()
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider").field("name", &self.name).finish()
    }
}

/// An integer range: `start` inclusive, `end` exclusive, stepping by `step`,
/// with the first `skip` generated values dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericRange {
    pub start: i64,
    pub end: i64,
    pub step: i64,
    pub skip: usize,
}

impl NumericRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self {
            start,
            end,
            step: 1,
            skip: 0,
        }
    }

    pub fn step(mut self, step: i64) -> Self {
        self.step = step;
        self
    }

    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    /// The generated values. A negative step counts down towards `end`.
    pub fn values(&self) -> Result<impl Iterator<Item = i64>, EngineError> {
        let NumericRange {
            start,
            end,
            step,
            skip,
        } = *self;
        if step == 0 {
            return Err(EngineError::configuration("numeric range step must not be zero"));
        }
        let in_range = move |n: &i64| if step > 0 { *n < end } else { *n > end };
        let first = Some(start).filter(in_range);
        Ok(iter::successors(first, move |n| n.checked_add(step).filter(in_range)).skip(skip))
    }
}

/// A declarative description of where a test's arguments come from.
#[derive(Debug, Clone)]
pub enum ArgumentSource {
    /// Each value as a 1-tuple, in declaration order.
    Literal(Vec<Value>),
    /// A single `null`.
    NullMarker,
    /// A single empty value of the sole parameter type.
    EmptyMarker,
    /// `null`, then the empty value.
    NullAndEmptyMarker,
    /// Every constant of an enum type. `None` infers the type from the
    /// signature's sole parameter.
    EnumRange(Option<EnumType>),
    NumericRange(NumericRange),
    Tabular(TabularSource),
    Custom(Provider),
    /// Several sources on one test case. Null and empty markers are yielded
    /// first (null, then empty), then the other sources in declaration order.
    Combined(Vec<ArgumentSource>),
}

impl ArgumentSource {
    pub fn values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        ArgumentSource::Literal(values.into_iter().map(Into::into).collect())
    }

    pub fn range(start: i64, end: i64) -> Self {
        ArgumentSource::NumericRange(NumericRange::new(start, end))
    }

    pub fn enum_of(enum_type: EnumType) -> Self {
        ArgumentSource::EnumRange(Some(enum_type))
    }

    pub fn inferred_enum() -> Self {
        ArgumentSource::EnumRange(None)
    }

    pub fn csv<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ArgumentSource::Tabular(TabularSource::inline(rows))
    }

    pub fn provider<F, I>(name: &str, generate: F) -> Self
    where
        F: Fn() -> I + Send + Sync + 'static,
        I: IntoIterator<Item = ArgumentSet>,
        I::IntoIter: 'static,
    {
        ArgumentSource::Custom(Provider::new(name, generate))
    }

    /// Adds another source to this one. Nested combinations are flattened.
    pub fn and(self, other: ArgumentSource) -> Self {
        let mut parts = match self {
            ArgumentSource::Combined(parts) => parts,
            single => vec![single],
        };
        match other {
            ArgumentSource::Combined(more) => parts.extend(more),
            single => parts.push(single),
        }
        ArgumentSource::Combined(parts)
    }

    /// Prepends `null` and the empty value to this source.
    pub fn with_null_and_empty(self) -> Self {
        ArgumentSource::NullAndEmptyMarker.and(self)
    }

    /// Short name of the variant, used in logs and previews.
    pub fn kind(&self) -> &'static str {
        match self {
            ArgumentSource::Literal(_) => "literal",
            ArgumentSource::NullMarker => "null",
            ArgumentSource::EmptyMarker => "empty",
            ArgumentSource::NullAndEmptyMarker => "null-and-empty",
            ArgumentSource::EnumRange(_) => "enum",
            ArgumentSource::NumericRange(_) => "range",
            ArgumentSource::Tabular(_) => "tabular",
            ArgumentSource::Custom(_) => "provider",
            ArgumentSource::Combined(_) => "combined",
        }
    }

    fn is_marker(&self) -> bool {
        matches!(
            self,
            ArgumentSource::NullMarker
                | ArgumentSource::EmptyMarker
                | ArgumentSource::NullAndEmptyMarker
        )
    }
}

/// Resolves `source` for a test with the given signature, using the default
/// run configuration.
pub fn resolve(source: &ArgumentSource, signature: &Signature) -> Result<Arguments, EngineError> {
    resolve_with(source, signature, &RunConfig::default())
}

/// Resolves `source` into a lazy sequence of argument sets.
pub fn resolve_with(
    source: &ArgumentSource,
    signature: &Signature,
    config: &RunConfig,
) -> Result<Arguments, EngineError> {
    debug!(source = source.kind(), signature = %signature, "resolving argument source");
    match source {
        ArgumentSource::Literal(values) => {
            Ok(Box::new(values.clone().into_iter().map(ArgumentSet::single)))
        }
        ArgumentSource::NullMarker => Ok(Box::new(iter::once(ArgumentSet::single(Value::Null)))),
        ArgumentSource::EmptyMarker => {
            let empty = empty_value(signature)?;
            Ok(Box::new(iter::once(ArgumentSet::single(empty))))
        }
        ArgumentSource::NullAndEmptyMarker => {
            let empty = empty_value(signature)?;
            Ok(Box::new([Value::Null, empty].into_iter().map(ArgumentSet::single)))
        }
        ArgumentSource::EnumRange(explicit) => {
            let enum_type = enum_type(explicit.as_ref(), signature)?;
            Ok(Box::new(
                (0..enum_type.len())
                    .filter_map(move |i| enum_type.value_at(i))
                    .map(ArgumentSet::single),
            ))
        }
        ArgumentSource::NumericRange(range) => Ok(Box::new(
            range.values()?.map(|n| ArgumentSet::single(Value::Int(n))),
        )),
        ArgumentSource::Tabular(table) => Ok(Box::new(table.load(signature, config)?.into_iter())),
        ArgumentSource::Custom(provider) => Ok(provider.generate()),
        ArgumentSource::Combined(parts) => resolve_combined(parts, signature, config),
    }
}

fn resolve_combined(
    nested: &[ArgumentSource],
    signature: &Signature,
    config: &RunConfig,
) -> Result<Arguments, EngineError> {
    let mut parts = Vec::new();
    flatten(nested, &mut parts);

    let wants_null = parts.iter().any(|p| {
        matches!(
            p,
            ArgumentSource::NullMarker | ArgumentSource::NullAndEmptyMarker
        )
    });
    let wants_empty = parts.iter().any(|p| {
        matches!(
            p,
            ArgumentSource::EmptyMarker | ArgumentSource::NullAndEmptyMarker
        )
    });

    let mut head = Vec::new();
    if wants_null {
        head.push(ArgumentSet::single(Value::Null));
    }
    if wants_empty {
        head.push(ArgumentSet::single(empty_value(signature)?));
    }

    // Resolve everything first so errors surface before iteration begins.
    let rest = parts
        .iter()
        .filter(|p| !p.is_marker())
        .map(|p| resolve_with(p, signature, config))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Box::new(head.into_iter().chain(rest.into_iter().flatten())))
}

/// Collects the leaves of nested combinations, in declaration order.
fn flatten<'a>(parts: &'a [ArgumentSource], out: &mut Vec<&'a ArgumentSource>) {
    for part in parts {
        match part {
            ArgumentSource::Combined(inner) => flatten(inner, out),
            leaf => out.push(leaf),
        }
    }
}

fn empty_value(signature: &Signature) -> Result<Value, EngineError> {
    signature
        .sole()
        .and_then(ParamType::empty_value)
        .ok_or_else(|| {
            EngineError::configuration_with_help(
                format!("an empty marker cannot supply a test with signature {}", signature),
                "empty values exist only for a single String or List parameter",
            )
        })
}

fn enum_type(explicit: Option<&EnumType>, signature: &Signature) -> Result<EnumType, EngineError> {
    match (explicit, signature.sole()) {
        (Some(declared), Some(ParamType::Enum(param))) if declared != param => {
            Err(EngineError::configuration(format!(
                "enum source {} does not match parameter type {}",
                declared.name(),
                param.name()
            )))
        }
        (Some(declared), _) => Ok(declared.clone()),
        (None, Some(ParamType::Enum(param))) => Ok(param.clone()),
        (None, Some(other)) => Err(EngineError::configuration_with_help(
            format!("cannot infer enum type: parameter type {} is not an enum", other),
            "declare the enum type on the source explicitly",
        )),
        (None, None) => Err(EngineError::configuration_with_help(
            format!(
                "cannot infer enum type: expected exactly one parameter, found {}",
                signature.arity()
            ),
            "declare the enum type on the source explicitly",
        )),
    }
}
