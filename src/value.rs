use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::errors::{AssertionFailure, EngineError};

/// Represents one argument value handed to a test body.
///
/// # Examples
///
/// ```rust
/// use argsource::value::Value;
/// let n = Value::Int(241);
/// assert_eq!(n.type_name(), "int");
/// let s = Value::from("lemon, lime");
/// assert_eq!(s.type_name(), "String");
/// assert!(Value::default().is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<Value>),
    Enum {
        type_name: Arc<str>,
        constant: Arc<str>,
    },
}

impl Value {
    /// Returns the type name of the value as a string.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Str(_) => "String",
            Value::List(_) => "List",
            Value::Enum { .. } => "enum",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            Value::Enum { constant, .. } => Some(constant.as_ref()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Enum { constant, .. } => write!(f, "{}", constant),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

// ============================================================================
// ENUM TYPES
// ============================================================================

/// An enum type known by name and its constants in declaration order.
///
/// Rust enums deriving `strum::EnumIter` and `strum::IntoStaticStr` can be
/// described with [`EnumType::of`]; anything else is built with [`EnumType::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    name: Arc<str>,
    constants: Arc<[Arc<str>]>,
}

impl EnumType {
    pub fn new<I, S>(name: impl Into<Arc<str>>, constants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        Self {
            name: name.into(),
            constants: constants.into_iter().map(Into::into).collect(),
        }
    }

    /// Describes a Rust enum through its strum derives.
    ///
    /// ```rust
    /// use argsource::value::EnumType;
    /// use strum::{EnumIter, IntoStaticStr};
    ///
    /// #[derive(Clone, Copy, EnumIter, IntoStaticStr)]
    /// enum Fruit { Apple, Lemon }
    ///
    /// let ty = EnumType::of::<Fruit>();
    /// assert_eq!(ty.name(), "Fruit");
    /// assert_eq!(ty.constants().collect::<Vec<_>>(), ["Apple", "Lemon"]);
    /// ```
    pub fn of<E>() -> Self
    where
        E: strum::IntoEnumIterator,
        &'static str: From<E>,
    {
        let full = std::any::type_name::<E>();
        let name = full.rsplit("::").next().unwrap_or(full);
        Self::new(name, E::iter().map(<&'static str>::from))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }

    pub fn constants(&self) -> impl Iterator<Item = &str> + '_ {
        self.constants.iter().map(|c| c.as_ref())
    }

    /// Returns the constant at `index` (declaration order) as a value.
    pub fn value_at(&self, index: usize) -> Option<Value> {
        self.constants.get(index).map(|constant| Value::Enum {
            type_name: self.name.clone(),
            constant: constant.clone(),
        })
    }

    /// Looks a constant up by name.
    pub fn constant(&self, name: &str) -> Option<Value> {
        self.constants
            .iter()
            .position(|c| c.as_ref() == name)
            .and_then(|i| self.value_at(i))
    }
}

// ============================================================================
// PARAMETER TYPES AND SIGNATURES
// ============================================================================

/// The declared type of one positional test parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    Str,
    Int,
    Bool,
    List(Box<ParamType>),
    Enum(EnumType),
}

impl ParamType {
    pub fn list_of(item: ParamType) -> Self {
        ParamType::List(Box::new(item))
    }

    /// Reference-like parameters may receive `null`; `int` and `bool` may not.
    pub fn is_nullable(&self) -> bool {
        matches!(self, ParamType::Str | ParamType::List(_) | ParamType::Enum(_))
    }

    /// The empty value for this type, if it has one.
    pub fn empty_value(&self) -> Option<Value> {
        match self {
            ParamType::Str => Some(Value::Str(String::new())),
            ParamType::List(_) => Some(Value::List(Vec::new())),
            _ => None,
        }
    }

    /// Checks a value against this type without any coercion.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (ty, Value::Null) => ty.is_nullable(),
            (ParamType::Str, Value::Str(_))
            | (ParamType::Int, Value::Int(_))
            | (ParamType::Bool, Value::Bool(_)) => true,
            (ParamType::List(item), Value::List(items)) => items.iter().all(|v| item.accepts(v)),
            (ParamType::Enum(ty), Value::Enum { type_name, constant }) => {
                ty.name() == type_name.as_ref() && ty.constants().any(|c| c == constant.as_ref())
            }
            _ => false,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Str => write!(f, "String"),
            ParamType::Int => write!(f, "int"),
            ParamType::Bool => write!(f, "bool"),
            ParamType::List(item) => write!(f, "List<{}>", item),
            ParamType::Enum(ty) => write!(f, "{}", ty.name()),
        }
    }
}

/// The ordered parameter types of a test body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Signature {
    params: Vec<ParamType>,
}

impl Signature {
    pub fn new(params: impl IntoIterator<Item = ParamType>) -> Self {
        Self {
            params: params.into_iter().collect(),
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn params(&self) -> &[ParamType] {
        &self.params
    }

    /// The only parameter, when there is exactly one.
    pub fn sole(&self) -> Option<&ParamType> {
        match self.params.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Verifies that an argument set matches this signature in arity and in
    /// every position's type. `index` is the 1-based position of the set.
    pub fn check(&self, index: usize, set: &ArgumentSet) -> Result<(), EngineError> {
        if set.len() != self.arity() {
            return Err(EngineError::ArityMismatch {
                context: format!("argument set {}", index),
                expected: self.arity(),
                actual: set.len(),
            });
        }
        for (position, (ty, value)) in self.params.iter().zip(set.values()).enumerate() {
            if !ty.accepts(value) {
                return Err(EngineError::TypeMismatch {
                    index,
                    position: position + 1,
                    expected: ty.to_string(),
                    actual: value.type_name().to_string(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", p)?;
        }
        write!(f, ")")
    }
}

// ============================================================================
// ARGUMENT SETS
// ============================================================================

/// One invocation's inputs. Immutable once produced.
///
/// Column names, when present, come from a tabular header and are metadata
/// only: they never change the value count or order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ArgumentSet {
    values: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    names: Option<Arc<[String]>>,
}

impl ArgumentSet {
    pub fn new(values: Vec<Value>) -> Self {
        Self {
            values,
            names: None,
        }
    }

    /// A 1-tuple.
    pub fn single(value: Value) -> Self {
        Self::new(vec![value])
    }

    pub fn with_names(mut self, names: Arc<[String]>) -> Self {
        self.names = Some(names);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn names(&self) -> Option<&[String]> {
        self.names.as_deref()
    }

    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Typed access to the argument at `index` (0-based). Returns an
    /// assertion failure so test bodies can use `?`.
    pub fn get<T: FromValue>(&self, index: usize) -> Result<T, AssertionFailure> {
        let value = self.values.get(index).ok_or_else(|| {
            AssertionFailure::new(format!(
                "argument {} requested but the set has {} value(s)",
                index,
                self.values.len()
            ))
        })?;
        T::from_value(value).ok_or_else(|| {
            AssertionFailure::new(format!(
                "argument {} is {} ({}), which cannot be read as {}",
                index,
                value.type_name(),
                value,
                std::any::type_name::<T>()
            ))
        })
    }
}

impl fmt::Display for ArgumentSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match self.names.as_deref().and_then(|n| n.get(i)) {
                Some(name) => write!(f, "{} = {}", name, value)?,
                None => write!(f, "{}", value)?,
            }
        }
        Ok(())
    }
}

/// Builds an [`ArgumentSet`] from anything convertible into [`Value`].
///
/// ```rust
/// use argsource::arguments;
/// let set = arguments!("apple", 1, vec!["a", "b"]);
/// assert_eq!(set.len(), 3);
/// ```
#[macro_export]
macro_rules! arguments {
    ($($value:expr),* $(,)?) => {
        $crate::value::ArgumentSet::new(vec![$($crate::value::Value::from($value)),*])
    };
}

/// Conversion out of a [`Value`] for typed argument access.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Str(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_int()
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_int().and_then(|n| i32::try_from(n).ok())
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Option<Self> {
        value
            .as_list()?
            .iter()
            .map(T::from_value)
            .collect::<Option<Vec<_>>>()
    }
}
