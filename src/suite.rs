//! YAML suite files: argument sources declared as data.
//!
//! A suite names enum types and lists source declarations, each with the
//! parameter types of the test it feeds. Suites let fixture data be checked
//! and previewed without compiling any test code.
//!
//! # Format
//!
//! ```yaml
//! enums:
//!   Fruit: [APPLE, LEMON]
//! sources:
//!   - name: palindromes
//!     params: [str]
//!     values: [racecar, radar]
//!   - name: blanks
//!     params: [str]
//!     null_and_empty: true
//!     values: [" ", "\t"]
//!   - name: fruits
//!     params: [Fruit]
//!     enum: auto              # or an enum name
//!   - name: second_half
//!     params: [int]
//!     range: { start: 0, end: 20, skip: 10 }
//!   - name: ranks
//!     params: [str, int]
//!     csv: ["apple, 1", "'lemon, lime', 0xF1"]
//!   - name: countries
//!     params: [str, int]
//!     csv_file: two-column.csv # relative to the suite file
//!     skip_rows: 1
//! ```
//!
//! Parameter types are `str`, `int`, `bool`, `list<T>`, or a declared enum name.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use walkdir::WalkDir;

use crate::errors::EngineError;
use crate::source::{ArgumentSource, NumericRange};
use crate::tabular::TabularSource;
use crate::value::{EnumType, ParamType, Signature, Value};

// =============================================================================
// FILE FORMAT
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SuiteFile {
    #[serde(default)]
    enums: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    sources: Vec<SourceDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SourceDecl {
    name: String,
    params: Vec<String>,
    #[serde(default)]
    null: bool,
    #[serde(default)]
    empty: bool,
    #[serde(default)]
    null_and_empty: bool,
    values: Option<Vec<serde_yaml::Value>>,
    #[serde(rename = "enum")]
    enum_name: Option<String>,
    range: Option<RangeDecl>,
    csv: Option<Vec<String>>,
    csv_file: Option<PathBuf>,
    #[serde(default)]
    skip_rows: usize,
    #[serde(default)]
    use_headers: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RangeDecl {
    start: i64,
    end: i64,
    #[serde(default = "default_step")]
    step: i64,
    #[serde(default)]
    skip: usize,
}

fn default_step() -> i64 {
    1
}

/// Enum name in a declaration that asks for inference from the parameter type.
const INFER_ENUM: &str = "auto";

// =============================================================================
// LOADED SUITES
// =============================================================================

/// One declared source, ready to resolve.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub name: String,
    pub signature: Signature,
    pub source: ArgumentSource,
}

/// A loaded suite file.
#[derive(Debug, Clone)]
pub struct Suite {
    pub path: PathBuf,
    pub declarations: Vec<Declaration>,
}

/// Discovers all YAML files recursively under the given root directory.
pub fn discover_suite_files<P: AsRef<Path>>(root: P) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file()
                && e.path()
                    .extension()
                    .is_some_and(|ext| ext == "yaml" || ext == "yml")
        })
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}

/// Reads and parses a suite file. Relative `csv_file` paths are resolved
/// against the suite's directory.
pub fn load_suite(path: &Path) -> Result<Suite, EngineError> {
    let content = fs::read_to_string(path).map_err(|e| EngineError::io(path, e))?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let declarations = parse_suite(&content, base).map_err(|err| match err {
        EngineError::Configuration { message, help } => EngineError::Configuration {
            message: format!("{}: {}", path.display(), message),
            help,
        },
        other => other,
    })?;
    Ok(Suite {
        path: path.to_path_buf(),
        declarations,
    })
}

/// Parses suite YAML. `base` anchors relative tabular file paths.
pub fn parse_suite(content: &str, base: &Path) -> Result<Vec<Declaration>, EngineError> {
    let file: SuiteFile = serde_yaml::from_str(content).map_err(|e| {
        EngineError::configuration_with_help(
            format!("invalid suite file: {}", e),
            "see the suite format in the `suite` module documentation",
        )
    })?;

    let enums: BTreeMap<String, EnumType> = file
        .enums
        .into_iter()
        .map(|(name, constants)| (name.clone(), EnumType::new(name, constants)))
        .collect();

    file.sources
        .into_iter()
        .map(|decl| build_declaration(decl, &enums, base))
        .collect()
}

fn build_declaration(
    decl: SourceDecl,
    enums: &BTreeMap<String, EnumType>,
    base: &Path,
) -> Result<Declaration, EngineError> {
    let signature = Signature::new(
        decl.params
            .iter()
            .map(|p| parse_param_type(p, enums))
            .collect::<Result<Vec<_>, _>>()?,
    );
    let in_decl = |message: String| {
        EngineError::configuration(format!("source '{}': {}", decl.name, message))
    };

    let mut parts = Vec::new();
    if decl.null_and_empty || (decl.null && decl.empty) {
        parts.push(ArgumentSource::NullAndEmptyMarker);
    } else if decl.null {
        parts.push(ArgumentSource::NullMarker);
    } else if decl.empty {
        parts.push(ArgumentSource::EmptyMarker);
    }
    if let Some(values) = &decl.values {
        let values = values
            .iter()
            .map(yaml_to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(in_decl)?;
        parts.push(ArgumentSource::Literal(values));
    }
    if let Some(name) = &decl.enum_name {
        let explicit = if name == INFER_ENUM {
            None
        } else {
            Some(
                enums
                    .get(name)
                    .cloned()
                    .ok_or_else(|| in_decl(format!("unknown enum '{}'", name)))?,
            )
        };
        parts.push(ArgumentSource::EnumRange(explicit));
    }
    if let Some(range) = &decl.range {
        parts.push(ArgumentSource::NumericRange(
            NumericRange::new(range.start, range.end)
                .step(range.step)
                .skip(range.skip),
        ));
    }
    if let Some(rows) = &decl.csv {
        parts.push(ArgumentSource::Tabular(configure(
            TabularSource::inline(rows.iter().cloned()),
            &decl,
        )));
    }
    if let Some(file) = &decl.csv_file {
        parts.push(ArgumentSource::Tabular(configure(
            TabularSource::file(base.join(file)),
            &decl,
        )));
    }

    let source = match parts.len() {
        0 => return Err(in_decl("declares no argument source".to_string())),
        1 => parts.remove(0),
        _ => ArgumentSource::Combined(parts),
    };
    Ok(Declaration {
        name: decl.name,
        signature,
        source,
    })
}

fn configure(table: TabularSource, decl: &SourceDecl) -> TabularSource {
    let table = table.skip_rows(decl.skip_rows);
    if decl.use_headers {
        table.with_headers()
    } else {
        table
    }
}

/// Parses a parameter type name: `str`, `int`, `bool`, `list<T>` or an enum name.
pub fn parse_param_type(
    text: &str,
    enums: &BTreeMap<String, EnumType>,
) -> Result<ParamType, EngineError> {
    let text = text.trim();
    match text {
        "str" | "string" | "String" => return Ok(ParamType::Str),
        "int" | "i64" => return Ok(ParamType::Int),
        "bool" => return Ok(ParamType::Bool),
        _ => {}
    }
    if let Some(item) = text
        .strip_prefix("list<")
        .or_else(|| text.strip_prefix("List<"))
        .and_then(|rest| rest.strip_suffix('>'))
    {
        return Ok(ParamType::list_of(parse_param_type(item, enums)?));
    }
    enums
        .get(text)
        .map(|e| ParamType::Enum(e.clone()))
        .ok_or_else(|| {
            EngineError::configuration_with_help(
                format!("unknown parameter type '{}'", text),
                "use str, int, bool, list<T>, or an enum declared under `enums`",
            )
        })
}

fn yaml_to_value(value: &serde_yaml::Value) -> Result<Value, String> {
    match value {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => n
            .as_i64()
            .map(Value::Int)
            .ok_or_else(|| format!("number {} is not a 64-bit integer", n)),
        serde_yaml::Value::String(s) => Ok(Value::Str(s.clone())),
        serde_yaml::Value::Sequence(items) => items
            .iter()
            .map(yaml_to_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        serde_yaml::Value::Mapping(_) => Err("mappings are not valid argument values".to_string()),
        serde_yaml::Value::Tagged(tagged) => yaml_to_value(&tagged.value),
    }
}
