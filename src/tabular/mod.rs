//! Tabular argument sources.
//!
//! Rows of comma-delimited text, given inline or read from a file, are parsed
//! with a small pest grammar and converted field by field into the declared
//! parameter types. The whole table is converted up front: a single bad field
//! fails resolution before any test body runs.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use tracing::debug;

use crate::config::RunConfig;
use crate::errors::EngineError;
use crate::value::{ArgumentSet, ParamType, Signature};

mod literal;

pub use literal::parse_integer;

#[derive(Parser)]
#[grammar = "tabular/grammar.pest"]
struct RowParser;

/// Where the rows of a tabular source come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabularInput {
    /// One string per row.
    Inline(Vec<String>),
    /// A file, resolved against [`RunConfig::fixture_root`] when relative.
    File(PathBuf),
}

/// A table of delimited rows bound to a test signature at resolution time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularSource {
    pub input: TabularInput,
    /// Leading data rows to drop. Blank and `#` comment lines are not counted.
    pub skip_rows: usize,
    /// Treat the first remaining row as column names.
    pub use_headers: bool,
}

impl TabularSource {
    pub fn inline<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: TabularInput::Inline(rows.into_iter().map(Into::into).collect()),
            skip_rows: 0,
            use_headers: false,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            input: TabularInput::File(path.into()),
            skip_rows: 0,
            use_headers: false,
        }
    }

    pub fn skip_rows(mut self, skip_rows: usize) -> Self {
        self.skip_rows = skip_rows;
        self
    }

    pub fn with_headers(mut self) -> Self {
        self.use_headers = true;
        self
    }

    /// Reads, parses and converts every row.
    pub(crate) fn load(
        &self,
        signature: &Signature,
        config: &RunConfig,
    ) -> Result<Vec<ArgumentSet>, EngineError> {
        if let Some(list) = signature.params().iter().find(|p| matches!(p, ParamType::List(_))) {
            return Err(EngineError::configuration_with_help(
                format!("tabular sources cannot supply {} parameters", list),
                "use a custom provider for list-valued arguments",
            ));
        }

        let lines = self.read_lines(config)?;
        let mut rows = lines
            .into_iter()
            .filter(|(_, line)| {
                let trimmed = line.trim();
                !trimmed.is_empty() && !trimmed.starts_with('#')
            })
            .skip(self.skip_rows);

        let mut names: Option<Arc<[String]>> = None;
        if self.use_headers {
            if let Some((number, line)) = rows.next() {
                let header = parse_row(&line, number)?;
                names = Some(header.into_iter().map(Option::unwrap_or_default).collect());
            }
        }

        let mut sets = Vec::new();
        for (number, line) in rows {
            let fields = parse_row(&line, number)?;
            if fields.len() != signature.arity() {
                return Err(EngineError::ArityMismatch {
                    context: format!("row {}", number),
                    expected: signature.arity(),
                    actual: fields.len(),
                });
            }
            let values = fields
                .iter()
                .zip(signature.params())
                .enumerate()
                .map(|(i, (field, ty))| literal::convert_field(field.as_deref(), ty, number, i + 1))
                .collect::<Result<Vec<_>, _>>()?;
            let set = ArgumentSet::new(values);
            sets.push(match &names {
                Some(names) => set.with_names(names.clone()),
                None => set,
            });
        }
        debug!(rows = sets.len(), headers = names.is_some(), "loaded tabular source");
        Ok(sets)
    }

    /// Returns every line with its 1-based line number.
    fn read_lines(&self, config: &RunConfig) -> Result<Vec<(usize, String)>, EngineError> {
        match &self.input {
            TabularInput::Inline(rows) => Ok(numbered(rows.clone())),
            TabularInput::File(path) => {
                let resolved = config.resolve_path(path);
                let content =
                    fs::read_to_string(&resolved).map_err(|e| EngineError::io(&resolved, e))?;
                Ok(numbered(content.lines().map(str::to_string).collect()))
            }
        }
    }
}

fn numbered(lines: Vec<String>) -> Vec<(usize, String)> {
    lines.into_iter().enumerate().map(|(i, l)| (i + 1, l)).collect()
}

/// Splits one row into fields. `None` marks a null (empty, unquoted) field.
///
/// ```rust
/// use argsource::tabular::parse_row;
/// let fields = parse_row("'lemon, lime', 0xF1", 1).unwrap();
/// assert_eq!(fields, vec![Some("lemon, lime".to_string()), Some("0xF1".to_string())]);
/// ```
pub fn parse_row(line: &str, row: usize) -> Result<Vec<Option<String>>, EngineError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let mut pairs = RowParser::parse(Rule::row, line).map_err(|e| EngineError::MalformedRow {
        row,
        message: e.variant.message().into_owned(),
    })?;
    let Some(row_pair) = pairs.next() else {
        return Ok(Vec::new());
    };
    Ok(row_pair
        .into_inner()
        .filter(|p| p.as_rule() == Rule::field)
        .map(build_field)
        .collect())
}

fn build_field(field: Pair<'_, Rule>) -> Option<String> {
    let inner = field.into_inner().next()?;
    match inner.as_rule() {
        Rule::single_quoted => Some(unquote(inner, "''", "'")),
        Rule::double_quoted => Some(unquote(inner, "\"\"", "\"")),
        Rule::bare => {
            let text = inner.as_str().trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        _ => None,
    }
}

fn unquote(quoted: Pair<'_, Rule>, escaped: &str, quote: &str) -> String {
    quoted
        .into_inner()
        .next()
        .map(|body| body.as_str().replace(escaped, quote))
        .unwrap_or_default()
}
