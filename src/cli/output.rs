//! Handles all user-facing output for the CLI.
//!
//! Previews and check results are rendered here, either as colored text or
//! as JSON, so the command handlers only deal with resolution.

use std::io::{self, Write};

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::errors::EngineError;
use crate::value::ArgumentSet;

/// One resolved declaration, as shown by `preview`.
#[derive(Debug, Serialize)]
pub struct PreviewEntry {
    pub name: String,
    pub signature: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<ArgumentSet>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PreviewEntry {
    pub fn new(
        name: &str,
        signature: String,
        resolved: &Result<Vec<ArgumentSet>, EngineError>,
    ) -> Self {
        let (arguments, error) = match resolved {
            Ok(sets) => (Some(sets.clone()), None),
            Err(err) => (None, Some(err.to_string())),
        };
        Self {
            name: name.to_string(),
            signature,
            arguments,
            error,
        }
    }
}

pub fn stdout(use_colors: bool) -> StandardStream {
    StandardStream::stdout(if use_colors {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    })
}

/// Writes preview entries as indexed argument lists.
pub fn write_preview<W: WriteColor>(out: &mut W, entries: &[PreviewEntry]) -> io::Result<()> {
    for entry in entries {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
        write!(out, "{}", entry.name)?;
        out.reset()?;
        writeln!(out, " {}", entry.signature)?;
        match (&entry.arguments, &entry.error) {
            (Some(sets), _) if sets.is_empty() => writeln!(out, "  (no argument sets)")?,
            (Some(sets), _) => {
                for (i, set) in sets.iter().enumerate() {
                    writeln!(out, "  [{}] {}", i + 1, set)?;
                }
            }
            (None, Some(error)) => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
                writeln!(out, "  error: {}", error)?;
                out.reset()?;
            }
            (None, None) => {}
        }
    }
    Ok(())
}

pub fn print_json(entries: &[PreviewEntry]) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(entries)?);
    Ok(())
}

/// Writes one `ok`/`FAIL` line for a checked declaration.
pub fn write_check_line<W: WriteColor>(
    out: &mut W,
    suite: &str,
    name: &str,
    outcome: Result<usize, &EngineError>,
) -> io::Result<()> {
    match outcome {
        Ok(count) => {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
            write!(out, "ok")?;
            out.reset()?;
            writeln!(out, "   {} :: {} ({} argument sets)", suite, name, count)
        }
        Err(err) => {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
            write!(out, "FAIL")?;
            out.reset()?;
            writeln!(out, " {} :: {}: {}", suite, name, err)
        }
    }
}

/// Renders an error through miette's report handler.
pub fn print_diagnostic(err: EngineError) {
    eprintln!("{:?}", miette::Report::new(err));
}
