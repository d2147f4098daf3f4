//! The argsource Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::path::Path;
use std::process;

use clap::Parser;
use tracing::info;

use crate::cli::args::{ArgsourceArgs, Command};
use crate::cli::output::PreviewEntry;
use crate::config::RunConfig;
use crate::engine::materialize;
use crate::errors::EngineError;
use crate::suite::{discover_suite_files, load_suite};

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = ArgsourceArgs::parse();
    let config = RunConfig::default();
    let config = if args.no_color {
        config.with_colors(false)
    } else {
        config
    };

    let result = match args.command {
        Command::Preview { file, json } => handle_preview(&file, json, &config),
        Command::Check { path } => handle_check(&path, &config),
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            output::print_diagnostic(err);
            process::exit(1);
        }
    }
}

/// Handles the `preview` subcommand. Returns whether every source resolved.
fn handle_preview(file: &Path, json: bool, config: &RunConfig) -> Result<bool, EngineError> {
    let suite = load_suite(file)?;
    let entries: Vec<PreviewEntry> = suite
        .declarations
        .iter()
        .map(|decl| {
            let resolved = materialize(&decl.source, &decl.signature, config);
            PreviewEntry::new(&decl.name, decl.signature.to_string(), &resolved)
        })
        .collect();
    let all_resolved = entries.iter().all(|e| e.error.is_none());

    if json {
        output::print_json(&entries)
            .map_err(|e| EngineError::configuration(format!("cannot encode preview: {}", e)))?;
    } else {
        let mut stdout = output::stdout(config.use_colors);
        output::write_preview(&mut stdout, &entries).map_err(|e| EngineError::io(file, e))?;
    }
    Ok(all_resolved)
}

/// Handles the `check` subcommand. Returns whether every suite loaded and
/// every source resolved.
fn handle_check(path: &Path, config: &RunConfig) -> Result<bool, EngineError> {
    let files = if path.is_file() {
        vec![path.to_path_buf()]
    } else {
        discover_suite_files(path)
    };
    info!(count = files.len(), root = %path.display(), "checking suite files");

    let mut stdout = output::stdout(config.use_colors);
    let mut checked = 0;
    let mut failures = 0;
    for file in &files {
        let suite_name = file.display().to_string();
        let suite = match load_suite(file) {
            Ok(suite) => suite,
            Err(err) => {
                failures += 1;
                output::print_diagnostic(err);
                continue;
            }
        };
        for decl in &suite.declarations {
            checked += 1;
            let resolved = materialize(&decl.source, &decl.signature, config);
            output::write_check_line(
                &mut stdout,
                &suite_name,
                &decl.name,
                resolved.as_ref().map(Vec::len),
            )
            .map_err(|e| EngineError::io(file, e))?;
            if let Err(err) = resolved {
                failures += 1;
                output::print_diagnostic(err);
            }
        }
    }

    println!(
        "\nChecked {} source(s) in {} file(s): {} failure(s)",
        checked,
        files.len(),
        failures
    );
    Ok(failures == 0)
}
