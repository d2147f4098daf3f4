//! Defines the command-line arguments and subcommands for the argsource CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "argsource",
    version,
    about = "Resolve and check declarative argument sources for parameterized tests."
)]
pub struct ArgsourceArgs {
    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve every source in a suite file and print its argument sets.
    Preview {
        /// The path to the YAML suite file.
        #[arg(required = true)]
        file: PathBuf,
        /// Print the resolved argument sets as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Discover suite files under a directory and check that every source resolves.
    Check {
        /// The directory (or single file) to check.
        #[arg(default_value = "tests")]
        path: PathBuf,
    },
}
