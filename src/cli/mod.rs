//! CLI module for classlens
//!
//! This module provides the command-line interface over a JSON type manifest.
//!
//! ## Commands
//!
//! - `types <manifest>` - List declared types
//! - `fields <manifest> <type> --marker <name>` - Fields declared on a type that carry a marker
//! - `methods <manifest> <type>` - Method names of a type and its directly implemented contracts
//! - `new <manifest> <type> [args]...` - Construct an instance, whatever the constructor's visibility
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use crate::config::MatchPolicy;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Runtime type introspection over a JSON type manifest
#[derive(Parser, Debug)]
#[command(name = "classlens")]
#[command(version = VERSION)]
#[command(about = "Inspect marked fields, method names and constructors of manifest types", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the types declared in a manifest
    Types {
        /// Manifest file (JSON)
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,
    },

    /// Print the fields declared on a type that carry a marker
    Fields {
        /// Manifest file (JSON)
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,
        /// Type to inspect
        #[arg(value_name = "TYPE")]
        type_name: String,
        /// Marker to look for
        #[arg(short, long, value_name = "NAME")]
        marker: String,
    },

    /// Print the method names of a type and of the contracts it implements directly
    Methods {
        /// Manifest file (JSON)
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,
        /// Type to inspect
        #[arg(value_name = "TYPE")]
        type_name: String,
    },

    /// Construct an instance through any matching constructor, public or not
    New {
        /// Manifest file (JSON)
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,
        /// Type to construct
        #[arg(value_name = "TYPE")]
        type_name: String,
        /// How to choose among several matching constructors
        #[arg(long, value_enum, default_value_t = MatchPolicy::FirstDeclared)]
        policy: MatchPolicy,
        /// Constructor arguments; JSON literals, anything else is a string
        #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Types { manifest } => commands::list_types(&manifest),
        Command::Fields {
            manifest,
            type_name,
            marker,
        } => commands::marked_fields(&manifest, &type_name, &marker),
        Command::Methods { manifest, type_name } => commands::method_names(&manifest, &type_name),
        Command::New {
            manifest,
            type_name,
            policy,
            args,
        } => commands::new_instance(&manifest, &type_name, &args, policy),
    }
}

// ============================================================================
// Tests
// ============================================================================
