//! Command-line interface for zvuk-fetch.
//!
//! This module provides the `download` and `login` commands. All user-facing
//! output is printed here; the core modules only log.

mod commands;

pub use commands::{Cli, Commands, run_command};
