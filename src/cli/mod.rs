//! CLI module for the sitestack tool.
//!
//! This module provides the command-line interface for validating,
//! synthesizing and publishing static site stacks.

mod commands;
mod output;

pub use commands::{AssemblyCommands, AuthCommands, Cli, Commands, OutputFormat};
pub use output::OutputFormatter;
