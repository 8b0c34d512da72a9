//! Command-line interface for staffdir.
//!
//! This module provides the CLI structure and output rendering for the
//! `staffdir` binary.

mod commands;
pub mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ConfigCommand, DeleteCommand, EditCommand, EmployeeFields, LangArg, ListCommand,
    OutputFormat, ShowCommand, ViewArg,
};

use crate::logging::Verbosity;

/// staffdir - Manage an employee directory
///
/// List, search, add, edit, and delete employee records kept in a local
/// store, with remembered view, page, and language preferences.
#[derive(Debug, Parser)]
#[command(name = "staffdir")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path to the database file (use ":memory:" for a throwaway store)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub database: Option<PathBuf>,

    /// Deployment base path routes are served under
    #[arg(short, long, global = true, value_name = "PATH")]
    pub base: Option<String>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List employees, one page at a time
    List(ListCommand),

    /// Show one employee
    Show(ShowCommand),

    /// Add an employee
    Add(AddCommand),

    /// Edit an employee
    Edit(EditCommand),

    /// Delete an employee
    Delete(DeleteCommand),

    /// Show or set the list view mode
    View {
        /// New view mode
        #[arg(value_enum)]
        mode: Option<ViewArg>,
    },

    /// Show, set, or toggle the interface language
    Lang {
        /// New language
        #[arg(value_enum)]
        lang: Option<LangArg>,

        /// Switch to the other language
        #[arg(short, long, conflicts_with = "lang")]
        toggle: bool,
    },

    /// Resolve a path against the route table
    Route {
        /// Path, with or without the base prefix
        path: String,
    },

    /// Replace the stored collection with the seed dataset
    Reset {
        /// Confirm the reset
        #[arg(short, long)]
        yes: bool,
    },

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
