//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::form::Field;
use crate::i18n::Lang;
use crate::state::ViewMode;

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only show employees with a field containing this text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Page to show (defaults to the remembered page)
    #[arg(short, long)]
    pub page: Option<usize>,

    /// Switch the view mode before listing
    #[arg(long, value_enum)]
    pub view: Option<ViewArg>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Employee identifier
    pub id: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Field values for the add and edit commands.
#[derive(Debug, Default, Args)]
pub struct EmployeeFields {
    /// First name
    #[arg(long)]
    pub first_name: Option<String>,

    /// Last name
    #[arg(long)]
    pub last_name: Option<String>,

    /// Employment date (YYYY-MM-DD)
    #[arg(long)]
    pub employment_date: Option<String>,

    /// Birth date (YYYY-MM-DD)
    #[arg(long)]
    pub birth_date: Option<String>,

    /// Phone number, digits in any grouping
    #[arg(long)]
    pub phone: Option<String>,

    /// Email address
    #[arg(long)]
    pub email: Option<String>,

    /// Department (Analytics, Tech)
    #[arg(long)]
    pub department: Option<String>,

    /// Position (Junior, Medior, Senior)
    #[arg(long)]
    pub position: Option<String>,
}

impl EmployeeFields {
    /// The fields that were given, in form order.
    #[must_use]
    pub fn given(&self) -> Vec<(Field, &str)> {
        [
            (Field::FirstName, &self.first_name),
            (Field::LastName, &self.last_name),
            (Field::EmploymentDate, &self.employment_date),
            (Field::BirthDate, &self.birth_date),
            (Field::Phone, &self.phone),
            (Field::Email, &self.email),
            (Field::Department, &self.department),
            (Field::Position, &self.position),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }
}

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Employee fields
    #[command(flatten)]
    pub fields: EmployeeFields,

    /// Confirm the save
    #[arg(short, long)]
    pub yes: bool,
}

/// Edit command arguments.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Employee identifier
    pub id: String,

    /// Fields to change
    #[command(flatten)]
    pub fields: EmployeeFields,

    /// Confirm the save
    #[arg(short, long)]
    pub yes: bool,
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Employee identifier
    pub id: String,

    /// Confirm the deletion
    #[arg(short, long)]
    pub yes: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// View mode argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViewArg {
    /// Table rows
    List,
    /// Card grid
    Cards,
}

impl From<ViewArg> for ViewMode {
    fn from(arg: ViewArg) -> Self {
        match arg {
            ViewArg::List => Self::List,
            ViewArg::Cards => Self::Cards,
        }
    }
}

/// Language argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LangArg {
    /// English
    En,
    /// Turkish
    Tr,
}

impl From<LangArg> for Lang {
    fn from(arg: LangArg) -> Self {
        match arg {
            LangArg::En => Self::En,
            LangArg::Tr => Self::Tr,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_arg_conversion() {
        assert_eq!(ViewMode::from(ViewArg::List), ViewMode::List);
        assert_eq!(ViewMode::from(ViewArg::Cards), ViewMode::Cards);
    }

    #[test]
    fn test_lang_arg_conversion() {
        assert_eq!(Lang::from(LangArg::En), Lang::En);
        assert_eq!(Lang::from(LangArg::Tr), Lang::Tr);
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_given_fields_in_form_order() {
        let fields = EmployeeFields {
            email: Some("a@b.co".to_string()),
            first_name: Some("Ece".to_string()),
            ..EmployeeFields::default()
        };
        assert_eq!(
            fields.given(),
            vec![(Field::FirstName, "Ece"), (Field::Email, "a@b.co")]
        );
    }
}
