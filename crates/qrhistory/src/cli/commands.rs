//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::display::ListFormat;
use crate::entry::EntryId;

/// Generate command arguments.
#[derive(Debug, Args)]
pub struct GenerateCommand {
    /// Text to encode; multiple words are joined with spaces
    #[arg(required = true, num_args = 1..)]
    pub words: Vec<String>,

    /// Also write the code as SVG to this file
    #[arg(long, value_name = "FILE")]
    pub svg: Option<PathBuf>,
}

impl GenerateCommand {
    /// The text to encode.
    #[must_use]
    pub fn text(&self) -> String {
        self.words.join(" ")
    }
}

/// Latest command arguments.
#[derive(Debug, Args)]
pub struct LatestCommand {
    /// Write the code as SVG to this file
    #[arg(long, value_name = "FILE")]
    pub svg: Option<PathBuf>,

    /// SVG size in pixels (defaults to `render.latest_size`)
    #[arg(long)]
    pub size: Option<u32>,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Maximum number of entries
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,

    /// Print a QR code under each entry
    #[arg(long)]
    pub qr: bool,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Entry id (as printed by `list`)
    pub id: EntryId,

    /// Write the code as SVG to this file
    #[arg(long, value_name = "FILE")]
    pub svg: Option<PathBuf>,

    /// SVG size in pixels (defaults to `render.thumbnail_size`)
    #[arg(long)]
    pub size: Option<u32>,
}

/// Edit command arguments.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Entry id (as printed by `list`)
    pub id: EntryId,

    /// Replacement text; multiple words are joined with spaces
    #[arg(required = true, num_args = 1..)]
    pub words: Vec<String>,
}

impl EditCommand {
    /// The replacement text.
    #[must_use]
    pub fn text(&self) -> String {
        self.words.join(" ")
    }
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Entry id (as printed by `list`)
    pub id: EntryId,
}

/// Clear command arguments.
#[derive(Debug, Args)]
pub struct ClearCommand {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
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

impl From<OutputFormat> for ListFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Plain => Self::Plain,
            OutputFormat::Table => Self::Table,
            OutputFormat::Json => Self::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_conversion() {
        assert_eq!(ListFormat::from(OutputFormat::Plain), ListFormat::Plain);
        assert_eq!(ListFormat::from(OutputFormat::Table), ListFormat::Table);
        assert_eq!(ListFormat::from(OutputFormat::Json), ListFormat::Json);
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_generate_text_joins_words() {
        let cmd = GenerateCommand {
            words: vec!["a".to_string(), "b".to_string()],
            svg: None,
        };
        assert_eq!(cmd.text(), "a b");
    }

    #[test]
    fn test_edit_command_debug() {
        let cmd = EditCommand {
            id: EntryId::new(2),
            words: vec!["x".to_string()],
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("words"));
        assert_eq!(cmd.text(), "x");
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
