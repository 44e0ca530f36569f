//! Command-line interface for qrhistory.
//!
//! This module provides the CLI structure for the `qrhist` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::Verbosity;

pub use commands::{
    ClearCommand, ConfigCommand, DeleteCommand, EditCommand, GenerateCommand, LatestCommand,
    ListCommand, OutputFormat, ShowCommand, StatusCommand,
};

/// qrhist - Turn text into QR codes and keep a history of them
///
/// Every generated code is recorded newest first. Entries can be listed,
/// shown again, edited, deleted, or cleared.
#[derive(Debug, Parser)]
#[command(name = "qrhist")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
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
    /// Generate a QR code and add its text to the history
    #[command(visible_alias = "add")]
    Generate(GenerateCommand),

    /// Show the most recent QR code
    Latest(LatestCommand),

    /// List the history, newest first
    List(ListCommand),

    /// Show one entry and its QR code
    Show(ShowCommand),

    /// Replace the text of an entry
    Edit(EditCommand),

    /// Delete an entry
    Delete(DeleteCommand),

    /// Delete every entry
    Clear(ClearCommand),

    /// Show where the history lives and how large it is
    Status(StatusCommand),

    /// Start an interactive session
    Repl,

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryId;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "qrhist");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(parse(&["qrhist", "-q", "status"]).verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["qrhist", "status"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["qrhist", "-v", "status"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["qrhist", "-vv", "status"]).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_generate_joins_words() {
        let cli = parse(&["qrhist", "generate", "hello", "world"]);
        let Command::Generate(cmd) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(cmd.text(), "hello world");
    }

    #[test]
    fn test_parse_add_alias() {
        let cli = parse(&["qrhist", "add", "https://example.com"]);
        assert!(matches!(cli.command, Command::Generate(_)));
    }

    #[test]
    fn test_parse_generate_requires_text() {
        assert!(Cli::try_parse_from(["qrhist", "generate"]).is_err());
    }

    #[test]
    fn test_parse_list_options() {
        let cli = parse(&["qrhist", "list", "--limit", "5", "--format", "json", "--qr"]);
        let Command::List(cmd) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(cmd.limit, Some(5));
        assert_eq!(cmd.format, OutputFormat::Json);
        assert!(cmd.qr);
    }

    #[test]
    fn test_parse_show_with_svg() {
        let cli = parse(&["qrhist", "show", "#7", "--svg", "out.svg", "--size", "300"]);
        let Command::Show(cmd) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(cmd.id, EntryId::new(7));
        assert_eq!(cmd.svg, Some(PathBuf::from("out.svg")));
        assert_eq!(cmd.size, Some(300));
    }

    #[test]
    fn test_parse_edit() {
        let cli = parse(&["qrhist", "edit", "3", "new", "text"]);
        let Command::Edit(cmd) = cli.command else {
            panic!("expected edit");
        };
        assert_eq!(cmd.id, EntryId::new(3));
        assert_eq!(cmd.text(), "new text");
    }

    #[test]
    fn test_parse_delete_rejects_bad_id() {
        assert!(Cli::try_parse_from(["qrhist", "delete", "abc"]).is_err());
    }

    #[test]
    fn test_parse_clear() {
        let cli = parse(&["qrhist", "clear", "--yes"]);
        assert!(matches!(cli.command, Command::Clear(ClearCommand { yes: true })));
    }

    #[test]
    fn test_parse_repl() {
        assert!(matches!(parse(&["qrhist", "repl"]).command, Command::Repl));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["qrhist", "-c", "/custom/config.toml", "status"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_config_validate() {
        let cli = parse(&["qrhist", "config", "validate", "--file", "x.toml"]);
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }
}
