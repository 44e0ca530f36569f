//! Line-oriented interactive session.
//!
//! Reads one command per line and drives a [`Session`], redrawing the latest
//! QR code after every change to the history. Generic over its input and
//! output so it can run against stdin/stdout or in-memory buffers.

use std::io::{BufRead, Write};

use tracing::debug;

use crate::display::{entry_details, entry_line};
use crate::entry::EntryId;
use crate::error::{Error, Result};
use crate::render::{QrRenderer, RenderOptions};
use crate::session::Session;
use crate::storage::Medium;

const HELP: &str = "\
Commands:
  generate [TEXT]   set the input to TEXT (if given) and add it (alias: add)
  input TEXT        set the input without adding it
  latest            show the latest QR code
  list              list the history, newest first
  show ID           show one entry and its QR code
  edit ID           start editing an entry
  draft TEXT        replace the draft of the entry being edited
  save              commit the draft
  cancel            discard the draft
  delete ID         delete an entry
  clear             delete every entry
  help              show this help
  quit              leave (alias: exit)";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Generate(Option<String>),
    Input(String),
    Latest,
    List,
    Show(EntryId),
    Edit(EntryId),
    Draft(String),
    Save,
    Cancel,
    Delete(EntryId),
    Clear,
    Help,
    Quit,
    Empty,
}

impl Command {
    fn parse(line: &str) -> std::result::Result<Self, String> {
        let line = line.trim_end_matches(['\r', '\n']);
        let (word, rest) = match line.trim_start().split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim_start()),
            None => (line.trim(), ""),
        };

        let id = || {
            rest.trim()
                .parse::<EntryId>()
                .map_err(|_| format!("'{word}' needs an entry id"))
        };

        match word.to_ascii_lowercase().as_str() {
            "" => Ok(Self::Empty),
            "generate" | "add" => Ok(Self::Generate(
                (!rest.is_empty()).then(|| rest.to_string()),
            )),
            "input" => Ok(Self::Input(rest.to_string())),
            "latest" => Ok(Self::Latest),
            "list" | "ls" => Ok(Self::List),
            "show" => id().map(Self::Show),
            "edit" => id().map(Self::Edit),
            "draft" => Ok(Self::Draft(rest.to_string())),
            "save" => Ok(Self::Save),
            "cancel" => Ok(Self::Cancel),
            "delete" | "rm" => id().map(Self::Delete),
            "clear" => Ok(Self::Clear),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(format!("unknown command '{other}', try 'help'")),
        }
    }
}

/// Interactive driver for a [`Session`].
#[derive(Debug)]
pub struct Repl<'a, M: Medium, R: QrRenderer> {
    session: &'a mut Session<M>,
    renderer: &'a R,
    options: RenderOptions,
}

impl<'a, M: Medium, R: QrRenderer> Repl<'a, M, R> {
    /// Create a driver that renders codes with `renderer` and `options`.
    pub fn new(session: &'a mut Session<M>, renderer: &'a R, options: RenderOptions) -> Self {
        Self {
            session,
            renderer,
            options,
        }
    }

    /// Process commands from `input` until it ends or `quit` is read.
    ///
    /// Command errors are printed and the loop continues.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading input or writing output fails.
    pub fn run(&mut self, mut input: impl BufRead, output: &mut impl Write) -> Result<()> {
        writeln!(output, "Type 'help' for commands.")?;
        let mut line = String::new();
        loop {
            self.prompt(output)?;
            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                break;
            }

            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(message) => {
                    writeln!(output, "error: {message}")?;
                    continue;
                }
            };
            debug!("REPL command: {:?}", command);

            if command == Command::Quit {
                break;
            }
            if let Err(e) = self.execute(command, output) {
                match e {
                    Error::Io(e) => return Err(Error::Io(e)),
                    other => writeln!(output, "error: {other}")?,
                }
            }
            if let Some(e) = self.session.store_mut().take_persist_error() {
                writeln!(output, "warning: history was not saved: {e}")?;
            }
        }
        Ok(())
    }

    fn prompt(&self, output: &mut impl Write) -> Result<()> {
        match self.session.editing() {
            Some(draft) => write!(output, "qr (editing #{})> ", draft.id)?,
            None => write!(output, "qr> ")?,
        }
        output.flush()?;
        Ok(())
    }

    fn execute(&mut self, command: Command, output: &mut impl Write) -> Result<()> {
        match command {
            Command::Empty | Command::Quit => {}
            Command::Help => writeln!(output, "{HELP}")?,
            Command::Input(text) => self.session.set_input(text),
            Command::Generate(text) => {
                if let Some(text) = text {
                    self.session.set_input(text);
                }
                if self.session.generate()?.is_some() {
                    self.print_latest(output)?;
                } else {
                    writeln!(output, "Nothing to generate: the input is empty.")?;
                }
            }
            Command::Latest => self.print_latest(output)?,
            Command::List => {
                if self.session.entries().is_empty() {
                    writeln!(output, "History is empty.")?;
                }
                for entry in self.session.entries() {
                    writeln!(output, "{}", entry_line(entry))?;
                }
            }
            Command::Show(id) => {
                let entry = self
                    .session
                    .store()
                    .get(id)
                    .ok_or(Error::EntryNotFound { id })?;
                write!(output, "{}", entry_details(entry))?;
                let code = self.renderer.render(&entry.text, &self.options)?;
                writeln!(output, "{code}")?;
            }
            Command::Edit(id) => {
                let draft = self.session.begin_edit(id)?;
                writeln!(output, "Editing #{}: {}", draft.id, draft.text)?;
                writeln!(output, "Use 'draft TEXT', then 'save' or 'cancel'.")?;
            }
            Command::Draft(text) => self.session.set_draft(text)?,
            Command::Save => {
                let entry = self.session.save_edit()?;
                writeln!(output, "Saved {}", entry_line(entry))?;
                self.print_latest(output)?;
            }
            Command::Cancel => match self.session.cancel_edit() {
                Some(draft) => writeln!(output, "Discarded changes to #{}.", draft.id)?,
                None => writeln!(output, "Not editing.")?,
            },
            Command::Delete(id) => {
                let removed = self.session.delete(id)?;
                writeln!(output, "Deleted #{}.", removed.id)?;
                self.print_latest(output)?;
            }
            Command::Clear => {
                self.session.clear();
                writeln!(output, "History cleared.")?;
                self.print_latest(output)?;
            }
        }
        Ok(())
    }

    fn print_latest(&self, output: &mut impl Write) -> Result<()> {
        let Some(entry) = self.session.latest() else {
            writeln!(output, "History is empty.")?;
            return Ok(());
        };
        let code = self.renderer.render(&entry.text, &self.options)?;
        writeln!(output, "Latest QR code")?;
        writeln!(output, "{code}")?;
        writeln!(output, "{}", entry.text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::history::HistoryStore;
    use crate::storage::MemoryMedium;

    /// Renders `[QR:text]` so output is easy to assert on.
    struct FakeRenderer;

    impl QrRenderer for FakeRenderer {
        fn render(&self, text: &str, _options: &RenderOptions) -> Result<String> {
            Ok(format!("[QR:{text}]"))
        }
    }

    fn run_script(session: &mut Session<MemoryMedium>, script: &str) -> String {
        let mut output = Vec::new();
        Repl::new(session, &FakeRenderer, RenderOptions::default())
            .run(Cursor::new(script.as_bytes()), &mut output)
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    fn create_test_session() -> Session<MemoryMedium> {
        Session::new(HistoryStore::open(MemoryMedium::new()))
    }

    fn texts(session: &Session<MemoryMedium>) -> Vec<String> {
        session.entries().iter().map(|e| e.text.clone()).collect()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Command::parse("add hello world\n").unwrap(),
            Command::Generate(Some("hello world".to_string()))
        );
        assert_eq!(
            Command::parse("generate").unwrap(),
            Command::Generate(None)
        );
        assert_eq!(
            Command::parse("EDIT 3").unwrap(),
            Command::Edit(EntryId::new(3))
        );
        assert_eq!(
            Command::parse("delete #4").unwrap(),
            Command::Delete(EntryId::new(4))
        );
        assert_eq!(Command::parse("   ").unwrap(), Command::Empty);
        assert_eq!(Command::parse("exit").unwrap(), Command::Quit);
    }

    #[test]
    fn test_parse_errors() {
        assert!(Command::parse("edit").unwrap_err().contains("entry id"));
        assert!(Command::parse("show abc").is_err());
        assert!(Command::parse("frobnicate").unwrap_err().contains("unknown"));
    }

    #[test]
    fn test_generate_prints_latest_code() {
        let mut session = create_test_session();
        let out = run_script(&mut session, "add https://example.com\nquit\n");

        assert!(out.contains("[QR:https://example.com]"));
        assert_eq!(texts(&session), ["https://example.com"]);
    }

    #[test]
    fn test_input_then_generate() {
        let mut session = create_test_session();
        run_script(&mut session, "input typed text\ngenerate\n");
        assert_eq!(texts(&session), ["typed text"]);
        assert_eq!(session.input(), "");
    }

    #[test]
    fn test_generate_blank_reports_nothing() {
        let mut session = create_test_session();
        let out = run_script(&mut session, "generate\n");
        assert!(out.contains("Nothing to generate"));
        assert!(session.entries().is_empty());
    }

    #[test]
    fn test_full_widget_flow() {
        let mut session = create_test_session();
        let script = "\
add hello
add world
edit 1
draft HELLO
save
delete 2
list
";
        let out = run_script(&mut session, script);

        assert_eq!(texts(&session), ["HELLO"]);
        assert!(out.contains("Editing #1: hello"));
        assert!(out.contains("Deleted #2."));
        assert!(out.contains("qr (editing #1)> "));

        run_script(&mut session, "clear\n");
        assert!(session.entries().is_empty());
    }

    #[test]
    fn test_latest_code_redrawn_after_each_change() {
        let mut session = create_test_session();
        let script = "add first\nadd second\nedit 2\ndraft SECOND\nsave\n";
        let out = run_script(&mut session, script);
        assert!(out.ends_with("Latest QR code\n[QR:SECOND]\nSECOND\nqr> \n"));

        let out = run_script(&mut session, "delete 2\n");
        assert!(out.contains("Deleted #2.\nLatest QR code\n[QR:first]\nfirst\n"));

        let out = run_script(&mut session, "clear\n");
        assert!(out.contains("History cleared.\nHistory is empty.\n"));
    }

    #[test]
    fn test_cancel_discards_draft() {
        let mut session = create_test_session();
        let out = run_script(&mut session, "add keep\nedit 1\ndraft nope\ncancel\n");

        assert!(out.contains("Discarded changes to #1."));
        assert_eq!(texts(&session), ["keep"]);
        assert!(session.editing().is_none());
    }

    #[test]
    fn test_errors_do_not_stop_the_loop() {
        let mut session = create_test_session();
        let out = run_script(&mut session, "edit 9\nsave\nbogus\nadd after\n");

        assert!(out.contains("error: no history entry with id 9"));
        assert!(out.contains("error: no entry is being edited"));
        assert!(out.contains("error: unknown command 'bogus'"));
        assert_eq!(texts(&session), ["after"]);
    }

    #[test]
    fn test_show_entry() {
        let mut session = create_test_session();
        let out = run_script(&mut session, "add first\nadd second\nshow 1\n");
        assert!(out.contains("Entry #1"));
        assert!(out.contains("[QR:first]"));
    }

    #[test]
    fn test_quit_stops_processing() {
        let mut session = create_test_session();
        run_script(&mut session, "add one\nquit\nadd two\n");
        assert_eq!(texts(&session), ["one"]);
    }

    #[test]
    fn test_write_failure_is_reported() {
        let mut session = create_test_session();
        session.store_mut().medium_mut().set_fail_writes(true);

        let out = run_script(&mut session, "add unsaved\n");

        assert!(out.contains("warning: history was not saved"));
        assert_eq!(texts(&session), ["unsaved"]);
    }

    #[test]
    fn test_help() {
        let mut session = create_test_session();
        let out = run_script(&mut session, "help\n");
        assert!(out.contains("Commands:"));
        assert!(out.contains("draft TEXT"));
    }
}
