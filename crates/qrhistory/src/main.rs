//! `qrhist` - CLI for qrhistory
//!
//! This binary generates QR codes in the terminal and manages the history of
//! generated codes.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;

use qrhistory::cli::{
    ClearCommand, Cli, Command, ConfigCommand, EditCommand, GenerateCommand, LatestCommand,
    ListCommand, OutputFormat, ShowCommand,
};
use qrhistory::display::{entry_details, entry_line, format_entries, local_time};
use qrhistory::{
    init_logging, Backend, Config, Entry, Error, FileMedium, HistoryStore, Medium, MemoryMedium,
    QrRenderer, RenderOptions, Repl, Session, SqliteMedium, SvgRenderer, TerminalRenderer,
};

type CliSession = Session<Box<dyn Medium>>;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    match cli.command {
        // Configuration commands must work even when the config is invalid
        Command::Config(config_cmd) => handle_config(cli.config, config_cmd),
        command => {
            let config =
                Config::load_from(cli.config).context("failed to load configuration")?;
            let mut session = open_session(&config)?;
            run(&config, &mut session, command)
        }
    }
}

fn run(config: &Config, session: &mut CliSession, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Generate(cmd) => handle_generate(config, session, &cmd),
        Command::Latest(cmd) => handle_latest(config, session, &cmd),
        Command::List(cmd) => handle_list(config, session, &cmd),
        Command::Show(cmd) => handle_show(config, session, &cmd),
        Command::Edit(cmd) => handle_edit(session, &cmd),
        Command::Delete(cmd) => {
            let removed = session.delete(cmd.id)?;
            println!("Deleted #{}: {}", removed.id, removed.text);
            ensure_saved(session)
        }
        Command::Clear(cmd) => handle_clear(session, &cmd),
        Command::Status(cmd) => handle_status(config, session, cmd.json),
        Command::Repl => handle_repl(config, session),
        Command::Config(_) => bail!("configuration commands do not open the history"),
    }
}

fn open_medium(config: &Config) -> anyhow::Result<Box<dyn Medium>> {
    let medium: Box<dyn Medium> = match config.storage.backend {
        Backend::File => Box::new(FileMedium::open(config.data_dir())?),
        Backend::Sqlite => Box::new(SqliteMedium::open(config.database_path())?),
        Backend::Memory => Box::new(MemoryMedium::new()),
    };
    info!("Using {} storage at {}", config.storage.backend, medium.location());
    Ok(medium)
}

fn open_session(config: &Config) -> anyhow::Result<CliSession> {
    let medium = open_medium(config).context("failed to open history storage")?;
    let store = HistoryStore::open_with_key(medium, config.storage.key.clone());
    Ok(Session::new(store).with_max_text_length(config.input.max_text_length))
}

/// Fail the command if the last change could not be written.
fn ensure_saved(session: &mut CliSession) -> anyhow::Result<()> {
    match session.store_mut().take_persist_error() {
        Some(e) => Err(anyhow::Error::new(e).context("the history change was not saved")),
        None => Ok(()),
    }
}

fn print_code(text: &str, options: &RenderOptions) -> anyhow::Result<()> {
    let code = TerminalRenderer.render(text, options)?;
    println!("{code}");
    Ok(())
}

fn write_svg(path: &Path, text: &str, options: &RenderOptions) -> anyhow::Result<()> {
    let svg = SvgRenderer.render(text, options)?;
    std::fs::write(path, svg).with_context(|| format!("failed to write {}", path.display()))?;
    info!("Wrote SVG to {}", path.display());
    println!("Saved SVG to {}", path.display());
    Ok(())
}

fn print_latest(config: &Config, entry: &Entry) -> anyhow::Result<()> {
    println!("Latest QR code");
    print_code(&entry.text, &config.latest_render_options())?;
    println!("{}", entry.text);
    Ok(())
}

fn handle_generate(
    config: &Config,
    session: &mut CliSession,
    cmd: &GenerateCommand,
) -> anyhow::Result<()> {
    session.set_input(cmd.text());
    let Some(entry) = session.generate()? else {
        bail!("nothing to generate: the text is blank");
    };
    let entry = entry.clone();

    print_latest(config, &entry)?;
    if let Some(path) = &cmd.svg {
        write_svg(path, &entry.text, &config.latest_render_options())?;
    }
    ensure_saved(session)
}

fn handle_latest(
    config: &Config,
    session: &CliSession,
    cmd: &LatestCommand,
) -> anyhow::Result<()> {
    let Some(entry) = session.latest() else {
        println!("History is empty.");
        return Ok(());
    };

    print_latest(config, entry)?;
    if let Some(path) = &cmd.svg {
        let size = cmd.size.unwrap_or(config.render.latest_size);
        write_svg(path, &entry.text, &config.render_options(size))?;
    }
    Ok(())
}

fn handle_list(
    config: &Config,
    session: &CliSession,
    cmd: &ListCommand,
) -> anyhow::Result<()> {
    let entries = session.entries();
    let entries = &entries[..cmd.limit.map_or(entries.len(), |n| n.min(entries.len()))];

    if cmd.format == OutputFormat::Json {
        println!("{}", format_entries(entries, cmd.format.into())?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("History is empty.");
        return Ok(());
    }

    if cmd.qr {
        let options = config.thumbnail_render_options();
        for entry in entries {
            println!("{}", entry_line(entry));
            print_code(&entry.text, &options)?;
        }
    } else {
        print!("{}", format_entries(entries, cmd.format.into())?);
    }
    Ok(())
}

fn handle_show(
    config: &Config,
    session: &CliSession,
    cmd: &ShowCommand,
) -> anyhow::Result<()> {
    let entry = session
        .store()
        .get(cmd.id)
        .ok_or(Error::EntryNotFound { id: cmd.id })?;

    print!("{}", entry_details(entry));
    print_code(&entry.text, &config.thumbnail_render_options())?;
    if let Some(path) = &cmd.svg {
        let size = cmd.size.unwrap_or(config.render.thumbnail_size);
        write_svg(path, &entry.text, &config.render_options(size))?;
    }
    Ok(())
}

fn handle_edit(session: &mut CliSession, cmd: &EditCommand) -> anyhow::Result<()> {
    session.begin_edit(cmd.id)?;
    session.set_draft(cmd.text())?;
    let line = entry_line(session.save_edit()?);
    println!("Updated {line}");
    ensure_saved(session)
}

fn handle_clear(session: &mut CliSession, cmd: &ClearCommand) -> anyhow::Result<()> {
    let count = session.entries().len();
    if !cmd.yes {
        println!("This will delete all {count} history entries.");
        println!("Use --yes to confirm.");
        return Ok(());
    }

    session.clear();
    println!("Cleared {count} entries.");
    ensure_saved(session)
}

fn handle_status(config: &Config, session: &CliSession, json: bool) -> anyhow::Result<()> {
    let store = session.store();
    let newest = store.entries().first();
    let oldest = store.entries().last();

    if json {
        let status = serde_json::json!({
            "backend": config.storage.backend,
            "location": store.medium().location(),
            "key": store.key(),
            "entries": store.len(),
            "newest": newest.map(|e| e.timestamp),
            "oldest": oldest.map(|e| e.created_at()),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("qrhist status");
        println!("-------------");
        println!("Backend:   {}", config.storage.backend);
        println!("Location:  {}", store.medium().location());
        println!("Key:       {}", store.key());
        println!("Entries:   {}", store.len());
        if let (Some(newest), Some(oldest)) = (newest, oldest) {
            println!("Newest:    {}", local_time(newest.timestamp));
            println!("Oldest:    {}", local_time(oldest.created_at()));
        }
    }
    Ok(())
}

fn handle_repl(config: &Config, session: &mut CliSession) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    Repl::new(session, &TerminalRenderer, config.latest_render_options())
        .run(stdin.lock(), &mut stdout.lock())?;
    Ok(())
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(config_path).context("failed to load configuration")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Backend:            {}", config.storage.backend);
                println!("  Data directory:     {}", config.data_dir().display());
                println!("  Key:                {}", config.storage.key);
                println!();
                println!("[Render]");
                println!("  Latest size:        {}", config.render.latest_size);
                println!("  Thumbnail size:     {}", config.render.thumbnail_size);
                println!("  Quiet zone:         {}", config.render.quiet_zone);
                println!("  Invert:             {}", config.render.invert);
                println!();
                println!("[Input]");
                println!("  Max text length:    {}", config.input.max_text_length);
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            Config::load_from(Some(path)).context("configuration is invalid")?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
