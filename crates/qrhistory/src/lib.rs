//! `qrhistory` - QR code generation with a persistent, editable history
//!
//! Text submitted for encoding is recorded in a newest-first history that is
//! written through to a pluggable key-value [`Medium`] after every change.
//! Entries can be edited, deleted, or cleared, and any entry can be
//! re-rendered as a terminal or SVG QR code.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod display;
pub mod entry;
pub mod error;
pub mod history;
pub mod logging;
pub mod render;
pub mod repl;
pub mod session;
pub mod storage;

pub use config::Config;
pub use entry::{Entry, EntryId};
pub use error::{Error, Result};
pub use history::HistoryStore;
pub use logging::init_logging;
pub use render::{QrRenderer, RenderOptions, SvgRenderer, TerminalRenderer};
pub use repl::Repl;
pub use session::{EditDraft, Session};
pub use storage::{Backend, FileMedium, Medium, MemoryMedium, SqliteMedium};
