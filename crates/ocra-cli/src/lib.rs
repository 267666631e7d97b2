//! OCRA command-line front end.
//!
//! - [`config`] - clap configuration and settings resolution
//! - [`host`] - terminal clipboard and share target

pub mod config;
pub mod host;

pub use config::{Command, Config, OutputFormat, ResolvedConfig, SavedCommand, UnitsArg};
pub use host::{CommandClipboard, TerminalClipboard, TerminalShareTarget};
