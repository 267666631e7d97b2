//! Terminal implementations of the host actions.
//!
//! A terminal has no share sheet, so sharing always falls back to copying
//! the link. The clipboard is an external command (`wl-copy`, `pbcopy`,
//! `xclip -selection clipboard`, ...) or, when none is configured, stdout.

use std::io::Write;
use std::process::{Command, Stdio};

use ocra_core::{AppError, Clipboard, SharePayload, ShareTarget};

/// Clipboard backed by a command that reads the text from stdin.
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    /// Splits `command` on whitespace into program and arguments.
    ///
    /// Returns `None` for a blank command.
    pub fn parse(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }
}

impl Clipboard for CommandClipboard {
    fn write_text(&self, text: &str) -> Result<(), AppError> {
        let clipboard_err =
            |e: std::io::Error| AppError::ClipboardError(format!("{}: {}", self.program, e));

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .map_err(clipboard_err)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).map_err(clipboard_err)?;
        }

        let status = child.wait().map_err(clipboard_err)?;
        if !status.success() {
            return Err(AppError::ClipboardError(format!(
                "{} exited with {}",
                self.program, status
            )));
        }
        Ok(())
    }
}

/// The clipboard the CLI uses.
#[derive(Debug, Clone)]
pub enum TerminalClipboard {
    Command(CommandClipboard),
    /// No clipboard command configured: copied text goes to stdout.
    Stdout,
}

impl TerminalClipboard {
    pub fn from_command(command: Option<&str>) -> Self {
        command
            .and_then(CommandClipboard::parse)
            .map(Self::Command)
            .unwrap_or(Self::Stdout)
    }
}

impl Clipboard for TerminalClipboard {
    fn write_text(&self, text: &str) -> Result<(), AppError> {
        match self {
            Self::Command(clipboard) => clipboard.write_text(text),
            Self::Stdout => {
                println!("{}", text);
                Ok(())
            }
        }
    }
}

/// Share target of a terminal: never supported.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalShareTarget;

impl ShareTarget for TerminalShareTarget {
    fn is_supported(&self) -> bool {
        false
    }

    fn share(&self, _payload: &SharePayload) -> Result<(), AppError> {
        Err(AppError::ShareError(
            "sharing is not available in a terminal".to_string(),
        ))
    }
}
