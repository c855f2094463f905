//! Operator protocol: the human who drives the browser and paces the run.
//!
//! The driver asks for one [`Command`] per pending item and blocks on
//! [`Operator::confirm`] whenever it needs the operator to act in the browser. The
//! console implementation reads stdin; tests script it.

mod console;

pub use console::ConsoleOperator;

use anyhow::Result;

/// Out-of-band choice at a pending step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Issue the request for the current item (default).
    Fetch,
    /// Advance without saving; a deliberate omission.
    Skip,
    /// Drop the held token and capture a fresh one. Does not advance.
    Relearn,
    /// Stop the run at this boundary.
    Quit,
}

/// Parses one console line. Empty input means fetch.
pub fn parse_command(line: &str) -> Option<Command> {
    match line.trim().to_ascii_lowercase().as_str() {
        "" | "f" | "fetch" => Some(Command::Fetch),
        "s" | "skip" => Some(Command::Skip),
        "r" | "relearn" => Some(Command::Relearn),
        "q" | "quit" => Some(Command::Quit),
        _ => None,
    }
}

pub const LEGEND: &str = "Stepper mode:\n  \
    Enter = fetch current item\n  \
    r     = (re)learn session token (trigger one request in the browser, export HAR, then Enter)\n  \
    s     = skip this item\n  \
    q     = quit";

/// Where the driver is when it asks for a command.
#[derive(Debug, Clone, Copy)]
pub struct StepPrompt<'a> {
    /// 1-based position in the input list.
    pub position: usize,
    pub total: usize,
    pub item_id: &'a str,
}

pub trait Operator {
    /// Next command for the current pending item.
    fn command(&mut self, prompt: &StepPrompt<'_>) -> Result<Command>;

    /// Shows `message` and blocks until the operator confirms.
    fn confirm(&mut self, message: &str) -> Result<()>;

    /// Informational output (saved, blocked diagnostics, errors).
    fn notice(&mut self, message: &str);
}
