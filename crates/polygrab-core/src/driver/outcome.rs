//! Step outcomes, per-item states, and the run summary.

use std::fmt;

use thiserror::Error;

use crate::api::{BlockedResponse, TransportError};
use crate::codec::DecodeError;
use crate::storage::WriteError;

/// Per-item lifecycle. `Saved` is terminal; `Blocked` and `Error` fall back to pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    Pending,
    InFlight,
    Saved,
    Blocked,
    Error,
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ItemState::Pending => "PENDING",
            ItemState::InFlight => "IN_FLIGHT",
            ItemState::Saved => "SAVED",
            ItemState::Blocked => "BLOCKED",
            ItemState::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// Recoverable failure of one in-flight item. Logged to the error log.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport: {0}")]
    Transport(#[from] TransportError),
    #[error("decode: {0}")]
    Decode(#[from] DecodeError),
    #[error("write: {0}")]
    Write(#[from] WriteError),
}

/// What one call to `FetchDriver::step` did.
#[derive(Debug)]
pub enum StepOutcome {
    /// Input exhausted.
    Finished,
    /// Pointer already present; skipped without any request.
    AlreadyDone { item: String },
    Saved { item: String, filename: String },
    /// Operator chose to skip this item.
    Skipped { item: String },
    /// Operator asked for a fresh token; `captured` says whether one arrived.
    Relearned { captured: bool },
    Blocked { item: String, blocked: BlockedResponse },
    Failed { item: String, error: FetchError },
    Quit,
    /// No token could be obtained; the run cannot continue.
    NoToken,
}

impl StepOutcome {
    /// State the current item is left in, for outcomes that concern one item.
    pub fn item_state(&self) -> Option<ItemState> {
        match self {
            StepOutcome::AlreadyDone { .. } | StepOutcome::Saved { .. } => Some(ItemState::Saved),
            StepOutcome::Blocked { .. } => Some(ItemState::Blocked),
            StepOutcome::Failed { .. } => Some(ItemState::Error),
            StepOutcome::Skipped { .. } | StepOutcome::Relearned { .. } => {
                Some(ItemState::Pending)
            }
            StepOutcome::Finished | StepOutcome::Quit | StepOutcome::NoToken => None,
        }
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Halt {
    #[default]
    Completed,
    Quit,
    NoToken,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub saved: usize,
    pub already_done: usize,
    pub skipped: usize,
    pub blocked: usize,
    pub errors: usize,
    pub halt: Halt,
}

impl RunSummary {
    pub(crate) fn tally(&mut self, outcome: &StepOutcome) {
        match outcome {
            StepOutcome::Saved { .. } => self.saved += 1,
            StepOutcome::AlreadyDone { .. } => self.already_done += 1,
            StepOutcome::Skipped { .. } => self.skipped += 1,
            StepOutcome::Blocked { .. } => self.blocked += 1,
            StepOutcome::Failed { .. } => self.errors += 1,
            StepOutcome::Finished => self.halt = Halt::Completed,
            StepOutcome::Quit => self.halt = Halt::Quit,
            StepOutcome::NoToken => self.halt = Halt::NoToken,
            StepOutcome::Relearned { .. } => {}
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let halt = match self.halt {
            Halt::Completed => "completed",
            Halt::Quit => "quit by operator",
            Halt::NoToken => "aborted: no session token",
        };
        write!(
            f,
            "{}: saved {}, already done {}, skipped {}, blocked {}, errors {}",
            halt, self.saved, self.already_done, self.skipped, self.blocked, self.errors
        )
    }
}
