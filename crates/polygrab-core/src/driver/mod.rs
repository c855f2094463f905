//! Fetch driver: the operator-paced stepper over the input list.
//!
//! One item is in flight at a time. For each item the driver consults the completion
//! ledger first (no request for finished items), makes sure a session token is held,
//! takes the operator's command, and on fetch runs
//! request → classify → decode → write record → write pointer → append index.
//!
//! The pointer write is the commit point. Blocked responses and errors leave the item
//! pending at the same position; there is no automatic retry, the operator repeats the
//! step or intervenes.

mod outcome;
mod request;

pub use outcome::{FetchError, Halt, ItemState, RunSummary, StepOutcome};
pub use request::build_request;

use anyhow::{Context, Result};
use chrono::Utc;
use std::path::PathBuf;

use crate::api::{classify, BlockedResponse, Classified, Transport};
use crate::codec::{decode_payload, Record};
use crate::config::ApiConfig;
use crate::journal::{ErrorLog, IndexEntry, IndexLog};
use crate::ledger::CompletionLedger;
use crate::naming::resolve_output_filename;
use crate::operator::{Command, Operator, StepPrompt};
use crate::storage::{write_json_atomic, WriteError};
use crate::token::{RequestSource, TokenBridge};

/// Result of a fetch that produced a response.
enum Attempt {
    Saved(String),
    Blocked(BlockedResponse),
}

pub struct FetchDriver<T, S> {
    api: ApiConfig,
    out_dir: PathBuf,
    transport: T,
    bridge: TokenBridge<S>,
    ledger: CompletionLedger,
    index: IndexLog,
    errors: ErrorLog,
    items: Vec<String>,
    position: usize,
}

impl<T: Transport, S: RequestSource> FetchDriver<T, S> {
    /// Prepares a run: creates the output directory and resets the error log.
    pub fn new(
        api: ApiConfig,
        out_dir: impl Into<PathBuf>,
        items: Vec<String>,
        transport: T,
        bridge: TokenBridge<S>,
    ) -> Result<Self> {
        let out_dir = out_dir.into();
        std::fs::create_dir_all(&out_dir)
            .with_context(|| format!("create output dir: {}", out_dir.display()))?;
        let errors = ErrorLog::start_run_in(&out_dir)?;
        Ok(Self {
            api,
            ledger: CompletionLedger::new(&out_dir),
            index: IndexLog::in_dir(&out_dir),
            errors,
            out_dir,
            transport,
            bridge,
            items,
            position: 0,
        })
    }

    /// 0-based index of the item the next step works on.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn bridge(&self) -> &TokenBridge<S> {
        &self.bridge
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Steps until the input is exhausted, the operator quits, or no token can be had.
    pub fn run<O: Operator + ?Sized>(&mut self, operator: &mut O) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        loop {
            let outcome = self.step(operator)?;
            summary.tally(&outcome);
            match outcome {
                StepOutcome::Finished | StepOutcome::Quit => break,
                StepOutcome::NoToken => {
                    operator.notice(&format!(
                        "Could not capture {}. Aborting.",
                        self.api.token_header
                    ));
                    break;
                }
                _ => {}
            }
        }
        tracing::info!(
            saved = summary.saved,
            already_done = summary.already_done,
            skipped = summary.skipped,
            blocked = summary.blocked,
            errors = summary.errors,
            halt = ?summary.halt,
            "run finished"
        );
        Ok(summary)
    }

    /// Performs one step for the item at the current position.
    pub fn step<O: Operator + ?Sized>(&mut self, operator: &mut O) -> Result<StepOutcome> {
        let Some(item) = self.items.get(self.position).cloned() else {
            return Ok(StepOutcome::Finished);
        };

        if self.ledger.exists(&item) {
            tracing::debug!(item = %item, "already saved, skipping");
            self.position += 1;
            return Ok(StepOutcome::AlreadyDone { item });
        }

        if !self.bridge.ensure(operator)? {
            tracing::error!(item = %item, "no session token available, halting run");
            return Ok(StepOutcome::NoToken);
        }

        let prompt = StepPrompt {
            position: self.position + 1,
            total: self.items.len(),
            item_id: &item,
        };
        match operator.command(&prompt)? {
            Command::Quit => {
                tracing::info!(item = %item, "operator quit");
                Ok(StepOutcome::Quit)
            }
            Command::Skip => {
                tracing::info!(item = %item, "operator skipped item");
                self.position += 1;
                Ok(StepOutcome::Skipped { item })
            }
            Command::Relearn => {
                let captured = self.bridge.relearn(operator)?;
                Ok(StepOutcome::Relearned { captured })
            }
            Command::Fetch => self.fetch(item, operator),
        }
    }

    fn fetch<O: Operator + ?Sized>(&mut self, item: String, operator: &mut O) -> Result<StepOutcome> {
        let Some(token) = self.bridge.current() else {
            return Ok(StepOutcome::NoToken);
        };
        let request = build_request(&self.api, token, &item);
        tracing::info!(item = %item, position = self.position + 1, state = %ItemState::InFlight, "fetching");

        match self.attempt(&item, &request) {
            Ok(Attempt::Saved(filename)) => {
                tracing::info!(item = %item, filename = %filename, state = %ItemState::Saved, "saved");
                operator.notice(&format!("Saved {}", filename));
                self.position += 1;
                Ok(StepOutcome::Saved { item, filename })
            }
            Ok(Attempt::Blocked(blocked)) => {
                tracing::warn!(item = %item, state = %ItemState::Blocked, "{}", blocked);
                operator.notice(&format!(
                    "\nSTOP (possible captcha/block): {}\nSolve the captcha or log in again in the browser if needed, then type 'r' to relearn the token and retry.",
                    blocked
                ));
                Ok(StepOutcome::Blocked { item, blocked })
            }
            Err(error) => {
                let timed_out = matches!(&error, FetchError::Transport(t) if t.is_timeout());
                tracing::warn!(item = %item, state = %ItemState::Error, timed_out, "{}", error);
                self.errors.append(&item, &error.to_string())?;
                operator.notice(&format!(
                    "\nSTOP: error while fetching/decoding/saving: {}\nCheck the browser for captcha/login changes, then retry.",
                    error
                ));
                Ok(StepOutcome::Failed { item, error })
            }
        }
    }

    fn attempt(&mut self, item: &str, request: &crate::api::ApiRequest) -> Result<Attempt, FetchError> {
        let response = self.transport.post_form(request)?;
        let payload = match classify(&response)? {
            Classified::Healthy(payload) => payload,
            Classified::Blocked(blocked) => return Ok(Attempt::Blocked(blocked)),
        };
        let record = decode_payload(&payload)?;
        let filename = self.persist(item, &record)?;
        Ok(Attempt::Saved(filename))
    }

    /// Record first, then the pointer (commit), then the audit line.
    fn persist(&self, item: &str, record: &Record) -> Result<String, WriteError> {
        let filename = resolve_output_filename(&self.out_dir, item, record);
        write_json_atomic(&self.out_dir.join(&filename), record)?;
        self.ledger.record(item, &filename)?;
        self.index
            .append(&IndexEntry::new(Utc::now(), item, record, &filename))?;
        Ok(filename)
    }
}
