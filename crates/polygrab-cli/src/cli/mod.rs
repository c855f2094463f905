//! CLI for the polygrab record fetcher.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use polygrab_core::config;
use std::path::PathBuf;

use commands::{run_decode, run_fetch, run_load, run_status, RunOptions};

/// Top-level CLI for polygrab.
#[derive(Debug, Parser)]
#[command(name = "polygrab")]
#[command(about = "polygrab: operator-paced, resumable record fetcher", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Step through the item list, fetching each pending record.
    Run {
        /// Newline-delimited item identifiers (default: input_path from config).
        #[arg(long, value_name = "PATH")]
        input: Option<PathBuf>,
        /// Output directory for records, pointers, index and error log (default: output_dir from config).
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
        /// HAR export the browser session token is captured from (default: har_path from config).
        #[arg(long, value_name = "PATH")]
        har: Option<PathBuf>,
        /// Also forward the browser's Cookie header on fetch requests.
        #[arg(long)]
        forward_cookies: bool,
    },

    /// Show how many items are done and which one is next. No network.
    Status {
        /// Newline-delimited item identifiers (default: input_path from config).
        #[arg(long, value_name = "PATH")]
        input: Option<PathBuf>,
        /// Output directory (default: output_dir from config).
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },

    /// Decode one transport-encoded payload file (raw base64 or a full API reply) and print it.
    Decode {
        /// Path to the payload file.
        path: PathBuf,
    },

    /// Aggregate saved data in a directory and print it as one JSON array.
    Load {
        /// Directory of `b64_<n>.txt` listing pages or saved records.
        dir: PathBuf,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Run {
                input,
                out,
                har,
                forward_cookies,
            } => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                let opts = RunOptions {
                    input: input.unwrap_or_else(|| cfg.input_path.clone()),
                    out: out.unwrap_or_else(|| cfg.output_dir.clone()),
                    har: har.unwrap_or_else(|| cfg.har_path.clone()),
                    forward_cookies: forward_cookies || cfg.forward_cookies,
                };
                run_fetch(&cfg.api, &opts)?;
            }
            CliCommand::Status { input, out } => {
                let cfg = config::load_or_init()?;
                let input = input.unwrap_or(cfg.input_path);
                let out = out.unwrap_or(cfg.output_dir);
                run_status(&input, &out)?;
            }
            CliCommand::Decode { path } => run_decode(&path)?,
            CliCommand::Load { dir } => run_load(&dir)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
