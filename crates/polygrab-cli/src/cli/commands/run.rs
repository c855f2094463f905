//! `polygrab run` – the operator-paced stepper.

use anyhow::Result;
use polygrab_core::api::CurlTransport;
use polygrab_core::config::ApiConfig;
use polygrab_core::driver::{FetchDriver, Halt};
use polygrab_core::har::HarRequestSource;
use polygrab_core::input::read_items;
use polygrab_core::operator::{ConsoleOperator, Operator, LEGEND};
use polygrab_core::token::{RequestMatcher, TokenBridge};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input: PathBuf,
    pub out: PathBuf,
    pub har: PathBuf,
    pub forward_cookies: bool,
}

pub fn run_fetch(api: &ApiConfig, opts: &RunOptions) -> Result<()> {
    let items = read_items(&opts.input)?;
    if items.is_empty() {
        println!("No items in {}.", opts.input.display());
        return Ok(());
    }

    let bridge = TokenBridge::new(
        HarRequestSource::new(&opts.har),
        RequestMatcher::from_config(api, opts.forward_cookies),
    );
    let mut driver = FetchDriver::new(
        api.clone(),
        &opts.out,
        items,
        CurlTransport::from_config(api),
        bridge,
    )?;

    let mut operator = ConsoleOperator::stdio();
    println!("{}", LEGEND);
    println!("Token source: {}", opts.har.display());
    operator.confirm(&format!(
        "Open {} in the browser and log in.",
        api.page_url
    ))?;

    let summary = driver.run(&mut operator)?;
    println!("{}", summary);
    if summary.halt == Halt::NoToken {
        anyhow::bail!("no {} captured from {}", api.token_header, opts.har.display());
    }
    Ok(())
}
