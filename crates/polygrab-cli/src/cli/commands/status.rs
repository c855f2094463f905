//! `polygrab status` – done/pending counts from the completion ledger.

use anyhow::Result;
use polygrab_core::input::read_items;
use polygrab_core::ledger::CompletionLedger;
use std::path::Path;

pub fn run_status(input: &Path, out: &Path) -> Result<()> {
    let items = read_items(input)?;
    let ledger = CompletionLedger::new(out);
    let done = ledger.count_done(&items);
    println!("{:<10} {}", "TOTAL", items.len());
    println!("{:<10} {}", "DONE", done);
    println!("{:<10} {}", "PENDING", items.len() - done);
    match ledger.first_pending(&items) {
        Some(i) => println!("{:<10} [{}/{}] {}", "NEXT", i + 1, items.len(), items[i]),
        None => println!("All items done."),
    }
    Ok(())
}
