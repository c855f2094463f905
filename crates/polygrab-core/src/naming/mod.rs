//! Output and pointer filename derivation.
//!
//! A record is saved under its `polymer_id` when it has one, else under the item
//! identifier. If that name is already taken on disk by a different record, the
//! composite `<polymer_id>__<item>` is used instead so two items never share an
//! output file. Record names never end in [`POINTER_SUFFIX`].

mod sanitize;

pub use sanitize::{safe_stem, STEM_MAX, UNKNOWN_STEM};

use std::path::Path;

use crate::codec::Record;

/// Suffix of the per-item completion pointer file.
pub const POINTER_SUFFIX: &str = ".pointer.json";

/// Separator before the slot number of a disambiguated pointer. Never produced by `safe_stem`.
const SLOT_SEPARATOR: char = '~';

/// `<stem>.json`, kept clear of the pointer namespace.
fn record_filename(stem: &str) -> String {
    if stem.ends_with(".pointer") {
        format!("{}_.json", stem)
    } else {
        format!("{}.json", stem)
    }
}

/// Preferred output filename for a record, before collision checks.
pub fn preferred_filename(item_id: &str, record: &Record) -> String {
    match record.polymer_id() {
        Some(polymer_id) => record_filename(&safe_stem(polymer_id)),
        None => record_filename(&safe_stem(item_id)),
    }
}

/// Collision-free composite of the record's identifying field and the item identifier.
pub fn composite_filename(item_id: &str, record: &Record) -> String {
    record_filename(&format!(
        "{}__{}",
        safe_stem(record.polymer_id().unwrap_or(UNKNOWN_STEM)),
        safe_stem(item_id)
    ))
}

/// Resolves the output filename inside `dir`, disambiguating against existing files.
///
/// An existing preferred file holding this exact record is reused: it is left over
/// from an earlier attempt whose pointer was never written. The composite name is
/// deterministic per item, so if it exists too it can only be this item's own
/// earlier, uncommitted attempt and is safe to replace.
pub fn resolve_output_filename(dir: &Path, item_id: &str, record: &Record) -> String {
    let preferred = preferred_filename(item_id, record);
    let path = dir.join(&preferred);
    if !path.exists() || holds_record(&path, record) {
        preferred
    } else {
        composite_filename(item_id, record)
    }
}

fn holds_record(path: &Path, record: &Record) -> bool {
    std::fs::read(path)
        .ok()
        .and_then(|bytes| serde_json::from_slice::<Record>(&bytes).ok())
        .is_some_and(|existing| existing == *record)
}

/// Pointer filename for an item identifier in `slot` (1-based).
///
/// Slot 1 is `<stem>.pointer.json`. Items whose identifiers sanitize to the same stem
/// take the following slots, `<stem>~2.pointer.json` and so on.
pub fn pointer_filename(item_id: &str, slot: usize) -> String {
    let stem = safe_stem(item_id);
    if slot <= 1 {
        format!("{}{}", stem, POINTER_SUFFIX)
    } else {
        format!("{}{}{}{}", stem, SLOT_SEPARATOR, slot, POINTER_SUFFIX)
    }
}
