//! Sequential logs kept beside the saved records: the audit index and the error log.

mod errors;
mod index;

pub use errors::{ErrorLog, ERRORS_FILENAME};
pub use index::{IndexEntry, IndexLog, INDEX_FILENAME};
