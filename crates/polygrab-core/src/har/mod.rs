//! HAR (HTTP Archive) request source.
//!
//! The browser stays external: the operator triggers one qualifying request in the
//! page and exports the network log as HAR. The entries are replayed into the token
//! bridge as observed outbound requests.

mod parse;
mod source;

pub use source::HarRequestSource;
