//! CLI command handlers, one file per subcommand.

mod decode;
mod load;
mod run;
mod status;

pub use decode::run_decode;
pub use load::run_load;
pub use run::{run_fetch, RunOptions};
pub use status::run_status;
