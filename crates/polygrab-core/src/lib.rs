pub mod config;
pub mod logging;

pub mod api;
pub mod codec;
pub mod driver;
pub mod har;
pub mod input;
pub mod journal;
pub mod ledger;
pub mod loader;
pub mod naming;
pub mod operator;
pub mod storage;
pub mod token;

#[cfg(test)]
pub(crate) mod testing;
