//! Network-level failure while talking to the API.

use thiserror::Error;

/// Curl reported an error (timeout, connection refused, TLS, ...). No response was read.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{0}")]
    Curl(#[from] curl::Error),
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        match self {
            TransportError::Curl(e) => e.is_operation_timedout(),
        }
    }
}
