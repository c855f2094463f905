//! Outbound requests as seen by the browser capability.

use anyhow::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl ObservedRequest {
    /// Case-insensitive header lookup; the last occurrence wins.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Capability that exposes outbound requests made by the operator's browser.
pub trait RequestSource {
    /// Requests observed since the previous call, oldest first.
    fn drain(&mut self) -> Result<Vec<ObservedRequest>>;
}

impl<S: RequestSource + ?Sized> RequestSource for Box<S> {
    fn drain(&mut self) -> Result<Vec<ObservedRequest>> {
        (**self).drain()
    }
}
