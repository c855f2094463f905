//! Token bridge: captures the session token from requests the browser makes.
//!
//! The automated requester can never mint the token itself. The only way in is
//! [`TokenBridge::observe`], the hook fed with outbound requests seen in the
//! operator's browser session. The bridge owns the single token slot and is passed
//! explicitly to whoever needs it; there is no global state.
//!
//! The token has no lifetime of its own. It is dropped only when the operator asks
//! for a relearn; expiry shows up downstream as a blocked response.

mod observed;

pub use observed::{ObservedRequest, RequestSource};

use anyhow::Result;
use std::fmt;

use crate::config::ApiConfig;
use crate::logging::redact_token;
use crate::operator::Operator;

/// The captured credential, plus the session cookie when cookie forwarding is on.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub value: String,
    pub cookie: Option<String>,
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("value", &redact_token(&self.value))
            .field("cookie", &self.cookie.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Which observed request carries the token, and which header holds it.
#[derive(Debug, Clone)]
pub struct RequestMatcher {
    pub url: String,
    pub method: String,
    pub token_header: String,
    pub capture_cookie: bool,
}

impl RequestMatcher {
    pub fn from_config(api: &ApiConfig, capture_cookie: bool) -> Self {
        Self {
            url: api.url.clone(),
            method: "POST".to_string(),
            token_header: api.token_header.clone(),
            capture_cookie,
        }
    }

    /// Token (and cookie) carried by `request`, if it is the qualifying request.
    pub fn extract(&self, request: &ObservedRequest) -> Option<SessionToken> {
        if request.url != self.url || !request.method.eq_ignore_ascii_case(&self.method) {
            return None;
        }
        let value = request.header(&self.token_header)?.trim();
        if value.is_empty() {
            return None;
        }
        let cookie = if self.capture_cookie {
            request
                .header("Cookie")
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from)
        } else {
            None
        };
        Some(SessionToken {
            value: value.to_string(),
            cookie,
        })
    }
}

pub struct TokenBridge<S> {
    source: S,
    matcher: RequestMatcher,
    slot: Option<SessionToken>,
}

impl<S: RequestSource> TokenBridge<S> {
    pub fn new(source: S, matcher: RequestMatcher) -> Self {
        Self {
            source,
            matcher,
            slot: None,
        }
    }

    pub fn current(&self) -> Option<&SessionToken> {
        self.slot.as_ref()
    }

    /// Request-observation hook. Returns true if `request` refreshed the slot.
    pub fn observe(&mut self, request: &ObservedRequest) -> bool {
        match self.matcher.extract(request) {
            Some(token) => {
                tracing::info!(token = %redact_token(&token.value), "session token captured");
                self.slot = Some(token);
                true
            }
            None => false,
        }
    }

    /// Drops the held token.
    pub fn clear(&mut self) {
        if self.slot.take().is_some() {
            tracing::info!("session token cleared");
        }
    }

    /// Feeds everything the source observed since the last poll through the hook.
    /// An unreadable source counts as nothing observed; the operator is told why.
    pub fn poll<O: Operator + ?Sized>(&mut self, operator: &mut O) -> bool {
        match self.source.drain() {
            Ok(requests) => requests.iter().fold(false, |hit, r| self.observe(r) || hit),
            Err(e) => {
                tracing::warn!("request source unreadable: {:#}", e);
                operator.notice(&format!("Could not read observed browser traffic: {:#}", e));
                false
            }
        }
    }

    /// Makes sure a token is held, asking the operator to trigger one qualifying
    /// request if not. Returns false if there is still no token afterwards.
    pub fn ensure<O: Operator + ?Sized>(&mut self, operator: &mut O) -> Result<bool> {
        if self.slot.is_some() {
            return Ok(true);
        }
        self.poll(operator);
        if self.slot.is_some() {
            return Ok(true);
        }
        operator.confirm(&format!(
            "Need {}.\nIn the browser, open ONE record so its details load (this sends the request once),\nthen export the network log as HAR.",
            self.matcher.token_header
        ))?;
        self.poll(operator);
        Ok(self.slot.is_some())
    }

    /// Forces a fresh capture: clears the slot, then waits for a newly observed request.
    pub fn relearn<O: Operator + ?Sized>(&mut self, operator: &mut O) -> Result<bool> {
        self.clear();
        operator.confirm(
            "Open ONE record in the browser to trigger a details load, export the HAR again.",
        )?;
        self.poll(operator);
        match &self.slot {
            Some(token) => {
                operator.notice(&format!(
                    "Updated {}: {}",
                    self.matcher.token_header,
                    redact_token(&token.value)
                ));
                Ok(true)
            }
            None => {
                operator.notice(&format!(
                    "{} still not observed. Try triggering the request again.",
                    self.matcher.token_header
                ));
                Ok(false)
            }
        }
    }
}
