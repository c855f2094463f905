//! In-crate fakes for the driver's seams: operator, browser traffic, transport.

use std::collections::VecDeque;

use anyhow::Result;

use crate::api::{ApiRequest, ApiResponse, Transport, TransportError};
use crate::operator::{Command, Operator, StepPrompt};
use crate::token::{ObservedRequest, RequestSource};

/// Operator that replays commands; each confirm can release queued browser traffic.
#[derive(Default)]
pub struct ScriptedOperator {
    pub commands: VecDeque<Command>,
    pub prompts: Vec<String>,
    pub confirms: usize,
    pub notices: Vec<String>,
}

impl ScriptedOperator {
    pub fn with_commands(commands: &[Command]) -> Self {
        Self {
            commands: commands.iter().copied().collect(),
            ..Self::default()
        }
    }
}

impl Operator for ScriptedOperator {
    fn command(&mut self, prompt: &StepPrompt<'_>) -> Result<Command> {
        self.prompts.push(prompt.item_id.to_string());
        Ok(self.commands.pop_front().unwrap_or(Command::Quit))
    }

    fn confirm(&mut self, _message: &str) -> Result<()> {
        self.confirms += 1;
        Ok(())
    }

    fn notice(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}

/// Source that hands out one prepared batch per drain.
#[derive(Default)]
pub struct QueueSource {
    pub batches: VecDeque<Vec<ObservedRequest>>,
    pub drains: usize,
}

impl QueueSource {
    pub fn with_batches(batches: Vec<Vec<ObservedRequest>>) -> Self {
        Self {
            batches: batches.into(),
            drains: 0,
        }
    }
}

impl RequestSource for QueueSource {
    fn drain(&mut self) -> Result<Vec<ObservedRequest>> {
        self.drains += 1;
        Ok(self.batches.pop_front().unwrap_or_default())
    }
}

pub fn api_post(url: &str, token_header: &str, token: &str) -> ObservedRequest {
    ObservedRequest {
        method: "POST".into(),
        url: url.into(),
        headers: vec![
            (token_header.to_ascii_lowercase(), token.into()),
            ("Cookie".into(), "JSESSIONID=s1".into()),
        ],
    }
}

/// Transport that returns canned responses in order and records every request.
#[derive(Default)]
pub struct FakeTransport {
    pub responses: VecDeque<Result<ApiResponse, TransportError>>,
    pub requests: Vec<ApiRequest>,
}

impl FakeTransport {
    pub fn push_response(&mut self, status: u32, content_type: &str, body: &str) {
        self.responses.push_back(Ok(ApiResponse {
            status,
            content_type: Some(content_type.to_string()),
            body: body.as_bytes().to_vec(),
        }));
    }

    pub fn push_error(&mut self, err: curl::Error) {
        self.responses.push_back(Err(TransportError::Curl(err)));
    }
}

impl Transport for FakeTransport {
    fn post_form(&mut self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests.push(request.clone());
        self.responses
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Curl(curl::Error::new(7))))
    }
}
