//! Demo Console: one prompt, one answer.

use crate::api::{AnalysisApi, QueryReply, QueryRequest};
use crate::request::{Pending, RequestSlot, Settled};
use crate::reveal::Reveal;

pub const DEFAULT_QUERY: &str = "Summarize the latest hypertension management guidelines";
pub const EMPTY_PROMPT_MESSAGE: &str = "Enter a clinical question to continue.";

#[derive(Clone, Debug, Default, PartialEq)]
pub enum DemoState {
    #[default]
    Idle,
    Pending,
    Success {
        payload: String,
        confidence: f64,
    },
    Error {
        message: String,
    },
}

impl DemoState {
    pub fn is_pending(&self) -> bool {
        matches!(self, DemoState::Pending)
    }
}

#[derive(Debug)]
pub struct DemoConsole {
    prompt: String,
    state: DemoState,
    reveal: Reveal,
    requests: RequestSlot,
}

impl Default for DemoConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoConsole {
    pub fn new() -> Self {
        Self {
            prompt: DEFAULT_QUERY.to_string(),
            state: DemoState::Idle,
            reveal: Reveal::default(),
            requests: RequestSlot::default(),
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn state(&self) -> &DemoState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    /// Validates the prompt and enters `Pending`.
    ///
    /// An empty prompt moves straight to `Error` and yields nothing to run.
    pub fn begin_submit(&mut self) -> Option<Pending<QueryRequest>> {
        if self.prompt.trim().is_empty() {
            self.requests.cancel();
            self.state = DemoState::Error {
                message: EMPTY_PROMPT_MESSAGE.to_string(),
            };
            return None;
        }

        let (ticket, registration) = self.requests.start();
        self.state = DemoState::Pending;
        Some(Pending::new(
            ticket,
            QueryRequest::new(self.prompt.clone()),
            registration,
        ))
    }

    /// Applies a finished request. Returns `false` when the result was stale.
    pub fn complete(&mut self, settled: Settled<QueryReply>) -> bool {
        if !self.requests.settle(settled.ticket) {
            tracing::debug!("dropping stale demo result");
            return false;
        }

        match settled.result {
            Ok(reply) => {
                tracing::info!(confidence = reply.confidence, "demo query answered");
                self.reveal.restart(reply.text.clone());
                self.state = DemoState::Success {
                    payload: reply.text,
                    confidence: reply.confidence,
                };
            }
            Err(err) => {
                tracing::warn!(error = %err, "demo query failed");
                self.reveal.clear();
                self.state = DemoState::Error {
                    message: err.user_message(),
                };
            }
        }
        true
    }

    pub async fn submit(&mut self, api: &dyn AnalysisApi) {
        if let Some(pending) = self.begin_submit() {
            let settled = pending.run(api).await;
            self.complete(settled);
        }
    }

    /// Aborts the in-flight request, if any, without touching the prompt.
    pub fn cancel(&mut self) {
        self.requests.cancel();
        if self.state.is_pending() {
            self.state = DemoState::Idle;
        }
    }

    pub fn reset(&mut self) {
        self.requests.cancel();
        self.prompt = DEFAULT_QUERY.to_string();
        self.state = DemoState::Idle;
        self.reveal.clear();
    }

    /// Advances the typing effect. Returns `true` when nothing is left to show.
    pub fn tick_reveal(&mut self) -> bool {
        self.reveal.tick()
    }

    pub fn finish_reveal(&mut self) {
        self.reveal.finish();
    }

    pub fn revealed_text(&self) -> &str {
        self.reveal.visible()
    }

    pub fn helper_copy(&self) -> &str {
        match &self.state {
            DemoState::Idle => "Ask Mediverse anything about clinical workflows",
            DemoState::Pending => "Consulting Mediverse clinical intelligence",
            DemoState::Success { .. } => "Mediverse found evidence-based guidance",
            DemoState::Error { message } => message,
        }
    }
}

pub fn format_confidence(confidence: f64) -> String {
    format!("{:.1}%", confidence * 100.0)
}
