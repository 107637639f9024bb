//! Chat Interface: multi-turn transcript against the analysis endpoint.

use crate::api::{AnalysisApi, AnalyzeReply, AnalyzeRequest};
use crate::request::{Pending, RequestSlot, Settled};
use crate::staging::{ImageSlot, StagedImage};
use crate::types::{Message, Mode, Role, Source};
use time::OffsetDateTime;

pub const WELCOME_MESSAGE: &str = "Hello! I'm Mediverse AI. Choose a mode below and ask me anything or upload medical scans for analysis.";
pub const CONNECTION_ERROR_MESSAGE: &str = "I'm having trouble connecting to the analysis service. Please ensure the backend is running and try again.";

const WELCOME_ID: &str = "welcome";

/// Time-derived message ids, bumped when two land in the same millisecond.
#[derive(Clone, Debug, Default)]
pub struct MessageIds {
    last: i128,
}

impl MessageIds {
    pub fn next(&mut self, at: OffsetDateTime) -> String {
        let millis = at.unix_timestamp_nanos() / 1_000_000;
        self.last = millis.max(self.last + 1);
        self.last.to_string()
    }
}

/// Append-only conversation log.
#[derive(Clone, Debug)]
pub struct Transcript {
    messages: Vec<Message>,
    ids: MessageIds,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            messages: vec![Message {
                id: WELCOME_ID.to_string(),
                role: Role::Assistant,
                content: WELCOME_MESSAGE.to_string(),
                image: None,
                timestamp: OffsetDateTime::now_utc(),
                confidence: None,
                sources: Vec::new(),
            }],
            ids: MessageIds::default(),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    fn push(
        &mut self,
        role: Role,
        content: String,
        image: Option<String>,
        confidence: Option<f64>,
        sources: Vec<Source>,
    ) -> &Message {
        let timestamp = OffsetDateTime::now_utc();
        let id = self.ids.next(timestamp);
        self.messages.push(Message {
            id,
            role,
            content,
            image,
            timestamp,
            confidence,
            sources,
        });
        let index = self.messages.len() - 1;
        &self.messages[index]
    }

    pub fn push_user(&mut self, content: String, image: Option<String>) -> &Message {
        self.push(Role::User, content, image, None, Vec::new())
    }

    pub fn push_assistant(&mut self, reply: AnalyzeReply) -> &Message {
        self.push(
            Role::Assistant,
            reply.text,
            None,
            reply.confidence,
            reply.sources,
        )
    }

    pub fn push_notice(&mut self, content: &str) -> &Message {
        self.push(Role::Assistant, content.to_string(), None, None, Vec::new())
    }
}

#[derive(Debug)]
pub struct ChatSession {
    transcript: Transcript,
    input: String,
    image: ImageSlot,
    mode: Mode,
    show_upload: bool,
    show_sources: bool,
    requests: RequestSlot,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            transcript: Transcript::new(),
            input: String::new(),
            image: ImageSlot::default(),
            mode: Mode::Quick,
            show_upload: false,
            show_sources: true,
            requests: RequestSlot::default(),
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Image mode also opens the upload panel.
    pub fn select_mode(&mut self, mode: Mode) {
        self.mode = mode;
        if mode == Mode::Image {
            self.show_upload = true;
        }
    }

    pub fn show_upload(&self) -> bool {
        self.show_upload
    }

    pub fn toggle_upload(&mut self) {
        self.show_upload = !self.show_upload;
    }

    pub fn sources_toggle_visible(&self) -> bool {
        self.mode == Mode::DeepSearch
    }

    pub fn show_sources(&self) -> bool {
        self.show_sources
    }

    pub fn toggle_sources(&mut self) {
        self.show_sources = !self.show_sources;
    }

    pub fn staged_image(&self) -> Option<&StagedImage> {
        self.image.get()
    }

    pub fn image_processing(&self) -> bool {
        self.image.is_processing()
    }

    /// Returns the staging generation for [`ChatSession::mark_image_ready`].
    pub fn stage_image(&mut self, image: StagedImage) -> u64 {
        let generation = self.image.accept(image);
        self.show_upload = false;
        generation
    }

    /// Clears the processing flag if `generation` is still the staged image.
    pub fn mark_image_ready(&mut self, generation: u64) -> bool {
        self.image.mark_ready(generation)
    }

    pub fn remove_image(&mut self) {
        self.image.remove();
    }

    pub fn is_sending(&self) -> bool {
        self.requests.is_pending()
    }

    pub fn can_send(&self) -> bool {
        !self.is_sending() && (!self.input.trim().is_empty() || !self.image.is_empty())
    }

    /// Appends the user message and returns the request to run.
    ///
    /// Returns `None` with no side effects when there is nothing to send or a
    /// request is already in flight.
    pub fn begin_send(&mut self) -> Option<Pending<AnalyzeRequest>> {
        if !self.can_send() {
            return None;
        }

        let query = self.input.trim().to_string();
        let staged = self.image.get();
        let preview = staged.map(|image| image.preview.clone());
        let upload = staged.map(StagedImage::to_upload);

        self.transcript.push_user(query.clone(), preview);
        self.input.clear();

        let (ticket, registration) = self.requests.start();
        Some(Pending::new(
            ticket,
            AnalyzeRequest {
                query,
                mode: self.mode,
                image: upload,
            },
            registration,
        ))
    }

    /// Appends the assistant side of a finished request. Stale results are dropped.
    pub fn complete(&mut self, settled: Settled<AnalyzeReply>) -> bool {
        if !self.requests.settle(settled.ticket) {
            tracing::debug!("dropping stale analysis result");
            return false;
        }

        match settled.result {
            Ok(reply) => {
                tracing::info!(
                    confidence = ?reply.confidence,
                    sources = reply.sources.len(),
                    "analysis answered"
                );
                self.transcript.push_assistant(reply);
                self.image.remove();
            }
            Err(err) => {
                tracing::warn!(error = %err, "analysis request failed");
                self.transcript.push_notice(CONNECTION_ERROR_MESSAGE);
            }
        }
        true
    }

    pub async fn send(&mut self, api: &dyn AnalysisApi) {
        if let Some(pending) = self.begin_send() {
            let settled = pending.run(api).await;
            self.complete(settled);
        }
    }

    pub fn cancel(&mut self) {
        self.requests.cancel();
    }
}

pub fn format_relevance(score: f64) -> String {
    format!("{:.0}%", score * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use time::macros::datetime;

    #[test]
    fn ids_stay_unique_within_a_millisecond() {
        let mut ids = MessageIds::default();
        let at = datetime!(2026-01-01 12:00 UTC);
        let first = ids.next(at);
        let second = ids.next(at);
        assert_ne!(first, second);
        assert!(second.parse::<i128>().unwrap() > first.parse::<i128>().unwrap());
    }

    #[test]
    fn transcript_opens_with_welcome() {
        let session = ChatSession::new();
        let first = &session.transcript().messages()[0];
        assert_eq!(first.role, Role::Assistant);
        assert_eq!(first.content, WELCOME_MESSAGE);
    }

    #[test]
    fn image_mode_opens_upload_panel() {
        let mut session = ChatSession::new();
        session.select_mode(Mode::Image);
        assert!(session.show_upload());
        session.select_mode(Mode::Quick);
        // Switching away leaves the panel as the user left it
        assert!(session.show_upload());
    }

    #[test]
    fn sources_toggle_only_in_deep_search() {
        let mut session = ChatSession::new();
        for mode in [Mode::Quick, Mode::Image, Mode::Expert] {
            session.select_mode(mode);
            assert!(!session.sources_toggle_visible());
        }
        session.select_mode(Mode::DeepSearch);
        assert!(session.sources_toggle_visible());
        assert!(session.show_sources());
        session.toggle_sources();
        assert!(!session.show_sources());
    }

    #[test]
    fn send_control_disabled_while_pending() {
        let mut session = ChatSession::new();
        session.set_input("first");
        let pending = session.begin_send().unwrap();
        assert!(session.is_sending());
        assert_eq!(session.input(), "");

        session.set_input("second");
        assert!(!session.can_send());
        assert!(session.begin_send().is_none());

        session.complete(Settled {
            ticket: pending.ticket,
            result: Err(ApiError::Cancelled),
        });
        assert!(!session.is_sending());
        assert!(session.can_send());
    }

    #[test]
    fn image_only_message_is_sendable() {
        let mut session = ChatSession::new();
        session.stage_image(StagedImage::from_bytes("xray.png", vec![1, 2, 3]).unwrap());
        let pending = session.begin_send().unwrap();
        assert_eq!(pending.request.query, "");
        assert_eq!(
            pending.request.image.as_ref().map(|i| i.file_name.as_str()),
            Some("xray.png")
        );
        let user = session.transcript().last().unwrap();
        assert!(user.image.as_deref().unwrap().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn failure_keeps_staged_image() {
        let mut session = ChatSession::new();
        session.set_input("what is this?");
        session.stage_image(StagedImage::from_bytes("xray.png", vec![1]).unwrap());
        let pending = session.begin_send().unwrap();
        session.complete(Settled {
            ticket: pending.ticket,
            result: Err(ApiError::Cancelled),
        });
        assert!(session.staged_image().is_some());
        assert_eq!(session.input(), "");
        let notice = session.transcript().last().unwrap();
        assert_eq!(notice.content, CONNECTION_ERROR_MESSAGE);
        assert_eq!(notice.confidence, None);
    }

    #[test]
    fn relevance_is_whole_percent() {
        assert_eq!(format_relevance(0.9), "90%");
        assert_eq!(format_relevance(0.456), "46%");
    }
}
