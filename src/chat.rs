//! Sommelier chat session
//!
//! Owns the append-only transcript and the in-flight flag. A send moves the
//! session `Idle -> Sending -> Idle`; while sending, further sends are
//! rejected. The outbound call is split into [`ChatSession::begin`] and
//! [`ChatSession::complete`] so the UI can run it on a background task;
//! [`ChatSession::send`] composes both for callers that can simply await.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::ai::{AiError, ResponseGenerator};

pub const GREETING: &str =
    "Namaste! I am the Lailpuriya Tea Sommelier. How can I help you choose the perfect tea today?";

pub const FALLBACK_REPLY: &str =
    "I apologize, but I'm having trouble connecting to the tea gardens right now. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatRole {
    User,
    Assistant,
}

/// A single transcript entry. Never edited once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    /// Creation instant, milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl ChatMessage {
    pub fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// Why a send did not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendBlocked {
    /// Input was empty or whitespace only
    EmptyInput,
    /// A reply is already being generated
    InFlight,
    /// No API key yet; the caller should run credential capture and retry
    NeedsCredential,
}

/// An outbound request that has been recorded in the transcript but not yet
/// answered. Must be handed back to [`ChatSession::complete`].
#[must_use = "the session stays in flight until the reply is completed"]
#[derive(Debug, Clone)]
pub struct PendingReply {
    /// Transcript as it was before the new user message
    pub history: Vec<ChatMessage>,
    pub message: String,
}

#[derive(Debug)]
pub struct ChatSession {
    transcript: Vec<ChatMessage>,
    in_flight: bool,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    /// A fresh session opened by the sommelier's greeting.
    pub fn new() -> Self {
        Self {
            transcript: vec![ChatMessage::new(ChatRole::Assistant, GREETING)],
            in_flight: false,
        }
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Validate and record a user message, entering the sending state.
    ///
    /// `generator` is `None` until a credential has been captured. On success
    /// it is handed back alongside the pending request.
    pub fn begin<G>(
        &mut self,
        text: &str,
        generator: Option<G>,
    ) -> Result<(PendingReply, G), SendBlocked> {
        if text.trim().is_empty() {
            return Err(SendBlocked::EmptyInput);
        }
        if self.in_flight {
            return Err(SendBlocked::InFlight);
        }
        let Some(generator) = generator else {
            return Err(SendBlocked::NeedsCredential);
        };

        let history = self.transcript.clone();
        self.transcript.push(ChatMessage::new(ChatRole::User, text));
        self.in_flight = true;

        info!(history_len = history.len(), message_len = text.len(), "chat: sending");

        let pending = PendingReply {
            history,
            message: text.to_string(),
        };
        Ok((pending, generator))
    }

    /// Record the outcome of a pending request and return to idle.
    ///
    /// Failures never reach the transcript; they are replaced by
    /// [`FALLBACK_REPLY`].
    pub fn complete(&mut self, pending: PendingReply, result: Result<String, AiError>) {
        let text = match result {
            Ok(text) => {
                info!(reply_len = text.len(), "chat: reply received");
                text
            }
            Err(e) => {
                warn!(error = %e, message_len = pending.message.len(), "chat: reply failed, using fallback");
                FALLBACK_REPLY.to_string()
            }
        };

        self.transcript.push(ChatMessage::new(ChatRole::Assistant, text));
        self.in_flight = false;
    }

    /// Send `text` and wait for the reply.
    ///
    /// `generator` is `None` when no credential has been captured yet.
    pub async fn send(
        &mut self,
        generator: Option<&dyn ResponseGenerator>,
        text: &str,
    ) -> Result<(), SendBlocked> {
        let (pending, generator) = self.begin(text, generator)?;
        let result = generator.generate(&pending.history, &pending.message).await;
        self.complete(pending, result);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct MockGenerator {
        reply: Result<String, ()>,
        calls: Mutex<Vec<(usize, String)>>,
    }

    impl MockGenerator {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl ResponseGenerator for MockGenerator {
        async fn generate(&self, history: &[ChatMessage], message: &str) -> Result<String, AiError> {
            self.calls.lock().unwrap().push((history.len(), message.to_string()));
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(()) => Err(AiError::ApiRequest("connection refused".into())),
            }
        }
    }

    #[test]
    fn test_new_session_is_idle_with_greeting() {
        let session = ChatSession::new();
        assert!(!session.is_in_flight());
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.transcript()[0].role, ChatRole::Assistant);
        assert_eq!(session.transcript()[0].text, GREETING);
    }

    #[tokio::test]
    async fn test_send_appends_user_then_assistant() {
        let mut session = ChatSession::new();
        let generator = MockGenerator::replying("Boil strong...");

        session
            .send(Some(&generator), "How do I brew Kadak chai?")
            .await
            .unwrap();

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[1].role, ChatRole::User);
        assert_eq!(transcript[1].text, "How do I brew Kadak chai?");
        assert_eq!(transcript[2].role, ChatRole::Assistant);
        assert_eq!(transcript[2].text, "Boil strong...");
        assert!(transcript[1].timestamp <= transcript[2].timestamp);
        assert!(!session.is_in_flight());
    }

    #[tokio::test]
    async fn test_send_passes_prior_transcript_and_new_message() {
        let mut session = ChatSession::new();
        let generator = MockGenerator::replying("Try the 500g Family pack.");

        session.send(Some(&generator), "Which size?").await.unwrap();
        session.send(Some(&generator), "And for four people?").await.unwrap();

        let calls = generator.calls.lock().unwrap();
        assert_eq!(calls[0], (1, "Which size?".to_string()));
        assert_eq!(calls[1], (3, "And for four people?".to_string()));
    }

    #[tokio::test]
    async fn test_empty_send_is_noop() {
        let mut session = ChatSession::new();
        let generator = MockGenerator::replying("unused");

        assert_eq!(session.send(Some(&generator), "").await, Err(SendBlocked::EmptyInput));
        assert_eq!(session.send(Some(&generator), "  \t\n").await, Err(SendBlocked::EmptyInput));

        assert_eq!(session.transcript().len(), 1);
        assert_eq!(generator.call_count(), 0);
        assert!(!session.is_in_flight());
    }

    #[tokio::test]
    async fn test_send_while_in_flight_is_noop() {
        let mut session = ChatSession::new();
        let generator = MockGenerator::replying("second");

        let (pending, ()) = session.begin("first question", Some(())).unwrap();
        assert!(session.is_in_flight());
        let len_while_sending = session.transcript().len();

        let result = session.send(Some(&generator), "second question").await;

        assert_eq!(result, Err(SendBlocked::InFlight));
        assert_eq!(session.transcript().len(), len_while_sending);
        assert_eq!(generator.call_count(), 0);

        session.complete(pending, Ok("first answer".into()));
        assert!(!session.is_in_flight());
        assert_eq!(session.transcript().last().unwrap().text, "first answer");
    }

    #[tokio::test]
    async fn test_failed_call_appends_single_fallback() {
        let mut session = ChatSession::new();
        let generator = MockGenerator::failing();

        session.send(Some(&generator), "Is it organic?").await.unwrap();

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[2].role, ChatRole::Assistant);
        assert_eq!(transcript[2].text, FALLBACK_REPLY);
        assert!(!session.is_in_flight());
    }

    #[tokio::test]
    async fn test_missing_credential_defers_without_recording() {
        let mut session = ChatSession::new();

        let result = session.send(None, "Hello").await;

        assert_eq!(result, Err(SendBlocked::NeedsCredential));
        assert_eq!(session.transcript().len(), 1);
        assert!(!session.is_in_flight());
    }

    #[test]
    fn test_empty_input_checked_before_credential() {
        let mut session = ChatSession::new();
        assert_eq!(session.begin(" ", None::<()>).unwrap_err(), SendBlocked::EmptyInput);
    }

    #[test]
    fn test_complete_with_empty_response_error_uses_fallback() {
        let mut session = ChatSession::new();
        let (pending, ()) = session.begin("Namaste", Some(())).unwrap();
        assert_eq!(pending.history.len(), 1);
        assert_eq!(pending.message, "Namaste");

        session.complete(pending, Err(AiError::EmptyResponse));

        assert_eq!(session.transcript().last().unwrap().text, FALLBACK_REPLY);
        assert!(!session.is_in_flight());
    }

    #[tokio::test]
    async fn test_resend_after_failure_is_accepted() {
        let mut session = ChatSession::new();

        session.send(Some(&MockGenerator::failing()), "Hello").await.unwrap();
        session
            .send(Some(&MockGenerator::replying("Namaste!")), "Hello")
            .await
            .unwrap();

        assert_eq!(session.transcript().len(), 5);
        assert_eq!(session.transcript()[4].text, "Namaste!");
    }
}
