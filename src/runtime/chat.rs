//! Chat session controller

use crate::gateway::{BookingResult, CompletionClient, CompletionReply, CompletionRequest, GatewayError};
use crate::state_machine::chat::{transition, ChatEffect, ChatEvent, ChatState};
use crate::transcript::{RatingSink, Transcript, TranscriptStore, Turn};
use tokio::sync::watch;

/// A completion request issued by [`ChatSession::begin_send`]; hand it back
/// to [`ChatSession::finish_send`] with the outcome
#[derive(Debug, Clone)]
pub struct PendingReply {
    pub request: CompletionRequest,
    generation: u64,
}

/// One open chat session: transcript, in-flight guard and backend client
pub struct ChatSession<C> {
    state: ChatState,
    transcript: TranscriptStore,
    client: C,
    /// Bumped by `restart`; replies issued under an older value are dropped
    generation: u64,
}

impl<C: CompletionClient> ChatSession<C> {
    /// Start a session whose transcript holds only the welcome turn
    pub fn new(client: C, welcome: impl Into<String>) -> Self {
        Self {
            state: ChatState::Idle,
            transcript: TranscriptStore::seeded(welcome),
            client,
            generation: 0,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    pub fn transcript(&self) -> &Transcript {
        self.transcript.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Transcript> {
        self.transcript.subscribe()
    }

    pub fn rating_sink(&mut self) -> RatingSink<'_> {
        RatingSink::new(&mut self.transcript)
    }

    /// Send a message and wait for the reply (or the apology).
    ///
    /// Blank input and calls made while a reply is pending are ignored.
    pub async fn send_user_message(&mut self, text: &str) {
        let Some(pending) = self.begin_send(text) else {
            return;
        };
        let outcome = self.client.complete(&pending.request).await;
        self.finish_send(&pending, outcome);
    }

    /// Optimistically append the user turn and mark the session busy.
    ///
    /// Returns the request to issue, or `None` when the message is refused.
    pub fn begin_send(&mut self, text: &str) -> Option<PendingReply> {
        let request = self.dispatch(ChatEvent::UserMessage {
            text: text.to_string(),
        })?;
        Some(PendingReply {
            request,
            generation: self.generation,
        })
    }

    /// Apply the outcome of the request issued by [`Self::begin_send`].
    ///
    /// Outcomes for a request issued before the last [`Self::restart`] are
    /// discarded.
    pub fn finish_send(&mut self, pending: &PendingReply, outcome: Result<CompletionReply, GatewayError>) {
        if pending.generation != self.generation {
            tracing::debug!(
                issued = pending.generation,
                current = self.generation,
                "Dropping reply from a previous session"
            );
            return;
        }
        let event = match outcome {
            Ok(reply) => ChatEvent::ReplyReceived { answer: reply.answer },
            Err(e) => {
                tracing::error!(kind = ?e.kind, error = %e, "Chat request failed, showing apology");
                ChatEvent::ReplyFailed { message: e.message }
            }
        };
        self.dispatch(event);
    }

    /// Start over with a fresh transcript; a reply still in flight is dropped
    pub fn restart(&mut self, welcome: impl Into<String>) {
        self.generation += 1;
        self.state = ChatState::Idle;
        self.transcript.reset(welcome);
    }

    /// Add the assistant turn acknowledging a completed booking
    pub fn acknowledge_booking(&mut self, result: BookingResult) {
        self.dispatch(ChatEvent::BookingConfirmed { result });
    }

    fn dispatch(&mut self, event: ChatEvent) -> Option<CompletionRequest> {
        let result = match transition(self.state, self.transcript.snapshot(), event) {
            Ok(result) => result,
            Err(rejection) => {
                tracing::debug!(state = ?self.state, %rejection, "Chat event ignored");
                return None;
            }
        };

        self.state = result.new_state;
        let mut request = None;
        for effect in result.effects {
            match effect {
                ChatEffect::AppendTurn { role, text } => {
                    self.transcript.append(Turn::new(role, text));
                }
                ChatEffect::RequestCompletion { request: r } => request = Some(r),
            }
        }
        request
    }
}
