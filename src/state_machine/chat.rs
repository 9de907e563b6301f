//! Chat session transitions

use crate::gateway::{BookingResult, CompletionRequest};
use crate::history::reconstruct;
use crate::transcript::{Role, Transcript};
use thiserror::Error;

/// Shown in place of any chat transport or server failure
pub const APOLOGY: &str = "Sorry, something went wrong. Please try again in a moment.";

/// Chat session state; `AwaitingReply` is the single in-flight guard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChatState {
    #[default]
    Idle,
    AwaitingReply,
}

impl ChatState {
    pub fn is_busy(self) -> bool {
        self == ChatState::AwaitingReply
    }
}

/// Events that drive the chat session
#[derive(Debug, Clone)]
pub enum ChatEvent {
    UserMessage { text: String },
    ReplyReceived { answer: String },
    ReplyFailed { message: String },
    BookingConfirmed { result: BookingResult },
}

/// Effects for the runtime to execute, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEffect {
    AppendTurn { role: Role, text: String },
    RequestCompletion { request: CompletionRequest },
}

impl ChatEffect {
    fn user_turn(text: impl Into<String>) -> Self {
        ChatEffect::AppendTurn {
            role: Role::User,
            text: text.into(),
        }
    }

    fn assistant_turn(text: impl Into<String>) -> Self {
        ChatEffect::AppendTurn {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// Result of a chat transition
#[derive(Debug)]
pub struct ChatTransition {
    pub new_state: ChatState,
    pub effects: Vec<ChatEffect>,
}

impl ChatTransition {
    fn new(state: ChatState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    fn with_effect(mut self, effect: ChatEffect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Events the session refuses; the runtime treats these as no-ops
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatRejection {
    #[error("Message is empty")]
    EmptyMessage,
    #[error("A reply is already pending")]
    Busy,
    #[error("No request is pending")]
    NotAwaiting,
}

/// Pure transition function.
///
/// `transcript` is the log as it stands before any effect of this event is
/// applied; history for a new request is reconstructed from it.
pub fn transition(
    state: ChatState,
    transcript: &Transcript,
    event: ChatEvent,
) -> Result<ChatTransition, ChatRejection> {
    match (state, event) {
        (ChatState::Idle, ChatEvent::UserMessage { text }) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(ChatRejection::EmptyMessage);
            }
            let request = CompletionRequest {
                user_input: trimmed.to_string(),
                history: reconstruct(transcript.turns()),
            };
            Ok(ChatTransition::new(ChatState::AwaitingReply)
                .with_effect(ChatEffect::user_turn(trimmed))
                .with_effect(ChatEffect::RequestCompletion { request }))
        }

        (ChatState::AwaitingReply, ChatEvent::UserMessage { .. }) => Err(ChatRejection::Busy),

        (ChatState::AwaitingReply, ChatEvent::ReplyReceived { answer }) => {
            Ok(ChatTransition::new(ChatState::Idle).with_effect(ChatEffect::assistant_turn(answer)))
        }

        (ChatState::AwaitingReply, ChatEvent::ReplyFailed { .. }) => {
            Ok(ChatTransition::new(ChatState::Idle).with_effect(ChatEffect::assistant_turn(APOLOGY)))
        }

        (ChatState::Idle, ChatEvent::ReplyReceived { .. } | ChatEvent::ReplyFailed { .. }) => {
            Err(ChatRejection::NotAwaiting)
        }

        // Confirmations arrive from the booking modal and do not touch the guard
        (state, ChatEvent::BookingConfirmed { result }) => {
            Ok(ChatTransition::new(state).with_effect(ChatEffect::assistant_turn(acknowledgment(&result))))
        }
    }
}

/// Assistant text confirming a booking
pub fn acknowledgment(result: &BookingResult) -> String {
    let when = result.start.format("%A, %B %-d at %-I:%M %p");
    let mut text = format!(
        "✅ **You're booked!** {when}. A confirmation email is on its way to {}.",
        result.email
    );
    if let Some(event_id) = &result.event_id {
        text.push_str(&format!("\n\nReference: {event_id}"));
    }
    text
}
