//! Chat transcript store
//!
//! Ordered, append-only log of chat turns for one open session. Every
//! mutation replaces the published snapshot so renderers subscribed through
//! [`TranscriptStore::subscribe`] observe each change.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::watch;
use uuid::Uuid;

/// Opaque, session-stable turn identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurnId(Uuid);

impl TurnId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TurnId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Author of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub id: TurnId,
    pub role: Role,
    pub text: String,
    /// Helpfulness feedback; only ever set on assistant turns
    pub rating: Option<bool>,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }

    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: TurnId::new(),
            role,
            text: text.into(),
            rating: None,
        }
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }
}

/// Immutable snapshot of the transcript
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn get(&self, id: TurnId) -> Option<&Turn> {
        self.turns.iter().find(|t| t.id == id)
    }

    /// The last assistant turn, recomputed from the log on every call
    pub fn most_recent_assistant_turn(&self) -> Option<&Turn> {
        self.turns.iter().rev().find(|t| t.is_assistant())
    }

    /// The turn that should carry the "was this helpful" prompt, if any
    pub fn feedback_target(&self) -> Option<&Turn> {
        self.most_recent_assistant_turn()
            .filter(|t| t.rating.is_none())
    }
}

/// Owner of the session transcript
pub struct TranscriptStore {
    current: Transcript,
    publisher: watch::Sender<Transcript>,
}

impl TranscriptStore {
    pub fn new() -> Self {
        let (publisher, _) = watch::channel(Transcript::default());
        Self {
            current: Transcript::default(),
            publisher,
        }
    }

    /// Start a session transcript seeded with the assistant welcome turn
    pub fn seeded(welcome: impl Into<String>) -> Self {
        let mut store = Self::new();
        store.append(Turn::assistant(welcome));
        store
    }

    pub fn snapshot(&self) -> &Transcript {
        &self.current
    }

    /// Receive every future snapshot
    pub fn subscribe(&self) -> watch::Receiver<Transcript> {
        self.publisher.subscribe()
    }

    /// Append a turn at the end and return the stored copy.
    ///
    /// The id already carried by `turn` is kept unless another turn in the
    /// log uses it, in which case a fresh one is assigned.
    pub fn append(&mut self, mut turn: Turn) -> Turn {
        if self.current.get(turn.id).is_some() {
            turn.id = TurnId::new();
        }
        let mut next = self.current.clone();
        next.turns.push(turn.clone());
        self.publish(next);
        turn
    }

    /// Discard the session and start over from a single welcome turn
    pub fn reset(&mut self, welcome: impl Into<String>) {
        let mut next = Transcript::default();
        next.turns.push(Turn::assistant(welcome));
        self.publish(next);
    }

    /// Set the rating of an assistant turn. Returns whether anything changed.
    pub fn rate(&mut self, id: TurnId, value: bool) -> bool {
        let Some(index) = self
            .current
            .turns
            .iter()
            .position(|t| t.id == id && t.is_assistant())
        else {
            tracing::debug!(turn_id = %id, "Ignoring rating for unknown or user turn");
            return false;
        };

        let mut next = self.current.clone();
        next.turns[index].rating = Some(value);
        self.publish(next);
        true
    }

    fn publish(&mut self, next: Transcript) {
        self.current = next;
        self.publisher.send_replace(self.current.clone());
    }
}

impl Default for TranscriptStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Text shown to the user once a rating is recorded
pub fn rating_acknowledgment(helpful: bool) -> &'static str {
    if helpful {
        "Thanks for the feedback!"
    } else {
        "Got it, thanks!"
    }
}

/// Write path for helpfulness feedback coming from UI affordances
pub struct RatingSink<'a> {
    store: &'a mut TranscriptStore,
}

impl<'a> RatingSink<'a> {
    pub fn new(store: &'a mut TranscriptStore) -> Self {
        Self { store }
    }

    /// Record feedback; re-rating overwrites, there is no undo
    pub fn rate(&mut self, id: TurnId, value: bool) -> bool {
        let applied = self.store.rate(id, value);
        if applied {
            tracing::info!(turn_id = %id, helpful = value, "Recorded turn rating");
        }
        applied
    }
}
