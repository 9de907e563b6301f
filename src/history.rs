//! History reconstruction for the stateless completion backend
//!
//! The backend recovers turn boundaries from pair position and `null`
//! markers, so the pairing produced here is part of the wire contract.

use crate::transcript::{Role, Turn};
use serde::{Deserialize, Serialize};

#[cfg(test)]
mod proptests;

/// `(user text, assistant text)`; serialized as a two-element JSON array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPair(pub Option<String>, pub Option<String>);

/// Pair every user turn with the assistant turn that immediately follows it.
///
/// - an assistant turn with no pending user turn becomes `(None, text)`
/// - a user turn followed by another user turn becomes `(text, None)`
/// - a trailing unanswered user turn becomes `(text, None)`
pub fn reconstruct(turns: &[Turn]) -> Vec<HistoryPair> {
    let mut pairs = Vec::with_capacity(turns.len());
    let mut pending: Option<&str> = None;

    for turn in turns {
        match turn.role {
            Role::User => {
                if let Some(prev) = pending.replace(turn.text.as_str()) {
                    pairs.push(HistoryPair(Some(prev.to_string()), None));
                }
            }
            Role::Assistant => {
                let user = pending.take().map(str::to_string);
                pairs.push(HistoryPair(user, Some(turn.text.clone())));
            }
        }
    }

    if let Some(prev) = pending {
        pairs.push(HistoryPair(Some(prev.to_string()), None));
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(u: Option<&str>, a: Option<&str>) -> HistoryPair {
        HistoryPair(u.map(String::from), a.map(String::from))
    }

    #[test]
    fn test_empty_transcript() {
        assert!(reconstruct(&[]).is_empty());
    }

    #[test]
    fn test_welcome_then_exchange() {
        let turns = vec![
            Turn::assistant("Welcome"),
            Turn::user("hi"),
            Turn::assistant("hello"),
        ];
        assert_eq!(
            reconstruct(&turns),
            vec![pair(None, Some("Welcome")), pair(Some("hi"), Some("hello"))]
        );
    }

    #[test]
    fn test_consecutive_user_turns() {
        let turns = vec![Turn::user("a"), Turn::user("b"), Turn::assistant("c")];
        assert_eq!(
            reconstruct(&turns),
            vec![pair(Some("a"), None), pair(Some("b"), Some("c"))]
        );
    }

    #[test]
    fn test_trailing_user_turn_kept() {
        let turns = vec![Turn::assistant("Welcome"), Turn::user("still there?")];
        assert_eq!(
            reconstruct(&turns),
            vec![pair(None, Some("Welcome")), pair(Some("still there?"), None)]
        );
    }

    #[test]
    fn test_consecutive_assistant_turns() {
        let turns = vec![
            Turn::user("book me"),
            Turn::assistant("sure"),
            Turn::assistant("Your appointment is confirmed"),
        ];
        assert_eq!(
            reconstruct(&turns),
            vec![
                pair(Some("book me"), Some("sure")),
                pair(None, Some("Your appointment is confirmed")),
            ]
        );
    }

    #[test]
    fn test_wire_shape() {
        let pairs = vec![pair(None, Some("Welcome")), pair(Some("hi"), None)];
        let json = serde_json::to_value(&pairs).unwrap();
        assert_eq!(json, serde_json::json!([[null, "Welcome"], ["hi", null]]));
    }
}
