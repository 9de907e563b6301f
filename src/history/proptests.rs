//! Property-based tests for history reconstruction
//!
//! These tests verify the pairing invariants hold for arbitrary transcripts:
//! - reconstruction is a pure function of its input
//! - every user turn appears in exactly one pair, in order
//! - every assistant turn appears in exactly one pair, in order
//! - a user turn is paired only with the assistant turn right after it

use super::*;
use crate::transcript::TranscriptStore;
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn arb_turn() -> impl Strategy<Value = Turn> {
    prop_oneof![
        "[a-z ]{0,12}".prop_map(Turn::user),
        "[A-Z ]{0,12}".prop_map(Turn::assistant),
    ]
}

fn arb_turns() -> impl Strategy<Value = Vec<Turn>> {
    proptest::collection::vec(arb_turn(), 0..24)
}

fn texts(turns: &[Turn], role: Role) -> Vec<String> {
    turns
        .iter()
        .filter(|t| t.role == role)
        .map(|t| t.text.clone())
        .collect()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_reconstruct_is_pure(turns in arb_turns()) {
        prop_assert_eq!(reconstruct(&turns), reconstruct(&turns));
    }

    #[test]
    fn prop_every_user_turn_emitted_once_in_order(turns in arb_turns()) {
        let users: Vec<String> = reconstruct(&turns)
            .into_iter()
            .filter_map(|p| p.0)
            .collect();
        prop_assert_eq!(users, texts(&turns, Role::User));
    }

    #[test]
    fn prop_every_assistant_turn_emitted_once_in_order(turns in arb_turns()) {
        let replies: Vec<String> = reconstruct(&turns)
            .into_iter()
            .filter_map(|p| p.1)
            .collect();
        prop_assert_eq!(replies, texts(&turns, Role::Assistant));
    }

    #[test]
    fn prop_no_empty_pairs(turns in arb_turns()) {
        for pair in reconstruct(&turns) {
            prop_assert!(pair.0.is_some() || pair.1.is_some());
        }
    }

    #[test]
    fn prop_full_pairs_are_adjacent_turns(turns in arb_turns()) {
        // Adjacent (user, assistant) positions in the transcript, in order
        let adjacent: Vec<(String, String)> = turns
            .windows(2)
            .filter(|w| w[0].role == Role::User && w[1].role == Role::Assistant)
            .map(|w| (w[0].text.clone(), w[1].text.clone()))
            .collect();
        let full: Vec<(String, String)> = reconstruct(&turns)
            .into_iter()
            .filter_map(|p| Some((p.0?, p.1?)))
            .collect();
        prop_assert_eq!(full, adjacent);
    }

    #[test]
    fn prop_rate_on_user_or_unknown_leaves_transcript_unchanged(
        turns in arb_turns(),
        pick in any::<prop::sample::Index>(),
        value in any::<bool>(),
    ) {
        let mut store = TranscriptStore::new();
        for turn in turns {
            store.append(turn);
        }
        let before = store.snapshot().clone();

        store.rate(crate::transcript::TurnId::new(), value);
        prop_assert_eq!(store.snapshot(), &before);

        let users: Vec<_> = before.turns().iter().filter(|t| t.role == Role::User).collect();
        if !users.is_empty() {
            let target = users[pick.index(users.len())].id;
            store.rate(target, value);
            prop_assert_eq!(store.snapshot(), &before);
        }
    }
}
