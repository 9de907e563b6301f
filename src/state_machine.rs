//! Chat session and booking wizard state machines
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! each transition returns the new state plus the effects the runtime must
//! execute. No I/O happens here.

pub mod booking;
pub mod chat;

pub use booking::{BookingDraft, BookingEffect, BookingEvent, BookingRejection, Contact, ContactField, Stage};
pub use chat::{ChatEffect, ChatEvent, ChatRejection, ChatState, APOLOGY};
