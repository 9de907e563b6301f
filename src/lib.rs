//! Front Desk - clinic virtual front desk widget client
//!
//! A chat session with a stateless completion backend, plus a two-stage
//! appointment booking wizard backed by a calendar service.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod calendar;
pub mod config;
pub mod gateway;
pub mod history;
pub mod markup;
pub mod runtime;
pub mod state_machine;
pub mod transcript;
pub mod widget;
