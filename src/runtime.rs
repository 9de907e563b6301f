//! Runtime controllers
//!
//! Drive the pure state machines and execute their effects against the
//! gateways. Each controller exposes a synchronous `begin_*`/`finish_*` pair
//! around its suspension point plus an async convenience that awaits the
//! gateway in between.

mod booking;
mod chat;

#[cfg(test)]
pub mod testing;

pub use booking::{BookingFlow, OnBooked};
pub use chat::{ChatSession, PendingReply};
