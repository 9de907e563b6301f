//! Wire types for the backend endpoints

use crate::history::HistoryPair;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Body of `POST /chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub user_input: String,
    pub history: Vec<HistoryPair>,
}

/// Reply from `POST /chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionReply {
    pub answer: String,
}

/// Reply from the availability endpoint: date string → ISO-8601 start times
pub type AvailabilityResponse = HashMap<String, Vec<String>>;

/// Body of `POST /api/calendar/book`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPayload {
    pub patient_name: String,
    pub email: String,
    pub phone: String,
    pub reason: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

/// Reply from the booking endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    #[serde(default)]
    pub event_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A confirmed appointment, handed to the "on booked" collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingResult {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub patient_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub reason: Option<String>,
    pub event_id: Option<String>,
    pub status: Option<String>,
}

impl BookingResult {
    pub fn new(payload: BookingPayload, confirmation: BookingConfirmation) -> Self {
        Self {
            start: payload.start,
            end: payload.end,
            patient_name: payload.patient_name,
            email: payload.email,
            phone: non_empty(payload.phone),
            reason: non_empty(payload.reason),
            event_id: confirmation.event_id,
            status: confirmation.status,
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
