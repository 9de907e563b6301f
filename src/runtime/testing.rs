//! Mock gateways for testing
//!
//! Each mock returns queued outcomes in order and records what it was asked.
//! An empty queue answers with a network error.

use crate::gateway::{
    AvailabilityResponse, AvailabilitySource, BookingClient, BookingConfirmation, BookingPayload,
    CompletionClient, CompletionReply, CompletionRequest, GatewayError,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::VecDeque;
use std::sync::Mutex;

// ============================================================================
// Mock completion client
// ============================================================================

pub struct MockCompletionClient {
    replies: Mutex<VecDeque<Result<CompletionReply, GatewayError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockCompletionClient {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn queue_reply(&self, answer: &str) {
        self.replies.lock().unwrap().push_back(Ok(CompletionReply {
            answer: answer.to_string(),
        }));
    }

    pub fn queue_error(&self, error: GatewayError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionReply, GatewayError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::network("No mock reply queued")))
    }
}

// ============================================================================
// Mock availability source
// ============================================================================

pub struct MockAvailabilitySource {
    responses: Mutex<VecDeque<Result<AvailabilityResponse, GatewayError>>>,
    dates: Mutex<Vec<NaiveDate>>,
}

impl MockAvailabilitySource {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            dates: Mutex::new(Vec::new()),
        }
    }

    /// Queue a reply listing `starts` for `date`
    pub fn queue_starts(&self, date: NaiveDate, starts: &[&str]) {
        let response = AvailabilityResponse::from([(
            date.format("%Y-%m-%d").to_string(),
            starts.iter().map(|s| (*s).to_string()).collect(),
        )]);
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    pub fn queue_error(&self, error: GatewayError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_dates(&self) -> Vec<NaiveDate> {
        self.dates.lock().unwrap().clone()
    }
}

#[async_trait]
impl AvailabilitySource for MockAvailabilitySource {
    async fn fetch_availability(&self, date: NaiveDate) -> Result<AvailabilityResponse, GatewayError> {
        self.dates.lock().unwrap().push(date);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::network("No mock availability queued")))
    }
}

// ============================================================================
// Mock booking client
// ============================================================================

pub struct MockBookingClient {
    outcomes: Mutex<VecDeque<Result<BookingConfirmation, GatewayError>>>,
    payloads: Mutex<Vec<BookingPayload>>,
}

impl MockBookingClient {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            payloads: Mutex::new(Vec::new()),
        }
    }

    pub fn queue_confirmation(&self, event_id: &str, status: &str) {
        self.outcomes.lock().unwrap().push_back(Ok(BookingConfirmation {
            event_id: Some(event_id.to_string()),
            status: Some(status.to_string()),
        }));
    }

    pub fn queue_error(&self, error: GatewayError) {
        self.outcomes.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_payloads(&self) -> Vec<BookingPayload> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl BookingClient for MockBookingClient {
    async fn book(&self, payload: &BookingPayload) -> Result<BookingConfirmation, GatewayError> {
        self.payloads.lock().unwrap().push(payload.clone());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::network("No mock booking outcome queued")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_completion_client() {
        let mock = MockCompletionClient::new();
        mock.queue_reply("Hello");

        let request = CompletionRequest {
            user_input: "hi".to_string(),
            history: vec![],
        };
        assert_eq!(mock.complete(&request).await.unwrap().answer, "Hello");

        // Second call should fail (no more replies)
        assert!(mock.complete(&request).await.is_err());
        assert_eq!(mock.recorded_requests().len(), 2);
    }

    #[tokio::test]
    async fn test_mock_availability_source() {
        let mock = MockAvailabilitySource::new();
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        mock.queue_starts(date, &["2025-03-10T09:00:00-06:00"]);

        let response = mock.fetch_availability(date).await.unwrap();
        assert_eq!(response["2025-03-10"], vec!["2025-03-10T09:00:00-06:00".to_string()]);
        assert_eq!(mock.recorded_dates(), vec![date]);
    }
}
