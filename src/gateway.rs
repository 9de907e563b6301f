//! Backend gateway abstraction
//!
//! Trait seams for the three network collaborators (chat completion,
//! calendar availability, booking submission) so the controllers can be
//! driven by mock implementations in tests.

mod availability;
mod error;
mod http;
mod types;

pub use availability::{AvailabilityAdapter, Slot, SLOT_LENGTH};
pub use error::{GatewayError, GatewayErrorKind};
pub use http::HttpGateway;
pub use types::*;

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Instant;

/// Stateless chat completion backend
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionReply, GatewayError>;
}

/// Source of bookable start times for a calendar date
#[async_trait]
pub trait AvailabilitySource: Send + Sync {
    async fn fetch_availability(&self, date: NaiveDate) -> Result<AvailabilityResponse, GatewayError>;
}

/// Appointment booking backend
#[async_trait]
pub trait BookingClient: Send + Sync {
    async fn book(&self, payload: &BookingPayload) -> Result<BookingConfirmation, GatewayError>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: CompletionClient + ?Sized> CompletionClient for Arc<T> {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionReply, GatewayError> {
        (**self).complete(request).await
    }
}

#[async_trait]
impl<T: AvailabilitySource + ?Sized> AvailabilitySource for Arc<T> {
    async fn fetch_availability(&self, date: NaiveDate) -> Result<AvailabilityResponse, GatewayError> {
        (**self).fetch_availability(date).await
    }
}

#[async_trait]
impl<T: BookingClient + ?Sized> BookingClient for Arc<T> {
    async fn book(&self, payload: &BookingPayload) -> Result<BookingConfirmation, GatewayError> {
        (**self).book(payload).await
    }
}

// ============================================================================
// Logging wrapper
// ============================================================================

/// Times and logs every call made through the wrapped gateway
pub struct LoggingGateway<G> {
    inner: G,
}

impl<G> LoggingGateway<G> {
    pub fn new(inner: G) -> Self {
        Self { inner }
    }
}

fn log_outcome<T>(endpoint: &'static str, started: Instant, result: &Result<T, GatewayError>) {
    let duration_ms = started.elapsed().as_millis();
    match result {
        Ok(_) => tracing::info!(endpoint, duration_ms, "Backend request completed"),
        Err(e) => tracing::error!(
            endpoint,
            duration_ms,
            kind = ?e.kind,
            error = %e.message,
            "Backend request failed"
        ),
    }
}

#[async_trait]
impl<G: CompletionClient> CompletionClient for LoggingGateway<G> {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionReply, GatewayError> {
        let started = Instant::now();
        let result = self.inner.complete(request).await;
        log_outcome("chat", started, &result);
        result
    }
}

#[async_trait]
impl<G: AvailabilitySource> AvailabilitySource for LoggingGateway<G> {
    async fn fetch_availability(&self, date: NaiveDate) -> Result<AvailabilityResponse, GatewayError> {
        let started = Instant::now();
        let result = self.inner.fetch_availability(date).await;
        log_outcome("availability", started, &result);
        result
    }
}

#[async_trait]
impl<G: BookingClient> BookingClient for LoggingGateway<G> {
    async fn book(&self, payload: &BookingPayload) -> Result<BookingConfirmation, GatewayError> {
        let started = Instant::now();
        let result = self.inner.book(payload).await;
        log_outcome("booking", started, &result);
        result
    }
}
