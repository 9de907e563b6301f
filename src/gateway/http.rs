//! HTTP implementation of the backend gateways

use super::types::{
    AvailabilityResponse, BookingConfirmation, BookingPayload, CompletionReply, CompletionRequest,
};
use super::{AvailabilitySource, BookingClient, CompletionClient, GatewayError};
use crate::config::WidgetConfig;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

/// Talks to the clinic backend over HTTP/JSON
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    chat_url: String,
    availability_url: String,
    booking_url: String,
}

impl HttpGateway {
    pub fn new(config: &WidgetConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| GatewayError::client(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            chat_url: config.chat_url(),
            availability_url: config.availability_url(),
            booking_url: config.booking_url(),
        })
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, GatewayError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::timeout(format!("Request timeout: {e}"))
            } else if e.is_connect() {
                GatewayError::network(format!("Connection failed: {e}"))
            } else {
                GatewayError::network(format!("Request failed: {e}"))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(GatewayError::status(status.as_u16(), body));
        }

        serde_json::from_str(&body)
            .map_err(|e| GatewayError::malformed(format!("Failed to parse response: {e}")))
    }
}

#[async_trait]
impl CompletionClient for HttpGateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionReply, GatewayError> {
        Self::send_json(self.client.post(&self.chat_url).json(request)).await
    }
}

#[async_trait]
impl AvailabilitySource for HttpGateway {
    async fn fetch_availability(&self, date: NaiveDate) -> Result<AvailabilityResponse, GatewayError> {
        let key = date.format("%Y-%m-%d").to_string();
        Self::send_json(
            self.client
                .get(&self.availability_url)
                .query(&[("date", key.as_str())]),
        )
        .await
    }
}

#[async_trait]
impl BookingClient for HttpGateway {
    async fn book(&self, payload: &BookingPayload) -> Result<BookingConfirmation, GatewayError> {
        Self::send_json(self.client.post(&self.booking_url).json(payload)).await
    }
}
