//! Widget shell: launcher state, quick replies and the chat/booking pair

use crate::config::WidgetConfig;
use crate::gateway::{AvailabilitySource, BookingClient, BookingResult, CompletionClient};
use crate::runtime::{BookingFlow, ChatSession};
use chrono::NaiveDate;

/// Canned prompts offered under the welcome turn
pub const QUICK_REPLIES: [&str; 3] = [
    "I’d like to book or change an appointment",
    "Can you estimate my costs?",
    "I have a general question",
];

pub struct Widget<C, A, B> {
    config: WidgetConfig,
    open: bool,
    chat: ChatSession<C>,
    booking: BookingFlow<A, B>,
}

impl<C, A, B> Widget<C, A, B>
where
    C: CompletionClient,
    A: AvailabilitySource,
    B: BookingClient,
{
    pub fn new(config: WidgetConfig, completion: C, availability: A, booking: B, today: NaiveDate) -> Self {
        let chat = ChatSession::new(completion, config.welcome_message.clone());
        Self {
            config,
            open: false,
            chat,
            booking: BookingFlow::new(availability, booking, today),
        }
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Collapse to the launcher. The transcript survives.
    pub fn minimize(&mut self) {
        self.open = false;
    }

    pub fn chat(&self) -> &ChatSession<C> {
        &self.chat
    }

    pub fn chat_mut(&mut self) -> &mut ChatSession<C> {
        &mut self.chat
    }

    pub fn booking(&self) -> &BookingFlow<A, B> {
        &self.booking
    }

    pub fn booking_mut(&mut self) -> &mut BookingFlow<A, B> {
        &mut self.booking
    }

    pub fn quick_replies(&self) -> &'static [&'static str] {
        &QUICK_REPLIES
    }

    pub async fn send(&mut self, text: &str) {
        self.chat.send_user_message(text).await;
    }

    /// Send one of [`QUICK_REPLIES`]; out-of-range indices are ignored
    pub async fn send_quick_reply(&mut self, index: usize) {
        match QUICK_REPLIES.get(index) {
            Some(text) => self.chat.send_user_message(text).await,
            None => tracing::debug!(index, "No quick reply at index"),
        }
    }

    /// Throw away the conversation and start again from the welcome turn
    pub fn restart(&mut self) {
        tracing::info!("Restarting chat session");
        self.chat.restart(self.config.welcome_message.clone());
    }

    pub fn open_booking(&mut self, today: NaiveDate) {
        self.booking.open(today);
    }

    pub fn close_booking(&mut self) {
        self.booking.close();
    }

    /// Submit the booking draft. On success the chat gains an acknowledgment
    /// turn and the modal closes; on failure the modal stays open showing the
    /// draft's error.
    pub async fn submit_booking(&mut self) -> Option<BookingResult> {
        let result = self.booking.submit().await?;
        self.chat.acknowledge_booking(result.clone());
        self.booking.close();
        Some(result)
    }
}
