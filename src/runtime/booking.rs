//! Booking wizard controller

use crate::gateway::{
    AvailabilityAdapter, AvailabilitySource, BookingClient, BookingConfirmation, BookingPayload,
    BookingResult, GatewayError, Slot,
};
use crate::state_machine::booking::{transition, BookingDraft, BookingEffect, BookingEvent, ContactField};
use chrono::NaiveDate;

/// Collaborator notified once per successful booking
pub type OnBooked = Box<dyn FnMut(&BookingResult) + Send>;

/// The booking modal: wizard draft, open flag and its two gateways
pub struct BookingFlow<A, B> {
    draft: BookingDraft,
    open: bool,
    availability: AvailabilityAdapter<A>,
    booking: B,
    on_booked: Option<OnBooked>,
}

impl<A: AvailabilitySource, B: BookingClient> BookingFlow<A, B> {
    pub fn new(availability: A, booking: B, today: NaiveDate) -> Self {
        Self {
            draft: BookingDraft::new(today),
            open: false,
            availability: AvailabilityAdapter::new(availability),
            booking,
            on_booked: None,
        }
    }

    #[must_use]
    pub fn with_on_booked(mut self, on_booked: impl FnMut(&BookingResult) + Send + 'static) -> Self {
        self.on_booked = Some(Box::new(on_booked));
        self
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open the modal; a closed→open transition starts from a fresh draft
    pub fn open(&mut self, today: NaiveDate) {
        if self.open {
            return;
        }
        self.open = true;
        self.dispatch(BookingEvent::Opened { today });
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    // ------------------------------------------------------------------
    // Select stage
    // ------------------------------------------------------------------

    /// Pick a date and load its slots
    pub async fn select_date(&mut self, date: NaiveDate, today: NaiveDate) {
        let Some(date) = self.begin_select_date(date, today) else {
            return;
        };
        let slots = self.availability.load_availability(date).await;
        self.finish_select_date(date, slots);
    }

    /// Returns the date to query, or `None` when the pick is refused
    pub fn begin_select_date(&mut self, date: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
        self.dispatch(BookingEvent::DatePicked { date, today })
            .into_iter()
            .find_map(|effect| match effect {
                BookingEffect::QueryAvailability { date } => Some(date),
                _ => None,
            })
    }

    /// Apply loaded slots; dropped if the user has since picked another date
    pub fn finish_select_date(&mut self, date: NaiveDate, slots: Vec<Slot>) {
        self.dispatch(BookingEvent::AvailabilityLoaded { date, slots });
    }

    pub fn previous_month(&mut self) {
        self.dispatch(BookingEvent::MonthShifted { delta: -1 });
    }

    pub fn next_month(&mut self) {
        self.dispatch(BookingEvent::MonthShifted { delta: 1 });
    }

    pub fn choose_slot(&mut self, slot: Slot) {
        self.dispatch(BookingEvent::SlotChosen { slot });
    }

    pub fn clear_slot(&mut self) {
        self.dispatch(BookingEvent::SlotCleared);
    }

    pub fn continue_to_details(&mut self) {
        self.dispatch(BookingEvent::Continue);
    }

    // ------------------------------------------------------------------
    // Details stage
    // ------------------------------------------------------------------

    pub fn back(&mut self) {
        self.dispatch(BookingEvent::Back);
    }

    pub fn set_contact_field(&mut self, field: ContactField, value: impl Into<String>) {
        self.dispatch(BookingEvent::ContactEdited {
            field,
            value: value.into(),
        });
    }

    /// Validate and submit. Returns the confirmed booking on success.
    pub async fn submit(&mut self) -> Option<BookingResult> {
        let payload = self.begin_submit()?;
        let outcome = self.booking.book(&payload).await;
        self.finish_submit(outcome)
    }

    /// Validate the draft; returns the payload to post when validation passes
    pub fn begin_submit(&mut self) -> Option<BookingPayload> {
        self.dispatch(BookingEvent::SubmitRequested)
            .into_iter()
            .find_map(|effect| match effect {
                BookingEffect::SubmitBooking { payload } => Some(payload),
                _ => None,
            })
    }

    pub fn finish_submit(&mut self, outcome: Result<BookingConfirmation, GatewayError>) -> Option<BookingResult> {
        let event = match outcome {
            Ok(confirmation) => BookingEvent::SubmissionSucceeded { confirmation },
            Err(e) => {
                tracing::error!(kind = ?e.kind, error = %e, "Booking submission failed");
                BookingEvent::SubmissionFailed {
                    detail: e.server_detail().map(str::to_string),
                }
            }
        };

        self.dispatch(event)
            .into_iter()
            .find_map(|effect| match effect {
                BookingEffect::NotifyBooked { result } => Some(result),
                _ => None,
            })
    }

    fn dispatch(&mut self, event: BookingEvent) -> Vec<BookingEffect> {
        match transition(&self.draft, event) {
            Ok(result) => {
                self.draft = result.new_draft;
                for effect in &result.effects {
                    if let BookingEffect::NotifyBooked { result: booked } = effect {
                        tracing::info!(
                            event_id = ?booked.event_id,
                            status = ?booked.status,
                            start = %booked.start,
                            "Appointment booked"
                        );
                        if let Some(on_booked) = self.on_booked.as_mut() {
                            on_booked(booked);
                        }
                    }
                }
                result.effects
            }
            Err(rejection) => {
                tracing::debug!(stage = ?self.draft.stage, %rejection, "Booking event ignored");
                Vec::new()
            }
        }
    }
}
