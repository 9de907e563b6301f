//! Booking wizard transitions
//!
//! Two stages: pick a date and slot, then enter contact details and submit.

use crate::calendar::{is_past, MonthView};
use crate::gateway::{BookingConfirmation, BookingPayload, BookingResult, Slot};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

pub const NAME_REQUIRED: &str = "Please enter your name.";
pub const EMAIL_INVALID: &str = "Please enter a valid email address.";
pub const BOOKING_FAILED: &str = "Booking failed.";
pub const BOOKING_UNREACHABLE: &str = "Something went wrong booking your appointment.";

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid"));

/// Basic `local@domain.tld` shape check on the trimmed address
pub fn email_ok(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email.trim())
}

/// Wizard stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Stage {
    #[default]
    Select,
    Details,
}

/// Contact details as typed by the user (untrimmed)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contact {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Email,
    Phone,
    Reason,
}

impl Contact {
    fn field_mut(&mut self, field: ContactField) -> &mut String {
        match field {
            ContactField::Name => &mut self.name,
            ContactField::Email => &mut self.email,
            ContactField::Phone => &mut self.phone,
            ContactField::Reason => &mut self.reason,
        }
    }
}

/// In-progress state of the booking wizard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    pub selected_date: Option<NaiveDate>,
    pub available_slots: Vec<Slot>,
    pub chosen_slot: Option<Slot>,
    pub contact: Contact,
    pub stage: Stage,
    /// An availability query for `selected_date` is outstanding
    pub loading: bool,
    /// The payload of the outstanding submission, if any
    pub submission: Option<BookingPayload>,
    pub error: Option<String>,
    pub view: MonthView,
}

impl BookingDraft {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            selected_date: None,
            available_slots: Vec::new(),
            chosen_slot: None,
            contact: Contact::default(),
            stage: Stage::Select,
            loading: false,
            submission: None,
            error: None,
            view: MonthView::current(today),
        }
    }

    pub fn submitting(&self) -> bool {
        self.submission.is_some()
    }

    /// "Continue" is enabled
    pub fn can_continue(&self) -> bool {
        self.stage == Stage::Select && self.chosen_slot.is_some()
    }

    fn payload(&self, slot: &Slot) -> BookingPayload {
        BookingPayload {
            patient_name: self.contact.name.trim().to_string(),
            email: self.contact.email.trim().to_string(),
            phone: self.contact.phone.trim().to_string(),
            reason: self.contact.reason.trim().to_string(),
            start: slot.start,
            end: slot.end,
        }
    }
}

/// Events that drive the wizard
#[derive(Debug, Clone)]
pub enum BookingEvent {
    /// The modal went from closed to open
    Opened { today: NaiveDate },
    DatePicked { date: NaiveDate, today: NaiveDate },
    AvailabilityLoaded { date: NaiveDate, slots: Vec<Slot> },
    MonthShifted { delta: i32 },
    SlotChosen { slot: Slot },
    SlotCleared,
    Continue,
    Back,
    ContactEdited { field: ContactField, value: String },
    SubmitRequested,
    SubmissionSucceeded { confirmation: BookingConfirmation },
    /// `detail` is the server's response body for non-2xx replies
    SubmissionFailed { detail: Option<String> },
}

/// Effects for the runtime to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingEffect {
    QueryAvailability { date: NaiveDate },
    SubmitBooking { payload: BookingPayload },
    NotifyBooked { result: BookingResult },
}

/// Result of a booking transition
#[derive(Debug)]
pub struct BookingTransition {
    pub new_draft: BookingDraft,
    pub effects: Vec<BookingEffect>,
}

impl BookingTransition {
    fn new(draft: BookingDraft) -> Self {
        Self {
            new_draft: draft,
            effects: vec![],
        }
    }

    fn with_effect(mut self, effect: BookingEffect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Events the wizard refuses; the UI keeps these actions disabled
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookingRejection {
    #[error("Date {0} is in the past")]
    PastDate(NaiveDate),
    #[error("Availability for {0} is no longer wanted")]
    StaleAvailability(NaiveDate),
    #[error("Slot is not offered for the selected date")]
    SlotNotOffered,
    #[error("No slot chosen")]
    NoSlotChosen,
    #[error("A booking is already being submitted")]
    Submitting,
    #[error("No booking is being submitted")]
    NotSubmitting,
    #[error("Not available in the {0:?} stage")]
    WrongStage(Stage),
}

/// Pure transition function
#[allow(clippy::too_many_lines)]
pub fn transition(draft: &BookingDraft, event: BookingEvent) -> Result<BookingTransition, BookingRejection> {
    let mut next = draft.clone();

    match event {
        BookingEvent::Opened { today } => Ok(BookingTransition::new(BookingDraft::new(today))),

        BookingEvent::DatePicked { date, today } => {
            require_stage(draft, Stage::Select)?;
            if is_past(date, today) {
                return Err(BookingRejection::PastDate(date));
            }
            next.selected_date = Some(date);
            next.chosen_slot = None;
            next.available_slots.clear();
            next.loading = true;
            Ok(BookingTransition::new(next).with_effect(BookingEffect::QueryAvailability { date }))
        }

        BookingEvent::AvailabilityLoaded { date, slots } => {
            if draft.selected_date != Some(date) {
                return Err(BookingRejection::StaleAvailability(date));
            }
            next.available_slots = slots;
            next.loading = false;
            Ok(BookingTransition::new(next))
        }

        BookingEvent::MonthShifted { delta } => {
            require_stage(draft, Stage::Select)?;
            next.view = draft.view.shifted(delta);
            Ok(BookingTransition::new(next))
        }

        BookingEvent::SlotChosen { slot } => {
            require_stage(draft, Stage::Select)?;
            if !draft.available_slots.contains(&slot) {
                return Err(BookingRejection::SlotNotOffered);
            }
            next.chosen_slot = Some(slot);
            Ok(BookingTransition::new(next))
        }

        BookingEvent::SlotCleared => {
            require_stage(draft, Stage::Select)?;
            next.chosen_slot = None;
            Ok(BookingTransition::new(next))
        }

        BookingEvent::Continue => {
            require_stage(draft, Stage::Select)?;
            if draft.chosen_slot.is_none() {
                return Err(BookingRejection::NoSlotChosen);
            }
            next.stage = Stage::Details;
            Ok(BookingTransition::new(next))
        }

        BookingEvent::Back => {
            require_stage(draft, Stage::Details)?;
            if draft.submitting() {
                return Err(BookingRejection::Submitting);
            }
            next.stage = Stage::Select;
            Ok(BookingTransition::new(next))
        }

        BookingEvent::ContactEdited { field, value } => {
            *next.contact.field_mut(field) = value;
            Ok(BookingTransition::new(next))
        }

        BookingEvent::SubmitRequested => {
            require_stage(draft, Stage::Details)?;
            if draft.submitting() {
                return Err(BookingRejection::Submitting);
            }
            let Some(slot) = &draft.chosen_slot else {
                return Err(BookingRejection::NoSlotChosen);
            };

            if draft.contact.name.trim().is_empty() {
                next.error = Some(NAME_REQUIRED.to_string());
                return Ok(BookingTransition::new(next));
            }
            if !email_ok(&draft.contact.email) {
                next.error = Some(EMAIL_INVALID.to_string());
                return Ok(BookingTransition::new(next));
            }

            let payload = draft.payload(slot);
            next.error = None;
            next.submission = Some(payload.clone());
            Ok(BookingTransition::new(next).with_effect(BookingEffect::SubmitBooking { payload }))
        }

        BookingEvent::SubmissionSucceeded { confirmation } => {
            let Some(payload) = next.submission.take() else {
                return Err(BookingRejection::NotSubmitting);
            };
            let result = BookingResult::new(payload, confirmation);
            Ok(BookingTransition::new(next).with_effect(BookingEffect::NotifyBooked { result }))
        }

        BookingEvent::SubmissionFailed { detail } => {
            if next.submission.take().is_none() {
                return Err(BookingRejection::NotSubmitting);
            }
            let message = match detail.as_deref().map(str::trim) {
                Some("") => BOOKING_FAILED.to_string(),
                Some(text) => text.to_string(),
                None => BOOKING_UNREACHABLE.to_string(),
            };
            next.error = Some(message);
            Ok(BookingTransition::new(next))
        }
    }
}

fn require_stage(draft: &BookingDraft, stage: Stage) -> Result<(), BookingRejection> {
    if draft.stage == stage {
        Ok(())
    } else {
        Err(BookingRejection::WrongStage(draft.stage))
    }
}
