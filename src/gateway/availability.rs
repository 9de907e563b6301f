//! Calendar availability adapter

use super::{AvailabilityResponse, AvailabilitySource, GatewayError};
use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Length of every bookable appointment, in minutes
pub const SLOT_LENGTH: i64 = 30;

/// A bookable interval with its display label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub label: String,
}

impl Slot {
    pub fn starting_at(start: DateTime<FixedOffset>) -> Self {
        Self {
            start,
            end: start + Duration::minutes(SLOT_LENGTH),
            label: start.format("%-I:%M %p").to_string(),
        }
    }
}

/// Turn an availability reply into slots for `date`.
///
/// A reply without an entry for the date means no availability; any
/// unparsable start time rejects the whole reply. Start times without a UTC
/// offset are read as wall-clock times in the local timezone.
pub fn slots_for(date: NaiveDate, response: &AvailabilityResponse) -> Result<Vec<Slot>, GatewayError> {
    slots_in(date, response, &Local)
}

/// [`slots_for`] with offset-free start times read in `tz`
pub fn slots_in<Tz: TimeZone>(
    date: NaiveDate,
    response: &AvailabilityResponse,
    tz: &Tz,
) -> Result<Vec<Slot>, GatewayError> {
    let key = date.format("%Y-%m-%d").to_string();
    let Some(starts) = response.get(&key) else {
        return Ok(Vec::new());
    };

    starts
        .iter()
        .map(|raw| parse_start(raw, tz).map(Slot::starting_at))
        .collect()
}

fn parse_start<Tz: TimeZone>(raw: &str, tz: &Tz) -> Result<DateTime<FixedOffset>, GatewayError> {
    if let Ok(start) = DateTime::parse_from_rfc3339(raw) {
        return Ok(start);
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|e| GatewayError::malformed(format!("Bad start time {raw:?}: {e}")))?;
    // A wall-clock time skipped by a DST change has no local instant
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|start| start.fixed_offset())
        .ok_or_else(|| GatewayError::malformed(format!("Start time {raw:?} does not exist in the local timezone")))
}

/// Maps calendar dates to bookable slots, degrading every failure to "none"
pub struct AvailabilityAdapter<S> {
    source: S,
}

impl<S: AvailabilitySource> AvailabilityAdapter<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub async fn load_availability(&self, date: NaiveDate) -> Vec<Slot> {
        let result = self
            .source
            .fetch_availability(date)
            .await
            .and_then(|response| slots_for(date, &response));

        match result {
            Ok(slots) => {
                tracing::debug!(%date, count = slots.len(), "Loaded availability");
                slots
            }
            Err(e) => {
                tracing::warn!(%date, error = %e, "Availability unavailable, showing no slots");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::testing::MockAvailabilitySource;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn test_slot_derivation() {
        let slot = Slot::starting_at(DateTime::parse_from_rfc3339("2025-03-10T09:00:00-06:00").unwrap());
        assert_eq!(slot.end.to_rfc3339(), "2025-03-10T09:30:00-06:00");
        assert_eq!(slot.label, "9:00 AM");
        assert_eq!(slot.start.date_naive(), date());

        let slot = Slot::starting_at(DateTime::parse_from_rfc3339("2025-03-10T13:30:00-06:00").unwrap());
        assert_eq!(slot.label, "1:30 PM");
    }

    #[test]
    fn test_missing_date_is_empty() {
        let response = AvailabilityResponse::from([(
            "2025-03-11".to_string(),
            vec!["2025-03-11T09:00:00-06:00".to_string()],
        )]);
        assert!(slots_for(date(), &response).unwrap().is_empty());
    }

    #[test]
    fn test_bad_timestamp_rejects_reply() {
        let response = AvailabilityResponse::from([(
            "2025-03-10".to_string(),
            vec!["2025-03-10T09:00:00-06:00".to_string(), "nine am".to_string()],
        )]);
        assert!(slots_for(date(), &response).is_err());
    }

    #[test]
    fn test_offset_free_starts_use_local_wall_clock() {
        let denver = FixedOffset::west_opt(6 * 3600).unwrap();
        let response = AvailabilityResponse::from([(
            "2025-03-10".to_string(),
            vec!["2025-03-10T09:00:00".to_string(), "2025-03-10T09:30:00.000".to_string()],
        )]);

        let slots = slots_in(date(), &response, &denver).unwrap();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].start.to_rfc3339(), "2025-03-10T09:00:00-06:00");
        assert_eq!(slots[0].end.to_rfc3339(), "2025-03-10T09:30:00-06:00");
        assert_eq!(slots[0].label, "9:00 AM");
        assert_eq!(slots[1].label, "9:30 AM");
    }

    #[test]
    fn test_explicit_offset_wins_over_local() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let response = AvailabilityResponse::from([(
            "2025-03-10".to_string(),
            vec!["2025-03-10T09:00:00-06:00".to_string()],
        )]);
        let slots = slots_in(date(), &response, &utc).unwrap();
        assert_eq!(slots[0].start.to_rfc3339(), "2025-03-10T09:00:00-06:00");
    }

    #[tokio::test]
    async fn test_load_accepts_offset_free_starts() {
        let source = MockAvailabilitySource::new();
        source.queue_starts(date(), &["2025-03-10T09:00:00", "2025-03-10T09:30:00"]);
        let adapter = AvailabilityAdapter::new(source);

        let slots = adapter.load_availability(date()).await;
        let labels: Vec<_> = slots.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["9:00 AM", "9:30 AM"]);
        assert!(slots.iter().all(|s| s.start.date_naive() == date()));
    }

    #[tokio::test]
    async fn test_load_keeps_server_order() {
        let source = MockAvailabilitySource::new();
        source.queue_starts(date(), &["2025-03-10T09:00:00-06:00", "2025-03-10T09:30:00-06:00"]);
        let adapter = AvailabilityAdapter::new(source);

        let labels: Vec<_> = adapter
            .load_availability(date())
            .await
            .into_iter()
            .map(|s| s.label)
            .collect();
        assert_eq!(labels, vec!["9:00 AM", "9:30 AM"]);
    }

    #[tokio::test]
    async fn test_failure_degrades_to_empty() {
        let source = MockAvailabilitySource::new();
        source.queue_error(GatewayError::status(503, "down"));
        let adapter = AvailabilityAdapter::new(source);
        assert!(adapter.load_availability(date()).await.is_empty());

        // Nothing queued behaves like a network failure
        assert!(adapter.load_availability(date()).await.is_empty());
    }
}
