//! Month view for the booking calendar

use chrono::{Datelike, Days, Months, NaiveDate};

/// A calendar date the user may not pick: strictly before today
pub fn is_past(date: NaiveDate, today: NaiveDate) -> bool {
    date < today
}

/// One day in the month grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub past: bool,
    pub selected: bool,
}

/// The displayed month, identified by its first day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthView {
    first: NaiveDate,
}

impl MonthView {
    pub fn current(today: NaiveDate) -> Self {
        Self {
            first: today - Days::new(u64::from(today.day0())),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// Move by `delta` months; stays put at the edges of the calendar range
    #[must_use]
    pub fn shifted(self, delta: i32) -> Self {
        let months = Months::new(delta.unsigned_abs());
        let moved = if delta >= 0 {
            self.first.checked_add_months(months)
        } else {
            self.first.checked_sub_months(months)
        };
        moved.map_or(self, |first| Self { first })
    }

    /// e.g. "March 2025"
    pub fn title(&self) -> String {
        self.first.format("%B %Y").to_string()
    }

    pub fn days_in_month(&self) -> u32 {
        self.first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .map_or(31, |last| last.day())
    }

    /// Sunday-first grid: blank cells up to the weekday of the 1st, then one
    /// cell per day of the month
    pub fn cells(&self, today: NaiveDate, selected: Option<NaiveDate>) -> Vec<Option<DayCell>> {
        let leading = self.first.weekday().num_days_from_sunday() as usize;
        let mut cells = vec![None; leading];
        cells.extend(self.first.iter_days().take(self.days_in_month() as usize).map(|date| {
            Some(DayCell {
                date,
                past: is_past(date, today),
                selected: selected == Some(date),
            })
        }));
        cells
    }
}
