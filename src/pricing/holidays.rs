//! Holiday calendar consulted by peak-time rules.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

/// One-off holiday dates plus month-day entries that recur every year
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HolidayCalendar {
    dates: BTreeSet<NaiveDate>,
    recurring: BTreeSet<(u32, u32)>,
}

impl HolidayCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_date(&mut self, date: NaiveDate) {
        self.dates.insert(date);
    }

    /// Add a yearly holiday. Returns false for a month-day that never exists.
    pub fn add_recurring(&mut self, month: u32, day: u32) -> bool {
        // 2000 is a leap year, so Feb 29 is accepted
        if NaiveDate::from_ymd_opt(2000, month, day).is_none() {
            return false;
        }
        self.recurring.insert((month, day));
        true
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date) || self.recurring.contains(&(date.month(), date.day()))
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() && self.recurring.is_empty()
    }
}
