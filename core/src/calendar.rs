//! Simulation calendar: the inclusive range of days a run covers.

use crate::error::{SimError, SimResult};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end:   NaiveDate,
}

impl DateRange {
    /// Fails with `InvalidRange` when `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> SimResult<Self> {
        if start > end {
            return Err(SimError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate { self.start }
    pub fn end(&self)   -> NaiveDate { self.end }

    /// Number of days in the range, counting both ends.
    pub fn len(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    /// Never true: a valid range holds at least one day.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every day from start to end, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

/// First day of the calendar month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
