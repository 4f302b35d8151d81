//! Week ranges, and the keys records are grouped by

use std::fmt::{Display, Formatter};

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};


/// An inclusive range of dates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Whether `date` is in this range. Both ends are included
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}


/// How far (in weeks, both ways) a [`WeekSelection`] can be moved from the current week
pub const MAX_WEEK_OFFSET: i64 = 52_000;

/// The Monday-to-Sunday week that contains `today + offset weeks`.
///
/// Returns `None` when this week is out of the range of representable dates.
pub fn week_range(today: NaiveDate, offset: i64) -> Option<DateRange> {
    let day = today.checked_add_signed(Duration::try_weeks(offset)?)?;
    let start = day.checked_sub_signed(Duration::days(day.weekday().num_days_from_monday() as i64))?;
    let end = start.checked_add_signed(Duration::days(6))?;
    Some(DateRange::new(start, end))
}

/// The week `offset` weeks away from the current one (0 is the current week, negative values are past weeks)
pub fn get_week_range(offset: i64) -> Option<DateRange> {
    week_range(Local::now().date_naive(), offset)
}


/// Which dates are displayed: a week relative to the current one, or a custom range
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WeekSelection {
    offset: i64,
    custom: Option<DateRange>,
}

impl WeekSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn custom_range(&self) -> Option<DateRange> {
        self.custom
    }

    /// Select another week. This discards any custom range.
    ///
    /// Offsets further than [`MAX_WEEK_OFFSET`] are rejected, and leave the selection unchanged
    pub fn set_offset(&mut self, offset: i64) -> Result<()> {
        if offset.checked_abs().map(|abs| abs > MAX_WEEK_OFFSET).unwrap_or(true) {
            return Err(TrackerError::InvalidWeek(offset));
        }
        self.offset = offset;
        self.custom = None;
        Ok(())
    }

    pub fn previous_week(&mut self) -> Result<()> {
        let offset = self.offset.checked_sub(1).ok_or(TrackerError::InvalidWeek(self.offset))?;
        self.set_offset(offset)
    }

    pub fn next_week(&mut self) -> Result<()> {
        let offset = self.offset.checked_add(1).ok_or(TrackerError::InvalidWeek(self.offset))?;
        self.set_offset(offset)
    }

    /// Override the week with a custom range, until the week offset changes
    pub fn set_custom_range(&mut self, start: NaiveDate, end: NaiveDate) {
        self.custom = Some(DateRange::new(start, end));
    }

    /// The selected range, relative to `today`
    pub fn range_from(&self, today: NaiveDate) -> DateRange {
        if let Some(custom) = self.custom {
            return custom;
        }
        match week_range(today, self.offset) {
            Some(range) => range,
            None => {
                // only happens for a `today` close to the limits of the calendar
                log::warn!("Week {} from {} is out of range, showing the day itself", self.offset, today);
                DateRange::new(today, today)
            },
        }
    }

    /// The selected range, relative to the current date
    pub fn range(&self) -> DateRange {
        self.range_from(Local::now().date_naive())
    }
}


/// How records can be grouped
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupBy {
    Week,
    Month,
}

impl GroupBy {
    pub fn key_of(&self, date: NaiveDate) -> GroupKey {
        match self {
            GroupBy::Week => {
                let iso = date.iso_week();
                GroupKey::Week { year: iso.year(), week: iso.week() }
            },
            GroupBy::Month => GroupKey::Month { year: date.year(), month: date.month() },
        }
    }
}

/// The group a record belongs to. Keys sort chronologically
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    /// An ISO week
    Week { year: i32, week: u32 },
    Month { year: i32, month: u32 },
}

impl Display for GroupKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupKey::Week { year, week } => write!(f, "Week {:02} - {}", week, year),
            GroupKey::Month { year, month } => match NaiveDate::from_ymd_opt(*year, *month, 1) {
                Some(first_day) => write!(f, "{}", first_day.format("%B %Y")),
                None => write!(f, "{:02}/{}", month, year),
            },
        }
    }
}
