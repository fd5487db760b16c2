use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime};

use crate::error::ValidationError;

/// Maximum span of a historical range, in whole days between the endpoints.
pub const MAX_RANGE_DAYS: i64 = 365;

const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const UPSTREAM_DATE: &[BorrowedFormatItem<'static>] = format_description!("[day]/[month]/[year]");

/// Calendar date of a quotation. ISO 8601 (`YYYY-MM-DD`) on every external
/// surface; converted to the upstream's `DD/MM/YYYY` only when building the
/// query URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QuoteDate(Date);

impl QuoteDate {
    /// Parse a strict `YYYY-MM-DD` date.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        Date::parse(input.trim(), ISO_DATE)
            .map(Self)
            .map_err(|_| ValidationError::InvalidDateFormat {
                value: input.to_owned(),
            })
    }

    /// Today's date in UTC.
    pub fn today_utc() -> Self {
        Self(OffsetDateTime::now_utc().date())
    }

    pub const fn from_date(date: Date) -> Self {
        Self(date)
    }

    pub const fn into_inner(self) -> Date {
        self.0
    }

    pub fn next_day(self) -> Self {
        Self(self.0 + Duration::days(1))
    }

    pub fn minus_days(self, days: i64) -> Self {
        Self(self.0 - Duration::days(days))
    }

    /// Whole days from `self` to `other` (negative when `other` is earlier).
    pub fn days_until(self, other: Self) -> i64 {
        (other.0 - self.0).whole_days()
    }

    pub fn format_iso(self) -> String {
        self.0
            .format(ISO_DATE)
            .expect("calendar date must be ISO-formattable")
    }

    /// `DD/MM/YYYY`, the format the upstream's `fecha` parameter expects.
    pub fn format_upstream(self) -> String {
        self.0
            .format(UPSTREAM_DATE)
            .expect("calendar date must be formattable as DD/MM/YYYY")
    }
}

impl Display for QuoteDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_iso())
    }
}

impl Serialize for QuoteDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_iso())
    }
}

impl<'de> Deserialize<'de> for QuoteDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

/// Inclusive historical date range. Impossible to construct inverted or
/// wider than [`MAX_RANGE_DAYS`], so consumers never re-validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: QuoteDate,
    end: QuoteDate,
}

impl DateRange {
    pub fn new(start: QuoteDate, end: QuoteDate) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvalidDateRange);
        }

        let days = start.days_until(end);
        if days > MAX_RANGE_DAYS {
            return Err(ValidationError::DateRangeTooLarge { days });
        }

        Ok(Self { start, end })
    }

    pub const fn start(self) -> QuoteDate {
        self.start
    }

    pub const fn end(self) -> QuoteDate {
        self.end
    }

    /// Whole days between the endpoints.
    pub fn span_days(self) -> i64 {
        self.start.days_until(self.end)
    }

    /// Number of calendar days the range covers, endpoints included.
    pub fn requested_days(self) -> i64 {
        self.span_days() + 1
    }

    /// Every calendar day from start to end, inclusive, ascending.
    pub fn days(self) -> impl Iterator<Item = QuoteDate> {
        let end = self.end;
        let mut upcoming = Some(self.start);
        std::iter::from_fn(move || {
            let current = upcoming?;
            upcoming = (current < end).then(|| current.next_day());
            Some(current)
        })
    }
}
