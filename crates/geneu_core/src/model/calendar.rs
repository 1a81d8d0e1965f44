//! Partial calendar dates and the intervals built from them.
//!
//! # Responsibility
//! - Represent dates known to year, year+month or year+month+day precision.
//! - Resolve partial begin/end bounds into totally ordered points.
//!
//! # Invariants
//! - `month` is never set without `year`, `day` is never set without `month`.
//! - A date with no `year` is an open bound.
//! - Begin bounds are inclusive, end bounds are exclusive.
//! - When both bounds are concrete, begin never resolves after end.
//! - Text form: a year of at least four digits with an optional leading `-`,
//!   then optional `-MM` and `-DD`. Every displayed date parses back.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Month value used for an end bound that covers its whole year.
const CEILING_MONTH: u8 = 13;
/// Day value used for an end bound that covers its whole month.
const CEILING_DAY: u8 = 32;

/// Errors for malformed dates and intervals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// Month present while year is absent.
    MonthWithoutYear,
    /// Day present while month is absent.
    DayWithoutMonth,
    /// Month outside `1..=12`.
    MonthOutOfRange(u8),
    /// Day outside `1..=31`.
    DayOutOfRange(u8),
    /// Text is not `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
    Unparsable(String),
    /// Concrete begin resolves after concrete end.
    BeginAfterEnd { begin: String, end: String },
}

impl Display for CalendarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MonthWithoutYear => write!(f, "month is set but year is missing"),
            Self::DayWithoutMonth => write!(f, "day is set but month is missing"),
            Self::MonthOutOfRange(month) => write!(f, "month {month} is outside 1..=12"),
            Self::DayOutOfRange(day) => write!(f, "day {day} is outside 1..=31"),
            Self::Unparsable(text) => write!(
                f,
                "invalid partial date `{text}`; expected YYYY, YYYY-MM or YYYY-MM-DD"
            ),
            Self::BeginAfterEnd { begin, end } => {
                write!(f, "interval begin {begin} is after its end {end}")
            }
        }
    }
}

impl Error for CalendarError {}

/// A date whose components may be independently unknown.
///
/// Years are astronomical: year 0 exists and negative years come before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartialDate {
    pub year: Option<i32>,
    pub month: Option<u8>,
    pub day: Option<u8>,
}

impl PartialDate {
    /// Fully unknown date.
    pub const UNKNOWN: Self = Self {
        year: None,
        month: None,
        day: None,
    };

    /// Builds a validated partial date.
    pub fn new(
        year: Option<i32>,
        month: Option<u8>,
        day: Option<u8>,
    ) -> Result<Self, CalendarError> {
        let date = Self { year, month, day };
        date.validate()?;
        Ok(date)
    }

    pub fn year(year: i32) -> Self {
        Self {
            year: Some(year),
            month: None,
            day: None,
        }
    }

    pub fn year_month(year: i32, month: u8) -> Result<Self, CalendarError> {
        Self::new(Some(year), Some(month), None)
    }

    pub fn ymd(year: i32, month: u8, day: u8) -> Result<Self, CalendarError> {
        Self::new(Some(year), Some(month), Some(day))
    }

    /// Checks component presence and ranges.
    pub fn validate(&self) -> Result<(), CalendarError> {
        if self.month.is_some() && self.year.is_none() {
            return Err(CalendarError::MonthWithoutYear);
        }
        if self.day.is_some() && self.month.is_none() {
            return Err(CalendarError::DayWithoutMonth);
        }
        if let Some(month) = self.month {
            if !(1..=12).contains(&month) {
                return Err(CalendarError::MonthOutOfRange(month));
            }
        }
        if let Some(day) = self.day {
            if !(1..=31).contains(&day) {
                return Err(CalendarError::DayOutOfRange(day));
            }
        }
        Ok(())
    }

    /// Returns whether this date has no year and therefore bounds nothing.
    pub fn is_open(&self) -> bool {
        self.year.is_none()
    }

    pub fn precision(&self) -> DatePrecision {
        match (self.year, self.month, self.day) {
            (None, _, _) => DatePrecision::Unknown,
            (Some(_), None, _) => DatePrecision::Year,
            (Some(_), Some(_), None) => DatePrecision::Month,
            (Some(_), Some(_), Some(_)) => DatePrecision::Day,
        }
    }
}

impl Display for PartialDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (self.year, self.month, self.day) {
            (None, _, _) => write!(f, "?"),
            (Some(year), None, _) => write!(f, "{}", YearText(year)),
            (Some(year), Some(month), None) => write!(f, "{}-{month:02}", YearText(year)),
            (Some(year), Some(month), Some(day)) => {
                write!(f, "{}-{month:02}-{day:02}", YearText(year))
            }
        }
    }
}

/// Sign then magnitude padded to four digits, so `-5` is `-0005`.
struct YearText(i32);

impl Display for YearText {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{sign}{:04}", self.0.unsigned_abs())
    }
}

impl FromStr for PartialDate {
    type Err = CalendarError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let unparsable = || CalendarError::Unparsable(trimmed.to_string());
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let mut parts = unsigned.split('-');

        let year = parts
            .next()
            .and_then(|text| parse_year(text, negative))
            .ok_or_else(unparsable)?;
        let month = parts
            .next()
            .map(|text| parse_two_digits(text).ok_or_else(unparsable))
            .transpose()?;
        let day = parts
            .next()
            .map(|text| parse_two_digits(text).ok_or_else(unparsable))
            .transpose()?;
        if parts.next().is_some() {
            return Err(unparsable());
        }

        Self::new(Some(year), month, day)
    }
}

fn parse_year(digits: &str, negative: bool) -> Option<i32> {
    if digits.len() < 4 || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    let magnitude = i64::from(digits.parse::<u32>().ok()?);
    i32::try_from(if negative { -magnitude } else { magnitude }).ok()
}

fn parse_two_digits(text: &str) -> Option<u8> {
    if text.len() != 2 || !text.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Granularity a partial date is known to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DatePrecision {
    Unknown,
    Year,
    Month,
    Day,
}

/// Which side of an interval a date bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundSide {
    /// Inclusive lower bound.
    Begin,
    /// Exclusive upper bound.
    End,
}

/// Concrete, totally ordered point obtained from a partial bound.
///
/// Field order gives the lexicographic ordering used by the overlap engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DatePoint {
    pub year: i64,
    pub month: u8,
    pub day: u8,
}

impl DatePoint {
    /// Resolves a bound into a point.
    ///
    /// Open begin bounds resolve below every year, open end bounds above
    /// every year. Missing components of a begin take the first month/day,
    /// missing components of an end cover the whole enclosing period.
    pub fn resolve(date: Option<&PartialDate>, side: BoundSide) -> Self {
        let year = date.and_then(|date| date.year);
        match (year, side) {
            (None, BoundSide::Begin) => Self {
                year: i64::MIN,
                month: 1,
                day: 1,
            },
            (None, BoundSide::End) => Self {
                year: i64::MAX,
                month: CEILING_MONTH,
                day: CEILING_DAY,
            },
            (Some(year), BoundSide::Begin) => {
                let month = date.and_then(|date| date.month);
                let day = date.and_then(|date| date.day);
                Self {
                    year: i64::from(year),
                    month: month.unwrap_or(1),
                    day: day.unwrap_or(1),
                }
            }
            (Some(year), BoundSide::End) => {
                let month = date.and_then(|date| date.month);
                let day = date.and_then(|date| date.day);
                Self {
                    year: i64::from(year),
                    month: month.unwrap_or(CEILING_MONTH),
                    day: day.unwrap_or(CEILING_DAY),
                }
            }
        }
    }
}

/// Begin/end pair attached to an event. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateInterval {
    pub begin: Option<PartialDate>,
    pub end: Option<PartialDate>,
}

impl DateInterval {
    /// Builds a validated interval. Fully unknown bounds are stored as `None`.
    ///
    /// # Errors
    /// - Any bound fails `PartialDate::validate`.
    /// - Both bounds are concrete and begin resolves after end.
    pub fn new(
        begin: Option<PartialDate>,
        end: Option<PartialDate>,
    ) -> Result<Self, CalendarError> {
        let interval = Self { begin, end };
        interval.validate()?;
        Ok(Self {
            begin: begin.filter(|date| !date.is_open()),
            end: end.filter(|date| !date.is_open()),
        })
    }

    /// Interval with both bounds open.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<(), CalendarError> {
        if let Some(begin) = &self.begin {
            begin.validate()?;
        }
        if let Some(end) = &self.end {
            end.validate()?;
        }
        if let (Some(begin), Some(end)) = (&self.begin, &self.end) {
            if !begin.is_open() && !end.is_open() && self.begin_point() > self.end_point() {
                return Err(CalendarError::BeginAfterEnd {
                    begin: begin.to_string(),
                    end: end.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn begin_point(&self) -> DatePoint {
        DatePoint::resolve(self.begin.as_ref(), BoundSide::Begin)
    }

    pub fn end_point(&self) -> DatePoint {
        DatePoint::resolve(self.end.as_ref(), BoundSide::End)
    }
}
