//! Due-date input: validation of day/month/year tuples and conversion of the
//! five raw form fields into a single timestamp.

use std::fmt;

use chrono::{DateTime, Datelike, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};
use thiserror::Error;

pub const MIN_YEAR: i64 = 2000;
pub const MAX_YEAR: i64 = 2100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateField { Day, Month, Year, Hour, Minute }

impl DateField {
    pub const ALL: [DateField; 5] = [DateField::Day, DateField::Month, DateField::Year, DateField::Hour, DateField::Minute];

    pub fn label(self) -> &'static str {
        match self {
            DateField::Day => "day",
            DateField::Month => "month",
            DateField::Year => "year",
            DateField::Hour => "hour",
            DateField::Minute => "minute",
        }
    }
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.label()) }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("{field} must be a number, got {raw:?}")]
    NotANumber { field: DateField, raw: String },
    #[error("{day:02}/{month:02}/{year} is not a valid date")]
    InvalidDate { day: i64, month: i64, year: i64 },
    #[error("{hour:02}:{minute:02} is not a valid time")]
    InvalidTime { hour: i64, minute: i64 },
    #[error("{0} does not exist in the local time zone")]
    NonexistentLocalTime(NaiveDateTime),
}

/// True when the tuple is in range and names a real calendar day.
pub fn is_valid_date(day: i64, month: i64, year: i64) -> bool {
    calendar_date(day, month, year).is_some()
}

fn calendar_date(day: i64, month: i64, year: i64) -> Option<NaiveDate> {
    if !(1..=31).contains(&day) || !(1..=12).contains(&month) || !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return None;
    }
    // chrono refuses to roll over (no Feb 30), so a constructed date always reads back the same fields
    NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)
}

fn time_of_day(hour: i64, minute: i64) -> Option<NaiveTime> {
    if !(0..=23).contains(&hour) || !(0..=59).contains(&minute) {
        return None;
    }
    NaiveTime::from_hms_opt(hour as u32, minute as u32, 0)
}

/// Builds the instant for a local wall-clock date and time in `tz`.
///
/// Unlike a bare calendar constructor this never rolls over: an impossible
/// date or time is an error. An ambiguous local time (clocks going back)
/// resolves to the earlier instant.
pub fn combine<Tz: TimeZone>(day: i64, month: i64, year: i64, hour: i64, minute: i64, tz: &Tz) -> Result<DateTime<Utc>, DateError> {
    let date = calendar_date(day, month, year).ok_or(DateError::InvalidDate { day, month, year })?;
    let time = time_of_day(hour, minute).ok_or(DateError::InvalidTime { hour, minute })?;
    let naive = date.and_time(time);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => Err(DateError::NonexistentLocalTime(naive)),
    }
}

/// Numeric values of a [`DateParts`], not yet checked for validity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedParts {
    pub day: i64,
    pub month: i64,
    pub year: i64,
    pub hour: i64,
    pub minute: i64,
}

/// Raw text of the five due-date fields while the user is editing them.
///
/// Text is kept as typed; padding happens on [`DateParts::pad`] (field blur)
/// and numbers are only read at submit time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DateParts {
    pub day: String,
    pub month: String,
    pub year: String,
    pub hour: String,
    pub minute: String,
}

impl DateParts {
    /// Prefilled with the given moment, two-digit padded.
    pub fn now_in<T: Datelike + Timelike>(now: &T) -> Self {
        Self {
            day: format!("{:02}", now.day()),
            month: format!("{:02}", now.month()),
            year: now.year().to_string(),
            hour: format!("{:02}", now.hour()),
            minute: format!("{:02}", now.minute()),
        }
    }

    pub fn field(&self, field: DateField) -> &str {
        match field {
            DateField::Day => &self.day,
            DateField::Month => &self.month,
            DateField::Year => &self.year,
            DateField::Hour => &self.hour,
            DateField::Minute => &self.minute,
        }
    }

    fn field_mut(&mut self, field: DateField) -> &mut String {
        match field {
            DateField::Day => &mut self.day,
            DateField::Month => &mut self.month,
            DateField::Year => &mut self.year,
            DateField::Hour => &mut self.hour,
            DateField::Minute => &mut self.minute,
        }
    }

    /// Appends a typed character; anything but an ASCII digit is ignored.
    pub fn push_digit(&mut self, field: DateField, c: char) -> bool {
        if !c.is_ascii_digit() { return false; }
        self.field_mut(field).push(c);
        true
    }

    pub fn backspace(&mut self, field: DateField) {
        self.field_mut(field).pop();
    }

    /// Left-pads a single digit to two. The year is never padded.
    pub fn pad(&mut self, field: DateField) {
        if field == DateField::Year { return; }
        let value = self.field_mut(field);
        let trimmed = value.trim();
        if trimmed.len() == 1 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            *value = format!("0{}", trimmed);
        }
    }

    pub fn pad_all(&mut self) {
        for field in DateField::ALL { self.pad(field); }
    }

    pub fn parse(&self) -> Result<ParsedParts, DateError> {
        Ok(ParsedParts {
            day: parse_field(DateField::Day, &self.day)?,
            month: parse_field(DateField::Month, &self.month)?,
            year: parse_field(DateField::Year, &self.year)?,
            hour: parse_field(DateField::Hour, &self.hour)?,
            minute: parse_field(DateField::Minute, &self.minute)?,
        })
    }

    /// Date portion only, as [`is_valid_date`].
    pub fn is_valid(&self) -> bool {
        let parsed = (
            parse_field(DateField::Day, &self.day),
            parse_field(DateField::Month, &self.month),
            parse_field(DateField::Year, &self.year),
        );
        match parsed {
            (Ok(d), Ok(m), Ok(y)) => is_valid_date(d, m, y),
            _ => false,
        }
    }

    pub fn to_timestamp<Tz: TimeZone>(&self, tz: &Tz) -> Result<DateTime<Utc>, DateError> {
        let p = self.parse()?;
        combine(p.day, p.month, p.year, p.hour, p.minute, tz)
    }

    /// Human readable form of the tuple, e.g. `15 February 2024, 10:00`.
    pub fn preview<Tz: TimeZone>(&self, tz: &Tz) -> Option<String>
    where
        Tz::Offset: fmt::Display,
    {
        let ts = self.to_timestamp(tz).ok()?;
        Some(ts.with_timezone(tz).format("%-d %B %Y, %H:%M").to_string())
    }
}

fn parse_field(field: DateField, raw: &str) -> Result<i64, DateError> {
    raw.trim().parse::<i64>().map_err(|_| DateError::NotANumber { field, raw: raw.to_string() })
}
