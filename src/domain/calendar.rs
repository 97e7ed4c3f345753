//! Month grid for the calendar view.
//!
//! Weeks start on Monday. Months are zero-indexed (0 = January) throughout,
//! matching the cursor the calendar view navigates with.

use chrono::{Datelike, NaiveDate, TimeZone};

use super::task::Task;

pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Number of days in `month0` of `year`: the day before the first of the
/// following month.
pub fn days_in_month(year: i32, month0: u32) -> Option<u32> {
    if month0 > 11 { return None; }
    let (next_year, next_month) = if month0 == 11 { (year.checked_add(1)?, 1) } else { (year, month0 + 2) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt().map(|d| d.day())
}

/// Blank cells before day 1 in a Monday-first week (Monday = 0, Sunday = 6).
pub fn leading_blanks(year: i32, month0: u32) -> Option<u32> {
    if month0 > 11 { return None; }
    let first = NaiveDate::from_ymd_opt(year, month0 + 1, 1)?;
    Some(first.weekday().num_days_from_monday())
}

/// The month currently shown by the calendar view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthCursor {
    year: i32,
    month0: u32,
}

impl MonthCursor {
    pub fn new(year: i32, month0: u32) -> Option<Self> {
        if month0 > 11 { return None; }
        NaiveDate::from_ymd_opt(year, month0 + 1, 1).map(|_| Self { year, month0 })
    }

    pub fn containing(date: NaiveDate) -> Self { Self { year: date.year(), month0: date.month0() } }

    pub fn year(self) -> i32 { self.year }
    pub fn month0(self) -> u32 { self.month0 }

    pub fn previous(self) -> Self {
        if self.month0 == 0 { Self { year: self.year - 1, month0: 11 } } else { Self { year: self.year, month0: self.month0 - 1 } }
    }

    pub fn next(self) -> Self {
        if self.month0 == 11 { Self { year: self.year + 1, month0: 0 } } else { Self { year: self.year, month0: self.month0 + 1 } }
    }

    pub fn is_current(self, today: NaiveDate) -> bool { self == Self::containing(today) }

    /// `February 2024`
    pub fn title(self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month0 + 1, 1)
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub task_count: usize,
    pub is_today: bool,
}

impl DayCell {
    pub fn day(&self) -> u32 { self.date.day() }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarCell {
    Blank,
    Day(DayCell),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarGrid {
    pub year: i32,
    pub month0: u32,
    pub cells: Vec<CalendarCell>,
}

impl CalendarGrid {
    /// Lays out `month0` of `year` and counts the tasks due on each day.
    ///
    /// Due dates are compared by their calendar day in `tz`, so the time of
    /// day never moves a task to another cell. An unrepresentable month
    /// yields a grid without cells.
    pub fn build<Tz: TimeZone>(year: i32, month0: u32, tasks: &[Task], today: NaiveDate, tz: &Tz) -> Self {
        let mut grid = Self { year, month0, cells: Vec::new() };
        let (Some(days), Some(blanks)) = (days_in_month(year, month0), leading_blanks(year, month0)) else {
            tracing::debug!(year, month0, "no calendar grid for month");
            return grid;
        };

        let mut counts = vec![0usize; days as usize];
        for due in tasks.iter().filter_map(|t| t.due_date.as_ref()) {
            let local = due.with_timezone(tz).date_naive();
            if local.year() == year && local.month0() == month0 {
                counts[local.day0() as usize] += 1;
            }
        }

        let shows_today = today.year() == year && today.month0() == month0;
        grid.cells.reserve(blanks as usize + days as usize);
        grid.cells.extend((0..blanks).map(|_| CalendarCell::Blank));
        grid.cells.extend(counts.into_iter().enumerate().filter_map(|(idx, task_count)| {
            let date = NaiveDate::from_ymd_opt(year, month0 + 1, idx as u32 + 1)?;
            Some(CalendarCell::Day(DayCell { date, task_count, is_today: shows_today && date == today }))
        }));
        grid
    }

    pub fn leading_blanks(&self) -> usize {
        self.cells.iter().take_while(|c| matches!(c, CalendarCell::Blank)).count()
    }

    pub fn days(&self) -> impl Iterator<Item = &DayCell> {
        self.cells.iter().filter_map(|c| match c { CalendarCell::Day(d) => Some(d), CalendarCell::Blank => None })
    }

    pub fn day(&self, day: u32) -> Option<&DayCell> { self.days().find(|d| d.day() == day) }

    /// Rows of seven cells; the last row may be shorter.
    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarCell]> { self.cells.chunks(7) }

    pub fn today(&self) -> Option<&DayCell> { self.days().find(|d| d.is_today) }
}
