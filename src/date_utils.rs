use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};

/// Parse an upstream date string.
///
/// Accepts a plain `YYYY-MM-DD` date or an ISO-8601 date-time whose date part
/// is taken (`2024-03-05T10:00:00`, `2024-03-05 10:00:00`).
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    // Any other date-time: the first ten characters must still be a date.
    value
        .get(..10)
        .filter(|_| value.len() > 10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Named ranges accepted by the summary endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePreset {
    ThisMonth,
    LastMonth,
    ThisYear,
    LastYear,
    All,
}

impl FromStr for DatePreset {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "this_month" => Ok(Self::ThisMonth),
            "last_month" => Ok(Self::LastMonth),
            "this_year" => Ok(Self::ThisYear),
            "last_year" => Ok(Self::LastYear),
            "all" => Ok(Self::All),
            _ => Err(()),
        }
    }
}

/// Inclusive date range; an open end is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn from_preset(preset: DatePreset) -> Self {
        Self::from_preset_at(preset, Local::now().date_naive())
    }

    pub fn from_preset_at(preset: DatePreset, today: NaiveDate) -> Self {
        let (from, to) = match preset {
            DatePreset::ThisMonth => (month_start(today), month_end(today)),
            DatePreset::LastMonth => {
                let last_month = month_start(today) - chrono::Duration::days(1);
                (month_start(last_month), month_end(last_month))
            }
            DatePreset::ThisYear => (year_start(today.year()), year_end(today.year())),
            DatePreset::LastYear => (year_start(today.year() - 1), year_end(today.year() - 1)),
            DatePreset::All => return Self::default(),
        };
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn month_end(date: NaiveDate) -> NaiveDate {
    let next_month = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };
    next_month
        .and_then(|d| d.pred_opt())
        .unwrap_or(date)
}

fn year_start(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn year_end(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MAX)
}
