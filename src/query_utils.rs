//! Serde helpers and parsers for query-string parameters.
//!
//! Chart front-ends send `?month=&start_date=` when a selector is cleared,
//! which `serde_urlencoded` cannot parse as a number or date. Empty strings
//! read as `None`; the `parse_*` helpers report anything else that does not
//! parse as [`AppError::Validation`].

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::fmt::Display;
use std::str::FromStr;

use crate::date_utils::parse_date;
use crate::error::{AppError, AppResult};
use crate::models::Month;

pub fn deserialize_optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Empty or missing text becomes `None`.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub fn parse_optional_date(name: &str, value: Option<&str>) -> AppResult<Option<NaiveDate>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_date(v)
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("Invalid {}: {}", name, v))),
    }
}

/// A month given either by name (any case) or by number 1-12.
pub fn parse_month(name: &str, value: &str) -> AppResult<Month> {
    let value = value.trim();
    if let Ok(n) = value.parse::<u32>() {
        return Month::from_number(n)
            .ok_or_else(|| AppError::Validation(format!("{} must be 1-12, got {}", name, n)));
    }
    value
        .parse::<Month>()
        .map_err(|e| AppError::Validation(format!("Invalid {}: {}", name, e)))
}

pub fn parse_optional_month(name: &str, value: Option<&str>) -> AppResult<Option<Month>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_month(name, v).map(Some),
    }
}

pub fn require<T>(name: &str, value: Option<T>) -> AppResult<T> {
    value.ok_or_else(|| AppError::Validation(format!("Missing required parameter: {}", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Params {
        #[serde(default, deserialize_with = "deserialize_optional")]
        year: Option<i32>,
    }

    #[test]
    fn test_empty_number_is_none() {
        let p: Params = serde_urlencoded::from_str("year=").unwrap();
        assert_eq!(p.year, None);
        let p: Params = serde_urlencoded::from_str("").unwrap();
        assert_eq!(p.year, None);
        let p: Params = serde_urlencoded::from_str("year=2024").unwrap();
        assert_eq!(p.year, Some(2024));
        assert!(serde_urlencoded::from_str::<Params>("year=soon").is_err());
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("month", "march").unwrap(), Month::March);
        assert_eq!(parse_month("month", "12").unwrap(), Month::December);
        assert!(matches!(
            parse_month("month", "13"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            parse_month("month", "Smarch"),
            Err(AppError::Validation(_))
        ));
        assert_eq!(parse_optional_month("month", Some(" ")).unwrap(), None);
    }

    #[test]
    fn test_parse_optional_date() {
        assert_eq!(
            parse_optional_date("start_date", Some("2024-02-29")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(parse_optional_date("start_date", None).unwrap(), None);
        assert!(parse_optional_date("start_date", Some("29/02/2024")).is_err());
    }
}
