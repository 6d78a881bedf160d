use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::error::RecordError;
use crate::models::Aggregate;
use crate::money::{cents_from_json, cents_to_decimal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    January = 1,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Month from its calendar number, 1 = January.
    pub fn from_number(n: u32) -> Option<Self> {
        n.checked_sub(1)
            .and_then(|i| Self::ALL.get(i as usize))
            .copied()
    }

    pub fn number(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Month::January => Month::December,
            other => Self::ALL[other as usize - 2],
        }
    }

    /// The month-selector adjustment: picking the month already selected on
    /// the other side moves this selection back one month.
    pub fn distinct_from(self, other: Month) -> Self {
        if self == other {
            self.previous()
        } else {
            self
        }
    }
}

impl FromStr for Month {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| RecordError::UnknownMonth(s.to_string()))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Month → category name → spending total in cents.
///
/// A month with no qualifying transactions has no entry at all, and a
/// category with no spending in a month is absent from that month.
/// [`MonthlySummary::amount`] reads the mapping as total, with zero for
/// anything absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthlySummary {
    months: BTreeMap<Month, BTreeMap<String, i64>>,
}

impl MonthlySummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a spending magnitude to a month/category cell.
    pub fn add(&mut self, month: Month, category: &str, cents: i64) {
        let cell = self
            .months
            .entry(month)
            .or_default()
            .entry(category.to_string())
            .or_insert(0);
        *cell = cell.saturating_add(cents.saturating_abs());
    }

    pub fn month(&self, month: Month) -> Option<&BTreeMap<String, i64>> {
        self.months.get(&month)
    }

    pub fn amount(&self, month: Month, category: &str) -> i64 {
        self.months
            .get(&month)
            .and_then(|cats| cats.get(category))
            .copied()
            .unwrap_or(0)
    }

    pub fn contains_month(&self, month: Month) -> bool {
        self.months.contains_key(&month)
    }

    /// Months with data, in calendar order.
    pub fn months(&self) -> impl Iterator<Item = Month> + '_ {
        self.months.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    /// Keep only one month.
    pub fn retain_month(&mut self, month: Month) {
        self.months.retain(|m, _| *m == month);
    }

    /// Read the `GET /transactions/summary/monthly` shape.
    ///
    /// Month keys match case-insensitively. When several keys name the same
    /// month, one wins and the others are skipped and counted: the key spelled
    /// exactly like the canonical name if there is one, otherwise the first
    /// key in byte order. Unknown month names and non-numeric totals are
    /// skipped and counted; negative totals are read as magnitudes. Months
    /// left empty are dropped.
    pub fn from_wire(wire: &BTreeMap<String, BTreeMap<String, Value>>) -> Aggregate<Self> {
        let mut summary = Self::new();
        let mut skipped = 0;
        let mut seen = BTreeSet::new();

        let (canonical, other): (Vec<_>, Vec<_>) = wire
            .iter()
            .partition(|(key, _)| Month::ALL.iter().any(|m| m.name() == key.as_str()));

        for (month_key, categories) in canonical.into_iter().chain(other) {
            let month = match month_key.parse::<Month>() {
                Ok(m) => m,
                Err(e) => {
                    tracing::warn!("Skipping monthly summary entry: {}", e);
                    skipped += 1;
                    continue;
                }
            };
            if !seen.insert(month) {
                tracing::warn!(
                    "Skipping monthly summary entry {:?}: {} already read",
                    month_key,
                    month
                );
                skipped += 1;
                continue;
            }
            for (category, value) in categories {
                match cents_from_json(value) {
                    Some(cents) => summary.add(month, category, cents),
                    None => {
                        tracing::warn!(
                            "Skipping non-numeric total {} for {} in {}",
                            value,
                            category,
                            month
                        );
                        skipped += 1;
                    }
                }
            }
        }

        Aggregate::new(summary, skipped)
    }
}

struct CategoryTotals<'a>(&'a BTreeMap<String, i64>);

impl Serialize for CategoryTotals<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, cents) in self.0 {
            map.serialize_entry(category, &cents_to_decimal(*cents))?;
        }
        map.end()
    }
}

/// Serializes to the same shape the backend uses, months in calendar order.
impl Serialize for MonthlySummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.months.len()))?;
        for (month, categories) in &self.months {
            map.serialize_entry(month.name(), &CategoryTotals(categories))?;
        }
        map.end()
    }
}
