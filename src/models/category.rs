use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::services::colors;

pub const UNCATEGORIZED: &str = "Uncategorized";

/// A category as returned by `GET /categories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// One row of `GET /transactions/summary/by-category`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummaryRecord {
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub transaction_count: Option<u64>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Per-category totals for one aggregation period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category_id: Option<i64>,
    pub category_name: String,
    /// Sum of spending magnitudes, never negative.
    pub total_cents: i64,
    pub transaction_count: usize,
    pub color: String,
    /// Share of the period's grand total, 0 when the grand total is 0.
    pub percentage: f64,
}

/// Resolves category ids to display names and colors.
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    by_id: HashMap<i64, Category>,
}

impl CategoryIndex {
    pub fn new(categories: impl IntoIterator<Item = Category>) -> Self {
        Self {
            by_id: categories.into_iter().map(|c| (c.id, c)).collect(),
        }
    }

    pub fn name_for(&self, id: Option<i64>) -> String {
        match id {
            None => UNCATEGORIZED.to_string(),
            Some(id) => self
                .by_id
                .get(&id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| format!("Category {}", id)),
        }
    }

    /// The category's own color, or the hash-derived one when it has none.
    pub fn color_for(&self, id: Option<i64>) -> String {
        id.and_then(|id| self.by_id.get(&id))
            .and_then(|c| c.color.clone())
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| colors::color_for(&self.name_for(id)).to_string())
    }
}
