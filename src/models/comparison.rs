use serde::Serialize;

use crate::models::Month;

/// One category's change between two months.
///
/// `difference = amount_a - amount_b`. `percent_change` is relative to
/// month B; when month B is zero it is 100 if month A spent anything and 0
/// otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub category: String,
    pub amount_a_cents: i64,
    pub amount_b_cents: i64,
    pub difference_cents: i64,
    pub percent_change: f64,
    /// Tint for the change column; `None` when unchanged.
    pub change_color: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthComparison {
    pub year: i32,
    pub month_a: Month,
    pub month_b: Month,
    pub rows: Vec<ComparisonRow>,
}
