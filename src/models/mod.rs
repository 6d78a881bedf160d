pub mod category;
pub mod chart;
pub mod comparison;
pub mod monthly;
pub mod transaction;

use serde::Serialize;

pub use category::{
    Category, CategoryIndex, CategorySummary, CategorySummaryRecord, UNCATEGORIZED,
};
pub use chart::{BarSegment, PieSlice};
pub use comparison::{ComparisonRow, MonthComparison};
pub use monthly::{Month, MonthlySummary};
pub use transaction::{Transaction, TransactionBatch, TransactionRecord, TransactionType};

/// A derived view plus how many input records were left out of it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregate<T> {
    pub data: T,
    pub skipped: usize,
}

impl<T> Aggregate<T> {
    pub fn new(data: T, skipped: usize) -> Self {
        Self { data, skipped }
    }
}
