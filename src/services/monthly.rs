use chrono::Datelike;

use crate::models::{
    Aggregate, CategoryIndex, Month, MonthlySummary, Transaction, TransactionType,
};

/// Which transactions count toward a monthly summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyOptions {
    /// Only this type counts; `None` counts both. Defaults to debits, the
    /// spending side.
    pub transaction_type: Option<TransactionType>,
    /// Restrict the summary to a single month.
    pub month: Option<Month>,
}

impl Default for MonthlyOptions {
    fn default() -> Self {
        Self {
            transaction_type: Some(TransactionType::Debit),
            month: None,
        }
    }
}

/// Bucket a calendar year's spending by month, then by category name.
pub fn aggregate_monthly(
    transactions: &[Transaction],
    year: i32,
    categories: &CategoryIndex,
) -> Aggregate<MonthlySummary> {
    aggregate_monthly_with(transactions, year, categories, &MonthlyOptions::default())
}

/// [`aggregate_monthly`] with explicit options.
///
/// Transactions without a parsable date cannot be placed in a month and are
/// counted in `skipped`. Months without qualifying transactions are absent
/// from the result.
pub fn aggregate_monthly_with(
    transactions: &[Transaction],
    year: i32,
    categories: &CategoryIndex,
    options: &MonthlyOptions,
) -> Aggregate<MonthlySummary> {
    let mut summary = MonthlySummary::new();
    let mut skipped = 0;

    for transaction in transactions {
        if options
            .transaction_type
            .is_some_and(|wanted| transaction.transaction_type != wanted)
        {
            continue;
        }

        let Some(date) = transaction.date else {
            tracing::warn!(
                "Skipping transaction {} in monthly summary: unparsable date",
                transaction.id
            );
            skipped += 1;
            continue;
        };
        if date.year() != year {
            continue;
        }
        let Some(month) = Month::from_number(date.month()) else {
            continue;
        };
        if options.month.is_some_and(|wanted| wanted != month) {
            continue;
        }

        let category = categories.name_for(transaction.category_id);
        summary.add(month, &category, transaction.magnitude_cents());
    }

    tracing::debug!(
        "Monthly summary for {}: {} months with data ({} skipped)",
        year,
        summary.len(),
        skipped
    );

    Aggregate::new(summary, skipped)
}
