use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::date_utils::DateRange;
use crate::models::{
    Aggregate, CategoryIndex, CategorySummary, CategorySummaryRecord, Transaction,
    TransactionType, UNCATEGORIZED,
};
use crate::money::{cents_from_decimal, sum_cents};
use crate::services::colors;

/// Predicates applied before aggregation: an inclusive date range and an
/// exact transaction type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub transaction_type: Option<TransactionType>,
}

impl SummaryFilter {
    pub fn date_range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }
}

/// Display order for a set of category summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SummaryOrder {
    /// Largest total first, for breakdown views.
    #[default]
    ByTotal,
    /// Most transactions first, for frequency views.
    ByCount,
}

impl FromStr for SummaryOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "total" | "amount" => Ok(Self::ByTotal),
            "count" | "frequency" => Ok(Self::ByCount),
            other => Err(format!("Unknown sort order: {}", other)),
        }
    }
}

/// Re-sort summaries in place. Ties fall back to the other key and then to
/// the category name so output is deterministic.
pub fn sort_summaries(summaries: &mut [CategorySummary], order: SummaryOrder) {
    summaries.sort_by(|a, b| {
        let primary = match order {
            SummaryOrder::ByTotal => b
                .total_cents
                .cmp(&a.total_cents)
                .then_with(|| b.transaction_count.cmp(&a.transaction_count)),
            SummaryOrder::ByCount => b
                .transaction_count
                .cmp(&a.transaction_count)
                .then_with(|| b.total_cents.cmp(&a.total_cents)),
        };
        primary.then_with(|| a.category_name.cmp(&b.category_name))
    });
}

/// Group transactions by category and sum their spending magnitudes.
///
/// Transactions without a category land in the `Uncategorized` bucket.
/// When the filter has a date bound, transactions whose date could not be
/// parsed are excluded and counted in `skipped`. Output is ordered by total,
/// descending.
pub fn aggregate_by_category(
    transactions: &[Transaction],
    filter: &SummaryFilter,
    categories: &CategoryIndex,
) -> Aggregate<Vec<CategorySummary>> {
    let range = filter.date_range();
    let mut skipped = 0;
    let mut groups: BTreeMap<Option<i64>, (i64, usize)> = BTreeMap::new();

    for transaction in transactions {
        if !passes(filter, &range, transaction, &mut skipped) {
            continue;
        }

        let entry = groups.entry(transaction.category_id).or_insert((0, 0));
        entry.0 = entry.0.saturating_add(transaction.magnitude_cents());
        entry.1 += 1;
    }

    let grand_total = share_total(groups.values().map(|(total, _)| *total));

    let mut result: Vec<CategorySummary> = groups
        .into_iter()
        .map(|(category_id, (total_cents, transaction_count))| CategorySummary {
            category_id,
            category_name: categories.name_for(category_id),
            color: categories.color_for(category_id),
            total_cents,
            transaction_count,
            percentage: percentage_of(total_cents, grand_total),
        })
        .collect();

    sort_summaries(&mut result, SummaryOrder::ByTotal);

    tracing::debug!(
        "Aggregated {} transactions into {} categories ({} skipped)",
        transactions.len(),
        result.len(),
        skipped
    );

    Aggregate::new(result, skipped)
}

/// Normalize the backend's pre-aggregated `by-category` rows.
///
/// Totals become magnitudes, missing colors are derived from the name and
/// percentages are recomputed against the grand total.
pub fn summaries_from_backend(records: &[CategorySummaryRecord]) -> Vec<CategorySummary> {
    let mut result: Vec<CategorySummary> = records
        .iter()
        .map(|record| {
            let category_name = record
                .category_name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| match record.category_id {
                    Some(id) => format!("Category {}", id),
                    None => UNCATEGORIZED.to_string(),
                });
            let color = record
                .color
                .clone()
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| colors::color_for(&category_name).to_string());
            let total_cents = record
                .total_amount
                .and_then(cents_from_decimal)
                .unwrap_or(0)
                .saturating_abs();

            CategorySummary {
                category_id: record.category_id,
                category_name,
                total_cents,
                transaction_count: record.transaction_count.unwrap_or(0) as usize,
                color,
                percentage: 0.0,
            }
        })
        .collect();

    let grand_total = share_total(result.iter().map(|s| s.total_cents));
    for summary in &mut result {
        summary.percentage = percentage_of(summary.total_cents, grand_total);
    }

    sort_summaries(&mut result, SummaryOrder::ByTotal);
    result
}

// Percentages divide by a float total so shares still add up to 100 when
// the cents total would saturate.
fn share_total(totals: impl Iterator<Item = i64>) -> f64 {
    totals.map(|cents| cents as f64).sum()
}

fn percentage_of(part: i64, total: f64) -> f64 {
    if total > 0.0 {
        (part as f64 / total) * 100.0
    } else {
        0.0
    }
}

/// Headline numbers for a period's spending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpendingSummary {
    pub total_cents: i64,
    pub transaction_count: usize,
    pub average_cents: i64,
    pub max_transaction_cents: i64,
    pub min_transaction_cents: i64,
}

impl SpendingSummary {
    /// Stats over spending magnitudes of the given transactions.
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        if transactions.is_empty() {
            return Self::default();
        }

        let magnitudes = transactions.iter().map(Transaction::magnitude_cents);
        let total_cents = sum_cents(magnitudes.clone());
        let transaction_count = transactions.len();
        let average_cents = total_cents / transaction_count as i64;
        let max_transaction_cents = magnitudes.clone().max().unwrap_or(0);
        let min_transaction_cents = magnitudes.min().unwrap_or(0);

        Self {
            total_cents,
            transaction_count,
            average_cents,
            max_transaction_cents,
            min_transaction_cents,
        }
    }
}

/// Transactions that pass `filter`. Undated transactions are dropped when
/// the filter has a date bound; the second value counts them.
pub fn filter_transactions(
    transactions: &[Transaction],
    filter: &SummaryFilter,
) -> (Vec<Transaction>, usize) {
    let range = filter.date_range();
    let mut skipped = 0;
    let kept = transactions
        .iter()
        .filter(|t| passes(filter, &range, t, &mut skipped))
        .cloned()
        .collect();
    (kept, skipped)
}

fn passes(
    filter: &SummaryFilter,
    range: &DateRange,
    transaction: &Transaction,
    skipped: &mut usize,
) -> bool {
    if filter
        .transaction_type
        .is_some_and(|wanted| transaction.transaction_type != wanted)
    {
        return false;
    }
    if range.is_unbounded() {
        return true;
    }
    match transaction.date {
        Some(date) => range.contains(date),
        None => {
            tracing::warn!(
                "Skipping transaction {} in date-filtered pass: unparsable date",
                transaction.id
            );
            *skipped += 1;
            false
        }
    }
}
