use std::collections::BTreeSet;

use crate::models::{ComparisonRow, Month, MonthComparison, MonthlySummary};
use crate::services::colors;

/// Per-category change from month B to month A, largest absolute change
/// first.
///
/// Categories seen in only one of the months read as zero in the other.
/// Equal months are not special-cased; every row then has a zero change.
pub fn compare_months(
    summary: &MonthlySummary,
    month_a: Month,
    month_b: Month,
) -> Vec<ComparisonRow> {
    let categories: BTreeSet<&String> = summary
        .month(month_a)
        .into_iter()
        .chain(summary.month(month_b))
        .flat_map(|cats| cats.keys())
        .collect();

    let mut rows: Vec<ComparisonRow> = categories
        .into_iter()
        .map(|category| {
            let amount_a_cents = summary.amount(month_a, category);
            let amount_b_cents = summary.amount(month_b, category);
            let difference_cents = amount_a_cents - amount_b_cents;
            let percent_change = percent_change(amount_a_cents, amount_b_cents);

            ComparisonRow {
                category: category.clone(),
                amount_a_cents,
                amount_b_cents,
                difference_cents,
                percent_change,
                change_color: colors::change_color(percent_change),
            }
        })
        .collect();

    // Stable sort keeps alphabetical order among equal changes.
    rows.sort_by(|a, b| b.difference_cents.abs().cmp(&a.difference_cents.abs()));
    rows
}

/// Build the comparison view for a year, forcing the two months apart the
/// way the month selector does.
pub fn month_comparison(
    summary: &MonthlySummary,
    year: i32,
    month_a: Month,
    month_b: Month,
) -> MonthComparison {
    let month_b = month_b.distinct_from(month_a);
    MonthComparison {
        year,
        month_a,
        month_b,
        rows: compare_months(summary, month_a, month_b),
    }
}

fn percent_change(amount_a_cents: i64, amount_b_cents: i64) -> f64 {
    if amount_b_cents == 0 {
        if amount_a_cents > 0 {
            100.0
        } else {
            0.0
        }
    } else {
        (amount_a_cents - amount_b_cents) as f64 / amount_b_cents as f64 * 100.0
    }
}
