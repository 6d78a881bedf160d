use axum::extract::{Query, State};
use axum::response::{IntoResponse, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date_utils::{DatePreset, DateRange};
use crate::error::{AppError, AppResult};
use crate::models::{
    Aggregate, CategoryIndex, CategorySummary, MonthlySummary, Transaction, TransactionBatch,
    TransactionType,
};
use crate::query_utils::{self, deserialize_optional};
use crate::services::analytics::{self, SpendingSummary, SummaryFilter, SummaryOrder};
use crate::services::backend::{fetch_all_transactions, TransactionQuery};
use crate::services::monthly::{self, MonthlyOptions};
use crate::session::Session;
use crate::state::AppState;

/// Response header carrying how many records a pass left out.
pub const SKIPPED_HEADER: &str = "x-skipped-records";

/// Where a summary is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SummarySourceKind {
    /// The backend's own pre-aggregated endpoint.
    #[default]
    Backend,
    /// Aggregated here from the raw transaction list.
    Transactions,
}

impl SummarySourceKind {
    pub(crate) fn parse(value: Option<&str>, default: Self) -> AppResult<Self> {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            None | Some("") => Ok(default),
            Some("backend") => Ok(Self::Backend),
            Some("transactions") => Ok(Self::Transactions),
            Some(other) => Err(AppError::Validation(format!("Unknown source: {}", other))),
        }
    }
}

/// Transactions plus the category directory needed to name them.
pub(crate) struct Loaded {
    pub transactions: Vec<Transaction>,
    pub categories: CategoryIndex,
    pub rejected: usize,
}

pub(crate) async fn load_transactions(
    state: &AppState,
    session: &Session,
    query: &TransactionQuery,
) -> AppResult<Loaded> {
    let records = fetch_all_transactions(
        state.source.as_ref(),
        session,
        query,
        state.config.page_size,
    )
    .await?;
    let categories = CategoryIndex::new(state.source.categories(session).await?);
    let batch = TransactionBatch::from_records(&records);
    let rejected = batch.skipped();

    Ok(Loaded {
        transactions: batch.transactions,
        categories,
        rejected,
    })
}

/// A year's monthly summary, from the backend or aggregated locally.
pub(crate) async fn load_monthly(
    state: &AppState,
    session: &Session,
    year: i32,
    options: &MonthlyOptions,
    source: SummarySourceKind,
) -> AppResult<Aggregate<MonthlySummary>> {
    match source {
        SummarySourceKind::Backend => {
            let wire = state
                .source
                .monthly_summary(session, year, options.month)
                .await?;
            let mut result = MonthlySummary::from_wire(&wire);
            if let Some(month) = options.month {
                result.data.retain_month(month);
            }
            Ok(result)
        }
        SummarySourceKind::Transactions => {
            let query = TransactionQuery {
                start_date: NaiveDate::from_ymd_opt(year, 1, 1),
                end_date: NaiveDate::from_ymd_opt(year, 12, 31),
                ..Default::default()
            };
            let loaded = load_transactions(state, session, &query).await?;
            let mut result =
                monthly::aggregate_monthly_with(&loaded.transactions, year, &loaded.categories, options);
            result.skipped += loaded.rejected;
            Ok(result)
        }
    }
}

fn parse_transaction_type(value: Option<&str>) -> AppResult<Option<TransactionType>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v
            .parse::<TransactionType>()
            .map(Some)
            .map_err(|e| AppError::Validation(format!("Invalid transaction_type: {}", e))),
    }
}

/// Explicit dates win over a preset; a preset fills only the missing bounds.
fn resolve_range(
    start_date: Option<&str>,
    end_date: Option<&str>,
    preset: Option<&str>,
) -> AppResult<DateRange> {
    let start = query_utils::parse_optional_date("start_date", start_date)?;
    let end = query_utils::parse_optional_date("end_date", end_date)?;
    let preset_range = match query_utils::non_empty(preset.map(str::to_string)) {
        Some(p) => DateRange::from_preset(
            p.parse::<DatePreset>()
                .map_err(|_| AppError::Validation(format!("Invalid preset: {}", p)))?,
        ),
        None => DateRange::default(),
    };

    Ok(DateRange::new(
        start.or(preset_range.from),
        end.or(preset_range.to),
    ))
}

#[derive(Debug, Deserialize)]
pub struct CategorySummaryParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub preset: Option<String>,
    pub transaction_type: Option<String>,
    pub sort: Option<String>,
    pub source: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CategoryBreakdown {
    pub categories: Vec<CategorySummary>,
    pub skipped: usize,
}

pub async fn summary_by_category(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<CategorySummaryParams>,
) -> AppResult<Json<CategoryBreakdown>> {
    let range = resolve_range(
        params.start_date.as_deref(),
        params.end_date.as_deref(),
        params.preset.as_deref(),
    )?;
    let filter = SummaryFilter {
        start_date: range.from,
        end_date: range.to,
        transaction_type: parse_transaction_type(params.transaction_type.as_deref())?,
    };
    let order = match query_utils::non_empty(params.sort) {
        Some(s) => s.parse::<SummaryOrder>().map_err(AppError::Validation)?,
        None => SummaryOrder::default(),
    };
    let source = SummarySourceKind::parse(params.source.as_deref(), SummarySourceKind::Backend)?;

    let (mut categories, skipped) = match source {
        SummarySourceKind::Backend => {
            let records = state.source.summary_by_category(&session, &filter).await?;
            (analytics::summaries_from_backend(&records), 0)
        }
        SummarySourceKind::Transactions => {
            let query = TransactionQuery {
                start_date: filter.start_date,
                end_date: filter.end_date,
                ..Default::default()
            };
            let loaded = load_transactions(&state, &session, &query).await?;
            let result =
                analytics::aggregate_by_category(&loaded.transactions, &filter, &loaded.categories);
            (result.data, result.skipped + loaded.rejected)
        }
    };
    analytics::sort_summaries(&mut categories, order);

    Ok(Json(CategoryBreakdown {
        categories,
        skipped,
    }))
}

#[derive(Debug, Deserialize)]
pub struct MonthlyParams {
    #[serde(default, deserialize_with = "deserialize_optional")]
    pub year: Option<i32>,
    pub month: Option<String>,
    /// `debit` (default), `credit` or `all`.
    pub transaction_type: Option<String>,
    pub source: Option<String>,
}

pub async fn monthly_summary(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<MonthlyParams>,
) -> AppResult<impl IntoResponse> {
    let year = query_utils::require("year", params.year)?;
    let month = query_utils::parse_optional_month("month", params.month.as_deref())?;
    let transaction_type = match params.transaction_type.as_deref().map(str::trim) {
        Some(t) if t.eq_ignore_ascii_case("all") => None,
        Some(t) if !t.is_empty() => parse_transaction_type(Some(t))?,
        _ => Some(TransactionType::Debit),
    };
    let source =
        SummarySourceKind::parse(params.source.as_deref(), SummarySourceKind::Transactions)?;
    if source == SummarySourceKind::Backend && transaction_type != Some(TransactionType::Debit) {
        return Err(AppError::Validation(
            "The backend monthly summary only covers debits".into(),
        ));
    }

    let options = MonthlyOptions {
        transaction_type,
        month,
    };
    let result = load_monthly(&state, &session, year, &options, source).await?;

    Ok((
        [(SKIPPED_HEADER, result.skipped.to_string())],
        Json(result.data),
    ))
}

#[derive(Debug, Deserialize)]
pub struct StatsParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub preset: Option<String>,
    pub transaction_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SpendingStats {
    #[serde(flatten)]
    pub summary: SpendingSummary,
    pub total: String,
    pub average: String,
    pub skipped: usize,
}

pub async fn spending_stats(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<StatsParams>,
) -> AppResult<Json<SpendingStats>> {
    let range = resolve_range(
        params.start_date.as_deref(),
        params.end_date.as_deref(),
        params.preset.as_deref(),
    )?;
    let filter = SummaryFilter {
        start_date: range.from,
        end_date: range.to,
        transaction_type: parse_transaction_type(params.transaction_type.as_deref())?
            .or(Some(TransactionType::Debit)),
    };
    let query = TransactionQuery {
        start_date: filter.start_date,
        end_date: filter.end_date,
        ..Default::default()
    };

    let loaded = load_transactions(&state, &session, &query).await?;
    let (kept, skipped) = analytics::filter_transactions(&loaded.transactions, &filter);
    let summary = SpendingSummary::from_transactions(&kept);

    Ok(Json(SpendingStats {
        total: crate::money::format_cents(summary.total_cents),
        average: crate::money::format_cents(summary.average_cents),
        summary,
        skipped: skipped + loaded.rejected,
    }))
}
