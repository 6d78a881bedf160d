use axum::extract::{Query, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};

use super::api::{load_monthly, SummarySourceKind};
use crate::error::{AppError, AppResult};
use crate::models::{BarSegment, Month, MonthComparison, PieSlice};
use crate::money::sum_cents;
use crate::query_utils::{self, deserialize_optional};
use crate::services::chart_geometry::{self, DEFAULT_RADIUS};
use crate::services::{colors, comparison};
use crate::services::monthly::MonthlyOptions;
use crate::session::Session;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ComparisonParams {
    #[serde(default, deserialize_with = "deserialize_optional")]
    pub year: Option<i32>,
    pub month_a: Option<String>,
    pub month_b: Option<String>,
    pub source: Option<String>,
}

pub async fn comparison(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ComparisonParams>,
) -> AppResult<Json<MonthComparison>> {
    let year = query_utils::require("year", params.year)?;
    let month_a = query_utils::parse_month(
        "month_a",
        &query_utils::require("month_a", query_utils::non_empty(params.month_a))?,
    )?;
    let month_b = query_utils::parse_month(
        "month_b",
        &query_utils::require("month_b", query_utils::non_empty(params.month_b))?,
    )?;
    let source =
        SummarySourceKind::parse(params.source.as_deref(), SummarySourceKind::Transactions)?;

    let summary = load_monthly(&state, &session, year, &MonthlyOptions::default(), source).await?;

    Ok(Json(comparison::month_comparison(
        &summary.data,
        year,
        month_a,
        month_b,
    )))
}

#[derive(Debug, Deserialize)]
pub struct ChartParams {
    #[serde(default, deserialize_with = "deserialize_optional")]
    pub year: Option<i32>,
    pub month: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional")]
    pub radius: Option<f64>,
    /// Use the fixed 12-color palette instead of hash-derived hues.
    #[serde(default, deserialize_with = "deserialize_optional")]
    pub palette: Option<bool>,
    pub source: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PieChart {
    pub month: Month,
    pub total_cents: i64,
    pub radius: f64,
    pub slices: Vec<PieSlice>,
}

#[derive(Debug, Serialize)]
pub struct BarChart {
    pub month: Month,
    pub bars: Vec<BarSegment>,
}

/// One month's chart inputs for the requested year.
async fn month_inputs(
    state: &AppState,
    session: &Session,
    params: &ChartParams,
) -> AppResult<(Month, Vec<chart_geometry::ChartInput>)> {
    let year = query_utils::require("year", params.year)?;
    let month = query_utils::parse_month(
        "month",
        &query_utils::require("month", query_utils::non_empty(params.month.clone()))?,
    )?;
    let source =
        SummarySourceKind::parse(params.source.as_deref(), SummarySourceKind::Transactions)?;
    let options = MonthlyOptions {
        month: Some(month),
        ..Default::default()
    };

    let summary = load_monthly(state, session, year, &options, source).await?;
    let mut inputs = chart_geometry::inputs_for_month(&summary.data, month);
    if params.palette.unwrap_or(false) {
        inputs = inputs
            .into_iter()
            .map(|input| {
                let color = colors::palette_color_for(&input.category);
                input.with_color(color)
            })
            .collect();
    }
    Ok((month, inputs))
}

pub async fn pie(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ChartParams>,
) -> AppResult<Json<PieChart>> {
    let radius = params.radius.unwrap_or(DEFAULT_RADIUS);
    if !radius.is_finite() || radius <= 0.0 {
        return Err(AppError::Validation(format!(
            "radius must be a positive number, got {}",
            radius
        )));
    }

    let (month, inputs) = month_inputs(&state, &session, &params).await?;
    let total_cents = sum_cents(inputs.iter().map(|i| i.amount_cents.max(0)));

    Ok(Json(PieChart {
        month,
        total_cents,
        radius,
        slices: chart_geometry::pie_layout(&inputs, radius),
    }))
}

pub async fn bar(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ChartParams>,
) -> AppResult<Json<BarChart>> {
    let (month, inputs) = month_inputs(&state, &session, &params).await?;

    Ok(Json(BarChart {
        month,
        bars: chart_geometry::bar_layout(&inputs),
    }))
}
