//! Bar and pie geometry for per-period category amounts.
//!
//! Pie angles are in degrees, clockwise from 12 o'clock. Paths are SVG
//! path data for a circle of radius `r` centred at `(r, r)`, i.e. a
//! `0 0 2r 2r` view box.

use crate::models::{BarSegment, Month, MonthlySummary, PieSlice};
use crate::money::format_cents;
use crate::services::colors;

pub const DEFAULT_RADIUS: f64 = 50.0;

const FULL_CIRCLE_EPSILON: f64 = 1e-9;

/// One category's amount as fed to a chart. Categories without an explicit
/// color get the hash-derived one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartInput {
    pub category: String,
    pub amount_cents: i64,
    pub color: Option<String>,
}

impl ChartInput {
    pub fn new(category: impl Into<String>, amount_cents: i64) -> Self {
        Self {
            category: category.into(),
            amount_cents,
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    fn resolved_color(&self) -> String {
        self.color
            .clone()
            .unwrap_or_else(|| colors::color_for(&self.category).to_string())
    }

    /// Negative amounts draw as nothing.
    fn drawable_cents(&self) -> i64 {
        self.amount_cents.max(0)
    }
}

/// Chart inputs for one month, categories in name order. Empty when the
/// month has no data.
pub fn inputs_for_month(summary: &MonthlySummary, month: Month) -> Vec<ChartInput> {
    summary
        .month(month)
        .map(|cats| {
            cats.iter()
                .map(|(category, cents)| ChartInput::new(category.clone(), *cents))
                .collect()
        })
        .unwrap_or_default()
}

/// Horizontal bars scaled to the largest amount, not to the total.
pub fn bar_layout(inputs: &[ChartInput]) -> Vec<BarSegment> {
    let max = inputs
        .iter()
        .map(ChartInput::drawable_cents)
        .max()
        .unwrap_or(0);

    inputs
        .iter()
        .map(|input| {
            let width_ratio = if max > 0 {
                input.drawable_cents() as f64 / max as f64
            } else {
                0.0
            };
            BarSegment {
                category: input.category.clone(),
                amount_cents: input.amount_cents,
                width_ratio,
                color: input.resolved_color(),
                label: format_cents(input.amount_cents),
            }
        })
        .collect()
}

/// Pie slices in input order, each sweeping its share of 360°.
///
/// Returns no slices when the total is zero.
pub fn pie_layout(inputs: &[ChartInput], radius: f64) -> Vec<PieSlice> {
    let total: f64 = inputs.iter().map(|i| i.drawable_cents() as f64).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut current_angle = 0.0;
    inputs
        .iter()
        .map(|input| {
            let amount = input.drawable_cents();
            let share = amount as f64 / total;
            let slice_angle = 360.0 * share;
            let start_angle_deg = current_angle;
            let end_angle_deg = current_angle + slice_angle;
            current_angle = end_angle_deg;

            PieSlice {
                category: input.category.clone(),
                amount_cents: input.amount_cents,
                percentage_of_total: share * 100.0,
                color: input.resolved_color(),
                start_angle_deg,
                end_angle_deg,
                large_arc: slice_angle > 180.0,
                path: arc_path(start_angle_deg, end_angle_deg, radius),
            }
        })
        .collect()
}

/// Point on the circle at `angle_deg`, 0° pointing up.
pub fn point_on_circle(angle_deg: f64, radius: f64) -> (f64, f64) {
    let radians = (angle_deg - 90.0).to_radians();
    (radius + radius * radians.cos(), radius + radius * radians.sin())
}

/// Wedge path from the centre out to the arc and back.
///
/// A single arc cannot draw a full circle because its end point equals its
/// start point, so a full sweep is split into two half arcs.
pub fn arc_path(start_angle_deg: f64, end_angle_deg: f64, radius: f64) -> String {
    let sweep = end_angle_deg - start_angle_deg;
    let c = fmt_coord(radius);
    let r = fmt_coord(radius);
    let (sx, sy) = point_on_circle(start_angle_deg, radius);

    if sweep >= 360.0 - FULL_CIRCLE_EPSILON {
        let (mx, my) = point_on_circle(start_angle_deg + 180.0, radius);
        return format!(
            "M {c} {c} L {} {} A {r} {r} 0 1 1 {} {} A {r} {r} 0 1 1 {} {} Z",
            fmt_coord(sx),
            fmt_coord(sy),
            fmt_coord(mx),
            fmt_coord(my),
            fmt_coord(sx),
            fmt_coord(sy),
        );
    }

    let (ex, ey) = point_on_circle(end_angle_deg, radius);
    let large_arc = u8::from(sweep > 180.0);
    format!(
        "M {c} {c} L {} {} A {r} {r} 0 {large_arc} 1 {} {} Z",
        fmt_coord(sx),
        fmt_coord(sy),
        fmt_coord(ex),
        fmt_coord(ey),
    )
}

/// Four decimals, trailing zeros trimmed, no negative zero.
fn fmt_coord(value: f64) -> String {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let text = format!("{:.4}", rounded);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_pie_thirty_seventy() {
        let inputs = vec![ChartInput::new("A", 3000), ChartInput::new("B", 7000)];
        let slices = pie_layout(&inputs, DEFAULT_RADIUS);
        assert_eq!(slices.len(), 2);

        assert!((slices[0].start_angle_deg - 0.0).abs() < EPS);
        assert!((slices[0].end_angle_deg - 108.0).abs() < EPS);
        assert!(!slices[0].large_arc);
        assert!((slices[1].start_angle_deg - 108.0).abs() < EPS);
        assert!((slices[1].end_angle_deg - 360.0).abs() < EPS);
        assert!(slices[1].large_arc);

        let sweep: f64 = slices.iter().map(PieSlice::sweep_deg).sum();
        assert!((sweep - 360.0).abs() < EPS);
        assert!((slices[0].percentage_of_total - 30.0).abs() < EPS);
    }

    #[test]
    fn test_pie_path_starts_at_top() {
        let inputs = vec![ChartInput::new("A", 1), ChartInput::new("B", 1)];
        let slices = pie_layout(&inputs, DEFAULT_RADIUS);
        assert_eq!(slices[0].path, "M 50 50 L 50 0 A 50 50 0 0 1 50 100 Z");
        assert_eq!(slices[1].path, "M 50 50 L 50 100 A 50 50 0 0 1 50 0 Z");
    }

    #[test]
    fn test_pie_quarter_path() {
        let path = arc_path(0.0, 90.0, 50.0);
        assert_eq!(path, "M 50 50 L 50 0 A 50 50 0 0 1 100 50 Z");
    }

    #[test]
    fn test_single_category_draws_full_circle() {
        let slices = pie_layout(&[ChartInput::new("Only", 500)], 10.0);
        assert_eq!(slices.len(), 1);
        assert!((slices[0].sweep_deg() - 360.0).abs() < EPS);
        assert_eq!(
            slices[0].path,
            "M 10 10 L 10 0 A 10 10 0 1 1 10 20 A 10 10 0 1 1 10 0 Z"
        );
    }

    #[test]
    fn test_zero_total_yields_no_slices() {
        assert!(pie_layout(&[], DEFAULT_RADIUS).is_empty());
        let zeros = vec![ChartInput::new("A", 0), ChartInput::new("B", 0)];
        assert!(pie_layout(&zeros, DEFAULT_RADIUS).is_empty());
    }

    #[test]
    fn test_negative_amounts_take_no_space() {
        let inputs = vec![ChartInput::new("Refund", -500), ChartInput::new("Rent", 1000)];
        let slices = pie_layout(&inputs, DEFAULT_RADIUS);
        assert_eq!(slices[0].sweep_deg(), 0.0);
        assert!((slices[1].sweep_deg() - 360.0).abs() < EPS);
    }

    #[test]
    fn test_huge_amounts_still_fill_the_circle() {
        let huge = 6_000_000_000_000_000_000;
        let inputs = vec![ChartInput::new("A", huge), ChartInput::new("B", huge)];
        let slices = pie_layout(&inputs, DEFAULT_RADIUS);
        assert_eq!(slices.len(), 2);
        assert!((slices[0].end_angle_deg - 180.0).abs() < EPS);
        assert!((slices[1].end_angle_deg - 360.0).abs() < EPS);
    }

    #[test]
    fn test_colors_default_to_hash() {
        let inputs = vec![
            ChartInput::new("Groceries", 100),
            ChartInput::new("Rent", 100).with_color("#123456"),
        ];
        let slices = pie_layout(&inputs, DEFAULT_RADIUS);
        assert_eq!(slices[0].color, "hsl(317, 70%, 50%)");
        assert_eq!(slices[1].color, "#123456");
    }

    #[test]
    fn test_bar_scaled_to_largest() {
        let inputs = vec![
            ChartInput::new("Rent", 100000),
            ChartInput::new("Fuel", 25000),
            ChartInput::new("Gifts", 0),
        ];
        let bars = bar_layout(&inputs);
        assert_eq!(bars[0].width_ratio, 1.0);
        assert!((bars[1].width_ratio - 0.25).abs() < EPS);
        assert_eq!(bars[2].width_ratio, 0.0);
        assert_eq!(bars[1].label, "250.00");
    }

    #[test]
    fn test_bar_all_zero() {
        let bars = bar_layout(&[ChartInput::new("A", 0)]);
        assert_eq!(bars[0].width_ratio, 0.0);
        assert!(bar_layout(&[]).is_empty());
    }

    #[test]
    fn test_inputs_for_month() {
        let mut summary = MonthlySummary::new();
        summary.add(Month::May, "Rent", 1000);
        summary.add(Month::May, "Fuel", 200);
        let inputs = inputs_for_month(&summary, Month::May);
        assert_eq!(inputs[0], ChartInput::new("Fuel", 200));
        assert_eq!(inputs[1], ChartInput::new("Rent", 1000));
        assert!(inputs_for_month(&summary, Month::June).is_empty());
    }

    #[test]
    fn test_fmt_coord() {
        assert_eq!(fmt_coord(50.0), "50");
        assert_eq!(fmt_coord(3.061616997868383e-15), "0");
        assert_eq!(fmt_coord(-0.00001), "0");
        assert_eq!(fmt_coord(97.55282581475768), "97.5528");
    }
}
