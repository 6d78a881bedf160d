use serde::Serialize;

/// One wedge of a pie chart.
///
/// Angles are in degrees, clockwise, with 0° pointing up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub category: String,
    pub amount_cents: i64,
    pub percentage_of_total: f64,
    pub color: String,
    pub start_angle_deg: f64,
    pub end_angle_deg: f64,
    pub large_arc: bool,
    /// SVG path for the wedge, drawn inside a `2r × 2r` view box.
    pub path: String,
}

impl PieSlice {
    pub fn sweep_deg(&self) -> f64 {
        self.end_angle_deg - self.start_angle_deg
    }
}

/// One row of a horizontal bar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSegment {
    pub category: String,
    pub amount_cents: i64,
    /// Length relative to the largest bar, in `0.0..=1.0`.
    pub width_ratio: f64,
    pub color: String,
    pub label: String,
}
