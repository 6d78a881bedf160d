pub mod analytics;
pub mod backend;
pub mod chart_geometry;
pub mod colors;
pub mod comparison;
pub mod monthly;
