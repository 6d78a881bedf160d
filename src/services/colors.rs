//! Deterministic category colors.
//!
//! Colors are derived from a 32-bit polynomial hash of the category name
//! (`hash = code + hash * 31`, wrapping on overflow), so the same name gets
//! the same color in every run and on every client that uses the same hash.

use std::fmt;

pub const SATURATION: u8 = 70;
pub const LIGHTNESS: u8 = 50;

/// Discrete palette for callers that cannot use a continuous hue.
pub const PALETTE: [&str; 12] = [
    "#ef4444", "#f97316", "#f59e0b", "#eab308", "#84cc16", "#22c55e", "#14b8a6", "#06b6d4",
    "#3b82f6", "#6366f1", "#a855f7", "#ec4899",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hsl {
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

/// Fold every code point into a wrapping 32-bit signed accumulator.
pub fn category_hash(name: &str) -> i32 {
    name.chars().fold(0i32, |hash, c| {
        (c as i32).wrapping_add((hash << 5).wrapping_sub(hash))
    })
}

/// Continuous-hue color for a category. Total: any string maps to a color.
pub fn color_for(name: &str) -> Hsl {
    let hue = category_hash(name).unsigned_abs() % 360;
    Hsl {
        hue: hue as u16,
        saturation: SATURATION,
        lightness: LIGHTNESS,
    }
}

/// Palette color for a category, picked by `|hash| % 12`.
pub fn palette_color_for(name: &str) -> &'static str {
    let index = category_hash(name).unsigned_abs() as usize % PALETTE.len();
    PALETTE[index]
}

/// Tint for a month-over-month change: red for more spending, green for
/// less, opacity growing with the size of the change (capped at 100%).
pub fn change_color(percent_change: f64) -> Option<String> {
    if !percent_change.is_finite() || percent_change == 0.0 {
        return None;
    }
    let intensity = percent_change.abs().min(100.0) / 100.0;
    let alpha = 0.3 + intensity * 0.7;
    if percent_change > 0.0 {
        Some(format!("rgba(255, 59, 48, {:.2})", alpha))
    } else {
        Some(format!("rgba(52, 199, 89, {:.2})", alpha))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_matches_reference_values() {
        assert_eq!(category_hash(""), 0);
        assert_eq!(category_hash("a"), 97);
        assert_eq!(category_hash("Groceries"), -3610037);
        assert_eq!(category_hash("Dining"), 2047133401);
        assert_eq!(category_hash("Uncategorized"), -612892014);
    }

    #[test]
    fn test_color_for_is_stable() {
        assert_eq!(color_for("Groceries").to_string(), "hsl(317, 70%, 50%)");
        assert_eq!(color_for("Groceries"), color_for("Groceries"));
        assert_eq!(color_for("Dining").hue, 241);
    }

    #[test]
    fn test_color_for_unusual_names() {
        assert_eq!(color_for("").hue, 0);
        assert_eq!(color_for("  Rent ").hue, 57);
        assert_eq!(color_for("Café").hue, 289);
        assert_eq!(color_for("🍕").hue, 29);
        // Whitespace is significant.
        assert_ne!(color_for("  Rent "), color_for("Rent"));
    }

    #[test]
    fn test_long_names_wrap_without_panicking() {
        let long = "x".repeat(10_000);
        let hsl = color_for(&long);
        assert!(hsl.hue < 360);
    }

    #[test]
    fn test_palette_color_for() {
        assert_eq!(palette_color_for("Groceries"), PALETTE[5]);
        assert_eq!(palette_color_for("Dining"), PALETTE[1]);
        assert_eq!(palette_color_for(""), PALETTE[0]);
    }

    #[test]
    fn test_change_color() {
        assert_eq!(change_color(0.0), None);
        assert_eq!(
            change_color(50.0).as_deref(),
            Some("rgba(255, 59, 48, 0.65)")
        );
        assert_eq!(
            change_color(-250.0).as_deref(),
            Some("rgba(52, 199, 89, 1.00)")
        );
        assert_eq!(change_color(f64::NAN), None);
    }
}
