//! Conversions between wire decimals and integer cents.
//!
//! Every total the engine produces is summed in cents so that category
//! totals add up exactly; floats only appear at the wire boundary and in
//! ratios (percentages, angles).

use serde_json::Value;

/// Convert a decimal amount to cents, rounding half away from zero.
///
/// Returns `None` for NaN, infinities and amounts whose cents do not fit
/// in an `i64`.
pub fn cents_from_decimal(amount: f64) -> Option<i64> {
    if !amount.is_finite() {
        return None;
    }
    let cents = (amount * 100.0).round();
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range.
    if cents >= i64::MAX as f64 || cents < i64::MIN as f64 {
        return None;
    }
    Some(cents as i64)
}

/// Sum cents, saturating at the `i64` bounds instead of overflowing.
pub fn sum_cents<I>(cents: I) -> i64
where
    I: IntoIterator<Item = i64>,
{
    cents.into_iter().fold(0i64, i64::saturating_add)
}

pub fn cents_to_decimal(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Parse an amount that may arrive as a JSON number or a numeric string.
pub fn cents_from_json(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_f64().and_then(cents_from_decimal),
        Value::String(s) => s.trim().parse::<f64>().ok().and_then(cents_from_decimal),
        _ => None,
    }
}

pub fn format_cents(cents: i64) -> String {
    let is_negative = cents < 0;
    let abs_cents = cents.unsigned_abs();
    let dollars = abs_cents / 100;
    let remainder = abs_cents % 100;

    if is_negative {
        format!("-{}.{:02}", dollars, remainder)
    } else {
        format!("{}.{:02}", dollars, remainder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cents_from_decimal_rounds() {
        assert_eq!(cents_from_decimal(12.345), Some(1235));
        assert_eq!(cents_from_decimal(-0.1), Some(-10));
        assert_eq!(cents_from_decimal(0.0), Some(0));
        assert_eq!(cents_from_decimal(f64::NAN), None);
        assert_eq!(cents_from_decimal(f64::INFINITY), None);
    }

    #[test]
    fn test_cents_from_decimal_rejects_out_of_range() {
        assert_eq!(cents_from_decimal(1e17), None);
        assert_eq!(cents_from_decimal(-1e17), None);
        assert_eq!(cents_from_decimal(6e16), Some(6_000_000_000_000_000_000));
        assert_eq!(cents_from_json(&json!(1e17)), None);
        assert_eq!(cents_from_json(&json!("-92233720368547758.08")), None);
    }

    #[test]
    fn test_sum_cents_saturates() {
        assert_eq!(sum_cents([150, -50, 25]), 125);
        assert_eq!(sum_cents(Vec::new()), 0);
        assert_eq!(sum_cents([i64::MAX, 1]), i64::MAX);
        assert_eq!(sum_cents([6_000_000_000_000_000_000; 2]), i64::MAX);
        assert_eq!(sum_cents([i64::MIN, -1]), i64::MIN);
    }

    #[test]
    fn test_cents_from_json() {
        assert_eq!(cents_from_json(&json!(42.5)), Some(4250));
        assert_eq!(cents_from_json(&json!(-7)), Some(-700));
        assert_eq!(cents_from_json(&json!(" 19.99 ")), Some(1999));
        assert_eq!(cents_from_json(&json!("twelve")), None);
        assert_eq!(cents_from_json(&json!(null)), None);
        assert_eq!(cents_from_json(&json!([1, 2])), None);
    }

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(123456), "1234.56");
        assert_eq!(format_cents(-5), "-0.05");
        assert_eq!(format_cents(0), "0.00");
    }
}
