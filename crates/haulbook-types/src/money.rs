//! Currency normalization
//!
//! Amounts are plain `f64` dollars rounded to whole cents. Rounding is
//! half-away-from-zero at the cent boundary. Negative values pass through
//! unchanged apart from rounding.

use serde_json::Value;

/// Round a raw number to a 2-decimal currency value. Non-finite input → 0.
///
/// Rounds the shortest decimal text of the value, so `1.005` (stored as
/// `1.00499...`) lands on the half-cent it was written as. The result is a
/// fixed point at every magnitude: `to_money(to_money(x)) == to_money(x)`.
pub fn to_money(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    // f64 Display is the shortest round-trip form and never uses an exponent
    let text = value.abs().to_string();
    let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let mut digits: Vec<char> = whole
        .chars()
        .chain(frac.chars().chain(std::iter::repeat('0')).take(2))
        .collect();
    if frac.chars().nth(2).is_some_and(|d| d >= '5') {
        carry(&mut digits);
    }

    let split = digits.len() - 2;
    let whole: String = digits[..split].iter().collect();
    let cents: String = digits[split..].iter().collect();
    let rounded: f64 = format!("{}.{}", whole, cents).parse().unwrap_or(0.0);
    // Normalize -0.0
    rounded.copysign(value) + 0.0
}

/// Add one to a run of decimal digits
fn carry(digits: &mut Vec<char>) {
    for d in digits.iter_mut().rev() {
        if *d == '9' {
            *d = '0';
        } else {
            *d = char::from(*d as u8 + 1);
            return;
        }
    }
    digits.insert(0, '1');
}

/// Parse user or legacy text as money. Tolerates `$`, thousands separators
/// and surrounding whitespace; anything else unparseable → 0.
pub fn parse_money(text: &str) -> f64 {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return 0.0;
    }
    cleaned.parse::<f64>().map(to_money).unwrap_or(0.0)
}

/// Coerce an untrusted JSON value to money.
pub fn money_from_value(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().map(to_money).unwrap_or(0.0),
        Value::String(s) => parse_money(s),
        _ => 0.0,
    }
}

/// Sum amounts and normalize the total.
pub fn sum_money<I>(amounts: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    to_money(amounts.into_iter().sum())
}

/// Render as `$` followed by a 2-decimal number, no separators.
pub fn format_money(value: f64) -> String {
    format!("${:.2}", to_money(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_invalid_input_is_zero() {
        assert_eq!(parse_money("abc"), 0.0);
        assert_eq!(to_money(f64::NAN), 0.0);
        assert_eq!(to_money(f64::INFINITY), 0.0);
        assert_eq!(money_from_value(&json!(null)), 0.0);
        assert_eq!(money_from_value(&json!({"amount": 3})), 0.0);
    }

    #[test]
    fn test_rounds_to_cents() {
        assert_eq!(to_money(19.999), 20.0);
        assert_eq!(to_money(1.005), 1.01);
        assert_eq!(to_money(2.344), 2.34);
        assert_eq!(to_money(-1.005), -1.01);
    }

    #[test]
    fn test_carry_across_digits() {
        assert_eq!(to_money(9.995), 10.0);
        assert_eq!(to_money(99.999), 100.0);
        assert_eq!(to_money(0.004), 0.0);
        assert_eq!(to_money(0.005), 0.01);
    }

    #[test]
    fn test_rounding_is_a_fixed_point() {
        let mut inputs = vec![16900466386426.465, 1.005, 2.675, 0.1 + 0.2, 123456789.125];
        for exp in -4..=22 {
            let scale = 10f64.powi(exp);
            for mantissa in [1.0, 1.005, 1.6893714, 2.675, 3.14159, 7.77777, 9.999999] {
                inputs.push(mantissa * scale);
                inputs.push(-mantissa * scale);
            }
        }
        for x in inputs {
            let once = to_money(x);
            assert_eq!(to_money(once), once, "to_money not stable for {}", x);
        }
        assert_eq!(to_money(16900466386426.465), 16900466386426.47);
    }

    #[test]
    fn test_negative_amounts_are_preserved() {
        assert_eq!(to_money(-5.0), -5.0);
        assert_eq!(parse_money("-12.5"), -12.5);
    }

    #[test]
    fn test_no_negative_zero() {
        let v = to_money(-0.001);
        assert_eq!(v, 0.0);
        assert!(v.is_sign_positive());
        assert_eq!(format_money(-0.001), "$0.00");
    }

    #[test]
    fn test_parses_currency_text() {
        assert_eq!(parse_money(" $1,250.50 "), 1250.5);
        assert_eq!(parse_money(""), 0.0);
        assert_eq!(money_from_value(&json!("40")), 40.0);
        assert_eq!(money_from_value(&json!(39.999)), 40.0);
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(500.0), "$500.00");
        assert_eq!(format_money(1234567.891), "$1234567.89");
        assert_eq!(format_money(-40.0), "$-40.00");
    }

    #[test]
    fn test_sum_money() {
        assert_eq!(sum_money([0.1, 0.2]), 0.3);
        assert_eq!(sum_money(Vec::<f64>::new()), 0.0);
    }
}
