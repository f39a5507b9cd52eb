//! Canonical rendering of conversion results.

use crate::SIGNIFICANT_DIGITS;

/// Renders `value` with [`SIGNIFICANT_DIGITS`] significant digits and trims
/// trailing zeros (and a dangling decimal point) from the result.
///
/// Magnitudes below `1e-6` or at/above `1e7` use exponential notation
/// (`1.234568e+10`), in which case only the mantissa is trimmed.
#[must_use]
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        return "NaN".into();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.into();
    }
    // -0.0 renders as "0"
    let value = if value == 0.0 { 0.0 } else { value };

    let rendered = to_precision(value, SIGNIFICANT_DIGITS);
    match rendered.split_once('e') {
        Some((mantissa, exponent)) => format!("{}e{exponent}", trim_trailing_zeros(mantissa)),
        None => trim_trailing_zeros(&rendered).to_string(),
    }
}

fn to_precision(value: f64, digits: usize) -> String {
    let digits = digits.max(1);
    let scientific = format!("{:.*e}", digits - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };

    let max_exponent = i32::try_from(digits).unwrap_or(i32::MAX);
    if exponent < -6 || exponent >= max_exponent {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{mantissa}e{sign}{}", exponent.unsigned_abs());
    }

    // exponent is in [-6, digits), so this is in [0, digits + 5]
    let decimals = usize::try_from(max_exponent - 1 - exponent).unwrap_or(0);
    format!("{value:.decimals$}")
}

fn trim_trailing_zeros(rendered: &str) -> &str {
    if !rendered.contains('.') {
        return rendered;
    }
    rendered.trim_end_matches('0').trim_end_matches('.')
}
