//! Number formatting for metric cards, chart labels and tables.

/// Placeholder shown for a metric that is undefined (e.g. the mean of no rows).
pub const NOT_AVAILABLE: &str = "n/a";

/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    let negative = value < 0.0;
    let factor = 10_f64.powi(decimals as i32);
    // Nudge by a relative epsilon so binary midpoints such as 1.005 round up.
    let scaled = value.abs() * factor;
    let rounded = (scaled + f64::EPSILON * scaled).round();

    let integer_part = (rounded / factor).trunc() as u64;
    let mut out = group_thousands(&integer_part.to_string());

    if decimals > 0 {
        let frac_digits = (rounded - integer_part as f64 * factor).round() as u64;
        out.push('.');
        out.push_str(&format!("{:0width$}", frac_digits, width = decimals as usize));
    }

    if negative && rounded != 0.0 {
        format!("-{}", out)
    } else {
        out
    }
}

/// Format a metric that may be absent, using [`NOT_AVAILABLE`] for `None`.
///
/// ```
/// use dashboard_core::formatting::format_metric;
///
/// assert_eq!(format_metric(Some(1.754), 2), "1.75");
/// assert_eq!(format_metric(None, 2), "n/a");
/// ```
pub fn format_metric(value: Option<f64>, decimals: u32) -> String {
    match value {
        Some(v) => format_number(v, decimals),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Short axis label: `950`, `1.2k`, `3.4M`.
///
/// ```
/// use dashboard_core::formatting::format_compact;
///
/// assert_eq!(format_compact(950.0), "950");
/// assert_eq!(format_compact(1_240.0), "1.2k");
/// assert_eq!(format_compact(3_400_000.0), "3.4M");
/// ```
pub fn format_compact(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{:.1}k", value / 1_000.0)
    } else if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    let len = s.len();
    let mut result = String::with_capacity(len + len / 3);
    for (i, c) in s.chars().enumerate() {
        if i != 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}
