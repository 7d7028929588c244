//! Display helpers for prices, counts and shares.

/// Format `value` with thousands separators and exactly `decimals` decimal
/// places. Values that round to zero never carry a minus sign.
///
/// ```
/// use stats_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5, 1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let scale = 10_f64.powi(decimals as i32);
    let scaled = value.abs() * scale;
    // Half-ULP nudge so midpoints like 1.005 round up.
    let units = (scaled + scaled * f64::EPSILON).round() as u64;

    let divisor = 10_u64.pow(decimals);
    let whole = group_thousands(units / divisor);
    let sign = if value < 0.0 && units > 0 { "-" } else { "" };

    if decimals == 0 {
        format!("{sign}{whole}")
    } else {
        format!(
            "{sign}{whole}.{:0width$}",
            units % divisor,
            width = decimals as usize
        )
    }
}

/// Format a price in dollars with two decimals.
///
/// ```
/// use stats_core::formatting::format_price;
///
/// assert_eq!(format_price(1234.56), "$1,234.56");
/// assert_eq!(format_price(-9.99), "-$9.99");
/// ```
pub fn format_price(amount: f64) -> String {
    let body = format_number(amount.abs(), 2);
    if amount < 0.0 && body != "0.00" {
        format!("-${body}")
    } else {
        format!("${body}")
    }
}

/// Format a row count with thousands separators.
pub fn format_count(count: u64) -> String {
    group_thousands(count)
}

/// `part` as a percentage of `whole`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero.
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let factor = 10_f64.powi(decimal_places as i32);
    (part / whole * 100.0 * factor).round() / factor
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
