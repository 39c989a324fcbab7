//! Small pure helpers shared by the services and the report renderer.

/// Rendered in place of a metric when no data exists for it. Distinct from a
/// real zero, which prints as a number.
pub const NO_DATA: &str = "—";

/// Parse numeric text, falling back to `default` on anything malformed.
/// Settings values are stored as text and may contain garbage; dashboards
/// must keep rendering rather than fail.
pub fn safe_f64(raw: &str, default: f64) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(default)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped.chars().rev().collect()
}

/// Format an amount as `$1,234.56`. Non-finite input renders as `$0.00`, the
/// same resilient fallback applied to unparseable stored values.
pub fn currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "$0.00".to_string();
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("${}{}.{}", sign, group_thousands(whole), cents)
}

/// Format with one decimal place and thousands grouping, e.g. `1,234.5`.
pub fn decimal1(value: f64) -> String {
    if !value.is_finite() {
        return "0.0".to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let fixed = format!("{:.1}", value.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "0"));
    format!("{}{}.{}", sign, group_thousands(whole), frac)
}

/// Month key for a year/month pair, e.g. (2026, 3) -> "2026-03".
pub fn month_key(year: i32, month: u32) -> String {
    format!("{}-{:02}", year, month)
}

/// Validate and split a `YYYY-MM` month key.
pub fn parse_month_key(key: &str) -> Option<(i32, u32)> {
    let (year_part, month_part) = key.split_once('-')?;
    if year_part.len() != 4 || month_part.len() != 2 {
        return None;
    }
    let year: i32 = year_part.parse().ok()?;
    let month: u32 = month_part.parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some((year, month))
}

/// Display a count, or the no-data sentinel.
pub fn dash_count(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| NO_DATA.to_string())
}

/// Display a dollar amount, or the no-data sentinel.
pub fn dash_currency(value: Option<f64>) -> String {
    value.map(currency).unwrap_or_else(|| NO_DATA.to_string())
}

/// Display a one-decimal figure, or the no-data sentinel.
pub fn dash_decimal(value: Option<f64>) -> String {
    value.map(decimal1).unwrap_or_else(|| NO_DATA.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_grouping() {
        assert_eq!(currency(0.0), "$0.00");
        assert_eq!(currency(5.0), "$5.00");
        assert_eq!(currency(1234.5), "$1,234.50");
        assert_eq!(currency(1234567.891), "$1,234,567.89");
        assert_eq!(currency(-5.0), "$-5.00");
    }

    #[test]
    fn test_currency_non_finite() {
        assert_eq!(currency(f64::NAN), "$0.00");
        assert_eq!(currency(f64::INFINITY), "$0.00");
    }

    #[test]
    fn test_decimal1() {
        assert_eq!(decimal1(12.44), "12.4");
        assert_eq!(decimal1(1234.56), "1,234.6");
        assert_eq!(decimal1(0.0), "0.0");
    }

    #[test]
    fn test_safe_f64() {
        assert_eq!(safe_f64("50000.0", 0.0), 50000.0);
        assert_eq!(safe_f64("  25 ", 0.0), 25.0);
        assert_eq!(safe_f64("garbage", 0.0), 0.0);
        assert_eq!(safe_f64("", 7.5), 7.5);
    }

    #[test]
    fn test_month_key() {
        assert_eq!(month_key(2026, 3), "2026-03");
        assert_eq!(month_key(2026, 12), "2026-12");
    }

    #[test]
    fn test_parse_month_key() {
        assert_eq!(parse_month_key("2026-03"), Some((2026, 3)));
        assert_eq!(parse_month_key("2024-12"), Some((2024, 12)));
        assert_eq!(parse_month_key("2026-13"), None);
        assert_eq!(parse_month_key("2026-00"), None);
        assert_eq!(parse_month_key("2026-3"), None, "month must be zero-padded");
        assert_eq!(parse_month_key("26-03"), None);
        assert_eq!(parse_month_key("March 2026"), None);
    }

    #[test]
    fn test_dash_sentinels() {
        assert_eq!(dash_count(None), NO_DATA);
        assert_eq!(dash_count(Some(0)), "0", "zero is data, not absence");
        assert_eq!(dash_currency(Some(1500.0)), "$1,500.00");
        assert_eq!(dash_currency(None), NO_DATA);
        assert_eq!(dash_decimal(Some(4.25)), "4.2");
        assert_eq!(dash_decimal(None), NO_DATA);
    }
}
