//! Text patterns for reporting periods and causal lags

use super::metadata::ReportingPeriod;
use regex_lite::Regex;
use std::sync::LazyLock;

static QUARTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Q([1-4])\s*(\d{2,4})").expect("quarter pattern is valid")
});

static LAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+)[\s-]*(day|week|month|quarter|year)s?\b").expect("lag pattern is valid")
});

/// Quarter (1 - 4) containing the given month (1 - 12)
pub fn quarter_of_month(month: u32) -> u8 {
    (((month.clamp(1, 12) - 1) / 3) + 1) as u8
}

/// Find a `Q<n> <year>` mention such as "Q3 2024" or "Q1 25".
///
/// Two-digit years are read as 20xx.
pub fn extract_reporting_period(text: &str) -> Option<ReportingPeriod> {
    let caps = QUARTER.captures(text)?;
    let quarter: u8 = caps.get(1)?.as_str().parse().ok()?;
    let digits = caps.get(2)?.as_str();
    let year: i32 = digits.parse().ok()?;
    let year = if digits.len() == 2 { 2000 + year } else { year };
    Some(ReportingPeriod { quarter, year })
}

/// Day count of the first lag phrase ("2 quarters", "6-month", ...).
///
/// Units are calendar-naive: week=7, month=30, quarter=90, year=365.
pub fn extract_lag_days(text: &str) -> Option<u32> {
    let caps = LAG.captures(text)?;
    let amount: u32 = caps.get(1)?.as_str().parse().ok()?;
    let unit_days = match caps.get(2)?.as_str().to_ascii_lowercase().as_str() {
        "day" => 1,
        "week" => 7,
        "month" => 30,
        "quarter" => 90,
        "year" => 365,
        _ => return None,
    };
    Some(amount.saturating_mul(unit_days))
}
