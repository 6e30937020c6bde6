use chrono::{NaiveDate, NaiveDateTime};

pub const CURRENCY_SYMBOL: &str = "$";

fn format_with_commas(value: i64) -> String {
    let is_negative = value < 0;
    let s = value.abs().to_string().chars().rev().collect::<Vec<char>>();
    let mut out = Vec::new();
    for (i, ch) in s.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(*ch);
    }
    let formatted: String = out.into_iter().rev().collect();
    if is_negative {
        format!("-{}", formatted)
    } else {
        formatted
    }
}

fn split_cents(value: f64) -> (bool, i64, i64) {
    let total_cents = (value * 100.0).round() as i64;
    (total_cents < 0, total_cents.abs() / 100, total_cents.abs() % 100)
}

/// Grouped number with at most two decimals, trailing zeros dropped.
pub fn format_number(value: f64) -> String {
    let (negative, whole, cents) = split_cents(value);
    let mut out = format_with_commas(whole);
    if cents > 0 {
        let fraction = format!("{:02}", cents);
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }
    if negative {
        format!("-{}", out)
    } else {
        out
    }
}

/// Grouped number with exactly two decimals.
pub fn format_fixed(value: f64) -> String {
    let (negative, whole, cents) = split_cents(value);
    let sign = if negative { "-" } else { "" };
    format!("{}{}.{:02}", sign, format_with_commas(whole), cents)
}

pub fn format_currency(amount: f64, symbol: &str) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}{}{}", sign, symbol, format_number(amount.abs()))
}

/// `+12.5%`, `-3.0%`, `0.0%`.
pub fn format_change(change: f64) -> String {
    let sign = if change > 0.0 { "+" } else { "" };
    format!("{}{:.1}%", sign, change)
}

pub fn format_day(day: NaiveDate) -> String {
    day.format("%m/%d/%Y").to_string()
}

pub fn format_day_or_na(day: Option<NaiveDate>) -> String {
    day.map(format_day).unwrap_or_else(|| "N/A".to_string())
}

pub fn format_timestamp_day(ts: Option<NaiveDateTime>) -> String {
    format_day_or_na(ts.map(|ts| ts.date()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_with_commas(0), "0");
        assert_eq!(format_with_commas(1234567), "1,234,567");
        assert_eq!(format_with_commas(-1200), "-1,200");
    }

    #[test]
    fn numbers_keep_at_most_two_decimals() {
        assert_eq!(format_number(1200.0), "1,200");
        assert_eq!(format_number(1234.5), "1,234.5");
        assert_eq!(format_number(0.125), "0.13");
        assert_eq!(format_number(-16.67), "-16.67");
    }

    #[test]
    fn fixed_always_shows_cents() {
        assert_eq!(format_fixed(96.0), "96.00");
        assert_eq!(format_fixed(1200.5), "1,200.50");
    }

    #[test]
    fn currency_and_change() {
        assert_eq!(format_currency(1500.25, "$"), "$1,500.25");
        assert_eq!(format_currency(-3.0, "$"), "-$3");
        assert_eq!(format_currency(12.5, "$"), "$12.5");
        assert_eq!(format_change(12.345), "+12.3%");
        assert_eq!(format_change(-4.0), "-4.0%");
        assert_eq!(format_change(0.0), "0.0%");
    }

    #[test]
    fn days_use_us_order() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(format_day(day), "03/07/2024");
        assert_eq!(format_day_or_na(None), "N/A");
    }
}
