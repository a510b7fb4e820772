use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::domain::entities::row::CellValue;

const DATE_TIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

pub fn format_number_with_commas(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let is_zero = fixed.chars().all(|ch| ch == '0' || ch == '.');
    let sign = if value.is_sign_negative() && !is_zero {
        "-"
    } else {
        ""
    };

    match frac_part {
        Some(frac_part) => format!("{sign}{grouped}.{frac_part}"),
        None => format!("{sign}{grouped}"),
    }
}

/// USD with thousands separators and two fraction digits, e.g. `-$1,234.50`.
pub fn format_currency(value: f64) -> String {
    if value.is_nan() {
        return "$NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "$∞" } else { "-$∞" }.to_string();
    }

    let amount = format_number_with_commas(value, 2);
    match amount.strip_prefix('-') {
        Some(unsigned) => format!("-${unsigned}"),
        None => format!("${amount}"),
    }
}

/// Numeric text with optional thousands separators and a leading `$`.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let unsigned = trimmed.strip_prefix('$').unwrap_or(trimmed);
    let cleaned: String = unsigned.chars().filter(|ch| *ch != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Accepts `YYYY-MM-DD`, RFC 3339 and the common `date time` layouts.
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }
    if let Ok(value) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(value.naive_local());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
}

/// en-US short date, `M/D/YYYY`.
pub fn format_short_date(value: &NaiveDateTime) -> String {
    value.format("%-m/%-d/%Y").to_string()
}

pub fn format_date_cell(value: &CellValue) -> String {
    match value {
        CellValue::Null => String::new(),
        CellValue::Date(date) => format_short_date(date),
        CellValue::Text(text) => parse_date(text)
            .map(|date| format_short_date(&date))
            .unwrap_or_else(|| text.clone()),
        other => other.to_plain_string(),
    }
}

pub fn format_currency_cell(value: &CellValue) -> String {
    match value {
        CellValue::Null => String::new(),
        CellValue::Number(number) => format_currency(*number),
        CellValue::Text(text) => parse_number(text)
            .map(format_currency)
            .unwrap_or_else(|| text.clone()),
        other => other.to_plain_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_number_with_commas_handles_decimals() {
        assert_eq!(format_number_with_commas(12345.678, 0), "12,346");
        assert_eq!(format_number_with_commas(12345.678, 2), "12,345.68");
        assert_eq!(format_number_with_commas(-1234.5, 2), "-1,234.50");
        assert_eq!(format_number_with_commas(999.0, 2), "999.00");
        assert_eq!(format_number_with_commas(1_000_000.0, 0), "1,000,000");
    }

    #[test]
    fn format_currency_uses_usd_layout() {
        assert_eq!(format_currency(1234.56), "$1,234.56");
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(-42.5), "-$42.50");
        assert_eq!(format_currency(-0.001), "$0.00");
        assert_eq!(format_currency(85000.0), "$85,000.00");
    }

    #[test]
    fn parse_date_accepts_common_layouts() {
        let expected = NaiveDate::from_ymd_opt(2023, 12, 25)
            .expect("valid date")
            .and_time(NaiveTime::MIN);
        assert_eq!(parse_date("2023-12-25"), Some(expected));
        assert_eq!(parse_date("2023-12-25T00:00:00Z"), Some(expected));
        assert_eq!(parse_date("2023-12-25 00:00:00"), Some(expected));
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("  "), None);
    }

    #[test]
    fn date_cells_fall_back_to_raw_text() {
        assert_eq!(format_date_cell(&CellValue::from("2023-12-25")), "12/25/2023");
        assert_eq!(format_date_cell(&CellValue::from("someday")), "someday");
        assert_eq!(format_date_cell(&CellValue::Null), "");
    }

    #[test]
    fn currency_cells_coerce_numeric_text() {
        assert_eq!(format_currency_cell(&CellValue::from("1234.5")), "$1,234.50");
        assert_eq!(format_currency_cell(&CellValue::from("n/a")), "n/a");
        assert_eq!(format_currency_cell(&CellValue::from("$2,500")), "$2,500.00");
        assert_eq!(format_currency_cell(&CellValue::from(12_i64)), "$12.00");
    }
}
