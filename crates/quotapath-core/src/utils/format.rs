/// Parse a decimal string from the backend, tolerating surrounding whitespace.
fn parse_decimal(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Insert thousands separators into a string of ASCII digits.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format a decimal amount as US dollars: `"1234.5"` -> `"$1,234.50"`.
/// Unparseable input renders as `"$0.00"`.
pub fn format_currency(value: &str) -> String {
    let amount = parse_decimal(value).unwrap_or(0.0);
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "{}${}.{:02}",
        sign,
        group_thousands(&(cents / 100).to_string()),
        cents % 100
    )
}

/// Format a percentage with one decimal place: `"33.333"` -> `"33.3%"`.
pub fn format_percentage(value: &str) -> String {
    format!("{:.1}%", parse_decimal(value).unwrap_or(0.0))
}

/// Format an RFC 3339 timestamp or `YYYY-MM-DD` date as `"Mar 05, 2024"`.
/// Anything else is returned unchanged.
pub fn format_date(date: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date) {
        dt.format("%b %d, %Y").to_string()
    } else if let Ok(d) = chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        d.format("%b %d, %Y").to_string()
    } else {
        date.to_string()
    }
}

/// Truncate a string to a maximum number of characters, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}
