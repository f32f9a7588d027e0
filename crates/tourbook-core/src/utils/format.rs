/// Case-insensitive substring test using Unicode lowercase folding.
///
/// An empty needle matches everything.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Format a price in dong with `.` thousands separators, e.g. `2.500.000 ₫`
pub fn format_price(price: f64) -> String {
    let rounded = price.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    if rounded < 0 {
        format!("-{} ₫", grouped)
    } else {
        format!("{} ₫", grouped)
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
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

/// Format a date string to a more readable format
pub fn format_date(date: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date) {
        dt.format("%d/%m/%Y").to_string()
    } else if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S") {
        dt.format("%d/%m/%Y %H:%M").to_string()
    } else if let Ok(d) = chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        d.format("%d/%m/%Y").to_string()
    } else {
        date.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Đà Lạt Discovery", "lạt"));
        assert!(contains_ignore_case("Đà Lạt Discovery", "LẠT"));
        assert!(contains_ignore_case("Đà Lạt Discovery", "đà"));
        assert!(!contains_ignore_case("Phú Quốc Getaway", "lạt"));
        assert!(contains_ignore_case("anything", ""));
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(2_500_000.0), "2.500.000 ₫");
        assert_eq!(format_price(999.0), "999 ₫");
        assert_eq!(format_price(1000.4), "1.000 ₫");
        assert_eq!(format_price(0.0), "0 ₫");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hạ Long Bay Cruise", 10), "Hạ Long...");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2026-11-02"), "02/11/2026");
        assert_eq!(format_date("2026-11-02T07:30:00"), "02/11/2026 07:30");
        assert_eq!(format_date("soon"), "soon");
    }
}
