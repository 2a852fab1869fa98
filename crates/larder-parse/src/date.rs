use chrono::NaiveDate;

/// Parse a line as a `"26 Jul 2025"`-style calendar date. The month
/// token matches case-insensitively. Anything else — wrong token count,
/// unknown month, out-of-range day — is `None`: "not a date line", not
/// an error.
pub fn extract_date(line: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(line.trim(), "%d %b %Y").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_day_month_year() {
        assert_eq!(extract_date("26 Jul 2025"), Some(date(2025, 7, 26)));
        assert_eq!(extract_date("1 Jan 2024"), Some(date(2024, 1, 1)));
    }

    #[test]
    fn month_is_case_insensitive() {
        for line in ["26 Jul 2025", "26 JUL 2025", "26 jul 2025", "26 jUl 2025"] {
            assert_eq!(extract_date(line), Some(date(2025, 7, 26)), "line: {line}");
        }
    }

    #[test]
    fn surrounding_whitespace_tolerated() {
        assert_eq!(extract_date("  26 Jul 2025  "), Some(date(2025, 7, 26)));
    }

    #[test]
    fn unknown_month_rejected() {
        assert_eq!(extract_date("26 Foo 2025"), None);
    }

    #[test]
    fn out_of_range_day_rejected() {
        assert_eq!(extract_date("32 Jul 2025"), None);
        assert_eq!(extract_date("30 Feb 2025"), None);
    }

    #[test]
    fn wrong_token_count_rejected() {
        assert_eq!(extract_date("26 Jul"), None);
        assert_eq!(extract_date("26 Jul 2025 extra"), None);
        assert_eq!(extract_date(""), None);
    }

    #[test]
    fn record_lines_are_not_dates() {
        assert_eq!(extract_date("หมู 5 กก"), None);
        assert_eq!(extract_date("Jul 26 2025"), None);
    }
}
