//! Display formatting for authored values.
//!
//! Content editors type phone numbers, category slugs and dates however they
//! like. These helpers normalise the common shapes for display and pass
//! everything else through untouched:
//!
//! - `"2184376621"` → `"(218) 437-6621"`
//! - `"city-services"` → `"City Services"`
//! - term `2019-01-01 .. (none)` → `"Term: 2019 - Present"`

use chrono::{DateTime, Datelike, Utc};

/// Format a bare ten-digit phone number as `(XXX) XXX-XXXX`.
///
/// Anything that is not exactly ten ASCII digits is returned as written. A
/// present extension is appended as `ext. <n>` either way.
pub fn format_phone(phone: &str, extension: Option<&str>) -> String {
    let trimmed = phone.trim();
    let base = if trimmed.len() == 10 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        format!("({}) {}-{}", &trimmed[..3], &trimmed[3..6], &trimmed[6..])
    } else {
        phone.to_string()
    };
    match extension.map(str::trim).filter(|e| !e.is_empty()) {
        Some(ext) => format!("{base} ext. {ext}"),
        None => base,
    }
}

/// Turn a category slug into a display label: dashes become spaces and each
/// word is capitalised.
pub fn category_label(category: &str) -> String {
    category
        .split(['-', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `Term: <start year> - <end year>`, with `?` for an unknown start and
/// `Present` for an open end. `None` when neither bound is known.
pub fn term_line(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Option<String> {
    if start.is_none() && end.is_none() {
        return None;
    }
    let start = start.map_or_else(|| "?".to_string(), |d| d.year().to_string());
    let end = end.map_or_else(|| "Present".to_string(), |d| d.year().to_string());
    Some(format!("Term: {start} - {end}"))
}

/// Whether `now` falls inside `[start, end]`; a missing bound is unbounded.
pub fn within_window(
    now: DateTime<Utc>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> bool {
    start.is_none_or(|s| now >= s) && end.is_none_or(|e| now <= e)
}

/// `"1 business"` / `"3 businesses"`.
pub fn business_count(n: usize) -> String {
    if n == 1 {
        "1 business".to_string()
    } else {
        format!("{n} businesses")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn phone_ten_digits_is_formatted() {
        assert_eq!(format_phone("2184376621", None), "(218) 437-6621");
    }

    #[test]
    fn phone_with_extension() {
        assert_eq!(
            format_phone("2184376621", Some("12")),
            "(218) 437-6621 ext. 12"
        );
    }

    #[test]
    fn phone_not_a_number_passes_through() {
        assert_eq!(format_phone("notanumber", None), "notanumber");
    }

    #[test]
    fn phone_already_punctuated_passes_through() {
        assert_eq!(format_phone("218-437-6621", None), "218-437-6621");
        assert_eq!(format_phone("12184376621", None), "12184376621");
    }

    #[test]
    fn phone_blank_extension_is_ignored() {
        assert_eq!(format_phone("2184376621", Some("  ")), "(218) 437-6621");
    }

    #[test]
    fn category_label_capitalises_words() {
        assert_eq!(category_label("city-services"), "City Services");
        assert_eq!(category_label("restaurants"), "Restaurants");
        assert_eq!(category_label("auto-repair-shops"), "Auto Repair Shops");
        assert_eq!(category_label(""), "");
    }

    #[test]
    fn term_line_variants() {
        let start = Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 12, 31, 0, 0, 0).unwrap();
        assert_eq!(
            term_line(Some(start), Some(end)).as_deref(),
            Some("Term: 2019 - 2026")
        );
        assert_eq!(
            term_line(Some(start), None).as_deref(),
            Some("Term: 2019 - Present")
        );
        assert_eq!(term_line(None, Some(end)).as_deref(), Some("Term: ? - 2026"));
        assert_eq!(term_line(None, None), None);
    }

    #[test]
    fn window_bounds_are_inclusive_and_optional() {
        let now = Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap();
        let day = Duration::days(1);
        assert!(within_window(now, None, None));
        assert!(within_window(now, Some(now - day), Some(now + day)));
        assert!(within_window(now, Some(now), Some(now)));
        assert!(!within_window(now, Some(now + day), None));
        assert!(!within_window(now, None, Some(now - day)));
    }

    #[test]
    fn business_count_pluralises() {
        assert_eq!(business_count(1), "1 business");
        assert_eq!(business_count(0), "0 businesses");
        assert_eq!(business_count(4), "4 businesses");
    }
}
