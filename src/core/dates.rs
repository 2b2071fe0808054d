//! Date normalization for due-date cells.
//!
//! Sheets arrive with due dates in every shape the school's tools
//! produce: Excel serial numbers, native date cells, ISO strings, and
//! localized strings like "٠١-مارس". `parse` folds all of them into a
//! `NaiveDate` or `None`; it never panics and never errors.

use crate::types::CellValue;
use chrono::{Datelike, Days, Local, NaiveDate};
use regex::Regex;

/// Formats tried by the permissive fallback, day-before-month wherever
/// the form is ambiguous
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%Y/%m/%d", "%d.%m.%Y"];

/// Arabic month names with the dialectal variants seen in real sheets.
/// Hamza-bearing spellings keep a bare-alif twin so the fold in
/// `month_from_token` can land on an exact entry. Multi-word month names
/// (تشرين الأول and friends) cannot appear here: the day-month pattern
/// only admits a single unbroken token.
const ARABIC_MONTHS: &[(&str, u32)] = &[
    ("يناير", 1),
    ("فبراير", 2),
    ("شباط", 2),
    ("مارس", 3),
    ("آذار", 3),
    ("اذار", 3),
    ("أبريل", 4),
    ("ابريل", 4),
    ("نيسان", 4),
    ("مايو", 5),
    ("أيار", 5),
    ("ايار", 5),
    ("يونيو", 6),
    ("يونيه", 6),
    ("حزيران", 6),
    ("يوليو", 7),
    ("يوليه", 7),
    ("تموز", 7),
    ("أغسطس", 8),
    ("اغسطس", 8),
    ("آب", 8),
    ("اب", 8),
    ("سبتمبر", 9),
    ("أيلول", 9),
    ("ايلول", 9),
    ("أكتوبر", 10),
    ("اكتوبر", 10),
    ("نوفمبر", 11),
    ("ديسمبر", 12),
];

/// Days in the month-name path are clamped here so a sloppy "30-فبراير"
/// still resolves instead of vanishing
const MAX_SAFE_DAY: u32 = 28;

/// Spreadsheet serial epoch. 1899-12-30 rather than -31 absorbs the
/// historical Lotus leap-year bug, so serial 1 is 1899-12-31 and
/// serial 60 (the phantom 1900-02-29) lands on 1900-02-28's successor.
fn serial_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap()
}

/// Normalize a raw cell into a calendar date.
///
/// Resolution order, first success wins:
/// 1. empty and boolean cells → `None`
/// 2. native date/time cells → serial conversion, time of day discarded
/// 3. numeric cells → day-count serial from the 1899-12-30 epoch
/// 4. text cells → `parse_str`
pub fn parse(value: &CellValue) -> Option<NaiveDate> {
    match value {
        CellValue::Empty | CellValue::Bool(_) => None,
        CellValue::DateTime(serial) => serial_to_date(*serial),
        CellValue::Number(n) => serial_to_date(*n),
        CellValue::Text(s) => parse_str(s),
    }
}

/// Normalize a date string.
///
/// Arabic-Indic digits are folded to ASCII first. The `<day><sep><month>`
/// pattern is tried next; it assumes the current calendar year, a known
/// limitation near year boundaries, so callers needing exact years should
/// supply ISO dates. Finally the permissive format list runs, day before
/// month.
pub fn parse_str(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let ascii = normalize_arabic_digits(trimmed);

    if let Some(date) = day_month_with_year(&ascii, Local::now().date_naive().year()) {
        return Some(date);
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&ascii, fmt) {
            return Some(date);
        }
    }
    None
}

/// Convert a day-count serial to a date. Fractional parts (time of day)
/// are floored away; negative or absurd serials yield `None`.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let days = serial.floor();
    if days < 0.0 || days > 2_958_465.0 {
        // 2958465 = 9999-12-31, the last date Excel itself can hold
        return None;
    }
    serial_epoch().checked_add_days(Days::new(days as u64))
}

/// Days since the 1899-12-30 epoch; the inverse of `serial_to_date` on
/// whole serials
pub fn date_to_serial(date: NaiveDate) -> i64 {
    date.signed_duration_since(serial_epoch()).num_days()
}

/// Fold Arabic-Indic digit glyphs (٠–٩) into ASCII 0–9, leaving every
/// other character untouched. Idempotent.
pub fn normalize_arabic_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '٠'..='٩' => {
                let offset = (c as u32) - ('٠' as u32);
                char::from(b'0' + offset as u8)
            }
            c => c,
        })
        .collect()
}

/// `<day><separator><month-token>` with the year supplied by the caller.
/// Day is 1-2 digits, the month token a maximal run of non-digit,
/// non-space characters, the separator one of "-", "/", ".", or spaces.
fn day_month_with_year(text: &str, year: i32) -> Option<NaiveDate> {
    let pattern = Regex::new(r"^(\d{1,2})\s*[-/.\s]\s*([^\s\d]+)$").ok()?;
    let captures = pattern.captures(text)?;
    let day: u32 = captures.get(1)?.as_str().parse().ok()?;
    let month = month_from_token(captures.get(2)?.as_str())?;
    NaiveDate::from_ymd_opt(year, month, day.min(MAX_SAFE_DAY))
}

/// Resolve a month token against the table: exact match first, then a
/// single normalization pass (hamza variants folded to bare alif,
/// tatweel stripped) and one retry.
fn month_from_token(token: &str) -> Option<u32> {
    if let Some(&(_, month)) = ARABIC_MONTHS.iter().find(|(name, _)| *name == token) {
        return Some(month);
    }
    let folded = fold_arabic(token);
    ARABIC_MONTHS
        .iter()
        .find(|(name, _)| *name == folded)
        .map(|&(_, month)| month)
}

/// Hamza fold (أ/إ/آ → ا) and tatweel (ـ) strip
fn fold_arabic(token: &str) -> String {
    token
        .chars()
        .filter(|c| *c != 'ـ')
        .map(|c| match c {
            'أ' | 'إ' | 'آ' => 'ا',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_serial_epoch_conversion() {
        // Serial 1 is 1899-12-31; 45000 is a modern date
        assert_eq!(serial_to_date(1.0), Some(ymd(1899, 12, 31)));
        assert_eq!(serial_to_date(45000.0), Some(ymd(2023, 3, 15)));
    }

    #[test]
    fn test_serial_fraction_floored() {
        assert_eq!(serial_to_date(45000.73), serial_to_date(45000.0));
    }

    #[test]
    fn test_serial_rejects_garbage() {
        assert_eq!(serial_to_date(-5.0), None);
        assert_eq!(serial_to_date(f64::NAN), None);
        assert_eq!(serial_to_date(f64::INFINITY), None);
        assert_eq!(serial_to_date(1e12), None);
    }

    #[test]
    fn test_serial_round_trip() {
        for serial in [1.0, 60.0, 366.0, 44927.0, 45000.9] {
            let date = serial_to_date(serial).unwrap();
            assert_eq!(date_to_serial(date), serial.floor() as i64);
        }
    }

    #[test]
    fn test_arabic_digit_fold() {
        assert_eq!(normalize_arabic_digits("٠١-مارس"), "01-مارس");
        assert_eq!(normalize_arabic_digits("٢٠٢٦/٠٣/٠١"), "2026/03/01");
        assert_eq!(normalize_arabic_digits("abc"), "abc");
    }

    #[test]
    fn test_arabic_digit_fold_idempotent() {
        let once = normalize_arabic_digits("٠١-مارس");
        assert_eq!(normalize_arabic_digits(&once), once);
        let plain = normalize_arabic_digits("01-03-2026");
        assert_eq!(plain, "01-03-2026");
    }

    #[test]
    fn test_day_month_arabic() {
        assert_eq!(day_month_with_year("01-مارس", 2026), Some(ymd(2026, 3, 1)));
        assert_eq!(day_month_with_year("15/يناير", 2026), Some(ymd(2026, 1, 15)));
        assert_eq!(day_month_with_year("7 سبتمبر", 2026), Some(ymd(2026, 9, 7)));
    }

    #[test]
    fn test_day_month_dialectal_variants() {
        // Levantine names resolve to the same months
        assert_eq!(day_month_with_year("10-آذار", 2026), Some(ymd(2026, 3, 10)));
        assert_eq!(day_month_with_year("10-نيسان", 2026), Some(ymd(2026, 4, 10)));
        assert_eq!(day_month_with_year("10-تموز", 2026), Some(ymd(2026, 7, 10)));
    }

    #[test]
    fn test_month_fold_applies_only_after_exact_miss() {
        // Exact spellings hit the table directly
        assert_eq!(month_from_token("أبريل"), Some(4));
        // Unlisted hamza spelling resolves through the fold
        assert_eq!(month_from_token("إبريل"), Some(4));
        // Tatweel-stretched spelling resolves through the fold
        assert_eq!(month_from_token("مـارس"), Some(3));
        assert_eq!(month_from_token("نوتاشهر"), None);
    }

    #[test]
    fn test_day_clamped_to_28() {
        assert_eq!(day_month_with_year("30-فبراير", 2026), Some(ymd(2026, 2, 28)));
        assert_eq!(day_month_with_year("31-مارس", 2026), Some(ymd(2026, 3, 28)));
    }

    #[test]
    fn test_day_month_uses_current_year() {
        let year = Local::now().date_naive().year();
        assert_eq!(parse_str("01-مارس"), Some(ymd(year, 3, 1)));
    }

    #[test]
    fn test_permissive_formats_day_first() {
        assert_eq!(parse_str("2026-03-01"), Some(ymd(2026, 3, 1)));
        // Ambiguous forms read day-before-month
        assert_eq!(parse_str("01-03-2026"), Some(ymd(2026, 3, 1)));
        assert_eq!(parse_str("01/03/2026"), Some(ymd(2026, 3, 1)));
        assert_eq!(parse_str("2026/03/01"), Some(ymd(2026, 3, 1)));
        assert_eq!(parse_str("01.03.2026"), Some(ymd(2026, 3, 1)));
    }

    #[test]
    fn test_arabic_digits_feed_every_path() {
        assert_eq!(parse_str("٢٠٢٦-٠٣-٠١"), Some(ymd(2026, 3, 1)));
    }

    #[test]
    fn test_parse_is_total() {
        assert_eq!(parse(&CellValue::Empty), None);
        assert_eq!(parse(&CellValue::Bool(true)), None);
        assert_eq!(parse(&CellValue::Text("not a date".to_string())), None);
        assert_eq!(parse(&CellValue::Text("   ".to_string())), None);
        assert_eq!(parse(&CellValue::Number(-1.0)), None);
    }

    #[test]
    fn test_parse_native_datetime_drops_time() {
        assert_eq!(parse(&CellValue::DateTime(45000.6)), Some(ymd(2023, 3, 15)));
    }
}
