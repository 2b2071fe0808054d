//! Date-windowed cross-sheet summary.
//!
//! Recomputes achievement rates per (subject, level, section) over the
//! assessment columns whose due date falls inside an inclusive window.
//! Columns without a parsed due date never participate here, though they
//! keep counting in the per-student records.

use crate::core::aggregate::round2;
use crate::types::{CellClassification, DateWindow, SheetAnalysis};
use serde::Serialize;

/// Bucket label for columns whose qualified header names no subject
pub const UNSPECIFIED_SUBJECT: &str = "غير محدد";

/// One (subject, level, section) achievement row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRow {
    pub subject: String,
    pub level: String,
    pub section: String,
    pub solved: u32,
    pub total: u32,
    pub achievement_pct: f64,
}

/// Per-subject rollup of the summary rows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectTotals {
    pub subject: String,
    pub solved: u32,
    pub total: u32,
    pub achievement_pct: f64,
}

/// Cross-sheet summary for one due-date window.
///
/// `rows` empty is the "no data in range" state and is distinct from
/// rows that tally to zero: a window full of unsolved assessments still
/// produces rows, just with 0% achievement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSummary {
    pub window: DateWindow,
    pub rows: Vec<SummaryRow>,
}

impl WindowSummary {
    /// True when no assessment column's due date fell inside the window
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Roll the rows up by subject, in first-encounter order
    pub fn subject_totals(&self) -> Vec<SubjectTotals> {
        let mut totals: Vec<SubjectTotals> = Vec::new();
        for row in &self.rows {
            match totals.iter_mut().find(|t| t.subject == row.subject) {
                Some(entry) => {
                    entry.solved += row.solved;
                    entry.total += row.total;
                }
                None => totals.push(SubjectTotals {
                    subject: row.subject.clone(),
                    solved: row.solved,
                    total: row.total,
                    achievement_pct: 0.0,
                }),
            }
        }
        for entry in &mut totals {
            entry.achievement_pct = achievement(entry.solved, entry.total);
        }
        totals
    }
}

/// Cross-sheet label for a column. Columns from sheets with a parsed
/// subject carry it as a "subject - assessment" prefix; the attribution
/// below reads it back out.
fn qualified_label(sheet_subject: &str, column_name: &str) -> String {
    if sheet_subject.is_empty() {
        column_name.to_string()
    } else {
        format!("{} - {}", sheet_subject, column_name)
    }
}

/// Subject attribution: the text before the " - " separator, or the
/// unspecified bucket when the label carries none
fn column_subject(label: &str) -> &str {
    match label.split_once(" - ") {
        Some((subject, _)) => subject,
        None => UNSPECIFIED_SUBJECT,
    }
}

fn achievement(solved: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        round2(100.0 * f64::from(solved) / f64::from(total))
    }
}

/// Build the windowed summary from analyzed sheets.
///
/// Every in-window column is tallied over the sheet's classification
/// matrix: Solved feeds the numerator, Missing only the denominator,
/// Ignored nothing. Rows are keyed (subject, level, section) in
/// first-encounter order.
pub fn summarize(sheets: &[SheetAnalysis], window: DateWindow) -> WindowSummary {
    let mut rows: Vec<SummaryRow> = Vec::new();

    for sheet in sheets {
        for (col_pos, column) in sheet.columns.iter().enumerate() {
            let Some(due) = column.due_date else {
                continue;
            };
            if !window.contains(due) {
                continue;
            }

            let label = qualified_label(&sheet.identity.subject, &column.name);
            let subject = column_subject(&label).to_string();

            let mut solved: u32 = 0;
            let mut total: u32 = 0;
            for row_cells in &sheet.cells {
                match row_cells[col_pos] {
                    CellClassification::Solved => {
                        solved += 1;
                        total += 1;
                    }
                    CellClassification::Missing => total += 1,
                    CellClassification::Ignored => {}
                }
            }

            let key = (
                subject,
                sheet.identity.level.clone(),
                sheet.identity.section.clone(),
            );
            match rows.iter_mut().find(|r| {
                r.subject == key.0 && r.level == key.1 && r.section == key.2
            }) {
                Some(row) => {
                    row.solved += solved;
                    row.total += total;
                }
                None => rows.push(SummaryRow {
                    subject: key.0,
                    level: key.1,
                    section: key.2,
                    solved,
                    total,
                    achievement_pct: 0.0,
                }),
            }
        }
    }

    for row in &mut rows {
        row.achievement_pct = achievement(row.solved, row.total);
    }

    WindowSummary { window, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AnalyzerConfig, LayoutConfig};
    use crate::core::{Analyzer, SheetOutcome};
    use crate::types::{CellValue, Sheet};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    /// Compact fixture layout: due row 1, names/headers row 2,
    /// assessments from column C
    fn analyzer() -> Analyzer {
        let config = AnalyzerConfig {
            layout: LayoutConfig {
                start_col_letter: "C".to_string(),
                names_row: 2,
                names_col: "A".to_string(),
                due_row: 1,
            },
            ..Default::default()
        };
        Analyzer::new(&config).unwrap()
    }

    fn analyzed(sheet: Sheet) -> SheetAnalysis {
        match analyzer().analyze_sheet(&sheet) {
            SheetOutcome::Analyzed(analysis) => analysis,
            SheetOutcome::Skipped(skipped) => {
                panic!("fixture sheet was skipped: {}", skipped.warning)
            }
        }
    }

    fn march_sheet() -> Sheet {
        // Two columns due in March, one in April, one with no due date
        Sheet::new(
            "رياضيات 01 2".to_string(),
            vec![
                vec![
                    CellValue::Empty,
                    CellValue::Empty,
                    text("2026-03-01"),
                    text("2026-03-15"),
                    text("2026-04-01"),
                    text("بدون"),
                ],
                vec![
                    text("الطالب"),
                    CellValue::Empty,
                    text("ت1"),
                    text("ت2"),
                    text("ت3"),
                    text("ت4"),
                ],
                vec![
                    text("أحمد"),
                    CellValue::Empty,
                    text("85"),
                    text("M"),
                    text("70"),
                    text("60"),
                ],
                vec![
                    text("سارة"),
                    CellValue::Empty,
                    text("90"),
                    text("95"),
                    text("M"),
                    text("I"),
                ],
            ],
        )
    }

    fn march_window() -> DateWindow {
        DateWindow::new(ymd(2026, 3, 1), ymd(2026, 3, 31))
    }

    #[test]
    fn test_window_tallies_only_in_range_columns() {
        let analysis = analyzed(march_sheet());
        let summary = summarize(std::slice::from_ref(&analysis), march_window());

        assert!(!summary.is_empty());
        assert_eq!(summary.rows.len(), 1);
        let row = &summary.rows[0];
        assert_eq!(row.subject, "رياضيات");
        assert_eq!(row.level, "01");
        assert_eq!(row.section, "2");
        // March columns: ت1 (85, 90) and ت2 (M, 95) → 3 solved of 4
        assert_eq!(row.solved, 3);
        assert_eq!(row.total, 4);
        assert_eq!(row.achievement_pct, 75.0);
    }

    #[test]
    fn test_window_bounds_inclusive() {
        let analysis = analyzed(march_sheet());
        // Window collapsing onto the first due date still counts it
        let summary = summarize(
            std::slice::from_ref(&analysis),
            DateWindow::new(ymd(2026, 3, 1), ymd(2026, 3, 1)),
        );
        assert_eq!(summary.rows.len(), 1);
        assert_eq!(summary.rows[0].total, 2);
    }

    #[test]
    fn test_empty_window_is_reportable_not_error() {
        let analysis = analyzed(march_sheet());
        let summary = summarize(
            std::slice::from_ref(&analysis),
            DateWindow::new(ymd(2027, 1, 1), ymd(2027, 12, 31)),
        );
        assert!(summary.is_empty());
        assert!(summary.rows.is_empty());
    }

    #[test]
    fn test_zero_valued_rows_differ_from_no_data() {
        // A window catching only missing submissions produces a real row
        // with 0% achievement, not the empty state
        let sheet = Sheet::new(
            "علوم 02 1".to_string(),
            vec![
                vec![CellValue::Empty, CellValue::Empty, text("2026-03-05")],
                vec![text("الطالب"), CellValue::Empty, text("ت1")],
                vec![text("نور"), CellValue::Empty, text("M")],
            ],
        );
        let analysis = analyzed(sheet);
        let summary = summarize(std::slice::from_ref(&analysis), march_window());

        assert!(!summary.is_empty());
        assert_eq!(summary.rows[0].solved, 0);
        assert_eq!(summary.rows[0].total, 1);
        assert_eq!(summary.rows[0].achievement_pct, 0.0);
    }

    #[test]
    fn test_subjectless_sheet_lands_in_unspecified_bucket() {
        let sheet = Sheet::new(
            "ملخص".to_string(),
            vec![
                vec![CellValue::Empty, CellValue::Empty, text("2026-03-05")],
                vec![text("الطالب"), CellValue::Empty, text("ت1")],
                vec![text("نور"), CellValue::Empty, text("80")],
            ],
        );
        // Single-token sheet names become the subject, so force the
        // subjectless case directly
        let mut analysis = analyzed(sheet);
        analysis.identity.subject = String::new();

        let summary = summarize(std::slice::from_ref(&analysis), march_window());
        assert_eq!(summary.rows[0].subject, UNSPECIFIED_SUBJECT);
    }

    #[test]
    fn test_subject_totals_roll_up_sections() {
        let sheet_a = Sheet::new(
            "رياضيات 01 1".to_string(),
            vec![
                vec![CellValue::Empty, CellValue::Empty, text("2026-03-05")],
                vec![text("الطالب"), CellValue::Empty, text("ت1")],
                vec![text("أحمد"), CellValue::Empty, text("80")],
            ],
        );
        let sheet_b = Sheet::new(
            "رياضيات 01 2".to_string(),
            vec![
                vec![CellValue::Empty, CellValue::Empty, text("2026-03-06")],
                vec![text("الطالب"), CellValue::Empty, text("ت1")],
                vec![text("سارة"), CellValue::Empty, text("M")],
            ],
        );
        let analyses = vec![analyzed(sheet_a), analyzed(sheet_b)];
        let summary = summarize(&analyses, march_window());

        assert_eq!(summary.rows.len(), 2);
        let totals = summary.subject_totals();
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].subject, "رياضيات");
        assert_eq!(totals[0].solved, 1);
        assert_eq!(totals[0].total, 2);
        assert_eq!(totals[0].achievement_pct, 50.0);
    }
}
