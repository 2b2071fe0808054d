//! Student aggregation: classify every assessment cell and fold each
//! student row into one `StudentRecord`.

use crate::config::ResolvedLayout;
use crate::core::categorize::Categorizer;
use crate::types::{
    AssessmentColumn, CellClassification, CellValue, Sheet, SheetIdentity, StudentRecord,
};

/// Cell values meaning "not applicable", matched after trimming and
/// uppercasing: excused/absent markers, blanks, the dash family, and the
/// NaN/None spellings tools leak into exports
const IGNORED_VALUES: &[&str] = &["I", "AB", "X", "", "-", "–", "—", "NAN", "NONE"];

/// The missing-submission marker
const MISSING_MARKER: &str = "M";

/// Role labels that share the names column with real students: the
/// header row and total rows carry these instead of names
const NAME_SENTINELS: &[&str] = &["الطالب", "الطالبة", "المجموع", "TOTAL"];

/// Classify a raw assessment cell. Total over all values: every cell is
/// exactly one of Ignored / Missing / Solved.
pub fn classify(value: &CellValue) -> CellClassification {
    match value {
        CellValue::Empty => CellClassification::Ignored,
        CellValue::Number(n) if !n.is_finite() => CellClassification::Ignored,
        CellValue::Number(_) | CellValue::DateTime(_) | CellValue::Bool(_) => {
            CellClassification::Solved
        }
        CellValue::Text(s) => {
            let normalized = s.trim().to_uppercase();
            if IGNORED_VALUES.contains(&normalized.as_str()) {
                CellClassification::Ignored
            } else if normalized == MISSING_MARKER {
                CellClassification::Missing
            } else {
                CellClassification::Solved
            }
        }
    }
}

/// The trimmed student name from a names-column cell, or `None` for
/// blanks and sentinel labels
fn student_name(cell: &CellValue) -> Option<String> {
    if cell.is_empty() {
        return None;
    }
    let name = cell.display_text().trim().to_string();
    if name.is_empty() {
        return None;
    }
    let upper = name.to_uppercase();
    if NAME_SENTINELS.iter().any(|sentinel| upper == *sentinel) {
        return None;
    }
    Some(name)
}

/// Indices of the rows holding real students: from the names row down,
/// minus blanks and sentinel-labelled rows
pub fn student_rows(sheet: &Sheet, layout: &ResolvedLayout) -> Vec<usize> {
    (layout.names_row..sheet.row_count())
        .filter(|&row| student_name(sheet.cell(row, layout.names_col)).is_some())
        .collect()
}

/// Records plus the classification matrix (`cells[record][column]`)
/// the date-window summary re-tallies from
pub struct Aggregation {
    pub records: Vec<StudentRecord>,
    pub cells: Vec<Vec<CellClassification>>,
}

/// Aggregate every student row of a sheet against its located columns.
///
/// A student with zero countable cells (all Ignored) produces no record
/// at all. For everyone else `total == solved + remaining` holds by
/// construction, and the categorizer assigns tier and recommendation
/// from the rounded solve percentage.
pub fn aggregate(
    sheet: &Sheet,
    layout: &ResolvedLayout,
    identity: &SheetIdentity,
    columns: &[AssessmentColumn],
    categorizer: &Categorizer,
) -> Aggregation {
    let mut records = Vec::new();
    let mut cells = Vec::new();

    for row in student_rows(sheet, layout) {
        let Some(name) = student_name(sheet.cell(row, layout.names_col)) else {
            continue;
        };

        let mut row_cells = Vec::with_capacity(columns.len());
        let mut solved: u32 = 0;
        let mut missing: u32 = 0;
        let mut unsolved_titles = Vec::new();

        for column in columns {
            let class = classify(sheet.cell(row, column.index));
            row_cells.push(class);
            match class {
                CellClassification::Solved => solved += 1,
                CellClassification::Missing => {
                    missing += 1;
                    unsolved_titles.push(column.name.clone());
                }
                CellClassification::Ignored => {}
            }
        }

        let total = solved + missing;
        if total == 0 {
            continue;
        }

        let solve_pct = round2(100.0 * f64::from(solved) / f64::from(total));
        let (category, recommendation) = categorizer.assign(solve_pct, total, solved);

        records.push(StudentRecord {
            name,
            level: identity.level.clone(),
            section: identity.section.clone(),
            subject: identity.subject.clone(),
            solved,
            total,
            remaining: missing,
            unsolved_titles,
            solve_pct,
            category,
            recommendation,
        });
        cells.push(row_cells);
    }

    Aggregation { records, cells }
}

/// Round to the 2-decimal precision records carry
pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
