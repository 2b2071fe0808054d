//! Sheet layout locator.
//!
//! Assessment sheets follow a fixed positional convention: student names
//! down one column, assessment headers along one row, due dates two rows
//! above them, everything configurable but never inferred. This module
//! turns a sheet name plus raw grid into a `SheetIdentity` and the
//! ordered set of usable `AssessmentColumn`s.

use crate::config::ResolvedLayout;
use crate::core::aggregate::{classify, student_rows};
use crate::core::dates;
use crate::types::{AssessmentColumn, CellClassification, Sheet, SheetIdentity};

/// Convert a column letter ("A", "Z", "AA", …) to its 0-indexed
/// position. Case-insensitive; `None` for anything but ASCII letters.
pub fn column_letter_to_index(letters: &str) -> Option<usize> {
    let trimmed = letters.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut index: usize = 0;
    for c in trimmed.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let value = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        index = index * 26 + value;
    }
    Some(index - 1)
}

/// Convert a 0-indexed column position to its letter (0→A, 25→Z, 26→AA)
pub fn column_index_to_letter(index: usize) -> String {
    let mut result = String::new();
    let mut num = index;

    loop {
        let remainder = num % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if num < 26 {
            break;
        }
        num = num / 26 - 1;
    }

    result
}

/// Parse a sheet's display name into subject / level / section.
///
/// The convention is 'المادة المستوى الشعبة': last whitespace token is
/// the section, second-to-last the level, the rest joined is the
/// subject. Two tokens mean no section; a single token is all subject.
pub fn parse_sheet_name(name: &str) -> SheetIdentity {
    let parts: Vec<&str> = name.split_whitespace().collect();
    match parts.len() {
        0 | 1 => SheetIdentity {
            subject: name.trim().to_string(),
            level: String::new(),
            section: String::new(),
        },
        2 => SheetIdentity {
            subject: parts[0].to_string(),
            level: parts[1].to_string(),
            section: String::new(),
        },
        n => SheetIdentity {
            subject: parts[..n - 2].join(" "),
            level: parts[n - 2].to_string(),
            section: parts[n - 1].to_string(),
        },
    }
}

/// True when a header contains any dash-class character. Dashed headers
/// mark cancelled or placeholder assessments and are never counted.
fn has_dash(header: &str) -> bool {
    header.chars().any(|c| matches!(c, '-' | '–' | '—'))
}

/// Locate the assessment columns of a sheet.
///
/// Scans rightward from the configured start column along the names row
/// (which holds the header labels). A header survives when it is
/// non-empty, is not the literal "OVERALL", and carries no dash-class
/// character. The due date is read from the due-date row in the same
/// column; unparseable due dates leave `due_date = None` but keep the
/// column. Finally, a column whose cells are Ignored for every surviving
/// student row is dropped, so a blank assessment can never inflate a
/// student's total.
///
/// An empty result means the sheet has no usable data; the caller
/// decides how to surface that.
pub fn locate_columns(sheet: &Sheet, layout: &ResolvedLayout) -> Vec<AssessmentColumn> {
    let mut columns = Vec::new();

    if layout.names_row >= sheet.row_count() {
        return columns;
    }

    for col in layout.start_col..sheet.col_count() {
        let header_cell = sheet.cell(layout.names_row, col);
        if header_cell.is_empty() {
            continue;
        }
        let header = header_cell.display_text().trim().to_string();
        if header.is_empty() {
            continue;
        }
        if header.eq_ignore_ascii_case("OVERALL") {
            continue;
        }
        if has_dash(&header) {
            continue;
        }

        let due_date = dates::parse(sheet.cell(layout.due_row, col));

        columns.push(AssessmentColumn {
            index: col,
            name: header,
            due_date,
        });
    }

    // A column nobody has a countable cell in is noise, not an assessment
    let rows = student_rows(sheet, layout);
    columns.retain(|column| {
        rows.iter()
            .any(|&row| classify(sheet.cell(row, column.index)) != CellClassification::Ignored)
    });

    columns
}
