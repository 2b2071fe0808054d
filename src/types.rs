use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

//==============================================================================
// Raw Workbook Model
//==============================================================================

/// A raw cell value as loaded from a workbook sheet
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Empty cell (also used for unreadable/error cells)
    Empty,
    /// Numeric cell
    Number(f64),
    /// Text cell
    Text(String),
    /// Native date/time cell, carrying the spreadsheet serial value
    DateTime(f64),
    /// Boolean cell
    Bool(bool),
}

const EMPTY_CELL: CellValue = CellValue::Empty;

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Render the cell the way it reads in the sheet (names, headers).
    /// Whole numbers drop the trailing ".0".
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            CellValue::Text(s) => s.clone(),
            CellValue::DateTime(serial) => format!("{}", serial),
            CellValue::Bool(b) => {
                if *b {
                    "TRUE".to_string()
                } else {
                    "FALSE".to_string()
                }
            }
        }
    }
}

/// One named tabular page of a workbook: a dense grid of raw cells,
/// indexed absolutely so that cell (0, 0) is A1 regardless of where the
/// populated range begins.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    grid: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new(name: String, grid: Vec<Vec<CellValue>>) -> Self {
        Self { name, grid }
    }

    /// Cell at (row, col); out-of-range positions read as Empty.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.grid
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Number of rows in the populated grid
    pub fn row_count(&self) -> usize {
        self.grid.len()
    }

    /// Number of columns in the widest populated row
    pub fn col_count(&self) -> usize {
        self.grid.iter().map(|r| r.len()).max().unwrap_or(0)
    }
}

/// An ordered collection of named sheets, immutable once loaded
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

//==============================================================================
// Sheet Layout Types
//==============================================================================

/// Subject / level / section parsed from a sheet's display name
/// (e.g. "التربية الاسلامية 01 6" → subject, level "01", section "6")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetIdentity {
    pub subject: String,
    pub level: String,
    pub section: String,
}

/// One assessment column located in a sheet: header name, 0-indexed
/// column position, and the normalized due date when one could be parsed
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentColumn {
    pub index: usize,
    pub name: String,
    pub due_date: Option<NaiveDate>,
}

/// Inclusive due-date range for the cross-sheet summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// True when `date` falls inside the window, bounds included
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Classification of one student × assessment cell.
/// Mutually exclusive and exhaustive over all raw values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellClassification {
    /// Not applicable; excluded from all counts
    Ignored,
    /// Due but not submitted ("M")
    Missing,
    /// Any other non-ignored value; the score itself is not validated
    Solved,
}

//==============================================================================
// Student Records
//==============================================================================

/// Per-student analysis result for one sheet. Never mutated after
/// construction; `total == solved + remaining` always holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub name: String,
    pub level: String,
    pub section: String,
    pub subject: String,
    pub solved: u32,
    pub total: u32,
    pub remaining: u32,
    pub unsolved_titles: Vec<String>,
    pub solve_pct: f64,
    pub category: String,
    pub recommendation: String,
}

impl StudentRecord {
    /// Comma-joined unsolved assessment names, or "-" when none
    pub fn unsolved_display(&self) -> String {
        if self.unsolved_titles.is_empty() {
            "-".to_string()
        } else {
            self.unsolved_titles.join(", ")
        }
    }
}

//==============================================================================
// Analysis Outcomes
//==============================================================================

/// Full analysis of one usable sheet
#[derive(Debug, Clone)]
pub struct SheetAnalysis {
    pub sheet_name: String,
    pub identity: SheetIdentity,
    pub columns: Vec<AssessmentColumn>,
    pub records: Vec<StudentRecord>,
    /// Classification matrix: `cells[record][column]`, parallel to
    /// `records` × `columns`. Lets the date-window summary re-tally
    /// without touching the raw grid.
    pub cells: Vec<Vec<CellClassification>>,
}

/// A sheet that produced no usable data, with the warning shown for it
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedSheet {
    pub name: String,
    pub warning: String,
}

/// Workbook-level analysis: usable sheets plus skipped ones.
/// Sheet failures are isolated; a skipped sheet never aborts the rest.
#[derive(Debug, Clone, Default)]
pub struct WorkbookAnalysis {
    pub sheets: Vec<SheetAnalysis>,
    pub skipped: Vec<SkippedSheet>,
}

impl WorkbookAnalysis {
    /// All student records across analyzed sheets, in sheet order
    pub fn records(&self) -> impl Iterator<Item = &StudentRecord> {
        self.sheets.iter().flat_map(|s| s.records.iter())
    }

    pub fn record_count(&self) -> usize {
        self.sheets.iter().map(|s| s.records.len()).sum()
    }

    /// True when no sheet yielded any records
    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_display_text() {
        assert_eq!(CellValue::Number(85.0).display_text(), "85");
        assert_eq!(CellValue::Number(7.5).display_text(), "7.5");
        assert_eq!(CellValue::Text("اختبار 1".to_string()).display_text(), "اختبار 1");
        assert_eq!(CellValue::Empty.display_text(), "");
        assert_eq!(CellValue::Bool(true).display_text(), "TRUE");
    }

    #[test]
    fn test_sheet_out_of_range_reads_empty() {
        let sheet = Sheet::new(
            "test".to_string(),
            vec![vec![CellValue::Number(1.0)]],
        );
        assert_eq!(*sheet.cell(0, 0), CellValue::Number(1.0));
        assert_eq!(*sheet.cell(10, 10), CellValue::Empty);
    }

    #[test]
    fn test_unsolved_display_placeholder() {
        let mut record = StudentRecord {
            name: "أحمد".to_string(),
            level: "01".to_string(),
            section: "2".to_string(),
            subject: "رياضيات".to_string(),
            solved: 3,
            total: 3,
            remaining: 0,
            unsolved_titles: vec![],
            solve_pct: 100.0,
            category: "البلاتينية".to_string(),
            recommendation: String::new(),
        };
        assert_eq!(record.unsolved_display(), "-");

        record.unsolved_titles = vec!["اختبار 1".to_string(), "اختبار 2".to_string()];
        assert_eq!(record.unsolved_display(), "اختبار 1, اختبار 2");
    }
}
