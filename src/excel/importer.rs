//! Workbook loader - spreadsheet files → in-memory cell grids

use crate::error::{IngazError, IngazResult};
use crate::types::{CellValue, Sheet, Workbook};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::{Path, PathBuf};

/// Loads every sheet of a spreadsheet file into dense grids.
///
/// Grids are anchored at A1 regardless of where the used range starts,
/// so configured positions address the file the way a user sees it in
/// a spreadsheet application.
pub struct WorkbookLoader {
    path: PathBuf,
}

impl WorkbookLoader {
    /// Create a loader for the given file path
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Load the workbook into memory.
    ///
    /// # Returns
    /// All sheets in file order. A sheet whose cell range cannot be
    /// read is loaded empty instead of failing the whole file; only an
    /// unreadable file itself is an error.
    pub fn load(&self) -> IngazResult<Workbook> {
        let mut workbook = open_workbook_auto(&self.path).map_err(|e| {
            IngazError::Workbook(format!("{}: {}", self.path.display(), e))
        })?;

        let sheet_names = workbook.sheet_names().to_vec();
        let mut sheets = Vec::with_capacity(sheet_names.len());

        for name in sheet_names {
            let grid = match workbook.worksheet_range(&name) {
                Ok(range) => grid_from_range(&range),
                Err(_) => Vec::new(),
            };
            sheets.push(Sheet::new(name, grid));
        }

        Ok(Workbook::new(sheets))
    }
}

/// Densify a worksheet range into an A1-anchored grid. Positions before
/// the used range read as empty cells.
fn grid_from_range(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let Some((end_row, end_col)) = range.end() else {
        return Vec::new();
    };

    let mut grid = Vec::with_capacity(end_row as usize + 1);
    for row in 0..=end_row {
        let mut cells = Vec::with_capacity(end_col as usize + 1);
        for col in 0..=end_col {
            let cell = range
                .get_value((row, col))
                .map(convert_cell)
                .unwrap_or(CellValue::Empty);
            cells.push(cell);
        }
        grid.push(cells);
    }
    grid
}

/// Map one spreadsheet cell onto the crate's value model. Date-formatted
/// cells keep their serial value; ISO date and duration strings stay
/// textual; error cells read as empty.
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) => CellValue::Empty,
    }
}
