//! Excel exporter - analysis results → .xlsx workbooks

use crate::core::summary::WindowSummary;
use crate::error::{IngazError, IngazResult};
use crate::types::WorkbookAnalysis;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::{Path, PathBuf};

const RECORD_HEADERS: [&str; 11] = [
    "الطالب",
    "المادة",
    "الصف",
    "الشعبة",
    "منجز",
    "إجمالي",
    "متبقي",
    "نسبة الإنجاز",
    "الفئة",
    "التوصية",
    "تقييمات غير منجزة",
];

const SUBJECT_HEADERS: [&str; 4] = ["المادة", "منجز", "إجمالي", "نسبة الإنجاز"];

const ROW_HEADERS: [&str; 6] = [
    "المادة",
    "الصف",
    "الشعبة",
    "منجز",
    "إجمالي",
    "نسبة الإنجاز",
];

/// Writes analysis output as .xlsx workbooks at a fixed path
pub struct ResultsExporter {
    path: PathBuf,
}

impl ResultsExporter {
    /// Create an exporter targeting the given output path
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Export every student record to a single "نتائج الطلاب" worksheet.
    ///
    /// # Returns
    /// Ok when the workbook is saved; records keep their sheet order.
    pub fn export_records(&self, analysis: &WorkbookAnalysis) -> IngazResult<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name("نتائج الطلاب")
            .map_err(|e| IngazError::Export(format!("Failed to set worksheet name: {}", e)))?;
        worksheet.set_right_to_left(true);

        write_header(worksheet, &RECORD_HEADERS)?;

        for (idx, record) in analysis.records().enumerate() {
            let row = (idx + 1) as u32;
            write_text(worksheet, row, 0, &record.name)?;
            write_text(worksheet, row, 1, &record.subject)?;
            write_text(worksheet, row, 2, &record.level)?;
            write_text(worksheet, row, 3, &record.section)?;
            write_count(worksheet, row, 4, record.solved)?;
            write_count(worksheet, row, 5, record.total)?;
            write_count(worksheet, row, 6, record.remaining)?;
            write_pct(worksheet, row, 7, record.solve_pct)?;
            write_text(worksheet, row, 8, &record.category)?;
            write_text(worksheet, row, 9, &record.recommendation)?;
            write_text(worksheet, row, 10, &record.unsolved_display())?;
        }

        workbook
            .save(&self.path)
            .map_err(|e| IngazError::Export(format!("Failed to save Excel file: {}", e)))?;

        Ok(())
    }

    /// Export a date-range summary: one worksheet of per-subject totals
    /// and one of per-(subject, level, section) rows.
    pub fn export_summary(&self, summary: &WindowSummary) -> IngazResult<()> {
        let mut workbook = Workbook::new();

        let subjects = workbook.add_worksheet();
        subjects
            .set_name("ملخص المواد")
            .map_err(|e| IngazError::Export(format!("Failed to set worksheet name: {}", e)))?;
        subjects.set_right_to_left(true);

        write_header(subjects, &SUBJECT_HEADERS)?;
        for (idx, totals) in summary.subject_totals().iter().enumerate() {
            let row = (idx + 1) as u32;
            write_text(subjects, row, 0, &totals.subject)?;
            write_count(subjects, row, 1, totals.solved)?;
            write_count(subjects, row, 2, totals.total)?;
            write_pct(subjects, row, 3, totals.achievement_pct)?;
        }

        let rows = workbook.add_worksheet();
        rows.set_name("ملخص الصفوف والشعب")
            .map_err(|e| IngazError::Export(format!("Failed to set worksheet name: {}", e)))?;
        rows.set_right_to_left(true);

        write_header(rows, &ROW_HEADERS)?;
        for (idx, entry) in summary.rows.iter().enumerate() {
            let row = (idx + 1) as u32;
            write_text(rows, row, 0, &entry.subject)?;
            write_text(rows, row, 1, &entry.level)?;
            write_text(rows, row, 2, &entry.section)?;
            write_count(rows, row, 3, entry.solved)?;
            write_count(rows, row, 4, entry.total)?;
            write_pct(rows, row, 5, entry.achievement_pct)?;
        }

        workbook
            .save(&self.path)
            .map_err(|e| IngazError::Export(format!("Failed to save Excel file: {}", e)))?;

        Ok(())
    }
}

fn write_header(worksheet: &mut Worksheet, headers: &[&str]) -> IngazResult<()> {
    let bold = Format::new().set_bold();
    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .map_err(|e| IngazError::Export(format!("Failed to write header: {}", e)))?;
    }
    Ok(())
}

fn write_text(worksheet: &mut Worksheet, row: u32, col: u16, value: &str) -> IngazResult<()> {
    worksheet
        .write_string(row, col, value)
        .map_err(|e| IngazError::Export(format!("Failed to write text: {}", e)))?;
    Ok(())
}

fn write_count(worksheet: &mut Worksheet, row: u32, col: u16, value: u32) -> IngazResult<()> {
    worksheet
        .write_number(row, col, value as f64)
        .map_err(|e| IngazError::Export(format!("Failed to write number: {}", e)))?;
    Ok(())
}

fn write_pct(worksheet: &mut Worksheet, row: u32, col: u16, value: f64) -> IngazResult<()> {
    let two_decimals = Format::new().set_num_format("0.00");
    worksheet
        .write_number_with_format(row, col, value, &two_decimals)
        .map_err(|e| IngazError::Export(format!("Failed to write percentage: {}", e)))?;
    Ok(())
}
