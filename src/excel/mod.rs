//! Excel input/output module
//!
//! This module covers both directions of spreadsheet work:
//! - Import: .xlsx/.xlsm/.xls/.ods files → in-memory cell grids
//! - Export: analysis results and summaries → .xlsx workbooks

mod exporter;
mod importer;

pub use exporter::ResultsExporter;
pub use importer::WorkbookLoader;
