//! Pipeline facade: locate, normalize, aggregate, and categorize one
//! workbook at a time.

use crate::config::{AnalyzerConfig, ResolvedLayout};
use crate::core::aggregate;
use crate::core::categorize::Categorizer;
use crate::core::layout;
use crate::error::IngazResult;
use crate::types::{Sheet, SheetAnalysis, SkippedSheet, Workbook, WorkbookAnalysis};

/// Outcome of analyzing a single sheet. A skip is ordinary data here;
/// callers decide how loudly to surface the warning.
pub enum SheetOutcome {
    Analyzed(SheetAnalysis),
    Skipped(SkippedSheet),
}

/// Runs the full per-sheet pipeline with one fixed configuration.
/// Construction validates the configuration once; analysis itself never
/// fails, it only skips.
pub struct Analyzer {
    layout: ResolvedLayout,
    start_col_letter: String,
    categorizer: Categorizer,
}

impl Analyzer {
    pub fn new(config: &AnalyzerConfig) -> IngazResult<Self> {
        Ok(Self {
            layout: config.layout.resolve()?,
            start_col_letter: config.layout.start_col_letter.to_uppercase(),
            categorizer: Categorizer::new(config.categories.clone())?,
        })
    }

    /// Analyze one sheet: identity from the name, columns from the
    /// locator, records from the aggregator. Zero usable columns means
    /// the sheet is skipped with the standard warning.
    pub fn analyze_sheet(&self, sheet: &Sheet) -> SheetOutcome {
        let identity = layout::parse_sheet_name(&sheet.name);
        let columns = layout::locate_columns(sheet, &self.layout);

        if columns.is_empty() {
            return SheetOutcome::Skipped(SkippedSheet {
                name: sheet.name.clone(),
                warning: format!(
                    "لم أجد أسماء تقييمات في {}1 يميناً في ورقة '{}'.",
                    self.start_col_letter, sheet.name
                ),
            });
        }

        let aggregation = aggregate::aggregate(
            sheet,
            &self.layout,
            &identity,
            &columns,
            &self.categorizer,
        );

        SheetOutcome::Analyzed(SheetAnalysis {
            sheet_name: sheet.name.clone(),
            identity,
            columns,
            records: aggregation.records,
            cells: aggregation.cells,
        })
    }

    /// Analyze every sheet of a workbook. Per-sheet failures are
    /// isolated: a skipped sheet lands in `skipped` and the rest keep
    /// processing.
    pub fn analyze_workbook(&self, workbook: &Workbook) -> WorkbookAnalysis {
        self.analyze_selected(workbook, None)
    }

    /// Analyze only the named sheets (all of them when `names` is
    /// `None`). Requested names missing from the workbook are ignored.
    pub fn analyze_selected(
        &self,
        workbook: &Workbook,
        names: Option<&[String]>,
    ) -> WorkbookAnalysis {
        let mut analysis = WorkbookAnalysis::default();
        for sheet in &workbook.sheets {
            if let Some(wanted) = names {
                if !wanted.iter().any(|n| n == &sheet.name) {
                    continue;
                }
            }
            match self.analyze_sheet(sheet) {
                SheetOutcome::Analyzed(sheet_analysis) => analysis.sheets.push(sheet_analysis),
                SheetOutcome::Skipped(skipped) => analysis.skipped.push(skipped),
            }
        }
        analysis
    }
}
