//! Ingaz - weekly assessment workbook analyzer
//!
//! This library reads teacher-maintained Excel workbooks, normalizes their
//! positional layout into typed grids, and turns each sheet into per-student
//! assessment records with performance categories and recommendations.
//!
//! # Features
//!
//! - Assessment column location from a fixed positional layout
//! - Permissive due-date parsing (serials, ISO, day/month, Arabic months)
//! - Per-student solved/unsolved aggregation with category assignment
//! - Cross-sheet achievement summaries over a due-date window
//! - HTML report cards and class digests
//!
//! # Example
//!
//! ```no_run
//! use ingaz::config::AnalyzerConfig;
//! use ingaz::core::Analyzer;
//! use ingaz::excel::WorkbookLoader;
//!
//! let workbook = WorkbookLoader::new("grades.xlsx").load()?;
//! let analyzer = Analyzer::new(&AnalyzerConfig::default())?;
//! let analysis = analyzer.analyze_workbook(&workbook);
//!
//! for record in analysis.records() {
//!     println!("{}: {} ({:.1}%)", record.name, record.category, record.solve_pct);
//! }
//! # Ok::<(), ingaz::error::IngazError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod excel;
pub mod report;
pub mod types;

// Re-export commonly used types
pub use config::{
    AnalyzerConfig, CategoryConfig, LayoutConfig, LayoutOverrides, PerformanceThresholds,
};
pub use error::{IngazError, IngazResult};
pub use types::{
    SheetAnalysis, SheetIdentity, SkippedSheet, StudentRecord, Workbook, WorkbookAnalysis,
};
