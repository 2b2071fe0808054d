//! Core analysis engine: layout location, date normalization, student
//! aggregation, categorization, and windowed summaries

pub mod aggregate;
pub mod analyzer;
pub mod categorize;
pub mod dates;
pub mod layout;
pub mod summary;

pub use analyzer::{Analyzer, SheetOutcome};
pub use categorize::Categorizer;
pub use summary::{summarize, SubjectTotals, SummaryRow, WindowSummary};
