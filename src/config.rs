//! Analyzer configuration: positional layout conventions, the category
//! table, and the unified performance thresholds.
//!
//! Everything here has working defaults matching the school's standard
//! export layout; a YAML profile (`--config`) overrides any subset of it.

use crate::core::layout::column_letter_to_index;
use crate::error::{IngazError, IngazResult};
use crate::types::DateWindow;
use serde::{Deserialize, Serialize};
use std::path::Path;

//==============================================================================
// Positional Layout
//==============================================================================

/// Fixed positional layout of an assessment sheet, 1-indexed as users see
/// it in a spreadsheet UI.
///
/// `names_row` is the label row: it holds "الطالب" in the names column and
/// the assessment headers from `start_col_letter` rightward. Student rows
/// begin at that same row; the label row itself is dropped by the
/// sentinel-name filter during aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Column letter where assessment headers begin (default "H")
    pub start_col_letter: String,
    /// 1-indexed row of student names and assessment headers (default 5)
    pub names_row: u32,
    /// Column letter of student names (default "A")
    pub names_col: String,
    /// 1-indexed row of due dates (default 3)
    pub due_row: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            start_col_letter: "H".to_string(),
            names_row: 5,
            names_col: "A".to_string(),
            due_row: 3,
        }
    }
}

/// Layout converted to 0-indexed grid positions, ready for the locator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedLayout {
    pub start_col: usize,
    pub names_row: usize,
    pub names_col: usize,
    pub due_row: usize,
}

/// Layout positions given as individual CLI flags. A set field wins over
/// the profile value for that position; unset fields leave it alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutOverrides {
    pub start_col_letter: Option<String>,
    pub names_row: Option<u32>,
    pub names_col: Option<String>,
    pub due_row: Option<u32>,
}

impl LayoutOverrides {
    pub fn apply(&self, layout: &mut LayoutConfig) {
        if let Some(letter) = &self.start_col_letter {
            layout.start_col_letter = letter.clone();
        }
        if let Some(row) = self.names_row {
            layout.names_row = row;
        }
        if let Some(letter) = &self.names_col {
            layout.names_col = letter.clone();
        }
        if let Some(row) = self.due_row {
            layout.due_row = row;
        }
    }
}

impl LayoutConfig {
    /// Validate the configured positions and convert them to 0-indexed
    /// grid coordinates.
    pub fn resolve(&self) -> IngazResult<ResolvedLayout> {
        let start_col = column_letter_to_index(&self.start_col_letter).ok_or_else(|| {
            IngazError::Config(format!(
                "invalid start column letter '{}'",
                self.start_col_letter
            ))
        })?;
        let names_col = column_letter_to_index(&self.names_col).ok_or_else(|| {
            IngazError::Config(format!("invalid names column letter '{}'", self.names_col))
        })?;
        if self.names_row == 0 {
            return Err(IngazError::Config("names_row is 1-indexed".to_string()));
        }
        if self.due_row == 0 {
            return Err(IngazError::Config("due_row is 1-indexed".to_string()));
        }
        Ok(ResolvedLayout {
            start_col,
            names_row: (self.names_row - 1) as usize,
            names_col,
            due_row: (self.due_row - 1) as usize,
        })
    }
}

//==============================================================================
// Category Table
//==============================================================================

/// Message used instead of the tier recommendation when a student solved
/// nothing at all
pub const ZERO_SOLVED_MESSAGE: &str =
    "لم يتم حل التقييمات الأسبوعية، حاول وستجد الرحلة ممتعة";

/// One performance tier: name, entry threshold, recommendation text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBand {
    pub name: String,
    pub threshold: f64,
    pub recommendation: String,
}

/// Ordered tier table plus the zero-solved override message. Passed into
/// the Categorizer at construction; callers needing different tiers
/// supply their own table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    pub bands: Vec<CategoryBand>,
    pub zero_solved_message: String,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        let bands = [
            ("البلاتينية", 90.0, "أشكرك يا بطل على تميزك"),
            (
                "الذهبي",
                80.0,
                "أداء جيد جدًا، حل جميع التقييمات حتى تصعد إلى الفئة البلاتينية، أنت قدّها",
            ),
            (
                "الفضي",
                70.0,
                "أداء جيد، حل جميع التقييمات حتى تصعد إلى الفئة البلاتينية",
            ),
            (
                "البرونزي",
                60.0,
                "لديك الكثير من التقييمات لم يتم حلها لكن ما زال هناك وقت للوصول إلى الفئة البلاتينية",
            ),
            (
                "تحتاج إلى تحسين",
                0.0,
                "اجتهد أكثر، هناك فرصة للوصول إلى الفئة البلاتينية",
            ),
        ];
        Self {
            bands: bands
                .iter()
                .map(|(name, threshold, recommendation)| CategoryBand {
                    name: (*name).to_string(),
                    threshold: *threshold,
                    recommendation: (*recommendation).to_string(),
                })
                .collect(),
            zero_solved_message: ZERO_SOLVED_MESSAGE.to_string(),
        }
    }
}

impl CategoryConfig {
    pub fn validate(&self) -> IngazResult<()> {
        if self.bands.is_empty() {
            return Err(IngazError::Config(
                "category table must have at least one tier".to_string(),
            ));
        }
        for band in &self.bands {
            if !(0.0..=100.0).contains(&band.threshold) {
                return Err(IngazError::Config(format!(
                    "tier '{}' threshold {} is outside [0, 100]",
                    band.name, band.threshold
                )));
            }
        }
        let mut thresholds: Vec<f64> = self.bands.iter().map(|b| b.threshold).collect();
        thresholds.sort_by(|a, b| a.total_cmp(b));
        for pair in thresholds.windows(2) {
            if pair[0] == pair[1] {
                return Err(IngazError::Config(format!(
                    "duplicate tier threshold {}",
                    pair[0]
                )));
            }
        }
        Ok(())
    }
}

//==============================================================================
// Performance Thresholds
//==============================================================================

/// Band cutoffs shared by every consumer (digest generator, summary
/// display). One value injected everywhere, so aggregation and reporting
/// can never disagree about where "at risk" begins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceThresholds {
    /// Solve rate at or above this is "متميز" (default 90)
    pub excellent: f64,
    /// Solve rate below this is inactive (default 70)
    pub performance: f64,
    /// Solve rate below this is critical (default 50)
    pub critical: f64,
}

impl Default for PerformanceThresholds {
    fn default() -> Self {
        Self {
            excellent: 90.0,
            performance: 70.0,
            critical: 50.0,
        }
    }
}

impl PerformanceThresholds {
    pub fn validate(&self) -> IngazResult<()> {
        if !(self.critical < self.performance && self.performance < self.excellent) {
            return Err(IngazError::Config(format!(
                "thresholds must satisfy critical < performance < excellent (got {} / {} / {})",
                self.critical, self.performance, self.excellent
            )));
        }
        if self.critical < 0.0 || self.excellent > 100.0 {
            return Err(IngazError::Config(
                "thresholds must lie inside [0, 100]".to_string(),
            ));
        }
        Ok(())
    }
}

//==============================================================================
// Profile
//==============================================================================

/// Full analyzer configuration. Every field has a default; a YAML profile
/// may override any subset of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub layout: LayoutConfig,
    pub categories: CategoryConfig,
    pub thresholds: PerformanceThresholds,
    /// Optional due-date window for the cross-sheet summary
    pub date_range: Option<DateWindow>,
}

impl AnalyzerConfig {
    pub fn validate(&self) -> IngazResult<()> {
        self.layout.resolve()?;
        self.categories.validate()?;
        self.thresholds.validate()?;
        if let Some(window) = &self.date_range {
            if window.start > window.end {
                return Err(IngazError::Config(format!(
                    "date range start {} is after end {}",
                    window.start, window.end
                )));
            }
        }
        Ok(())
    }
}

/// Load an analyzer profile from a YAML file.
///
/// Unset keys keep their defaults, so a profile can be as small as:
///
/// ```yaml
/// layout:
///   start_col_letter: "J"
/// ```
///
/// # Arguments
/// * `path` - Path to the profile YAML file
///
/// # Returns
/// * `Ok(AnalyzerConfig)` - Validated configuration
/// * `Err(IngazError)` - IO, YAML, or validation failure
pub fn load_profile(path: &Path) -> IngazResult<AnalyzerConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AnalyzerConfig = serde_yaml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_resolves_to_documented_positions() {
        let resolved = LayoutConfig::default().resolve().unwrap();
        assert_eq!(resolved.start_col, 7); // H
        assert_eq!(resolved.names_row, 4); // row 5
        assert_eq!(resolved.names_col, 0); // A
        assert_eq!(resolved.due_row, 2); // row 3
    }

    #[test]
    fn test_invalid_column_letter_rejected() {
        let layout = LayoutConfig {
            start_col_letter: "5".to_string(),
            ..Default::default()
        };
        assert!(layout.resolve().is_err());
    }

    #[test]
    fn test_one_indexed_rows_rejected_at_zero() {
        let layout = LayoutConfig {
            names_row: 0,
            ..Default::default()
        };
        assert!(layout.resolve().is_err());
    }

    #[test]
    fn test_overrides_win_over_profile_values() {
        let mut layout = LayoutConfig {
            start_col_letter: "J".to_string(),
            names_row: 7,
            ..Default::default()
        };
        let overrides = LayoutOverrides {
            start_col_letter: Some("C".to_string()),
            due_row: Some(1),
            ..Default::default()
        };
        overrides.apply(&mut layout);
        assert_eq!(layout.start_col_letter, "C");
        assert_eq!(layout.due_row, 1);
        // Unset override fields keep the profile values
        assert_eq!(layout.names_row, 7);
        assert_eq!(layout.names_col, "A");
    }

    #[test]
    fn test_default_category_table_ordering() {
        let config = CategoryConfig::default();
        config.validate().unwrap();
        assert_eq!(config.bands.len(), 5);
        assert_eq!(config.bands[0].name, "البلاتينية");
        assert_eq!(config.bands[4].threshold, 0.0);
    }

    #[test]
    fn test_duplicate_thresholds_rejected() {
        let mut config = CategoryConfig::default();
        config.bands[1].threshold = 90.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_threshold_ordering_enforced() {
        let thresholds = PerformanceThresholds {
            excellent: 50.0,
            performance: 70.0,
            critical: 90.0,
        };
        assert!(thresholds.validate().is_err());
        assert!(PerformanceThresholds::default().validate().is_ok());
    }

    #[test]
    fn test_partial_profile_parses_with_defaults() {
        let yaml = "layout:\n  start_col_letter: \"J\"\n";
        let config: AnalyzerConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.layout.start_col_letter, "J");
        assert_eq!(config.layout.names_row, 5);
        assert_eq!(config.categories.bands.len(), 5);
        assert_eq!(config.thresholds.performance, 70.0);
        assert!(config.date_range.is_none());
    }

    #[test]
    fn test_date_range_profile_key() {
        let yaml = "date_range:\n  start: 2026-03-01\n  end: 2026-03-31\n";
        let config: AnalyzerConfig = serde_yaml::from_str(yaml).unwrap();
        let window = config.date_range.unwrap();
        assert_eq!(window.start.to_string(), "2026-03-01");
        assert!(config.validate().is_ok());
    }
}
