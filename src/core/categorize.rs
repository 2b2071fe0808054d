//! Performance tiers: ordered threshold bands over the solve percentage.

use crate::config::{CategoryBand, CategoryConfig};
use crate::error::IngazResult;

/// Assigns tiers from an injected `CategoryConfig`. The table is sorted
/// highest-threshold-first at construction and validated once, so
/// `categorize` is total afterwards.
pub struct Categorizer {
    bands: Vec<CategoryBand>,
    zero_solved_message: String,
}

impl Categorizer {
    pub fn new(config: CategoryConfig) -> IngazResult<Self> {
        config.validate()?;
        let mut bands = config.bands;
        bands.sort_by(|a, b| b.threshold.total_cmp(&a.threshold));
        Ok(Self {
            bands,
            zero_solved_message: config.zero_solved_message,
        })
    }

    /// The band a solve percentage falls in: the first (highest)
    /// threshold it meets or exceeds. The lowest band is the match of
    /// last resort even when its threshold is above the percentage, so
    /// every input gets a tier.
    pub fn categorize(&self, solve_pct: f64) -> &CategoryBand {
        for band in &self.bands {
            if solve_pct >= band.threshold {
                return band;
            }
        }
        &self.bands[self.bands.len() - 1]
    }

    /// Tier and recommendation for one student. A student who solved
    /// nothing (but had assessments due) keeps the tier label their 0%
    /// selects, yet gets the zero-solved message instead of the tier
    /// recommendation.
    pub fn assign(&self, solve_pct: f64, total: u32, solved: u32) -> (String, String) {
        let band = self.categorize(solve_pct);
        let recommendation = if total > 0 && solved == 0 {
            self.zero_solved_message.clone()
        } else {
            band.recommendation.clone()
        };
        (band.name.clone(), recommendation)
    }
}
