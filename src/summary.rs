//! Outcome of one evaluation run
//!
//! Collects the per-category image counts, the per-prompt false-positive
//! rates, and the weights handed to the next generation iteration.

use crate::error::Result;
use crate::types::Category;
use crate::weights::WeightDistribution;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// File name of the JSON summary written by [`RunSummary::write_to_dir`].
pub const SUMMARY_FILE: &str = "summary.json";

/// File name of the plain-text maximum false-positive rate.
pub const MAX_FP_RATE_FILE: &str = "max_fp_rate.txt";

/// Summary of an evaluation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Images classified successfully
    pub processed: usize,

    /// Images skipped because of an error
    pub failed: usize,

    /// Images per outcome category
    pub category_counts: BTreeMap<Category, usize>,

    /// False-positive rate per prompt
    pub false_positive_rates: BTreeMap<String, f64>,

    /// Normalized weight per prompt
    pub weights: WeightDistribution,

    /// Highest per-prompt false-positive rate, 0.0 without prompts
    pub max_false_positive_rate: f64,
}

impl RunSummary {
    /// Create an empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one classified image
    pub fn record(&mut self, category: Category) {
        self.processed += 1;
        *self.category_counts.entry(category).or_insert(0) += 1;
    }

    /// Record one skipped image
    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    /// Images classified under `category`
    pub fn count(&self, category: Category) -> usize {
        self.category_counts.get(&category).copied().unwrap_or(0)
    }

    /// Total number of directory entries visited
    pub fn total(&self) -> usize {
        self.processed + self.failed
    }

    /// Write `summary.json` and `max_fp_rate.txt` into `dir`
    pub fn write_to_dir<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let json = serde_json::to_string_pretty(self)?;
        fs::write(dir.join(SUMMARY_FILE), json)?;
        fs::write(
            dir.join(MAX_FP_RATE_FILE),
            format!("{}\n", self.max_false_positive_rate),
        )?;

        Ok(())
    }

    /// Get a formatted string summary
    pub fn summary_string(&self) -> String {
        let counts: Vec<String> = Category::ALL
            .iter()
            .map(|c| format!("{}: {}", c, self.count(*c)))
            .collect();
        format!(
            "RunSummary {{ processed: {}, failed: {}, {}, prompts: {}, max_fp_rate: {:.4} }}",
            self.processed,
            self.failed,
            counts.join(", "),
            self.false_positive_rates.len(),
            self.max_false_positive_rate
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_summary_is_zero() {
        let summary = RunSummary::new();
        assert_eq!(summary.total(), 0);
        assert_eq!(summary.count(Category::TruePositive), 0);
    }

    #[test]
    fn test_record() {
        let mut summary = RunSummary::new();
        summary.record(Category::FalsePositive);
        summary.record(Category::FalsePositive);
        summary.record(Category::NoDetections);
        summary.record_failure();

        assert_eq!(summary.processed, 3);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total(), 4);
        assert_eq!(summary.count(Category::FalsePositive), 2);
        assert_eq!(summary.count(Category::NoDetections), 1);
    }

    #[test]
    fn test_summary_string() {
        let mut summary = RunSummary::new();
        summary.record(Category::TruePositive);
        let text = summary.summary_string();
        assert!(text.contains("processed: 1"));
        assert!(text.contains("true_positive: 1"));
    }

    #[test]
    fn test_write_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut summary = RunSummary::new();
        summary.record(Category::FalseNegative);
        summary.max_false_positive_rate = 0.5;

        summary.write_to_dir(dir.path()).unwrap();

        let max = fs::read_to_string(dir.path().join(MAX_FP_RATE_FILE)).unwrap();
        assert_eq!(max, "0.5\n");

        let json = fs::read_to_string(dir.path().join(SUMMARY_FILE)).unwrap();
        let parsed: RunSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, summary);
        assert!(json.contains("\"false_negative\": 1"));
    }
}
