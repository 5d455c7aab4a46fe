//! Per-prompt false-positive statistics accumulated over one evaluation run.
//!
//! Generated images are named `<prompt>_<unique id>.<ext>`, so every image
//! can be traced back to the prompt that produced it. The accumulator groups
//! detection counts by that prompt key.

use crate::error::{CurationError, Result};
use crate::types::{MatchResult, PromptStats};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Image extensions accepted when recovering a prompt key from a file name.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "webp"];

/// Recover the prompt key from a generated image's file name.
///
/// Strips the extension and the final `_<unique id>` token; everything
/// before it (underscores included) is the key.
///
/// # Errors
///
/// Returns [`CurationError::InvalidFilename`] when the name has no image
/// extension, no `_` separating a unique id, or an empty prompt part.
///
/// # Example
///
/// ```
/// use prompt_curation::prompt_stats::extract_prompt_key;
///
/// let key = extract_prompt_key("a_red_car_on_a_road_4812.jpg").unwrap();
/// assert_eq!(key, "a_red_car_on_a_road");
/// assert!(extract_prompt_key("nounderscore.jpg").is_err());
/// ```
pub fn extract_prompt_key(filename: &str) -> Result<String> {
    let invalid = || CurationError::InvalidFilename(filename.to_string());

    let path = Path::new(filename);
    let has_image_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false);
    if !has_image_extension {
        return Err(invalid());
    }

    let stem = path.file_stem().and_then(|s| s.to_str()).ok_or_else(invalid)?;
    match stem.rsplit_once('_') {
        Some((prompt, _unique_id)) if !prompt.is_empty() => Ok(prompt.to_string()),
        _ => Err(invalid()),
    }
}

/// Running false-positive and detection counters keyed by prompt.
///
/// Counters only ever grow. Keys iterate in sorted order so that rates,
/// weights and reports come out deterministically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptStatsAccumulator {
    stats: BTreeMap<String, PromptStats>,
}

impl PromptStatsAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one image's counts to the prompt's running totals.
    pub fn update(&mut self, prompt_key: &str, false_positives: usize, total_detections: usize) {
        let entry = self.stats.entry(prompt_key.to_string()).or_default();
        entry.false_positives += false_positives;
        entry.total_detections += total_detections;
    }

    /// Extract the prompt key from `filename` and record a match result.
    ///
    /// Returns the key that was updated. Nothing is recorded on error.
    pub fn observe(&mut self, filename: &str, result: &MatchResult) -> Result<String> {
        let key = extract_prompt_key(filename)?;
        self.update(
            &key,
            result.unmatched_detections.len(),
            result.detection_count(),
        );
        Ok(key)
    }

    /// False-positive rate of one prompt, `0.0` if unknown or without detections.
    pub fn false_positive_rate(&self, prompt_key: &str) -> f64 {
        self.stats
            .get(prompt_key)
            .map_or(0.0, PromptStats::false_positive_rate)
    }

    /// False-positive rate of every observed prompt.
    pub fn all_rates(&self) -> BTreeMap<String, f64> {
        self.stats
            .iter()
            .map(|(key, stats)| (key.clone(), stats.false_positive_rate()))
            .collect()
    }

    /// Highest false-positive rate across prompts, `0.0` when nothing was observed.
    pub fn max_false_positive_rate(&self) -> f64 {
        self.stats
            .values()
            .map(PromptStats::false_positive_rate)
            .fold(0.0, f64::max)
    }

    /// Counters of one prompt.
    pub fn stats(&self, prompt_key: &str) -> Option<&PromptStats> {
        self.stats.get(prompt_key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PromptStats)> {
        self.stats.iter()
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Fold another accumulator's counters into this one.
    ///
    /// Addition per prompt is commutative and associative, so accumulators
    /// filled independently can be merged in any order.
    pub fn merge(&mut self, other: &PromptStatsAccumulator) {
        for (key, stats) in &other.stats {
            self.update(key, stats.false_positives, stats.total_detections);
        }
    }
}
