//! Reporting hooks for an evaluation run.
//!
//! The run never logs through ambient state; it calls a [`RunReporter`] at
//! fixed points. [`TracingReporter`] turns those calls into `tracing` events.

use crate::error::CurationError;
use crate::summary::RunSummary;
use crate::types::Category;
use crate::weights::WeightDistribution;
use std::path::Path;

/// Which side of an image a label file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSource {
    GroundTruth,
    Detections,
}

impl LabelSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelSource::GroundTruth => "ground truth",
            LabelSource::Detections => "detection",
        }
    }
}

/// Receiver of evaluation-run events.
///
/// All methods have empty default bodies so implementors pick what they need.
pub trait RunReporter {
    /// A label file was missing and treated as empty.
    fn missing_labels(&mut self, _image_file: &str, _source: LabelSource, _path: &Path) {}

    /// An image was classified (and persisted when its payload is non-empty).
    fn image_processed(&mut self, _image_file: &str, _category: Category, _written: bool) {}

    /// An image failed and was skipped; the run continues.
    fn image_skipped(&mut self, _image_file: &str, _error: &CurationError) {}

    /// The image was processed but its counts were kept out of the prompt statistics.
    fn stats_skipped(&mut self, _image_file: &str, _error: &CurationError) {}

    /// Every image of the directory has been visited.
    fn run_completed(&mut self, _summary: &RunSummary) {}

    /// Prompt weights were synthesized from the run's statistics.
    fn weights_computed(&mut self, _weights: &WeightDistribution) {}
}

/// Default reporter emitting `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl RunReporter for TracingReporter {
    fn missing_labels(&mut self, image_file: &str, source: LabelSource, path: &Path) {
        tracing::warn!(
            image = image_file,
            path = %path.display(),
            "No {} labels for image",
            source.as_str()
        );
    }

    fn image_processed(&mut self, image_file: &str, category: Category, written: bool) {
        tracing::info!(image = image_file, %category, written, "Processed image");
    }

    fn image_skipped(&mut self, image_file: &str, error: &CurationError) {
        tracing::error!(image = image_file, %error, "Error processing image");
    }

    fn stats_skipped(&mut self, image_file: &str, error: &CurationError) {
        tracing::warn!(image = image_file, %error, "Image excluded from prompt statistics");
    }

    fn run_completed(&mut self, summary: &RunSummary) {
        tracing::info!(
            processed = summary.processed,
            failed = summary.failed,
            prompts = summary.false_positive_rates.len(),
            max_fp_rate = summary.max_false_positive_rate,
            "Label evaluation completed"
        );
    }

    fn weights_computed(&mut self, weights: &WeightDistribution) {
        for (prompt, weight) in weights.iter() {
            tracing::debug!(prompt = prompt.as_str(), weight, "Prompt weight");
        }
        tracing::info!(prompts = weights.len(), "Computed prompt weights");
    }
}

/// Reporter that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl RunReporter for SilentReporter {}

impl<R: RunReporter + ?Sized> RunReporter for &mut R {
    fn missing_labels(&mut self, image_file: &str, source: LabelSource, path: &Path) {
        (**self).missing_labels(image_file, source, path)
    }

    fn image_processed(&mut self, image_file: &str, category: Category, written: bool) {
        (**self).image_processed(image_file, category, written)
    }

    fn image_skipped(&mut self, image_file: &str, error: &CurationError) {
        (**self).image_skipped(image_file, error)
    }

    fn stats_skipped(&mut self, image_file: &str, error: &CurationError) {
        (**self).stats_skipped(image_file, error)
    }

    fn run_completed(&mut self, summary: &RunSummary) {
        (**self).run_completed(summary)
    }

    fn weights_computed(&mut self, weights: &WeightDistribution) {
        (**self).weights_computed(weights)
    }
}
