//! # prompt-curation
//!
//! The evaluation half of a self-correcting synthetic-dataset loop:
//! generate images from weighted prompts, run a detector, compare its boxes
//! against ground truth, and reweight the prompts so that the ones producing
//! more false positives get fewer images in the next iteration.
//!
//! This library provides:
//! - **Box geometry**: normalized label boxes to pixel boxes, and IoU
//! - **Matching**: greedy first-fit matching of detections to ground truth
//! - **Classification**: one outcome category per image, worst defect first
//! - **Prompt statistics**: false-positive counters per prompt across a run
//! - **Weights**: inverse false-positive-rate weights normalized to 1.0
//! - **Evaluation runs**: one pass over an image directory with per-category output
//!
//! ## Quick Start
//!
//! ```rust
//! use prompt_curation::classifier::classify;
//! use prompt_curation::matching::match_boxes;
//! use prompt_curation::types::{BoundingBox, Category};
//!
//! let ground_truth = vec![BoundingBox::new(0, 10, 20, 50, 60)];
//! let detections = vec![BoundingBox::new(0, 12, 22, 48, 58)];
//!
//! let result = match_boxes(&ground_truth, &detections, 0.4);
//! let classification = classify(&result);
//! assert_eq!(classification.category, Category::TruePositive);
//! ```
//!
//! Running a whole directory:
//!
//! ```no_run
//! use prompt_curation::{EvaluationConfig, EvaluationRun};
//!
//! # fn main() -> prompt_curation::Result<()> {
//! let config = EvaluationConfig::new(
//!     "data/test/images",
//!     "data/test/labels",
//!     "data/test/predicted_labels",
//!     "data/test/separation_results",
//! );
//! let mut run = EvaluationRun::new(config)?;
//! let summary = run.process_all_images()?;
//! for (prompt, weight) in summary.weights.iter() {
//!     println!("{prompt}: {weight:.4}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Label format
//!
//! One box per line, `class_id x_center y_center width height`, with
//! coordinates normalized to the image size. Image names follow
//! `<prompt>_<unique id>.jpg`; the prompt part groups the statistics.

pub mod classifier;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod geometry;
pub mod labels;
pub mod logging;
pub mod matching;
pub mod output;
pub mod prompt_stats;
pub mod reporter;
pub mod summary;
pub mod types;
pub mod weights;

// Re-export commonly used types and functions
pub use classifier::classify;
pub use config::{EvaluationConfig, Prompt, PromptConfig};
pub use error::{CurationError, Result};
pub use evaluator::EvaluationRun;
pub use geometry::{calculate_iou, to_pixel_box};
pub use matching::match_boxes;
pub use prompt_stats::{extract_prompt_key, PromptStatsAccumulator};
pub use reporter::{RunReporter, TracingReporter};
pub use summary::RunSummary;
pub use types::{BoundingBox, Category, Classification, MatchResult, NormalizedBox, PromptStats};
pub use weights::{synthesize_weights, WeightDistribution};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_exports_cover_one_image() {
        let gt = [BoundingBox::new(0, 0, 0, 64, 64)];
        let normalized = NormalizedBox::new(0, 0.25, 0.25, 0.5, 0.5);
        let det = [to_pixel_box(&normalized, 128, 128)];
        assert!((calculate_iou(&gt[0], &det[0]) - 1.0).abs() < 1e-12);

        let classification: Classification = classify(&match_boxes(&gt, &det, 0.4));
        assert_eq!(classification.category, Category::TruePositive);

        let mut stats = PromptStatsAccumulator::new();
        let key = extract_prompt_key("desk_1.png").unwrap();
        stats.update(&key, 1, 4);
        let weights: WeightDistribution = synthesize_weights(&stats.all_rates());
        assert_eq!(weights.get("desk"), Some(1.0));
    }
}
