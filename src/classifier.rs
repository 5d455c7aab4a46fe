//! Assigning one outcome category per image.

use crate::types::{Category, Classification, MatchResult};

/// Classify an image from its match result.
///
/// The first rule that applies wins, so an image is filed under its worst
/// defect:
///
/// 1. any unmatched detection → `false_positive`, payload = unmatched detections
/// 2. any unmatched ground truth → `false_negative`, payload = unmatched ground truth
/// 3. any matched detection → `true_positive`, payload = matched detections
/// 4. otherwise → `no_detections`, empty payload
///
/// # Example
///
/// ```
/// use prompt_curation::classifier::classify;
/// use prompt_curation::types::{BoundingBox, Category, MatchResult};
///
/// let result = MatchResult {
///     matched: vec![BoundingBox::new(0, 0, 0, 10, 10)],
///     unmatched_detections: vec![BoundingBox::new(1, 5, 5, 15, 15)],
///     unmatched_ground_truth: vec![],
/// };
/// let classification = classify(&result);
/// assert_eq!(classification.category, Category::FalsePositive);
/// assert_eq!(classification.boxes, result.unmatched_detections);
/// ```
pub fn classify(result: &MatchResult) -> Classification {
    let (category, boxes) = if !result.unmatched_detections.is_empty() {
        (Category::FalsePositive, &result.unmatched_detections)
    } else if !result.unmatched_ground_truth.is_empty() {
        (Category::FalseNegative, &result.unmatched_ground_truth)
    } else if !result.matched.is_empty() {
        (Category::TruePositive, &result.matched)
    } else {
        return Classification {
            category: Category::NoDetections,
            boxes: Vec::new(),
        };
    };

    Classification {
        category,
        boxes: boxes.clone(),
    }
}
