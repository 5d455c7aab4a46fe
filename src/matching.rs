//! Matching detections against ground truth for a single image.

use crate::geometry::calculate_iou;
use crate::types::{BoundingBox, MatchResult};

/// Match detections to ground-truth boxes and partition both sets.
///
/// Uses greedy first-fit matching: detections are visited in input order,
/// and each one is paired with the *earliest* unmatched ground-truth box
/// whose IoU reaches `iou_threshold` (`>=`), not the best-overlapping one.
/// Tie-breaking is purely positional, so reordering the label lines can
/// change the outcome. Class ids play no part in the IoU.
///
/// # Arguments
///
/// * `ground_truth` - Ground-truth boxes in label-file order
/// * `detections` - Detector boxes in label-file order
/// * `iou_threshold` - Minimum IoU to consider a match
///
/// # Returns
///
/// A [`MatchResult`] whose three lists keep input order and together hold
/// every input box exactly once.
///
/// # Example
///
/// ```
/// use prompt_curation::matching::match_boxes;
/// use prompt_curation::types::BoundingBox;
///
/// let gt = vec![BoundingBox::new(0, 10, 20, 50, 60)];
/// let det = vec![BoundingBox::new(0, 12, 22, 48, 58), BoundingBox::new(1, 5, 5, 8, 8)];
/// let result = match_boxes(&gt, &det, 0.4);
/// assert_eq!(result.matched, vec![det[0]]);
/// assert_eq!(result.unmatched_detections, vec![det[1]]);
/// assert!(result.unmatched_ground_truth.is_empty());
/// ```
pub fn match_boxes(
    ground_truth: &[BoundingBox],
    detections: &[BoundingBox],
    iou_threshold: f64,
) -> MatchResult {
    let mut gt_matched = vec![false; ground_truth.len()];
    let mut det_matched = vec![false; detections.len()];

    for (det_idx, det) in detections.iter().enumerate() {
        let candidate = ground_truth
            .iter()
            .enumerate()
            .filter(|(gt_idx, _)| !gt_matched[*gt_idx])
            .find(|(_, gt)| calculate_iou(det, gt) >= iou_threshold)
            .map(|(gt_idx, _)| gt_idx);

        if let Some(gt_idx) = candidate {
            gt_matched[gt_idx] = true;
            det_matched[det_idx] = true;
        }
    }

    let mut result = MatchResult::default();
    for (det, matched) in detections.iter().zip(&det_matched) {
        if *matched {
            result.matched.push(*det);
        } else {
            result.unmatched_detections.push(*det);
        }
    }
    result.unmatched_ground_truth = ground_truth
        .iter()
        .zip(&gt_matched)
        .filter(|(_, matched)| !**matched)
        .map(|(gt, _)| *gt)
        .collect();

    result
}
