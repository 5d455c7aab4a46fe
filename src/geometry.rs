//! Box geometry: label-format conversions and Intersection over Union (IoU).

use crate::types::{BoundingBox, NormalizedBox};

/// Convert a normalized center-format box into pixel corner coordinates.
///
/// Each corner is truncated toward zero, never rounded, so the result
/// matches the integer boxes the label format produces.
///
/// # Example
///
/// ```
/// use prompt_curation::geometry::to_pixel_box;
/// use prompt_curation::types::NormalizedBox;
///
/// let normalized = NormalizedBox::new(0, 0.5, 0.5, 0.5, 0.5);
/// let bbox = to_pixel_box(&normalized, 100, 80);
/// assert_eq!((bbox.x1, bbox.y1, bbox.x2, bbox.y2), (25, 20, 75, 60));
/// ```
pub fn to_pixel_box(normalized: &NormalizedBox, width: u32, height: u32) -> BoundingBox {
    let (w, h) = (f64::from(width), f64::from(height));
    let half_w = normalized.width / 2.0;
    let half_h = normalized.height / 2.0;

    BoundingBox::new(
        normalized.class_id,
        ((normalized.x_center - half_w) * w) as i32,
        ((normalized.y_center - half_h) * h) as i32,
        ((normalized.x_center + half_w) * w) as i32,
        ((normalized.y_center + half_h) * h) as i32,
    )
}

/// Convert a pixel corner-format box back into the normalized label format.
///
/// A zero image dimension yields zeros on that axis instead of infinities.
pub fn to_normalized_box(bbox: &BoundingBox, width: u32, height: u32) -> NormalizedBox {
    let scale = |value: f64, extent: u32| {
        if extent == 0 {
            0.0
        } else {
            value / f64::from(extent)
        }
    };

    let x1 = f64::from(bbox.x1);
    let y1 = f64::from(bbox.y1);
    let x2 = f64::from(bbox.x2);
    let y2 = f64::from(bbox.y2);

    NormalizedBox::new(
        bbox.class_id,
        scale((x1 + x2) / 2.0, width),
        scale((y1 + y2) / 2.0, height),
        scale(x2 - x1, width),
        scale(y2 - y1, height),
    )
}

/// Calculate the Intersection over Union (IoU) between two boxes.
///
/// Only the box edges take part; class ids are ignored. Boxes that merely
/// touch, do not overlap, or have no area give exactly `0.0`.
///
/// # Example
///
/// ```
/// use prompt_curation::geometry::calculate_iou;
/// use prompt_curation::types::BoundingBox;
///
/// let a = BoundingBox::new(0, 0, 0, 10, 10);
/// let b = BoundingBox::new(1, 5, 5, 15, 15);
/// let iou = calculate_iou(&a, &b);
/// assert!((iou - 25.0 / 175.0).abs() < 1e-12);
/// ```
pub fn calculate_iou(bbox1: &BoundingBox, bbox2: &BoundingBox) -> f64 {
    let x_left = bbox1.x1.max(bbox2.x1);
    let y_top = bbox1.y1.max(bbox2.y1);
    let x_right = bbox1.x2.min(bbox2.x2);
    let y_bottom = bbox1.y2.min(bbox2.y2);

    if x_left >= x_right || y_top >= y_bottom {
        return 0.0;
    }

    let intersection_area =
        (f64::from(x_right) - f64::from(x_left)) * (f64::from(y_bottom) - f64::from(y_top));
    let union_area = bbox1.area() + bbox2.area() - intersection_area;

    if union_area <= 0.0 {
        return 0.0;
    }

    (intersection_area / union_area).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_boxes() {
        let bbox = BoundingBox::new(0, 10, 20, 50, 60);
        assert!((calculate_iou(&bbox, &bbox) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_overlap() {
        let a = BoundingBox::new(0, 0, 0, 10, 10);
        let b = BoundingBox::new(0, 20, 20, 30, 30);
        assert_eq!(calculate_iou(&a, &b), 0.0);
    }

    #[test]
    fn test_touching_edges() {
        let a = BoundingBox::new(0, 0, 0, 10, 10);
        let b = BoundingBox::new(0, 10, 0, 20, 10);
        assert_eq!(calculate_iou(&a, &b), 0.0);
    }

    #[test]
    fn test_class_ignored() {
        let a = BoundingBox::new(0, 10, 20, 50, 60);
        let b = BoundingBox::new(7, 10, 20, 50, 60);
        assert!((calculate_iou(&a, &b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_box() {
        let flat = BoundingBox::new(0, 10, 10, 10, 50);
        let other = BoundingBox::new(0, 0, 0, 50, 50);
        assert_eq!(calculate_iou(&flat, &other), 0.0);
        assert_eq!(calculate_iou(&flat, &flat), 0.0);

        let inverted = BoundingBox::new(0, 50, 50, 10, 10);
        assert_eq!(calculate_iou(&inverted, &other), 0.0);
    }

    #[test]
    fn test_scenario_overlap() {
        // 36x36 inside 40x40: 1296 / 1600
        let gt = BoundingBox::new(0, 10, 20, 50, 60);
        let det = BoundingBox::new(0, 12, 22, 48, 58);
        assert!((calculate_iou(&gt, &det) - 0.81).abs() < 1e-12);
    }

    #[test]
    fn test_extreme_boxes_stay_in_range() {
        let huge = BoundingBox::new(0, i32::MIN, i32::MIN, i32::MAX, i32::MAX);
        let small = BoundingBox::new(0, 0, 0, 10, 10);
        assert!((calculate_iou(&huge, &huge) - 1.0).abs() < 1e-12);
        let iou = calculate_iou(&huge, &small);
        assert!(iou > 0.0 && iou < 1e-12);
    }

    #[test]
    fn test_to_pixel_box_truncates() {
        let normalized = NormalizedBox::new(3, 0.3333, 0.5, 0.2, 0.25);
        let bbox = to_pixel_box(&normalized, 640, 480);
        // (0.3333 - 0.1) * 640 = 149.312, (0.3333 + 0.1) * 640 = 277.312
        assert_eq!(bbox, BoundingBox::new(3, 149, 180, 277, 300));
    }

    #[test]
    fn test_to_pixel_box_truncates_toward_zero() {
        let normalized = NormalizedBox::new(0, 0.0, 0.0, 0.1, 0.1);
        let bbox = to_pixel_box(&normalized, 100, 100);
        // -5.0 stays -5, and -0.5 must become 0 rather than -1
        assert_eq!(bbox.x1, -5);
        let edge = NormalizedBox::new(0, 0.045, 0.045, 0.1, 0.1);
        assert_eq!(to_pixel_box(&edge, 100, 100).x1, 0);
    }

    #[test]
    fn test_to_normalized_box() {
        let bbox = BoundingBox::new(1, 25, 20, 75, 60);
        let normalized = to_normalized_box(&bbox, 100, 80);
        assert_eq!(normalized.class_id, 1);
        assert!((normalized.x_center - 0.5).abs() < 1e-12);
        assert!((normalized.y_center - 0.5).abs() < 1e-12);
        assert!((normalized.width - 0.5).abs() < 1e-12);
        assert!((normalized.height - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_to_normalized_box_zero_extent() {
        let bbox = BoundingBox::new(0, 1, 1, 3, 3);
        let normalized = to_normalized_box(&bbox, 0, 0);
        assert_eq!(normalized.x_center, 0.0);
        assert_eq!(normalized.width, 0.0);
    }
}
