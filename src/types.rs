//! Core data types for labeled boxes, match results, and outcome categories.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A labeled axis-aligned box in pixel corner format.
///
/// Coordinates are integers truncated from the normalized label format, so
/// they may fall slightly outside the image when a label does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub class_id: u32,
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(class_id: u32, x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            class_id,
            x1,
            y1,
            x2,
            y2,
        }
    }

    /// Width in pixels (negative for inverted boxes).
    pub fn width(&self) -> i64 {
        i64::from(self.x2) - i64::from(self.x1)
    }

    /// Height in pixels (negative for inverted boxes).
    pub fn height(&self) -> i64 {
        i64::from(self.y2) - i64::from(self.y1)
    }

    /// Get the area of the bounding box, zero for degenerate boxes.
    ///
    /// Computed in `f64`: a box spanning the whole `i32` range on both axes
    /// would overflow an `i64` product.
    pub fn area(&self) -> f64 {
        if self.is_valid() {
            self.width() as f64 * self.height() as f64
        } else {
            0.0
        }
    }

    /// Check if the bounding box is valid (positive dimensions).
    pub fn is_valid(&self) -> bool {
        self.width() > 0 && self.height() > 0
    }
}

/// A box in the normalized center format used by label files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedBox {
    pub class_id: u32,
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

impl NormalizedBox {
    /// Create a new normalized box.
    pub fn new(class_id: u32, x_center: f64, y_center: f64, width: f64, height: f64) -> Self {
        Self {
            class_id,
            x_center,
            y_center,
            width,
            height,
        }
    }
}

/// Partition of one image's boxes after matching detections to ground truth.
///
/// Every input box appears in exactly one list, in its original order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Detections that found a ground-truth partner.
    pub matched: Vec<BoundingBox>,
    /// Detections without a partner (false positives).
    pub unmatched_detections: Vec<BoundingBox>,
    /// Ground-truth boxes nobody claimed (false negatives).
    pub unmatched_ground_truth: Vec<BoundingBox>,
}

impl MatchResult {
    /// Total number of detections that went into the match.
    pub fn detection_count(&self) -> usize {
        self.matched.len() + self.unmatched_detections.len()
    }

    /// Total number of ground-truth boxes that went into the match.
    pub fn ground_truth_count(&self) -> usize {
        self.matched.len() + self.unmatched_ground_truth.len()
    }
}

/// Outcome category of one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    TruePositive,
    FalsePositive,
    FalseNegative,
    NoDetections,
}

impl Category {
    /// All categories, in precedence order of the classifier.
    pub const ALL: [Category; 4] = [
        Category::FalsePositive,
        Category::FalseNegative,
        Category::TruePositive,
        Category::NoDetections,
    ];

    /// Stable name, also used as the output directory name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::TruePositive => "true_positive",
            Category::FalsePositive => "false_positive",
            Category::FalseNegative => "false_negative",
            Category::NoDetections => "no_detections",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The category chosen for an image together with the boxes that justify it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub category: Category,
    pub boxes: Vec<BoundingBox>,
}

/// False-positive and detection counters for one prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptStats {
    pub false_positives: usize,
    pub total_detections: usize,
}

impl PromptStats {
    /// `false_positives / total_detections`, or `0.0` without detections.
    pub fn false_positive_rate(&self) -> f64 {
        if self.total_detections > 0 {
            self.false_positives as f64 / self.total_detections as f64
        } else {
            0.0
        }
    }
}
