//! Turning per-prompt false-positive rates into a sampling distribution.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Floor applied to a rate before inverting it, so a prompt without false
/// positives gets a large but finite weight.
pub const RATE_EPSILON: f64 = 1e-6;

/// Normalized prompt weights for the next generation iteration.
///
/// Values are non-negative and sum to 1.0 whenever the map is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightDistribution {
    weights: BTreeMap<String, f64>,
}

impl WeightDistribution {
    /// Weight of one prompt.
    pub fn get(&self, prompt_key: &str) -> Option<f64> {
        self.weights.get(prompt_key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.weights.iter()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Sum of all weights (1.0 up to rounding, 0.0 when empty).
    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    pub fn into_inner(self) -> BTreeMap<String, f64> {
        self.weights
    }

    /// Number of images to generate per prompt out of a `num_images` budget.
    ///
    /// Every prompt keeps at least one image: `max(1, floor(weight * num_images))`.
    pub fn image_counts(&self, num_images: usize) -> BTreeMap<String, usize> {
        self.weights
            .iter()
            .map(|(key, weight)| {
                let count = (weight * num_images as f64).floor() as usize;
                (key.clone(), count.max(1))
            })
            .collect()
    }
}

/// Build the weight distribution from per-prompt false-positive rates.
///
/// Each prompt's raw weight is `1 / max(rate, RATE_EPSILON)`; raw weights are
/// then divided by their sum. Lower rates therefore get proportionally more
/// weight. An empty input gives an empty distribution.
///
/// # Example
///
/// ```
/// use prompt_curation::weights::synthesize_weights;
/// use std::collections::BTreeMap;
///
/// let rates = BTreeMap::from([
///     ("deskA".to_string(), 1.0 / 3.0),
///     ("deskB".to_string(), 2.0 / 3.0),
/// ]);
/// let weights = synthesize_weights(&rates);
/// assert!((weights.get("deskA").unwrap() - 2.0 / 3.0).abs() < 1e-9);
/// assert!((weights.get("deskB").unwrap() - 1.0 / 3.0).abs() < 1e-9);
/// ```
pub fn synthesize_weights(rates: &BTreeMap<String, f64>) -> WeightDistribution {
    let raw: BTreeMap<String, f64> = rates
        .iter()
        .map(|(key, rate)| {
            // NaN.max(eps) is eps, so a malformed rate behaves like a perfect one
            (key.clone(), 1.0 / rate.max(RATE_EPSILON))
        })
        .collect();

    let total: f64 = raw.values().sum();
    if total <= 0.0 {
        return WeightDistribution::default();
    }

    WeightDistribution {
        weights: raw
            .into_iter()
            .map(|(key, weight)| (key, weight / total))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_empty_rates() {
        let weights = synthesize_weights(&BTreeMap::new());
        assert!(weights.is_empty());
        assert_eq!(weights.total(), 0.0);
    }

    #[test]
    fn test_inverse_proportional() {
        let weights = synthesize_weights(&rates(&[("a", 0.5), ("b", 0.25)]));
        assert!((weights.get("a").unwrap() - 1.0 / 3.0).abs() < 1e-12);
        assert!((weights.get("b").unwrap() - 2.0 / 3.0).abs() < 1e-12);
        assert!((weights.total() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_perfect_prompt_dominates() {
        let weights = synthesize_weights(&rates(&[("clean", 0.0), ("noisy", 1.0)]));
        let clean = weights.get("clean").unwrap();
        let noisy = weights.get("noisy").unwrap();
        assert!(clean > noisy);
        assert!(clean.is_finite());
        assert!((clean - 1e6 / (1e6 + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_single_prompt_gets_everything() {
        let weights = synthesize_weights(&rates(&[("only", 0.3)]));
        assert!((weights.get("only").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_image_counts() {
        let weights = synthesize_weights(&rates(&[("a", 0.5), ("b", 0.25), ("c", 1.0)]));
        // raw 2, 4, 1 -> 2/7, 4/7, 1/7
        let counts = weights.image_counts(10);
        assert_eq!(counts["a"], 2);
        assert_eq!(counts["b"], 5);
        assert_eq!(counts["c"], 1);

        let counts = weights.image_counts(0);
        assert!(counts.values().all(|&c| c == 1));
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let weights = synthesize_weights(&rates(&[("a", 0.5)]));
        let json = serde_json::to_string(&weights).unwrap();
        assert_eq!(json, r#"{"a":1.0}"#);
    }
}
