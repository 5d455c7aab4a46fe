//! YAML configuration: evaluation paths and the generation prompt file.

use crate::error::{CurationError, Result};
use crate::weights::WeightDistribution;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default IoU threshold for matching detections to ground truth.
pub const DEFAULT_IOU_THRESHOLD: f64 = 0.4;

/// Maximum length of a prompt-derived file stem.
pub const MAX_PROMPT_STEM_LEN: usize = 75;

fn default_iou_threshold() -> f64 {
    DEFAULT_IOU_THRESHOLD
}

fn default_weight() -> f64 {
    1.0
}

/// Where one evaluation run reads its inputs and writes its categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    pub images_folder: PathBuf,
    pub ground_truth_labels_folder: PathBuf,
    pub model_detect_labels_folder: PathBuf,
    pub result_path: PathBuf,
    #[serde(default = "default_iou_threshold")]
    pub iou_threshold: f64,
}

impl EvaluationConfig {
    pub fn new(
        images_folder: impl Into<PathBuf>,
        ground_truth_labels_folder: impl Into<PathBuf>,
        model_detect_labels_folder: impl Into<PathBuf>,
        result_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            images_folder: images_folder.into(),
            ground_truth_labels_folder: ground_truth_labels_folder.into(),
            model_detect_labels_folder: model_detect_labels_folder.into(),
            result_path: result_path.into(),
            iou_threshold: DEFAULT_IOU_THRESHOLD,
        }
    }

    pub fn with_iou_threshold(mut self, iou_threshold: f64) -> Self {
        self.iou_threshold = iou_threshold;
        self
    }

    /// Load and validate a configuration from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Parse and validate a configuration from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: EvaluationConfig = serde_yml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject thresholds outside `[0.0, 1.0]`.
    pub fn validate(&self) -> Result<()> {
        if !self.iou_threshold.is_finite() || !(0.0..=1.0).contains(&self.iou_threshold) {
            return Err(CurationError::InvalidThreshold(format!(
                "IoU threshold must be between 0.0 and 1.0, got {}",
                self.iou_threshold
            )));
        }
        Ok(())
    }
}

/// One generation prompt and its sampling weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    pub text: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

/// The prompt file consumed by the image generator.
///
/// Only `prompts` is interpreted; every other top-level key (classes,
/// generator settings, ...) is carried through load and save untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptConfig {
    #[serde(default)]
    pub prompts: Vec<Prompt>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yml::Value>,
}

impl PromptConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_yml::from_str(&text)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, serde_yml::to_string(self)?)?;
        Ok(())
    }

    /// Prompts with weights divided by their sum.
    ///
    /// # Errors
    ///
    /// Returns [`CurationError::InvalidConfig`] when a weight is negative or
    /// not finite, or when the weights sum to zero.
    pub fn normalized(&self) -> Result<Vec<Prompt>> {
        if let Some(bad) = self
            .prompts
            .iter()
            .find(|p| !p.weight.is_finite() || p.weight < 0.0)
        {
            return Err(CurationError::InvalidConfig(format!(
                "prompt '{}' has invalid weight {}",
                bad.text, bad.weight
            )));
        }

        let total: f64 = self.prompts.iter().map(|p| p.weight).sum();
        if total <= 0.0 {
            return Err(CurationError::InvalidConfig(
                "prompt weights must sum to a positive value".to_string(),
            ));
        }

        Ok(self
            .prompts
            .iter()
            .map(|p| Prompt {
                text: p.text.clone(),
                weight: p.weight / total,
            })
            .collect())
    }

    /// Overwrite prompt weights from a synthesized distribution.
    ///
    /// A prompt matches a key either by its exact text or by the file stem
    /// the generator derives from it. Prompts without a match keep their
    /// weight. Returns the number of prompts updated.
    pub fn apply_weights(&mut self, weights: &WeightDistribution) -> usize {
        let mut updated = 0;
        for prompt in &mut self.prompts {
            let weight = weights
                .get(&prompt.text)
                .or_else(|| weights.get(&prompt_file_stem(&prompt.text)));
            if let Some(weight) = weight {
                prompt.weight = weight;
                updated += 1;
            }
        }
        updated
    }
}

/// File stem the generator uses for images of a prompt.
///
/// Characters that are unsafe in file names, spaces included, become `_`,
/// and the result is cut to [`MAX_PROMPT_STEM_LEN`] characters.
pub fn prompt_file_stem(text: &str) -> String {
    const INVALID: [char; 11] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*', ',', ' '];
    text.chars()
        .map(|c| if INVALID.contains(&c) { '_' } else { c })
        .take(MAX_PROMPT_STEM_LEN)
        .collect()
}
