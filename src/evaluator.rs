//! Evaluation run orchestrator: one pass over a directory of generated images.

use crate::classifier::classify;
use crate::config::EvaluationConfig;
use crate::error::{CurationError, Result};
use crate::labels::{label_file_name, load_labels};
use crate::matching::match_boxes;
use crate::output::CategoryWriter;
use crate::prompt_stats::PromptStatsAccumulator;
use crate::reporter::{LabelSource, RunReporter, TracingReporter};
use crate::summary::RunSummary;
use crate::types::{BoundingBox, Classification};
use crate::weights::{synthesize_weights, WeightDistribution};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Drives matching, classification, persistence and prompt statistics for
/// every image of one directory.
///
/// The run owns its [`PromptStatsAccumulator`]; statistics accumulate across
/// calls, so one `EvaluationRun` corresponds to one evaluation pass.
pub struct EvaluationRun<R: RunReporter = TracingReporter> {
    config: EvaluationConfig,
    writer: CategoryWriter,
    stats: PromptStatsAccumulator,
    reporter: R,
}

impl EvaluationRun<TracingReporter> {
    /// Create a run that reports through `tracing`.
    pub fn new(config: EvaluationConfig) -> Result<Self> {
        Self::with_reporter(config, TracingReporter)
    }
}

impl<R: RunReporter> EvaluationRun<R> {
    /// Create a run with an explicit reporter.
    ///
    /// # Errors
    ///
    /// Returns [`CurationError::InvalidThreshold`] for an IoU threshold
    /// outside `[0.0, 1.0]`.
    pub fn with_reporter(config: EvaluationConfig, reporter: R) -> Result<Self> {
        config.validate()?;
        let writer = CategoryWriter::new(&config.result_path);
        Ok(Self {
            config,
            writer,
            stats: PromptStatsAccumulator::new(),
            reporter,
        })
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Prompt statistics accumulated so far.
    pub fn stats(&self) -> &PromptStatsAccumulator {
        &self.stats
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn into_reporter(self) -> R {
        self.reporter
    }

    /// Evaluate one image of the images folder.
    ///
    /// Missing label files count as empty box sets. A file name that does not
    /// carry a prompt key only keeps the image out of the prompt statistics;
    /// the image is still classified and persisted.
    ///
    /// # Errors
    ///
    /// Fails when the image cannot be decoded, a label line is malformed, or
    /// the category output cannot be written.
    pub fn process_single_image(&mut self, image_file: &str) -> Result<Classification> {
        let image_path = self.config.images_folder.join(image_file);
        let (width, height) =
            image::image_dimensions(&image_path).map_err(|source| CurationError::UnreadableImage {
                path: image_path.clone(),
                source,
            })?;

        let ground_truth = self.load_boxes(image_file, LabelSource::GroundTruth, width, height)?;
        let detections = self.load_boxes(image_file, LabelSource::Detections, width, height)?;

        let result = match_boxes(&ground_truth, &detections, self.config.iou_threshold);
        let classification = classify(&result);

        if let Err(error) = self.stats.observe(image_file, &result) {
            self.reporter.stats_skipped(image_file, &error);
        }

        let written = self.writer.save(
            classification.category,
            &image_path,
            image_file,
            &classification.boxes,
            width,
            height,
        )?;
        self.reporter
            .image_processed(image_file, classification.category, written);

        Ok(classification)
    }

    /// Evaluate every file of the images folder, in file-name order.
    ///
    /// Per-image failures are reported and counted, never propagated.
    ///
    /// # Errors
    ///
    /// Fails only when the images folder itself cannot be listed. An entry
    /// that cannot be read is reported under the folder's path and counted as
    /// a failure.
    pub fn process_all_images(&mut self) -> Result<RunSummary> {
        let listing = fs::read_dir(&self.config.images_folder)?.map(|entry| {
            let entry = entry?;
            let is_dir = entry.file_type()?.is_dir();
            Ok::<_, io::Error>((entry.file_name(), is_dir))
        });
        let (mut image_files, unreadable) = partition_entries(listing);
        image_files.sort();

        let mut summary = RunSummary::new();
        let folder = self.config.images_folder.display().to_string();
        for error in unreadable {
            self.reporter
                .image_skipped(&folder, &CurationError::IoError(error));
            summary.record_failure();
        }

        for file_name in image_files {
            let Some(image_file) = file_name.to_str() else {
                let error = CurationError::InvalidFilename(file_name.to_string_lossy().into_owned());
                self.reporter
                    .image_skipped(&file_name.to_string_lossy(), &error);
                summary.record_failure();
                continue;
            };

            match self.process_single_image(image_file) {
                Ok(classification) => summary.record(classification.category),
                Err(error) => {
                    self.reporter.image_skipped(image_file, &error);
                    summary.record_failure();
                }
            }
        }

        summary.false_positive_rates = self.false_positive_rates();
        summary.max_false_positive_rate = self.stats.max_false_positive_rate();
        summary.weights = self.prompt_weights();
        self.reporter.run_completed(&summary);

        Ok(summary)
    }

    /// False-positive rate per prompt observed so far.
    pub fn false_positive_rates(&self) -> BTreeMap<String, f64> {
        self.stats.all_rates()
    }

    /// Weights for the next generation iteration.
    pub fn prompt_weights(&mut self) -> WeightDistribution {
        let weights = synthesize_weights(&self.stats.all_rates());
        self.reporter.weights_computed(&weights);
        weights
    }

    fn label_path(&self, image_file: &str, source: LabelSource) -> PathBuf {
        let folder = match source {
            LabelSource::GroundTruth => &self.config.ground_truth_labels_folder,
            LabelSource::Detections => &self.config.model_detect_labels_folder,
        };
        folder.join(label_file_name(image_file))
    }

    fn load_boxes(
        &mut self,
        image_file: &str,
        source: LabelSource,
        width: u32,
        height: u32,
    ) -> Result<Vec<BoundingBox>> {
        let path = self.label_path(image_file, source);
        match load_labels(&path, width, height)? {
            Some(boxes) => Ok(boxes),
            None => {
                self.reporter.missing_labels(image_file, source, &path);
                Ok(Vec::new())
            }
        }
    }
}

/// Split a directory listing into file names and unreadable entries.
/// Directories are dropped.
fn partition_entries<I>(entries: I) -> (Vec<OsString>, Vec<io::Error>)
where
    I: IntoIterator<Item = io::Result<(OsString, bool)>>,
{
    let mut files = Vec::new();
    let mut errors = Vec::new();
    for entry in entries {
        match entry {
            Ok((_, true)) => {}
            Ok((name, false)) => files.push(name),
            Err(error) => errors.push(error),
        }
    }
    (files, errors)
}
