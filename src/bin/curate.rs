use anyhow::{bail, Context, Result};
use clap::Parser;
use prompt_curation::config::DEFAULT_IOU_THRESHOLD;
use prompt_curation::logging::setup_logging;
use prompt_curation::{EvaluationConfig, EvaluationRun, PromptConfig};
use std::path::PathBuf;

/// Evaluate detector labels against ground truth and reweight generation prompts.
#[derive(Parser, Debug)]
#[command(name = "curate", version, about)]
struct Args {
    /// Evaluation config YAML; replaces the individual path flags
    #[arg(long)]
    config: Option<PathBuf>,

    /// Folder with the generated images
    #[arg(long, required_unless_present = "config")]
    images: Option<PathBuf>,

    /// Folder with ground-truth label files
    #[arg(long, required_unless_present = "config")]
    ground_truth: Option<PathBuf>,

    /// Folder with detector label files
    #[arg(long, required_unless_present = "config")]
    detections: Option<PathBuf>,

    /// Root of the per-category output and the run summary
    #[arg(long, required_unless_present = "config")]
    result: Option<PathBuf>,

    /// Minimum IoU for a detection to match a ground-truth box
    #[arg(long, default_value_t = DEFAULT_IOU_THRESHOLD)]
    iou_threshold: f64,

    /// Prompt YAML whose weights are overwritten with the new distribution
    #[arg(long)]
    prompt_config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn evaluation_config(args: &Args) -> Result<EvaluationConfig> {
    if let Some(path) = &args.config {
        return EvaluationConfig::from_yaml_file(path)
            .with_context(|| format!("loading evaluation config {}", path.display()));
    }

    match (&args.images, &args.ground_truth, &args.detections, &args.result) {
        (Some(images), Some(ground_truth), Some(detections), Some(result)) => Ok(
            EvaluationConfig::new(images, ground_truth, detections, result)
                .with_iou_threshold(args.iou_threshold),
        ),
        _ => bail!("--images, --ground-truth, --detections and --result are required without --config"),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(&args.log_level);

    let config = evaluation_config(&args)?;
    tracing::info!(?config, "Evaluation config");

    let result_path = config.result_path.clone();
    let mut run = EvaluationRun::new(config).context("invalid evaluation config")?;
    let summary = run
        .process_all_images()
        .context("evaluating image directory")?;

    summary
        .write_to_dir(&result_path)
        .with_context(|| format!("writing run summary to {}", result_path.display()))?;
    tracing::info!("{}", summary.summary_string());

    if let Some(path) = &args.prompt_config {
        let mut prompts = PromptConfig::load(path)
            .with_context(|| format!("loading prompt config {}", path.display()))?;
        let updated = prompts.apply_weights(&summary.weights);
        prompts
            .save(path)
            .with_context(|| format!("saving prompt config {}", path.display()))?;
        tracing::info!(updated, path = %path.display(), "Updated prompt weights");
    }

    Ok(())
}
