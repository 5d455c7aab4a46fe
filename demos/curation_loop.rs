//! One turn of the curation loop on a tiny synthetic dataset.

use prompt_curation::logging::setup_logging;
use prompt_curation::{EvaluationConfig, EvaluationRun, Prompt, PromptConfig};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

fn write_sample(root: &Path, name: &str, ground_truth: &str, detections: &str) -> std::io::Result<()> {
    image::RgbImage::new(200, 100)
        .save(root.join("images").join(name))
        .map_err(std::io::Error::other)?;
    let label = name.replace(".png", ".txt");
    fs::write(root.join("labels").join(&label), ground_truth)?;
    fs::write(root.join("predicted_labels").join(&label), detections)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logging("info");
    println!("=== Prompt Curation Example ===\n");

    let dir = tempfile::tempdir()?;
    let root = dir.path();
    for folder in ["images", "labels", "predicted_labels"] {
        fs::create_dir_all(root.join(folder))?;
    }

    let desk = "0 0.5 0.5 0.4 0.4\n";
    let stray = "1 0.1 0.1 0.05 0.05\n";

    // Clean prompt: every detection matches.
    write_sample(root, "a_tidy_desk_1001.png", desk, desk)?;
    write_sample(root, "a_tidy_desk_1002.png", desk, desk)?;
    // Noisy prompt: one spurious box next to every real one.
    write_sample(root, "a_cluttered_office_2001.png", desk, &format!("{desk}{stray}"))?;
    write_sample(root, "a_cluttered_office_2002.png", "", stray)?;

    let config = EvaluationConfig::new(
        root.join("images"),
        root.join("labels"),
        root.join("predicted_labels"),
        root.join("separation_results"),
    );

    println!("1. Evaluating {} images", fs::read_dir(root.join("images"))?.count());
    let mut run = EvaluationRun::new(config)?;
    let summary = run.process_all_images()?;
    println!("   {}", summary.summary_string());
    println!();

    println!("2. False-positive rates");
    for (prompt, rate) in &summary.false_positive_rates {
        println!("   {prompt:<24} {rate:.3}");
    }
    println!();

    println!("3. Weights for the next iteration");
    for (prompt, weight) in summary.weights.iter() {
        println!("   {prompt:<24} {weight:.6}");
    }
    println!();

    println!("4. Images per prompt out of a budget of 20");
    for (prompt, count) in summary.weights.image_counts(20) {
        println!("   {prompt:<24} {count}");
    }
    println!();

    let mut prompts = PromptConfig {
        prompts: vec![
            Prompt { text: "a tidy desk".into(), weight: 1.0 },
            Prompt { text: "a cluttered office".into(), weight: 1.0 },
        ],
        extra: BTreeMap::new(),
    };
    let updated = prompts.apply_weights(&summary.weights);
    println!("5. Updated {updated} prompt(s) in the generation config");
    for prompt in &prompts.prompts {
        println!("   '{}' -> {:.6}", prompt.text, prompt.weight);
    }

    Ok(())
}
