//! Writes placeholder model artifacts for local development.
//!
//! ```text
//! create-mock-models [--dir models] [--samples 1000] [--trees 50] [--seed 42]
//! ```
//!
//! The forest is fitted on uniform noise with random labels. Its outputs are
//! meaningless; the artifacts only exercise the loading path.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;

use floodsense_core::constants::{DEFAULT_MODEL_DIR, MODEL_VERSION};
use floodsense_core::logic::features::{default_feature_names, layout_hash, FEATURE_COUNT};
use floodsense_core::logic::model::{
    fit_mock, write_artifacts, ArtifactPaths, ForestParams, MockConfig, ModelInfo,
};

struct Args {
    dir: PathBuf,
    samples: usize,
    trees: usize,
    seed: u64,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        dir: PathBuf::from(DEFAULT_MODEL_DIR),
        samples: 1000,
        trees: 50,
        seed: 42,
    };

    let mut it = std::env::args().skip(1);
    while let Some(flag) = it.next() {
        let value = it.next().with_context(|| format!("missing value for {}", flag))?;
        match flag.as_str() {
            "--dir" => args.dir = PathBuf::from(value),
            "--samples" => args.samples = value.parse().context("--samples expects an integer")?,
            "--trees" => args.trees = value.parse().context("--trees expects an integer")?,
            "--seed" => args.seed = value.parse().context("--seed expects an integer")?,
            other => bail!("unknown argument: {}", other),
        }
    }

    Ok(args)
}

fn main() -> Result<()> {
    let args = parse_args()?;

    let config = MockConfig {
        samples: args.samples,
        forest: ForestParams {
            n_estimators: args.trees,
            ..Default::default()
        },
        seed: args.seed,
    };
    let fit = fit_mock(&config).context("failed to fit mock model")?;

    let info = ModelInfo {
        model_type: "RandomForest".to_string(),
        version: Some(MODEL_VERSION.to_string()),
        training_date: Some(chrono::Utc::now().format("%Y-%m-%d").to_string()),
        feature_count: FEATURE_COUNT,
        layout_hash: Some(layout_hash()),
        metrics: Some(fit.metrics),
    };

    let paths = ArtifactPaths::in_dir(&args.dir);
    write_artifacts(&paths, &fit.forest, &fit.scaler, &default_feature_names(), &info)
        .with_context(|| format!("failed to write artifacts to {}", args.dir.display()))?;

    println!("Mock models created successfully!");
    println!("Training accuracy: {:.4}", fit.metrics.accuracy);
    println!("Files saved to: {}", args.dir.display());
    Ok(())
}
