//! Train command implementation

use crate::cli::logging::log;
use crate::cli::{LogLevel, TrainArgs};
use crate::train::{train_from_csv, TrainConfig};

pub fn run_train(args: TrainArgs, level: LogLevel) -> Result<(), String> {
    log(level, LogLevel::Normal, &format!("Crecer: training from {}", args.data.display()));

    let mut config = match &args.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| format!("Config error: {}: {e}", path.display()))?;
            serde_json::from_str::<TrainConfig>(&content)
                .map_err(|e| format!("Config error: {}: {e}", path.display()))?
        }
        None => TrainConfig::default(),
    };

    // Command-line overrides win over the config file.
    if let Some(trees) = args.trees {
        config.n_trees = trees;
    }
    if let Some(depth) = args.depth {
        config.max_depth = depth;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    log(
        level,
        LogLevel::Verbose,
        &format!("  Trees: {}  Depth: {}  Seed: {}", config.n_trees, config.max_depth, config.seed),
    );

    let outcome = train_from_csv(&args.data, &config).map_err(|e| format!("Training error: {e}"))?;

    log(
        level,
        LogLevel::Verbose,
        &format!(
            "  Rows used: {}  Rows skipped: {}  Features: {}",
            outcome.report.rows_used, outcome.report.rows_skipped, outcome.report.n_features
        ),
    );

    outcome
        .artifact
        .save_to_dir(&args.out_dir)
        .map_err(|e| format!("Artifact error: {e}"))?;

    log(
        level,
        LogLevel::Normal,
        &format!("Artifact pair written to {}", args.out_dir.display()),
    );
    Ok(())
}
