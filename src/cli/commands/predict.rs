//! Predict command implementation

use crate::cli::logging::log;
use crate::cli::{LogLevel, PredictArgs};
use crate::predict::Predictor;

pub fn run_predict(args: PredictArgs, level: LogLevel) -> Result<(), String> {
    let predictor =
        Predictor::from_dir(&args.model_dir).map_err(|e| format!("Startup error: {e}"))?;

    let content = std::fs::read_to_string(&args.input)
        .map_err(|e| format!("Input error: {}: {e}", args.input.display()))?;
    let input: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| format!("Input error: {e}"))?;

    let prediction = predictor.predict_json(&input).map_err(|e| format!("Prediction error: {e}"))?;

    log(level, LogLevel::Verbose, &format!("  Class: {}", prediction.class_label()));

    let body = serde_json::to_string_pretty(&prediction)
        .map_err(|e| format!("Serialization error: {e}"))?;
    println!("{body}");
    Ok(())
}
