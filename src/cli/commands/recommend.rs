//! Recommend command implementation

use crate::cli::logging::log;
use crate::cli::{LogLevel, RecommendArgs};
use crate::matching::{recommend, Preference};
use crate::train::load_csv;

pub fn run_recommend(args: RecommendArgs, level: LogLevel) -> Result<(), String> {
    let dataset = load_csv(&args.pool).map_err(|e| format!("Pool error: {e}"))?;
    log(
        level,
        LogLevel::Verbose,
        &format!("  Pool: {} records ({} skipped)", dataset.records.len(), dataset.skipped_rows),
    );

    let content = std::fs::read_to_string(&args.preference)
        .map_err(|e| format!("Preference error: {}: {e}", args.preference.display()))?;
    let preference: Preference =
        serde_json::from_str(&content).map_err(|e| format!("Preference error: {e}"))?;

    let ranked =
        recommend(&dataset.records, &preference).map_err(|e| format!("Matching error: {e}"))?;

    log(level, LogLevel::Verbose, &format!("  Matches: {}", ranked.len()));

    let body =
        serde_json::to_string_pretty(&ranked).map_err(|e| format!("Serialization error: {e}"))?;
    println!("{body}");
    Ok(())
}
