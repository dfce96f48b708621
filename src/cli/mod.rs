//! CLI module for crecer
//!
//! This module contains all CLI command handlers and utilities.

mod commands;
mod logging;

pub use commands::run_command;
pub use logging::LogLevel;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI arguments.
#[derive(Debug, Parser)]
#[command(
    name = "crecer",
    version,
    about = "Venture growth classification, attribution, and investor matching"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose output with additional details
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Train the classifier and explainer on a historical CSV and persist
    /// the artifact pair
    Train(TrainArgs),
    /// Predict the growth class of one venture record from a JSON file
    Predict(PredictArgs),
    /// Rank a venture pool against an investor preference
    Recommend(RecommendArgs),
}

#[derive(Debug, Args)]
pub struct TrainArgs {
    /// Historical dataset (headered CSV)
    pub data: PathBuf,

    /// Directory to write the artifact pair into
    #[arg(short, long, default_value = "model")]
    pub out_dir: PathBuf,

    /// Optional JSON training config
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the number of trees
    #[arg(long)]
    pub trees: Option<usize>,

    /// Override the maximum tree depth
    #[arg(long)]
    pub depth: Option<usize>,

    /// Override the training seed
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Args)]
pub struct PredictArgs {
    /// Inference request: a JSON object with the recognized feature keys
    pub input: PathBuf,

    /// Directory holding the artifact pair
    #[arg(short, long, default_value = "model")]
    pub model_dir: PathBuf,
}

#[derive(Debug, Args)]
pub struct RecommendArgs {
    /// Venture pool (headered CSV, same columns as training data)
    pub pool: PathBuf,

    /// Investor preference as a JSON file
    pub preference: PathBuf,
}
