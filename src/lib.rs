//! # Crecer
//!
//! Growth-class prediction, per-feature attribution, and investor matching
//! for venture records.
//!
//! Three coupled stages:
//!
//! - **Offline training** ([`train`]): derives three-way growth labels from
//!   the historical growth-rate distribution by quantile binning, fits a
//!   feature transformer and a seeded random forest, fits a tree-path
//!   attribution engine against the forest, and persists everything as an
//!   immutable, versioned artifact pair ([`artifact`]).
//! - **Online inference** ([`predict`]): loads the artifact pair once at
//!   startup and serves `record → class label + top-5 feature attributions`,
//!   read-only and lock-free across concurrent requests.
//! - **Matching** ([`matching`]): filters a venture pool by an investor's
//!   hard constraints and ranks survivors by cosine similarity to an ideal
//!   preference vector.
//!
//! ## Example
//!
//! ```no_run
//! use crecer::predict::Predictor;
//! use crecer::train::{train_from_csv, TrainConfig};
//! use std::path::Path;
//!
//! # fn main() -> crecer::Result<()> {
//! // Offline, once:
//! let outcome = train_from_csv(Path::new("ready_data.csv"), &TrainConfig::default())?;
//! outcome.artifact.save_to_dir(Path::new("model"))?;
//!
//! // At service start:
//! let predictor = Predictor::from_dir(Path::new("model"))?;
//! # Ok(())
//! # }
//! ```

pub mod artifact;
pub mod cli;
pub mod error;
pub mod explain;
pub mod features;
pub mod forest;
pub mod matching;
pub mod predict;
pub mod record;
pub mod train;

pub use error::{CrecerError, Result};
pub use record::{GrowthClass, VentureRecord};
