//! Training Orchestrator: offline batch fitting of the artifact pair.
//!
//! Pipeline: drop rows with unusable growth rates → derive the three-way
//! class label by equal-count quantile binning → fit the feature transformer
//! and classifier → fit the attribution engine against the fitted
//! classifier. The caller persists the result via `ModelArtifact::save_to_dir`,
//! which replaces old artifacts only after the new ones are fully written.
//!
//! Class boundaries are data-dependent: retraining on a different historical
//! distribution changes which raw growth rates map to which class. That is a
//! property of the model, not an absolute scale.

mod dataset;

pub use dataset::{load_csv, Dataset};

use crate::artifact::ModelArtifact;
use crate::explain::TreeExplainer;
use crate::features::FeatureTransformer;
use crate::forest::{ForestConfig, RandomForest};
use crate::record::{GrowthClass, VentureRecord};
use crate::{CrecerError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Training hyperparameters. Defaults mirror the reference run
/// (100 estimators, seed 42); a JSON config file or CLI flags can override
/// them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        let forest = ForestConfig::default();
        Self {
            n_trees: forest.n_trees,
            max_depth: forest.max_depth,
            min_samples_split: forest.min_samples_split,
            seed: forest.seed,
        }
    }
}

impl TrainConfig {
    fn forest(&self) -> ForestConfig {
        ForestConfig {
            n_trees: self.n_trees,
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            seed: self.seed,
        }
    }
}

/// What a training run used and dropped.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TrainReport {
    /// Rows that carried a usable growth rate and were fitted on.
    pub rows_used: usize,
    /// Rows dropped for a missing or non-finite growth rate.
    pub rows_skipped: usize,
    /// Feature-vector width after one-hot expansion.
    pub n_features: usize,
}

/// A completed training run.
#[derive(Debug, Clone)]
pub struct TrainOutcome {
    pub artifact: ModelArtifact,
    pub report: TrainReport,
}

/// Fit the artifact pair on historical records. Rows without a usable growth
/// rate are skipped, not fatal; too few usable rows to form three class bins
/// is an error.
pub fn train(records: &[VentureRecord], config: &TrainConfig) -> Result<TrainOutcome> {
    if records.is_empty() {
        return Err(CrecerError::EmptyDataset);
    }

    let usable: Vec<VentureRecord> = records
        .iter()
        .filter(|r| r.growth_rate_cent.is_some_and(f64::is_finite))
        .cloned()
        .collect();
    let rows_skipped = records.len() - usable.len();

    if usable.len() < GrowthClass::COUNT {
        return Err(CrecerError::InsufficientData {
            rows: usable.len(),
            needed: GrowthClass::COUNT,
        });
    }

    let growth: Vec<f64> = usable.iter().map(|r| r.growth_rate_cent.unwrap_or(0.0)).collect();
    let labels = derive_labels(&growth);
    let y: Vec<usize> = labels.iter().map(|c| c.index()).collect();

    let transformer = FeatureTransformer::fit(&usable)?;
    let x = transformer.transform_matrix(&usable);
    let forest = RandomForest::fit(&x, &y, GrowthClass::COUNT, &config.forest())?;
    let explainer = TreeExplainer::fit(&forest);

    let report =
        TrainReport { rows_used: usable.len(), rows_skipped, n_features: transformer.output_len() };
    Ok(TrainOutcome { artifact: ModelArtifact { transformer, forest, explainer }, report })
}

/// Load a historical CSV and train on it. CSV-level skips are folded into
/// the report's skip count.
pub fn train_from_csv(path: &Path, config: &TrainConfig) -> Result<TrainOutcome> {
    let dataset = load_csv(path)?;
    let mut outcome = train(&dataset.records, config)?;
    outcome.report.rows_skipped += dataset.skipped_rows;
    Ok(outcome)
}

/// Split a growth-rate distribution into three equal-count quantile bins:
/// lower third → Low, middle → Medium, upper → High. Assignment is by
/// stable rank, so bin sizes differ by at most one row even with duplicate
/// values.
pub fn derive_labels(growth: &[f64]) -> Vec<GrowthClass> {
    let n = growth.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| growth[a].total_cmp(&growth[b]));

    // Remainder rows go to the lower bins, the way equal-count quantile
    // cuts distribute them.
    let base = n / GrowthClass::COUNT;
    let remainder = n % GrowthClass::COUNT;
    let mut labels = vec![GrowthClass::Low; n];
    let mut rank = 0usize;
    for (bin, class) in GrowthClass::ALL.into_iter().enumerate() {
        let size = base + usize::from(bin < remainder);
        for _ in 0..size {
            labels[order[rank]] = class;
            rank += 1;
        }
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(growth: Option<f64>, valuation: f64, domain: &str) -> VentureRecord {
        VentureRecord {
            investment_amount: valuation / 10.0,
            valuation,
            number_of_investors: 2.0,
            year_founded: 2017.0,
            growth_rate_cent: growth,
            domain: domain.into(),
            startup_stage: "Seed".into(),
            industry_funder_type: "VC".into(),
        }
    }

    fn historical(n: usize) -> Vec<VentureRecord> {
        (0..n)
            .map(|i| {
                record(
                    Some((i as f64 * 7.0) % 90.0),
                    100_000.0 * (i + 1) as f64,
                    ["Fintech", "Health", "Energy"][i % 3],
                )
            })
            .collect()
    }

    fn bin_sizes(labels: &[GrowthClass]) -> [usize; 3] {
        let mut sizes = [0usize; 3];
        for label in labels {
            sizes[label.index()] += 1;
        }
        sizes
    }

    #[test]
    fn test_tri_split_is_balanced() {
        for n in [3usize, 4, 5, 6, 10, 31, 100] {
            let growth: Vec<f64> = (0..n).map(|i| (i as f64 * 13.0) % 47.0).collect();
            let labels = derive_labels(&growth);
            let sizes = bin_sizes(&labels);
            let max = sizes.iter().max().unwrap();
            let min = sizes.iter().min().unwrap();
            assert!(max - min <= 1, "unbalanced split for n={n}: {sizes:?}");
        }
    }

    #[test]
    fn test_tri_split_balanced_under_ties() {
        let growth = vec![5.0; 9];
        let sizes = bin_sizes(&derive_labels(&growth));
        assert_eq!(sizes, [3, 3, 3]);
    }

    #[test]
    fn test_lowest_growth_maps_to_low() {
        let growth = vec![10.0, 50.0, 90.0];
        let labels = derive_labels(&growth);
        assert_eq!(labels, vec![GrowthClass::Low, GrowthClass::Medium, GrowthClass::High]);
    }

    #[test]
    fn test_boundaries_are_data_dependent() {
        // The same raw value lands in different classes under different
        // historical distributions.
        let a = derive_labels(&[10.0, 20.0, 30.0]);
        let b = derive_labels(&[1.0, 2.0, 10.0]);
        assert_eq!(a[0], GrowthClass::Low);
        assert_eq!(b[2], GrowthClass::High);
    }

    #[test]
    fn test_rows_without_growth_are_skipped_not_fatal() {
        let mut records = historical(9);
        records.push(record(None, 1_000_000.0, "Fintech"));
        records.push(record(Some(f64::NAN), 2_000_000.0, "Health"));

        let outcome = train(&records, &TrainConfig { n_trees: 5, ..Default::default() }).unwrap();
        assert_eq!(outcome.report.rows_used, 9);
        assert_eq!(outcome.report.rows_skipped, 2);
    }

    #[test]
    fn test_empty_dataset_is_an_error() {
        assert!(matches!(train(&[], &TrainConfig::default()), Err(CrecerError::EmptyDataset)));
    }

    #[test]
    fn test_too_few_usable_rows_is_an_error() {
        let records = vec![record(Some(10.0), 100.0, "A"), record(Some(20.0), 200.0, "B")];
        let err = train(&records, &TrainConfig::default()).unwrap_err();
        assert!(matches!(err, CrecerError::InsufficientData { rows: 2, needed: 3 }));
    }

    #[test]
    fn test_training_is_reproducible() {
        let records = historical(30);
        let config = TrainConfig { n_trees: 10, ..Default::default() };
        let a = train(&records, &config).unwrap();
        let b = train(&records, &config).unwrap();

        let probe = a.artifact.transformer.transform(&records[7]);
        assert_eq!(
            a.artifact.forest.predict_proba(&probe),
            b.artifact.forest.predict_proba(&probe)
        );
    }

    #[test]
    fn test_trained_model_predicts_within_label_space() {
        let records = historical(30);
        let outcome = train(&records, &TrainConfig { n_trees: 10, ..Default::default() }).unwrap();
        for r in &records {
            let x = outcome.artifact.transformer.transform(r);
            let class = outcome.artifact.forest.predict(&x);
            assert!(GrowthClass::from_index(class).is_some());
        }
    }

    #[test]
    fn test_config_defaults_match_reference_run() {
        let config = TrainConfig::default();
        assert_eq!(config.n_trees, 100);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn test_config_deserializes_with_partial_overrides() {
        let config: TrainConfig = serde_json::from_str(r#"{"n_trees": 7}"#).unwrap();
        assert_eq!(config.n_trees, 7);
        assert_eq!(config.seed, 42);
    }
}
