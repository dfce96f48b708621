//! Growth Classifier: a seeded random forest over transformed feature
//! vectors.
//!
//! Trained once offline and used read-only at inference time. All randomness
//! (bootstrap resampling, per-split feature subsets) is drawn from a single
//! seeded RNG at fit time; prediction is deterministic.

mod tree;

pub use tree::DecisionTree;
use tree::TreeParams;

use crate::{CrecerError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Forest hyperparameters. Defaults mirror the reference training run:
/// 100 estimators, fixed seed 42.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self { n_trees: 100, max_depth: 16, min_samples_split: 2, seed: 42 }
    }
}

/// A fitted ensemble of decision trees. Immutable after fitting; safe to
/// share across concurrent inference calls without locking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    pub(crate) trees: Vec<DecisionTree>,
    n_classes: usize,
    n_features: usize,
}

impl RandomForest {
    /// Fit the ensemble on a design matrix and class indices.
    ///
    /// Each tree is grown on a bootstrap sample of the rows with sqrt(d)
    /// feature subsampling per split. The same `(x, y, config)` always
    /// produces the same forest.
    pub fn fit(x: &[Vec<f64>], y: &[usize], n_classes: usize, config: &ForestConfig) -> Result<Self> {
        if x.is_empty() || y.is_empty() {
            return Err(CrecerError::EmptyDataset);
        }
        debug_assert_eq!(x.len(), y.len());
        let n_rows = x.len();
        let n_features = x[0].len();
        let params = TreeParams {
            n_classes,
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split,
            n_split_features: (n_features as f64).sqrt().round().max(1.0) as usize,
        };

        let mut rng = StdRng::seed_from_u64(config.seed);
        let trees = (0..config.n_trees)
            .map(|_| {
                let rows: Vec<usize> =
                    (0..n_rows).map(|_| rng.random_range(0..n_rows)).collect();
                DecisionTree::fit(x, y, rows, &params, &mut rng)
            })
            .collect();

        Ok(Self { trees, n_classes, n_features })
    }

    /// Mean class distribution across all trees.
    pub fn predict_proba(&self, x: &[f64]) -> Vec<f64> {
        let mut mean = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (m, p) in mean.iter_mut().zip(tree.predict_proba(x)) {
                *m += p;
            }
        }
        let n = self.trees.len().max(1) as f64;
        for m in &mut mean {
            *m /= n;
        }
        mean
    }

    /// Predicted class index: argmax of the mean distribution, lowest index
    /// winning ties so repeated calls always agree.
    pub fn predict(&self, x: &[f64]) -> usize {
        let proba = self.predict_proba(x);
        let mut best = 0;
        for (i, &p) in proba.iter().enumerate() {
            if p > proba[best] {
                best = i;
            }
        }
        best
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }
}
