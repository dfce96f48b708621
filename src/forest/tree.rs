//! Single CART-style decision tree with Gini impurity splitting.
//!
//! Trees are stored as a flat node arena indexed from the root at 0. Every
//! node, internal or leaf, keeps its class distribution: the attribution
//! engine walks decision paths and needs the distribution delta across each
//! split, not just the leaf value.

use rand::rngs::StdRng;
use rand::seq::index::sample;
use serde::{Deserialize, Serialize};

/// Split test routing samples to children: `x[feature] <= threshold` goes
/// left, otherwise right.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Split {
    pub feature: usize,
    pub threshold: f64,
    pub left: usize,
    pub right: usize,
}

/// One tree node. `split` is `None` for leaves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Node {
    /// Class probabilities over the training samples reaching this node.
    pub distribution: Vec<f64>,
    pub split: Option<Split>,
}

/// Stopping and sampling parameters shared by all trees of a forest.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TreeParams {
    pub n_classes: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    /// Number of candidate features drawn per split (sqrt of the feature
    /// count for a classification forest).
    pub n_split_features: usize,
}

/// A fitted decision tree. Read-only after fitting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub(crate) nodes: Vec<Node>,
}

impl DecisionTree {
    /// Grow a tree on the rows of `x` selected by `rows` (a bootstrap
    /// sample, possibly with repeats). Deterministic given the RNG state.
    pub(crate) fn fit(
        x: &[Vec<f64>],
        y: &[usize],
        rows: Vec<usize>,
        params: &TreeParams,
        rng: &mut StdRng,
    ) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.grow(x, y, rows, 0, params, rng);
        tree
    }

    /// Class distribution at the leaf this vector routes to.
    pub fn predict_proba(&self, x: &[f64]) -> &[f64] {
        let mut index = 0;
        while let Some(split) = &self.nodes[index].split {
            index = if x[split.feature] <= split.threshold { split.left } else { split.right };
        }
        &self.nodes[index].distribution
    }

    /// Recursively grow a subtree, returning the index of its root node.
    fn grow(
        &mut self,
        x: &[Vec<f64>],
        y: &[usize],
        rows: Vec<usize>,
        depth: usize,
        params: &TreeParams,
        rng: &mut StdRng,
    ) -> usize {
        let counts = class_counts(y, &rows, params.n_classes);
        let distribution = normalize(&counts, rows.len());
        let index = self.nodes.len();
        self.nodes.push(Node { distribution, split: None });

        let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
        if depth >= params.max_depth || rows.len() < params.min_samples_split || pure {
            return index;
        }

        let Some((feature, threshold)) = best_split(x, y, &rows, params, rng) else {
            return index;
        };

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) =
            rows.into_iter().partition(|&r| x[r][feature] <= threshold);

        let left = self.grow(x, y, left_rows, depth + 1, params, rng);
        let right = self.grow(x, y, right_rows, depth + 1, params, rng);
        self.nodes[index].split = Some(Split { feature, threshold, left, right });
        index
    }
}

fn class_counts(y: &[usize], rows: &[usize], n_classes: usize) -> Vec<usize> {
    let mut counts = vec![0usize; n_classes];
    for &r in rows {
        counts[y[r]] += 1;
    }
    counts
}

fn normalize(counts: &[usize], total: usize) -> Vec<f64> {
    let total = total.max(1) as f64;
    counts.iter().map(|&c| c as f64 / total).collect()
}

fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum::<f64>()
}

/// Exhaustive threshold search over a random feature subset: for each
/// candidate feature, sort the sample by value and evaluate the midpoint
/// between every pair of distinct consecutive values by weighted child Gini.
fn best_split(
    x: &[Vec<f64>],
    y: &[usize],
    rows: &[usize],
    params: &TreeParams,
    rng: &mut StdRng,
) -> Option<(usize, f64)> {
    let n_features = x[rows[0]].len();
    let k = params.n_split_features.clamp(1, n_features);
    let candidates = sample(rng, n_features, k);

    let parent_counts = class_counts(y, rows, params.n_classes);
    let parent_gini = gini(&parent_counts, rows.len());

    let mut best: Option<(usize, f64)> = None;
    let mut best_score = parent_gini;

    for feature in candidates {
        let mut ordered: Vec<(f64, usize)> = rows.iter().map(|&r| (x[r][feature], y[r])).collect();
        ordered.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut left_counts = vec![0usize; params.n_classes];
        let mut right_counts = parent_counts.clone();
        let total = ordered.len();

        for i in 0..total - 1 {
            let (value, label) = ordered[i];
            left_counts[label] += 1;
            right_counts[label] -= 1;

            let next_value = ordered[i + 1].0;
            if next_value <= value {
                continue;
            }
            let left_n = i + 1;
            let right_n = total - left_n;
            let score = (left_n as f64 * gini(&left_counts, left_n)
                + right_n as f64 * gini(&right_counts, right_n))
                / total as f64;

            if score < best_score {
                best_score = score;
                best = Some((feature, value + (next_value - value) / 2.0));
            }
        }
    }

    best
}
