//! Attribution Engine: per-feature contributions to a predicted class.
//!
//! Path attribution over the fitted trees: walking a vector's decision path,
//! each split's change in the class probability is credited to the feature
//! the split tests. Per tree the contributions sum to `leaf - root` for that
//! class, so averaged over the forest they sum to the class's margin over
//! its expected value. Contributions are reported in the transformed feature
//! space: a one-hot dimension is its own feature, not its parent field.

use crate::forest::{DecisionTree, RandomForest};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Attributions reported per prediction.
pub const TOP_K: usize = 5;

/// One named, signed contribution toward the predicted class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub feature: String,
    pub value: f64,
}

/// Fitted explainer. Self-contained: it embeds the tree structures it
/// explains, so the explainer artifact loads without the classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeExplainer {
    trees: Vec<DecisionTree>,
    /// Mean root distribution: the per-class expected value a contribution
    /// sum is measured against.
    expected_value: Vec<f64>,
    n_features: usize,
}

impl TreeExplainer {
    /// Fit against a trained classifier.
    pub fn fit(forest: &RandomForest) -> Self {
        let n_classes = forest.n_classes();
        let mut expected_value = vec![0.0; n_classes];
        for tree in &forest.trees {
            for (e, p) in expected_value.iter_mut().zip(tree.root_distribution()) {
                *e += p;
            }
        }
        let n = forest.trees.len().max(1) as f64;
        for e in &mut expected_value {
            *e /= n;
        }
        Self { trees: forest.trees.clone(), expected_value, n_features: forest.n_features() }
    }

    /// Per-feature contribution of `x` toward `class`, one value per
    /// transformed feature dimension. The caller passes the class the
    /// classifier itself predicted for this exact vector.
    pub fn explain(&self, x: &[f64], class: usize) -> Vec<f64> {
        let mut contributions = vec![0.0; self.n_features];
        if class >= self.expected_value.len() {
            return contributions;
        }
        for tree in &self.trees {
            tree.path_contributions(x, class, &mut contributions);
        }
        let n = self.trees.len().max(1) as f64;
        for c in &mut contributions {
            *c /= n;
        }
        contributions
    }

    /// Top-k contributions by absolute magnitude, paired with resolved
    /// feature names. A name-count mismatch falls back to synthetic
    /// positional names; the result stays well-formed, just less
    /// interpretable.
    pub fn top_contributions(
        &self,
        x: &[f64],
        class: usize,
        feature_names: &[String],
        k: usize,
    ) -> Vec<Contribution> {
        let values = self.explain(x, class);
        let mut pairs: Vec<Contribution> = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| Contribution {
                feature: if feature_names.len() == self.n_features {
                    feature_names[i].clone()
                } else {
                    format!("feature_{i}")
                },
                value,
            })
            .collect();
        pairs.sort_by(|a, b| {
            b.value.abs().partial_cmp(&a.value.abs()).unwrap_or(Ordering::Equal)
        });
        pairs.truncate(k);
        pairs
    }

    /// Expected value (base rate) for a class.
    pub fn expected_value(&self, class: usize) -> f64 {
        self.expected_value.get(class).copied().unwrap_or(0.0)
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

impl DecisionTree {
    pub(crate) fn root_distribution(&self) -> &[f64] {
        &self.nodes[0].distribution
    }

    /// Accumulate this tree's path contributions for `class` into `out`.
    fn path_contributions(&self, x: &[f64], class: usize, out: &mut [f64]) {
        let mut index = 0;
        while let Some(split) = &self.nodes[index].split {
            let next = if x[split.feature] <= split.threshold { split.left } else { split.right };
            out[split.feature] +=
                self.nodes[next].distribution[class] - self.nodes[index].distribution[class];
            index = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::ForestConfig;
    use approx::assert_relative_eq;

    fn fitted() -> (RandomForest, Vec<Vec<f64>>) {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..15 {
            let j = i as f64 * 0.02;
            x.push(vec![0.0 + j, 1.0, 0.0]);
            y.push(0);
            x.push(vec![3.0 - j, 0.0, 1.0]);
            y.push(1);
            x.push(vec![6.0 + j, 0.5, 0.5]);
            y.push(2);
        }
        let config = ForestConfig { n_trees: 25, ..ForestConfig::default() };
        let forest = RandomForest::fit(&x, &y, 3, &config).unwrap();
        (forest, x)
    }

    #[test]
    fn test_contributions_sum_to_class_margin() {
        let (forest, x) = fitted();
        let explainer = TreeExplainer::fit(&forest);
        for xi in x.iter().take(9) {
            let class = forest.predict(xi);
            let contributions = explainer.explain(xi, class);
            let sum: f64 = contributions.iter().sum();
            let margin = forest.predict_proba(xi)[class] - explainer.expected_value(class);
            assert_relative_eq!(sum, margin, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_explains_the_predicted_class_margin_positively() {
        let (forest, x) = fitted();
        let explainer = TreeExplainer::fit(&forest);
        // On cleanly separated training points the predicted class's margin
        // over its base rate is positive, so contributions sum positive.
        let class = forest.predict(&x[0]);
        let sum: f64 = explainer.explain(&x[0], class).iter().sum();
        assert!(sum > 0.0);
    }

    #[test]
    fn test_top_contributions_sorted_by_abs_and_truncated() {
        let (forest, x) = fitted();
        let explainer = TreeExplainer::fit(&forest);
        let names: Vec<String> = (0..3).map(|i| format!("dim{i}")).collect();
        let class = forest.predict(&x[0]);
        let top = explainer.top_contributions(&x[0], class, &names, 2);

        assert_eq!(top.len(), 2);
        assert!(top[0].value.abs() >= top[1].value.abs());
        assert!(top.iter().all(|c| c.feature.starts_with("dim")));
    }

    #[test]
    fn test_name_mismatch_falls_back_to_synthetic_names() {
        let (forest, x) = fitted();
        let explainer = TreeExplainer::fit(&forest);
        let wrong_names = vec!["only_one".to_string()];
        let class = forest.predict(&x[0]);
        let top = explainer.top_contributions(&x[0], class, &wrong_names, TOP_K);
        assert!(top.iter().all(|c| c.feature.starts_with("feature_")));
    }

    #[test]
    fn test_out_of_range_class_yields_zero_contributions() {
        let (forest, x) = fitted();
        let explainer = TreeExplainer::fit(&forest);
        let contributions = explainer.explain(&x[0], 99);
        assert!(contributions.iter().all(|&c| c == 0.0));
    }

    #[test]
    fn test_expected_values_form_a_distribution() {
        let (forest, _) = fitted();
        let explainer = TreeExplainer::fit(&forest);
        let sum: f64 = (0..3).map(|c| explainer.expected_value(c)).sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_explainer_is_self_contained_after_serde() {
        let (forest, x) = fitted();
        let explainer = TreeExplainer::fit(&forest);
        let bytes = bincode::serialize(&explainer).unwrap();
        let restored: TreeExplainer = bincode::deserialize(&bytes).unwrap();
        let class = forest.predict(&x[0]);
        assert_eq!(explainer.explain(&x[0], class), restored.explain(&x[0], class));
    }
}
