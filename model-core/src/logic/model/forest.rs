//! Random forest classifier
//!
//! Binary CART trees (gini impurity, bootstrap samples, random feature
//! subsets per split). Only inference matters for served artifacts; `fit`
//! exists for the placeholder mock model.

use ndarray::ArrayView2;
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// Binary classifier over one scaled sample
pub trait Classifier: Send + Sync {
    /// Human readable model family
    fn model_type(&self) -> &'static str;

    /// Input dimension
    fn n_features(&self) -> usize;

    /// Number of ensemble members, if any
    fn n_estimators(&self) -> Option<usize> {
        None
    }

    /// Probability of the positive class. `x.len()` must equal `n_features()`.
    fn predict_proba(&self, x: &[f64]) -> f64;

    /// Discrete label, ties go to the negative class
    fn predict(&self, x: &[f64]) -> u8 {
        u8::from(self.predict_proba(x) > 0.5)
    }
}

#[derive(Debug, Error)]
pub enum FitError {
    #[error("Training set is empty")]
    EmptyTrainingSet,

    #[error("Training set has {rows} rows but {labels} labels")]
    LabelCountMismatch { rows: usize, labels: usize },

    #[error("Forest needs at least one estimator")]
    NoEstimators,
}

// ============================================================================
// DECISION TREE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// `x[feature] <= threshold` goes left
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        /// Fraction of positive samples that reached this leaf
        positive: f64,
        samples: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub n_features: usize,
    /// Pre-order node list, root at index 0
    pub nodes: Vec<Node>,
}

impl DecisionTree {
    /// Structural check for deserialized trees.
    ///
    /// Children must sit after their parent, which rules out cycles.
    pub fn validate(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        for (i, node) in self.nodes.iter().enumerate() {
            match *node {
                Node::Split { feature, threshold, left, right } => {
                    if feature >= self.n_features {
                        return Err(format!("node {} splits on feature {} of {}", i, feature, self.n_features));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {} has a non-finite threshold", i));
                    }
                    for child in [left, right] {
                        if child <= i || child >= self.nodes.len() {
                            return Err(format!("node {} points to invalid child {}", i, child));
                        }
                    }
                }
                Node::Leaf { positive, .. } => {
                    if !(0.0..=1.0).contains(&positive) {
                        return Err(format!("leaf {} has probability {}", i, positive));
                    }
                }
            }
        }

        Ok(())
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], i: usize) -> usize {
            match nodes[i] {
                Node::Split { left, right, .. } => 1 + walk(nodes, left).max(walk(nodes, right)),
                Node::Leaf { .. } => 0,
            }
        }
        if self.nodes.is_empty() { 0 } else { walk(&self.nodes, 0) }
    }
}

impl Classifier for DecisionTree {
    fn model_type(&self) -> &'static str {
        "DecisionTree"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, x: &[f64]) -> f64 {
        let mut i = 0;
        loop {
            match self.nodes[i] {
                Node::Split { feature, threshold, left, right } => {
                    i = if x[feature] <= threshold { left } else { right };
                }
                Node::Leaf { positive, .. } => return positive,
            }
        }
    }
}

// ============================================================================
// RANDOM FOREST
// ============================================================================

/// Training parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    /// Features drawn per split, defaults to floor(sqrt(n_features))
    pub max_features: Option<usize>,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 10,
            max_depth: None,
            min_samples_split: 2,
            max_features: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub n_features: usize,
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Fit on rows of `x` with 0/1 labels `y`
    pub fn fit<'a>(x: ArrayView2<'a, f64>, y: &'a [u8], params: &ForestParams, seed: u64) -> Result<Self, FitError> {
        let (rows, n_features) = x.dim();
        if rows == 0 || n_features == 0 {
            return Err(FitError::EmptyTrainingSet);
        }
        if rows != y.len() {
            return Err(FitError::LabelCountMismatch { rows, labels: y.len() });
        }
        if params.n_estimators == 0 {
            return Err(FitError::NoEstimators);
        }

        let max_features = params
            .max_features
            .unwrap_or_else(|| (n_features as f64).sqrt() as usize)
            .clamp(1, n_features);

        let mut rng = StdRng::seed_from_u64(seed);
        let mut trees = Vec::with_capacity(params.n_estimators);

        for _ in 0..params.n_estimators {
            let mut tree_rng = StdRng::seed_from_u64(rng.gen());
            let bootstrap: Vec<usize> = (0..rows).map(|_| tree_rng.gen_range(0..rows)).collect();

            let mut builder = TreeBuilder {
                x,
                y,
                max_features,
                max_depth: params.max_depth,
                min_samples_split: params.min_samples_split.max(2),
                nodes: Vec::new(),
            };
            builder.grow(bootstrap, 0, &mut tree_rng);

            trees.push(DecisionTree { n_features, nodes: builder.nodes });
        }

        log::debug!("Fitted random forest: {} trees, {} features", trees.len(), n_features);
        Ok(Self { n_features, trees })
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            if tree.n_features != self.n_features {
                return Err(format!("tree {} expects {} features, forest {}", i, tree.n_features, self.n_features));
            }
            tree.validate().map_err(|e| format!("tree {}: {}", i, e))?;
        }
        Ok(())
    }
}

impl Classifier for RandomForest {
    fn model_type(&self) -> &'static str {
        "RandomForest"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn n_estimators(&self) -> Option<usize> {
        Some(self.trees.len())
    }

    fn predict_proba(&self, x: &[f64]) -> f64 {
        let sum: f64 = self.trees.iter().map(|t| t.predict_proba(x)).sum();
        sum / self.trees.len() as f64
    }
}

// ============================================================================
// TREE GROWING
// ============================================================================

struct TreeBuilder<'a> {
    x: ArrayView2<'a, f64>,
    y: &'a [u8],
    max_features: usize,
    max_depth: Option<usize>,
    min_samples_split: usize,
    nodes: Vec<Node>,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

fn gini(total: usize, positive: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let p = positive as f64 / total as f64;
    1.0 - p * p - (1.0 - p) * (1.0 - p)
}

impl TreeBuilder<'_> {
    /// Grow a subtree over `samples` and return its node index
    fn grow(&mut self, samples: Vec<usize>, depth: usize, rng: &mut StdRng) -> usize {
        let node_id = self.nodes.len();
        let total = samples.len();
        let positive = samples.iter().filter(|&&i| self.y[i] == 1).count();

        self.nodes.push(Node::Leaf {
            positive: positive as f64 / total as f64,
            samples: total,
        });

        let pure = positive == 0 || positive == total;
        let too_deep = self.max_depth.is_some_and(|d| depth >= d);
        if pure || too_deep || total < self.min_samples_split {
            return node_id;
        }

        let Some(split) = self.best_split(&samples, rng) else {
            return node_id;
        };

        let (left, right): (Vec<usize>, Vec<usize>) = samples
            .into_iter()
            .partition(|&i| self.x[[i, split.feature]] <= split.threshold);

        let left = self.grow(left, depth + 1, rng);
        let right = self.grow(right, depth + 1, rng);

        self.nodes[node_id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        node_id
    }

    fn best_split(&self, samples: &[usize], rng: &mut StdRng) -> Option<SplitCandidate> {
        let total = samples.len();
        let total_positive = samples.iter().filter(|&&i| self.y[i] == 1).count();
        let mut best: Option<SplitCandidate> = None;

        for feature in sample(rng, self.x.ncols(), self.max_features).into_iter() {
            let mut column: Vec<(f64, u8)> = samples
                .iter()
                .map(|&i| (self.x[[i, feature]], self.y[i]))
                .collect();
            column.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_positive = 0;
            for k in 1..total {
                left_positive += usize::from(column[k - 1].1 == 1);

                let (lo, hi) = (column[k - 1].0, column[k].0);
                if lo >= hi {
                    continue;
                }

                let right_positive = total_positive - left_positive;
                let impurity = (k as f64 * gini(k, left_positive)
                    + (total - k) as f64 * gini(total - k, right_positive))
                    / total as f64;

                if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                    let mid = lo + (hi - lo) / 2.0;
                    best = Some(SplitCandidate {
                        feature,
                        threshold: if mid < hi { mid } else { lo },
                        impurity,
                    });
                }
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    fn separable() -> (Array2<f64>, Vec<u8>) {
        let x = array![[0.1, 5.0], [0.2, 3.0], [0.3, 4.0], [0.7, 5.0], [0.8, 3.0], [0.9, 4.0]];
        (x, vec![0, 0, 0, 1, 1, 1])
    }

    #[test]
    fn test_forest_learns_separable_data() {
        let (x, y) = separable();
        let params = ForestParams {
            n_estimators: 25,
            max_features: Some(2),
            ..Default::default()
        };
        let forest = RandomForest::fit(x.view(), &y, &params, 7).unwrap();

        assert_eq!(forest.n_estimators(), Some(25));
        assert!(forest.predict_proba(&[0.05, 4.0]) < 0.5);
        assert!(forest.predict_proba(&[0.95, 4.0]) > 0.5);
        assert_eq!(forest.predict(&[0.95, 4.0]), 1);
        assert!(forest.validate().is_ok());
    }

    #[test]
    fn test_fit_is_deterministic_for_seed() {
        let (x, y) = separable();
        let a = RandomForest::fit(x.view(), &y, &ForestParams::default(), 42).unwrap();
        let b = RandomForest::fit(x.view(), &y, &ForestParams::default(), 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_pure_node_is_leaf() {
        let x = array![[1.0], [2.0], [3.0]];
        let forest = RandomForest::fit(x.view(), &[1, 1, 1], &ForestParams::default(), 1).unwrap();
        for tree in &forest.trees {
            assert_eq!(tree.nodes.len(), 1);
            assert_eq!(tree.depth(), 0);
        }
        assert_eq!(forest.predict_proba(&[10.0]), 1.0);
    }

    #[test]
    fn test_max_depth_limits_tree() {
        let (x, y) = separable();
        let params = ForestParams {
            max_depth: Some(1),
            ..Default::default()
        };
        let forest = RandomForest::fit(x.view(), &y, &params, 3).unwrap();
        assert!(forest.trees.iter().all(|t| t.depth() <= 1));
    }

    #[test]
    fn test_fit_rejects_bad_input() {
        let x = Array2::<f64>::zeros((0, 3));
        assert!(matches!(
            RandomForest::fit(x.view(), &[], &ForestParams::default(), 0),
            Err(FitError::EmptyTrainingSet)
        ));

        let (x, _) = separable();
        assert!(matches!(
            RandomForest::fit(x.view(), &[0, 1], &ForestParams::default(), 0),
            Err(FitError::LabelCountMismatch { rows: 6, labels: 2 })
        ));
    }

    #[test]
    fn test_validate_rejects_backward_child() {
        let tree = DecisionTree {
            n_features: 1,
            nodes: vec![
                Node::Split { feature: 0, threshold: 0.5, left: 0, right: 1 },
                Node::Leaf { positive: 1.0, samples: 1 },
            ],
        };
        assert!(tree.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_feature() {
        let tree = DecisionTree {
            n_features: 1,
            nodes: vec![
                Node::Split { feature: 3, threshold: 0.5, left: 1, right: 2 },
                Node::Leaf { positive: 0.0, samples: 1 },
                Node::Leaf { positive: 1.0, samples: 1 },
            ],
        };
        assert!(tree.validate().is_err());
    }

    #[test]
    fn test_node_serialization_is_tagged() {
        let leaf = Node::Leaf { positive: 0.25, samples: 4 };
        let json = serde_json::to_value(&leaf).unwrap();
        assert_eq!(json["kind"], "leaf");
    }
}
