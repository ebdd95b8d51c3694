//! Random Forest
//!
//! Bagged CART trees with Gini impurity and per-split feature subsampling.
//!
//! Core principles:
//! - Each tree is fit on a bootstrap sample of the training rows
//! - Each split considers `floor(sqrt(n_features))` randomly chosen features
//! - Prediction averages the leaf class distributions across trees
//!
//! Tree `i` is seeded with `seed + i`, so a fit is reproducible regardless of
//! how rayon schedules the trees.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::random::SeededRandom;
use crate::types::{DEFAULT_SEED, FEATURE_COUNT};

/// Classifier input row
pub type FeatureRow = [f64; FEATURE_COUNT];

// ==================== Configuration ====================

/// Random forest hyperparameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of trees (default: 100)
    pub n_estimators: usize,
    /// Maximum tree depth, unbounded when `None`
    pub max_depth: Option<usize>,
    /// Minimum rows required to split a node (default: 2)
    pub min_samples_split: usize,
    /// Features considered per split, `floor(sqrt(n_features))` when `None`
    pub max_features: Option<usize>,
    /// Base seed for bootstrap and feature sampling
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            min_samples_split: 2,
            max_features: None,
            seed: DEFAULT_SEED,
        }
    }
}

impl ForestConfig {
    fn features_per_split(&self) -> usize {
        self.max_features
            .unwrap_or_else(|| (FEATURE_COUNT as f64).sqrt().floor() as usize)
            .clamp(1, FEATURE_COUNT)
    }
}

// ==================== Decision Tree ====================

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum TreeNode {
    Leaf {
        /// Class distribution of the training rows that reached this leaf
        proba: Vec<f64>,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// CART classification tree stored as a flat node arena; node 0 is the root
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
}

struct TreeBuilder<'a> {
    rows: &'a [FeatureRow],
    labels: &'a [usize],
    n_classes: usize,
    max_depth: Option<usize>,
    min_samples_split: usize,
    features_per_split: usize,
    rng: SeededRandom,
    nodes: Vec<TreeNode>,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

impl DecisionTree {
    /// Fit on the rows selected by `sample` (duplicates allowed)
    fn fit(
        rows: &[FeatureRow],
        labels: &[usize],
        n_classes: usize,
        sample: Vec<usize>,
        config: &ForestConfig,
        rng: SeededRandom,
    ) -> Self {
        let mut builder = TreeBuilder {
            rows,
            labels,
            n_classes,
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split.max(2),
            features_per_split: config.features_per_split(),
            rng,
            nodes: Vec::new(),
        };
        builder.build(sample, 0);

        Self {
            nodes: builder.nodes,
        }
    }

    pub fn predict_proba(&self, row: &FeatureRow) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { proba } => return proba,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[TreeNode], idx: usize) -> usize {
            match &nodes[idx] {
                TreeNode::Leaf { .. } => 0,
                TreeNode::Split { left, right, .. } => {
                    1 + walk(nodes, *left).max(walk(nodes, *right))
                }
            }
        }
        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }
}

impl TreeBuilder<'_> {
    /// Build the subtree for `sample` and return its node index
    fn build(&mut self, sample: Vec<usize>, depth: usize) -> usize {
        let counts = self.class_counts(&sample);
        let impurity = gini(&counts, sample.len());

        let depth_reached = self.max_depth.is_some_and(|max| depth >= max);
        if impurity <= 0.0 || sample.len() < self.min_samples_split || depth_reached {
            return self.push_leaf(&counts, sample.len());
        }

        let Some(best) = self.find_split(&sample) else {
            return self.push_leaf(&counts, sample.len());
        };
        if best.impurity >= impurity {
            return self.push_leaf(&counts, sample.len());
        }

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = sample
            .into_iter()
            .partition(|&i| self.rows[i][best.feature] <= best.threshold);

        // Reserve the split slot before children so the root stays at 0.
        let idx = self.nodes.len();
        self.nodes.push(TreeNode::Leaf { proba: Vec::new() });
        let left = self.build(left_rows, depth + 1);
        let right = self.build(right_rows, depth + 1);
        self.nodes[idx] = TreeNode::Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
        };
        idx
    }

    fn push_leaf(&mut self, counts: &[usize], total: usize) -> usize {
        let proba = if total == 0 {
            vec![0.0; self.n_classes]
        } else {
            counts.iter().map(|&c| c as f64 / total as f64).collect()
        };
        self.nodes.push(TreeNode::Leaf { proba });
        self.nodes.len() - 1
    }

    fn class_counts(&self, sample: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; self.n_classes];
        for &i in sample {
            counts[self.labels[i]] += 1;
        }
        counts
    }

    /// Best split over a random subset of non-constant features.
    ///
    /// Features are visited in shuffled order until `features_per_split`
    /// non-constant ones have been evaluated.
    fn find_split(&mut self, sample: &[usize]) -> Option<BestSplit> {
        let mut features: Vec<usize> = (0..FEATURE_COUNT).collect();
        for i in (1..features.len()).rev() {
            let j = self.rng.next_index(i + 1);
            features.swap(i, j);
        }

        let mut best: Option<BestSplit> = None;
        let mut evaluated = 0;
        let mut order = sample.to_vec();

        for feature in features {
            if evaluated >= self.features_per_split {
                break;
            }

            order.sort_by(|&a, &b| self.rows[a][feature].total_cmp(&self.rows[b][feature]));
            let first = self.rows[order[0]][feature];
            let last = self.rows[order[order.len() - 1]][feature];
            if first >= last {
                continue;
            }
            evaluated += 1;

            if let Some(candidate) = self.best_threshold(&order, feature) {
                if best.as_ref().map_or(true, |b| candidate.impurity < b.impurity) {
                    best = Some(candidate);
                }
            }
        }

        best
    }

    /// Sweep sorted rows, scoring the midpoint between each pair of distinct values
    fn best_threshold(&self, order: &[usize], feature: usize) -> Option<BestSplit> {
        let n = order.len();
        let mut left = vec![0usize; self.n_classes];
        let mut right = self.class_counts(order);
        let mut best: Option<BestSplit> = None;

        for pos in 0..n - 1 {
            let label = self.labels[order[pos]];
            left[label] += 1;
            right[label] -= 1;

            let here = self.rows[order[pos]][feature];
            let next = self.rows[order[pos + 1]][feature];
            if here >= next {
                continue;
            }

            let n_left = pos + 1;
            let n_right = n - n_left;
            let weighted = (n_left as f64 * gini(&left, n_left)
                + n_right as f64 * gini(&right, n_right))
                / n as f64;

            if best.as_ref().map_or(true, |b| weighted < b.impurity) {
                let mut threshold = here + (next - here) / 2.0;
                if threshold >= next {
                    threshold = here;
                }
                best = Some(BestSplit {
                    feature,
                    threshold,
                    impurity: weighted,
                });
            }
        }

        best
    }
}

fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let t = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / t;
            p * p
        })
        .sum::<f64>()
}

// ==================== Random Forest ====================

/// Ensemble of bootstrap-trained decision trees
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_classes: usize,
}

impl RandomForest {
    /// Fit `config.n_estimators` trees in parallel.
    ///
    /// `labels` holds class indices in `0..n_classes`. Empty input yields a
    /// forest without trees, whose predictions are uniform.
    pub fn fit(rows: &[FeatureRow], labels: &[usize], n_classes: usize, config: &ForestConfig) -> Self {
        debug_assert_eq!(rows.len(), labels.len());
        if rows.is_empty() || n_classes == 0 {
            return Self {
                trees: Vec::new(),
                n_classes,
            };
        }

        let trees = (0..config.n_estimators)
            .into_par_iter()
            .map(|i| {
                let mut rng = SeededRandom::new(config.seed.wrapping_add(i as u64));
                let sample: Vec<usize> = (0..rows.len())
                    .map(|_| rng.next_index(rows.len()))
                    .collect();
                DecisionTree::fit(rows, labels, n_classes, sample, config, rng)
            })
            .collect();

        Self { trees, n_classes }
    }

    /// Mean class distribution across trees
    pub fn predict_proba(&self, row: &FeatureRow) -> Vec<f64> {
        if self.trees.is_empty() {
            return vec![1.0 / self.n_classes.max(1) as f64; self.n_classes];
        }

        let mut acc = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (a, p) in acc.iter_mut().zip(tree.predict_proba(row)) {
                *a += p;
            }
        }
        let n = self.trees.len() as f64;
        acc.iter_mut().for_each(|a| *a /= n);
        acc
    }

    /// Most probable class index; ties go to the lowest index
    pub fn predict(&self, row: &FeatureRow) -> usize {
        argmax(&self.predict_proba(row))
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }
}

pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}
