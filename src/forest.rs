//! Gradient-boosted regression trees, inference only.
//!
//! The bundled estimator: a sum of flat-node decision trees over the aligned
//! feature matrix. Training lives in the (external) pipeline; this module
//! only walks trees that arrive inside a model artifact.
//!
//! Node children are stored as indices into the tree's node vector. A valid
//! tree's children always point at later in-range nodes, so traversal
//! terminates; [`Forest::validate`] enforces this when an artifact is loaded.

use serde::{Deserialize, Serialize};

use crate::data::RowMatrix;
use crate::estimator::{Estimator, EstimatorError};

// =============================================================================
// Nodes
// =============================================================================

/// Split condition for a decision node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitCondition {
    /// Feature index to split on.
    pub feature: u32,
    /// Threshold value (go left if feature < threshold).
    pub threshold: f64,
    /// Direction for missing (NaN) values.
    #[serde(default)]
    pub default_left: bool,
}

impl SplitCondition {
    /// Evaluate which direction to go for a feature value.
    /// Returns true for left, false for right.
    #[inline]
    pub fn go_left(&self, feature_value: f64) -> bool {
        if feature_value.is_nan() {
            self.default_left
        } else {
            feature_value < self.threshold
        }
    }
}

/// A node in a decision tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// Internal split node.
    Split {
        condition: SplitCondition,
        left: u32,
        right: u32,
    },
    /// Leaf node with an additive score.
    Leaf { value: f64 },
}

// =============================================================================
// Trees
// =============================================================================

/// A single decision tree with the root at node 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Additive score for one aligned feature row.
    fn score(&self, row: &[f64]) -> f64 {
        let mut idx = 0usize;
        loop {
            match self.nodes[idx] {
                Node::Leaf { value } => return value,
                Node::Split {
                    condition,
                    left,
                    right,
                } => {
                    let value = row[condition.feature as usize];
                    let next = if condition.go_left(value) { left } else { right };
                    idx = next as usize;
                }
            }
        }
    }
}

// =============================================================================
// Forest
// =============================================================================

/// Structural defects in a deserialized forest.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ForestError {
    #[error("tree {tree} has no nodes")]
    EmptyTree { tree: usize },

    #[error("tree {tree}, node {node}: child {child} must point at a later in-range node")]
    InvalidChild { tree: usize, node: usize, child: u32 },

    #[error("tree {tree}, node {node}: feature {feature} out of range ({num_features} features)")]
    FeatureOutOfRange {
        tree: usize,
        node: usize,
        feature: u32,
        num_features: usize,
    },
}

/// An additive ensemble of decision trees.
///
/// Prediction for a row is `base_score + sum of per-tree leaf values`, on the
/// target scale the model was fitted on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forest {
    base_score: f64,
    num_features: usize,
    trees: Vec<Tree>,
}

impl Forest {
    /// Build and structurally validate a forest.
    pub fn new(base_score: f64, num_features: usize, trees: Vec<Tree>) -> Result<Self, ForestError> {
        let forest = Self {
            base_score,
            num_features,
            trees,
        };
        forest.validate()?;
        Ok(forest)
    }

    /// Check every tree for defects that would break traversal.
    ///
    /// Deserialization does not run this automatically; artifact loading does.
    pub fn validate(&self) -> Result<(), ForestError> {
        for (t, tree) in self.trees.iter().enumerate() {
            let len = tree.nodes.len();
            if len == 0 {
                return Err(ForestError::EmptyTree { tree: t });
            }
            for (n, node) in tree.nodes.iter().enumerate() {
                if let Node::Split {
                    condition,
                    left,
                    right,
                } = node
                {
                    for &child in &[*left, *right] {
                        // Children strictly after the parent: in range and acyclic.
                        if (child as usize) <= n || (child as usize) >= len {
                            return Err(ForestError::InvalidChild {
                                tree: t,
                                node: n,
                                child,
                            });
                        }
                    }
                    if (condition.feature as usize) >= self.num_features {
                        return Err(ForestError::FeatureOutOfRange {
                            tree: t,
                            node: n,
                            feature: condition.feature,
                            num_features: self.num_features,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    #[inline]
    pub fn base_score(&self) -> f64 {
        self.base_score
    }

    #[inline]
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    #[inline]
    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    fn score_row(&self, row: &[f64]) -> f64 {
        self.base_score + self.trees.iter().map(|tree| tree.score(row)).sum::<f64>()
    }
}

impl Estimator for Forest {
    fn num_features(&self) -> usize {
        self.num_features
    }

    fn predict(&self, features: &RowMatrix<f64>) -> Result<Vec<f64>, EstimatorError> {
        if features.num_cols() != self.num_features {
            return Err(EstimatorError::ShapeMismatch {
                expected: self.num_features,
                got: features.num_cols(),
            });
        }
        Ok(features.rows().map(|row| self.score_row(row)).collect())
    }
}
