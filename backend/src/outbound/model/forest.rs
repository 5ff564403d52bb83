//! Tree-ensemble classifier.

use serde::{Deserialize, Serialize};

use crate::domain::ports::{Classifier, ClassifierError};
use crate::domain::{FEATURE_COUNT, FeatureVector, PredictionLabel};

use super::{ModelLoadError, argmax};

/// One node of a decision tree, addressed by index within its tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    /// Go to `left` when `features[feature] <= threshold`, else `right`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Per-class vote counts or weights, aligned with the model's classes.
    Leaf { votes: Vec<f64> },
}

/// Averaged vote of independently evaluated trees.
///
/// Each tree's leaf votes are normalised to sum to one before averaging so
/// that trees with differently sized leaves carry equal weight.
#[derive(Debug, Clone, PartialEq)]
pub struct ForestModel {
    classes: Vec<i32>,
    trees: Vec<Vec<TreeNode>>,
}

impl ForestModel {
    /// Validate raw trees against the class list and feature width.
    pub fn try_new(classes: Vec<i32>, trees: Vec<Vec<TreeNode>>) -> Result<Self, ModelLoadError> {
        if classes.is_empty() {
            return Err(ModelLoadError::invalid("classes must not be empty"));
        }
        if trees.is_empty() {
            return Err(ModelLoadError::invalid("forest must contain at least one tree"));
        }
        for (tree_index, nodes) in trees.iter().enumerate() {
            validate_tree(tree_index, nodes, classes.len())?;
        }
        Ok(Self { classes, trees })
    }

    fn tree_votes(
        &self,
        nodes: &[TreeNode],
        features: &FeatureVector,
    ) -> Result<Vec<f64>, ClassifierError> {
        let mut index = 0;
        // A well-formed tree reaches a leaf in fewer steps than it has nodes.
        for _ in 0..nodes.len() {
            match &nodes[index] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if features.values()[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                TreeNode::Leaf { votes } => {
                    let total: f64 = votes.iter().sum();
                    return Ok(votes.iter().map(|vote| vote / total).collect());
                }
            }
        }
        Err(ClassifierError::evaluation(
            "decision tree traversal did not reach a leaf",
        ))
    }
}

fn validate_tree(
    tree_index: usize,
    nodes: &[TreeNode],
    class_count: usize,
) -> Result<(), ModelLoadError> {
    if nodes.is_empty() {
        return Err(ModelLoadError::invalid(format!("tree {tree_index} has no nodes")));
    }
    for (node_index, node) in nodes.iter().enumerate() {
        let location = format!("tree {tree_index} node {node_index}");
        match node {
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if *feature >= FEATURE_COUNT {
                    return Err(ModelLoadError::invalid(format!(
                        "{location} splits on feature {feature}, expected < {FEATURE_COUNT}"
                    )));
                }
                if !threshold.is_finite() {
                    return Err(ModelLoadError::invalid(format!(
                        "{location} has a non-finite threshold"
                    )));
                }
                if *left >= nodes.len() || *right >= nodes.len() {
                    return Err(ModelLoadError::invalid(format!(
                        "{location} points outside the tree"
                    )));
                }
            }
            TreeNode::Leaf { votes } => {
                if votes.len() != class_count {
                    return Err(ModelLoadError::invalid(format!(
                        "{location} has {} votes, expected {class_count}",
                        votes.len()
                    )));
                }
                if votes.iter().any(|vote| !vote.is_finite() || *vote < 0.0) {
                    return Err(ModelLoadError::invalid(format!(
                        "{location} votes must be finite and non-negative"
                    )));
                }
                if votes.iter().sum::<f64>() <= 0.0 {
                    return Err(ModelLoadError::invalid(format!(
                        "{location} votes must not all be zero"
                    )));
                }
            }
        }
    }
    Ok(())
}

impl Classifier for ForestModel {
    fn predict(&self, features: &FeatureVector) -> Result<PredictionLabel, ClassifierError> {
        let mut totals = vec![0.0; self.classes.len()];
        for nodes in &self.trees {
            let votes = self.tree_votes(nodes, features)?;
            for (total, vote) in totals.iter_mut().zip(votes) {
                *total += vote;
            }
        }
        let tree_count = self.trees.len() as f64;
        let averaged: Vec<f64> = totals.into_iter().map(|total| total / tree_count).collect();
        let index = argmax(&averaged)
            .ok_or_else(|| ClassifierError::evaluation("forest votes are not finite"))?;
        Ok(PredictionLabel::new(self.classes[index]))
    }
}
