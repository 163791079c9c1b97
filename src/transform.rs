//! Target-scale transforms.
//!
//! The training pipeline fits the regressor on `ln(price)` to tame the
//! long-tailed target. Inference has to undo that before responding, so the
//! transform is recorded in the model artifact next to the estimator.

use serde::{Deserialize, Serialize};

/// How the training target was scaled before fitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetTransform {
    /// Target fitted in original units; predictions pass through.
    #[default]
    Identity,
    /// Target fitted as the natural log; invert with exp.
    Log,
}

impl TargetTransform {
    /// Map raw estimator output back to original target units, in place.
    pub fn invert(&self, output: &mut [f64]) {
        match self {
            TargetTransform::Identity => {}
            TargetTransform::Log => {
                for value in output {
                    *value = value.exp();
                }
            }
        }
    }
}
