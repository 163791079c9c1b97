//! The estimator seam.
//!
//! Anything that turns an aligned feature matrix into raw (target-scale)
//! predictions can sit behind [`Estimator`]: the bundled gradient-boosted
//! forest, or a stub in tests. The trained estimator is loaded once at
//! process start and treated as immutable, hence `Send + Sync`.

use crate::data::RowMatrix;

/// Estimator invocation failures.
///
/// Any estimator error is fatal for the whole batch: there is no partial
/// inference contract over a partially consumed matrix.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EstimatorError {
    #[error("feature count mismatch: estimator expects {expected}, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("estimator failed: {0}")]
    Failed(String),
}

/// A trained regression estimator.
pub trait Estimator: Send + Sync {
    /// Input width the estimator was fitted on.
    fn num_features(&self) -> usize;

    /// Predict one raw value per matrix row, in row order.
    ///
    /// Raw means on the scale the model was fitted on; for a log-price model
    /// the caller still has to exponentiate.
    fn predict(&self, features: &RowMatrix<f64>) -> Result<Vec<f64>, EstimatorError>;
}
