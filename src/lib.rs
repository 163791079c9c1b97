//! housecast: validation, alignment, and inference core for a house-price
//! regression model.
//!
//! The crate sits between raw JSON prediction requests and a trained
//! estimator. It reconciles arbitrary client payloads against the fixed,
//! training-time-derived feature schema (ordered numeric fields plus one-hot
//! city indicators), then runs inference and inverse-transforms the
//! log-scaled output back to prices.
//!
//! # Key Types
//!
//! - [`PredictionService`] - the request/response pipeline
//! - [`ModelArtifact`] - persisted estimator + schema + version
//! - [`FeatureSchema`] - the input contract fixed at training time
//! - [`Estimator`] - the seam between this crate and the trained model
//!
//! # Example
//!
//! ```ignore
//! use housecast::{ModelArtifact, PredictionService};
//!
//! let artifact = ModelArtifact::load("model.json")?;
//! let service = PredictionService::from_artifact(artifact);
//! let result = service.predict(&request.inputs)?;
//! println!("{}", serde_json::to_string(&result)?);
//! ```
//!
//! Batches degrade gracefully: records missing required fields are dropped,
//! type-coercion failures are reported alongside the remaining predictions,
//! and only an estimator fault aborts a request.

pub mod align;
pub mod artifact;
pub mod data;
pub mod estimator;
pub mod forest;
pub mod predict;
pub mod schema;
pub mod testing;
pub mod transform;
pub mod validate;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use artifact::{ArtifactError, ModelArtifact};
pub use data::RowMatrix;
pub use estimator::{Estimator, EstimatorError};
pub use forest::{Forest, ForestError};
pub use predict::{PredictionRequest, PredictionResult, PredictionService};
pub use schema::{FeatureSchema, FieldKind, FieldSpec, FieldValue, SchemaError};
pub use transform::TargetTransform;
pub use validate::{validate_batch, RawRecord, ValidatedRecord, ValidationReport};
