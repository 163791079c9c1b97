//! Prediction adapter: validate, align, predict, invert, package.
//!
//! [`PredictionService`] is the stateless request/response layer over the
//! loaded estimator. Per request it runs the whole pipeline and zips the
//! predictions with the validation report and the model version. Partial
//! success is the normal case: dropped records shorten the prediction list
//! without failing the batch. Only an estimator fault aborts the request.

use serde::{Deserialize, Serialize};

use crate::align::align_batch;
use crate::artifact::ModelArtifact;
use crate::estimator::{Estimator, EstimatorError};
use crate::schema::FeatureSchema;
use crate::transform::TargetTransform;
use crate::validate::{validate_batch, RawRecord, ValidationReport};

// =============================================================================
// Wire contract
// =============================================================================

/// Inference request body: `{"inputs": [ <record>, ... ]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub inputs: Vec<RawRecord>,
}

/// Inference response body.
///
/// `predictions` holds one value per surviving record, in original batch
/// order; it serializes as `[]` (not null) for an empty or fully dropped
/// batch. `errors` serializes as `null` when validation was clean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predictions: Vec<f64>,
    pub errors: Option<ValidationReport>,
    pub version: String,
}

// =============================================================================
// Service
// =============================================================================

/// The prediction endpoint's core: schema + estimator + target transform.
///
/// Construct once at process start (usually from a [`ModelArtifact`]) and
/// share read-only across requests.
pub struct PredictionService {
    schema: FeatureSchema,
    estimator: Box<dyn Estimator>,
    target: TargetTransform,
    version: String,
}

impl std::fmt::Debug for PredictionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionService")
            .field("schema", &self.schema)
            .field("target", &self.target)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl PredictionService {
    /// Assemble a service, checking the estimator against the schema width.
    pub fn new(
        schema: FeatureSchema,
        estimator: Box<dyn Estimator>,
        target: TargetTransform,
        version: impl Into<String>,
    ) -> Result<Self, EstimatorError> {
        if estimator.num_features() != schema.len() {
            return Err(EstimatorError::ShapeMismatch {
                expected: estimator.num_features(),
                got: schema.len(),
            });
        }
        Ok(Self {
            schema,
            estimator,
            target,
            version: version.into(),
        })
    }

    /// Build a service from a loaded artifact.
    ///
    /// The artifact was cross-checked on load, so this cannot fail.
    pub fn from_artifact(artifact: ModelArtifact) -> Self {
        let (version, schema, target, forest) = artifact.into_parts();
        Self {
            schema,
            estimator: Box::new(forest),
            target,
            version,
        }
    }

    /// The schema this service validates against.
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Version tag of the underlying model build.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Run the full pipeline on one batch.
    ///
    /// Validation drops and coercion failures are reported in the result, not
    /// as errors; an estimator fault fails the whole batch since there is no
    /// partial-matrix inference contract. All-dropped and empty batches skip
    /// the estimator and return an empty prediction list.
    pub fn predict(&self, batch: &[RawRecord]) -> Result<PredictionResult, EstimatorError> {
        let (records, errors) = validate_batch(&self.schema, batch);

        let predictions = if records.is_empty() {
            Vec::new()
        } else {
            let matrix = align_batch(&records, &self.schema);
            let mut raw = self.estimator.predict(&matrix)?;
            self.target.invert(&mut raw);
            raw
        };

        Ok(PredictionResult {
            predictions,
            errors,
            version: self.version.clone(),
        })
    }

    /// Convenience wrapper over [`predict`](Self::predict) for a parsed
    /// request body.
    pub fn handle(&self, request: &PredictionRequest) -> Result<PredictionResult, EstimatorError> {
        self.predict(&request.inputs)
    }
}
