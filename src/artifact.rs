//! Persisted model artifact: estimator + schema + target transform + version.
//!
//! The training pipeline writes one JSON file per model build; the serving
//! process loads it once at startup and treats it as immutable. Loading
//! cross-checks the schema width against the forest's input dimensionality,
//! so a schema regenerated out of sync with its estimator fails fast instead
//! of producing misaligned predictions.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::forest::{Forest, ForestError};
use crate::schema::FeatureSchema;
use crate::transform::TargetTransform;

/// Artifact load/save failures.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed artifact: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid forest: {0}")]
    Forest(#[from] ForestError),

    #[error("schema lists {schema} features but the forest expects {forest}")]
    FeatureCountMismatch { schema: usize, forest: usize },
}

/// A versioned, persisted model build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    version: String,
    schema: FeatureSchema,
    #[serde(default)]
    target: TargetTransform,
    forest: Forest,
}

impl ModelArtifact {
    /// Assemble and cross-check an artifact.
    pub fn new(
        version: impl Into<String>,
        schema: FeatureSchema,
        target: TargetTransform,
        forest: Forest,
    ) -> Result<Self, ArtifactError> {
        let artifact = Self {
            version: version.into(),
            schema,
            target,
            forest,
        };
        artifact.check()?;
        Ok(artifact)
    }

    /// Load an artifact from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let artifact: Self = serde_json::from_reader(BufReader::new(file))?;
        artifact.check()?;
        log::info!(
            "loaded model {} from {} ({} features, {} trees)",
            artifact.version,
            path.display(),
            artifact.schema.len(),
            artifact.forest.num_trees()
        );
        Ok(artifact)
    }

    /// Write the artifact as JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ArtifactError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    fn check(&self) -> Result<(), ArtifactError> {
        self.forest.validate()?;
        let forest_features = self.forest.num_features();
        if self.schema.len() != forest_features {
            return Err(ArtifactError::FeatureCountMismatch {
                schema: self.schema.len(),
                forest: forest_features,
            });
        }
        Ok(())
    }

    /// Version tag of this model build.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn target(&self) -> TargetTransform {
        self.target
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    /// Consume the artifact, yielding its parts for service construction.
    pub fn into_parts(self) -> (String, FeatureSchema, TargetTransform, Forest) {
        (self.version, self.schema, self.target, self.forest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldKind, FieldSpec};
    use crate::testing::{constant_forest, toy_schema};

    fn artifact() -> ModelArtifact {
        let schema = toy_schema();
        let forest = constant_forest(schema.len(), 1.5);
        ModelArtifact::new("0.3.1", schema, TargetTransform::Log, forest).unwrap()
    }

    #[test]
    fn save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let original = artifact();
        original.save(&path).unwrap();

        let loaded = ModelArtifact::load(&path).unwrap();
        assert_eq!(loaded.version(), "0.3.1");
        assert_eq!(loaded.target(), TargetTransform::Log);
        assert_eq!(loaded.schema(), original.schema());
        assert_eq!(loaded.forest(), original.forest());
    }

    #[test]
    fn feature_count_mismatch_is_rejected() {
        let schema = toy_schema();
        let forest = constant_forest(schema.len() + 1, 0.0);
        let err = ModelArtifact::new("bad", schema, TargetTransform::Identity, forest).unwrap_err();
        assert!(matches!(err, ArtifactError::FeatureCountMismatch { .. }));
    }

    #[test]
    fn missing_target_defaults_to_identity() {
        let schema = FeatureSchema::new(vec![FieldSpec::required("x", FieldKind::Float)]).unwrap();
        let forest = constant_forest(1, 0.0);
        let mut value =
            serde_json::to_value(ModelArtifact::new("v", schema, TargetTransform::Log, forest).unwrap())
                .unwrap();
        value.as_object_mut().unwrap().remove("target");

        let artifact: ModelArtifact = serde_json::from_value(value).unwrap();
        assert_eq!(artifact.target(), TargetTransform::Identity);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, b"{\"version\": ").unwrap();
        assert!(matches!(
            ModelArtifact::load(&path).unwrap_err(),
            ArtifactError::Json(_)
        ));
    }
}
