//! Feature schema: the fixed, training-time-derived input contract.
//!
//! The schema is produced by the training pipeline together with the fitted
//! estimator and persisted in the model artifact. Its field set and order
//! must match the estimator's input dimensionality exactly; it is never
//! extended at inference time. Adding a new city indicator means regenerating
//! the schema from the training dataset's category set.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// =============================================================================
// Field descriptors
// =============================================================================

/// Primitive type of a feature column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Continuous numeric feature (e.g. `bathrooms`).
    Float,
    /// Integer feature (e.g. `sqft_living`).
    Int,
    /// Boolean feature, used for the one-hot city indicators.
    Bool,
}

/// A single named, typed feature column.
///
/// Non-nullable fields participate in the drop-NA policy: a record missing
/// one is excluded from the batch. Nullable fields (the one-hot indicators)
/// default to false/0 when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub nullable: bool,
}

impl FieldSpec {
    /// A field that must be present and non-null in every record.
    pub fn required(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: false,
        }
    }

    /// A field that may be absent or null; the aligner fills the gap with 0.
    pub fn optional(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: true,
        }
    }
}

/// A field value after coercion to its schema type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Float(f64),
    Int(i64),
    Bool(bool),
}

impl FieldValue {
    /// Numeric representation consumed by the estimator.
    #[inline]
    pub fn as_f64(self) -> f64 {
        match self {
            FieldValue::Float(v) => v,
            FieldValue::Int(v) => v as f64,
            FieldValue::Bool(v) => {
                if v {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

// =============================================================================
// Schema
// =============================================================================

/// Schema construction errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SchemaError {
    #[error("duplicate field name: {0}")]
    DuplicateField(String),

    #[error("schema has no fields")]
    Empty,
}

/// Ordered list of typed feature fields with a name lookup index.
///
/// Serializes as the plain field list, so the schema round-trips through the
/// model artifact unchanged. Construction rejects duplicate names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<FieldSpec>", into = "Vec<FieldSpec>")]
pub struct FeatureSchema {
    fields: Vec<FieldSpec>,
    index: HashMap<String, usize>,
}

impl FeatureSchema {
    /// Build a schema from an ordered field list.
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self, SchemaError> {
        if fields.is_empty() {
            return Err(SchemaError::Empty);
        }
        let mut index = HashMap::with_capacity(fields.len());
        for (pos, field) in fields.iter().enumerate() {
            if index.insert(field.name.clone(), pos).is_some() {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
        }
        Ok(Self { fields, index })
    }

    /// Number of fields (= estimator input width).
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in schema order.
    #[inline]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.index.get(name).map(|&pos| &self.fields[pos])
    }

    /// Position of a field in the schema order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Returns true if the schema declares a field with this name.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }
}

impl PartialEq for FeatureSchema {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl TryFrom<Vec<FieldSpec>> for FeatureSchema {
    type Error = SchemaError;

    fn try_from(fields: Vec<FieldSpec>) -> Result<Self, Self::Error> {
        Self::new(fields)
    }
}

impl From<FeatureSchema> for Vec<FieldSpec> {
    fn from(schema: FeatureSchema) -> Self {
        schema.fields
    }
}
