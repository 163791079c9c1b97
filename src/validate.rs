//! Input validation: drop-NA filtering and type coercion.
//!
//! Client payloads arrive as loose JSON records. Validation reconciles them
//! against the [`FeatureSchema`](crate::schema::FeatureSchema) in two steps:
//!
//! 1. Records missing any non-nullable field (absent or JSON null) are
//!    silently excluded from the batch, preserving the relative order of the
//!    rest. This mirrors the drop-NA cleaning applied at training time.
//! 2. Surviving records have their present fields coerced to schema types.
//!    Coercion failures never abort the batch: the failing record is excluded
//!    and the reasons are collected into one [`ValidationReport`] attached to
//!    the response.
//!
//! Unknown keys are discarded. Nullable fields left absent are *not*
//! materialized here; the aligner fills those gaps with 0.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::{FeatureSchema, FieldKind, FieldValue};

/// A raw client record: unordered, untyped, possibly sparse.
pub type RawRecord = serde_json::Map<String, Value>;

// =============================================================================
// Validated records
// =============================================================================

/// A record coerced to schema types, with unknown keys discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRecord {
    row: usize,
    values: HashMap<String, FieldValue>,
}

impl ValidatedRecord {
    /// Assemble a record directly (fixtures and tests; `validate_batch` is
    /// the normal producer).
    pub fn new(row: usize, values: HashMap<String, FieldValue>) -> Self {
        Self { row, values }
    }

    /// Position of this record in the original batch.
    #[inline]
    pub fn row(&self) -> usize {
        self.row
    }

    /// Coerced value of a field, if the client supplied it.
    pub fn get(&self, field: &str) -> Option<FieldValue> {
        self.values.get(field).copied()
    }

    /// Number of coerced fields.
    pub fn num_fields(&self) -> usize {
        self.values.len()
    }
}

// =============================================================================
// Error report
// =============================================================================

/// One field that could not be coerced to its schema type.
///
/// `record` is the position in the caller's original batch, so errors stay
/// correlatable with inputs even after other records were dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub record: usize,
    pub field: String,
    pub expected: FieldKind,
    pub got: String,
}

/// All type-coercion failures for one batch.
///
/// Attached to the prediction response; never raised as a fault.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationReport {
    errors: Vec<FieldError>,
}

impl ValidationReport {
    /// The collected failures, in batch order.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Validate a batch of raw records against the schema.
///
/// Returns the surviving coerced records (original order preserved) and a
/// report of coercion failures, or `None` if every surviving record coerced
/// cleanly. An empty batch yields an empty output and no report.
///
/// Pure over its input; the only side effect is debug-level accounting of
/// dropped rows.
pub fn validate_batch(
    schema: &FeatureSchema,
    batch: &[RawRecord],
) -> (Vec<ValidatedRecord>, Option<ValidationReport>) {
    let mut survivors = Vec::with_capacity(batch.len());
    let mut errors = Vec::new();
    let mut dropped_missing = 0usize;

    'records: for (row, record) in batch.iter().enumerate() {
        // Drop-NA policy: silent exclusion, no report entry.
        for spec in schema.fields() {
            if !spec.nullable && is_missing(record.get(&spec.name)) {
                dropped_missing += 1;
                continue 'records;
            }
        }

        let before = errors.len();
        let mut values = HashMap::with_capacity(schema.len());
        for spec in schema.fields() {
            let value = match record.get(&spec.name) {
                None | Some(Value::Null) => continue,
                Some(value) => value,
            };
            match coerce(value, spec.kind) {
                Some(coerced) => {
                    values.insert(spec.name.clone(), coerced);
                }
                None => errors.push(FieldError {
                    record: row,
                    field: spec.name.clone(),
                    expected: spec.kind,
                    got: type_name(value).to_owned(),
                }),
            }
        }

        // A record with any coercion failure is reported but not predicted on.
        if errors.len() == before {
            survivors.push(ValidatedRecord { row, values });
        }
    }

    if dropped_missing > 0 {
        log::debug!(
            "dropped {dropped_missing} of {} records with missing required fields",
            batch.len()
        );
    }

    let report = if errors.is_empty() {
        None
    } else {
        Some(ValidationReport { errors })
    };
    (survivors, report)
}

fn is_missing(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

/// Coerce one JSON value to a schema field type.
///
/// Tolerates the representations real clients send: booleans for 0/1 numeric
/// fields, numeric strings, integral floats for integer fields.
fn coerce(value: &Value, kind: FieldKind) -> Option<FieldValue> {
    match kind {
        FieldKind::Float => match value {
            Value::Number(n) => n.as_f64().map(FieldValue::Float),
            Value::Bool(b) => Some(FieldValue::Float(if *b { 1.0 } else { 0.0 })),
            Value::String(s) => s.trim().parse::<f64>().ok().map(FieldValue::Float),
            _ => None,
        },
        FieldKind::Int => match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(FieldValue::Int(i))
                } else {
                    n.as_f64().and_then(integral)
                }
            }
            Value::Bool(b) => Some(FieldValue::Int(i64::from(*b))),
            Value::String(s) => {
                let s = s.trim();
                if let Ok(i) = s.parse::<i64>() {
                    Some(FieldValue::Int(i))
                } else {
                    s.parse::<f64>().ok().and_then(integral)
                }
            }
            _ => None,
        },
        FieldKind::Bool => match value {
            Value::Bool(b) => Some(FieldValue::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(0) => Some(FieldValue::Bool(false)),
                Some(1) => Some(FieldValue::Bool(true)),
                _ => None,
            },
            Value::String(s) => match s.trim() {
                "true" => Some(FieldValue::Bool(true)),
                "false" => Some(FieldValue::Bool(false)),
                _ => None,
            },
            _ => None,
        },
    }
}

/// A float with no fractional part, as an integer field value.
fn integral(f: f64) -> Option<FieldValue> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() <= i64::MAX as f64 {
        Some(FieldValue::Int(f as i64))
    } else {
        None
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
