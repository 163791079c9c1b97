//! Feature alignment: validated records to the estimator's fixed layout.
//!
//! The estimator consumes a dense vector whose length and order match the
//! schema exactly, no matter which subset of fields the client supplied.
//! Gaps (notably one-hot city columns for cities not selected, or unknown to
//! the caller entirely) are filled with 0. There is no error path.

use crate::data::RowMatrix;
use crate::schema::{FeatureSchema, FieldValue};
use crate::validate::ValidatedRecord;

/// Map one validated record onto the schema's ordered feature vector.
///
/// Deterministic and pure: the same record and schema always produce a
/// bit-identical vector.
pub fn align(record: &ValidatedRecord, schema: &FeatureSchema) -> Vec<f64> {
    schema
        .fields()
        .iter()
        .map(|spec| {
            record
                .get(&spec.name)
                .map(FieldValue::as_f64)
                .unwrap_or(0.0)
        })
        .collect()
}

/// Stack a batch of aligned records into a row-major matrix.
///
/// Zero records yield a `0 x schema.len()` matrix, so the width survives an
/// all-dropped batch.
pub fn align_batch(records: &[ValidatedRecord], schema: &FeatureSchema) -> RowMatrix<f64> {
    let mut data = Vec::with_capacity(records.len() * schema.len());
    for record in records {
        data.extend(align(record, schema));
    }
    RowMatrix::from_vec(data, records.len(), schema.len())
}
