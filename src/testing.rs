//! Shared fixtures for unit and integration tests.
//!
//! Provides the King County schema the model was trained on, small stub
//! estimators, and a sample request record matching the documented API
//! example.

use serde_json::{json, Value};

use crate::data::RowMatrix;
use crate::estimator::{Estimator, EstimatorError};
use crate::forest::Forest;
use crate::schema::{FeatureSchema, FieldKind, FieldSpec};
use crate::validate::RawRecord;

/// City one-hot indicator columns, in training order.
pub const CITIES: &[&str] = &[
    "Algona",
    "Auburn",
    "Beaux_Arts_Village",
    "Bellevue",
    "Black_Diamond",
    "Bothell",
    "Burien",
    "Carnation",
    "Clyde_Hill",
    "Covington",
    "Des_Moines",
    "Duvall",
    "Enumclaw",
    "Fall_City",
    "Federal_Way",
    "Issaquah",
    "Kenmore",
    "Kent",
    "Kirkland",
    "Lake_Forest_Park",
    "Maple_Valley",
    "Medina",
    "Mercer_Island",
    "Milton",
    "Newcastle",
    "Normandy_Park",
    "North_Bend",
    "Pacific",
    "Preston",
    "Ravensdale",
    "Redmond",
    "Renton",
    "Sammamish",
    "SeaTac",
    "Seattle",
    "Shoreline",
    "Skykomish",
    "Snoqualmie",
    "Snoqualmie_Pass",
    "Tukwila",
    "Vashon",
    "Woodinville",
    "Yarrow_Point",
];

/// The full King County housing schema: 12 numeric fields plus one boolean
/// indicator per training-set city, in the order the estimator was fitted on.
pub fn king_county_schema() -> FeatureSchema {
    let mut fields = vec![
        FieldSpec::required("bedrooms", FieldKind::Float),
        FieldSpec::required("bathrooms", FieldKind::Float),
        FieldSpec::required("sqft_living", FieldKind::Int),
        FieldSpec::required("sqft_lot", FieldKind::Int),
        FieldSpec::required("floors", FieldKind::Float),
        FieldSpec::required("waterfront", FieldKind::Int),
        FieldSpec::required("view", FieldKind::Int),
        FieldSpec::required("condition", FieldKind::Int),
        FieldSpec::required("sqft_above", FieldKind::Int),
        FieldSpec::required("sqft_basement", FieldKind::Int),
        FieldSpec::required("yr_built", FieldKind::Int),
        FieldSpec::required("yr_renovated", FieldKind::Int),
    ];
    for city in CITIES {
        fields.push(FieldSpec::optional(format!("city_{city}"), FieldKind::Bool));
    }
    FeatureSchema::new(fields).expect("static schema is valid")
}

/// A three-field schema for compact unit tests.
pub fn toy_schema() -> FeatureSchema {
    FeatureSchema::new(vec![
        FieldSpec::required("bedrooms", FieldKind::Float),
        FieldSpec::required("sqft_living", FieldKind::Int),
        FieldSpec::optional("city_Seattle", FieldKind::Bool),
    ])
    .expect("static schema is valid")
}

/// The documented example request record: a 1989 Enumclaw house.
pub fn sample_record() -> RawRecord {
    let mut record = json!({
        "bedrooms": 3.0,
        "bathrooms": 2.5,
        "sqft_living": 3660,
        "sqft_lot": 39478,
        "floors": 2.0,
        "waterfront": 0,
        "view": 2,
        "condition": 4,
        "sqft_above": 3260,
        "sqft_basement": 400,
        "yr_built": 1989,
        "yr_renovated": false,
    })
    .as_object()
    .expect("object literal")
    .clone();
    for city in CITIES {
        record.insert(format!("city_{city}"), Value::Bool(*city == "Enumclaw"));
    }
    record
}

/// A forest with no trees: every prediction equals `value` (the base score).
pub fn constant_forest(num_features: usize, value: f64) -> Forest {
    Forest::new(value, num_features, Vec::new()).expect("trivial forest is valid")
}

/// Stub estimator returning the same raw value for every row.
pub struct ConstantEstimator {
    num_features: usize,
    value: f64,
}

impl ConstantEstimator {
    pub fn new(num_features: usize, value: f64) -> Self {
        Self { num_features, value }
    }
}

impl Estimator for ConstantEstimator {
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
        Ok(vec![self.value; features.num_rows()])
    }
}

/// Stub estimator that fails every invocation.
pub struct FailingEstimator {
    num_features: usize,
}

impl FailingEstimator {
    pub fn new(num_features: usize) -> Self {
        Self { num_features }
    }
}

impl Estimator for FailingEstimator {
    fn num_features(&self) -> usize {
        self.num_features
    }

    fn predict(&self, _features: &RowMatrix<f64>) -> Result<Vec<f64>, EstimatorError> {
        Err(EstimatorError::Failed("stub failure".to_owned()))
    }
}
