//! End-to-end prediction pipeline tests.
//!
//! Covers the documented API scenarios: the example Enumclaw record, batches
//! with dropped rows, the empty batch, and unknown city columns, plus the
//! batch-length and ordering guarantees.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use serde_json::json;

use housecast::forest::{Forest, Node, SplitCondition, Tree};
use housecast::testing::{king_county_schema, sample_record, ConstantEstimator, CITIES};
use housecast::{ModelArtifact, PredictionRequest, PredictionService, TargetTransform};

/// The prediction documented for the example request.
const EXAMPLE_PREDICTION: f64 = 13.635679994241398;

fn example_service() -> PredictionService {
    let schema = king_county_schema();
    let estimator = ConstantEstimator::new(schema.len(), EXAMPLE_PREDICTION.ln());
    PredictionService::new(schema, Box::new(estimator), TargetTransform::Log, "0.3.1").unwrap()
}

/// A small real forest over the King County layout: one tree on sqft_living
/// (feature 2), one on the city_Enumclaw indicator (feature 24).
fn toy_king_county_forest() -> Forest {
    let split = |feature: u32, threshold: f64, left: u32, right: u32| Node::Split {
        condition: SplitCondition {
            feature,
            threshold,
            default_left: false,
        },
        left,
        right,
    };
    Forest::new(
        0.0,
        king_county_schema().len(),
        vec![
            Tree::new(vec![
                split(2, 2000.0, 1, 2),
                Node::Leaf { value: 12.0 },
                Node::Leaf { value: 13.0 },
            ]),
            Tree::new(vec![
                split(24, 0.5, 1, 2),
                Node::Leaf { value: 0.0 },
                Node::Leaf { value: 0.5 },
            ]),
        ],
    )
    .unwrap()
}

// =============================================================================
// Documented scenarios
// =============================================================================

#[test]
fn scenario_a_example_record_predicts_documented_value() {
    let result = example_service().predict(&[sample_record()]).unwrap();
    assert!(result.errors.is_none());
    assert_eq!(result.predictions.len(), 1);
    assert_abs_diff_eq!(result.predictions[0], EXAMPLE_PREDICTION, epsilon = 1e-9);
    assert_eq!(result.version, "0.3.1");
}

#[test]
fn scenario_b_null_required_field_shortens_predictions_silently() {
    let mut broken = sample_record();
    broken.insert("bedrooms".into(), serde_json::Value::Null);

    let result = example_service()
        .predict(&[sample_record(), broken])
        .unwrap();
    assert_eq!(result.predictions.len(), 1);
    assert!(result.errors.is_none());
}

#[test]
fn scenario_c_empty_batch_yields_empty_predictions() {
    let request: PredictionRequest = serde_json::from_str(r#"{"inputs": []}"#).unwrap();
    let result = example_service().handle(&request).unwrap();
    assert_eq!(result.predictions, Vec::<f64>::new());
    assert!(result.errors.is_none());
}

#[test]
fn scenario_d_unknown_city_column_is_ignored() {
    let mut record = sample_record();
    // Remove every real city column and claim a city the schema never saw.
    for city in CITIES {
        record.remove(&format!("city_{city}"));
    }
    record.insert("city_Atlantis".into(), serde_json::Value::Bool(true));

    let result = example_service().predict(&[record]).unwrap();
    assert_eq!(result.predictions.len(), 1);
    assert!(result.errors.is_none());
}

// =============================================================================
// Batch guarantees
// =============================================================================

#[test]
fn prediction_count_matches_batch_minus_dropped() {
    let service = example_service();
    let mut missing_floors = sample_record();
    missing_floors.remove("floors");

    let batch = vec![
        sample_record(),
        missing_floors.clone(),
        sample_record(),
        missing_floors,
        sample_record(),
    ];
    let result = service.predict(&batch).unwrap();
    assert_eq!(result.predictions.len(), batch.len() - 2);
}

#[test]
fn dropped_records_do_not_affect_other_predictions() {
    let schema = king_county_schema();
    let service = PredictionService::new(
        schema,
        Box::new(toy_king_county_forest()),
        TargetTransform::Identity,
        "toy",
    )
    .unwrap();

    let mut small = sample_record();
    small.insert("sqft_living".into(), json!(900));
    let mut dropped = sample_record();
    dropped.remove("view");

    let alone = service.predict(&[sample_record(), small.clone()]).unwrap();
    let with_dropped = service
        .predict(&[sample_record(), dropped, small])
        .unwrap();

    assert_eq!(alone.predictions, with_dropped.predictions);
    // sqft_living 3660 with Enumclaw set vs 900 with Enumclaw set.
    assert_eq!(alone.predictions, vec![13.5, 12.5]);
}

#[test]
fn predictions_are_finite_floats() {
    let service = PredictionService::new(
        king_county_schema(),
        Box::new(toy_king_county_forest()),
        TargetTransform::Log,
        "toy",
    )
    .unwrap();
    let result = service.predict(&[sample_record()]).unwrap();
    assert!(result.predictions.iter().all(|p| p.is_finite()));
    assert_relative_eq!(result.predictions[0], 13.5f64.exp(), max_relative = 1e-12);
}

#[test]
fn type_errors_are_reported_alongside_surviving_predictions() {
    let mut bad = sample_record();
    bad.insert("condition".into(), json!("excellent"));

    let result = example_service().predict(&[bad, sample_record()]).unwrap();
    assert_eq!(result.predictions.len(), 1);

    let report = result.errors.unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report.errors()[0].record, 0);
    assert_eq!(report.errors()[0].field, "condition");
}

// =============================================================================
// Artifact round trip
// =============================================================================

#[test]
fn artifact_backed_service_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");

    let artifact = ModelArtifact::new(
        "kc-2024.2",
        king_county_schema(),
        TargetTransform::Identity,
        toy_king_county_forest(),
    )
    .unwrap();
    artifact.save(&path).unwrap();

    let service = PredictionService::from_artifact(ModelArtifact::load(&path).unwrap());
    assert_eq!(service.version(), "kc-2024.2");

    let result = service.predict(&[sample_record()]).unwrap();
    assert_eq!(result.predictions, vec![13.5]);
    assert_eq!(result.version, "kc-2024.2");
}

#[test]
fn response_wire_shape_matches_the_contract() {
    let result = example_service().predict(&[sample_record()]).unwrap();
    let body = serde_json::to_value(&result).unwrap();

    assert!(body.get("predictions").unwrap().is_array());
    assert!(body.get("errors").unwrap().is_null());
    assert_eq!(body.get("version").unwrap(), "0.3.1");

    let parsed: housecast::PredictionResult = serde_json::from_value(body).unwrap();
    assert_eq!(parsed, result);
}

#[test]
fn record_coercion_tolerates_documented_client_quirks() {
    // The documented example sends yr_renovated as a boolean and clients have
    // been seen sending numeric strings; both must coerce.
    let mut quirky = sample_record();
    quirky.insert("yr_built".into(), json!("1989"));
    quirky.insert("waterfront".into(), json!(false));

    let result = example_service().predict(&[quirky]).unwrap();
    assert!(result.errors.is_none());
    assert_eq!(result.predictions.len(), 1);
}
