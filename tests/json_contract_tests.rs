use forecast_chart::api::{
    CHART_MODEL_JSON_SCHEMA_V1, ChartModel, ChartModelJsonContractV1, ForecastResponseBody,
};
use forecast_chart::core::{HorizonRequest, ViewportTuning};

fn sample_chart() -> ChartModel {
    let body = ForecastResponseBody {
        prediction: vec![6_000.0, 7_000.0, 8_000.0],
        status: "success".to_owned(),
        days_predicted: Some(3),
    };
    ChartModel::from_response(
        HorizonRequest::new(3).expect("valid horizon"),
        &body,
        ViewportTuning::default(),
    )
    .expect("chart model")
}

#[test]
fn contract_v1_wraps_chart_with_schema_version() {
    let chart = sample_chart();
    let json = chart.to_json_contract_v1_pretty().expect("serialize");

    let payload: ChartModelJsonContractV1 = serde_json::from_str(&json).expect("parse wrapper");
    assert_eq!(payload.schema_version, CHART_MODEL_JSON_SCHEMA_V1);
    assert_eq!(payload.chart, chart);

    let value: serde_json::Value = serde_json::from_str(&json).expect("parse value");
    assert_eq!(value["chart"]["horizon"], 3);
    assert_eq!(value["chart"]["series"]["labels"][0], "Day 1");
    assert_eq!(value["chart"]["axis"]["label_count_y"], 6);
}

#[test]
fn compat_loader_accepts_wrapper_and_bare_model() {
    let chart = sample_chart();

    let wrapped = chart.to_json_contract_v1_pretty().expect("serialize wrapper");
    assert_eq!(ChartModel::from_json_compat_str(&wrapped).expect("wrapper"), chart);

    let bare = serde_json::to_string(&chart).expect("serialize bare");
    assert_eq!(ChartModel::from_json_compat_str(&bare).expect("bare"), chart);
}

#[test]
fn compat_loader_rejects_unknown_schema_version() {
    let payload = ChartModelJsonContractV1 {
        schema_version: 99,
        chart: sample_chart(),
    };
    let json = serde_json::to_string(&payload).expect("serialize");

    let err = ChartModel::from_json_compat_str(&json).expect_err("unsupported version");
    assert!(err.to_string().contains("unsupported chart model schema version"));
}

#[test]
fn compat_loader_rejects_inconsistent_model() {
    let mut value = serde_json::to_value(sample_chart()).expect("to value");
    value["series"]["labels"] = serde_json::json!(["Day 1"]);
    let json = serde_json::to_string(&value).expect("serialize");

    assert!(ChartModel::from_json_compat_str(&json).is_err());
}

#[test]
fn compat_loader_rejects_garbage() {
    assert!(ChartModel::from_json_compat_str("not json").is_err());
    assert!(ChartModel::from_json_compat_str("{}").is_err());
}

#[test]
fn contract_export_rejects_non_finite_values() {
    let body = ForecastResponseBody {
        prediction: vec![6_000.0, f64::NAN, 8_000.0],
        status: "success".to_owned(),
        days_predicted: Some(3),
    };
    let chart = ChartModel::from_response(
        HorizonRequest::new(3).expect("valid horizon"),
        &body,
        ViewportTuning::default(),
    )
    .expect("chart model");

    let err = chart
        .to_json_contract_v1_pretty()
        .expect_err("NaN has no JSON form");
    assert!(err.to_string().contains("non-finite value NaN at day index 1"));
}
