use crate::helpers::{daily_observations, observation, spawn_app, MockClimateAccess};
use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;

fn pooled_observations() -> Vec<climate::Observation> {
    vec![
        observation("USC00519397", "2016-12-31", Some(60.0), None),
        observation("USC00519397", "2017-01-01", Some(70.0), Some(0.1)),
        observation("USC00513117", "2017-01-01", Some(80.0), Some(0.2)),
        observation("USC00519397", "2017-01-02", Some(75.0), None),
        observation("USC00513117", "2017-01-02", None, Some(0.3)),
        observation("USC00519397", "2017-01-03", Some(66.0), None),
    ]
}

#[tokio::test]
async fn tobs_returns_busiest_station_last_year() {
    let mut climate_data = MockClimateAccess::new();
    climate_data.expect_observations().times(1).returning(|| {
        let mut observations =
            daily_observations("USC00519281", "2016-01-01", "2017-08-23", 72.0);
        observations.push(observation("USC00519281", "2017-08-20", None, Some(0.5)));
        // Later dates on a quieter station must not move the window
        observations.extend(daily_observations(
            "USC00519397",
            "2017-08-01",
            "2017-12-31",
            90.0,
        ));
        Ok(observations)
    });
    let test_app = spawn_app(Arc::new(climate_data)).await;

    let (status, json) = test_app.get_json("/api/v1.0/tobs").await;
    let readings = json.as_object().unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(readings.len(), 366);
    assert!(readings.contains_key("2016-08-23"));
    assert!(readings.contains_key("2017-08-23"));
    assert!(!readings.contains_key("2016-08-22"));
    assert!(!readings.contains_key("2017-08-24"));
    assert_eq!(readings["2017-08-20"], json!(72.0));
    assert!(readings.values().all(|v| v == &json!(72.0)));
}

#[tokio::test]
async fn tobs_on_empty_store_is_not_found() {
    let mut climate_data = MockClimateAccess::new();
    climate_data
        .expect_observations()
        .times(1)
        .returning(|| Ok(vec![]));
    let test_app = spawn_app(Arc::new(climate_data)).await;

    let (status, json) = test_app.get_json("/api/v1.0/tobs").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().is_some());
}

#[tokio::test]
async fn start_only_pools_stations_per_date() {
    let mut climate_data = MockClimateAccess::new();
    climate_data
        .expect_observations()
        .times(1)
        .returning(|| Ok(pooled_observations()));
    let test_app = spawn_app(Arc::new(climate_data)).await;

    let (status, json) = test_app.get_json("/api/v1.0/2017-01-01").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!([{
            "tobs_min": {"2017-01-01": 70.0, "2017-01-02": 75.0, "2017-01-03": 66.0},
            "tobs_avg": {"2017-01-01": 75.0, "2017-01-02": 75.0, "2017-01-03": 66.0},
            "tobs_max": {"2017-01-01": 80.0, "2017-01-02": 75.0, "2017-01-03": 66.0},
        }])
    );
}

#[tokio::test]
async fn start_end_is_inclusive() {
    let mut climate_data = MockClimateAccess::new();
    climate_data
        .expect_observations()
        .times(1)
        .returning(|| Ok(pooled_observations()));
    let test_app = spawn_app(Arc::new(climate_data)).await;

    let (status, json) = test_app.get_json("/api/v1.0/2016-12-31/2017-01-01").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!([{
            "tobs_min": {"2016-12-31": 60.0, "2017-01-01": 70.0},
            "tobs_avg": {"2016-12-31": 60.0, "2017-01-01": 75.0},
            "tobs_max": {"2016-12-31": 60.0, "2017-01-01": 80.0},
        }])
    );
}

#[tokio::test]
async fn flat_shape_lists_one_record_per_date() {
    let mut climate_data = MockClimateAccess::new();
    climate_data
        .expect_observations()
        .times(1)
        .returning(|| Ok(pooled_observations()));
    let test_app = spawn_app(Arc::new(climate_data)).await;

    let (status, json) = test_app
        .get_json("/api/v1.0/2017-01-01/2017-01-02?shape=flat")
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!([
            {"date": "2017-01-01", "tobs_min": 70.0, "tobs_avg": 75.0, "tobs_max": 80.0},
            {"date": "2017-01-02", "tobs_min": 75.0, "tobs_avg": 75.0, "tobs_max": 75.0},
        ])
    );
}

#[tokio::test]
async fn range_without_matches_is_empty_not_error() {
    let mut climate_data = MockClimateAccess::new();
    climate_data
        .expect_observations()
        .times(1)
        .returning(|| Ok(pooled_observations()));
    let test_app = spawn_app(Arc::new(climate_data)).await;

    let (status, json) = test_app.get_json("/api/v1.0/2018-01-01/2018-12-31").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!([{"tobs_min": {}, "tobs_avg": {}, "tobs_max": {}}])
    );
}

#[tokio::test]
async fn end_before_start_is_bad_request() {
    // Validation fails before the store is touched
    let climate_data = MockClimateAccess::new();
    let test_app = spawn_app(Arc::new(climate_data)).await;

    let (status, json) = test_app.get_json("/api/v1.0/2017-06-01/2017-01-01").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["field"], "end");
}

#[tokio::test]
async fn malformed_dates_are_bad_request() {
    let test_app = spawn_app(Arc::new(MockClimateAccess::new())).await;

    let (status, json) = test_app.get_json("/api/v1.0/01-01-2017").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["field"], "start");

    let (status, json) = test_app.get_json("/api/v1.0/2017-01-01/soon").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["field"], "end");
    assert!(json["error"].as_str().unwrap().contains("soon"));
}

#[tokio::test]
async fn repeated_requests_are_identical() {
    let mut climate_data = MockClimateAccess::new();
    climate_data
        .expect_observations()
        .times(2)
        .returning(|| Ok(pooled_observations()));
    let test_app = spawn_app(Arc::new(climate_data)).await;

    let (_, _, first) = test_app.get("/api/v1.0/2017-01-01").await;
    let (_, _, second) = test_app.get("/api/v1.0/2017-01-01").await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn unknown_shape_is_json_bad_request() {
    // Rejected before the store is touched
    let test_app = spawn_app(Arc::new(MockClimateAccess::new())).await;

    let (status, content_type, body) = test_app.get("/api/v1.0/2017-01-01?shape=wide").await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(content_type.starts_with("application/json"));
    assert_eq!(json["field"], "shape");
    assert!(json["error"].as_str().unwrap().contains("wide"));

    let (status, json) = test_app
        .get_json("/api/v1.0/2017-01-01/2017-01-02?shape=")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["field"], "shape");
}

#[tokio::test]
async fn signed_years_are_bad_request() {
    let test_app = spawn_app(Arc::new(MockClimateAccess::new())).await;

    let (status, json) = test_app.get_json("/api/v1.0/+2017-01-01").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["field"], "start");

    let (status, json) = test_app.get_json("/api/v1.0/2017-01-01/+2017-01-02").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["field"], "end");
}
