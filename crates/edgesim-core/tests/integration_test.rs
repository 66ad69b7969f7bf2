//! Integration tests for edgesim-core against a local mock algorithm service.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use edgesim_core::{
    http, Bound, ClientConfig, CostMetric, ParamForm, ParamSet, RunController, RunOutcome,
    Selection,
};
use serde_json::json;

type Seen = Arc<Mutex<Vec<(String, HashMap<String, String>)>>>;

async fn run_algorithm(
    State(seen): State<Seen>,
    Path(name): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    seen.lock().unwrap().push((format!("/run_algorithm/{name}"), query));
    if name == "BROKEN" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "KeyError: 'lamda_low'").into_response();
    }
    Json(json!({
        "avg_total": [4.0, 3.0],
        "avg_delay": [1.0, 1.5],
        "avg_energy": [3.0, 1.5],
        "avg_battery": [2.0, 1.0],
        "avg_backup": [1.0, 0.5],
    }))
    .into_response()
}

async fn overview(
    State(seen): State<Seen>,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let names: Vec<String> = query
        .get("algo_names")
        .map(|s| s.split(',').map(str::to_string).collect())
        .unwrap_or_default();
    seen.lock().unwrap().push(("/get_overview".to_string(), query));
    let body: serde_json::Map<String, serde_json::Value> = names
        .iter()
        .enumerate()
        .map(|(i, n)| (n.clone(), json!({ "avg_total": [i as f64, i as f64 + 1.0] })))
        .collect();
    Json(body)
}

async fn spawn_service() -> (String, Seen) {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route("/run_algorithm/{name}", get(run_algorithm))
        .route("/get_overview", get(overview))
        .with_state(seen.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), seen)
}

#[tokio::test]
async fn test_single_run_over_http() {
    let (root, seen) = spawn_service().await;
    let client = http::connect(&ClientConfig::new(root)).unwrap();

    let mut form = ParamForm::full();
    let params = form.mount(&ParamSet::new()).unwrap();
    let params = form.edit("Time slots", Bound::Value, "2", &params).unwrap();
    let params = form.edit("Workload (λ)", Bound::Low, "30", &params).unwrap();

    let mut controller = RunController::new(Selection::Single("PPO".into()));
    controller.set_params(params);
    let state = controller.run(&client).await;

    let Some(RunOutcome::Single { costs, .. }) = state.outcome() else {
        panic!("expected a single-run outcome, got {state:?}");
    };
    assert_eq!(costs.final_value(CostMetric::Total), Some(3.0));

    let seen = seen.lock().unwrap();
    let (path, query) = &seen[0];
    assert_eq!(path, "/run_algorithm/PPO");
    assert_eq!(query.get("time_slots").map(String::as_str), Some("2"));
    assert_eq!(query.get("lamda_low").map(String::as_str), Some("30"));
    assert!(!query.contains_key("lamda_high"));
    assert_eq!(query.get("batery_capacity").map(String::as_str), Some("2000"));
}

#[tokio::test]
async fn test_overview_over_http() {
    let (root, seen) = spawn_service().await;
    let client = http::connect(&ClientConfig::new(root)).unwrap();
    let params = ParamSet::new().with("verbose", "1").unwrap();

    let mut controller =
        RunController::new(Selection::Comparison(vec!["X".into(), "Y".into()]));
    controller.set_params(params);
    let state = controller.run(&client).await;

    let Some(RunOutcome::Comparison(result)) = state.outcome() else {
        panic!("expected a comparison outcome, got {state:?}");
    };
    assert_eq!(result.series(CostMetric::Total, "X"), Some(&[0.0, 1.0][..]));
    assert_eq!(result.series(CostMetric::Total, "Y"), Some(&[1.0, 2.0][..]));
    assert_eq!(result.series(CostMetric::Backup, "Y"), Some(&[][..]));

    let seen = seen.lock().unwrap();
    let (path, query) = &seen[0];
    assert_eq!(path, "/get_overview");
    assert_eq!(query.get("algo_names").map(String::as_str), Some("X,Y"));
    assert_eq!(query.get("verbose").map(String::as_str), Some("1"));
}

#[tokio::test]
async fn test_service_error_is_reported_not_raised() {
    let (root, _seen) = spawn_service().await;
    let client = http::connect(&ClientConfig::new(root)).unwrap();
    let mut controller = RunController::new(Selection::Single("BROKEN".into()));

    let state = controller.run(&client).await;
    let err = state.error().expect("run should have failed");
    assert!(!err.is_network());
    assert!(err.user_message().contains("HTTP 500"));
    assert!(!controller.is_busy());
}

#[tokio::test]
async fn test_unreachable_service_is_a_network_error() {
    // bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = http::connect(&ClientConfig::new(format!("http://{addr}"))).unwrap();
    let mut controller = RunController::new(Selection::Single("PPO".into()));
    let state = controller.run(&client).await;
    assert!(state.error().unwrap().is_network());
    assert!(!controller.is_busy());
}

#[tokio::test]
async fn test_relative_root_needs_a_base_url_outside_the_browser() {
    let client = http::connect(&ClientConfig::default()).unwrap();
    let err = client
        .run_algorithm("PPO", &ParamSet::new())
        .await
        .unwrap_err();
    assert!(matches!(err, edgesim_core::EdgesimError::Config(_)));
}
