//! End-to-end tests for the `edgesim` binary against a mock algorithm service.

use std::collections::HashMap;
use std::sync::mpsc;

use assert_cmd::Command;
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use predicates::prelude::*;
use serde_json::{json, Value};

async fn run_algorithm(
    Path(name): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    if name == "BROKEN" || !query.contains_key("lamda_low") {
        return (StatusCode::INTERNAL_SERVER_ERROR, "missing lamda_low").into_response();
    }
    Json(json!({
        "avg_total": [4.0, 3.5],
        "avg_delay": [1.0, 0.9],
        "avg_energy": [0.2, 0.2],
        "avg_battery": [0.1, 0.1],
        "avg_backup": [0.0, 0.3],
    }))
    .into_response()
}

async fn get_overview(Query(query): Query<HashMap<String, String>>) -> impl IntoResponse {
    let names = query.get("algo_names").cloned().unwrap_or_default();
    let body: serde_json::Map<String, Value> = names
        .split(',')
        .enumerate()
        .map(|(i, name)| (name.to_string(), json!({ "avg_total": [i as f64 + 1.0] })))
        .collect();
    Json(Value::Object(body))
}

/// Serve the mock on its own runtime thread; returns its base URL.
fn spawn_service() -> String {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async move {
            let app = Router::new()
                .route("/run_algorithm/{name}", get(run_algorithm))
                .route("/get_overview", get(get_overview));
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });
    format!("http://{}", rx.recv().unwrap())
}

fn edgesim() -> Command {
    let mut cmd = Command::cargo_bin("edgesim").unwrap();
    cmd.env_remove("EDGESIM_API_ROOT").env_remove("EDGESIM_TIMEOUT_SECS");
    cmd
}

#[test]
fn test_catalog_lists_every_section() {
    edgesim()
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("Set up environment parameters"))
        .stdout(predicate::str::contains("Set up algorithm parameters"))
        .stdout(predicate::str::contains("lamda_low / lamda_high"))
        .stdout(predicate::str::contains("PPO, DQN, A2C, SAC, TRPO"));
}

#[test]
fn test_catalog_json_is_parseable() {
    let output = edgesim().args(["catalog", "--json"]).output().unwrap();
    assert!(output.status.success());
    let catalog: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(catalog["algorithms"].as_array().unwrap().len(), 5);
    assert_eq!(catalog["environment"].as_array().unwrap().len(), 12);
    assert_eq!(catalog["algorithm"].as_array().unwrap().len(), 5);
}

#[test]
fn test_run_prints_summary() {
    let root = spawn_service();
    edgesim()
        .args(["run", "PPO", "--api-root", &root])
        .args(["-p", "lamda_low=20", "-p", "lamda_high=40"])
        .args(["-p", "h_low=0.03", "-p", "h_high=0.05"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Running PPO algorithm result"))
        .stdout(predicate::str::contains("3.5000"));
}

#[test]
fn test_run_json_and_html_outputs() {
    let root = spawn_service();
    let dir = tempfile::tempdir().unwrap();
    let html = dir.path().join("ppo.html");
    let params = dir.path().join("params.yaml");
    std::fs::write(&params, "lamda_low: 20\nlamda_high: 40\nh_low: 0.03\nh_high: 0.05\n").unwrap();

    let output = edgesim()
        .args(["run", "PPO", "--json", "--api-root", &root])
        .arg("--params-file")
        .arg(&params)
        .arg("--html")
        .arg(&html)
        .output()
        .unwrap();
    assert!(output.status.success());

    let outcome: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(outcome["mode"], "single");
    assert_eq!(outcome["result"]["costs"]["avg_backup"], json!([0.0, 0.3]));

    let page = std::fs::read_to_string(&html).unwrap();
    assert!(page.contains("Plotly.newPlot"));
}

#[test]
fn test_overview_compares_algorithms() {
    let root = spawn_service();
    edgesim()
        .args(["overview", "PPO,SAC", "--api-root", &root])
        .assert()
        .success()
        .stdout(predicate::str::contains("Running PPO,SAC algorithm result"))
        .stdout(predicate::str::contains("SAC"))
        .stdout(predicate::str::contains("2.0000"));
}

#[test]
fn test_service_error_exits_nonzero() {
    let root = spawn_service();
    edgesim()
        .args(["run", "PPO", "--api-root", &root])
        .assert()
        .failure()
        .stderr(predicate::str::contains("500"));
}

#[test]
fn test_unknown_parameter_is_rejected() {
    edgesim()
        .args(["run", "PPO", "--api-root", "http://127.0.0.1:9"])
        .args(["-p", "learning_rate=0.1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("learning_rate"));
}

#[test]
fn test_missing_api_root_fails() {
    edgesim()
        .args(["run", "PPO"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}
