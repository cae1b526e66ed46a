use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use tower::ServiceExt;

use tim_validator::server::router;

fn fixture(name: &str) -> String {
    fs::read_to_string(Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)).unwrap()
}

async fn post(body: Value) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method("POST")
        .uri("/v1/timetable/validate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = router().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

#[tokio::test]
async fn validates_inline_files() {
    let (status, body) = post(json!({
        "instance": fixture("clash.tim"),
        "solution": fixture("clash.sln"),
    }))
    .await;
    assert_eq!(status, StatusCode::OK);

    // the bare report, not the CLI's {stats, report} wrapper
    let report: Value = serde_json::from_slice(&body).unwrap();
    assert!(report.get("report").is_none());
    assert_eq!(report["profile"], "extended");
    assert_eq!(report["hard"]["unsuitableSlots"], 1);
    assert_eq!(report["hard"]["studentClashes"], 1);
    assert_eq!(report["hard"]["roomClashes"], 1);
    assert_eq!(report["totalPenalty"], 3);
    assert_eq!(report["feasible"], false);
}

#[tokio::test]
async fn honours_requested_profile() {
    let (status, body) = post(json!({
        "profile": "basic",
        "instance": fixture("clash_basic.tim"),
        "solution": fixture("clash_basic.sln"),
    }))
    .await;
    assert_eq!(status, StatusCode::OK);
    let report: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(report["profile"], "basic");
    assert_eq!(report["hard"]["unsuitableSlots"], 0);
}

#[tokio::test]
async fn malformed_input_is_a_bad_request() {
    let (status, body) = post(json!({
        "instance": fixture("truncated.tim"),
        "solution": "0 0",
    }))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(String::from_utf8_lossy(&body).starts_with("Malformed instance"));
}
