//! HTTP contract tests against in-memory stores.
//!
//! No database needed: the router is driven with `oneshot` over
//! in-memory ports and the recording document backend.

use std::io::Write;
use std::sync::Arc;

use axum::body::Body;
use http_body_util::BodyExt;
use hyper::{Request, StatusCode};
use serde_json::{json, Value};
use tempfile::NamedTempFile;
use tower::ServiceExt;

use temperament_core::memory::{
    InMemoryReferenceStore, InMemoryResultStore, InMemoryTemplateStore, RecordingBackend,
};
use temperament_core::ports::TemplateStore;
use temperament_core::ReportService;
use temperament_server::router::build_router;

struct TestApp {
    app: axum::Router,
    templates: Arc<InMemoryTemplateStore>,
    _font: NamedTempFile,
}

fn build_test_app() -> TestApp {
    let mut font = NamedTempFile::new().unwrap();
    font.write_all(b"\x00\x01\x00\x00font").unwrap();
    let templates = Arc::new(InMemoryTemplateStore::new());
    let service = Arc::new(ReportService::new(
        Arc::new(InMemoryResultStore::new()),
        Arc::new(InMemoryReferenceStore::new()),
        templates.clone(),
        Arc::new(RecordingBackend::new(5)),
        font.path(),
    ));
    TestApp {
        app: build_router(service, None),
        templates,
        _font: font,
    }
}

fn answers() -> Vec<&'static str> {
    let mut a = vec!["B"; 11];
    a.extend(vec!["B"; 11]);
    a.extend(vec!["Gelo"; 20]);
    a
}

fn valid_payload() -> Value {
    json!({
        "usuario_id": "u-1",
        "nome": "Carla Dias",
        "email": "carla@example.com",
        "data_nascimento": "1995-01-31",
        "inicio": "14:00:00",
        "fim": "14:12:00",
        "respostas": answers(),
    })
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn post_json(app: &axum::Router, uri: &str, body: Value) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn get(app: &axum::Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn health_returns_ok() {
    let t = build_test_app();
    let response = get(&t.app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn submit_returns_201_with_id() {
    let t = build_test_app();
    let response = post_json(&t.app, "/salvar-resultado", valid_payload()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["message"], "Resultado salvo com sucesso!");
}

#[tokio::test]
async fn submit_with_wrong_answer_count_returns_400_with_fields() {
    let t = build_test_app();
    let mut payload = valid_payload();
    payload["respostas"] = json!(vec!["A"; 41]);
    payload.as_object_mut().unwrap().remove("nome");

    let response = post_json(&t.app, "/salvar-resultado", payload).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "validation_failed");
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "answers"]);
}

#[tokio::test]
async fn submit_malformed_json_returns_400() {
    let t = build_test_app();
    let response = t
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/salvar-resultado")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "invalid_input");
}

#[tokio::test]
async fn report_without_template_is_500_configuration() {
    let t = build_test_app();
    post_json(&t.app, "/salvar-resultado", valid_payload()).await;

    let response = get(&t.app, "/gerar-pdf/1").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "configuration");
}

#[tokio::test]
async fn report_for_unknown_id_is_404() {
    let t = build_test_app();
    t.templates.save_template("template_pt", b"%PDF").await.unwrap();

    let response = get(&t.app, "/gerar-pdf/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "not_found");
}

#[tokio::test]
async fn report_with_non_numeric_id_is_400() {
    let t = build_test_app();
    let response = get(&t.app, "/gerar-pdf/abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn report_download_headers() {
    let t = build_test_app();
    t.templates.save_template("template_pt", b"%PDF").await.unwrap();
    post_json(&t.app, "/salvar-resultado", valid_payload()).await;

    let response = get(&t.app, "/gerar-pdf/1").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "application/pdf"
    );
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=resultado.pdf"
    );
}

#[tokio::test]
async fn layout_preview_lists_instructions() {
    let t = build_test_app();
    post_json(&t.app, "/salvar-resultado", valid_payload()).await;

    let response = get(&t.app, "/gerar-pdf/1/layout?lang=en").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["page_count"], 5);
    let instructions = body["instructions"].as_array().unwrap();
    assert!(instructions
        .iter()
        .any(|i| i["op"] == "draw_text" && i["text"] == "Melancholic"));
    assert!(instructions
        .iter()
        .any(|i| i["op"] == "draw_image" && i["image"]["kind"] == "line"));
}
