use std::collections::HashMap;

use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with, Fixture, FRIEND3};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- fixtures ---

#[tokio::test]
async fn serves_every_bundled_fixture() {
    for file in ["friend1.json", "friend2.json", "friend3.json", "friend4.json", "man.json"] {
        let resp = app().oneshot(get(&format!("/{file}"))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "{file}");
        assert_eq!(
            resp.headers()[http::header::CONTENT_TYPE],
            "application/json",
            "{file}"
        );
        let body: serde_json::Value = body_json(resp).await;
        assert!(body["response"].is_array(), "{file}");
    }
}

#[tokio::test]
async fn fixture_body_is_served_verbatim() {
    let resp = app().oneshot(get("/friend3.json")).await.unwrap();
    let bytes = body_bytes(resp).await;
    assert_eq!(bytes, FRIEND3.as_bytes());
}

#[tokio::test]
async fn unknown_fixture_returns_404() {
    let resp = app().oneshot(get("/friend9.json")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn custom_fixture_set_is_served() {
    let files = HashMap::from([(
        "broken.json".to_string(),
        Fixture {
            status: 503,
            body: String::new(),
        },
    )]);
    let resp = app_with(files).oneshot(get("/broken.json")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(body_bytes(resp).await.is_empty());
}

// --- overrides ---

#[tokio::test]
async fn put_fixture_rejects_invalid_status() {
    let resp = app()
        .oneshot(json_request("PUT", "/__fixtures/friend1.json", r#"{"status":42}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn put_fixture_rejects_malformed_json() {
    let resp = app()
        .oneshot(json_request("PUT", "/__fixtures/friend1.json", r#"{"body":"x"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn override_and_request_log_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // override friend1 with a server error
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            "/__fixtures/friend1.json",
            r#"{"status":500,"body":""}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // friend1 now fails
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/friend1.json"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    // friend2 is untouched
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/friend2.json"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // a brand new fixture can be added
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            "/__fixtures/extra.json",
            r#"{"status":200,"body":"{\"response\":[]}"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/extra.json"))
        .await
        .unwrap();
    let body: serde_json::Value = body_json(resp).await;
    assert!(body["response"].as_array().unwrap().is_empty());

    // request log lists fixture reads only, in order
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/__requests"))
        .await
        .unwrap();
    let requests: Vec<String> = body_json(resp).await;
    assert_eq!(requests, vec!["/friend1.json", "/friend2.json", "/extra.json"]);
}
