//! End-to-end behavior of the /get endpoint.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use relay_sdk::{RelayClient, SdkError};

mod common;

const ORIGIN: &str = "https://app.example";

fn sdk(relay: &common::TestRelay) -> RelayClient {
    RelayClient::with_client(common::client(), &relay.base()).with_origin(ORIGIN)
}

#[tokio::test]
async fn test_relays_body_type_and_status() {
    let backend = common::start_mock_backend("hello upstream").await;
    let relay = common::start_relay(common::test_config()).await;
    let target = format!("http://{}/page", backend);

    let res = common::client()
        .get(relay.url("/get"))
        .query(&[("url", target.as_str())])
        .header("Origin", ORIGIN)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
    assert_eq!(res.headers()["content-type"], "application/json");
    assert!(res.headers().contains_key("x-request-id"));

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "contents": "hello upstream",
            "status": {
                "url": target,
                "content_type": "text/plain",
                "http_code": 200
            }
        })
    );
}

#[tokio::test]
async fn test_upstream_error_status_is_reported_not_raised() {
    let backend = common::start_programmable_backend(|| async {
        (404, "text/html", "<h1>gone</h1>".to_string())
    })
    .await;
    let relay = common::start_relay(common::test_config()).await;

    let payload = sdk(&relay)
        .get(&format!("http://{}/missing", backend))
        .await
        .unwrap();
    assert_eq!(payload.contents, "<h1>gone</h1>");
    assert_eq!(payload.status.http_code, 404);
    assert_eq!(payload.status.content_type, "text/html");
}

#[tokio::test]
async fn test_jsonp_wraps_payload() {
    let backend = common::start_mock_backend("hello").await;
    let relay = common::start_relay(common::test_config()).await;
    let target = format!("http://{}/", backend);

    let res = common::client()
        .get(relay.url("/get"))
        .query(&[("url", target.as_str()), ("callback", "cb")])
        .header("Origin", ORIGIN)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "text/javascript");

    let expected = format!(
        r#"cb({{"contents":"hello","status":{{"url":"{target}","content_type":"text/plain","http_code":200}}}})"#
    );
    assert_eq!(res.text().await.unwrap(), expected);
}

#[tokio::test]
async fn test_sdk_jsonp_matches_raw() {
    let backend = common::start_mock_backend("x").await;
    let relay = common::start_relay(common::test_config()).await;

    let script = sdk(&relay)
        .get_jsonp(&format!("http://{}/", backend), "handle")
        .await
        .unwrap();
    assert!(script.starts_with(r#"handle({"contents":"x","#));
    assert!(script.ends_with("})"));
}

#[tokio::test]
async fn test_options_preflight() {
    let relay = common::start_relay(common::test_config()).await;

    let res = common::client()
        .request(reqwest::Method::OPTIONS, relay.url("/get"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
    assert_eq!(res.headers()["access-control-allow-methods"], "GET, OPTIONS");
    assert!(res.text().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_other_methods_rejected() {
    let relay = common::start_relay(common::test_config()).await;

    for method in [reqwest::Method::POST, reqwest::Method::PUT, reqwest::Method::DELETE] {
        let res = common::client()
            .request(method, relay.url("/get?url=http://example.com"))
            .header("Origin", ORIGIN)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(res.headers()["access-control-allow-origin"], "*");
    }
    assert_eq!(relay.governor.tracked_keys(), 0);
}

#[tokio::test]
async fn test_missing_url_never_fetches() {
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();
    let _backend = common::start_programmable_backend(move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            (200, "text/plain", "unexpected".to_string())
        }
    })
    .await;
    let relay = common::start_relay(common::test_config()).await;

    for path in ["/get", "/get?url=", "/get?callback=cb"] {
        let res = common::client()
            .get(relay.url(path))
            .header("Origin", ORIGIN)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(res.headers()["access-control-allow-origin"], "*");
        assert_eq!(res.text().await.unwrap(), "URL parameter is required.");
    }

    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert_eq!(relay.governor.tracked_keys(), 0);
}

#[tokio::test]
async fn test_missing_origin_rejected_by_default() {
    let backend = common::start_mock_backend("hello").await;
    let relay = common::start_relay(common::test_config()).await;

    let err = RelayClient::with_client(common::client(), &relay.base())
        .get(&format!("http://{}/", backend))
        .await
        .unwrap_err();

    match err {
        SdkError::Status { code, body } => {
            assert_eq!(code, 400);
            assert_eq!(body, "Origin header is required.");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_missing_origin_allowed_when_lenient() {
    let backend = common::start_mock_backend("hello").await;
    let mut config = common::test_config();
    config.identity.require_origin = false;
    let relay = common::start_relay(config).await;

    let payload = RelayClient::with_client(common::client(), &relay.base())
        .get(&format!("http://{}/", backend))
        .await
        .unwrap();
    assert_eq!(payload.contents, "hello");
}

#[tokio::test]
async fn test_unreachable_upstream_is_generic_500() {
    let relay = common::start_relay(common::test_config()).await;

    let res = common::client()
        .get(relay.url("/get"))
        .query(&[("url", "http://127.0.0.1:1/")])
        .header("Origin", ORIGIN)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = res.text().await.unwrap();
    assert_eq!(body, "Error while processing the request.");
    assert!(!body.to_lowercase().contains("refused"));
}

#[tokio::test]
async fn test_static_files_served_outside_get() {
    let dir = std::env::temp_dir().join(format!("cors-relay-static-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.html"), "<h1>relay</h1>").unwrap();

    let mut config = common::test_config();
    config.listener.static_dir = dir.clone();
    let relay = common::start_relay(config).await;

    let res = common::client().get(relay.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "<h1>relay</h1>");

    let res = common::client()
        .get(relay.url("/nope.txt"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    std::fs::remove_dir_all(&dir).unwrap_or_default();
}
