mod common;

use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use url_shortening::api::dto::shorten::ShortenResponse;
use url_shortening::domain::repositories::MappingRepository;

#[tokio::test]
async fn test_shorten_success() {
    let (state, repo) = common::create_memory_state();
    let server = common::make_server(state);

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "https://example.com/a/very/long/path" }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body = response.json::<ShortenResponse>();
    assert_eq!(body.short_code.len(), 6);
    assert!(body.short_code.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(
        body.short_url,
        format!("{}/shorten/{}", common::BASE_URL, body.short_code)
    );
    assert_eq!(response.header("location"), body.short_url.as_str());

    let stored = repo.get(&body.short_code).await.unwrap();
    assert_eq!(stored.url, "https://example.com/a/very/long/path");
    assert_eq!(stored.access_count, 0);
}

#[tokio::test]
async fn test_shorten_same_url_twice_gives_distinct_codes() {
    let (state, repo) = common::create_memory_state();
    let server = common::make_server(state);

    let first = server
        .post("/shorten")
        .json(&json!({ "url": "https://example.com" }))
        .await
        .json::<ShortenResponse>();
    let second = server
        .post("/shorten")
        .json(&json!({ "url": "https://example.com" }))
        .await
        .json::<ShortenResponse>();

    assert_ne!(first.short_code, second.short_code);
    assert_eq!(repo.len(), 2);
}

#[tokio::test]
async fn test_shorten_stores_url_verbatim() {
    let (state, repo) = common::create_memory_state();
    let server = common::make_server(state);

    let raw = "not-a-url but stored as is?x=1&y=ü";
    let body = server
        .post("/shorten")
        .json(&json!({ "url": raw }))
        .await
        .json::<ShortenResponse>();

    assert_eq!(repo.get(&body.short_code).await.unwrap().url, raw);
}

#[tokio::test]
async fn test_shorten_empty_url() {
    let (state, repo) = common::create_memory_state();
    let server = common::make_server(state);

    let response = server.post("/shorten").json(&json!({ "url": "" })).await;

    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
    assert!(repo.is_empty());
}

#[tokio::test]
async fn test_shorten_whitespace_url() {
    let (state, _repo) = common::create_memory_state();
    let server = common::make_server(state);

    let response = server.post("/shorten").json(&json!({ "url": "   " })).await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_shorten_url_with_line_break() {
    let (state, repo) = common::create_memory_state();
    let server = common::make_server(state);

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "https://example.com/a\nb" }))
        .await;

    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
    assert!(repo.is_empty());
}

#[tokio::test]
async fn test_shorten_missing_url_field() {
    let (state, _repo) = common::create_memory_state();
    let server = common::make_server(state);

    let response = server.post("/shorten").json(&json!({})).await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_shorten_malformed_json() {
    let (state, _repo) = common::create_memory_state();
    let server = common::make_server(state);

    let response = server
        .post("/shorten")
        .bytes("{\"url\": ".into())
        .content_type("application/json")
        .await;

    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_shorten_retries_past_taken_code() {
    let generator = Arc::new(common::CyclingGenerator::new(&["aaaa11", "aaaa11", "cccc33"]));
    let (state, repo) = common::create_memory_state_with(generator, 5);
    let server = common::make_server(state);

    let first = server
        .post("/shorten")
        .json(&json!({ "url": "https://one.example" }))
        .await
        .json::<ShortenResponse>();
    let second = server
        .post("/shorten")
        .json(&json!({ "url": "https://two.example" }))
        .await;

    second.assert_status(StatusCode::CREATED);
    assert_eq!(first.short_code, "aaaa11");
    assert_eq!(second.json::<ShortenResponse>().short_code, "cccc33");
    assert_eq!(repo.get("aaaa11").await.unwrap().url, "https://one.example");
    assert_eq!(repo.get("cccc33").await.unwrap().url, "https://two.example");
}

#[tokio::test]
async fn test_shorten_exhausted_code_space() {
    let generator = Arc::new(common::CyclingGenerator::new(&["aaaa11", "bbbb22"]));
    let (state, repo) = common::create_memory_state_with(generator, 5);
    let server = common::make_server(state);

    for url in ["https://one.example", "https://two.example"] {
        server
            .post("/shorten")
            .json(&json!({ "url": url }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let third = server
        .post("/shorten")
        .json(&json!({ "url": "https://three.example" }))
        .await;

    third.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let json = third.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "generation_failure");
    assert_eq!(json["error"]["details"]["attempts"], 5);
    assert_eq!(repo.len(), 2);
    assert_eq!(repo.get("aaaa11").await.unwrap().url, "https://one.example");
}
