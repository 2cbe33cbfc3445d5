//! Bookmarks, history, echo and tool endpoints.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{app, app_with_endpoints, credentials, delete, get, post_json, send};
use search_proxy::config::ProviderConfig;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn health_reports_service() {
    let server = MockServer::start().await;
    let reply = get(app(&server, ProviderConfig::default()), "/health").await;
    assert_eq!(reply.status, StatusCode::OK);
    let body = reply.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "search-proxy");
}

#[tokio::test]
async fn bookmarks_round_trip() {
    let server = MockServer::start().await;
    let app = app(&server, ProviderConfig::default());

    let empty = get(app.clone(), "/bookmarks").await;
    assert_eq!(empty.json(), json!({"items": []}));

    let created = post_json(
        app.clone(),
        "/bookmarks",
        json!({"title": "Rust", "url": "https://www.rust-lang.org/"}),
    )
    .await;
    assert_eq!(created.status, StatusCode::OK);
    let created = created.json();
    assert_eq!(created["title"], "Rust");
    assert_eq!(created["url"], "https://www.rust-lang.org/");
    assert!(created["ts"].as_i64().unwrap() > 0);
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 8);

    let untitled = post_json(app.clone(), "/bookmarks", json!({"url": "https://crates.io/"})).await;
    assert_eq!(untitled.json()["title"], "https://crates.io/");

    let listed = get(app.clone(), "/bookmarks").await.json();
    let items = listed["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["url"], "https://crates.io/");
    assert_eq!(items[1]["id"], id.as_str());

    let removed = delete(app.clone(), &format!("/bookmarks/{id}")).await;
    assert_eq!(removed.status, StatusCode::OK);
    assert_eq!(removed.json(), json!({"ok": true}));

    let again = delete(app.clone(), &format!("/bookmarks/{id}")).await;
    assert_eq!(again.json(), json!({"ok": true}));

    let listed = get(app, "/bookmarks").await.json();
    assert_eq!(listed["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn history_is_separate_from_bookmarks() {
    let server = MockServer::start().await;
    let app = app(&server, ProviderConfig::default());

    post_json(app.clone(), "/history", json!({"url": "https://example.com/"})).await;

    assert_eq!(get(app.clone(), "/history").await.json()["items"].as_array().unwrap().len(), 1);
    assert_eq!(get(app, "/bookmarks").await.json(), json!({"items": []}));
}

#[tokio::test]
async fn entries_need_a_url() {
    let server = MockServer::start().await;
    let app = app(&server, ProviderConfig::default());

    for uri in ["/bookmarks", "/history"] {
        let reply = post_json(app.clone(), uri, json!({"title": "No url"})).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.json(), json!({"error": "Missing url"}));
    }

    // No JSON content type at all is handled like an empty body.
    let reply = send(
        app,
        Request::post("/history").body(Body::from("url=x")).unwrap(),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.json(), json!({"error": "Missing url"}));
}

#[tokio::test]
async fn ai_echoes_prompt() {
    let server = MockServer::start().await;
    let app = app(&server, ProviderConfig::default());

    let reply = post_json(app.clone(), "/ai", json!({"prompt": "hello"})).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json(), json!({"reply": "Echo: hello"}));

    let reply = post_json(app, "/ai", json!({})).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.json(), json!({"error": "Missing prompt"}));
}

#[tokio::test]
async fn chat_acknowledges_message() {
    let server = MockServer::start().await;
    let app = app(&server, ProviderConfig::default());

    let reply = post_json(app.clone(), "/chat", json!({"message": "hi there"})).await;
    assert_eq!(reply.status, StatusCode::OK);
    let text = reply.json()["reply"].as_str().unwrap().to_string();
    assert!(text.starts_with("Server received \"hi there\" at "));
    assert!(text.ends_with("AM") || text.ends_with("PM"));

    let reply = post_json(app, "/chat", json!({"message": ""})).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.json(), json!({"error": "Missing message"}));
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let server = MockServer::start().await;
    let app = app(&server, ProviderConfig::default());
    let prompt = "x".repeat(2 * 1024 * 1024);

    let reply = post_json(app, "/ai", json!({ "prompt": prompt })).await;
    assert_eq!(reply.status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn mcp_lists_search_tool() {
    let server = MockServer::start().await;
    let reply = get(app(&server, ProviderConfig::default()), "/mcp/tools").await;
    assert_eq!(reply.status, StatusCode::OK);
    let body = reply.json();
    let tools = body["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0]["name"], "web_search");
    assert_eq!(tools[0]["input_schema"]["required"], json!(["query"]));
}

#[tokio::test]
async fn mcp_call_runs_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Heading": "Cats",
            "Abstract": "Feline",
            "AbstractURL": "http://example.com/cats"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let app = app(&server, ProviderConfig::default());

    let reply = post_json(
        app.clone(),
        "/mcp/call",
        json!({"name": "web_search", "arguments": {"query": "cats"}}),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    let body = reply.json();
    assert_eq!(body["is_error"], false);
    let text = body["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("**Cats**"));
    assert!(text.contains("http://example.com/cats"));

    let failed = post_json(
        app.clone(),
        "/mcp/call",
        json!({"name": "web_search", "arguments": {"query": "cats", "provider": "google"}}),
    )
    .await;
    assert_eq!(failed.status, StatusCode::OK);
    let failed = failed.json();
    assert_eq!(failed["is_error"], true);
    assert_eq!(failed["content"][0]["text"], "Search failed: Google not configured");

    let unknown = post_json(app, "/mcp/call", json!({"name": "scrape", "arguments": {}})).await;
    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown.json(), json!({"error": "Unknown tool: scrape"}));
}

#[tokio::test]
async fn mcp_call_hides_upstream_request_details() {
    let app = app_with_endpoints("http://127.0.0.1:9", credentials());

    let reply = post_json(
        app,
        "/mcp/call",
        json!({"name": "web_search", "arguments": {"query": "cats", "provider": "google"}}),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    let body = reply.json();
    assert_eq!(body["is_error"], true);
    let text = body["content"][0]["text"].as_str().unwrap();
    assert_eq!(text, "Search failed: Upstream fetch failed");
    assert!(!text.contains("google-key"));
    assert!(!text.contains("engine-id"));
}

#[tokio::test]
async fn mcp_call_with_malformed_body_is_json_bad_request() {
    let server = MockServer::start().await;
    let reply = send(
        app(&server, ProviderConfig::default()),
        Request::post("/mcp/call")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap(),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    let body = reply.json();
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request:"));
}
