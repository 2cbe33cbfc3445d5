#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use search_proxy::{
    api,
    config::{Endpoints, ProviderConfig, ServerConfig},
    AppState,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use url::Url;
use wiremock::MockServer;

pub const GOOGLE_PATH: &str = "/customsearch/v1";
pub const BING_PATH: &str = "/v7.0/search";

pub fn credentials() -> ProviderConfig {
    ProviderConfig {
        google_api_key: Some("google-key".into()),
        google_cx: Some("engine-id".into()),
        bing_api_key: Some("bing-key".into()),
    }
}

/// Router whose upstream endpoints all point at `server`.
pub fn app(server: &MockServer, providers: ProviderConfig) -> Router {
    app_with_endpoints(&server.uri(), providers)
}

pub fn app_with_endpoints(base: &str, providers: ProviderConfig) -> Router {
    app_with_config(config_for(base, providers))
}

/// Default server settings with every upstream endpoint rooted at `base`.
pub fn config_for(base: &str, providers: ProviderConfig) -> ServerConfig {
    let base = Url::parse(base).expect("base uri");
    ServerConfig {
        providers,
        endpoints: Endpoints {
            duckduckgo: base.join("/").expect("join"),
            google: base.join(GOOGLE_PATH).expect("join"),
            bing: base.join(BING_PATH).expect("join"),
        },
        ..ServerConfig::default()
    }
}

pub fn app_with_config(config: ServerConfig) -> Router {
    let state = Arc::new(AppState::new(&config).expect("state"));
    api::router(state)
}

pub struct Reply {
    pub status: StatusCode,
    pub bytes: Vec<u8>,
}

impl Reply {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.bytes).expect("json body")
    }
}

pub async fn send(app: Router, request: Request<Body>) -> Reply {
    let response = app.oneshot(request).await.expect("infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body")
        .to_vec();
    Reply { status, bytes }
}

pub async fn get(app: Router, uri: &str) -> Reply {
    send(
        app,
        Request::get(uri).body(Body::empty()).expect("request"),
    )
    .await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Reply {
    let body = body.to_string();
    send(
        app,
        Request::post(uri)
            .header("content-type", "application/json")
            .header("content-length", body.len())
            .body(Body::from(body))
            .expect("request"),
    )
    .await
}

pub async fn delete(app: Router, uri: &str) -> Reply {
    send(
        app,
        Request::delete(uri).body(Body::empty()).expect("request"),
    )
    .await
}
