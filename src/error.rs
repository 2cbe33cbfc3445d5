//! Error taxonomy for the search proxy and its mapping onto HTTP responses.
//!
//! Local failures (bad input, missing credentials) never reach an upstream
//! provider. Upstream failures are either forwarded with the provider's own
//! status or collapsed into a generic 502 without exposing internals.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::types::{ErrorResponse, Provider};

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Rejected locally before any adapter is selected.
    #[error("{0}")]
    BadRequest(String),

    /// The selected provider needs credentials that were not configured.
    #[error("{provider} not configured")]
    NotConfigured { provider: Provider },

    /// The provider answered with a non-success status.
    #[error("{provider} request failed with status {status}")]
    UpstreamRejected {
        provider: Provider,
        status: u16,
        body: Option<Value>,
    },

    /// The call never completed, or the provider's body was not usable JSON.
    #[error("upstream fetch failed: {0}")]
    UpstreamUnreachable(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;

impl SearchError {
    pub fn status(&self) -> StatusCode {
        match self {
            SearchError::BadRequest(_) => StatusCode::BAD_REQUEST,
            SearchError::NotConfigured { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            SearchError::UpstreamRejected { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            SearchError::UpstreamUnreachable(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// JSON body sent to the caller. Always carries an `error` field.
    pub fn body(&self) -> Value {
        match self {
            SearchError::BadRequest(_) | SearchError::NotConfigured { .. } => {
                json!(ErrorResponse::new(self.to_string()))
            }
            SearchError::UpstreamRejected { provider, body, .. } => match body {
                Some(Value::Object(map)) if map.contains_key("error") => Value::Object(map.clone()),
                // Every error body carries an `error` field; the upstream's own
                // body rides along unchanged under `upstream`.
                Some(other) => json!({
                    "error": format!("{provider} failed"),
                    "upstream": other,
                }),
                None => json!(ErrorResponse::new(format!("{provider} failed"))),
            },
            SearchError::UpstreamUnreachable(_) => json!(ErrorResponse::new(self.public_message())),
        }
    }

    /// Message safe to hand back to a caller. Transport detail stays in the logs.
    pub fn public_message(&self) -> String {
        match self {
            SearchError::UpstreamUnreachable(_) => "Upstream fetch failed".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        match &self {
            SearchError::BadRequest(_) => {}
            SearchError::NotConfigured { .. } => error!("Search error: {}", self),
            SearchError::UpstreamRejected { .. } => warn!("Search error: {}", self),
            SearchError::UpstreamUnreachable(_) => error!("Search error: {}", self),
        }
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_contract() {
        assert_eq!(
            SearchError::BadRequest("Missing q".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            SearchError::NotConfigured {
                provider: Provider::Google
            }
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            SearchError::UpstreamRejected {
                provider: Provider::Bing,
                status: 429,
                body: None
            }
            .status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            SearchError::UpstreamUnreachable("connection reset".into()).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn not_configured_names_provider() {
        let err = SearchError::NotConfigured {
            provider: Provider::Google,
        };
        assert_eq!(err.body(), json!({"error": "Google not configured"}));
    }

    #[test]
    fn upstream_error_body_passes_through() {
        let upstream = json!({"error": {"code": 403, "message": "quota exceeded"}});
        let err = SearchError::UpstreamRejected {
            provider: Provider::Google,
            status: 403,
            body: Some(upstream.clone()),
        };
        assert_eq!(err.body(), upstream);
    }

    #[test]
    fn upstream_body_without_error_field_is_wrapped() {
        let err = SearchError::UpstreamRejected {
            provider: Provider::Bing,
            status: 401,
            body: Some(json!({"message": "denied"})),
        };
        assert_eq!(
            err.body(),
            json!({"error": "Bing failed", "upstream": {"message": "denied"}})
        );
    }

    #[test]
    fn duckduckgo_rejection_has_generic_body() {
        let err = SearchError::UpstreamRejected {
            provider: Provider::DuckDuckGo,
            status: 503,
            body: None,
        };
        assert_eq!(err.body(), json!({"error": "DuckDuckGo failed"}));
    }

    #[test]
    fn unreachable_hides_detail() {
        let err = SearchError::UpstreamUnreachable("dns error: no such host".into());
        assert_eq!(err.body(), json!({"error": "Upstream fetch failed"}));
        assert!(err.to_string().contains("dns error"));
        assert_eq!(err.public_message(), "Upstream fetch failed");
    }

    #[test]
    fn public_message_keeps_local_errors() {
        let err = SearchError::NotConfigured {
            provider: Provider::Bing,
        };
        assert_eq!(err.public_message(), "Bing not configured");
        assert_eq!(
            SearchError::BadRequest("Missing q".into()).public_message(),
            "Missing q"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
    }
}
