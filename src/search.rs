use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::{Endpoints, ProviderConfig};
use crate::error::{Result, SearchError};
use crate::providers::{
    BingAdapter, DuckDuckGoAdapter, GoogleAdapter, ProviderAdapter, UpstreamRequest,
};
use crate::types::{Provider, SearchParams, SearchRequest, SearchResponse};

/// Validates search requests and dispatches each to exactly one provider.
#[derive(Clone, Debug)]
pub struct SearchRouter {
    http_client: Client,
    providers: ProviderConfig,
    endpoints: Endpoints,
}

/// Status and raw body of a completed upstream call.
struct UpstreamReply {
    status: u16,
    body: Vec<u8>,
}

impl UpstreamReply {
    fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl SearchRouter {
    pub fn new(http_client: Client, providers: ProviderConfig, endpoints: Endpoints) -> Self {
        Self {
            http_client,
            providers,
            endpoints,
        }
    }

    /// Entry point for raw, unvalidated parameters.
    pub async fn search(
        &self,
        query: Option<&str>,
        provider: Option<&str>,
        start: Option<&str>,
    ) -> Result<SearchResponse> {
        let request = SearchRequest::parse(query, provider, start)?;
        self.dispatch(&request).await
    }

    pub async fn search_params(&self, params: &SearchParams) -> Result<SearchResponse> {
        let request = SearchRequest::try_from(params)?;
        self.dispatch(&request).await
    }

    /// Runs a validated request against its provider. No retries, no fallback
    /// to another provider.
    pub async fn dispatch(&self, request: &SearchRequest) -> Result<SearchResponse> {
        info!(
            "Searching {} for: {} (start {})",
            request.provider, request.query, request.start
        );
        match request.provider {
            Provider::DuckDuckGo => {
                let adapter = DuckDuckGoAdapter::new(self.endpoints.duckduckgo.clone());
                self.run(&adapter, request).await
            }
            Provider::Google => {
                let adapter =
                    GoogleAdapter::new(self.endpoints.google.clone(), self.providers.google()?);
                self.run(&adapter, request).await
            }
            Provider::Bing => {
                let adapter = BingAdapter::new(self.endpoints.bing.clone(), self.providers.bing()?);
                self.run(&adapter, request).await
            }
        }
    }

    async fn run<A: ProviderAdapter>(
        &self,
        adapter: &A,
        request: &SearchRequest,
    ) -> Result<SearchResponse> {
        let provider = adapter.provider();
        let upstream = adapter.build_request(&request.query, request.start);
        let reply = self.send(provider, upstream).await?;

        if !reply.is_success() {
            warn!("{} returned status {}", provider, reply.status);
            let body = if A::FORWARDS_ERROR_BODY {
                let value: Value = serde_json::from_slice(&reply.body).map_err(|e| {
                    SearchError::UpstreamUnreachable(format!(
                        "{} error body is not JSON: {}",
                        provider, e
                    ))
                })?;
                Some(value)
            } else {
                None
            };
            return Err(SearchError::UpstreamRejected {
                provider,
                status: reply.status,
                body,
            });
        }

        let payload: A::Payload = serde_json::from_slice(&reply.body).map_err(|e| {
            SearchError::UpstreamUnreachable(format!(
                "Failed to parse {} response: {}",
                provider, e
            ))
        })?;

        let page = adapter.normalize(payload);
        debug!("{} returned {} results", provider, page.items.len());
        Ok(SearchResponse::new(provider, page))
    }

    async fn send(&self, provider: Provider, upstream: UpstreamRequest) -> Result<UpstreamReply> {
        debug!(
            "{} request: {}{}",
            provider,
            upstream.url.origin().ascii_serialization(),
            upstream.url.path()
        );

        let mut builder = self
            .http_client
            .get(upstream.url)
            .header("Accept", "application/json");
        for (name, value) in upstream.headers {
            builder = builder.header(name, value);
        }

        let response = builder.send().await.map_err(|e| {
            SearchError::UpstreamUnreachable(format!(
                "Failed to send request to {}: {}",
                provider,
                e.without_url()
            ))
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            SearchError::UpstreamUnreachable(format!(
                "Failed to read {} response: {}",
                provider,
                e.without_url()
            ))
        })?;

        Ok(UpstreamReply {
            status,
            body: body.to_vec(),
        })
    }
}
