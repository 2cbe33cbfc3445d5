//! Provider adapters.
//!
//! Each adapter knows one upstream: how to build its request and how to map its
//! JSON payload onto [`ResultItem`](crate::types::ResultItem)s. Adapters never
//! perform I/O themselves; [`crate::search::SearchRouter`] owns the network call.

pub mod bing;
pub mod duckduckgo;
pub mod google;

pub use bing::BingAdapter;
pub use duckduckgo::DuckDuckGoAdapter;
pub use google::GoogleAdapter;

use serde::de::DeserializeOwned;
use url::Url;

use crate::types::{Page, Provider};

/// Everything needed to issue one outbound GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    pub url: Url,
    pub headers: Vec<(&'static str, String)>,
}

impl UpstreamRequest {
    pub fn get(url: Url) -> Self {
        Self {
            url,
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// First value of a query parameter, decoded.
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }
}

pub trait ProviderAdapter: Send + Sync {
    /// Typed shape of a successful upstream body.
    type Payload: DeserializeOwned;

    /// Whether a failing upstream's JSON body is forwarded to the caller.
    const FORWARDS_ERROR_BODY: bool;

    fn provider(&self) -> Provider;

    fn build_request(&self, query: &str, start: u32) -> UpstreamRequest;

    /// Maps a parsed payload onto canonical items, in upstream order.
    fn normalize(&self, payload: Self::Payload) -> Page;
}

/// Joins a base endpoint with query parameters, keeping any already present.
pub(crate) fn endpoint_with_params(endpoint: &Url, params: &[(&str, &str)]) -> Url {
    let mut url = endpoint.clone();
    url.query_pairs_mut().extend_pairs(params);
    url
}
