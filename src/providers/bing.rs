//! Bing Web Search API (v7). Authenticated with a subscription-key header.

use serde::Deserialize;
use url::Url;

use super::{endpoint_with_params, ProviderAdapter, UpstreamRequest};
use crate::types::{Page, Provider, ResultItem};

pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSearchResponse {
    #[serde(default)]
    pub web_pages: Option<WebPages>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebPages {
    #[serde(default)]
    pub value: Option<Vec<WebPage>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebPage {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub display_url: Option<String>,
}

#[derive(Clone)]
pub struct BingAdapter {
    endpoint: Url,
    subscription_key: String,
}

impl std::fmt::Debug for BingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BingAdapter")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl BingAdapter {
    pub fn new(endpoint: Url, subscription_key: impl Into<String>) -> Self {
        Self {
            endpoint,
            subscription_key: subscription_key.into(),
        }
    }
}

impl ProviderAdapter for BingAdapter {
    type Payload = WebSearchResponse;

    const FORWARDS_ERROR_BODY: bool = true;

    fn provider(&self) -> Provider {
        Provider::Bing
    }

    // Bing pages with offset/count; only the first page is requested.
    fn build_request(&self, query: &str, _start: u32) -> UpstreamRequest {
        UpstreamRequest::get(endpoint_with_params(&self.endpoint, &[("q", query)]))
            .with_header(SUBSCRIPTION_KEY_HEADER, self.subscription_key.clone())
    }

    fn normalize(&self, payload: WebSearchResponse) -> Page {
        let items = payload
            .web_pages
            .and_then(|pages| pages.value)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|page| {
                ResultItem::from_parts(page.name, page.snippet, page.url, page.display_url)
            })
            .collect();

        Page {
            items,
            next_start: None,
        }
    }
}
