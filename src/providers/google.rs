//! Google Custom Search JSON API.

use serde::Deserialize;
use url::Url;

use super::{endpoint_with_params, ProviderAdapter, UpstreamRequest};
use crate::config::GoogleCredentials;
use crate::types::{Page, Provider, ResultItem};

#[derive(Debug, Default, Deserialize)]
pub struct CustomSearchResponse {
    #[serde(default)]
    pub items: Option<Vec<CustomSearchItem>>,
    #[serde(default)]
    pub queries: Option<Queries>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomSearchItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub display_link: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Queries {
    #[serde(default)]
    pub next_page: Option<Vec<QueryInfo>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryInfo {
    #[serde(default)]
    pub start_index: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct GoogleAdapter {
    endpoint: Url,
    credentials: GoogleCredentials,
}

impl GoogleAdapter {
    pub fn new(endpoint: Url, credentials: GoogleCredentials) -> Self {
        Self {
            endpoint,
            credentials,
        }
    }
}

impl ProviderAdapter for GoogleAdapter {
    type Payload = CustomSearchResponse;

    const FORWARDS_ERROR_BODY: bool = true;

    fn provider(&self) -> Provider {
        Provider::Google
    }

    fn build_request(&self, query: &str, start: u32) -> UpstreamRequest {
        let start = start.to_string();
        UpstreamRequest::get(endpoint_with_params(
            &self.endpoint,
            &[
                ("key", self.credentials.api_key.as_str()),
                ("cx", self.credentials.cx.as_str()),
                ("q", query),
                ("start", start.as_str()),
            ],
        ))
    }

    fn normalize(&self, payload: CustomSearchResponse) -> Page {
        let items = payload
            .items
            .unwrap_or_default()
            .into_iter()
            .filter_map(|item| {
                ResultItem::from_parts(item.title, item.snippet, item.link, item.display_link)
            })
            .collect();

        // A zero start index is treated the same as a missing one.
        let next_start = payload
            .queries
            .and_then(|q| q.next_page)
            .and_then(|pages| pages.into_iter().next())
            .and_then(|page| page.start_index)
            .filter(|start| *start > 0);

        Page { items, next_start }
    }
}
