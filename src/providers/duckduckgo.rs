//! DuckDuckGo instant-answer API. No credentials, no pagination.

use serde::Deserialize;
use url::Url;

use super::{endpoint_with_params, ProviderAdapter, UpstreamRequest};
use crate::types::{Page, Provider, ResultItem};

/// Upper bound on items returned for one instant-answer lookup.
pub const MAX_ITEMS: usize = 10;

/// Url used by the heading item when the answer has no abstract link.
pub const PLACEHOLDER_URL: &str = "#";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstantAnswer {
    #[serde(default)]
    pub heading: Option<String>,
    #[serde(rename = "Abstract", default)]
    pub r#abstract: Option<String>,
    #[serde(rename = "AbstractURL", default)]
    pub abstract_url: Option<String>,
    #[serde(default)]
    pub related_topics: Option<Vec<RelatedTopic>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Topic {
    #[serde(rename = "Text", default)]
    pub text: Option<String>,
    #[serde(rename = "FirstURL", default)]
    pub first_url: Option<String>,
}

/// An entry of `RelatedTopics`: either a named group of sub-topics or a
/// single topic. Anything else is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RelatedTopic {
    Group {
        #[serde(rename = "Topics")]
        topics: Vec<serde_json::Value>,
    },
    Single(Topic),
    Other(serde_json::Value),
}

impl RelatedTopic {
    /// Expands a group one level; nested groups inside a group are not descended.
    fn flatten(self) -> Vec<Topic> {
        match self {
            RelatedTopic::Group { topics } => topics
                .into_iter()
                .filter_map(|t| serde_json::from_value::<Topic>(t).ok())
                .collect(),
            RelatedTopic::Single(topic) => vec![topic],
            RelatedTopic::Other(_) => Vec::new(),
        }
    }
}

impl Topic {
    /// Topics need both display text and a link to be listed.
    fn into_item(self) -> Option<ResultItem> {
        match (self.text, self.first_url) {
            (Some(text), Some(url)) if !text.is_empty() && !url.is_empty() => Some(ResultItem {
                title: text,
                snippet: String::new(),
                url,
                display_url: None,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DuckDuckGoAdapter {
    endpoint: Url,
}

impl DuckDuckGoAdapter {
    pub fn new(endpoint: Url) -> Self {
        Self { endpoint }
    }
}

impl ProviderAdapter for DuckDuckGoAdapter {
    type Payload = InstantAnswer;

    const FORWARDS_ERROR_BODY: bool = false;

    fn provider(&self) -> Provider {
        Provider::DuckDuckGo
    }

    fn build_request(&self, query: &str, _start: u32) -> UpstreamRequest {
        UpstreamRequest::get(endpoint_with_params(
            &self.endpoint,
            &[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ],
        ))
    }

    fn normalize(&self, payload: InstantAnswer) -> Page {
        let primary = payload
            .heading
            .filter(|h| !h.is_empty())
            .map(|heading| ResultItem {
                title: heading,
                snippet: payload.r#abstract.unwrap_or_default(),
                url: payload
                    .abstract_url
                    .filter(|u| !u.is_empty())
                    .unwrap_or_else(|| PLACEHOLDER_URL.to_string()),
                display_url: None,
            });

        let related = payload
            .related_topics
            .unwrap_or_default()
            .into_iter()
            .flat_map(RelatedTopic::flatten)
            .filter_map(Topic::into_item);

        let items = primary.into_iter().chain(related).take(MAX_ITEMS).collect();

        Page {
            items,
            next_start: None,
        }
    }
}
