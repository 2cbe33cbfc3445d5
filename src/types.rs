use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SearchError;

/// Upstream search providers the proxy knows how to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    DuckDuckGo,
    Google,
    Bing,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::DuckDuckGo, Provider::Google, Provider::Bing];

    /// Wire name, as accepted in the `provider` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::DuckDuckGo => "duckduckgo",
            Provider::Google => "google",
            Provider::Bing => "bing",
        }
    }

    /// Case-insensitive lookup; unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Provider::DuckDuckGo => "DuckDuckGo",
            Provider::Google => "Google",
            Provider::Bing => "Bing",
        })
    }
}

/// Query string of `GET /search`, exactly as received.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub provider: Option<String>,
    pub start: Option<String>,
}

/// A validated search request. Only values of this type reach the adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub provider: Provider,
    pub start: u32,
}

impl SearchRequest {
    pub const DEFAULT_START: u32 = 1;

    /// Validates raw parameters. The query is checked before the provider name;
    /// a missing or empty provider means DuckDuckGo. A missing, non-numeric or
    /// zero `start` falls back to 1.
    pub fn parse(
        query: Option<&str>,
        provider: Option<&str>,
        start: Option<&str>,
    ) -> Result<Self, SearchError> {
        let query = query.map(str::trim).unwrap_or_default();
        if query.is_empty() {
            return Err(SearchError::BadRequest("Missing q".into()));
        }

        let provider = match provider.map(str::trim).filter(|p| !p.is_empty()) {
            None => Provider::DuckDuckGo,
            Some(name) => Provider::from_name(name)
                .ok_or_else(|| SearchError::BadRequest("Unknown provider".into()))?,
        };

        let start = start
            .and_then(|s| s.trim().parse::<u32>().ok())
            .filter(|s| *s >= 1)
            .unwrap_or(Self::DEFAULT_START);

        Ok(Self {
            query: query.to_string(),
            provider,
            start,
        })
    }
}

impl TryFrom<&SearchParams> for SearchRequest {
    type Error = SearchError;

    fn try_from(params: &SearchParams) -> Result<Self, Self::Error> {
        Self::parse(
            params.q.as_deref(),
            params.provider.as_deref(),
            params.start.as_deref(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultItem {
    pub title: String,
    pub snippet: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_url: Option<String>,
}

impl ResultItem {
    /// Builds an item from optional upstream fields.
    ///
    /// Returns `None` when the url is missing or empty; such entries are dropped
    /// rather than propagated. A missing title falls back to the url.
    pub fn from_parts(
        title: Option<String>,
        snippet: Option<String>,
        url: Option<String>,
        display_url: Option<String>,
    ) -> Option<Self> {
        let url = url.filter(|u| !u.is_empty())?;
        let title = title.filter(|t| !t.is_empty()).unwrap_or_else(|| url.clone());
        Some(Self {
            title,
            snippet: snippet.unwrap_or_default(),
            url,
            display_url: display_url.filter(|d| !d.is_empty()),
        })
    }
}

/// One page of normalized results, as produced by a provider adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub items: Vec<ResultItem>,
    pub next_start: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub provider: Provider,
    pub items: Vec<ResultItem>,
    pub next_start: Option<u32>,
}

impl SearchResponse {
    pub fn new(provider: Provider, page: Page) -> Self {
        Self {
            provider,
            items: page.items,
            next_start: page.next_start,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AiRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReplyResponse {
    pub reply: String,
}
