//! Process configuration, resolved once at start from the environment.

use std::fmt;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

use crate::error::SearchError;
use crate::types::Provider;

pub const DEFAULT_DUCKDUCKGO_URL: &str = "https://api.duckduckgo.com/";
pub const DEFAULT_GOOGLE_URL: &str = "https://www.googleapis.com/customsearch/v1";
pub const DEFAULT_BING_URL: &str = "https://api.bing.microsoft.com/v7.0/search";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;
const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Google custom search credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct GoogleCredentials {
    pub api_key: String,
    pub cx: String,
}

/// Per-provider credentials. Absence is a configuration state, checked per request.
#[derive(Clone, Default)]
pub struct ProviderConfig {
    pub google_api_key: Option<String>,
    pub google_cx: Option<String>,
    pub bing_api_key: Option<String>,
}

impl ProviderConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            google_api_key: get("GOOGLE_API_KEY"),
            google_cx: get("GOOGLE_CX"),
            bing_api_key: get("BING_API_KEY"),
        }
    }

    pub fn google(&self) -> Result<GoogleCredentials, SearchError> {
        match (&self.google_api_key, &self.google_cx) {
            (Some(api_key), Some(cx)) => Ok(GoogleCredentials {
                api_key: api_key.clone(),
                cx: cx.clone(),
            }),
            _ => Err(SearchError::NotConfigured {
                provider: Provider::Google,
            }),
        }
    }

    pub fn bing(&self) -> Result<String, SearchError> {
        self.bing_api_key
            .clone()
            .ok_or(SearchError::NotConfigured {
                provider: Provider::Bing,
            })
    }

    pub fn is_configured(&self, provider: Provider) -> bool {
        match provider {
            Provider::DuckDuckGo => true,
            Provider::Google => self.google().is_ok(),
            Provider::Bing => self.bing().is_ok(),
        }
    }

    pub fn log_status(&self) {
        for provider in Provider::ALL {
            if self.is_configured(provider) {
                info!("{}: enabled", provider);
            } else {
                info!("{}: not configured", provider);
            }
        }
    }
}

fn mask(key: &Option<String>) -> &'static str {
    if key.is_some() {
        "***"
    } else {
        "<unset>"
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("google_api_key", &mask(&self.google_api_key))
            .field("google_cx", &mask(&self.google_cx))
            .field("bing_api_key", &mask(&self.bing_api_key))
            .finish()
    }
}

impl fmt::Debug for GoogleCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleCredentials").finish_non_exhaustive()
    }
}

/// Upstream endpoints. Overridable so tests and mirrors can point elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub duckduckgo: Url,
    pub google: Url,
    pub bing: Url,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            duckduckgo: Url::parse(DEFAULT_DUCKDUCKGO_URL).expect("valid default url"),
            google: Url::parse(DEFAULT_GOOGLE_URL).expect("valid default url"),
            bing: Url::parse(DEFAULT_BING_URL).expect("valid default url"),
        }
    }
}

impl Endpoints {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let pick = |key: &str, fallback: Url| match lookup(key) {
            Some(raw) => Url::parse(raw.trim()).unwrap_or_else(|e| {
                warn!("Ignoring {}={}: {}", key, raw, e);
                fallback
            }),
            None => fallback,
        };
        Self {
            duckduckgo: pick("DUCKDUCKGO_API_URL", defaults.duckduckgo),
            google: pick("GOOGLE_SEARCH_URL", defaults.google),
            bing: pick("BING_SEARCH_URL", defaults.bing),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// `None` leaves outbound calls unbounded.
    pub upstream_timeout: Option<Duration>,
    pub body_limit: usize,
    pub providers: ProviderConfig,
    pub endpoints: Endpoints,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            upstream_timeout: Some(Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS)),
            body_limit: DEFAULT_BODY_LIMIT,
            providers: ProviderConfig::default(),
            endpoints: Endpoints::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|p| p.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let upstream_timeout = match lookup("UPSTREAM_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
        {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => Some(Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS)),
        };

        Self {
            port,
            upstream_timeout,
            body_limit: DEFAULT_BODY_LIMIT,
            providers: ProviderConfig::from_lookup(&lookup),
            endpoints: Endpoints::from_lookup(&lookup),
        }
    }
}
