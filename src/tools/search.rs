//! Filtered web search
//!
//! [`SearchFilter`] wraps a [`SearchProvider`] (Tavily in production): it
//! excludes a file type from the query, clamps the result count, normalises
//! whatever shape the provider answered with and drops hits whose snippet
//! says the page is blocked. What is left is a list of URLs worth scraping.

use crate::tools::registry::Tool;
use crate::types::{AppError, Result, SearchResultEntry};
use crate::utils::toml_config::{ScoutConfig, SearchConfig};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Lower bound of the effective result count.
pub const MIN_RESULTS: i64 = 1;
/// Upper bound of the effective result count.
pub const MAX_RESULTS: i64 = 8;

/// Lowercase phrases that mark a result snippet as an access wall.
pub const BLOCKING_PHRASES: &[&str] = &[
    "403 forbidden",
    "access denied",
    "captcha",
    "has been denied",
    "not authorized",
    "verify you are a human",
];

/// `max(1, min(requested, 8))`
pub fn clamp_max_results(requested: i64) -> usize {
    requested.clamp(MIN_RESULTS, MAX_RESULTS) as usize
}

/// Append the `-filetype:` exclusion clause to a query.
pub fn refine_query(query: &str, excluded_filetype: &str) -> String {
    format!("{} -filetype:{}", query, excluded_filetype)
}

/// Accept either a bare array of hits or an object wrapping one under
/// `results`. Any other shape, and any hit without a string `url`, counts as
/// nothing.
pub fn normalize_results(raw: &Value) -> Vec<SearchResultEntry> {
    let items: &[Value] = match raw {
        Value::Array(items) => items,
        Value::Object(map) => map
            .get("results")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]),
        _ => &[],
    };

    items
        .iter()
        .filter_map(|item| {
            let url = item.get("url")?.as_str()?;
            let content = item
                .get("content")
                .and_then(Value::as_str)
                .map(str::to_string);
            Some(SearchResultEntry {
                url: url.to_string(),
                content,
            })
        })
        .collect()
}

/// True if the snippet contains a blocking phrase. A missing snippet never blocks.
pub fn is_blocked(entry: &SearchResultEntry) -> bool {
    entry.content.as_deref().is_some_and(|content| {
        let lowered = content.to_lowercase();
        BLOCKING_PHRASES.iter().any(|phrase| lowered.contains(phrase))
    })
}

/// URLs of the entries that survive [`is_blocked`], in provider order.
pub fn filter_urls(entries: &[SearchResultEntry]) -> Vec<String> {
    entries
        .iter()
        .filter(|entry| !is_blocked(entry))
        .map(|entry| entry.url.clone())
        .collect()
}

// ============= Providers =============

/// An external web search API.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Run `query` and return the provider's raw JSON answer.
    async fn search(&self, query: &str, max_results: usize) -> Result<Value>;
}

/// Tavily Search API client
pub struct TavilyProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl TavilyProvider {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &ScoutConfig) -> Result<Self> {
        let api_key = config.search_api_key()?;
        Self::new(&config.search.endpoint, api_key, config.search.timeout())
    }
}

#[async_trait]
impl SearchProvider for TavilyProvider {
    fn name(&self) -> &str {
        "tavily"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Value> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({
                "api_key": self.api_key,
                "query": query,
                "max_results": max_results
            }))
            .send()
            .await
            .map_err(|e| AppError::SearchProvider(format!("Tavily search failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::SearchProvider(format!(
                "Tavily search error: HTTP {}",
                status
            )));
        }

        match response.json::<Value>().await {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(error = %e, "Tavily returned a body that is not JSON");
                Ok(Value::Null)
            }
        }
    }
}

// ============= Filter =============

#[derive(Clone)]
pub struct SearchFilter {
    provider: Arc<dyn SearchProvider>,
    excluded_filetype: String,
}

impl SearchFilter {
    pub fn new(provider: Arc<dyn SearchProvider>, config: &SearchConfig) -> Self {
        Self {
            provider,
            excluded_filetype: config.excluded_filetype.clone(),
        }
    }

    /// Search and return the URLs of non-blocked results.
    pub async fn search(&self, query: &str, max_results: i64) -> Result<Vec<String>> {
        let refined = refine_query(query, &self.excluded_filetype);
        let effective = clamp_max_results(max_results);
        debug!(
            provider = self.provider.name(),
            query = %refined,
            requested = max_results,
            effective,
            "Submitting search"
        );

        let raw = self.provider.search(&refined, effective).await?;
        let entries = normalize_results(&raw);
        let urls = filter_urls(&entries);

        info!(
            returned = entries.len(),
            blocked = entries.len() - urls.len(),
            kept = urls.len(),
            "Search filtered"
        );
        Ok(urls)
    }
}

/// `web_search` tool
pub struct WebSearchTool {
    filter: SearchFilter,
    default_max_results: i64,
}

impl WebSearchTool {
    pub const NAME: &'static str = "web_search";

    pub fn new(filter: SearchFilter, default_max_results: i64) -> Self {
        Self {
            filter,
            default_max_results,
        }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Performs a web search and returns a list of relevant URLs, ready for scraping. \
         PDF files are excluded and results that look blocked (403, access denied, CAPTCHA) \
         are filtered out."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search term or question to look up online"
                },
                "max_results": {
                    "type": "integer",
                    "description": "Maximum number of URLs to return, clamped between 1 and 8",
                    "default": self.default_max_results
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let query = args
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AppError::InvalidInput("Missing 'query' parameter".to_string()))?;

        let max_results = match args.get("max_results") {
            None | Some(Value::Null) => self.default_max_results,
            Some(v) => v
                .as_i64()
                .or_else(|| v.as_f64().map(|f| f as i64))
                .ok_or_else(|| {
                    AppError::InvalidInput("'max_results' must be an integer".to_string())
                })?,
        };

        match self.filter.search(query, max_results).await {
            Ok(urls) => Ok(json!(urls)),
            Err(e) => {
                warn!(query, error = %e, "Web search failed");
                Ok(Value::String(format!(
                    "Error: Web search failed for query '{}'. Details: {}",
                    query, e
                )))
            }
        }
    }
}
