use crate::tools::fetch::ContentFetcher;
use crate::tools::scraper::WebScraperTool;
use crate::tools::search::{SearchFilter, TavilyProvider, WebSearchTool};
use crate::types::{AppError, Result, ToolDefinition};
use crate::utils::toml_config::ScoutConfig;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// A named, independently invocable function exposed to agents.
///
/// Operational failures (unreachable host, HTTP error status, missing content
/// area, search provider failure) are returned as `"Error: ..."` text inside
/// the `Ok` value so the calling agent sees them.
///
/// The one exception is a call that violates the tool's own parameter schema,
/// such as a missing required argument or a wrongly typed one. That is
/// rejected with `Err(AppError::InvalidInput)` before any work is done, since
/// it is a fault in the caller rather than in the outside world.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters_schema(&self) -> Value;
    async fn execute(&self, args: Value) -> Result<Value>;
}

pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Create a registry with the research tools switched on in `config`.
    ///
    /// The search provider key is resolved here, once. A missing key is an
    /// error only if `web_search` is enabled.
    pub fn from_config(config: &ScoutConfig) -> Result<Self> {
        let mut registry = Self::new();

        if config.tool_enabled(WebScraperTool::NAME) {
            let fetcher = ContentFetcher::from_config(&config.fetch)?;
            registry.register(Arc::new(WebScraperTool::new(fetcher)));
        }

        if config.tool_enabled(WebSearchTool::NAME) {
            let provider = TavilyProvider::from_config(config)?;
            let filter = SearchFilter::new(Arc::new(provider), &config.search);
            registry.register(Arc::new(WebSearchTool::new(
                filter,
                config.search.default_max_results,
            )));
        }

        info!(tools = ?registry.tool_names(), "Tool registry initialised");
        Ok(registry)
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        debug!(tool = tool.name(), "Registering tool");
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get_tool_definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<ToolDefinition> = self
            .tools
            .values()
            .map(|tool| ToolDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.parameters_schema(),
            })
            .collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    /// Definition of a single tool, if registered
    pub fn get_tool_definition(&self, name: &str) -> Option<ToolDefinition> {
        self.tools.get(name).map(|tool| ToolDefinition {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            parameters: tool.parameters_schema(),
        })
    }

    pub async fn execute(&self, name: &str, args: Value) -> Result<Value> {
        if let Some(tool) = self.tools.get(name) {
            tool.execute(args).await
        } else {
            Err(AppError::NotFound(format!("Tool not found: {}", name)))
        }
    }

    /// Get a sorted list of all registered tool names
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a tool is registered
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }
}
