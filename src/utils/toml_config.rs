//! TOML-based configuration for scout
//!
//! All runtime settings (HTTP fetch behaviour, the search provider, the model
//! backing the crew, per-tool switches and crew overrides) live in a single `scout.toml` file. The file is
//! read once at startup into a [`ScoutConfig`] that is then handed to the tools
//! that need it; nothing else in the crate reads the environment.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Root configuration structure loaded from scout.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoutConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub search: SearchConfig,

    /// Model every agent runs on unless overridden under `[agents.*]`
    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub supervisor: SupervisorConfig,

    /// Per-tool switches, keyed by tool name
    #[serde(default)]
    pub tools: HashMap<String, ToolConfig>,

    /// Crew member overrides, keyed by agent name
    #[serde(default)]
    pub agents: HashMap<String, AgentConfig>,
}

// ============= Logging Configuration =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// ============= Fetch Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_accept")]
    pub accept: String,
}

fn default_fetch_timeout() -> u64 {
    15
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36".to_string()
}

fn default_accept() -> String {
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8"
        .to_string()
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_fetch_timeout(),
            user_agent: default_user_agent(),
            accept: default_accept(),
        }
    }
}

// ============= Search Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Environment variable name containing the Tavily API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_max_results")]
    pub default_max_results: i64,

    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,

    /// File type excluded from every query (`-filetype:<this>`)
    #[serde(default = "default_excluded_filetype")]
    pub excluded_filetype: String,
}

fn default_api_key_env() -> String {
    "TAVILY_API_KEY".to_string()
}

fn default_search_endpoint() -> String {
    "https://api.tavily.com/search".to_string()
}

fn default_max_results() -> i64 {
    4
}

fn default_search_timeout() -> u64 {
    30
}

fn default_excluded_filetype() -> String {
    "pdf".to_string()
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            endpoint: default_search_endpoint(),
            default_max_results: default_max_results(),
            timeout_secs: default_search_timeout(),
            excluded_filetype: default_excluded_filetype(),
        }
    }
}

// ============= Model Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model name/identifier passed to the provider
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
        }
    }
}

// ============= Supervisor Configuration =============

/// What the supervisor hands back to the caller when the crew finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Every message exchanged by the crew
    FullHistory,
    /// Only each agent's final message
    LastMessage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupervisorConfig {
    /// Append a message to the history whenever control returns from a worker
    #[serde(default = "default_true")]
    pub add_handoff_back_messages: bool,

    #[serde(default = "default_output_mode")]
    pub output_mode: OutputMode,
}

fn default_output_mode() -> OutputMode {
    OutputMode::FullHistory
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            add_handoff_back_messages: true,
            output_mode: default_output_mode(),
        }
    }
}

// ============= Tool Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

// ============= Agent Configuration =============

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Replaces the built-in system prompt for this agent
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Replaces the built-in tool list for this agent
    #[serde(default)]
    pub tools: Option<Vec<String>>,

    /// Replaces `llm.model` for this agent
    #[serde(default)]
    pub model: Option<String>,

    /// Replaces `llm.temperature` for this agent
    #[serde(default)]
    pub temperature: Option<f32>,
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),

    #[error("Tool '{0}' referenced by agent '{1}' does not exist")]
    MissingTool(String, String),
}

/// Accepted sampling temperature range.
pub const TEMPERATURE_RANGE: std::ops::RangeInclusive<f32> = 0.0..=2.0;

/// Tool names that the built-in registry knows how to construct.
pub const KNOWN_TOOLS: &[&str] = &["web_scraper", "web_search"];

impl ScoutConfig {
    /// Load configuration from a TOML file and validate it
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config = Self::parse(&content)?;

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load `.env` (if present) into the process environment, then the TOML file.
    ///
    /// Meant to be called once at process start.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(env_path) => debug!(path = %env_path.display(), "Loaded .env file"),
            Err(e) => debug!("No .env file loaded: {}", e),
        }
        Self::load(path)
    }

    /// Parse and validate configuration from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: ScoutConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration for internal consistency
    ///
    /// The search API key is not checked here; it is resolved lazily by
    /// [`ScoutConfig::search_api_key`] so the scraper can run without one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "fetch.timeout_secs must be greater than zero".to_string(),
            ));
        }

        if self.search.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "search.timeout_secs must be greater than zero".to_string(),
            ));
        }

        if self.search.default_max_results <= 0 {
            return Err(ConfigError::ValidationError(
                "search.default_max_results must be greater than zero".to_string(),
            ));
        }

        if self.search.endpoint.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "search.endpoint must not be empty".to_string(),
            ));
        }

        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "llm.model must not be empty".to_string(),
            ));
        }

        if !TEMPERATURE_RANGE.contains(&self.llm.temperature) {
            return Err(ConfigError::ValidationError(format!(
                "llm.temperature must be between {} and {}",
                TEMPERATURE_RANGE.start(),
                TEMPERATURE_RANGE.end()
            )));
        }

        // Validate agent -> tools references and model overrides
        for (agent_name, agent_config) in &self.agents {
            if agent_config
                .model
                .as_deref()
                .is_some_and(|m| m.trim().is_empty())
            {
                return Err(ConfigError::ValidationError(format!(
                    "agents.{}.model must not be empty",
                    agent_name
                )));
            }
            if let Some(temperature) = agent_config.temperature {
                if !TEMPERATURE_RANGE.contains(&temperature) {
                    return Err(ConfigError::ValidationError(format!(
                        "agents.{}.temperature must be between {} and {}",
                        agent_name,
                        TEMPERATURE_RANGE.start(),
                        TEMPERATURE_RANGE.end()
                    )));
                }
            }
            for tool_name in agent_config.tools.iter().flatten() {
                if !KNOWN_TOOLS.contains(&tool_name.as_str()) {
                    return Err(ConfigError::MissingTool(
                        tool_name.clone(),
                        agent_name.clone(),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Get a resolved value from an env var reference
    pub fn resolve_env(&self, env_name: &str) -> Option<String> {
        std::env::var(env_name).ok()
    }

    /// Get the search provider API key from the environment
    pub fn search_api_key(&self) -> Result<String, ConfigError> {
        self.resolve_env(&self.search.api_key_env)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(self.search.api_key_env.clone()))
    }

    /// Whether a tool is switched on (tools are on unless configured otherwise)
    pub fn tool_enabled(&self, name: &str) -> bool {
        self.tools.get(name).map(|t| t.enabled).unwrap_or(true)
    }

    /// Get agent overrides by name
    pub fn get_agent(&self, name: &str) -> Option<&AgentConfig> {
        self.agents.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> String {
        r#"
[logging]
level = "debug"
format = "json"

[fetch]
timeout_secs = 5

[search]
api_key_env = "SCOUT_TEST_TAVILY_KEY"
endpoint = "http://localhost:9999/search"
default_max_results = 6

[llm]
model = "gemini-2.0-pro"
temperature = 0.5

[supervisor]
add_handoff_back_messages = false
output_mode = "last_message"

[tools.web_scraper]
enabled = false

[agents.researcher_agent]
system_prompt = "Find sources."
tools = ["web_search"]
temperature = 0.0
"#
        .to_string()
    }

    #[test]
    fn test_parse_config() {
        let config = ScoutConfig::parse(&create_test_config()).expect("Failed to parse config");

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.fetch.timeout_secs, 5);
        assert_eq!(config.search.endpoint, "http://localhost:9999/search");
        assert_eq!(config.search.default_max_results, 6);
        assert!(!config.tool_enabled("web_scraper"));
        assert!(config.tool_enabled("web_search"));
        assert_eq!(
            config.get_agent("researcher_agent").unwrap().system_prompt.as_deref(),
            Some("Find sources.")
        );
        assert_eq!(config.llm.model, "gemini-2.0-pro");
        assert_eq!(config.llm.temperature, 0.5);
        assert!(!config.supervisor.add_handoff_back_messages);
        assert_eq!(config.supervisor.output_mode, OutputMode::LastMessage);

        let researcher = config.get_agent("researcher_agent").unwrap();
        assert_eq!(researcher.temperature, Some(0.0));
        assert!(researcher.model.is_none());
    }

    #[test]
    fn test_defaults() {
        let config = ScoutConfig::parse("").unwrap();

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.fetch.timeout(), Duration::from_secs(15));
        assert!(config.fetch.user_agent.starts_with("Mozilla/5.0"));
        assert!(config.fetch.accept.starts_with("text/html"));
        assert_eq!(config.search.api_key_env, "TAVILY_API_KEY");
        assert_eq!(config.search.endpoint, "https://api.tavily.com/search");
        assert_eq!(config.search.default_max_results, 4);
        assert_eq!(config.search.excluded_filetype, "pdf");
        assert_eq!(config.llm.model, "gemini-2.0-flash");
        assert_eq!(config.llm.temperature, 0.2);
        assert!(config.supervisor.add_handoff_back_messages);
        assert_eq!(config.supervisor.output_mode, OutputMode::FullHistory);
        assert!(config.tools.is_empty());
    }

    #[test]
    fn test_validation_temperature_out_of_range() {
        let result = ScoutConfig::parse("[llm]\ntemperature = 2.5\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));

        let result = ScoutConfig::parse("[agents.reporter_agent]\ntemperature = -0.1\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(msg)) if msg.contains("reporter_agent")));
    }

    #[test]
    fn test_validation_empty_model() {
        let result = ScoutConfig::parse("[llm]\nmodel = \"\"\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));

        let result = ScoutConfig::parse("[agents.supervisor]\nmodel = \" \"\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_unknown_output_mode_rejected() {
        let result = ScoutConfig::parse("[supervisor]\noutput_mode = \"everything\"\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_validation_zero_timeout() {
        let result = ScoutConfig::parse("[fetch]\ntimeout_secs = 0\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validation_non_positive_max_results() {
        let result = ScoutConfig::parse("[search]\ndefault_max_results = 0\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validation_missing_tool() {
        let content = r#"
[agents.scrapper_agent]
tools = ["nonexistent_tool"]
"#;
        let result = ScoutConfig::parse(content);
        assert!(matches!(result, Err(ConfigError::MissingTool(tool, agent))
            if tool == "nonexistent_tool" && agent == "scrapper_agent"));
    }

    #[test]
    fn test_invalid_toml() {
        let result = ScoutConfig::parse("[fetch\ntimeout_secs = ");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scout.toml");
        fs::write(&path, create_test_config()).unwrap();

        let config = ScoutConfig::load(&path).unwrap();
        assert_eq!(config.fetch.timeout_secs, 5);
        assert!(!config.tool_enabled("web_scraper"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = ScoutConfig::load("/definitely/not/here/scout.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_search_api_key_missing() {
        let mut config = ScoutConfig::default();
        config.search.api_key_env = "SCOUT_TEST_UNSET_KEY_7f3a".to_string();

        let result = config.search_api_key();
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(name)) if name == "SCOUT_TEST_UNSET_KEY_7f3a"));
    }

    #[test]
    fn test_search_api_key_resolved() {
        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::set_var("SCOUT_TEST_TAVILY_KEY_RESOLVED", "tvly-test");
        }
        let mut config = ScoutConfig::default();
        config.search.api_key_env = "SCOUT_TEST_TAVILY_KEY_RESOLVED".to_string();

        assert_eq!(config.search_api_key().unwrap(), "tvly-test");
    }
}
