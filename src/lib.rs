//! # Scout - research crew tooling
//!
//! Tools for a multi-agent research assistant: a supervisor hands a question
//! to a search agent, a scraping agent and a report-writing agent. The agents
//! themselves run inside an external orchestration framework; this crate
//! provides what they call.
//!
//! - `web_search` - query a search provider (Tavily), exclude PDFs, drop hits
//!   whose snippet shows an access wall, return URLs.
//! - `web_scraper` - fetch a page with browser-like headers, pick the main
//!   content area and render it as Markdown.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use scout::{ResearchCrew, ScoutConfig, ToolRegistry};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ScoutConfig::load_with_env("scout.toml")?;
//!     scout::utils::logging::init_tracing(&config.logging);
//!
//!     let registry = ToolRegistry::from_config(&config)?;
//!     let crew = ResearchCrew::from_config(&config);
//!     crew.validate(&registry)?;
//!
//!     let urls = registry
//!         .execute("web_search", json!({ "query": "rust borrow checker" }))
//!         .await?;
//!     println!("{}", urls);
//!     Ok(())
//! }
//! ```
//!
//! ## Converting HTML directly
//!
//! ```rust
//! use scout::MarkdownConverter;
//!
//! let md = MarkdownConverter::new()
//!     .convert("<article><h2>Title</h2><p>A <strong>bold</strong> word</p></article>")
//!     .unwrap();
//! assert_eq!(md, "## Title\n\nA **bold** word");
//! ```
//!
//! ## Modules
//!
//! - [`agents`] - Research crew roster (names, prompts, tool assignments)
//! - [`tools`] - Fetcher, converter, search filter and the tool registry
//! - [`types`] - Common types and error handling
//! - [`utils`] - Configuration and logging

#![warn(rustdoc::missing_crate_level_docs)]

/// Research crew roster.
pub mod agents;
/// Research tools (scraper, search) and their registry.
pub mod tools;
/// Core types (tool definitions, search entries, errors).
pub mod types;
/// Configuration and logging utilities.
pub mod utils;

// Re-export commonly used types
pub use agents::{AgentRole, AgentSpec, ResearchCrew};
pub use tools::fetch::{ContentFetcher, FetchError};
pub use tools::markdown::MarkdownConverter;
pub use tools::registry::{Tool, ToolRegistry};
pub use tools::search::{SearchFilter, SearchProvider, TavilyProvider};
pub use types::{AppError, Result, SearchResultEntry, ToolDefinition};
pub use utils::toml_config::{ConfigError, LlmConfig, OutputMode, ScoutConfig, SupervisorConfig};
