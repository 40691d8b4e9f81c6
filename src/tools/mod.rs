//! Research Tools
//!
//! The tools agents call to reach the web.
//!
//! # Module Structure
//!
//! - [`fetch`](crate::tools::fetch) - Raw HTML retrieval with browser-like headers
//! - [`markdown`](crate::tools::markdown) - Content-area selection and HTML → Markdown rendering
//! - [`scraper`](crate::tools::scraper) - The `web_scraper` tool (fetch + convert)
//! - [`search`](crate::tools::search) - The `web_search` tool and result filtering
//! - [`registry`](crate::tools::registry) - Tool registration and dispatch
//!
//! # Available Tools
//!
//! ## Web Scraper
//! Fetches a page and returns its main content as Markdown:
//! ```ignore
//! let md = registry.execute("web_scraper", json!({"url": "https://example.com"})).await?;
//! ```
//!
//! ## Web Search
//! Searches the web and returns URLs that are not behind an access wall:
//! ```ignore
//! let urls = registry.execute("web_search", json!({"query": "rust async", "max_results": 5})).await?;
//! ```
//!
//! # Errors
//!
//! Network failures, missing content areas and provider errors come back as
//! `"Error: ..."` strings inside `Ok`, so the agent can read and react to
//! them. `Err` is only returned for malformed arguments or unknown tools.

/// HTTP page fetching.
pub mod fetch;
/// HTML to Markdown conversion.
pub mod markdown;
/// Tool registry for managing available tools.
pub mod registry;
/// Page scraping tool.
pub mod scraper;
/// Filtered web search tool.
pub mod search;

pub use registry::{Tool, ToolRegistry};
