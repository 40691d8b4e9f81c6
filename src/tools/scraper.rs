//! `web_scraper` tool: fetch a page and return its main content as Markdown.

use crate::tools::fetch::ContentFetcher;
use crate::tools::markdown::MarkdownConverter;
use crate::tools::registry::Tool;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{info, warn};

/// Fetch `url` and convert it, folding every failure into the returned text.
pub async fn scrape(fetcher: &ContentFetcher, converter: &MarkdownConverter, url: &str) -> String {
    let html = match fetcher.fetch(url).await {
        Ok(html) => html,
        Err(e) => {
            return format!(
                "Error: A problem occurred while fetching content from the URL: {}. Details: {}",
                url, e
            );
        }
    };

    match converter.convert(&html) {
        Ok(markdown) => {
            info!(url, chars = markdown.len(), "Scraped page");
            markdown
        }
        Err(AppError::ContentNotFound(msg)) => {
            warn!(url, "No content area found");
            format!("Error: {}", msg)
        }
        Err(e) => format!("Error: {}", e),
    }
}

pub struct WebScraperTool {
    fetcher: ContentFetcher,
    converter: MarkdownConverter,
}

impl WebScraperTool {
    pub const NAME: &'static str = "web_scraper";

    pub fn new(fetcher: ContentFetcher) -> Self {
        Self {
            fetcher,
            converter: MarkdownConverter::new(),
        }
    }
}

#[async_trait]
impl Tool for WebScraperTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Scrapes the main content of a web page and returns it as structured Markdown text. \
         Scripts, styles, headers, footers, navigation, sidebars and forms are stripped. \
         On failure an error message describing the problem is returned instead."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "The single, complete URL of the web page to be scraped"
                }
            },
            "required": ["url"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let url = args
            .get("url")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AppError::InvalidInput("Missing 'url' parameter".to_string()))?;

        Ok(Value::String(scrape(&self.fetcher, &self.converter, url).await))
    }
}
