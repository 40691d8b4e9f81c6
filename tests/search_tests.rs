//! Integration tests for the Tavily-backed search path
//!
//! These tests use wiremock to stand in for the Tavily API.

use rstest::rstest;
use scout::tools::search::WebSearchTool;
use scout::utils::toml_config::SearchConfig;
use scout::{AppError, ScoutConfig, SearchFilter, SearchProvider, TavilyProvider, Tool, ToolRegistry};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup_mock_tavily(response: ResponseTemplate) -> MockServer {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(response)
        .mount(&mock_server)
        .await;

    mock_server
}

fn provider_for(server: &MockServer) -> TavilyProvider {
    TavilyProvider::new(
        format!("{}/search", server.uri()),
        "tvly-test-key",
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn test_tavily_request_shape() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_partial_json(json!({
            "api_key": "tvly-test-key",
            "query": "rust ownership -filetype:pdf",
            "max_results": 8
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": "rust ownership -filetype:pdf",
            "results": [
                { "url": "https://doc.rust-lang.org/book/", "content": "The Rust book" },
                { "url": "https://blocked.example", "content": "Please verify you are a human" },
                { "url": "https://no-snippet.example" }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let filter = SearchFilter::new(Arc::new(provider_for(&mock_server)), &SearchConfig::default());
    let urls = filter.search("rust ownership", 100).await.unwrap();

    assert_eq!(
        urls,
        vec!["https://doc.rust-lang.org/book/", "https://no-snippet.example"]
    );
}

#[tokio::test]
async fn test_tavily_bare_array_response() {
    let server = setup_mock_tavily(ResponseTemplate::new(200).set_body_json(json!([
        { "url": "a", "content": "Access Denied" },
        { "url": "b", "content": "normal page" }
    ])))
    .await;

    let filter = SearchFilter::new(Arc::new(provider_for(&server)), &SearchConfig::default());
    assert_eq!(filter.search("q", 4).await.unwrap(), vec!["b"]);
}

#[rstest]
#[case(ResponseTemplate::new(200).set_body_json(json!({ "answer": "no results here" })))]
#[case(ResponseTemplate::new(200).set_body_json(json!("just a string")))]
#[case(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))]
#[tokio::test]
async fn test_unexpected_shapes_yield_no_urls(#[case] response: ResponseTemplate) {
    let server = setup_mock_tavily(response).await;

    let filter = SearchFilter::new(Arc::new(provider_for(&server)), &SearchConfig::default());
    assert!(filter.search("q", 4).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_tavily_http_error() {
    let server = setup_mock_tavily(ResponseTemplate::new(401)).await;

    let result = provider_for(&server).search("q", 4).await;
    assert!(matches!(result, Err(AppError::SearchProvider(msg)) if msg.contains("401")));

    let tool = WebSearchTool::new(
        SearchFilter::new(Arc::new(provider_for(&server)), &SearchConfig::default()),
        4,
    );
    let value = tool.execute(json!({ "query": "q" })).await.unwrap();
    assert!(value.as_str().unwrap().starts_with("Error: Web search failed"));
}

#[tokio::test]
async fn test_registry_from_config_uses_endpoint_and_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_partial_json(json!({ "api_key": "tvly-from-env", "max_results": 6 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "url": "https://ok.example", "content": "fine" }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    // SAFETY: the variable name is unique to this test
    unsafe {
        std::env::set_var("SCOUT_SEARCH_TESTS_TAVILY_KEY", "tvly-from-env");
    }

    let config = ScoutConfig::parse(&format!(
        r#"
[search]
api_key_env = "SCOUT_SEARCH_TESTS_TAVILY_KEY"
endpoint = "{}/search"
default_max_results = 6
"#,
        mock_server.uri()
    ))
    .unwrap();

    let registry = ToolRegistry::from_config(&config).unwrap();
    let value: Value = registry
        .execute("web_search", json!({ "query": "anything" }))
        .await
        .unwrap();

    assert_eq!(value, json!(["https://ok.example"]));
}
