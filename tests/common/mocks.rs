//! Mock implementations for testing.
//!
//! Shared across integration test files so each one does not re-declare its
//! own search provider stub.

use async_trait::async_trait;
use scout::types::{AppError, Result};
use scout::SearchProvider;
use serde_json::Value;
use std::sync::Mutex;

/// Search provider that replays a fixed answer.
///
/// # Examples
///
/// ```ignore
/// let provider = MockSearchProvider::new(json!([{ "url": "a" }]));
/// let failing = MockSearchProvider::failing();
/// ```
pub struct MockSearchProvider {
    answer: Value,
    should_fail: bool,
    calls: Mutex<Vec<(String, usize)>>,
}

impl MockSearchProvider {
    /// Create a provider that always answers with `answer`.
    pub fn new(answer: Value) -> Self {
        Self {
            answer,
            should_fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Create a provider that always returns an error.
    pub fn failing() -> Self {
        Self {
            answer: Value::Null,
            should_fail: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// `(query, max_results)` for every call so far.
    pub fn calls(&self) -> Vec<(String, usize)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for MockSearchProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), max_results));

        if self.should_fail {
            return Err(AppError::SearchProvider("Mock provider failure".to_string()));
        }
        Ok(self.answer.clone())
    }
}
