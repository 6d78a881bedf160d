//! Shared test utilities for integration tests.
//!
//! This module provides a `TestClient` that drives the application router
//! against an in-memory `StubSource` instead of the real transactions
//! backend. Methods are intentionally broad to support various test scenarios
//! across different test files.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use spendlens::config::Config;
use spendlens::error::{AppError, AppResult};
use spendlens::models::{Category, CategorySummaryRecord, Month, TransactionRecord};
use spendlens::server;
use spendlens::services::analytics::SummaryFilter;
use spendlens::services::backend::{MonthlyWire, SummarySource, TransactionQuery};
use spendlens::session::Session;
use spendlens::state::AppState;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Build a wire transaction record.
pub fn record(
    id: i64,
    date: &str,
    amount: f64,
    transaction_type: &str,
    category_id: Option<i64>,
) -> TransactionRecord {
    TransactionRecord {
        id,
        date: json!(date),
        description: Some(format!("Transaction {}", id)),
        amount: json!(amount),
        transaction_type: Some(transaction_type.to_string()),
        category_id,
    }
}

pub fn category(id: i64, name: &str) -> Category {
    Category {
        id,
        name: name.to_string(),
        color: None,
    }
}

/// In-memory [`SummarySource`] that records what it was asked for.
#[derive(Default)]
pub struct StubSource {
    pub transactions: Vec<TransactionRecord>,
    pub categories: Vec<Category>,
    pub by_category: Vec<CategorySummaryRecord>,
    pub monthly: MonthlyWire,
    /// When set, `skip` is ignored and every page starts at the first record.
    pub ignore_skip: bool,
    /// When set, every call fails with this status and detail.
    pub failure: Option<(u16, String)>,
    pub seen_tokens: Mutex<Vec<Option<String>>>,
    pub transaction_queries: Mutex<Vec<TransactionQuery>>,
    pub summary_filters: Mutex<Vec<SummaryFilter>>,
}

impl StubSource {
    fn observe(&self, session: &Session) -> AppResult<()> {
        self.seen_tokens
            .lock()
            .unwrap()
            .push(session.token().map(str::to_string));
        match &self.failure {
            Some((status, detail)) => Err(AppError::UpstreamStatus {
                status: *status,
                detail: detail.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SummarySource for StubSource {
    async fn transactions(
        &self,
        session: &Session,
        query: &TransactionQuery,
    ) -> AppResult<Vec<TransactionRecord>> {
        self.observe(session)?;
        self.transaction_queries.lock().unwrap().push(query.clone());

        let skip = if self.ignore_skip {
            0
        } else {
            query.skip.unwrap_or(0)
        };
        let limit = query.limit.unwrap_or(100);
        Ok(self
            .transactions
            .iter()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn categories(&self, session: &Session) -> AppResult<Vec<Category>> {
        self.observe(session)?;
        Ok(self.categories.clone())
    }

    async fn summary_by_category(
        &self,
        session: &Session,
        filter: &SummaryFilter,
    ) -> AppResult<Vec<CategorySummaryRecord>> {
        self.observe(session)?;
        self.summary_filters.lock().unwrap().push(filter.clone());
        Ok(self.by_category.clone())
    }

    async fn monthly_summary(
        &self,
        session: &Session,
        _year: i32,
        _month: Option<Month>,
    ) -> AppResult<MonthlyWire> {
        self.observe(session)?;
        Ok(self.monthly.clone())
    }
}

/// A test client that drives the router in-process.
pub struct TestClient {
    state: AppState,
    source: Arc<StubSource>,
}

impl TestClient {
    /// Create a client over a source with no data.
    pub fn new() -> Self {
        Self::with_source(StubSource::default())
    }

    pub fn with_source(source: StubSource) -> Self {
        Self::with_source_and_config(source, Self::config())
    }

    pub fn with_source_and_config(source: StubSource, config: Config) -> Self {
        let source = Arc::new(source);
        let state = AppState::new(config, source.clone());
        Self { state, source }
    }

    pub fn config() -> Config {
        Config {
            host: "127.0.0.1".into(),
            ..Config::default()
        }
    }

    pub fn source(&self) -> &StubSource {
        &self.source
    }

    pub fn router(&self) -> Router {
        server::router(self.state.clone())
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, String::from_utf8_lossy(&body).to_string())
    }

    /// Make a GET request and return status and body.
    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let (status, _, body) = self
            .send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await;
        (status, body)
    }

    /// Make a GET request and return status, headers and body.
    pub async fn get_with_headers(&self, uri: &str) -> (StatusCode, HeaderMap, String) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    /// Make a GET request carrying a bearer token.
    pub async fn get_with_token(&self, uri: &str, token: &str) -> (StatusCode, String) {
        let (status, _, body) = self
            .send(
                Request::builder()
                    .uri(uri)
                    .header("Authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        (status, body)
    }

    /// Get JSON from an endpoint and parse it.
    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let (status, body) = self.get(uri).await;
        let parsed = serde_json::from_str(&body).unwrap_or(Value::Null);
        (status, parsed)
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}
