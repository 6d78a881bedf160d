//! Client for the transactions backend.
//!
//! The backend owns persistence and authentication. This module only fetches
//! the JSON shapes the engine consumes and hands back failures unchanged; it
//! never retries.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::models::{Category, CategorySummaryRecord, Month, TransactionRecord};
use crate::services::analytics::SummaryFilter;
use crate::session::Session;

/// Raw `GET /transactions/summary/monthly` body.
pub type MonthlyWire = BTreeMap<String, BTreeMap<String, Value>>;

/// Query parameters for `GET /transactions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransactionQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct CategorySummaryQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transaction_type: Option<&'static str>,
}

impl From<&SummaryFilter> for CategorySummaryQuery {
    fn from(filter: &SummaryFilter) -> Self {
        Self {
            start_date: filter.start_date,
            end_date: filter.end_date,
            transaction_type: filter.transaction_type.map(|t| t.as_str()),
        }
    }
}

#[derive(Debug, Serialize)]
struct MonthlyQuery {
    year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    month: Option<u32>,
}

/// Where the engine's input data comes from.
#[async_trait]
pub trait SummarySource: Send + Sync {
    /// One page of transactions.
    async fn transactions(
        &self,
        session: &Session,
        query: &TransactionQuery,
    ) -> AppResult<Vec<TransactionRecord>>;

    async fn categories(&self, session: &Session) -> AppResult<Vec<Category>>;

    async fn summary_by_category(
        &self,
        session: &Session,
        filter: &SummaryFilter,
    ) -> AppResult<Vec<CategorySummaryRecord>>;

    async fn monthly_summary(
        &self,
        session: &Session,
        year: i32,
        month: Option<Month>,
    ) -> AppResult<MonthlyWire>;
}

/// Fetch every page of transactions matching `query`.
///
/// Pages are requested until one comes back shorter than `page_size`, or
/// until a page repeats the previous one exactly, which is what a backend
/// that ignores `skip` sends.
pub async fn fetch_all_transactions(
    source: &dyn SummarySource,
    session: &Session,
    query: &TransactionQuery,
    page_size: usize,
) -> AppResult<Vec<TransactionRecord>> {
    let page_size = page_size.max(1);
    let mut all = Vec::new();
    let mut previous: Vec<TransactionRecord> = Vec::new();
    let mut skip = 0;

    loop {
        let page_query = TransactionQuery {
            skip: Some(skip),
            limit: Some(page_size),
            ..query.clone()
        };
        let page = source.transactions(session, &page_query).await?;
        let fetched = page.len();
        if fetched > 0 && page == previous {
            warn!(
                "Backend repeated the previous page at skip={}; stopping pagination",
                skip
            );
            break;
        }
        all.extend(page.iter().cloned());
        if fetched < page_size {
            break;
        }
        skip += fetched;
        previous = page;
    }

    debug!("Fetched {} transaction records", all.len());
    Ok(all)
}

/// [`SummarySource`] over the backend's REST API.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url<Q: Serialize>(&self, path: &str, query: &Q) -> AppResult<String> {
        let qs = serde_urlencoded::to_string(query)
            .map_err(|e| AppError::Internal(format!("Failed to encode query: {}", e)))?;
        if qs.is_empty() {
            Ok(format!("{}{}", self.base_url, path))
        } else {
            Ok(format!("{}{}?{}", self.base_url, path, qs))
        }
    }

    async fn get_json<T, Q>(&self, session: &Session, path: &str, query: &Q) -> AppResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize,
    {
        let url = self.url(path, query)?;
        debug!("GET {}", url);

        let mut request = self.http.get(&url);
        if let Some(token) = session.token() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamStatus {
                status: status.as_u16(),
                detail: error_detail(&body, status.canonical_reason()),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

/// The backend's error message: its JSON `detail` field when present,
/// otherwise the raw body, otherwise the status text.
fn error_detail(body: &str, reason: Option<&str>) -> String {
    let from_json = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("detail").cloned())
        .map(|detail| match detail {
            Value::String(s) => s,
            other => other.to_string(),
        });

    from_json
        .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
        .or_else(|| reason.map(str::to_string))
        .unwrap_or_else(|| "Unknown error".to_string())
}

#[async_trait]
impl SummarySource for BackendClient {
    async fn transactions(
        &self,
        session: &Session,
        query: &TransactionQuery,
    ) -> AppResult<Vec<TransactionRecord>> {
        self.get_json(session, "/transactions", query).await
    }

    async fn categories(&self, session: &Session) -> AppResult<Vec<Category>> {
        self.get_json(session, "/categories", &()).await
    }

    async fn summary_by_category(
        &self,
        session: &Session,
        filter: &SummaryFilter,
    ) -> AppResult<Vec<CategorySummaryRecord>> {
        let query = CategorySummaryQuery::from(filter);
        self.get_json(session, "/transactions/summary/by-category", &query)
            .await
    }

    async fn monthly_summary(
        &self,
        session: &Session,
        year: i32,
        month: Option<Month>,
    ) -> AppResult<MonthlyWire> {
        let query = MonthlyQuery {
            year,
            month: month.map(Month::number),
        };
        self.get_json(session, "/transactions/summary/monthly", &query)
            .await
    }
}
