use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Backend request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Backend returned {status}: {detail}")]
    UpstreamStatus { status: u16, detail: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Upstream(e) => {
                tracing::error!("Backend request error: {:?}", e);
                (StatusCode::BAD_GATEWAY, e.to_string())
            }
            AppError::UpstreamStatus { status, detail } => {
                tracing::error!("Backend returned {}: {}", status, detail);
                (StatusCode::BAD_GATEWAY, detail.clone())
            }
            AppError::Io(e) => {
                tracing::error!("IO error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "IO error".to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Why a single upstream record was left out of an aggregation pass.
///
/// These never abort a pass; they are counted and logged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("transaction {id}: amount {value} is not a valid amount")]
    InvalidAmount { id: i64, value: String },

    #[error("transaction {id}: unknown transaction type {value:?}")]
    UnknownTransactionType { id: i64, value: String },

    #[error("unknown month {0:?}")]
    UnknownMonth(String),
}
