use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("rejected by store: {0}")]
    Rejected(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn from_store(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                DomainError::StoreUnavailable(err.to_string())
            }
            sqlx::Error::Database(db) => {
                DomainError::Rejected(db.constraint().unwrap_or(db.message()).to_string())
            }
            _ => DomainError::Internal(format!("database error: {}", err)),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::StoreUnavailable(_)
            | DomainError::Rejected(_)
            | DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = self.to_string();
        let details = match self {
            DomainError::Rejected(reason) => Some(json!({ "reason": reason })),
            _ => None,
        };
        let body = ErrorBody {
            error: message.as_str(),
            details,
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
