// sellerdesk-server/src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use sellerdesk::{LifecycleError, StoreError};

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Conflict: {0}")]
  Conflict(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Migration Error: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("Store Error: {source}")]
  Store { source: StoreError },

  #[error("Order Workflow Error: {source}")]
  Workflow { source: LifecycleError },

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<LifecycleError> for AppError {
  fn from(err: LifecycleError) -> Self {
    match err {
      LifecycleError::NotFound(id) => AppError::NotFound(format!("Order with ID {} not found.", id)),
      LifecycleError::Validation(m) => AppError::Validation(m),
      LifecycleError::Conflict(id) => AppError::Conflict(format!("Order {} is already being deleted.", id)),
      LifecycleError::Store { source } => AppError::from(source),
      other => AppError::Workflow { source: other },
    }
  }
}

impl From<StoreError> for AppError {
  fn from(err: StoreError) -> Self {
    match err {
      StoreError::NotFound(m) => AppError::NotFound(m),
      StoreError::Rejected(m) => AppError::Validation(m),
      backend @ StoreError::Backend { .. } => AppError::Store { source: backend },
    }
  }
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<sqlx::Error>() {
      Ok(sqlx_err) => AppError::Sqlx(sqlx_err),
      Err(other) => AppError::Internal(other.to_string()),
    }
  }
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      AppError::Validation(m) => HttpResponse::BadRequest().json(json!({"error": m})),
      AppError::NotFound(m) => HttpResponse::NotFound().json(json!({"error": m})),
      AppError::Conflict(m) => HttpResponse::Conflict().json(json!({"error": m})),
      AppError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "detail": m}))
      }
      AppError::Sqlx(_) | AppError::Migration(_) => {
        HttpResponse::InternalServerError().json(json!({"error": "Database operation failed"}))
      }
      AppError::Store { source } => {
        HttpResponse::InternalServerError().json(json!({"error": "Store operation failed", "detail": source.to_string()}))
      }
      AppError::Workflow { source } => {
        tracing::error!(workflow_error_source = ?source, "Workflow error details");
        HttpResponse::InternalServerError()
          .json(json!({"error": "Order workflow error", "detail": source.to_string()}))
      }
      AppError::Internal(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred", "detail": m}))
      }
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
