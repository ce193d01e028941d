//! Backend API services consumed through the authenticated client.
//!
//! This module provides:
//! - Dashboard summary, usage series and recent documents
//! - Document deletion
//! - Subscription plan read/update, sales inquiries and the local plan cache

mod dashboard;
mod subscription;

pub use dashboard::{DashboardApi, DEFAULT_RECENT_LIMIT, DEFAULT_USAGE_DAYS};
pub use subscription::{SubscriptionApi, KEY_SUBSCRIPTION_PLAN};

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::http::{HttpResponse, TransportError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Transport(#[from] TransportError),
    #[error("{message} ({status})")]
    Status { status: StatusCode, message: String },
    #[error("Invalid response: {0}")]
    Json(#[from] serde_json::Error),
}

impl ServiceError {
    /// HTTP status for `Status` errors.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Server-provided `detail` (or `error`) message from a JSON error body.
pub(crate) fn error_detail(response: &HttpResponse) -> Option<String> {
    let body: Value = response.json().ok()?;
    ["detail", "error"]
        .into_iter()
        .filter_map(|key| body.get(key).and_then(Value::as_str))
        .map(str::trim)
        .find(|msg| !msg.is_empty())
        .map(str::to_string)
}

/// Pass successful responses through; map anything else to `ServiceError::Status`.
pub(crate) fn ensure_success(
    response: HttpResponse,
    fallback: &str,
) -> Result<HttpResponse, ServiceError> {
    if response.is_success() {
        return Ok(response);
    }
    let message = error_detail(&response).unwrap_or_else(|| fallback.to_string());
    tracing::debug!(status = %response.status(), %message, "API call failed");
    Err(ServiceError::Status {
        status: response.status(),
        message,
    })
}
