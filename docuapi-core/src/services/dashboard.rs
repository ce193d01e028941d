//! Dashboard, analytics and document calls.

use serde_json::{Map, Value};
use tracing::debug;

use super::{ensure_success, ServiceError};
use crate::auth::AuthenticatedClient;
use crate::http::HttpRequest;
use crate::models::{DashboardSummary, Document, UsagePoint};
use crate::navigation::encode_component;

/// Days of usage history requested by default.
pub const DEFAULT_USAGE_DAYS: u32 = 14;

/// Recent documents requested by default.
pub const DEFAULT_RECENT_LIMIT: u32 = 8;

/// Dashboard endpoints.
pub struct DashboardApi<'a> {
    client: &'a AuthenticatedClient,
}

impl<'a> DashboardApi<'a> {
    pub fn new(client: &'a AuthenticatedClient) -> Self {
        Self { client }
    }

    pub async fn summary(&self) -> Result<DashboardSummary, ServiceError> {
        let url = self.client.api_url("/api/dashboard/summary");
        let res = self.client.send(HttpRequest::get(url)).await?;
        let res = ensure_success(res, "Failed summary")?;
        Ok(res.json()?)
    }

    /// Daily upload counts for the last `days` days.
    pub async fn usage(&self, days: u32) -> Result<Vec<UsagePoint>, ServiceError> {
        let url = self
            .client
            .api_url(&format!("/api/analytics/usage?days={days}"));
        let res = self.client.send(HttpRequest::get(url)).await?;
        let res = ensure_success(res, "Failed usage")?;
        Ok(res.json()?)
    }

    /// Newest documents first.
    ///
    /// Accepts both paginated (`{"results": [...]}`) and bare-array bodies;
    /// any other shape yields an empty list.
    pub async fn recent_documents(&self, limit: u32) -> Result<Vec<Document>, ServiceError> {
        let url = self
            .client
            .api_url(&format!("/api/documents?limit={limit}&sort=-created_at"));
        let res = self.client.send(HttpRequest::get(url)).await?;
        let res = ensure_success(res, "Failed recent docs")?;

        let body: Value = res.json()?;
        let items = match body {
            Value::Object(mut obj) => match obj.remove("results") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
            Value::Array(items) => items,
            _ => Vec::new(),
        };
        debug!(count = items.len(), "Fetched recent documents");

        Ok(items
            .into_iter()
            .map(serde_json::from_value::<Document>)
            .collect::<Result<Vec<_>, _>>()?)
    }

    /// Delete a document. An empty or non-JSON success body yields `{}`.
    pub async fn delete_document(&self, id: &str) -> Result<Value, ServiceError> {
        let url = self
            .client
            .api_url(&format!("/api/documents/{}", encode_component(id)));
        let res = self.client.send(HttpRequest::delete(url)).await?;
        let res = ensure_success(res, "Delete failed")?;
        Ok(res
            .json()
            .unwrap_or_else(|_| Value::Object(Map::new())))
    }
}
