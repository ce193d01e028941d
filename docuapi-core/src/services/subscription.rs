//! Subscription plan calls and the local plan cache.

use serde_json::Value;
use tracing::{debug, warn};

use super::{ensure_success, ServiceError};
use crate::auth::AuthenticatedClient;
use crate::http::{HttpRequest, HttpResponse};
use crate::models::{PlanCode, PlanUpdate, SalesInquiry, SubscriptionPlan};
use crate::storage::{read_item, write_item};

/// Storage key holding the last plan returned by the server.
pub const KEY_SUBSCRIPTION_PLAN: &str = "subscription_plan";

const PLAN_PATH: &str = "/api/accounts/plan/";
const CONTACT_SALES_PATH: &str = "/api/accounts/contact-sales/";

/// Subscription endpoints.
pub struct SubscriptionApi<'a> {
    client: &'a AuthenticatedClient,
}

impl<'a> SubscriptionApi<'a> {
    pub fn new(client: &'a AuthenticatedClient) -> Self {
        Self { client }
    }

    /// Current effective plan. Cached locally when it carries a code.
    pub async fn fetch_plan(&self) -> Result<SubscriptionPlan, ServiceError> {
        let req = HttpRequest::get(self.client.api_url(PLAN_PATH));
        let res = self.client.send(req).await?;
        self.read_plan(res, "Failed to load plan")
    }

    pub async fn update_plan(&self, plan: PlanCode) -> Result<SubscriptionPlan, ServiceError> {
        let req = HttpRequest::post(self.client.api_url(PLAN_PATH)).json(&PlanUpdate { plan })?;
        let res = self.client.send(req).await?;
        self.read_plan(res, "Unable to update plan")
    }

    pub async fn submit_sales_inquiry(&self, inquiry: &SalesInquiry) -> Result<Value, ServiceError> {
        let req = HttpRequest::post(self.client.api_url(CONTACT_SALES_PATH)).json(inquiry)?;
        let res = self.client.send(req).await?;
        let res = ensure_success(res, "Unable to submit request")?;
        Ok(res.json().unwrap_or(Value::Null))
    }

    /// Last plan cached by `fetch_plan`/`update_plan`, if readable.
    pub fn cached_plan(&self) -> Option<SubscriptionPlan> {
        let raw = read_item(self.client.tokens().storage().as_ref(), KEY_SUBSCRIPTION_PLAN)?;
        match serde_json::from_str(&raw) {
            Ok(plan) => Some(plan),
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable cached plan");
                None
            }
        }
    }

    fn read_plan(&self, res: HttpResponse, fallback: &str) -> Result<SubscriptionPlan, ServiceError> {
        let res = ensure_success(res, fallback)?;
        let plan: SubscriptionPlan = res.json()?;
        if plan.has_code() {
            self.cache_plan(&plan);
        }
        Ok(plan)
    }

    fn cache_plan(&self, plan: &SubscriptionPlan) {
        match serde_json::to_string(plan) {
            Ok(json) => {
                if write_item(
                    self.client.tokens().storage().as_ref(),
                    KEY_SUBSCRIPTION_PLAN,
                    &json,
                ) {
                    debug!(code = ?plan.code, "Cached subscription plan");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize plan for cache"),
        }
    }
}
