//! API payload types.

mod account;
mod types;

pub use account::{
    LoginResponse, PlanCode, PlanLimits, SalesInquiry, SubscriptionPlan, UserInfo,
};
pub(crate) use account::{LoginRequest, PlanUpdate};
pub use types::{DashboardSummary, Document, DocumentId, UsagePoint};
