//! DocuAPI Core Library
//!
//! This crate provides the client-side core of DocuAPI, a document
//! processing platform. It includes:
//!
//! - An authenticated HTTP client with bearer tokens and one-shot refresh
//! - Login redirect when a session cannot be recovered
//! - Token and key-value storage backed by SQLite
//! - Configuration management (settings, environment overrides)
//! - Session calls (login, logout, current user)
//! - Dashboard, document and subscription services
//! - The application route table and navigation guard

pub mod auth;
pub mod config;
pub mod db;
pub mod http;
pub mod models;
pub mod navigation;
pub mod routes;
pub mod services;
pub mod storage;

#[cfg(test)]
mod testing;

// Re-exports for convenience
pub use config::Settings;
pub use db::Database;

// Re-export auth
pub use auth::{current_user, login, logout, AuthenticatedClient, SessionError};

// Re-export transport and navigation seams
pub use http::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError};
pub use navigation::{HistoryNavigator, Navigator};

// Re-export storage
pub use storage::{MemoryStorage, SqliteStorage, StorageError, StorageProvider, TokenStore};

// Re-export services
pub use services::{DashboardApi, ServiceError, SubscriptionApi};

// Re-export routing
pub use routes::{guard, GuardDecision, Router};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
