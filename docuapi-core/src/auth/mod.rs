//! Authentication module for the DocuAPI backend.
//!
//! This module provides:
//! - Bearer token attachment with a structural shape check
//! - One-shot token refresh and retry on 401
//! - Login redirect when the session cannot be recovered
//! - Login, logout and current-user session calls

pub mod client;
pub mod session;
pub mod token;

pub use client::AuthenticatedClient;
pub use session::{current_user, login, logout, SessionError};
pub use token::{bearer_header, looks_like_jwt, RefreshResponse, REFRESH_PATH};
