//! Bearer token shape check and refresh wire types.

use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};

/// Refresh endpoint, relative to the API base.
pub const REFRESH_PATH: &str = "/api/accounts/refresh/";

/// Whether `token` looks like a structured (JWT-style) token.
///
/// This is a shape check only: the token must contain a `.` separator.
pub fn looks_like_jwt(token: &str) -> bool {
    token.contains('.')
}

/// `Bearer <token>` header value, or `None` if the token has invalid characters.
pub fn bearer_header(token: &str) -> Option<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}")).ok()?;
    value.set_sensitive(true);
    Some(value)
}

#[derive(Debug, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub struct RefreshResponse {
    #[serde(default)]
    pub access: Option<String>,
    #[serde(default)]
    pub refresh: Option<String>,
}

impl RefreshResponse {
    /// The new access token, if the server returned a non-empty one.
    pub fn access_token(&self) -> Option<&str> {
        self.access.as_deref().filter(|a| !a.is_empty())
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh.as_deref().filter(|r| !r.is_empty())
    }
}
