//! Login, logout and current-user calls.

use reqwest::StatusCode;
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

use super::client::AuthenticatedClient;
use crate::http::{HttpRequest, TransportError};
use crate::models::{LoginRequest, LoginResponse, UserInfo};
use crate::services::{ensure_success, error_detail, ServiceError};

const LOGIN_API_PATH: &str = "/api/accounts/login/";
const LOGOUT_API_PATH: &str = "/api/accounts/logout/";
const ME_API_PATH: &str = "/api/accounts/me/";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Network error: {0}")]
    Transport(#[from] TransportError),
    #[error("Invalid response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    InvalidCredentials(String),
    #[error("Login failed ({status}): {message}")]
    Rejected { status: StatusCode, message: String },
    #[error("Login response did not include an access token")]
    MissingToken,
}

/// Sign in with email and password and persist the returned tokens.
pub async fn login(
    client: &AuthenticatedClient,
    email: &str,
    password: &str,
) -> Result<LoginResponse, SessionError> {
    let req = HttpRequest::post(client.api_url(LOGIN_API_PATH)).json(&LoginRequest {
        email: email.trim(),
        password,
    })?;
    let res = client.send_public(req).await?;

    if !res.is_success() {
        let status = res.status();
        let message = error_detail(&res);
        warn!(%status, "Login rejected");
        return Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::BAD_REQUEST => SessionError::InvalidCredentials(
                message.unwrap_or_else(|| "Invalid email or password".to_string()),
            ),
            _ => SessionError::Rejected {
                status,
                message: message.unwrap_or_else(|| "Unexpected server response".to_string()),
            },
        });
    }

    let body: LoginResponse = res.json()?;
    let access = body
        .access
        .as_deref()
        .filter(|a| !a.is_empty())
        .ok_or(SessionError::MissingToken)?;

    client.tokens().store_session(access, body.refresh.as_deref());
    info!(
        user = body.user.as_ref().map(|u| u.email.as_str()).unwrap_or(""),
        "Signed in"
    );
    Ok(body)
}

/// Sign out: blacklist the refresh token server-side, then clear local tokens.
///
/// Local tokens are cleared even when the server call fails. Returns whether
/// the server acknowledged the logout.
pub async fn logout(client: &AuthenticatedClient) -> Result<bool, SessionError> {
    let outcome = match client.tokens().refresh_token() {
        Some(refresh) => {
            let req = HttpRequest::post(client.api_url(LOGOUT_API_PATH))
                .json(&json!({ "refresh": refresh }))?;
            client.send(req).await.map(|res| res.is_success())
        }
        None => Ok(false),
    };

    client.tokens().clear();
    let acknowledged = outcome?;
    info!(acknowledged, "Signed out");
    Ok(acknowledged)
}

/// The signed-in user's profile.
pub async fn current_user(client: &AuthenticatedClient) -> Result<UserInfo, ServiceError> {
    let res = client
        .send(HttpRequest::get(client.api_url(ME_API_PATH)))
        .await?;
    let res = ensure_success(res, "Failed to load profile")?;
    Ok(res.json()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageProvider;
    use crate::testing::{harness, reply, Reply, ScriptedTransport};
    use reqwest::header::AUTHORIZATION;
    use serde_json::Value;

    #[tokio::test]
    async fn test_login_stores_tokens() {
        let transport = ScriptedTransport::sequence(vec![reply(
            200,
            json!({
                "access": "access.token",
                "refresh": "refresh-token",
                "user": {"id": 1, "email": "user@example.com"},
                "account_type": "individual"
            }),
        )]);
        let h = harness(transport, &[("token", "stale.token")], "/login");

        let res = login(&h.client, " user@example.com ", "CorrectPass1!")
            .await
            .unwrap();

        assert_eq!(res.user.unwrap().email, "user@example.com");
        assert_eq!(h.storage.get("token").unwrap(), Some("access.token".to_string()));
        assert_eq!(h.storage.get("refresh").unwrap(), Some("refresh-token".to_string()));

        let requests = h.transport.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].headers.get(AUTHORIZATION).is_none());
        let body: Value = serde_json::from_slice(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"email": "user@example.com", "password": "CorrectPass1!"}));
    }

    #[tokio::test]
    async fn test_login_rejected_credentials_do_not_redirect() {
        let transport = ScriptedTransport::sequence(vec![reply(
            401,
            json!({"error": "Invalid email or password"}),
        )]);
        let h = harness(transport, &[], "/login");

        let err = login(&h.client, "user@example.com", "WrongPass1!")
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::InvalidCredentials(ref m) if m == "Invalid email or password"));
        assert_eq!(h.transport.call_count(), 1);
        assert!(h.navigator.navigations().is_empty());
        assert!(h.storage.get("token").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_login_without_access_token() {
        let transport = ScriptedTransport::sequence(vec![reply(200, json!({"refresh": "r"}))]);
        let h = harness(transport, &[], "/login");

        let err = login(&h.client, "a@b.c", "x").await.unwrap_err();
        assert!(matches!(err, SessionError::MissingToken));
    }

    #[tokio::test]
    async fn test_login_server_error() {
        let transport = ScriptedTransport::sequence(vec![reply(503, json!({}))]);
        let h = harness(transport, &[], "/login");

        let err = login(&h.client, "a@b.c", "x").await.unwrap_err();
        assert!(matches!(err, SessionError::Rejected { status, .. } if status == StatusCode::SERVICE_UNAVAILABLE));
    }

    #[tokio::test]
    async fn test_logout_posts_refresh_and_clears_tokens() {
        let transport = ScriptedTransport::sequence(vec![reply(205, json!({"detail": "Logged out"}))]);
        let h = harness(
            transport,
            &[("token", "a.b"), ("access", "a.b"), ("refresh", "r1")],
            "/logout",
        );

        assert!(logout(&h.client).await.unwrap());

        let requests = h.transport.requests();
        assert_eq!(requests[0].url, "http://localhost:8890/api/accounts/logout/");
        assert_eq!(requests[0].headers[AUTHORIZATION], "Bearer a.b");
        assert!(h.storage.get("token").unwrap().is_none());
        assert!(h.storage.get("access").unwrap().is_none());
        assert!(h.storage.get("refresh").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_tokens_on_network_error() {
        let transport = ScriptedTransport::sequence(vec![Reply::NetworkError]);
        let h = harness(transport, &[("token", "a.b"), ("refresh", "r1")], "/logout");

        assert!(logout(&h.client).await.is_err());
        assert!(h.storage.get("token").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_logout_without_refresh_token_is_local_only() {
        let transport = ScriptedTransport::sequence(vec![]);
        let h = harness(transport, &[("token", "a.b")], "/logout");

        assert!(!logout(&h.client).await.unwrap());
        assert_eq!(h.transport.call_count(), 0);
        assert!(h.storage.get("token").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_current_user() {
        let transport = ScriptedTransport::sequence(vec![reply(
            200,
            json!({"id": 3, "email": "me@example.com", "username": "me", "first_name": "", "last_name": ""}),
        )]);
        let h = harness(transport, &[("token", "a.b")], "/dashboard");

        let user = current_user(&h.client).await.unwrap();
        assert_eq!(user.id, Some(3));
        assert_eq!(user.username.as_deref(), Some("me"));
    }
}
