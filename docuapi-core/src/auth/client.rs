//! Authenticated request client with one-shot token refresh.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, AUTHORIZATION};
use reqwest::StatusCode;
use tracing::{debug, error, info, warn};

use super::token::{bearer_header, looks_like_jwt, RefreshRequest, RefreshResponse, REFRESH_PATH};
use crate::config::Settings;
use crate::http::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use crate::navigation::{login_redirect_url, Navigator};
use crate::storage::{StorageProvider, TokenStore};

/// Wraps outbound requests with bearer auth and a single refresh-and-retry.
///
/// `send` only fails on network errors. Every HTTP status, 401 included, is
/// returned to the caller as a response. When the session cannot be
/// recovered the navigator is sent to the login page as a side effect.
#[derive(Clone)]
pub struct AuthenticatedClient {
    transport: Arc<dyn HttpTransport>,
    tokens: TokenStore,
    navigator: Arc<dyn Navigator>,
    api_base: String,
    login_path: String,
    locale: Option<HeaderValue>,
}

impl AuthenticatedClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        storage: Arc<dyn StorageProvider>,
        navigator: Arc<dyn Navigator>,
        settings: &Settings,
    ) -> Self {
        let locale = HeaderValue::from_str(&settings.locale)
            .map_err(|e| warn!(locale = %settings.locale, error = %e, "Ignoring invalid locale"))
            .ok();

        Self {
            transport,
            tokens: TokenStore::new(storage),
            navigator,
            api_base: settings.api_base.clone(),
            login_path: settings.login_path.clone(),
            locale,
        }
    }

    /// Absolute URL for an API path.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    /// Send `request` with the stored bearer token, refreshing once on 401.
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut pending = request;
        self.apply_locale(&mut pending.headers);

        let mut first = pending.clone();
        match self
            .tokens
            .access_token()
            .filter(|t| looks_like_jwt(t))
            .and_then(|t| bearer_header(&t))
        {
            Some(value) => {
                first.headers.insert(AUTHORIZATION, value);
            }
            None => {
                first.headers.remove(AUTHORIZATION);
            }
        }

        let response = self.transport.execute(first).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        debug!(url = %pending.url, "Request unauthorized, attempting token refresh");
        let Some(refresh) = self.tokens.refresh_token() else {
            info!("No refresh token stored");
            self.redirect_to_login();
            return Ok(response);
        };

        let Some(bearer) = self.refresh_access_token(&refresh).await else {
            self.redirect_to_login();
            return Ok(response);
        };

        let mut retry = pending;
        retry.headers.insert(AUTHORIZATION, bearer);
        self.transport.execute(retry).await
    }

    /// Send without bearer auth or refresh handling (login, public endpoints).
    pub async fn send_public(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut request = request;
        self.apply_locale(&mut request.headers);
        self.transport.execute(request).await
    }

    /// Exchange `refresh` for a new access token and persist the result.
    ///
    /// Returns the retry's Authorization value, or `None` on any failure.
    async fn refresh_access_token(&self, refresh: &str) -> Option<HeaderValue> {
        let request = HttpRequest::post(self.api_url(REFRESH_PATH))
            .json(&RefreshRequest { refresh })
            .map_err(|e| error!(error = %e, "Failed to encode refresh request"))
            .ok()?;

        let response = match self.send_public(request).await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "Token refresh request failed");
                return None;
            }
        };

        if !response.is_success() {
            warn!(status = %response.status(), "Token refresh rejected");
            return None;
        }

        let body: RefreshResponse = response.json().unwrap_or_default();
        let Some(access) = body.access_token() else {
            warn!("Token refresh response carried no access token");
            return None;
        };
        let Some(bearer) = bearer_header(access) else {
            warn!("Refreshed access token is not a valid header value");
            return None;
        };

        self.tokens.store_session(access, body.refresh_token());
        info!(
            rotated_refresh = body.refresh_token().is_some(),
            "Access token refreshed"
        );
        Some(bearer)
    }

    fn apply_locale(&self, headers: &mut HeaderMap) {
        if let Some(locale) = &self.locale {
            if !headers.contains_key(ACCEPT_LANGUAGE) {
                headers.insert(ACCEPT_LANGUAGE, locale.clone());
            }
        }
    }

    fn redirect_to_login(&self) {
        let current = self.navigator.current_location();
        let login_url = login_redirect_url(&self.login_path, &current);
        info!(%login_url, "Session cannot be recovered, redirecting to login");
        self.navigator.navigate(&login_url);
    }
}
