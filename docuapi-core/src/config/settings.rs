//! Client settings for DocuAPI.
//!
//! Settings are persisted to the SQLite database as JSON. The API base URL
//! can additionally be overridden from the environment.

use serde::{Deserialize, Serialize};

use crate::navigation::LOGIN_PATH;

/// API server used when nothing else is configured.
pub const DEFAULT_API_BASE: &str = "http://localhost:8890";

/// Locale sent as `Accept-Language` when none is configured.
pub const DEFAULT_LOCALE: &str = "en";

/// Environment variable overriding the API base URL.
pub const ENV_API_URL: &str = "DOCUAPI_API_URL";

/// Fallback environment variable for the API base URL.
pub const ENV_API_BASE: &str = "DOCUAPI_API_BASE";

const SETTINGS_KEY: &str = "settings";

/// Client settings - persisted to database as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Backend origin, without trailing slash.
    pub api_base: String,

    /// Web app origin used to open the login page in a browser.
    #[serde(default)]
    pub app_base: Option<String>,

    /// UI locale, sent as `Accept-Language`.
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Login entry point for unrecoverable sessions.
    #[serde(default = "default_login_path")]
    pub login_path: String,
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

fn default_login_path() -> String {
    LOGIN_PATH.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            app_base: None,
            locale: default_locale(),
            login_path: default_login_path(),
        }
    }
}

impl Settings {
    /// Load settings from database, using defaults for missing values.
    ///
    /// If settings don't exist or can't be parsed, returns defaults.
    pub fn load(db: &crate::db::Database) -> Self {
        let mut settings = Self::default();

        if let Ok(Some(json)) = db.get_setting(SETTINGS_KEY) {
            match serde_json::from_str::<Settings>(&json) {
                Ok(loaded) => settings = loaded,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to parse settings, using defaults");
                }
            }
        }

        settings.validate();
        settings
    }

    /// Save settings to database.
    pub fn save(&self, db: &crate::db::Database) -> anyhow::Result<()> {
        let json = serde_json::to_string(self)?;
        db.set_setting(SETTINGS_KEY, &json)?;
        Ok(())
    }

    /// Apply `DOCUAPI_API_URL` / `DOCUAPI_API_BASE` from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    /// Apply environment overrides using `lookup` to read variables.
    ///
    /// `DOCUAPI_API_URL` wins over `DOCUAPI_API_BASE`; blank values are ignored.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let base = [ENV_API_URL, ENV_API_BASE]
            .into_iter()
            .filter_map(|name| lookup(name))
            .find(|value| !value.trim().is_empty());

        if let Some(base) = base {
            tracing::debug!(api_base = %base, "API base overridden from environment");
            self.api_base = base;
        }
        self.validate();
    }

    /// Normalize values: trim, strip trailing slashes, fill blanks with defaults.
    pub fn validate(&mut self) {
        self.api_base = self.api_base.trim().trim_end_matches('/').to_string();
        if self.api_base.is_empty() {
            self.api_base = DEFAULT_API_BASE.to_string();
        }

        self.app_base = self
            .app_base
            .take()
            .map(|b| b.trim().trim_end_matches('/').to_string())
            .filter(|b| !b.is_empty());

        self.locale = self.locale.trim().to_string();
        if self.locale.is_empty() {
            self.locale = default_locale();
        }

        self.login_path = self.login_path.trim().to_string();
        if !self.login_path.starts_with('/') {
            self.login_path = default_login_path();
        }
    }

    /// Drop stored settings so the next load falls back to defaults.
    pub fn reset(db: &crate::db::Database) -> anyhow::Result<()> {
        db.delete_setting(SETTINGS_KEY)?;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
