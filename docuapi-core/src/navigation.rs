//! Navigation capability.
//!
//! The authenticated client never navigates on its own; it asks a
//! [`Navigator`] for the current location and hands it the login target.

use std::sync::Mutex;

/// Login entry point.
pub const LOGIN_PATH: &str = "/login";

/// Navigation port: where the user is, and how to send them elsewhere.
pub trait Navigator: Send + Sync {
    /// Current path and query string, e.g. `/documents?limit=5`.
    fn current_location(&self) -> String;

    /// Navigate to `target` (a path with optional query).
    fn navigate(&self, target: &str);
}

/// Percent-encode a single URL component.
///
/// Matches `encodeURIComponent` for the characters that appear in paths and
/// queries: `/`, `?`, `=` and `&` are escaped and spaces become `%20`.
pub fn encode_component(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Build `<login_path>?redirect=<encoded destination>`.
pub fn login_redirect_url(login_path: &str, destination: &str) -> String {
    format!("{login_path}?redirect={}", encode_component(destination))
}

/// In-process navigator keeping a history stack.
///
/// The last entry is the current location.
#[derive(Debug)]
pub struct HistoryNavigator {
    entries: Mutex<Vec<String>>,
}

impl HistoryNavigator {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: Mutex::new(vec![initial.into()]),
        }
    }

    /// All visited locations, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Locations navigated to after the initial one.
    pub fn navigations(&self) -> Vec<String> {
        self.history().into_iter().skip(1).collect()
    }
}

impl Default for HistoryNavigator {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for HistoryNavigator {
    fn current_location(&self) -> String {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
            .unwrap_or_else(|| "/".to_string())
    }

    fn navigate(&self, target: &str) {
        tracing::debug!(destination = %target, "Navigating");
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(target.to_string());
    }
}
