//! Terminal navigator: tracks the location and surfaces login redirects.

use docuapi_core::{HistoryNavigator, Navigator};

pub struct TerminalNavigator {
    history: HistoryNavigator,
    login_path: String,
    app_base: Option<String>,
}

impl TerminalNavigator {
    pub fn new(initial: &str, login_path: &str, app_base: Option<String>) -> Self {
        Self {
            history: HistoryNavigator::new(initial),
            login_path: login_path.to_string(),
            app_base,
        }
    }

    /// A login target carrying the page the user was sent away from.
    fn is_login_redirect(&self, target: &str) -> bool {
        target
            .strip_prefix(self.login_path.as_str())
            .is_some_and(|rest| rest.starts_with("?redirect="))
    }

    /// Whether the session was given up on and the user sent to sign in.
    pub fn redirected_to_login(&self) -> bool {
        self.history
            .navigations()
            .iter()
            .any(|target| self.is_login_redirect(target))
    }
}

impl Navigator for TerminalNavigator {
    fn current_location(&self) -> String {
        self.history.current_location()
    }

    fn navigate(&self, target: &str) {
        self.history.navigate(target);
        if !self.is_login_redirect(target) {
            return;
        }

        eprintln!("Session expired or missing. Sign in with `docuapi login`.");
        if let Some(base) = &self.app_base {
            let url = format!("{base}{target}");
            tracing::info!(%url, "Opening login page");
            if let Err(e) = webbrowser::open(&url) {
                tracing::warn!(error = %e, "Failed to open browser");
            }
        }
    }
}
