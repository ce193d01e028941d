//! Application route table and the navigation guard.

use std::sync::Arc;

use tracing::debug;

use crate::navigation::{login_redirect_url, Navigator};
use crate::storage::TokenStore;

/// Where signed-in users land when they open a public page.
pub const HOME_PATH: &str = "/dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub public: bool,
    pub hide_sidebar: bool,
}

impl RouteMeta {
    const fn private() -> Self {
        Self {
            requires_auth: true,
            public: false,
            hide_sidebar: false,
        }
    }

    const fn public() -> Self {
        Self {
            requires_auth: false,
            public: true,
            hide_sidebar: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub name: &'static str,
    pub pattern: &'static str,
    pub meta: RouteMeta,
}

pub const ROUTES: &[Route] = &[
    Route {
        name: "Root",
        pattern: "/",
        meta: RouteMeta::private(),
    },
    Route {
        name: "Dashboard",
        pattern: "/dashboard",
        meta: RouteMeta::private(),
    },
    Route {
        name: "Documents",
        pattern: "/documents",
        meta: RouteMeta::private(),
    },
    Route {
        name: "DocumentDetail",
        pattern: "/documents/:id",
        meta: RouteMeta::private(),
    },
    Route {
        name: "Logout",
        pattern: "/logout",
        meta: RouteMeta::private(),
    },
    Route {
        name: "Login",
        pattern: "/login",
        meta: RouteMeta::public(),
    },
    Route {
        name: "Register",
        pattern: "/register",
        meta: RouteMeta::public(),
    },
];

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Find the route for `full_path`, ignoring query, fragment and trailing slash.
pub fn match_route(full_path: &str) -> Option<&'static Route> {
    let path = full_path
        .split(['?', '#'])
        .next()
        .unwrap_or_default();

    ROUTES.iter().find(|route| {
        let mut want = segments(route.pattern);
        let mut got = segments(path);
        loop {
            match (want.next(), got.next()) {
                (None, None) => return true,
                (Some(w), Some(_)) if w.starts_with(':') => {}
                (Some(w), Some(g)) if w == g => {}
                _ => return false,
            }
        }
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(String),
}

/// Decide whether navigating to `full_path` is allowed.
///
/// Unknown paths fall back to the login page, which signed-in users
/// bounce off to `HOME_PATH`.
pub fn guard(full_path: &str, has_token: bool, login_path: &str) -> GuardDecision {
    let Some(route) = match_route(full_path) else {
        let fallback = if has_token { HOME_PATH } else { login_path };
        return GuardDecision::Redirect(fallback.to_string());
    };

    if !has_token && !route.meta.public {
        return GuardDecision::Redirect(login_redirect_url(login_path, full_path));
    }
    if has_token && route.meta.public {
        return GuardDecision::Redirect(HOME_PATH.to_string());
    }
    GuardDecision::Allow
}

/// Applies the guard before every navigation.
pub struct Router {
    tokens: TokenStore,
    navigator: Arc<dyn Navigator>,
    login_path: String,
}

impl Router {
    pub fn new(
        tokens: TokenStore,
        navigator: Arc<dyn Navigator>,
        login_path: impl Into<String>,
    ) -> Self {
        Self {
            tokens,
            navigator,
            login_path: login_path.into(),
        }
    }

    /// Navigate to `full_path`, or wherever the guard sends us instead.
    /// Returns the path actually navigated to.
    pub fn push(&self, full_path: &str) -> String {
        let destination = match guard(full_path, self.tokens.has_access_token(), &self.login_path) {
            GuardDecision::Allow => full_path.to_string(),
            GuardDecision::Redirect(to) => {
                debug!(from = full_path, to = %to, "Route guard redirect");
                to
            }
        };
        self.navigator.navigate(&destination);
        destination
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::HistoryNavigator;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_match_route() {
        assert_eq!(match_route("/").unwrap().name, "Root");
        assert_eq!(match_route("/dashboard/").unwrap().name, "Dashboard");
        assert_eq!(match_route("/documents?limit=5").unwrap().name, "Documents");
        assert_eq!(match_route("/documents/42").unwrap().name, "DocumentDetail");
        assert!(match_route("/documents/42/edit").is_none());
        assert!(match_route("/settings").is_none());
    }

    #[test]
    fn test_guard_unknown_path() {
        assert_eq!(
            guard("/nowhere", false, "/login"),
            GuardDecision::Redirect("/login".to_string())
        );
        assert_eq!(
            guard("/nowhere", true, "/login"),
            GuardDecision::Redirect("/dashboard".to_string())
        );
    }

    #[test]
    fn test_guard_requires_token() {
        assert_eq!(
            guard("/documents?limit=5", false, "/login"),
            GuardDecision::Redirect("/login?redirect=%2Fdocuments%3Flimit%3D5".to_string())
        );
        assert_eq!(guard("/documents/7", true, "/login"), GuardDecision::Allow);
    }

    #[test]
    fn test_guard_public_pages() {
        assert_eq!(guard("/login", false, "/login"), GuardDecision::Allow);
        assert_eq!(guard("/register", false, "/login"), GuardDecision::Allow);
        assert_eq!(
            guard("/login", true, "/login"),
            GuardDecision::Redirect("/dashboard".to_string())
        );
    }

    #[test]
    fn test_router_push() {
        let storage = MemoryStorage::new();
        let navigator = Arc::new(HistoryNavigator::default());
        let router = Router::new(
            TokenStore::new(Arc::new(storage.clone())),
            navigator.clone(),
            "/login",
        );

        assert_eq!(router.push("/dashboard"), "/login?redirect=%2Fdashboard");

        TokenStore::new(Arc::new(storage)).store_access_token("a.b");
        assert_eq!(router.push("/dashboard"), "/dashboard");
        assert_eq!(router.push("/login"), "/dashboard");

        assert_eq!(
            navigator.navigations(),
            vec!["/login?redirect=%2Fdashboard", "/dashboard", "/dashboard"]
        );
    }

    #[test]
    fn test_guard_uses_configured_login_path() {
        assert_eq!(
            guard("/documents", false, "/signin"),
            GuardDecision::Redirect("/signin?redirect=%2Fdocuments".to_string())
        );
        assert_eq!(
            guard("/nowhere", false, "/signin"),
            GuardDecision::Redirect("/signin".to_string())
        );

        let navigator = Arc::new(HistoryNavigator::default());
        let router = Router::new(
            TokenStore::new(Arc::new(MemoryStorage::new())),
            navigator.clone(),
            "/signin",
        );
        assert_eq!(router.push("/documents/3"), "/signin?redirect=%2Fdocuments%2F3");
    }
}
