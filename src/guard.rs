//! Access decisions made before a view is shown.
//!
//! The guard is a pure function of the current session. It never fails and
//! never caches: every navigation evaluates it again. An expired token still
//! passes here and is only rejected by the API on the next request.

use std::fmt;

use crate::session::Session;
use crate::types::WatchId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    Admin,
    Watch(WatchId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(Route),
}

impl Route {
    pub fn access(&self) -> Access {
        match self {
            Route::Admin => Access::Admin,
            Route::Home | Route::Login | Route::Register | Route::Watch(_) => Access::Public,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Admin => "/admin".to_string(),
            Route::Watch(id) => format!("/watches/{}", id),
        }
    }

    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Some(Route::Home),
            "/login" => Some(Route::Login),
            "/register" => Some(Route::Register),
            "/admin" => Some(Route::Admin),
            _ => trimmed
                .strip_prefix("/watches/")
                .and_then(|id| id.parse().ok())
                .map(Route::Watch),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Gate on a session: no token goes to login, a non-admin asking for an
/// admin view goes home, everything else renders
pub fn check(session: &Session, require_admin: bool) -> Decision {
    if !session.is_authenticated() {
        return Decision::Redirect(Route::Login);
    }
    if require_admin && !session.is_admin() {
        return Decision::Redirect(Route::Home);
    }
    Decision::Allow
}

/// Decide whether `route` may be shown for `session`
pub fn authorize(session: &Session, route: Route) -> Decision {
    match route.access() {
        Access::Public => Decision::Allow,
        Access::Admin => check(session, true),
    }
}
