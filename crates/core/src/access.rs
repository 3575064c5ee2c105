//! Role-gated access
//!
//! One decision function for every protected view. The router re-runs
//! [`guard`] whenever the session or the location changes.

use crate::{
    routes::Route,
    session::{Role, SessionState},
};

/// Outcome of checking a session against a view's allowed roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// The session hasn't been restored yet.
    Loading,
    /// Nobody is signed in.
    Unauthenticated,
    /// Signed in with a role the view doesn't allow.
    Forbidden(Role),
    /// Signed in with an allowed role, or the view is public.
    Authorized,
}

/// What the router should do with a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Show the loading placeholder and wait.
    Placeholder,
    /// Navigate elsewhere.
    Redirect(Route),
    /// Show the view.
    Render,
}

/// Checks `state` against `allowed`. `None` means the view is public.
#[must_use]
pub fn authorize(state: SessionState, allowed: Option<&[Role]>) -> Access {
    let Some(allowed) = allowed else {
        return Access::Authorized;
    };

    match state {
        SessionState::Unknown => Access::Loading,
        SessionState::Anonymous => Access::Unauthenticated,
        SessionState::Authenticated(role) if allowed.contains(&role) => Access::Authorized,
        SessionState::Authenticated(role) => Access::Forbidden(role),
    }
}

/// Decides how to handle a visit to `route`.
#[must_use]
pub fn guard(state: SessionState, route: Route) -> GuardOutcome {
    match authorize(state, route.allowed_roles()) {
        Access::Loading => GuardOutcome::Placeholder,
        Access::Unauthenticated => GuardOutcome::Redirect(Route::Login),
        Access::Forbidden(role) => GuardOutcome::Redirect(role.landing()),
        Access::Authorized => GuardOutcome::Render,
    }
}
