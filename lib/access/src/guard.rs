//! The navigation guard.
//!
//! Consulted before every route transition. Given the target path it looks up
//! the route's requirement, reads the session, and produces exactly one
//! [`Decision`]. Rules are checked in a fixed order and the first match wins:
//!
//! 1. Protected route, nobody signed in: go to login.
//! 2. Login route, somebody signed in: go home.
//! 3. Role-restricted route: proceed on an exact role match, otherwise deny
//!    with a notice and go home.
//! 4. Anything else proceeds.
//!
//! This is a user-experience layer. The API server enforces the same rules
//! on its own.

use tracing::{debug, info};

use crate::config::AccessConfig;
use crate::error::PermissionDenied;
use crate::identity::Identity;
use crate::route::{RouteRequirement, RouteTable, normalize};
use crate::session::SessionHandle;

/// Outcome of evaluating one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Render the target.
    Proceed,
    /// Send the user to the login screen.
    RedirectLogin,
    /// Send the user to the home screen.
    RedirectHome,
    /// Tell the user why, then send them home.
    DenyWithNotice(PermissionDenied),
}

impl Decision {
    /// Returns true if the transition may complete as requested.
    #[must_use]
    pub fn is_proceed(&self) -> bool {
        matches!(self, Self::Proceed)
    }
}

/// What the router should do, in router terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardAction {
    /// Complete the transition.
    Proceed,
    /// Navigate to `to` instead, optionally showing `notice`.
    Redirect { to: String, notice: Option<String> },
}

/// Decides whether a transition may proceed.
#[derive(Debug, Clone)]
pub struct NavigationGuard {
    routes: RouteTable,
    session: SessionHandle,
    login_path: String,
    home_path: String,
}

impl NavigationGuard {
    /// Creates a guard over `routes` reading `session`.
    #[must_use]
    pub fn new(routes: RouteTable, session: SessionHandle, config: &AccessConfig) -> Self {
        Self {
            routes,
            session,
            login_path: normalize(config.login_path()),
            home_path: normalize(config.home_path()),
        }
    }

    /// The route table the guard consults.
    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Evaluates a transition to `path` against the current session.
    #[must_use]
    pub fn evaluate(&self, path: &str) -> Decision {
        self.evaluate_target(path).0
    }

    /// Evaluates a transition and translates the decision for the router.
    ///
    /// A path that only reached its route through redirects is sent to the
    /// path the redirects ended on.
    #[must_use]
    pub fn action(&self, path: &str) -> GuardAction {
        match self.evaluate_target(path) {
            (Decision::Proceed, Some(to)) => GuardAction::Redirect { to, notice: None },
            (decision, _) => self.to_action(decision),
        }
    }

    fn evaluate_target(&self, path: &str) -> (Decision, Option<String>) {
        let target = normalize(path);
        let (requirement, is_login, redirected_to) = match self.routes.resolve(&target) {
            Some(resolved) => {
                let route = resolved.route();
                let redirected_to =
                    (resolved.redirects() > 0).then(|| resolved.path().to_string());
                (
                    route.requirement().clone(),
                    route.path() == self.login_path,
                    redirected_to,
                )
            }
            None => (RouteRequirement::None, target == self.login_path, None),
        };

        let decision = self
            .session
            .with_state(|state| decide(&target, &requirement, is_login, state.current_identity()));

        match &decision {
            Decision::DenyWithNotice(denied) => info!(%denied, "Navigation denied"),
            other => debug!(path = %target, decision = ?other, "Navigation evaluated"),
        }
        (decision, redirected_to)
    }

    /// Translates a decision into a router action.
    #[must_use]
    pub fn to_action(&self, decision: Decision) -> GuardAction {
        match decision {
            Decision::Proceed => GuardAction::Proceed,
            Decision::RedirectLogin => GuardAction::Redirect {
                to: self.login_path.clone(),
                notice: None,
            },
            Decision::RedirectHome => GuardAction::Redirect {
                to: self.home_path.clone(),
                notice: None,
            },
            Decision::DenyWithNotice(denied) => GuardAction::Redirect {
                to: self.home_path.clone(),
                notice: Some(denied.notice()),
            },
        }
    }
}

/// The decision procedure, free of any lookup.
///
/// `path` is only used to describe a denial.
#[must_use]
pub fn decide(
    path: &str,
    requirement: &RouteRequirement,
    is_login_route: bool,
    identity: Option<&Identity>,
) -> Decision {
    let Some(identity) = identity else {
        return if requirement.requires_auth() {
            Decision::RedirectLogin
        } else {
            Decision::Proceed
        };
    };

    if is_login_route {
        return Decision::RedirectHome;
    }

    match requirement {
        RouteRequirement::AuthWithRole(role) if !identity.has_role(role) => {
            Decision::DenyWithNotice(PermissionDenied {
                path: path.to_string(),
                required_role: role.clone(),
                actual_role: identity.role().to_string(),
            })
        }
        RouteRequirement::AuthWithRole(_) | RouteRequirement::AuthOnly | RouteRequirement::None => {
            Decision::Proceed
        }
    }
}
