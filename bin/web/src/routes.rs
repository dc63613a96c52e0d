//! The dashboard's route table.
//!
//! Paths here mirror the `leptos_router` tree built in [`crate::app::App`].

use reservoir_watch_access::{Route, RouteRequirement, RouteTable};

/// Role allowed to manage users.
pub const ADMIN_ROLE: &str = "admin";

/// Path of the user management screen.
pub const USERS_PATH: &str = "/users";

/// Builds the route table consulted by the navigation guard.
#[must_use]
pub fn route_table() -> RouteTable {
    RouteTable::new(vec![
        Route::new("/login").name("Login"),
        Route::new("/")
            .requires(RouteRequirement::AuthOnly)
            .child(Route::new("").name("DashboardHome"))
            .child(
                Route::new("users")
                    .name("UserManagement")
                    .requires(RouteRequirement::role(ADMIN_ROLE)),
            ),
        Route::new("/*any").redirect_to("/"),
    ])
}
