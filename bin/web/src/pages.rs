//! Page components for the application.
//!
//! Each page is a Leptos component rendered by one route. Access checks
//! happen before a page is rendered, in [`crate::gate::Guarded`].

pub mod home;
pub mod layout;
pub mod login;
pub mod users;

// Re-export all page components for convenient access
pub use home::DashboardHome;
pub use layout::DashboardLayout;
pub use login::LoginPage;
pub use users::UserManagementPage;
