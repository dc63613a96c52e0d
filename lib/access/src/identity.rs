//! The session-visible identity of the signed-in user.

use serde::Serialize;

use crate::codec::Claims;

/// Who is signed in, as seen by views and the navigation guard.
///
/// Derived 1:1 from [`Claims`]; there is no other constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    email: String,
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
}

impl Identity {
    /// The user's email address (the token subject).
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// The user's single role tag.
    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    /// The display name, if the token carried one.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Name to show in the UI: the display name, falling back to the email.
    #[must_use]
    pub fn label(&self) -> &str {
        self.display_name().unwrap_or(&self.email)
    }

    /// Exact, case-sensitive role match.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.role == role
    }
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        let (email, role, display_name) = claims.into_parts();
        Self {
            email,
            role,
            display_name,
        }
    }
}
