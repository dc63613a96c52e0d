//! Error types for the access crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `MalformedToken`: A persisted or freshly issued token could not be decoded
//! - `StorageError`: The persistent token slot is missing or refused an operation
//! - `PermissionDenied`: The current identity lacks the role a route requires
//!
//! None of these are fatal. The token manager recovers from the first two by
//! falling back to the anonymous session, and the navigation guard turns the
//! last one into a notice plus a redirect home.

use rootcause::Report;
use std::fmt;

/// A Result type alias using rootcause's Report for error handling.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;

/// Token segment names, used to point at the part that failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Header,
    Payload,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header => write!(f, "header"),
            Self::Payload => write!(f, "payload"),
        }
    }
}

/// A token that is not a structurally valid signed-claims token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedToken {
    /// The token does not have exactly three dot-separated segments.
    SegmentCount { found: usize },
    /// A segment is not valid base64url.
    Encoding { segment: Segment },
    /// A segment decoded but is not a JSON object of the expected shape.
    Json { segment: Segment, details: String },
    /// A required claim is absent.
    MissingClaim { claim: &'static str },
    /// A claim is present but unusable (empty, wrong range).
    InvalidClaim { claim: &'static str, reason: String },
}

impl fmt::Display for MalformedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SegmentCount { found } => {
                write!(f, "malformed token: expected 3 segments, found {found}")
            }
            Self::Encoding { segment } => {
                write!(f, "malformed token: {segment} is not valid base64url")
            }
            Self::Json { segment, details } => {
                write!(f, "malformed token: {segment} is not valid JSON: {details}")
            }
            Self::MissingClaim { claim } => {
                write!(f, "malformed token: missing required claim '{claim}'")
            }
            Self::InvalidClaim { claim, reason } => {
                write!(f, "malformed token: invalid claim '{claim}': {reason}")
            }
        }
    }
}

impl std::error::Error for MalformedToken {}

/// Errors from the persistent token slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// No storage backend is reachable (no browser window, storage disabled).
    Unavailable { reason: String },
    /// The backend exists but the operation failed.
    Failed {
        operation: &'static str,
        reason: String,
    },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable { reason } => {
                write!(f, "token storage unavailable: {reason}")
            }
            Self::Failed { operation, reason } => {
                write!(f, "token storage {operation} failed: {reason}")
            }
        }
    }
}

impl std::error::Error for StorageError {}

/// The current identity does not carry the role a route requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionDenied {
    /// Path the user tried to reach.
    pub path: String,
    /// Role the route requires.
    pub required_role: String,
    /// Role the current identity has.
    pub actual_role: String,
}

impl PermissionDenied {
    /// Human-readable notice for the user interface.
    #[must_use]
    pub fn notice(&self) -> String {
        format!(
            "You do not have permission to view {}. The '{}' role is required.",
            self.path, self.required_role
        )
    }
}

impl fmt::Display for PermissionDenied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "permission denied for '{}': requires role '{}', have '{}'",
            self.path, self.required_role, self.actual_role
        )
    }
}

impl std::error::Error for PermissionDenied {}
