//! Per-route authorization requirements and the route table.
//!
//! Routes are declared once, at start up, as an ordered tree. The table
//! flattens the tree into a list of entries, each carrying the requirement
//! that applies to it. A child with no explicit requirement inherits its
//! parent's; an explicit requirement on the child replaces the parent's.
//!
//! Matching is by path segment:
//! - `users` matches the literal segment
//! - `:id` matches any single segment
//! - `*rest` matches the remainder of the path (including nothing)
//!
//! The first entry that matches wins. Children are tried before their parent
//! so that the most specific declaration applies.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Redirect chains longer than this resolve to nothing.
const MAX_REDIRECTS: usize = 8;

/// What a route demands of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "role", rename_all = "snake_case")]
pub enum RouteRequirement {
    /// Reachable regardless of session state.
    #[default]
    None,
    /// Requires a signed-in identity.
    AuthOnly,
    /// Requires a signed-in identity with exactly this role.
    AuthWithRole(String),
}

impl RouteRequirement {
    /// Builds a requirement from a role name.
    #[must_use]
    pub fn role(role: impl Into<String>) -> Self {
        Self::AuthWithRole(role.into())
    }

    /// Maps the loose `{ requires_auth, requires_role }` form onto the typed
    /// requirement. A required role implies authentication.
    #[must_use]
    pub fn from_flags(requires_auth: bool, requires_role: Option<String>) -> Self {
        match (requires_auth, requires_role) {
            (_, Some(role)) => Self::AuthWithRole(role),
            (true, None) => Self::AuthOnly,
            (false, None) => Self::None,
        }
    }

    /// Returns true if the route needs a signed-in identity.
    #[must_use]
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Returns the required role, if any.
    #[must_use]
    pub fn required_role(&self) -> Option<&str> {
        match self {
            Self::AuthWithRole(role) => Some(role),
            Self::None | Self::AuthOnly => None,
        }
    }
}

/// A route declaration.
#[derive(Debug, Clone)]
pub struct Route {
    path: String,
    name: Option<String>,
    requirement: Option<RouteRequirement>,
    redirect: Option<String>,
    children: Vec<Route>,
}

impl Route {
    /// Declares a route at `path`. Child paths are relative to the parent
    /// unless they start with `/`.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
            requirement: None,
            redirect: None,
            children: Vec::new(),
        }
    }

    /// Names the route.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets an explicit requirement.
    #[must_use]
    pub fn requires(mut self, requirement: RouteRequirement) -> Self {
        self.requirement = Some(requirement);
        self
    }

    /// Makes the route a redirect to a literal path.
    #[must_use]
    pub fn redirect_to(mut self, path: impl Into<String>) -> Self {
        self.redirect = Some(path.into());
        self
    }

    /// Adds a nested route.
    #[must_use]
    pub fn child(mut self, route: Route) -> Self {
        self.children.push(route);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PatternSegment {
    Static(String),
    Param,
    Rest,
}

/// A flattened route with its effective requirement.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    path: String,
    name: Option<String>,
    requirement: RouteRequirement,
    redirect: Option<String>,
    pattern: Vec<PatternSegment>,
}

impl RouteEntry {
    /// The full, normalized path pattern.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The route name, if one was given.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The effective requirement after inheritance.
    #[must_use]
    pub fn requirement(&self) -> &RouteRequirement {
        &self.requirement
    }

    /// The redirect target, if this route only redirects.
    #[must_use]
    pub fn redirect(&self) -> Option<&str> {
        self.redirect.as_deref()
    }

    fn matches(&self, segments: &[&str]) -> bool {
        let mut remaining = segments.iter();
        for part in &self.pattern {
            match part {
                PatternSegment::Rest => return true,
                PatternSegment::Param => {
                    if remaining.next().is_none() {
                        return false;
                    }
                }
                PatternSegment::Static(expected) => {
                    if remaining.next() != Some(&expected.as_str()) {
                        return false;
                    }
                }
            }
        }
        remaining.next().is_none()
    }
}

/// Outcome of resolving a path against the table.
#[derive(Debug, Clone)]
pub struct Resolved<'a> {
    route: &'a RouteEntry,
    path: String,
    redirects: usize,
}

impl<'a> Resolved<'a> {
    /// The route that finally matched.
    #[must_use]
    pub fn route(&self) -> &'a RouteEntry {
        self.route
    }

    /// The normalized path after following redirects.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// How many redirects were followed to get there.
    #[must_use]
    pub fn redirects(&self) -> usize {
        self.redirects
    }
}

/// The ordered, flattened route table.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// Flattens the declarations, in order.
    #[must_use]
    pub fn new(routes: Vec<Route>) -> Self {
        let mut entries = Vec::new();
        for route in routes {
            flatten(route, "", &RouteRequirement::None, &mut entries);
        }
        Self { entries }
    }

    /// The flattened entries in match order.
    pub fn entries(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter()
    }

    /// Finds the first entry matching `path`, without following redirects.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<&RouteEntry> {
        let normalized = normalize(path);
        let segments = split(&normalized);
        self.entries.iter().find(|entry| entry.matches(&segments))
    }

    /// Finds the route `path` ends up on, following redirects.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<Resolved<'_>> {
        let mut current = normalize(path);
        for redirects in 0..=MAX_REDIRECTS {
            let route = self.find(&current)?;
            match route.redirect() {
                Some(target) => current = normalize(target),
                None => {
                    return Some(Resolved {
                        route,
                        path: current,
                        redirects,
                    });
                }
            }
        }
        warn!(path, limit = MAX_REDIRECTS, "Redirect chain too long, treating path as unmatched");
        None
    }
}

fn flatten(route: Route, parent_path: &str, inherited: &RouteRequirement, out: &mut Vec<RouteEntry>) {
    let path = if route.path.starts_with('/') {
        normalize(&route.path)
    } else {
        normalize(&format!("{parent_path}/{}", route.path))
    };
    let requirement = route.requirement.unwrap_or_else(|| inherited.clone());

    for child in route.children {
        flatten(child, &path, &requirement, out);
    }

    let pattern = split(&path)
        .into_iter()
        .map(|segment| {
            if segment.starts_with(':') {
                PatternSegment::Param
            } else if segment.starts_with('*') {
                PatternSegment::Rest
            } else {
                PatternSegment::Static(segment.to_string())
            }
        })
        .collect();

    out.push(RouteEntry {
        path,
        name: route.name,
        requirement,
        redirect: route.redirect,
        pattern,
    });
}

/// Normalizes a path: drops query and fragment, collapses duplicate and
/// trailing slashes, always starts with `/`.
#[must_use]
pub fn normalize(path: &str) -> String {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let segments = split(&path[..end]);
    format!("/{}", segments.join("/"))
}

fn split(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dashboard() -> RouteTable {
        RouteTable::new(vec![
            Route::new("/login").name("login"),
            Route::new("/")
                .requires(RouteRequirement::AuthOnly)
                .child(Route::new("").name("home"))
                .child(
                    Route::new("users")
                        .name("users")
                        .requires(RouteRequirement::role("admin")),
                )
                .child(Route::new("reservoirs/:id").name("reservoir")),
            Route::new("/about").name("about"),
            Route::new("/*any").redirect_to("/"),
        ])
    }

    #[test]
    fn from_flags_maps_legacy_meta() {
        assert_eq!(RouteRequirement::from_flags(false, None), RouteRequirement::None);
        assert_eq!(RouteRequirement::from_flags(true, None), RouteRequirement::AuthOnly);
        assert_eq!(
            RouteRequirement::from_flags(true, Some("admin".to_string())),
            RouteRequirement::role("admin")
        );
        // A role without the auth flag still implies authentication.
        assert_eq!(
            RouteRequirement::from_flags(false, Some("admin".to_string())),
            RouteRequirement::role("admin")
        );
    }

    #[test]
    fn requirement_accessors() {
        assert!(!RouteRequirement::None.requires_auth());
        assert!(RouteRequirement::AuthOnly.requires_auth());
        assert!(RouteRequirement::role("admin").requires_auth());
        assert_eq!(RouteRequirement::role("admin").required_role(), Some("admin"));
        assert_eq!(RouteRequirement::AuthOnly.required_role(), None);
    }

    #[test]
    fn requirement_serialization_format() {
        let json = serde_json::to_string(&RouteRequirement::role("admin")).expect("serialize");
        assert_eq!(json, r#"{"kind":"auth_with_role","role":"admin"}"#);

        let parsed: RouteRequirement =
            serde_json::from_str(r#"{"kind":"auth_only"}"#).expect("deserialize");
        assert_eq!(parsed, RouteRequirement::AuthOnly);
    }

    #[test]
    fn normalize_paths() {
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize("users"), "/users");
        assert_eq!(normalize("/users/"), "/users");
        assert_eq!(normalize("//users///list"), "/users/list");
        assert_eq!(normalize("/users?page=2#top"), "/users");
        assert_eq!(normalize("/#/login"), "/");
    }

    #[test]
    fn children_inherit_parent_requirement() {
        let table = dashboard();
        let home = table.find("/").expect("home");
        assert_eq!(home.name(), Some("home"));
        assert_eq!(home.requirement(), &RouteRequirement::AuthOnly);

        let reservoir = table.find("/reservoirs/7").expect("reservoir");
        assert_eq!(reservoir.requirement(), &RouteRequirement::AuthOnly);
    }

    #[test]
    fn child_requirement_overrides_parent() {
        let table = dashboard();
        let users = table.find("/users").expect("users");
        assert_eq!(users.path(), "/users");
        assert_eq!(users.requirement(), &RouteRequirement::role("admin"));
    }

    #[test]
    fn top_level_routes_default_to_none() {
        let table = dashboard();
        assert_eq!(
            table.find("/login").expect("login").requirement(),
            &RouteRequirement::None
        );
        assert_eq!(
            table.find("/about").expect("about").requirement(),
            &RouteRequirement::None
        );
    }

    #[test]
    fn children_are_listed_before_parent() {
        let table = dashboard();
        let paths: Vec<&str> = table.entries().map(RouteEntry::path).collect();
        assert_eq!(
            paths,
            vec!["/login", "/", "/users", "/reservoirs/:id", "/", "/about", "/*any"]
        );
    }

    #[test]
    fn param_segment_needs_a_value() {
        let table = dashboard();
        let resolved = table.resolve("/reservoirs").expect("falls through to catch-all");
        // `/reservoirs` alone is not the reservoir route; the catch-all sends it home.
        assert_eq!(resolved.route().name(), Some("home"));
        assert_eq!(resolved.redirects(), 1);
        assert_eq!(resolved.path(), "/");
    }

    #[test]
    fn catch_all_redirects_to_home() {
        let table = dashboard();
        let caught = table.find("/does/not/exist").expect("catch-all");
        assert_eq!(caught.redirect(), Some("/"));

        let resolved = table.resolve("/does/not/exist").expect("resolved");
        assert_eq!(resolved.route().name(), Some("home"));
        assert_eq!(resolved.route().requirement(), &RouteRequirement::AuthOnly);
    }

    #[test]
    fn unmatched_path_without_catch_all() {
        let table = RouteTable::new(vec![Route::new("/login")]);
        assert!(table.resolve("/elsewhere").is_none());
    }

    #[test]
    fn redirect_loops_resolve_to_nothing() {
        let table = RouteTable::new(vec![
            Route::new("/a").redirect_to("/b"),
            Route::new("/b").redirect_to("/a"),
        ]);
        assert!(table.resolve("/a").is_none());
    }

    #[test]
    fn absolute_child_paths_are_not_prefixed() {
        let table = RouteTable::new(vec![
            Route::new("/admin")
                .requires(RouteRequirement::role("admin"))
                .child(Route::new("/audit").name("audit")),
        ]);
        let audit = table.find("/audit").expect("audit");
        assert_eq!(audit.requirement(), &RouteRequirement::role("admin"));
        assert!(table.find("/admin/audit").is_none());
    }

    #[test]
    fn rest_segment_matches_empty_remainder() {
        let table = RouteTable::new(vec![Route::new("/files/*path").name("files")]);
        assert!(table.find("/files").is_some());
        assert!(table.find("/files/a/b/c").is_some());
        assert!(table.find("/other").is_none());
    }
}
