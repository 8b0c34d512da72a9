//! Path routing and navigation history.
//!
//! Logical paths are always stored and compared without the deployment base
//! prefix. The prefix is applied when a path leaves for the browser-facing
//! side ([`BasePath::to_browser`]) and removed when one comes back
//! ([`BasePath::from_browser`]). Nothing else ever sees a prefixed path.

use std::fmt;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::employee::EmployeeId;

/// Logical path of the employee list.
pub const LIST_PATH: &str = "/employees";

/// Logical path of the create form.
pub const NEW_PATH: &str = "/employees/new";

/// Bound on chained redirects while resolving one navigation.
const MAX_REDIRECTS: usize = 4;

/// Make `path` absolute, collapse repeated slashes, drop any query or
/// fragment, and drop a trailing slash except on the root.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

/// Deployment base prefix in canonical `/prefix/` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BasePath(String);

impl BasePath {
    /// Parse the href of a base tag.
    ///
    /// Relative and absolute forms are accepted (`repo`, `/repo`, `/repo/`);
    /// empty input means the root. Absolute URLs, queries, fragments, and
    /// whitespace are rejected.
    #[must_use]
    pub fn parse(href: &str) -> Option<Self> {
        let href = href.trim();
        if href.contains("://") || href.contains(['?', '#']) || href.contains(char::is_whitespace)
        {
            return None;
        }
        let normalized = normalize_path(href);
        if normalized == "/" {
            Some(Self::default())
        } else {
            Some(Self(format!("{normalized}/")))
        }
    }

    /// The prefix, always starting and ending with `/`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the application is served from the root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// The prefix without its trailing slash; empty for the root.
    fn stem(&self) -> &str {
        self.0.trim_end_matches('/')
    }

    /// Strip the prefix from an already-normalized path, if it carries it.
    fn strip<'a>(&self, normalized: &'a str) -> Option<&'a str> {
        if self.is_root() {
            return None;
        }
        let rest = normalized.strip_prefix(self.stem())?;
        if rest.is_empty() {
            Some("/")
        } else if rest.starts_with('/') {
            Some(rest)
        } else {
            None
        }
    }

    /// Canonical logical form of a path handed in by a caller.
    ///
    /// A path that already carries the prefix has it removed, so prefixing
    /// twice is impossible. A path that matches a route as written is taken
    /// as logical, even when the prefix shares its first segment.
    #[must_use]
    pub fn normalize(&self, path: &str) -> String {
        let normalized = normalize_path(path);
        if matches!(resolve(&normalized), Resolution::Render(_)) {
            return normalized;
        }
        self.strip_or_keep(normalized)
    }

    fn strip_or_keep(&self, normalized: String) -> String {
        match self.strip(&normalized) {
            Some(rest) => rest.to_string(),
            None => normalized,
        }
    }

    /// Browser-facing form of a logical path.
    #[must_use]
    pub fn to_browser(&self, logical: &str) -> String {
        let logical = self.normalize(logical);
        if self.is_root() {
            logical
        } else {
            format!("{}{}", self.stem(), logical)
        }
    }

    /// Logical form of a browser-facing path.
    ///
    /// Paths outside the prefix are taken as logical already.
    #[must_use]
    pub fn from_browser(&self, actual: &str) -> String {
        self.strip_or_keep(normalize_path(actual))
    }
}

impl Default for BasePath {
    fn default() -> Self {
        Self("/".to_string())
    }
}

impl fmt::Display for BasePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A screen the application can show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// The employee list.
    List,
    /// The create form.
    New,
    /// The edit form for one employee.
    Edit(EmployeeId),
}

impl Route {
    /// Logical path of this route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::List => LIST_PATH.to_string(),
            Self::New => NEW_PATH.to_string(),
            Self::Edit(id) => format!("{LIST_PATH}/{id}"),
        }
    }
}

/// Outcome of matching a logical path against the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Render this route.
    Render(Route),
    /// Navigate to another logical path instead.
    Redirect(String),
}

/// Match a normalized logical path against the route table.
///
/// `/` and unknown paths redirect to the list.
#[must_use]
pub fn resolve(path: &str) -> Resolution {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        ["employees"] => Resolution::Render(Route::List),
        ["employees", "new"] => Resolution::Render(Route::New),
        ["employees", id] => Resolution::Render(Route::Edit(EmployeeId::new(*id))),
        _ => Resolution::Redirect(LIST_PATH.to_string()),
    }
}

/// Linear navigation history with a cursor for back and forward.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<String>,
    cursor: usize,
}

impl History {
    /// The entry under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.entries.get(self.cursor).map(String::as_str)
    }

    /// Push a new entry, discarding anything forward of the cursor.
    pub fn push(&mut self, path: String) {
        if self.entries.is_empty() {
            self.entries.push(path);
            self.cursor = 0;
            return;
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(path);
        self.cursor = self.entries.len() - 1;
    }

    /// Replace the entry under the cursor.
    pub fn replace(&mut self, path: String) {
        match self.entries.get_mut(self.cursor) {
            Some(slot) => *slot = path,
            None => self.push(path),
        }
    }

    /// Step back one entry.
    pub fn back(&mut self) -> Option<&str> {
        if self.cursor == 0 || self.entries.is_empty() {
            return None;
        }
        self.cursor -= 1;
        self.current()
    }

    /// Step forward one entry.
    pub fn forward(&mut self) -> Option<&str> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.current()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no navigation has happened yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Router that resolves navigations and publishes the current path.
#[derive(Debug)]
pub struct Router {
    base: BasePath,
    installed: bool,
    history: History,
    current: watch::Sender<String>,
}

impl Router {
    /// Create a router for `base`. Routes are not installed yet.
    #[must_use]
    pub fn new(base: BasePath) -> Self {
        let (current, _) = watch::channel(String::new());
        Self {
            base,
            installed: false,
            history: History::default(),
            current,
        }
    }

    /// Install the route table. Calling this again has no effect.
    pub fn install(&mut self) {
        if !self.installed {
            debug!(base = %self.base, "Installed routes");
        }
        self.installed = true;
    }

    /// Whether routes have been installed.
    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.installed
    }

    /// The deployment base path.
    #[must_use]
    pub fn base(&self) -> &BasePath {
        &self.base
    }

    /// Subscribe to changes of the current logical path.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.current.subscribe()
    }

    /// The current logical path; empty before the first navigation.
    #[must_use]
    pub fn current_path(&self) -> String {
        self.current.borrow().clone()
    }

    /// The current path as the browser would show it.
    #[must_use]
    pub fn browser_path(&self) -> String {
        self.base.to_browser(&self.current_path())
    }

    /// The navigation history.
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Navigate to `path`, which may be prefixed or not.
    ///
    /// Redirects are followed and the final logical path is pushed onto the
    /// history unless it is already current. Returns the route to render, or
    /// `None` if routes are not installed yet.
    pub fn go(&mut self, path: &str) -> Option<Route> {
        if !self.installed {
            warn!(path, "Router not initialized, ignoring navigation");
            return None;
        }

        let (logical, route) = self.resolve_chain(path);
        if self.history.current() != Some(logical.as_str()) {
            self.history.push(logical.clone());
        }
        self.publish(logical);
        Some(route)
    }

    /// Handle a location change reported by the browser side.
    pub fn sync_from_browser(&mut self, actual: &str) -> Option<Route> {
        let logical = self.base.from_browser(actual);
        self.go(&logical)
    }

    /// Go back one history entry.
    pub fn back(&mut self) -> Option<Route> {
        let path = self.history.back()?.to_string();
        self.settle(&path)
    }

    /// Go forward one history entry.
    pub fn forward(&mut self) -> Option<Route> {
        let path = self.history.forward()?.to_string();
        self.settle(&path)
    }

    /// Resolve a history entry reached by back/forward without pushing.
    fn settle(&mut self, path: &str) -> Option<Route> {
        if !self.installed {
            warn!(path, "Router not initialized, ignoring history move");
            return None;
        }
        let (logical, route) = self.resolve_chain(path);
        self.history.replace(logical.clone());
        self.publish(logical);
        Some(route)
    }

    fn resolve_chain(&self, path: &str) -> (String, Route) {
        let mut logical = self.base.normalize(path);
        for _ in 0..MAX_REDIRECTS {
            match resolve(&logical) {
                Resolution::Render(route) => return (logical, route),
                Resolution::Redirect(target) => {
                    debug!(from = %logical, to = %target, "Redirecting");
                    logical = self.base.normalize(&target);
                }
            }
        }
        (LIST_PATH.to_string(), Route::List)
    }

    fn publish(&self, logical: String) {
        debug!(path = %logical, browser = %self.base.to_browser(&logical), "Navigated");
        self.current.send_replace(logical);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn installed(base: &str) -> Router {
        let mut router = Router::new(BasePath::parse(base).unwrap());
        router.install();
        router
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("employees"), "/employees");
        assert_eq!(normalize_path("//employees///new/"), "/employees/new");
        assert_eq!(normalize_path("/employees?page=2#top"), "/employees");
    }

    #[test]
    fn test_base_path_parse_forms() {
        for href in ["repo", "/repo", "/repo/", "repo/"] {
            assert_eq!(BasePath::parse(href).unwrap().as_str(), "/repo/");
        }
        assert!(BasePath::parse("").unwrap().is_root());
        assert!(BasePath::parse("/").unwrap().is_root());
        assert!(BasePath::parse("https://host/repo").is_none());
        assert!(BasePath::parse("/re po").is_none());
    }

    #[test]
    fn test_base_path_no_double_prefix() {
        let base = BasePath::parse("/repo/").unwrap();
        assert_eq!(base.to_browser("/employees"), "/repo/employees");
        assert_eq!(base.to_browser("/repo/employees"), "/repo/employees");
        assert_eq!(base.to_browser("employees/new"), "/repo/employees/new");
        assert_eq!(base.to_browser("/"), "/repo/");
    }

    #[test]
    fn test_base_path_strip() {
        let base = BasePath::parse("/repo/").unwrap();
        assert_eq!(base.from_browser("/repo/employees/"), "/employees");
        assert_eq!(base.from_browser("/repo"), "/");
        assert_eq!(base.from_browser("/repository/x"), "/repository/x");
        assert_eq!(base.from_browser("/employees"), "/employees");
    }

    #[test]
    fn test_root_base_is_identity() {
        let base = BasePath::default();
        assert_eq!(base.to_browser("employees"), "/employees");
        assert_eq!(base.from_browser("/employees/3/"), "/employees/3");
    }

    #[test]
    fn test_resolve_routes() {
        assert_eq!(resolve("/employees"), Resolution::Render(Route::List));
        assert_eq!(resolve("/employees/new"), Resolution::Render(Route::New));
        assert_eq!(
            resolve("/employees/17"),
            Resolution::Render(Route::Edit(EmployeeId::from(17)))
        );
        assert_eq!(resolve("/"), Resolution::Redirect(LIST_PATH.to_string()));
        assert_eq!(
            resolve("/payroll"),
            Resolution::Redirect(LIST_PATH.to_string())
        );
        assert_eq!(
            resolve("/employees/1/extra"),
            Resolution::Redirect(LIST_PATH.to_string())
        );
    }

    #[test]
    fn test_route_path() {
        assert_eq!(Route::List.path(), "/employees");
        assert_eq!(Route::New.path(), "/employees/new");
        assert_eq!(Route::Edit(EmployeeId::from(5)).path(), "/employees/5");
    }

    #[test]
    fn test_go_before_install_is_ignored() {
        let mut router = Router::new(BasePath::default());
        assert!(router.go("/employees").is_none());
        assert!(router.history().is_empty());
        assert_eq!(router.current_path(), "");
    }

    #[test]
    fn test_go_root_redirects_to_list() {
        let mut router = installed("/");
        assert_eq!(router.go("/"), Some(Route::List));
        assert_eq!(router.current_path(), LIST_PATH);
        assert_eq!(router.history().len(), 1);
    }

    #[test]
    fn test_go_with_prefixed_path() {
        let mut router = installed("/repo/");
        assert_eq!(router.go("/repo/employees/new"), Some(Route::New));
        assert_eq!(router.current_path(), NEW_PATH);
        assert_eq!(router.browser_path(), "/repo/employees/new");
    }

    #[test]
    fn test_repeated_go_does_not_grow_history() {
        let mut router = installed("/");
        router.go("/employees");
        router.go("employees/");
        assert_eq!(router.history().len(), 1);
    }

    #[test]
    fn test_back_and_forward() {
        let mut router = installed("/repo");
        router.go("/employees");
        router.go("/employees/new");
        router.go("/employees/3");

        assert_eq!(router.back(), Some(Route::New));
        assert_eq!(router.current_path(), NEW_PATH);
        assert_eq!(router.back(), Some(Route::List));
        assert_eq!(router.back(), None);
        assert_eq!(router.forward(), Some(Route::New));
        assert_eq!(router.browser_path(), "/repo/employees/new");
    }

    #[test]
    fn test_push_after_back_drops_forward_entries() {
        let mut router = installed("/");
        router.go("/employees");
        router.go("/employees/new");
        router.back();
        router.go("/employees/9");
        assert_eq!(router.forward(), None);
        assert_eq!(router.history().len(), 2);
    }

    #[test]
    fn test_sync_from_browser() {
        let mut router = installed("/repo/");
        assert_eq!(
            router.sync_from_browser("/repo/employees/4"),
            Some(Route::Edit(EmployeeId::from(4)))
        );
        assert_eq!(router.current_path(), "/employees/4");
    }

    #[test]
    fn test_base_sharing_route_segment() {
        let mut router = installed("/employees/");
        assert_eq!(router.go("/employees/new"), Some(Route::New));
        assert_eq!(router.current_path(), NEW_PATH);
        assert_eq!(router.browser_path(), "/employees/employees/new");

        assert_eq!(router.go("/employees"), Some(Route::List));
        assert_eq!(router.browser_path(), "/employees/employees");
        assert_eq!(
            router.sync_from_browser("/employees/employees/7"),
            Some(Route::Edit(EmployeeId::from(7)))
        );
        assert_eq!(
            router.sync_from_browser("/employees/employees"),
            Some(Route::List)
        );
    }

    #[test]
    fn test_base_sharing_route_segment_round_trip() {
        let base = BasePath::parse("/employees/").unwrap();
        for logical in [LIST_PATH, NEW_PATH, "/employees/12"] {
            assert_eq!(base.from_browser(&base.to_browser(logical)), logical);
        }
    }

    #[test]
    fn test_subscribers_see_current_path() {
        let mut router = installed("/");
        let mut rx = router.subscribe();
        router.go("/employees/new");
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), NEW_PATH);
    }
}
