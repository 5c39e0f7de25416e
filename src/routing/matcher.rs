//! Path matching logic.
//!
//! # Responsibilities
//! - Split `/<app-id>[/<rest>]` into app id and trailing segment
//! - Enforce the configured app-id character policy
//! - Recognise application cache manifests (`*.appcache`)
//!
//! # Design Decisions
//! - Patterns compiled once per process, shared by every router
//! - App ids are case-sensitive; the appcache suffix is not
//! - Anything that does not match is an invalid path, never a fallback app

use std::sync::LazyLock;

use regex::Regex;

use crate::config::AppIdPolicy;

static STRICT_APP_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^/([A-Za-z0-9]+)(/.*)?$").expect("valid strict app path pattern")
});

static EXTENDED_APP_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^/([A-Za-z0-9_-]+)(/.*)?$").expect("valid extended app path pattern")
});

static APPCACHE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.appcache$").expect("valid appcache pattern"));

/// A path addressed to an app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppPath<'a> {
    pub app_id: &'a str,
    /// Everything after the app id, starting with `/`. `None` for `/<app-id>`.
    pub rest: Option<&'a str>,
}

/// Matches request paths against the app path pattern.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    policy: AppIdPolicy,
}

impl PathMatcher {
    pub fn new(policy: AppIdPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> AppIdPolicy {
        self.policy
    }

    /// Returns the app path, or `None` if `path` is not `/<app-id>[/<rest>]`.
    pub fn parse<'a>(&self, path: &'a str) -> Option<AppPath<'a>> {
        let pattern = match self.policy {
            AppIdPolicy::Strict => &*STRICT_APP_PATH,
            AppIdPolicy::Extended => &*EXTENDED_APP_PATH,
        };
        let captures = pattern.captures(path)?;

        Some(AppPath {
            app_id: captures.get(1)?.as_str(),
            rest: captures.get(2).map(|m| m.as_str()),
        })
    }

    /// Whether the trailing segment names an application cache manifest.
    pub fn is_appcache(&self, rest: &str) -> bool {
        APPCACHE.is_match(rest)
    }
}
