//! The path decision state machine.

use crate::cache::Manifest;
use crate::routing::matcher::PathMatcher;

/// What to do with a request path, given the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// `/` → the default app.
    RootRedirect { location: String },
    /// Not `/<app-id>[/<rest>]`.
    InvalidPath,
    /// Well-formed, but the app is not registered.
    AppNotFound { app_id: String },
    /// `/<app-id>` → `/<app-id>/`.
    AppRootRedirect { location: String },
    /// `/<app-id>/…*.appcache`, never served.
    AppCacheBlocked { app_id: String },
    /// `/<app-id>/<sub>` → `/<app-id>/#<sub>` for client-side routing.
    SubPathRedirect { location: String },
    /// `/<app-id>/`: serve the entry page.
    Content { app_id: String },
}

impl RouteDecision {
    /// Short name for logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            RouteDecision::RootRedirect { .. } => "root_redirect",
            RouteDecision::InvalidPath => "invalid_path",
            RouteDecision::AppNotFound { .. } => "app_not_found",
            RouteDecision::AppRootRedirect { .. } => "app_root_redirect",
            RouteDecision::AppCacheBlocked { .. } => "appcache_blocked",
            RouteDecision::SubPathRedirect { .. } => "sub_path_redirect",
            RouteDecision::Content { .. } => "content",
        }
    }
}

/// Decide how to answer `path`. Checks run in a fixed order; the first that
/// applies wins.
pub fn decide(path: &str, manifest: &Manifest, matcher: &PathMatcher) -> RouteDecision {
    if path == "/" {
        return RouteDecision::RootRedirect {
            location: format!("/{}/", manifest.default),
        };
    }

    let Some(app_path) = matcher.parse(path) else {
        return RouteDecision::InvalidPath;
    };

    let app_id = app_path.app_id.to_string();
    if !manifest.contains(&app_id) {
        return RouteDecision::AppNotFound { app_id };
    }

    match app_path.rest {
        None => RouteDecision::AppRootRedirect {
            location: format!("/{app_id}/"),
        },
        Some(rest) if matcher.is_appcache(rest) => RouteDecision::AppCacheBlocked { app_id },
        Some("/") => RouteDecision::Content { app_id },
        Some(rest) => {
            let sub_path = rest.strip_prefix('/').unwrap_or(rest);
            RouteDecision::SubPathRedirect {
                location: format!("/{app_id}/#{sub_path}"),
            }
        }
    }
}
