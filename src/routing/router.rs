//! Request routing and dispatch.
//!
//! # Responsibilities
//! - Obtain the manifest before any path logic
//! - Turn the path decision into a response
//! - Build the entry page for content requests
//! - Convert every failure into a generic 500
//!
//! # Design Decisions
//! - `route` is infallible: callers always get a response
//! - Upstream error detail is logged, never returned
//! - Index and global config are fetched concurrently

use std::sync::Arc;

use thiserror::Error;

use crate::cache::{Manifest, Origins, ResourceCache};
use crate::fetch::{FetchError, Fetcher, Transport};
use crate::html::{HtmlTransformer, TransformError};
use crate::routing::decision::{decide, RouteDecision};
use crate::routing::effective::effective_config;
use crate::routing::matcher::PathMatcher;
use crate::routing::pool::RouterSettings;
use crate::routing::response::{RouteOptions, RouteResponse};

/// Failures that turn into a 500.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("upstream fetch failed: {0}")]
    Upstream(#[from] FetchError),

    #[error("entry page transform failed: {0}")]
    Transform(#[from] TransformError),
}

/// Serves the app catalog behind one pair of upstream origins.
pub struct AppRouter {
    settings: RouterSettings,
    cache: ResourceCache,
    transformer: HtmlTransformer,
    matcher: PathMatcher,
}

impl AppRouter {
    pub fn new(settings: RouterSettings, transport: Arc<dyn Transport>) -> Self {
        let fetcher = Fetcher::new(transport, settings.retry);
        Self {
            cache: ResourceCache::new(fetcher, settings.origins.clone()),
            transformer: HtmlTransformer::new(settings.origins.assets_url.clone()),
            matcher: PathMatcher::new(settings.app_ids),
            settings,
        }
    }

    pub fn settings(&self) -> &RouterSettings {
        &self.settings
    }

    pub fn origins(&self) -> &Origins {
        &self.settings.origins
    }

    pub fn cache(&self) -> &ResourceCache {
        &self.cache
    }

    /// Answer a request path. Never fails; errors become a 500 response.
    pub async fn route(&self, path: &str, options: &RouteOptions) -> RouteResponse {
        match self.dispatch(path, options).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(path = %path, error = %e, "Request failed");
                RouteResponse::internal_error()
            }
        }
    }

    async fn dispatch(
        &self,
        path: &str,
        options: &RouteOptions,
    ) -> Result<RouteResponse, RouteError> {
        let manifest = self.cache.manifest().await?;
        let decision = decide(path, &manifest, &self.matcher);

        tracing::debug!(path = %path, decision = decision.name(), "Route decided");

        let response = match decision {
            RouteDecision::RootRedirect { location }
            | RouteDecision::AppRootRedirect { location }
            | RouteDecision::SubPathRedirect { location } => {
                RouteResponse::redirect(location, options)
            }
            RouteDecision::InvalidPath => RouteResponse::not_found("Invalid path", options),
            RouteDecision::AppNotFound { app_id } => {
                tracing::debug!(app = %app_id, "Unknown app requested");
                RouteResponse::not_found("App not found", options)
            }
            RouteDecision::AppCacheBlocked { .. } => {
                RouteResponse::not_found("Application cache is not served", options)
            }
            RouteDecision::Content { app_id } => {
                let page = self.render(&app_id, &manifest).await?;
                RouteResponse::html(page, options)
            }
        };

        Ok(response)
    }

    async fn render(&self, app_id: &str, manifest: &Manifest) -> Result<String, RouteError> {
        let (index, global) =
            tokio::try_join!(self.cache.app_index(app_id), self.cache.global_config())?;

        let config = effective_config(app_id, &global, &manifest.config, self.origins());
        Ok(self.transformer.transform(app_id, &index, &config)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppIdPolicy;
    use crate::fetch::testing::StaticTransport;
    use crate::resilience::RetryPolicy;
    use crate::routing::response::{CACHE_CONTROL, LOCATION};
    use std::time::Duration;

    const MANIFEST: &str = "https://cdn/manifest.json";
    const CONFIG: &str = "https://api/config.json";
    const INDEX: &str = "https://cdn/demo/index.html";

    fn settings() -> RouterSettings {
        RouterSettings {
            origins: Origins::new("https://cdn/", "https://api/"),
            retry: RetryPolicy::immediate(3),
            app_ids: AppIdPolicy::Extended,
        }
    }

    fn demo_transport() -> Arc<StaticTransport> {
        let transport = Arc::new(StaticTransport::new());
        transport.respond(
            MANIFEST,
            r#"{"apps": ["demo"], "default": "demo", "config": {"v": 1}}"#,
        );
        transport.respond(CONFIG, r#"{"k": "x"}"#);
        transport.respond(
            INDEX,
            r#"<html><head><link href="demo/s.css"></head><body><script src="demo/config.js"></script></body></html>"#,
        );
        transport
    }

    fn router(transport: &Arc<StaticTransport>) -> AppRouter {
        AppRouter::new(settings(), transport.clone())
    }

    #[tokio::test]
    async fn test_end_to_end_content() {
        let transport = demo_transport();
        let response = router(&transport)
            .route("/demo/", &RouteOptions::default())
            .await;

        assert_eq!(response.status_code, 200);
        assert_eq!(response.header("Content-Type"), Some("text/html; charset=utf-8"));
        assert_eq!(response.header(CACHE_CONTROL), Some("max-age=60, s-maxage=300"));

        let body = response.body.unwrap();
        assert!(body.contains(r#"<link href="https://cdn/demo/s.css">"#));
        assert!(body.contains(r#""v":1"#));
        assert!(body.contains(r#""k":"x""#));
        assert!(body.contains(r#""target":["/demo/"]"#));
        assert!(body.contains(r#""assets_url":"https://cdn/""#));
        assert!(body.contains(r#""api_url":"https://api/""#));
    }

    #[tokio::test]
    async fn test_redirects() {
        let transport = demo_transport();
        let router = router(&transport);
        let options = RouteOptions::default();

        for (path, location) in [
            ("/", "/demo/"),
            ("/demo", "/demo/"),
            ("/demo/list/7", "/demo/#list/7"),
        ] {
            let response = router.route(path, &options).await;
            assert_eq!(response.status_code, 301, "{path}");
            assert_eq!(response.header(LOCATION), Some(location), "{path}");
            assert_eq!(
                response.header(CACHE_CONTROL),
                Some("max-age=60, s-maxage=300"),
                "{path}"
            );
        }
    }

    #[tokio::test]
    async fn test_not_found_is_client_cacheable_only() {
        let transport = demo_transport();
        let router = router(&transport);
        let options = RouteOptions::default();

        for (path, message) in [
            ("/not.valid/", "Invalid path"),
            ("/unknown/", "App not found"),
            ("/demo/cache.appcache", "Application cache is not served"),
        ] {
            let response = router.route(path, &options).await;
            assert_eq!(response.status_code, 404, "{path}");
            assert_eq!(response.header(CACHE_CONTROL), Some("max-age=60"), "{path}");
            assert!(response.body.unwrap().contains(message), "{path}");
        }

        // Nothing beyond the manifest was fetched
        assert_eq!(transport.calls(CONFIG), 0);
        assert_eq!(transport.calls(INDEX), 0);
    }

    #[tokio::test]
    async fn test_manifest_failure_is_500_and_retried() {
        let transport = Arc::new(StaticTransport::new());
        transport.fail(MANIFEST, 503);
        let router = router(&transport);

        let response = router.route("/", &RouteOptions::default()).await;
        assert_eq!(response.status_code, 500);
        assert_eq!(response.header(CACHE_CONTROL), Some("no-store"));
        assert!(!response.body.unwrap().contains("503"));
        assert_eq!(transport.calls(MANIFEST), 3);

        let response = router.route("/", &RouteOptions::default()).await;
        assert_eq!(response.status_code, 500);
        assert_eq!(transport.calls(MANIFEST), 6);
    }

    #[tokio::test]
    async fn test_index_failure_does_not_poison_manifest() {
        let transport = demo_transport();
        transport.fail(INDEX, 500);
        let router = router(&transport);

        let response = router.route("/demo/", &RouteOptions::default()).await;
        assert_eq!(response.status_code, 500);

        transport.respond(INDEX, "<html></html>");
        let response = router.route("/demo/", &RouteOptions::default()).await;
        assert_eq!(response.status_code, 200);

        assert_eq!(transport.calls(MANIFEST), 1);
        assert_eq!(transport.calls(CONFIG), 1);
        assert_eq!(transport.calls(INDEX), 4);
    }

    #[tokio::test]
    async fn test_concurrent_requests_fetch_each_resource_once() {
        let transport = Arc::new(
            StaticTransport::new().with_delay(Duration::from_millis(30)),
        );
        transport.respond(MANIFEST, r#"{"apps": ["demo"], "default": "demo"}"#);
        transport.respond(CONFIG, "{}");
        transport.respond(INDEX, "<html></html>");
        let router = router(&transport);
        let options = RouteOptions::default();

        let (a, b) = tokio::join!(router.route("/demo/", &options), router.route("/demo/", &options));

        assert_eq!(a.status_code, 200);
        assert_eq!(a, b);
        assert_eq!(transport.calls(MANIFEST), 1);
        assert_eq!(transport.calls(CONFIG), 1);
        assert_eq!(transport.calls(INDEX), 1);
    }

    #[tokio::test]
    async fn test_shared_cache_directive_optional() {
        let transport = demo_transport();
        let options = RouteOptions {
            client_cache_secs: 10,
            shared_cache_secs: None,
        };

        let response = router(&transport).route("/demo/", &options).await;
        assert_eq!(response.header(CACHE_CONTROL), Some("max-age=10"));
    }
}
