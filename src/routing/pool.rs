//! Router instances keyed by configuration identity.
//!
//! A router's resource cache is only valid for the origins it was built
//! with, so each distinct set of settings gets its own router. Routers are
//! created on first use and kept for the life of the process; there is no
//! eviction, so the pool grows with the number of distinct configurations
//! seen.

use std::sync::Arc;

use dashmap::DashMap;

use crate::cache::Origins;
use crate::config::{AppIdPolicy, RouterConfig};
use crate::fetch::Transport;
use crate::resilience::RetryPolicy;
use crate::routing::router::AppRouter;

/// Everything that determines a router's behavior.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouterSettings {
    pub origins: Origins,
    pub retry: RetryPolicy,
    pub app_ids: AppIdPolicy,
}

impl From<&RouterConfig> for RouterSettings {
    fn from(config: &RouterConfig) -> Self {
        Self {
            origins: Origins::new(
                config.upstream.assets_url.clone(),
                config.upstream.api_url.clone(),
            ),
            retry: RetryPolicy::from(&config.fetch),
            app_ids: config.routing.app_id_policy,
        }
    }
}

/// Lazily constructed, shared routers.
pub struct RouterPool {
    transport: Arc<dyn Transport>,
    routers: DashMap<RouterSettings, Arc<AppRouter>>,
}

impl RouterPool {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            routers: DashMap::new(),
        }
    }

    /// The router for `settings`, built on first request.
    pub fn get_or_create(&self, settings: &RouterSettings) -> Arc<AppRouter> {
        if let Some(router) = self.routers.get(settings) {
            return Arc::clone(router.value());
        }

        let router = self
            .routers
            .entry(settings.clone())
            .or_insert_with(|| {
                tracing::info!(
                    assets_url = %settings.origins.assets_url,
                    api_url = %settings.origins.api_url,
                    "Creating router"
                );
                Arc::new(AppRouter::new(settings.clone(), Arc::clone(&self.transport)))
            });
        Arc::clone(router.value())
    }

    pub fn len(&self) -> usize {
        self.routers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routers.is_empty()
    }
}
