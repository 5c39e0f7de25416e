//! Per-router cache of the three upstream resources.

use std::sync::Arc;

use crate::cache::memo::{Lookup, Memo};
use crate::cache::types::{ConfigMap, Manifest, Origins};
use crate::fetch::{FetchError, Fetcher};
use crate::observability::metrics;

/// Memoized manifest, global configuration and app index pages.
///
/// Lives as long as the router that owns it. Successful fetches are kept for
/// that whole lifetime; failed ones are forgotten.
pub struct ResourceCache {
    fetcher: Fetcher,
    origins: Origins,
    manifest: Memo<(), Manifest>,
    global_config: Memo<(), ConfigMap>,
    indexes: Memo<String, String>,
}

impl ResourceCache {
    pub fn new(fetcher: Fetcher, origins: Origins) -> Self {
        Self {
            fetcher,
            origins,
            manifest: Memo::new(),
            global_config: Memo::new(),
            indexes: Memo::new(),
        }
    }

    pub fn origins(&self) -> &Origins {
        &self.origins
    }

    /// `<assets>manifest.json`, fetched once.
    pub async fn manifest(&self) -> Result<Arc<Manifest>, FetchError> {
        let fetcher = self.fetcher.clone();
        let url = self.origins.manifest_url();
        let (lookup, result) = self
            .manifest
            .get_or_fetch((), move || async move { fetcher.fetch_json(&url).await })
            .await;
        record("manifest", lookup);
        result
    }

    /// `<api>config.json`, fetched once.
    pub async fn global_config(&self) -> Result<Arc<ConfigMap>, FetchError> {
        let fetcher = self.fetcher.clone();
        let url = self.origins.config_url();
        let (lookup, result) = self
            .global_config
            .get_or_fetch((), move || async move { fetcher.fetch_json(&url).await })
            .await;
        record("config", lookup);
        result
    }

    /// `<assets><app>/index.html`, fetched once per app.
    pub async fn app_index(&self, app_id: &str) -> Result<Arc<String>, FetchError> {
        let fetcher = self.fetcher.clone();
        let url = self.origins.index_url(app_id);
        let (lookup, result) = self
            .indexes
            .get_or_fetch(app_id.to_string(), move || async move {
                fetcher.fetch_text(&url).await
            })
            .await;
        record("index", lookup);
        result
    }

    /// Number of app index pages cached or in flight.
    pub fn cached_indexes(&self) -> usize {
        self.indexes.len()
    }
}

fn record(resource: &'static str, lookup: Lookup) {
    let result = match lookup {
        Lookup::Hit => "hit",
        Lookup::Miss => "miss",
    };
    tracing::debug!(resource, result, "Resource cache lookup");
    metrics::record_cache_lookup(resource, result);
}
