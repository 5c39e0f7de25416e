//! Upstream resource types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form JSON object, as served by the configuration API.
pub type ConfigMap = Map<String, Value>;

/// Directory of registered apps, served as `manifest.json` by the asset host.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Manifest {
    /// Registered app ids, in manifest order.
    pub apps: Vec<String>,

    /// App that `/` redirects to.
    pub default: String,

    /// Overrides that win over the global configuration.
    #[serde(default)]
    pub config: ConfigMap,
}

impl Manifest {
    pub fn contains(&self, app_id: &str) -> bool {
        self.apps.iter().any(|app| app == app_id)
    }
}

/// Base URLs of the two upstream origins. Both end in `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Origins {
    pub assets_url: String,
    pub api_url: String,
}

impl Origins {
    pub fn new(assets_url: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            assets_url: assets_url.into(),
            api_url: api_url.into(),
        }
    }

    pub fn manifest_url(&self) -> String {
        format!("{}manifest.json", self.assets_url)
    }

    pub fn config_url(&self) -> String {
        format!("{}config.json", self.api_url)
    }

    pub fn index_url(&self, app_id: &str) -> String {
        format!("{}{}/index.html", self.assets_url, app_id)
    }
}
