//! Per-request configuration merging.

use serde_json::Value;

use crate::cache::{ConfigMap, Origins};

/// Build the configuration injected into one app's entry page.
///
/// Precedence, lowest first: `target`, global config, manifest overrides.
/// `assets_url` and `api_url` always reflect the router's origins.
pub fn effective_config(
    app_id: &str,
    global: &ConfigMap,
    overrides: &ConfigMap,
    origins: &Origins,
) -> ConfigMap {
    let mut config = ConfigMap::new();
    config.insert(
        "target".to_string(),
        Value::Array(vec![Value::String(format!("/{app_id}/"))]),
    );

    for layer in [global, overrides] {
        for (key, value) in layer {
            config.insert(key.clone(), value.clone());
        }
    }

    config.insert(
        "assets_url".to_string(),
        Value::String(origins.assets_url.clone()),
    );
    config.insert("api_url".to_string(), Value::String(origins.api_url.clone()));
    config
}
