//! Asset relocation and configuration injection for app entry pages.

use std::cell::Cell;

use lol_html::html_content::ContentType;
use lol_html::{element, rewrite_str, RewriteStrSettings};
use thiserror::Error;

use crate::cache::ConfigMap;

/// Global the injected script assigns the configuration to.
pub const CONFIG_GLOBAL: &str = "_app_config";

/// Script sources ending with this path are replaced by the inline config.
pub const CONFIG_LOADER_SUFFIX: &str = "/config.js";

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to rewrite document: {0}")]
    Rewrite(String),
}

/// Rewrites an entry page so it loads from the asset host and carries its config.
#[derive(Debug, Clone)]
pub struct HtmlTransformer {
    assets_url: String,
}

impl HtmlTransformer {
    pub fn new(assets_url: impl Into<String>) -> Self {
        Self {
            assets_url: assets_url.into(),
        }
    }

    /// Relocate relative `link[href]` / `script[src]` references and inline
    /// `config` into every config loader script. Nothing else is touched.
    pub fn transform(
        &self,
        app_id: &str,
        html: &str,
        config: &ConfigMap,
    ) -> Result<String, TransformError> {
        let script = config_script(config)?;
        let assets_url = self.assets_url.as_str();
        let relocated = Cell::new(0usize);
        let injected = Cell::new(0usize);

        let output = rewrite_str(
            html,
            RewriteStrSettings {
                element_content_handlers: vec![
                    element!("link[href]", |el| {
                        if let Some(href) = el.get_attribute("href") {
                            if let Some(absolute) = relocate(assets_url, &href) {
                                el.set_attribute("href", &absolute)?;
                                relocated.set(relocated.get() + 1);
                            }
                        }
                        Ok(())
                    }),
                    element!("script[src]", |el| {
                        let Some(src) = el.get_attribute("src") else {
                            return Ok(());
                        };
                        if is_config_loader(&src) {
                            el.remove_attribute("src");
                            el.set_inner_content(&script, ContentType::Html);
                            injected.set(injected.get() + 1);
                        } else if let Some(absolute) = relocate(assets_url, &src) {
                            el.set_attribute("src", &absolute)?;
                            relocated.set(relocated.get() + 1);
                        }
                        Ok(())
                    }),
                ],
                ..RewriteStrSettings::default()
            },
        )
        .map_err(|e| TransformError::Rewrite(e.to_string()))?;

        if injected.get() == 0 {
            tracing::warn!(app = %app_id, "Entry page has no config loader script");
        }
        tracing::debug!(
            app = %app_id,
            relocated = relocated.get(),
            injected = injected.get(),
            "Entry page transformed"
        );

        Ok(output)
    }
}

/// `_app_config = {...};`, safe to place inside a `<script>` element.
fn config_script(config: &ConfigMap) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(config)?;
    // `<` only occurs inside JSON strings, where `\u003c` is equivalent and
    // cannot terminate the script element.
    Ok(format!("{CONFIG_GLOBAL} = {};", json.replace('<', "\\u003c")))
}

/// `reference` resolved against the asset host, if it is a relative path.
fn relocate(assets_url: &str, reference: &str) -> Option<String> {
    let reference = reference.trim();
    is_relative(reference).then(|| format!("{assets_url}{reference}"))
}

/// A path relative to the document: not empty, no scheme, not root- or
/// protocol-relative, and not a bare query or fragment.
fn is_relative(reference: &str) -> bool {
    !reference.is_empty()
        && !reference.starts_with(['/', '?', '#'])
        && !has_scheme(reference)
}

/// RFC 3986 scheme: ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ) ":"
fn has_scheme(reference: &str) -> bool {
    let Some((scheme, _)) = reference.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn is_config_loader(src: &str) -> bool {
    let path = src.split(['?', '#']).next().unwrap_or(src);
    path.ends_with(CONFIG_LOADER_SUFFIX)
}
