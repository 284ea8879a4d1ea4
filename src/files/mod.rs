//! File URL resolution
//!
//! Stored file values carry a `uri` in scheme notation (`public://images/a.jpg`).
//! The flattener asks a [`UrlResolver`] to turn that into a browser-usable URL
//! for the `<field>_url` companion values. [`FileUrlResolver`] is the built-in
//! implementation: scheme mounts plus a base URL. Hosts with their own storage
//! layout implement the trait instead.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Turns stored file URIs into browser-usable URLs
pub trait UrlResolver {
    /// Resolves a stored URI; `None` means the URI cannot be served
    fn url(&self, uri: &str) -> Option<String>;
}

/// Configuration for [`FileUrlResolver`]
///
/// Fields omitted from a loaded document keep their defaults, including the
/// standard `public`/`private` scheme mounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileUrlConfig {
    /// Prefix for every resolved URL; empty produces root-relative URLs
    pub base_url: String,

    /// Scheme -> mount path, e.g. `public` -> `files`
    pub scheme_paths: HashMap<String, String>,
}

impl Default for FileUrlConfig {
    fn default() -> Self {
        let mut scheme_paths = HashMap::new();
        scheme_paths.insert("public".to_string(), "files".to_string());
        scheme_paths.insert("private".to_string(), "system/files".to_string());
        Self {
            base_url: String::new(),
            scheme_paths,
        }
    }
}

impl FileUrlConfig {
    /// Sets the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Registers or replaces a scheme mount
    pub fn with_scheme(mut self, scheme: impl Into<String>, mount: impl Into<String>) -> Self {
        self.scheme_paths.insert(scheme.into(), mount.into());
        self
    }
}

/// Scheme-mount based URL resolver
#[derive(Debug, Clone, Default)]
pub struct FileUrlResolver {
    config: FileUrlConfig,
}

impl FileUrlResolver {
    /// Creates a resolver from explicit configuration
    pub fn new(config: FileUrlConfig) -> Self {
        Self { config }
    }

    /// Creates a resolver with default scheme mounts under a base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::new(FileUrlConfig::default().with_base_url(base_url))
    }

    fn join(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if base.is_empty() {
            format!("/{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}

impl UrlResolver for FileUrlResolver {
    fn url(&self, uri: &str) -> Option<String> {
        if uri.is_empty() {
            return None;
        }
        // Already a URL: pass through untouched.
        if uri.starts_with("http://") || uri.starts_with("https://") || uri.starts_with("//") {
            return Some(uri.to_string());
        }
        if let Some((scheme, target)) = uri.split_once("://") {
            let mount = self.config.scheme_paths.get(scheme)?;
            let mount = mount.trim_matches('/');
            let target = target.trim_start_matches('/');
            return Some(self.join(&format!("{mount}/{target}")));
        }
        Some(self.join(uri))
    }
}
