//! Rendering configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// URL layout, page extensions and CSS classes used by the writers.
///
/// Every field has a default, so a config file only needs to name what it
/// changes:
///
/// ```yaml
/// pages_prefix: /wiki/
/// red_link_class: missing
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderOptions {
    /// Prefix of internal page URLs; the encoded file name is appended.
    pub pages_prefix: String,
    /// Search endpoint red links point at, queried with `?q=`.
    pub search_path: String,
    /// Extension of legacy markup pages, without the dot.
    pub legacy_extension: String,
    /// Extension of Markdown pages, without the dot.
    pub markdown_extension: String,
    pub red_link_class: String,
    /// Class on links to pages that still use the legacy extension.
    pub legacy_link_class: String,
    /// Open external links in a new tab.
    pub external_new_tab: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            pages_prefix: "/pages/".to_string(),
            search_path: "/search".to_string(),
            legacy_extension: "moniwiki".to_string(),
            markdown_extension: "md".to_string(),
            red_link_class: "red-link".to_string(),
            legacy_link_class: "moniwiki-link".to_string(),
            external_new_tab: true,
        }
    }
}

impl RenderOptions {
    pub fn from_yaml(text: &str) -> Result<Self> {
        // an empty file is a valid "all defaults" config.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let opts = Self::from_yaml(&text)?;
        tracing::debug!(path = %path.display(), "loaded render options");
        Ok(opts)
    }

    /// The page extension `name` ends in, if it is one of the two known ones.
    pub fn extension_of<'a>(&self, name: &'a str) -> Option<&'a str> {
        let (base, ext) = name.rsplit_once('.')?;
        if base.is_empty() {
            return None;
        }
        (ext == self.legacy_extension || ext == self.markdown_extension).then_some(ext)
    }

    pub fn has_known_extension(&self, name: &str) -> bool {
        self.extension_of(name).is_some()
    }

    pub fn is_legacy(&self, name: &str) -> bool {
        self.extension_of(name) == Some(self.legacy_extension.as_str())
    }

    pub fn is_markdown(&self, name: &str) -> bool {
        self.extension_of(name) == Some(self.markdown_extension.as_str())
    }

    /// `name` without a known page extension.
    pub fn strip_extension<'a>(&self, name: &'a str) -> &'a str {
        match self.extension_of(name) {
            Some(ext) => &name[..name.len() - ext.len() - 1],
            None => name,
        }
    }

    pub fn legacy_file(&self, name: &str) -> String {
        format!("{}.{}", name, self.legacy_extension)
    }

    pub fn markdown_file(&self, name: &str) -> String {
        format!("{}.{}", name, self.markdown_extension)
    }

    /// The same page under the other extension: `A.md` <-> `A.moniwiki`.
    pub fn counterpart(&self, name: &str) -> Option<String> {
        let base = self.strip_extension(name);
        if self.is_markdown(name) {
            Some(self.legacy_file(base))
        } else if self.is_legacy(name) {
            Some(self.markdown_file(base))
        } else {
            None
        }
    }
}
