//! Templates and where they come from.
//!
//! A [`Template`] is a trusted HTML skeleton with placeholder markers, its
//! stylesheet and an optional behaviour script. Stores implement
//! [`TemplateStore`]; [`resolve_template`] turns any lookup miss or failure
//! into the built-in [`Template::fallback`].

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::accordion::RUNTIME_SCRIPT;

/// One template asset bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub html: String,
    pub css: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub js: Option<String>,
}

impl Template {
    pub fn new(html: impl Into<String>, css: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            css: css.into(),
            js: None,
        }
    }

    pub fn with_js(mut self, js: impl Into<String>) -> Self {
        self.js = Some(js.into());
        self
    }

    /// Built-in template used whenever the requested one cannot be loaded.
    pub fn fallback() -> Self {
        Self::new(FALLBACK_HTML, FALLBACK_CSS).with_js(RUNTIME_SCRIPT)
    }
}

// ---------------------------------------------------------------------------
// Stores
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read template '{id}': {source}")]
    Io {
        id: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid template id '{0}'")]
    InvalidId(String),

    #[error("template store unavailable: {0}")]
    Unavailable(String),
}

/// Lookup of templates by id. `Ok(None)` means the id is unknown.
pub trait TemplateStore: Send + Sync {
    fn fetch(&self, id: &str) -> Result<Option<Template>, StoreError>;
}

/// Load `id` from `store`, substituting the fallback template on any miss.
pub fn resolve_template(store: &dyn TemplateStore, id: &str) -> Template {
    match store.fetch(id) {
        Ok(Some(template)) => template,
        Ok(None) => {
            warn!("Template '{id}' not found, using built-in fallback");
            Template::fallback()
        }
        Err(e) => {
            warn!("Template '{id}' could not be loaded ({e}), using built-in fallback");
            Template::fallback()
        }
    }
}

/// Templates laid out on disk as `<root>/<id>/template.{html,css,js}`.
///
/// `template.html` and `template.css` are required; `template.js` is
/// optional.
#[derive(Debug, Clone)]
pub struct FsTemplateStore {
    root: PathBuf,
}

impl FsTemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_optional(&self, id: &str, path: &Path) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                id: id.to_string(),
                source,
            }),
        }
    }
}

impl TemplateStore for FsTemplateStore {
    fn fetch(&self, id: &str) -> Result<Option<Template>, StoreError> {
        validate_id(id)?;
        if !self.root.is_dir() {
            return Err(StoreError::Unavailable(format!(
                "{} is not a directory",
                self.root.display()
            )));
        }

        let dir = self.root.join(id);
        let html = self.read_optional(id, &dir.join("template.html"))?;
        let css = self.read_optional(id, &dir.join("template.css"))?;
        let (Some(html), Some(css)) = (html, css) else {
            debug!("Template '{id}' is missing template.html or template.css");
            return Ok(None);
        };
        let js = self.read_optional(id, &dir.join("template.js"))?;

        Ok(Some(Template { html, css, js }))
    }
}

/// Ids become a single path component, so separators and parent
/// references are refused.
fn validate_id(id: &str) -> Result<(), StoreError> {
    let bad = id.is_empty()
        || id == "."
        || id.contains("..")
        || id.contains(&['/', '\\', '\0'][..]);
    if bad {
        return Err(StoreError::InvalidId(id.to_string()));
    }
    Ok(())
}

/// In-memory store, for tests and embedding hosts that preload templates.
#[derive(Debug, Clone, Default)]
pub struct MemoryTemplateStore {
    templates: HashMap<String, Template>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, template: Template) {
        self.templates.insert(id.into(), template);
    }
}

impl TemplateStore for MemoryTemplateStore {
    fn fetch(&self, id: &str) -> Result<Option<Template>, StoreError> {
        Ok(self.templates.get(id).cloned())
    }
}

// ---------------------------------------------------------------------------
// Built-in fallback
// ---------------------------------------------------------------------------

const FALLBACK_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>FAQ</title>
  {{styles}}
</head>
<body>
  <section class="faq-container">
    <h2 class="faq-heading">{{heading}}</h2>
    {{description}}
    <div class="faq-items">
      {{items}}
    </div>
  </section>
  {{jsonLd}}
</body>
</html>
"##;

const FALLBACK_CSS: &str = r##".faq-container {
  background: #ffffff;
  padding: 24px;
  font-family: system-ui, -apple-system, sans-serif;
}
.faq-heading {
  font-family: system-ui, -apple-system, sans-serif;
  font-size: 1.5rem;
  font-weight: 700;
  color: #1a1a1a;
  margin: 0 0 12px;
}
.faq-description {
  font-family: system-ui, -apple-system, sans-serif;
  font-size: 1rem;
  font-weight: 400;
  color: #666666;
  margin: 0 0 16px;
}
.faq-item {
  margin-bottom: 16px;
  border: 1px solid #e5e5e5;
  border-radius: 4px;
  overflow: hidden;
}
.faq-question {
  font-family: system-ui, -apple-system, sans-serif;
  font-size: 1.125rem;
  font-weight: 600;
  color: #1a1a1a;
  padding: 16px;
  margin: 0;
  width: 100%;
  display: flex;
  align-items: center;
  justify-content: space-between;
  gap: 12px;
  background: transparent;
  border: none;
  text-align: left;
  cursor: pointer;
}
.faq-answer {
  font-family: system-ui, -apple-system, sans-serif;
  font-size: 1rem;
  font-weight: 400;
  color: #4a4a4a;
  padding: 0 16px 16px;
  margin: 0;
}
.faq-answer[hidden] {
  display: none;
}
.faq-icon {
  display: inline-flex;
  flex-shrink: 0;
  transition: transform 300ms;
}
.faq-item[data-open="true"] .faq-icon {
  transform: rotate(180deg);
}
"##;
