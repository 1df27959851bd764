//! # faq-forge – Template-driven FAQ embed renderer
//!
//! This crate composes FAQ content and visual styling into a self-contained
//! HTML/CSS/JS fragment plus schema.org `FAQPage` JSON-LD. The pipeline
//! stages are:
//!
//! 1. **Resolve** – template id → [`templates::Template`], falling back to
//!    the built-in template on any miss ([`templates`])
//! 2. **Protect** – read `@protect` directives from the template CSS
//!    ([`protection`])
//! 3. **Generate** – style config → override CSS, skipping locked paths
//!    ([`generator`])
//! 4. **Inject** – fill the template placeholders with escaped content,
//!    accordion markup, styles and JSON-LD ([`inject`], [`schema`])
//! 5. **Freeze** – wrap as a deterministic payload with an integrity token
//!    ([`payload`])
//!
//! The inverse, [`extract`], reads a stylesheet back into a style config.
//! The client-side accordion contract lives in [`accordion`].
//!
//! A C-compatible FFI surface is exposed via the [`ffi`] module.

pub mod accordion;
pub mod content;
pub mod dom;
pub mod extract;
pub mod ffi;
pub mod fonts;
pub mod generator;
pub mod inject;
pub mod payload;
pub mod pipeline;
pub mod protection;
pub mod sanitize;
pub mod schema;
pub mod style;
pub mod templates;

// Re-exports for convenience
pub use content::{ContentSpec, FaqItem};
pub use extract::extract_styles;
pub use payload::{EmbedResponse, RenderedPayload};
pub use pipeline::{render_payload, render_with_store, FaqConfig, RenderOptions};
pub use protection::ProtectionMap;
pub use style::StyleSpec;
pub use templates::{resolve_template, Template, TemplateStore};
