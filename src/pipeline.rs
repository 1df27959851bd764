//! Pipeline – ties together template lookup, content injection, CSS
//! generation and JSON-LD into a single function call.

use serde::{Deserialize, Serialize};

use crate::accordion::AnswerVisibility;
use crate::content::ContentSpec;
use crate::extract::extract_editor_state;
use crate::inject::{build_combined_css, inject_content};
use crate::payload::{EmbedResponse, RenderedPayload};
use crate::protection::ProtectionMap;
use crate::schema::FaqSchema;
use crate::style::StyleSpec;
use crate::templates::{resolve_template, Template, TemplateStore};

/// Everything the editor saves for one FAQ: what to say, which template to
/// say it with, and how it should look.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FaqConfig {
    pub content: ContentSpec,
    /// Template id. Empty means the built-in fallback, unscoped.
    pub template: String,
    pub styles: StyleSpec,
}

impl FaqConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn template_id(&self) -> Option<&str> {
        Some(self.template.trim()).filter(|id| !id.is_empty())
    }
}

/// Render-time switches that are not part of the saved config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    pub answer_visibility: AnswerVisibility,
}

/// Full render against an already-resolved template.
pub fn render_payload(template: &Template, config: &FaqConfig, options: &RenderOptions) -> RenderedPayload {
    let template_id = config.template_id();
    RenderedPayload {
        html: inject_content(
            template,
            &config.content,
            &config.styles,
            template_id,
            options.answer_visibility,
        ),
        css: build_combined_css(template, &config.styles, template_id),
        schema: FaqSchema::from_content(&config.content),
    }
}

/// Resolve the config's template from `store` (falling back to the built-in
/// template on any miss) and render.
pub fn render_with_store(
    store: &dyn TemplateStore,
    config: &FaqConfig,
    options: &RenderOptions,
) -> RenderedPayload {
    let template = match config.template_id() {
        Some(id) => resolve_template(store, id),
        None => Template::fallback(),
    };
    render_payload(&template, config, options)
}

/// Convenience: render and wrap as the public embed response.
pub fn render_embed(store: &dyn TemplateStore, config: &FaqConfig, options: &RenderOptions) -> EmbedResponse {
    render_with_store(store, config, options).into()
}

/// Initial editor values for a template: the styles its stylesheet sets and
/// the paths it locks. `None` when the template has no CSS at all.
pub fn load_editor_state(store: &dyn TemplateStore, template_id: &str) -> Option<(StyleSpec, ProtectionMap)> {
    let template = resolve_template(store, template_id);
    let id = Some(template_id).filter(|id| !id.is_empty());
    extract_editor_state(&template.css, id)
}
