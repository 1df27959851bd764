//! Content injector – fills a template's placeholder markers with escaped
//! FAQ content, accordion markup, the combined stylesheet and JSON-LD.
//!
//! Markers are `{{heading}}`, `{{description}}`, `{{items}}`, `{{styles}}`
//! and `{{jsonLd}}`. All of them are replaced in a single scan of the
//! template, so text that came from user content is never scanned again.

use std::collections::HashSet;

use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::accordion::AnswerVisibility;
use crate::content::{ContentSpec, FaqItem};
use crate::generator::generate_dynamic_css;
use crate::protection::ProtectionMap;
use crate::sanitize::escape_html;
use crate::schema::FaqSchema;
use crate::style::{IconStyle, StyleSpec};
use crate::templates::Template;

/// Template whose heading is split into a highlighted two-word line.
pub const SPLIT_TEMPLATE_ID: &str = "split";

const CHEVRON_SVG: &str = concat!(
    r#"<svg width="16" height="16" viewBox="0 0 16 16" fill="none" stroke="currentColor" aria-hidden="true" focusable="false">"#,
    r#"<path d="M4 6 L8 10 L12 6" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"/>"#,
    "</svg>"
);

const PLUS_SVG: &str = concat!(
    r#"<svg width="16" height="16" viewBox="0 0 16 16" fill="none" stroke="currentColor" aria-hidden="true" focusable="false">"#,
    r#"<line x1="8" y1="4" x2="8" y2="12" stroke-width="2"/>"#,
    r#"<line x1="4" y1="8" x2="12" y2="8" stroke-width="2"/>"#,
    "</svg>"
);

static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{(heading|description|items|styles|jsonLd)\}\}")
        .expect("placeholder pattern is valid")
});

static START_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[A-Za-z][^<>]*>").expect("start tag pattern is valid"));

static CLASS_ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\sclass\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'<>=`/]+))"#)
        .expect("class attribute pattern is valid")
});

/// Render the final HTML document for one FAQ.
pub fn inject_content(
    template: &Template,
    content: &ContentSpec,
    styles: &StyleSpec,
    template_id: Option<&str>,
    visibility: AnswerVisibility,
) -> String {
    let html = annotate_containers(&template.html, styles, template_id);
    let has_styles_marker = html.contains("{{styles}}");

    let heading = match template_id {
        Some(SPLIT_TEMPLATE_ID) => split_heading(&content.heading),
        _ => escape_html(&content.heading),
    };
    let description = if content.description.trim().is_empty() {
        String::new()
    } else {
        format!(
            "<p class=\"faq-description\">{}</p>",
            escape_html(&content.description)
        )
    };
    let items = items_html(&content.items, styles, visibility);
    let style_tag = format!(
        "<style>{}</style>",
        build_combined_css(template, styles, template_id)
    );
    let json_ld = FaqSchema::from_content(content).script_tag();

    let mut html = PLACEHOLDER_RE
        .replace_all(&html, |caps: &Captures| match &caps[1] {
            "heading" => heading.clone(),
            "description" => description.clone(),
            "items" => items.clone(),
            "styles" => style_tag.clone(),
            _ => json_ld.clone(),
        })
        .into_owned();

    if !has_styles_marker {
        html = match html.find("</head>") {
            Some(pos) => {
                let mut out = String::with_capacity(html.len() + style_tag.len());
                out.push_str(&html[..pos]);
                out.push_str(&style_tag);
                out.push_str(&html[pos..]);
                out
            }
            None => format!("{style_tag}{html}"),
        };
    }

    if let Some(js) = template.js.as_deref().filter(|js| !js.trim().is_empty()) {
        let script = format!("<script data-faq-runtime>{js}</script>");
        html = match html.rfind("</body>") {
            Some(pos) => {
                let mut out = String::with_capacity(html.len() + script.len());
                out.push_str(&html[..pos]);
                out.push_str(&script);
                out.push_str(&html[pos..]);
                out
            }
            None => html + &script,
        };
    }

    html
}

/// Template stylesheet followed by the user overrides, honouring the
/// template's `@protect` directives.
///
/// The font `@import` of the overrides is hoisted to the top; browsers drop
/// an `@import` that follows any rule.
pub fn build_combined_css(template: &Template, styles: &StyleSpec, template_id: Option<&str>) -> String {
    let protection = ProtectionMap::parse(&template.css);
    let dynamic = generate_dynamic_css(styles, template_id, Some(&protection));
    let (imports, rules) = split_leading_imports(&dynamic);
    format!(
        "{imports}/* Template Base Styles */\n{}\n\n/* User Customizations */\n{rules}",
        template.css
    )
}

fn split_leading_imports(css: &str) -> (&str, &str) {
    let end: usize = css
        .split_inclusive('\n')
        .take_while(|line| line.starts_with("@import"))
        .map(str::len)
        .sum();
    css.split_at(end)
}

// ---------------------------------------------------------------------------
// Container annotation
// ---------------------------------------------------------------------------

/// Add template and accordion data attributes to every start tag whose
/// class list contains `faq-container`.
fn annotate_containers(html: &str, styles: &StyleSpec, template_id: Option<&str>) -> String {
    let mut attrs = String::new();
    if let Some(id) = template_id.filter(|id| !id.is_empty()) {
        attrs.push_str(&format!(" data-template=\"{}\"", escape_html(id)));
    }
    attrs.push_str(&format!(
        " data-animation-type=\"{}\" data-animation-duration=\"{}\" data-accordion-mode=\"single\"",
        styles.accordion.animation_type.token(),
        styles.accordion.animation_duration
    ));

    START_TAG_RE
        .replace_all(html, |caps: &Captures| {
            let tag = &caps[0];
            let Some(class) = CLASS_ATTR_RE.captures(tag) else {
                return tag.to_string();
            };
            let value = class
                .get(1)
                .or_else(|| class.get(2))
                .or_else(|| class.get(3))
                .map_or("", |m| m.as_str());
            if !value.split_whitespace().any(|c| c == "faq-container") {
                return tag.to_string();
            }
            let end = class.get(0).map_or(tag.len() - 1, |m| m.end());
            format!("{}{}{}", &tag[..end], attrs, &tag[end..])
        })
        .into_owned()
}

// ---------------------------------------------------------------------------
// Fragments
// ---------------------------------------------------------------------------

/// First word plain, second word highlighted, the rest on its own line.
fn split_heading(heading: &str) -> String {
    let words: Vec<&str> = heading.split_whitespace().collect();
    match words.as_slice() {
        [] => String::new(),
        [only] => escape_html(only),
        [first, second, rest @ ..] => {
            let mut out = format!(
                "<span class=\"heading-line\"><span>{}</span> <span class=\"highlight\">{}</span></span>",
                escape_html(first),
                escape_html(second)
            );
            if !rest.is_empty() {
                out.push_str(&format!(
                    "<span class=\"heading-line\">{}</span>",
                    escape_html(&rest.join(" "))
                ));
            }
            out
        }
    }
}

fn icon_svg(icon: IconStyle) -> &'static str {
    match icon {
        IconStyle::Chevron => CHEVRON_SVG,
        IconStyle::Plus => PLUS_SVG,
    }
}

fn items_html(items: &[FaqItem], styles: &StyleSpec, visibility: AnswerVisibility) -> String {
    let icon = icon_svg(styles.accordion.icon_style);
    let mut used = HashSet::new();
    let mut seen_ids = HashSet::new();
    let mut out = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let position = index + 1;
        if !seen_ids.insert(item.id.as_str()) {
            debug!("Duplicate FAQ item id '{}' at position {position}", item.id);
        }
        let key = dom_key(&item.id, position, &mut used);
        let open = visibility.is_open(index);

        let mut block = String::new();
        block.push_str(&format!(
            "<div class=\"faq-item\" data-item-id=\"{}\" data-open=\"{}\">",
            escape_html(&item.id),
            open
        ));
        block.push_str(&format!(
            "<button type=\"button\" class=\"faq-question\" data-accordion-button aria-expanded=\"{open}\" aria-controls=\"faq-answer-{key}\" id=\"faq-question-{key}\">"
        ));
        block.push_str(&format!(
            "<span class=\"faq-question-text\">{}</span>",
            escape_html(&item.display_question(position))
        ));
        block.push_str(&format!("<span class=\"faq-icon\">{icon}</span></button>"));
        block.push_str(&format!(
            "<div class=\"faq-answer\" id=\"faq-answer-{key}\" role=\"region\" aria-labelledby=\"faq-question-{key}\"{}>{}</div>",
            if open { "" } else { " hidden" },
            escape_html(&item.display_answer(position))
        ));
        block.push_str("</div>");
        out.push(block);
    }

    out.join("\n")
}

/// Id-safe key for an item: the id reduced to `[A-Za-z0-9_-]`, with the
/// 1-based position appended when that is empty or already taken.
fn dom_key(id: &str, position: usize, used: &mut HashSet<String>) -> String {
    let slug: String = id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();

    let mut key = if slug.is_empty() {
        format!("item-{position}")
    } else {
        slug
    };
    while used.contains(&key) {
        key = format!("{key}-{position}");
    }
    used.insert(key.clone());
    key
}
