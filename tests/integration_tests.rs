//! Integration tests for the faq-forge pipeline.
//!
//! These tests validate:
//! - Generated CSS reads back into the style config it came from
//! - Locked style paths never reach the generated CSS
//! - Rendering is deterministic and escapes all user text
//! - Rendered markup drives the accordion contract
//! - Templates load from disk and fall back safely

use std::fs;

use proptest::prelude::*;

use faq_forge::accordion::{visible_answers, AccordionMode, AccordionState, AnswerEffect, AnswerVisibility};
use faq_forge::content::{ContentSpec, FaqItem};
use faq_forge::dom::{find_all, parse_html};
use faq_forge::extract::extract_styles;
use faq_forge::fonts::{family_from_css, font_catalog};
use faq_forge::generator::generate_dynamic_css;
use faq_forge::inject::inject_content;
use faq_forge::payload::EmbedResponse;
use faq_forge::pipeline::{load_editor_state, render_embed, render_payload, render_with_store, FaqConfig, RenderOptions};
use faq_forge::protection::{ProtectionMap, StylePath};
use faq_forge::sanitize::unescape_css_string;
use faq_forge::style::{
    AccordionStyle, AnimationType, BorderSides, BorderStyle, FontSize, FontWeight, IconStyle, Spacing,
    StyleSpec, TypographyStyle,
};
use faq_forge::templates::{resolve_template, FsTemplateStore, MemoryTemplateStore, Template, TemplateStore};

// =====================================================================
// Helpers
// =====================================================================

const COLORS: &[&str] = &["#000", "#ffffff", "#1a1a1a", "#c0ffee", "#ff0000", "#3366cc", "rgb(10, 20, 30)"];

fn content(items: &[(&str, &str, &str)]) -> ContentSpec {
    ContentSpec {
        heading: "FAQ".into(),
        description: String::new(),
        items: items.iter().map(|&(id, q, a)| FaqItem::new(id, q, a)).collect(),
    }
}

fn config(template: &str, items: &[(&str, &str, &str)]) -> FaqConfig {
    FaqConfig {
        content: content(items),
        template: template.into(),
        styles: StyleSpec::default(),
    }
}

/// Trimmed declaration lines of the rule whose selector is exactly `selector`.
fn rule_lines(css: &str, selector: &str) -> Vec<String> {
    let start = format!("{selector} {{\n");
    let Some(pos) = css.find(&start) else {
        return Vec::new();
    };
    let body = &css[pos + start.len()..];
    let end = body.find('}').unwrap();
    body[..end]
        .lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

/// Collapse the forms that render to identical CSS onto one representative.
fn canonical(mut styles: StyleSpec) -> StyleSpec {
    let defaults = AccordionStyle::default();
    let a = &mut styles.accordion;
    a.icon_style = IconStyle::Chevron;
    if !a.border_visible || !a.border_sides.any() {
        a.border_visible = false;
        a.border_sides = BorderSides::ALL;
        a.border_width = defaults.border_width;
        a.border_style = defaults.border_style;
        a.border_color = defaults.border_color;
    }
    styles
}

fn typography() -> impl Strategy<Value = TypographyStyle> {
    (
        0..font_catalog().len(),
        prop::sample::select(FontSize::ALL.to_vec()),
        prop::sample::select(FontWeight::ALL.to_vec()),
        prop::sample::select(COLORS.to_vec()),
    )
        .prop_map(|(font, font_size, font_weight, color)| TypographyStyle {
            font_family: font_catalog()[font].name.to_string(),
            font_size,
            font_weight,
            color: color.to_string(),
        })
}

prop_compose! {
    fn accordion_style()(
        icon_style in prop::sample::select(vec![IconStyle::Chevron, IconStyle::Plus]),
        animation_type in prop::sample::select(vec![AnimationType::Fade, AnimationType::Slide, AnimationType::None]),
        animation_duration in 0u32..2000,
        border_color in prop::sample::select(COLORS.to_vec()),
        border_width in 1u32..8,
        border_style in prop::sample::select(BorderStyle::ALL.to_vec()),
        border_visible in any::<bool>(),
        sides in any::<[bool; 4]>(),
        padding in (0u32..64, 0u32..64),
        margin in (0u32..64, 0u32..64),
    ) -> AccordionStyle {
        AccordionStyle {
            icon_style,
            animation_type,
            animation_duration,
            border_color: border_color.to_string(),
            border_width,
            border_style,
            border_visible,
            border_sides: BorderSides { top: sides[0], right: sides[1], bottom: sides[2], left: sides[3] },
            padding_x: padding.0,
            padding_y: padding.1,
            margin_x: margin.0,
            margin_y: margin.1,
        }
    }
}

prop_compose! {
    fn style_spec()(
        heading in typography(),
        description in typography(),
        question in typography(),
        answer in typography(),
        background_color in prop::sample::select(COLORS.to_vec()),
        accordion in accordion_style(),
        section_padding in 0u32..96,
        item_spacing in 0u32..96,
    ) -> StyleSpec {
        StyleSpec {
            heading,
            description,
            question,
            answer,
            background_color: background_color.to_string(),
            background_gradient: None,
            accordion,
            spacing: Spacing { section_padding, item_spacing },
        }
    }
}

// =====================================================================
// Round trip: generate → extract
// =====================================================================

#[test]
fn every_catalog_font_reads_back_by_name() {
    for face in font_catalog() {
        assert_eq!(family_from_css(&face.stack), Some(face.name), "{}", face.name);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn combined_css_reads_back(styles in style_spec(), id in "[a-z][a-z0-9-]{0,12}") {
        let cfg = FaqConfig {
            content: content(&[("1", "Q1", "A1")]),
            template: id.clone(),
            styles: styles.clone(),
        };
        let payload = render_payload(&Template::fallback(), &cfg, &RenderOptions::default());
        let back = extract_styles(&payload.css, Some(id.as_str())).unwrap();
        prop_assert_eq!(back, canonical(styles));
    }

    #[test]
    fn unscoped_css_reads_back(styles in style_spec()) {
        let css = generate_dynamic_css(&styles, None, None);
        let back = extract_styles(&css, None).unwrap();
        prop_assert_eq!(back, canonical(styles));
    }
}

#[test]
fn gradient_background_reads_back() {
    let mut styles = StyleSpec::default();
    styles.background_gradient = Some("linear-gradient(135deg, #667eea 0%, #764ba2 100%)".into());
    let css = generate_dynamic_css(&styles, Some("card"), None);
    assert_eq!(extract_styles(&css, Some("card")).unwrap(), styles);
}

// =====================================================================
// Protection invariant
// =====================================================================

/// Style config where every lockable value renders to a distinct string.
fn distinctive_styles() -> StyleSpec {
    let mut s = StyleSpec::default();
    s.background_color = "#0b0c0d".into();
    s.spacing = Spacing {
        section_padding: 41,
        item_spacing: 23,
    };
    s.heading = TypographyStyle {
        font_family: "Inter".into(),
        font_size: FontSize::XXXXL,
        font_weight: FontWeight::Light,
        color: "#a10001".into(),
    };
    s.description = TypographyStyle {
        font_family: "Lora".into(),
        font_size: FontSize::XS,
        font_weight: FontWeight::Medium,
        color: "#a20002".into(),
    };
    s.question = TypographyStyle {
        font_family: "Roboto".into(),
        font_size: FontSize::LG,
        font_weight: FontWeight::Semibold,
        color: "#a30003".into(),
    };
    s.answer = TypographyStyle {
        font_family: "Fira Code".into(),
        font_size: FontSize::SM,
        font_weight: FontWeight::Bold,
        color: "#a40004".into(),
    };
    s.accordion.border_color = "#c0ffee".into();
    s.accordion.border_width = 3;
    s.accordion.border_style = BorderStyle::Dashed;
    s.accordion.padding_x = 9;
    s.accordion.padding_y = 7;
    s.accordion.margin_x = 11;
    s.accordion.margin_y = 13;
    s.accordion.animation_duration = 250;
    s
}

/// Rule selector and a matcher for the declarations sourced from `path`.
fn sourced_from(path: StylePath) -> (&'static str, Box<dyn Fn(&str) -> bool>) {
    fn has(prefix: &'static str, needle: &'static str) -> Box<dyn Fn(&str) -> bool> {
        Box::new(move |line: &str| line.starts_with(prefix) && line.contains(needle))
    }
    match path {
        StylePath::BackgroundColor => (".faq-container", has("background", "#0b0c0d")),
        StylePath::SectionPadding => (".faq-container", has("padding", "41px")),
        StylePath::ItemSpacing => (".faq-item", has("margin-bottom", "23px")),
        StylePath::HeadingFontFamily => (".faq-heading", has("font-family", "Inter")),
        StylePath::HeadingFontSize => (".faq-heading", has("font-size", "2.25rem")),
        StylePath::HeadingFontWeight => (".faq-heading", has("font-weight", "300")),
        StylePath::HeadingColor => (".faq-heading", has("color", "#a10001")),
        StylePath::DescriptionFontFamily => (".faq-description", has("font-family", "Lora")),
        StylePath::DescriptionFontSize => (".faq-description", has("font-size", "0.75rem")),
        StylePath::DescriptionFontWeight => (".faq-description", has("font-weight", "500")),
        StylePath::DescriptionColor => (".faq-description", has("color", "#a20002")),
        StylePath::QuestionFontFamily => (".faq-question", has("font-family", "Roboto")),
        StylePath::QuestionFontSize => (".faq-question", has("font-size", "1.125rem")),
        StylePath::QuestionFontWeight => (".faq-question", has("font-weight", "600")),
        StylePath::QuestionColor => (".faq-question", has("color", "#a30003")),
        StylePath::AnswerFontFamily => (".faq-answer", has("font-family", "Fira Code")),
        StylePath::AnswerFontSize => (".faq-answer", has("font-size", "0.875rem")),
        StylePath::AnswerFontWeight => (".faq-answer", has("font-weight", "700")),
        StylePath::AnswerColor => (".faq-answer", has("color", "#a40004")),
        StylePath::QuestionPaddingX => (".faq-question", has("padding", "9px")),
        StylePath::QuestionPaddingY => (".faq-question", has("padding", "7px")),
        StylePath::QuestionMarginX => (".faq-question", has("margin", "11px")),
        StylePath::QuestionMarginY => (".faq-question", has("margin", "13px")),
        StylePath::AnswerPaddingX => (".faq-answer", has("padding", "9px")),
        StylePath::AnswerPaddingY => (".faq-answer", has("padding", "7px")),
        StylePath::AnswerMarginX => (".faq-answer", has("margin", "11px")),
        StylePath::AnswerMarginY => (".faq-answer", has("margin", "13px")),
        StylePath::BorderColor => (".faq-item", has("border", "#c0ffee")),
        StylePath::BorderWidth => (".faq-item", has("border", "3px")),
        StylePath::BorderStyle => (".faq-item", has("border", "dashed")),
        StylePath::BorderVisible => (".faq-item", has("border", "")),
    }
}

#[test]
fn locked_paths_never_reach_generated_css() {
    let styles = distinctive_styles();
    let unlocked = generate_dynamic_css(&styles, None, None);

    for path in StylePath::ALL {
        let locked = generate_dynamic_css(&styles, None, Some(&[path].into_iter().collect()));
        let (selector, matches) = sourced_from(path);

        let before = rule_lines(&unlocked, selector);
        let after = rule_lines(&locked, selector);
        assert!(before.iter().any(|l| matches(l)), "{path}: missing from unlocked output");
        assert!(!after.iter().any(|l| matches(l)), "{path}: still present when locked: {after:?}");
    }
}

#[test]
fn locking_one_axis_keeps_the_other() {
    let styles = distinctive_styles();
    let protection: ProtectionMap = [StylePath::QuestionPaddingX].into_iter().collect();
    let css = generate_dynamic_css(&styles, None, Some(&protection));
    let lines = rule_lines(&css, ".faq-question");
    assert!(lines.contains(&"padding-top: 7px !important;".to_string()));
    assert!(lines.contains(&"padding-bottom: 7px !important;".to_string()));
    assert!(!lines.iter().any(|l| l.starts_with("padding-left") || l.starts_with("padding:")));
}

#[test]
fn template_directives_drive_the_render() {
    let template = Template::new(
        "<section class=\"faq-container\">{{heading}}{{items}}</section>",
        "/* @protect: background, color */\n.faq-container { background: #111111; }\n\
         /* @protect: color */\n.faq-heading { color: #eeeeee; }",
    );
    let mut cfg = config("dark", &[("1", "Q", "A")]);
    cfg.styles.background_color = "#abcdef".into();
    cfg.styles.heading.color = "#123456".into();

    let payload = render_payload(&template, &cfg, &RenderOptions::default());
    assert!(!payload.css.contains("#abcdef"));
    assert!(!payload.css.contains("#123456"));
    assert!(payload.css.contains("background: #111111"));

    let (styles, protection) = extract_editor_state_for(&template);
    assert_eq!(styles.background_color, "#111111");
    assert_eq!(styles.heading.color, "#eeeeee");
    assert!(protection.is_protected("backgroundColor"));
    assert!(protection.is_protected("heading.color"));
    assert!(!protection.is_protected("question.color"));
}

fn extract_editor_state_for(template: &Template) -> (StyleSpec, ProtectionMap) {
    let mut store = MemoryTemplateStore::new();
    store.insert("dark", template.clone());
    load_editor_state(&store, "dark").unwrap()
}

// =====================================================================
// Border sides
// =====================================================================

#[test]
fn border_sides_are_independent() {
    let mut styles = StyleSpec::default();
    styles.accordion.border_width = 2;
    styles.accordion.border_style = BorderStyle::Solid;
    styles.accordion.border_color = "#000".into();
    styles.accordion.border_sides = BorderSides {
        top: true,
        right: false,
        bottom: true,
        left: false,
    };
    let css = generate_dynamic_css(&styles, None, None);
    let lines = rule_lines(&css, ".faq-item");
    for expected in [
        "border-top: 2px solid #000 !important;",
        "border-right: none !important;",
        "border-bottom: 2px solid #000 !important;",
        "border-left: none !important;",
    ] {
        assert!(lines.iter().any(|l| l == expected), "missing {expected}: {lines:?}");
    }
    assert_eq!(lines.iter().filter(|l| l.starts_with("border")).count(), 4);
}

// =====================================================================
// Injection
// =====================================================================

#[test]
fn injection_is_idempotent() {
    let template = Template::fallback();
    let c = content(&[("1", "Q1", "A1"), ("2", "Q2", "A2")]);
    let styles = distinctive_styles();
    let a = inject_content(&template, &c, &styles, Some("card"), AnswerVisibility::Collapsed);
    let b = inject_content(&template, &c, &styles, Some("card"), AnswerVisibility::Collapsed);
    assert_eq!(a, b);
}

#[test]
fn user_text_is_escaped() {
    let attack = "<script>alert(1)</script>";
    let mut cfg = config("", &[("x", attack, attack)]);
    cfg.content.heading = attack.into();
    cfg.content.description = "\"quoted\" & 'single'".into();

    let html = render_payload(&Template::fallback(), &cfg, &RenderOptions::default()).html;
    assert!(!html.contains("<script>"), "raw <script> in output");
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(html.contains("&quot;quoted&quot; &amp; &#039;single&#039;"));
    assert!(html.contains("\\u003cscript\\u003ealert(1)\\u003c/script\\u003e"));
}

#[test]
fn every_placeholder_is_substituted() {
    let skeleton = "<html><head>{{styles}}{{styles}}</head><body>\
        <div class=\"faq-container\">{{heading}}{{heading}}{{description}}{{description}}\
        {{items}}{{items}}</div>{{jsonLd}}{{jsonLd}}</body></html>";
    let template = Template::new(skeleton, ".faq-item { border: none; }");
    let mut c = content(&[("1", "Q1", "A1")]);
    c.description = "About".into();
    let html = inject_content(&template, &c, &StyleSpec::default(), None, AnswerVisibility::Collapsed);
    for marker in ["{{heading}}", "{{description}}", "{{items}}", "{{styles}}", "{{jsonLd}}"] {
        assert!(!html.contains(marker), "{marker} left in output");
    }
    assert!(!html.contains("{{"));
    assert_eq!(html.matches("class=\"faq-description\"").count(), 2);
}

#[test]
fn placeholders_in_user_text_are_not_expanded() {
    let c = content(&[("1", "What is {{styles}}?", "{{jsonLd}}")]);
    let html = inject_content(&Template::fallback(), &c, &StyleSpec::default(), None, AnswerVisibility::Collapsed);
    assert!(html.contains("What is {{styles}}?"));
    assert_eq!(html.matches("<style>").count(), 1);
    assert_eq!(html.matches("application/ld+json").count(), 1);
}

#[test]
fn end_to_end_single_item() {
    let cfg = config("", &[("1", "Q1", "A1")]);
    let payload = render_with_store(&MemoryTemplateStore::new(), &cfg, &RenderOptions::default());

    assert_eq!(payload.html.matches("class=\"faq-item\"").count(), 1);
    assert!(payload.html.contains("<span class=\"faq-question-text\">Q1</span>"));
    assert!(payload.html.contains(">A1</div>"));
    assert!(payload.html.contains("aria-expanded=\"false\""));
    assert!(payload.html.contains(
        r#""mainEntity":[{"@type":"Question","name":"Q1","acceptedAnswer":{"@type":"Answer","text":"A1"}}]"#
    ));

    assert_eq!(payload.schema.main_entity.len(), 1);
    assert_eq!(payload.schema.main_entity[0].name, "Q1");
    assert_eq!(payload.schema.main_entity[0].accepted_answer.text, "A1");
}

#[test]
fn scoped_css_targets_the_rendered_container() {
    let id = "a<b>&c 'q'";
    let cfg = config(id, &[("1", "Q1", "A1")]);
    let payload = render_with_store(&MemoryTemplateStore::new(), &cfg, &RenderOptions::default());

    let nodes = parse_html(&payload.html);
    let containers = find_all(&nodes, &|el| el.has_class("faq-container"));
    assert_eq!(containers.len(), 1);
    assert_eq!(containers[0].attr("data-template"), Some(id));

    let prefix = ".faq-container[data-template=\"";
    let start = payload.css.find(prefix).expect("scoped rule") + prefix.len();
    let end = start + payload.css[start..].find("\"]").expect("closing quote");
    assert_eq!(unescape_css_string(&payload.css[start..end]), id);
    assert!(!payload.css.contains('<'));
}

#[test]
fn zero_items_render_empty() {
    let cfg = config("", &[]);
    let payload = render_payload(&Template::fallback(), &cfg, &RenderOptions::default());
    assert!(payload.html.contains("<div class=\"faq-items\">\n      \n    </div>"));
    assert!(!payload.html.contains("class=\"faq-item\""));
    assert!(payload.html.contains("\"mainEntity\":[]"));
    assert!(payload.schema.main_entity.is_empty());
}

#[test]
fn blank_items_get_numbered_labels() {
    let cfg = config("", &[("1", "Q1", "A1"), ("2", "  ", "")]);
    let html = render_payload(&Template::fallback(), &cfg, &RenderOptions::default()).html;
    assert!(html.contains(">Question 2</span>"));
    assert!(html.contains(">Answer 2</div>"));
}

#[test]
fn duplicate_ids_still_get_unique_dom_ids() {
    let cfg = config("", &[("same", "Q1", "A1"), ("same", "Q2", "A2")]);
    let html = render_payload(&Template::fallback(), &cfg, &RenderOptions::default()).html;
    let states = AccordionState::from_html(&html);
    let answers: Vec<_> = states[0].items.iter().map(|i| i.answer_id.clone().unwrap()).collect();
    assert_eq!(answers.len(), 2);
    assert_ne!(answers[0], answers[1]);
}

// =====================================================================
// Accordion contract over rendered output
// =====================================================================

#[test]
fn rendered_markup_starts_collapsed() {
    let cfg = config("card", &[("1", "Q1", "A1"), ("2", "Q2", "A2"), ("3", "Q3", "A3")]);
    let html = render_payload(&Template::fallback(), &cfg, &RenderOptions::default()).html;

    let states = AccordionState::from_html(&html);
    assert_eq!(states.len(), 1);
    let state = &states[0];
    assert_eq!(state.template.as_deref(), Some("card"));
    assert_eq!(state.mode, AccordionMode::Single);
    assert_eq!(state.animation, AnimationType::Fade);
    assert_eq!(state.duration_ms, 300);
    assert_eq!(state.items.len(), 3);
    assert!(state.items.iter().all(|i| i.markup_consistent()));
    assert!(state.open_items().is_empty());
    assert!(visible_answers(&html).is_empty());
}

#[test]
fn single_mode_keeps_one_item_open() {
    let mut cfg = config("", &[("1", "Q1", "A1"), ("2", "Q2", "A2")]);
    cfg.styles.accordion.animation_type = AnimationType::Slide;
    cfg.styles.accordion.animation_duration = 200;
    let html = render_payload(&Template::fallback(), &cfg, &RenderOptions::default()).html;
    let mut state = AccordionState::from_html(&html).remove(0);

    let opened = state.toggle(0);
    assert_eq!(opened.len(), 1);
    assert_eq!(opened[0].effect, AnswerEffect::Expand { duration_ms: 200 });

    let switched = state.toggle(1);
    assert_eq!(switched.len(), 2);
    assert_eq!((switched[0].index, switched[0].open), (0, false));
    assert_eq!((switched[1].index, switched[1].open), (1, true));
    let collapse = switched[0].effect;
    assert_eq!(collapse, AnswerEffect::Collapse { duration_ms: 200 });
    assert!(!collapse.hidden_during());
    assert!(collapse.hidden_after());
    assert_eq!(state.open_items(), vec![1]);
    assert!(state.items.iter().all(|i| i.markup_consistent()));
}

#[test]
fn visibility_policy_is_configurable() {
    let cfg = config("", &[("1", "Q1", "A1"), ("2", "Q2", "A2")]);
    let expanded = RenderOptions {
        answer_visibility: AnswerVisibility::Expanded,
    };
    let html = render_payload(&Template::fallback(), &cfg, &expanded).html;
    assert_eq!(visible_answers(&html), vec!["A1", "A2"]);

    let first = RenderOptions {
        answer_visibility: AnswerVisibility::FirstExpanded,
    };
    let html = render_payload(&Template::fallback(), &cfg, &first).html;
    assert_eq!(visible_answers(&html), vec!["A1"]);
    let state = AccordionState::from_html(&html).remove(0);
    assert!(state.items.iter().all(|i| i.markup_consistent()));
}

// =====================================================================
// Templates and payloads
// =====================================================================

fn write_template(root: &std::path::Path, id: &str, css: Option<&str>, js: Option<&str>) {
    let dir = root.join(id);
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("template.html"),
        "<main class=\"faq-container\"><h1>{{heading}}</h1>{{items}}{{jsonLd}}</main>",
    )
    .unwrap();
    if let Some(css) = css {
        fs::write(dir.join("template.css"), css).unwrap();
    }
    if let Some(js) = js {
        fs::write(dir.join("template.js"), js).unwrap();
    }
}

#[test]
fn fs_store_loads_templates() {
    let tmp = tempfile::tempdir().unwrap();
    write_template(tmp.path(), "minimal", Some(".faq-heading { color: #222222; }"), Some("window.x = 1;"));
    let store = FsTemplateStore::new(tmp.path());

    let template = store.fetch("minimal").unwrap().unwrap();
    assert_eq!(template.js.as_deref(), Some("window.x = 1;"));

    let payload = render_with_store(&store, &config("minimal", &[("1", "Q1", "A1")]), &RenderOptions::default());
    assert!(payload.html.starts_with("<style>"));
    assert!(payload.html.contains("<main class=\"faq-container\" data-template=\"minimal\""));
    assert!(payload.html.ends_with("<script data-faq-runtime>window.x = 1;</script>"));
}

#[test]
fn fs_store_falls_back_on_incomplete_or_unsafe_ids() {
    let tmp = tempfile::tempdir().unwrap();
    write_template(tmp.path(), "no-css", None, None);
    let store = FsTemplateStore::new(tmp.path());

    assert!(store.fetch("no-css").unwrap().is_none());
    assert!(store.fetch("../etc").is_err());
    assert_eq!(resolve_template(&store, "no-css"), Template::fallback());
    assert_eq!(resolve_template(&store, "../etc"), Template::fallback());
    assert_eq!(resolve_template(&store, "absent"), Template::fallback());

    let missing_root = FsTemplateStore::new(tmp.path().join("nope"));
    assert!(missing_root.fetch("card").is_err());
}

#[test]
fn integrity_is_stable_and_verifiable() {
    let store = MemoryTemplateStore::new();
    let cfg = config("card", &[("1", "Q1", "A1")]);
    let a = render_embed(&store, &cfg, &RenderOptions::default());
    let b = render_embed(&store, &cfg, &RenderOptions::default());
    assert_eq!(a.integrity, b.integrity);
    assert_eq!(a.integrity.len(), 16);
    assert!(a.verify());

    let parsed: EmbedResponse = serde_json::from_str(&a.to_json()).unwrap();
    assert_eq!(parsed, a);

    let mut other = cfg.clone();
    other.content.items[0].answer = "A2".into();
    assert_ne!(render_embed(&store, &other, &RenderOptions::default()).integrity, a.integrity);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn user_text_never_adds_markup(question in "[a-z][a-z<>&\"' /]{0,30}", answer in "[a-z][a-z<>&\"' /]{0,30}") {
        let baseline = config("card", &[("1", "x", "x")]);
        let attacked = config("card", &[("1", question.as_str(), answer.as_str())]);
        let a = render_payload(&Template::fallback(), &baseline, &RenderOptions::default()).html;
        let b = render_payload(&Template::fallback(), &attacked, &RenderOptions::default()).html;
        prop_assert_eq!(a.matches('<').count(), b.matches('<').count());
        prop_assert_eq!(a.matches('>').count(), b.matches('>').count());
    }

    #[test]
    fn rendering_is_deterministic(styles in style_spec(), heading in ".{0,20}") {
        let mut cfg = config("card", &[("1", "Q1", "A1"), ("2", "Q2", "A2")]);
        cfg.styles = styles;
        cfg.content.heading = heading;
        let first = render_payload(&Template::fallback(), &cfg, &RenderOptions::default());
        let second = render_payload(&Template::fallback(), &cfg, &RenderOptions::default());
        prop_assert_eq!(first.integrity(), second.integrity());
        prop_assert_eq!(first, second);
    }
}
