//! Style extractor – reads a template stylesheet (optionally with generated
//! override rules appended) back into a [`StyleSpec`].
//!
//! Only the canonical FAQ selectors are considered: `.faq-container`,
//! `.faq-heading`, `.faq-description`, `.faq-item`, `.faq-question`,
//! `.faq-answer` and `.faq-icon`, either bare (optionally under
//! `.faq-container`) or scoped with `[data-template="<id>"]`. When several
//! declarations set the same property on the same element the CSS cascade
//! decides: `!important` beats normal, scoped beats bare, later beats
//! earlier. Anything the stylesheet does not say falls back to the
//! [`StyleSpec`] default for that field.
//!
//! Extraction is deliberately tolerant: at-rules are flattened, unknown
//! selectors and properties are ignored, and unparsable values keep the
//! default.

use std::collections::HashMap;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::fonts::{family_from_css, DEFAULT_FONT};
use crate::protection::ProtectionMap;
use crate::sanitize::unescape_css_string;
use crate::style::{
    AnimationType, BorderSides, BorderStyle, FontSize, FontWeight, StyleSpec, TypographyStyle,
};

static COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("comment pattern is valid"));

static BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^{}]+)\{([^{}]*)\}").expect("block pattern is valid"));

static SCOPED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^\.faq-container\[data-template=(?:"((?:[^"\\]|\\.)*)"|'((?:[^'\\]|\\.)*)'|([A-Za-z0-9_-]+))\](?: \.(faq-[a-z]+))?$"#,
    )
    .expect("scoped selector pattern is valid")
});

static IMPORTANT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*!\s*important\s*$").expect("important pattern is valid"));

static BORDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)?)px\s+([A-Za-z]+)\s+(.+)$").expect("border pattern is valid")
});

static DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)(ms|s)\b").expect("duration pattern is valid")
});

/// Read the style values a stylesheet sets for the FAQ elements.
///
/// Returns `None` for a blank stylesheet. `template_id` enables matching of
/// rules scoped to that template.
pub fn extract_styles(css: &str, template_id: Option<&str>) -> Option<StyleSpec> {
    if css.trim().is_empty() {
        return None;
    }
    let cascade = Cascade::parse(css, template_id.filter(|id| !id.is_empty()));
    Some(cascade.into_styles())
}

/// [`extract_styles`] together with the stylesheet's protection map, the
/// pair an editor needs to show initial values and lock fields.
pub fn extract_editor_state(css: &str, template_id: Option<&str>) -> Option<(StyleSpec, ProtectionMap)> {
    let styles = extract_styles(css, template_id)?;
    Some((styles, ProtectionMap::parse(css)))
}

// ---------------------------------------------------------------------------
// Cascade
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Element {
    Container,
    Heading,
    Description,
    Item,
    Question,
    Answer,
    Icon,
}

impl Element {
    fn from_class(class: &str) -> Option<Element> {
        let element = match class {
            "faq-container" => Element::Container,
            "faq-heading" => Element::Heading,
            "faq-description" => Element::Description,
            "faq-item" => Element::Item,
            "faq-question" => Element::Question,
            "faq-answer" => Element::Answer,
            "faq-icon" => Element::Icon,
            _ => return None,
        };
        Some(element)
    }
}

#[derive(Debug, Clone)]
struct Declaration {
    value: String,
    important: bool,
    scoped: bool,
    order: usize,
}

impl Declaration {
    fn beats(&self, other: &Declaration) -> bool {
        (self.important, self.scoped, self.order) > (other.important, other.scoped, other.order)
    }
}

#[derive(Debug, Default)]
struct Cascade {
    winners: HashMap<(Element, String), Declaration>,
    order: usize,
}

impl Cascade {
    fn parse(css: &str, template_id: Option<&str>) -> Self {
        let mut cascade = Cascade::default();
        let css = COMMENT_RE.replace_all(css, "");

        for caps in BLOCK_RE.captures_iter(&css) {
            // Anything before the last `;` is a preceding statement such
            // as `@import url(...);`.
            let prelude = &caps[1];
            let selector_text = prelude.rsplit(';').next().unwrap_or(prelude);
            let body = &caps[2];

            for selector in selector_text.split(',') {
                let Some((element, scoped)) = match_selector(selector, template_id) else {
                    continue;
                };
                for (property, value, important) in declarations(body) {
                    cascade.declare(element, scoped, &property, value, important);
                }
            }
        }
        cascade
    }

    fn declare(&mut self, element: Element, scoped: bool, property: &str, value: String, important: bool) {
        match property {
            "padding" | "margin" => {
                if let Some([top, right, bottom, left]) = expand_box(&value) {
                    for (side, v) in [("top", top), ("right", right), ("bottom", bottom), ("left", left)] {
                        self.insert(element, format!("{property}-{side}"), v, scoped, important);
                    }
                }
            }
            "border" => {
                for side in ["top", "right", "bottom", "left"] {
                    self.insert(element, format!("border-{side}"), value.clone(), scoped, important);
                }
            }
            "background" | "background-color" => {
                self.insert(element, "background".to_string(), value, scoped, important);
            }
            _ => self.insert(element, property.to_string(), value, scoped, important),
        }
    }

    fn insert(&mut self, element: Element, property: String, value: String, scoped: bool, important: bool) {
        self.order += 1;
        let candidate = Declaration {
            value,
            important,
            scoped,
            order: self.order,
        };
        let key = (element, property);
        match self.winners.get(&key) {
            Some(current) if !candidate.beats(current) => {}
            _ => {
                self.winners.insert(key, candidate);
            }
        }
    }

    fn get(&self, element: Element, property: &str) -> Option<&Declaration> {
        self.winners.get(&(element, property.to_string()))
    }

    fn value(&self, element: Element, property: &str) -> Option<&str> {
        self.get(element, property).map(|d| d.value.as_str())
    }

    fn into_styles(self) -> StyleSpec {
        let defaults = StyleSpec::default();
        let mut styles = StyleSpec::default();

        self.apply_background(&mut styles);

        let container_family = self.value(Element::Container, "font-family").and_then(family_from_css);
        styles.heading = self.typography(Element::Heading, &defaults.heading, container_family);
        styles.description = self.typography(Element::Description, &defaults.description, container_family);
        styles.question = self.typography(Element::Question, &defaults.question, container_family);
        styles.answer = self.typography(Element::Answer, &defaults.answer, container_family);

        if let Some(px) = self.px(Element::Container, "padding-top") {
            styles.spacing.section_padding = px;
        }
        if let Some(px) = self.px(Element::Item, "margin-bottom") {
            styles.spacing.item_spacing = px;
        }

        let accordion = &mut styles.accordion;
        if let Some(px) = self.px(Element::Question, "padding-left").or_else(|| self.px(Element::Question, "padding-right")) {
            accordion.padding_x = px;
        }
        if let Some(px) = self.px(Element::Question, "padding-top").or_else(|| self.px(Element::Question, "padding-bottom")) {
            accordion.padding_y = px;
        }
        if let Some(px) = self.px(Element::Question, "margin-left").or_else(|| self.px(Element::Question, "margin-right")) {
            accordion.margin_x = px;
        }
        if let Some(px) = self.px(Element::Question, "margin-top").or_else(|| self.px(Element::Question, "margin-bottom")) {
            accordion.margin_y = px;
        }

        self.apply_animation(&mut styles);
        self.apply_border(&mut styles);
        styles
    }

    fn apply_background(&self, styles: &mut StyleSpec) {
        let Some(value) = self.value(Element::Container, "background") else {
            return;
        };
        let value = value.trim();
        let lower = value.to_ascii_lowercase();
        if lower.contains("gradient") {
            styles.background_gradient = Some(value.to_string());
        } else if lower.contains("url(") || lower == "transparent" || lower == "none" || lower == "inherit" {
            debug!("extract: container background '{value}' is not a colour, keeping default");
        } else if !value.is_empty() {
            styles.background_color = strip_quotes(value);
        }
    }

    fn typography(
        &self,
        element: Element,
        default: &TypographyStyle,
        container_family: Option<&'static str>,
    ) -> TypographyStyle {
        let mut text = default.clone();

        text.font_family = self
            .value(element, "font-family")
            .and_then(family_from_css)
            .or(container_family)
            .unwrap_or(DEFAULT_FONT)
            .to_string();

        if let Some(value) = self.value(element, "font-size") {
            match parse_rem(value) {
                Some(rem) => text.font_size = FontSize::nearest(rem),
                None => debug!("extract: unreadable font-size '{value}' on {element:?}"),
            }
        }
        if let Some(value) = self.value(element, "font-weight") {
            match FontWeight::from_css(value) {
                Some(weight) => text.font_weight = weight,
                None => debug!("extract: unreadable font-weight '{value}' on {element:?}"),
            }
        }
        if let Some(value) = self.value(element, "color") {
            let color = strip_quotes(value);
            if !color.is_empty() {
                text.color = color;
            }
        }
        text
    }

    fn apply_animation(&self, styles: &mut StyleSpec) {
        let answer = self.value(Element::Answer, "transition");
        let icon = self.get(Element::Icon, "transition");
        let accordion = &mut styles.accordion;

        match answer.map(str::to_ascii_lowercase) {
            Some(t) if t.contains("max-height") => accordion.animation_type = AnimationType::Slide,
            Some(t) if t.contains("opacity") => accordion.animation_type = AnimationType::Fade,
            // Generated overrides always carry the icon rule; no answer
            // transition alongside it means animation was switched off.
            None if icon.is_some_and(|d| d.important) => {
                accordion.animation_type = AnimationType::None
            }
            _ => {}
        }

        let duration = icon
            .map(|d| d.value.as_str())
            .and_then(parse_duration_ms)
            .or_else(|| answer.and_then(parse_duration_ms));
        if let Some(ms) = duration {
            accordion.animation_duration = ms;
        }
    }

    fn apply_border(&self, styles: &mut StyleSpec) {
        let sides: Vec<(&str, Option<&str>)> = ["top", "right", "bottom", "left"]
            .into_iter()
            .map(|side| (side, self.border_side(side)))
            .collect();

        let accordion = &mut styles.accordion;
        if sides.iter().all(|(_, value)| value.is_none()) {
            debug!("extract: no item border declared, borders off");
            accordion.border_visible = false;
            return;
        }

        let visible = |value: Option<&str>| value.is_some_and(side_is_visible);
        let shown = BorderSides {
            top: visible(sides[0].1),
            right: visible(sides[1].1),
            bottom: visible(sides[2].1),
            left: visible(sides[3].1),
        };
        if !shown.any() {
            accordion.border_visible = false;
            return;
        }
        accordion.border_visible = true;
        accordion.border_sides = shown;

        let Some(first) = sides
            .iter()
            .find(|(_, value)| visible(*value))
            .map(|(side, _)| *side)
        else {
            return;
        };

        let shorthand = self.get(Element::Item, &format!("border-{first}"));
        if let Some(caps) = shorthand.and_then(|d| BORDER_RE.captures(d.value.trim())) {
            if let Ok(width) = caps[1].parse::<f32>() {
                accordion.border_width = width.round() as u32;
            }
            if let Some(style) = BorderStyle::from_css(&caps[2]) {
                accordion.border_style = style;
            }
            accordion.border_color = strip_quotes(&caps[3]);
        }

        // Longhands, as emitted when part of the border is locked, win
        // over the side shorthand only when the cascade says so.
        let longhand = |component: &str| {
            self.get(Element::Item, &format!("border-{first}-{component}"))
                .or_else(|| self.get(Element::Item, &format!("border-{component}")))
                .filter(|d| shorthand.map_or(true, |s| d.beats(s)))
                .map(|d| d.value.as_str())
        };
        if let Some(width) = longhand("width").and_then(parse_px) {
            accordion.border_width = width;
        }
        if let Some(style) = longhand("style").and_then(BorderStyle::from_css) {
            accordion.border_style = style;
        }
        if let Some(color) = longhand("color") {
            accordion.border_color = strip_quotes(color);
        }
    }

    /// The declaration that decides whether one side of the item border shows.
    fn border_side(&self, side: &str) -> Option<&str> {
        self.value(Element::Item, &format!("border-{side}"))
            .or_else(|| self.value(Element::Item, &format!("border-{side}-style")))
            .or_else(|| self.value(Element::Item, &format!("border-{side}-width")))
    }

    fn px(&self, element: Element, property: &str) -> Option<u32> {
        self.value(element, property).and_then(parse_px)
    }
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

/// Canonical element and scoping of one selector, if it is one we read.
fn match_selector(selector: &str, template_id: Option<&str>) -> Option<(Element, bool)> {
    let normalized = normalize_selector(selector);
    if normalized.is_empty() {
        return None;
    }

    if let Some(caps) = SCOPED_RE.captures(&normalized) {
        let id = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| unescape_css_string(m.as_str()))
            .or_else(|| caps.get(3).map(|m| m.as_str().to_string()))?;
        if template_id != Some(id.as_str()) {
            return None;
        }
        let element = match caps.get(4) {
            Some(class) => Element::from_class(class.as_str())?,
            None => Element::Container,
        };
        return Some((element, true));
    }

    let class = normalized
        .strip_prefix(".faq-container ")
        .unwrap_or(&normalized)
        .strip_prefix('.')?;
    Element::from_class(class).map(|element| (element, false))
}

fn normalize_selector(selector: &str) -> String {
    selector
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// `(property, value, important)` for every declaration in a rule body.
fn declarations(body: &str) -> impl Iterator<Item = (String, String, bool)> + '_ {
    body.split(';').filter_map(|decl| {
        let (property, value) = decl.split_once(':')?;
        let property = property.trim().to_ascii_lowercase();
        if property.is_empty() {
            return None;
        }
        let important = IMPORTANT_RE.is_match(value);
        let value = IMPORTANT_RE.replace(value, "").trim().to_string();
        if value.is_empty() {
            return None;
        }
        Some((property, value, important))
    })
}

/// Expand a 1–4 value `padding` / `margin` shorthand to top, right, bottom, left.
fn expand_box(value: &str) -> Option<[String; 4]> {
    let parts: Vec<&str> = value.split_whitespace().collect();
    let [top, right, bottom, left] = match parts.as_slice() {
        [all] => [*all; 4],
        [y, x] => [*y, *x, *y, *x],
        [t, x, b] => [*t, *x, *b, *x],
        [t, r, b, l] => [*t, *r, *b, *l],
        _ => return None,
    };
    Some([top, right, bottom, left].map(str::to_string))
}

/// Pixels from `16px`, `0` or a rem/em length (16px per rem).
fn parse_px(value: &str) -> Option<u32> {
    let value = value.trim().to_ascii_lowercase();
    let (number, scale) = if let Some(n) = value.strip_suffix("px") {
        (n, 1.0)
    } else if let Some(n) = value.strip_suffix("rem").or_else(|| value.strip_suffix("em")) {
        (n, 16.0)
    } else if value == "0" {
        ("0", 1.0)
    } else {
        return None;
    };
    let n: f32 = number.trim().parse().ok()?;
    if !n.is_finite() || n < 0.0 {
        return None;
    }
    Some((n * scale).round() as u32)
}

/// Rem from a `font-size` value in rem, em or px.
fn parse_rem(value: &str) -> Option<f32> {
    let value = value.trim().to_ascii_lowercase();
    let (number, divisor) = if let Some(n) = value.strip_suffix("rem").or_else(|| value.strip_suffix("em")) {
        (n, 1.0)
    } else if let Some(n) = value.strip_suffix("px") {
        (n, 16.0)
    } else {
        return None;
    };
    let n: f32 = number.trim().parse().ok()?;
    (n.is_finite() && n > 0.0).then_some(n / divisor)
}

fn parse_duration_ms(value: &str) -> Option<u32> {
    let caps = DURATION_RE.captures(value)?;
    let n: f32 = caps[1].parse().ok()?;
    let ms = if caps[2].eq_ignore_ascii_case("s") { n * 1000.0 } else { n };
    Some(ms.round() as u32)
}

fn side_is_visible(value: &str) -> bool {
    let first = value.split_whitespace().next().unwrap_or_default().to_ascii_lowercase();
    !matches!(first.as_str(), "" | "none" | "hidden" | "0" | "0px")
}

fn strip_quotes(value: &str) -> String {
    value.trim().replace(['"', '\''], "")
}
