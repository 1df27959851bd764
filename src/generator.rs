//! Dynamic CSS generator – turns a [`StyleSpec`] into override rules layered
//! after a template's own stylesheet.
//!
//! Rules always target the canonical FAQ class names and every declaration
//! carries `!important`, so overrides win regardless of how the template
//! authored its selectors. Paths locked by the template's [`ProtectionMap`]
//! are left out, letting the template's value show through.

use crate::fonts::{google_fonts_import, resolve_font_family};
use crate::protection::{ProtectionMap, StylePath};
use crate::sanitize::{escape_css_string, sanitize_css_value};
use crate::style::{AnimationType, StyleSpec, TypographyStyle};

/// Generate the user-customisation stylesheet.
///
/// `template_id` scopes every selector under
/// `.faq-container[data-template="<id>"]`. `protection` of `None` means
/// nothing is locked.
pub fn generate_dynamic_css(
    styles: &StyleSpec,
    template_id: Option<&str>,
    protection: Option<&ProtectionMap>,
) -> String {
    let unlocked = ProtectionMap::new();
    let gen = Generator {
        styles,
        defaults: StyleSpec::default(),
        scope: container_selector(template_id),
        scoped: template_id.is_some_and(|id| !id.is_empty()),
        protection: protection.unwrap_or(&unlocked),
    };

    let rules = [
        gen.container_rule(),
        gen.typography_rule("heading", &styles.heading, TypographyPaths::HEADING),
        gen.typography_rule("description", &styles.description, TypographyPaths::DESCRIPTION),
        gen.item_rule(),
        gen.question_rule(),
        gen.answer_rule(),
        gen.icon_rule(),
    ];

    let mut css = google_fonts_import(gen.emitted_font_families());
    if !css.is_empty() {
        css.push('\n');
    }
    for rule in rules.iter().filter(|r| !r.is_empty()) {
        rule.write_to(&mut css);
    }
    css
}

/// Container selector, optionally qualified with the template id.
pub fn container_selector(template_id: Option<&str>) -> String {
    match template_id {
        Some(id) if !id.is_empty() => {
            format!(".faq-container[data-template=\"{}\"]", escape_css_string(id))
        }
        _ => ".faq-container".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

struct Rule {
    selector: String,
    declarations: Vec<(String, String)>,
}

impl Rule {
    fn new(selector: String) -> Self {
        Self {
            selector,
            declarations: Vec::new(),
        }
    }

    fn push(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.declarations.push((property.into(), value.into()));
    }

    fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    fn write_to(&self, out: &mut String) {
        out.push_str(&self.selector);
        out.push_str(" {\n");
        for (property, value) in &self.declarations {
            out.push_str("  ");
            out.push_str(property);
            out.push_str(": ");
            out.push_str(value);
            out.push_str(" !important;\n");
        }
        out.push_str("}\n");
    }
}

#[derive(Clone, Copy)]
struct TypographyPaths {
    family: StylePath,
    size: StylePath,
    weight: StylePath,
    color: StylePath,
}

impl TypographyPaths {
    const HEADING: Self = Self {
        family: StylePath::HeadingFontFamily,
        size: StylePath::HeadingFontSize,
        weight: StylePath::HeadingFontWeight,
        color: StylePath::HeadingColor,
    };
    const DESCRIPTION: Self = Self {
        family: StylePath::DescriptionFontFamily,
        size: StylePath::DescriptionFontSize,
        weight: StylePath::DescriptionFontWeight,
        color: StylePath::DescriptionColor,
    };
    const QUESTION: Self = Self {
        family: StylePath::QuestionFontFamily,
        size: StylePath::QuestionFontSize,
        weight: StylePath::QuestionFontWeight,
        color: StylePath::QuestionColor,
    };
    const ANSWER: Self = Self {
        family: StylePath::AnswerFontFamily,
        size: StylePath::AnswerFontSize,
        weight: StylePath::AnswerFontWeight,
        color: StylePath::AnswerColor,
    };
}

/// Paths governing one padding or margin declaration pair.
struct BoxAxes {
    x: StylePath,
    y: StylePath,
}

struct Generator<'a> {
    styles: &'a StyleSpec,
    defaults: StyleSpec,
    scope: String,
    scoped: bool,
    protection: &'a ProtectionMap,
}

impl Generator<'_> {
    fn free(&self, path: StylePath) -> bool {
        !self.protection.is_locked(path)
    }

    fn selector(&self, class: &str) -> String {
        if self.scoped {
            format!("{} .{}", self.scope, class)
        } else {
            format!(".{class}")
        }
    }

    /// Families whose `font-family` declaration survives protection.
    fn emitted_font_families(&self) -> Vec<&str> {
        let s = self.styles;
        [
            (s.heading.font_family.as_str(), StylePath::HeadingFontFamily),
            (s.description.font_family.as_str(), StylePath::DescriptionFontFamily),
            (s.question.font_family.as_str(), StylePath::QuestionFontFamily),
            (s.answer.font_family.as_str(), StylePath::AnswerFontFamily),
        ]
        .into_iter()
        .filter(|&(_, path)| self.free(path))
        .map(|(family, _)| family)
        .collect()
    }

    fn container_rule(&self) -> Rule {
        let mut rule = Rule::new(self.scope.clone());
        if self.free(StylePath::BackgroundColor) {
            rule.push(
                "background",
                sanitize_css_value(
                    "backgroundColor",
                    self.styles.background(),
                    &self.defaults.background_color,
                ),
            );
        }
        if self.free(StylePath::SectionPadding) {
            rule.push("padding", format!("{}px", self.styles.spacing.section_padding));
        }
        if self.free(StylePath::HeadingFontFamily) {
            rule.push(
                "font-family",
                resolve_font_family(&self.styles.heading.font_family),
            );
        }
        rule
    }

    fn typography_rule(&self, class: &str, text: &TypographyStyle, paths: TypographyPaths) -> Rule {
        let mut rule = Rule::new(self.selector(&format!("faq-{class}")));
        self.push_typography(&mut rule, class, text, paths);
        rule
    }

    fn push_typography(
        &self,
        rule: &mut Rule,
        block: &str,
        text: &TypographyStyle,
        paths: TypographyPaths,
    ) {
        if self.free(paths.family) {
            rule.push("font-family", resolve_font_family(&text.font_family));
        }
        if self.free(paths.size) {
            rule.push("font-size", text.font_size.rem());
        }
        if self.free(paths.weight) {
            rule.push("font-weight", text.font_weight.css_value());
        }
        if self.free(paths.color) {
            let fallback = match block {
                "heading" => &self.defaults.heading.color,
                "description" => &self.defaults.description.color,
                "question" => &self.defaults.question.color,
                _ => &self.defaults.answer.color,
            };
            rule.push(
                "color",
                sanitize_css_value(&format!("{block}.color"), &text.color, fallback),
            );
        }
    }

    fn item_rule(&self) -> Rule {
        let accordion = &self.styles.accordion;
        let mut rule = Rule::new(self.selector("faq-item"));

        if self.free(StylePath::ItemSpacing) {
            rule.push("margin-bottom", format!("{}px", self.styles.spacing.item_spacing));
        }

        if !self.free(StylePath::BorderVisible) {
            return rule;
        }

        let width_free = self.free(StylePath::BorderWidth);
        let style_free = self.free(StylePath::BorderStyle);
        let color_free = self.free(StylePath::BorderColor);

        let width = format!("{}px", accordion.border_width);
        let style = accordion.border_style.css_value();
        let color = sanitize_css_value(
            "accordion.borderColor",
            &accordion.border_color,
            &self.defaults.accordion.border_color,
        );

        for (side, shown) in accordion.border_sides.iter() {
            let visible = accordion.border_visible && shown;
            if !visible {
                if style_free {
                    rule.push(format!("border-{side}"), "none");
                }
                continue;
            }
            if width_free && style_free && color_free {
                rule.push(format!("border-{side}"), format!("{width} {style} {color}"));
                continue;
            }
            if width_free {
                rule.push(format!("border-{side}-width"), width.clone());
            }
            if style_free {
                rule.push(format!("border-{side}-style"), style);
            }
            if color_free {
                rule.push(format!("border-{side}-color"), color.clone());
            }
        }
        rule
    }

    fn question_rule(&self) -> Rule {
        let accordion = &self.styles.accordion;
        let mut rule = Rule::new(self.selector("faq-question"));
        self.push_typography(&mut rule, "question", &self.styles.question, TypographyPaths::QUESTION);
        self.push_box(
            &mut rule,
            "padding",
            BoxAxes {
                x: StylePath::QuestionPaddingX,
                y: StylePath::QuestionPaddingY,
            },
            accordion.padding_x,
            accordion.padding_y,
            false,
        );
        self.push_box(
            &mut rule,
            "margin",
            BoxAxes {
                x: StylePath::QuestionMarginX,
                y: StylePath::QuestionMarginY,
            },
            accordion.margin_x,
            accordion.margin_y,
            false,
        );
        rule
    }

    fn answer_rule(&self) -> Rule {
        let accordion = &self.styles.accordion;
        let mut rule = Rule::new(self.selector("faq-answer"));
        self.push_typography(&mut rule, "answer", &self.styles.answer, TypographyPaths::ANSWER);
        self.push_box(
            &mut rule,
            "padding",
            BoxAxes {
                x: StylePath::AnswerPaddingX,
                y: StylePath::AnswerPaddingY,
            },
            accordion.padding_x,
            accordion.padding_y,
            true,
        );
        self.push_box(
            &mut rule,
            "margin",
            BoxAxes {
                x: StylePath::AnswerMarginX,
                y: StylePath::AnswerMarginY,
            },
            accordion.margin_x,
            accordion.margin_y,
            true,
        );
        match accordion.animation_type {
            AnimationType::Fade => {
                rule.push("transition", format!("opacity {}ms", accordion.animation_duration))
            }
            AnimationType::Slide => {
                rule.push("transition", format!("max-height {}ms", accordion.animation_duration))
            }
            AnimationType::None => {}
        }
        rule
    }

    fn icon_rule(&self) -> Rule {
        let mut rule = Rule::new(self.selector("faq-icon"));
        rule.push(
            "transition",
            format!("transform {}ms", self.styles.accordion.animation_duration),
        );
        rule
    }

    /// Padding or margin for one block. The shorthand is only used when both
    /// axes are free; otherwise the free axis gets longhands so the locked
    /// axis keeps the template's value. `bottom_only` blocks (answers) have
    /// no top spacing: the shorthand is `0 X Y` and the Y axis is the bottom.
    fn push_box(
        &self,
        rule: &mut Rule,
        property: &str,
        axes: BoxAxes,
        x: u32,
        y: u32,
        bottom_only: bool,
    ) {
        let x_free = self.free(axes.x);
        let y_free = self.free(axes.y);

        if x_free && y_free {
            let value = if bottom_only {
                format!("0 {x}px {y}px")
            } else {
                format!("{y}px {x}px")
            };
            rule.push(property, value);
            return;
        }
        if x_free {
            rule.push(format!("{property}-left"), format!("{x}px"));
            rule.push(format!("{property}-right"), format!("{x}px"));
        }
        if y_free {
            if !bottom_only {
                rule.push(format!("{property}-top"), format!("{y}px"));
            }
            rule.push(format!("{property}-bottom"), format!("{y}px"));
        }
    }
}
