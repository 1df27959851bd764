//! Template protection – `/* @protect: a, b */` directives in template CSS
//! lock individual style paths against user customisation.
//!
//! ```css
//! /* @protect: background, padding */
//! .faq-container { background: #0b1020; padding: 48px; }
//! ```
//!
//! The map is derived from the template CSS on every render and is never
//! cached, so editing a template's CSS takes effect immediately.

use std::collections::BTreeSet;
use std::fmt;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};

/// A lockable style path, named the way the style config nests it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StylePath {
    BackgroundColor,
    SectionPadding,
    ItemSpacing,
    HeadingFontFamily,
    HeadingFontSize,
    HeadingFontWeight,
    HeadingColor,
    DescriptionFontFamily,
    DescriptionFontSize,
    DescriptionFontWeight,
    DescriptionColor,
    QuestionFontFamily,
    QuestionFontSize,
    QuestionFontWeight,
    QuestionColor,
    AnswerFontFamily,
    AnswerFontSize,
    AnswerFontWeight,
    AnswerColor,
    QuestionPaddingX,
    QuestionPaddingY,
    QuestionMarginX,
    QuestionMarginY,
    AnswerPaddingX,
    AnswerPaddingY,
    AnswerMarginX,
    AnswerMarginY,
    BorderColor,
    BorderWidth,
    BorderStyle,
    BorderVisible,
}

impl StylePath {
    pub const ALL: [StylePath; 31] = [
        StylePath::BackgroundColor,
        StylePath::SectionPadding,
        StylePath::ItemSpacing,
        StylePath::HeadingFontFamily,
        StylePath::HeadingFontSize,
        StylePath::HeadingFontWeight,
        StylePath::HeadingColor,
        StylePath::DescriptionFontFamily,
        StylePath::DescriptionFontSize,
        StylePath::DescriptionFontWeight,
        StylePath::DescriptionColor,
        StylePath::QuestionFontFamily,
        StylePath::QuestionFontSize,
        StylePath::QuestionFontWeight,
        StylePath::QuestionColor,
        StylePath::AnswerFontFamily,
        StylePath::AnswerFontSize,
        StylePath::AnswerFontWeight,
        StylePath::AnswerColor,
        StylePath::QuestionPaddingX,
        StylePath::QuestionPaddingY,
        StylePath::QuestionMarginX,
        StylePath::QuestionMarginY,
        StylePath::AnswerPaddingX,
        StylePath::AnswerPaddingY,
        StylePath::AnswerMarginX,
        StylePath::AnswerMarginY,
        StylePath::BorderColor,
        StylePath::BorderWidth,
        StylePath::BorderStyle,
        StylePath::BorderVisible,
    ];

    /// Dotted path as used by editor UIs, e.g. `accordion.paddingX`.
    pub fn as_str(self) -> &'static str {
        match self {
            StylePath::BackgroundColor => "backgroundColor",
            StylePath::SectionPadding => "spacing.sectionPadding",
            StylePath::ItemSpacing => "spacing.itemSpacing",
            StylePath::HeadingFontFamily => "heading.fontFamily",
            StylePath::HeadingFontSize => "heading.fontSize",
            StylePath::HeadingFontWeight => "heading.fontWeight",
            StylePath::HeadingColor => "heading.color",
            StylePath::DescriptionFontFamily => "description.fontFamily",
            StylePath::DescriptionFontSize => "description.fontSize",
            StylePath::DescriptionFontWeight => "description.fontWeight",
            StylePath::DescriptionColor => "description.color",
            StylePath::QuestionFontFamily => "question.fontFamily",
            StylePath::QuestionFontSize => "question.fontSize",
            StylePath::QuestionFontWeight => "question.fontWeight",
            StylePath::QuestionColor => "question.color",
            StylePath::AnswerFontFamily => "answer.fontFamily",
            StylePath::AnswerFontSize => "answer.fontSize",
            StylePath::AnswerFontWeight => "answer.fontWeight",
            StylePath::AnswerColor => "answer.color",
            StylePath::QuestionPaddingX => "accordion.paddingX",
            StylePath::QuestionPaddingY => "accordion.paddingY",
            StylePath::QuestionMarginX => "accordion.marginX",
            StylePath::QuestionMarginY => "accordion.marginY",
            StylePath::AnswerPaddingX => "answer.paddingX",
            StylePath::AnswerPaddingY => "answer.paddingY",
            StylePath::AnswerMarginX => "answer.marginX",
            StylePath::AnswerMarginY => "answer.marginY",
            StylePath::BorderColor => "accordion.borderColor",
            StylePath::BorderWidth => "accordion.borderWidth",
            StylePath::BorderStyle => "accordion.borderStyle",
            StylePath::BorderVisible => "accordion.borderVisible",
        }
    }

    pub fn from_path(path: &str) -> Option<StylePath> {
        StylePath::ALL.into_iter().find(|p| p.as_str() == path)
    }
}

impl fmt::Display for StylePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StylePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Set of locked paths for one template. Absent means unlocked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProtectionMap {
    locked: BTreeSet<StylePath>,
}

impl ProtectionMap {
    /// Map with nothing locked.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan template CSS for `@protect` directives.
    pub fn parse(css: &str) -> Self {
        let mut map = Self::new();
        for caps in PROTECT_RE.captures_iter(css) {
            let properties = &caps[1];
            let selector = caps[2].trim();

            let Some(category) = classify_selector(selector) else {
                debug!("@protect: no FAQ element matches selector '{selector}', skipped");
                continue;
            };

            for property in properties.split(',') {
                let property = property.trim().to_ascii_lowercase();
                if property.is_empty() {
                    continue;
                }
                let paths = category.paths_for(&property);
                if paths.is_empty() {
                    debug!("@protect: '{property}' is not lockable on '{selector}', skipped");
                }
                map.locked.extend(paths.iter().copied());
            }
        }
        map
    }

    pub fn lock(&mut self, path: StylePath) {
        self.locked.insert(path);
    }

    pub fn is_locked(&self, path: StylePath) -> bool {
        self.locked.contains(&path)
    }

    /// Lookup by dotted path. Unknown paths are never protected.
    pub fn is_protected(&self, path: &str) -> bool {
        StylePath::from_path(path).is_some_and(|p| self.is_locked(p))
    }

    pub fn is_empty(&self) -> bool {
        self.locked.is_empty()
    }

    /// Locked paths in declaration order.
    pub fn paths(&self) -> impl Iterator<Item = StylePath> + '_ {
        self.locked.iter().copied()
    }
}

impl FromIterator<StylePath> for ProtectionMap {
    fn from_iter<I: IntoIterator<Item = StylePath>>(iter: I) -> Self {
        Self {
            locked: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Directive scanning
// ---------------------------------------------------------------------------

// The directive comment, then a selector beginning with `.` or `#`, then `{`.
static PROTECT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)/\*\s*@protect:\s*([^*]+?)\s*\*/\s*([.#][^{}/;]*?)\s*\{")
        .expect("protect directive pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Container,
    Heading,
    Description,
    Question,
    Answer,
    Item,
}

impl Category {
    fn paths_for(self, property: &str) -> &'static [StylePath] {
        use StylePath::*;
        match (self, property) {
            (Category::Container, "background" | "background-color") => &[BackgroundColor],
            (Category::Container, "padding") => &[SectionPadding],

            (Category::Heading, "font-family") => &[HeadingFontFamily],
            (Category::Heading, "font-size") => &[HeadingFontSize],
            (Category::Heading, "font-weight") => &[HeadingFontWeight],
            (Category::Heading, "color") => &[HeadingColor],

            (Category::Description, "font-family") => &[DescriptionFontFamily],
            (Category::Description, "font-size") => &[DescriptionFontSize],
            (Category::Description, "font-weight") => &[DescriptionFontWeight],
            (Category::Description, "color") => &[DescriptionColor],

            (Category::Question, "font-family") => &[QuestionFontFamily],
            (Category::Question, "font-size") => &[QuestionFontSize],
            (Category::Question, "font-weight") => &[QuestionFontWeight],
            (Category::Question, "color") => &[QuestionColor],
            (Category::Question, "padding") => &[QuestionPaddingX, QuestionPaddingY],
            (Category::Question, "padding-x") => &[QuestionPaddingX],
            (Category::Question, "padding-y") => &[QuestionPaddingY],
            (Category::Question, "margin") => &[QuestionMarginX, QuestionMarginY],
            (Category::Question, "margin-x") => &[QuestionMarginX],
            (Category::Question, "margin-y") => &[QuestionMarginY],

            (Category::Answer, "font-family") => &[AnswerFontFamily],
            (Category::Answer, "font-size") => &[AnswerFontSize],
            (Category::Answer, "font-weight") => &[AnswerFontWeight],
            (Category::Answer, "color") => &[AnswerColor],
            (Category::Answer, "padding") => &[AnswerPaddingX, AnswerPaddingY],
            (Category::Answer, "padding-x") => &[AnswerPaddingX],
            (Category::Answer, "padding-y") => &[AnswerPaddingY],
            (Category::Answer, "margin") => &[AnswerMarginX, AnswerMarginY],
            (Category::Answer, "margin-x") => &[AnswerMarginX],
            (Category::Answer, "margin-y") => &[AnswerMarginY],

            (Category::Item, "margin-bottom" | "spacing") => &[ItemSpacing],
            (Category::Item, "border-color") => &[BorderColor],
            (Category::Item, "border-width") => &[BorderWidth],
            (Category::Item, "border-style") => &[BorderStyle],
            (Category::Item, "border") => &[BorderVisible],

            _ => &[],
        }
    }
}

const CANONICAL: [(&str, Category); 6] = [
    ("faq-container", Category::Container),
    ("faq-heading", Category::Heading),
    ("faq-description", Category::Description),
    ("faq-question", Category::Question),
    ("faq-answer", Category::Answer),
    ("faq-item", Category::Item),
];

const LOOSE: [(&str, Category); 5] = [
    ("heading", Category::Heading),
    ("description", Category::Description),
    ("question", Category::Question),
    ("answer", Category::Answer),
    ("item", Category::Item),
];

/// Classify a selector by its subject, the last compound selector.
fn classify_selector(selector: &str) -> Option<Category> {
    let subject = selector_subject(selector).to_ascii_lowercase();
    CANONICAL
        .iter()
        .chain(LOOSE.iter())
        .find(|(needle, _)| subject.contains(needle))
        .map(|&(_, category)| category)
}

/// Last compound selector of a (possibly comma-free) complex selector.
/// Attribute qualifiers are dropped so their values cannot affect
/// classification.
pub(crate) fn selector_subject(selector: &str) -> String {
    let mut without_attrs = String::with_capacity(selector.len());
    let mut depth = 0usize;
    for ch in selector.chars() {
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            _ if depth == 0 => without_attrs.push(ch),
            _ => {}
        }
    }
    without_attrs
        .split(|c: char| c.is_whitespace() || matches!(c, '>' | '+' | '~'))
        .filter(|part| !part.is_empty())
        .last()
        .unwrap_or("")
        .to_string()
}
