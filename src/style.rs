//! Style model – the complete set of user-adjustable visual properties for
//! one FAQ render, plus the discrete size / weight / icon / animation /
//! border tokens the editor offers.
//!
//! Every field has a serde default and every token deserialises leniently
//! (unknown strings resolve to the default token), so a partial or stale
//! style config always produces a structurally complete [`StyleSpec`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::fonts::DEFAULT_FONT;

/// Complete style configuration for one render.
///
/// A typography block given only in part keeps that block's own defaults
/// for the fields it leaves out, so `{"heading":{"color":"#000"}}` is still
/// a 2XL bold heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StyleSpecInput")]
pub struct StyleSpec {
    pub heading: TypographyStyle,
    pub description: TypographyStyle,
    pub question: TypographyStyle,
    pub answer: TypographyStyle,
    pub background_color: String,
    /// When present, used for the container background instead of
    /// `background_color`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_gradient: Option<String>,
    pub accordion: AccordionStyle,
    pub spacing: Spacing,
}

impl Default for StyleSpec {
    fn default() -> Self {
        Self {
            heading: TypographyStyle::new(FontSize::XXL, FontWeight::Bold, "#1a1a1a"),
            description: TypographyStyle::new(FontSize::MD, FontWeight::Normal, "#666666"),
            question: TypographyStyle::new(FontSize::LG, FontWeight::Semibold, "#1a1a1a"),
            answer: TypographyStyle::new(FontSize::MD, FontWeight::Normal, "#4a4a4a"),
            background_color: "#ffffff".to_string(),
            background_gradient: None,
            accordion: AccordionStyle::default(),
            spacing: Spacing::default(),
        }
    }
}

impl StyleSpec {
    /// Background value for the container: the gradient when one is set,
    /// otherwise the flat colour.
    pub fn background(&self) -> &str {
        match &self.background_gradient {
            Some(g) if !g.trim().is_empty() => g,
            _ => &self.background_color,
        }
    }

    /// Font family names of the four text blocks, in render order.
    pub fn font_families(&self) -> [&str; 4] {
        [
            &self.heading.font_family,
            &self.description.font_family,
            &self.question.font_family,
            &self.answer.font_family,
        ]
    }
}

// ---------------------------------------------------------------------------
// Lenient input
// ---------------------------------------------------------------------------

/// Wire shape of [`StyleSpec`] before per-block defaults are applied.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct StyleSpecInput {
    heading: Option<TypographyInput>,
    description: Option<TypographyInput>,
    question: Option<TypographyInput>,
    answer: Option<TypographyInput>,
    background_color: Option<String>,
    background_gradient: Option<String>,
    accordion: Option<AccordionStyle>,
    spacing: Option<Spacing>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct TypographyInput {
    font_family: Option<String>,
    font_size: Option<FontSize>,
    font_weight: Option<FontWeight>,
    color: Option<String>,
}

impl TypographyInput {
    fn over(input: Option<Self>, base: TypographyStyle) -> TypographyStyle {
        let Some(input) = input else {
            return base;
        };
        TypographyStyle {
            font_family: input.font_family.unwrap_or(base.font_family),
            font_size: input.font_size.unwrap_or(base.font_size),
            font_weight: input.font_weight.unwrap_or(base.font_weight),
            color: input.color.unwrap_or(base.color),
        }
    }
}

impl From<StyleSpecInput> for StyleSpec {
    fn from(input: StyleSpecInput) -> Self {
        let base = StyleSpec::default();
        StyleSpec {
            heading: TypographyInput::over(input.heading, base.heading),
            description: TypographyInput::over(input.description, base.description),
            question: TypographyInput::over(input.question, base.question),
            answer: TypographyInput::over(input.answer, base.answer),
            background_color: input.background_color.unwrap_or(base.background_color),
            background_gradient: input.background_gradient,
            accordion: input.accordion.unwrap_or(base.accordion),
            spacing: input.spacing.unwrap_or(base.spacing),
        }
    }
}

/// Typography for one of the heading / description / question / answer blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypographyStyle {
    /// Catalog name, resolved through [`crate::fonts::resolve_font_family`].
    pub font_family: String,
    pub font_size: FontSize,
    pub font_weight: FontWeight,
    pub color: String,
}

impl TypographyStyle {
    pub fn new(font_size: FontSize, font_weight: FontWeight, color: &str) -> Self {
        Self {
            font_family: DEFAULT_FONT.to_string(),
            font_size,
            font_weight,
            color: color.to_string(),
        }
    }
}

impl Default for TypographyStyle {
    fn default() -> Self {
        Self::new(FontSize::MD, FontWeight::Normal, "#1a1a1a")
    }
}

/// Accordion chrome: icon, animation, item borders and question spacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccordionStyle {
    pub icon_style: IconStyle,
    pub animation_type: AnimationType,
    /// Milliseconds.
    pub animation_duration: u32,
    pub border_color: String,
    /// Pixels.
    pub border_width: u32,
    pub border_style: BorderStyle,
    pub border_visible: bool,
    pub border_sides: BorderSides,
    pub padding_x: u32,
    pub padding_y: u32,
    pub margin_x: u32,
    pub margin_y: u32,
}

impl Default for AccordionStyle {
    fn default() -> Self {
        Self {
            icon_style: IconStyle::Chevron,
            animation_type: AnimationType::Fade,
            animation_duration: 300,
            border_color: "#e5e5e5".to_string(),
            border_width: 1,
            border_style: BorderStyle::Solid,
            border_visible: true,
            border_sides: BorderSides::default(),
            padding_x: 16,
            padding_y: 16,
            margin_x: 0,
            margin_y: 8,
        }
    }
}

/// Per-side border visibility. Width, style and colour are shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderSides {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl BorderSides {
    pub const ALL: Self = Self {
        top: true,
        right: true,
        bottom: true,
        left: true,
    };

    pub const NONE: Self = Self {
        top: false,
        right: false,
        bottom: false,
        left: false,
    };

    /// `(css side name, visible)` in CSS order.
    pub fn iter(&self) -> [(&'static str, bool); 4] {
        [
            ("top", self.top),
            ("right", self.right),
            ("bottom", self.bottom),
            ("left", self.left),
        ]
    }

    pub fn any(&self) -> bool {
        self.top || self.right || self.bottom || self.left
    }
}

impl Default for BorderSides {
    fn default() -> Self {
        Self::ALL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Spacing {
    /// Container padding in px.
    pub section_padding: u32,
    /// Gap below each item in px.
    pub item_spacing: u32,
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            section_padding: 24,
            item_spacing: 16,
        }
    }
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// Discrete font size tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Value", into = "String")]
pub enum FontSize {
    XS,
    SM,
    MD,
    LG,
    XL,
    XXL,
    XXXL,
    XXXXL,
}

impl FontSize {
    pub const ALL: [FontSize; 8] = [
        FontSize::XS,
        FontSize::SM,
        FontSize::MD,
        FontSize::LG,
        FontSize::XL,
        FontSize::XXL,
        FontSize::XXXL,
        FontSize::XXXXL,
    ];

    pub fn token(self) -> &'static str {
        match self {
            FontSize::XS => "XS",
            FontSize::SM => "SM",
            FontSize::MD => "MD",
            FontSize::LG => "LG",
            FontSize::XL => "XL",
            FontSize::XXL => "2XL",
            FontSize::XXXL => "3XL",
            FontSize::XXXXL => "4XL",
        }
    }

    /// CSS value, e.g. `1.125rem`.
    pub fn rem(self) -> &'static str {
        match self {
            FontSize::XS => "0.75rem",
            FontSize::SM => "0.875rem",
            FontSize::MD => "1rem",
            FontSize::LG => "1.125rem",
            FontSize::XL => "1.25rem",
            FontSize::XXL => "1.5rem",
            FontSize::XXXL => "1.875rem",
            FontSize::XXXXL => "2.25rem",
        }
    }

    pub fn rem_value(self) -> f32 {
        match self {
            FontSize::XS => 0.75,
            FontSize::SM => 0.875,
            FontSize::MD => 1.0,
            FontSize::LG => 1.125,
            FontSize::XL => 1.25,
            FontSize::XXL => 1.5,
            FontSize::XXXL => 1.875,
            FontSize::XXXXL => 2.25,
        }
    }

    /// Tier closest to `rem` by absolute distance. Ties go to the smaller tier.
    pub fn nearest(rem: f32) -> FontSize {
        let mut best = FontSize::MD;
        let mut best_distance = f32::INFINITY;
        for size in FontSize::ALL {
            let distance = (size.rem_value() - rem).abs();
            if distance < best_distance {
                best = size;
                best_distance = distance;
            }
        }
        best
    }

    pub fn from_token(token: &str) -> Option<FontSize> {
        FontSize::ALL
            .into_iter()
            .find(|s| s.token().eq_ignore_ascii_case(token.trim()))
    }
}

impl Default for FontSize {
    fn default() -> Self {
        FontSize::MD
    }
}

impl From<Value> for FontSize {
    fn from(value: Value) -> Self {
        value.as_str().and_then(FontSize::from_token).unwrap_or_default()
    }
}

impl From<FontSize> for String {
    fn from(s: FontSize) -> Self {
        s.token().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Value", into = "String")]
pub enum FontWeight {
    Light,
    Normal,
    Medium,
    Semibold,
    Bold,
}

impl FontWeight {
    pub const ALL: [FontWeight; 5] = [
        FontWeight::Light,
        FontWeight::Normal,
        FontWeight::Medium,
        FontWeight::Semibold,
        FontWeight::Bold,
    ];

    pub fn token(self) -> &'static str {
        match self {
            FontWeight::Light => "Light",
            FontWeight::Normal => "Normal",
            FontWeight::Medium => "Medium",
            FontWeight::Semibold => "Semibold",
            FontWeight::Bold => "Bold",
        }
    }

    pub fn css_value(self) -> &'static str {
        match self {
            FontWeight::Light => "300",
            FontWeight::Normal => "400",
            FontWeight::Medium => "500",
            FontWeight::Semibold => "600",
            FontWeight::Bold => "700",
        }
    }

    /// Parse a CSS `font-weight` value: numeric weights snap to the nearest
    /// tier, and the `normal` / `bold` keywords map directly.
    pub fn from_css(value: &str) -> Option<FontWeight> {
        let value = value.trim();
        match value.to_ascii_lowercase().as_str() {
            "normal" => return Some(FontWeight::Normal),
            "bold" => return Some(FontWeight::Bold),
            "lighter" => return Some(FontWeight::Light),
            "bolder" => return Some(FontWeight::Bold),
            _ => {}
        }
        let numeric: u32 = value.parse().ok()?;
        let weight = match numeric {
            0..=349 => FontWeight::Light,
            350..=449 => FontWeight::Normal,
            450..=549 => FontWeight::Medium,
            550..=649 => FontWeight::Semibold,
            _ => FontWeight::Bold,
        };
        Some(weight)
    }

    pub fn from_token(token: &str) -> Option<FontWeight> {
        FontWeight::ALL
            .into_iter()
            .find(|w| w.token().eq_ignore_ascii_case(token.trim()))
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        FontWeight::Normal
    }
}

impl From<Value> for FontWeight {
    fn from(value: Value) -> Self {
        value.as_str().and_then(FontWeight::from_token).unwrap_or_default()
    }
}

impl From<FontWeight> for String {
    fn from(w: FontWeight) -> Self {
        w.token().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Value", into = "String")]
pub enum IconStyle {
    Chevron,
    Plus,
}

impl IconStyle {
    pub fn token(self) -> &'static str {
        match self {
            IconStyle::Chevron => "Chevron",
            IconStyle::Plus => "Plus",
        }
    }
}

impl Default for IconStyle {
    fn default() -> Self {
        IconStyle::Chevron
    }
}

impl From<Value> for IconStyle {
    fn from(value: Value) -> Self {
        match value.as_str() {
            Some(s) if s.trim().eq_ignore_ascii_case("plus") => IconStyle::Plus,
            _ => IconStyle::Chevron,
        }
    }
}

impl From<IconStyle> for String {
    fn from(i: IconStyle) -> Self {
        i.token().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Value", into = "String")]
pub enum AnimationType {
    Fade,
    Slide,
    None,
}

impl AnimationType {
    pub fn token(self) -> &'static str {
        match self {
            AnimationType::Fade => "Fade",
            AnimationType::Slide => "Slide",
            AnimationType::None => "None",
        }
    }

    pub fn from_token(token: &str) -> Option<AnimationType> {
        match token.trim().to_ascii_lowercase().as_str() {
            "fade" => Some(AnimationType::Fade),
            "slide" => Some(AnimationType::Slide),
            "none" => Some(AnimationType::None),
            _ => None,
        }
    }
}

impl Default for AnimationType {
    fn default() -> Self {
        AnimationType::Fade
    }
}

impl From<Value> for AnimationType {
    fn from(value: Value) -> Self {
        value.as_str().and_then(AnimationType::from_token).unwrap_or_default()
    }
}

impl From<AnimationType> for String {
    fn from(a: AnimationType) -> Self {
        a.token().to_string()
    }
}

/// CSS `border-style` keywords offered by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Value", into = "String")]
pub enum BorderStyle {
    Solid,
    Dashed,
    Dotted,
    Double,
    Groove,
    Ridge,
    Inset,
    Outset,
}

impl BorderStyle {
    pub const ALL: [BorderStyle; 8] = [
        BorderStyle::Solid,
        BorderStyle::Dashed,
        BorderStyle::Dotted,
        BorderStyle::Double,
        BorderStyle::Groove,
        BorderStyle::Ridge,
        BorderStyle::Inset,
        BorderStyle::Outset,
    ];

    pub fn css_value(self) -> &'static str {
        match self {
            BorderStyle::Solid => "solid",
            BorderStyle::Dashed => "dashed",
            BorderStyle::Dotted => "dotted",
            BorderStyle::Double => "double",
            BorderStyle::Groove => "groove",
            BorderStyle::Ridge => "ridge",
            BorderStyle::Inset => "inset",
            BorderStyle::Outset => "outset",
        }
    }

    pub fn from_css(value: &str) -> Option<BorderStyle> {
        BorderStyle::ALL
            .into_iter()
            .find(|b| b.css_value().eq_ignore_ascii_case(value.trim()))
    }
}

impl Default for BorderStyle {
    fn default() -> Self {
        BorderStyle::Solid
    }
}

impl From<Value> for BorderStyle {
    fn from(value: Value) -> Self {
        value.as_str().and_then(BorderStyle::from_css).unwrap_or_default()
    }
}

impl From<BorderStyle> for String {
    fn from(b: BorderStyle) -> Self {
        b.css_value().to_string()
    }
}
