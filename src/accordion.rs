//! Accordion behaviour shared by every rendered FAQ.
//!
//! The browser side is a single script, [`RUNTIME_SCRIPT`], exposing an
//! idempotent `window.FaqAccordion.init(root)`. Hosts call it after placing
//! markup in the page; nothing depends on injected `<script>` elements
//! executing.
//!
//! The same state machine is modelled here so that rendered HTML can be read
//! back ([`AccordionState::from_html`]) and driven in tests exactly the way
//! the runtime drives it in a browser.

use serde::{Deserialize, Serialize};

use crate::dom::{parse_html, DomNode, ElementNode};
use crate::sanitize::escape_html;
use crate::style::AnimationType;

/// Browser runtime implementing the accordion contract.
pub const RUNTIME_SCRIPT: &str = include_str!("../assets/accordion-runtime.js");

/// Third-party embed loader. Expects [`RUNTIME_SCRIPT`] to be loaded first.
pub const EMBED_LOADER: &str = include_str!("../assets/faq-embed.js");

/// Runtime followed by the embed loader, served as one file to host pages.
pub fn embed_loader_script() -> String {
    format!("{RUNTIME_SCRIPT}\n{EMBED_LOADER}")
}

/// Markup a host page pastes to mount embed `embed_id`.
pub fn embed_snippet(embed_id: &str, script_src: &str) -> String {
    format!(
        "<div data-faq-embed=\"{}\"></div>\n<script src=\"{}\" async></script>",
        escape_html(embed_id),
        escape_html(script_src)
    )
}

// ---------------------------------------------------------------------------
// Initial visibility
// ---------------------------------------------------------------------------

/// Which answers the server renders open.
///
/// Collapsed is the default: every answer starts closed and hidden. The
/// runtime never overrides the rendered `data-open` state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnswerVisibility {
    #[default]
    Collapsed,
    FirstExpanded,
    /// Every answer open, for pages that need all content visible at first
    /// paint. Single mode still closes the others on the first click.
    Expanded,
}

impl AnswerVisibility {
    pub fn is_open(self, index: usize) -> bool {
        match self {
            AnswerVisibility::Collapsed => false,
            AnswerVisibility::FirstExpanded => index == 0,
            AnswerVisibility::Expanded => true,
        }
    }
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccordionMode {
    /// Opening an item closes every other item in the container.
    Single,
    Multiple,
}

impl AccordionMode {
    fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("multiple") => AccordionMode::Multiple,
            _ => AccordionMode::Single,
        }
    }
}

/// How the answer region is revealed or removed for one transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerEffect {
    /// `hidden` cleared, no animation.
    Show,
    /// `hidden` set, no animation.
    Hide,
    /// `hidden` cleared, then opacity animates to 1.
    FadeIn { duration_ms: u32 },
    /// Opacity goes to 0 and `hidden` is set at the same boundary.
    FadeOut { duration_ms: u32 },
    /// `hidden` cleared, then max-height animates to the content height.
    Expand { duration_ms: u32 },
    /// max-height animates to 0; `hidden` is set once that finishes.
    Collapse { duration_ms: u32 },
}

impl AnswerEffect {
    fn for_transition(animation: AnimationType, duration_ms: u32, open: bool) -> Self {
        match (animation, open) {
            (AnimationType::None, true) => AnswerEffect::Show,
            (AnimationType::None, false) => AnswerEffect::Hide,
            (AnimationType::Fade, true) => AnswerEffect::FadeIn { duration_ms },
            (AnimationType::Fade, false) => AnswerEffect::FadeOut { duration_ms },
            (AnimationType::Slide, true) => AnswerEffect::Expand { duration_ms },
            (AnimationType::Slide, false) => AnswerEffect::Collapse { duration_ms },
        }
    }

    /// Whether the answer carries `hidden` while the animation runs.
    pub fn hidden_during(self) -> bool {
        matches!(self, AnswerEffect::Hide | AnswerEffect::FadeOut { .. })
    }

    /// Whether the answer carries `hidden` once the animation is over.
    pub fn hidden_after(self) -> bool {
        matches!(
            self,
            AnswerEffect::Hide | AnswerEffect::FadeOut { .. } | AnswerEffect::Collapse { .. }
        )
    }

    pub fn duration_ms(self) -> u32 {
        match self {
            AnswerEffect::Show | AnswerEffect::Hide => 0,
            AnswerEffect::FadeIn { duration_ms }
            | AnswerEffect::FadeOut { duration_ms }
            | AnswerEffect::Expand { duration_ms }
            | AnswerEffect::Collapse { duration_ms } => duration_ms,
        }
    }
}

/// One state change: item `index` becomes `open`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub index: usize,
    pub open: bool,
    pub effect: AnswerEffect,
}

/// One item as read from rendered markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccordionItem {
    pub item_id: Option<String>,
    pub button_id: Option<String>,
    pub answer_id: Option<String>,
    pub open: bool,
    aria_expanded: bool,
    hidden: bool,
}

impl AccordionItem {
    /// `data-open`, `aria-expanded` and `hidden` all agree.
    pub fn markup_consistent(&self) -> bool {
        self.aria_expanded == self.open && self.hidden == !self.open
    }
}

/// Accordion state of one FAQ container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccordionState {
    pub template: Option<String>,
    pub mode: AccordionMode,
    pub animation: AnimationType,
    pub duration_ms: u32,
    pub items: Vec<AccordionItem>,
}

impl AccordionState {
    /// Re-derive the state of every `.faq-container` in `html`, reading the
    /// same attributes the browser runtime reads.
    pub fn from_html(html: &str) -> Vec<AccordionState> {
        let nodes = parse_html(html);
        crate::dom::find_all(&nodes, &|e| e.has_class("faq-container"))
            .into_iter()
            .map(Self::from_container)
            .collect()
    }

    fn from_container(container: &ElementNode) -> Self {
        let animation = container
            .attr("data-animation-type")
            .and_then(AnimationType::from_token)
            .unwrap_or(AnimationType::Fade);
        let duration_ms = container
            .attr("data-animation-duration")
            .and_then(|d| d.trim().parse().ok())
            .unwrap_or(300);

        let items = container
            .find_all(&|e| e.has_class("faq-item"))
            .into_iter()
            .filter_map(read_item)
            .collect();

        Self {
            template: container.attr("data-template").map(str::to_string),
            mode: AccordionMode::from_attr(container.attr("data-accordion-mode")),
            animation,
            duration_ms,
            items,
        }
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.items.get(index).is_some_and(|item| item.open)
    }

    pub fn open_items(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.open)
            .map(|(i, _)| i)
            .collect()
    }

    /// Click on the trigger of item `index`. Returns the transitions in the
    /// order the runtime applies them; other items close before the clicked
    /// one opens. Out-of-range indices change nothing.
    pub fn toggle(&mut self, index: usize) -> Vec<Transition> {
        let Some(current) = self.items.get(index).map(|item| item.open) else {
            return Vec::new();
        };
        let next = !current;
        let mut transitions = Vec::new();

        if next && self.mode == AccordionMode::Single {
            for other in 0..self.items.len() {
                if other != index && self.items[other].open {
                    transitions.push(self.set_open(other, false));
                }
            }
        }
        transitions.push(self.set_open(index, next));
        transitions
    }

    fn set_open(&mut self, index: usize, open: bool) -> Transition {
        let effect = AnswerEffect::for_transition(self.animation, self.duration_ms, open);
        let item = &mut self.items[index];
        item.open = open;
        item.aria_expanded = open;
        item.hidden = effect.hidden_after();
        Transition { index, open, effect }
    }
}

/// Items lacking a trigger or an answer region are ignored, as in the
/// runtime.
fn read_item(item: &ElementNode) -> Option<AccordionItem> {
    let button = item.find(&|e| e.has_attr("data-accordion-button"))?;
    let answer = item.find(&|e| e.has_class("faq-answer"))?;
    Some(AccordionItem {
        item_id: item.attr("data-item-id").map(str::to_string),
        button_id: button.attr("id").map(str::to_string),
        answer_id: answer.attr("id").map(str::to_string),
        open: item.attr("data-open") == Some("true"),
        aria_expanded: button.attr("aria-expanded") == Some("true"),
        hidden: answer.has_attr("hidden"),
    })
}

/// Text of the answer regions in `html`, in document order. Lets callers
/// check what a crawler without JavaScript would see.
pub fn visible_answers(html: &str) -> Vec<String> {
    let nodes: Vec<DomNode> = parse_html(html);
    crate::dom::find_all(&nodes, &|e| e.has_class("faq-answer") && !e.has_attr("hidden"))
        .into_iter()
        .map(|e| e.text_content())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markup(animation: &str, open: &[bool]) -> String {
        let mut html = format!(
            "<div class=\"faq-container\" data-template=\"t\" data-animation-type=\"{animation}\" data-animation-duration=\"200\" data-accordion-mode=\"single\">"
        );
        for (i, &o) in open.iter().enumerate() {
            html.push_str(&format!(
                "<div class=\"faq-item\" data-item-id=\"{i}\" data-open=\"{o}\"><button data-accordion-button aria-expanded=\"{o}\" id=\"q{i}\">Q</button><div class=\"faq-answer\" id=\"a{i}\"{}>A{i}</div></div>",
                if o { "" } else { " hidden" }
            ));
        }
        html.push_str("</div>");
        html
    }

    #[test]
    fn reads_container_attributes() {
        let states = AccordionState::from_html(&markup("Slide", &[false, true]));
        assert_eq!(states.len(), 1);
        let s = &states[0];
        assert_eq!(s.template.as_deref(), Some("t"));
        assert_eq!(s.animation, AnimationType::Slide);
        assert_eq!(s.duration_ms, 200);
        assert_eq!(s.mode, AccordionMode::Single);
        assert_eq!(s.open_items(), vec![1]);
        assert!(s.items.iter().all(AccordionItem::markup_consistent));
    }

    #[test]
    fn single_mode_closes_others_first() {
        let mut s = AccordionState::from_html(&markup("Fade", &[true, false, false])).remove(0);
        let transitions = s.toggle(2);
        assert_eq!(transitions.len(), 2);
        assert_eq!((transitions[0].index, transitions[0].open), (0, false));
        assert_eq!((transitions[1].index, transitions[1].open), (2, true));
        assert_eq!(s.open_items(), vec![2]);
    }

    #[test]
    fn closing_touches_only_clicked_item() {
        let mut s = AccordionState::from_html(&markup("None", &[true, false])).remove(0);
        let transitions = s.toggle(0);
        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].effect, AnswerEffect::Hide);
        assert!(s.open_items().is_empty());
    }

    #[test]
    fn slide_collapse_hides_after_animation() {
        let mut s = AccordionState::from_html(&markup("Slide", &[true])).remove(0);
        let t = s.toggle(0).remove(0);
        assert_eq!(t.effect, AnswerEffect::Collapse { duration_ms: 200 });
        assert!(!t.effect.hidden_during());
        assert!(t.effect.hidden_after());
        assert!(s.items[0].markup_consistent());
    }

    #[test]
    fn fade_out_hides_at_boundary() {
        let effect = AnswerEffect::for_transition(AnimationType::Fade, 300, false);
        assert!(effect.hidden_during());
        assert_eq!(effect.duration_ms(), 300);
        let effect = AnswerEffect::for_transition(AnimationType::Fade, 300, true);
        assert!(!effect.hidden_during() && !effect.hidden_after());
    }

    #[test]
    fn unknown_attributes_use_runtime_defaults() {
        let html = "<div class=\"faq-container\" data-animation-type=\"Wobble\"><div class=\"faq-item\"><button data-accordion-button>Q</button><div class=\"faq-answer\" hidden>A</div></div><div class=\"faq-item\"><span>no trigger</span></div></div>";
        let s = AccordionState::from_html(html).remove(0);
        assert_eq!(s.animation, AnimationType::Fade);
        assert_eq!(s.duration_ms, 300);
        assert_eq!(s.items.len(), 1);
        assert!(!s.is_open(0));
        assert!(s.clone().toggle(5).is_empty());
    }

    #[test]
    fn multiple_mode_keeps_others_open() {
        let html = markup("None", &[true, false]).replace("\"single\"", "\"multiple\"");
        let mut s = AccordionState::from_html(&html).remove(0);
        s.toggle(1);
        assert_eq!(s.open_items(), vec![0, 1]);
    }

    #[test]
    fn visibility_policy() {
        assert!(!AnswerVisibility::Collapsed.is_open(0));
        assert!(AnswerVisibility::FirstExpanded.is_open(0));
        assert!(!AnswerVisibility::FirstExpanded.is_open(1));
        assert!(AnswerVisibility::Expanded.is_open(7));
        assert_eq!(AnswerVisibility::default(), AnswerVisibility::Collapsed);
    }

    #[test]
    fn visible_answers_skips_hidden() {
        assert_eq!(visible_answers(&markup("Fade", &[false, true])), vec!["A1"]);
    }

    #[test]
    fn runtime_is_idempotent_and_exposed() {
        assert!(RUNTIME_SCRIPT.contains("window.FaqAccordion = { init: init }"));
        assert!(RUNTIME_SCRIPT.contains("data-accordion-ready"));
        assert!(embed_loader_script().contains("[data-faq-embed]"));
    }

    #[test]
    fn snippet_escapes() {
        assert_eq!(
            embed_snippet("a\"b", "https://cdn.example/faq.js"),
            "<div data-faq-embed=\"a&quot;b\"></div>\n<script src=\"https://cdn.example/faq.js\" async></script>"
        );
    }
}
