//! HTML parser – converts rendered FAQ markup into a simple DOM tree.
//!
//! Only what the accordion model needs to read back from rendered output:
//! - Element names, attributes and nesting
//! - Void elements (`<br>`, `<meta>`, `<path/>` …) and self-closing syntax
//! - Raw text inside `<script>` and `<style>`
//!
//! Malformed input never fails; unmatched closing tags are skipped.

use std::collections::HashMap;

// ---------------------------------------------------------------------------
// DOM types
// ---------------------------------------------------------------------------

/// A node in our DOM tree.
#[derive(Debug, Clone, PartialEq)]
pub enum DomNode {
    Element(ElementNode),
    Text(String),
}

/// An element node carrying name, attributes, and children.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    /// Lowercased tag name.
    pub name: String,
    pub attributes: HashMap<String, String>,
    pub children: Vec<DomNode>,
}

impl ElementNode {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            attributes: HashMap::new(),
            children: Vec::new(),
        }
    }

    pub fn classes(&self) -> Vec<&str> {
        self.attributes
            .get("class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().contains(&class)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Concatenated text of all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Descendant elements matching `pred`, in document order.
    pub fn find_all<'a>(&'a self, pred: &dyn Fn(&ElementNode) -> bool) -> Vec<&'a ElementNode> {
        find_all(&self.children, pred)
    }

    /// First descendant element matching `pred`.
    pub fn find<'a>(&'a self, pred: &dyn Fn(&ElementNode) -> bool) -> Option<&'a ElementNode> {
        self.find_all(pred).into_iter().next()
    }
}

fn collect_text(nodes: &[DomNode], out: &mut String) {
    for node in nodes {
        match node {
            DomNode::Text(t) => out.push_str(t),
            DomNode::Element(e) => collect_text(&e.children, out),
        }
    }
}

/// All elements in `nodes` (recursively) matching `pred`, in document order.
pub fn find_all<'a>(nodes: &'a [DomNode], pred: &dyn Fn(&ElementNode) -> bool) -> Vec<&'a ElementNode> {
    let mut found = Vec::new();
    walk(nodes, pred, &mut found);
    found
}

fn walk<'a>(nodes: &'a [DomNode], pred: &dyn Fn(&ElementNode) -> bool, found: &mut Vec<&'a ElementNode>) {
    for node in nodes {
        if let DomNode::Element(e) = node {
            if pred(e) {
                found.push(e);
            }
            walk(&e.children, pred, found);
        }
    }
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

// ---------------------------------------------------------------------------
// Parser – simple recursive descent over HTML
// ---------------------------------------------------------------------------

/// Parse an HTML string into a list of DOM nodes.
pub fn parse_html(html: &str) -> Vec<DomNode> {
    let mut parser = Parser::new(html);
    let mut nodes = Vec::new();
    loop {
        nodes.extend(parser.parse_nodes());
        if parser.eof() {
            break;
        }
        // A closing tag with nothing open.
        parser.skip_closing_tag();
    }
    nodes
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn parse_nodes(&mut self) -> Vec<DomNode> {
        let mut nodes = Vec::new();
        loop {
            self.skip_whitespace_preserve();
            if self.eof() || self.starts_with("</") {
                break;
            }
            if let Some(node) = self.parse_node() {
                nodes.push(node);
            }
        }
        nodes
    }

    fn parse_node(&mut self) -> Option<DomNode> {
        if self.starts_with("<!--") {
            self.skip_comment();
            return None;
        }
        if self.starts_with("<!") || self.starts_with("<?") {
            // Doctype / processing instruction
            self.skip_past('>');
            return None;
        }
        let next_is_name = self.input[self.pos..]
            .chars()
            .nth(1)
            .is_some_and(|c| c.is_ascii_alphabetic());
        if self.starts_with("<") && next_is_name {
            Some(self.parse_element())
        } else {
            Some(self.parse_text())
        }
    }

    fn parse_text(&mut self) -> DomNode {
        let start = self.pos;
        // A lone '<' that does not open a tag is text.
        if self.starts_with("<") {
            self.advance(1);
        }
        while !self.eof() && !self.starts_with("<") {
            self.advance(1);
        }
        DomNode::Text(decode_entities(&self.input[start..self.pos]))
    }

    fn parse_element(&mut self) -> DomNode {
        self.advance(1); // '<'
        let name = self.parse_name();
        let mut elem = ElementNode::new(&name);

        loop {
            self.skip_whitespace();
            if self.eof() || self.starts_with(">") || self.starts_with("/>") {
                break;
            }
            match self.parse_attribute() {
                Some((key, value)) => {
                    elem.attributes.entry(key).or_insert(value);
                }
                // Stray character such as a lone '/' or quote.
                None => self.advance(1),
            }
        }

        if self.starts_with("/>") {
            self.advance(2);
            return DomNode::Element(elem);
        }
        if self.starts_with(">") {
            self.advance(1);
        }
        if VOID_ELEMENTS.contains(&elem.name.as_str()) {
            return DomNode::Element(elem);
        }

        if RAW_TEXT_ELEMENTS.contains(&elem.name.as_str()) {
            let close = format!("</{}", elem.name);
            let rest = &self.input[self.pos..];
            let end = find_ignore_ascii_case(rest, &close).unwrap_or(rest.len());
            if end > 0 {
                elem.children.push(DomNode::Text(rest[..end].to_string()));
            }
            self.pos += end;
        } else {
            elem.children = self.parse_nodes();
        }

        if self.starts_with("</") {
            self.skip_closing_tag();
        }

        DomNode::Element(elem)
    }

    fn skip_closing_tag(&mut self) {
        self.advance(2); // '</'
        self.skip_past('>');
    }

    fn parse_name(&mut self) -> String {
        let start = self.pos;
        while !self.eof() {
            let c = self.current_char();
            if c.is_alphanumeric() || matches!(c, '-' | '_' | ':' | '.') {
                self.advance(1);
            } else {
                break;
            }
        }
        self.input[start..self.pos].to_ascii_lowercase()
    }

    fn parse_attribute(&mut self) -> Option<(String, String)> {
        let key = self.parse_name();
        if key.is_empty() {
            return None;
        }
        self.skip_whitespace();
        if !self.starts_with("=") {
            return Some((key, String::new()));
        }
        self.advance(1); // '='
        self.skip_whitespace();
        Some((key, self.parse_attr_value()))
    }

    fn parse_attr_value(&mut self) -> String {
        for quote in ['"', '\''] {
            if self.current_char_is(quote) {
                self.advance(1);
                let start = self.pos;
                while !self.eof() && !self.current_char_is(quote) {
                    self.advance(1);
                }
                let val = decode_entities(&self.input[start..self.pos]);
                if !self.eof() {
                    self.advance(1);
                }
                return val;
            }
        }
        let start = self.pos;
        while !self.eof() {
            let c = self.current_char();
            if c.is_whitespace() || c == '>' {
                break;
            }
            self.advance(1);
        }
        decode_entities(&self.input[start..self.pos])
    }

    fn skip_whitespace(&mut self) {
        while !self.eof() && self.current_char().is_whitespace() {
            self.advance(1);
        }
    }

    fn skip_whitespace_preserve(&mut self) {
        // Skip runs of pure whitespace between elements.
        let saved = self.pos;
        self.skip_whitespace();
        if !self.eof() && !self.starts_with("<") {
            self.pos = saved;
        }
    }

    fn skip_comment(&mut self) {
        self.advance(4); // '<!--'
        match self.input[self.pos..].find("-->") {
            Some(i) => self.pos += i + 3,
            None => self.pos = self.input.len(),
        }
    }

    fn skip_past(&mut self, c: char) {
        match self.input[self.pos..].find(c) {
            Some(i) => self.pos += i + c.len_utf8(),
            None => self.pos = self.input.len(),
        }
    }

    fn starts_with(&self, s: &str) -> bool {
        self.input[self.pos..].starts_with(s)
    }

    fn eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn current_char(&self) -> char {
        self.input[self.pos..].chars().next().unwrap_or('\0')
    }

    fn current_char_is(&self, c: char) -> bool {
        !self.eof() && self.current_char() == c
    }

    fn advance(&mut self, n: usize) {
        // Advance by `n` characters (not bytes).
        for _ in 0..n {
            if let Some(c) = self.input[self.pos..].chars().next() {
                self.pos += c.len_utf8();
            }
        }
    }
}

fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    let hay = haystack.as_bytes();
    let needle = needle.as_bytes();
    if needle.len() > hay.len() {
        return None;
    }
    (0..=hay.len() - needle.len()).find(|&i| hay[i..i + needle.len()].eq_ignore_ascii_case(needle))
}

/// Decode named entities the renderer emits plus numeric references.
fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp..];
        let decoded = after.find(';').filter(|&semi| semi <= 10).and_then(|semi| {
            let entity = &after[1..semi];
            decode_entity(entity).map(|c| (c, semi + 1))
        });
        match decoded {
            Some((c, len)) => {
                out.push(c);
                rest = &after[len..];
            }
            None => {
                out.push('&');
                rest = &after[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        _ => {
            let code = if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                entity.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_element(nodes: &[DomNode]) -> &ElementNode {
        match &nodes[0] {
            DomNode::Element(e) => e,
            other => panic!("Expected element, got {other:?}"),
        }
    }

    #[test]
    fn parse_simple_div() {
        let nodes = parse_html(r#"<div class="faq-item open"><p>Hello</p></div>"#);
        assert_eq!(nodes.len(), 1);
        let e = first_element(&nodes);
        assert_eq!(e.name, "div");
        assert_eq!(e.classes(), vec!["faq-item", "open"]);
        assert!(e.has_class("open"));
        assert_eq!(e.children.len(), 1);
    }

    #[test]
    fn boolean_and_unquoted_attributes() {
        let nodes = parse_html("<button data-accordion-button type=button aria-expanded='false'>Q</button>");
        let e = first_element(&nodes);
        assert!(e.has_attr("data-accordion-button"));
        assert_eq!(e.attr("type"), Some("button"));
        assert_eq!(e.attr("aria-expanded"), Some("false"));
        assert_eq!(e.text_content(), "Q");
    }

    #[test]
    fn void_and_self_closing_elements() {
        let nodes = parse_html(
            r#"<div><meta charset="UTF-8"><svg><path d="M4 6"/></svg><br>text</div>"#,
        );
        let e = first_element(&nodes);
        assert_eq!(e.children.len(), 4);
        assert_eq!(e.text_content(), "text");
    }

    #[test]
    fn script_body_is_raw_text() {
        let nodes = parse_html("<script>if (a < b && c) { x('</div>') }</script><p>after</p>");
        assert_eq!(nodes.len(), 2);
        let script = first_element(&nodes);
        assert_eq!(script.text_content(), "if (a < b && c) { x('</div>') }");
    }

    #[test]
    fn entities_decoded() {
        let nodes = parse_html("<p title=\"&quot;x&quot;\">Tom &amp; &#039;Jerry&#x27; &lt;3 & co</p>");
        let e = first_element(&nodes);
        assert_eq!(e.attr("title"), Some("\"x\""));
        assert_eq!(e.text_content(), "Tom & 'Jerry' <3 & co");
    }

    #[test]
    fn stray_closing_tags_are_skipped() {
        let nodes = parse_html("</span><p>a</p></div><p>b</p>");
        let paragraphs = find_all(&nodes, &|e| e.name == "p");
        assert_eq!(paragraphs.len(), 2);
    }

    #[test]
    fn malformed_attributes_terminate() {
        let nodes = parse_html("<div \"oops\" / class=x>y</div>");
        let e = first_element(&nodes);
        assert_eq!(e.text_content(), "y");
    }

    #[test]
    fn find_descendants_in_order() {
        let nodes = parse_html(
            "<section class=\"faq-container\"><div class=\"faq-item\" data-item-id=\"a\"></div><div><div class=\"faq-item\" data-item-id=\"b\"></div></div></section>",
        );
        let container = first_element(&nodes);
        let items = container.find_all(&|e| e.has_class("faq-item"));
        let ids: Vec<_> = items.iter().filter_map(|e| e.attr("data-item-id")).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(container.find(&|e| e.name == "span").is_none());
    }
}
