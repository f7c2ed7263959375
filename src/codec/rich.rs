//! Rich (HTML) persistence
//!
//! Encoding writes a standalone HTML page whose body holds one styled
//! `<span>` per run, with every attribute spelled out so decoding does not
//! depend on inherited styles. The body uses `white-space: pre-wrap`, so run
//! text is stored verbatim apart from escaping.
//!
//! Decoding parses with tree-sitter-html and accepts markup written by other
//! editors as well: `b/strong`, `i/em`, `u/ins`, `s/strike/del`, inline
//! `style` declarations, `<br>` and block elements.

use std::fmt::Write as _;

use tree_sitter::{Node, Parser};

use crate::error::{Result, ScribbleError};
use crate::model::{FormatRunList, FormattingAttributes};

const DOCUMENT_HEAD: &str = concat!(
    "<!DOCTYPE html>\n<html>\n<head>\n",
    "<meta charset=\"utf-8\">\n",
    "<meta name=\"generator\" content=\"scribble\">\n",
    "</head>\n<body style=\"white-space: pre-wrap;\">"
);
const DOCUMENT_TAIL: &str = "</body>\n</html>\n";

/// Elements whose content never becomes document text
const SKIPPED_TAGS: &[&str] = &[
    "head", "title", "style", "script", "template", "meta", "link", "noscript",
];

/// Elements that start on a new line
const BLOCK_TAGS: &[&str] = &[
    "p",
    "div",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "li",
    "ul",
    "ol",
    "blockquote",
    "pre",
    "table",
    "tr",
    "section",
    "article",
    "header",
    "footer",
    "hr",
];

/// Containers that neither break lines nor hold inline text themselves
const ROOT_TAGS: &[&str] = &["html", "body"];

// ============================================================================
// Encoding
// ============================================================================

/// Serialize runs as an HTML page that `decode_rich` reads back exactly
pub fn encode_rich(runs: &FormatRunList) -> Vec<u8> {
    let text_len: usize = runs.runs().iter().map(|r| r.text.len()).sum();
    let mut out = String::with_capacity(DOCUMENT_HEAD.len() + text_len + runs.run_count() * 128);
    out.push_str(DOCUMENT_HEAD);

    // An empty document still records the attributes its caret carries
    for run in runs.runs() {
        let _ = write!(out, "<span style=\"{}\">", style_for(&run.attributes));
        escape_text(&run.text, &mut out);
        out.push_str("</span>");
    }

    out.push_str(DOCUMENT_TAIL);
    out.into_bytes()
}

fn style_for(attrs: &FormattingAttributes) -> String {
    let decoration = match (attrs.underline, attrs.strikethrough) {
        (true, true) => "underline line-through",
        (true, false) => "underline",
        (false, true) => "line-through",
        (false, false) => "none",
    };
    format!(
        "font-size:{}pt; font-weight:{}; font-style:{}; text-decoration:{};",
        attrs.point_size,
        if attrs.bold { 700 } else { 400 },
        if attrs.italic { "italic" } else { "normal" },
        decoration
    )
}

/// Escape markup characters. Control characters other than tab and newline
/// become numeric references; a raw NUL makes the parser reject the page.
fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\t' | '\n' => out.push(ch),
            c if c.is_control() => {
                let _ = write!(out, "&#{};", c as u32);
            }
            _ => out.push(ch),
        }
    }
}

// ============================================================================
// Decoding
// ============================================================================

/// Parse HTML into canonical runs.
///
/// Fails with `MalformedDocument` on invalid UTF-8, syntax errors, or end
/// tags that close nothing. Adjacent spans with equal formatting are merged.
pub fn decode_rich(bytes: &[u8]) -> Result<FormatRunList> {
    let source = std::str::from_utf8(bytes)
        .map_err(|e| ScribbleError::malformed(format!("invalid UTF-8: {}", e)))?;
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);

    let mut parser = Parser::new();
    let language: tree_sitter::Language = tree_sitter_html::LANGUAGE.into();
    parser
        .set_language(&language)
        .map_err(|e| ScribbleError::malformed(format!("HTML grammar unavailable: {}", e)))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ScribbleError::malformed("parser produced no tree"))?;
    let root = tree.root_node();

    if root.has_error() {
        let at = first_error(root).unwrap_or(root).start_position();
        return Err(ScribbleError::malformed(format!(
            "syntax error at line {}, column {}",
            at.row + 1,
            at.column + 1
        )));
    }

    let mut decoder = Decoder::new(source);
    decoder.visit_content(root, 0..source.len(), FormattingAttributes::default(), false)?;
    Ok(decoder.finish())
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error())
        .find_map(first_error)
}

struct Decoder<'a> {
    source: &'a str,
    runs: FormatRunList,
    last_char: Option<char>,
    /// A block element opened or closed since the last emitted text
    needs_break: bool,
    /// Attributes of the first inline element, kept for empty documents
    first_inline: Option<FormattingAttributes>,
}

impl<'a> Decoder<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            runs: FormatRunList::from_runs(Vec::new()),
            last_char: None,
            needs_break: false,
            first_inline: None,
        }
    }

    fn finish(self) -> FormatRunList {
        if self.runs.is_empty() {
            return FormatRunList::empty_with(self.first_inline.unwrap_or_default());
        }
        self.runs
    }

    fn text_of(&self, node: Node<'_>) -> &'a str {
        &self.source[node.start_byte()..node.end_byte()]
    }

    fn emit(&mut self, text: &str, attrs: FormattingAttributes) {
        if text.is_empty() {
            return;
        }
        if self.needs_break && self.last_char.is_some_and(|c| c != '\n') {
            self.runs.push("\n", attrs);
        }
        self.needs_break = false;
        self.runs.push(text, attrs);
        self.last_char = text.chars().last();
    }

    /// Visit the children of `parent` lying in the byte range `content`.
    ///
    /// Whitespace between children is not part of the syntax tree, so it is
    /// recovered from the gaps. Inside inline elements every gap is text;
    /// inside block containers only gaps between two pieces of inline
    /// content are, which drops markup indentation.
    fn visit_content(
        &mut self,
        parent: Node<'_>,
        content: std::ops::Range<usize>,
        attrs: FormattingAttributes,
        inline: bool,
    ) -> Result<()> {
        let mut cursor = parent.walk();
        let children: Vec<Node<'_>> = parent
            .children(&mut cursor)
            .filter(|c| {
                !matches!(
                    c.kind(),
                    "start_tag" | "end_tag" | "implicit_end_tag" | "self_closing_tag"
                )
            })
            .collect();

        let source = self.source;
        let mut pos = content.start;
        let mut prev_inline = false;
        for child in children {
            let child_inline = self.is_inline(child);
            if child.start_byte() > pos {
                let gap = &source[pos..child.start_byte()];
                if inline || (prev_inline && child_inline) {
                    self.emit(gap, attrs);
                }
            }
            self.visit_node(child, attrs)?;
            prev_inline = child_inline;
            pos = pos.max(child.end_byte());
        }

        if inline && content.end > pos {
            let tail = &source[pos..content.end];
            self.emit(tail, attrs);
        }
        Ok(())
    }

    fn visit_node(&mut self, node: Node<'_>, attrs: FormattingAttributes) -> Result<()> {
        match node.kind() {
            "text" | "entity" => {
                let text = decode_entities(self.text_of(node));
                self.emit(&text, attrs);
                Ok(())
            }
            "element" => self.visit_element(node, attrs),
            "erroneous_end_tag" => {
                let at = node.start_position();
                Err(ScribbleError::malformed(format!(
                    "unexpected end tag `{}` at line {}, column {}",
                    self.text_of(node),
                    at.row + 1,
                    at.column + 1
                )))
            }
            // doctype, comments, <script> and <style> carry no document text
            _ => Ok(()),
        }
    }

    fn visit_element(&mut self, node: Node<'_>, attrs: FormattingAttributes) -> Result<()> {
        let Some(open) = node.child(0) else {
            return Ok(());
        };
        let tag = self.tag_name(open);
        let tag = tag.as_str();

        if SKIPPED_TAGS.contains(&tag) {
            return Ok(());
        }
        if tag == "br" {
            self.emit("\n", attrs);
            return Ok(());
        }

        let attrs = element_attributes(tag, self.attribute(open, "style"), attrs);
        let is_block = BLOCK_TAGS.contains(&tag);
        let is_root = ROOT_TAGS.contains(&tag);
        let inline = !is_block && !is_root;

        if inline && self.first_inline.is_none() {
            self.first_inline = Some(attrs);
        }
        if is_block {
            self.needs_break = true;
        }

        if open.kind() == "start_tag" {
            let end = {
                let count = node.child_count();
                match node.child(count.saturating_sub(1)) {
                    Some(last) if matches!(last.kind(), "end_tag" | "implicit_end_tag") => {
                        last.start_byte()
                    }
                    _ => node.end_byte(),
                }
            };
            self.visit_content(node, open.end_byte()..end, attrs, inline)?;
        }

        if is_block {
            self.needs_break = true;
        }
        Ok(())
    }

    fn is_inline(&self, node: Node<'_>) -> bool {
        match node.kind() {
            "text" | "entity" => true,
            "element" => node.child(0).is_some_and(|open| {
                let tag = self.tag_name(open);
                !BLOCK_TAGS.contains(&tag.as_str())
                    && !ROOT_TAGS.contains(&tag.as_str())
                    && !SKIPPED_TAGS.contains(&tag.as_str())
            }),
            _ => false,
        }
    }

    fn tag_name(&self, open_tag: Node<'_>) -> String {
        let mut cursor = open_tag.walk();
        let name = open_tag
            .children(&mut cursor)
            .find(|c| c.kind() == "tag_name")
            .map(|c| self.text_of(c))
            .unwrap_or_default();
        name.to_ascii_lowercase()
    }

    fn attribute(&self, open_tag: Node<'_>, name: &str) -> Option<&'a str> {
        let mut cursor = open_tag.walk();
        let attributes: Vec<Node<'_>> = open_tag
            .children(&mut cursor)
            .filter(|c| c.kind() == "attribute")
            .collect();

        for attribute in attributes {
            let mut inner = attribute.walk();
            let parts: Vec<Node<'_>> = attribute.children(&mut inner).collect();
            let matches_name = parts.iter().any(|p| {
                p.kind() == "attribute_name" && self.text_of(*p).eq_ignore_ascii_case(name)
            });
            if !matches_name {
                continue;
            }
            for part in parts {
                match part.kind() {
                    "attribute_value" => return Some(self.text_of(part)),
                    "quoted_attribute_value" => {
                        let mut quoted = part.walk();
                        let value = part
                            .children(&mut quoted)
                            .find(|c| c.kind() == "attribute_value")
                            .map(|c| self.text_of(c))
                            .unwrap_or("");
                        return Some(value);
                    }
                    _ => {}
                }
            }
            return Some("");
        }
        None
    }
}

/// Attributes inside an element: presentational tags first, then any
/// inline `style` declarations
fn element_attributes(
    tag: &str,
    style: Option<&str>,
    inherited: FormattingAttributes,
) -> FormattingAttributes {
    let mut attrs = inherited;
    match tag {
        "b" | "strong" => attrs.bold = true,
        "i" | "em" => attrs.italic = true,
        "u" | "ins" => attrs.underline = true,
        "s" | "strike" | "del" => attrs.strikethrough = true,
        _ => {}
    }

    let Some(style) = style else {
        return attrs;
    };

    for declaration in style.split(';') {
        let Some((property, value)) = declaration.split_once(':') else {
            continue;
        };
        let property = property.trim().to_ascii_lowercase();
        let value = value.trim().to_ascii_lowercase();

        match property.as_str() {
            "font-weight" => match value.as_str() {
                "bold" | "bolder" => attrs.bold = true,
                "normal" | "lighter" => attrs.bold = false,
                numeric => {
                    if let Ok(weight) = numeric.parse::<u32>() {
                        attrs.bold = weight >= 600;
                    }
                }
            },
            "font-style" => match value.as_str() {
                "italic" | "oblique" => attrs.italic = true,
                "normal" => attrs.italic = false,
                _ => {}
            },
            "text-decoration" | "text-decoration-line" => {
                let mut words = value.split_whitespace();
                if words.clone().any(|w| w == "none") {
                    attrs.underline = false;
                    attrs.strikethrough = false;
                } else {
                    attrs.underline = words.clone().any(|w| w == "underline");
                    attrs.strikethrough = words.any(|w| w == "line-through");
                }
            }
            "font-size" => {
                if let Some(size) = parse_point_size(&value) {
                    attrs.point_size = size;
                }
            }
            _ => {}
        }
    }
    attrs
}

/// Parse a CSS font size (`14pt`, `16px`, `12`) into whole points
fn parse_point_size(value: &str) -> Option<u32> {
    let (number, px) = if let Some(n) = value.strip_suffix("pt") {
        (n, false)
    } else if let Some(n) = value.strip_suffix("px") {
        (n, true)
    } else {
        (value, false)
    };
    let number: f32 = number.trim().parse().ok()?;
    let points = if px { number * 0.75 } else { number };
    let points = points.round();
    if points >= 1.0 && points <= u32::MAX as f32 {
        Some(points as u32)
    } else {
        None
    }
}

/// Decode HTML character references. Unknown references stay as written.
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp..];
        let end = candidate
            .char_indices()
            .skip(1)
            .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '#'))
            .map(|(i, _)| i)
            .unwrap_or(candidate.len());
        let name = &candidate[1..end];
        let consumed = if candidate[end..].starts_with(';') {
            end + 1
        } else {
            end
        };

        match decode_reference(name) {
            Some(ch) => {
                out.push(ch);
                rest = &candidate[consumed..];
            }
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_reference(name: &str) -> Option<char> {
    if let Some(numeric) = name.strip_prefix('#') {
        let hex = numeric
            .strip_prefix('x')
            .or_else(|| numeric.strip_prefix('X'));
        let code = match hex {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        "copy" => Some('©'),
        "mdash" => Some('—'),
        "ndash" => Some('–'),
        "hellip" => Some('…'),
        _ => None,
    }
}
