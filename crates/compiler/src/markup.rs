//! Parser for the `pagina` section: one node per line, `key:"value"`
//! attributes, and brace nesting.
//! ```text
//! blok id:"app" {
//!   kop tekst:"Hallo {{ naam }}"
//!   invoer id:"naam" placeholder:"Uw naam"
//! }
//! ```

use super::{
    error::{quoted, CompilationError, CompilationErrorKind as ErrorKind, CompileResult},
    util::{decode_escapes, identifier_len},
    Position,
};
use phf::phf_map;
#[cfg(feature = "serde")]
use serde::Serialize;
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy)]
pub struct TagSpec {
    pub html_tag: &'static str,
    pub implied_class: Option<&'static str>,
}

const fn tag(html_tag: &'static str, implied_class: Option<&'static str>) -> TagSpec {
    TagSpec {
        html_tag,
        implied_class,
    }
}

pub const INPUT_KEYWORD: &str = "invoer";

/// Markup keywords and the html element each one produces.
pub static TAGS: phf::Map<&'static str, TagSpec> = phf_map! {
    "blok" => tag("div", None),
    "rij" => tag("div", Some("rij")),
    "kolom" => tag("div", Some("kolom")),
    "kop" => tag("h1", None),
    "tekst" => tag("p", None),
    "knop" => tag("button", None),
    "invoer" => tag("input", None),
};

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AttrName {
    Id,
    Class,
    Placeholder,
    Value,
}

impl AttrName {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttrName::Id => "id",
            AttrName::Class => "class",
            AttrName::Placeholder => "placeholder",
            AttrName::Value => "value",
        }
    }
}

#[derive(PartialEq, Eq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Attribute {
    pub name: AttrName,
    pub value: String,
}

#[derive(PartialEq, Eq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Element {
    pub tag: &'static str,
    pub attributes: SmallVec<[Attribute; 2]>,
    pub children: Vec<ElementNode>,
}

impl Element {
    pub fn attribute(&self, name: AttrName) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }
}

/// Text payload. `{{ name }}` placeholders are kept verbatim and only
/// resolved by the runtime renderer.
#[derive(PartialEq, Eq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TextNode {
    pub value: String,
}

#[derive(PartialEq, Eq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum ElementNode {
    Element(Element),
    Text(TextNode),
}

/// Attribute keys accepted in source. `tekst` is the text payload.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
enum SourceAttr {
    Id,
    Class,
    Placeholder,
    Tekst,
}

impl SourceAttr {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "id" => SourceAttr::Id,
            "class" => SourceAttr::Class,
            "placeholder" => SourceAttr::Placeholder,
            "tekst" => SourceAttr::Tekst,
            _ => return None,
        })
    }
}

struct SourceAttribute {
    kind: SourceAttr,
    value: String,
    location: Position,
}

/// Parses the markup section. `origin` is the file position of the first
/// char of `text`.
pub fn parse_markup(text: &str, origin: Position) -> CompileResult<Vec<ElementNode>> {
    let mut parser = MarkupParser {
        stack: vec![vec![]],
    };
    let mut line_start = origin;
    let mut last_line_start = origin;
    for raw in text.split('\n') {
        last_line_start = line_start;
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        parser.parse_line(line, line_start)?;
        line_start = line_start.advance_over(raw).advance_over("\n");
    }
    parser.finish(last_line_start)
}

struct MarkupParser {
    /// children of every open element, root first
    stack: Vec<Vec<ElementNode>>,
}

impl MarkupParser {
    fn parse_line(&mut self, raw: &str, line_start: Position) -> CompileResult<()> {
        let content = raw.trim();
        if content.is_empty() || content.starts_with('#') || content.starts_with("//") {
            return Ok(());
        }
        let indent = raw.len() - raw.trim_start().len();
        let content_start = line_start.advance_over(&raw[..indent]);
        if content == "}" {
            return self.close_element(content_start);
        }

        let (body, has_children) = match content.strip_suffix('{') {
            Some(body) => (body.trim_end(), true),
            None => (content, false),
        };
        let keyword_len = body.find(char::is_whitespace).unwrap_or(body.len());
        let keyword = &body[..keyword_len];
        let spec = match TAGS.get(keyword) {
            Some(spec) if !keyword.is_empty() => *spec,
            _ => {
                let name = if keyword.is_empty() { content } else { keyword };
                return Err(CompilationError::new(ErrorKind::UnknownMarkupNode)
                    .with_location(content_start)
                    .with_additional_message(quoted(name)));
            }
        };
        let rest_start = content_start.advance_over(keyword);
        let attrs = parse_attributes(&body[keyword_len..], rest_start)?;
        let is_input = keyword == INPUT_KEYWORD;
        if is_input && has_children {
            return Err(CompilationError::new(ErrorKind::InputWithChildren)
                .with_location(content_start));
        }
        let element = build_element(spec, is_input, attrs)?;
        self.push_element(element, has_children);
        Ok(())
    }

    fn push_element(&mut self, element: Element, has_children: bool) {
        self.current().push(ElementNode::Element(element));
        if has_children {
            // children are collected on a new level and attached on close
            self.stack.push(vec![]);
        }
    }

    fn close_element(&mut self, location: Position) -> CompileResult<()> {
        if self.stack.len() == 1 {
            return Err(CompilationError::new(ErrorKind::UnexpectedClosingBrace)
                .with_location(location));
        }
        let children = self.stack.pop().expect("stack must have a parent level");
        match self.current().last_mut() {
            Some(ElementNode::Element(parent)) => parent.children.extend(children),
            _ => unreachable!("an open level always follows its element"),
        }
        Ok(())
    }

    fn current(&mut self) -> &mut Vec<ElementNode> {
        self.stack.last_mut().expect("root level is never popped")
    }

    fn finish(mut self, last_line: Position) -> CompileResult<Vec<ElementNode>> {
        if self.stack.len() != 1 {
            return Err(CompilationError::new(ErrorKind::UnclosedMarkup).with_location(last_line));
        }
        Ok(self.stack.pop().unwrap_or_default())
    }
}

fn build_element(
    spec: TagSpec,
    is_input: bool,
    attrs: Vec<SourceAttribute>,
) -> CompileResult<Element> {
    let mut id = None;
    let mut class = None;
    let mut placeholder = None;
    let mut tekst = None;
    for attr in attrs {
        let slot = match attr.kind {
            SourceAttr::Id => &mut id,
            SourceAttr::Class => &mut class,
            SourceAttr::Placeholder => &mut placeholder,
            SourceAttr::Tekst => &mut tekst,
        };
        *slot = Some((attr.value, attr.location));
    }
    let class = class.map(|c| c.0);
    let class = match spec.implied_class {
        Some(implied) => Some(merge_class(class, implied)),
        None => class,
    };

    let mut attributes = SmallVec::new();
    let mut children = vec![];
    if let Some((value, _)) = id {
        attributes.push(Attribute {
            name: AttrName::Id,
            value,
        });
    }
    if let Some(value) = class {
        attributes.push(Attribute {
            name: AttrName::Class,
            value,
        });
    }
    if let Some((value, location)) = placeholder {
        if !is_input {
            return Err(CompilationError::new(ErrorKind::PlaceholderOutsideInput)
                .with_location(location));
        }
        attributes.push(Attribute {
            name: AttrName::Placeholder,
            value,
        });
    }
    if let Some((value, _)) = tekst {
        if is_input {
            attributes.push(Attribute {
                name: AttrName::Value,
                value,
            });
        } else {
            children.push(ElementNode::Text(TextNode { value }));
        }
    }
    Ok(Element {
        tag: spec.html_tag,
        attributes,
        children,
    })
}

fn merge_class(explicit: Option<String>, implied: &str) -> String {
    let parts: Vec<&str> = explicit
        .as_deref()
        .into_iter()
        .chain(Some(implied))
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    parts.join(" ")
}

/// Scans `name:"value"` pairs. `start` is the file position of `s`.
fn parse_attributes(s: &str, start: Position) -> CompileResult<Vec<SourceAttribute>> {
    let mut attrs = vec![];
    let mut i = 0;
    loop {
        i += s[i..].len() - s[i..].trim_start().len();
        if i == s.len() {
            return Ok(attrs);
        }
        let pair_start = i;
        let location = start.advance_over(&s[..pair_start]);
        let invalid = || {
            CompilationError::new(ErrorKind::InvalidAttributeSyntax)
                .with_location(location)
                .with_additional_message(quoted(s[pair_start..].trim_end()))
        };
        let name_len = identifier_len(&s[i..]);
        if name_len == 0 {
            return Err(invalid());
        }
        let name = &s[i..i + name_len];
        i = skip_whitespace(s, i + name_len);
        if !s[i..].starts_with(':') {
            return Err(invalid());
        }
        i = skip_whitespace(s, i + 1);
        if !s[i..].starts_with('"') {
            return Err(invalid());
        }
        let value_start = i + 1;
        let value_len = match quoted_value_len(&s[value_start..]) {
            Some(len) => len,
            None => return Err(invalid()),
        };
        let kind = match SourceAttr::from_name(name) {
            Some(kind) => kind,
            None => {
                return Err(CompilationError::new(ErrorKind::UnknownAttribute)
                    .with_location(location)
                    .with_additional_message(quoted(name)))
            }
        };
        attrs.push(SourceAttribute {
            kind,
            value: decode_escapes(&s[value_start..value_start + value_len]),
            location,
        });
        i = value_start + value_len + 1;
    }
}

fn skip_whitespace(s: &str, i: usize) -> usize {
    i + s[i..].len() - s[i..].trim_start().len()
}

/// Length of a double quoted value up to its closing quote.
fn quoted_value_len(s: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Some(i),
            _ => {}
        }
    }
    None
}
