//! Parser for the `script` section. It recognizes three statement forms:
//! ```text
//! staat naam = ""
//! functie onInput() { staat naam = lees("#naam") }
//! bij input "#naam" -> onInput()
//! ```
//! Function bodies are translated to target script source on the way.

mod translate;

pub use translate::{rewrite_expression, translate_body};

use translate::split_line_comment;

use super::{
    error::{quoted, CompilationError, CompilationErrorKind as ErrorKind, CompileResult},
    scanner::{CommentSyntax, Cursor},
    util::identifier_len,
    Position,
};
use log::{debug, trace};
#[cfg(feature = "serde")]
use serde::Serialize;
use smallvec::SmallVec;

#[derive(Default, Clone, Debug)]
pub struct ScriptParseOption {
    /// reject statements that are not `staat`, `bij` or `functie`
    /// instead of skipping the rest of their line
    pub strict: bool,
}

#[derive(PartialEq, Eq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct StateEntry {
    pub name: String,
    pub expression: String,
}

/// Initial state in declaration order. Redeclaring a name replaces its
/// expression in place.
#[derive(PartialEq, Eq, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct InitialState(Vec<StateEntry>);

impl InitialState {
    pub fn insert(&mut self, name: String, expression: String) {
        match self.0.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.expression = expression,
            None => self.0.push(StateEntry { name, expression }),
        }
    }
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.expression.as_str())
    }
    pub fn iter(&self) -> impl Iterator<Item = &StateEntry> {
        self.0.iter()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(PartialEq, Eq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct FunctionDef {
    pub name: String,
    pub params: SmallVec<[String; 2]>,
    /// translated body
    pub body: String,
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum EventKind {
    Click,
    Input,
}

impl EventKind {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "klik" => Some(EventKind::Click),
            "input" => Some(EventKind::Input),
            _ => None,
        }
    }
    /// DOM event type
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::Input => "input",
        }
    }
}

#[derive(PartialEq, Eq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct EventBinding {
    pub kind: EventKind,
    pub selector: String,
    pub handler: String,
    pub location: Position,
}

#[derive(PartialEq, Eq, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ScriptModel {
    pub initial_state: InitialState,
    pub functions: Vec<FunctionDef>,
    pub event_bindings: Vec<EventBinding>,
}

/// Parses the script section. `origin` is the file position of the first
/// char of `text`.
pub fn parse_script(
    text: &str,
    origin: Position,
    option: &ScriptParseOption,
) -> CompileResult<ScriptModel> {
    let mut cursor = Cursor::new(text, origin);
    let mut model = ScriptModel::default();
    loop {
        cursor.skip_whitespace_and_comments();
        if cursor.is_eof() {
            break;
        }
        let location = cursor.position();
        if cursor.at_keyword("staat") {
            let line = cursor.take_line();
            let (name, expr) = parse_state_line(split_line_comment(line).0)
                .ok_or_else(|| CompilationError::new(ErrorKind::InvalidState).with_location(location))?;
            model
                .initial_state
                .insert(name.to_owned(), rewrite_expression(expr));
        } else if cursor.at_keyword("bij") {
            let line = cursor.take_line();
            let binding = parse_binding_line(split_line_comment(line).0, location).ok_or_else(|| {
                CompilationError::new(ErrorKind::InvalidEventBinding).with_location(location)
            })?;
            model.event_bindings.push(binding);
        } else if cursor.at_keyword("functie") {
            let function = parse_function(&mut cursor, location)?;
            model.functions.push(function);
        } else if option.strict {
            let word = cursor.rest().split_whitespace().next().unwrap_or_default();
            return Err(CompilationError::new(ErrorKind::UnknownStatement)
                .with_location(location)
                .with_additional_message(quoted(word)));
        } else {
            debug!(
                "skipping unknown script statement at {}:{}",
                location.line, location.column
            );
            cursor.skip_line();
        }
    }
    trace!(
        "script: {} state entries, {} functions, {} event bindings",
        model.initial_state.len(),
        model.functions.len(),
        model.event_bindings.len()
    );
    Ok(model)
}

/// Requires at least one whitespace char and skips all of them.
fn expect_whitespace(s: &str) -> Option<&str> {
    let rest = s.trim_start();
    if rest.len() < s.len() {
        Some(rest)
    } else {
        None
    }
}

fn split_identifier(s: &str) -> Option<(&str, &str)> {
    match identifier_len(s) {
        0 => None,
        len => Some(s.split_at(len)),
    }
}

/// Matches `staat <name> = <expr>` and returns name and expression,
/// with trailing semicolons dropped.
pub(crate) fn parse_state_line(line: &str) -> Option<(&str, &str)> {
    let rest = line.trim().strip_prefix("staat")?;
    let (name, rest) = split_identifier(expect_whitespace(rest)?)?;
    let expr = rest.trim_start().strip_prefix('=')?;
    let expr = expr.trim().trim_end_matches(';').trim_end();
    if expr.is_empty() {
        None
    } else {
        Some((name, expr))
    }
}

/// Matches `bij (klik|input) "<selector>" -> <handler>()`, parens optional.
fn parse_binding_line(line: &str, location: Position) -> Option<EventBinding> {
    let line = line.trim().trim_end_matches(';');
    let rest = line.strip_prefix("bij")?;
    let (keyword, rest) = split_identifier(expect_whitespace(rest)?)?;
    let kind = EventKind::from_keyword(keyword)?;
    let rest = expect_whitespace(rest)?.strip_prefix('"')?;
    let selector_end = rest.find('"')?;
    let selector = &rest[..selector_end];
    if selector.is_empty() {
        return None;
    }
    let rest = rest[selector_end + 1..].trim_start().strip_prefix("->")?;
    let (handler, rest) = split_identifier(rest.trim_start())?;
    let rest = rest.trim_start();
    let rest = match rest.strip_prefix('(') {
        Some(args) => args.trim_start().strip_prefix(')')?,
        None => rest,
    };
    if !rest.trim().is_empty() {
        return None;
    }
    Some(EventBinding {
        kind,
        selector: selector.to_owned(),
        handler: handler.to_owned(),
        location,
    })
}

/// Matches a `functie <name>(<params>)` header.
fn parse_function_header(header: &str) -> Option<(&str, SmallVec<[String; 2]>)> {
    let rest = header.strip_prefix("functie")?;
    let (name, rest) = split_identifier(expect_whitespace(rest)?)?;
    let rest = rest.trim_start().strip_prefix('(')?;
    let params_end = rest.find(')')?;
    if !rest[params_end + 1..].trim().is_empty() {
        return None;
    }
    let params = rest[..params_end]
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_owned)
        .collect();
    Some((name, params))
}

fn parse_function(cursor: &mut Cursor, location: Position) -> CompileResult<FunctionDef> {
    let header_len = cursor.rest().find('{').ok_or_else(|| {
        CompilationError::new(ErrorKind::FunctionMissingBrace).with_location(location)
    })?;
    let header = cursor.move_by(header_len).trim();
    let (name, params) = parse_function_header(header)
        .ok_or_else(|| CompilationError::new(ErrorKind::InvalidFunction).with_location(location))?;
    let open = cursor.position();
    let block = cursor
        .scan_brace_block(CommentSyntax::FUNCTION_BODY)
        .ok_or_else(|| CompilationError::new(ErrorKind::UnclosedFunctionBody).with_location(open))?;
    Ok(FunctionDef {
        name: name.to_owned(),
        params,
        body: translate_body(block.content),
    })
}
