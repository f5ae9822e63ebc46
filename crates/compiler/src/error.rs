use super::Position;
use std::fmt;

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum CompilationErrorKind {
    // sfc splitting errors
    ExpectedIdentifier,
    UnknownSection,
    DuplicateSection,
    ExpectedOpenBrace,
    UnclosedBlock,
    MissingSections,

    // markup errors
    UnexpectedClosingBrace,
    UnknownMarkupNode,
    UnknownAttribute,
    InvalidAttributeSyntax,
    PlaceholderOutsideInput,
    InputWithChildren,
    UnclosedMarkup,

    // script errors
    InvalidState,
    InvalidEventBinding,
    FunctionMissingBrace,
    InvalidFunction,
    UnclosedFunctionBody,
    UnknownStatement,

    // codegen errors
    UndefinedHandler,
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct CompilationError {
    pub kind: CompilationErrorKind,
    pub additional_message: Option<String>,
    pub location: Position,
}

impl CompilationError {
    pub fn new(kind: CompilationErrorKind) -> Self {
        Self {
            kind,
            additional_message: None,
            location: Default::default(),
        }
    }
    pub fn with_location(mut self, loc: Position) -> Self {
        self.location = loc;
        self
    }
    pub fn with_additional_message(mut self, msg: String) -> Self {
        self.additional_message = Some(msg);
        self
    }

    pub fn line(&self) -> usize {
        self.location.line
    }
    pub fn column(&self) -> usize {
        self.location.column
    }

    fn msg(&self) -> &'static str {
        msg(&self.kind)
    }

    /// Renders `<path>:<line>:<col>: error: <message>` followed by a codeframe
    /// of the original source.
    pub fn format(&self, source: &str, path: Option<&str>) -> String {
        let Position { line, column, .. } = self.location;
        let loc = match path {
            Some(p) => format!("{}:{}:{}", p, line, column),
            None => format!("{}:{}", line, column),
        };
        let frame = codeframe(source, line, column);
        if frame.is_empty() {
            format!("{}: error: {}", loc, self)
        } else {
            format!("{}: error: {}\n{}", loc, self, frame)
        }
    }
}

#[cold]
#[inline(never)]
fn msg(kind: &CompilationErrorKind) -> &'static str {
    use CompilationErrorKind::*;
    match *kind {
        ExpectedIdentifier => "expected identifier",
        UnknownSection => "unknown top-level block ",
        DuplicateSection => "duplicate top-level block ",
        ExpectedOpenBrace => "expected '{' after ",
        UnclosedBlock => "unclosed '{' block",
        MissingSections => "missing required block(s): ",

        UnexpectedClosingBrace => "unexpected '}'",
        UnknownMarkupNode => "unknown markup node ",
        UnknownAttribute => "unknown attribute ",
        InvalidAttributeSyntax => "invalid attribute syntax near: ",
        PlaceholderOutsideInput => "'placeholder' is only valid for 'invoer'",
        InputWithChildren => "'invoer' cannot have children",
        UnclosedMarkup => "unclosed '{' in pagina markup",

        InvalidState => "invalid 'staat' syntax (expected: staat naam = waarde)",
        InvalidEventBinding => r##"invalid 'bij' syntax (expected: bij klik "#id" -> functieNaam())"##,
        FunctionMissingBrace => "function missing '{'",
        InvalidFunction => "invalid function syntax (expected: functie naam(a, b) { ... })",
        UnclosedFunctionBody => "unclosed function body '{...}'",
        UnknownStatement => "unknown script statement ",

        UndefinedHandler => "event handler ",
    }
}

impl fmt::Display for CompilationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(additional) = &self.additional_message {
            write!(f, "{}{}", self.msg(), additional)
        } else {
            write!(f, "{}", self.msg())
        }
    }
}

impl std::error::Error for CompilationError {}

pub type CompileResult<T> = Result<T, CompilationError>;

/// Wraps a name in single quotes for error details.
pub fn quoted(name: &str) -> String {
    format!("'{}'", name)
}

const CONTEXT_LINES: usize = 2;

/// Renders the lines around `line` with a caret under `column`.
/// Out of range positions are clamped into the source.
pub fn codeframe(source: &str, line: usize, column: usize) -> String {
    let lines: Vec<&str> = source.lines().collect();
    if lines.is_empty() {
        return String::new();
    }
    let line = line.clamp(1, lines.len());
    let column = column.max(1);
    let start = line.saturating_sub(CONTEXT_LINES).max(1);
    let end = (line + CONTEXT_LINES).min(lines.len());
    let width = end.to_string().len();

    let mut out = Vec::with_capacity(end - start + 2);
    for ln in start..=end {
        let prefix = if ln == line { '>' } else { ' ' };
        out.push(format!("{} {:>width$} | {}", prefix, ln, lines[ln - 1], width = width));
        if ln == line {
            out.push(format!(
                "  {} | {}^",
                " ".repeat(width),
                " ".repeat(column - 1)
            ));
        }
    }
    out.join("\n")
}
