//! Character cursor shared by the SFC splitter and the script parser.
//! It keeps the cursor's position in original file coordinates so every
//! diagnostic raised from an extracted section points into the real source.

use super::util::{is_ident_part, is_ident_start};
use super::Position;
use bitflags::bitflags;

/// Scan state while walking a brace block.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ScanMode {
    Normal,
    /// inside a string opened by the quote char
    InString(char),
    /// right after a backslash inside a string
    Escaped(char),
    /// inside a line comment, up to the newline
    InComment,
}

impl ScanMode {
    /// Feeds one char and returns the next mode. Comments are entered by
    /// the caller, which knows the comment syntax of the text.
    pub fn step(self, c: char) -> Self {
        use ScanMode::*;
        match self {
            Normal if is_quote(c) => InString(c),
            Normal => Normal,
            InString(q) if c == '\\' => Escaped(q),
            InString(q) if c == q => Normal,
            InString(q) => InString(q),
            Escaped(q) => InString(q),
            InComment if c == '\n' => Normal,
            InComment => InComment,
        }
    }
    pub fn in_string(self) -> bool {
        matches!(self, ScanMode::InString(_) | ScanMode::Escaped(_))
    }
}

bitflags! {
    /// Line comment forms recognized while scanning a brace block.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CommentSyntax: u8 {
        /// `#` or `//` as the first non-blank chars of a line
        const LINE_START = 1 << 0;
        /// `//` anywhere outside a string
        const SLASHES    = 1 << 1;
    }
}

impl CommentSyntax {
    /// `pagina` markup
    pub const MARKUP: Self = Self::LINE_START;
    /// the `script` section, function bodies included
    pub const SCRIPT: Self = Self::LINE_START.union(Self::SLASHES);
    /// a `functie` body
    pub const FUNCTION_BODY: Self = Self::SLASHES;
    /// `stijl`, where `//` is part of urls
    pub const STYLE: Self = Self::empty();
}

pub fn is_quote(c: char) -> bool {
    matches!(c, '\'' | '"' | '`')
}

/// Content between a pair of matching braces.
#[derive(Debug)]
pub struct BraceBlock<'a> {
    /// raw content, untrimmed
    pub content: &'a str,
    /// position of the opening brace
    pub open: Position,
    /// position of the first content char
    pub start: Position,
}

pub struct Cursor<'a> {
    source: &'a str,
    /// byte index into `source`
    index: usize,
    position: Position,
}

impl<'a> Cursor<'a> {
    /// `origin` is the file position of the first char of `source`.
    pub fn new(source: &'a str, origin: Position) -> Self {
        Self {
            source,
            index: 0,
            position: origin,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }
    pub fn is_eof(&self) -> bool {
        self.index >= self.source.len()
    }
    /// The unconsumed source.
    pub fn rest(&self) -> &'a str {
        &self.source[self.index..]
    }
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }
    pub fn starts_with(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    pub fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.index += c.len_utf8();
        self.position.offset += c.len_utf8();
        if c == '\n' {
            self.position.line += 1;
            self.position.column = 1;
        } else {
            self.position.column += 1;
        }
        Some(c)
    }

    /// Consumes `len` bytes and returns them.
    pub fn move_by(&mut self, len: usize) -> &'a str {
        let start = self.index;
        let end = start + len;
        debug_assert!(self.source.is_char_boundary(end));
        while self.index < end {
            self.advance();
        }
        &self.source[start..end]
    }

    /// Consumes up to, but not including, the next newline.
    pub fn take_line(&mut self) -> &'a str {
        let len = self.rest().find('\n').unwrap_or_else(|| self.rest().len());
        self.move_by(len)
    }

    pub fn skip_line(&mut self) {
        self.take_line();
        if self.peek() == Some('\n') {
            self.advance();
        }
    }

    /// Skips whitespace plus `#` and `//` line comments.
    pub fn skip_whitespace_and_comments(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else if c == '#' || self.starts_with("//") {
                self.take_line();
            } else {
                break;
            }
        }
    }

    pub fn read_identifier(&mut self) -> Option<&'a str> {
        if !self.rest().starts_with(is_ident_start) {
            return None;
        }
        let len = self
            .rest()
            .char_indices()
            .find(|&(_, c)| !is_ident_part(c))
            .map_or_else(|| self.rest().len(), |(i, _)| i);
        Some(self.move_by(len))
    }

    /// Checks for `keyword` as a whole word at the cursor.
    pub fn at_keyword(&self, keyword: &str) -> bool {
        let rest = self.rest();
        rest.starts_with(keyword) && !rest[keyword.len()..].starts_with(is_ident_part)
    }

    /// Walks from the `{` at the cursor to its matching `}`, ignoring braces
    /// inside quoted strings and inside the line comments of `comments`.
    /// Returns `None` when the block is unterminated; the cursor is then left
    /// at the end of the source.
    pub fn scan_brace_block(&mut self, comments: CommentSyntax) -> Option<BraceBlock<'a>> {
        debug_assert!(self.starts_with("{"));
        let open = self.position;
        self.advance();
        let start = self.position;
        let start_index = self.index;
        let mut mode = ScanMode::Normal;
        let mut depth = 1usize;
        // only whitespace seen since the last newline or the opening brace
        let mut line_start = true;
        while let Some(c) = self.peek() {
            if mode == ScanMode::Normal {
                if c == '}' {
                    depth -= 1;
                    if depth == 0 {
                        let content = &self.source[start_index..self.index];
                        self.advance();
                        return Some(BraceBlock {
                            content,
                            open,
                            start,
                        });
                    }
                } else if c == '{' {
                    depth += 1;
                } else if self.opens_comment(comments, line_start) {
                    mode = ScanMode::InComment;
                }
            }
            mode = mode.step(c);
            line_start = c == '\n' || (line_start && c.is_whitespace());
            self.advance();
        }
        None
    }

    fn opens_comment(&self, comments: CommentSyntax, line_start: bool) -> bool {
        let rest = self.rest();
        let slashes = rest.starts_with("//");
        (comments.contains(CommentSyntax::SLASHES) && slashes)
            || (comments.contains(CommentSyntax::LINE_START)
                && line_start
                && (slashes || rest.starts_with('#')))
    }
}
