//! Core of the Plats compiler: the shared brace scanner, the markup and
//! script parsers, and the code generator producing the runtime script.
//! SFC splitting and the full pipeline live in the `plats-compiler-sfc` crate.

#[cfg(feature = "serde")]
use serde::Serialize;

pub mod codegen;
pub mod error;
pub mod flags;
pub mod markup;
pub mod scanner;
pub mod script;
pub mod util;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Position {
    /// the 0-indexed byte offset in the original source
    pub offset: usize,
    /// the line number in the source code
    pub line: usize,
    /// the column number in the source code, counted in chars
    pub column: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl Position {
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
    /// Moves the position over `s`, which must directly follow it in the source.
    pub fn advance_over(mut self, s: &str) -> Self {
        for c in s.chars() {
            self.offset += c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self
    }
}

#[cfg(test)]
#[macro_export]
macro_rules! cast {
    ($target: expr, $pat: path) => {{
        if let $pat(a) = $target {
            a
        } else {
            panic!("mismatch variant when cast to {}", stringify!($pat));
        }
    }};
}
