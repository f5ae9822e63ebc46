use compiler::{
    error::{quoted, CompilationError, CompilationErrorKind as ErrorKind, CompileResult},
    scanner::{BraceBlock, CommentSyntax, Cursor},
    Position,
};
use log::trace;
#[cfg(feature = "serde")]
use serde::Serialize;

/// Required top-level sections in canonical order.
pub const SECTION_NAMES: [&str; 3] = ["pagina", "script", "stijl"];

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SfcSection<'a> {
    /// trimmed content between the braces
    pub text: &'a str,
    /// file position of the first char of `text`
    pub start: Position,
}

#[derive(PartialEq, Eq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SfcDescriptor<'a> {
    pub pagina: SfcSection<'a>,
    pub script: SfcSection<'a>,
    pub stijl: SfcSection<'a>,
}

impl<'a> SfcDescriptor<'a> {
    pub fn sections(&self) -> [(&'static str, SfcSection<'a>); 3] {
        [
            (SECTION_NAMES[0], self.pagina),
            (SECTION_NAMES[1], self.script),
            (SECTION_NAMES[2], self.stijl),
        ]
    }
}

/// Comments a section may contain, so that quotes inside them are skipped.
fn comment_syntax(section: &str) -> CommentSyntax {
    match section {
        "pagina" => CommentSyntax::MARKUP,
        "script" => CommentSyntax::SCRIPT,
        _ => CommentSyntax::STYLE,
    }
}

fn section_of(block: BraceBlock<'_>) -> SfcSection<'_> {
    let content = block.content;
    let leading = &content[..content.len() - content.trim_start().len()];
    SfcSection {
        text: content.trim(),
        start: block.start.advance_over(leading),
    }
}

/// Splits a source into its `pagina`, `script` and `stijl` sections.
/// Sections may come in any order but each exactly once.
pub fn parse_sfc(source: &str) -> CompileResult<SfcDescriptor<'_>> {
    let mut sections: [Option<SfcSection>; 3] = [None; 3];
    let mut cursor = Cursor::new(source, Position::default());
    loop {
        cursor.skip_whitespace_and_comments();
        if cursor.is_eof() {
            break;
        }
        let location = cursor.position();
        let name = cursor.read_identifier().ok_or_else(|| {
            CompilationError::new(ErrorKind::ExpectedIdentifier).with_location(location)
        })?;
        let index = SECTION_NAMES
            .iter()
            .position(|n| *n == name)
            .ok_or_else(|| {
                CompilationError::new(ErrorKind::UnknownSection)
                    .with_location(location)
                    .with_additional_message(format!(
                        "{} (expected: {})",
                        quoted(name),
                        SECTION_NAMES.join("/")
                    ))
            })?;
        if sections[index].is_some() {
            return Err(CompilationError::new(ErrorKind::DuplicateSection)
                .with_location(location)
                .with_additional_message(quoted(name)));
        }
        cursor.skip_whitespace_and_comments();
        let open = cursor.position();
        if !cursor.starts_with("{") {
            return Err(CompilationError::new(ErrorKind::ExpectedOpenBrace)
                .with_location(open)
                .with_additional_message(quoted(name)));
        }
        let block = cursor.scan_brace_block(comment_syntax(name)).ok_or_else(|| {
            CompilationError::new(ErrorKind::UnclosedBlock).with_location(open)
        })?;
        let section = section_of(block);
        trace!(
            "section {} at {}:{}, {} bytes",
            name,
            section.start.line,
            section.start.column,
            section.text.len()
        );
        sections[index] = Some(section);
    }
    match sections {
        [Some(pagina), Some(script), Some(stijl)] => Ok(SfcDescriptor {
            pagina,
            script,
            stijl,
        }),
        _ => {
            let missing: Vec<&str> = SECTION_NAMES
                .iter()
                .zip(&sections)
                .filter(|(_, section)| section.is_none())
                .map(|(name, _)| *name)
                .collect();
            Err(CompilationError::new(ErrorKind::MissingSections)
                .with_additional_message(missing.join(", ")))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn err(source: &str) -> (String, usize, usize) {
        let e = parse_sfc(source).unwrap_err();
        (e.to_string(), e.line(), e.column())
    }

    #[test]
    fn test_split_any_order() {
        let source = "# pagina eerst\nstijl { p { color: red; } }\n\npagina {\n  kop tekst:\"}\"\n}\nscript {}\n";
        let sfc = parse_sfc(source).unwrap();
        assert_eq!(sfc.stijl.text, "p { color: red; }");
        assert_eq!(sfc.stijl.start, Position::new(23, 2, 9));
        assert_eq!(sfc.pagina.text, "kop tekst:\"}\"");
        assert_eq!((sfc.pagina.start.line, sfc.pagina.start.column), (5, 3));
        assert_eq!(&source[sfc.pagina.start.offset..][..3], "kop");
        assert_eq!(sfc.script.text, "");
        let names: Vec<_> = sfc.sections().iter().map(|s| s.0).collect();
        assert_eq!(names, SECTION_NAMES);
    }

    #[test]
    fn test_unknown_section() {
        assert_eq!(
            err("pagina {}\n  sjabloon {}"),
            (
                "unknown top-level block 'sjabloon' (expected: pagina/script/stijl)".into(),
                2,
                3
            )
        );
    }

    #[test]
    fn test_duplicate_section() {
        assert_eq!(
            err("stijl {} stijl {}"),
            ("duplicate top-level block 'stijl'".into(), 1, 10)
        );
    }

    #[test]
    fn test_missing_sections() {
        assert_eq!(
            err("script {}"),
            ("missing required block(s): pagina, stijl".into(), 1, 1)
        );
        assert_eq!(
            err(""),
            ("missing required block(s): pagina, script, stijl".into(), 1, 1)
        );
    }

    #[test]
    fn test_apostrophes_in_comments() {
        let source = "pagina {\n  # Jan's pagina\n  kop tekst:\"hoi\"\n}\nscript {\n  functie f() {\n    // don't panic\n  }\n}\nstijl { a { background: url(http://x/a.png); } }";
        let sfc = parse_sfc(source).unwrap();
        assert_eq!(sfc.pagina.text, "# Jan's pagina\n  kop tekst:\"hoi\"");
        assert!(sfc.script.text.ends_with("// don't panic\n  }"), "{}", sfc.script.text);
        assert_eq!(sfc.stijl.text, "a { background: url(http://x/a.png); }");
    }

    #[test]
    fn test_brace_errors() {
        assert_eq!(err("pagina\n  kop"), ("expected '{' after 'pagina'".into(), 2, 3));
        assert_eq!(err("pagina { blok {"), ("unclosed '{' block".into(), 1, 8));
        assert_eq!(err("{ }"), ("expected identifier".into(), 1, 1));
    }
}
