use plats_compiler_core::{
    error::{CompilationError, CompilationErrorKind as ErrorKind},
    markup::parse_markup,
    script::{parse_script, ScriptParseOption},
    Position,
};

fn markup_error(s: &str) -> CompilationError {
    parse_markup(s, Position::default()).unwrap_err()
}

fn script_error(s: &str) -> CompilationError {
    parse_script(s, Position::default(), &ScriptParseOption::default()).unwrap_err()
}

#[test]
fn test_markup_errors() {
    let cases = [
        ("blok {\n  invoer id:\"x\" {\n  }\n}", ErrorKind::InputWithChildren, "'invoer' cannot have children", (2, 3)),
        ("kop placeholder:\"x\"", ErrorKind::PlaceholderOutsideInput, "'placeholder' is only valid for 'invoer'", (1, 5)),
        ("plaatje", ErrorKind::UnknownMarkupNode, "unknown markup node 'plaatje'", (1, 1)),
        ("kop stijl:\"x\"", ErrorKind::UnknownAttribute, "unknown attribute 'stijl'", (1, 5)),
        ("kop id:\"a\" ; class:\"b\"", ErrorKind::InvalidAttributeSyntax, "invalid attribute syntax near: '; class:\"b\"'", (1, 12)),
        ("}", ErrorKind::UnexpectedClosingBrace, "unexpected '}'", (1, 1)),
        ("blok {\n  kop", ErrorKind::UnclosedMarkup, "unclosed '{' in pagina markup", (2, 1)),
    ];
    for (source, kind, message, (line, column)) in cases {
        let err = markup_error(source);
        assert_eq!(err.kind, kind, "{}", source);
        assert_eq!(err.to_string(), message, "{}", source);
        assert_eq!((err.line(), err.column()), (line, column), "{}", source);
    }
}

#[test]
fn test_script_errors() {
    let cases = [
        ("staat 1 = 2", ErrorKind::InvalidState, (1, 1)),
        ("\n  bij klik \"\" -> f()", ErrorKind::InvalidEventBinding, (2, 3)),
        ("functie f() staat", ErrorKind::FunctionMissingBrace, (1, 1)),
        ("functie f(a { }", ErrorKind::InvalidFunction, (1, 1)),
        ("functie f() {\n  {", ErrorKind::UnclosedFunctionBody, (1, 13)),
    ];
    for (source, kind, (line, column)) in cases {
        let err = script_error(source);
        assert_eq!(err.kind, kind, "{}", source);
        assert_eq!((err.line(), err.column()), (line, column), "{}", source);
    }
    assert_eq!(
        script_error("staat x").to_string(),
        "invalid 'staat' syntax (expected: staat naam = waarde)"
    );
}
