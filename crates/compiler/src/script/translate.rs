//! Word-level rewriting of script source. Rewrites never apply inside
//! string literals, line comments or after a member access dot:
//! * `waar` / `onwaar` become `true` / `false`
//! * calls to `lees(` / `zet(` become `helpers.lees(` / `helpers.zet(`
//! * a body line `staat x = expr` becomes `setState({x: expr});`

use super::parse_state_line;
use crate::scanner::ScanMode;
use crate::util::is_word_char;

/// Rewrites the boolean keywords of an initial state expression.
pub fn rewrite_expression(expr: &str) -> String {
    rewrite_line(expr, &mut ScanMode::Normal, false)
}

/// Translates a raw function body. The result is dedented and has no
/// leading or trailing blank lines; inner blank lines are kept.
pub fn translate_body(body: &str) -> String {
    let mut mode = ScanMode::Normal;
    let mut lines = Vec::new();
    for raw in body.lines() {
        let line = raw.trim_end();
        let content = line.trim_start();
        if content.is_empty() && !mode.in_string() {
            lines.push(String::new());
            continue;
        }
        let (code, comment) = split_line_comment(content);
        let state = if mode.in_string() {
            None
        } else {
            parse_state_line(code)
        };
        let translated = match state {
            Some((name, expr)) => {
                let indent = &line[..line.len() - content.len()];
                let expr = rewrite_line(expr, &mut mode, true);
                let mut out = format!("{}setState({{{}: {}}});", indent, name, expr);
                if let Some(comment) = comment {
                    out.push(' ');
                    out.push_str(comment);
                }
                out
            }
            None => rewrite_line(line, &mut mode, true),
        };
        lines.push(translated);
    }
    dedent(&mut lines);
    lines.join("\n").trim_matches('\n').to_owned()
}

/// Splits off a trailing `//` comment that is not inside a string.
pub(crate) fn split_line_comment(line: &str) -> (&str, Option<&str>) {
    let mut mode = ScanMode::Normal;
    for (i, c) in line.char_indices() {
        if mode == ScanMode::Normal && line[i..].starts_with("//") {
            return (line[..i].trim_end(), Some(&line[i..]));
        }
        mode = mode.step(c);
    }
    (line, None)
}

fn after_member_access(out: &str) -> bool {
    let out = out.trim_end();
    out.ends_with('.') && !out.ends_with("...")
}

/// Rewrites one line. `mode` carries an open template literal across lines;
/// any other string is closed at the end of the line.
fn rewrite_line(line: &str, mode: &mut ScanMode, helpers: bool) -> String {
    let mut out = String::with_capacity(line.len() + 8);
    let mut rest = line;
    while let Some(c) = rest.chars().next() {
        if !mode.in_string() {
            if rest.starts_with("//") {
                out.push_str(rest);
                break;
            }
            if is_word_char(c) {
                let len = rest.find(|c| !is_word_char(c)).unwrap_or(rest.len());
                let (word, tail) = rest.split_at(len);
                rest = tail;
                if after_member_access(&out) {
                    out.push_str(word);
                    continue;
                }
                match word {
                    "waar" => out.push_str("true"),
                    "onwaar" => out.push_str("false"),
                    "lees" | "zet" if helpers && tail.trim_start().starts_with('(') => {
                        out.push_str("helpers.");
                        out.push_str(word);
                    }
                    _ => out.push_str(word),
                }
                continue;
            }
        }
        *mode = mode.step(c);
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    if !matches!(*mode, ScanMode::InString('`') | ScanMode::Escaped('`')) {
        *mode = ScanMode::Normal;
    }
    out
}

fn leading_whitespace(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

fn dedent(lines: &mut [String]) {
    let indent = lines
        .iter()
        .filter(|l| !l.is_empty())
        .map(|l| leading_whitespace(l))
        .min()
        .unwrap_or(0);
    if indent == 0 {
        return;
    }
    for line in lines.iter_mut().filter(|l| !l.is_empty()) {
        let start = line.char_indices().nth(indent).map_or(line.len(), |(i, _)| i);
        line.drain(..start);
    }
}
