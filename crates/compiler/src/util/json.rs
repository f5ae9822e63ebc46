//! String literal writer for the generated script. The output is valid both
//! as JSON and as a JavaScript string literal.
use std::fmt::{self, Write};

#[inline(never)]
fn write_escaped<W: Write>(w: &mut W, string: &str, mut start: usize) -> fmt::Result {
    let first = start;
    for (index, ch) in string.char_indices().skip_while(|&(i, _)| i < first) {
        let escape = match ch {
            '"' => "\\\"",
            '\\' => "\\\\",
            '\n' => "\\n",
            '\r' => "\\r",
            '\t' => "\\t",
            '\u{8}' => "\\b",
            '\u{c}' => "\\f",
            '\u{2028}' => "\\u2028",
            '\u{2029}' => "\\u2029",
            c if (c as u32) < 0x20 => "",
            _ => continue,
        };
        w.write_str(&string[start..index])?;
        if escape.is_empty() {
            write!(w, "\\u{:04x}", ch as u32)?;
        } else {
            w.write_str(escape)?;
        }
        start = index + ch.len_utf8();
    }
    w.write_str(&string[start..])
}

fn needs_escape(c: char) -> bool {
    matches!(c, '"' | '\\' | '\u{2028}' | '\u{2029}') || (c as u32) < 0x20
}

/// Writes `string` as a double quoted literal.
pub fn write_js_string<W: Write>(string: &str, mut w: W) -> fmt::Result {
    w.write_char('"')?;
    match string.char_indices().find(|&(_, c)| needs_escape(c)) {
        Some((index, _)) => {
            w.write_str(&string[..index])?;
            write_escaped(&mut w, string, index)?;
        }
        None => w.write_str(string)?,
    }
    w.write_char('"')
}

/// Display adaptor quoting its content with [`write_js_string`].
pub struct JsStr<'a>(pub &'a str);

impl<'a> fmt::Display for JsStr<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_js_string(self.0, f)
    }
}
