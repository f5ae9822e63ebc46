mod json;
pub use json::{write_js_string, JsStr};

pub fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

pub fn is_ident_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Word chars in the regex `\w` sense, used for whole-word matching.
pub fn is_word_char(c: char) -> bool {
    is_ident_part(c)
}

/// Length in bytes of the identifier at the start of `s`, zero if none.
pub fn identifier_len(s: &str) -> usize {
    if !s.starts_with(is_ident_start) {
        return 0;
    }
    s.char_indices()
        .find(|&(_, c)| !is_ident_part(c))
        .map_or(s.len(), |(i, _)| i)
}

/// Decodes backslash escapes in a quoted attribute value.
/// Unknown or malformed escapes are kept verbatim, backslash included.
pub fn decode_escapes(s: &str) -> String {
    if !s.contains('\\') {
        return s.to_owned();
    }
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let e = match chars.next() {
            Some(e) => e,
            None => {
                out.push('\\');
                break;
            }
        };
        let simple = match e {
            '\\' => Some('\\'),
            '\'' => Some('\''),
            '"' => Some('"'),
            'a' => Some('\u{7}'),
            'b' => Some('\u{8}'),
            'f' => Some('\u{c}'),
            'n' => Some('\n'),
            'r' => Some('\r'),
            't' => Some('\t'),
            'v' => Some('\u{b}'),
            _ => None,
        };
        if let Some(decoded) = simple {
            out.push(decoded);
            continue;
        }
        let digits = match e {
            'x' => 2,
            'u' => 4,
            'U' => 8,
            '0'..='7' => {
                let mut value = e.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            value = value * 8 + d;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.extend(char::from_u32(value));
                continue;
            }
            '\n' => continue,
            _ => {
                out.push('\\');
                out.push(e);
                continue;
            }
        };
        let hex: String = chars.clone().take(digits).collect();
        let decoded = if hex.len() == digits && hex.chars().all(|h| h.is_ascii_hexdigit()) {
            u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
        } else {
            None
        };
        match decoded {
            Some(d) => {
                out.push(d);
                for _ in 0..digits {
                    chars.next();
                }
            }
            None => {
                out.push('\\');
                out.push(e);
            }
        }
    }
    out
}
