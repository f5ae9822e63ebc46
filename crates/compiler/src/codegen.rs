//! Code generation. One compile produces three artifacts: the HTML shell,
//! the runtime script rendering the element tree, and the stylesheet.

mod code_writer;

pub use code_writer::CodeWriter;

use super::{
    error::{quoted, CompilationError, CompilationErrorKind as ErrorKind, CompileResult},
    flags::RuntimeHelper,
    markup::ElementNode,
    script::ScriptModel,
};
use log::debug;
use rustc_hash::FxHashSet;
#[cfg(feature = "serde")]
use serde::Serialize;

pub trait CodeGenerator {
    type IR;
    type Output;
    /// generate will take the parsed page and output
    /// desired code format
    fn generate(&mut self, node: Self::IR) -> Self::Output;
}

#[derive(Default, Clone, Debug)]
pub struct CodeGenerateOption {
    /// adds the live reload listener to the HTML shell
    pub dev: bool,
}

/// Everything the runtime script is generated from.
pub struct RuntimeIR<'a> {
    pub nodes: &'a [ElementNode],
    pub script: &'a ScriptModel,
    pub helpers: RuntimeHelper,
}

pub const STYLESHEET_LINK: &str = r#"<link rel="stylesheet" href="./app.css">"#;
pub const SCRIPT_TAG: &str = r#"<script src="./app.js" defer></script>"#;
pub const LIVE_RELOAD_ENDPOINT: &str = "/__platsweb_events";

#[derive(PartialEq, Eq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct BuildOutput {
    pub html_shell: String,
    pub script: String,
    pub stylesheet: String,
}

impl BuildOutput {
    /// Single document with the stylesheet and the script inlined in
    /// place of their external references.
    pub fn inline_html(&self) -> String {
        let style = format!("<style>\n{}\n</style>", self.stylesheet.trim_end());
        // a literal closing tag would end the inline script early
        let script = self.script.trim_end().replace("</script", "<\\/script");
        let script = format!("<script>\n{}\n</script>", script);
        self.html_shell
            .replace(STYLESHEET_LINK, &style)
            .replace(SCRIPT_TAG, &script)
    }
}

pub fn generate(
    nodes: &[ElementNode],
    script: &ScriptModel,
    style: &str,
    option: &CodeGenerateOption,
) -> CompileResult<BuildOutput> {
    check_handlers(script)?;
    let helpers = RuntimeHelper::collect(script);
    debug!("generating runtime script with {:?}", helpers);
    Ok(BuildOutput {
        html_shell: generate_html_shell(option.dev),
        script: generate_script(nodes, script, helpers),
        stylesheet: generate_stylesheet(style),
    })
}

/// Every event binding must name a declared function.
pub fn check_handlers(script: &ScriptModel) -> CompileResult<()> {
    let declared: FxHashSet<&str> = script.functions.iter().map(|f| f.name.as_str()).collect();
    let undefined = script
        .event_bindings
        .iter()
        .find(|binding| !declared.contains(binding.handler.as_str()));
    match undefined {
        Some(binding) => Err(CompilationError::new(ErrorKind::UndefinedHandler)
            .with_location(binding.location)
            .with_additional_message(format!(
                "{} is not defined as a functie()",
                quoted(&binding.handler)
            ))),
        None => Ok(()),
    }
}

pub fn generate_script(nodes: &[ElementNode], script: &ScriptModel, helpers: RuntimeHelper) -> String {
    let mut out = String::new();
    let ir = RuntimeIR {
        nodes,
        script,
        helpers,
    };
    CodeWriter::new(&mut out)
        .generate(ir)
        .expect("writing into a String never fails");
    out
}

const LIVE_RELOAD_SNIPPET: &str = r#"    <script>
      (() => {
        try {
          const es = new EventSource('/__platsweb_events');
          es.onmessage = () => location.reload();
        } catch (e) {}
      })();
    </script>
"#;

pub fn generate_html_shell(dev: bool) -> String {
    let mut html = String::from(concat!(
        "<!doctype html>\n",
        "<html lang=\"nl\">\n",
        "  <head>\n",
        "    <meta charset=\"utf-8\">\n",
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
        "    <title>PlatsWeb</title>\n",
    ));
    html.push_str("    ");
    html.push_str(STYLESHEET_LINK);
    html.push_str("\n  </head>\n  <body>\n    <div id=\"plats-root\"></div>\n    ");
    html.push_str(SCRIPT_TAG);
    html.push('\n');
    if dev {
        html.push_str(LIVE_RELOAD_SNIPPET);
    }
    html.push_str("  </body>\n</html>\n");
    html
}

/// Trimmed and newline terminated, empty for a blank style section.
pub fn generate_stylesheet(style: &str) -> String {
    let style = style.trim();
    if style.is_empty() {
        String::new()
    } else {
        format!("{}\n", style)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::markup::parse_markup;
    use crate::script::{parse_script, ScriptParseOption};
    use crate::Position;

    fn compile(markup: &str, script: &str, style: &str, dev: bool) -> CompileResult<BuildOutput> {
        let nodes = parse_markup(markup, Position::default())?;
        let model = parse_script(script, Position::default(), &ScriptParseOption::default())?;
        generate(&nodes, &model, style, &CodeGenerateOption { dev })
    }

    fn assert_parses(js: &str) {
        let parse = rslint_parser::parse_text(js, 0);
        assert!(parse.errors().is_empty(), "{}", js);
    }

    const MARKUP: &str = r#"kop tekst:"Hallo {{ naam }}"
invoer id:"naam" placeholder:"Naam"
knop id:"btn" tekst:"Klik""#;
    const SCRIPT: &str = r##"staat naam = ""
staat actief = onwaar
functie opslaan() {
  staat actief = waar
}
functie typ() { staat naam = lees("#naam") }
bij klik "#btn" -> opslaan()
bij input "#naam" -> typ"##;

    #[test]
    fn test_generate_full_page() {
        let out = compile(MARKUP, SCRIPT, "  h1 { color: red; }  ", false).unwrap();
        let js = &out.script;
        assert!(js.contains("'use strict';"), "{}", js);
        assert!(js.contains("document.getElementById('plats-root')"), "{}", js);
        assert!(
            js.contains(r#"const TEMPLATE = [{"t": "el", "tag": "h1", "attrs": {}, "kids": [{"t": "text", "v": "Hallo {{ naam }}"}]}"#),
            "{}",
            js
        );
        assert!(js.contains("  naam: \"\",\n    actief: false\n"), "{}", js);
        assert!(js.contains("const staat = state;"), "{}", js);
        assert!(js.contains("function opslaan() {\n    setState({actief: true});\n  }"), "{}", js);
        assert!(js.contains("setState({naam: helpers.lees(\"#naam\")});"), "{}", js);
        assert!(js.contains("const handlers = { opslaan, typ };"), "{}", js);
        assert!(
            js.contains(r##"{"type": "click", "selector": "#btn", "handler": "opslaan"}"##),
            "{}",
            js
        );
        assert!(js.ends_with("  render();\n  bindEvents();\n})();\n"), "{}", js);
        assert_parses(js);
        assert_eq!(out.stylesheet, "h1 { color: red; }\n");
    }

    #[test]
    fn test_minimal_page() {
        let out = compile("blok", "", "", false).unwrap();
        let js = &out.script;
        assert!(js.contains("const state = {};"), "{}", js);
        assert!(!js.contains("const helpers"), "{}", js);
        assert!(!js.contains("bindEvents"), "{}", js);
        assert!(js.contains("function renderNode(node)"), "{}", js);
        assert_parses(js);
        assert_eq!(out.stylesheet, "");
    }

    #[test]
    fn test_undefined_handler() {
        let err = compile("blok", "functie a() {}\n\nbij klik \"#x\" -> b()", "", false).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UndefinedHandler);
        assert_eq!(err.to_string(), "event handler 'b' is not defined as a functie()");
        assert_eq!((err.line(), err.column()), (3, 1));
    }

    #[test]
    fn test_html_shell() {
        let html = generate_html_shell(false);
        assert!(html.starts_with("<!doctype html>\n<html lang=\"nl\">"), "{}", html);
        assert!(html.contains(STYLESHEET_LINK));
        assert!(html.contains("<div id=\"plats-root\"></div>"));
        assert!(html.contains(SCRIPT_TAG));
        assert!(!html.contains("EventSource"));
        let dev = generate_html_shell(true);
        assert!(dev.contains(LIVE_RELOAD_ENDPOINT), "{}", dev);
        assert!(dev.contains("location.reload()"), "{}", dev);
    }

    #[test]
    fn test_inline_html() {
        let out = compile(r#"tekst tekst:"</script>""#, "", "p { margin: 0 }", false).unwrap();
        let html = out.inline_html();
        assert!(html.contains("<style>\np { margin: 0 }\n</style>"), "{}", html);
        assert!(html.contains("<script>\n// Generated"), "{}", html);
        assert!(!html.contains(SCRIPT_TAG));
        assert_eq!(html.matches("</script>").count(), 1, "{}", html);
    }

    #[test]
    fn test_state_with_trailing_comments() {
        let out = compile("blok", "staat a = 1 // teller\nstaat b = 2", "", false).unwrap();
        assert!(out.script.contains("  a: 1,\n    b: 2\n"), "{}", out.script);
        assert_parses(&out.script);
    }

    #[test]
    fn test_deterministic() {
        let a = compile(MARKUP, SCRIPT, "", true).unwrap();
        let b = compile(MARKUP, SCRIPT, "", true).unwrap();
        assert_eq!(a, b);
    }
}
