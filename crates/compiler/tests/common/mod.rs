use plats_compiler_core::{
    markup::{parse_markup, ElementNode},
    script::{parse_script, ScriptModel, ScriptParseOption},
    Position,
};
use std::fmt::Write;

pub fn base_parse(markup: &str) -> Vec<ElementNode> {
    parse_markup(markup, Position::default()).unwrap()
}

pub fn base_script(script: &str) -> ScriptModel {
    parse_script(script, Position::default(), &ScriptParseOption::default()).unwrap()
}

/// Renders an element tree one node per line, children indented.
pub fn print_tree(nodes: &[ElementNode]) -> String {
    let mut out = String::new();
    write_nodes(&mut out, nodes, 0);
    out
}

fn write_nodes(out: &mut String, nodes: &[ElementNode], depth: usize) {
    for node in nodes {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&"  ".repeat(depth));
        match node {
            ElementNode::Element(e) => {
                out.push_str(e.tag);
                for attr in &e.attributes {
                    let _ = write!(out, " {}={:?}", attr.name.as_str(), attr.value);
                }
                write_nodes(out, &e.children, depth + 1);
            }
            ElementNode::Text(t) => {
                let _ = write!(out, "{:?}", t.value);
            }
        }
    }
}
