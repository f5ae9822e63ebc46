use super::{CodeGenerator, RuntimeIR};
use crate::flags::RuntimeHelper as RH;
use crate::markup::{Element, ElementNode};
use crate::script::{EventBinding, FunctionDef, InitialState};
use crate::util::JsStr;

use std::collections::BTreeSet;
use std::fmt::{self, Write};
use std::marker::PhantomData;

type Output = fmt::Result;

const ROOT_LOOKUP: &str = r#"const root = document.getElementById('plats-root');
if (!root) {
  console.error('[platsweb] missing #plats-root');
  return;
}"#;

const ESCAPE_HTML: &str = r#"function escapeHtml(value) {
  const s = value == null ? '' : String(value);
  return s
    .replaceAll('&', '&amp;')
    .replaceAll('<', '&lt;')
    .replaceAll('>', '&gt;')
    .replaceAll('"', '&quot;')
    .replaceAll("'", '&#39;');
}"#;

const RENDER_TEXT: &str = r#"function renderText(raw) {
  const s = raw == null ? '' : String(raw);
  const re = /\{\{\s*([^\s{}]+)\s*\}\}/g;
  let out = '';
  let last = 0;
  let m;
  while ((m = re.exec(s))) {
    out += escapeHtml(s.slice(last, m.index));
    const value = state[m[1]];
    out += escapeHtml(value == null ? '' : value);
    last = m.index + m[0].length;
  }
  return out + escapeHtml(s.slice(last));
}"#;

const RENDER_ATTRS: &str = r#"function renderAttrs(attrs) {
  let out = '';
  for (const [k, v] of Object.entries(attrs || {})) {
    if (v == null) continue;
    out += ` ${k}="${renderText(v)}"`;
  }
  return out;
}"#;

const RENDER_NODE: &str = r#"function renderNode(node) {
  if (node.t === 'text') return renderText(node.v);
  const attrs = renderAttrs(node.attrs);
  if (node.tag === 'input') return `<input${attrs}>`;
  let inner = '';
  for (const child of node.kids || []) inner += renderNode(child);
  return `<${node.tag}${attrs}>${inner}</${node.tag}>`;
}"#;

const RENDER: &str = r#"function render() {
  let html = '';
  for (const node of TEMPLATE) html += renderNode(node);
  root.innerHTML = html;
}"#;

const SET_STATE: &str = r#"function setState(patch) {
  Object.assign(state, patch || {});
  render();
}"#;

const DOM_HELPERS: &str = r#"const helpers = {
  lees(selector) {
    const el = root.querySelector(selector);
    if (!el) return '';
    if ('value' in el) return el.value;
    return el.textContent == null ? '' : el.textContent;
  },
  zet(selector, value) {
    const el = root.querySelector(selector);
    if (!el) return;
    const text = value == null ? '' : value;
    if ('value' in el) el.value = text;
    else el.textContent = text;
  },
  state,
  staat,
  setState,
};"#;

const BIND_EVENTS_LOOP: &str = r#"for (const spec of specs) {
  const handler = handlers[spec.handler];
  if (typeof handler !== 'function') {
    console.error(`[platsweb] missing handler: ${spec.handler}`);
    continue;
  }
  root.addEventListener(spec.type, (evt) => {
    const target = evt.target && evt.target.closest ? evt.target.closest(spec.selector) : null;
    if (!target || !root.contains(target)) return;
    handler();
  });
}"#;

fn runtime_source(helper: RH) -> &'static str {
    match helper {
        RH::ESCAPE_HTML => ESCAPE_HTML,
        RH::RENDER_TEXT => RENDER_TEXT,
        RH::RENDER_ATTRS => RENDER_ATTRS,
        RH::RENDER_NODE => RENDER_NODE,
        RH::RENDER => RENDER,
        RH::SET_STATE => SET_STATE,
        RH::DOM_HELPERS => DOM_HELPERS,
        _ => panic!("{} has no fixed source", helper.helper_str()),
    }
}

pub struct CodeWriter<'a, T: Write> {
    pub writer: T,
    indent_level: usize,
    helpers: RH,
    p: PhantomData<&'a ()>,
}

impl<'a, T: Write> CodeWriter<'a, T> {
    pub fn new(writer: T) -> Self {
        Self {
            writer,
            indent_level: 0,
            helpers: RH::empty(),
            p: PhantomData,
        }
    }
}

impl<'a, T: Write> CodeGenerator for CodeWriter<'a, T> {
    type IR = RuntimeIR<'a>;
    type Output = Output;
    fn generate(&mut self, ir: Self::IR) -> Self::Output {
        self.helpers = ir.helpers;
        self.generate_prologue()?;
        self.generate_template(ir.nodes)?;
        self.generate_state(&ir.script.initial_state)?;
        for helper in ir.helpers.difference(RH::BIND_EVENTS).iter() {
            self.blank_line()?;
            self.write_lines(runtime_source(helper))?;
        }
        for function in &ir.script.functions {
            self.blank_line()?;
            self.generate_function(function)?;
        }
        if ir.helpers.contains(RH::BIND_EVENTS) {
            self.generate_handlers(&ir.script.functions)?;
            self.generate_bind_events(&ir.script.event_bindings)?;
        }
        self.generate_epilogue()
    }
}

impl<'a, T: Write> CodeWriter<'a, T> {
    fn generate_prologue(&mut self) -> Output {
        self.write_str("// Generated by the Plats compiler")?;
        self.newline()?;
        self.write_str("(() => {")?;
        self.indent()?;
        self.write_str("'use strict';")?;
        self.blank_line()?;
        self.write_lines(ROOT_LOOKUP)
    }
    fn generate_epilogue(&mut self) -> Output {
        self.blank_line()?;
        self.write_str("render();")?;
        if self.helpers.contains(RH::BIND_EVENTS) {
            self.newline()?;
            self.write_str("bindEvents();")?;
        }
        self.deindent()?;
        self.write_str("})();\n")?;
        debug_assert_eq!(self.indent_level, 0);
        Ok(())
    }

    fn generate_template(&mut self, nodes: &[ElementNode]) -> Output {
        self.blank_line()?;
        self.write_str("const TEMPLATE = ")?;
        self.gen_node_list(nodes)?;
        self.write_str(";")
    }
    fn gen_node_list(&mut self, nodes: &[ElementNode]) -> Output {
        self.write_str("[")?;
        for (i, node) in nodes.iter().enumerate() {
            if i > 0 {
                self.write_str(", ")?;
            }
            match node {
                ElementNode::Element(e) => self.gen_element(e)?,
                ElementNode::Text(t) => {
                    self.write_str(r#"{"t": "text", "v": "#)?;
                    self.write_js_str(&t.value)?;
                    self.write_str("}")?;
                }
            }
        }
        self.write_str("]")
    }
    fn gen_element(&mut self, e: &Element) -> Output {
        self.write_str(r#"{"t": "el", "tag": "#)?;
        self.write_js_str(e.tag)?;
        self.write_str(r#", "attrs": {"#)?;
        for (i, attr) in e.attributes.iter().enumerate() {
            if i > 0 {
                self.write_str(", ")?;
            }
            self.write_js_str(attr.name.as_str())?;
            self.write_str(": ")?;
            self.write_js_str(&attr.value)?;
        }
        self.write_str(r#"}, "kids": "#)?;
        self.gen_node_list(&e.children)?;
        self.write_str("}")
    }

    fn generate_state(&mut self, state: &InitialState) -> Output {
        self.blank_line()?;
        if state.is_empty() {
            self.write_str("const state = {};")?;
        } else {
            self.write_str("const state = {")?;
            self.indent()?;
            for (i, entry) in state.iter().enumerate() {
                if i > 0 {
                    self.write_str(",")?;
                    self.newline()?;
                }
                self.write_str(&entry.name)?;
                self.write_str(": ")?;
                self.write_str(&entry.expression)?;
            }
            self.deindent()?;
            self.write_str("};")?;
        }
        self.newline()?;
        self.write_str("const staat = state;")
    }

    fn generate_function(&mut self, f: &FunctionDef) -> Output {
        self.write_str("function ")?;
        self.write_str(&f.name)?;
        self.write_str("(")?;
        for (i, param) in f.params.iter().enumerate() {
            if i > 0 {
                self.write_str(", ")?;
            }
            self.write_str(param)?;
        }
        self.write_str(") {")?;
        if f.body.is_empty() {
            return self.write_str("}");
        }
        self.indent()?;
        self.write_lines(&f.body)?;
        self.deindent()?;
        self.write_str("}")
    }

    fn generate_handlers(&mut self, functions: &[FunctionDef]) -> Output {
        let names: BTreeSet<&str> = functions.iter().map(|f| f.name.as_str()).collect();
        self.blank_line()?;
        self.write_str("const handlers = { ")?;
        for (i, name) in names.into_iter().enumerate() {
            if i > 0 {
                self.write_str(", ")?;
            }
            self.write_str(name)?;
        }
        self.write_str(" };")
    }

    fn generate_bind_events(&mut self, bindings: &[EventBinding]) -> Output {
        self.blank_line()?;
        self.write_str("function ")?;
        self.write_str(RH::BIND_EVENTS.helper_str())?;
        self.write_str("() {")?;
        self.indent()?;
        self.write_str("const specs = [")?;
        for (i, binding) in bindings.iter().enumerate() {
            if i > 0 {
                self.write_str(", ")?;
            }
            self.write_str(r#"{"type": "#)?;
            self.write_js_str(binding.kind.as_str())?;
            self.write_str(r#", "selector": "#)?;
            self.write_js_str(&binding.selector)?;
            self.write_str(r#", "handler": "#)?;
            self.write_js_str(&binding.handler)?;
            self.write_str("}")?;
        }
        self.write_str("];")?;
        self.newline()?;
        self.write_lines(BIND_EVENTS_LOOP)?;
        self.deindent()?;
        self.write_str("}")
    }

    /// Writes a multi-line chunk, each line at the current indentation.
    /// Blank lines carry no indentation.
    fn write_lines(&mut self, src: &str) -> Output {
        let mut lines = src.lines();
        if let Some(first) = lines.next() {
            self.write_str(first)?;
        }
        for line in lines {
            if line.is_empty() {
                self.write_str("\n")?;
            } else {
                self.newline()?;
                self.write_str(line)?;
            }
        }
        Ok(())
    }

    fn blank_line(&mut self) -> Output {
        self.write_str("\n")?;
        self.newline()
    }
    fn newline(&mut self) -> Output {
        self.write_str("\n")?;
        for _ in 0..self.indent_level {
            self.write_str("  ")?;
        }
        Ok(())
    }
    fn indent(&mut self) -> Output {
        self.indent_level += 1;
        self.newline()
    }
    fn deindent(&mut self) -> Output {
        debug_assert!(self.indent_level > 0);
        self.indent_level -= 1;
        self.newline()
    }

    #[inline(always)]
    fn write_str(&mut self, s: &str) -> Output {
        self.writer.write_str(s)
    }
    #[inline(always)]
    fn write_js_str(&mut self, s: &str) -> Output {
        write!(self.writer, "{}", JsStr(s))
    }
}
