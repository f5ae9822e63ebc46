use super::common::{base_parse, base_script};
use plats_compiler_core::codegen::{generate, CodeGenerateOption};
use rslint_parser::parse_text;

fn test_codegen(markup: &str, script: &str) -> String {
    let nodes = base_parse(markup);
    let model = base_script(script);
    let out = generate(&nodes, &model, "", &CodeGenerateOption::default()).unwrap();
    let parsed = parse_text(&out.script, 0);
    assert!(parsed.errors().is_empty(), "{}", out.script);
    out.script
}

#[test]
fn test_generated_scripts_parse() {
    let cases = [
        ("", ""),
        (r#"tekst tekst:"a \"quoted\" {{ b }}""#, "staat b = 'x'"),
        (
            "rij {\n  invoer id:\"i\"\n  knop id:\"k\" tekst:\"Go\"\n}",
            "staat n = 0\nfunctie go() {\n  staat n = staat.n + 1\n}\nbij klik \"#k\" -> go()",
        ),
        (
            "blok",
            "functie f(a, b) {\n  const t = `waar ${a}\nonwaar`\n  zet(\"#x\", t + b)\n}",
        ),
    ];
    for (markup, script) in cases {
        test_codegen(markup, script);
    }
}

#[test]
fn test_unicode_text() {
    let js = test_codegen("kop tekst:\"Dag wereld \u{1F44B} \u{2028}\"", "");
    assert!(js.contains("\"Dag wereld \u{1F44B} \\u2028\""), "{}", js);
}
