use super::common::base_script;
use plats_compiler_core::script::EventKind;

#[test]
fn test_script_model() {
    let model = base_script(
        r##"
// toestand
staat items = []
staat zichtbaar = waar;
staat items = ["a"]

functie voegToe(item, ) {
  staat items = staat.items.concat([item])
  zet("#teller", staat.items.length)
}

bij klik ".toevoegen" -> voegToe()
bij input "#zoek" -> voegToe
"##,
    );
    let state: Vec<_> = model
        .initial_state
        .iter()
        .map(|e| format!("{}={}", e.name, e.expression))
        .collect();
    assert_eq!(state, ["items=[\"a\"]", "zichtbaar=true"]);

    let f = &model.functions[0];
    assert_eq!(f.name, "voegToe");
    assert_eq!(f.params.as_slice(), ["item"]);
    assert_eq!(
        f.body,
        "setState({items: staat.items.concat([item])});\nhelpers.zet(\"#teller\", staat.items.length)"
    );

    let kinds: Vec<_> = model.event_bindings.iter().map(|b| b.kind).collect();
    assert_eq!(kinds, [EventKind::Click, EventKind::Input]);
    assert_eq!(model.event_bindings[0].selector, ".toevoegen");
    assert_eq!(model.event_bindings[1].location.line, 13);
}

#[test]
fn test_function_body_with_nested_braces() {
    let model = base_script(
        r#"functie kies(x) {
  if (x > 1) {
    staat label = "veel }"
  } else {
    staat label = 'weinig {'
  }
}"#,
    );
    assert_eq!(
        model.functions[0].body,
        "if (x > 1) {\n  setState({label: \"veel }\"});\n} else {\n  setState({label: 'weinig {'});\n}"
    );
}
