use super::common::{base_parse, print_tree};
use insta::assert_snapshot;

#[test]
fn test_layout_tree() {
    let nodes = base_parse(
        r#"
# kopregel
rij id:"boven" {
  kop tekst:"Hallo {{ naam }}"
}
kolom class:" kaart " {
  // formulier
  invoer id:"naam" placeholder:"Naam" tekst:"Jan"
  knop id:"ok" class:"primair" tekst:"Ok"
  blok {
    tekst tekst:"regel\teen"
  }
}
"#,
    );
    assert_snapshot!(print_tree(&nodes), @r###"
    div id="boven" class="rij"
      h1
        "Hallo {{ naam }}"
    div class="kaart kolom"
      input id="naam" placeholder="Naam" value="Jan"
      button id="ok" class="primair"
        "Ok"
      div
        p
          "regel\teen"
    "###);
}

#[test]
fn test_attribute_order_is_fixed() {
    let nodes = base_parse(r#"invoer tekst:"v" placeholder:"p" class:"c" id:"i""#);
    assert_eq!(print_tree(&nodes), r#"input id="i" class="c" placeholder="p" value="v""#);
}

#[test]
fn test_repeated_attribute_keeps_last() {
    let nodes = base_parse(r#"knop id:"a" id : "b""#);
    assert_eq!(print_tree(&nodes), r#"button id="b""#);
}

#[test]
fn test_braces_inside_values() {
    let nodes = base_parse("blok {\n  tekst tekst:\"{ niet }\"\n}\ntekst tekst:\"}\"");
    assert_eq!(
        print_tree(&nodes),
        "div\n  p\n    \"{ niet }\"\np\n  \"}\""
    );
}
