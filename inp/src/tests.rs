use crate::prelude::*;
use crate::util::*;

/// Parses a deck from an in-memory string.
fn parse(deck: &str) -> MaterialSet {
  return DeckParser::parse_reader(deck.as_bytes()).expect("parse failed");
}

#[test]
fn test_clean_line() {
  assert_eq!(clean_line(""), None);
  assert_eq!(clean_line("   \t  "), None);
  assert_eq!(clean_line("** a comment"), None);
  assert_eq!(clean_line("  ** indented comment"), None);
  assert_eq!(clean_line("*ELASTIC"), Some("*ELASTIC"));
  assert_eq!(clean_line("  210000.0, 0.3  "), Some("210000.0, 0.3"));
  assert_eq!(clean_line("7850.0 ** density of steel"), Some("7850.0"));
  assert_eq!(clean_line("   ** only spaces before"), None);
  assert_eq!(clean_line("abc **"), Some("abc"));
}

#[test]
fn test_keyword_attr() {
  let attr = |l, k| keyword_attr(l, k);
  assert_eq!(attr("*MATERIAL, name=Steel", "name"), Some("Steel"));
  assert_eq!(attr("*MATERIAL, NAME = Steel", "name"), Some("Steel"));
  assert_eq!(attr("*MATERIAL,name=Steel,misc=1", "name"), Some("Steel"));
  assert_eq!(attr("*ELASTIC, TYPE=ISOTROPIC", "type"), Some("ISOTROPIC"));
  assert_eq!(attr("*MATERIAL", "name"), None);
  assert_eq!(attr("*MATERIAL, name=", "name"), None);
  assert_eq!(attr("*MATERIAL, name = , misc=1", "name"), None);
  // a malformed occurrence doesn't stop the scan
  assert_eq!(attr("*FOO, rename=, name=Steel", "name"), Some("Steel"));
}

#[test]
fn test_first_integer() {
  assert_eq!(first_integer("*DEPVAR"), None);
  assert_eq!(first_integer("15"), Some(15));
  assert_eq!(first_integer("  15  "), Some(15));
  assert_eq!(first_integer("*DEPVAR 20"), Some(20));
  assert_eq!(first_integer("abc 42 def 7"), Some(42));
  assert_eq!(first_integer("no digits here"), None);
}

#[test]
fn test_title_case() {
  assert_eq!(title_case("mooney-rivlin"), "Mooney-Rivlin");
  assert_eq!(title_case("neo hooke"), "Neo Hooke");
  assert_eq!(title_case("OGDEN"), "Ogden");
  assert_eq!(title_case("yeoh"), "Yeoh");
}

#[test]
fn test_classify_keywords() {
  // every property keyword resolves to its own kind
  for kind in PropertyKind::all() {
    match classify(kind.keyword()) {
      Keyword::PropertyStart(got, _) => assert_eq!(got, *kind),
      other => panic!("{} classified as {:?}", kind.keyword(), other)
    };
  }
  // every boundary keyword closes the section, lower-cased too
  for kw in BOUNDARY_KEYWORDS {
    assert_eq!(classify(kw), Keyword::SectionBoundary);
    assert_eq!(classify(&kw.to_ascii_lowercase()), Keyword::SectionBoundary);
  }
  // multi-word property keywords win over their shorter lookalikes
  assert!(matches!(
    classify("*SPECIFIC HEAT"),
    Keyword::PropertyStart(PropertyKind::SpecificHeat, _)
  ));
  assert!(matches!(
    classify("*SOLID SECTION, ELSET=E1"),
    Keyword::SectionBoundary
  ));
  assert_eq!(classify("*RANDOM NONSENSE"), Keyword::Other);
  assert_eq!(
    classify("*MATERIAL, name=Steel"),
    Keyword::MaterialStart(Some("Steel".into()))
  );
  assert_eq!(classify("*MATERIAL"), Keyword::MaterialStart(None));
}

#[test]
fn test_data_row_coercion() {
  let numeric = |l: &str| DataRow::from_line(l).expect("expected a row");
  assert_eq!(numeric("210000.0, 0.3"), DataRow::Numeric(vec![210000.0, 0.3]));
  assert_eq!(numeric("1e5, -2.5, +3"), DataRow::Numeric(vec![1e5, -2.5, 3.0]));
  // empty tokens get dropped before coercion
  assert_eq!(numeric("1.0, ,2.0,"), DataRow::Numeric(vec![1.0, 2.0]));
  // one bad field keeps the whole row as strings
  assert_eq!(
    numeric("A, B, 1.0"),
    DataRow::Text(vec!["A".into(), "B".into(), "1.0".into()])
  );
  assert_eq!(DataRow::from_line(","), None);
  assert_eq!(DataRow::from_line(" , , "), None);
}

#[test]
fn test_empty_deck() {
  assert!(parse("").is_empty());
  assert!(parse("** nothing but comments\n** and more\n").is_empty());
  // no material keyword at all, only stray data and keywords
  assert!(parse("*ELASTIC\n210000.0, 0.3\n*STEP\n").is_empty());
}

#[test]
fn test_boundary_scenario() {
  let deck = concat!(
    "*MATERIAL, name=Steel\n",
    "*ELASTIC, TYPE=ISOTROPIC\n",
    "210000.0, 0.3\n",
    "*DENSITY\n",
    "7850.0\n",
    "*STEP\n",
    "1.0, 2.0\n"
  );
  let set = parse(deck);
  assert_eq!(set.len(), 1);
  let steel = set.get("Steel").expect("no Steel");
  let keys: Vec<&str> = steel.keys().map(String::as_str).collect();
  assert_eq!(keys, ["Elastic", "Elastic_Type", "Density"]);
  assert_eq!(
    steel.get("Elastic"),
    Some(&PropertyValue::Rows(vec![DataRow::Numeric(vec![210000.0, 0.3])]))
  );
  assert_eq!(
    steel.get("Elastic_Type"),
    Some(&PropertyValue::Text("ISOTROPIC".into()))
  );
  // the stray data line after *STEP must not have landed anywhere
  assert_eq!(
    steel.get("Density"),
    Some(&PropertyValue::Rows(vec![DataRow::Numeric(vec![7850.0])]))
  );
}

#[test]
fn test_mixed_row_kept_as_strings() {
  let deck = "*MATERIAL, name=M\n*PLASTIC\nA, B, 1.0\n250.0, 0.0\n";
  let set = parse(deck);
  let expected = PropertyValue::Rows(vec![
    DataRow::Text(vec!["A".into(), "B".into(), "1.0".into()]),
    DataRow::Numeric(vec![250.0, 0.0])
  ]);
  assert_eq!(set.get("M").unwrap().get("Plastic"), Some(&expected));
}

#[test]
fn test_depvar_on_next_line() {
  let deck = "*MATERIAL, name=M\n*DEPVAR\n15\n";
  let set = parse(deck);
  let m = set.get("M").unwrap();
  assert_eq!(m.get("Depvar"), Some(&PropertyValue::Integer(15)));
  // no row list, and no data state left open afterwards
  let deck = "*MATERIAL, name=M\n*DEPVAR\n15\n20\n";
  let set = parse(deck);
  let m = set.get("M").unwrap();
  assert_eq!(m.get("Depvar"), Some(&PropertyValue::Integer(15)));
  assert_eq!(m.len(), 1);
}

#[test]
fn test_depvar_inline() {
  let deck = "*MATERIAL, name=M\n*DEPVAR 20\n15\n";
  let set = parse(deck);
  let m = set.get("M").unwrap();
  // the keyword line's integer wins and the next line is dropped
  assert_eq!(m.get("Depvar"), Some(&PropertyValue::Integer(20)));
  assert_eq!(m.len(), 1);
}

#[test]
fn test_material_redeclaration() {
  let deck = concat!(
    "*MATERIAL, name=X\n",
    "*DENSITY\n",
    "7850.0\n",
    "*MATERIAL, name=X\n",
    "*CONDUCTIVITY\n",
    "45.0\n"
  );
  let set = parse(deck);
  assert_eq!(set.len(), 1);
  let x = set.get("X").unwrap();
  // the second block fully replaces the first
  assert_eq!(x.get("Density"), None);
  assert_eq!(
    x.get("Conductivity"),
    Some(&PropertyValue::Rows(vec![DataRow::Numeric(vec![45.0])]))
  );
}

#[test]
fn test_idempotence() {
  let deck = concat!(
    "*MATERIAL, name=Steel\n",
    "*ELASTIC, TYPE=ISOTROPIC\n",
    "210000.0, 0.3\n",
    "*MATERIAL, name=Rubber\n",
    "*HYPERELASTIC, OGDEN\n",
    "1.0, 2.0, 3.0\n"
  );
  let first = parse(deck);
  let second = parse(deck);
  assert_eq!(first, second);
  // order-sensitive comparison via the serialised form
  let a = serde_json::to_string(&first).unwrap();
  let b = serde_json::to_string(&second).unwrap();
  assert_eq!(a, b);
}

#[test]
fn test_unknown_keyword_detaches_property() {
  let deck = concat!(
    "*MATERIAL, name=M\n",
    "*DENSITY\n",
    "7850.0\n",
    "*SOMETHING ELSE\n",
    "1.0, 2.0\n",
    "*CONDUCTIVITY\n",
    "45.0\n"
  );
  let set = parse(deck);
  let m = set.get("M").unwrap();
  // the 1.0, 2.0 line had no active property and must be gone
  assert_eq!(
    m.get("Density"),
    Some(&PropertyValue::Rows(vec![DataRow::Numeric(vec![7850.0])]))
  );
  // but the material stayed open for later properties
  assert_eq!(
    m.get("Conductivity"),
    Some(&PropertyValue::Rows(vec![DataRow::Numeric(vec![45.0])]))
  );
}

#[test]
fn test_unnamed_material_is_inert() {
  let deck = concat!(
    "*MATERIAL, name=M\n",
    "*DENSITY\n",
    "7850.0\n",
    "*MATERIAL\n",
    "7900.0\n"
  );
  let set = parse(deck);
  assert_eq!(set.len(), 1);
  // a nameless material keyword changes nothing, data keeps flowing
  let expected = PropertyValue::Rows(vec![
    DataRow::Numeric(vec![7850.0]),
    DataRow::Numeric(vec![7900.0])
  ]);
  assert_eq!(set.get("M").unwrap().get("Density"), Some(&expected));
}

#[test]
fn test_hyperelastic_model_detection() {
  let model = |deck: &str| -> Option<PropertyValue> {
    return parse(deck)
      .get("M")
      .and_then(|m| m.get("Hyperelastic_Model"))
      .cloned();
  };
  let m = "*MATERIAL, name=M\n";
  assert_eq!(
    model(&format!("{}*HYPERELASTIC, NEO HOOKE\n", m)),
    Some(PropertyValue::Text("Neo Hooke".into()))
  );
  // spaces don't matter
  assert_eq!(
    model(&format!("{}*HYPERELASTIC, NEOHOOKE\n", m)),
    Some(PropertyValue::Text("Neo Hooke".into()))
  );
  assert_eq!(
    model(&format!("{}*HYPERELASTIC, MOONEY-RIVLIN\n", m)),
    Some(PropertyValue::Text("Mooney-Rivlin".into()))
  );
  // first match in the model table wins
  assert_eq!(
    model(&format!("{}*HYPERELASTIC, YEOH OGDEN\n", m)),
    Some(PropertyValue::Text("Ogden".into()))
  );
  assert_eq!(model(&format!("{}*HYPERELASTIC\n", m)), None);
}

#[test]
fn test_user_material() {
  let deck = concat!(
    "*MATERIAL, name=M\n",
    "*USER MATERIAL, CONSTANTS=8\n",
    "1.0, 2.0, 3.0, 4.0\n",
    "5.0, 6.0, 7.0, 8.0\n"
  );
  let set = parse(deck);
  let m = set.get("M").unwrap();
  assert_eq!(
    m.get("User_Material_Constants"),
    Some(&PropertyValue::Integer(8))
  );
  let rows = match m.get("User_Material") {
    Some(PropertyValue::Rows(rows)) => rows,
    other => panic!("bad User_Material value: {:?}", other)
  };
  assert_eq!(rows.len(), 2);
}

#[test]
fn test_name_case_preserved() {
  let set = parse("*MATERIAL, name=SteelAlloy_2b\n");
  assert!(set.get("SteelAlloy_2b").is_some());
  assert!(set.get("steelalloy_2b").is_none());
}

#[test]
fn test_section_boundary_closes_scope() {
  let deck = concat!(
    "*MATERIAL, name=M\n",
    "*STEP\n",
    "*ELASTIC\n",
    "210000.0, 0.3\n"
  );
  let set = parse(deck);
  // after *STEP nothing else gets attributed to M
  assert!(set.get("M").unwrap().is_empty());
}

#[test]
fn test_lenient_decoding() {
  let bytes: &[u8] = b"*MATERIAL, name=St\xFFeel\n*DENSITY\n7850.0\n";
  let set = DeckParser::parse_reader(bytes).expect("parse failed");
  // the invalid byte is dropped, not replaced
  assert!(set.get("Steel").is_some());
}

#[test]
fn test_crlf_line_endings() {
  let deck = "*MATERIAL, name=M\r\n*DENSITY\r\n7850.0\r\n";
  let set = parse(deck);
  assert_eq!(
    set.get("M").unwrap().get("Density"),
    Some(&PropertyValue::Rows(vec![DataRow::Numeric(vec![7850.0])]))
  );
}

#[test]
fn test_parser_responses() {
  let mut parser = DeckParser::new();
  assert_eq!(parser.consume("** comment"), ParserResponse::Skipped);
  assert_eq!(parser.consume("1.0, 2.0"), ParserResponse::DroppedData);
  assert_eq!(
    parser.consume("*MATERIAL, name=M"),
    ParserResponse::NewMaterial("M".into())
  );
  assert_eq!(
    parser.consume("*ELASTIC"),
    ParserResponse::BeginProperty(PropertyKind::Elastic)
  );
  assert_eq!(parser.consume("210000.0, 0.3"), ParserResponse::Row(2));
  assert_eq!(parser.consume("*WHATEVER"), ParserResponse::InertKeyword);
  assert_eq!(parser.consume("1.0"), ParserResponse::DroppedData);
  assert_eq!(parser.consume("*STEP"), ParserResponse::SectionEnd);
  assert_eq!(parser.consume("*STEP"), ParserResponse::InertKeyword);
  let set = parser.finish();
  assert_eq!(set.len(), 1);
}

#[test]
fn test_json_roundtrip() {
  let deck = concat!(
    "*MATERIAL, name=Steel\n",
    "*ELASTIC, TYPE=ISOTROPIC\n",
    "210000.0, 0.3\n",
    "*PLASTIC, HARDENING=KINEMATIC\n",
    "A, B, 1.0\n",
    "250.0, 0.0\n",
    "*DEPVAR\n",
    "15\n"
  );
  let set = parse(deck);
  let dir = tempfile::tempdir().expect("no temp dir");
  let path = dir.path().join("materials.json");
  set.save_json(&path).expect("save failed");
  let back = MaterialSet::load_json(&path).expect("load failed");
  assert_eq!(set, back);
  // numeric rows stay numeric, string rows stay string, order holds
  let a = serde_json::to_string(&set).unwrap();
  let b = serde_json::to_string(&back).unwrap();
  assert_eq!(a, b);
}

#[test]
fn test_load_json_missing_file() {
  let dir = tempfile::tempdir().expect("no temp dir");
  let missing = dir.path().join("nope.json");
  assert!(MaterialSet::load_json(missing).is_err());
}
