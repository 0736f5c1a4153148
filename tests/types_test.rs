use navgraph::types::*;
use serde_json::json;

#[test]
fn test_symbol_kind_from_str_unknown_returns_none() {
    assert!(SymbolKind::from_str("unknown_kind").is_none());
    assert!(SymbolKind::from_str("").is_none());
}

#[test]
fn test_type_and_callable_kinds_are_disjoint() {
    for kind in [
        SymbolKind::Class,
        SymbolKind::Interface,
        SymbolKind::Struct,
        SymbolKind::Enum,
        SymbolKind::TypeAlias,
    ] {
        assert!(kind.is_type());
        assert!(!kind.is_callable());
    }
    for kind in [SymbolKind::Function, SymbolKind::Method, SymbolKind::Constructor] {
        assert!(kind.is_callable());
        assert!(!kind.is_type());
    }
    assert!(!SymbolKind::Field.is_type());
    assert!(!SymbolKind::Field.is_callable());
}

#[test]
fn test_type_node_serializes_flat() {
    let base = Symbol::new("b", "Base", SymbolKind::Class, "java").in_file("Base.java", 1, 9);
    let sub = Symbol::new("s", "Sub", SymbolKind::Class, "java").in_file("Sub.java", 2, 9);
    let node = TypeNode {
        element: ElementReference::from(&sub),
        supertypes: vec![TypeNode::leaf(ElementReference::from(&base))],
        subtypes: Some(Vec::new()),
    };

    let value = serde_json::to_value(&node).unwrap();
    assert_eq!(value["name"], "Sub");
    assert_eq!(value["kind"], "class");
    assert_eq!(value["line"], 2);
    assert_eq!(value["supertypes"][0]["name"], "Base");
    assert!(value["supertypes"][0].get("subtypes").is_none());
    assert_eq!(value["subtypes"], json!([]));
}

#[test]
fn test_call_node_omits_empty_children() {
    let f = Symbol::new("f", "f", SymbolKind::Function, "go");
    let value = serde_json::to_value(CallNode::leaf(ElementReference::from(&f))).unwrap();
    assert!(value.get("children").is_none());
    assert!(value.get("file").is_none());
}

#[test]
fn test_symbol_deserializes_with_defaults() {
    let sym: Symbol = serde_json::from_value(json!({
        "id": "pkg.Run",
        "name": "Run",
        "kind": "function",
        "language": "go"
    }))
    .unwrap();
    assert_eq!(sym.id.as_str(), "pkg.Run");
    assert!(sym.file.is_none());
    assert!(!sym.library);
}

#[test]
fn test_symbol_match_identity_matches_reference_identity() {
    let sym = Symbol::new("u", "UserService", SymbolKind::Class, "java")
        .with_qualified_name("app.UserService")
        .in_file("UserService.java", 4, 40);
    let m = SymbolMatch {
        name: sym.name.clone(),
        qualified_name: sym.qualified_name.clone(),
        kind: sym.kind,
        file: "UserService.java".to_string(),
        line: 4,
        container_name: None,
        language: "java".to_string(),
    };
    assert_eq!(m.identity(), ElementReference::from(&sym).identity());
}
