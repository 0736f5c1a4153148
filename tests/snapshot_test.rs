use std::fs;

use navgraph::errors::NavError;
use navgraph::model::{CodeModel, SnapshotModel};
use navgraph::types::*;
use tempfile::TempDir;

fn sample() -> SnapshotModel {
    let mut model = SnapshotModel::new();
    model.insert_symbols([
        Symbol::new("Svc", "Svc", SymbolKind::Class, "java")
            .with_qualified_name("app.Svc")
            .in_file("Svc.java", 1, 40),
        Symbol::new("Svc.run", "run", SymbolKind::Method, "java")
            .in_file("Svc.java", 10, 20)
            .with_signature("void run()")
            .in_container("Svc"),
        Symbol::new("Svc.stop", "stop", SymbolKind::Method, "java")
            .in_file("Svc.java", 22, 30)
            .in_container("Svc"),
    ]);
    model
        .add_call("Svc.run", "Svc.stop", Location::new("Svc.java", 12, 9))
        .add_unresolved_call("Svc.run", "println", Location::new("Svc.java", 13, 9))
        .enable_languages(&["java"]);
    model
}

#[test]
fn test_save_and_load() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("snapshot.json");

    let model = sample();
    model.save(&path).unwrap();
    let loaded = SnapshotModel::load(&path).unwrap();

    assert_eq!(loaded.data(), model.data());
    let run = loaded.symbol(&ElementId::from("Svc.run")).unwrap();
    assert_eq!(run.signature.as_deref(), Some("void run()"));
}

#[test]
fn test_load_minimal_document() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("snapshot.json");
    fs::write(
        &path,
        r#"{
            "symbols": [
                {"id": "m", "name": "main", "kind": "function", "language": "go"}
            ]
        }"#,
    )
    .unwrap();

    let model = SnapshotModel::load(&path).unwrap();
    assert!(model.is_ready());
    assert!(model.language_enabled("go").unwrap());
    assert_eq!(model.symbols(false), vec![ElementId::from("m")]);
}

#[test]
fn test_load_errors_are_config_errors() {
    let tmp = TempDir::new().unwrap();
    let missing = SnapshotModel::load(&tmp.path().join("absent.json"));
    assert!(matches!(missing, Err(NavError::Config { .. })));

    let path = tmp.path().join("bad.json");
    fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
        SnapshotModel::load(&path),
        Err(NavError::Config { .. })
    ));
}

#[test]
fn test_element_at_prefers_declaration_line() {
    let model = sample();
    assert_eq!(
        model.element_at(&Location::new("Svc.java", 10, 1)),
        Some(ElementId::from("Svc.run"))
    );
    assert_eq!(
        model.element_at(&Location::new("Svc.java", 15, 1)),
        Some(ElementId::from("Svc.run"))
    );
    assert_eq!(
        model.element_at(&Location::new("Svc.java", 35, 1)),
        Some(ElementId::from("Svc"))
    );
    assert_eq!(model.element_at(&Location::new("Other.java", 1, 1)), None);
}

#[test]
fn test_calls_resolve_or_report_unresolved() {
    let model = sample();
    let sites = model.call_expressions(&ElementId::from("Svc.run")).unwrap();
    assert_eq!(sites.len(), 2);

    assert_eq!(
        model.resolve_call(&sites[0]).unwrap(),
        Some(ElementId::from("Svc.stop"))
    );
    assert_eq!(model.resolve_call(&sites[1]).unwrap(), None);
}

#[test]
fn test_language_support_flags() {
    let mut model = sample();
    assert!(model.language_enabled("java").unwrap());
    assert!(!model.language_enabled("go").unwrap());

    model.fail_support_check("java");
    assert!(model.language_enabled("java").is_err());
}

#[test]
fn test_members_and_inheritors() {
    let mut model = sample();
    model
        .insert_symbol(Symbol::new("Sub", "Sub", SymbolKind::Class, "java"))
        .add_supertype("Sub", "Svc", EdgeKind::Extends);

    let members = model.members(&ElementId::from("Svc")).unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(
        model.inheritors(&ElementId::from("Svc")).unwrap(),
        vec![ElementId::from("Sub")]
    );
    let edges = model.supertypes(&ElementId::from("Sub")).unwrap();
    assert_eq!(edges[0].kind, EdgeKind::Extends);
}
