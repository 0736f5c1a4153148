use std::sync::Arc;

use navgraph::config::TraversalLimits;
use navgraph::model::{ProjectContext, SnapshotModel};
use navgraph::search::{levenshtein, matches, merge_ranked, search_symbols};
use navgraph::types::*;

fn context(model: SnapshotModel) -> ProjectContext {
    ProjectContext::new(Arc::new(model), TraversalLimits::default())
}

fn class(name: &str, language: &str, line: u32) -> Symbol {
    Symbol::new(name, name, SymbolKind::Class, language).in_file("src/app", line, line + 5)
}

fn any_language(_: &Symbol) -> bool {
    true
}

fn hit(name: &str, file: &str, line: u32) -> SymbolMatch {
    SymbolMatch {
        name: name.to_string(),
        qualified_name: None,
        kind: SymbolKind::Class,
        file: file.to_string(),
        line,
        container_name: None,
        language: "java".to_string(),
    }
}

#[test]
fn test_matcher_properties() {
    assert!(matches("UserService", "USvc"));
    assert!(!matches("UserService", "XY"));
    assert!(matches("UserService", "userserv"));
    assert_eq!(levenshtein("kitten", "sitting"), 3);
}

#[test]
fn test_exact_match_ranks_first() {
    let mut model = SnapshotModel::new();
    model.insert_symbols([
        class("UserServiceImpl", "java", 1),
        class("UserService", "java", 10),
        class("UserServices", "java", 20),
    ]);
    let ctx = context(model);

    let found = search_symbols(&ctx, "userservice", false, 10, any_language);
    let names: Vec<&str> = found.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["UserService", "UserServices", "UserServiceImpl"]);
}

#[test]
fn test_abbreviation_search() {
    let mut model = SnapshotModel::new();
    model.insert_symbols([
        class("UserService", "java", 1),
        class("OrderRepository", "java", 10),
    ]);
    let ctx = context(model);

    let found = search_symbols(&ctx, "USvc", false, 10, any_language);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "UserService");
    assert_eq!(found[0].line, 1);
}

#[test]
fn test_libraries_are_opt_in() {
    let mut model = SnapshotModel::new();
    model.insert_symbols([
        class("ArrayList", "java", 1).as_library(),
        class("ArrayUtils", "java", 10),
    ]);
    let ctx = context(model);

    assert_eq!(search_symbols(&ctx, "Array", false, 10, any_language).len(), 1);
    assert_eq!(search_symbols(&ctx, "Array", true, 10, any_language).len(), 2);
}

#[test]
fn test_limit_and_blank_pattern() {
    let mut model = SnapshotModel::new();
    for i in 0..10 {
        model.insert_symbol(class(&format!("Widget{i}"), "java", i * 10 + 1));
    }
    let ctx = context(model);

    assert_eq!(search_symbols(&ctx, "widget", false, 3, any_language).len(), 3);
    assert!(search_symbols(&ctx, "   ", false, 3, any_language).is_empty());
}

#[test]
fn test_filter_and_container_name() {
    let mut model = SnapshotModel::new();
    model.insert_symbols([
        Symbol::new("py.Parser", "Parser", SymbolKind::Class, "python").in_file("parser.py", 1, 9),
        class("Parser", "java", 20),
        Symbol::new("Parser.parse", "parse", SymbolKind::Method, "java")
            .in_file("src/app", 21, 24)
            .in_container("Parser"),
    ]);
    let ctx = context(model);

    let found = search_symbols(&ctx, "pars", false, 10, |s| s.language == "java");
    assert!(found.iter().all(|m| m.language == "java"));
    let parse = found.iter().find(|m| m.name == "parse").unwrap();
    assert_eq!(parse.container_name.as_deref(), Some("Parser"));
}

#[test]
fn test_merge_dedupes_and_reranks() {
    let first = vec![hit("Cachex", "a.java", 1), hit("Cache", "b.java", 2)];
    let second = vec![hit("Cache", "b.java", 2), hit("cache", "c.ts", 3)];

    let merged = merge_ranked("cache", [first, second], 10);
    let names: Vec<&str> = merged.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Cache", "cache", "Cachex"]);

    let capped = merge_ranked("cache", [merged.clone()], 2);
    assert_eq!(capped.len(), 2);
}

#[test]
fn test_module_level_names_are_searchable() {
    let mut model = SnapshotModel::new();
    model.insert_symbols([
        Symbol::new("MaxRetries", "MaxRetries", SymbolKind::Variable, "go").in_file("retry.go", 3, 3),
        Symbol::new("retry", "retry", SymbolKind::Module, "go").in_file("retry.go", 1, 40),
    ]);
    let ctx = context(model);

    let found = search_symbols(&ctx, "MaxRetries", false, 10, any_language);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].kind, SymbolKind::Variable);

    let found = search_symbols(&ctx, "retry", false, 10, any_language);
    assert_eq!(found[0].name, "retry");
    assert_eq!(found[0].kind, SymbolKind::Module);
}
