use std::sync::Arc;

use navgraph::backends::{GoBackend, JvmBackend, PythonBackend};
use navgraph::config::TraversalLimits;
use navgraph::graph::TypeHierarchyBuilder;
use navgraph::model::{ProjectContext, SnapshotModel};
use navgraph::registry::AvailabilityGate;
use navgraph::types::*;

/// Helper: wrap a model in a context with default limits.
fn context(model: SnapshotModel) -> ProjectContext {
    ProjectContext::new(Arc::new(model), TraversalLimits::default())
}

fn jvm() -> JvmBackend {
    JvmBackend::new(AvailabilityGate::fixed("java", true))
}

fn java_type(id: &str, kind: SymbolKind) -> Symbol {
    Symbol::new(id, id, kind, "java").in_file(format!("{id}.java"), 1, 50)
}

fn names(nodes: &[TypeNode]) -> Vec<&str> {
    nodes.iter().map(|n| n.element.name.as_str()).collect()
}

fn all_names(root: &TypeNode) -> Vec<String> {
    let mut nodes = Vec::new();
    root.walk(&mut nodes);
    nodes.iter().map(|n| n.element.name.clone()).collect()
}

/// Number of supertype levels below `node`.
fn height(node: &TypeNode) -> usize {
    node.supertypes.iter().map(|p| height(p) + 1).max().unwrap_or(0)
}

#[test]
fn test_supertypes_and_subtypes() {
    let mut model = SnapshotModel::new();
    model.insert_symbols([
        java_type("Object", SymbolKind::Class).as_library(),
        java_type("Runnable", SymbolKind::Interface),
        java_type("Base", SymbolKind::Class),
        java_type("Sub", SymbolKind::Class),
        java_type("Leaf", SymbolKind::Class),
    ]);
    model
        .add_supertype("Base", "Object", EdgeKind::Extends)
        .add_supertype("Sub", "Base", EdgeKind::Extends)
        .add_supertype("Sub", "Runnable", EdgeKind::Implements)
        .add_supertype("Leaf", "Sub", EdgeKind::Extends);
    let ctx = context(model);
    let backend = jvm();
    let builder = TypeHierarchyBuilder::new(&backend, &ctx);

    let sub = ctx.symbol(&ElementId::from("Sub")).unwrap();
    let tree = builder.build(&sub).unwrap();

    assert_eq!(tree.element.name, "Sub");
    assert_eq!(names(&tree.supertypes), vec!["Base", "Runnable"]);
    assert_eq!(names(&tree.supertypes[0].supertypes), vec!["Object"]);
    assert!(tree.supertypes[0].subtypes.is_none());

    let subtypes = tree.subtypes.unwrap();
    assert_eq!(subtypes.len(), 1);
    assert_eq!(subtypes[0].name, "Leaf");
}

#[test]
fn test_diamond_lists_shared_ancestor_once() {
    let mut model = SnapshotModel::new();
    model.insert_symbols([
        java_type("I", SymbolKind::Interface),
        java_type("J", SymbolKind::Interface),
        java_type("K", SymbolKind::Interface),
        java_type("C", SymbolKind::Class),
    ]);
    model
        .add_supertype("J", "I", EdgeKind::Extends)
        .add_supertype("K", "I", EdgeKind::Extends)
        .add_supertype("C", "J", EdgeKind::Implements)
        .add_supertype("C", "K", EdgeKind::Implements);
    let ctx = context(model);
    let backend = jvm();

    let c = ctx.symbol(&ElementId::from("C")).unwrap();
    let tree = TypeHierarchyBuilder::new(&backend, &ctx).build(&c).unwrap();

    let seen = all_names(&tree);
    assert_eq!(seen.iter().filter(|n| *n == "I").count(), 1);
    assert_eq!(names(&tree.supertypes[0].supertypes), vec!["I"]);
    assert!(tree.supertypes[1].supertypes.is_empty());
}

#[test]
fn test_cyclic_hierarchy_terminates() {
    let mut model = SnapshotModel::new();
    model.insert_symbols([
        java_type("A", SymbolKind::Class),
        java_type("B", SymbolKind::Class),
    ]);
    model
        .add_supertype("A", "B", EdgeKind::Extends)
        .add_supertype("B", "A", EdgeKind::Extends);
    let ctx = context(model);
    let backend = jvm();

    let a = ctx.symbol(&ElementId::from("A")).unwrap();
    let tree = TypeHierarchyBuilder::new(&backend, &ctx).build(&a).unwrap();

    assert_eq!(all_names(&tree), vec!["A", "B"]);
}

#[test]
fn test_non_type_is_not_applicable() {
    let mut model = SnapshotModel::new();
    model.insert_symbol(Symbol::new("A.run", "run", SymbolKind::Method, "java"));
    let ctx = context(model);
    let backend = jvm();

    let run = ctx.symbol(&ElementId::from("A.run")).unwrap();
    assert!(TypeHierarchyBuilder::new(&backend, &ctx).build(&run).is_none());
}

#[test]
fn test_failed_lookup_drops_only_that_branch() {
    let mut model = SnapshotModel::new();
    model.insert_symbols([
        java_type("Top", SymbolKind::Class),
        java_type("Broken", SymbolKind::Interface),
        java_type("Mid", SymbolKind::Class),
        java_type("Sub", SymbolKind::Class),
    ]);
    model
        .add_supertype("Mid", "Top", EdgeKind::Extends)
        .add_supertype("Broken", "Top", EdgeKind::Extends)
        .add_supertype("Sub", "Mid", EdgeKind::Extends)
        .add_supertype("Sub", "Broken", EdgeKind::Implements)
        .mark_broken("Broken");
    let ctx = context(model);
    let backend = jvm();

    let sub = ctx.symbol(&ElementId::from("Sub")).unwrap();
    let tree = TypeHierarchyBuilder::new(&backend, &ctx).build(&sub).unwrap();

    assert_eq!(names(&tree.supertypes), vec!["Mid", "Broken"]);
    assert_eq!(names(&tree.supertypes[0].supertypes), vec!["Top"]);
    assert!(tree.supertypes[1].supertypes.is_empty());
}

#[test]
fn test_depth_is_capped() {
    let mut model = SnapshotModel::new();
    for i in 0..60 {
        model.insert_symbol(java_type(&format!("T{i}"), SymbolKind::Class));
        if i > 0 {
            model.add_supertype(&format!("T{i}"), &format!("T{}", i - 1), EdgeKind::Extends);
        }
    }
    let ctx = context(model);
    let backend = jvm();

    let bottom = ctx.symbol(&ElementId::from("T59")).unwrap();
    let tree = TypeHierarchyBuilder::new(&backend, &ctx).build(&bottom).unwrap();
    assert_eq!(height(&tree), 50);
}

#[test]
fn test_subtypes_are_capped() {
    let mut model = SnapshotModel::new();
    model.insert_symbol(java_type("Base", SymbolKind::Class));
    for i in 0..150 {
        model.insert_symbol(java_type(&format!("S{i}"), SymbolKind::Class));
        model.add_supertype(&format!("S{i}"), "Base", EdgeKind::Extends);
    }
    let ctx = context(model);
    let backend = jvm();

    let base = ctx.symbol(&ElementId::from("Base")).unwrap();
    let tree = TypeHierarchyBuilder::new(&backend, &ctx).build(&base).unwrap();
    assert_eq!(tree.subtypes.unwrap().len(), 100);
}

#[test]
fn test_python_skips_implicit_object() {
    let mut model = SnapshotModel::new();
    model.insert_symbols([
        Symbol::new("object", "object", SymbolKind::Class, "python")
            .with_qualified_name("builtins.object")
            .as_library(),
        Symbol::new("Animal", "Animal", SymbolKind::Class, "python").in_file("zoo.py", 1, 10),
        Symbol::new("Dog", "Dog", SymbolKind::Class, "python").in_file("zoo.py", 12, 20),
    ]);
    model
        .add_supertype("Animal", "object", EdgeKind::Extends)
        .add_supertype("Dog", "Animal", EdgeKind::Extends);
    let ctx = context(model);
    let backend = PythonBackend::new(AvailabilityGate::fixed("python", true));

    let dog = ctx.symbol(&ElementId::from("Dog")).unwrap();
    let tree = TypeHierarchyBuilder::new(&backend, &ctx).build(&dog).unwrap();
    assert_eq!(all_names(&tree), vec!["Dog", "Animal"]);
}

#[test]
fn test_go_embedding_and_interface_satisfaction() {
    let go = |id: &str, kind: SymbolKind, line: u32| {
        Symbol::new(id, id, kind, "go").in_file("store.go", line, line + 5)
    };
    let method = |owner: &str, name: &str, line: u32| {
        Symbol::new(format!("{owner}.{name}"), name, SymbolKind::Method, "go")
            .in_file("store.go", line, line + 2)
            .in_container(owner)
    };

    let mut model = SnapshotModel::new();
    model.insert_symbols([
        go("Closer", SymbolKind::Interface, 1),
        method("Closer", "Close", 2),
        go("base", SymbolKind::Struct, 10),
        method("base", "Close", 20),
        go("Store", SymbolKind::Struct, 30),
        go("Other", SymbolKind::Struct, 40),
    ]);
    model.add_supertype("Store", "base", EdgeKind::Embeds);
    let ctx = context(model);
    let backend = GoBackend::new(AvailabilityGate::fixed("go", true));
    let builder = TypeHierarchyBuilder::new(&backend, &ctx);

    let store = ctx.symbol(&ElementId::from("Store")).unwrap();
    let tree = builder.build(&store).unwrap();
    assert_eq!(names(&tree.supertypes), vec!["base"]);

    let base = ctx.symbol(&ElementId::from("base")).unwrap();
    let subs: Vec<String> = builder.subtypes(&base).into_iter().map(|r| r.name).collect();
    assert_eq!(subs, vec!["Store"]);

    // Closer is satisfied by base directly and by Store through promotion.
    let closer = ctx.symbol(&ElementId::from("Closer")).unwrap();
    let subs: Vec<String> = builder.subtypes(&closer).into_iter().map(|r| r.name).collect();
    assert_eq!(subs, vec!["base", "Store"]);
}
