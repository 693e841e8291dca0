//! Traversal properties of the resolver, checked against an in-memory host.

use std::path::{Path, PathBuf};
use tortuga_meta::{ModuleBuilder, ModuleIdentity, ModuleImage, TypeKind};
use tortuga_resolve::{
    LoadAttempt, MemoryFailure, MemoryHost, NamespacePrefix, ResolveError, Resolver,
};

/// Module at `/lib/<name>.dll` declaring `classes` and referencing `refs`
fn module(name: &str, classes: &[&str], refs: &[&str]) -> ModuleImage {
    let mut builder = ModuleBuilder::new(ModuleIdentity::new(name));
    for class in classes {
        builder.add_class(*class);
    }
    for r in refs {
        builder.add_reference(*r);
    }
    builder.build(format!("/lib/{}.dll", name)).unwrap()
}

fn names(types: &[tortuga_meta::TypeDescriptor]) -> Vec<&str> {
    types.iter().map(|t| t.full_name.as_str()).collect()
}

#[test]
fn test_cycle_terminates_and_visits_once() {
    let mut host = MemoryHost::new();
    host.add(module("B", &["Acme.B"], &["C"]))
        .add(module("C", &["Acme.C"], &["A", "B"]))
        .add(module("A", &["Acme.A"], &["B"]));
    let root = module("A", &["Acme.A"], &["B"]);

    let resolver = Resolver::new(host);
    let found = resolver
        .find_namespace_types(&root, &NamespacePrefix::new("Acme."), Path::new("/nowhere"))
        .unwrap();

    assert_eq!(names(&found), vec!["Acme.A", "Acme.B", "Acme.C"]);
    assert_eq!(resolver.host().load_count("A"), 0);
    assert_eq!(resolver.host().load_count("B"), 1);
    assert_eq!(resolver.host().load_count("C"), 1);
}

#[test]
fn test_root_type_wins_without_loading_references() {
    let mut host = MemoryHost::new();
    host.add(module("N", &["App.Widget"], &[]));
    let root = module("M", &["App.Widget"], &["N"]);

    let resolver = Resolver::new(host);
    let found = resolver.resolve_type(&root, "App.Widget").unwrap().unwrap();

    assert_eq!(found.module_name(), "M");
    assert!(resolver.host().attempts().is_empty());
}

#[test]
fn test_nested_scenario_returns_root_type() {
    let mut n = ModuleBuilder::new(ModuleIdentity::new("N"));
    n.add_class("App.Widget")
        .add_nested("App.Widget.Gadget", TypeKind::Class, "App.Widget");
    let mut host = MemoryHost::new();
    host.add(n.build("/lib/N.dll").unwrap());
    let root = module("M", &["App.Widget"], &["N"]);

    let resolver = Resolver::new(host);
    let found = resolver.resolve_type(&root, "App.Widget").unwrap().unwrap();

    assert_eq!(found.full_name, "App.Widget");
    assert_eq!(found.module_location(), Path::new("/lib/M.dll"));
    assert_eq!(resolver.host().load_count("N"), 0);
}

#[test]
fn test_diamond_loads_shared_module_once() {
    //     A
    //    / \
    //   B   C
    //    \ /
    //     D
    let mut host = MemoryHost::new();
    host.add(module("B", &[], &["D"]))
        .add(module("C", &[], &["D"]))
        .add(module("D", &["Shared.Thing"], &[]));
    let root = module("A", &[], &["B", "C"]);

    let resolver = Resolver::new(host);
    let found = resolver
        .find_namespace_types(&root, &NamespacePrefix::new("Shared."), Path::new("/nowhere"))
        .unwrap();

    assert_eq!(names(&found), vec!["Shared.Thing"]);
    assert_eq!(resolver.host().load_count("D"), 1);
    assert_eq!(resolver.host().loaded(), vec!["B", "D", "C"]);
}

#[test]
fn test_type_found_in_reference_depth_first() {
    // A -> [B, C]; B -> D; both C and D declare the type; D is reached first.
    let mut host = MemoryHost::new();
    host.add(module("B", &[], &["D"]))
        .add(module("C", &["Lib.Thing"], &[]))
        .add(module("D", &["Lib.Thing"], &[]));
    let root = module("A", &[], &["B", "C"]);

    let resolver = Resolver::new(host);
    let found = resolver.resolve_type(&root, "Lib.Thing").unwrap().unwrap();

    assert_eq!(found.module_name(), "D");
    assert_eq!(resolver.host().load_count("C"), 0);
}

#[test]
fn test_missing_type_is_none() {
    let mut host = MemoryHost::new();
    host.add(module("B", &["Lib.Other"], &[]));
    let root = module("A", &[], &["B", "Ghost"]);

    let resolver = Resolver::new(host);
    assert!(resolver.resolve_type(&root, "Lib.Thing").unwrap().is_none());
}

#[test]
fn test_prefix_boundary() {
    let mut host = MemoryHost::new();
    host.add(module("N", &["Foo", "Foo.Bar", "FooBar.Baz"], &[]));
    let root = module("M", &[], &["N"]);

    let resolver = Resolver::new(host);
    let found = resolver.resolve_namespace_types(&root, "Foo").unwrap();
    assert_eq!(names(&found), vec!["Foo.Bar"]);
}

#[test]
fn test_namespace_scenario_excludes_siblings_and_nested() {
    let mut n = ModuleBuilder::new(ModuleIdentity::new("N"));
    n.add_class("Acme.Foo")
        .add_class("Acme.FooExtra")
        .add_nested("Acme.Foo.Inner", TypeKind::Class, "Acme.Foo");
    let mut host = MemoryHost::new();
    host.add(n.build("/lib/N.dll").unwrap());
    let root = module("M", &[], &["N"]);

    let resolver = Resolver::new(host);
    let found = resolver
        .find_namespace_types(&root, &NamespacePrefix::new("Acme.Foo"), root.location())
        .unwrap();
    assert_eq!(names(&found), vec!["Acme.Foo"]);
}

#[test]
fn test_namespace_separator_is_always_appended() {
    let mut host = MemoryHost::new();
    host.add(module("N", &["Acme.Foo", "Global"], &[]));
    let root = module("M", &[], &["N"]);

    let resolver = Resolver::new(host);
    assert!(resolver.resolve_namespace_types(&root, "").unwrap().is_empty());
    assert!(resolver.resolve_namespace_types(&root, "Acme.").unwrap().is_empty());
    assert_eq!(
        names(&resolver.resolve_namespace_types(&root, "Acme").unwrap()),
        vec!["Acme.Foo"]
    );
}

#[test]
fn test_plain_class_shadowing_nested_name_is_kept() {
    let mut n = ModuleBuilder::new(ModuleIdentity::new("N"));
    n.add_class("Acme.Outer")
        .add_nested("Acme.Outer.X", TypeKind::Class, "Acme.Outer");
    let mut host = MemoryHost::new();
    host.add(n.build("/lib/N.dll").unwrap())
        .add(module("O", &["Acme.Outer.X"], &[]));
    let root = module("M", &[], &["N", "O"]);

    let resolver = Resolver::new(host);
    let found = resolver
        .find_namespace_types(&root, &NamespacePrefix::new("Acme.Outer."), root.location())
        .unwrap();
    let found: Vec<_> = found
        .iter()
        .map(|t| (t.full_name.as_str(), t.module_name()))
        .collect();
    assert_eq!(found, vec![("Acme.Outer.X", "O")]);
}

#[test]
fn test_long_reference_chain() {
    let mut host = MemoryHost::new();
    for i in 1..200 {
        let refs = [format!("M{}", i + 1)];
        let classes: &[&str] = if i == 199 { &["Deep.Leaf"] } else { &[] };
        let refs: Vec<&str> = refs.iter().map(String::as_str).collect();
        host.add(module(&format!("M{}", i), classes, &refs));
    }
    host.add(module("M200", &[], &[]));
    let root = module("M0", &[], &["M1"]);

    let resolver = Resolver::new(host);
    let found = resolver.resolve_type(&root, "Deep.Leaf").unwrap().unwrap();
    assert_eq!(found.module_name(), "M199");
    assert_eq!(resolver.host().load_count("M200"), 0);
}

#[test]
fn test_location_exclusion() {
    let mut host = MemoryHost::new();
    host.add(module("B", &["Acme.B"], &[]))
        .add(module("C", &["Acme.C"], &[]));
    let root = module("A", &["Acme.A"], &["B", "C"]);

    let resolver = Resolver::new(host);
    let found = resolver
        .find_namespace_types(&root, &NamespacePrefix::new("Acme."), Path::new("/lib/B.dll"))
        .unwrap();
    assert_eq!(names(&found), vec!["Acme.A", "Acme.C"]);
}

#[test]
fn test_duplicates_across_modules_are_kept() {
    let mut host = MemoryHost::new();
    host.add(module("B", &["Acme.Twin"], &[]))
        .add(module("C", &["Acme.Twin"], &[]));
    let root = module("A", &[], &["B", "C"]);

    let resolver = Resolver::new(host);
    let found = resolver.resolve_namespace_types(&root, "Acme").unwrap();
    let owners: Vec<_> = found.iter().map(|t| t.module_name()).collect();
    assert_eq!(owners, vec!["B", "C"]);
}

#[test]
fn test_unloadable_branch_does_not_hide_sibling() {
    let mut host = MemoryHost::new();
    host.fail_identity("Broken", MemoryFailure::Conflict)
        .add(module("Good", &["Lib.Thing"], &[]));
    let root = module("A", &[], &["Broken", "Good"]);

    let resolver = Resolver::new(host);
    let found = resolver.resolve_type(&root, "Lib.Thing").unwrap().unwrap();
    assert_eq!(found.module_name(), "Good");
    assert!(resolver
        .host()
        .attempts()
        .contains(&LoadAttempt::Path(PathBuf::from("/lib/Broken.exe"))));
}

#[test]
fn test_unexpected_failure_propagates() {
    let mut host = MemoryHost::new();
    host.fail_path("/lib/Bad.dll", MemoryFailure::Malformed)
        .add(module("Good", &["Lib.Thing"], &[]));
    let root = module("A", &[], &["Bad", "Good"]);

    let resolver = Resolver::new(host);
    let result = resolver.resolve_type(&root, "Lib.Thing");
    match result {
        Err(ResolveError::Load { reference, .. }) => assert_eq!(reference, "Bad"),
        other => panic!("Expected Load error, got {:?}", other),
    }
}

#[test]
fn test_file_fallback_uses_referrer_directory() {
    // B lives in /plugins, so its reference to C is probed there.
    let b = {
        let mut builder = ModuleBuilder::new(ModuleIdentity::new("B"));
        builder.add_reference("C");
        builder.build("/plugins/B.dll").unwrap()
    };
    let c = {
        let mut builder = ModuleBuilder::new(ModuleIdentity::new("C"));
        builder.add_class("Plug.Thing");
        builder.build("/plugins/C.exe").unwrap()
    };
    let mut host = MemoryHost::new();
    host.install(b).place(c);
    let root = module("A", &[], &["B"]);

    let resolver = Resolver::new(host);
    let found = resolver.resolve_type(&root, "Plug.Thing").unwrap().unwrap();
    assert_eq!(found.module_location(), Path::new("/plugins/C.exe"));
    assert_eq!(
        resolver.host().attempts(),
        vec![
            LoadAttempt::Identity("B".to_string()),
            LoadAttempt::Identity("C".to_string()),
            LoadAttempt::Path(PathBuf::from("/plugins/C.dll")),
            LoadAttempt::Path(PathBuf::from("/plugins/C.exe")),
        ]
    );
}
