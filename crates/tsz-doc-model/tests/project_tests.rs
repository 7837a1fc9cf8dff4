use super::*;
use tsz_doc_source::SymbolId;

fn class_with_member(project: &mut ProjectReflection) -> (ReflectionId, ReflectionId) {
    let class = project.register_reflection(
        Reflection::declaration("Foo", ReflectionKind::Class, ReflectionId::ROOT),
        Some(SymbolId(1)),
    );
    project.add_child(ReflectionId::ROOT, class);
    let method = project.register_reflection(
        Reflection::declaration("bar", ReflectionKind::Method, class),
        Some(SymbolId(2)),
    );
    project.add_child(class, method);
    (class, method)
}

#[test]
fn test_new_project_has_root() {
    let project = ProjectReflection::new("docs");
    let root = project.root().expect("root exists");
    assert_eq!(root.id, ReflectionId::ROOT);
    assert_eq!(root.kind, ReflectionKind::Project);
    assert_eq!(project.name(), "docs");
    assert!(project.is_empty());
}

#[test]
fn test_register_assigns_sequential_ids() {
    let mut project = ProjectReflection::new("docs");
    let (class, method) = class_with_member(&mut project);
    assert_eq!(class, ReflectionId(1));
    assert_eq!(method, ReflectionId(2));
    assert_eq!(project.get(method).expect("method").id, method);
    assert_eq!(project.len(), 3);
}

#[test]
fn test_first_registration_owns_symbol() {
    let mut project = ProjectReflection::new("docs");
    let first = project.register_reflection(
        Reflection::declaration("a", ReflectionKind::Variable, ReflectionId::ROOT),
        Some(SymbolId(7)),
    );
    let second = project.register_reflection(
        Reflection::declaration("b", ReflectionKind::Variable, ReflectionId::ROOT),
        Some(SymbolId(7)),
    );
    assert_eq!(project.reflection_from_symbol(SymbolId(7)), Some(first));
    assert_eq!(project.symbol_from_reflection(first), Some(SymbolId(7)));
    assert_eq!(project.symbol_from_reflection(second), None);
    assert!(!project.link_symbol(second, SymbolId(7)));
}

#[test]
fn test_add_child_ignores_non_containers() {
    let mut project = ProjectReflection::new("docs");
    let (_, method) = class_with_member(&mut project);
    let signature = project.register_reflection(
        Reflection::signature("bar", ReflectionKind::CallSignature, method),
        None,
    );
    let parameter =
        project.register_reflection(Reflection::parameter("x", signature), None);
    assert!(!project.add_child(signature, parameter));
    assert!(project.children(signature).is_empty());
}

#[test]
fn test_find_and_full_name() {
    let mut project = ProjectReflection::new("docs");
    let (class, method) = class_with_member(&mut project);
    assert_eq!(project.find("Foo"), Some(class));
    assert_eq!(project.find("Foo.bar"), Some(method));
    assert_eq!(project.find("Foo.baz"), None);
    assert_eq!(project.full_name(method), "Foo.bar");
}

#[test]
fn test_remove_reflection_drops_subtree_and_mappings() {
    let mut project = ProjectReflection::new("docs");
    let (class, method) = class_with_member(&mut project);
    let signature = project.register_reflection(
        Reflection::signature("bar", ReflectionKind::CallSignature, method),
        None,
    );
    project
        .get_mut(method)
        .and_then(Reflection::as_declaration_mut)
        .expect("method is a declaration")
        .signatures
        .push(signature);

    assert_eq!(project.remove_reflection(class), 3);
    assert!(!project.contains(class));
    assert!(!project.contains(method));
    assert!(!project.contains(signature));
    assert!(project.children(ReflectionId::ROOT).is_empty());
    assert_eq!(project.reflection_from_symbol(SymbolId(1)), None);
    assert_eq!(project.reflection_from_symbol(SymbolId(2)), None);
}

#[test]
fn test_remove_detaches_from_parent() {
    let mut project = ProjectReflection::new("docs");
    let (class, method) = class_with_member(&mut project);
    assert_eq!(project.remove_reflection(method), 1);
    assert!(project.children(class).is_empty());
    assert!(project.contains(class));
}

#[test]
fn test_root_cannot_be_removed() {
    let mut project = ProjectReflection::new("docs");
    assert_eq!(project.remove_reflection(ReflectionId::ROOT), 0);
    assert!(project.root().is_some());
}

#[test]
fn test_resolve_alias_deep_follows_references() {
    let mut project = ProjectReflection::new("docs");
    let (class, _) = class_with_member(&mut project);
    let by_symbol = project.register_reflection(
        Reflection::reference("Alias", ReferenceTarget::Symbol(SymbolId(1)), ReflectionId::ROOT),
        None,
    );
    let chained = project.register_reflection(
        Reflection::reference("Alias2", ReferenceTarget::Reflection(by_symbol), ReflectionId::ROOT),
        None,
    );
    assert_eq!(project.resolve_alias_deep(chained), Some(class));
    assert_eq!(project.resolve_alias_deep(class), Some(class));
}

#[test]
fn test_resolve_alias_deep_stops_on_cycle() {
    let mut project = ProjectReflection::new("docs");
    let a = project.register_reflection(
        Reflection::reference("A", ReferenceTarget::Reflection(ReflectionId(2)), ReflectionId::ROOT),
        None,
    );
    let b = project.register_reflection(
        Reflection::reference("B", ReferenceTarget::Reflection(a), ReflectionId::ROOT),
        None,
    );
    assert_eq!(b, ReflectionId(2));
    assert_eq!(project.resolve_alias_deep(a), None);
}

#[test]
fn test_reference_equals_resolves_symbol_targets() {
    let mut project = ProjectReflection::new("docs");
    let (class, _) = class_with_member(&mut project);
    let by_reflection = ReferenceType::new("Foo", ReferenceTarget::Reflection(class));
    let by_symbol = ReferenceType::new("Foo", ReferenceTarget::Symbol(SymbolId(1)));
    assert_ne!(by_reflection, by_symbol);
    assert!(project.reference_equals(&by_reflection, &by_symbol));

    let other = ReferenceType::new("Foo", ReferenceTarget::Symbol(SymbolId(99)));
    assert!(!project.reference_equals(&by_reflection, &other));
    assert!(!project.reference_equals(&ReferenceType::broken("Foo"), &by_reflection));
}

#[test]
fn test_project_serializes_live_reflections() {
    let mut project = ProjectReflection::new("docs");
    let (class, method) = class_with_member(&mut project);
    project.remove_reflection(method);
    project
        .get_mut(class)
        .expect("class")
        .set_flag(ReflectionFlags::EXTERNAL, true);

    let json = serde_json::to_value(&project).expect("serializes");
    assert_eq!(json["name"], "docs");
    let reflections = json["reflections"].as_array().expect("array");
    assert_eq!(reflections.len(), 2);
    assert_eq!(reflections[1]["name"], "Foo");
    assert_eq!(reflections[1]["kind"], "Class");
    assert_eq!(reflections[1]["variant"], "declaration");
    assert_eq!(reflections[1]["flags"]["isExternal"], true);
}
