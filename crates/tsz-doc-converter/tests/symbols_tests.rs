use super::*;
use crate::comments::DocCommentProvider;
use crate::converter::{Conversion, Converter};
use crate::events::EventBus;
use crate::options::ConverterOptions;
use crate::test_fixtures as fx;
use tsz_doc_model::{ProjectReflection, ReferenceTarget};
use tsz_doc_source::{Keyword, MemoryProgram, SemanticSource, SignatureInfo};

fn convert_with(program: &MemoryProgram, options: ConverterOptions) -> Conversion {
    let programs: [&dyn SemanticSource; 1] = [program];
    Converter::new(options)
        .convert("test", &programs)
        .expect("conversion succeeds")
}

fn convert(program: &MemoryProgram) -> Conversion {
    convert_with(program, ConverterOptions::default())
}

fn child_names(project: &ProjectReflection, parent: ReflectionId) -> Vec<String> {
    project
        .children(parent)
        .iter()
        .filter_map(|child| project.get(*child))
        .map(|child| child.name.clone())
        .collect()
}

/// Run `f` against a state over `program` with default options.
fn with_state<R>(program: &MemoryProgram, f: impl FnOnce(&mut ConverterState<'_>) -> R) -> R {
    let mut project = ProjectReflection::new("test");
    let options = ConverterOptions::default();
    let mut events = EventBus::new();
    let comments = DocCommentProvider;
    let (external, _) = options.external_globs();
    let mut state = ConverterState::new(
        program,
        &mut project,
        &options,
        &mut events,
        &comments,
        &external,
    );
    f(&mut state)
}

/// Default values of the parameters of `signature`, in order.
fn parameter_defaults(project: &ProjectReflection, signature: ReflectionId) -> Vec<Option<String>> {
    project
        .get(signature)
        .and_then(Reflection::as_signature)
        .expect("signature")
        .parameters
        .iter()
        .map(|id| {
            project
                .get(*id)
                .and_then(Reflection::as_parameter)
                .and_then(|data| data.default_value.clone())
        })
        .collect()
}

/// `name: number = default`
fn defaulted_parameter(p: &mut MemoryProgram, name: &str, default: &str) -> fx::Parameter {
    let annotation = fx::keyword(p, Keyword::Number);
    let initializer = p.add_node(NodeKind::NumericLiteral, default);
    let parameter = fx::parameter_with(
        p,
        NodeKind::Parameter {
            name: name.to_string(),
            ty: Some(annotation),
            initializer: Some(initializer),
            question: false,
            dot_dot_dot: false,
        },
    );
    let number = p.keyword_type(Keyword::Number);
    p.symbol_mut(parameter.symbol).value_type = Some(number);
    parameter
}

fn declaration(project: &ProjectReflection, path: &str) -> tsz_doc_model::DeclarationData {
    let id = project.find(path).unwrap_or_else(|| panic!("`{path}` exists"));
    project
        .get(id)
        .and_then(Reflection::as_declaration)
        .cloned()
        .unwrap_or_else(|| panic!("`{path}` is a declaration"))
}

// =============================================================================
// Flag reduction and dispatch
// =============================================================================

#[test]
fn test_class_wins_over_interface_and_function() {
    let flags = SymbolFlags::CLASS | SymbolFlags::INTERFACE | SymbolFlags::FUNCTION;
    assert_eq!(effective_flags(flags), SymbolFlags::CLASS);
}

#[test]
fn test_merge_precedence_pairs() {
    assert_eq!(
        effective_flags(SymbolFlags::GET_ACCESSOR | SymbolFlags::SET_ACCESSOR),
        SymbolFlags::GET_ACCESSOR
    );
    assert_eq!(
        effective_flags(SymbolFlags::NAMESPACE_MODULE | SymbolFlags::VALUE_MODULE | SymbolFlags::FUNCTION),
        SymbolFlags::NAMESPACE_MODULE | SymbolFlags::FUNCTION
    );
    assert_eq!(
        effective_flags(SymbolFlags::METHOD | SymbolFlags::PROPERTY),
        SymbolFlags::METHOD
    );
    assert_eq!(
        effective_flags(SymbolFlags::SET_ACCESSOR),
        SymbolFlags::SET_ACCESSOR
    );
}

#[test]
fn test_merged_class_and_namespace_keep_both() {
    let flags = SymbolFlags::CLASS | SymbolFlags::VALUE_MODULE | SymbolFlags::NAMESPACE_MODULE;
    assert_eq!(
        effective_flags(flags),
        SymbolFlags::CLASS | SymbolFlags::NAMESPACE_MODULE
    );
}

#[test]
fn test_bookkeeping_flags_are_dropped() {
    let flags = SymbolFlags::PROPERTY
        | SymbolFlags::OPTIONAL
        | SymbolFlags::TRANSIENT
        | SymbolFlags::ASSIGNMENT
        | SymbolFlags::PROTOTYPE;
    assert_eq!(effective_flags(flags), SymbolFlags::PROPERTY);
}

#[test]
fn test_handler_table() {
    assert_eq!(handler_for(SymbolFlags::CONST_ENUM), Some(SymbolHandler::Enum));
    assert_eq!(handler_for(SymbolFlags::METHOD), Some(SymbolHandler::FunctionOrMethod));
    assert_eq!(handler_for(SymbolFlags::SET_ACCESSOR), Some(SymbolHandler::Accessor));
    assert_eq!(handler_for(SymbolFlags::FUNCTION_SCOPED_VARIABLE), Some(SymbolHandler::Variable));
    assert_eq!(handler_for(SymbolFlags::TYPE_LITERAL), None);
    // Composite masks are never keys.
    assert_eq!(handler_for(SymbolFlags::VARIABLE), None);
}

#[test]
fn test_flag_without_handler_is_reported_and_skipped() {
    let mut p = MemoryProgram::new();
    let f = fx::function(&mut p, "f", &[], Keyword::Void);
    p.symbol_mut(f.symbol).flags |= SymbolFlags::EXPORT_VALUE;
    fx::entry_module(&mut p, "index", "src/index.ts", vec![f.declaration], vec![f.symbol]);

    let conversion = convert(&p);
    assert!(conversion.project.find("f").is_some());
    assert_eq!(conversion.diagnostics.len(), 1);
    assert_eq!(conversion.diagnostics[0].kind, DiagnosticKind::MissingHandler);
}

// =============================================================================
// Enums and namespaces
// =============================================================================

#[test]
fn test_const_enum_members_get_values() {
    let mut p = MemoryProgram::new();
    let one = p.add_node(NodeKind::NumericLiteral, "1");
    let first = p.add_node(NodeKind::EnumMember { initializer: Some(one) }, "First");
    let second = p.add_node(NodeKind::EnumMember { initializer: None }, "Second");
    let enum_node = p.add_node(
        NodeKind::EnumDeclaration {
            members: vec![first, second],
        },
        "const enum Order",
    );
    p.set_constant_value(first, ConstantValue::Number(1.0));
    p.set_constant_value(second, ConstantValue::String("two".to_string()));

    let first_symbol = p.add_symbol("First", SymbolFlags::ENUM_MEMBER);
    p.declare(first_symbol, first);
    let second_symbol = p.add_symbol("Second", SymbolFlags::ENUM_MEMBER);
    p.declare(second_symbol, second);
    let order = p.add_symbol("Order", SymbolFlags::CONST_ENUM);
    p.declare(order, enum_node);
    p.symbol_mut(order).exports = vec![first_symbol, second_symbol];
    fx::entry_module(&mut p, "index", "src/index.ts", vec![enum_node], vec![order]);

    let conversion = convert(&p);
    let project = &conversion.project;
    let id = project.find("Order").expect("enum");
    let reflection = project.get(id).expect("live");
    assert_eq!(reflection.kind, ReflectionKind::Enum);
    assert!(reflection.has_flag(ReflectionFlags::CONST));
    assert_eq!(child_names(project, id), ["First", "Second"]);

    assert_eq!(declaration(project, "Order.First").default_value.as_deref(), Some("1"));
    assert_eq!(
        declaration(project, "Order.Second").default_value.as_deref(),
        Some("\"two\"")
    );
    let member = project.find("Order.First").expect("member");
    assert_eq!(project.kind_of(member), Some(ReflectionKind::EnumMember));
}

#[test]
fn test_namespace_converts_module_members_only() {
    let mut p = MemoryProgram::new();
    let inner = fx::function(&mut p, "inner", &[], Keyword::Void);
    let stray = p.add_symbol("stray", SymbolFlags::PROPERTY);
    let body = p.add_node(
        NodeKind::ModuleDeclaration {
            body: vec![inner.declaration],
        },
        "namespace ns",
    );
    let ns = p.add_symbol("ns", SymbolFlags::NAMESPACE_MODULE);
    p.declare(ns, body);
    p.symbol_mut(ns).exports = vec![inner.symbol, stray];
    fx::entry_module(&mut p, "index", "src/index.ts", vec![body], vec![ns]);

    let conversion = convert(&p);
    let project = &conversion.project;
    let id = project.find("ns").expect("namespace");
    assert_eq!(project.kind_of(id), Some(ReflectionKind::Namespace));
    assert_eq!(child_names(project, id), ["inner"]);
    let inner = project.find("ns.inner").expect("inner");
    assert_eq!(project.kind_of(inner), Some(ReflectionKind::Function));
}

#[test]
fn test_function_with_static_members_gets_namespace() {
    let mut p = MemoryProgram::new();
    let f = fx::function(&mut p, "parse", &[], Keyword::Void);
    let access = p.add_node(NodeKind::PropertyAccessExpression, "parse.version");
    let version = p.add_symbol("version", SymbolFlags::PROPERTY);
    p.declare(version, access);
    let number = p.keyword_type(Keyword::Number);
    p.symbol_mut(version).value_type = Some(number);
    p.symbol_mut(f.symbol).flags |= SymbolFlags::VALUE_MODULE;
    p.symbol_mut(f.symbol).exports = vec![version];
    fx::entry_module(&mut p, "index", "src/index.ts", vec![f.declaration], vec![f.symbol]);

    let conversion = convert(&p);
    let project = &conversion.project;
    let kinds: Vec<ReflectionKind> = project
        .children(ReflectionId::ROOT)
        .iter()
        .filter_map(|child| project.kind_of(*child))
        .collect();
    assert_eq!(kinds, [ReflectionKind::Function, ReflectionKind::Namespace]);

    let namespace = project.children(ReflectionId::ROOT)[1];
    let members = project.children(namespace);
    assert_eq!(members.len(), 1);
    let member = project.get(members[0]).expect("live");
    assert_eq!(member.name, "version");
    assert_eq!(member.kind, ReflectionKind::Variable);
    assert_eq!(member.ty(), Some(&Type::intrinsic("number")));
}

// =============================================================================
// Type aliases
// =============================================================================

#[test]
fn test_generic_type_alias() {
    let mut p = MemoryProgram::new();
    let type_parameter = p.add_node(
        NodeKind::TypeParameter {
            name: "T".to_string(),
            constraint: None,
            default: None,
        },
        "T",
    );
    let t_symbol = p.add_symbol("T", SymbolFlags::TYPE_PARAMETER);
    p.declare(t_symbol, type_parameter);
    let t_name = p.add_node(NodeKind::Identifier, "T");
    p.bind(t_name, t_symbol);
    let t_reference = p.add_node(
        NodeKind::TypeReference {
            type_name: t_name,
            type_arguments: vec![],
        },
        "T",
    );
    let undefined = fx::keyword(&mut p, Keyword::Undefined);
    let union = p.add_node(
        NodeKind::UnionType {
            types: vec![t_reference, undefined],
        },
        "T | undefined",
    );
    let alias_node = p.add_node(
        NodeKind::TypeAliasDeclaration {
            type_parameters: vec![type_parameter],
            ty: union,
        },
        "type Maybe<T> = T | undefined",
    );
    fx::document(
        &mut p,
        alias_node,
        "/**\n * Maybe a value.\n * @typeParam T the value type\n */",
    );
    let maybe = p.add_symbol("Maybe", SymbolFlags::TYPE_ALIAS);
    p.declare(maybe, alias_node);
    fx::entry_module(&mut p, "index", "src/index.ts", vec![alias_node], vec![maybe]);

    let conversion = convert(&p);
    let project = &conversion.project;
    let data = declaration(project, "Maybe");
    assert_eq!(data.ty.as_ref().map(ToString::to_string).as_deref(), Some("T | undefined"));
    match &data.ty {
        Some(Type::Union { types }) => match &types[0] {
            Type::Reference(reference) => {
                assert_eq!(reference.target, ReferenceTarget::Symbol(t_symbol));
            }
            other => panic!("expected a reference, got {other:?}"),
        },
        other => panic!("expected a union, got {other:?}"),
    }

    assert_eq!(data.type_parameters.len(), 1);
    let parameter = project.get(data.type_parameters[0]).expect("type parameter");
    assert_eq!(parameter.name, "T");
    assert_eq!(
        parameter.comment.as_ref().map(|c| c.short_text.as_str()),
        Some("the value type")
    );
}

#[test]
fn test_callback_tag_becomes_function_type() {
    let mut p = MemoryProgram::new();
    let string = fx::keyword(&mut p, Keyword::String);
    let parameter = fx::parameter_with(
        &mut p,
        NodeKind::JsDocParameterTag {
            name: "message".to_string(),
            bracketed: true,
            type_expression: Some(string),
        },
    );
    let void = fx::keyword(&mut p, Keyword::Void);
    let tag = p.add_node(
        NodeKind::JsDocCallbackTag {
            parameters: vec![parameter.node],
            ty: Some(void),
        },
        "@callback Logger",
    );
    let logger = p.add_symbol("Logger", SymbolFlags::TYPE_ALIAS);
    p.declare(logger, tag);
    fx::entry_module(&mut p, "index", "src/index.js", vec![tag], vec![logger]);

    let conversion = convert(&p);
    let project = &conversion.project;
    let data = declaration(project, "Logger");
    let Some(Type::Reflection { declaration: literal }) = data.ty else {
        panic!("expected a reflection type, got {:?}", data.ty);
    };
    let literal = project.get(literal).expect("literal");
    assert_eq!(literal.kind, ReflectionKind::TypeLiteral);
    let signatures = &literal.as_declaration().expect("declaration").signatures;
    assert_eq!(signatures.len(), 1);

    let signature = project.get(signatures[0]).and_then(Reflection::as_signature).expect("signature");
    assert_eq!(signature.ty, Some(Type::intrinsic("void")));
    let message = project.get(signature.parameters[0]).expect("parameter");
    assert_eq!(message.name, "message");
    assert!(message.has_flag(ReflectionFlags::OPTIONAL));
    assert_eq!(message.ty(), Some(&Type::intrinsic("string")));
}

// =============================================================================
// Functions
// =============================================================================

#[test]
fn test_more_signatures_than_declarations() {
    let mut p = MemoryProgram::new();
    let first = p.add_node(
        NodeKind::FunctionDeclaration {
            type_parameters: vec![],
            parameters: vec![],
            ty: None,
        },
        "function f(): void",
    );
    fx::document(&mut p, first, "/** First. */");
    let second = p.add_node(
        NodeKind::FunctionDeclaration {
            type_parameters: vec![],
            parameters: vec![],
            ty: None,
        },
        "function f(x): void",
    );
    fx::document(&mut p, second, "/** Second. */");
    let f = p.add_symbol("f", SymbolFlags::FUNCTION);
    p.declare(f, first);
    p.declare(f, second);

    let void = p.keyword_type(Keyword::Void);
    let signatures: Vec<_> = [Some(first), Some(second), None]
        .into_iter()
        .map(|declaration| {
            p.add_signature(SignatureInfo {
                declaration,
                return_type: Some(void),
                ..Default::default()
            })
        })
        .collect();
    let ty = fx::function_type(&mut p, f, signatures);
    p.symbol_mut(f).value_type = Some(ty);
    fx::entry_module(&mut p, "index", "src/index.ts", vec![first, second], vec![f]);

    let conversion = convert(&p);
    let project = &conversion.project;
    let data = declaration(project, "f");
    assert_eq!(data.signatures.len(), 3);
    let comments: Vec<Option<String>> = data
        .signatures
        .iter()
        .map(|id| {
            project
                .get(*id)
                .and_then(|r| r.comment.as_ref())
                .map(|c| c.short_text.clone())
        })
        .collect();
    assert_eq!(
        comments,
        [Some("First.".to_string()), Some("Second.".to_string()), None]
    );
}

/// ```ts
/// function pad(width?: number = 1): string;
/// function pad(width?: number = 2, fill?: number = 0): string;
/// function pad(width = 3, fill = 4): string { ... }
/// ```
#[test]
fn test_overloads_pair_signatures_with_their_declarations() {
    let mut p = MemoryProgram::new();
    let string = p.keyword_type(Keyword::String);
    let mut declarations = Vec::new();
    let mut signatures = Vec::new();
    for (index, defaults) in [vec!["1"], vec!["2", "0"], vec!["3", "4"]].into_iter().enumerate() {
        let parameters: Vec<fx::Parameter> = defaults
            .iter()
            .zip(["width", "fill"])
            .map(|(default, name)| defaulted_parameter(&mut p, name, default))
            .collect();
        let declaration = p.add_node(
            NodeKind::FunctionDeclaration {
                type_parameters: vec![],
                parameters: parameters.iter().map(|parameter| parameter.node).collect(),
                ty: None,
            },
            "function pad()",
        );
        declarations.push(declaration);
        // The implementation signature is not visible to callers.
        if index < 2 {
            signatures.push(p.add_signature(SignatureInfo {
                declaration: Some(declaration),
                parameters: parameters.iter().map(|parameter| parameter.symbol).collect(),
                return_type: Some(string),
                ..Default::default()
            }));
        }
    }
    let pad = p.add_symbol("pad", SymbolFlags::FUNCTION);
    for declaration in &declarations {
        p.declare(pad, *declaration);
    }
    let ty = fx::function_type(&mut p, pad, signatures);
    p.symbol_mut(pad).value_type = Some(ty);
    fx::entry_module(&mut p, "index", "src/index.ts", declarations, vec![pad]);

    let conversion = convert(&p);
    let project = &conversion.project;
    let data = declaration(project, "pad");
    assert_eq!(data.signatures.len(), 2);
    assert_eq!(parameter_defaults(project, data.signatures[0]), [Some("1".to_string())]);
    assert_eq!(
        parameter_defaults(project, data.signatures[1]),
        [Some("2".to_string()), Some("0".to_string())]
    );
}

#[test]
fn test_unresolved_alias_is_reported() {
    let mut p = MemoryProgram::new();
    let specifier = p.add_node(NodeKind::ExportSpecifier, "missing");
    let alias = p.add_symbol("missing", SymbolFlags::ALIAS);
    p.declare(alias, specifier);
    fx::entry_module(&mut p, "index", "src/index.ts", vec![specifier], vec![alias]);

    let conversion = convert(&p);
    assert!(conversion.project.children(ReflectionId::ROOT).is_empty());
    assert_eq!(conversion.diagnostics.len(), 1);
    assert_eq!(conversion.diagnostics[0].kind, DiagnosticKind::UnresolvedAlias);
}

// =============================================================================
// Variables
// =============================================================================

#[test]
fn test_const_and_let_variables() {
    let mut p = MemoryProgram::new();
    let literal = p.add_node(
        NodeKind::StringLiteral {
            value: "1.0".to_string(),
        },
        "'1.0'",
    );
    let version = fx::variable(&mut p, "VERSION", Keyword::String, Some(literal), NodeFlags::CONST);
    let counter = fx::variable(&mut p, "counter", Keyword::Number, None, NodeFlags::LET);
    let legacy = fx::variable(&mut p, "legacy", Keyword::Boolean, None, NodeFlags::empty());
    fx::entry_module(
        &mut p,
        "index",
        "src/index.ts",
        vec![version.statement, counter.statement, legacy.statement],
        vec![version.symbol, counter.symbol, legacy.symbol],
    );

    let conversion = convert(&p);
    let project = &conversion.project;
    let get = |name: &str| project.find(name).and_then(|id| project.get(id)).expect("variable");

    let version = get("VERSION");
    assert_eq!(version.kind, ReflectionKind::Variable);
    assert!(version.has_flag(ReflectionFlags::CONST));
    assert!(!version.has_flag(ReflectionFlags::LET));
    assert_eq!(version.ty(), Some(&Type::intrinsic("string")));
    assert_eq!(
        version.as_declaration().and_then(|d| d.default_value.as_deref()),
        Some("'1.0'")
    );

    let counter = get("counter");
    assert!(counter.has_flag(ReflectionFlags::LET));
    assert!(!counter.has_flag(ReflectionFlags::CONST));

    let legacy = get("legacy");
    assert!(!legacy.has_flag(ReflectionFlags::CONST));
    assert!(!legacy.has_flag(ReflectionFlags::LET));
}

#[test]
fn test_function_valued_variable_is_a_function() {
    let mut p = MemoryProgram::new();
    let n = fx::parameter(&mut p, "n", Keyword::Number);
    let arrow = p.add_node(
        NodeKind::ArrowFunction {
            type_parameters: vec![],
            parameters: vec![n.node],
            ty: None,
        },
        "(n: number) => n * 2",
    );
    let declaration = p.add_node(
        NodeKind::VariableDeclaration {
            ty: None,
            initializer: Some(arrow),
        },
        "double",
    );
    let statement = p.add_node(
        NodeKind::VariableDeclarationList {
            declarations: vec![declaration],
        },
        "const double = ...",
    );
    p.node_mut(statement).flags = NodeFlags::CONST;
    fx::document(&mut p, statement, "/** Doubles a number. */");

    let double = p.add_symbol("double", SymbolFlags::BLOCK_SCOPED_VARIABLE);
    p.declare(double, declaration);
    let number = p.keyword_type(Keyword::Number);
    let signature = p.add_signature(SignatureInfo {
        declaration: Some(arrow),
        parameters: vec![n.symbol],
        return_type: Some(number),
        ..Default::default()
    });
    let ty = fx::function_type(&mut p, double, vec![signature]);
    p.symbol_mut(double).value_type = Some(ty);
    fx::entry_module(&mut p, "index", "src/index.ts", vec![statement], vec![double]);

    let conversion = convert(&p);
    let project = &conversion.project;
    let id = project.find("double").expect("converted");
    let reflection = project.get(id).expect("live");
    assert_eq!(reflection.kind, ReflectionKind::Function);
    assert!(reflection.has_flag(ReflectionFlags::CONST));
    assert_eq!(
        reflection.comment.as_ref().map(|c| c.short_text.as_str()),
        Some("Doubles a number.")
    );

    let data = reflection.as_declaration().expect("declaration");
    assert_eq!(data.signatures.len(), 1);
    let signature = project.get(data.signatures[0]).and_then(Reflection::as_signature).expect("signature");
    assert_eq!(signature.parameters.len(), 1);
    assert_eq!(signature.ty, Some(Type::intrinsic("number")));
}

/// ```ts
/// /** Doubles a number. */
/// const double = (n: number = 2): number => n * 2;
/// ```
#[test]
fn test_function_valued_variable_keeps_parameter_defaults() {
    let mut p = MemoryProgram::new();
    let n = defaulted_parameter(&mut p, "n", "2");
    let returns = fx::keyword(&mut p, Keyword::Number);
    let arrow = p.add_node(
        NodeKind::ArrowFunction {
            type_parameters: vec![],
            parameters: vec![n.node],
            ty: Some(returns),
        },
        "(n: number = 2): number => n * 2",
    );
    let declaration_node = p.add_node(
        NodeKind::VariableDeclaration {
            ty: None,
            initializer: Some(arrow),
        },
        "double",
    );
    let statement = p.add_node(
        NodeKind::VariableDeclarationList {
            declarations: vec![declaration_node],
        },
        "const double = ...",
    );
    p.node_mut(statement).flags = NodeFlags::CONST;
    fx::document(&mut p, statement, "/** Doubles a number. */");

    let double = p.add_symbol("double", SymbolFlags::BLOCK_SCOPED_VARIABLE);
    p.declare(double, declaration_node);
    let signature = p.add_signature(SignatureInfo {
        declaration: Some(arrow),
        parameters: vec![n.symbol],
        ..Default::default()
    });
    let ty = fx::function_type(&mut p, double, vec![signature]);
    p.symbol_mut(double).value_type = Some(ty);
    fx::entry_module(&mut p, "index", "src/index.ts", vec![statement], vec![double]);

    let conversion = convert(&p);
    let project = &conversion.project;
    let data = declaration(project, "double");
    assert_eq!(data.signatures.len(), 1);
    assert_eq!(parameter_defaults(project, data.signatures[0]), [Some("2".to_string())]);

    let signature = project.get(data.signatures[0]).expect("signature");
    assert_eq!(
        signature.comment.as_ref().map(|c| c.short_text.as_str()),
        Some("Doubles a number.")
    );
    // Written on the arrow function, not on the variable.
    assert_eq!(signature.ty(), Some(&Type::intrinsic("number")));
}

// =============================================================================
// Classes and interfaces
// =============================================================================

struct GreeterFixture {
    program: MemoryProgram,
    class: SymbolId,
    secret: SymbolId,
}

/// ```ts
/// class Greeter {
///     static count: number;
///     constructor(greeting: string);
///     constructor();
///     name: string;
///     private secret: string;
///     greet(): string;
/// }
/// ```
fn greeter() -> GreeterFixture {
    let mut p = MemoryProgram::new();
    let greeting = fx::parameter(&mut p, "greeting", Keyword::String);
    let first_constructor = p.add_node(
        NodeKind::Constructor {
            parameters: vec![greeting.node],
        },
        "constructor(greeting: string)",
    );
    let second_constructor = p.add_node(NodeKind::Constructor { parameters: vec![] }, "constructor()");

    let count = fx::property_declaration(&mut p, "count", Keyword::Number);
    p.node_mut(count.node).modifiers = ModifierFlags::STATIC;
    let name = fx::property_declaration(&mut p, "name", Keyword::String);
    let secret = fx::property_declaration(&mut p, "secret", Keyword::String);
    p.node_mut(secret.node).modifiers = ModifierFlags::PRIVATE;

    let string_node = fx::keyword(&mut p, Keyword::String);
    let greet_node = p.add_node(
        NodeKind::MethodDeclaration {
            private_name: false,
            type_parameters: vec![],
            parameters: vec![],
            ty: Some(string_node),
        },
        "greet(): string",
    );
    let greet = p.add_symbol("greet", SymbolFlags::METHOD);
    p.declare(greet, greet_node);
    let string = p.keyword_type(Keyword::String);
    let greet_signature = p.add_signature(SignatureInfo {
        declaration: Some(greet_node),
        return_type: Some(string),
        ..Default::default()
    });
    let greet_type = fx::function_type(&mut p, greet, vec![greet_signature]);
    p.symbol_mut(greet).value_type = Some(greet_type);

    let class_node = p.add_node(
        NodeKind::ClassDeclaration {
            type_parameters: vec![],
            heritage_clauses: vec![],
            members: vec![
                count.node,
                first_constructor,
                second_constructor,
                name.node,
                secret.node,
                greet_node,
            ],
        },
        "class Greeter",
    );
    let class = p.add_symbol("Greeter", SymbolFlags::CLASS);
    p.declare(class, class_node);
    let types = fx::class_types(&mut p, class, "Greeter");

    let class_name = p.add_node(NodeKind::Identifier, "Greeter");
    p.bind(class_name, class);
    let instance_node = p.add_node(
        NodeKind::TypeReference {
            type_name: class_name,
            type_arguments: vec![],
        },
        "Greeter",
    );
    p.type_mut(types.instance).node = Some(instance_node);

    let construct_signatures = vec![
        p.add_signature(SignatureInfo {
            declaration: Some(first_constructor),
            parameters: vec![greeting.symbol],
            return_type: Some(types.instance),
            ..Default::default()
        }),
        p.add_signature(SignatureInfo {
            declaration: Some(second_constructor),
            return_type: Some(types.instance),
            ..Default::default()
        }),
    ];
    p.type_mut(types.static_side).construct_signatures = construct_signatures;
    p.type_mut(types.static_side).properties = vec![count.symbol];
    p.type_mut(types.instance).properties = vec![name.symbol, secret.symbol, greet];

    fx::entry_module(&mut p, "index", "src/index.ts", vec![class_node], vec![class]);
    GreeterFixture {
        program: p,
        class,
        secret: secret.symbol,
    }
}

#[test]
fn test_class_members_and_single_constructor() {
    let fixture = greeter();
    let conversion = convert(&fixture.program);
    let project = &conversion.project;
    assert!(conversion.diagnostics.is_empty(), "{:?}", conversion.diagnostics);

    let class = project.reflection_from_symbol(fixture.class).expect("class");
    assert_eq!(project.kind_of(class), Some(ReflectionKind::Class));
    assert_eq!(
        child_names(project, class),
        ["count", "constructor", "name", "secret", "greet"]
    );

    let constructors: Vec<ReflectionId> = project
        .children(class)
        .iter()
        .copied()
        .filter(|child| project.kind_of(*child) == Some(ReflectionKind::Constructor))
        .collect();
    assert_eq!(constructors.len(), 1);
    let constructor = project.get(constructors[0]).and_then(Reflection::as_declaration).expect("constructor");
    assert_eq!(constructor.signatures.len(), 2);
    for signature in &constructor.signatures {
        let signature = project.get(*signature).expect("signature");
        assert_eq!(signature.name, "new Greeter");
        assert_eq!(signature.kind, ReflectionKind::ConstructorSignature);
        match signature.ty() {
            Some(Type::Reference(reference)) => {
                assert_eq!(reference.target, ReferenceTarget::Reflection(class));
            }
            other => panic!("expected a reference to the class, got {other:?}"),
        }
    }

    let count = project.find("Greeter.count").and_then(|id| project.get(id)).expect("count");
    assert!(count.has_flag(ReflectionFlags::STATIC));
    let name = project.find("Greeter.name").and_then(|id| project.get(id)).expect("name");
    assert!(!name.has_flag(ReflectionFlags::STATIC));
    assert_eq!(name.ty(), Some(&Type::intrinsic("string")));
    let secret = project.find("Greeter.secret").and_then(|id| project.get(id)).expect("secret");
    assert!(secret.has_flag(ReflectionFlags::PRIVATE));

    let greet = declaration(project, "Greeter.greet");
    assert_eq!(greet.signatures.len(), 1);
    let greet_id = project.find("Greeter.greet").expect("greet");
    assert_eq!(project.kind_of(greet_id), Some(ReflectionKind::Method));
}

#[test]
fn test_exclude_private_removes_private_members() {
    let fixture = greeter();
    let options = ConverterOptions {
        exclude_private: true,
        ..ConverterOptions::default()
    };
    let conversion = convert_with(&fixture.program, options);
    let project = &conversion.project;
    assert_eq!(project.find("Greeter.secret"), None);
    assert_eq!(project.reflection_from_symbol(fixture.secret), None);
    assert!(project.find("Greeter.name").is_some());
}

#[test]
fn test_inherited_private_member_is_skipped() {
    let mut p = MemoryProgram::new();
    let hidden = fx::property_declaration(&mut p, "hidden", Keyword::String);
    p.node_mut(hidden.node).modifiers = ModifierFlags::PRIVATE;
    let base_node = p.add_node(
        NodeKind::ClassDeclaration {
            type_parameters: vec![],
            heritage_clauses: vec![],
            members: vec![hidden.node],
        },
        "class Base",
    );
    let base = p.add_symbol("Base", SymbolFlags::CLASS);
    p.declare(base, base_node);

    let own = fx::property_declaration(&mut p, "own", Keyword::Number);
    let derived_node = p.add_node(
        NodeKind::ClassDeclaration {
            type_parameters: vec![],
            heritage_clauses: vec![],
            members: vec![own.node],
        },
        "class Derived",
    );
    let derived = p.add_symbol("Derived", SymbolFlags::CLASS);
    p.declare(derived, derived_node);
    let types = fx::class_types(&mut p, derived, "Derived");
    p.type_mut(types.instance).properties = vec![own.symbol, hidden.symbol];
    fx::entry_module(
        &mut p,
        "index",
        "src/index.ts",
        vec![base_node, derived_node],
        vec![derived],
    );

    let conversion = convert(&p);
    let project = &conversion.project;
    let derived = project.find("Derived").expect("class");
    assert_eq!(child_names(project, derived), ["constructor", "own"]);
}

#[test]
fn test_declared_type_must_be_class_or_interface() {
    let mut p = MemoryProgram::new();
    let node = p.add_node(
        NodeKind::InterfaceDeclaration {
            type_parameters: vec![],
            heritage_clauses: vec![],
            members: vec![],
        },
        "interface Broken",
    );
    let broken = p.add_symbol("Broken", SymbolFlags::INTERFACE);
    p.declare(broken, node);
    fx::entry_module(&mut p, "index", "src/index.ts", vec![node], vec![broken]);

    let programs: [&dyn SemanticSource; 1] = [&p];
    let err = Converter::new(ConverterOptions::default())
        .convert("test", &programs)
        .expect_err("declared type is `any`");
    assert!(matches!(err, ConvertError::Invariant(_)));
}

/// ```ts
/// interface Widget {
///     get value(): number;
///     set value(v: number);
///     onClose: () => void;
///     [key: string]: unknown;
///     new (): Widget;
/// }
/// ```
#[test]
fn test_interface_accessor_function_property_and_index() {
    let mut p = MemoryProgram::new();
    let number_node = fx::keyword(&mut p, Keyword::Number);
    let getter = p.add_node(
        NodeKind::GetAccessor {
            private_name: false,
            parameters: vec![],
            ty: Some(number_node),
        },
        "get value()",
    );
    let v = fx::parameter(&mut p, "v", Keyword::Number);
    let setter = p.add_node(
        NodeKind::SetAccessor {
            private_name: false,
            parameters: vec![v.node],
        },
        "set value(v)",
    );
    let value = p.add_symbol("value", SymbolFlags::GET_ACCESSOR | SymbolFlags::SET_ACCESSOR);
    p.declare(value, getter);
    p.declare(value, setter);
    let number = p.keyword_type(Keyword::Number);
    p.add_signature(SignatureInfo {
        declaration: Some(getter),
        return_type: Some(number),
        ..Default::default()
    });
    let void = p.keyword_type(Keyword::Void);
    p.add_signature(SignatureInfo {
        declaration: Some(setter),
        parameters: vec![v.symbol],
        return_type: Some(void),
        ..Default::default()
    });

    let void_node = fx::keyword(&mut p, Keyword::Void);
    let function_node = p.add_node(
        NodeKind::FunctionType {
            type_parameters: vec![],
            parameters: vec![],
            ty: void_node,
        },
        "() => void",
    );
    let on_close_node = p.add_node(
        NodeKind::PropertySignature {
            ty: Some(function_node),
        },
        "onClose",
    );
    let on_close = p.add_symbol("onClose", SymbolFlags::PROPERTY);
    p.declare(on_close, on_close_node);
    p.add_signature(SignatureInfo {
        declaration: Some(function_node),
        return_type: Some(void),
        ..Default::default()
    });

    let key = fx::parameter(&mut p, "key", Keyword::String);
    let unknown_node = fx::keyword(&mut p, Keyword::Unknown);
    let index_node = p.add_node(
        NodeKind::IndexSignature {
            parameters: vec![key.node],
            ty: Some(unknown_node),
        },
        "[key: string]: unknown",
    );
    let index = p.add_symbol("__index", SymbolFlags::SIGNATURE);
    p.declare(index, index_node);

    let interface_node = p.add_node(
        NodeKind::InterfaceDeclaration {
            type_parameters: vec![],
            heritage_clauses: vec![],
            members: vec![getter, setter, on_close_node, index_node],
        },
        "interface Widget",
    );
    let widget = p.add_symbol("Widget", SymbolFlags::INTERFACE);
    p.declare(widget, interface_node);
    p.symbol_mut(widget).index_symbol = Some(index);
    let instance = fx::interface_type(&mut p, widget, "Widget");
    let construct = p.add_signature(SignatureInfo::default());
    p.type_mut(instance).properties = vec![value, on_close];
    p.type_mut(instance).construct_signatures = vec![construct];
    fx::entry_module(&mut p, "index", "src/index.ts", vec![interface_node], vec![widget]);

    let conversion = convert(&p);
    let project = &conversion.project;
    let widget = project.find("Widget").expect("interface");
    assert_eq!(project.kind_of(widget), Some(ReflectionKind::Interface));
    assert_eq!(child_names(project, widget), ["value", "onClose", "constructor"]);

    let accessor = declaration(project, "Widget.value");
    let get_signature = accessor.get_signature.and_then(|id| project.get(id)).expect("getter");
    assert_eq!(get_signature.kind, ReflectionKind::GetSignature);
    assert_eq!(get_signature.ty(), Some(&Type::intrinsic("number")));
    let set_signature = accessor.set_signature.and_then(|id| project.get(id)).expect("setter");
    assert_eq!(set_signature.kind, ReflectionKind::SetSignature);
    assert_eq!(set_signature.ty(), Some(&Type::intrinsic("void")));
    assert!(accessor.signatures.is_empty());

    let on_close = project.find("Widget.onClose").expect("method");
    assert_eq!(project.kind_of(on_close), Some(ReflectionKind::Method));
    assert_eq!(declaration(project, "Widget.onClose").signatures.len(), 1);

    let widget_data = declaration(project, "Widget");
    let index = widget_data.index_signature.and_then(|id| project.get(id)).expect("index");
    assert_eq!(index.name, "__index");
    assert_eq!(index.kind, ReflectionKind::IndexSignature);
    assert_eq!(index.ty(), Some(&Type::intrinsic("unknown")));
    let key = index
        .as_signature()
        .and_then(|data| data.parameters.first())
        .and_then(|id| project.get(*id))
        .expect("key parameter");
    assert_eq!(key.name, "key");
    assert_eq!(key.ty(), Some(&Type::intrinsic("string")));

    let constructor = declaration(project, "Widget.constructor");
    assert_eq!(constructor.signatures.len(), 1);
}

#[test]
fn test_arrow_property_becomes_method() {
    let mut p = MemoryProgram::new();
    let event = fx::parameter(&mut p, "event", Keyword::String);
    let arrow = p.add_node(
        NodeKind::ArrowFunction {
            type_parameters: vec![],
            parameters: vec![event.node],
            ty: None,
        },
        "(event: string) => {}",
    );
    let property = p.add_node(
        NodeKind::PropertyDeclaration {
            private_name: false,
            ty: None,
            initializer: Some(arrow),
        },
        "handler",
    );
    p.node_mut(property).modifiers = ModifierFlags::PROTECTED;
    let handler = p.add_symbol("handler", SymbolFlags::PROPERTY);
    p.declare(handler, property);
    let void = p.keyword_type(Keyword::Void);
    p.add_signature(SignatureInfo {
        declaration: Some(arrow),
        parameters: vec![event.symbol],
        return_type: Some(void),
        ..Default::default()
    });

    let class_node = p.add_node(
        NodeKind::ClassDeclaration {
            type_parameters: vec![],
            heritage_clauses: vec![],
            members: vec![property],
        },
        "class View",
    );
    let view = p.add_symbol("View", SymbolFlags::CLASS);
    p.declare(view, class_node);
    let types = fx::class_types(&mut p, view, "View");
    p.type_mut(types.instance).properties = vec![handler];
    fx::entry_module(&mut p, "index", "src/index.ts", vec![class_node], vec![view]);

    let conversion = convert(&p);
    let project = &conversion.project;
    let id = project.find("View.handler").expect("handler");
    let reflection = project.get(id).expect("live");
    assert_eq!(reflection.kind, ReflectionKind::Method);
    assert!(reflection.has_flag(ReflectionFlags::PROTECTED));
    let data = reflection.as_declaration().expect("declaration");
    let signature = project.get(data.signatures[0]).and_then(Reflection::as_signature).expect("signature");
    let parameter = project.get(signature.parameters[0]).expect("parameter");
    assert_eq!(parameter.name, "event");
}

/// An interface member declared as `constructor(x?: number = 0)` twice.
#[test]
fn test_constructor_symbol_gets_one_reflection() {
    let mut p = MemoryProgram::new();
    let mut constructors = Vec::new();
    for default in ["0", "1"] {
        let x = defaulted_parameter(&mut p, "x", default);
        let node = p.add_node(
            NodeKind::Constructor {
                parameters: vec![x.node],
            },
            "constructor(x)",
        );
        p.add_signature(SignatureInfo {
            declaration: Some(node),
            parameters: vec![x.symbol],
            ..Default::default()
        });
        constructors.push(node);
    }
    let constructor = p.add_symbol("__constructor", SymbolFlags::CONSTRUCTOR);
    for node in &constructors {
        p.declare(constructor, *node);
    }

    let interface_node = p.add_node(
        NodeKind::InterfaceDeclaration {
            type_parameters: vec![],
            heritage_clauses: vec![],
            members: constructors.clone(),
        },
        "interface Point",
    );
    let point = p.add_symbol("Point", SymbolFlags::INTERFACE);
    p.declare(point, interface_node);
    let instance = fx::interface_type(&mut p, point, "Point");
    p.type_mut(instance).properties = vec![constructor];
    fx::entry_module(&mut p, "index", "src/index.ts", vec![interface_node], vec![point]);

    let conversion = convert(&p);
    let project = &conversion.project;
    let point = project.find("Point").expect("interface");
    assert_eq!(child_names(project, point), ["constructor"]);

    let id = project.find("Point.constructor").expect("constructor");
    assert_eq!(project.kind_of(id), Some(ReflectionKind::Constructor));
    assert_eq!(project.reflection_from_symbol(constructor), Some(id));
    let data = declaration(project, "Point.constructor");
    assert_eq!(data.signatures.len(), 2);
    for (signature, default) in data.signatures.iter().zip(["0", "1"]) {
        let reflection = project.get(*signature).expect("signature");
        assert_eq!(reflection.kind, ReflectionKind::ConstructorSignature);
        assert_eq!(reflection.name, "new Point");
        assert_eq!(parameter_defaults(project, *signature), [Some(default.to_string())]);
    }
}

/// ```ts
/// namespace Shape {}
/// class Shape { area: number }
/// ```
#[test]
fn test_member_location_prefers_class_declaration() {
    let mut p = MemoryProgram::new();
    let area = fx::property_declaration(&mut p, "area", Keyword::Number);
    let namespace_node = p.add_node(NodeKind::ModuleDeclaration { body: vec![] }, "namespace Shape");
    let class_node = p.add_node(
        NodeKind::ClassDeclaration {
            type_parameters: vec![],
            heritage_clauses: vec![],
            members: vec![area.node],
        },
        "class Shape",
    );
    let shape = p.add_symbol("Shape", SymbolFlags::CLASS | SymbolFlags::NAMESPACE_MODULE);
    p.declare(shape, namespace_node);
    p.declare(shape, class_node);
    let helpers_node = p.add_node(NodeKind::ModuleDeclaration { body: vec![] }, "namespace Helpers");
    let helpers = p.add_symbol("Helpers", SymbolFlags::NAMESPACE_MODULE);
    p.declare(helpers, helpers_node);
    let file = p.add_source_file("src/shape.ts", vec![namespace_node, class_node, helpers_node]);

    with_state(&p, |state| {
        let class = state.project.register_reflection(
            Reflection::declaration("Shape", ReflectionKind::Class, ReflectionId::ROOT),
            Some(shape),
        );
        let namespace = state.project.register_reflection(
            Reflection::declaration("Helpers", ReflectionKind::Namespace, ReflectionId::ROOT),
            Some(helpers),
        );
        assert_eq!(state.member_location(Context::new(class), area.symbol), Some(class_node));
        assert_eq!(
            state.member_location(Context::new(namespace), area.symbol),
            Some(helpers_node)
        );
        // No container symbol: the member's own file.
        assert_eq!(
            state.member_location(Context::new(ReflectionId::ROOT), area.symbol),
            Some(file)
        );
    });
}
