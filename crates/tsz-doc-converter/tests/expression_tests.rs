use super::*;
use tsz_doc_source::{MemoryProgram, PrefixOperator};

fn variable_with(program: &mut MemoryProgram, initializer: NodeId) -> NodeId {
    program.add_node(
        NodeKind::VariableDeclaration {
            ty: None,
            initializer: Some(initializer),
        },
        "x",
    )
}

#[test]
fn test_literal_text_is_kept() {
    let mut program = MemoryProgram::new();
    let string = program.add_node(
        NodeKind::StringLiteral {
            value: "hi".to_string(),
        },
        "'hi'",
    );
    let number = program.add_node(NodeKind::NumericLiteral, "0x10");
    let truthy = program.add_node(NodeKind::TrueKeyword, "true");
    let ident = program.add_node(NodeKind::Identifier, "DEFAULT");

    assert_eq!(convert_expression(&program, string), "'hi'");
    assert_eq!(convert_expression(&program, number), "0x10");
    assert_eq!(convert_expression(&program, truthy), "true");
    assert_eq!(convert_expression(&program, ident), "DEFAULT");
}

#[test]
fn test_negative_number() {
    let mut program = MemoryProgram::new();
    let one = program.add_node(NodeKind::NumericLiteral, "1");
    let negated = program.add_node(
        NodeKind::PrefixUnaryExpression {
            operator: PrefixOperator::Minus,
            operand: one,
        },
        "-1",
    );
    let declaration = variable_with(&mut program, negated);
    assert_eq!(
        convert_default_value(&program, declaration).as_deref(),
        Some("-1")
    );
}

#[test]
fn test_empty_containers_and_elision() {
    let mut program = MemoryProgram::new();
    let array = program.add_node(NodeKind::ArrayLiteralExpression { elements: vec![] }, "[ ]");
    let object = program.add_node(NodeKind::ObjectLiteralExpression { properties: vec![] }, "{ }");
    let one = program.add_node(NodeKind::NumericLiteral, "1");
    let full = program.add_node(
        NodeKind::ArrayLiteralExpression {
            elements: vec![one],
        },
        "[1]",
    );
    let call = program.add_node(NodeKind::OtherExpression, "make()");

    assert_eq!(convert_expression(&program, array), "[]");
    assert_eq!(convert_expression(&program, object), "{}");
    assert_eq!(convert_expression(&program, full), "...");
    assert_eq!(convert_expression(&program, call), "...");
}

#[test]
fn test_no_initializer() {
    let mut program = MemoryProgram::new();
    let declaration = program.add_node(
        NodeKind::VariableDeclaration {
            ty: None,
            initializer: None,
        },
        "x",
    );
    assert_eq!(convert_default_value(&program, declaration), None);
}
