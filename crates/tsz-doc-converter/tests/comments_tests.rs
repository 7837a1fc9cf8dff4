use super::*;
use tsz_doc_source::{MemoryProgram, NodeKind};

#[test]
fn test_single_line_comment() {
    let comment = parse_comment("/** Adds two numbers. */");
    assert_eq!(comment.short_text, "Adds two numbers.");
    assert!(comment.text.is_empty());
    assert!(comment.tags.is_empty());
}

#[test]
fn test_paragraphs_and_tags() {
    let comment = parse_comment(
        "/**\n * Short text.\n *\n * First body line\n * continues here.\n *\n * Second paragraph.\n *\n * @param a  the first\n *   operand\n * @param {number} [b=2] - the second\n * @returns the sum\n * @deprecated\n */",
    );
    assert_eq!(comment.short_text, "Short text.");
    assert_eq!(
        comment.text,
        "First body line\ncontinues here.\n\nSecond paragraph."
    );
    assert_eq!(comment.returns.as_deref(), Some("the sum"));

    let a = comment.tag("param", Some("a")).expect("param a");
    assert_eq!(a.text, "the first\noperand");
    let b = comment.tag("param", Some("b")).expect("param b");
    assert_eq!(b.text, "the second");
    assert!(comment.has_tag("deprecated"));
}

#[test]
fn test_tag_names_are_lowercased() {
    let comment = parse_comment("/**\n * @typeParam T element type\n * @Internal\n */");
    assert!(comment.has_tag("internal"));
    let tag = comment.tag("typeparam", Some("T")).expect("type param tag");
    assert_eq!(tag.text, "element type");
    assert!(comment.short_text.is_empty());
}

#[test]
fn test_provider_reads_variable_statement_comment() {
    let mut program = MemoryProgram::new();
    let declaration = program.add_node(
        NodeKind::VariableDeclaration {
            ty: None,
            initializer: None,
        },
        "x",
    );
    let list = program.add_node(
        NodeKind::VariableDeclarationList {
            declarations: vec![declaration],
        },
        "const x",
    );
    program.node_mut(list).doc_comment = Some("/** The answer. */".to_string());

    let provider = DocCommentProvider;
    let comment = provider
        .comment_for_node(&program, declaration)
        .expect("comment from statement");
    assert_eq!(comment.short_text, "The answer.");
}

#[test]
fn test_provider_ignores_empty_comment() {
    let mut program = MemoryProgram::new();
    let node = program.add_node(NodeKind::Identifier, "x");
    program.node_mut(node).doc_comment = Some("/** */".to_string());
    assert!(DocCommentProvider.comment_for_node(&program, node).is_none());
}
