//! Default-value text for variables, properties and parameters.

use tsz_doc_source::{NodeId, NodeKind, SemanticSource};

/// The display text of `declaration`'s initializer, if it has one.
pub fn convert_default_value(source: &dyn SemanticSource, declaration: NodeId) -> Option<String> {
    let initializer = source.node(declaration).kind.initializer()?;
    Some(convert_expression(source, initializer))
}

/// Literal-like expressions keep their text; empty array and object literals
/// are spelled out; anything else is elided.
pub fn convert_expression(source: &dyn SemanticSource, expression: NodeId) -> String {
    let node = source.node(expression);
    match &node.kind {
        NodeKind::StringLiteral { .. }
        | NodeKind::TrueKeyword
        | NodeKind::FalseKeyword
        | NodeKind::NullKeyword
        | NodeKind::NumericLiteral
        | NodeKind::PrefixUnaryExpression { .. }
        | NodeKind::Identifier => node.text.clone(),
        NodeKind::ArrayLiteralExpression { elements } if elements.is_empty() => "[]".to_string(),
        NodeKind::ObjectLiteralExpression { properties } if properties.is_empty() => {
            "{}".to_string()
        }
        _ => "...".to_string(),
    }
}

#[cfg(test)]
#[path = "../tests/expression_tests.rs"]
mod tests;
