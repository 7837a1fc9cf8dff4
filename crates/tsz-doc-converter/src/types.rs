//! Type conversion.
//!
//! Both written type nodes and checker-inferred types are converted by the
//! same [`TypeHandler`]s. An inferred type is first turned into its
//! representative node; the node's [`SyntaxKind`] selects the handler, which
//! then reads the type's constituents from the source.
//!
//! Inferred types that name a symbol are expanded at most once per
//! recursion path. A type met again while it is still being expanded (and
//! any nesting deeper than the guard's limit) becomes an
//! [`Type::Unknown`] carrying the checker's display text.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use tracing::debug;
use tsz_doc_model::{
    LiteralValue, MappedModifier, MappedType, ReferenceType, ReflectionFlags, ReflectionKind, Type,
    TypeOperatorKind,
};
use tsz_doc_source::{
    ElementFlags, LiteralTypeValue, MappedModifierToken, ModifierFlags, NodeId, NodeKind,
    ObjectKind, PrefixOperator, SignatureKind, SymbolId, SyntaxKind, TypeId, TypeOperatorToken,
    TypeOrNode, TypeShape,
};

use crate::context::Context;
use crate::converter::ConverterState;
use crate::cycle::CycleResult;
use crate::diagnostics::DiagnosticKind;
use crate::error::{ConvertError, Result};

// =============================================================================
// Dispatch table
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum TypeHandler {
    Array,
    Conditional,
    ConstructorType,
    ExpressionWithTypeArguments,
    FunctionType,
    ImportType,
    IndexedAccess,
    Infer,
    Intersection,
    JsDocVariadic,
    Keyword,
    Optional,
    Parenthesized,
    Predicate,
    TypeLiteral,
    Query,
    Reference,
    Rest,
    NamedTupleMember,
    Mapped,
    BooleanLiteral,
    NullLiteral,
    This,
    Literal,
    TemplateLiteral,
    Tuple,
    TypeOperator,
    Union,
    JsDocNullable,
    JsDocNonNullable,
}

impl TypeHandler {
    const ALL: &'static [TypeHandler] = &[
        TypeHandler::Array,
        TypeHandler::Conditional,
        TypeHandler::ConstructorType,
        TypeHandler::ExpressionWithTypeArguments,
        TypeHandler::FunctionType,
        TypeHandler::ImportType,
        TypeHandler::IndexedAccess,
        TypeHandler::Infer,
        TypeHandler::Intersection,
        TypeHandler::JsDocVariadic,
        TypeHandler::Keyword,
        TypeHandler::Optional,
        TypeHandler::Parenthesized,
        TypeHandler::Predicate,
        TypeHandler::TypeLiteral,
        TypeHandler::Query,
        TypeHandler::Reference,
        TypeHandler::Rest,
        TypeHandler::NamedTupleMember,
        TypeHandler::Mapped,
        TypeHandler::BooleanLiteral,
        TypeHandler::NullLiteral,
        TypeHandler::This,
        TypeHandler::Literal,
        TypeHandler::TemplateLiteral,
        TypeHandler::Tuple,
        TypeHandler::TypeOperator,
        TypeHandler::Union,
        TypeHandler::JsDocNullable,
        TypeHandler::JsDocNonNullable,
    ];

    /// The syntax kinds this handler converts.
    fn kinds(self) -> &'static [SyntaxKind] {
        use SyntaxKind as S;
        match self {
            TypeHandler::Array => &[S::ArrayType],
            TypeHandler::Conditional => &[S::ConditionalType],
            TypeHandler::ConstructorType => &[S::ConstructorType],
            TypeHandler::ExpressionWithTypeArguments => &[S::ExpressionWithTypeArguments],
            TypeHandler::FunctionType => &[S::FunctionType],
            TypeHandler::ImportType => &[S::ImportType],
            TypeHandler::IndexedAccess => &[S::IndexedAccessType],
            TypeHandler::Infer => &[S::InferType],
            TypeHandler::Intersection => &[S::IntersectionType],
            TypeHandler::JsDocVariadic => &[S::JsDocVariadicType],
            TypeHandler::Keyword => &[
                S::AnyKeyword,
                S::BigIntKeyword,
                S::BooleanKeyword,
                S::NeverKeyword,
                S::NumberKeyword,
                S::ObjectKeyword,
                S::StringKeyword,
                S::SymbolKeyword,
                S::UndefinedKeyword,
                S::UnknownKeyword,
                S::VoidKeyword,
                S::IntrinsicKeyword,
            ],
            TypeHandler::Optional => &[S::OptionalType],
            TypeHandler::Parenthesized => &[S::ParenthesizedType],
            TypeHandler::Predicate => &[S::TypePredicate],
            TypeHandler::TypeLiteral => &[S::TypeLiteral],
            TypeHandler::Query => &[S::TypeQuery],
            TypeHandler::Reference => &[S::TypeReference],
            TypeHandler::Rest => &[S::RestType],
            TypeHandler::NamedTupleMember => &[S::NamedTupleMember],
            TypeHandler::Mapped => &[S::MappedType],
            TypeHandler::BooleanLiteral => &[S::TrueKeyword, S::FalseKeyword],
            TypeHandler::NullLiteral => &[S::NullKeyword],
            TypeHandler::This => &[S::ThisKeyword, S::ThisType],
            TypeHandler::Literal => &[S::LiteralType],
            TypeHandler::TemplateLiteral => &[S::TemplateLiteralType],
            TypeHandler::Tuple => &[S::TupleType],
            TypeHandler::TypeOperator => &[S::TypeOperator],
            TypeHandler::Union => &[S::UnionType],
            TypeHandler::JsDocNullable => &[S::JsDocNullableType],
            TypeHandler::JsDocNonNullable => &[S::JsDocNonNullableType],
        }
    }

    /// Whether inferred types reach this handler. Handlers for purely
    /// syntactic forms only ever see written nodes.
    fn supports_types(self) -> bool {
        !matches!(
            self,
            TypeHandler::ExpressionWithTypeArguments
                | TypeHandler::JsDocVariadic
                | TypeHandler::Optional
                | TypeHandler::Parenthesized
                | TypeHandler::Predicate
                | TypeHandler::Rest
                | TypeHandler::NamedTupleMember
                | TypeHandler::JsDocNullable
                | TypeHandler::JsDocNonNullable
        )
    }
}

static TYPE_HANDLERS: Lazy<FxHashMap<SyntaxKind, TypeHandler>> = Lazy::new(|| {
    let mut map = FxHashMap::default();
    for handler in TypeHandler::ALL {
        for kind in handler.kinds() {
            let previous = map.insert(*kind, *handler);
            debug_assert!(
                previous.is_none(),
                "{kind:?} is claimed by both {previous:?} and {handler:?}"
            );
        }
    }
    map
});

pub(crate) fn handler_for_kind(kind: SyntaxKind) -> Option<TypeHandler> {
    TYPE_HANDLERS.get(&kind).copied()
}

// =============================================================================
// Helpers
// =============================================================================

/// `Number(text)` for the literal forms a numeric literal can take.
pub(crate) fn parse_js_number(text: &str) -> f64 {
    let text: String = text.chars().filter(|c| *c != '_' && !c.is_whitespace()).collect();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(&text)),
    };
    let radix = |prefix: [&str; 2], radix: u32| {
        prefix
            .iter()
            .find_map(|p| digits.strip_prefix(p))
            .map(|rest| u64::from_str_radix(rest, radix).map_or(f64::NAN, |v| v as f64))
    };
    let value = radix(["0x", "0X"], 16)
        .or_else(|| radix(["0o", "0O"], 8))
        .or_else(|| radix(["0b", "0B"], 2))
        .unwrap_or_else(|| match digits {
            "Infinity" => f64::INFINITY,
            _ => digits.parse::<f64>().unwrap_or(f64::NAN),
        });
    if negative { -value } else { value }
}

fn mapped_modifier(token: Option<MappedModifierToken>) -> Option<MappedModifier> {
    token.map(|token| match token {
        MappedModifierToken::Bare | MappedModifierToken::Plus => MappedModifier::Add,
        MappedModifierToken::Minus => MappedModifier::Remove,
    })
}

fn operator_kind(token: TypeOperatorToken) -> TypeOperatorKind {
    match token {
        TypeOperatorToken::KeyOf => TypeOperatorKind::KeyOf,
        TypeOperatorToken::Unique => TypeOperatorKind::Unique,
        TypeOperatorToken::Readonly => TypeOperatorKind::Readonly,
    }
}

fn bigint_digits(text: &str) -> String {
    text.trim().trim_end_matches('n').to_string()
}

impl<'a> ConverterState<'a> {
    // =========================================================================
    // Entry points
    // =========================================================================

    /// Convert a written type node or an inferred type.
    pub(crate) fn convert_type(&mut self, context: Context, ty: TypeOrNode) -> Result<Type> {
        match ty {
            TypeOrNode::Node(node) => self.convert_type_node(context, node),
            TypeOrNode::Type(ty) => self.convert_inferred_type(context, ty),
        }
    }

    /// A missing type is `any`.
    pub(crate) fn convert_optional_type(
        &mut self,
        context: Context,
        ty: Option<TypeOrNode>,
    ) -> Result<Type> {
        match ty {
            Some(ty) => self.convert_type(context, ty),
            None => Ok(Type::intrinsic("any")),
        }
    }

    fn convert_type_node(&mut self, context: Context, node: NodeId) -> Result<Type> {
        let kind = self.source.node(node).syntax_kind();
        match handler_for_kind(kind) {
            Some(handler) => self.convert_node_with(handler, context, node),
            None => Ok(self.unsupported_node(node)),
        }
    }

    fn convert_inferred_type(&mut self, context: Context, ty: TypeId) -> Result<Type> {
        let source = self.source;
        let Some(node) = source.type_to_type_node(ty) else {
            return Ok(self.unsupported_type(context, ty));
        };
        let kind = source.node(node).syntax_kind();

        // References and arrays name their target instead of expanding it.
        let guarded = match source.type_symbol(ty) {
            Some(symbol) if !matches!(kind, SyntaxKind::TypeReference | SyntaxKind::ArrayType) => {
                match self.expanding.enter(symbol) {
                    CycleResult::Entered => Some(symbol),
                    denied => {
                        let text = source.type_to_string(ty);
                        debug!(?denied, "refusing to recurse when converting type: {text}");
                        return Ok(Type::unknown(text));
                    }
                }
            }
            _ => None,
        };

        let result = match handler_for_kind(kind) {
            Some(handler) if handler.supports_types() => {
                self.convert_type_with(handler, context, ty, node)
            }
            _ => Ok(self.unsupported_type(context, ty)),
        };
        if let Some(symbol) = guarded {
            self.expanding.leave(symbol);
        }
        result
    }

    fn unsupported_node(&mut self, node: NodeId) -> Type {
        let data = self.source.node(node);
        let text = data.text.clone();
        self.report(
            DiagnosticKind::UnsupportedType,
            format!(
                "failed to convert type node with kind {:?} and text `{text}`",
                data.syntax_kind()
            ),
            Some(node),
        );
        Type::unknown(text)
    }

    fn unsupported_type(&mut self, context: Context, ty: TypeId) -> Type {
        let text = self.source.type_to_string(ty);
        let scope = self.project.full_name(context.scope);
        self.report(
            DiagnosticKind::UnsupportedType,
            format!("failed to convert type `{text}` while converting `{scope}`"),
            None,
        );
        Type::unknown(text)
    }

    fn node_text(&self, node: NodeId) -> String {
        self.source.node(node).text.clone()
    }

    fn convert_nodes(&mut self, context: Context, nodes: &[NodeId]) -> Result<Vec<Type>> {
        nodes
            .iter()
            .map(|node| self.convert_type_node(context, *node))
            .collect()
    }

    fn convert_types(&mut self, context: Context, types: &[TypeId]) -> Result<Vec<Type>> {
        types
            .iter()
            .map(|ty| self.convert_inferred_type(context, *ty))
            .collect()
    }

    fn convert_boxed(&mut self, context: Context, ty: TypeOrNode) -> Result<Box<Type>> {
        self.convert_type(context, ty).map(Box::new)
    }

    // =========================================================================
    // Node conversion
    // =========================================================================

    fn convert_node_with(
        &mut self,
        handler: TypeHandler,
        context: Context,
        node: NodeId,
    ) -> Result<Type> {
        let source = self.source;
        let data = source.node(node);
        use TypeOrNode::Node as N;

        let converted = match (handler, &data.kind) {
            (TypeHandler::Array, NodeKind::ArrayType { element_type }) => {
                Type::array(self.convert_type(context, N(*element_type))?)
            }
            (
                TypeHandler::Conditional,
                NodeKind::ConditionalType {
                    check_type,
                    extends_type,
                    true_type,
                    false_type,
                },
            ) => Type::Conditional {
                check_type: self.convert_boxed(context, N(*check_type))?,
                extends_type: self.convert_boxed(context, N(*extends_type))?,
                true_type: self.convert_boxed(context, N(*true_type))?,
                false_type: self.convert_boxed(context, N(*false_type))?,
            },
            (
                TypeHandler::ConstructorType,
                NodeKind::ConstructorType {
                    type_parameters,
                    parameters,
                    ty,
                },
            ) => self.convert_function_like_node(
                context,
                node,
                ReflectionKind::Constructor,
                type_parameters,
                parameters,
                *ty,
            )?,
            (
                TypeHandler::FunctionType,
                NodeKind::FunctionType {
                    type_parameters,
                    parameters,
                    ty,
                },
            ) => self.convert_function_like_node(
                context,
                node,
                ReflectionKind::TypeLiteral,
                type_parameters,
                parameters,
                *ty,
            )?,
            (
                TypeHandler::ExpressionWithTypeArguments,
                NodeKind::ExpressionWithTypeArguments {
                    expression,
                    type_arguments,
                },
            ) => match source.symbol_at_location(*expression) {
                Some(symbol) => {
                    let arguments = self.convert_nodes(context, type_arguments)?;
                    Type::Reference(self.reference_to(symbol, arguments))
                }
                None => match source.type_at_location(node) {
                    Some(ty) => self.convert_inferred_type(context, ty)?,
                    None => self.unsupported_node(node),
                },
            },
            (
                TypeHandler::ImportType,
                NodeKind::ImportType {
                    qualifier,
                    type_arguments,
                },
            ) => {
                let name = qualifier
                    .map(|qualifier| self.node_text(qualifier))
                    .unwrap_or_else(|| "__module".to_string());
                let symbol = source
                    .symbol_at_location(node)
                    .ok_or_else(|| self.missing_symbol(node))?;
                let arguments = self.convert_nodes(context, type_arguments)?;
                Type::Reference(
                    ReferenceType::new(name, self.reference_target(symbol))
                        .with_type_arguments(arguments),
                )
            }
            (
                TypeHandler::IndexedAccess,
                NodeKind::IndexedAccessType {
                    object_type,
                    index_type,
                },
            ) => Type::IndexedAccess {
                object_type: self.convert_boxed(context, N(*object_type))?,
                index_type: self.convert_boxed(context, N(*index_type))?,
            },
            (TypeHandler::Infer, NodeKind::InferType { type_parameter }) => {
                let name = match &source.node(*type_parameter).kind {
                    NodeKind::TypeParameter { name, .. } => name.clone(),
                    _ => self.node_text(*type_parameter),
                };
                Type::Inferred { name }
            }
            (TypeHandler::Intersection, NodeKind::IntersectionType { types }) => {
                Type::Intersection {
                    types: self.convert_nodes(context, types)?,
                }
            }
            (TypeHandler::Union, NodeKind::UnionType { types }) => Type::Union {
                types: self.convert_nodes(context, types)?,
            },
            (TypeHandler::JsDocVariadic, NodeKind::JsDocVariadicType { ty }) => {
                Type::array(self.convert_type(context, N(*ty))?)
            }
            (TypeHandler::Keyword, NodeKind::Keyword(keyword)) => Type::intrinsic(keyword.name()),
            (TypeHandler::Optional, NodeKind::OptionalType { ty }) => {
                Type::optional(self.convert_type(context, N(*ty))?.remove_undefined())
            }
            (TypeHandler::Parenthesized, NodeKind::ParenthesizedType { ty }) => {
                self.convert_type(context, N(*ty))?
            }
            (
                TypeHandler::Predicate,
                NodeKind::TypePredicate {
                    parameter_name,
                    asserts,
                    ty,
                },
            ) => {
                let name = if source.node(*parameter_name).syntax_kind() == SyntaxKind::ThisType {
                    "this".to_string()
                } else {
                    self.node_text(*parameter_name)
                };
                let target_type = match ty {
                    Some(ty) => Some(self.convert_boxed(context, N(*ty))?),
                    None => None,
                };
                Type::Predicate {
                    name,
                    asserts: *asserts,
                    target_type,
                }
            }
            (TypeHandler::TypeLiteral, NodeKind::TypeLiteral { .. }) => {
                let symbol = source
                    .symbol_at_location(node)
                    .or_else(|| source.symbol_of_declaration(node));
                let ty = source.type_at_location(node);
                match (symbol, ty) {
                    (Some(symbol), Some(ty)) => self.convert_type_literal(
                        context.converting_type_node(),
                        symbol,
                        ty,
                        Some(node),
                    )?,
                    _ => Type::intrinsic("Object"),
                }
            }
            (TypeHandler::Query, NodeKind::TypeQuery { expr_name }) => {
                let symbol = source
                    .symbol_at_location(*expr_name)
                    .ok_or_else(|| self.missing_symbol(*expr_name))?;
                let target = self.resolve_aliased_symbol(symbol);
                Type::Query {
                    query_type: ReferenceType::new(
                        self.node_text(*expr_name),
                        self.reference_target(target),
                    ),
                }
            }
            (
                TypeHandler::Reference,
                NodeKind::TypeReference {
                    type_name,
                    type_arguments,
                },
            ) => {
                let is_array = source
                    .type_at_location(*type_name)
                    .and_then(|ty| source.type_to_type_node(ty))
                    .is_some_and(|n| source.node(n).syntax_kind() == SyntaxKind::ArrayType);
                if is_array {
                    let element = type_arguments.first().map(|n| N(*n));
                    Type::array(self.convert_optional_type(context, element)?)
                } else {
                    let symbol = source
                        .symbol_at_location(*type_name)
                        .ok_or_else(|| self.missing_symbol(*type_name))?;
                    let target = self.resolve_aliased_symbol(symbol);
                    let arguments = self.convert_nodes(context, type_arguments)?;
                    Type::Reference(
                        ReferenceType::new(self.node_text(*type_name), self.reference_target(target))
                            .with_type_arguments(arguments),
                    )
                }
            }
            (TypeHandler::Rest, NodeKind::RestType { ty }) => {
                Type::rest(self.convert_type(context, N(*ty))?)
            }
            (
                TypeHandler::NamedTupleMember,
                NodeKind::NamedTupleMember {
                    name,
                    question,
                    dot_dot_dot,
                    ty,
                },
            ) => {
                let element = self.convert_type(context, N(*ty))?;
                if *dot_dot_dot {
                    Type::rest(element)
                } else {
                    Type::named_tuple_member(name.clone(), *question, element)
                }
            }
            (TypeHandler::Mapped, NodeKind::MappedType { .. }) => {
                self.convert_mapped_node(context, node)?
            }
            (TypeHandler::BooleanLiteral, kind) => {
                Type::literal(LiteralValue::Boolean(matches!(kind, NodeKind::TrueKeyword)))
            }
            (TypeHandler::NullLiteral, _) => Type::literal(LiteralValue::Null),
            (TypeHandler::This, _) => Type::intrinsic("this"),
            (TypeHandler::Literal, NodeKind::LiteralType { literal }) => {
                match self.literal_value(*literal) {
                    Some(value) => Type::literal(value),
                    None => self.unsupported_node(*literal),
                }
            }
            (TypeHandler::TemplateLiteral, NodeKind::TemplateLiteralType { head, spans }) => {
                let mut tail = Vec::with_capacity(spans.len());
                for span in spans {
                    tail.push((self.convert_type(context, N(span.ty))?, span.literal.clone()));
                }
                Type::TemplateLiteral {
                    head: head.clone(),
                    tail,
                }
            }
            (TypeHandler::Tuple, NodeKind::TupleType { elements }) => Type::Tuple {
                elements: self.convert_nodes(context, elements)?,
            },
            (TypeHandler::TypeOperator, NodeKind::TypeOperator { operator, ty }) => {
                Type::type_operator(operator_kind(*operator), self.convert_type(context, N(*ty))?)
            }
            (TypeHandler::JsDocNullable, NodeKind::JsDocNullableType { ty }) => Type::Union {
                types: vec![
                    self.convert_type(context, N(*ty))?,
                    Type::literal(LiteralValue::Null),
                ],
            },
            (TypeHandler::JsDocNonNullable, NodeKind::JsDocNonNullableType { ty }) => {
                self.convert_type(context, N(*ty))?
            }
            (_, other) => {
                return Err(ConvertError::UnexpectedNode {
                    expected: "type node",
                    found: other.syntax_kind(),
                    position: source.position_of(node),
                });
            }
        };
        Ok(converted)
    }

    /// Function and constructor type nodes become an anonymous declaration
    /// holding a single signature.
    fn convert_function_like_node(
        &mut self,
        context: Context,
        node: NodeId,
        kind: ReflectionKind,
        type_parameters: &[NodeId],
        parameters: &[NodeId],
        return_type: NodeId,
    ) -> Result<Type> {
        let source = self.source;
        let symbol = source
            .symbol_at_location(node)
            .or_else(|| source.symbol_of_declaration(node));
        if symbol.is_none() || source.type_at_location(node).is_none() {
            return Ok(Type::intrinsic("Function"));
        }

        let declaration = self.create_anonymous_reflection(context, kind, symbol, Some(node));
        let mut declaration_context = context.with_scope(declaration);
        let signature_kind = if kind == ReflectionKind::Constructor {
            declaration_context = declaration_context.converting_type_node();
            ReflectionKind::ConstructorSignature
        } else {
            ReflectionKind::CallSignature
        };

        let signature =
            self.create_signature_reflection(declaration_context, "__type", signature_kind);
        if source
            .combined_modifier_flags(node)
            .contains(ModifierFlags::ABSTRACT)
        {
            self.set_flag(signature, ReflectionFlags::ABSTRACT, true);
        }
        self.declaration_mut(declaration)?.signatures.push(signature);

        let signature_context = declaration_context.with_scope(signature);
        let ty = self.convert_type(signature_context, TypeOrNode::Node(return_type))?;
        let parameters = self.convert_parameter_nodes(signature_context, signature, parameters)?;
        let type_parameters = self.convert_type_parameter_nodes(signature_context, type_parameters)?;
        if let Some(data) = self
            .project
            .get_mut(signature)
            .and_then(|reflection| reflection.as_signature_mut())
        {
            data.ty = Some(ty);
            data.parameters = parameters;
            data.type_parameters = type_parameters;
        }
        Ok(Type::Reflection { declaration })
    }

    fn convert_mapped_node(&mut self, context: Context, node: NodeId) -> Result<Type> {
        let source = self.source;
        let NodeKind::MappedType {
            type_parameter,
            name_type,
            readonly_token,
            question_token,
            ty,
        } = &source.node(node).kind
        else {
            return Ok(self.unsupported_node(node));
        };
        let (parameter, constraint) = match &source.node(*type_parameter).kind {
            NodeKind::TypeParameter {
                name, constraint, ..
            } => (name.clone(), *constraint),
            _ => (self.node_text(*type_parameter), None),
        };

        let optional_modifier = mapped_modifier(*question_token);
        let mut template_type = self.convert_optional_type(context, ty.map(TypeOrNode::Node))?;
        if optional_modifier == Some(MappedModifier::Add) {
            template_type = template_type.remove_undefined();
        }
        let parameter_type =
            self.convert_optional_type(context, constraint.map(TypeOrNode::Node))?;
        let name_type = match name_type {
            Some(name_type) => Some(self.convert_boxed(context, TypeOrNode::Node(*name_type))?),
            None => None,
        };

        Ok(Type::Mapped(MappedType {
            parameter,
            parameter_type: Box::new(parameter_type),
            template_type: Box::new(template_type),
            readonly_modifier: mapped_modifier(*readonly_token),
            optional_modifier,
            name_type,
        }))
    }

    /// The value of a literal expression inside a literal type node.
    fn literal_value(&self, literal: NodeId) -> Option<LiteralValue> {
        let source = self.source;
        let data = source.node(literal);
        let value = match &data.kind {
            NodeKind::TrueKeyword => LiteralValue::Boolean(true),
            NodeKind::FalseKeyword => LiteralValue::Boolean(false),
            NodeKind::NullKeyword => LiteralValue::Null,
            NodeKind::StringLiteral { value } | NodeKind::NoSubstitutionTemplateLiteral { value } => {
                LiteralValue::String(value.clone())
            }
            NodeKind::NumericLiteral => LiteralValue::Number(parse_js_number(&data.text)),
            NodeKind::BigIntLiteral => LiteralValue::BigInt {
                negative: false,
                value: bigint_digits(&data.text),
            },
            NodeKind::PrefixUnaryExpression { operator, operand } => {
                let negative = *operator == PrefixOperator::Minus;
                let operand_node = source.node(*operand);
                match operand_node.kind {
                    NodeKind::NumericLiteral => {
                        let value = parse_js_number(&operand_node.text);
                        LiteralValue::Number(if negative { -value } else { value })
                    }
                    NodeKind::BigIntLiteral => LiteralValue::BigInt {
                        negative,
                        value: bigint_digits(&operand_node.text),
                    },
                    _ => return None,
                }
            }
            _ => return None,
        };
        Some(value)
    }

    fn reference_to(&self, symbol: SymbolId, arguments: Vec<Type>) -> ReferenceType {
        let name = self.source.symbol_name(symbol).to_string();
        let target = self.resolve_aliased_symbol(symbol);
        ReferenceType::new(name, self.reference_target(target)).with_type_arguments(arguments)
    }

    /// Members of an object type become an anonymous type literal.
    fn convert_type_literal(
        &mut self,
        context: Context,
        symbol: SymbolId,
        ty: TypeId,
        node: Option<NodeId>,
    ) -> Result<Type> {
        let source = self.source;
        let declaration =
            self.create_anonymous_reflection(context, ReflectionKind::TypeLiteral, Some(symbol), node);
        let literal_context = context.with_scope(declaration);

        for property in source.properties_of_type(ty) {
            self.convert_symbol(literal_context, property, None)?;
        }
        for signature in source.signatures_of_type(ty, SignatureKind::Call) {
            self.create_signature(literal_context, ReflectionKind::CallSignature, signature, None)?;
        }
        self.convert_index_signature(literal_context, Some(symbol))?;
        Ok(Type::Reflection { declaration })
    }

    // =========================================================================
    // Inferred type conversion
    // =========================================================================

    fn convert_type_with(
        &mut self,
        handler: TypeHandler,
        context: Context,
        ty: TypeId,
        node: NodeId,
    ) -> Result<Type> {
        let source = self.source;
        let shape = source.type_shape(ty);
        use TypeOrNode::Type as T;

        let converted = match handler {
            TypeHandler::Array => match source.type_arguments(ty).first() {
                Some(element) => Type::array(self.convert_inferred_type(context, *element)?),
                None => self.unsupported_type(context, ty),
            },
            TypeHandler::Conditional => match shape {
                TypeShape::Conditional {
                    check_type,
                    extends_type,
                    resolved_true_type,
                    resolved_false_type,
                } => Type::Conditional {
                    check_type: self.convert_boxed(context, T(check_type))?,
                    extends_type: self.convert_boxed(context, T(extends_type))?,
                    true_type: self.convert_boxed(context, T(resolved_true_type))?,
                    false_type: self.convert_boxed(context, T(resolved_false_type))?,
                },
                _ => self.unsupported_type(context, ty),
            },
            TypeHandler::ConstructorType | TypeHandler::FunctionType => {
                let Some(symbol) = source.type_symbol(ty) else {
                    return Ok(Type::intrinsic("Function"));
                };
                let (kind, signature_kind, reflection_kind) =
                    if handler == TypeHandler::ConstructorType {
                        (
                            SignatureKind::Construct,
                            ReflectionKind::ConstructorSignature,
                            ReflectionKind::Constructor,
                        )
                    } else {
                        (
                            SignatureKind::Call,
                            ReflectionKind::CallSignature,
                            ReflectionKind::TypeLiteral,
                        )
                    };
                let declaration =
                    self.create_anonymous_reflection(context, reflection_kind, Some(symbol), Some(node));
                if let Some(signature) = source.signatures_of_type(ty, kind).first() {
                    self.create_signature(
                        context.with_scope(declaration),
                        signature_kind,
                        *signature,
                        None,
                    )?;
                }
                Type::Reflection { declaration }
            }
            TypeHandler::ImportType => {
                let symbol = source.type_symbol(ty).ok_or_else(|| {
                    ConvertError::Invariant(format!(
                        "import type `{}` has no symbol",
                        source.type_to_string(ty)
                    ))
                })?;
                Type::Reference(ReferenceType::new("__module", self.reference_target(symbol)))
            }
            TypeHandler::IndexedAccess => match shape {
                TypeShape::IndexedAccess {
                    object_type,
                    index_type,
                } => Type::IndexedAccess {
                    object_type: self.convert_boxed(context, T(object_type))?,
                    index_type: self.convert_boxed(context, T(index_type))?,
                },
                _ => self.unsupported_type(context, ty),
            },
            TypeHandler::Infer => Type::Inferred {
                name: source
                    .type_symbol(ty)
                    .map(|symbol| source.symbol_name(symbol).to_string())
                    .unwrap_or_else(|| source.type_to_string(ty)),
            },
            TypeHandler::Intersection => match shape {
                TypeShape::Intersection { types } => Type::Intersection {
                    types: self.convert_types(context, &types)?,
                },
                _ => self.unsupported_type(context, ty),
            },
            TypeHandler::Union => match shape {
                TypeShape::Union {
                    origin: Some(origin),
                    ..
                } => self.convert_inferred_type(context, origin)?,
                TypeShape::Union { types, .. } => Type::Union {
                    types: self.convert_types(context, &types)?,
                },
                _ => self.unsupported_type(context, ty),
            },
            TypeHandler::Keyword => match &source.node(node).kind {
                NodeKind::Keyword(keyword) => Type::intrinsic(keyword.name()),
                _ => Type::intrinsic(source.type_to_string(ty)),
            },
            TypeHandler::TypeLiteral => match source.type_symbol(ty) {
                Some(symbol) => self.convert_type_literal(context, symbol, ty, Some(node))?,
                None => Type::intrinsic("Object"),
            },
            TypeHandler::Query => {
                let symbol = source.type_symbol(ty).ok_or_else(|| {
                    ConvertError::Invariant(format!(
                        "type query `{}` has no symbol",
                        source.type_to_string(ty)
                    ))
                })?;
                let name = source.symbol_name(symbol).to_string();
                let target = self.resolve_aliased_symbol(symbol);
                Type::Query {
                    query_type: ReferenceType::new(name, self.reference_target(target)),
                }
            }
            TypeHandler::Reference => self.convert_reference_type(context, ty)?,
            TypeHandler::Mapped => self.convert_mapped_node(context, node)?,
            TypeHandler::BooleanLiteral => {
                let value = source.node(node).syntax_kind() == SyntaxKind::TrueKeyword;
                Type::literal(LiteralValue::Boolean(value))
            }
            TypeHandler::NullLiteral => Type::literal(LiteralValue::Null),
            TypeHandler::This => Type::intrinsic("this"),
            TypeHandler::Literal => self.convert_literal_type(context, ty, node),
            TypeHandler::TemplateLiteral => match shape {
                TypeShape::TemplateLiteral { texts, types } => {
                    if texts.len() != types.len() + 1 {
                        return Err(ConvertError::Invariant(format!(
                            "template literal `{}` has {} texts for {} types",
                            source.type_to_string(ty),
                            texts.len(),
                            types.len()
                        )));
                    }
                    let mut tail = Vec::with_capacity(types.len());
                    for (ty, text) in types.iter().zip(texts.iter().skip(1)) {
                        tail.push((self.convert_inferred_type(context, *ty)?, text.clone()));
                    }
                    Type::TemplateLiteral {
                        head: texts[0].clone(),
                        tail,
                    }
                }
                _ => self.unsupported_type(context, ty),
            },
            TypeHandler::Tuple => self.convert_tuple_type(context, ty, node)?,
            TypeHandler::TypeOperator => self.convert_type_operator_type(context, ty, node)?,
            TypeHandler::ExpressionWithTypeArguments
            | TypeHandler::JsDocVariadic
            | TypeHandler::Optional
            | TypeHandler::Parenthesized
            | TypeHandler::Predicate
            | TypeHandler::Rest
            | TypeHandler::NamedTupleMember
            | TypeHandler::JsDocNullable
            | TypeHandler::JsDocNonNullable => self.unsupported_type(context, ty),
        };
        Ok(converted)
    }

    fn convert_reference_type(&mut self, context: Context, ty: TypeId) -> Result<Type> {
        let source = self.source;
        let alias = source.alias_symbol(ty);
        let Some(symbol) = alias.or_else(|| source.type_symbol(ty)) else {
            // Type parameters synthesized by the checker, e.g. the key of a
            // mapped type.
            return Ok(Type::Reference(ReferenceType::broken(source.type_to_string(ty))));
        };
        let arguments = if alias.is_some() {
            source.alias_type_arguments(ty)
        } else {
            source.type_arguments(ty)
        };
        let arguments = self.convert_types(context, &arguments)?;
        Ok(Type::Reference(self.reference_to(symbol, arguments)))
    }

    fn convert_literal_type(&mut self, context: Context, ty: TypeId, node: NodeId) -> Type {
        let source = self.source;
        if let NodeKind::LiteralType { literal } = &source.node(node).kind {
            let literal_kind = source.node(*literal).syntax_kind();
            if matches!(
                literal_kind,
                SyntaxKind::TrueKeyword
                    | SyntaxKind::FalseKeyword
                    | SyntaxKind::NullKeyword
                    | SyntaxKind::StringLiteral
                    | SyntaxKind::NumericLiteral
            ) {
                if let Some(value) = self.literal_value(*literal) {
                    return Type::literal(value);
                }
            }
        }
        match source.type_shape(ty) {
            TypeShape::Literal(LiteralTypeValue::String(value)) => {
                Type::literal(LiteralValue::String(value))
            }
            TypeShape::Literal(LiteralTypeValue::Number(value)) => {
                Type::literal(LiteralValue::Number(value))
            }
            TypeShape::Literal(LiteralTypeValue::BigInt(value)) => {
                Type::literal(LiteralValue::BigInt {
                    negative: value.negative,
                    value: value.base10_value,
                })
            }
            _ => self.unsupported_type(context, ty),
        }
    }

    fn convert_tuple_type(&mut self, context: Context, ty: TypeId, node: NodeId) -> Result<Type> {
        let source = self.source;
        let element_count = match &source.node(node).kind {
            NodeKind::TupleType { elements } => elements.len(),
            _ => usize::MAX,
        };
        let arguments: Vec<TypeId> = source
            .type_arguments(ty)
            .into_iter()
            .take(element_count)
            .collect();
        let target = match source.type_shape(ty) {
            TypeShape::Object(ObjectKind::Reference { target }) => match source.type_shape(target) {
                TypeShape::Object(ObjectKind::Tuple(tuple)) => tuple,
                _ => Default::default(),
            },
            TypeShape::Object(ObjectKind::Tuple(tuple)) => tuple,
            _ => Default::default(),
        };

        let mut elements = self.convert_types(context, &arguments)?;

        if let Some(labels) = &target.labeled_declarations {
            for (element, label) in elements.iter_mut().zip(labels) {
                let (name, question) = match &source.node(*label).kind {
                    NodeKind::NamedTupleMember { name, question, .. }
                    | NodeKind::Parameter { name, question, .. } => (name.clone(), *question),
                    _ => (self.node_text(*label), false),
                };
                let inner = std::mem::replace(element, Type::intrinsic("any"));
                *element = Type::named_tuple_member(name, question, inner.remove_undefined());
            }
        }

        for (element, flags) in elements.iter_mut().zip(&target.element_flags) {
            let current = std::mem::replace(element, Type::intrinsic("any"));
            *element = if flags.intersects(ElementFlags::VARIABLE) {
                let inner = match current {
                    Type::NamedTupleMember { element, .. } => *element,
                    other => other,
                };
                Type::rest(Type::array(inner))
            } else if flags.contains(ElementFlags::OPTIONAL)
                && !matches!(current, Type::NamedTupleMember { .. })
            {
                Type::optional(current.remove_undefined())
            } else {
                current
            };
        }

        Ok(Type::Tuple { elements })
    }

    fn convert_type_operator_type(
        &mut self,
        context: Context,
        ty: TypeId,
        node: NodeId,
    ) -> Result<Type> {
        let source = self.source;
        let NodeKind::TypeOperator { operator, .. } = &source.node(node).kind else {
            return Ok(self.unsupported_type(context, ty));
        };
        match operator {
            TypeOperatorToken::Readonly => {
                let target = match source.type_shape(ty) {
                    TypeShape::Object(ObjectKind::Reference { target }) => Some(target),
                    _ => None,
                };
                let target_shape = target.map(|target| source.type_shape(target));
                let is_tuple = match target_shape {
                    Some(TypeShape::Object(ObjectKind::Tuple(_))) => true,
                    Some(TypeShape::Object(_)) => false,
                    _ => {
                        return Err(ConvertError::Invariant(format!(
                            "readonly operand of `{}` is not an object reference",
                            source.type_to_string(ty)
                        )));
                    }
                };
                let arguments = self.convert_types(context, &source.type_arguments(ty))?;
                let inner = if is_tuple {
                    Type::Tuple {
                        elements: arguments,
                    }
                } else {
                    let element = arguments
                        .into_iter()
                        .next()
                        .unwrap_or_else(|| Type::intrinsic("any"));
                    Type::array(element)
                };
                Ok(Type::type_operator(TypeOperatorKind::Readonly, inner))
            }
            TypeOperatorToken::KeyOf => match source.type_shape(ty) {
                TypeShape::Union {
                    origin: Some(origin),
                    ..
                } => self.convert_inferred_type(context, origin),
                TypeShape::Index { target } => Ok(Type::type_operator(
                    TypeOperatorKind::KeyOf,
                    self.convert_inferred_type(context, target)?,
                )),
                _ => Ok(self.unsupported_type(context, ty)),
            },
            TypeOperatorToken::Unique => Ok(self.unsupported_type(context, ty)),
        }
    }
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod tests;
