//! Syntax nodes exposed by a semantic source.
//!
//! Nodes are stored in an arena owned by the source and addressed by
//! [`NodeId`]. Each node carries a typed payload ([`NodeKind`]) holding the
//! child ids the converter needs, plus the raw source text used for display
//! and diagnostics.
//!
//! [`SyntaxKind`] is the fieldless discriminant of [`NodeKind`]; dispatch
//! tables are keyed by it.

use crate::flags::{ModifierFlags, NodeFlags};
use crate::ids::NodeId;
use serde::Serialize;
use std::fmt;

// =============================================================================
// Positions
// =============================================================================

/// A zero-based line/character position inside a named file.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcePosition {
    pub file_name: String,
    pub line: u32,
    pub character: u32,
}

impl SourcePosition {
    pub fn new(file_name: impl Into<String>, line: u32, character: u32) -> Self {
        Self {
            file_name: file_name.into(),
            line,
            character,
        }
    }
}

impl fmt::Display for SourcePosition {
    /// Renders one-based `file:line:character`, the form editors understand.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file_name, self.line + 1, self.character + 1)
    }
}

// =============================================================================
// Token payloads
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Keyword {
    Any,
    BigInt,
    Boolean,
    Never,
    Number,
    Object,
    String,
    Symbol,
    Undefined,
    Unknown,
    Void,
    Intrinsic,
}

impl Keyword {
    pub const fn name(self) -> &'static str {
        match self {
            Keyword::Any => "any",
            Keyword::BigInt => "bigint",
            Keyword::Boolean => "boolean",
            Keyword::Never => "never",
            Keyword::Number => "number",
            Keyword::Object => "object",
            Keyword::String => "string",
            Keyword::Symbol => "symbol",
            Keyword::Undefined => "undefined",
            Keyword::Unknown => "unknown",
            Keyword::Void => "void",
            Keyword::Intrinsic => "intrinsic",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeOperatorToken {
    KeyOf,
    Unique,
    Readonly,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrefixOperator {
    Minus,
    Plus,
    Tilde,
    Exclamation,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HeritageToken {
    Extends,
    Implements,
}

/// The `readonly`/`?` modifier token of a mapped type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MappedModifierToken {
    /// `readonly` or `?` written without a sign.
    Bare,
    Plus,
    Minus,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeritageClause {
    pub token: HeritageToken,
    /// `ExpressionWithTypeArguments` nodes.
    pub types: Vec<NodeId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateSpan {
    pub ty: NodeId,
    pub literal: String,
}

// =============================================================================
// NodeKind
// =============================================================================

/// Payload of a syntax node.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    // ----- Files and declarations -----
    SourceFile {
        file_name: String,
        statements: Vec<NodeId>,
    },
    ModuleDeclaration {
        body: Vec<NodeId>,
    },
    ClassDeclaration {
        type_parameters: Vec<NodeId>,
        heritage_clauses: Vec<HeritageClause>,
        members: Vec<NodeId>,
    },
    InterfaceDeclaration {
        type_parameters: Vec<NodeId>,
        heritage_clauses: Vec<HeritageClause>,
        members: Vec<NodeId>,
    },
    EnumDeclaration {
        members: Vec<NodeId>,
    },
    EnumMember {
        initializer: Option<NodeId>,
    },
    TypeAliasDeclaration {
        type_parameters: Vec<NodeId>,
        ty: NodeId,
    },
    FunctionDeclaration {
        type_parameters: Vec<NodeId>,
        parameters: Vec<NodeId>,
        ty: Option<NodeId>,
    },
    VariableDeclarationList {
        declarations: Vec<NodeId>,
    },
    VariableDeclaration {
        ty: Option<NodeId>,
        initializer: Option<NodeId>,
    },
    Constructor {
        parameters: Vec<NodeId>,
    },
    MethodDeclaration {
        private_name: bool,
        type_parameters: Vec<NodeId>,
        parameters: Vec<NodeId>,
        ty: Option<NodeId>,
    },
    MethodSignature {
        type_parameters: Vec<NodeId>,
        parameters: Vec<NodeId>,
        ty: Option<NodeId>,
    },
    PropertyDeclaration {
        private_name: bool,
        ty: Option<NodeId>,
        initializer: Option<NodeId>,
    },
    PropertySignature {
        ty: Option<NodeId>,
    },
    PropertyAssignment {
        initializer: NodeId,
    },
    GetAccessor {
        private_name: bool,
        parameters: Vec<NodeId>,
        ty: Option<NodeId>,
    },
    SetAccessor {
        private_name: bool,
        parameters: Vec<NodeId>,
    },
    CallSignature {
        type_parameters: Vec<NodeId>,
        parameters: Vec<NodeId>,
        ty: Option<NodeId>,
    },
    ConstructSignature {
        type_parameters: Vec<NodeId>,
        parameters: Vec<NodeId>,
        ty: Option<NodeId>,
    },
    IndexSignature {
        parameters: Vec<NodeId>,
        ty: Option<NodeId>,
    },
    Parameter {
        name: String,
        ty: Option<NodeId>,
        initializer: Option<NodeId>,
        question: bool,
        dot_dot_dot: bool,
    },
    TypeParameter {
        name: String,
        constraint: Option<NodeId>,
        default: Option<NodeId>,
    },
    ExportSpecifier,
    ImportSpecifier,
    NamespaceExport,
    ExportAssignment,
    JsDocTypedefTag {
        type_expression: Option<NodeId>,
    },
    JsDocCallbackTag {
        parameters: Vec<NodeId>,
        ty: Option<NodeId>,
    },
    JsDocEnumTag {
        type_expression: Option<NodeId>,
    },
    JsDocParameterTag {
        name: String,
        bracketed: bool,
        type_expression: Option<NodeId>,
    },

    // ----- Expressions -----
    Identifier,
    PrivateIdentifier,
    QualifiedName {
        left: NodeId,
        right: NodeId,
    },
    StringLiteral {
        value: String,
    },
    NumericLiteral,
    BigIntLiteral,
    NoSubstitutionTemplateLiteral {
        value: String,
    },
    TrueKeyword,
    FalseKeyword,
    NullKeyword,
    ThisKeyword,
    PrefixUnaryExpression {
        operator: PrefixOperator,
        operand: NodeId,
    },
    ArrayLiteralExpression {
        elements: Vec<NodeId>,
    },
    ObjectLiteralExpression {
        properties: Vec<NodeId>,
    },
    ArrowFunction {
        type_parameters: Vec<NodeId>,
        parameters: Vec<NodeId>,
        ty: Option<NodeId>,
    },
    FunctionExpression {
        type_parameters: Vec<NodeId>,
        parameters: Vec<NodeId>,
        ty: Option<NodeId>,
    },
    PropertyAccessExpression,
    /// Any expression the converter only needs as text.
    OtherExpression,

    // ----- Type nodes -----
    ArrayType {
        element_type: NodeId,
    },
    ConditionalType {
        check_type: NodeId,
        extends_type: NodeId,
        true_type: NodeId,
        false_type: NodeId,
    },
    ConstructorType {
        type_parameters: Vec<NodeId>,
        parameters: Vec<NodeId>,
        ty: NodeId,
    },
    ExpressionWithTypeArguments {
        expression: NodeId,
        type_arguments: Vec<NodeId>,
    },
    FunctionType {
        type_parameters: Vec<NodeId>,
        parameters: Vec<NodeId>,
        ty: NodeId,
    },
    ImportType {
        qualifier: Option<NodeId>,
        type_arguments: Vec<NodeId>,
    },
    IndexedAccessType {
        object_type: NodeId,
        index_type: NodeId,
    },
    InferType {
        type_parameter: NodeId,
    },
    IntersectionType {
        types: Vec<NodeId>,
    },
    JsDocVariadicType {
        ty: NodeId,
    },
    JsDocNullableType {
        ty: NodeId,
    },
    JsDocNonNullableType {
        ty: NodeId,
    },
    Keyword(Keyword),
    LiteralType {
        literal: NodeId,
    },
    MappedType {
        type_parameter: NodeId,
        name_type: Option<NodeId>,
        readonly_token: Option<MappedModifierToken>,
        question_token: Option<MappedModifierToken>,
        ty: Option<NodeId>,
    },
    NamedTupleMember {
        name: String,
        question: bool,
        dot_dot_dot: bool,
        ty: NodeId,
    },
    OptionalType {
        ty: NodeId,
    },
    ParenthesizedType {
        ty: NodeId,
    },
    RestType {
        ty: NodeId,
    },
    TemplateLiteralType {
        head: String,
        spans: Vec<TemplateSpan>,
    },
    ThisType,
    TupleType {
        elements: Vec<NodeId>,
    },
    TypeLiteral {
        members: Vec<NodeId>,
    },
    TypeOperator {
        operator: TypeOperatorToken,
        ty: NodeId,
    },
    TypePredicate {
        parameter_name: NodeId,
        asserts: bool,
        ty: Option<NodeId>,
    },
    TypeQuery {
        expr_name: NodeId,
    },
    TypeReference {
        type_name: NodeId,
        type_arguments: Vec<NodeId>,
    },
    UnionType {
        types: Vec<NodeId>,
    },
}

/// Fieldless discriminant of [`NodeKind`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    SourceFile,
    ModuleDeclaration,
    ClassDeclaration,
    InterfaceDeclaration,
    EnumDeclaration,
    EnumMember,
    TypeAliasDeclaration,
    FunctionDeclaration,
    VariableDeclarationList,
    VariableDeclaration,
    Constructor,
    MethodDeclaration,
    MethodSignature,
    PropertyDeclaration,
    PropertySignature,
    PropertyAssignment,
    GetAccessor,
    SetAccessor,
    CallSignature,
    ConstructSignature,
    IndexSignature,
    Parameter,
    TypeParameter,
    ExportSpecifier,
    ImportSpecifier,
    NamespaceExport,
    ExportAssignment,
    JsDocTypedefTag,
    JsDocCallbackTag,
    JsDocEnumTag,
    JsDocParameterTag,
    Identifier,
    PrivateIdentifier,
    QualifiedName,
    StringLiteral,
    NumericLiteral,
    BigIntLiteral,
    NoSubstitutionTemplateLiteral,
    TrueKeyword,
    FalseKeyword,
    NullKeyword,
    ThisKeyword,
    PrefixUnaryExpression,
    ArrayLiteralExpression,
    ObjectLiteralExpression,
    ArrowFunction,
    FunctionExpression,
    PropertyAccessExpression,
    OtherExpression,
    ArrayType,
    ConditionalType,
    ConstructorType,
    ExpressionWithTypeArguments,
    FunctionType,
    ImportType,
    IndexedAccessType,
    InferType,
    IntersectionType,
    JsDocVariadicType,
    JsDocNullableType,
    JsDocNonNullableType,
    AnyKeyword,
    BigIntKeyword,
    BooleanKeyword,
    NeverKeyword,
    NumberKeyword,
    ObjectKeyword,
    StringKeyword,
    SymbolKeyword,
    UndefinedKeyword,
    UnknownKeyword,
    VoidKeyword,
    IntrinsicKeyword,
    LiteralType,
    MappedType,
    NamedTupleMember,
    OptionalType,
    ParenthesizedType,
    RestType,
    TemplateLiteralType,
    ThisType,
    TupleType,
    TypeLiteral,
    TypeOperator,
    TypePredicate,
    TypeQuery,
    TypeReference,
    UnionType,
}

impl SyntaxKind {
    pub const fn keyword(keyword: Keyword) -> SyntaxKind {
        match keyword {
            Keyword::Any => SyntaxKind::AnyKeyword,
            Keyword::BigInt => SyntaxKind::BigIntKeyword,
            Keyword::Boolean => SyntaxKind::BooleanKeyword,
            Keyword::Never => SyntaxKind::NeverKeyword,
            Keyword::Number => SyntaxKind::NumberKeyword,
            Keyword::Object => SyntaxKind::ObjectKeyword,
            Keyword::String => SyntaxKind::StringKeyword,
            Keyword::Symbol => SyntaxKind::SymbolKeyword,
            Keyword::Undefined => SyntaxKind::UndefinedKeyword,
            Keyword::Unknown => SyntaxKind::UnknownKeyword,
            Keyword::Void => SyntaxKind::VoidKeyword,
            Keyword::Intrinsic => SyntaxKind::IntrinsicKeyword,
        }
    }
}

impl NodeKind {
    pub fn syntax_kind(&self) -> SyntaxKind {
        match self {
            NodeKind::SourceFile { .. } => SyntaxKind::SourceFile,
            NodeKind::ModuleDeclaration { .. } => SyntaxKind::ModuleDeclaration,
            NodeKind::ClassDeclaration { .. } => SyntaxKind::ClassDeclaration,
            NodeKind::InterfaceDeclaration { .. } => SyntaxKind::InterfaceDeclaration,
            NodeKind::EnumDeclaration { .. } => SyntaxKind::EnumDeclaration,
            NodeKind::EnumMember { .. } => SyntaxKind::EnumMember,
            NodeKind::TypeAliasDeclaration { .. } => SyntaxKind::TypeAliasDeclaration,
            NodeKind::FunctionDeclaration { .. } => SyntaxKind::FunctionDeclaration,
            NodeKind::VariableDeclarationList { .. } => SyntaxKind::VariableDeclarationList,
            NodeKind::VariableDeclaration { .. } => SyntaxKind::VariableDeclaration,
            NodeKind::Constructor { .. } => SyntaxKind::Constructor,
            NodeKind::MethodDeclaration { .. } => SyntaxKind::MethodDeclaration,
            NodeKind::MethodSignature { .. } => SyntaxKind::MethodSignature,
            NodeKind::PropertyDeclaration { .. } => SyntaxKind::PropertyDeclaration,
            NodeKind::PropertySignature { .. } => SyntaxKind::PropertySignature,
            NodeKind::PropertyAssignment { .. } => SyntaxKind::PropertyAssignment,
            NodeKind::GetAccessor { .. } => SyntaxKind::GetAccessor,
            NodeKind::SetAccessor { .. } => SyntaxKind::SetAccessor,
            NodeKind::CallSignature { .. } => SyntaxKind::CallSignature,
            NodeKind::ConstructSignature { .. } => SyntaxKind::ConstructSignature,
            NodeKind::IndexSignature { .. } => SyntaxKind::IndexSignature,
            NodeKind::Parameter { .. } => SyntaxKind::Parameter,
            NodeKind::TypeParameter { .. } => SyntaxKind::TypeParameter,
            NodeKind::ExportSpecifier => SyntaxKind::ExportSpecifier,
            NodeKind::ImportSpecifier => SyntaxKind::ImportSpecifier,
            NodeKind::NamespaceExport => SyntaxKind::NamespaceExport,
            NodeKind::ExportAssignment => SyntaxKind::ExportAssignment,
            NodeKind::JsDocTypedefTag { .. } => SyntaxKind::JsDocTypedefTag,
            NodeKind::JsDocCallbackTag { .. } => SyntaxKind::JsDocCallbackTag,
            NodeKind::JsDocEnumTag { .. } => SyntaxKind::JsDocEnumTag,
            NodeKind::JsDocParameterTag { .. } => SyntaxKind::JsDocParameterTag,
            NodeKind::Identifier => SyntaxKind::Identifier,
            NodeKind::PrivateIdentifier => SyntaxKind::PrivateIdentifier,
            NodeKind::QualifiedName { .. } => SyntaxKind::QualifiedName,
            NodeKind::StringLiteral { .. } => SyntaxKind::StringLiteral,
            NodeKind::NumericLiteral => SyntaxKind::NumericLiteral,
            NodeKind::BigIntLiteral => SyntaxKind::BigIntLiteral,
            NodeKind::NoSubstitutionTemplateLiteral { .. } => {
                SyntaxKind::NoSubstitutionTemplateLiteral
            }
            NodeKind::TrueKeyword => SyntaxKind::TrueKeyword,
            NodeKind::FalseKeyword => SyntaxKind::FalseKeyword,
            NodeKind::NullKeyword => SyntaxKind::NullKeyword,
            NodeKind::ThisKeyword => SyntaxKind::ThisKeyword,
            NodeKind::PrefixUnaryExpression { .. } => SyntaxKind::PrefixUnaryExpression,
            NodeKind::ArrayLiteralExpression { .. } => SyntaxKind::ArrayLiteralExpression,
            NodeKind::ObjectLiteralExpression { .. } => SyntaxKind::ObjectLiteralExpression,
            NodeKind::ArrowFunction { .. } => SyntaxKind::ArrowFunction,
            NodeKind::FunctionExpression { .. } => SyntaxKind::FunctionExpression,
            NodeKind::PropertyAccessExpression => SyntaxKind::PropertyAccessExpression,
            NodeKind::OtherExpression => SyntaxKind::OtherExpression,
            NodeKind::ArrayType { .. } => SyntaxKind::ArrayType,
            NodeKind::ConditionalType { .. } => SyntaxKind::ConditionalType,
            NodeKind::ConstructorType { .. } => SyntaxKind::ConstructorType,
            NodeKind::ExpressionWithTypeArguments { .. } => SyntaxKind::ExpressionWithTypeArguments,
            NodeKind::FunctionType { .. } => SyntaxKind::FunctionType,
            NodeKind::ImportType { .. } => SyntaxKind::ImportType,
            NodeKind::IndexedAccessType { .. } => SyntaxKind::IndexedAccessType,
            NodeKind::InferType { .. } => SyntaxKind::InferType,
            NodeKind::IntersectionType { .. } => SyntaxKind::IntersectionType,
            NodeKind::JsDocVariadicType { .. } => SyntaxKind::JsDocVariadicType,
            NodeKind::JsDocNullableType { .. } => SyntaxKind::JsDocNullableType,
            NodeKind::JsDocNonNullableType { .. } => SyntaxKind::JsDocNonNullableType,
            NodeKind::Keyword(keyword) => SyntaxKind::keyword(*keyword),
            NodeKind::LiteralType { .. } => SyntaxKind::LiteralType,
            NodeKind::MappedType { .. } => SyntaxKind::MappedType,
            NodeKind::NamedTupleMember { .. } => SyntaxKind::NamedTupleMember,
            NodeKind::OptionalType { .. } => SyntaxKind::OptionalType,
            NodeKind::ParenthesizedType { .. } => SyntaxKind::ParenthesizedType,
            NodeKind::RestType { .. } => SyntaxKind::RestType,
            NodeKind::TemplateLiteralType { .. } => SyntaxKind::TemplateLiteralType,
            NodeKind::ThisType => SyntaxKind::ThisType,
            NodeKind::TupleType { .. } => SyntaxKind::TupleType,
            NodeKind::TypeLiteral { .. } => SyntaxKind::TypeLiteral,
            NodeKind::TypeOperator { .. } => SyntaxKind::TypeOperator,
            NodeKind::TypePredicate { .. } => SyntaxKind::TypePredicate,
            NodeKind::TypeQuery { .. } => SyntaxKind::TypeQuery,
            NodeKind::TypeReference { .. } => SyntaxKind::TypeReference,
            NodeKind::UnionType { .. } => SyntaxKind::UnionType,
        }
    }

    /// Parameter declarations of a signature-bearing node.
    pub fn parameters(&self) -> &[NodeId] {
        match self {
            NodeKind::FunctionDeclaration { parameters, .. }
            | NodeKind::Constructor { parameters }
            | NodeKind::MethodDeclaration { parameters, .. }
            | NodeKind::MethodSignature { parameters, .. }
            | NodeKind::GetAccessor { parameters, .. }
            | NodeKind::SetAccessor { parameters, .. }
            | NodeKind::CallSignature { parameters, .. }
            | NodeKind::ConstructSignature { parameters, .. }
            | NodeKind::IndexSignature { parameters, .. }
            | NodeKind::JsDocCallbackTag { parameters, .. }
            | NodeKind::ArrowFunction { parameters, .. }
            | NodeKind::FunctionExpression { parameters, .. }
            | NodeKind::ConstructorType { parameters, .. }
            | NodeKind::FunctionType { parameters, .. } => parameters,
            _ => &[],
        }
    }

    /// Type parameter declarations of a generic declaration.
    pub fn type_parameters(&self) -> &[NodeId] {
        match self {
            NodeKind::ClassDeclaration {
                type_parameters, ..
            }
            | NodeKind::InterfaceDeclaration {
                type_parameters, ..
            }
            | NodeKind::TypeAliasDeclaration {
                type_parameters, ..
            }
            | NodeKind::FunctionDeclaration {
                type_parameters, ..
            }
            | NodeKind::MethodDeclaration {
                type_parameters, ..
            }
            | NodeKind::MethodSignature {
                type_parameters, ..
            }
            | NodeKind::CallSignature {
                type_parameters, ..
            }
            | NodeKind::ConstructSignature {
                type_parameters, ..
            }
            | NodeKind::ArrowFunction {
                type_parameters, ..
            }
            | NodeKind::FunctionExpression {
                type_parameters, ..
            }
            | NodeKind::ConstructorType {
                type_parameters, ..
            }
            | NodeKind::FunctionType {
                type_parameters, ..
            } => type_parameters,
            _ => &[],
        }
    }

    /// The written type annotation, if the node kind carries one.
    pub fn type_annotation(&self) -> Option<NodeId> {
        match self {
            NodeKind::FunctionDeclaration { ty, .. }
            | NodeKind::VariableDeclaration { ty, .. }
            | NodeKind::MethodDeclaration { ty, .. }
            | NodeKind::MethodSignature { ty, .. }
            | NodeKind::PropertyDeclaration { ty, .. }
            | NodeKind::PropertySignature { ty }
            | NodeKind::GetAccessor { ty, .. }
            | NodeKind::CallSignature { ty, .. }
            | NodeKind::ConstructSignature { ty, .. }
            | NodeKind::IndexSignature { ty, .. }
            | NodeKind::Parameter { ty, .. }
            | NodeKind::JsDocCallbackTag { ty, .. }
            | NodeKind::ArrowFunction { ty, .. }
            | NodeKind::FunctionExpression { ty, .. } => *ty,
            NodeKind::TypeAliasDeclaration { ty, .. }
            | NodeKind::ConstructorType { ty, .. }
            | NodeKind::FunctionType { ty, .. } => Some(*ty),
            _ => None,
        }
    }

    /// The initializer expression of a variable, property, parameter or enum member.
    pub fn initializer(&self) -> Option<NodeId> {
        match self {
            NodeKind::VariableDeclaration { initializer, .. }
            | NodeKind::PropertyDeclaration { initializer, .. }
            | NodeKind::Parameter { initializer, .. }
            | NodeKind::EnumMember { initializer } => *initializer,
            NodeKind::PropertyAssignment { initializer } => Some(*initializer),
            _ => None,
        }
    }

    /// Whether the declaration's name is a `#private` identifier.
    pub fn has_private_name(&self) -> bool {
        match self {
            NodeKind::MethodDeclaration { private_name, .. }
            | NodeKind::PropertyDeclaration { private_name, .. }
            | NodeKind::GetAccessor { private_name, .. }
            | NodeKind::SetAccessor { private_name, .. } => *private_name,
            _ => false,
        }
    }

    pub fn is_function_like(&self) -> bool {
        matches!(
            self,
            NodeKind::FunctionDeclaration { .. }
                | NodeKind::Constructor { .. }
                | NodeKind::MethodDeclaration { .. }
                | NodeKind::MethodSignature { .. }
                | NodeKind::GetAccessor { .. }
                | NodeKind::SetAccessor { .. }
                | NodeKind::CallSignature { .. }
                | NodeKind::ConstructSignature { .. }
                | NodeKind::IndexSignature { .. }
                | NodeKind::JsDocCallbackTag { .. }
                | NodeKind::ArrowFunction { .. }
                | NodeKind::FunctionExpression { .. }
                | NodeKind::ConstructorType { .. }
                | NodeKind::FunctionType { .. }
        )
    }

    /// Direct child nodes, in source order.
    pub fn children(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let push_opt = |out: &mut Vec<NodeId>, id: &Option<NodeId>| {
            if let Some(id) = id {
                out.push(*id);
            }
        };
        match self {
            NodeKind::SourceFile { statements, .. } => out.extend(statements),
            NodeKind::ModuleDeclaration { body } => out.extend(body),
            NodeKind::ClassDeclaration {
                type_parameters,
                heritage_clauses,
                members,
            }
            | NodeKind::InterfaceDeclaration {
                type_parameters,
                heritage_clauses,
                members,
            } => {
                out.extend(type_parameters);
                for clause in heritage_clauses {
                    out.extend(&clause.types);
                }
                out.extend(members);
            }
            NodeKind::EnumDeclaration { members } => out.extend(members),
            NodeKind::EnumMember { initializer } => push_opt(&mut out, initializer),
            NodeKind::TypeAliasDeclaration {
                type_parameters,
                ty,
            } => {
                out.extend(type_parameters);
                out.push(*ty);
            }
            NodeKind::VariableDeclarationList { declarations } => out.extend(declarations),
            NodeKind::VariableDeclaration { ty, initializer }
            | NodeKind::PropertyDeclaration {
                ty, initializer, ..
            } => {
                push_opt(&mut out, ty);
                push_opt(&mut out, initializer);
            }
            NodeKind::PropertySignature { ty } => push_opt(&mut out, ty),
            NodeKind::PropertyAssignment { initializer } => out.push(*initializer),
            NodeKind::Parameter {
                ty, initializer, ..
            } => {
                push_opt(&mut out, ty);
                push_opt(&mut out, initializer);
            }
            NodeKind::TypeParameter {
                constraint,
                default,
                ..
            } => {
                push_opt(&mut out, constraint);
                push_opt(&mut out, default);
            }
            NodeKind::JsDocTypedefTag { type_expression }
            | NodeKind::JsDocEnumTag { type_expression }
            | NodeKind::JsDocParameterTag {
                type_expression, ..
            } => push_opt(&mut out, type_expression),
            NodeKind::QualifiedName { left, right } => {
                out.push(*left);
                out.push(*right);
            }
            NodeKind::PrefixUnaryExpression { operand, .. } => out.push(*operand),
            NodeKind::ArrayLiteralExpression { elements } => out.extend(elements),
            NodeKind::ObjectLiteralExpression { properties } => out.extend(properties),
            NodeKind::ArrayType { element_type } => out.push(*element_type),
            NodeKind::ConditionalType {
                check_type,
                extends_type,
                true_type,
                false_type,
            } => out.extend([*check_type, *extends_type, *true_type, *false_type]),
            NodeKind::ExpressionWithTypeArguments {
                expression,
                type_arguments,
            } => {
                out.push(*expression);
                out.extend(type_arguments);
            }
            NodeKind::ImportType {
                qualifier,
                type_arguments,
            } => {
                push_opt(&mut out, qualifier);
                out.extend(type_arguments);
            }
            NodeKind::IndexedAccessType {
                object_type,
                index_type,
            } => out.extend([*object_type, *index_type]),
            NodeKind::InferType { type_parameter } => out.push(*type_parameter),
            NodeKind::IntersectionType { types } | NodeKind::UnionType { types } => {
                out.extend(types)
            }
            NodeKind::JsDocVariadicType { ty }
            | NodeKind::JsDocNullableType { ty }
            | NodeKind::JsDocNonNullableType { ty }
            | NodeKind::NamedTupleMember { ty, .. }
            | NodeKind::OptionalType { ty }
            | NodeKind::ParenthesizedType { ty }
            | NodeKind::RestType { ty }
            | NodeKind::TypeOperator { ty, .. } => out.push(*ty),
            NodeKind::LiteralType { literal } => out.push(*literal),
            NodeKind::MappedType {
                type_parameter,
                name_type,
                ty,
                ..
            } => {
                out.push(*type_parameter);
                push_opt(&mut out, name_type);
                push_opt(&mut out, ty);
            }
            NodeKind::TemplateLiteralType { spans, .. } => {
                out.extend(spans.iter().map(|span| span.ty))
            }
            NodeKind::TupleType { elements } => out.extend(elements),
            NodeKind::TypeLiteral { members } => out.extend(members),
            NodeKind::TypePredicate {
                parameter_name,
                ty,
                ..
            } => {
                out.push(*parameter_name);
                push_opt(&mut out, ty);
            }
            NodeKind::TypeQuery { expr_name } => out.push(*expr_name),
            NodeKind::TypeReference {
                type_name,
                type_arguments,
            } => {
                out.push(*type_name);
                out.extend(type_arguments);
            }
            kind if kind.is_function_like() => {
                out.extend(kind.type_parameters());
                out.extend(kind.parameters());
                if let Some(ty) = kind.type_annotation() {
                    out.push(ty);
                }
            }
            _ => {}
        }
        out
    }
}

// =============================================================================
// Node
// =============================================================================

/// A syntax node with its payload and bookkeeping.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    /// Source text of the node, used for display and literal values.
    pub text: String,
    pub flags: NodeFlags,
    pub modifiers: ModifierFlags,
    pub position: Option<SourcePosition>,
    /// Raw `/** ... */` comment attached to the node.
    pub doc_comment: Option<String>,
}

impl Node {
    pub fn new(kind: NodeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            parent: None,
            text: text.into(),
            flags: NodeFlags::empty(),
            modifiers: ModifierFlags::empty(),
            position: None,
            doc_comment: None,
        }
    }

    #[inline]
    pub fn syntax_kind(&self) -> SyntaxKind {
        self.kind.syntax_kind()
    }
}
