//! The type model attached to reflections.
//!
//! [`Type`] is a closed union. Anonymous object, function and constructor
//! types are not stored inline: they live in the project arena as
//! `TypeLiteral`/`Constructor` reflections and a [`Type::Reflection`] value
//! points at them by id.
//!
//! ## Reference equality
//!
//! Two [`ReferenceType`]s are equal when their targets are the same
//! reflection, or the same symbol, and their type arguments are equal.
//! Broken references have no target and compare by display name. Comparing
//! a reflection target against a symbol target needs the project's symbol
//! map; see `ProjectReflection::reference_equals`.

use crate::reflection::ReflectionId;
use serde::Serialize;
use std::fmt;
use tsz_doc_source::SymbolId;

// =============================================================================
// References
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReferenceTarget {
    /// Already converted.
    Reflection(ReflectionId),
    /// Not converted (yet); resolved through the project's symbol map.
    Symbol(SymbolId),
    /// Nothing to resolve; only the display name is known.
    Broken,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceType {
    pub name: String,
    pub target: ReferenceTarget,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub type_arguments: Vec<Type>,
}

impl ReferenceType {
    pub fn new(name: impl Into<String>, target: ReferenceTarget) -> Self {
        Self {
            name: name.into(),
            target,
            type_arguments: Vec::new(),
        }
    }

    /// A reference that could not be resolved to any symbol.
    pub fn broken(name: impl Into<String>) -> Self {
        Self::new(name, ReferenceTarget::Broken)
    }

    pub fn with_type_arguments(mut self, type_arguments: Vec<Type>) -> Self {
        self.type_arguments = type_arguments;
        self
    }

    pub fn is_broken(&self) -> bool {
        self.target == ReferenceTarget::Broken
    }
}

impl PartialEq for ReferenceType {
    fn eq(&self, other: &Self) -> bool {
        let same_target = match (self.target, other.target) {
            (ReferenceTarget::Broken, ReferenceTarget::Broken) => self.name == other.name,
            (a, b) => a == b,
        };
        same_target && self.type_arguments == other.type_arguments
    }
}

// =============================================================================
// Supporting values
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    BigInt { negative: bool, value: String },
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Null => f.write_str("null"),
            LiteralValue::Boolean(value) => write!(f, "{value}"),
            LiteralValue::Number(value) => f.write_str(&format_js_number(*value)),
            LiteralValue::String(value) => f.write_str(&quote_string(value)),
            LiteralValue::BigInt { negative, value } => {
                write!(f, "{}{}n", if *negative { "-" } else { "" }, value)
            }
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TypeOperatorKind {
    #[serde(rename = "keyof")]
    KeyOf,
    #[serde(rename = "unique")]
    Unique,
    #[serde(rename = "readonly")]
    Readonly,
}

impl TypeOperatorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            TypeOperatorKind::KeyOf => "keyof",
            TypeOperatorKind::Unique => "unique",
            TypeOperatorKind::Readonly => "readonly",
        }
    }
}

/// `+` or `-` on a mapped type's `readonly` / `?` modifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum MappedModifier {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Remove,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappedType {
    pub parameter: String,
    pub parameter_type: Box<Type>,
    pub template_type: Box<Type>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readonly_modifier: Option<MappedModifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional_modifier: Option<MappedModifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_type: Option<Box<Type>>,
}

// =============================================================================
// Type
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Type {
    #[serde(rename_all = "camelCase")]
    Array { element_type: Box<Type> },
    #[serde(rename_all = "camelCase")]
    Conditional {
        check_type: Box<Type>,
        extends_type: Box<Type>,
        true_type: Box<Type>,
        false_type: Box<Type>,
    },
    #[serde(rename_all = "camelCase")]
    IndexedAccess {
        object_type: Box<Type>,
        index_type: Box<Type>,
    },
    Inferred { name: String },
    Intersection { types: Vec<Type> },
    Intrinsic { name: String },
    Literal { value: LiteralValue },
    Mapped(MappedType),
    #[serde(rename_all = "camelCase")]
    NamedTupleMember {
        name: String,
        is_optional: bool,
        element: Box<Type>,
    },
    #[serde(rename_all = "camelCase")]
    Optional { element_type: Box<Type> },
    #[serde(rename_all = "camelCase")]
    Predicate {
        name: String,
        asserts: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        target_type: Option<Box<Type>>,
    },
    #[serde(rename_all = "camelCase")]
    Query { query_type: ReferenceType },
    Reference(ReferenceType),
    Reflection { declaration: ReflectionId },
    #[serde(rename_all = "camelCase")]
    Rest { element_type: Box<Type> },
    TemplateLiteral {
        head: String,
        tail: Vec<(Type, String)>,
    },
    Tuple { elements: Vec<Type> },
    TypeOperator {
        operator: TypeOperatorKind,
        target: Box<Type>,
    },
    Union { types: Vec<Type> },
    Unknown { name: String },
}

impl Type {
    pub fn intrinsic(name: impl Into<String>) -> Type {
        Type::Intrinsic { name: name.into() }
    }

    pub fn unknown(name: impl Into<String>) -> Type {
        Type::Unknown { name: name.into() }
    }

    pub fn literal(value: LiteralValue) -> Type {
        Type::Literal { value }
    }

    pub fn array(element_type: Type) -> Type {
        Type::Array {
            element_type: Box::new(element_type),
        }
    }

    pub fn optional(element_type: Type) -> Type {
        Type::Optional {
            element_type: Box::new(element_type),
        }
    }

    pub fn rest(element_type: Type) -> Type {
        Type::Rest {
            element_type: Box::new(element_type),
        }
    }

    pub fn named_tuple_member(name: impl Into<String>, is_optional: bool, element: Type) -> Type {
        Type::NamedTupleMember {
            name: name.into(),
            is_optional,
            element: Box::new(element),
        }
    }

    pub fn type_operator(operator: TypeOperatorKind, target: Type) -> Type {
        Type::TypeOperator {
            operator,
            target: Box::new(target),
        }
    }

    pub fn is_intrinsic(&self, name: &str) -> bool {
        matches!(self, Type::Intrinsic { name: n } if n == name)
    }

    /// Drop `undefined` from a union; a single survivor replaces the union.
    pub fn remove_undefined(self) -> Type {
        match self {
            Type::Union { types } => {
                let mut types: Vec<Type> = types
                    .into_iter()
                    .filter(|ty| !ty.is_intrinsic("undefined"))
                    .collect();
                if types.len() == 1 {
                    types.remove(0)
                } else {
                    Type::Union { types }
                }
            }
            other => other,
        }
    }

    /// Ids of the anonymous reflections this type embeds, outermost first.
    pub fn collect_reflections(&self, out: &mut Vec<ReflectionId>) {
        match self {
            Type::Reflection { declaration } => out.push(*declaration),
            Type::Array { element_type }
            | Type::Optional { element_type }
            | Type::Rest { element_type } => element_type.collect_reflections(out),
            Type::Conditional {
                check_type,
                extends_type,
                true_type,
                false_type,
            } => {
                for ty in [check_type, extends_type, true_type, false_type] {
                    ty.collect_reflections(out);
                }
            }
            Type::IndexedAccess {
                object_type,
                index_type,
            } => {
                object_type.collect_reflections(out);
                index_type.collect_reflections(out);
            }
            Type::Intersection { types } | Type::Union { types } | Type::Tuple { elements: types } => {
                for ty in types {
                    ty.collect_reflections(out);
                }
            }
            Type::Mapped(mapped) => {
                mapped.parameter_type.collect_reflections(out);
                mapped.template_type.collect_reflections(out);
                if let Some(name_type) = &mapped.name_type {
                    name_type.collect_reflections(out);
                }
            }
            Type::NamedTupleMember { element, .. } => element.collect_reflections(out),
            Type::Predicate { target_type, .. } => {
                if let Some(target) = target_type {
                    target.collect_reflections(out);
                }
            }
            Type::Query { query_type } | Type::Reference(query_type) => {
                for ty in &query_type.type_arguments {
                    ty.collect_reflections(out);
                }
            }
            Type::TemplateLiteral { tail, .. } => {
                for (ty, _) in tail {
                    ty.collect_reflections(out);
                }
            }
            Type::TypeOperator { target, .. } => target.collect_reflections(out),
            Type::Inferred { .. }
            | Type::Intrinsic { .. }
            | Type::Literal { .. }
            | Type::Unknown { .. } => {}
        }
    }

    fn needs_parens_in_array(&self) -> bool {
        matches!(
            self,
            Type::Union { .. }
                | Type::Intersection { .. }
                | Type::Conditional { .. }
                | Type::TypeOperator { .. }
        )
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, types: &[Type], separator: &str) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{ty}")?;
    }
    Ok(())
}

impl fmt::Display for ReferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.type_arguments.is_empty() {
            f.write_str("<")?;
            write_joined(f, &self.type_arguments, ", ")?;
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Array { element_type } => {
                if element_type.needs_parens_in_array() {
                    write!(f, "({element_type})[]")
                } else {
                    write!(f, "{element_type}[]")
                }
            }
            Type::Conditional {
                check_type,
                extends_type,
                true_type,
                false_type,
            } => write!(
                f,
                "{check_type} extends {extends_type} ? {true_type} : {false_type}"
            ),
            Type::IndexedAccess {
                object_type,
                index_type,
            } => write!(f, "{object_type}[{index_type}]"),
            Type::Inferred { name } => write!(f, "infer {name}"),
            Type::Intersection { types } => write_joined(f, types, " & "),
            Type::Intrinsic { name } | Type::Unknown { name } => f.write_str(name),
            Type::Literal { value } => write!(f, "{value}"),
            Type::Mapped(mapped) => {
                let readonly = match mapped.readonly_modifier {
                    Some(MappedModifier::Add) => "readonly ",
                    Some(MappedModifier::Remove) => "-readonly ",
                    None => "",
                };
                let optional = match mapped.optional_modifier {
                    Some(MappedModifier::Add) => "?",
                    Some(MappedModifier::Remove) => "-?",
                    None => "",
                };
                write!(
                    f,
                    "{{ {readonly}[{} in {}",
                    mapped.parameter, mapped.parameter_type
                )?;
                if let Some(name_type) = &mapped.name_type {
                    write!(f, " as {name_type}")?;
                }
                write!(f, "]{optional}: {} }}", mapped.template_type)
            }
            Type::NamedTupleMember {
                name,
                is_optional,
                element,
            } => write!(f, "{name}{}: {element}", if *is_optional { "?" } else { "" }),
            Type::Optional { element_type } => write!(f, "{element_type}?"),
            Type::Predicate {
                name,
                asserts,
                target_type,
            } => match (asserts, target_type) {
                (true, Some(target)) => write!(f, "asserts {name} is {target}"),
                (true, None) => write!(f, "asserts {name}"),
                (false, Some(target)) => write!(f, "{name} is {target}"),
                (false, None) => f.write_str(name),
            },
            Type::Query { query_type } => write!(f, "typeof {query_type}"),
            Type::Reference(reference) => write!(f, "{reference}"),
            Type::Reflection { .. } => f.write_str("object"),
            Type::Rest { element_type } => write!(f, "...{element_type}"),
            Type::TemplateLiteral { head, tail } => {
                write!(f, "`{head}")?;
                for (ty, text) in tail {
                    write!(f, "${{{ty}}}{text}")?;
                }
                f.write_str("`")
            }
            Type::Tuple { elements } => {
                f.write_str("[")?;
                write_joined(f, elements, ", ")?;
                f.write_str("]")
            }
            Type::TypeOperator { operator, target } => {
                write!(f, "{} {target}", operator.as_str())
            }
            Type::Union { types } => write_joined(f, types, " | "),
        }
    }
}

// =============================================================================
// Text helpers
// =============================================================================

/// Render a number the way JavaScript's `String(n)` does for common values.
pub fn format_js_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e21 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

/// JSON string literal for `value`.
pub fn quote_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{value}\""))
}
