//! Structural view of checker types and signatures.
//!
//! The converter does not evaluate types. It asks the source for a
//! [`TypeShape`] to learn which constituents a type has, and otherwise works
//! from the representative syntax node the source synthesizes for the type.

use crate::flags::ElementFlags;
use crate::ids::{NodeId, SymbolId, TypeId};

/// A bigint literal value as the checker stores it: sign plus decimal digits.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PseudoBigInt {
    pub negative: bool,
    pub base10_value: String,
}

/// Value of a literal type.
#[derive(Clone, Debug, PartialEq)]
pub enum LiteralTypeValue {
    String(String),
    Number(f64),
    BigInt(PseudoBigInt),
}

/// Evaluated value of an enum member initializer.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstantValue {
    Number(f64),
    String(String),
}

/// Target of a tuple type reference.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct TupleTarget {
    pub element_flags: Vec<ElementFlags>,
    /// Declarations of labeled elements (`NamedTupleMember` or rest `Parameter` nodes).
    pub labeled_declarations: Option<Vec<NodeId>>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ObjectKind {
    /// Object literal, function or constructor type without a declaration of its own.
    Anonymous,
    ClassOrInterface,
    /// Instantiation of a generic target such as `Array<T>` or a tuple.
    Reference { target: TypeId },
    /// A tuple target; only reached through [`ObjectKind::Reference`].
    Tuple(TupleTarget),
    Mapped,
}

/// Structural classification of a type.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeShape {
    Intrinsic,
    Literal(LiteralTypeValue),
    Union {
        types: Vec<TypeId>,
        /// The type the union was expanded from, e.g. `keyof T`.
        origin: Option<TypeId>,
    },
    Intersection {
        types: Vec<TypeId>,
    },
    Conditional {
        check_type: TypeId,
        extends_type: TypeId,
        resolved_true_type: TypeId,
        resolved_false_type: TypeId,
    },
    IndexedAccess {
        object_type: TypeId,
        index_type: TypeId,
    },
    /// `keyof target`
    Index {
        target: TypeId,
    },
    TemplateLiteral {
        texts: Vec<String>,
        types: Vec<TypeId>,
    },
    TypeParameter,
    Object(ObjectKind),
}

impl TypeShape {
    pub fn is_object(&self) -> bool {
        matches!(self, TypeShape::Object(_))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SignatureKind {
    Call,
    Construct,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypePredicateKind {
    This,
    Identifier,
    AssertsThis,
    AssertsIdentifier,
}

/// A resolved `x is T` / `asserts x` predicate.
#[derive(Clone, Debug, PartialEq)]
pub struct TypePredicate {
    pub kind: TypePredicateKind,
    pub parameter_name: Option<String>,
    pub ty: Option<TypeId>,
}

impl TypePredicate {
    pub fn asserts(&self) -> bool {
        matches!(
            self.kind,
            TypePredicateKind::AssertsThis | TypePredicateKind::AssertsIdentifier
        )
    }

    pub fn name(&self) -> &str {
        match self.kind {
            TypePredicateKind::This | TypePredicateKind::AssertsThis => "this",
            _ => self.parameter_name.as_deref().unwrap_or_default(),
        }
    }
}

/// A resolved signature.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct SignatureInfo {
    pub declaration: Option<NodeId>,
    /// Type parameter types, in declaration order.
    pub type_parameters: Vec<TypeId>,
    /// Parameter symbols, in declaration order.
    pub parameters: Vec<SymbolId>,
    pub return_type: Option<TypeId>,
    pub predicate: Option<TypePredicate>,
}

/// A root file of a program together with its display name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryPoint {
    pub display_name: String,
    pub source_file: NodeId,
}
