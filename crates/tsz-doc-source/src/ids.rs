//! Opaque handles into a semantic source.
//!
//! A semantic source hands out small integer ids for symbols, types, syntax
//! nodes and signatures. The converter never looks inside them; it only
//! passes them back to [`SemanticSource`](crate::SemanticSource) queries and
//! uses them as hash keys.

use serde::Serialize;

/// Handle to a named declarable entity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SymbolId(pub u32);

/// Handle to a checker type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeId(pub u32);

/// Handle to a syntax node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub u32);

/// Handle to a resolved call, construct or accessor signature.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SignatureId(pub u32);

impl SymbolId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl TypeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl NodeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl SignatureId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Either a written type annotation or a type inferred by the checker.
///
/// The type converter accepts both: syntax nodes are converted as written,
/// inferred types are first turned into a representative node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeOrNode {
    Node(NodeId),
    Type(TypeId),
}

impl From<NodeId> for TypeOrNode {
    fn from(node: NodeId) -> Self {
        TypeOrNode::Node(node)
    }
}

impl From<TypeId> for TypeOrNode {
    fn from(ty: TypeId) -> Self {
        TypeOrNode::Type(ty)
    }
}
