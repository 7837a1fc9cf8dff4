//! Semantic Source Interface
//!
//! The documentation converter reads a type-checked program through the
//! [`SemanticSource`] trait defined here. The crate contains only the
//! vocabulary shared by the converter and a checker:
//!
//! - **Handles**: [`SymbolId`], [`TypeId`], [`NodeId`], [`SignatureId`]
//! - **Flags**: [`SymbolFlags`], [`ModifierFlags`], [`NodeFlags`],
//!   [`CheckFlags`], [`ElementFlags`], with the checker's bit values
//! - **Syntax**: [`Node`], [`NodeKind`] and its discriminant [`SyntaxKind`]
//! - **Types**: [`TypeShape`] and signature data
//!
//! [`MemoryProgram`] implements the trait over plain arenas so that programs
//! can be described directly, without a parser or checker.

pub mod flags;
pub mod ids;
pub mod program;
pub mod source;
pub mod syntax;
pub mod types;

pub use flags::{CheckFlags, ElementFlags, ModifierFlags, NodeFlags, SymbolFlags};
pub use ids::{NodeId, SignatureId, SymbolId, TypeId, TypeOrNode};
pub use program::{MemoryProgram, SymbolData, TypeData};
pub use source::SemanticSource;
pub use syntax::{
    HeritageClause, HeritageToken, Keyword, MappedModifierToken, Node, NodeKind, PrefixOperator,
    SourcePosition, SyntaxKind, TemplateSpan, TypeOperatorToken,
};
pub use types::{
    ConstantValue, EntryPoint, LiteralTypeValue, ObjectKind, PseudoBigInt, SignatureInfo,
    SignatureKind, TupleTarget, TypePredicate, TypePredicateKind, TypeShape,
};

#[cfg(test)]
#[path = "../tests/flags_tests.rs"]
mod flags_tests;
