//! The `SemanticSource` trait: everything the converter asks of a checker.
//!
//! The trait is object safe; the converter holds a `&dyn SemanticSource` for
//! the program currently being converted. Queries are infallible. A source
//! that cannot answer returns `None` or an empty list, and the converter
//! decides whether that is fatal.
//!
//! # Conventions
//!
//! - Symbol and type queries mirror the checker's public API
//!   (`getDeclaredTypeOfSymbol`, `getTypeOfSymbolAtLocation`, ...).
//! - `type_to_type_node` must return a node whose [`SyntaxKind`] identifies
//!   the form of the type (a `TypeReference` for named references, an
//!   `ArrayType` for `T[]`, a `TypeLiteral` for anonymous object types, ...).
//!   The converter dispatches on that kind and reads the details back through
//!   [`type_shape`](SemanticSource::type_shape) and friends.

use crate::flags::{CheckFlags, ModifierFlags, SymbolFlags};
use crate::ids::{NodeId, SignatureId, SymbolId, TypeId};
use crate::syntax::{Node, NodeKind, SourcePosition, SyntaxKind};
use crate::types::{ConstantValue, EntryPoint, SignatureInfo, SignatureKind, TypeShape};

pub trait SemanticSource {
    // =========================================================================
    // Program
    // =========================================================================

    fn entry_points(&self) -> Vec<EntryPoint>;

    // =========================================================================
    // Symbols
    // =========================================================================

    fn symbol_name(&self, symbol: SymbolId) -> &str;

    fn symbol_flags(&self, symbol: SymbolId) -> SymbolFlags;

    fn symbol_check_flags(&self, _symbol: SymbolId) -> CheckFlags {
        CheckFlags::empty()
    }

    /// Declaration sites, in source order.
    fn symbol_declarations(&self, symbol: SymbolId) -> &[NodeId];

    fn value_declaration(&self, symbol: SymbolId) -> Option<NodeId>;

    /// The `__index` member of a class, interface or type literal symbol.
    fn index_symbol(&self, symbol: SymbolId) -> Option<SymbolId>;

    fn exports_of_module(&self, module: SymbolId) -> Vec<SymbolId>;

    /// One step of alias resolution.
    fn aliased_symbol(&self, alias: SymbolId) -> Option<SymbolId>;

    /// Value of an enum member declaration.
    fn constant_value(&self, declaration: NodeId) -> Option<ConstantValue>;

    // =========================================================================
    // Nodes
    // =========================================================================

    fn node(&self, node: NodeId) -> &Node;

    /// The symbol a name or expression refers to.
    fn symbol_at_location(&self, node: NodeId) -> Option<SymbolId>;

    /// The symbol a declaration node introduces.
    fn symbol_of_declaration(&self, node: NodeId) -> Option<SymbolId>;

    fn type_at_location(&self, node: NodeId) -> Option<TypeId>;

    fn signature_from_declaration(&self, declaration: NodeId) -> Option<SignatureId>;

    /// Modifiers of the declaration combined with those of its enclosing
    /// variable statement.
    fn combined_modifier_flags(&self, node: NodeId) -> ModifierFlags {
        let data = self.node(node);
        let mut flags = data.modifiers;
        if data.syntax_kind() == SyntaxKind::VariableDeclaration {
            if let Some(list) = data.parent {
                if self.node(list).syntax_kind() == SyntaxKind::VariableDeclarationList {
                    flags |= self.node(list).modifiers;
                }
            }
        }
        flags
    }

    fn source_file_of(&self, node: NodeId) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(id) = current {
            let data = self.node(id);
            if data.syntax_kind() == SyntaxKind::SourceFile {
                return Some(id);
            }
            current = data.parent;
        }
        None
    }

    fn file_name_of(&self, node: NodeId) -> Option<&str> {
        let file = self.source_file_of(node)?;
        match &self.node(file).kind {
            NodeKind::SourceFile { file_name, .. } => Some(file_name),
            _ => None,
        }
    }

    fn position_of(&self, node: NodeId) -> Option<SourcePosition> {
        self.node(node).position.clone()
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn declared_type_of_symbol(&self, symbol: SymbolId) -> TypeId;

    fn type_of_symbol_at_location(&self, symbol: SymbolId, location: Option<NodeId>) -> TypeId;

    fn type_shape(&self, ty: TypeId) -> TypeShape;

    fn type_symbol(&self, ty: TypeId) -> Option<SymbolId>;

    fn alias_symbol(&self, ty: TypeId) -> Option<SymbolId>;

    fn alias_type_arguments(&self, ty: TypeId) -> Vec<TypeId>;

    fn type_arguments(&self, ty: TypeId) -> Vec<TypeId>;

    fn properties_of_type(&self, ty: TypeId) -> Vec<SymbolId>;

    fn signatures_of_type(&self, ty: TypeId, kind: SignatureKind) -> Vec<SignatureId>;

    /// Declared type parameters of a class or interface type.
    fn type_parameters_of_type(&self, ty: TypeId) -> Vec<TypeId>;

    fn type_parameter_constraint(&self, ty: TypeId) -> Option<TypeId>;

    fn type_parameter_default(&self, ty: TypeId) -> Option<TypeId>;

    fn non_nullable_type(&self, ty: TypeId) -> TypeId;

    fn type_to_string(&self, ty: TypeId) -> String;

    /// A representative node for an inferred type.
    fn type_to_type_node(&self, ty: TypeId) -> Option<NodeId>;

    // =========================================================================
    // Signatures
    // =========================================================================

    fn signature(&self, signature: SignatureId) -> SignatureInfo;
}
