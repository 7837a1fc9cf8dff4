//! An in-memory semantic source.
//!
//! `MemoryProgram` stores nodes, symbols, types and signatures in plain
//! arenas and answers [`SemanticSource`] queries from them. It performs no
//! checking of its own: whoever builds the program decides what each query
//! returns. The converter's tests use it to describe programs precisely,
//! including shapes a real checker only produces in corner cases.
//!
//! Ids are arena indices; passing an id from another program panics.

use crate::flags::{CheckFlags, SymbolFlags};
use crate::ids::{NodeId, SignatureId, SymbolId, TypeId};
use crate::source::SemanticSource;
use crate::syntax::{Keyword, Node, NodeKind};
use crate::types::{ConstantValue, EntryPoint, SignatureInfo, SignatureKind, TypeShape};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

// =============================================================================
// Stored data
// =============================================================================

#[derive(Clone, Debug)]
pub struct SymbolData {
    pub name: String,
    pub flags: SymbolFlags,
    pub check_flags: CheckFlags,
    pub declarations: SmallVec<[NodeId; 2]>,
    pub value_declaration: Option<NodeId>,
    pub exports: Vec<SymbolId>,
    pub aliased: Option<SymbolId>,
    pub index_symbol: Option<SymbolId>,
    /// Result of `declared_type_of_symbol` (the instance side for classes).
    pub declared_type: Option<TypeId>,
    /// Result of `type_of_symbol_at_location` (the static side for classes).
    pub value_type: Option<TypeId>,
}

impl SymbolData {
    fn new(name: String, flags: SymbolFlags) -> Self {
        Self {
            name,
            flags,
            check_flags: CheckFlags::empty(),
            declarations: SmallVec::new(),
            value_declaration: None,
            exports: Vec::new(),
            aliased: None,
            index_symbol: None,
            declared_type: None,
            value_type: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct TypeData {
    pub shape: TypeShape,
    /// What `type_to_string` returns.
    pub display: String,
    /// What `type_to_type_node` returns.
    pub node: Option<NodeId>,
    pub symbol: Option<SymbolId>,
    pub alias_symbol: Option<SymbolId>,
    pub alias_type_arguments: Vec<TypeId>,
    pub type_arguments: Vec<TypeId>,
    pub properties: Vec<SymbolId>,
    pub call_signatures: Vec<SignatureId>,
    pub construct_signatures: Vec<SignatureId>,
    pub type_parameters: Vec<TypeId>,
    pub constraint: Option<TypeId>,
    pub default: Option<TypeId>,
    pub non_nullable: Option<TypeId>,
}

impl TypeData {
    pub fn new(shape: TypeShape, display: impl Into<String>) -> Self {
        Self {
            shape,
            display: display.into(),
            node: None,
            symbol: None,
            alias_symbol: None,
            alias_type_arguments: Vec::new(),
            type_arguments: Vec::new(),
            properties: Vec::new(),
            call_signatures: Vec::new(),
            construct_signatures: Vec::new(),
            type_parameters: Vec::new(),
            constraint: None,
            default: None,
            non_nullable: None,
        }
    }

    pub fn with_node(mut self, node: NodeId) -> Self {
        self.node = Some(node);
        self
    }

    pub fn with_symbol(mut self, symbol: SymbolId) -> Self {
        self.symbol = Some(symbol);
        self
    }

    pub fn with_alias(mut self, alias: SymbolId, arguments: Vec<TypeId>) -> Self {
        self.alias_symbol = Some(alias);
        self.alias_type_arguments = arguments;
        self
    }

    pub fn with_type_arguments(mut self, arguments: Vec<TypeId>) -> Self {
        self.type_arguments = arguments;
        self
    }

    pub fn with_properties(mut self, properties: Vec<SymbolId>) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_call_signatures(mut self, signatures: Vec<SignatureId>) -> Self {
        self.call_signatures = signatures;
        self
    }

    pub fn with_construct_signatures(mut self, signatures: Vec<SignatureId>) -> Self {
        self.construct_signatures = signatures;
        self
    }
}

// =============================================================================
// MemoryProgram
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryProgram {
    nodes: Vec<Node>,
    symbols: Vec<SymbolData>,
    types: Vec<TypeData>,
    signatures: Vec<SignatureInfo>,
    entry_points: Vec<EntryPoint>,
    node_symbols: FxHashMap<NodeId, SymbolId>,
    location_symbols: FxHashMap<NodeId, SymbolId>,
    node_types: FxHashMap<NodeId, TypeId>,
    declaration_signatures: FxHashMap<NodeId, SignatureId>,
    constant_values: FxHashMap<NodeId, ConstantValue>,
    keyword_types: FxHashMap<Keyword, TypeId>,
}

impl MemoryProgram {
    pub fn new() -> Self {
        let mut program = Self::default();
        program.keyword_type(Keyword::Any);
        program
    }

    // ----- Nodes -----

    /// Allocate a node and adopt the children its payload names.
    pub fn add_node(&mut self, kind: NodeKind, text: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        for child in kind.children() {
            if let Some(node) = self.nodes.get_mut(child.index()) {
                node.parent = Some(id);
            }
        }
        self.nodes.push(Node::new(kind, text));
        id
    }

    pub fn node_mut(&mut self, node: NodeId) -> &mut Node {
        &mut self.nodes[node.index()]
    }

    pub fn add_source_file(&mut self, file_name: &str, statements: Vec<NodeId>) -> NodeId {
        self.add_node(
            NodeKind::SourceFile {
                file_name: file_name.to_string(),
                statements,
            },
            "",
        )
    }

    // ----- Symbols -----

    pub fn add_symbol(&mut self, name: &str, flags: SymbolFlags) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(SymbolData::new(name.to_string(), flags));
        id
    }

    pub fn symbol_mut(&mut self, symbol: SymbolId) -> &mut SymbolData {
        &mut self.symbols[symbol.index()]
    }

    /// Record `node` as a declaration of `symbol`.
    ///
    /// The first declaration that introduces a value becomes the value
    /// declaration.
    pub fn declare(&mut self, symbol: SymbolId, node: NodeId) {
        let is_type_only = matches!(
            self.nodes[node.index()].kind,
            NodeKind::InterfaceDeclaration { .. }
                | NodeKind::TypeAliasDeclaration { .. }
                | NodeKind::TypeParameter { .. }
                | NodeKind::JsDocTypedefTag { .. }
                | NodeKind::JsDocCallbackTag { .. }
        );
        let data = &mut self.symbols[symbol.index()];
        data.declarations.push(node);
        if data.value_declaration.is_none() && !is_type_only {
            data.value_declaration = Some(node);
        }
        self.node_symbols.insert(node, symbol);
    }

    /// Make `symbol_at_location(node)` return `symbol`.
    pub fn bind(&mut self, node: NodeId, symbol: SymbolId) {
        self.location_symbols.insert(node, symbol);
    }

    // ----- Types -----

    pub fn add_type(&mut self, data: TypeData) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(data);
        id
    }

    pub fn type_mut(&mut self, ty: TypeId) -> &mut TypeData {
        &mut self.types[ty.index()]
    }

    /// The intrinsic type for `keyword`, with a keyword node to go with it.
    pub fn keyword_type(&mut self, keyword: Keyword) -> TypeId {
        if let Some(&ty) = self.keyword_types.get(&keyword) {
            return ty;
        }
        let node = self.add_node(NodeKind::Keyword(keyword), keyword.name());
        let ty = self.add_type(TypeData::new(TypeShape::Intrinsic, keyword.name()).with_node(node));
        self.keyword_types.insert(keyword, ty);
        ty
    }

    pub fn set_node_type(&mut self, node: NodeId, ty: TypeId) {
        self.node_types.insert(node, ty);
    }

    // ----- Signatures -----

    pub fn add_signature(&mut self, info: SignatureInfo) -> SignatureId {
        let id = SignatureId(self.signatures.len() as u32);
        if let Some(declaration) = info.declaration {
            self.declaration_signatures.entry(declaration).or_insert(id);
        }
        self.signatures.push(info);
        id
    }

    // ----- Program -----

    pub fn add_entry_point(&mut self, display_name: &str, source_file: NodeId) {
        self.entry_points.push(EntryPoint {
            display_name: display_name.to_string(),
            source_file,
        });
    }

    pub fn set_constant_value(&mut self, declaration: NodeId, value: ConstantValue) {
        self.constant_values.insert(declaration, value);
    }

    fn type_data(&self, ty: TypeId) -> Option<&TypeData> {
        self.types.get(ty.index())
    }

    /// Fallback for symbols nobody gave a type.
    fn any_type(&self) -> TypeId {
        self.keyword_types
            .get(&Keyword::Any)
            .copied()
            .unwrap_or(TypeId(u32::MAX))
    }
}

impl SemanticSource for MemoryProgram {
    fn entry_points(&self) -> Vec<EntryPoint> {
        self.entry_points.clone()
    }

    fn symbol_name(&self, symbol: SymbolId) -> &str {
        self.symbols
            .get(symbol.index())
            .map_or("", |data| data.name.as_str())
    }

    fn symbol_flags(&self, symbol: SymbolId) -> SymbolFlags {
        self.symbols
            .get(symbol.index())
            .map_or(SymbolFlags::empty(), |data| data.flags)
    }

    fn symbol_check_flags(&self, symbol: SymbolId) -> CheckFlags {
        self.symbols
            .get(symbol.index())
            .map_or(CheckFlags::empty(), |data| data.check_flags)
    }

    fn symbol_declarations(&self, symbol: SymbolId) -> &[NodeId] {
        self.symbols
            .get(symbol.index())
            .map_or(&[][..], |data| data.declarations.as_slice())
    }

    fn value_declaration(&self, symbol: SymbolId) -> Option<NodeId> {
        self.symbols.get(symbol.index())?.value_declaration
    }

    fn index_symbol(&self, symbol: SymbolId) -> Option<SymbolId> {
        self.symbols.get(symbol.index())?.index_symbol
    }

    fn exports_of_module(&self, module: SymbolId) -> Vec<SymbolId> {
        self.symbols
            .get(module.index())
            .map(|data| data.exports.clone())
            .unwrap_or_default()
    }

    fn aliased_symbol(&self, alias: SymbolId) -> Option<SymbolId> {
        self.symbols.get(alias.index())?.aliased
    }

    fn constant_value(&self, declaration: NodeId) -> Option<ConstantValue> {
        self.constant_values.get(&declaration).cloned()
    }

    fn node(&self, node: NodeId) -> &Node {
        &self.nodes[node.index()]
    }

    fn symbol_at_location(&self, node: NodeId) -> Option<SymbolId> {
        self.location_symbols.get(&node).copied()
    }

    fn symbol_of_declaration(&self, node: NodeId) -> Option<SymbolId> {
        self.node_symbols.get(&node).copied()
    }

    fn type_at_location(&self, node: NodeId) -> Option<TypeId> {
        self.node_types.get(&node).copied()
    }

    fn signature_from_declaration(&self, declaration: NodeId) -> Option<SignatureId> {
        self.declaration_signatures.get(&declaration).copied()
    }

    fn declared_type_of_symbol(&self, symbol: SymbolId) -> TypeId {
        self.symbols
            .get(symbol.index())
            .and_then(|data| data.declared_type)
            .unwrap_or_else(|| self.any_type())
    }

    fn type_of_symbol_at_location(&self, symbol: SymbolId, _location: Option<NodeId>) -> TypeId {
        self.symbols
            .get(symbol.index())
            .and_then(|data| data.value_type.or(data.declared_type))
            .unwrap_or_else(|| self.any_type())
    }

    fn type_shape(&self, ty: TypeId) -> TypeShape {
        self.type_data(ty)
            .map_or(TypeShape::Intrinsic, |data| data.shape.clone())
    }

    fn type_symbol(&self, ty: TypeId) -> Option<SymbolId> {
        self.type_data(ty)?.symbol
    }

    fn alias_symbol(&self, ty: TypeId) -> Option<SymbolId> {
        self.type_data(ty)?.alias_symbol
    }

    fn alias_type_arguments(&self, ty: TypeId) -> Vec<TypeId> {
        self.type_data(ty)
            .map(|data| data.alias_type_arguments.clone())
            .unwrap_or_default()
    }

    fn type_arguments(&self, ty: TypeId) -> Vec<TypeId> {
        self.type_data(ty)
            .map(|data| data.type_arguments.clone())
            .unwrap_or_default()
    }

    fn properties_of_type(&self, ty: TypeId) -> Vec<SymbolId> {
        self.type_data(ty)
            .map(|data| data.properties.clone())
            .unwrap_or_default()
    }

    fn signatures_of_type(&self, ty: TypeId, kind: SignatureKind) -> Vec<SignatureId> {
        self.type_data(ty)
            .map(|data| match kind {
                SignatureKind::Call => data.call_signatures.clone(),
                SignatureKind::Construct => data.construct_signatures.clone(),
            })
            .unwrap_or_default()
    }

    fn type_parameters_of_type(&self, ty: TypeId) -> Vec<TypeId> {
        self.type_data(ty)
            .map(|data| data.type_parameters.clone())
            .unwrap_or_default()
    }

    fn type_parameter_constraint(&self, ty: TypeId) -> Option<TypeId> {
        self.type_data(ty)?.constraint
    }

    fn type_parameter_default(&self, ty: TypeId) -> Option<TypeId> {
        self.type_data(ty)?.default
    }

    fn non_nullable_type(&self, ty: TypeId) -> TypeId {
        self.type_data(ty).and_then(|data| data.non_nullable).unwrap_or(ty)
    }

    fn type_to_string(&self, ty: TypeId) -> String {
        self.type_data(ty)
            .map(|data| data.display.clone())
            .unwrap_or_default()
    }

    fn type_to_type_node(&self, ty: TypeId) -> Option<NodeId> {
        self.type_data(ty)?.node
    }

    fn signature(&self, signature: SignatureId) -> SignatureInfo {
        self.signatures
            .get(signature.index())
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "../tests/program_tests.rs"]
mod tests;
