//! Symbol conversion.
//!
//! A symbol can carry several declaration kinds at once (a class merged with
//! a namespace, a function with a namespace, ...). [`effective_flags`]
//! reduces the raw flags to the kinds that should each produce a reflection,
//! and every remaining bit is dispatched to its [`SymbolHandler`] in bit
//! order.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use tracing::{debug, trace, trace_span};
use tsz_doc_model::{
    Reflection, ReflectionFlags, ReflectionId, ReflectionKind, Type, format_js_number, quote_string,
};
use tsz_doc_source::{
    CheckFlags, ConstantValue, HeritageToken, ModifierFlags, NodeFlags, NodeId, NodeKind,
    ObjectKind, SignatureKind, SymbolFlags, SymbolId, SyntaxKind, TypeId, TypeOrNode, TypeShape,
};

use crate::context::Context;
use crate::converter::ConverterState;
use crate::diagnostics::DiagnosticKind;
use crate::error::{ConvertError, Result};
use crate::events::ConverterEvent;
use crate::expression::convert_default_value;

// =============================================================================
// Flag reduction
// =============================================================================

/// Bits that never produce a reflection of their own.
const IGNORED_FLAGS: SymbolFlags = SymbolFlags::TRANSIENT
    .union(SymbolFlags::ASSIGNMENT)
    .union(SymbolFlags::OPTIONAL)
    .union(SymbolFlags::PROTOTYPE);

/// When the first flag is present, the second set is dropped.
const MERGE_PRECEDENCE: &[(SymbolFlags, SymbolFlags)] = &[
    (
        SymbolFlags::CLASS,
        SymbolFlags::INTERFACE.union(SymbolFlags::FUNCTION),
    ),
    (SymbolFlags::GET_ACCESSOR, SymbolFlags::SET_ACCESSOR),
    (SymbolFlags::NAMESPACE_MODULE, SymbolFlags::VALUE_MODULE),
    (SymbolFlags::METHOD, SymbolFlags::PROPERTY),
];

/// The declaration kinds of `flags` that are converted.
///
/// Each precedence rule is checked against the raw flags, so the outcome
/// does not depend on the order the rules are listed in.
pub(crate) fn effective_flags(flags: SymbolFlags) -> SymbolFlags {
    let mut effective = flags - IGNORED_FLAGS;
    for (winner, losers) in MERGE_PRECEDENCE {
        if flags.contains(*winner) {
            effective -= *losers;
        }
    }
    effective
}

// =============================================================================
// Dispatch
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum SymbolHandler {
    Enum,
    EnumMember,
    Namespace,
    TypeAlias,
    FunctionOrMethod,
    ClassOrInterface,
    Property,
    Constructor,
    Alias,
    Variable,
    Accessor,
}

static SYMBOL_HANDLERS: Lazy<FxHashMap<SymbolFlags, SymbolHandler>> = Lazy::new(|| {
    use SymbolHandler as H;
    let entries = [
        (SymbolFlags::REGULAR_ENUM, H::Enum),
        (SymbolFlags::CONST_ENUM, H::Enum),
        (SymbolFlags::ENUM_MEMBER, H::EnumMember),
        (SymbolFlags::VALUE_MODULE, H::Namespace),
        (SymbolFlags::NAMESPACE_MODULE, H::Namespace),
        (SymbolFlags::TYPE_ALIAS, H::TypeAlias),
        (SymbolFlags::FUNCTION, H::FunctionOrMethod),
        (SymbolFlags::METHOD, H::FunctionOrMethod),
        (SymbolFlags::INTERFACE, H::ClassOrInterface),
        (SymbolFlags::CLASS, H::ClassOrInterface),
        (SymbolFlags::PROPERTY, H::Property),
        (SymbolFlags::CONSTRUCTOR, H::Constructor),
        (SymbolFlags::ALIAS, H::Alias),
        (SymbolFlags::BLOCK_SCOPED_VARIABLE, H::Variable),
        (SymbolFlags::FUNCTION_SCOPED_VARIABLE, H::Variable),
        (SymbolFlags::GET_ACCESSOR, H::Accessor),
        (SymbolFlags::SET_ACCESSOR, H::Accessor),
    ];
    let mut map = FxHashMap::default();
    for (flag, handler) in entries {
        debug_assert!(
            flag.bits().is_power_of_two(),
            "symbol handler key {flag:?} must be a single flag"
        );
        map.insert(flag, handler);
    }
    map
});

pub(crate) fn handler_for(flag: SymbolFlags) -> Option<SymbolHandler> {
    SYMBOL_HANDLERS.get(&flag).copied()
}

impl SymbolHandler {
    fn convert(
        self,
        state: &mut ConverterState<'_>,
        context: Context,
        symbol: SymbolId,
        export_symbol: Option<SymbolId>,
    ) -> Result<()> {
        match self {
            SymbolHandler::Enum => state.convert_enum(context, symbol, export_symbol),
            SymbolHandler::EnumMember => state.convert_enum_member(context, symbol, export_symbol),
            SymbolHandler::Namespace => state.convert_namespace(context, symbol, export_symbol),
            SymbolHandler::TypeAlias => state.convert_type_alias(context, symbol, export_symbol),
            SymbolHandler::FunctionOrMethod => {
                state.convert_function_or_method(context, symbol, export_symbol)
            }
            SymbolHandler::ClassOrInterface => {
                state.convert_class_or_interface(context, symbol, export_symbol)
            }
            SymbolHandler::Property => state.convert_property(context, symbol, export_symbol),
            SymbolHandler::Constructor => state.convert_constructor(context, symbol),
            SymbolHandler::Alias => state.convert_alias(context, symbol, export_symbol),
            SymbolHandler::Variable => state.convert_variable(context, symbol, export_symbol),
            SymbolHandler::Accessor => state.convert_accessor(context, symbol, export_symbol),
        }
    }
}

fn is_const_list(state: &ConverterState<'_>, declaration: NodeId) -> bool {
    let source = state.source;
    source
        .node(declaration)
        .parent
        .is_some_and(|list| source.node(list).flags.contains(NodeFlags::CONST))
}

fn is_let_list(state: &ConverterState<'_>, declaration: NodeId) -> bool {
    let source = state.source;
    source
        .node(declaration)
        .parent
        .is_some_and(|list| source.node(list).flags.contains(NodeFlags::LET))
}

impl<'a> ConverterState<'a> {
    /// Convert `symbol` into zero or more reflections under `context.scope`.
    ///
    /// `export_symbol` names the result when the symbol is reached through an
    /// alias.
    pub(crate) fn convert_symbol(
        &mut self,
        context: Context,
        symbol: SymbolId,
        export_symbol: Option<SymbolId>,
    ) -> Result<()> {
        let source = self.source;
        let _span = trace_span!("convert_symbol", name = source.symbol_name(symbol)).entered();

        if self.should_ignore(symbol) {
            trace!("ignored");
            return Ok(());
        }

        // Already converted under a module: a re-export gets a reference.
        if let Some(previous) = self.project.reflection_from_symbol(symbol) {
            let parent_kind = self
                .project
                .get(previous)
                .and_then(|reflection| reflection.parent)
                .and_then(|parent| self.project.kind_of(parent));
            if matches!(
                parent_kind,
                Some(ReflectionKind::Module | ReflectionKind::Project)
            ) {
                self.create_alias(previous, context, symbol, export_symbol);
                return Ok(());
            }
        }

        let flags = effective_flags(source.symbol_flags(symbol));
        for flag in flags.single_bits() {
            match handler_for(flag) {
                Some(handler) => handler.convert(self, context, symbol, export_symbol)?,
                None => {
                    let node = source.symbol_declarations(symbol).first().copied();
                    self.report(
                        DiagnosticKind::MissingHandler,
                        format!(
                            "missing converter for symbol `{}` with flag {flag:?}",
                            source.symbol_name(symbol)
                        ),
                        node,
                    );
                }
            }
        }
        Ok(())
    }

    // =========================================================================
    // Enums and namespaces
    // =========================================================================

    fn convert_enum(
        &mut self,
        context: Context,
        symbol: SymbolId,
        export_symbol: Option<SymbolId>,
    ) -> Result<()> {
        let source = self.source;
        let reflection = self.create_declaration_reflection(
            context,
            ReflectionKind::Enum,
            Some(symbol),
            export_symbol,
            None,
        );
        if source.symbol_flags(symbol).contains(SymbolFlags::CONST_ENUM) {
            self.set_flag(reflection, ReflectionFlags::CONST, true);
        }
        if !self.finalize_declaration_reflection(reflection, Some(symbol), export_symbol)? {
            return Ok(());
        }

        let members = source
            .exports_of_module(symbol)
            .into_iter()
            .filter(|member| source.symbol_flags(*member).contains(SymbolFlags::ENUM_MEMBER));
        for member in members {
            self.convert_symbol(context.with_scope(reflection), member, None)?;
        }
        Ok(())
    }

    fn convert_enum_member(
        &mut self,
        context: Context,
        symbol: SymbolId,
        export_symbol: Option<SymbolId>,
    ) -> Result<()> {
        let source = self.source;
        let reflection = self.create_declaration_reflection(
            context,
            ReflectionKind::EnumMember,
            Some(symbol),
            export_symbol,
            None,
        );
        let declaration = self.first_declaration(symbol, "enum member declaration")?;
        let default_value = source.constant_value(declaration).map(|value| match value {
            ConstantValue::Number(number) => format_js_number(number),
            ConstantValue::String(string) => quote_string(&string),
        });
        self.declaration_mut(reflection)?.default_value = default_value;
        self.finalize_declaration_reflection(reflection, Some(symbol), export_symbol)?;
        Ok(())
    }

    fn convert_namespace(
        &mut self,
        context: Context,
        symbol: SymbolId,
        export_symbol: Option<SymbolId>,
    ) -> Result<()> {
        let source = self.source;
        let flags = source.symbol_flags(symbol);
        let has_module_declaration = source.symbol_declarations(symbol).iter().any(|node| {
            matches!(
                source.node(*node).syntax_kind(),
                SyntaxKind::ModuleDeclaration | SyntaxKind::SourceFile
            )
        });

        // Static members assigned to a function or class (`fn.x = 1`) merge a
        // value module without a namespace declaration.
        let member_flags = if has_module_declaration {
            SymbolFlags::MODULE_MEMBER
        } else {
            if flags.contains(SymbolFlags::CLASS) {
                return Ok(());
            }
            SymbolFlags::CLASS_MEMBER
        };

        let reflection = self.create_declaration_reflection(
            context,
            ReflectionKind::Namespace,
            Some(symbol),
            export_symbol,
            None,
        );
        if !self.finalize_declaration_reflection(reflection, Some(symbol), export_symbol)? {
            return Ok(());
        }

        for export in source.exports_of_module(symbol) {
            if source.symbol_flags(export).intersects(member_flags) {
                self.convert_symbol(context.with_scope(reflection), export, None)?;
            }
        }
        Ok(())
    }

    // =========================================================================
    // Type aliases
    // =========================================================================

    fn convert_type_alias(
        &mut self,
        context: Context,
        symbol: SymbolId,
        export_symbol: Option<SymbolId>,
    ) -> Result<()> {
        let source = self.source;
        let declaration = source
            .symbol_declarations(symbol)
            .iter()
            .copied()
            .find(|node| {
                matches!(
                    source.node(*node).syntax_kind(),
                    SyntaxKind::TypeAliasDeclaration
                        | SyntaxKind::JsDocTypedefTag
                        | SyntaxKind::JsDocCallbackTag
                        | SyntaxKind::JsDocEnumTag
                )
            })
            .ok_or_else(|| self.missing_declaration(symbol, "type alias declaration"))?;

        let reflection = self.create_declaration_reflection(
            context,
            ReflectionKind::TypeAlias,
            Some(symbol),
            export_symbol,
            None,
        );
        let alias_context = context.with_scope(reflection);

        match &source.node(declaration).kind {
            NodeKind::TypeAliasDeclaration {
                type_parameters,
                ty,
            } => {
                let converted = self.convert_type(alias_context, TypeOrNode::Node(*ty))?;
                self.declaration_mut(reflection)?.ty = Some(converted);
                let type_parameters =
                    self.convert_type_parameter_nodes(alias_context, type_parameters)?;
                self.declaration_mut(reflection)?.type_parameters = type_parameters;
                self.finalize_declaration_reflection(reflection, Some(symbol), export_symbol)?;
            }
            NodeKind::JsDocTypedefTag { type_expression }
            | NodeKind::JsDocEnumTag { type_expression } => {
                let converted =
                    self.convert_optional_type(alias_context, type_expression.map(TypeOrNode::Node))?;
                self.declaration_mut(reflection)?.ty = Some(converted);
                self.finalize_declaration_reflection(reflection, Some(symbol), export_symbol)?;
            }
            NodeKind::JsDocCallbackTag { parameters, ty } => {
                if !self.finalize_declaration_reflection(reflection, Some(symbol), export_symbol)? {
                    return Ok(());
                }
                let converted =
                    self.convert_callback_signature(alias_context, declaration, parameters, *ty)?;
                self.declaration_mut(reflection)?.ty = Some(converted);
            }
            other => {
                return Err(ConvertError::UnexpectedNode {
                    expected: "type alias declaration",
                    found: other.syntax_kind(),
                    position: source.position_of(declaration),
                });
            }
        }
        Ok(())
    }

    /// `@callback` tags document a function type: a type literal with one
    /// call signature built from the tag's `@param`s.
    fn convert_callback_signature(
        &mut self,
        context: Context,
        declaration: NodeId,
        parameters: &[NodeId],
        return_type: Option<NodeId>,
    ) -> Result<Type> {
        let source = self.source;
        let symbol = source
            .symbol_at_location(declaration)
            .or_else(|| source.symbol_of_declaration(declaration));
        let literal = self.create_anonymous_reflection(
            context,
            ReflectionKind::TypeLiteral,
            symbol,
            Some(declaration),
        );
        let literal_context = context.with_scope(literal);
        let signature = self.create_signature_reflection(
            literal_context,
            "__type",
            ReflectionKind::CallSignature,
        );
        self.declaration_mut(literal)?.signatures.push(signature);

        let signature_context = literal_context.with_scope(signature);
        let ty = self.convert_optional_type(signature_context, return_type.map(TypeOrNode::Node))?;
        let parameters = self.convert_parameter_nodes(signature_context, signature, parameters)?;
        if let Some(data) = self.project.get_mut(signature).and_then(|r| r.as_signature_mut()) {
            data.ty = Some(ty);
            data.parameters = parameters;
        }
        Ok(Type::Reflection {
            declaration: literal,
        })
    }

    // =========================================================================
    // Functions and methods
    // =========================================================================

    fn convert_function_or_method(
        &mut self,
        context: Context,
        symbol: SymbolId,
        export_symbol: Option<SymbolId>,
    ) -> Result<()> {
        let source = self.source;
        let is_method = source
            .symbol_flags(symbol)
            .intersects(SymbolFlags::PROPERTY | SymbolFlags::METHOD);
        let all_declarations = source.symbol_declarations(symbol);
        let declarations: Vec<NodeId> = all_declarations
            .iter()
            .copied()
            .filter(|node| source.node(*node).kind.is_function_like())
            .collect();

        if is_method {
            if let Some(first) = declarations.first() {
                if source
                    .combined_modifier_flags(*first)
                    .contains(ModifierFlags::PRIVATE)
                    && self.is_inherited(context, symbol)?
                {
                    return Ok(());
                }
            }
        }

        let location = self.member_location(context, symbol);
        let ty = source.type_of_symbol_at_location(symbol, location);
        let signatures = source.signatures_of_type(source.non_nullable_type(ty), SignatureKind::Call);

        let container = self.project.kind_of(context.scope);
        let kind = match container {
            Some(
                ReflectionKind::Class
                | ReflectionKind::Interface
                | ReflectionKind::Variable
                | ReflectionKind::Property
                | ReflectionKind::TypeLiteral,
            ) => ReflectionKind::Method,
            _ => ReflectionKind::Function,
        };

        let reflection =
            self.create_declaration_reflection(context, kind, Some(symbol), export_symbol, None);
        if is_method {
            if let Some(first) = all_declarations.first() {
                self.set_modifiers(symbol, *first, reflection);
            }
        }
        if !self.finalize_declaration_reflection(reflection, Some(symbol), export_symbol)? {
            return Ok(());
        }

        let signature_context = context.with_scope(reflection);
        for (index, signature) in signatures.iter().enumerate() {
            self.create_signature(
                signature_context,
                ReflectionKind::CallSignature,
                *signature,
                declarations.get(index).copied(),
            )?;
        }
        Ok(())
    }

    /// Where the checker should resolve a member's type: the container's
    /// class or interface declaration, then any container declaration, else
    /// the member's own source file.
    fn member_location(&self, context: Context, symbol: SymbolId) -> Option<NodeId> {
        let source = self.source;
        let from_container = self
            .project
            .symbol_from_reflection(context.scope)
            .and_then(|parent| {
                let declarations = source.symbol_declarations(parent);
                declarations
                    .iter()
                    .copied()
                    .find(|node| {
                        matches!(
                            source.node(*node).syntax_kind(),
                            SyntaxKind::ClassDeclaration | SyntaxKind::InterfaceDeclaration
                        )
                    })
                    .or_else(|| declarations.first().copied())
            });
        from_container.or_else(|| {
            source
                .symbol_declarations(symbol)
                .first()
                .and_then(|node| source.source_file_of(*node))
        })
    }

    // =========================================================================
    // Classes and interfaces
    // =========================================================================

    fn convert_class_or_interface(
        &mut self,
        context: Context,
        symbol: SymbolId,
        export_symbol: Option<SymbolId>,
    ) -> Result<()> {
        let source = self.source;
        let kind = if source.symbol_flags(symbol).contains(SymbolFlags::CLASS) {
            ReflectionKind::Class
        } else {
            ReflectionKind::Interface
        };
        let reflection =
            self.create_declaration_reflection(context, kind, Some(symbol), export_symbol, None);
        let declarations = source.symbol_declarations(symbol);

        let class_declaration = declarations.iter().copied().find(|node| {
            matches!(
                source.node(*node).syntax_kind(),
                SyntaxKind::ClassDeclaration | SyntaxKind::FunctionDeclaration
            )
        });
        if let Some(declaration) = class_declaration {
            self.set_modifiers(symbol, declaration, reflection);
        }

        let reflection_context = context.with_scope(reflection);
        let instance_type = source.declared_type_of_symbol(symbol);
        if source.type_shape(instance_type)
            != TypeShape::Object(ObjectKind::ClassOrInterface)
        {
            return Err(ConvertError::Invariant(format!(
                "declared type of `{}` is not a class or interface",
                source.symbol_name(symbol)
            )));
        }

        let mut extended_types = Vec::new();
        let mut implemented_types = Vec::new();
        for declaration in declarations {
            let clauses = match &source.node(*declaration).kind {
                NodeKind::ClassDeclaration {
                    heritage_clauses, ..
                }
                | NodeKind::InterfaceDeclaration {
                    heritage_clauses, ..
                } => heritage_clauses,
                _ => continue,
            };
            for clause in clauses {
                let target = match clause.token {
                    HeritageToken::Extends => &mut extended_types,
                    HeritageToken::Implements => &mut implemented_types,
                };
                for node in &clause.types {
                    let converted = self.convert_type(reflection_context, TypeOrNode::Node(*node))?;
                    if !target.contains(&converted) {
                        target.push(converted);
                    }
                }
            }
        }
        {
            let data = self.declaration_mut(reflection)?;
            data.extended_types = extended_types;
            data.implemented_types = implemented_types;
        }

        if !self.finalize_declaration_reflection(reflection, Some(symbol), export_symbol)? {
            return Ok(());
        }

        if let Some(declaration) = class_declaration {
            let static_type = source.type_of_symbol_at_location(symbol, Some(declaration));
            let static_context = reflection_context.with_static(true);
            for property in source.properties_of_type(static_type) {
                // Namespace members merged into the class are converted by
                // the namespace handler.
                if source
                    .symbol_flags(property)
                    .intersects(SymbolFlags::MODULE_MEMBER | SymbolFlags::PROTOTYPE)
                {
                    continue;
                }
                self.convert_symbol(static_context, property, None)?;
            }

            self.convert_class_constructor(reflection_context, symbol, declaration, static_type)?;
        }

        for property in source.properties_of_type(instance_type) {
            self.convert_symbol(reflection_context, property, None)?;
        }

        let mut type_parameters = Vec::new();
        for parameter in source.type_parameters_of_type(instance_type) {
            let declaration = source
                .type_symbol(parameter)
                .and_then(|parameter_symbol| {
                    source.symbol_declarations(parameter_symbol).first().copied()
                })
                .filter(|node| source.node(*node).syntax_kind() == SyntaxKind::TypeParameter)
                .ok_or_else(|| {
                    ConvertError::Invariant(format!(
                        "type parameter `{}` of `{}` has no declaration",
                        source.type_to_string(parameter),
                        source.symbol_name(symbol)
                    ))
                })?;
            type_parameters.push(self.convert_type_parameter_node(reflection_context, declaration)?);
        }
        self.declaration_mut(reflection)?.type_parameters = type_parameters;

        for signature in source.signatures_of_type(instance_type, SignatureKind::Call) {
            self.create_signature(reflection_context, ReflectionKind::CallSignature, signature, None)?;
        }

        self.convert_construct_signatures(reflection_context, symbol)?;
        self.convert_index_signature(reflection_context, Some(symbol))?;
        Ok(())
    }

    /// A class always gets exactly one `constructor` member holding one
    /// signature per construct signature of its static side.
    fn convert_class_constructor(
        &mut self,
        context: Context,
        symbol: SymbolId,
        class_declaration: NodeId,
        static_type: TypeId,
    ) -> Result<()> {
        let source = self.source;
        let constructor = self.project.register_reflection(
            Reflection::declaration(
                "constructor",
                ReflectionKind::Constructor,
                context.scope,
            ),
            None,
        );
        self.project.add_child(context.scope, constructor);

        let signatures = source.signatures_of_type(static_type, SignatureKind::Construct);
        if let Some(first) = signatures.first() {
            if let Some(declaration) = source.signature(*first).declaration {
                self.set_modifiers(symbol, declaration, constructor);
            }
        }

        let node = match &source.node(class_declaration).kind {
            NodeKind::ClassDeclaration { members, .. } => members
                .iter()
                .copied()
                .find(|member| source.node(*member).syntax_kind() == SyntaxKind::Constructor),
            _ => None,
        };
        self.emit(
            ConverterEvent::CreateDeclaration,
            constructor,
            node,
        );

        let constructor_context = context.with_scope(constructor);
        for signature in signatures {
            self.create_signature(
                constructor_context,
                ReflectionKind::ConstructorSignature,
                signature,
                None,
            )?;
        }
        Ok(())
    }

    /// `new (...)` members of interfaces and type literals.
    pub(crate) fn convert_construct_signatures(
        &mut self,
        context: Context,
        symbol: SymbolId,
    ) -> Result<()> {
        let source = self.source;
        let ty = source.declared_type_of_symbol(symbol);
        let signatures = source.signatures_of_type(ty, SignatureKind::Construct);
        if signatures.is_empty() {
            return Ok(());
        }

        let constructor = self.project.register_reflection(
            Reflection::declaration(
                "constructor",
                ReflectionKind::Constructor,
                context.scope,
            ),
            None,
        );
        self.project.add_child(context.scope, constructor);
        let node = self
            .nodes_for_symbol(symbol, ReflectionKind::Constructor)
            .first()
            .copied();
        self.emit(
            ConverterEvent::CreateDeclaration,
            constructor,
            node,
        );

        let constructor_context = context.with_scope(constructor);
        for signature in signatures {
            self.create_signature(
                constructor_context,
                ReflectionKind::ConstructorSignature,
                signature,
                None,
            )?;
        }
        Ok(())
    }

    // =========================================================================
    // Properties
    // =========================================================================

    fn convert_property(
        &mut self,
        context: Context,
        symbol: SymbolId,
        export_symbol: Option<SymbolId>,
    ) -> Result<()> {
        let source = self.source;
        let declarations = source.symbol_declarations(symbol);

        if let Some(first) = declarations.first() {
            if source
                .combined_modifier_flags(*first)
                .contains(ModifierFlags::PRIVATE)
                && self.is_inherited(context, symbol)?
            {
                return Ok(());
            }
        }

        // `method(): void` merged into an interface through a property flag.
        if !declarations.is_empty()
            && declarations.iter().all(|node| {
                matches!(
                    source.node(*node).syntax_kind(),
                    SyntaxKind::MethodSignature | SyntaxKind::MethodDeclaration
                )
            })
        {
            return self.convert_function_or_method(context, symbol, export_symbol);
        }

        if let [declaration] = declarations {
            match &source.node(*declaration).kind {
                NodeKind::PropertyDeclaration {
                    ty: None,
                    initializer: Some(initializer),
                    ..
                } if source.node(*initializer).syntax_kind() == SyntaxKind::ArrowFunction => {
                    return self.convert_arrow_as_method(context, symbol, *initializer, export_symbol);
                }
                NodeKind::PropertySignature { ty: Some(ty) }
                    if source.node(*ty).syntax_kind() == SyntaxKind::FunctionType =>
                {
                    return self.convert_arrow_as_method(context, symbol, *ty, export_symbol);
                }
                _ => {}
            }
        }

        let kind = if self.project.kind_of(context.scope) == Some(ReflectionKind::Namespace) {
            ReflectionKind::Variable
        } else {
            ReflectionKind::Property
        };
        let reflection =
            self.create_declaration_reflection(context, kind, Some(symbol), export_symbol, None);

        let declaration = declarations.first().copied();
        let mut annotation = None;
        if let Some(declaration) = declaration {
            let node = source.node(declaration);
            match node.syntax_kind() {
                SyntaxKind::PropertyDeclaration
                | SyntaxKind::PropertySignature
                | SyntaxKind::Parameter => {
                    annotation = node.kind.type_annotation();
                    self.set_modifiers(symbol, declaration, reflection);
                }
                SyntaxKind::PropertyAccessExpression => {
                    self.set_modifiers(symbol, declaration, reflection);
                }
                _ => {}
            }
        }
        let default_value =
            declaration.and_then(|declaration| convert_default_value(source, declaration));

        let type_source = match annotation {
            Some(node) if context.converting_type_node => TypeOrNode::Node(node),
            _ => TypeOrNode::Type(source.type_of_symbol_at_location(symbol, None)),
        };
        let mut ty = self.convert_type(context.with_scope(reflection), type_source)?;
        let optional = self
            .project
            .get(reflection)
            .is_some_and(|r| r.has_flag(ReflectionFlags::OPTIONAL));
        if optional {
            ty = ty.remove_undefined();
        }

        {
            let data = self.declaration_mut(reflection)?;
            data.ty = Some(ty);
            data.default_value = default_value;
        }
        self.finalize_declaration_reflection(reflection, Some(symbol), export_symbol)?;
        Ok(())
    }

    /// `x = () => {}` and `x: () => void` are documented as methods.
    fn convert_arrow_as_method(
        &mut self,
        context: Context,
        symbol: SymbolId,
        arrow: NodeId,
        export_symbol: Option<SymbolId>,
    ) -> Result<()> {
        let source = self.source;
        let reflection = self.create_declaration_reflection(
            context,
            ReflectionKind::Method,
            Some(symbol),
            export_symbol,
            None,
        );
        if let Some(property) = source.node(arrow).parent {
            self.set_modifiers(symbol, property, reflection);
        }
        if !self.finalize_declaration_reflection(reflection, Some(symbol), export_symbol)? {
            return Ok(());
        }

        let signature = source
            .signature_from_declaration(arrow)
            .ok_or_else(|| self.missing_declaration(symbol, "function signature"))?;
        self.create_signature(
            context.with_scope(reflection),
            ReflectionKind::CallSignature,
            signature,
            Some(arrow),
        )?;
        Ok(())
    }

    // =========================================================================
    // Constructors, aliases, variables, accessors
    // =========================================================================

    fn convert_constructor(&mut self, context: Context, symbol: SymbolId) -> Result<()> {
        let source = self.source;
        let reflection = self.create_declaration_reflection(
            context,
            ReflectionKind::Constructor,
            Some(symbol),
            None,
            Some("constructor"),
        );
        if !self.finalize_declaration_reflection(reflection, Some(symbol), None)? {
            return Ok(());
        }

        let constructors: Vec<NodeId> = source
            .symbol_declarations(symbol)
            .iter()
            .copied()
            .filter(|node| source.node(*node).syntax_kind() == SyntaxKind::Constructor)
            .collect();
        for declaration in constructors {
            let signature = source
                .signature_from_declaration(declaration)
                .ok_or_else(|| self.missing_declaration(symbol, "constructor signature"))?;
            self.create_signature(
                context.with_scope(reflection),
                ReflectionKind::ConstructorSignature,
                signature,
                None,
            )?;
        }
        Ok(())
    }

    fn convert_alias(
        &mut self,
        context: Context,
        symbol: SymbolId,
        export_symbol: Option<SymbolId>,
    ) -> Result<()> {
        let source = self.source;
        let target = self.resolve_aliased_symbol(symbol);
        if target == symbol {
            let node = source.symbol_declarations(symbol).first().copied();
            self.report(
                DiagnosticKind::UnresolvedAlias,
                format!("could not resolve alias `{}`", source.symbol_name(symbol)),
                node,
            );
            return Ok(());
        }

        match self.project.reflection_from_symbol(target) {
            Some(reflection) => {
                self.create_alias(reflection, context, symbol, export_symbol);
                Ok(())
            }
            None => self.convert_symbol(context, target, Some(export_symbol.unwrap_or(symbol))),
        }
    }

    fn convert_variable(
        &mut self,
        context: Context,
        symbol: SymbolId,
        export_symbol: Option<SymbolId>,
    ) -> Result<()> {
        let source = self.source;
        let declaration = self.first_declaration(symbol, "variable declaration")?;
        let ty = source.type_of_symbol_at_location(symbol, Some(declaration));

        if !source.signatures_of_type(ty, SignatureKind::Call).is_empty()
            && source.properties_of_type(ty).is_empty()
        {
            return self.convert_variable_as_function(context, symbol, export_symbol);
        }

        let reflection = self.create_declaration_reflection(
            context,
            ReflectionKind::Variable,
            Some(symbol),
            export_symbol,
            None,
        );
        let node = source.node(declaration);
        let type_source = match &node.kind {
            NodeKind::VariableDeclaration { ty: Some(ty), .. } => TypeOrNode::Node(*ty),
            _ => TypeOrNode::Type(ty),
        };
        let converted = self.convert_type(context.with_scope(reflection), type_source)?;
        self.declaration_mut(reflection)?.ty = Some(converted);

        self.set_modifiers(symbol, declaration, reflection);
        self.set_variable_kind_flags(symbol, declaration, reflection);
        self.declaration_mut(reflection)?.default_value =
            convert_default_value(source, declaration);

        self.finalize_declaration_reflection(reflection, Some(symbol), export_symbol)?;
        Ok(())
    }

    /// `const f = (x: number) => x` is documented as a function.
    fn convert_variable_as_function(
        &mut self,
        context: Context,
        symbol: SymbolId,
        export_symbol: Option<SymbolId>,
    ) -> Result<()> {
        let source = self.source;
        let declaration = source
            .symbol_declarations(symbol)
            .iter()
            .copied()
            .find(|node| source.node(*node).syntax_kind() == SyntaxKind::VariableDeclaration);
        let access = declaration.or_else(|| source.value_declaration(symbol));
        let ty = match access {
            Some(node) => source.type_of_symbol_at_location(symbol, Some(node)),
            None => source.declared_type_of_symbol(symbol),
        };

        let reflection = self.create_declaration_reflection(
            context,
            ReflectionKind::Function,
            Some(symbol),
            export_symbol,
            None,
        );
        if let Some(node) = access {
            self.set_modifiers(symbol, node, reflection);
        }
        if let Some(declaration) = declaration {
            self.set_variable_kind_flags(symbol, declaration, reflection);
        }
        if !self.finalize_declaration_reflection(reflection, Some(symbol), export_symbol)? {
            return Ok(());
        }

        for signature in source.signatures_of_type(ty, SignatureKind::Call) {
            self.create_signature_with_comment(
                context.with_scope(reflection),
                ReflectionKind::CallSignature,
                signature,
                None,
                declaration,
            )?;
        }
        Ok(())
    }

    fn set_variable_kind_flags(
        &mut self,
        symbol: SymbolId,
        declaration: NodeId,
        reflection: ReflectionId,
    ) {
        let source = self.source;
        if source.node(declaration).syntax_kind() != SyntaxKind::VariableDeclaration
            || !source
                .symbol_flags(symbol)
                .contains(SymbolFlags::BLOCK_SCOPED_VARIABLE)
        {
            return;
        }
        let is_const = is_const_list(self, declaration);
        let is_let = is_let_list(self, declaration);
        self.set_flag(reflection, ReflectionFlags::CONST, is_const);
        self.set_flag(reflection, ReflectionFlags::LET, is_let);
    }

    fn convert_accessor(
        &mut self,
        context: Context,
        symbol: SymbolId,
        export_symbol: Option<SymbolId>,
    ) -> Result<()> {
        let source = self.source;
        let reflection = self.create_declaration_reflection(
            context,
            ReflectionKind::Accessor,
            Some(symbol),
            export_symbol,
            None,
        );
        let declarations = source.symbol_declarations(symbol);
        if let Some(first) = declarations.first() {
            self.set_modifiers(symbol, *first, reflection);
        }
        if !self.finalize_declaration_reflection(reflection, Some(symbol), export_symbol)? {
            return Ok(());
        }

        let accessor_context = context.with_scope(reflection);
        for (syntax, kind) in [
            (SyntaxKind::GetAccessor, ReflectionKind::GetSignature),
            (SyntaxKind::SetAccessor, ReflectionKind::SetSignature),
        ] {
            let declaration = declarations
                .iter()
                .copied()
                .find(|node| source.node(*node).syntax_kind() == syntax);
            let Some(declaration) = declaration else {
                continue;
            };
            if let Some(signature) = source.signature_from_declaration(declaration) {
                self.create_signature(accessor_context, kind, signature, Some(declaration))?;
            }
        }
        Ok(())
    }

    // =========================================================================
    // Shared helpers
    // =========================================================================

    /// Whether `symbol` is a member the scope inherits rather than declares.
    pub(crate) fn is_inherited(&self, context: Context, symbol: SymbolId) -> Result<bool> {
        let source = self.source;
        let parent = self
            .project
            .symbol_from_reflection(context.scope)
            .ok_or_else(|| {
                ConvertError::Invariant(format!(
                    "scope of member `{}` has no symbol",
                    source.symbol_name(symbol)
                ))
            })?;
        let parent_declarations = source.symbol_declarations(parent);
        let declared_here = source.symbol_declarations(symbol).iter().any(|node| {
            source
                .node(*node)
                .parent
                .is_some_and(|owner| parent_declarations.contains(&owner))
        });
        Ok(!declared_here)
    }

    /// Copy visibility, optionality, readonly and abstract from a declaration.
    pub(crate) fn set_modifiers(
        &mut self,
        symbol: SymbolId,
        declaration: NodeId,
        reflection: ReflectionId,
    ) {
        let source = self.source;
        let modifiers = source.combined_modifier_flags(declaration);
        let node = source.node(declaration);
        let Some(target) = self.project.get_mut(reflection) else {
            debug!(reflection = reflection.0, "modifiers for removed reflection");
            return;
        };

        if node.kind.has_private_name() {
            target.set_flag(ReflectionFlags::PRIVATE, true);
        }
        if modifiers.contains(ModifierFlags::PRIVATE) {
            target.set_flag(ReflectionFlags::PRIVATE, true);
        }
        if modifiers.contains(ModifierFlags::PROTECTED) {
            target.set_flag(ReflectionFlags::PROTECTED, true);
        }
        if modifiers.contains(ModifierFlags::PUBLIC) {
            target.set_flag(ReflectionFlags::PUBLIC, true);
        }
        target.set_flag(
            ReflectionFlags::OPTIONAL,
            source.symbol_flags(symbol).contains(SymbolFlags::OPTIONAL),
        );
        target.set_flag(
            ReflectionFlags::READONLY,
            source.symbol_check_flags(symbol).contains(CheckFlags::READONLY)
                || modifiers.contains(ModifierFlags::READONLY),
        );
        target.set_flag(
            ReflectionFlags::ABSTRACT,
            modifiers.contains(ModifierFlags::ABSTRACT),
        );
    }
}

#[cfg(test)]
#[path = "../tests/symbols_tests.rs"]
mod tests;
