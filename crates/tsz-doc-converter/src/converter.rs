//! Conversion driver and registry operations.
//!
//! [`Converter`] is the public entry point. A call to [`Converter::convert`]
//! creates one [`ProjectReflection`] and walks every entry point of every
//! program into it, sequentially, so that symbols shared between programs
//! still deduplicate.
//!
//! The walk itself happens on a [`ConverterState`], which borrows the
//! program being converted, the project and the converter's collaborators
//! for the duration of one program. Its handler methods are spread over
//! `symbols.rs`, `types.rs` and `signature.rs`.

use globset::GlobSet;
use tracing::{debug, debug_span, warn};
use tsz_doc_model::{
    Comment, DeclarationData, ProjectReflection, ReferenceTarget, Reflection, ReflectionFlags,
    ReflectionId, ReflectionKind,
};
use tsz_doc_source::{EntryPoint, NodeId, SemanticSource, SymbolFlags, SymbolId, SyntaxKind};

use crate::comments::{CommentProvider, DocCommentProvider};
use crate::context::Context;
use crate::cycle::CycleGuard;
use crate::diagnostics::{ConversionDiagnostic, DiagnosticKind};
use crate::error::{ConvertError, Result};
use crate::events::{ConverterEvent, ConverterListener, EventBus, EventData};
use crate::options::ConverterOptions;
use crate::source_plugin::SourcePlugin;

/// The result of a successful conversion run.
#[derive(Debug)]
pub struct Conversion {
    pub project: ProjectReflection,
    /// Unsupported shapes that were replaced by placeholders.
    pub diagnostics: Vec<ConversionDiagnostic>,
}

pub struct Converter {
    options: ConverterOptions,
    events: EventBus,
    comments: Box<dyn CommentProvider>,
}

impl Converter {
    /// A converter with the default comment provider and, unless sources are
    /// disabled, the source plugin subscribed.
    pub fn new(options: ConverterOptions) -> Self {
        let mut events = EventBus::new();
        if !options.disable_sources {
            events.subscribe(Box::new(SourcePlugin));
        }
        Self {
            options,
            events,
            comments: Box::new(DocCommentProvider),
        }
    }

    #[must_use]
    pub fn with_comment_provider(mut self, comments: Box<dyn CommentProvider>) -> Self {
        self.comments = comments;
        self
    }

    pub fn subscribe(&mut self, listener: Box<dyn ConverterListener>) {
        self.events.subscribe(listener);
    }

    pub fn options(&self) -> &ConverterOptions {
        &self.options
    }

    /// Convert every entry point of `programs` into one project named `name`.
    ///
    /// Direct exports of all entry points are converted before any
    /// re-export, so the declaring module owns each declaration and other
    /// modules receive references.
    pub fn convert(&mut self, name: &str, programs: &[&dyn SemanticSource]) -> Result<Conversion> {
        let _span = debug_span!("convert", project = name).entered();
        let (external, mut diagnostics) = self.options.external_globs();
        let mut project = ProjectReflection::new(name);

        let entry_points: Vec<Vec<EntryPoint>> =
            programs.iter().map(|program| program.entry_points()).collect();
        let single_entry_point = entry_points.iter().map(Vec::len).sum::<usize>() == 1;

        let mut modules = Vec::new();
        for (index, program) in programs.iter().enumerate() {
            let mut state = ConverterState::new(
                *program,
                &mut project,
                &self.options,
                &mut self.events,
                self.comments.as_ref(),
                &external,
            );
            for entry in &entry_points[index] {
                if let Some(context) = state.convert_exports(entry, single_entry_point)? {
                    modules.push((index, entry, context));
                }
            }
            diagnostics.append(&mut state.diagnostics);
        }

        for (index, entry, context) in modules {
            let mut state = ConverterState::new(
                programs[index],
                &mut project,
                &self.options,
                &mut self.events,
                self.comments.as_ref(),
                &external,
            );
            state.convert_re_exports(context, entry)?;
            diagnostics.append(&mut state.diagnostics);
        }

        debug!(reflections = project.len(), diagnostics = diagnostics.len(), "conversion finished");
        Ok(Conversion {
            project,
            diagnostics,
        })
    }
}

// =============================================================================
// ConverterState
// =============================================================================

pub(crate) struct ConverterState<'a> {
    pub(crate) source: &'a dyn SemanticSource,
    pub(crate) project: &'a mut ProjectReflection,
    pub(crate) options: &'a ConverterOptions,
    events: &'a mut EventBus,
    comments: &'a dyn CommentProvider,
    external: &'a GlobSet,
    /// Symbols whose inferred type is currently being expanded.
    pub(crate) expanding: CycleGuard<SymbolId>,
    pub(crate) diagnostics: Vec<ConversionDiagnostic>,
}

impl<'a> ConverterState<'a> {
    pub(crate) fn new(
        source: &'a dyn SemanticSource,
        project: &'a mut ProjectReflection,
        options: &'a ConverterOptions,
        events: &'a mut EventBus,
        comments: &'a dyn CommentProvider,
        external: &'a GlobSet,
    ) -> Self {
        Self {
            source,
            project,
            options,
            events,
            comments,
            external,
            expanding: CycleGuard::new(),
            diagnostics: Vec::new(),
        }
    }

    // =========================================================================
    // Entry points
    // =========================================================================

    /// Create the module for `entry` and convert the symbols it declares.
    ///
    /// Returns the module's context for the re-export pass, or `None` when
    /// the entry point was skipped.
    pub(crate) fn convert_exports(
        &mut self,
        entry: &EntryPoint,
        single_entry_point: bool,
    ) -> Result<Option<Context>> {
        let source = self.source;
        let _span = debug_span!("entry_point", name = %entry.display_name).entered();

        let Some(module) = source.symbol_of_declaration(entry.source_file) else {
            let message = format!("entry point `{}` has no module symbol", entry.display_name);
            warn!("{message}");
            self.diagnostics.push(
                ConversionDiagnostic::new(DiagnosticKind::MissingModule, message)
                    .at(source.position_of(entry.source_file)),
            );
            return Ok(None);
        };

        let exports = source.exports_of_module(module);
        if exports.iter().all(|symbol| self.should_ignore(*symbol)) {
            debug!(module = %entry.display_name, "ignoring module with no documentable exports");
            return Ok(None);
        }

        let root = Context::new(ReflectionId::ROOT);
        let context = if single_entry_point {
            self.project.link_symbol(ReflectionId::ROOT, module);
            root
        } else {
            let reflection = self.create_declaration_reflection(
                root,
                ReflectionKind::Module,
                Some(module),
                None,
                Some(&entry.display_name),
            );
            if !self.finalize_declaration_reflection(reflection, Some(module), None)? {
                return Ok(None);
            }
            root.with_scope(reflection)
        };

        for export in exports {
            let target = self.resolve_aliased_symbol(export);
            if self.is_direct_export(target, entry.source_file) {
                self.convert_symbol(context, export, None)?;
            }
        }
        Ok(Some(context))
    }

    /// Convert the exports of `entry` that are declared elsewhere.
    pub(crate) fn convert_re_exports(&mut self, context: Context, entry: &EntryPoint) -> Result<()> {
        let source = self.source;
        let _span = debug_span!("re_exports", name = %entry.display_name).entered();
        let Some(module) = source.symbol_of_declaration(entry.source_file) else {
            return Ok(());
        };
        for export in source.exports_of_module(module) {
            let target = self.resolve_aliased_symbol(export);
            if !self.is_direct_export(target, entry.source_file) {
                self.convert_symbol(context, export, None)?;
            }
        }
        Ok(())
    }

    fn is_direct_export(&self, symbol: SymbolId, file: NodeId) -> bool {
        let source = self.source;
        source
            .symbol_declarations(symbol)
            .iter()
            .any(|declaration| source.source_file_of(*declaration) == Some(file))
    }

    // =========================================================================
    // Symbol helpers
    // =========================================================================

    /// Follow alias links to the symbol that declares the entity.
    pub(crate) fn resolve_aliased_symbol(&self, symbol: SymbolId) -> SymbolId {
        let source = self.source;
        let mut current = symbol;
        let mut steps = 0;
        while source.symbol_flags(current).contains(SymbolFlags::ALIAS) {
            match source.aliased_symbol(current) {
                Some(next) if next != current && steps < 64 => {
                    current = next;
                    steps += 1;
                }
                _ => break,
            }
        }
        current
    }

    /// Reference target for `symbol`, linking straight to its reflection when
    /// it has already been converted.
    pub(crate) fn reference_target(&self, symbol: SymbolId) -> ReferenceTarget {
        match self.project.reflection_from_symbol(symbol) {
            Some(reflection) => ReferenceTarget::Reflection(reflection),
            None => ReferenceTarget::Symbol(symbol),
        }
    }

    pub(crate) fn is_external_node(&self, node: NodeId) -> bool {
        self.source
            .file_name_of(node)
            .is_some_and(|file_name| self.external.is_match(file_name))
    }

    fn is_external_symbol(&self, symbol: SymbolId) -> bool {
        let declarations = self.source.symbol_declarations(symbol);
        !declarations.is_empty()
            && declarations
                .iter()
                .all(|declaration| self.is_external_node(*declaration))
    }

    fn has_comment(&self, symbol: SymbolId) -> bool {
        let source = self.source;
        source
            .symbol_declarations(symbol)
            .iter()
            .any(|declaration| self.comments.comment_for_node(source, *declaration).is_some())
    }

    /// Whether `symbol` is excluded from the documentation entirely.
    pub(crate) fn should_ignore(&self, symbol: SymbolId) -> bool {
        if self.options.exclude_externals && self.is_external_symbol(symbol) {
            return true;
        }
        if self.options.exclude_not_documented {
            let always_documented =
                SymbolFlags::MODULE | SymbolFlags::ENUM_MEMBER | SymbolFlags::ALIAS;
            if !self.source.symbol_flags(symbol).intersects(always_documented)
                && !self.has_comment(symbol)
            {
                return true;
            }
        }
        false
    }

    /// Declarations of `symbol` that correspond to a reflection of `kind`.
    pub(crate) fn nodes_for_symbol(&self, symbol: SymbolId, kind: ReflectionKind) -> Vec<NodeId> {
        let source = self.source;
        let wanted = declaration_kinds(kind);
        source
            .symbol_declarations(symbol)
            .iter()
            .copied()
            .filter(|declaration| wanted.contains(&source.node(*declaration).syntax_kind()))
            .collect()
    }

    pub(crate) fn first_declaration(&self, symbol: SymbolId, expected: &str) -> Result<NodeId> {
        self.source
            .symbol_declarations(symbol)
            .first()
            .copied()
            .ok_or_else(|| self.missing_declaration(symbol, expected))
    }

    pub(crate) fn missing_declaration(&self, symbol: SymbolId, expected: &str) -> ConvertError {
        ConvertError::MissingDeclaration {
            symbol: self.source.symbol_name(symbol).to_string(),
            expected: expected.to_string(),
        }
    }

    pub(crate) fn missing_symbol(&self, node: NodeId) -> ConvertError {
        ConvertError::MissingSymbol {
            kind: self.source.node(node).syntax_kind(),
            position: self.source.position_of(node),
        }
    }

    // =========================================================================
    // Registry operations
    // =========================================================================

    /// Create, register and announce a declaration under `context.scope`.
    ///
    /// The name is the export name, else `name_override`, else the symbol's
    /// own name, with surrounding quotes removed.
    pub(crate) fn create_declaration_reflection(
        &mut self,
        context: Context,
        kind: ReflectionKind,
        symbol: Option<SymbolId>,
        export_symbol: Option<SymbolId>,
        name_override: Option<&str>,
    ) -> ReflectionId {
        let source = self.source;
        let name = export_symbol
            .map(|export| source.symbol_name(export))
            .or(name_override)
            .or_else(|| symbol.map(|symbol| source.symbol_name(symbol)))
            .unwrap_or("unknown");

        let mut reflection = Reflection::declaration(human_name(name), kind, context.scope);
        if context.should_be_static {
            reflection.set_flag(ReflectionFlags::STATIC, true);
        }
        if symbol.is_some_and(|symbol| self.is_external_symbol(symbol)) {
            reflection.set_flag(ReflectionFlags::EXTERNAL, true);
        }

        let id = self.project.register_reflection(reflection, symbol);
        self.project.add_child(context.scope, id);
        let node = symbol.and_then(|symbol| self.nodes_for_symbol(symbol, kind).first().copied());
        self.emit(ConverterEvent::CreateDeclaration, id, node);
        id
    }

    /// Attach the comment, apply exclusion and announce the declaration.
    ///
    /// Returns `false` when the reflection was removed; its children must
    /// not be converted in that case.
    pub(crate) fn finalize_declaration_reflection(
        &mut self,
        id: ReflectionId,
        symbol: Option<SymbolId>,
        export_symbol: Option<SymbolId>,
    ) -> Result<bool> {
        let Some(kind) = self.project.kind_of(id) else {
            return Err(ConvertError::Invariant(format!(
                "finalizing unregistered reflection {}",
                id.0
            )));
        };

        let comment = self.declaration_comment(kind, symbol, export_symbol);
        let reflection = self
            .project
            .get_mut(id)
            .ok_or_else(|| ConvertError::Invariant(format!("reflection {} vanished", id.0)))?;
        if reflection.comment.is_none() {
            reflection.comment = comment;
        }

        let options = self.options;
        let tagged = |tag: &str| {
            reflection
                .comment
                .as_ref()
                .is_some_and(|comment| comment.has_tag(tag))
        };
        let excluded = (options.exclude_private && reflection.has_flag(ReflectionFlags::PRIVATE))
            || (options.exclude_protected && reflection.has_flag(ReflectionFlags::PROTECTED))
            || (options.exclude_internal && tagged("internal"))
            || tagged("hidden")
            || tagged("ignore");
        if excluded {
            debug!(name = %reflection.name, "excluding reflection");
            self.project.remove_reflection(id);
            return Ok(false);
        }

        let node = symbol.and_then(|symbol| self.nodes_for_symbol(symbol, kind).first().copied());
        self.emit(ConverterEvent::FinalizeDeclaration, id, node);
        Ok(true)
    }

    pub(crate) fn declaration_comment(
        &self,
        kind: ReflectionKind,
        symbol: Option<SymbolId>,
        export_symbol: Option<SymbolId>,
    ) -> Option<Comment> {
        let from_symbol = |symbol: SymbolId| {
            let mut nodes = self.nodes_for_symbol(symbol, kind);
            if nodes.is_empty() {
                nodes = self.source.symbol_declarations(symbol).to_vec();
            }
            nodes
                .into_iter()
                .find_map(|node| self.comment_for_node(node))
        };
        let prefer_export = kind.kind_of(ReflectionKind::SOME_MODULE) || kind == ReflectionKind::Reference;
        export_symbol
            .filter(|_| prefer_export)
            .and_then(from_symbol)
            .or_else(|| symbol.and_then(from_symbol))
    }

    pub(crate) fn comment_for_node(&self, node: NodeId) -> Option<Comment> {
        self.comments.comment_for_node(self.source, node)
    }

    /// Emit a reference reflection to `target` for `symbol` under `context.scope`.
    pub(crate) fn create_alias(
        &mut self,
        target: ReflectionId,
        context: Context,
        symbol: SymbolId,
        export_symbol: Option<SymbolId>,
    ) -> ReflectionId {
        let source = self.source;
        let name = source.symbol_name(export_symbol.unwrap_or(symbol));
        let reflection = Reflection::reference(
            human_name(name),
            ReferenceTarget::Reflection(target),
            context.scope,
        );
        let id = self.project.register_reflection(reflection, Some(symbol));
        self.project.add_child(context.scope, id);
        let node = self
            .nodes_for_symbol(symbol, ReflectionKind::Reference)
            .first()
            .copied();
        self.emit(ConverterEvent::CreateDeclaration, id, node);
        id
    }

    /// Register an anonymous declaration (type literal, function or
    /// constructor type). It is owned through the type that wraps it, not
    /// through the scope's children.
    pub(crate) fn create_anonymous_reflection(
        &mut self,
        context: Context,
        kind: ReflectionKind,
        symbol: Option<SymbolId>,
        node: Option<NodeId>,
    ) -> ReflectionId {
        let reflection = Reflection::declaration("__type", kind, context.scope);
        let id = self.project.register_reflection(reflection, symbol);
        self.emit(ConverterEvent::CreateDeclaration, id, node);
        id
    }

    pub(crate) fn emit(&mut self, event: ConverterEvent, reflection: ReflectionId, node: Option<NodeId>) {
        let data = EventData {
            event,
            reflection,
            node,
            source: self.source,
        };
        self.events.emit(data, self.project);
    }

    // =========================================================================
    // Reflection access
    // =========================================================================

    pub(crate) fn declaration_mut(&mut self, id: ReflectionId) -> Result<&mut DeclarationData> {
        self.project
            .get_mut(id)
            .and_then(Reflection::as_declaration_mut)
            .ok_or_else(|| ConvertError::Invariant(format!("reflection {} is not a declaration", id.0)))
    }

    pub(crate) fn set_flag(&mut self, id: ReflectionId, flag: ReflectionFlags, value: bool) {
        if let Some(reflection) = self.project.get_mut(id) {
            reflection.set_flag(flag, value);
        }
    }

    pub(crate) fn report(
        &mut self,
        kind: DiagnosticKind,
        message: String,
        node: Option<NodeId>,
    ) {
        let position = node.and_then(|node| self.source.position_of(node));
        match &position {
            Some(position) => warn!("{message}\n\t{position}"),
            None => warn!("{message}"),
        }
        self.diagnostics
            .push(ConversionDiagnostic::new(kind, message).at(position));
    }
}

/// Strip the quotes of an ambient module name such as `"fs"`.
fn human_name(name: &str) -> String {
    name.strip_prefix('"')
        .and_then(|name| name.strip_suffix('"'))
        .unwrap_or(name)
        .to_string()
}

/// Syntax kinds that declare a reflection of `kind`.
fn declaration_kinds(kind: ReflectionKind) -> &'static [SyntaxKind] {
    use ReflectionKind as K;
    use SyntaxKind as S;
    match kind {
        K::Project | K::Module | K::Namespace => &[S::SourceFile, S::ModuleDeclaration],
        K::Enum => &[S::EnumDeclaration, S::JsDocEnumTag],
        K::EnumMember => &[S::EnumMember],
        K::Variable => &[S::VariableDeclaration],
        K::Function => &[S::FunctionDeclaration, S::VariableDeclaration],
        K::Class => &[S::ClassDeclaration],
        K::Interface => &[S::InterfaceDeclaration],
        K::Constructor => &[S::Constructor],
        K::Property => &[
            S::PropertyDeclaration,
            S::PropertySignature,
            S::PropertyAssignment,
            S::Parameter,
            S::PropertyAccessExpression,
        ],
        K::Method => &[
            S::MethodDeclaration,
            S::MethodSignature,
            S::PropertyDeclaration,
            S::PropertySignature,
        ],
        K::Accessor => &[S::GetAccessor, S::SetAccessor],
        K::TypeAlias => &[
            S::TypeAliasDeclaration,
            S::JsDocTypedefTag,
            S::JsDocCallbackTag,
            S::JsDocEnumTag,
        ],
        K::Reference => &[
            S::ExportSpecifier,
            S::ImportSpecifier,
            S::NamespaceExport,
            S::ExportAssignment,
        ],
        K::CallSignature => &[S::CallSignature, S::FunctionDeclaration, S::MethodDeclaration],
        K::IndexSignature => &[S::IndexSignature],
        K::ConstructorSignature => &[S::ConstructSignature, S::Constructor],
        K::Parameter => &[S::Parameter, S::JsDocParameterTag],
        K::TypeLiteral => &[S::TypeLiteral],
        K::TypeParameter => &[S::TypeParameter],
        K::GetSignature => &[S::GetAccessor],
        K::SetSignature => &[S::SetAccessor],
        K::ObjectLiteral => &[S::ObjectLiteralExpression],
        K::Event => &[],
    }
}

#[cfg(test)]
#[path = "../tests/converter_tests.rs"]
mod tests;
