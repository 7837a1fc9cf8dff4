//! Signatures, parameters and type parameters.

use tsz_doc_model::{Comment, Reflection, ReflectionFlags, ReflectionId, ReflectionKind, Type};
use tsz_doc_source::{
    NodeId, NodeKind, SignatureId, SymbolId, SyntaxKind, TypeId, TypeOrNode, TypePredicate,
};

use crate::context::Context;
use crate::converter::ConverterState;
use crate::error::{ConvertError, Result};
use crate::events::ConverterEvent;
use crate::expression::convert_default_value;

/// Destructured parameters are bound to synthetic `__0`, `__1`, ... names.
fn is_synthetic_parameter_name(name: &str) -> bool {
    name.strip_prefix("__")
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

fn parameter_name(name: &str) -> &str {
    if is_synthetic_parameter_name(name) {
        "__namedParameters"
    } else {
        name
    }
}

fn param_comment(comment: Option<&Comment>, name: &str) -> Option<Comment> {
    let tag = comment?.tag("param", Some(name))?;
    (!tag.text.is_empty()).then(|| Comment::new(tag.text.clone()))
}

impl<'a> ConverterState<'a> {
    /// Register a signature reflection named `name` under `context.scope`
    /// without attaching it anywhere.
    pub(crate) fn create_signature_reflection(
        &mut self,
        context: Context,
        name: &str,
        kind: ReflectionKind,
    ) -> ReflectionId {
        self.project
            .register_reflection(Reflection::signature(name, kind, context.scope), None)
    }

    /// Build a signature reflection from a checker signature and attach it
    /// to the declaration in `context.scope`.
    ///
    /// `declaration` overrides the signature's own declaration as the source
    /// of the comment, parameter default values and the written return type.
    pub(crate) fn create_signature(
        &mut self,
        context: Context,
        kind: ReflectionKind,
        signature: SignatureId,
        declaration: Option<NodeId>,
    ) -> Result<ReflectionId> {
        self.create_signature_with_comment(context, kind, signature, declaration, None)
    }

    /// Like [`Self::create_signature`], but the comment is read from
    /// `comment_declaration` when given. Function-valued variables document
    /// the variable while parameters come from the function expression.
    pub(crate) fn create_signature_with_comment(
        &mut self,
        context: Context,
        kind: ReflectionKind,
        signature: SignatureId,
        declaration: Option<NodeId>,
        comment_declaration: Option<NodeId>,
    ) -> Result<ReflectionId> {
        let source = self.source;
        let info = source.signature(signature);
        let declaration = declaration.or(info.declaration);
        let comment_declaration = comment_declaration.or(declaration);

        let Some(scope) = self.project.get(context.scope) else {
            return Err(ConvertError::Invariant(format!(
                "signature scope {} is not registered",
                context.scope.0
            )));
        };
        let name = if scope.kind == ReflectionKind::Constructor {
            let class_name = scope
                .parent
                .and_then(|parent| self.project.get(parent))
                .map(|parent| parent.name.as_str())
                .unwrap_or_default();
            format!("new {class_name}")
        } else {
            scope.name.clone()
        };

        let id = self.create_signature_reflection(context, &name, kind);
        let comment = comment_declaration.and_then(|node| self.comment_for_node(node));
        if let Some(reflection) = self.project.get_mut(id) {
            reflection.comment = comment.clone();
        }

        let signature_context = context.with_scope(id);
        let mut type_parameters = Vec::with_capacity(info.type_parameters.len());
        for parameter in &info.type_parameters {
            type_parameters.push(self.convert_type_parameter(signature_context, *parameter)?);
        }

        let parameter_nodes = declaration
            .map(|node| source.node(node).kind.parameters())
            .unwrap_or_default();
        let parameters = self.convert_parameters(
            signature_context,
            id,
            &info.parameters,
            parameter_nodes,
            comment.as_ref(),
        )?;

        let ty = if let Some(predicate) = &info.predicate {
            self.convert_predicate(signature_context, predicate)?
        } else if kind == ReflectionKind::SetSignature {
            Type::intrinsic("void")
        } else {
            let written = declaration.and_then(|node| source.node(node).kind.type_annotation());
            let return_type = info
                .return_type
                .map(TypeOrNode::Type)
                .or(written.map(TypeOrNode::Node));
            self.convert_optional_type(signature_context, return_type)?
        };

        if let Some(data) = self.project.get_mut(id).and_then(Reflection::as_signature_mut) {
            data.type_parameters = type_parameters;
            data.parameters = parameters;
            data.ty = Some(ty);
        }
        self.emit(ConverterEvent::CreateSignature, id, comment_declaration);

        let scope = self.declaration_mut(context.scope)?;
        match kind {
            ReflectionKind::GetSignature => scope.get_signature = Some(id),
            ReflectionKind::SetSignature => scope.set_signature = Some(id),
            _ => scope.signatures.push(id),
        }
        Ok(id)
    }

    /// Parameters of a checker signature. `nodes` are the parameter nodes of
    /// the signature's declaration, used for default values.
    fn convert_parameters(
        &mut self,
        context: Context,
        signature: ReflectionId,
        parameters: &[SymbolId],
        nodes: &[NodeId],
        comment: Option<&Comment>,
    ) -> Result<Vec<ReflectionId>> {
        let source = self.source;
        let mut converted = Vec::with_capacity(parameters.len());

        for (index, parameter) in parameters.iter().enumerate() {
            let declaration = source
                .value_declaration(*parameter)
                .or_else(|| source.symbol_declarations(*parameter).first().copied());
            if let Some(node) = declaration {
                let found = source.node(node).syntax_kind();
                if !matches!(found, SyntaxKind::Parameter | SyntaxKind::JsDocParameterTag) {
                    return Err(ConvertError::UnexpectedNode {
                        expected: "parameter declaration",
                        found,
                        position: source.position_of(node),
                    });
                }
            }

            let name = parameter_name(source.symbol_name(*parameter)).to_string();
            let mut reflection = Reflection::parameter(name.as_str(), signature);
            reflection.comment = param_comment(comment, &name);
            let id = self.project.register_reflection(reflection, Some(*parameter));
            self.emit(ConverterEvent::CreateParameter, id, declaration);

            let (written, optional, rest) = match declaration.map(|node| &source.node(node).kind) {
                Some(NodeKind::Parameter {
                    ty,
                    question,
                    dot_dot_dot,
                    ..
                }) => (*ty, *question, *dot_dot_dot),
                Some(NodeKind::JsDocParameterTag {
                    type_expression,
                    bracketed,
                    ..
                }) => (*type_expression, *bracketed, false),
                _ => (None, false, false),
            };
            let type_source = match written {
                Some(node) => TypeOrNode::Node(node),
                None => TypeOrNode::Type(
                    declaration
                        .and_then(|node| source.type_at_location(node))
                        .unwrap_or_else(|| source.type_of_symbol_at_location(*parameter, declaration)),
                ),
            };
            let mut ty = self.convert_type(context.with_scope(id), type_source)?;
            if optional {
                ty = ty.remove_undefined();
            }

            let default_value = nodes
                .get(index)
                .and_then(|node| convert_default_value(source, *node));
            if let Some(reflection) = self.project.get_mut(id) {
                reflection.set_flag(ReflectionFlags::OPTIONAL, optional);
                reflection.set_flag(ReflectionFlags::REST, rest);
                reflection.set_flag(ReflectionFlags::DEFAULT_VALUE, default_value.is_some());
                if let Some(data) = reflection.as_parameter_mut() {
                    data.ty = Some(ty);
                    data.default_value = default_value;
                }
            }
            converted.push(id);
        }
        Ok(converted)
    }

    /// Parameters written as syntax, for function types and `@callback` tags.
    pub(crate) fn convert_parameter_nodes(
        &mut self,
        context: Context,
        signature: ReflectionId,
        parameters: &[NodeId],
    ) -> Result<Vec<ReflectionId>> {
        let source = self.source;
        let mut converted = Vec::with_capacity(parameters.len());

        for node in parameters {
            let (name, written, optional, rest) = match &source.node(*node).kind {
                NodeKind::Parameter {
                    name,
                    ty,
                    question,
                    dot_dot_dot,
                    ..
                } => (name.as_str(), *ty, *question, *dot_dot_dot),
                NodeKind::JsDocParameterTag {
                    name,
                    bracketed,
                    type_expression,
                } => (name.as_str(), *type_expression, *bracketed, false),
                other => {
                    return Err(ConvertError::UnexpectedNode {
                        expected: "parameter",
                        found: other.syntax_kind(),
                        position: source.position_of(*node),
                    });
                }
            };

            let symbol = source
                .symbol_at_location(*node)
                .or_else(|| source.symbol_of_declaration(*node));
            let reflection = Reflection::parameter(parameter_name(name), signature);
            let id = self.project.register_reflection(reflection, symbol);
            self.emit(ConverterEvent::CreateParameter, id, Some(*node));

            let mut ty = self.convert_optional_type(context.with_scope(id), written.map(TypeOrNode::Node))?;
            if optional {
                ty = ty.remove_undefined();
            }
            let default_value = convert_default_value(source, *node);
            if let Some(reflection) = self.project.get_mut(id) {
                reflection.set_flag(ReflectionFlags::OPTIONAL, optional);
                reflection.set_flag(ReflectionFlags::REST, rest);
                reflection.set_flag(ReflectionFlags::DEFAULT_VALUE, default_value.is_some());
                if let Some(data) = reflection.as_parameter_mut() {
                    data.ty = Some(ty);
                    data.default_value = default_value;
                }
            }
            converted.push(id);
        }
        Ok(converted)
    }

    /// A type parameter of a checker signature.
    fn convert_type_parameter(&mut self, context: Context, parameter: TypeId) -> Result<ReflectionId> {
        let source = self.source;
        let symbol = source.type_symbol(parameter);
        let name = match symbol {
            Some(symbol) => source.symbol_name(symbol).to_string(),
            None => source.type_to_string(parameter),
        };
        let constraint = match source.type_parameter_constraint(parameter) {
            Some(ty) => Some(self.convert_type(context, TypeOrNode::Type(ty))?),
            None => None,
        };
        let default = match source.type_parameter_default(parameter) {
            Some(ty) => Some(self.convert_type(context, TypeOrNode::Type(ty))?),
            None => None,
        };

        let reflection = Reflection::type_parameter(name, context.scope, constraint, default);
        let id = self.project.register_reflection(reflection, None);
        let node = symbol.and_then(|symbol| source.symbol_declarations(symbol).first().copied());
        self.emit(ConverterEvent::CreateTypeParameter, id, node);
        Ok(id)
    }

    /// A written `<T extends C = D>` type parameter.
    pub(crate) fn convert_type_parameter_node(
        &mut self,
        context: Context,
        node: NodeId,
    ) -> Result<ReflectionId> {
        let source = self.source;
        let NodeKind::TypeParameter {
            name,
            constraint,
            default,
        } = &source.node(node).kind
        else {
            return Err(ConvertError::UnexpectedNode {
                expected: "type parameter",
                found: source.node(node).syntax_kind(),
                position: source.position_of(node),
            });
        };
        let constraint = match constraint {
            Some(ty) => Some(self.convert_type(context, TypeOrNode::Node(*ty))?),
            None => None,
        };
        let default = match default {
            Some(ty) => Some(self.convert_type(context, TypeOrNode::Node(*ty))?),
            None => None,
        };

        let mut reflection =
            Reflection::type_parameter(name.as_str(), context.scope, constraint, default);
        reflection.comment = self.type_parameter_comment(context, name);
        let id = self.project.register_reflection(reflection, None);
        self.emit(ConverterEvent::CreateTypeParameter, id, Some(node));
        Ok(id)
    }

    pub(crate) fn convert_type_parameter_nodes(
        &mut self,
        context: Context,
        nodes: &[NodeId],
    ) -> Result<Vec<ReflectionId>> {
        nodes
            .iter()
            .map(|node| self.convert_type_parameter_node(context, *node))
            .collect()
    }

    /// `@typeParam T text` on the owning declaration documents `T`.
    ///
    /// Type aliases convert their type parameters before they are finalized,
    /// so the owner's comment is looked up from its symbol when unset.
    fn type_parameter_comment(&self, context: Context, name: &str) -> Option<Comment> {
        let owner = self.project.get(context.scope)?;
        let owner = match &owner.comment {
            Some(comment) => comment.clone(),
            None => {
                let symbol = self.project.symbol_from_reflection(context.scope)?;
                self.declaration_comment(owner.kind, Some(symbol), None)?
            }
        };
        ["typeparam", "template"]
            .into_iter()
            .find_map(|tag| owner.tag(tag, Some(name)))
            .filter(|tag| !tag.text.is_empty())
            .map(|tag| Comment::new(tag.text.clone()))
    }

    pub(crate) fn convert_predicate(
        &mut self,
        context: Context,
        predicate: &TypePredicate,
    ) -> Result<Type> {
        let target_type = match predicate.ty {
            Some(ty) => Some(Box::new(self.convert_type(context, TypeOrNode::Type(ty))?)),
            None => None,
        };
        Ok(Type::Predicate {
            name: predicate.name().to_string(),
            asserts: predicate.asserts(),
            target_type,
        })
    }

    /// The `[key: K]: V` member of a class, interface or type literal.
    pub(crate) fn convert_index_signature(&mut self, context: Context, symbol: Option<SymbolId>) -> Result<()> {
        let source = self.source;
        let Some(index_symbol) = symbol.and_then(|symbol| source.index_symbol(symbol)) else {
            return Ok(());
        };
        let declaration = self.first_declaration(index_symbol, "index signature declaration")?;
        let NodeKind::IndexSignature { parameters, ty } = &source.node(declaration).kind else {
            return Err(ConvertError::UnexpectedNode {
                expected: "index signature",
                found: source.node(declaration).syntax_kind(),
                position: source.position_of(declaration),
            });
        };
        let parameter = parameters
            .first()
            .copied()
            .ok_or_else(|| self.missing_declaration(index_symbol, "index signature parameter"))?;
        let NodeKind::Parameter {
            name,
            ty: parameter_type,
            ..
        } = &source.node(parameter).kind
        else {
            return Err(ConvertError::UnexpectedNode {
                expected: "parameter",
                found: source.node(parameter).syntax_kind(),
                position: source.position_of(parameter),
            });
        };

        let index = self.project.register_reflection(
            Reflection::signature("__index", ReflectionKind::IndexSignature, context.scope),
            Some(index_symbol),
        );
        let comment = self.comment_for_node(declaration);
        if let Some(reflection) = self.project.get_mut(index) {
            reflection.comment = comment;
        }
        let index_context = context.with_scope(index);

        let key = self
            .project
            .register_reflection(Reflection::parameter(name.as_str(), index), None);
        let key_type =
            self.convert_optional_type(index_context.with_scope(key), parameter_type.map(TypeOrNode::Node))?;
        if let Some(data) = self.project.get_mut(key).and_then(Reflection::as_parameter_mut) {
            data.ty = Some(key_type);
        }

        let value_type = self.convert_optional_type(index_context, ty.map(TypeOrNode::Node))?;
        if let Some(data) = self.project.get_mut(index).and_then(Reflection::as_signature_mut) {
            data.parameters = vec![key];
            data.ty = Some(value_type);
        }

        self.declaration_mut(context.scope)?.index_signature = Some(index);
        self.emit(ConverterEvent::CreateSignature, index, Some(declaration));
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/signature_tests.rs"]
mod tests;
