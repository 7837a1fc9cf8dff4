//! Reflections: the nodes of the documentation model.
//!
//! Every reflection shares the fields in [`Reflection`]; what differs per
//! variant lives in [`ReflectionData`]. Links between reflections are
//! [`ReflectionId`]s into the project arena, never owning pointers. The
//! `parent` edge together with the owning lists (`children`, `signatures`,
//! `parameters`, ...) forms a tree; reference reflections and reference
//! types are the only sideways edges.

use crate::comment::Comment;
use crate::flags::ReflectionFlags;
use crate::kind::ReflectionKind;
use crate::types::{ReferenceTarget, Type};
use serde::Serialize;
use tsz_doc_source::SourcePosition;

/// Id of a reflection, assigned at registration and never reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ReflectionId(pub u32);

impl ReflectionId {
    /// The project root.
    pub const ROOT: Self = Self(0);

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Where a reflection was declared. Lines are one-based.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceReference {
    pub file_name: String,
    pub line: u32,
    pub character: u32,
}

impl From<&SourcePosition> for SourceReference {
    fn from(position: &SourcePosition) -> Self {
        Self {
            file_name: position.file_name.clone(),
            line: position.line + 1,
            character: position.character,
        }
    }
}

// =============================================================================
// Variant data
// =============================================================================

#[derive(Clone, Debug, Default, Serialize)]
pub struct ContainerData {
    pub children: Vec<ReflectionId>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationData {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ReflectionId>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<Type>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub signatures: Vec<ReflectionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_signature: Option<ReflectionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get_signature: Option<ReflectionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_signature: Option<ReflectionId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<ReflectionId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extended_types: Vec<Type>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub implemented_types: Vec<Type>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureData {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ReflectionId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<ReflectionId>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<Type>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterData {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<Type>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct TypeParameterData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint: Option<Type>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Type>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ReferenceData {
    pub target: ReferenceTarget,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "variant", rename_all = "camelCase")]
pub enum ReflectionData {
    Project(ContainerData),
    Declaration(DeclarationData),
    Signature(SignatureData),
    Parameter(ParameterData),
    TypeParameter(TypeParameterData),
    Reference(ReferenceData),
}

// =============================================================================
// Reflection
// =============================================================================

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reflection {
    pub id: ReflectionId,
    pub name: String,
    pub kind: ReflectionKind,
    pub flags: ReflectionFlags,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ReflectionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<Comment>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceReference>,
    #[serde(flatten)]
    pub data: ReflectionData,
}

impl Reflection {
    fn with_data(
        name: impl Into<String>,
        kind: ReflectionKind,
        parent: Option<ReflectionId>,
        data: ReflectionData,
    ) -> Self {
        Self {
            // Placeholder until the project registers the reflection.
            id: ReflectionId(u32::MAX),
            name: name.into(),
            kind,
            flags: ReflectionFlags::empty(),
            parent,
            comment: None,
            sources: Vec::new(),
            data,
        }
    }

    pub fn project(name: impl Into<String>) -> Self {
        Self::with_data(
            name,
            ReflectionKind::Project,
            None,
            ReflectionData::Project(ContainerData::default()),
        )
    }

    pub fn declaration(name: impl Into<String>, kind: ReflectionKind, parent: ReflectionId) -> Self {
        Self::with_data(
            name,
            kind,
            Some(parent),
            ReflectionData::Declaration(DeclarationData::default()),
        )
    }

    pub fn signature(name: impl Into<String>, kind: ReflectionKind, parent: ReflectionId) -> Self {
        Self::with_data(
            name,
            kind,
            Some(parent),
            ReflectionData::Signature(SignatureData::default()),
        )
    }

    pub fn parameter(name: impl Into<String>, parent: ReflectionId) -> Self {
        Self::with_data(
            name,
            ReflectionKind::Parameter,
            Some(parent),
            ReflectionData::Parameter(ParameterData::default()),
        )
    }

    pub fn type_parameter(
        name: impl Into<String>,
        parent: ReflectionId,
        constraint: Option<Type>,
        default: Option<Type>,
    ) -> Self {
        Self::with_data(
            name,
            ReflectionKind::TypeParameter,
            Some(parent),
            ReflectionData::TypeParameter(TypeParameterData {
                constraint,
                default,
            }),
        )
    }

    pub fn reference(name: impl Into<String>, target: ReferenceTarget, parent: ReflectionId) -> Self {
        Self::with_data(
            name,
            ReflectionKind::Reference,
            Some(parent),
            ReflectionData::Reference(ReferenceData { target }),
        )
    }

    // ----- Flags and kind -----

    #[inline]
    pub fn has_flag(&self, flag: ReflectionFlags) -> bool {
        self.flags.contains(flag)
    }

    #[inline]
    pub fn set_flag(&mut self, flag: ReflectionFlags, value: bool) {
        self.flags.set(flag, value);
    }

    #[inline]
    pub fn kind_of(&self, kinds: &[ReflectionKind]) -> bool {
        self.kind.kind_of(kinds)
    }

    // ----- Variant access -----

    pub fn as_declaration(&self) -> Option<&DeclarationData> {
        match &self.data {
            ReflectionData::Declaration(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_declaration_mut(&mut self) -> Option<&mut DeclarationData> {
        match &mut self.data {
            ReflectionData::Declaration(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_signature(&self) -> Option<&SignatureData> {
        match &self.data {
            ReflectionData::Signature(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_signature_mut(&mut self) -> Option<&mut SignatureData> {
        match &mut self.data {
            ReflectionData::Signature(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_parameter(&self) -> Option<&ParameterData> {
        match &self.data {
            ReflectionData::Parameter(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_parameter_mut(&mut self) -> Option<&mut ParameterData> {
        match &mut self.data {
            ReflectionData::Parameter(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_type_parameter(&self) -> Option<&TypeParameterData> {
        match &self.data {
            ReflectionData::TypeParameter(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&ReferenceData> {
        match &self.data {
            ReflectionData::Reference(data) => Some(data),
            _ => None,
        }
    }

    /// Owned child declarations; empty for leaves.
    pub fn children(&self) -> &[ReflectionId] {
        match &self.data {
            ReflectionData::Project(data) => &data.children,
            ReflectionData::Declaration(data) => &data.children,
            _ => &[],
        }
    }

    /// The declared type of a declaration, signature or parameter.
    pub fn ty(&self) -> Option<&Type> {
        match &self.data {
            ReflectionData::Declaration(data) => data.ty.as_ref(),
            ReflectionData::Signature(data) => data.ty.as_ref(),
            ReflectionData::Parameter(data) => data.ty.as_ref(),
            _ => None,
        }
    }

    /// Every reflection this one owns: children, signatures, parameters,
    /// type parameters and anonymous reflections embedded in its types.
    pub fn owned_reflections(&self) -> Vec<ReflectionId> {
        let mut owned = Vec::new();
        match &self.data {
            ReflectionData::Project(data) => owned.extend(&data.children),
            ReflectionData::Declaration(data) => {
                owned.extend(&data.children);
                owned.extend(&data.signatures);
                owned.extend(data.index_signature);
                owned.extend(data.get_signature);
                owned.extend(data.set_signature);
                owned.extend(&data.type_parameters);
                if let Some(ty) = &data.ty {
                    ty.collect_reflections(&mut owned);
                }
                for ty in data.extended_types.iter().chain(&data.implemented_types) {
                    ty.collect_reflections(&mut owned);
                }
            }
            ReflectionData::Signature(data) => {
                owned.extend(&data.parameters);
                owned.extend(&data.type_parameters);
                if let Some(ty) = &data.ty {
                    ty.collect_reflections(&mut owned);
                }
            }
            ReflectionData::Parameter(data) => {
                if let Some(ty) = &data.ty {
                    ty.collect_reflections(&mut owned);
                }
            }
            ReflectionData::TypeParameter(data) => {
                for ty in data.constraint.iter().chain(&data.default) {
                    ty.collect_reflections(&mut owned);
                }
            }
            ReflectionData::Reference(_) => {}
        }
        owned
    }
}
