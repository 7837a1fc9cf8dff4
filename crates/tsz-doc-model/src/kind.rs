//! Reflection kinds.
//!
//! Numeric values match the documentation model's kind numbering so
//! serialized output stays compatible with existing renderers.

use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[repr(u32)]
pub enum ReflectionKind {
    Project = 0,
    Module = 1,
    Namespace = 2,
    Enum = 4,
    EnumMember = 16,
    Variable = 32,
    Function = 64,
    Class = 128,
    Interface = 256,
    Constructor = 512,
    Property = 1024,
    Method = 2048,
    CallSignature = 4096,
    IndexSignature = 8192,
    ConstructorSignature = 16384,
    Parameter = 32768,
    TypeLiteral = 65536,
    TypeParameter = 131072,
    Accessor = 262144,
    GetSignature = 524288,
    SetSignature = 1048576,
    ObjectLiteral = 2097152,
    TypeAlias = 4194304,
    Event = 8388608,
    Reference = 16777216,
}

impl ReflectionKind {
    pub const CLASS_OR_INTERFACE: &'static [ReflectionKind] =
        &[ReflectionKind::Class, ReflectionKind::Interface];

    pub const VARIABLE_OR_PROPERTY: &'static [ReflectionKind] =
        &[ReflectionKind::Variable, ReflectionKind::Property];

    pub const SOME_MODULE: &'static [ReflectionKind] =
        &[ReflectionKind::Module, ReflectionKind::Namespace];

    pub const SIGNATURE: &'static [ReflectionKind] = &[
        ReflectionKind::CallSignature,
        ReflectionKind::IndexSignature,
        ReflectionKind::ConstructorSignature,
        ReflectionKind::GetSignature,
        ReflectionKind::SetSignature,
    ];

    #[inline]
    pub const fn value(self) -> u32 {
        self as u32
    }

    #[inline]
    pub fn kind_of(self, kinds: &[ReflectionKind]) -> bool {
        kinds.contains(&self)
    }

    /// Human readable name, e.g. `"Type alias"`.
    pub const fn display_name(self) -> &'static str {
        match self {
            ReflectionKind::Project => "Project",
            ReflectionKind::Module => "Module",
            ReflectionKind::Namespace => "Namespace",
            ReflectionKind::Enum => "Enumeration",
            ReflectionKind::EnumMember => "Enumeration member",
            ReflectionKind::Variable => "Variable",
            ReflectionKind::Function => "Function",
            ReflectionKind::Class => "Class",
            ReflectionKind::Interface => "Interface",
            ReflectionKind::Constructor => "Constructor",
            ReflectionKind::Property => "Property",
            ReflectionKind::Method => "Method",
            ReflectionKind::CallSignature => "Call signature",
            ReflectionKind::IndexSignature => "Index signature",
            ReflectionKind::ConstructorSignature => "Constructor signature",
            ReflectionKind::Parameter => "Parameter",
            ReflectionKind::TypeLiteral => "Type literal",
            ReflectionKind::TypeParameter => "Type parameter",
            ReflectionKind::Accessor => "Accessor",
            ReflectionKind::GetSignature => "Get signature",
            ReflectionKind::SetSignature => "Set signature",
            ReflectionKind::ObjectLiteral => "Object literal",
            ReflectionKind::TypeAlias => "Type alias",
            ReflectionKind::Event => "Event",
            ReflectionKind::Reference => "Reference",
        }
    }
}
