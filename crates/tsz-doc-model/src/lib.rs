//! Documentation Reflection Model
//!
//! The output of a conversion run: a tree of [`Reflection`]s rooted at a
//! [`ProjectReflection`], with [`Type`] values describing declared and
//! inferred types.
//!
//! - **Arena**: reflections live in the project and link to each other by
//!   [`ReflectionId`]
//! - **Registry**: the project maps source symbols to their canonical
//!   reflection, so references can be emitted before their target exists
//! - **Serialization**: every model type implements `serde::Serialize`

pub mod comment;
pub mod flags;
pub mod kind;
pub mod project;
pub mod reflection;
pub mod types;

pub use comment::{Comment, CommentTag};
pub use flags::ReflectionFlags;
pub use kind::ReflectionKind;
pub use project::ProjectReflection;
pub use reflection::{
    ContainerData, DeclarationData, ParameterData, ReferenceData, Reflection, ReflectionData,
    ReflectionId, SignatureData, SourceReference, TypeParameterData,
};
pub use types::{
    LiteralValue, MappedModifier, MappedType, ReferenceTarget, ReferenceType, Type,
    TypeOperatorKind, format_js_number, quote_string,
};

#[cfg(test)]
#[path = "../tests/project_tests.rs"]
mod project_tests;

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod types_tests;
