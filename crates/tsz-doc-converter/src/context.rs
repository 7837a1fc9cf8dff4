//! The per-step conversion context.
//!
//! `Context` is a small `Copy` value passed down the recursion. Deriving a
//! new context never touches the one it came from, so a handler can hand a
//! modified context to a child conversion and keep using its own afterwards.

use tsz_doc_model::ReflectionId;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Context {
    /// The innermost reflection new declarations are added to.
    pub scope: ReflectionId,
    /// Set while converting the members of a written type node. Properties
    /// then take their type from the annotation instead of the checker.
    pub converting_type_node: bool,
    /// New declarations get the `Static` flag.
    pub should_be_static: bool,
}

impl Context {
    pub fn new(scope: ReflectionId) -> Self {
        Self {
            scope,
            converting_type_node: false,
            should_be_static: false,
        }
    }

    /// A context for converting children of `scope`.
    ///
    /// The type-node mode carries over; the static flag does not.
    #[must_use]
    pub fn with_scope(self, scope: ReflectionId) -> Self {
        Self {
            scope,
            converting_type_node: self.converting_type_node,
            should_be_static: false,
        }
    }

    #[must_use]
    pub fn converting_type_node(self) -> Self {
        Self {
            converting_type_node: true,
            ..self
        }
    }

    #[must_use]
    pub fn with_static(self, should_be_static: bool) -> Self {
        Self {
            should_be_static,
            ..self
        }
    }
}
