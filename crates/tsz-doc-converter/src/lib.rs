//! Documentation Converter
//!
//! Walks the exported symbols of a type-checked program, read through
//! [`tsz_doc_source::SemanticSource`], and builds the reflection tree of
//! [`tsz_doc_model`].
//!
//! ```text
//! entry points ─► symbols ─► declaration reflections ─┬─► signatures ─► parameters
//!                                                     └─► types ─► anonymous reflections
//! ```
//!
//! - [`Converter`]: the public entry point; owns options, listeners and the
//!   comment provider
//! - **Symbol handlers** turn each declaration kind of a symbol into
//!   reflections; merged declarations produce one reflection per kind
//! - **Type handlers** convert written type nodes and inferred types alike;
//!   inferred types are expanded at most once per recursion path
//! - **Events** let listeners decorate reflections as they are created;
//!   [`SourcePlugin`] records source positions this way
//!
//! Unsupported shapes never abort a run. They become placeholder types,
//! a `tracing` warning and a [`ConversionDiagnostic`]. Only a source that
//! breaks its own guarantees produces a [`ConvertError`].

pub mod comments;
pub mod context;
pub mod converter;
pub mod cycle;
pub mod diagnostics;
pub mod error;
pub mod events;
pub mod expression;
pub mod options;
mod signature;
pub mod source_plugin;
mod symbols;
pub mod tracing_config;
mod types;

pub use comments::{CommentProvider, DocCommentProvider, parse_comment};
pub use context::Context;
pub use converter::{Conversion, Converter};
pub use cycle::{CycleGuard, CycleResult};
pub use diagnostics::{ConversionDiagnostic, DiagnosticKind};
pub use error::{ConvertError, Result};
pub use events::{ConverterEvent, ConverterListener, EventBus, EventData};
pub use expression::{convert_default_value, convert_expression};
pub use options::ConverterOptions;
pub use source_plugin::SourcePlugin;
pub use tracing_config::{LogFormat, init_tracing};

#[cfg(test)]
#[path = "../tests/test_fixtures.rs"]
pub(crate) mod test_fixtures;
