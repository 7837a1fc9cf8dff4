//! Fatal conversion errors.
//!
//! Only violations of the source's own guarantees end up here: a declaration
//! or symbol that must exist is missing, or a node has a kind the caller
//! already checked for. Unsupported shapes are not errors; they become
//! [`ConversionDiagnostic`](crate::diagnostics::ConversionDiagnostic)s and
//! placeholder values.

use thiserror::Error;
use tsz_doc_source::{SourcePosition, SyntaxKind};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    /// A node that must resolve to a symbol did not.
    #[error("missing symbol for {kind:?} node{}", at(.position))]
    MissingSymbol {
        kind: SyntaxKind,
        position: Option<SourcePosition>,
    },

    /// A symbol lacks the declaration the handler requires.
    #[error("symbol `{symbol}` has no {expected}")]
    MissingDeclaration { symbol: String, expected: String },

    /// A node was not of the kind the caller established.
    #[error("expected {expected} but found {found:?}{}", at(.position))]
    UnexpectedNode {
        expected: &'static str,
        found: SyntaxKind,
        position: Option<SourcePosition>,
    },

    #[error("conversion invariant violated: {0}")]
    Invariant(String),
}

fn at(position: &Option<SourcePosition>) -> String {
    position
        .as_ref()
        .map(|position| format!(" at {position}"))
        .unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, ConvertError>;
