//! Non-fatal conversion diagnostics.
//!
//! Every unsupported shape is logged through `tracing` and also recorded here
//! so that callers can inspect what was replaced by a placeholder without
//! installing a subscriber.

use serde::Serialize;
use std::fmt;
use tsz_doc_source::SourcePosition;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticKind {
    /// A type or type node with no converter; replaced by an unknown type.
    UnsupportedType,
    /// A symbol flag with no handler; the flag was skipped.
    MissingHandler,
    /// An entry point without a module symbol; the entry point was skipped.
    MissingModule,
    /// An alias whose target could not be resolved; the alias was skipped.
    UnresolvedAlias,
    /// An external pattern that failed to compile; the pattern was ignored.
    InvalidPattern,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionDiagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<SourcePosition>,
}

impl ConversionDiagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            position: None,
        }
    }

    pub fn at(mut self, position: Option<SourcePosition>) -> Self {
        self.position = position;
        self
    }
}

impl fmt::Display for ConversionDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(position) = &self.position {
            write!(f, "\n\t{position}")?;
        }
        Ok(())
    }
}
