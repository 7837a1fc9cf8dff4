//! Tracing configuration for debugging conversions.
//!
//! Supports three output formats controlled by `TSZ_DOC_LOG_FORMAT`:
//!
//! - `text` (default): standard `tracing-subscriber` flat output
//! - `tree`: hierarchical indented output via `tracing-tree`, one level per
//!   symbol, signature or type being converted
//! - `json`: one JSON object per span/event
//!
//! ## Quick start
//!
//! ```bash
//! # Which symbols were converted, nested under their entry point
//! TSZ_DOC_LOG=debug TSZ_DOC_LOG_FORMAT=tree cargo test -p tsz-doc-converter
//!
//! # Every event fired, as JSON
//! TSZ_DOC_LOG=tsz_doc_converter=trace TSZ_DOC_LOG_FORMAT=json my-doc-tool
//! ```
//!
//! The subscriber is only initialised when `TSZ_DOC_LOG` (or `RUST_LOG`) is
//! set. Embedding applications that install their own subscriber can skip
//! this module entirely; the converter only emits `tracing` events.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Standard flat text lines (default).
    Text,
    /// Hierarchical indented tree via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    /// Read from the `TSZ_DOC_LOG_FORMAT` environment variable.
    fn from_env() -> Self {
        Self::parse(&std::env::var("TSZ_DOC_LOG_FORMAT").unwrap_or_default())
    }
}

/// Build an `EnvFilter` from `TSZ_DOC_LOG`, falling back to `RUST_LOG`.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("TSZ_DOC_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Initialise the global tracing subscriber.
///
/// Returns `true` when a subscriber was installed. Nothing happens when
/// neither variable is set, or when a global subscriber already exists, so
/// it is safe to call from every test.
///
/// All output goes to stderr.
pub fn init_tracing() -> bool {
    let has_doc_log = std::env::var("TSZ_DOC_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_doc_log && !has_rust_log {
        return false;
    }

    let filter = build_filter();
    match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_span_retrace(true)
                .with_targets(true);

            Registry::default()
                .with(filter)
                .with(tree_layer)
                .try_init()
                .is_ok()
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);

            Registry::default()
                .with(filter)
                .with(json_layer)
                .try_init()
                .is_ok()
        }
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok(),
    }
}
