//! Converter options.
//!
//! Options are read from JSON with camelCase keys. Boolean switches also
//! accept the strings `"true"`/`"false"` (and `"1"`, `"yes"`, `"on"`, ...),
//! which is what option files generated by shell scripts tend to contain.

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Deserializer};
use std::path::Path;

use crate::diagnostics::{ConversionDiagnostic, DiagnosticKind};

fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(b) => Ok(b),
        BoolOrString::String(s) => {
            let normalized = s.trim().to_lowercase();
            match normalized.as_str() {
                "true" | "1" | "yes" | "on" => Ok(true),
                "false" | "0" | "no" | "off" => Ok(false),
                _ => Err(Error::custom(format!(
                    "invalid boolean value: '{}'. Expected true, false, 'true', or 'false'",
                    s
                ))),
            }
        }
    }
}

fn default_external_pattern() -> Vec<String> {
    vec!["**/node_modules/**".to_string()]
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConverterOptions {
    /// Remove reflections flagged private.
    #[serde(deserialize_with = "deserialize_bool_or_string")]
    pub exclude_private: bool,
    /// Remove reflections flagged protected.
    #[serde(deserialize_with = "deserialize_bool_or_string")]
    pub exclude_protected: bool,
    /// Remove reflections whose comment carries `@internal`.
    #[serde(deserialize_with = "deserialize_bool_or_string")]
    pub exclude_internal: bool,
    /// Skip symbols without a doc comment.
    #[serde(deserialize_with = "deserialize_bool_or_string")]
    pub exclude_not_documented: bool,
    /// Skip symbols declared only in files matching `external_pattern`.
    #[serde(deserialize_with = "deserialize_bool_or_string")]
    pub exclude_externals: bool,
    /// Globs selecting external files.
    pub external_pattern: Vec<String>,
    /// Do not record source positions on reflections.
    #[serde(deserialize_with = "deserialize_bool_or_string")]
    pub disable_sources: bool,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            exclude_private: false,
            exclude_protected: false,
            exclude_internal: false,
            exclude_not_documented: false,
            exclude_externals: false,
            external_pattern: default_external_pattern(),
            disable_sources: false,
        }
    }
}

impl ConverterOptions {
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("failed to parse converter options")
    }

    /// Read options from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read options file {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("invalid options file {}", path.display()))
    }

    /// Compile `external_pattern`, skipping patterns that do not parse.
    pub(crate) fn external_globs(&self) -> (GlobSet, Vec<ConversionDiagnostic>) {
        let mut builder = GlobSetBuilder::new();
        let mut diagnostics = Vec::new();
        for pattern in &self.external_pattern {
            match Glob::new(pattern) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(err) => {
                    tracing::warn!(pattern = %pattern, error = %err, "ignoring invalid external pattern");
                    diagnostics.push(ConversionDiagnostic::new(
                        DiagnosticKind::InvalidPattern,
                        format!("invalid external pattern `{pattern}`: {err}"),
                    ));
                }
            }
        }
        let set = builder.build().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "failed to build external pattern set");
            GlobSet::empty()
        });
        (set, diagnostics)
    }
}

#[cfg(test)]
#[path = "../tests/options_tests.rs"]
mod tests;
