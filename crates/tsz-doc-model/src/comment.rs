//! Parsed documentation comments.

use serde::Serialize;

/// A block tag such as `@param name description` or `@deprecated`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentTag {
    /// Tag name without the leading `@`, lower-cased.
    pub tag_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param_name: Option<String>,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// First paragraph.
    pub short_text: String,
    /// Remaining paragraphs before the first block tag.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returns: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<CommentTag>,
}

impl Comment {
    pub fn new(short_text: impl Into<String>) -> Self {
        Self {
            short_text: short_text.into(),
            ..Self::default()
        }
    }

    pub fn has_tag(&self, tag_name: &str) -> bool {
        self.tags.iter().any(|tag| tag.tag_name == tag_name)
    }

    pub fn tag(&self, tag_name: &str, param_name: Option<&str>) -> Option<&CommentTag> {
        self.tags.iter().find(|tag| {
            tag.tag_name == tag_name
                && (param_name.is_none() || tag.param_name.as_deref() == param_name)
        })
    }

    pub fn remove_tags(&mut self, tag_name: &str) {
        self.tags.retain(|tag| tag.tag_name != tag_name);
    }

    pub fn is_empty(&self) -> bool {
        self.short_text.is_empty()
            && self.text.is_empty()
            && self.returns.is_none()
            && self.tags.is_empty()
    }
}
