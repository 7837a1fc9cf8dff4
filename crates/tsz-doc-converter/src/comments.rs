//! Doc comment lookup and parsing.
//!
//! A [`CommentProvider`] turns the declaration node behind a reflection into
//! a [`Comment`]. The default [`DocCommentProvider`] reads the raw
//! `/** ... */` text the source attaches to nodes.
//!
//! ## Parsing
//!
//! ```text
//! /**
//!  * Short text, up to the first blank line.
//!  *
//!  * Body text, up to the first block tag.
//!  *
//!  * @param name  description, may continue
//!  *              on following lines
//!  * @returns     what comes back
//!  */
//! ```
//!
//! `@param`, `@typeParam` and `@template` take a parameter name; a leading
//! `{type}` and the `[name=default]` bracket form are stripped from it.
//! `@return`/`@returns` populate [`Comment::returns`] instead of a tag.

use tsz_doc_model::{Comment, CommentTag};
use tsz_doc_source::{NodeId, SemanticSource, SyntaxKind};

pub trait CommentProvider {
    /// The comment documenting `node`, if it has one.
    fn comment_for_node(&self, source: &dyn SemanticSource, node: NodeId) -> Option<Comment>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DocCommentProvider;

impl CommentProvider for DocCommentProvider {
    fn comment_for_node(&self, source: &dyn SemanticSource, node: NodeId) -> Option<Comment> {
        let data = source.node(node);
        let raw = match &data.doc_comment {
            Some(raw) => raw,
            // `/** doc */ export const x = 1;` documents the statement, not the declarator.
            None if data.syntax_kind() == SyntaxKind::VariableDeclaration => {
                let list = data.parent?;
                source.node(list).doc_comment.as_ref()?
            }
            None => return None,
        };
        let comment = parse_comment(raw);
        (!comment.is_empty()).then_some(comment)
    }
}

fn takes_param_name(tag_name: &str) -> bool {
    matches!(tag_name, "param" | "typeparam" | "template")
}

/// Strip the comment delimiters and the leading `*` of each line.
fn comment_lines(raw: &str) -> Vec<&str> {
    let trimmed = raw.trim();
    let body = trimmed.strip_prefix("/**").unwrap_or(trimmed);
    let body = body.strip_suffix("*/").unwrap_or(body);
    body.lines()
        .map(|line| {
            let line = line.trim_start();
            let line = line.strip_prefix('*').unwrap_or(line);
            line.strip_prefix(' ').unwrap_or(line).trim_end()
        })
        .collect()
}

fn split_param_name(rest: &str) -> (Option<String>, String) {
    let mut rest = rest.trim_start();
    if rest.starts_with('{') {
        if let Some(end) = rest.find('}') {
            rest = rest[end + 1..].trim_start();
        }
    }
    let (word, text) = match rest.find(char::is_whitespace) {
        Some(index) => (&rest[..index], rest[index..].trim_start()),
        None => (rest, ""),
    };
    if word.is_empty() {
        return (None, text.to_string());
    }
    let name = word
        .trim_start_matches('[')
        .split('=')
        .next()
        .unwrap_or_default()
        .trim_end_matches(']');
    let text = text.strip_prefix("- ").unwrap_or(text);
    (Some(name.to_string()), text.to_string())
}

fn push_line(target: &mut String, line: &str) {
    if !target.is_empty() {
        target.push('\n');
    }
    target.push_str(line);
}

/// Parse the raw text of a `/** ... */` comment.
pub fn parse_comment(raw: &str) -> Comment {
    let mut comment = Comment::default();
    let mut paragraphs: Vec<String> = vec![String::new()];
    let mut current_tag: Option<CommentTag> = None;
    let mut in_returns = false;

    let finish_tag = |comment: &mut Comment, tag: Option<CommentTag>| {
        if let Some(mut tag) = tag {
            tag.text = tag.text.trim().to_string();
            comment.tags.push(tag);
        }
    };

    for line in comment_lines(raw) {
        if let Some(tag_line) = line.strip_prefix('@') {
            finish_tag(&mut comment, current_tag.take());
            in_returns = false;
            let (name, rest) = match tag_line.find(char::is_whitespace) {
                Some(index) => (&tag_line[..index], tag_line[index..].trim_start()),
                None => (tag_line, ""),
            };
            let tag_name = name.to_lowercase();
            if tag_name == "returns" || tag_name == "return" {
                in_returns = true;
                comment.returns = Some(rest.to_string());
            } else if takes_param_name(&tag_name) {
                let (param_name, text) = split_param_name(rest);
                current_tag = Some(CommentTag {
                    tag_name,
                    param_name,
                    text,
                });
            } else {
                current_tag = Some(CommentTag {
                    tag_name,
                    param_name: None,
                    text: rest.to_string(),
                });
            }
            continue;
        }

        if let Some(tag) = current_tag.as_mut() {
            push_line(&mut tag.text, line.trim());
        } else if in_returns {
            if let Some(returns) = comment.returns.as_mut() {
                push_line(returns, line.trim());
            }
        } else if line.is_empty() {
            if paragraphs.last().is_some_and(|p| !p.is_empty()) {
                paragraphs.push(String::new());
            }
        } else if let Some(paragraph) = paragraphs.last_mut() {
            push_line(paragraph, line);
        }
    }
    finish_tag(&mut comment, current_tag.take());

    if let Some(returns) = comment.returns.as_mut() {
        *returns = returns.trim().to_string();
    }
    let mut paragraphs = paragraphs.into_iter().filter(|p| !p.is_empty());
    comment.short_text = paragraphs.next().unwrap_or_default();
    comment.text = paragraphs.collect::<Vec<_>>().join("\n\n");
    comment
}

#[cfg(test)]
#[path = "../tests/comments_tests.rs"]
mod tests;
