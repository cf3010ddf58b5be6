//! `/* @tags: a, b, c */` comments, JSDoc-style `/** ... */` included

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TAG_COMMENT: Regex =
        Regex::new(r"(?s)/\*\*?\s*@tags:(.*?)\*/").expect("tag comment pattern is valid");
}

/// Parse the first tag comment in `content`.
///
/// Tags keep their order of appearance; empty items are dropped.
pub fn extract_tags(content: &str) -> Vec<String> {
    let Some(captures) = TAG_COMMENT.captures(content) else {
        return Vec::new();
    };

    captures[1]
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
