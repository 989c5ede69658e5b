//! Compiles path templates into anchored regular expressions.
//!
//! A template is a literal path in which every `:name` token becomes a named capture
//! matching one or more characters other than `/`. The name must start with an ASCII
//! letter or `_` followed by at least one word character (`[A-Za-z0-9_]`); a shorter
//! token such as `:a` is kept as literal text. Everything else is matched literally.

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid route template {template:?}: {source}")]
    InvalidTemplate {
        template: String,
        #[source]
        source: regex::Error,
    },
}

/// Compiles `template` into a regex anchored at both ends.
pub fn compile_template(template: &str) -> Result<Regex, RouteError> {
    build(template, template_to_pattern(template))
}

/// Compiles the pattern of a static mount: `prefix` followed by `/` and at least one
/// more character.
pub fn compile_prefix(prefix: &str) -> Result<Regex, RouteError> {
    build(prefix, format!("^{}/.+$", regex::escape(prefix)))
}

fn build(template: &str, pattern: String) -> Result<Regex, RouteError> {
    Regex::new(&pattern).map_err(|source| RouteError::InvalidTemplate { template: template.to_string(), source })
}

fn template_to_pattern(template: &str) -> String {
    let mut pattern = String::with_capacity(template.len() + 16);
    pattern.push('^');

    let mut literal_start = 0;
    let mut pos = 0;
    while let Some(offset) = template[pos..].find(':') {
        let colon = pos + offset;
        let name_len = placeholder_len(&template[colon + 1..]);

        if name_len == 0 {
            pos = colon + 1;
            continue;
        }

        let name = &template[colon + 1..colon + 1 + name_len];
        pattern.push_str(&regex::escape(&template[literal_start..colon]));
        pattern.push_str(&format!("(?P<{name}>[^/]+)"));

        pos = colon + 1 + name_len;
        literal_start = pos;
    }

    pattern.push_str(&regex::escape(&template[literal_start..]));
    pattern.push('$');
    pattern
}

/// Length of the placeholder name at the start of `rest`, or 0 if there is none.
fn placeholder_len(rest: &str) -> usize {
    let bytes = rest.as_bytes();
    match bytes.first() {
        Some(first) if first.is_ascii_alphabetic() || *first == b'_' => {}
        _ => return 0,
    }

    let len = 1 + bytes[1..].iter().take_while(|b| b.is_ascii_alphanumeric() || **b == b'_').count();
    if len >= 2 { len } else { 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_become_captures() {
        assert_eq!(template_to_pattern("/hello/:who"), "^/hello/(?P<who>[^/]+)$");
        assert_eq!(template_to_pattern("/a/:first_id/b/:_x2"), "^/a/(?P<first_id>[^/]+)/b/(?P<_x2>[^/]+)$");
        assert_eq!(template_to_pattern("/"), "^/$");
    }

    #[test]
    fn literal_text_is_escaped() {
        assert_eq!(template_to_pattern("/file.txt"), r"^/file\.txt$");
        assert!(!compile_template("/file.txt").unwrap().is_match("/fileatxt"));
    }

    #[test]
    fn short_or_invalid_names_stay_literal() {
        assert_eq!(template_to_pattern("/x/:a"), "^/x/:a$");
        assert_eq!(template_to_pattern("/x/:1abc"), "^/x/:1abc$");
        assert_eq!(template_to_pattern("/x/:"), "^/x/:$");
    }

    #[test]
    fn placeholder_inside_segment() {
        let regex = compile_template("/files/:name.txt").unwrap();
        let captures = regex.captures("/files/report.txt").unwrap();

        assert_eq!(&captures["name"], "report");
    }

    #[test]
    fn duplicate_names_are_rejected() {
        assert!(matches!(compile_template("/:id/:id"), Err(RouteError::InvalidTemplate { .. })));
    }

    #[test]
    fn prefix_needs_a_sub_path() {
        let regex = compile_prefix("/static").unwrap();

        assert!(regex.is_match("/static/app.css"));
        assert!(regex.is_match("/static/css/app.css"));
        assert!(!regex.is_match("/static"));
        assert!(!regex.is_match("/static/"));
        assert!(!regex.is_match("/staticfoo"));
    }
}
