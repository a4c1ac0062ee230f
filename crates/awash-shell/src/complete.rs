//! Default tab completion over the binding table.
//!
//! Completes the trailing word of the line: bare prefixes against the
//! sorted binding names, `head.partial` forms against the members of the
//! resolved head value. Candidates for dotted forms are emitted as full
//! dotted strings so the front end can replace the whole word.

use std::sync::PoisonError;

use crate::bindings::Bindings;
use crate::error::ShellResult;
use crate::session::{Completions, SharedBindings};
use crate::value::Value;

/// Complete `line` (text up to the cursor) against the binding table.
pub fn complete(line: &str, context: &SharedBindings) -> ShellResult<Completions> {
    let word = trailing_word(line);
    let bindings = context.read().unwrap_or_else(PoisonError::into_inner);

    let candidates = match word.rsplit_once('.') {
        None => bindings
            .names()
            .into_iter()
            .filter(|name| name.starts_with(word))
            .collect(),
        Some((head, partial)) => match resolve_path(head, &bindings) {
            Some(value) => value
                .members()
                .into_iter()
                .filter(|member| member.starts_with(partial))
                .map(|member| format!("{head}.{member}"))
                .collect(),
            None => Vec::new(),
        },
    };

    Ok(Completions {
        candidates,
        matched: word.to_string(),
    })
}

/// The completion target: the trailing run of identifier and dot characters.
fn trailing_word(line: &str) -> &str {
    let boundary = line
        .char_indices()
        .rev()
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '.'))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    &line[boundary..]
}

/// Resolve a dotted head (`cfg` or `cfg.nested`) to its value.
fn resolve_path(head: &str, bindings: &Bindings) -> Option<Value> {
    let mut parts = head.split('.');
    let mut value = bindings.get(parts.next()?)?.clone();
    for part in parts {
        value = value.member(part)?;
    }
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, RwLock};

    fn ctx() -> SharedBindings {
        let mut bindings = Bindings::new();
        bindings.set("alpha", Value::Int(1));
        bindings.set("album", Value::Int(2));
        bindings.set("cfg", Value::Json(json!({"port": 8080, "host": "x"})));
        Arc::new(RwLock::new(bindings))
    }

    #[test]
    fn bare_prefix_matches_binding_names() {
        let out = complete("print al", &ctx()).unwrap();
        assert_eq!(out.candidates, vec!["album", "alpha"]);
        assert_eq!(out.matched, "al");
    }

    #[test]
    fn empty_word_lists_everything() {
        let out = complete("", &ctx()).unwrap();
        assert_eq!(out.candidates, vec!["album", "alpha", "cfg"]);
        assert_eq!(out.matched, "");
    }

    #[test]
    fn dotted_completion_offers_members_as_full_paths() {
        let out = complete("cfg.", &ctx()).unwrap();
        assert!(out.candidates.contains(&"cfg.port".to_string()));
        assert!(out.candidates.contains(&"cfg.host".to_string()));
        assert!(out.candidates.contains(&"cfg.type".to_string()));
        assert_eq!(out.matched, "cfg.");
    }

    #[test]
    fn dotted_completion_filters_by_partial() {
        let out = complete("cfg.p", &ctx()).unwrap();
        assert_eq!(out.candidates, vec!["cfg.port"]);
    }

    #[test]
    fn unresolvable_head_offers_nothing() {
        let out = complete("nope.", &ctx()).unwrap();
        assert!(out.candidates.is_empty());
        assert_eq!(out.matched, "nope.");
    }
}
