//! Completion narrowing for decorated sessions.
//!
//! Interactive completion over a curated binding set should surface
//! neither incidental ambient names nor the members every value answers
//! anyway. The filter wraps the session's completion hook with one of
//! identical shape that drops such candidates; the matched prefix is
//! forwarded untouched.

use std::collections::BTreeSet;
use std::sync::Arc;

use awash_shell::{CompleteHook, Completions, Session, UNIVERSAL_MEMBERS};

use crate::config::CompletionPolicy;

/// Capture the session's completion hook and replace it with the
/// filtering wrapper. `exposed` and `ambient` are the immutable name
/// snapshots taken at decoration time.
pub(crate) fn install(
    session: &Arc<Session>,
    exposed: BTreeSet<String>,
    ambient: BTreeSet<String>,
    policy: CompletionPolicy,
) {
    let skip_suffixes: Vec<String> = UNIVERSAL_MEMBERS
        .iter()
        .map(|member| format!(".{member}"))
        .collect();
    let inner = session.completer_hook();

    let wrapper: CompleteHook = Arc::new(move |line| {
        // An underlying failure is forwarded untouched; no filtering.
        let out = inner(line)?;
        let candidates = out
            .candidates
            .into_iter()
            .filter(|candidate| {
                !should_skip(candidate, &exposed, &ambient, policy, &skip_suffixes)
            })
            .collect();
        Ok(Completions {
            candidates,
            matched: out.matched,
        })
    });

    session.replace_completer(wrapper);
}

/// Whether a candidate is dropped from the completion list.
///
/// Bare names follow the configured policy. Dotted paths are dropped when
/// they end in a universal member suffix: they merely reach a member
/// every value answers, whatever precedes the final dot.
fn should_skip(
    candidate: &str,
    exposed: &BTreeSet<String>,
    ambient: &BTreeSet<String>,
    policy: CompletionPolicy,
    skip_suffixes: &[String],
) -> bool {
    if !candidate.contains('.') {
        return match policy {
            CompletionPolicy::ExposedOnly => !exposed.contains(candidate),
            CompletionPolicy::RejectAmbient => ambient.contains(candidate),
        };
    }
    skip_suffixes
        .iter()
        .any(|suffix| candidate.ends_with(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sets() -> (BTreeSet<String>, BTreeSet<String>, Vec<String>) {
        let exposed = ["alpha", "helper"]
            .into_iter()
            .map(String::from)
            .collect();
        let ambient = ["version", "shell"].into_iter().map(String::from).collect();
        let skip = UNIVERSAL_MEMBERS
            .iter()
            .map(|m| format!(".{m}"))
            .collect();
        (exposed, ambient, skip)
    }

    #[test]
    fn exposed_only_allow_lists_bare_names() {
        let (exposed, ambient, skip) = sets();
        let policy = CompletionPolicy::ExposedOnly;
        assert!(!should_skip("alpha", &exposed, &ambient, policy, &skip));
        assert!(should_skip("beta", &exposed, &ambient, policy, &skip));
        assert!(should_skip("version", &exposed, &ambient, policy, &skip));
    }

    #[test]
    fn reject_ambient_keeps_unknown_bare_names() {
        let (exposed, ambient, skip) = sets();
        let policy = CompletionPolicy::RejectAmbient;
        assert!(!should_skip("beta", &exposed, &ambient, policy, &skip));
        assert!(should_skip("version", &exposed, &ambient, policy, &skip));
    }

    #[test]
    fn dotted_paths_follow_the_suffix_rule_regardless_of_policy() {
        let (exposed, ambient, skip) = sets();
        for policy in [CompletionPolicy::ExposedOnly, CompletionPolicy::RejectAmbient] {
            assert!(should_skip("obj.type", &exposed, &ambient, policy, &skip));
            assert!(should_skip("deep.path.len", &exposed, &ambient, policy, &skip));
            assert!(!should_skip("obj.custom", &exposed, &ambient, policy, &skip));
        }
    }
}
