//! The evaluation interceptor.
//!
//! Replaces a session's evaluate hook with a wrapper of identical shape
//! that trims input, honors the opt-in await marker, gates line input for
//! the duration of the evaluation, drives pending results to settlement,
//! and suppresses the silent marker value.

use std::sync::{Arc, Weak};

use awash_shell::{
    EvalHook, LineListener, Outcome, Session, SharedBindings, ShellResult,
};

use crate::config::AwaitPolicy;
use crate::resolve::resolve;

/// Capture the session's evaluate hook and replace it with the
/// intercepting wrapper.
pub(crate) fn install(session: &Arc<Session>, policy: AwaitPolicy) {
    let inner = session.eval_hook();
    let weak = Arc::downgrade(session);

    let wrapper: EvalHook = Arc::new(move |source, ctx, label| {
        let inner = inner.clone();
        let weak = weak.clone();
        Box::pin(async move { intercept(&inner, &weak, policy, source, ctx, label).await })
    });

    session.replace_eval(wrapper);
}

async fn intercept(
    inner: &EvalHook,
    session: &Weak<Session>,
    policy: AwaitPolicy,
    source: String,
    ctx: SharedBindings,
    label: String,
) -> ShellResult<Outcome> {
    let (must_await, body) = strip_marker(&source, policy);
    let body = body.trim();
    if body.is_empty() {
        // Blank input (or a bare marker) evaluates to nothing; the inner
        // hook is never consulted.
        return Ok(Outcome::Empty);
    }

    // Gate line input for the whole evaluation. The guard reattaches the
    // listeners when it drops, on every exit path.
    let _gate = session.upgrade().map(LineGate::hold);

    let outcome = inner(body.to_string(), ctx, label).await?;
    let outcome = if must_await {
        resolve(outcome).await?
    } else {
        outcome
    };

    match outcome {
        Outcome::Value(value) if value.is_void() => Ok(Outcome::Empty),
        other => Ok(other),
    }
}

/// Split the optional leading await marker off `line`.
///
/// The marker grammar: the marker character as the first non-whitespace
/// character, optionally followed by whitespace, then the body. A marker
/// anywhere else is ordinary text. Under [`AwaitPolicy::Always`] every
/// line must await and nothing is stripped.
fn strip_marker(line: &str, policy: AwaitPolicy) -> (bool, &str) {
    match policy {
        AwaitPolicy::Always => (true, line),
        AwaitPolicy::Marker(marker) => match line.trim_start().strip_prefix(marker) {
            Some(body) => (true, body),
            None => (false, line),
        },
    }
}

/// Detaches the session's line listeners for the lifetime of one
/// evaluation; dropping the gate reattaches them in their original order.
/// Reattachment is therefore unconditional across success, failure, and
/// early returns.
struct LineGate {
    session: Arc<Session>,
    saved: Vec<LineListener>,
}

impl LineGate {
    fn hold(session: Arc<Session>) -> Self {
        let saved = session.take_line_listeners();
        Self { session, saved }
    }
}

impl Drop for LineGate {
    fn drop(&mut self) {
        self.session
            .restore_line_listeners(std::mem::take(&mut self.saved));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_policy_never_strips() {
        assert_eq!(strip_marker("&x", AwaitPolicy::Always), (true, "&x"));
    }

    #[test]
    fn leading_marker_is_stripped_and_opts_in() {
        let policy = AwaitPolicy::Marker('&');
        assert_eq!(strip_marker("&x", policy), (true, "x"));
        assert_eq!(strip_marker("  & x", policy), (true, " x"));
        assert_eq!(strip_marker("&", policy), (true, ""));
    }

    #[test]
    fn interior_markers_are_ordinary_text() {
        let policy = AwaitPolicy::Marker('&');
        assert_eq!(strip_marker("x & y", policy), (false, "x & y"));
        assert_eq!(strip_marker("xy&", policy), (false, "xy&"));
    }
}
