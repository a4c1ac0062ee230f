//! awash-core: decorates a shell session with await-aware evaluation,
//! curated tab completion, and promise-style prompting.
//!
//! The decoration replaces the session's evaluate and completion hooks
//! with wrappers of identical shape:
//!
//! - evaluated input that yields a still-settling result is resolved
//!   before anything is displayed, with line input gated for the wait
//!   (opt-in per line when an await marker is configured);
//! - completion candidates are narrowed to the bindings exposed at
//!   decoration time, and dotted paths ending in members every value
//!   answers anyway are dropped;
//! - [`Ask::q`] asks a question and resolves with the eventual answer;
//! - evaluated input may return [`VOID`] to display nothing at all.

pub mod config;
pub mod prompt;
pub mod resolve;

mod filter;
mod intercept;

use std::collections::BTreeSet;
use std::sync::Arc;

use awash_shell::{Bindings, Session, SessionOptions, Value};

pub use config::{AwaitPolicy, CompletionPolicy, DecorateOptions};
pub use prompt::Ask;
pub use resolve::resolve;

/// The silent result: evaluated input returning exactly this value is
/// displayed as if it produced nothing at all.
pub const VOID: Value = Value::Void;

/// Start a session, expose `exposed` in its context, and decorate it with
/// the default options.
pub fn start(options: SessionOptions, exposed: Bindings) -> Arc<Session> {
    start_with(options, exposed, DecorateOptions::default())
}

/// Start a session, expose `exposed` in its context, and decorate it.
pub fn start_with(
    options: SessionOptions,
    exposed: Bindings,
    decoration: DecorateOptions,
) -> Arc<Session> {
    let session = Session::start(options);
    decorate(&session, exposed, decoration);
    session
}

/// Decorate an already-running session.
///
/// Captures two immutable name snapshots (the ambient names already in
/// the context, and the names of `exposed`), then injects `exposed` into
/// the context and wraps the completion and evaluate hooks. The snapshots
/// never change afterward, even if the context does.
pub fn decorate(session: &Arc<Session>, exposed: Bindings, options: DecorateOptions) {
    let ambient: BTreeSet<String> = session
        .with_context(|bindings| bindings.names())
        .into_iter()
        .collect();
    let exposed_names: BTreeSet<String> = exposed.names().into_iter().collect();

    session.with_context_mut(|bindings| {
        for (name, value) in exposed {
            bindings.set(name, value);
        }
    });

    filter::install(session, exposed_names, ambient, options.completion_policy);
    intercept::install(session, options.await_policy);
}
