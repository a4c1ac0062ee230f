//! rustyline integration: bridges the session's completion hook into the
//! line editor.

use std::borrow::Cow;
use std::sync::Arc;

use rustyline::completion::{Candidate, Completer};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper, Result};

use awash_shell::Session;

/// Completion candidate surfaced to rustyline.
#[derive(Debug)]
pub struct CompletionCandidate {
    display: String,
    replacement: String,
}

impl Candidate for CompletionCandidate {
    fn display(&self) -> &str {
        &self.display
    }

    fn replacement(&self) -> &str {
        &self.replacement
    }
}

/// rustyline helper backed by the session's (decorated) completion hook.
pub struct ShellHelper {
    session: Arc<Session>,
}

impl ShellHelper {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }
}

impl Completer for ShellHelper {
    type Candidate = CompletionCandidate;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> Result<(usize, Vec<Self::Candidate>)> {
        match self.session.complete(&line[..pos]) {
            Ok(out) => {
                // The matched prefix tells us how far back the replacement
                // reaches.
                let start = pos.saturating_sub(out.matched.len());
                let candidates = out
                    .candidates
                    .into_iter()
                    .map(|candidate| CompletionCandidate {
                        display: candidate.clone(),
                        replacement: candidate,
                    })
                    .collect();
                Ok((start, candidates))
            }
            Err(err) => {
                tracing::debug!("completion failed: {err}");
                Ok((pos, Vec::new()))
            }
        }
    }
}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<Self::Hint> {
        None
    }
}

impl Highlighter for ShellHelper {
    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        _default: bool,
    ) -> Cow<'b, str> {
        Cow::Borrowed(prompt)
    }
}

impl Validator for ShellHelper {}

impl Helper for ShellHelper {}
