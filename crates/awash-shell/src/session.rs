//! The interactive session: binding table, replaceable hooks, line routing.
//!
//! A [`Session`] is the single running shell instance. It owns:
//!
//! - the shared binding table (the evaluation context),
//! - the replaceable evaluate, completion, and question hooks,
//! - the registered "line" listeners,
//! - the pending-answer queue used by the default question routing.
//!
//! Front ends feed input through [`Session::feed_line`]; embedders swap
//! hooks with [`Session::replace_eval`] and friends to layer behavior on
//! top of the defaults.

use std::collections::VecDeque;
use std::future::Future;
use std::io::Write;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

use crate::bindings::Bindings;
use crate::complete;
use crate::error::ShellResult;
use crate::eval;
use crate::events::{LineListener, LineListeners};
use crate::outcome::Outcome;
use crate::value::Value;

/// Shared handle to the session's binding table.
pub type SharedBindings = Arc<RwLock<Bindings>>;

/// Future returned by an evaluate hook.
pub type EvalFuture = Pin<Box<dyn Future<Output = ShellResult<Outcome>> + Send>>;

/// The replaceable evaluate extension point: `(source, context, label)`.
pub type EvalHook = Arc<dyn Fn(String, SharedBindings, String) -> EvalFuture + Send + Sync>;

/// Candidate completions plus the matched prefix they would replace.
#[derive(Debug, Clone, PartialEq)]
pub struct Completions {
    pub candidates: Vec<String>,
    pub matched: String,
}

/// The replaceable completion extension point, fed the line text up to the
/// cursor.
pub type CompleteHook = Arc<dyn Fn(&str) -> ShellResult<Completions> + Send + Sync>;

/// Answer callback for the question facility. Fired at most once.
pub type AnswerFn = Box<dyn FnOnce(String) + Send>;

/// The replaceable prompt-and-read extension point.
pub type QuestionHook = Arc<dyn Fn(&str, AnswerFn) + Send + Sync>;

/// Session construction options.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Prompt shown by interactive front ends.
    pub prompt: String,
    /// Source label passed to the evaluate hook.
    pub label: String,
    /// Seed the context with the ambient globals (`version`, `shell`).
    pub seed_globals: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            prompt: "awash> ".to_string(),
            label: "repl".to_string(),
            seed_globals: true,
        }
    }
}

impl SessionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// A bare session: nothing seeded into the context.
    pub fn bare() -> Self {
        Self {
            seed_globals: false,
            ..Self::default()
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// The running interactive session.
pub struct Session {
    options: SessionOptions,
    context: SharedBindings,
    eval: RwLock<EvalHook>,
    completer: RwLock<CompleteHook>,
    question: RwLock<QuestionHook>,
    line_listeners: Mutex<LineListeners>,
    pending_answers: Mutex<VecDeque<AnswerFn>>,
}

impl Session {
    /// Start a session with the default evaluator, completer, and question
    /// routing.
    pub fn start(options: SessionOptions) -> Arc<Self> {
        let mut bindings = Bindings::new();
        if options.seed_globals {
            bindings.set("version", Value::Str(env!("CARGO_PKG_VERSION").to_string()));
            bindings.set("shell", Value::Str("awash".to_string()));
        }
        let context: SharedBindings = Arc::new(RwLock::new(bindings));

        Arc::new_cyclic(|weak: &Weak<Session>| {
            let eval: EvalHook = Arc::new(|source, ctx, _label| {
                Box::pin(async move { eval::evaluate(&source, &ctx) })
            });

            let complete_ctx = context.clone();
            let completer: CompleteHook =
                Arc::new(move |line| complete::complete(line, &complete_ctx));

            // Default question routing: print the query, then hand the next
            // fed line to the answer callback.
            let question_weak = weak.clone();
            let question: QuestionHook = Arc::new(move |query, answer| {
                if let Some(session) = question_weak.upgrade() {
                    session.enqueue_question(query, answer);
                }
            });

            Session {
                options,
                context,
                eval: RwLock::new(eval),
                completer: RwLock::new(completer),
                question: RwLock::new(question),
                line_listeners: Mutex::new(LineListeners::new()),
                pending_answers: Mutex::new(VecDeque::new()),
            }
        })
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Shared handle to the binding table.
    pub fn context(&self) -> SharedBindings {
        self.context.clone()
    }

    /// Run `f` with read access to the binding table.
    pub fn with_context<R>(&self, f: impl FnOnce(&Bindings) -> R) -> R {
        f(&self.context.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Run `f` with write access to the binding table.
    pub fn with_context_mut<R>(&self, f: impl FnOnce(&mut Bindings) -> R) -> R {
        f(&mut self.context.write().unwrap_or_else(PoisonError::into_inner))
    }

    // ══════════════════════════════════════════════════════════════════
    // Hooks
    // ══════════════════════════════════════════════════════════════════

    /// The current evaluate hook.
    pub fn eval_hook(&self) -> EvalHook {
        self.eval
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the evaluate hook, returning the previous one.
    pub fn replace_eval(&self, hook: EvalHook) -> EvalHook {
        tracing::debug!("evaluate hook replaced");
        std::mem::replace(
            &mut *self.eval.write().unwrap_or_else(PoisonError::into_inner),
            hook,
        )
    }

    /// The current completion hook.
    pub fn completer_hook(&self) -> CompleteHook {
        self.completer
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the completion hook, returning the previous one.
    pub fn replace_completer(&self, hook: CompleteHook) -> CompleteHook {
        tracing::debug!("completion hook replaced");
        std::mem::replace(
            &mut *self
                .completer
                .write()
                .unwrap_or_else(PoisonError::into_inner),
            hook,
        )
    }

    /// Replace the question hook, returning the previous one.
    pub fn replace_question(&self, hook: QuestionHook) -> QuestionHook {
        std::mem::replace(
            &mut *self
                .question
                .write()
                .unwrap_or_else(PoisonError::into_inner),
            hook,
        )
    }

    /// Evaluate one line through the current evaluate hook.
    pub async fn eval(&self, source: &str) -> ShellResult<Outcome> {
        let hook = self.eval_hook();
        hook(
            source.to_string(),
            self.context.clone(),
            self.options.label.clone(),
        )
        .await
    }

    /// Complete `line` (text up to the cursor) through the current hook.
    pub fn complete(&self, line: &str) -> ShellResult<Completions> {
        let hook = self.completer_hook();
        hook(line)
    }

    /// Ask a question; `answer` fires once with the reply text.
    pub fn question(&self, query: &str, answer: AnswerFn) {
        let hook = self
            .question
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        hook(query, answer)
    }

    // ══════════════════════════════════════════════════════════════════
    // Line listeners
    // ══════════════════════════════════════════════════════════════════

    /// Register a "line" listener. The returned handle identifies it for
    /// later removal.
    pub fn on_line(&self, listener: impl Fn(&str) + Send + Sync + 'static) -> LineListener {
        let listener: LineListener = Arc::new(listener);
        self.add_line_listener(listener.clone());
        listener
    }

    pub fn add_line_listener(&self, listener: LineListener) {
        self.line_listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .add(listener);
    }

    /// Remove a listener by identity. Returns whether anything was removed.
    pub fn remove_line_listener(&self, listener: &LineListener) -> bool {
        self.line_listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(listener)
    }

    /// Snapshot of the registered listeners, in registration order.
    pub fn line_listeners(&self) -> Vec<LineListener> {
        self.line_listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot()
    }

    /// Detach every "line" listener, returning them in registration order.
    pub fn take_line_listeners(&self) -> Vec<LineListener> {
        self.line_listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Reattach previously detached listeners, preserving their order.
    pub fn restore_line_listeners(&self, saved: Vec<LineListener>) {
        self.line_listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .restore(saved);
    }

    // ══════════════════════════════════════════════════════════════════
    // Input routing
    // ══════════════════════════════════════════════════════════════════

    /// Feed one line of input. The oldest pending question consumes it
    /// first; otherwise every registered "line" listener runs, in order.
    pub fn feed_line(&self, line: &str) {
        let pending = self
            .pending_answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        if let Some(answer) = pending {
            answer(line.to_string());
            return;
        }

        for listener in self.line_listeners() {
            listener(line);
        }
    }

    fn enqueue_question(&self, query: &str, answer: AnswerFn) {
        print!("{query}");
        let _ = std::io::stdout().flush();
        self.pending_answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(answer);
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("options", &self.options)
            .field(
                "bindings",
                &self.with_context(|bindings| bindings.len()),
            )
            .finish()
    }
}
