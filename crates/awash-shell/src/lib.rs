//! awash-shell: the host line-shell primitive.
//!
//! This crate provides the surface an interactive front end (or a
//! decorator such as `awash-core`) works against:
//!
//! - **Session**: binding table, replaceable evaluate/completion/question
//!   hooks, and a "line" listener registry
//! - **Default evaluator**: a small logos-lexed grammar over the bindings
//! - **Default completer**: bare and dotted completion over the bindings
//! - **Outcome / Deferred**: settled and still-settling evaluation results

pub mod bindings;
pub mod complete;
pub mod error;
pub mod eval;
pub mod events;
pub mod outcome;
pub mod session;
pub mod value;

pub use bindings::Bindings;
pub use error::{ShellError, ShellResult};
pub use events::LineListener;
pub use outcome::{Deferred, Outcome};
pub use session::{
    AnswerFn, CompleteHook, Completions, EvalFuture, EvalHook, QuestionHook, Session,
    SessionOptions, SharedBindings,
};
pub use value::{json_to_value, Value, UNIVERSAL_MEMBERS};
