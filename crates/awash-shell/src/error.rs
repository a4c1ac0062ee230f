//! Error taxonomy for the shell surface.

use thiserror::Error;

/// Result type for shell operations.
pub type ShellResult<T> = Result<T, ShellError>;

/// Errors surfaced through the session's hook contracts.
///
/// Everything flowing out of an evaluate or completion hook, including a
/// failure of a still-settling result, is one of these. Wrappers forward
/// them verbatim; nothing is retried or swallowed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShellError {
    #[error("parse error: {0}")]
    Parse(String),
    #[error("undefined binding: {0}")]
    Unbound(String),
    #[error("no member `{member}` on {type_name}")]
    NoMember {
        type_name: &'static str,
        member: String,
    },
    #[error("{0}")]
    Eval(String),
    #[error("prompt closed before an answer arrived")]
    PromptClosed,
}
