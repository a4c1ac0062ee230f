//! Decoration options.

/// When evaluation results are driven to settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AwaitPolicy {
    /// Resolve every result; already-settled values pass through unchanged.
    Always,
    /// Resolve only lines opting in with this leading marker; unmarked
    /// pending results pass through untouched.
    Marker(char),
}

/// How bare-name completion candidates are narrowed.
///
/// The two policies are alternatives, never combined: one allow-lists the
/// exposed bindings, the other rejects known ambient clutter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionPolicy {
    /// Keep only names exposed at decoration time.
    ExposedOnly,
    /// Drop names that were already ambient in the session before
    /// decoration; everything else is kept.
    RejectAmbient,
}

/// Options for decorating a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecorateOptions {
    pub await_policy: AwaitPolicy,
    pub completion_policy: CompletionPolicy,
}

impl Default for DecorateOptions {
    fn default() -> Self {
        Self {
            await_policy: AwaitPolicy::Always,
            completion_policy: CompletionPolicy::ExposedOnly,
        }
    }
}

impl DecorateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to opt-in awaiting behind a leading `marker` character.
    pub fn with_await_marker(mut self, marker: char) -> Self {
        self.await_policy = AwaitPolicy::Marker(marker);
        self
    }

    pub fn with_completion_policy(mut self, policy: CompletionPolicy) -> Self {
        self.completion_policy = policy;
        self
    }
}
