//! Promise-style prompting over the session's question facility.

use async_trait::async_trait;
use tokio::sync::oneshot;

use awash_shell::{Session, ShellError, ShellResult};

/// Prompt-and-read as a single awaitable operation.
#[async_trait]
pub trait Ask {
    /// Ask `query` through the session's prompting facility and resolve
    /// with whatever answer arrives, verbatim.
    async fn q(&self, query: &str) -> ShellResult<String>;
}

#[async_trait]
impl Ask for Session {
    async fn q(&self, query: &str) -> ShellResult<String> {
        let (tx, rx) = oneshot::channel();
        self.question(
            query,
            Box::new(move |answer| {
                let _ = tx.send(answer);
            }),
        );
        // A callback dropped unfired is the prompting mechanism's own
        // failure; it surfaces here rather than being caught.
        rx.await.map_err(|_| ShellError::PromptClosed)
    }
}
