//! What an evaluation hands back: nothing, a settled value, or a pending one.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::error::ShellResult;
use crate::value::Value;

type SettleFuture = Pin<Box<dyn Future<Output = ShellResult<Value>> + Send>>;

/// A computation that settles later, with a value or a failure.
///
/// Settles exactly once, via [`Deferred::settle`]. Dropping an unsettled
/// deferred abandons the computation.
pub struct Deferred {
    future: SettleFuture,
}

impl Deferred {
    /// Wrap a future as a deferred evaluation result.
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = ShellResult<Value>> + Send + 'static,
    {
        Self {
            future: Box::pin(future),
        }
    }

    /// Drive the computation to completion.
    pub async fn settle(self) -> ShellResult<Value> {
        self.future.await
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Deferred(<pending>)")
    }
}

/// Result of evaluating one line of input.
///
/// `Empty` and `Value(Value::Null)` are deliberately distinct: the former
/// means "nothing to display at all", the latter displays as `null`.
#[derive(Debug)]
pub enum Outcome {
    /// The evaluation produced nothing to display.
    Empty,
    /// A settled value.
    Value(Value),
    /// A computation still settling.
    Deferred(Deferred),
}
