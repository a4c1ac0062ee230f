//! Driving pending evaluation results to settlement.

use awash_shell::{Outcome, ShellResult};

/// Settle `outcome` if it is still pending; settled outcomes pass through
/// unchanged.
///
/// This is the sole suspension point in the decorated evaluation path.
/// While a deferred result settles here, the interceptor keeps the
/// session's line input gated; the rest of the process stays free to run.
/// A settling failure is returned as the evaluation's error.
pub async fn resolve(outcome: Outcome) -> ShellResult<Outcome> {
    match outcome {
        Outcome::Deferred(deferred) => {
            tracing::debug!("awaiting a deferred evaluation result");
            Ok(Outcome::Value(deferred.settle().await?))
        }
        settled => Ok(settled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use awash_shell::{Deferred, ShellError, Value};

    #[tokio::test]
    async fn settled_outcomes_pass_through() {
        assert!(matches!(
            resolve(Outcome::Empty).await,
            Ok(Outcome::Empty)
        ));
        assert!(matches!(
            resolve(Outcome::Value(Value::Int(3))).await,
            Ok(Outcome::Value(Value::Int(3)))
        ));
    }

    #[tokio::test]
    async fn pending_outcomes_settle_to_their_value() {
        let pending = Outcome::Deferred(Deferred::new(async { Ok(Value::Bool(true)) }));
        assert!(matches!(
            resolve(pending).await,
            Ok(Outcome::Value(Value::Bool(true)))
        ));
    }

    #[tokio::test]
    async fn settling_failures_surface_as_errors() {
        let pending = Outcome::Deferred(Deferred::new(async {
            Err(ShellError::Eval("lost".to_string()))
        }));
        assert_eq!(
            resolve(pending).await.unwrap_err(),
            ShellError::Eval("lost".to_string())
        );
    }
}
