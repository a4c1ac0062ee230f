//! Output formatting for the REPL.

use awash_shell::{Outcome, Value};

/// Format an outcome for display. `None` means print nothing at all.
pub fn format_outcome(outcome: &Outcome) -> Option<String> {
    match outcome {
        Outcome::Empty => None,
        Outcome::Value(value) => Some(format_value(value)),
        Outcome::Deferred(_) => Some("<pending>".to_string()),
    }
}

/// Format a value for display (with quotes on strings).
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Str(s) => format!("\"{}\"", s),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use awash_shell::Deferred;

    #[test]
    fn empty_prints_nothing() {
        assert_eq!(format_outcome(&Outcome::Empty), None);
    }

    #[test]
    fn strings_are_quoted_and_null_is_bare() {
        assert_eq!(
            format_outcome(&Outcome::Value(Value::Str("hi".to_string()))),
            Some("\"hi\"".to_string())
        );
        assert_eq!(
            format_outcome(&Outcome::Value(Value::Null)),
            Some("null".to_string())
        );
        assert_eq!(
            format_outcome(&Outcome::Value(Value::Int(3))),
            Some("3".to_string())
        );
    }

    #[test]
    fn unresolved_results_show_a_placeholder() {
        let pending = Outcome::Deferred(Deferred::new(async { Ok(Value::Int(1)) }));
        assert_eq!(format_outcome(&pending), Some("<pending>".to_string()));
    }
}
