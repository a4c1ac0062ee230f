//! Integration tests for the session surface: hook replacement, line
//! routing, and the default evaluator/completer wired through a session.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use awash_shell::{Outcome, Session, SessionOptions, Value};

// ============================================================================
// Test Helpers
// ============================================================================

fn bare_session() -> Arc<Session> {
    Session::start(SessionOptions::bare())
}

// ============================================================================
// Default hooks
// ============================================================================

#[tokio::test]
async fn default_eval_runs_against_the_session_context() {
    let session = bare_session();
    session.with_context_mut(|bindings| bindings.set("x", Value::Int(2)));

    match session.eval("x").await {
        Ok(Outcome::Value(value)) => assert_eq!(value, Value::Int(2)),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn assignments_persist_across_lines() {
    let session = bare_session();
    session.eval("greeting = \"hello\"").await.unwrap();

    match session.eval("greeting").await {
        Ok(Outcome::Value(value)) => assert_eq!(value, Value::Str("hello".to_string())),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn seeded_globals_show_up_in_completion() {
    let session = Session::start(SessionOptions::default());
    let out = session.complete("ver").unwrap();
    assert_eq!(out.candidates, vec!["version"]);
    assert_eq!(out.matched, "ver");
}

// ============================================================================
// Line listeners
// ============================================================================

#[test]
fn listeners_run_in_registration_order() {
    let session = bare_session();
    let seen: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));

    let first_seen = seen.clone();
    session.on_line(move |_| first_seen.lock().unwrap().push("first"));
    let second_seen = seen.clone();
    session.on_line(move |_| second_seen.lock().unwrap().push("second"));

    session.feed_line("anything");
    assert_eq!(*seen.lock().unwrap(), vec!["first", "second"]);
}

#[test]
fn removed_listener_no_longer_fires() {
    let session = bare_session();
    let count = Arc::new(AtomicUsize::new(0));

    let listener_count = count.clone();
    let handle = session.on_line(move |_| {
        listener_count.fetch_add(1, Ordering::SeqCst);
    });

    session.feed_line("one");
    assert!(session.remove_line_listener(&handle));
    session.feed_line("two");

    assert_eq!(count.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Question routing
// ============================================================================

#[test]
fn pending_question_consumes_the_next_line() {
    let session = bare_session();
    let answered: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
    let lines_seen = Arc::new(AtomicUsize::new(0));

    let listener_lines = lines_seen.clone();
    session.on_line(move |_| {
        listener_lines.fetch_add(1, Ordering::SeqCst);
    });

    let sink = answered.clone();
    session.question(
        "name? ",
        Box::new(move |answer| {
            *sink.lock().unwrap() = Some(answer);
        }),
    );

    // The answer goes to the question, not to the listeners.
    session.feed_line("ada");
    assert_eq!(answered.lock().unwrap().as_deref(), Some("ada"));
    assert_eq!(lines_seen.load(Ordering::SeqCst), 0);

    // The next line flows normally again.
    session.feed_line("x");
    assert_eq!(lines_seen.load(Ordering::SeqCst), 1);
}

#[test]
fn questions_answer_in_ask_order() {
    let session = bare_session();
    let answers: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    for tag in ["a", "b"] {
        let sink = answers.clone();
        session.question(
            "? ",
            Box::new(move |answer| sink.lock().unwrap().push(format!("{tag}:{answer}"))),
        );
    }

    session.feed_line("one");
    session.feed_line("two");
    assert_eq!(*answers.lock().unwrap(), vec!["a:one", "b:two"]);
}

// ============================================================================
// Hook replacement
// ============================================================================

#[tokio::test]
async fn replaced_eval_hook_takes_over_and_hands_back_the_original() {
    let session = bare_session();

    let original = session.replace_eval(Arc::new(|_source, _ctx, _label| {
        Box::pin(async { Ok(Outcome::Value(Value::Str("hooked".to_string()))) })
    }));

    match session.eval("ignored").await {
        Ok(Outcome::Value(value)) => assert_eq!(value, Value::Str("hooked".to_string())),
        other => panic!("unexpected outcome: {other:?}"),
    }

    // Restoring the original brings back the default evaluator.
    session.replace_eval(original);
    session.with_context_mut(|bindings| bindings.set("y", Value::Bool(true)));
    match session.eval("y").await {
        Ok(Outcome::Value(value)) => assert_eq!(value, Value::Bool(true)),
        other => panic!("unexpected outcome: {other:?}"),
    }
}
