//! awash REPL — an interactive shell whose evaluations may settle later.
//!
//! Wires the host session and its decoration to a rustyline front end:
//!
//! - line editing and history via rustyline
//! - tab completion bridged to the session's (filtered) completion hook
//! - questions answered through the line editor
//! - transparent awaiting driven by a tokio runtime

pub mod format;
pub mod helper;

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context as _, Result};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use tokio::runtime::Runtime;

use awash_core::{Ask, DecorateOptions};
use awash_shell::{Bindings, Outcome, Session, SessionOptions, Value};

use format::format_outcome;
use helper::ShellHelper;

type ShellEditor = Editor<ShellHelper, DefaultHistory>;

/// Bindings the interactive shell exposes to evaluation and completion.
fn exposed_bindings() -> Bindings {
    let mut exposed = Bindings::new();
    exposed.set(
        "user",
        Value::Str(std::env::var("USER").unwrap_or_else(|_| "unknown".to_string())),
    );
    exposed.set(
        "home",
        Value::Str(std::env::var("HOME").unwrap_or_default()),
    );
    exposed.set("pid", Value::Int(std::process::id() as i64));
    exposed.set(
        "env",
        Value::Json(serde_json::json!({
            "term": std::env::var("TERM").unwrap_or_default(),
            "lang": std::env::var("LANG").unwrap_or_default(),
        })),
    );
    exposed
}

fn decoration_for(marker: Option<char>) -> DecorateOptions {
    match marker {
        Some(c) => DecorateOptions::new().with_await_marker(c),
        None => DecorateOptions::default(),
    }
}

/// History file under the user data dir.
fn history_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.data_dir().join("awash").join("history.txt"))
}

fn load_history(rl: &mut ShellEditor, history_path: &Option<PathBuf>) {
    if let Some(path) = history_path {
        if let Err(e) = rl.load_history(path) {
            // Only log if it's not a "file not found" error (expected on first run)
            let is_not_found = matches!(&e, ReadlineError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound);
            if !is_not_found {
                tracing::warn!("Failed to load history: {}", e);
            }
        }
    }
}

/// Save REPL history to disk.
fn save_history(rl: &mut ShellEditor, history_path: &Option<PathBuf>) {
    if let Some(path) = history_path {
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("Failed to create history directory: {}", e);
            }
        }
        if let Err(e) = rl.save_history(path) {
            tracing::warn!("Failed to save history: {}", e);
        }
    }
}

/// Layer an `ask "query"` form over the session's evaluate hook: the
/// query is prompted through the session and the reply becomes the line's
/// value. Everything else delegates to the hook below.
///
/// Only wired interactively; a one-shot evaluation has nobody to answer.
fn install_ask(session: &Arc<Session>) {
    let inner = session.eval_hook();
    let weak = Arc::downgrade(session);
    session.replace_eval(Arc::new(move |source, ctx, label| {
        let inner = inner.clone();
        let weak = weak.clone();
        Box::pin(async move {
            if let Some(query) = parse_ask(&source) {
                if let Some(session) = weak.upgrade() {
                    let answer = session.q(&query).await?;
                    return Ok(Outcome::Value(Value::Str(answer)));
                }
            }
            inner(source, ctx, label).await
        })
    }));
}

/// Parse an `ask "query"` line; anything else is not ours.
fn parse_ask(source: &str) -> Option<String> {
    let rest = source.trim().strip_prefix("ask")?.trim();
    let quoted = rest.strip_prefix('"')?.strip_suffix('"')?;
    (!quoted.contains('"')).then(|| quoted.to_string())
}

/// Run the interactive REPL. `marker` switches awaiting to opt-in behind
/// that character.
pub fn run(marker: Option<char>) -> Result<()> {
    let runtime = Arc::new(Runtime::new().context("Failed to create tokio runtime")?);

    let session = Session::start(SessionOptions::default());
    install_ask(&session);
    awash_core::decorate(&session, exposed_bindings(), decoration_for(marker));

    let mut rl: ShellEditor = Editor::new().context("Failed to create editor")?;
    rl.set_helper(Some(ShellHelper::new(session.clone())));
    let history_path = history_path();
    load_history(&mut rl, &history_path);
    let editor = Arc::new(Mutex::new(rl));

    // Questions read their answer through the line editor, with the query
    // as the prompt. A read failure drops the callback; a pending `q`
    // observes the prompt as closed.
    let question_editor = Arc::downgrade(&editor);
    session.replace_question(Arc::new(move |query, answer| {
        if let Some(editor) = question_editor.upgrade() {
            let response = editor
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .readline(query);
            match response {
                Ok(text) => answer(text),
                Err(e) => tracing::warn!("question aborted: {}", e),
            }
        }
    }));

    // The line listener evaluates and prints. It is exactly what the
    // decoration detaches while an awaited result is outstanding.
    let listener_session = Arc::downgrade(&session);
    let listener_runtime = runtime.clone();
    session.on_line(move |line| {
        let Some(session) = listener_session.upgrade() else {
            return;
        };
        match listener_runtime.block_on(session.eval(line)) {
            Ok(outcome) => {
                if let Some(text) = format_outcome(&outcome) {
                    println!("{text}");
                }
            }
            Err(e) => eprintln!("Error: {e}"),
        }
    });

    println!("awash v{}", env!("CARGO_PKG_VERSION"));
    match marker {
        Some(c) => println!("Type quit to leave. Prefix a line with {c} to await its result."),
        None => println!("Type quit to leave. Deferred results are awaited transparently."),
    }
    println!();

    let prompt = session.options().prompt.clone();
    loop {
        let readline = editor
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .readline(&prompt);
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "quit" || trimmed == "exit" {
                    break;
                }
                if !trimmed.is_empty() {
                    if let Err(e) = editor
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .add_history_entry(line.as_str())
                    {
                        tracing::warn!("Failed to add history entry: {}", e);
                    }
                }
                session.feed_line(&line);
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(err) => {
                eprintln!("Error: {err}");
                break;
            }
        }
    }

    let mut rl = editor.lock().unwrap_or_else(PoisonError::into_inner);
    save_history(&mut rl, &history_path);
    Ok(())
}

/// Evaluate one line non-interactively and print its result.
pub fn run_line(line: &str, marker: Option<char>) -> Result<()> {
    let session = awash_core::start_with(
        SessionOptions::default(),
        exposed_bindings(),
        decoration_for(marker),
    );

    let runtime = Runtime::new().context("Failed to create tokio runtime")?;
    match runtime.block_on(session.eval(line)) {
        Ok(outcome) => {
            if let Some(text) = format_outcome(&outcome) {
                println!("{text}");
            }
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustyline::history::History;

    #[test]
    fn history_round_trips_through_a_nested_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = Some(dir.path().join("nested").join("history.txt"));

        let mut rl: ShellEditor = Editor::new().unwrap();
        rl.add_history_entry("x = 1").unwrap();
        save_history(&mut rl, &path);
        assert!(path.as_ref().unwrap().exists());

        let mut fresh: ShellEditor = Editor::new().unwrap();
        load_history(&mut fresh, &path);
        assert_eq!(fresh.history().len(), 1);
    }

    #[test]
    fn exposed_bindings_cover_the_session_identity() {
        let exposed = exposed_bindings();
        assert!(exposed.contains("user"));
        assert!(exposed.contains("pid"));
        assert!(exposed.contains("env"));
    }

    #[test]
    fn parse_ask_accepts_only_a_single_quoted_query() {
        assert_eq!(parse_ask(r#"ask "name?""#), Some("name?".to_string()));
        assert_eq!(parse_ask(r#"  ask   """#), Some(String::new()));
        assert_eq!(parse_ask("ask name"), None);
        assert_eq!(parse_ask(r#"ask "a" "b""#), None);
        assert_eq!(parse_ask(r#"task "name?""#), None);
        assert_eq!(parse_ask("x = 1"), None);
    }

    #[tokio::test]
    async fn ask_lines_resolve_with_the_questions_answer() {
        let session = Session::start(SessionOptions::bare());
        install_ask(&session);
        awash_core::decorate(
            &session,
            Bindings::new(),
            DecorateOptions::default(),
        );
        session.replace_question(Arc::new(|query, answer| {
            assert_eq!(query, "name? ");
            answer("grace".to_string());
        }));

        match session.eval(r#"ask "name? ""#).await {
            Ok(Outcome::Value(value)) => assert_eq!(value, Value::Str("grace".to_string())),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
