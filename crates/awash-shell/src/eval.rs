//! The built-in line evaluator.
//!
//! A deliberately small grammar over the binding table:
//!
//! ```text
//!   line    := item | item ';'
//!   item    := IDENT '=' expr | expr
//!   expr    := 'after' INT payload | 'fail' STRING | term
//!   payload := 'fail' STRING | term
//!   term    := literal | IDENT ('.' IDENT)*
//!   literal := 'null' | 'void' | 'true' | 'false' | INT | FLOAT | STRING
//! ```
//!
//! A trailing `;` keeps the side effect but reports no result. `after`
//! evaluates its payload immediately and hands back a deferred result that
//! delivers it once the delay elapses; `fail` is the failing counterpart.

use std::sync::PoisonError;
use std::time::Duration;

use logos::Logos;

use crate::error::{ShellError, ShellResult};
use crate::outcome::{Deferred, Outcome};
use crate::session::SharedBindings;
use crate::value::Value;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t]+")]
enum Token {
    #[token("=")]
    Eq,

    #[token(".")]
    Dot,

    #[token(";")]
    Semi,

    #[regex(r"-?[0-9]+\.[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Float(f64),

    #[regex(r"-?[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Int(i64),

    #[regex(r#""([^"\\]|\\.)*""#, lex_string)]
    Str(String),

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),
}

/// Strip the quotes of a string literal and process escape sequences.
fn lex_string(lex: &mut logos::Lexer<Token>) -> Option<String> {
    let slice = lex.slice();
    let raw = &slice[1..slice.len() - 1];
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => return None,
        }
    }
    Some(out)
}

fn tokenize(source: &str) -> ShellResult<Vec<Token>> {
    let mut tokens = Vec::new();
    for (result, span) in Token::lexer(source).spanned() {
        match result {
            Ok(token) => tokens.push(token),
            Err(()) => {
                return Err(ShellError::Parse(format!(
                    "unrecognized input: {:?}",
                    &source[span]
                )));
            }
        }
    }
    Ok(tokens)
}

/// Evaluate one line against the binding table.
///
/// This is the session's default evaluate hook. Blank input reports
/// [`Outcome::Empty`] without touching the table.
pub fn evaluate(source: &str, context: &SharedBindings) -> ShellResult<Outcome> {
    let mut tokens = tokenize(source)?;

    let statement = matches!(tokens.last(), Some(Token::Semi));
    if statement {
        tokens.pop();
    }
    if tokens.is_empty() {
        return Ok(Outcome::Empty);
    }

    let outcome = match tokens.as_slice() {
        [Token::Ident(name), Token::Eq, rest @ ..] => match eval_expr(rest, context)? {
            Outcome::Value(value) => {
                context
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .set(name.clone(), value.clone());
                Outcome::Value(value)
            }
            Outcome::Deferred(_) => {
                return Err(ShellError::Eval(format!(
                    "cannot bind `{name}` to a pending result"
                )));
            }
            Outcome::Empty => {
                return Err(ShellError::Parse("expected an expression".to_string()));
            }
        },
        rest => eval_expr(rest, context)?,
    };

    if statement {
        return Ok(Outcome::Empty);
    }
    Ok(outcome)
}

fn eval_expr(tokens: &[Token], context: &SharedBindings) -> ShellResult<Outcome> {
    match tokens {
        [] => Err(ShellError::Parse("expected an expression".to_string())),
        [Token::Ident(kw), Token::Int(ms), rest @ ..] if kw == "after" => {
            let delay = Duration::from_millis((*ms).max(0) as u64);
            // The payload is evaluated now; only delivery is delayed.
            let payload = eval_payload(rest, context);
            Ok(Outcome::Deferred(Deferred::new(async move {
                tokio::time::sleep(delay).await;
                payload
            })))
        }
        [Token::Ident(kw), Token::Str(message)] if kw == "fail" => {
            Err(ShellError::Eval(message.clone()))
        }
        rest => Ok(Outcome::Value(eval_term(rest, context)?)),
    }
}

/// Payload of an `after`: a term, or a `fail` captured as the deferred's
/// eventual failure rather than surfaced immediately.
fn eval_payload(tokens: &[Token], context: &SharedBindings) -> ShellResult<Value> {
    if let [Token::Ident(kw), Token::Str(message)] = tokens {
        if kw == "fail" {
            return Err(ShellError::Eval(message.clone()));
        }
    }
    eval_term(tokens, context)
}

fn eval_term(tokens: &[Token], context: &SharedBindings) -> ShellResult<Value> {
    let (first, mut rest) = tokens
        .split_first()
        .ok_or_else(|| ShellError::Parse("expected an expression".to_string()))?;

    let mut value = match first {
        Token::Int(n) => Value::Int(*n),
        Token::Float(n) => Value::Float(*n),
        Token::Str(s) => Value::Str(s.clone()),
        Token::Ident(name) => match name.as_str() {
            "null" => Value::Null,
            "void" => Value::Void,
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => context
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .get(name)
                .cloned()
                .ok_or_else(|| ShellError::Unbound(name.clone()))?,
        },
        other => {
            return Err(ShellError::Parse(format!("unexpected token: {other:?}")));
        }
    };

    while let [Token::Dot, Token::Ident(member), tail @ ..] = rest {
        let next = value.member(member).ok_or_else(|| ShellError::NoMember {
            type_name: value.type_name(),
            member: member.clone(),
        })?;
        value = next;
        rest = tail;
    }

    if !rest.is_empty() {
        return Err(ShellError::Parse("unexpected trailing input".to_string()));
    }
    Ok(value)
}
