//! awash CLI entry point.
//!
//! Usage:
//!   awash                      # Interactive REPL
//!   awash -c <line>            # Evaluate one line and exit
//!   awash --marker <char>      # Await only lines prefixed with <char>

use std::env;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> ExitCode {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let args: Vec<String> = env::args().collect();

    let mut marker: Option<char> = None;
    let mut command: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(ExitCode::SUCCESS);
            }

            "--version" | "-V" => {
                println!(
                    "awash {} ({} {})",
                    env!("CARGO_PKG_VERSION"),
                    env!("AWASH_GIT_HASH"),
                    env!("AWASH_BUILD_DATE")
                );
                return Ok(ExitCode::SUCCESS);
            }

            "-c" => {
                let line = args.get(i + 1).context("-c requires a line argument")?;
                command = Some(line.clone());
                i += 2;
            }

            "--marker" => {
                let value = args
                    .get(i + 1)
                    .context("--marker requires a character argument")?;
                marker = Some(parse_marker(value)?);
                i += 2;
            }

            arg if arg.starts_with("--marker=") => {
                marker = Some(parse_marker(&arg["--marker=".len()..])?);
                i += 1;
            }

            unknown => {
                eprintln!("Unknown option: {unknown}");
                eprintln!("Run 'awash --help' for usage.");
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    match command {
        Some(line) => awash_repl::run_line(&line, marker)?,
        None => awash_repl::run(marker)?,
    }
    Ok(ExitCode::SUCCESS)
}

fn parse_marker(value: &str) -> Result<char> {
    let mut chars = value.chars();
    let marker = chars
        .next()
        .context("--marker requires a character argument")?;
    if chars.next().is_some() {
        anyhow::bail!("--marker takes a single character, got {value:?}");
    }
    Ok(marker)
}

fn print_help() {
    println!(
        r#"awash v{}

Usage:
  awash                        Interactive REPL
  awash -c <line>              Evaluate one line and exit
  awash --marker <char>        Await only lines prefixed with <char>

Options:
  -c <line>                    Evaluate a single line and exit
  --marker <char>              Opt-in awaiting behind a leading marker
  -h, --help                   Show this help
  -V, --version                Show version

Language:
  x = <expr>                   Bind a value
  <expr>;                      Evaluate without displaying the result
  name.member                  Dotted member access
  after <ms> <term>            A result that settles later
  after <ms> fail "msg"        A result that fails later
  ask "question"               Prompt and yield the reply (interactive only)
  void                         A result that displays nothing

Examples:
  awash                        # Start the interactive shell
  awash -c 'after 500 "hi"'   # Awaits, then prints "hi"
  awash --marker '&'           # Only &-prefixed lines are awaited
"#,
        env!("CARGO_PKG_VERSION")
    );
}
