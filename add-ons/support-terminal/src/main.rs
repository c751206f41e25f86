//! Terminal chat loop for the support responder.
//! Run: cargo run -p support-terminal            (interactive)
//!      cargo run -p support-terminal -- --ask "What does EVA do?"

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use support_core::{CoreConfig, Responder, SessionHistory};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const PROMPT: &str = "You> ";

/// One parsed line of interactive input.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Quit,
    History,
    Ask(&'a str),
}

fn parse_command(line: &str) -> Command<'_> {
    match line.trim() {
        ":quit" | ":q" | ":exit" => Command::Quit,
        ":history" | ":h" => Command::History,
        _ => Command::Ask(line),
    }
}

fn print_history<W: Write>(out: &mut W, history: &SessionHistory) -> io::Result<()> {
    if history.is_empty() {
        return writeln!(out, "(no questions yet)");
    }
    writeln!(out, "Conversation History")?;
    for (i, entry) in history.recent().enumerate() {
        let n = i + 1;
        writeln!(out, "Q{}: {}", n, entry.question)?;
        writeln!(out, "A{}: {}", n, entry.answer)?;
        writeln!(out, "---")?;
    }
    Ok(())
}

/// Reads questions until EOF or `:quit`, answering each against one session history.
fn run_loop<R: BufRead, W: Write>(
    input: R,
    out: &mut W,
    responder: &Responder,
    history: &mut SessionHistory,
) -> io::Result<()> {
    write!(out, "{}", PROMPT)?;
    out.flush()?;
    for line in input.lines() {
        let line = line?;
        match parse_command(&line) {
            Command::Quit => break,
            Command::History => print_history(out, history)?,
            Command::Ask(question) if question.trim().is_empty() => {}
            Command::Ask(question) => match responder.ask(history, question) {
                Ok(reply) => writeln!(out, "Answer: {}", reply.answer)?,
                Err(e) => writeln!(out, "{}", e)?,
            },
        }
        write!(out, "{}", PROMPT)?;
        out.flush()?;
    }
    writeln!(out)?;
    Ok(())
}

/// One-shot `--ask`: the answer goes to `out`; a rejected question goes to `err` and exits 2.
fn ask_once<W: Write, E: Write>(
    responder: &Responder,
    question: &str,
    out: &mut W,
    err: &mut E,
) -> ExitCode {
    let written = match responder.answer(question) {
        Ok(reply) => writeln!(out, "{}", reply.answer).map(|_| ExitCode::SUCCESS),
        Err(e) => writeln!(err, "{}", e).map(|_| ExitCode::from(2)),
    };
    written.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Terminal I/O failed");
        ExitCode::FAILURE
    })
}

fn main() -> ExitCode {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[support-terminal] .env not loaded: {} (using system environment)", e);
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = match CoreConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load config");
            return ExitCode::FAILURE;
        }
    };
    let responder = match config.build_responder() {
        Ok(responder) => responder,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build responder");
            return ExitCode::FAILURE;
        }
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Some(pos) = args.iter().position(|a| a == "--ask") {
        let question = args.get(pos + 1).map(String::as_str).unwrap_or("");
        return ask_once(&responder, question, &mut io::stdout(), &mut io::stderr());
    }

    println!("{}", config.app_name);
    println!("Ask me anything about Thoughtful AI's agents! (:history, :quit)");
    let mut history = SessionHistory::new(config.history_limit);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    match run_loop(stdin.lock(), &mut stdout, &responder, &mut history) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Terminal I/O failed");
            ExitCode::FAILURE
        }
    }
}
