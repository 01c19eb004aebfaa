//! formic -- a move-selection engine for the ant colony game.
//!
//! Reads protocol commands from stdin and writes responses to stdout.
//! Diagnostics go to stderr, filtered by the `FORMIC_LOG` environment
//! variable (default `warn`).

use std::io::{self, BufRead, Write};

use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use formic::engine::Engine;
use formic::protocol::parser::{parse_command, Command};

fn init_logging() {
    let filter = EnvFilter::try_from_env("FORMIC_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Runs the protocol loop until `quit` or end of input.
fn run<W: Write>(engine: &mut Engine, input: impl BufRead, out: &mut W) -> io::Result<()> {
    for line in input.lines() {
        let line = line?;
        let Some(cmd) = parse_command(&line) else {
            continue;
        };

        match cmd {
            Command::Hello => engine.handle_hello(out)?,
            Command::IsReady => engine.handle_isready(out)?,
            Command::SetOption { name, value } => {
                if let Err(e) = engine.set_option(name, value) {
                    warn!(error = %e, "setoption rejected");
                }
            }
            Command::NewGame => engine.new_game(),
            Command::Position { json } => {
                if let Err(e) = engine.set_position(&json) {
                    warn!(error = %e, "position rejected");
                }
            }
            Command::SetPlayer { player } => engine.set_player(player),
            Command::Go(params) => engine.handle_go(out, &params)?,
            Command::Stop => {
                // Searches run to completion before the next line is read.
            }
            Command::Quit => break,
        }
    }
    Ok(())
}

fn main() {
    init_logging();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut engine = Engine::new();

    if let Err(e) = run(&mut engine, stdin.lock(), &mut out) {
        error!(error = %e, "protocol loop aborted");
        std::process::exit(1);
    }
}
