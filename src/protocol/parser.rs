//! Line-protocol command parser.
//!
//! Parses incoming commands from raw text into structured `Command`
//! variants that the engine main loop can dispatch on.

use tracing::warn;

use crate::board::Player;

/// Search constraints passed with the `go` command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoParams {
    pub depth: Option<u32>,
    pub movetime: Option<u64>,
}

/// A parsed driver-to-engine command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Protocol handshake.
    Hello,

    /// Synchronization ping; engine must reply `readyok`.
    IsReady,

    /// Set an engine option: `setoption name <id> [value <x>]`.
    SetOption { name: String, value: Option<String> },

    /// Reset engine state for a new game.
    NewGame,

    /// Set the game state from a JSON document.
    Position { json: String },

    /// Set the player the engine moves for.
    SetPlayer { player: Player },

    /// Choose a move with optional search constraints.
    Go(GoParams),

    /// Interrupt the current search.
    Stop,

    /// Terminate the engine process.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after logging a warning.
pub fn parse_command(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let first = *tokens.first()?;

    match first {
        "formic" => Some(Command::Hello),
        "isready" => Some(Command::IsReady),
        "quit" => Some(Command::Quit),
        "newgame" => Some(Command::NewGame),
        "stop" => Some(Command::Stop),

        "setoption" => parse_setoption(&tokens),
        "position" => parse_position(trimmed),
        "player" => parse_player(&tokens),
        "go" => Some(parse_go(&tokens)),

        other => {
            warn!(command = other, "unknown command");
            None
        }
    }
}

/// Parses `setoption name <id> [value <x>]`. Names and values may span
/// several words; everything after the first `value` keyword is the value.
fn parse_setoption(tokens: &[&str]) -> Option<Command> {
    let Some(["name", rest @ ..]) = tokens.get(1..) else {
        warn!("malformed setoption: expected 'setoption name <id> [value <x>]'");
        return None;
    };

    let mut words = rest.iter().copied();
    let name: Vec<&str> = words.by_ref().take_while(|&w| w != "value").collect();
    let value: Vec<&str> = words.collect();
    if name.is_empty() {
        warn!("malformed setoption: empty name");
        return None;
    }

    Some(Command::SetOption {
        name: name.join(" "),
        value: (!value.is_empty()).then(|| value.join(" ")),
    })
}

/// Parses `position <json>`; the document is everything after the keyword.
fn parse_position(line: &str) -> Option<Command> {
    let json = line.strip_prefix("position").unwrap_or("").trim();
    if json.is_empty() {
        warn!("malformed position: expected 'position <json>'");
        return None;
    }
    Some(Command::Position {
        json: json.to_string(),
    })
}

/// Parses `player <1|2>`.
fn parse_player(tokens: &[&str]) -> Option<Command> {
    let Some(arg) = tokens.get(1) else {
        warn!("malformed player: expected 'player <1|2>'");
        return None;
    };
    match Player::from_protocol(arg) {
        Some(player) => Some(Command::SetPlayer { player }),
        None => {
            warn!(player = *arg, "unknown player");
            None
        }
    }
}

/// Parses `go [depth <n>] [movetime <ms>]`. Bad values are skipped.
fn parse_go(tokens: &[&str]) -> Command {
    let mut params = GoParams::default();
    let mut i = 1;

    while i < tokens.len() {
        match tokens[i] {
            "depth" => {
                i += 1;
                if let Some(raw) = tokens.get(i) {
                    match raw.parse::<u32>() {
                        Ok(v) => params.depth = Some(v),
                        Err(_) => warn!(value = *raw, "invalid depth value"),
                    }
                }
            }
            "movetime" => {
                i += 1;
                if let Some(raw) = tokens.get(i) {
                    match raw.parse::<u64>() {
                        Ok(v) => params.movetime = Some(v),
                        Err(_) => warn!(value = *raw, "invalid movetime value"),
                    }
                }
            }
            other => warn!(param = other, "unknown go parameter"),
        }
        i += 1;
    }

    Command::Go(params)
}
