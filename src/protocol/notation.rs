//! Text notation for moves, placements and positions.
//!
//! Moves are written as:
//!
//! ```text
//! end
//! move 0,0-0,1-0,2
//! build 0,0 worker
//! build 3,3 fallback
//! ```
//!
//! Placement answers list cells: `place 1,2 3,0 ...`. Positions travel as
//! a single JSON document.

use crate::board::{BuildTarget, Caste, Coord, GameState, Move, StructureKind};

#[derive(Debug, thiserror::Error)]
pub enum NotationError {
    #[error("empty input")]
    EmptyInput,

    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error("invalid coordinate '{0}'")]
    InvalidCoord(String),

    #[error("unknown build target '{0}'")]
    UnknownTarget(String),

    #[error("unexpected end of input, expected {0}")]
    UnexpectedEnd(&'static str),

    #[error("unexpected trailing input '{0}'")]
    Trailing(String),

    #[error("invalid position: {0}")]
    Position(#[from] serde_json::Error),
}

fn target_notation(target: BuildTarget) -> &'static str {
    match target {
        BuildTarget::Unit(caste) => caste.notation(),
        BuildTarget::Structure(kind) => kind.notation(),
    }
}

/// Formats a move in protocol notation.
pub fn format_move(mv: &Move) -> String {
    match mv {
        Move::End => "end".to_string(),
        Move::Move { path } => {
            let cells: Vec<String> = path.iter().map(Coord::to_string).collect();
            format!("move {}", cells.join("-"))
        }
        Move::Build { at, target } => format!("build {} {}", at, target_notation(*target)),
    }
}

/// Formats a setup answer.
pub fn format_placement(cells: &[Coord]) -> String {
    let mut out = String::from("place");
    for cell in cells {
        out.push(' ');
        out.push_str(&cell.to_string());
    }
    out
}

fn parse_coord(s: &str) -> Result<Coord, NotationError> {
    let invalid = || NotationError::InvalidCoord(s.to_string());
    let (x, y) = s.split_once(',').ok_or_else(invalid)?;
    let x: u8 = x.trim().parse().map_err(|_| invalid())?;
    let y: u8 = y.trim().parse().map_err(|_| invalid())?;
    let coord = Coord::new(x, y);
    if !coord.on_board() {
        return Err(invalid());
    }
    Ok(coord)
}

fn parse_target(s: &str) -> Result<BuildTarget, NotationError> {
    let target = match (Caste::from_notation(s), StructureKind::from_notation(s)) {
        (Some(caste), _) => BuildTarget::Unit(caste),
        (None, Some(kind)) => BuildTarget::Structure(kind),
        (None, None) => return Err(NotationError::UnknownTarget(s.to_string())),
    };
    if target.cost().is_none() {
        return Err(NotationError::UnknownTarget(s.to_string()));
    }
    Ok(target)
}

/// Parses a move from protocol notation.
pub fn parse_move(s: &str) -> Result<Move, NotationError> {
    let mut tokens = s.split_whitespace();
    let action = tokens.next().ok_or(NotationError::EmptyInput)?;

    let mv = match action {
        "end" => Move::End,
        "move" => {
            let path = tokens
                .next()
                .ok_or(NotationError::UnexpectedEnd("path"))?
                .split('-')
                .map(parse_coord)
                .collect::<Result<Vec<_>, _>>()?;
            Move::Move { path }
        }
        "build" => {
            let at = parse_coord(tokens.next().ok_or(NotationError::UnexpectedEnd("cell"))?)?;
            let target =
                parse_target(tokens.next().ok_or(NotationError::UnexpectedEnd("build target"))?)?;
            Move::Build { at, target }
        }
        other => return Err(NotationError::UnknownAction(other.to_string())),
    };

    if let Some(extra) = tokens.next() {
        return Err(NotationError::Trailing(extra.to_string()));
    }
    Ok(mv)
}

/// Parses and validates a JSON game state.
pub fn parse_position(json: &str) -> Result<GameState, NotationError> {
    Ok(serde_json::from_str(json)?)
}
