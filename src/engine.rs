//! Engine state management.
//!
//! Holds the current game state, the player the engine moves for, engine
//! options and configuration, and runs the search for the `go` command.

use std::collections::HashMap;
use std::io::{self, Write};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, error, warn};

use crate::board::{GameState, Move, Phase, Player};
use crate::config::{ConfigError, EngineConfig, DEFAULT_MAX_DEPTH};
use crate::movegen::StandardMoves;
use crate::protocol::{format_move, format_placement, parse_position, GoParams, NotationError};
use crate::resolve::PriorityPolicy;
use crate::search::{SearchError, SearchResult, SelfLookahead};
use crate::setup::{place, SetupError};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Notation(#[from] NotationError),

    #[error("invalid value {value:?} for option {name}")]
    InvalidOption { name: String, value: String },
}

/// Runs a self lookahead for `player` and returns the chosen move.
///
/// The configuration is validated first. Uses the standard rules and the
/// default caste-priority attack policy.
pub fn choose_move(
    state: &GameState,
    player: Player,
    config: &EngineConfig,
) -> Result<Move, EngineError> {
    Ok(run_search(state, player, config)?.best_move)
}

fn run_search(
    state: &GameState,
    player: Player,
    config: &EngineConfig,
) -> Result<SearchResult, EngineError> {
    config.validate()?;
    let policy = PriorityPolicy::default();
    Ok(SelfLookahead::new(config, &StandardMoves, &policy).search(state, player)?)
}

/// Holds the mutable state of the engine between commands.
pub struct Engine {
    pub position: Option<GameState>,
    pub active_player: Option<Player>,
    pub options: HashMap<String, String>,
    pub config: EngineConfig,
    rng: SmallRng,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Creates a new engine with no position or active player.
    pub fn new() -> Self {
        Engine {
            position: None,
            active_player: None,
            options: HashMap::new(),
            config: EngineConfig::default(),
            rng: SmallRng::from_entropy(),
        }
    }

    /// Creates an engine whose setup placements are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Engine {
            rng: SmallRng::seed_from_u64(seed),
            ..Self::new()
        }
    }

    /// Resets the position and player for a new game. Options persist.
    pub fn new_game(&mut self) {
        self.position = None;
        self.active_player = None;
    }

    /// Sets the current game state from a JSON document.
    pub fn set_position(&mut self, json: &str) -> Result<(), EngineError> {
        let state = parse_position(json)?;
        self.position = Some(state);
        Ok(())
    }

    pub fn set_player(&mut self, player: Player) {
        self.active_player = Some(player);
    }

    /// Sets an engine option and applies it to the configuration.
    ///
    /// The configuration is left unchanged if the value is invalid.
    pub fn set_option(&mut self, name: String, value: Option<String>) -> Result<(), EngineError> {
        let raw = value.unwrap_or_default();
        let invalid = || EngineError::InvalidOption {
            name: name.clone(),
            value: raw.clone(),
        };

        match name.as_str() {
            "Depth" => {
                let depth: u32 = raw.parse().map_err(|_| invalid())?;
                if depth == 0 {
                    return Err(ConfigError::ZeroDepth.into());
                }
                self.config.max_depth = depth;
            }
            "SearchTime" => {
                let ms: u64 = raw.parse().map_err(|_| invalid())?;
                self.config.time_limit_ms = (ms > 0).then_some(ms);
            }
            "ParallelRoot" => {
                self.config.parallel_root = match raw.as_str() {
                    "" | "true" => true,
                    "false" => false,
                    _ => return Err(invalid()),
                };
            }
            "ConfigFile" => {
                self.config = EngineConfig::load(&raw)?;
            }
            _ => warn!(option = %name, "unknown option"),
        }

        debug!(option = %name, value = %raw, "option set");
        self.options.insert(name, raw);
        Ok(())
    }

    /// Handles the handshake: writes id and option lines, then `formicok`.
    pub fn handle_hello<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "id name formic")?;
        writeln!(out, "id author formic developers")?;
        writeln!(
            out,
            "option name Depth type spin default {} min 1 max 8",
            DEFAULT_MAX_DEPTH
        )?;
        writeln!(
            out,
            "option name SearchTime type spin default 0 min 0 max 600000"
        )?;
        writeln!(out, "option name ParallelRoot type check default false")?;
        writeln!(out, "option name ConfigFile type string default <empty>")?;
        writeln!(out, "formicok")?;
        out.flush()
    }

    /// Handles the `isready` command.
    pub fn handle_isready<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "readyok")?;
        out.flush()
    }

    /// Handles the `go` command.
    ///
    /// During setup the answer is a `place` line; during play an `info`
    /// line followed by `bestmove`. A failed search is reported through an
    /// `info string` line and answered with `bestmove end`.
    pub fn handle_go<W: Write>(&mut self, out: &mut W, params: &GoParams) -> io::Result<()> {
        let Some(state) = &self.position else {
            warn!("go: no position set");
            return Ok(());
        };
        let player = self.active_player.unwrap_or(state.whose_turn);

        if state.phase != Phase::Play {
            match place(state, player, &mut self.rng) {
                Ok(cells) => writeln!(out, "{}", format_placement(&cells))?,
                Err(e) => {
                    error!(error = %e, "placement failed");
                    writeln!(out, "info string {}", e)?;
                }
            }
            return out.flush();
        }

        let mut config = self.config.clone();
        if let Some(depth) = params.depth {
            config.max_depth = depth;
        }
        if let Some(ms) = params.movetime {
            // 0 means unlimited, as for the SearchTime option.
            config.time_limit_ms = (ms > 0).then_some(ms);
        }

        match run_search(state, player, &config) {
            Ok(result) => {
                writeln!(
                    out,
                    "info depth {} nodes {} score {} time {}",
                    config.max_depth, result.nodes, result.score, result.elapsed_ms
                )?;
                writeln!(out, "bestmove {}", format_move(&result.best_move))?;
            }
            Err(e) => {
                error!(error = %e, "search failed");
                writeln!(out, "info string {}", e)?;
                writeln!(out, "bestmove {}", format_move(&Move::End))?;
            }
        }
        out.flush()
    }
}
