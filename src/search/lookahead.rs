//! Depth-bounded self lookahead.
//!
//! Explores only the controlled player's own moves: after every move the
//! child state is handed back to the same player with all units ready
//! again, as if the opponent's intervening turn changed nothing. Each node
//! takes the maximum over its children; the frontier is scored by the
//! heuristic evaluator and any state the player has already won scores as
//! a victory at that depth.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::board::{GameState, Move, Player};
use crate::config::EngineConfig;
use crate::eval::evaluate;
use crate::movegen::MoveGenerator;
use crate::resolve::{apply, has_won, ApplyError, AttackPolicy};

use super::score::Score;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("move generator returned no moves at depth {depth}")]
    NoLegalMoves { depth: u32 },

    #[error("cannot apply {mv:?}: {source}")]
    Apply {
        mv: Move,
        #[source]
        source: ApplyError,
    },
}

/// Outcome of a search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub best_move: Move,
    pub score: Score,
    pub nodes: u64,
    pub elapsed_ms: u64,
}

struct Node {
    best_move: Move,
    score: Score,
}

/// When to cut the search short.
struct Budget<'a> {
    stop: Option<&'a AtomicBool>,
    deadline: Option<Instant>,
}

impl Budget<'_> {
    fn exhausted(&self) -> bool {
        self.stop.is_some_and(|s| s.load(Ordering::Relaxed))
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// A self-lookahead searcher over borrowed rules and configuration.
pub struct SelfLookahead<'a, G: ?Sized, P: ?Sized> {
    config: &'a EngineConfig,
    movegen: &'a G,
    policy: &'a P,
    stop: Option<&'a AtomicBool>,
    nodes: AtomicU64,
}

impl<'a, G, P> SelfLookahead<'a, G, P>
where
    G: MoveGenerator + ?Sized,
    P: AttackPolicy + ?Sized,
{
    pub fn new(config: &'a EngineConfig, movegen: &'a G, policy: &'a P) -> Self {
        SelfLookahead {
            config,
            movegen,
            policy,
            stop: None,
            nodes: AtomicU64::new(0),
        }
    }

    /// Attaches a flag that aborts the search once set.
    pub fn with_stop(mut self, stop: &'a AtomicBool) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Finds the best move for `player` in `state`, searching as if it
    /// were `player`'s turn.
    ///
    /// If `player` has already won, or the depth limit is zero, the returned
    /// move is the sentinel `End` carrying only the root score.
    pub fn search(&self, state: &GameState, player: Player) -> Result<SearchResult, SearchError> {
        let start = Instant::now();
        let budget = Budget {
            stop: self.stop,
            deadline: self
                .config
                .time_limit_ms
                .map(|ms| start + Duration::from_millis(ms)),
        };
        self.nodes.store(0, Ordering::Relaxed);

        let mut root = state.clone();
        root.whose_turn = player;
        let node = if self.config.parallel_root {
            self.expand_parallel(&root, player, &budget)?
        } else {
            self.expand(&root, player, 0, &budget)?
        };

        let result = SearchResult {
            best_move: node.best_move,
            score: node.score,
            nodes: self.nodes.load(Ordering::Relaxed),
            elapsed_ms: start.elapsed().as_millis() as u64,
        };
        debug!(
            ?player,
            depth = self.config.max_depth,
            nodes = result.nodes,
            elapsed_ms = result.elapsed_ms,
            score = %result.score,
            best = ?result.best_move,
            "search finished"
        );
        Ok(result)
    }

    /// Scores a leaf, or returns `None` if the node must be expanded.
    fn leaf(&self, state: &GameState, player: Player, depth: u32) -> Option<Node> {
        self.nodes.fetch_add(1, Ordering::Relaxed);
        if has_won(state, player, &self.config.victory) {
            return Some(Node {
                best_move: Move::End,
                score: Score::Victory { depth },
            });
        }
        if depth >= self.config.max_depth {
            return Some(Node {
                best_move: Move::End,
                score: Score::Heuristic(evaluate(state, player, self.config)),
            });
        }
        None
    }

    fn expand(
        &self,
        state: &GameState,
        player: Player,
        depth: u32,
        budget: &Budget<'_>,
    ) -> Result<Node, SearchError> {
        if let Some(node) = self.leaf(state, player, depth) {
            return Ok(node);
        }

        let moves = self.movegen.legal_moves(state);
        let mut best: Option<Node> = None;
        for mv in moves {
            let score = self.score_child(state, &mv, player, depth, budget)?;
            if depth == 0 {
                trace!(?mv, %score, "root move scored");
            }
            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(Node {
                    best_move: mv,
                    score,
                });
            }
            if budget.exhausted() {
                break;
            }
        }
        best.ok_or(SearchError::NoLegalMoves { depth })
    }

    /// Root expansion with the children scored on the rayon pool. The
    /// reduction runs in enumeration order, so the result matches
    /// [`Self::expand`] whenever no budget is hit.
    fn expand_parallel(
        &self,
        state: &GameState,
        player: Player,
        budget: &Budget<'_>,
    ) -> Result<Node, SearchError> {
        if let Some(node) = self.leaf(state, player, 0) {
            return Ok(node);
        }

        let moves = self.movegen.legal_moves(state);
        let scores: Vec<Result<Score, SearchError>> = moves
            .par_iter()
            .map(|mv| self.score_child(state, mv, player, 0, budget))
            .collect();

        let mut best: Option<Node> = None;
        for (mv, score) in moves.into_iter().zip(scores) {
            let score = score?;
            trace!(?mv, %score, "root move scored");
            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(Node {
                    best_move: mv,
                    score,
                });
            }
        }
        best.ok_or(SearchError::NoLegalMoves { depth: 0 })
    }

    fn score_child(
        &self,
        state: &GameState,
        mv: &Move,
        player: Player,
        depth: u32,
        budget: &Budget<'_>,
    ) -> Result<Score, SearchError> {
        let mut child = apply(state, mv, self.policy).map_err(|source| SearchError::Apply {
            mv: mv.clone(),
            source,
        })?;
        child.reset_actions();
        child.whose_turn = player;
        Ok(self.expand(&child, player, depth + 1, budget)?.score)
    }
}

/// Runs a self lookahead without a stop flag.
pub fn search<G, P>(
    state: &GameState,
    player: Player,
    config: &EngineConfig,
    movegen: &G,
    policy: &P,
) -> Result<SearchResult, SearchError>
where
    G: MoveGenerator + ?Sized,
    P: AttackPolicy + ?Sized,
{
    SelfLookahead::new(config, movegen, policy).search(state, player)
}
