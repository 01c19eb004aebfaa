//! Search scores.

use std::cmp::Ordering;
use std::fmt;

/// The value the search assigns to a node.
///
/// A victory found during the lookahead outranks every heuristic value,
/// and a victory reached at a shallower depth outranks a later one.
#[derive(Debug, Clone, Copy)]
pub enum Score {
    /// Frontier evaluation in `[0, 1]`.
    Heuristic(f64),
    /// The player has won at this search depth.
    Victory { depth: u32 },
}

impl Score {
    /// The score on the evaluator's `[0, 1]` scale; victories map to 1.0.
    pub fn value(&self) -> f64 {
        match *self {
            Score::Heuristic(v) => v,
            Score::Victory { .. } => 1.0,
        }
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Score::Victory { depth: a }, Score::Victory { depth: b }) => b.cmp(a),
            (Score::Victory { .. }, Score::Heuristic(_)) => Ordering::Greater,
            (Score::Heuristic(_), Score::Victory { .. }) => Ordering::Less,
            (Score::Heuristic(a), Score::Heuristic(b)) => a.total_cmp(b),
        }
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Score {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Score {}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Heuristic(v) => write!(f, "value {:.6}", v),
            Score::Victory { depth } => write!(f, "win {}", depth),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn victory_beats_any_heuristic() {
        assert!(Score::Victory { depth: 9 } > Score::Heuristic(1.0));
        assert!(Score::Heuristic(0.999) < Score::Victory { depth: 1 });
    }

    #[test]
    fn earlier_victory_is_better() {
        assert!(Score::Victory { depth: 1 } > Score::Victory { depth: 2 });
        assert_eq!(Score::Victory { depth: 3 }, Score::Victory { depth: 3 });
    }

    #[test]
    fn heuristics_compare_numerically() {
        assert!(Score::Heuristic(0.6) > Score::Heuristic(0.4));
        assert_eq!(
            [Score::Heuristic(0.2), Score::Heuristic(0.7), Score::Heuristic(0.5)]
                .into_iter()
                .max(),
            Some(Score::Heuristic(0.7))
        );
    }

    #[test]
    fn display() {
        assert_eq!(Score::Victory { depth: 2 }.to_string(), "win 2");
        assert_eq!(Score::Heuristic(0.5).to_string(), "value 0.500000");
        assert_eq!(Score::Victory { depth: 0 }.value(), 1.0);
    }
}
