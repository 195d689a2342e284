use serde::{Deserialize, Serialize};

/// Where a hand is in its deterministic sequence. `Waiting` is the only stage between
/// hands; the sequencer drives every other transition in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Waiting,
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Stage {
    pub fn is_betting_round(&self) -> bool {
        matches!(self, Stage::Preflop | Stage::Flop | Stage::Turn | Stage::River)
    }

    /// The stage that follows this one in the normal sequence, ignoring early
    /// termination (all-but-one-folded short-circuits handle that separately).
    pub fn next(&self) -> Stage {
        match self {
            Stage::Waiting => Stage::Preflop,
            Stage::Preflop => Stage::Flop,
            Stage::Flop => Stage::Turn,
            Stage::Turn => Stage::River,
            Stage::River => Stage::Showdown,
            Stage::Showdown => Stage::Waiting,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Waiting => "waiting",
            Stage::Preflop => "preflop",
            Stage::Flop => "flop",
            Stage::Turn => "turn",
            Stage::River => "river",
            Stage::Showdown => "showdown",
        };
        write!(f, "{s}")
    }
}
