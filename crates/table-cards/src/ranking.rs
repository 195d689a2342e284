use super::rank::Rank;

/// A poker hand's category, carrying just enough of the tiebreak tuple (category
/// code, then ranks) for `#[derive(Ord)]` to compare two hands correctly within a
/// category. Kicker cards that aren't part of the category itself are carried
/// separately in a [`crate::Kickers`] alongside the `Strength` tuple.
///
/// Variants are declared in strength order low to high so the derived `Ord` is correct
/// by construction: `HighCard < Pair < TwoPair < Trips < Straight < Flush < FullHouse <
/// Quads < StraightFlush`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, serde::Serialize)]
pub enum Ranking {
    HighCard(Rank),        // 4 kickers
    OnePair(Rank),         // 3 kickers
    TwoPair(Rank, Rank),   // 1 kicker
    ThreeOAK(Rank),        // 2 kickers
    Straight(Rank),        // 0 kickers
    Flush(Rank),           // 0 kickers
    FullHouse(Rank, Rank), // 0 kickers
    FourOAK(Rank),         // 1 kicker
    StraightFlush(Rank),   // 0 kickers
    MAX,                   // above any real hand; a neutral starting point for showdown settlement
}

impl Ranking {
    pub fn n_kickers(&self) -> usize {
        match self {
            Ranking::HighCard(_) => 4,
            Ranking::OnePair(_) => 3,
            Ranking::ThreeOAK(_) => 2,
            Ranking::FourOAK(_) | Ranking::TwoPair(_, _) => 1,
            _ => 0,
        }
    }

    /// Rank bits already accounted for by this category, to be masked out when
    /// picking kickers so the same card never counts twice.
    pub fn mask(&self) -> u16 {
        match *self {
            Ranking::TwoPair(hi, lo) => !(u16::from(hi) | u16::from(lo)),
            Ranking::HighCard(hi)
            | Ranking::OnePair(hi)
            | Ranking::FourOAK(hi)
            | Ranking::ThreeOAK(hi) => !u16::from(hi),
            Ranking::FullHouse(..)
            | Ranking::StraightFlush(..)
            | Ranking::Straight(..)
            | Ranking::Flush(..)
            | Ranking::MAX => unreachable!("category carries no kickers"),
        }
    }
}

impl std::fmt::Display for Ranking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ranking::MAX => unreachable!(),
            Ranking::HighCard(r) => write!(f, "high card, {r}"),
            Ranking::OnePair(r) => write!(f, "pair of {r}s"),
            Ranking::TwoPair(hi, lo) => write!(f, "two pair, {hi}s and {lo}s"),
            Ranking::ThreeOAK(r) => write!(f, "three of a kind, {r}s"),
            Ranking::Straight(r) => write!(f, "straight to {r}"),
            Ranking::Flush(r) => write!(f, "flush, {r} high"),
            Ranking::FullHouse(hi, lo) => write!(f, "full house, {hi}s over {lo}s"),
            Ranking::FourOAK(r) => write!(f, "four of a kind, {r}s"),
            Ranking::StraightFlush(r) => write!(f, "straight flush to {r}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rank;

    #[test]
    fn category_order_matches_spec_table() {
        assert!(Ranking::HighCard(Rank::Ace) < Ranking::OnePair(Rank::Two));
        assert!(Ranking::OnePair(Rank::Ace) < Ranking::TwoPair(Rank::Two, Rank::Three));
        assert!(Ranking::TwoPair(Rank::Ace, Rank::King) < Ranking::ThreeOAK(Rank::Two));
        assert!(Ranking::ThreeOAK(Rank::Ace) < Ranking::Straight(Rank::Five));
        assert!(Ranking::Straight(Rank::Ace) < Ranking::Flush(Rank::Two));
        assert!(Ranking::Flush(Rank::Ace) < Ranking::FullHouse(Rank::Two, Rank::Three));
        assert!(Ranking::FullHouse(Rank::Ace, Rank::King) < Ranking::FourOAK(Rank::Two));
        assert!(Ranking::FourOAK(Rank::Ace) < Ranking::StraightFlush(Rank::Two));
        assert!(Ranking::StraightFlush(Rank::Ace) < Ranking::MAX);
    }

    #[test]
    fn wheel_straight_ranks_below_six_high_straight() {
        assert!(Ranking::Straight(Rank::Five) < Ranking::Straight(Rank::Six));
    }
}
