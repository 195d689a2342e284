use super::card::Card;
use super::hand::Hand;
use super::kickers::Kickers;
use super::rank::Rank;
use super::ranking::Ranking;
use super::strength::Strength;
use super::suit::Suit;

/// Evaluates the best 5-card value reachable from an arbitrary hand (2 hole cards
/// unioned with up to 5 board cards). Rather than enumerating all C(7,5)=21 five-card
/// combinations, this scans category-by-category directly over the bitmask union --
/// the same result, computed without ever materializing a combination.
pub struct Evaluator(Hand);

impl From<Hand> for Evaluator {
    fn from(hand: Hand) -> Self {
        Self(hand)
    }
}

impl FromIterator<Card> for Evaluator {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Evaluator {
    /// The best achievable `Strength`, combining category and kickers.
    pub fn strength(&self) -> Strength {
        let ranking = self.find_ranking();
        let kickers = self.find_kickers(ranking);
        Strength::from((ranking, kickers))
    }

    fn find_ranking(&self) -> Ranking {
        None.or_else(|| self.find_flush())
            .or_else(|| self.find_4_oak())
            .or_else(|| self.find_3_oak_2_oak())
            .or_else(|| self.find_straight())
            .or_else(|| self.find_3_oak())
            .or_else(|| self.find_2_oak_2_oak())
            .or_else(|| self.find_2_oak())
            .or_else(|| self.find_1_oak())
            .expect("at least one card in hand")
    }

    fn find_kickers(&self, value: Ranking) -> Kickers {
        let n = value.n_kickers();
        if n == 0 {
            return Kickers::default();
        }
        let mask = value.mask();
        let mut bits = mask & self.rank_masks();
        while bits.count_ones() as usize > n {
            bits &= !(1 << bits.trailing_zeros());
        }
        Kickers::from(bits)
    }

    fn find_1_oak(&self) -> Option<Ranking> {
        self.find_rank_of_n_oak(1).map(Ranking::HighCard)
    }
    fn find_2_oak(&self) -> Option<Ranking> {
        self.find_rank_of_n_oak(2).map(Ranking::OnePair)
    }
    fn find_3_oak(&self) -> Option<Ranking> {
        self.find_rank_of_n_oak(3).map(Ranking::ThreeOAK)
    }
    fn find_4_oak(&self) -> Option<Ranking> {
        self.find_rank_of_n_oak(4).map(Ranking::FourOAK)
    }
    fn find_2_oak_2_oak(&self) -> Option<Ranking> {
        self.find_rank_of_n_oak(2).and_then(|hi| {
            self.find_rank_of_n_oak_under(2, Some(hi))
                .map(|lo| Ranking::TwoPair(hi, lo))
                .or(Some(Ranking::OnePair(hi)))
        })
    }
    fn find_3_oak_2_oak(&self) -> Option<Ranking> {
        self.find_rank_of_n_oak(3).and_then(|trips| {
            self.find_rank_of_n_oak_excluding(2, trips)
                .map(|pair| Ranking::FullHouse(trips, pair))
        })
    }
    fn find_straight(&self) -> Option<Ranking> {
        self.find_rank_of_straight(self.rank_masks()).map(Ranking::Straight)
    }
    fn find_flush(&self) -> Option<Ranking> {
        self.find_suit_of_flush().and_then(|suit| {
            self.find_rank_of_straight_flush(suit)
                .map(Ranking::StraightFlush)
                .or_else(|| {
                    let bits = self.suit_masks()[suit as usize];
                    Some(Ranking::Flush(Rank::from(bits)))
                })
        })
    }

    fn find_rank_of_straight(&self, hand: u16) -> Option<Rank> {
        const WHEEL: u16 = 0b_1_0000_0000_1111;
        let mut bits = hand;
        bits &= bits << 1;
        bits &= bits << 1;
        bits &= bits << 1;
        bits &= bits << 1;
        if bits > 0 {
            Some(Rank::from(bits))
        } else if WHEEL == (WHEEL & hand) {
            Some(Rank::Five)
        } else {
            None
        }
    }
    fn find_rank_of_straight_flush(&self, suit: Suit) -> Option<Rank> {
        self.find_rank_of_straight(self.suit_masks()[suit as usize])
    }
    fn find_suit_of_flush(&self) -> Option<Suit> {
        self.suit_count().iter().position(|&n| n >= 5).map(|i| Suit::from(i as u8))
    }
    fn find_rank_of_n_oak_under(&self, oak: usize, under: Option<Rank>) -> Option<Rank> {
        let ceiling = under.map(|r| r as u8).unwrap_or(13) as u64;
        let below = (1u64 << (4 * ceiling)) - 1;
        let hand = u64::from(self.0) & below;
        let mut window = 0b_1111_u64 << (4 * ceiling) >> 4;
        while window > 0 {
            if oak <= (hand & window).count_ones() as usize {
                return Some(Rank::from((window.trailing_zeros() / 4) as u8));
            }
            window >>= 4;
        }
        None
    }
    fn find_rank_of_n_oak(&self, n: usize) -> Option<Rank> {
        self.find_rank_of_n_oak_under(n, None)
    }
    /// Highest rank other than `exclude` with at least `oak` cards. Unlike
    /// `find_rank_of_n_oak_under`, this scans the *entire* rank range (not just below a
    /// ceiling) with one rank's bits masked out -- needed for full-house detection,
    /// where the trip rank found first is not necessarily the highest "at least two"
    /// rank, so a pair sitting *above* the trips (e.g. trips of twos, pair of aces)
    /// must still be found.
    fn find_rank_of_n_oak_excluding(&self, oak: usize, exclude: Rank) -> Option<Rank> {
        let hand = u64::from(self.0) & !(0b1111u64 << (4 * exclude as u8));
        let mut window = 0b1111u64 << (4 * 12);
        while window > 0 {
            if oak <= (hand & window).count_ones() as usize {
                return Some(Rank::from((window.trailing_zeros() / 4) as u8));
            }
            window >>= 4;
        }
        None
    }

    /// Which ranks are present in the hand, independent of suit.
    fn rank_masks(&self) -> u16 {
        self.0.cards().iter().map(|c| u16::from(c.rank())).fold(0, |acc, r| acc | r)
    }
    /// How many cards of each suit are in the hand, independent of rank.
    fn suit_count(&self) -> [u8; 4] {
        self.0.cards().iter().fold([0; 4], |mut counts, c| {
            counts[c.suit() as usize] += 1;
            counts
        })
    }
    /// Which ranks are present in the hand, grouped by suit.
    fn suit_masks(&self) -> [u16; 4] {
        self.0.cards().iter().fold([0; 4], |mut suits, c| {
            suits[c.suit() as usize] |= u16::from(c.rank());
            suits
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Rank, Suit};

    fn evaluate(cards: Vec<(Rank, Suit)>) -> Ranking {
        cards
            .into_iter()
            .map(|(r, s)| Card::new(r, s))
            .collect::<Evaluator>()
            .find_ranking()
    }

    #[test]
    fn high_card() {
        let hand = vec![
            (Rank::Ace, Suit::Spade),
            (Rank::King, Suit::Heart),
            (Rank::Queen, Suit::Diamond),
            (Rank::Jack, Suit::Club),
            (Rank::Nine, Suit::Spade),
        ];
        assert_eq!(evaluate(hand), Ranking::HighCard(Rank::Ace));
    }

    #[test]
    fn two_pair_over_seven_cards() {
        let hand = vec![
            (Rank::Ace, Suit::Spade),
            (Rank::Ace, Suit::Heart),
            (Rank::King, Suit::Diamond),
            (Rank::King, Suit::Club),
            (Rank::Queen, Suit::Spade),
            (Rank::Jack, Suit::Heart),
            (Rank::Nine, Suit::Diamond),
        ];
        assert_eq!(evaluate(hand), Ranking::TwoPair(Rank::Ace, Rank::King));
    }

    #[test]
    fn full_house_with_trips_below_the_pair() {
        // Trips at the lowest rank, pair at the highest -- the trip rank found first
        // is not the table's best "at least two" rank, so the pair search has to look
        // past it rather than only below it.
        let hand = vec![
            (Rank::Two, Suit::Spade),
            (Rank::Two, Suit::Heart),
            (Rank::Two, Suit::Diamond),
            (Rank::Ace, Suit::Spade),
            (Rank::Ace, Suit::Heart),
            (Rank::King, Suit::Club),
            (Rank::Queen, Suit::Diamond),
        ];
        assert_eq!(evaluate(hand), Ranking::FullHouse(Rank::Two, Rank::Ace));
    }

    #[test]
    fn full_house_beats_flush() {
        let hand = vec![
            (Rank::Ace, Suit::Spade),
            (Rank::Ace, Suit::Heart),
            (Rank::Ace, Suit::Diamond),
            (Rank::King, Suit::Spade),
            (Rank::King, Suit::Heart),
            (Rank::Queen, Suit::Spade),
            (Rank::Jack, Suit::Spade),
        ];
        assert_eq!(evaluate(hand), Ranking::FullHouse(Rank::Ace, Rank::King));
    }

    #[test]
    fn wheel_straight() {
        let hand = vec![
            (Rank::Ace, Suit::Spade),
            (Rank::Two, Suit::Heart),
            (Rank::Three, Suit::Diamond),
            (Rank::Four, Suit::Club),
            (Rank::Five, Suit::Spade),
        ];
        assert_eq!(evaluate(hand), Ranking::Straight(Rank::Five));
    }

    #[test]
    fn wheel_straight_flush() {
        let hand = vec![
            (Rank::Ace, Suit::Spade),
            (Rank::Two, Suit::Spade),
            (Rank::Three, Suit::Spade),
            (Rank::Four, Suit::Spade),
            (Rank::Five, Suit::Spade),
        ];
        assert_eq!(evaluate(hand), Ranking::StraightFlush(Rank::Five));
    }

    #[test]
    fn straight_flush_beats_quads() {
        let hand = vec![
            (Rank::Ten, Suit::Spade),
            (Rank::Jack, Suit::Spade),
            (Rank::Queen, Suit::Spade),
            (Rank::King, Suit::Spade),
            (Rank::Ace, Suit::Spade),
            (Rank::Ace, Suit::Heart),
            (Rank::Ace, Suit::Diamond),
        ];
        assert_eq!(evaluate(hand), Ranking::StraightFlush(Rank::Ace));
    }

    #[test]
    fn kicker_ordering_breaks_pair_ties() {
        let a = vec![
            (Rank::Ace, Suit::Spade),
            (Rank::Ace, Suit::Heart),
            (Rank::King, Suit::Diamond),
            (Rank::Queen, Suit::Club),
            (Rank::Two, Suit::Spade),
        ]
        .into_iter()
        .map(|(r, s)| Card::new(r, s))
        .collect::<Evaluator>()
        .strength();
        let b = vec![
            (Rank::Ace, Suit::Club),
            (Rank::Ace, Suit::Diamond),
            (Rank::King, Suit::Heart),
            (Rank::Jack, Suit::Spade),
            (Rank::Two, Suit::Heart),
        ]
        .into_iter()
        .map(|(r, s)| Card::new(r, s))
        .collect::<Evaluator>()
        .strength();
        assert!(a > b, "queen kicker should beat jack kicker with equal pair");
    }
}
