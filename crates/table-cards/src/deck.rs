use super::card::Card;
use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// The 52-card universe, minus whatever has already been dealt. `draw()` takes from
/// the top (the end of `cards`, so `draw` is an O(1) `pop`).
///
/// Shuffling draws from `OsRng` rather than a userspace PRNG: a predictable deck is a
/// game-integrity failure, not merely a UX concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// A freshly shuffled 52-card deck.
    pub fn new() -> Self {
        let mut cards: Vec<Card> = (0..52u8).map(Card::from).collect();
        cards.shuffle(&mut OsRng);
        Self { cards }
    }

    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Draws `n` cards, or fails without mutating `self` if fewer than `n` remain.
    pub fn draw_many(&mut self, n: usize) -> Option<Vec<Card>> {
        if self.cards.len() < n {
            return None;
        }
        Some((0..n).filter_map(|_| self.draw()).collect())
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_deck_has_52_distinct_cards() {
        let deck = Deck::new();
        assert_eq!(deck.remaining(), 52);
        let mut seen = std::collections::HashSet::new();
        for card in &deck.cards {
            assert!(seen.insert(*card), "duplicate card {card} in fresh deck");
        }
    }

    #[test]
    fn draw_many_is_atomic_on_failure() {
        let mut deck = Deck::new();
        assert!(deck.draw_many(60).is_none());
        assert_eq!(deck.remaining(), 52);
    }

    #[test]
    fn draw_many_consumes_from_top() {
        let mut deck = Deck::new();
        let drawn = deck.draw_many(5).unwrap();
        assert_eq!(drawn.len(), 5);
        assert_eq!(deck.remaining(), 47);
    }
}
