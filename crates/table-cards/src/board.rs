use super::card::Card;
use serde::{Deserialize, Serialize};

/// The shared community cards: 0 before the flop, up to 5 by the river.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Board {
    cards: Vec<Card>,
}

impl Board {
    pub fn new() -> Self {
        Self { cards: Vec::with_capacity(5) }
    }

    pub fn push(&mut self, card: Card) {
        assert!(self.cards.len() < 5, "board cannot hold more than 5 cards");
        self.cards.push(card);
    }

    pub fn extend(&mut self, cards: impl IntoIterator<Item = Card>) {
        cards.into_iter().for_each(|c| self.push(c));
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for card in &self.cards {
            write!(f, "{card} ")?;
        }
        Ok(())
    }
}
