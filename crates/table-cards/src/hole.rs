use super::card::Card;
use serde::{Deserialize, Serialize};

/// The two private cards dealt to an occupied seat. Empty outside a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hole(Card, Card);

impl Hole {
    pub fn new(first: Card, second: Card) -> Self {
        Self(first, second)
    }

    pub fn cards(&self) -> [Card; 2] {
        [self.0, self.1]
    }
}

impl std::fmt::Display for Hole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.0, self.1)
    }
}
