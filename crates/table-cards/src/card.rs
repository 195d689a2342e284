use super::rank::Rank;
use super::suit::Suit;
use serde::{Deserialize, Serialize};

/// One of 52 distinct playing cards. Isomorphic to a `u8` (`rank * 4 + suit`) and to a
/// single set bit of a 64-bit `Hand` bitset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }

    pub fn to_int(&self) -> u8 {
        (self.rank as u8) * 4 + (self.suit as u8)
    }

    pub fn to_bits(&self) -> u64 {
        1u64 << self.to_int()
    }
}

impl From<Card> for u8 {
    fn from(c: Card) -> Self {
        c.to_int()
    }
}

impl From<u8> for Card {
    fn from(n: u8) -> Self {
        Self {
            rank: Rank::from(n / 4),
            suit: Suit::from(n % 4),
        }
    }
}

impl From<Card> for u64 {
    fn from(c: Card) -> Self {
        c.to_bits()
    }
}

impl From<u64> for Card {
    fn from(bits: u64) -> Self {
        debug_assert_eq!(bits.count_ones(), 1, "a Card is exactly one set bit");
        Card::from(bits.trailing_zeros() as u8)
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl std::str::FromStr for Card {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let rank = chars
            .next()
            .ok_or_else(|| anyhow::anyhow!("empty card string"))?;
        let suit = chars
            .next()
            .ok_or_else(|| anyhow::anyhow!("card string missing suit"))?;
        if chars.next().is_some() {
            anyhow::bail!("card string '{s}' has trailing characters");
        }
        Ok(Card::new(Rank::try_from(rank)?, Suit::try_from(suit)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bijective_u8() {
        for n in 0..52u8 {
            let card = Card::from(n);
            assert_eq!(u8::from(card), n);
        }
    }

    #[test]
    fn display_and_parse_roundtrip() {
        let card = Card::new(Rank::Ace, Suit::Spade);
        assert_eq!(card.to_string(), "As");
        assert_eq!("As".parse::<Card>().unwrap(), card);
    }
}
