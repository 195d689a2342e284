/// Named position at the table relative to the dealer button. Optional enrichment
/// used for log lines only, never serialized onto the wire in place of a plain seat
/// index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionName {
    Button,
    SmallBlind,
    BigBlind,
    UnderTheGun(usize),
    Middle(usize),
    Hijack,
    Cutoff,
}

impl PositionName {
    pub fn from_seat(seat: usize, dealer: usize, ring: usize) -> Self {
        let offset = (seat + ring - dealer) % ring;
        match ring {
            2 => match offset {
                0 => Self::Button,
                _ => Self::BigBlind,
            },
            6 => match offset {
                0 => Self::Button,
                1 => Self::SmallBlind,
                2 => Self::BigBlind,
                3 => Self::UnderTheGun(0),
                4 => Self::Hijack,
                _ => Self::Cutoff,
            },
            _ => match offset {
                0 => Self::Button,
                1 => Self::SmallBlind,
                2 => Self::BigBlind,
                3 => Self::UnderTheGun(0),
                4 => Self::UnderTheGun(1),
                5 => Self::Middle(0),
                6 => Self::Middle(1),
                7 => Self::Hijack,
                _ => Self::Cutoff,
            },
        }
    }
}

impl std::fmt::Display for PositionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Button => write!(f, "BTN"),
            Self::SmallBlind => write!(f, "SB"),
            Self::BigBlind => write!(f, "BB"),
            Self::UnderTheGun(0) => write!(f, "UTG"),
            Self::UnderTheGun(n) => write!(f, "UTG+{n}"),
            Self::Middle(0) => write!(f, "MP"),
            Self::Middle(n) => write!(f, "MP+{n}"),
            Self::Hijack => write!(f, "HJ"),
            Self::Cutoff => write!(f, "CO"),
        }
    }
}
