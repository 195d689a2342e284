use super::kickers::Kickers;
use super::ranking::Ranking;

/// A fully-ordered hand value: category first, then kickers. Comparison is
/// element-wise with missing positions treated as 0, which `Ranking`'s derived `Ord`
/// already gives for free, since it dominates `Kickers` whenever the categories differ.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, serde::Serialize)]
pub struct Strength(Ranking, Kickers);

impl From<(Ranking, Kickers)> for Strength {
    fn from((ranking, kickers): (Ranking, Kickers)) -> Self {
        Self(ranking, kickers)
    }
}

impl Strength {
    pub fn ranking(&self) -> Ranking {
        self.0
    }

    pub fn kickers(&self) -> Kickers {
        self.1
    }
}

impl std::fmt::Display for Strength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
