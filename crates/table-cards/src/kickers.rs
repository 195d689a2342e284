/// The kicker ranks that break a tie within a [`crate::Ranking`] category, packed as a
/// rank bitmask. Comparing two `Kickers` as plain integers already gives the correct
/// lexicographic "highest kicker wins" ordering, since a higher-rank kicker sets a more
/// significant bit than any combination of lower ones.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, PartialOrd, Ord, serde::Serialize)]
pub struct Kickers(u16);

impl From<u16> for Kickers {
    fn from(mask: u16) -> Self {
        Self(mask)
    }
}
impl From<Kickers> for u16 {
    fn from(kickers: Kickers) -> Self {
        kickers.0
    }
}

impl std::fmt::Display for Kickers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:013b}", self.0)
    }
}
