mod arbitrary;
mod constants;
mod id;
mod runtime;

pub use arbitrary::Arbitrary;
pub use constants::*;
pub use id::ID;
#[cfg(feature = "server")]
pub use runtime::{brb, interrupted, kys, log};

/// Zero-based seat index within a table's ring.
pub type Seat = usize;
/// Chip count. Signed so intermediate arithmetic (e.g. pnl) never underflows awkwardly,
/// though a valid stack or pot is never negative.
pub type Chips = i64;
