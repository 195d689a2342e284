//! Defaults for a fresh `TableConfig`. Overridable by the embedding binary via env vars;
//! see `table-session::config`.

/// Ring size for a standard table.
pub const SEATS: usize = 6;
pub const MIN_PLAYERS: usize = 2;

pub const SMALL_BLIND: i64 = 1;
pub const BIG_BLIND: i64 = 2;
pub const STARTING_STACK: i64 = 1000;

pub const ACTION_TIMEOUT_MS: u64 = 10_000;
pub const SHOWDOWN_DELAY_MS: u64 = 2_000;
pub const RECONNECT_WINDOW_SECS: u64 = 60;
