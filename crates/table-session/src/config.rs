use std::time::Duration;

use table_core::Chips;

/// Table-wide configuration, constructed from environment variables at process start.
#[derive(Debug, Clone, Copy)]
pub struct TableConfig {
    pub seats: usize,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub starting_stack: Chips,
    pub min_players: usize,
    pub action_timeout: Duration,
    pub reconnect_window: Duration,
    pub showdown_delay: Duration,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            seats: table_core::SEATS,
            small_blind: table_core::SMALL_BLIND,
            big_blind: table_core::BIG_BLIND,
            starting_stack: table_core::STARTING_STACK,
            min_players: table_core::MIN_PLAYERS,
            action_timeout: Duration::from_millis(table_core::ACTION_TIMEOUT_MS),
            reconnect_window: Duration::from_secs(table_core::RECONNECT_WINDOW_SECS),
            showdown_delay: Duration::from_millis(table_core::SHOWDOWN_DELAY_MS),
        }
    }
}

impl TableConfig {
    /// Reads overrides from the environment, falling back to `Default` for anything
    /// unset or unparsable. Unparsable values are logged and ignored rather than
    /// failing startup -- a malformed override should not take the process down.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(v) = env_usize("TABLE_SEATS") {
            config.seats = v;
        }
        if let Some(v) = env_chips("TABLE_SMALL_BLIND") {
            config.small_blind = v;
        }
        if let Some(v) = env_chips("TABLE_BIG_BLIND") {
            config.big_blind = v;
        }
        if let Some(v) = env_chips("TABLE_STARTING_STACK") {
            config.starting_stack = v;
        }
        if let Some(v) = env_usize("TABLE_MIN_PLAYERS") {
            config.min_players = v;
        }
        if let Some(v) = env_millis("TABLE_ACTION_TIMEOUT_MS") {
            config.action_timeout = v;
        }
        if let Some(v) = env_secs("TABLE_RECONNECT_WINDOW_SECS") {
            config.reconnect_window = v;
        }
        if let Some(v) = env_millis("TABLE_SHOWDOWN_DELAY_MS") {
            config.showdown_delay = v;
        }
        config
    }
}

fn env_usize(key: &str) -> Option<usize> {
    parse_env(key)
}
fn env_chips(key: &str) -> Option<Chips> {
    parse_env(key)
}
fn env_millis(key: &str) -> Option<Duration> {
    parse_env::<u64>(key).map(Duration::from_millis)
}
fn env_secs(key: &str) -> Option<Duration> {
    parse_env::<u64>(key).map(Duration::from_secs)
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    match std::env::var(key) {
        Ok(raw) => raw.parse().ok().or_else(|| {
            log::warn!("ignoring unparsable {key}={raw}");
            None
        }),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_spec_scenarios() {
        let config = TableConfig::default();
        assert_eq!(config.seats, 6);
        assert_eq!(config.small_blind, 1);
        assert_eq!(config.big_blind, 2);
        assert_eq!(config.starting_stack, 1000);
        assert_eq!(config.min_players, 2);
        assert_eq!(config.action_timeout, Duration::from_secs(10));
        assert_eq!(config.reconnect_window, Duration::from_secs(60));
    }
}
