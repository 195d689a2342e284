//! Table names and `CREATE TABLE` DDL: `&'static str` constants combined at compile
//! time with `const_format::concatcp!` so there is never a runtime string-formatting
//! cost for SQL that never changes.

pub const TABLES: &str = "tables";
pub const HANDS: &str = "hands";
pub const PLAYERS: &str = "players";
pub const ACTIONS: &str = "actions";

/// One row per table, keyed by its id, holding the entire `Table` snapshot as jsonb.
/// Deliberately a single opaque blob column rather than one column per field: the
/// hand-history tables below are column-per-field because that history is queried by
/// field, but a live snapshot is only ever read back whole.
pub const CREATE_TABLES: &str = const_format::concatcp!(
    "CREATE TABLE IF NOT EXISTS ",
    TABLES,
    " (
        id          UUID PRIMARY KEY,
        state       JSONB NOT NULL,
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    );"
);

pub const CREATE_HANDS: &str = const_format::concatcp!(
    "CREATE TABLE IF NOT EXISTS ",
    HANDS,
    " (
        id          UUID PRIMARY KEY,
        table_id    UUID NOT NULL,
        board       BIGINT NOT NULL,
        pot         BIGINT NOT NULL,
        dealer      SMALLINT NOT NULL
    );"
);

pub const CREATE_PLAYERS: &str = const_format::concatcp!(
    "CREATE TABLE IF NOT EXISTS ",
    PLAYERS,
    " (
        hand_id     UUID NOT NULL REFERENCES ",
    HANDS,
    "(id) ON DELETE CASCADE,
        identity    TEXT NOT NULL,
        seat        SMALLINT NOT NULL,
        hole        BIGINT NOT NULL,
        stack       BIGINT NOT NULL,
        showed      BOOLEAN NOT NULL DEFAULT FALSE,
        mucked      BOOLEAN NOT NULL DEFAULT FALSE,
        PRIMARY KEY (hand_id, seat)
    );"
);

pub const CREATE_ACTIONS: &str = const_format::concatcp!(
    "CREATE TABLE IF NOT EXISTS ",
    ACTIONS,
    " (
        hand_id     UUID NOT NULL REFERENCES ",
    HANDS,
    "(id) ON DELETE CASCADE,
        seq         INTEGER NOT NULL,
        identity    TEXT,
        encoded     TEXT NOT NULL,
        PRIMARY KEY (hand_id, seq)
    );"
);

pub const MIGRATIONS: &[&str] = &[CREATE_TABLES, CREATE_HANDS, CREATE_PLAYERS, CREATE_ACTIONS];
