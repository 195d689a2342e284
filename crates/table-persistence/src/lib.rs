//! Durable storage for the table engine: full-state snapshots for crash/restart
//! recovery, and hand-history recording for completed hands. Nothing in this crate
//! drives game logic -- it only reads and writes what `table-engine` hands it.

mod history;
mod schema;
mod snapshot;

pub use history::{HandRecord, HistoryRepository, NoopHistory, Participant, Play};
pub use schema::MIGRATIONS;
pub use snapshot::{MemorySnapshots, PostgresSnapshots, SnapshotStore, TableKey};
