use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use table_core::ID;
use table_engine::Table;

use crate::schema;

/// Identity of the table a snapshot belongs to. Minted by the session layer when a
/// table is created; a table has no notion of its own id, which stays opaque to
/// every other consumer.
pub type TableKey = ID<Table>;

/// Durable checkpoint of a table's full state, enough to resume an in-progress hand
/// after a process restart without re-dealing or losing chips.
/// A second write for the same key supersedes the first -- last-write-wins.
#[allow(async_fn_in_trait)]
pub trait SnapshotStore {
    async fn put(&self, id: TableKey, table: &Table) -> Result<()>;
    async fn get(&self, id: TableKey) -> Result<Option<Table>>;
}

/// Postgres-backed snapshot store: one row per table, the whole `Table` serialized to
/// jsonb. Uses the same `&'static str`-constants-plus-`tokio_postgres` pattern as
/// `schema.rs`, simplified to the single read/write pair a snapshot needs instead of
/// bulk-COPY machinery.
#[derive(Clone)]
pub struct PostgresSnapshots {
    client: Arc<tokio_postgres::Client>,
}

impl PostgresSnapshots {
    pub fn new(client: Arc<tokio_postgres::Client>) -> Self {
        Self { client }
    }

    pub async fn migrate(&self) -> Result<()> {
        self.client.batch_execute(schema::CREATE_TABLES).await.context("create tables schema")?;
        Ok(())
    }
}

impl SnapshotStore for PostgresSnapshots {
    async fn put(&self, id: TableKey, table: &Table) -> Result<()> {
        let state = serde_json::to_value(table).context("serialize table snapshot")?;
        self.client
            .execute(
                const_format::concatcp!(
                    "INSERT INTO ",
                    schema::TABLES,
                    " (id, state, updated_at) VALUES ($1, $2, now())
                     ON CONFLICT (id) DO UPDATE SET state = EXCLUDED.state, updated_at = now()"
                ),
                &[&id.inner(), &state],
            )
            .await
            .context("write table snapshot")?;
        Ok(())
    }

    async fn get(&self, id: TableKey) -> Result<Option<Table>> {
        let row = self
            .client
            .query_opt(
                const_format::concatcp!("SELECT state FROM ", schema::TABLES, " WHERE id = $1"),
                &[&id.inner()],
            )
            .await
            .context("read table snapshot")?;
        row.map(|row| {
            let state: serde_json::Value = row.get(0);
            serde_json::from_value(state).context("deserialize table snapshot")
        })
        .transpose()
    }
}

/// In-memory fallback, used by tests and by a server run without a configured
/// database: persistence is optional, not load-bearing for a single-process
/// demo run. Wrapped in an `Arc` internally so one store can be shared across every
/// table actor in a lobby without the lobby needing to know it's in-memory.
#[derive(Default, Clone)]
pub struct MemorySnapshots {
    inner: Arc<Mutex<HashMap<TableKey, Table>>>,
}

impl MemorySnapshots {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshots {
    async fn put(&self, id: TableKey, table: &Table) -> Result<()> {
        self.inner.lock().expect("snapshot map lock").insert(id, table.clone());
        Ok(())
    }

    async fn get(&self, id: TableKey) -> Result<Option<Table>> {
        Ok(self.inner.lock().expect("snapshot map lock").get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_round_trips_a_snapshot() {
        let store = MemorySnapshots::new();
        let id = TableKey::default();
        let table = Table::new(6, 1, 2, 2);
        store.put(id, &table).await.unwrap();
        let restored = store.get(id).await.unwrap().expect("present");
        assert_eq!(restored.ring_size(), table.ring_size());
    }

    #[tokio::test]
    async fn memory_store_returns_none_for_unknown_key() {
        let store = MemorySnapshots::new();
        assert!(store.get(TableKey::default()).await.unwrap().is_none());
    }
}
