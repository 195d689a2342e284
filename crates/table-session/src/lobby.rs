use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use table_persistence::{HistoryRepository, SnapshotStore, TableKey};

use crate::actor::TableActor;
use crate::command::TableHandle;
use crate::config::TableConfig;

/// Creates and tracks running table actors, keyed by table id: one table actor per
/// seated game, started on demand and closed once its players leave.
pub struct Lobby<S: SnapshotStore + Clone + Send + Sync + 'static, H: HistoryRepository + Clone + Send + Sync + 'static> {
    config: TableConfig,
    store: S,
    history: H,
    tables: RwLock<HashMap<TableKey, TableHandle>>,
}

impl<S: SnapshotStore + Clone + Send + Sync + 'static, H: HistoryRepository + Clone + Send + Sync + 'static> Lobby<S, H> {
    pub fn new(config: TableConfig, store: S, history: H) -> Self {
        Self { config, store, history, tables: RwLock::new(HashMap::new()) }
    }

    /// Starts a fresh table and returns its id. If a snapshot already exists under a
    /// freshly-minted id (astronomically unlikely, but checked rather than assumed),
    /// that snapshot is resumed instead of overwritten.
    pub async fn start(self: &Arc<Self>) -> anyhow::Result<TableKey> {
        let id = TableKey::default();
        self.spawn(id).await?;
        log::info!("lobby: started table {id}");
        Ok(id)
    }

    /// Restores a table from its last snapshot. Used at
    /// process startup to bring previously-running tables back without re-dealing.
    pub async fn resume(self: &Arc<Self>, id: TableKey) -> anyhow::Result<()> {
        self.spawn(id).await
    }

    async fn spawn(&self, id: TableKey) -> anyhow::Result<()> {
        let restored = self.store.get(id).await?;
        let handle = TableActor::spawn(id, self.config, self.store.clone(), self.history.clone(), restored);
        self.tables.write().await.insert(id, handle);
        Ok(())
    }

    /// Drops the lobby's reference to a table. The actor task itself keeps running
    /// until every outstanding `TableHandle` clone (e.g. a still-bridging socket) is
    /// also dropped -- closing is "stop offering new connections", not "kill now".
    pub async fn close(&self, id: TableKey) -> anyhow::Result<()> {
        self.tables.write().await.remove(&id).map(|_| ()).ok_or_else(|| anyhow::anyhow!("table not found"))
    }

    pub async fn handle(&self, id: TableKey) -> Option<TableHandle> {
        self.tables.read().await.get(&id).cloned()
    }
}
