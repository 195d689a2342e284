use tokio::sync::{mpsc::UnboundedSender, oneshot};

use table_engine::{Action, TableError};

use crate::identity::Identity;
use crate::protocol::ServerMessage;

/// Everything that can mutate a table, funneled through one channel so the table
/// actor is the single serializer. Timer fires travel through the same channel
/// as client-originated commands -- the action timer is just another message on the
/// same command channel the serializer already consumes.
pub enum TableCommand {
    /// A brand-new identity taking an empty seat.
    Sit {
        seat_index: usize,
        identity: Identity,
        outbox: UnboundedSender<ServerMessage>,
        reply: oneshot::Sender<Result<(), TableError>>,
    },
    /// A previously-disconnected identity reauthenticating within the reclaim window.
    Rebind {
        identity: Identity,
        outbox: UnboundedSender<ServerMessage>,
        reply: oneshot::Sender<Result<usize, TableError>>,
    },
    Action {
        seat_index: usize,
        identity: Identity,
        action: Action,
        reply: oneshot::Sender<Result<(), TableError>>,
    },
    Leave {
        seat_index: usize,
        identity: Identity,
        reply: oneshot::Sender<Result<(), TableError>>,
    },
    /// The socket bound to this seat closed. Not an error: the seat enters its
    /// reclaim window.
    Disconnected { seat_index: usize },
    /// Fired by the scheduled action-timeout task; ignored unless `generation` still
    /// matches the live timer for this seat.
    ActionTimerFired { seat_index: usize, generation: u64 },
    /// Fired after the reconnect window for a disconnected seat elapses; vacates the
    /// seat unless it was rebound in the meantime.
    ReclaimExpired { seat_index: usize },
    /// Fired after the post-showdown pause; starts the next hand if enough seats
    /// remain occupied.
    ShowdownPauseElapsed { generation: u64 },
}

/// A cloneable, cheaply-shareable front door to a running table actor.
#[derive(Clone)]
pub struct TableHandle {
    commands: UnboundedSender<TableCommand>,
}

impl TableHandle {
    pub fn new(commands: UnboundedSender<TableCommand>) -> Self {
        Self { commands }
    }

    pub async fn sit(
        &self,
        seat_index: usize,
        identity: Identity,
        outbox: UnboundedSender<ServerMessage>,
    ) -> Result<(), TableError> {
        let (reply, recv) = oneshot::channel();
        self.send(TableCommand::Sit { seat_index, identity, outbox, reply });
        recv.await.unwrap_or(Err(TableError::InvariantViolation("table actor gone".into())))
    }

    pub async fn rebind(
        &self,
        identity: Identity,
        outbox: UnboundedSender<ServerMessage>,
    ) -> Result<usize, TableError> {
        let (reply, recv) = oneshot::channel();
        self.send(TableCommand::Rebind { identity, outbox, reply });
        recv.await.unwrap_or(Err(TableError::InvariantViolation("table actor gone".into())))
    }

    pub async fn act(&self, seat_index: usize, identity: Identity, action: Action) -> Result<(), TableError> {
        let (reply, recv) = oneshot::channel();
        self.send(TableCommand::Action { seat_index, identity, action, reply });
        recv.await.unwrap_or(Err(TableError::InvariantViolation("table actor gone".into())))
    }

    pub async fn leave(&self, seat_index: usize, identity: Identity) -> Result<(), TableError> {
        let (reply, recv) = oneshot::channel();
        self.send(TableCommand::Leave { seat_index, identity, reply });
        recv.await.unwrap_or(Err(TableError::InvariantViolation("table actor gone".into())))
    }

    pub fn disconnected(&self, seat_index: usize) {
        self.send(TableCommand::Disconnected { seat_index });
    }

    pub fn send_action_timer_fired(&self, seat_index: usize, generation: u64) {
        self.send(TableCommand::ActionTimerFired { seat_index, generation });
    }

    pub fn send_reclaim_expired(&self, seat_index: usize) {
        self.send(TableCommand::ReclaimExpired { seat_index });
    }

    pub fn send_showdown_elapsed(&self, generation: u64) {
        self.send(TableCommand::ShowdownPauseElapsed { generation });
    }

    fn send(&self, command: TableCommand) {
        if self.commands.send(command).is_err() {
            log::error!("table actor channel closed; command dropped");
        }
    }
}
