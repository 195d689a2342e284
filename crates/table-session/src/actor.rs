use std::time::Duration;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tokio::sync::oneshot;

use table_engine::{Action, Arbiter, Sequencer, Showdown, SocketId, Stage, Table, TableError};
use table_persistence::{HandRecord, HistoryRepository, SnapshotStore, TableKey};

use crate::command::{TableCommand, TableHandle};
use crate::config::TableConfig;
use crate::identity::Identity;
use crate::protocol::{PotWinners, ServerMessage, ShowdownExtras};
use crate::registry::SocketRegistry;
use crate::timer::{Timer, TimerConfig};

/// The single serializer for one table: a dedicated `tokio::task` consuming an `mpsc`
/// command channel. Every state-mutating operation -- a client
/// command or a timer firing -- arrives as a `TableCommand` on one channel and is
/// handled to completion before the next is read, which is what makes "no two
/// mutations observe an interleaved state" true without a lock.
pub struct TableActor<S: SnapshotStore, H: HistoryRepository> {
    id: TableKey,
    table: Table,
    registry: SocketRegistry,
    timer: Timer,
    config: TableConfig,
    snapshots: S,
    history: H,
    commands: UnboundedReceiver<TableCommand>,
    self_handle: TableHandle,
}

impl<S: SnapshotStore + Send + Sync + 'static, H: HistoryRepository + Send + Sync + 'static> TableActor<S, H> {
    /// Spawns the actor as a background task and returns the handle callers use to
    /// talk to it. `restored`, if given, is a snapshot loaded from the store at
    /// startup -- seating, cards, pot and stage resume
    /// exactly where they left off.
    pub fn spawn(id: TableKey, config: TableConfig, snapshots: S, history: H, restored: Option<Table>) -> TableHandle {
        let (tx, rx) = unbounded_channel();
        let handle = TableHandle::new(tx);
        let table = restored.unwrap_or_else(|| {
            Table::new(config.seats, config.small_blind, config.big_blind, config.min_players)
        });
        let actor = Self {
            id,
            table,
            registry: SocketRegistry::new(config.seats),
            timer: Timer::new(TimerConfig { action: config.action_timeout, showdown: config.showdown_delay }),
            config,
            snapshots,
            history,
            commands: rx,
            self_handle: handle.clone(),
        };
        tokio::spawn(actor.run());
        handle
    }

    async fn run(mut self) {
        while let Some(command) = self.commands.recv().await {
            self.handle(command).await;
        }
        log::info!("table {} actor stopped: command channel closed", self.id);
    }

    async fn handle(&mut self, command: TableCommand) {
        match command {
            TableCommand::Sit { seat_index, identity, outbox, reply } => {
                let result = self.sit(seat_index, identity, outbox).await;
                let _ = reply.send(result);
            }
            TableCommand::Rebind { identity, outbox, reply } => {
                let result = self.rebind(identity, outbox).await;
                let _ = reply.send(result);
            }
            TableCommand::Action { seat_index, identity, action, reply } => {
                let result = self.act(seat_index, identity, action).await;
                let _ = reply.send(result);
            }
            TableCommand::Leave { seat_index, identity, reply } => {
                let result = self.leave(seat_index, identity).await;
                let _ = reply.send(result);
            }
            TableCommand::Disconnected { seat_index } => self.on_disconnect(seat_index).await,
            TableCommand::ActionTimerFired { seat_index, generation } => {
                self.on_action_timer_fired(seat_index, generation).await
            }
            TableCommand::ReclaimExpired { seat_index } => self.on_reclaim_expired(seat_index).await,
            TableCommand::ShowdownPauseElapsed { generation } => {
                self.on_showdown_pause_elapsed(generation).await
            }
        }
    }

    // --- command handlers ----------------------------------------------------------

    async fn sit(
        &mut self,
        seat_index: usize,
        identity: Identity,
        outbox: tokio::sync::mpsc::UnboundedSender<ServerMessage>,
    ) -> Result<(), TableError> {
        if self.table.halted().is_some() {
            return Err(TableError::InvariantViolation(self.table.halted().unwrap().to_string()));
        }
        self.table.sit(seat_index, identity.to_string(), self.config.starting_stack)?;
        let socket = SocketId::default();
        self.table.seat_mut(seat_index).expect("just seated").bind(socket);
        self.registry.bind(seat_index, outbox.clone());
        outbox.send(ServerMessage::auth_ok(self.id, &identity)).ok();
        outbox.send(ServerMessage::sat(seat_index)).ok();

        self.maybe_start_hand().await;
        self.persist().await;
        self.broadcast_state();
        Ok(())
    }

    /// A previously-bound identity returning within its reclaim window.
    async fn rebind(
        &mut self,
        identity: Identity,
        outbox: tokio::sync::mpsc::UnboundedSender<ServerMessage>,
    ) -> Result<usize, TableError> {
        let seat_index = self.table.find_seat_by_identity(identity.as_str()).ok_or(TableError::UnknownIdentity)?;
        let socket = SocketId::default();
        self.table.seat_mut(seat_index).expect("found by identity").bind(socket);
        self.registry.bind(seat_index, outbox.clone());
        outbox.send(ServerMessage::auth_ok(self.id, &identity)).ok();
        outbox.send(ServerMessage::sat(seat_index)).ok();
        self.persist().await;
        self.broadcast_state();
        Ok(seat_index)
    }

    async fn act(&mut self, seat_index: usize, identity: Identity, action: Action) -> Result<(), TableError> {
        let seat = self.table.seat(seat_index).ok_or(TableError::SeatNotFound)?;
        if seat.identity() != identity.as_str() {
            return Err(TableError::UnknownIdentity);
        }
        Arbiter::apply(&mut self.table, seat_index, identity.as_str(), action)?;

        match self.table.stage() {
            Stage::Showdown => self.resolve_and_pause().await,
            _ => {
                if self.table.turn_index().is_some() {
                    self.timer.start_action();
                    self.schedule_action_timeout();
                } else {
                    self.timer.clear();
                }
            }
        }

        self.persist().await;
        self.broadcast_state();
        Ok(())
    }

    /// Between hands a seat simply empties. Mid-hand, leaving is modeled as folding
    /// first (so the hand the seat was dealt into still resolves correctly for
    /// everyone else) and then vacating -- there is no notion of "leaving" a seat that
    /// still owes an action to the pot.
    async fn leave(&mut self, seat_index: usize, identity: Identity) -> Result<(), TableError> {
        let seat = self.table.seat(seat_index).ok_or(TableError::SeatNotFound)?;
        if seat.identity() != identity.as_str() {
            return Err(TableError::UnknownIdentity);
        }
        if self.table.stage() != Stage::Waiting && seat.hole().is_some() && !seat.folded() {
            self.table.seat_mut(seat_index).expect("checked above").fold();
            if self.table.turn_index() == Some(seat_index) {
                Sequencer::progress(&mut self.table)?;
            }
            if self.table.stage() == Stage::Showdown {
                self.resolve_and_pause().await;
            }
        }
        self.table.vacate(seat_index)?;
        self.registry.unbind(seat_index);
        self.maybe_start_hand().await;
        self.persist().await;
        self.broadcast_state();
        Ok(())
    }

    async fn on_disconnect(&mut self, seat_index: usize) {
        self.registry.unbind(seat_index);
        if let Some(seat) = self.table.seat_mut(seat_index) {
            seat.unbind(self.config.reconnect_window);
        }
        self.broadcast_state();

        let handle = self.self_handle.clone();
        let window = self.config.reconnect_window;
        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            handle.send_reclaim_expired(seat_index);
        });
    }

    async fn on_reclaim_expired(&mut self, seat_index: usize) {
        let Some(seat) = self.table.seat(seat_index) else { return };
        if seat.is_connected() || !seat.reclaim_expired() {
            return;
        }
        if self.table.stage() != Stage::Waiting && seat.hole().is_some() && !seat.folded() {
            self.table.seat_mut(seat_index).expect("checked above").fold();
            if self.table.turn_index() == Some(seat_index) {
                if let Err(err) = Sequencer::progress(&mut self.table) {
                    self.table.halt(err.to_string());
                }
            }
            if self.table.stage() == Stage::Showdown {
                self.resolve_and_pause().await;
            }
        }
        if self.table.vacate(seat_index).is_ok() {
            log::info!("seat {seat_index} reclaimed after reconnect window lapsed");
        }
        self.maybe_start_hand().await;
        self.persist().await;
        self.broadcast_state();
    }

    /// Ignores a fire whose generation no longer matches the live timer -- it was
    /// superseded by a later action, a new turn, or a stage change.
    async fn on_action_timer_fired(&mut self, seat_index: usize, generation: u64) {
        if !self.timer.is_current(generation) {
            return;
        }
        if self.table.turn_index() != Some(seat_index) {
            return;
        }
        let Some(seat) = self.table.seat(seat_index) else { return };
        let to_call = self.table.current_bet_to_call() - seat.current_bet();
        let identity = seat.identity().to_string();
        let auto_action = if to_call == 0 { Action::Check } else { Action::Fold };

        if let Err(err) = Arbiter::apply(&mut self.table, seat_index, &identity, auto_action) {
            log::error!("auto-action on timeout for seat {seat_index} failed: {err}");
            return;
        }
        self.registry.broadcast(ServerMessage::auto_fold(seat_index));

        match self.table.stage() {
            Stage::Showdown => self.resolve_and_pause().await,
            _ => {
                if self.table.turn_index().is_some() {
                    self.timer.start_action();
                    self.schedule_action_timeout();
                } else {
                    self.timer.clear();
                }
            }
        }
        self.persist().await;
        self.broadcast_state();
    }

    async fn on_showdown_pause_elapsed(&mut self, generation: u64) {
        if !self.timer.is_current(generation) {
            return;
        }
        self.timer.clear();
        self.maybe_start_hand().await;
        self.persist().await;
        self.broadcast_state();
    }

    // --- internal helpers ------------------------------------------------------------

    async fn maybe_start_hand(&mut self) {
        if !Sequencer::can_start_hand(&self.table) {
            return;
        }
        if let Err(err) = Sequencer::start_hand(&mut self.table) {
            log::warn!("not starting hand: {err}");
            return;
        }
        self.timer.start_action();
        self.schedule_action_timeout();
    }

    /// Settles the hand, records it (best-effort), and schedules the pause
    /// before the next one can start.
    async fn resolve_and_pause(&mut self) {
        let dealer = self.table.dealer_index().unwrap_or(0);
        match Showdown::resolve(&mut self.table) {
            Ok(result) => {
                let extras = ShowdownExtras {
                    winners: result
                        .pots
                        .iter()
                        .enumerate()
                        .map(|(i, pot)| PotWinners::from((i, pot)))
                        .collect(),
                };
                self.registry.broadcast(ServerMessage::table_state(
                    self.id,
                    &self.table.public_view(),
                    self.config.action_timeout.as_millis() as u64,
                    Some(extras),
                ));
                log::info!(
                    "hand settled at table {}: dealer seat {dealer}, {} pot(s)",
                    self.id,
                    result.pots.len()
                );

                // Hand-completion record: a best-effort write, same I/O-failure
                // policy as the snapshot -- log and keep going, never fail the live
                // table over an external store being unavailable.
                let mut board = table_cards::Board::new();
                board.extend(result.board.iter().copied());
                let pot: table_core::Chips = result.pots.iter().map(|p| p.amount).sum();
                let record = HandRecord::new(self.id, board, pot, dealer);
                if let Err(err) = self.history.create_hand(&record).await {
                    log::error!("failed to record hand at table {}: {err}", self.id);
                }
            }
            Err(err) => {
                log::error!("showdown resolution failed: {err}");
                self.table.halt(err.to_string());
                return;
            }
        }

        let generation = self.timer.start_showdown();
        let handle = self.self_handle.clone();
        let pause = self.config.showdown_delay;
        tokio::spawn(async move {
            tokio::time::sleep(pause).await;
            handle.send_showdown_elapsed(generation);
        });
    }

    fn schedule_action_timeout(&mut self) {
        let Some(seat_index) = self.table.turn_index() else { return };
        let generation = self.timer.generation();
        let handle = self.self_handle.clone();
        let deadline = self.timer.remaining().unwrap_or(Duration::ZERO);
        tokio::spawn(async move {
            tokio::time::sleep(deadline).await;
            handle.send_action_timer_fired(seat_index, generation);
        });
    }

    async fn persist(&self) {
        if let Err(err) = self.snapshots.put(self.id, &self.table).await {
            log::error!("failed to persist table {} snapshot: {err}", self.id);
        }
    }

    /// Broadcasts the public view to every bound socket, followed by each connected
    /// seat's own private view -- hole cards never ride on the broadcast frame.
    fn broadcast_state(&self) {
        let view = self.table.public_view();
        let extras = None;
        self.registry.broadcast(ServerMessage::table_state(
            self.id,
            &view,
            self.config.action_timeout.as_millis() as u64,
            extras,
        ));
        for (seat_index, seat) in self.table.seats() {
            let remaining_ms = self.timer.remaining().map(|d| d.as_millis() as u64).unwrap_or(0);
            self.registry.unicast(seat_index, ServerMessage::private_state(seat_index, seat.hole(), remaining_ms));
        }
    }
}
