use serde::{Deserialize, Serialize};
use table_cards::Hole;
use table_core::{Chips, ID};
use std::time::{Duration, Instant};

/// Opaque marker for the socket bound to a seat. The seat never owns the socket: it
/// only stores this id, and the session layer looks sockets up by it -- avoids a
/// cyclic seat <-> session reference.
#[derive(Debug)]
pub struct Socket;
pub type SocketId = ID<Socket>;

/// One occupied slot in the table's ring. A `None` in `Table::seats` is an empty slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seat {
    identity: String,
    #[serde(skip)]
    session: Option<SocketId>,
    chips: Chips,
    current_bet: Chips,
    total_contributed: Chips,
    folded: bool,
    all_in: bool,
    acted: bool,
    hole: Option<Hole>,
    #[serde(skip)]
    reclaim_deadline: Option<Instant>,
}

impl Seat {
    pub fn new(identity: String, chips: Chips) -> Self {
        Self {
            identity,
            session: None,
            chips,
            current_bet: 0,
            total_contributed: 0,
            folded: false,
            all_in: false,
            acted: false,
            hole: None,
            reclaim_deadline: None,
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }
    pub fn session(&self) -> Option<SocketId> {
        self.session
    }
    pub fn bind(&mut self, socket: SocketId) {
        self.session = Some(socket);
        self.reclaim_deadline = None;
    }
    pub fn unbind(&mut self, reconnect_window: Duration) {
        self.session = None;
        self.reclaim_deadline = Some(Instant::now() + reconnect_window);
    }
    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }
    pub fn reclaim_expired(&self) -> bool {
        self.reclaim_deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    pub fn chips(&self) -> Chips {
        self.chips
    }
    pub fn current_bet(&self) -> Chips {
        self.current_bet
    }
    pub fn total_contributed(&self) -> Chips {
        self.total_contributed
    }
    pub fn folded(&self) -> bool {
        self.folded
    }
    pub fn all_in(&self) -> bool {
        self.all_in
    }
    pub fn acted(&self) -> bool {
        self.acted
    }
    pub fn hole(&self) -> Option<Hole> {
        self.hole
    }

    /// A seat that can still be asked to act: dealt into the hand, not folded, and
    /// not already all-in. `hole.is_some()` excludes a seat that sat down after the
    /// current hand's deal -- it is occupied but not part of this hand, so it must
    /// never receive a turn or block round completion until the next deal.
    pub fn is_actionable(&self) -> bool {
        self.hole.is_some() && !self.folded && !self.all_in
    }

    pub fn deal(&mut self, hole: Hole) {
        self.hole = Some(hole);
    }

    pub fn reset_for_hand(&mut self) {
        self.current_bet = 0;
        self.total_contributed = 0;
        self.folded = false;
        self.all_in = false;
        self.acted = false;
        self.hole = None;
    }

    pub fn reset_for_street(&mut self) {
        self.current_bet = 0;
        self.acted = false;
    }

    pub fn fold(&mut self) {
        self.folded = true;
    }

    pub fn mark_acted(&mut self) {
        self.acted = true;
    }
    pub fn clear_acted(&mut self) {
        self.acted = false;
    }

    /// Commits up to `amount` chips from the stack to the pot, clamping to what the
    /// seat actually has. Returns the amount actually committed. Marks `all_in` if the
    /// stack hits zero.
    pub fn commit(&mut self, amount: Chips) -> Chips {
        let paid = amount.min(self.chips);
        self.chips -= paid;
        self.current_bet += paid;
        self.total_contributed += paid;
        if self.chips == 0 {
            self.all_in = true;
        }
        paid
    }

    pub fn award(&mut self, amount: Chips) {
        self.chips += amount;
    }
}
