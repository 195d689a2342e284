use serde::{Deserialize, Serialize};
use table_cards::{Board, Card, Deck, Hole};
use table_core::Chips;

use crate::error::TableError;
use crate::seat::Seat;
use crate::stage::Stage;

/// Canonical in-memory record of one table: seats, deck, community cards, pot, stage,
/// turn cursor, blinds pointer. Every field here is part of the snapshot persisted by
/// the session layer, including deck contents and hole cards, so a restart can resume
/// an in-progress hand without re-dealing or losing chips.
///
/// All mutation is expected to pass through a single serializer upstream (the
/// table-session actor); `Table` itself enforces its own invariants but does not
/// itself arbitrate concurrent access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    seats: Vec<Option<Seat>>,
    deck: Deck,
    community: Board,
    pot: Chips,
    current_bet_to_call: Chips,
    last_raise_amount: Chips,
    dealer_index: Option<usize>,
    turn_index: Option<usize>,
    stage: Stage,
    small_blind: Chips,
    big_blind: Chips,
    min_players: usize,
    /// Total chips in play (stacks + pot), set at the start of the current hand and
    /// adjusted by `sit`/`vacate` for seats that join or leave mid-hand. The
    /// chip-conservation invariant is checked against this after every mutation.
    hand_initial_chips: Chips,
    /// Set once an invariant violation is detected; once halted, no further mutation
    /// is accepted, so the snapshot stays around for forensics.
    halted: Option<String>,
}

/// Public projection of a seat: what every participant is allowed to see about every
/// other seat. Strips `hole`, `session`, and `reclaim_deadline`.
#[derive(Debug, Clone, Serialize)]
pub struct PublicSeat {
    pub identity: String,
    pub chips: Chips,
    pub current_bet: Chips,
    pub folded: bool,
    pub all_in: bool,
    pub connected: bool,
}

/// Broadcast to every participant after every mutation.
#[derive(Debug, Clone, Serialize)]
pub struct PublicView {
    pub seats: Vec<Option<PublicSeat>>,
    pub community: Vec<Card>,
    pub pot: Chips,
    pub stage: Stage,
    pub current_bet_to_call: Chips,
    pub current_turn_index: Option<usize>,
    pub dealer_index: Option<usize>,
    pub last_raise_amount: Chips,
}

/// Sent in addition to the public view, to the one seat it concerns.
#[derive(Debug, Clone, Serialize)]
pub struct PrivateView {
    pub my_index: usize,
    pub my_hole: Option<Hole>,
}

impl Table {
    pub fn new(seat_count: usize, small_blind: Chips, big_blind: Chips, min_players: usize) -> Self {
        Self {
            seats: vec![None; seat_count],
            deck: Deck::new(),
            community: Board::new(),
            pot: 0,
            current_bet_to_call: 0,
            last_raise_amount: big_blind,
            dealer_index: None,
            turn_index: None,
            stage: Stage::Waiting,
            small_blind,
            big_blind,
            min_players,
            hand_initial_chips: 0,
            halted: None,
        }
    }

    pub fn ring_size(&self) -> usize {
        self.seats.len()
    }
    pub fn small_blind(&self) -> Chips {
        self.small_blind
    }
    pub fn big_blind(&self) -> Chips {
        self.big_blind
    }
    pub fn min_players(&self) -> usize {
        self.min_players
    }
    pub fn stage(&self) -> Stage {
        self.stage
    }
    pub fn pot(&self) -> Chips {
        self.pot
    }
    pub fn current_bet_to_call(&self) -> Chips {
        self.current_bet_to_call
    }
    pub fn last_raise_amount(&self) -> Chips {
        self.last_raise_amount
    }
    pub fn dealer_index(&self) -> Option<usize> {
        self.dealer_index
    }
    pub fn turn_index(&self) -> Option<usize> {
        self.turn_index
    }
    pub fn community(&self) -> &Board {
        &self.community
    }
    pub fn deck(&self) -> &Deck {
        &self.deck
    }
    pub fn halted(&self) -> Option<&str> {
        self.halted.as_deref()
    }

    pub fn seat(&self, index: usize) -> Option<&Seat> {
        self.seats.get(index).and_then(|s| s.as_ref())
    }
    pub fn seat_mut(&mut self, index: usize) -> Option<&mut Seat> {
        self.seats.get_mut(index).and_then(|s| s.as_mut())
    }
    pub fn seats(&self) -> impl Iterator<Item = (usize, &Seat)> {
        self.seats.iter().enumerate().filter_map(|(i, s)| s.as_ref().map(|s| (i, s)))
    }

    pub fn occupied_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_some()).count()
    }

    pub fn find_seat_by_identity(&self, identity: &str) -> Option<usize> {
        self.seats()
            .find(|(_, seat)| seat.identity() == identity)
            .map(|(i, _)| i)
    }

    /// Seats currently in the hand: dealt, not folded.
    pub fn live_seats(&self) -> impl Iterator<Item = (usize, &Seat)> {
        self.seats().filter(|(_, s)| !s.folded() && s.hole().is_some())
    }

    pub fn unfolded_count(&self) -> usize {
        self.seats().filter(|(_, s)| !s.folded() && s.hole().is_some()).count()
    }

    // --- seating ---------------------------------------------------------------

    pub fn sit(&mut self, index: usize, identity: String, stack: Chips) -> Result<(), TableError> {
        if index >= self.seats.len() {
            return Err(TableError::SeatNotFound);
        }
        if self.seats[index].is_some() {
            return Err(TableError::SeatOccupied);
        }
        if self.find_seat_by_identity(&identity).is_some() {
            return Err(TableError::AlreadySeated);
        }
        self.seats[index] = Some(Seat::new(identity, stack));
        // A seat taken mid-hand brings its own chips onto the table; fold that into
        // the conservation baseline so the new stack isn't mistaken for drift.
        if self.stage != Stage::Waiting {
            self.hand_initial_chips += stack;
        }
        Ok(())
    }

    pub fn vacate(&mut self, index: usize) -> Result<Seat, TableError> {
        let seat = self.seats.get_mut(index).and_then(|s| s.take()).ok_or(TableError::SeatNotFound)?;
        // The seat's remaining stack leaves the table with it; shrink the baseline
        // by the same amount so a legal mid-hand departure doesn't look like a leak.
        if self.stage != Stage::Waiting {
            self.hand_initial_chips -= seat.chips();
        }
        Ok(seat)
    }

    // --- invariants --------------------------------------------------------------

    /// Chip conservation: every chip is either in a stack or in the
    /// pot, and the total never drifts from what it was when the hand started.
    /// Called by the arbiter/sequencer after any mutation that should preserve it.
    pub fn check_conservation(&self) -> Result<(), TableError> {
        let live: Chips = self.seats().map(|(_, s)| s.chips()).sum();
        if live + self.pot != self.hand_initial_chips {
            return Err(TableError::InvariantViolation(format!(
                "chip conservation broken: stacks {live} + pot {} != initial {}",
                self.pot, self.hand_initial_chips
            )));
        }
        Ok(())
    }

    pub fn total_chips(&self) -> Chips {
        self.seats().map(|(_, s)| s.chips()).sum::<Chips>() + self.pot
    }

    pub fn halt(&mut self, reason: String) {
        log::error!("table halted: {reason}");
        self.halted = Some(reason);
    }

    // --- projections ---------------------------------------------------------------

    pub fn public_view(&self) -> PublicView {
        PublicView {
            seats: self
                .seats
                .iter()
                .map(|s| {
                    s.as_ref().map(|s| PublicSeat {
                        identity: s.identity().to_string(),
                        chips: s.chips(),
                        current_bet: s.current_bet(),
                        folded: s.folded(),
                        all_in: s.all_in(),
                        connected: s.is_connected(),
                    })
                })
                .collect(),
            community: self.community.cards().to_vec(),
            pot: self.pot,
            stage: self.stage,
            current_bet_to_call: self.current_bet_to_call,
            current_turn_index: self.turn_index,
            dealer_index: self.dealer_index,
            last_raise_amount: self.last_raise_amount,
        }
    }

    pub fn private_view(&self, index: usize) -> Option<PrivateView> {
        self.seat(index).map(|s| PrivateView { my_index: index, my_hole: s.hole() })
    }

    // --- crate-internal mutators used by the sequencer/arbiter/showdown ------------

    pub(crate) fn seats_len(&self) -> usize {
        self.seats.len()
    }
    pub(crate) fn set_stage(&mut self, stage: Stage) {
        self.stage = stage;
    }
    pub(crate) fn set_dealer_index(&mut self, index: Option<usize>) {
        self.dealer_index = index;
    }
    pub(crate) fn set_turn_index(&mut self, index: Option<usize>) {
        self.turn_index = index;
    }
    pub(crate) fn set_current_bet_to_call(&mut self, amount: Chips) {
        self.current_bet_to_call = amount;
    }
    pub(crate) fn set_last_raise_amount(&mut self, amount: Chips) {
        self.last_raise_amount = amount;
    }
    pub(crate) fn set_hand_initial_chips(&mut self, amount: Chips) {
        self.hand_initial_chips = amount;
    }
    pub(crate) fn add_to_pot(&mut self, amount: Chips) {
        self.pot += amount;
    }
    pub(crate) fn reset_pot(&mut self) {
        self.pot = 0;
    }
    pub(crate) fn deck_mut(&mut self) -> &mut Deck {
        &mut self.deck
    }
    pub(crate) fn replace_deck(&mut self, deck: Deck) {
        self.deck = deck;
    }
    pub(crate) fn community_mut(&mut self) -> &mut Board {
        &mut self.community
    }
    pub(crate) fn replace_community(&mut self, board: Board) {
        self.community = board;
    }
    pub(crate) fn all_seat_indices(&self) -> Vec<usize> {
        self.seats.iter().enumerate().filter_map(|(i, s)| s.is_some().then_some(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_view_hides_hole_cards() {
        let mut table = Table::new(6, 1, 2, 2);
        table.sit(0, "alice".into(), 1000).unwrap();
        table.seat_mut(0).unwrap().deal(Hole::new(
            table_cards::Card::new(table_cards::Rank::Ace, table_cards::Suit::Spade),
            table_cards::Card::new(table_cards::Rank::King, table_cards::Suit::Spade),
        ));
        let view = table.public_view();
        assert_eq!(view.seats.len(), 6);
        assert!(view.seats[0].is_some());
        // PublicSeat carries no hole field at all -- compile-time guarantee, not a runtime check.
        assert_eq!(view.seats[1].is_none(), true);
    }

    #[test]
    fn sit_rejects_duplicate_identity() {
        let mut table = Table::new(6, 1, 2, 2);
        table.sit(0, "alice".into(), 1000).unwrap();
        assert_eq!(table.sit(1, "alice".into(), 1000), Err(TableError::AlreadySeated));
    }

    #[test]
    fn sit_rejects_occupied_seat() {
        let mut table = Table::new(6, 1, 2, 2);
        table.sit(0, "alice".into(), 1000).unwrap();
        assert_eq!(table.sit(0, "bob".into(), 1000), Err(TableError::SeatOccupied));
    }

    #[test]
    fn mid_hand_sit_and_vacate_preserve_chip_conservation() {
        let mut table = Table::new(4, 1, 2, 2);
        table.sit(0, "a".into(), 1000).unwrap();
        table.sit(1, "b".into(), 1000).unwrap();
        crate::sequencer::Sequencer::start_hand(&mut table).unwrap();
        assert!(table.check_conservation().is_ok());

        // A third player sits down while the hand is already running -- their stack
        // wasn't part of `hand_initial_chips`, so the baseline must absorb it.
        table.sit(2, "c".into(), 500).unwrap();
        assert!(table.check_conservation().is_ok(), "mid-hand sit must not trip conservation");

        // That seat leaves before ever being dealt in -- its stack leaves the table
        // with it, and the baseline must shrink to match.
        table.vacate(2).unwrap();
        assert!(table.check_conservation().is_ok(), "mid-hand vacate must not trip conservation");
    }
}
