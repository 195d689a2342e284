use table_cards::{Deck, Hole};
use table_core::Chips;

use crate::error::TableError;
use crate::position::PositionName;
use crate::stage::Stage;
use crate::table::Table;

/// Drives the stage machine: `waiting -> preflop -> flop -> turn -> river ->
/// showdown -> waiting`, including dealing, blind posting, and the predicates that
/// decide when to advance.
pub struct Sequencer;

impl Sequencer {
    pub fn can_start_hand(table: &Table) -> bool {
        table.stage() == Stage::Waiting && table.occupied_count() >= table.min_players()
    }

    /// Hand initialization: fresh shuffled deck, per-hand seat reset,
    /// round-robin deal, dealer/blind advance, preflop first-to-act, and the
    /// transition into `Preflop`.
    pub fn start_hand(table: &mut Table) -> Result<(), TableError> {
        if !Self::can_start_hand(table) {
            return Err(TableError::NotEnoughPlayers);
        }

        let occupied = table.all_seat_indices();
        table.replace_deck(Deck::new());
        for &i in &occupied {
            table.seat_mut(i).expect("just listed").reset_for_hand();
        }
        table.replace_community(table_cards::Board::new());
        table.reset_pot();
        table.set_hand_initial_chips(table.total_chips());

        for &seat_index in &occupied {
            let first = deal_one(table)?;
            let second = deal_one(table)?;
            table.seat_mut(seat_index).expect("just listed").deal(Hole::new(first, second));
        }

        let dealer = next_occupied(table, table.dealer_index().unwrap_or(table.ring_size() - 1));
        table.set_dealer_index(Some(dealer));

        let heads_up = occupied.len() == 2;
        let small_blind_seat = if heads_up { dealer } else { next_occupied(table, dealer) };
        let big_blind_seat = next_occupied(table, small_blind_seat);

        let sb_amount = table.small_blind();
        let bb_amount = table.big_blind();
        post_blind(table, small_blind_seat, sb_amount);
        post_blind(table, big_blind_seat, bb_amount);

        table.set_current_bet_to_call(bb_amount);
        table.set_last_raise_amount(bb_amount);

        let first_to_act = next_actionable(table, big_blind_seat);
        table.set_turn_index(first_to_act);
        table.set_stage(Stage::Preflop);

        log::info!("hand started: dealer seat {dealer}, {} seats dealt in", occupied.len());
        let ring = table.ring_size();
        for &i in &occupied {
            log::debug!("seat {i}: {}", PositionName::from_seat(i, dealer, ring));
        }
        Ok(())
    }

    /// Every unfolded, non-all-in seat has matched `current_bet_to_call`, and each has
    /// acted at least once since the last raise.
    pub fn round_complete(table: &Table) -> bool {
        if table.unfolded_count() <= 1 {
            return true;
        }
        table
            .live_seats()
            .filter(|(_, s)| s.is_actionable())
            .all(|(_, s)| s.current_bet() == table.current_bet_to_call() && s.acted())
    }

    /// Called after every accepted action. Drives the stage machine forward as far as
    /// it can go right now: early-terminates straight to showdown if only one seat is
    /// left unfolded, otherwise advances one street at a
    /// time (recursing through all-in runouts with nobody left to act) once the
    /// current betting round is complete. No-ops if the round is still open.
    pub fn progress(table: &mut Table) -> Result<(), TableError> {
        if table.stage() == Stage::Showdown || table.stage() == Stage::Waiting {
            return Ok(());
        }
        if table.unfolded_count() <= 1 {
            table.set_stage(Stage::Showdown);
            table.set_turn_index(None);
            return Ok(());
        }
        if Self::round_complete(table) {
            Self::advance_street(table)?;
        }
        Ok(())
    }

    /// Advances to the next street, dealing community cards and resetting per-round
    /// seat state. No-ops (returns `Ok(())`) if the hand is
    /// already past the river; callers should check `table.stage()` for showdown.
    pub fn advance_street(table: &mut Table) -> Result<(), TableError> {
        let next = table.stage().next();
        let to_deal = match next {
            Stage::Flop => 3,
            Stage::Turn | Stage::River => 1,
            Stage::Showdown => 0,
            Stage::Waiting | Stage::Preflop => {
                return Err(TableError::InvariantViolation(format!(
                    "advance_street called from {:?}",
                    table.stage()
                )));
            }
        };

        for &i in &table.all_seat_indices() {
            if let Some(seat) = table.seat_mut(i) {
                seat.reset_for_street();
            }
        }

        for _ in 0..to_deal {
            let card = table
                .deck_mut()
                .draw()
                .ok_or_else(|| TableError::InvariantViolation("deck exhausted".into()))?;
            table.community_mut().push(card);
        }

        table.set_current_bet_to_call(0);
        table.set_last_raise_amount(table.big_blind());
        table.set_stage(next);

        if next == Stage::Showdown {
            table.set_turn_index(None);
            return Ok(());
        }

        let dealer = table.dealer_index().expect("dealer set once a hand has started");
        table.set_turn_index(next_actionable(table, dealer));

        // Only-one-actionable-seat remaining (the rest are all-in): nothing further to
        // bet, so the street is already "complete" -- let the caller loop straight
        // through to showdown rather than waiting on a turn that can't come.
        if table.turn_index().is_none() && table.unfolded_count() > 1 {
            return Self::advance_street(table);
        }

        Ok(())
    }
}

fn deal_one(table: &mut Table) -> Result<table_cards::Card, TableError> {
    table.deck_mut().draw().ok_or_else(|| TableError::InvariantViolation("deck exhausted mid-deal".into()))
}

fn post_blind(table: &mut Table, seat_index: usize, amount: Chips) {
    if let Some(seat) = table.seat_mut(seat_index) {
        let paid = seat.commit(amount);
        table.add_to_pot(paid);
        log::debug!("seat {seat_index} posts blind {paid}");
    }
}

/// Next occupied seat clockwise from `from`, wrapping. Panics if no seat is occupied;
/// callers only use this once at least `min_players` are seated.
pub(crate) fn next_occupied(table: &Table, from: usize) -> usize {
    let ring = table.ring_size();
    (1..=ring)
        .map(|step| (from + step) % ring)
        .find(|&i| table.seat(i).is_some())
        .expect("at least one occupied seat")
}

/// Next occupied, unfolded, non-all-in seat clockwise from `from`. `None` if no seat
/// qualifies (everyone else is all-in or folded).
pub(crate) fn next_actionable(table: &Table, from: usize) -> Option<usize> {
    let ring = table.ring_size();
    (1..=ring).map(|step| (from + step) % ring).find(|&i| table.seat(i).is_some_and(|s| s.is_actionable()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heads_up_table() -> Table {
        let mut table = Table::new(6, 1, 2, 2);
        table.sit(0, "alice".into(), 1000).unwrap();
        table.sit(3, "bob".into(), 1000).unwrap();
        table
    }

    #[test]
    fn heads_up_dealer_posts_small_blind_and_acts_first() {
        let mut table = heads_up_table();
        Sequencer::start_hand(&mut table).unwrap();
        let dealer = table.dealer_index().unwrap();
        assert_eq!(table.seat(dealer).unwrap().current_bet(), 1);
        assert_eq!(table.turn_index(), Some(dealer), "heads-up: dealer/SB acts first preflop");
    }

    #[test]
    fn blinds_are_posted_and_pot_seeded() {
        let mut table = heads_up_table();
        Sequencer::start_hand(&mut table).unwrap();
        assert_eq!(table.pot(), 3);
        assert_eq!(table.current_bet_to_call(), 2);
        assert_eq!(table.last_raise_amount(), 2);
    }

    #[test]
    fn no_duplicate_cards_after_deal() {
        let mut table = heads_up_table();
        Sequencer::start_hand(&mut table).unwrap();
        let mut seen = std::collections::HashSet::new();
        for (_, seat) in table.seats() {
            for card in seat.hole().unwrap().cards() {
                assert!(seen.insert(card));
            }
        }
        assert_eq!(seen.len() + table.deck().remaining(), 52);
    }

    #[test]
    fn cannot_start_with_too_few_players() {
        let mut table = Table::new(6, 1, 2, 2);
        table.sit(0, "alice".into(), 1000).unwrap();
        assert_eq!(Sequencer::start_hand(&mut table), Err(TableError::NotEnoughPlayers));
    }
}
