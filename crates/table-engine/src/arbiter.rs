use serde::{Deserialize, Serialize};
use table_core::Chips;

use crate::error::TableError;
use crate::sequencer::{next_actionable, Sequencer};
use crate::table::Table;

/// A participant's requested move, wire-shaped as `{ type, amount? }` --
/// `tag = "type"` with `amount` only present on `Raise`. `Raise { amount }` carries the
/// *increment* above `current_bet_to_call`, not the resulting total -- a seat facing a
/// bet of 2 who sends `Raise { amount: 4 }` ends up with `current_bet == 6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Fold,
    Check,
    Call,
    Raise { amount: Chips },
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Fold => write!(f, "fold"),
            Action::Check => write!(f, "check"),
            Action::Call => write!(f, "call"),
            Action::Raise { amount } => write!(f, "raise {amount}"),
        }
    }
}

/// Validates and applies one seat's action against the live table. The only
/// entry point by which table state changes during a hand; every accepted action
/// ends with a call into `Sequencer::progress` so the stage machine advances as far
/// as it currently can.
pub struct Arbiter;

impl Arbiter {
    /// `seat_index` is the acting seat and `identity` must match the identity bound
    /// to it -- a stale or spoofed client cannot act on someone else's behalf even if
    /// it guesses the right seat index. Authorization failures and illegal actions
    /// are both reported as `Err` without mutating `table`; they are distinguished so
    /// callers can choose how to report them, but neither resets or extends the
    /// acting seat's clock.
    pub fn apply(table: &mut Table, seat_index: usize, identity: &str, action: Action) -> Result<(), TableError> {
        Self::authorize(table, seat_index, identity)?;
        Self::validate(table, seat_index, action)?;
        Self::execute(table, seat_index, action);

        if let Err(violation) = table.check_conservation() {
            table.halt(violation.to_string());
            return Err(violation);
        }

        let next = next_actionable(table, seat_index);
        table.set_turn_index(next);
        Sequencer::progress(table)?;
        Ok(())
    }

    fn authorize(table: &Table, seat_index: usize, identity: &str) -> Result<(), TableError> {
        if table.halted().is_some() {
            return Err(TableError::InvariantViolation(
                table.halted().unwrap_or("table halted").to_string(),
            ));
        }
        if !table.stage().is_betting_round() {
            return Err(TableError::IllegalAction("no betting round is open".into()));
        }
        if table.turn_index() != Some(seat_index) {
            return Err(TableError::NotYourTurn);
        }
        let seat = table.seat(seat_index).ok_or(TableError::SeatNotFound)?;
        if seat.identity() != identity {
            return Err(TableError::UnknownIdentity);
        }
        if !seat.is_actionable() {
            return Err(TableError::IllegalAction("seat is folded or all-in".into()));
        }
        Ok(())
    }

    fn validate(table: &Table, seat_index: usize, action: Action) -> Result<(), TableError> {
        let seat = table.seat(seat_index).expect("authorized");
        let to_call = table.current_bet_to_call() - seat.current_bet();

        match action {
            Action::Fold => Ok(()),
            Action::Check => {
                if to_call != 0 {
                    return Err(TableError::IllegalAction(format!("cannot check, {to_call} owed")));
                }
                Ok(())
            }
            Action::Call => Ok(()),
            Action::Raise { amount } => {
                if amount <= 0 {
                    return Err(TableError::IllegalAction("raise amount must be positive".into()));
                }
                let desired_total = to_call + amount;
                let is_all_in = desired_total >= seat.chips();
                let required_min = table.last_raise_amount().max(table.big_blind());
                if !is_all_in && amount < required_min {
                    return Err(TableError::IllegalAction(format!(
                        "raise of {amount} is below the minimum of {required_min}"
                    )));
                }
                Ok(())
            }
        }
    }

    fn execute(table: &mut Table, seat_index: usize, action: Action) {
        match action {
            Action::Fold => {
                table.seat_mut(seat_index).expect("authorized").fold();
            }
            Action::Check => {
                table.seat_mut(seat_index).expect("authorized").mark_acted();
            }
            Action::Call => {
                let to_call = table.current_bet_to_call() - table.seat(seat_index).expect("authorized").current_bet();
                let seat = table.seat_mut(seat_index).expect("authorized");
                let paid = seat.commit(to_call.max(0));
                seat.mark_acted();
                table.add_to_pot(paid);
            }
            Action::Raise { amount } => {
                let before = table.current_bet_to_call();
                let to_call = before - table.seat(seat_index).expect("authorized").current_bet();
                let invest = to_call + amount;

                let seat = table.seat_mut(seat_index).expect("authorized");
                let paid = seat.commit(invest);
                seat.mark_acted();
                table.add_to_pot(paid);

                let new_bet = table.seat(seat_index).expect("authorized").current_bet();
                if new_bet > before {
                    let raise_size = new_bet - before;
                    table.set_current_bet_to_call(new_bet);
                    table.set_last_raise_amount(raise_size);
                    for &i in &table.all_seat_indices() {
                        if i == seat_index {
                            continue;
                        }
                        if let Some(other) = table.seat_mut(i) {
                            if other.is_actionable() {
                                other.clear_acted();
                            }
                        }
                    }
                }
                // else: an all-in for less than the current bet -- the seat is now
                // all-in and out of the betting; currentBetToCall/lastRaiseAmount
                // are left untouched and nobody else needs to act again because of it.
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::Sequencer;

    fn heads_up_table() -> Table {
        let mut table = Table::new(6, 1, 2, 2);
        table.sit(0, "alice".into(), 1000).unwrap();
        table.sit(3, "bob".into(), 1000).unwrap();
        Sequencer::start_hand(&mut table).unwrap();
        table
    }

    fn three_handed_table() -> Table {
        let mut table = Table::new(6, 1, 2, 2);
        table.sit(0, "dealer".into(), 1000).unwrap();
        table.sit(1, "small".into(), 1000).unwrap();
        table.sit(2, "big".into(), 1000).unwrap();
        Sequencer::start_hand(&mut table).unwrap();
        table
    }

    /// A raise to 6 (increment 4) is accepted, a follow-up
    /// raise to 9 (increment 3, below the 4-chip minimum) is rejected outright, and a
    /// subsequent raise to 10 (increment 4) is accepted with `lastRaiseAmount`
    /// updated to the new increment.
    #[test]
    fn minimum_raise_below_last_increment_is_rejected_then_a_legal_one_succeeds() {
        let mut table = three_handed_table();
        assert_eq!(table.current_bet_to_call(), 2);
        assert_eq!(table.last_raise_amount(), 2);

        let first = table.turn_index().unwrap();
        let first_identity = table.seat(first).unwrap().identity().to_string();
        Arbiter::apply(&mut table, first, &first_identity, Action::Raise { amount: 4 }).unwrap();
        assert_eq!(table.current_bet_to_call(), 6);
        assert_eq!(table.last_raise_amount(), 4);

        let second = table.turn_index().unwrap();
        let second_identity = table.seat(second).unwrap().identity().to_string();
        assert!(matches!(
            Arbiter::apply(&mut table, second, &second_identity, Action::Raise { amount: 3 }),
            Err(TableError::IllegalAction(_))
        ));
        // A rejected raise never mutates the table.
        assert_eq!(table.current_bet_to_call(), 6);
        assert_eq!(table.last_raise_amount(), 4);
        assert_eq!(table.turn_index(), Some(second), "illegal action does not advance the turn");

        Arbiter::apply(&mut table, second, &second_identity, Action::Raise { amount: 4 }).unwrap();
        assert_eq!(table.current_bet_to_call(), 10);
        assert_eq!(table.last_raise_amount(), 4);
    }

    #[test]
    fn rejects_action_from_wrong_identity() {
        let mut table = heads_up_table();
        let turn = table.turn_index().unwrap();
        let err = Arbiter::apply(&mut table, turn, "mallory", Action::Fold);
        assert_eq!(err, Err(TableError::UnknownIdentity));
    }

    #[test]
    fn rejects_action_out_of_turn() {
        let mut table = heads_up_table();
        let turn = table.turn_index().unwrap();
        // heads-up ring only has two occupied seats (0 and 3); pick whichever isn't the turn.
        let other_index = if turn == 0 { 3 } else { 0 };
        let identity = table.seat(other_index).unwrap().identity().to_string();
        assert_eq!(
            Arbiter::apply(&mut table, other_index, &identity, Action::Fold),
            Err(TableError::NotYourTurn)
        );
    }

    #[test]
    fn check_rejected_when_bet_outstanding() {
        let mut table = heads_up_table();
        let turn = table.turn_index().unwrap();
        let identity = table.seat(turn).unwrap().identity().to_string();
        assert!(matches!(
            Arbiter::apply(&mut table, turn, &identity, Action::Check),
            Err(TableError::IllegalAction(_))
        ));
    }

    #[test]
    fn call_matches_outstanding_bet_and_advances_turn() {
        let mut table = heads_up_table();
        let turn = table.turn_index().unwrap();
        let identity = table.seat(turn).unwrap().identity().to_string();
        let pot_before = table.pot();
        Arbiter::apply(&mut table, turn, &identity, Action::Call).unwrap();
        assert!(table.pot() > pot_before);
        assert_eq!(table.seat(turn).unwrap().current_bet(), table.current_bet_to_call());
    }

    #[test]
    fn raise_below_minimum_is_rejected() {
        let mut table = heads_up_table();
        let turn = table.turn_index().unwrap();
        let identity = table.seat(turn).unwrap().identity().to_string();
        assert!(matches!(
            Arbiter::apply(&mut table, turn, &identity, Action::Raise { amount: 1 }),
            Err(TableError::IllegalAction(_))
        ));
    }

    #[test]
    fn raise_updates_last_raise_amount_and_clears_other_acted_flags() {
        let mut table = heads_up_table();
        let turn = table.turn_index().unwrap();
        let identity = table.seat(turn).unwrap().identity().to_string();
        Arbiter::apply(&mut table, turn, &identity, Action::Raise { amount: 4 }).unwrap();
        assert_eq!(table.current_bet_to_call(), 6);
        assert_eq!(table.last_raise_amount(), 4);
    }

    #[test]
    fn fold_with_one_seat_remaining_moves_to_showdown() {
        let mut table = heads_up_table();
        let turn = table.turn_index().unwrap();
        let identity = table.seat(turn).unwrap().identity().to_string();
        Arbiter::apply(&mut table, turn, &identity, Action::Fold).unwrap();
        assert_eq!(table.stage(), crate::stage::Stage::Showdown);
        assert_eq!(table.turn_index(), None);
    }
}
