//! Property-style invariant checks, run as randomized `#[test]` loops rather than a
//! fixed set of scenarios. Each iteration deals a fresh table with a random seat
//! count and random stacks, then plays it to completion against a random action
//! policy, re-checking the invariants after every single accepted action rather than
//! only at the end.

use std::collections::HashSet;

use table_core::Arbitrary;

use crate::arbiter::{Action, Arbiter};
use crate::sequencer::Sequencer;
use crate::showdown::Showdown;
use crate::stage::Stage;
use crate::table::Table;

const ITERATIONS: usize = 200;

/// Seat count in 2..=6, stack in 200..=2000, both driven off `u8::random()` rather
/// than a bounded RNG helper -- this crate has no reason to depend on anything past
/// what `table-core::Arbitrary` already offers.
fn random_seat_count() -> usize {
    2 + (u8::random() as usize % 5)
}

fn random_stack() -> i64 {
    200 + (u8::random() as i64) * 8
}

fn assert_no_duplicate_cards(table: &Table) {
    let mut seen = HashSet::new();
    for (_, seat) in table.seats() {
        if let Some(hole) = seat.hole() {
            for card in hole.cards() {
                assert!(seen.insert(card), "duplicate card {card} dealt");
            }
        }
    }
    for &card in table.community().cards() {
        assert!(seen.insert(card), "duplicate card {card} on board");
    }
    assert_eq!(seen.len() + table.deck().remaining(), 52, "card accounting off 52");
}

/// Chip conservation and no-duplicate-cards, both
/// re-checked after every action of a randomized hand rather than a single fixed
/// betting line -- the `Arbitrary` coin-flip decides fold/check-or-call at each turn.
#[test]
fn chip_conservation_and_card_uniqueness_hold_over_randomized_hands() {
    for _ in 0..ITERATIONS {
        let seat_count = random_seat_count();
        let mut table = Table::new(seat_count, 1, 2, 2);
        for i in 0..seat_count {
            table.sit(i, format!("p{i}"), random_stack()).unwrap();
        }
        let total_before = table.total_chips();

        Sequencer::start_hand(&mut table).unwrap();
        assert_no_duplicate_cards(&table);

        let mut turns_taken = 0;
        while table.stage() != Stage::Waiting {
            turns_taken += 1;
            assert!(turns_taken < 10_000, "hand failed to terminate");

            if table.stage() == Stage::Showdown {
                let result = Showdown::resolve(&mut table).unwrap();
                assert_eq!(result.dealer, table.dealer_index().unwrap_or(result.dealer));
                break;
            }

            let Some(turn) = table.turn_index() else {
                // All remaining seats are all-in with no betting left; the sequencer
                // runs the board out on its own once every accepted action calls
                // `Sequencer::progress`, so this only happens transiently between
                // actions, never as a steady state. Nudge it forward by resolving
                // once the stage catches up to showdown.
                assert_eq!(table.stage(), Stage::Showdown);
                continue;
            };

            let identity = table.seat(turn).unwrap().identity().to_string();
            let owed = table.current_bet_to_call() - table.seat(turn).unwrap().current_bet();
            let action = if owed == 0 {
                Action::Check
            } else if bool::random() {
                Action::Fold
            } else {
                Action::Call
            };

            Arbiter::apply(&mut table, turn, &identity, action).unwrap();
            assert_eq!(table.total_chips(), total_before, "chip conservation violated after {action}");
            assert_no_duplicate_cards(&table);
        }

        assert_eq!(table.total_chips(), total_before, "chip conservation violated at hand end");
        assert_eq!(table.stage(), Stage::Waiting);
    }
}

/// Side-pot correctness, weak form: every chip paid into a pot ends
/// up in exactly one winner's stack, and the sum awarded across every pot equals the
/// sum collected into all of them -- checked over randomized short-stacked all-ins
/// rather than a single curated multi-way-all-in fixture.
#[test]
fn showdown_always_awards_exactly_what_was_collected() {
    for _ in 0..ITERATIONS {
        let seat_count = random_seat_count();
        let mut table = Table::new(seat_count, 1, 2, 2);
        for i in 0..seat_count {
            // Deliberately small and uneven stacks to provoke multi-way all-ins and
            // the side-pot splitting they require.
            table.sit(i, format!("p{i}"), 2 + (u8::random() as i64 % 40)).unwrap();
        }

        Sequencer::start_hand(&mut table).unwrap();

        let mut turns_taken = 0;
        while table.stage() != Stage::Showdown && table.stage() != Stage::Waiting {
            turns_taken += 1;
            assert!(turns_taken < 10_000, "hand failed to reach showdown");
            let Some(turn) = table.turn_index() else { break };
            let identity = table.seat(turn).unwrap().identity().to_string();
            let owed = table.current_bet_to_call() - table.seat(turn).unwrap().current_bet();
            let action = if owed == 0 || bool::random() {
                if owed == 0 { Action::Check } else { Action::Call }
            } else {
                Action::Fold
            };
            Arbiter::apply(&mut table, turn, &identity, action).unwrap();
        }

        if table.stage() != Stage::Showdown {
            continue;
        }

        let pot_before = table.pot();
        let stacks_before: i64 = table.seats().map(|(_, s)| s.chips()).sum();
        let result = Showdown::resolve(&mut table).unwrap();
        let awarded: i64 = result.pots.iter().map(|p| p.amount).sum();

        assert_eq!(awarded, pot_before, "awarded total does not match collected pot");
        let stacks_after: i64 = table.seats().map(|(_, s)| s.chips()).sum();
        assert_eq!(stacks_after, stacks_before + awarded);
        for pot in &result.pots {
            assert!(!pot.winners.is_empty(), "a pot with positive amount must have a winner");
            for &winner in &pot.winners {
                assert!(pot.eligible.contains(&winner), "winner must have been eligible for that pot");
            }
        }
    }
}
