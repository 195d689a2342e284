use std::collections::HashMap;

use serde::Serialize;
use table_cards::{Card, Evaluator, Strength};
use table_core::Chips;

use crate::error::TableError;
use crate::stage::Stage;
use crate::table::Table;

/// One side pot: its size, the seats that were eligible to win it, and the seats that
/// actually did (more than one on a split). Folded seats can contribute to a pot's
/// size without being eligible for it.
#[derive(Debug, Clone, Serialize)]
pub struct PotResult {
    pub amount: Chips,
    pub eligible: Vec<usize>,
    pub winners: Vec<usize>,
}

/// The hand-completion record broadcast once a hand reaches showdown.
#[derive(Debug, Clone, Serialize)]
pub struct HandResult {
    pub dealer: usize,
    pub board: Vec<Card>,
    pub pots: Vec<PotResult>,
    /// Revealed hands, seat index to best-five-of-seven strength. Only populated for
    /// seats that actually contested a pot against another unfolded seat; a hand that
    /// ended by everyone-else-folding awards without a reveal.
    pub showdown_hands: Vec<(usize, Strength)>,
}

/// Settles a completed hand: evaluates contested hands, builds side pots from the
/// distinct contribution levels at the table, and pays them out.
pub struct Showdown;

impl Showdown {
    pub fn can_resolve(table: &Table) -> bool {
        table.stage() == Stage::Showdown
    }

    pub fn resolve(table: &mut Table) -> Result<HandResult, TableError> {
        if !Self::can_resolve(table) {
            return Err(TableError::IllegalAction("no hand is awaiting showdown".into()));
        }

        let dealer = table.dealer_index().unwrap_or(0);
        let board = table.community().cards().to_vec();
        let occupied = table.all_seat_indices();

        let mut levels: Vec<Chips> = occupied
            .iter()
            .filter_map(|&i| {
                let contributed = table.seat(i).expect("occupied").total_contributed();
                (contributed > 0).then_some(contributed)
            })
            .collect();
        levels.sort_unstable();
        levels.dedup();

        let mut strengths: HashMap<usize, Strength> = HashMap::new();
        let mut pots = Vec::with_capacity(levels.len());
        let mut previous_level: Chips = 0;

        for level in levels {
            let span = level - previous_level;
            previous_level = level;
            if span <= 0 {
                continue;
            }
            let contributors: Vec<usize> = occupied
                .iter()
                .copied()
                .filter(|&i| table.seat(i).expect("occupied").total_contributed() >= level)
                .collect();
            let amount = span * contributors.len() as Chips;
            let eligible: Vec<usize> =
                contributors.into_iter().filter(|&i| !table.seat(i).expect("occupied").folded()).collect();

            let winners = if eligible.len() == 1 {
                eligible.clone()
            } else {
                let best = eligible
                    .iter()
                    .map(|&i| {
                        *strengths.entry(i).or_insert_with(|| {
                            let seat = table.seat(i).expect("eligible seat exists");
                            let hole = seat.hole().expect("eligible seats were dealt in");
                            Evaluator::from_iter(hole.cards().into_iter().chain(board.iter().copied())).strength()
                        })
                    })
                    .max()
                    .expect("at least one eligible seat per pot");
                eligible.iter().copied().filter(|i| strengths[i] == best).collect::<Vec<_>>()
            };

            distribute(table, amount, &winners, dealer);
            pots.push(PotResult { amount, eligible, winners });
        }

        let showdown_hands = strengths.into_iter().collect();

        table.reset_pot();
        table.set_stage(Stage::Waiting);
        table.set_turn_index(None);
        for &i in &occupied {
            table.seat_mut(i).expect("occupied").reset_for_hand();
        }

        Ok(HandResult { dealer, board, pots, showdown_hands })
    }
}

/// Splits `amount` evenly across `winners`; any remainder goes one chip at a time to
/// winners in clockwise order starting immediately after the dealer.
fn distribute(table: &mut Table, amount: Chips, winners: &[usize], dealer: usize) {
    if winners.is_empty() {
        return;
    }
    let share = amount / winners.len() as Chips;
    let mut remainder = amount % winners.len() as Chips;

    let ring = table.ring_size();
    let mut ordered = winners.to_vec();
    ordered.sort_by_key(|&seat| (seat + ring - dealer - 1) % ring);

    for &seat in &ordered {
        let mut pay = share;
        if remainder > 0 {
            pay += 1;
            remainder -= 1;
        }
        table.seat_mut(seat).expect("winner seat exists").award(pay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbiter::{Action, Arbiter};
    use crate::sequencer::Sequencer;

    fn heads_up_table() -> Table {
        let mut table = Table::new(6, 1, 2, 2);
        table.sit(0, "alice".into(), 1000).unwrap();
        table.sit(3, "bob".into(), 1000).unwrap();
        Sequencer::start_hand(&mut table).unwrap();
        table
    }

    #[test]
    fn walk_awards_entire_pot_to_last_unfolded_seat_without_reveal() {
        let mut table = heads_up_table();
        let turn = table.turn_index().unwrap();
        let identity = table.seat(turn).unwrap().identity().to_string();
        let other_index = if turn == 0 { 3 } else { 0 };
        let stack_before = table.seat(other_index).unwrap().chips();
        Arbiter::apply(&mut table, turn, &identity, Action::Fold).unwrap();

        assert_eq!(table.stage(), Stage::Showdown);
        let result = Showdown::resolve(&mut table).unwrap();
        assert!(result.showdown_hands.is_empty());
        assert_eq!(result.pots.len(), 1);
        assert_eq!(result.pots[0].winners, vec![other_index]);
        assert!(table.seat(other_index).unwrap().chips() > stack_before);
        assert_eq!(table.stage(), Stage::Waiting);
    }

    #[test]
    fn conservation_holds_across_a_full_hand_resolution() {
        let mut table = heads_up_table();
        let total_before = table.total_chips();
        let turn = table.turn_index().unwrap();
        let identity = table.seat(turn).unwrap().identity().to_string();
        Arbiter::apply(&mut table, turn, &identity, Action::Fold).unwrap();
        Showdown::resolve(&mut table).unwrap();
        assert_eq!(table.total_chips(), total_before);
    }

    use table_cards::{Rank, Suit};

    /// Three seats {100, 1000, 1000}; A all-in for 100, B and C committed to 1000
    /// apiece. A holds the best hand, B the second-best. Expected: A wins the main
    /// pot of `100 * 3 = 300`, B wins the side pot of `(1000 - 100) * 2 = 1800`,
    /// with C -- the worst hand -- eligible for neither.
    #[test]
    fn three_way_all_in_builds_a_main_pot_and_a_side_pot() {
        let mut table = Table::new(3, 1, 2, 2);
        table.sit(0, "a".into(), 100).unwrap();
        table.sit(1, "b".into(), 1000).unwrap();
        table.sit(2, "c".into(), 1000).unwrap();

        for (i, stack) in [(0usize, 100i64), (1, 1000), (2, 1000)] {
            let seat = table.seat_mut(i).unwrap();
            let paid = seat.commit(stack);
            table.add_to_pot(paid);
        }

        table.seat_mut(0).unwrap().deal(table_cards::Hole::new(
            Card::new(Rank::Ace, Suit::Spade),
            Card::new(Rank::Ace, Suit::Heart),
        ));
        table.seat_mut(1).unwrap().deal(table_cards::Hole::new(
            Card::new(Rank::King, Suit::Spade),
            Card::new(Rank::King, Suit::Heart),
        ));
        table.seat_mut(2).unwrap().deal(table_cards::Hole::new(
            Card::new(Rank::Queen, Suit::Spade),
            Card::new(Rank::Jack, Suit::Heart),
        ));
        for card in [
            Card::new(Rank::Two, Suit::Club),
            Card::new(Rank::Four, Suit::Diamond),
            Card::new(Rank::Seven, Suit::Heart),
            Card::new(Rank::Nine, Suit::Club),
            Card::new(Rank::Ten, Suit::Diamond),
        ] {
            table.community_mut().push(card);
        }
        table.set_dealer_index(Some(0));
        table.set_stage(Stage::Showdown);

        let result = Showdown::resolve(&mut table).unwrap();

        assert_eq!(result.pots.len(), 2);
        assert_eq!(result.pots[0].amount, 300);
        assert_eq!(result.pots[0].winners, vec![0]);
        assert_eq!(result.pots[1].amount, 1800);
        assert_eq!(result.pots[1].winners, vec![1]);

        assert_eq!(table.seat(0).unwrap().chips(), 300);
        assert_eq!(table.seat(1).unwrap().chips(), 1800);
        assert_eq!(table.seat(2).unwrap().chips(), 0);
    }

    /// Two seats split an even pot with no remainder, and an odd pot's extra
    /// chip goes to the winner seated closest clockwise after the dealer.
    #[test]
    fn split_pot_odd_chip_goes_to_the_seat_clockwise_of_the_dealer() {
        let mut table = Table::new(4, 1, 2, 2);
        table.sit(0, "a".into(), 1000).unwrap();
        table.sit(2, "b".into(), 1000).unwrap();

        for i in [0usize, 2] {
            let seat = table.seat_mut(i).unwrap();
            let paid = seat.commit(100);
            table.add_to_pot(paid);
        }
        // Board-plays split: both hole cards rank below the board's own kicker (the
        // queen), so both seats' best five is the same two pair plus that queen --
        // a genuine tie, not merely two hands that happen to compare equal.
        let board = [
            Card::new(Rank::Ace, Suit::Club),
            Card::new(Rank::Ace, Suit::Diamond),
            Card::new(Rank::King, Suit::Heart),
            Card::new(Rank::King, Suit::Spade),
            Card::new(Rank::Queen, Suit::Club),
        ];
        table.seat_mut(0).unwrap().deal(table_cards::Hole::new(
            Card::new(Rank::Four, Suit::Heart),
            Card::new(Rank::Five, Suit::Diamond),
        ));
        table.seat_mut(2).unwrap().deal(table_cards::Hole::new(
            Card::new(Rank::Six, Suit::Heart),
            Card::new(Rank::Seven, Suit::Diamond),
        ));
        for card in board {
            table.community_mut().push(card);
        }
        table.set_dealer_index(Some(0));
        table.set_stage(Stage::Showdown);

        let result = Showdown::resolve(&mut table).unwrap();
        assert_eq!(result.pots[0].amount, 200);
        assert_eq!(result.pots[0].winners.len(), 2, "identical board-play hands split the pot");
        // Even pot, no remainder to assign -- the odd-chip tiebreak is exercised below.
        // Each seat sat with 1000, committed 100, and is awarded its 100 share back.
        assert_eq!(table.seat(0).unwrap().chips(), 1000);
        assert_eq!(table.seat(2).unwrap().chips(), 1000);

        // Three seats exercise both rules in one hand: a folded small blind's 1-chip
        // contribution is counted into pot sizing but excluded from eligibility,
        // which leaves an odd-sized pot to split between the two seats that see
        // showdown -- the odd chip goes to the winner seated closest clockwise of the
        // dealer, not merely "first listed".
        let mut table2 = Table::new(3, 1, 2, 2);
        table2.sit(0, "sb".into(), 1000).unwrap();
        table2.sit(1, "bb".into(), 1000).unwrap();
        table2.sit(2, "btn".into(), 1000).unwrap();

        let sb_paid = table2.seat_mut(0).unwrap().commit(1);
        table2.add_to_pot(sb_paid);
        table2.seat_mut(0).unwrap().fold();
        for i in [1usize, 2] {
            let paid = table2.seat_mut(i).unwrap().commit(2);
            table2.add_to_pot(paid);
        }
        // bb and btn tie at showdown.
        table2.seat_mut(1).unwrap().deal(table_cards::Hole::new(
            Card::new(Rank::Four, Suit::Heart),
            Card::new(Rank::Five, Suit::Diamond),
        ));
        table2.seat_mut(2).unwrap().deal(table_cards::Hole::new(
            Card::new(Rank::Six, Suit::Heart),
            Card::new(Rank::Seven, Suit::Diamond),
        ));
        for card in board {
            table2.community_mut().push(card);
        }
        table2.set_dealer_index(Some(2));
        table2.set_stage(Stage::Showdown);

        let result2 = Showdown::resolve(&mut table2).unwrap();
        assert_eq!(table2.pot(), 0);
        assert_eq!(result2.pots.iter().map(|p| p.amount).sum::<i64>(), 5);
        for pot in &result2.pots {
            assert!(!pot.eligible.contains(&0), "folded seat is never pot-eligible");
        }
        // Clockwise from dealer seat 2: seat 0 (folded, skipped), then seat 1 -- the
        // odd chip across the hand lands on seat 1, not seat 2. Both sat with 1000
        // and committed 2, so the 3/2 award lands them at 1001/1000.
        assert_eq!(table2.seat(1).unwrap().chips(), 1001);
        assert_eq!(table2.seat(2).unwrap().chips(), 1000);
    }
}
