use crate::seat::{Seat, SeatStatus};
use pcore::{Chips, Position};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pot {
    pub amount: Chips,
    pub eligible: BTreeSet<Position>,
}

impl Pot {
    /// "Main Pot" for index 0, "Side Pot k" thereafter.
    pub fn name(index: usize) -> String {
        if index == 0 {
            "Main Pot".to_string()
        } else {
            format!("Side Pot {index}")
        }
    }
}

/// Builds side pots from each seat's `hand_bet`, the sorted-unique-levels
/// construction: walking ascending contribution levels, each pot collects
/// the marginal chips between consecutive levels from every seat that
/// reached that level; a seat is eligible for a pot only if it reached
/// the level *and* never folded. Folded seats still contribute chips.
pub fn build_pots(seats: &[Seat]) -> Vec<Pot> {
    let mut levels: Vec<Chips> = seats
        .iter()
        .map(|s| s.hand_bet)
        .filter(|&bet| bet > 0)
        .collect();
    levels.sort_unstable();
    levels.dedup();

    let mut pots = Vec::new();
    let mut previous = 0;
    for level in levels {
        let span = level - previous;
        let contributors: Vec<&Seat> = seats.iter().filter(|s| s.hand_bet >= level).collect();
        let amount = span * contributors.len() as Chips;
        if amount > 0 {
            let eligible = contributors
                .iter()
                .filter(|s| s.status != SeatStatus::Folded)
                .map(|s| s.position)
                .collect();
            pots.push(Pot { amount, eligible });
        }
        previous = level;
    }
    pots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seat::Seat;

    fn seat(position: Position, hand_bet: Chips, status: SeatStatus) -> Seat {
        let mut s = Seat::new(position, format!("p{position}"), true, 1000);
        s.hand_bet = hand_bet;
        s.status = status;
        s
    }

    #[test]
    fn single_level_makes_one_pot() {
        let seats = vec![
            seat(0, 20, SeatStatus::Active),
            seat(1, 20, SeatStatus::Active),
        ];
        let pots = build_pots(&seats);
        assert_eq!(pots.len(), 1);
        assert_eq!(pots[0].amount, 40);
        assert_eq!(pots[0].eligible, BTreeSet::from([0, 1]));
    }

    #[test]
    fn three_way_all_in_builds_main_and_side_pot() {
        // A=200 (raised+called), B=200 (all-in short stack got there via call-all), C=200
        // simulate: B all-in for 200, A and C both call to 200 -> only one level, single pot
        let seats = vec![
            seat(0, 200, SeatStatus::Active),
            seat(1, 200, SeatStatus::AllIn),
            seat(2, 200, SeatStatus::Active),
        ];
        let pots = build_pots(&seats);
        assert_eq!(pots.len(), 1);
        assert_eq!(pots[0].amount, 600);
    }

    #[test]
    fn uneven_contributions_build_side_pot_excluding_short_stack() {
        let seats = vec![
            seat(0, 100, SeatStatus::Active),
            seat(1, 30, SeatStatus::AllIn),
            seat(2, 100, SeatStatus::Active),
        ];
        let pots = build_pots(&seats);
        assert_eq!(pots.len(), 2);
        assert_eq!(pots[0].amount, 90); // 30 * 3
        assert_eq!(pots[0].eligible, BTreeSet::from([0, 1, 2]));
        assert_eq!(pots[1].amount, 140); // 70 * 2
        assert_eq!(pots[1].eligible, BTreeSet::from([0, 2]));
    }

    #[test]
    fn folded_seats_contribute_but_are_never_eligible() {
        let seats = vec![
            seat(0, 50, SeatStatus::Folded),
            seat(1, 50, SeatStatus::Active),
        ];
        let pots = build_pots(&seats);
        assert_eq!(pots.len(), 1);
        assert_eq!(pots[0].amount, 100);
        assert_eq!(pots[0].eligible, BTreeSet::from([1]));
    }
}
