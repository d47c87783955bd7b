use cards::Card;
use pcore::{Chips, Position};

/// A seat's standing in the current hand. Promotion from `Waiting` to
/// `Active` happens only at start-of-hand, never mid-hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatStatus {
    Waiting,
    Active,
    Folded,
    AllIn,
    Out,
}

impl SeatStatus {
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Active | Self::AllIn)
    }
}

#[derive(Debug, Clone)]
pub struct Seat {
    pub position: Position,
    pub display_name: String,
    pub is_human: bool,
    pub chips: Chips,
    pub hole_cards: Option<[Card; 2]>,
    pub street_bet: Chips,
    pub hand_bet: Chips,
    pub status: SeatStatus,
}

impl Seat {
    pub fn new(position: Position, display_name: impl Into<String>, is_human: bool, chips: Chips) -> Self {
        Self {
            position,
            display_name: display_name.into(),
            is_human,
            chips,
            hole_cards: None,
            street_bet: 0,
            hand_bet: 0,
            status: if chips > 0 { SeatStatus::Waiting } else { SeatStatus::Out },
        }
    }

    /// Moves `amount` chips from the stack into both this street's and
    /// this hand's committed totals. Caller is responsible for clamping
    /// `amount` to `self.chips` beforehand (an all-in never goes negative).
    pub fn commit(&mut self, amount: Chips) {
        debug_assert!(amount <= self.chips, "commit exceeds stack");
        self.chips -= amount;
        self.street_bet += amount;
        self.hand_bet += amount;
        if self.chips == 0 && self.status == SeatStatus::Active {
            self.status = SeatStatus::AllIn;
        }
    }

    /// A seat sitting out only comes back in if it can cover the big
    /// blind; a short stack stays `Waiting` rather than being dealt in
    /// and forced to post a blind it can't fully fund.
    pub fn reset_for_new_hand(&mut self, big_blind: Chips) {
        self.street_bet = 0;
        self.hand_bet = 0;
        self.hole_cards = None;
        self.status = match self.status {
            SeatStatus::Out => SeatStatus::Out,
            _ if self.chips <= 0 => SeatStatus::Out,
            SeatStatus::Waiting if self.chips >= big_blind => SeatStatus::Active,
            SeatStatus::Waiting => SeatStatus::Waiting,
            _ => SeatStatus::Active,
        };
    }

    pub fn reset_for_new_street(&mut self) {
        self.street_bet = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_moves_chips_into_bet_totals() {
        let mut seat = Seat::new(0, "a", true, 100);
        seat.status = SeatStatus::Active;
        seat.commit(40);
        assert_eq!(seat.chips, 60);
        assert_eq!(seat.street_bet, 40);
        assert_eq!(seat.hand_bet, 40);
        assert_eq!(seat.status, SeatStatus::Active);
    }

    #[test]
    fn commit_all_chips_marks_all_in() {
        let mut seat = Seat::new(0, "a", true, 40);
        seat.status = SeatStatus::Active;
        seat.commit(40);
        assert_eq!(seat.status, SeatStatus::AllIn);
    }

    #[test]
    fn waiting_promotes_to_active_on_new_hand_if_funded() {
        let mut seat = Seat::new(0, "a", true, 100);
        seat.status = SeatStatus::Waiting;
        seat.reset_for_new_hand(20);
        assert_eq!(seat.status, SeatStatus::Active);
    }

    #[test]
    fn waiting_stays_waiting_if_short_of_the_big_blind() {
        let mut seat = Seat::new(0, "a", true, 5);
        seat.status = SeatStatus::Waiting;
        seat.reset_for_new_hand(20);
        assert_eq!(seat.status, SeatStatus::Waiting);
    }
}
