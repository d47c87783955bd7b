use crate::errors::EngineError;
use pcore::Position;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Actor(Position),
    StreetEnded,
}

/// Owns `to_act` and `current_actor` for the street in progress. Advances
/// strictly clockwise around the seat ring `0..seat_count`, recomputed
/// from the table's current size on every call to `next` rather than
/// cached at construction — a table's seat count can grow between
/// hands, and caching it here would silently desync from `Game::seats`.
/// Never mutates seat state itself, so `HandStateMachine` remains the
/// sole place chips move.
#[derive(Debug, Clone, Default)]
pub struct TurnController {
    to_act: BTreeSet<Position>,
    current_actor: Option<Position>,
}

impl TurnController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_act(&self) -> &BTreeSet<Position> {
        &self.to_act
    }

    pub fn current_actor(&self) -> Option<Position> {
        self.current_actor
    }

    /// Begins a street: `to_act` is every seat passed in, and the cursor
    /// is set to `first` (the first seat that should act).
    pub fn seed<I: IntoIterator<Item = Position>>(&mut self, seats: I, first: Position) {
        self.to_act = seats.into_iter().collect();
        self.current_actor = Some(first);
    }

    pub fn consume(&mut self, seat: Position) {
        self.to_act.remove(&seat);
    }

    /// Re-seeds `to_act` to every seat in `eligible` except the raiser,
    /// used on a full raise so the action comes back around.
    pub fn reopen<I: IntoIterator<Item = Position>>(&mut self, raiser: Position, eligible: I) {
        self.to_act = eligible.into_iter().filter(|s| *s != raiser).collect();
    }

    /// Finds the next seat clockwise from the current cursor that is both
    /// in `to_act` and passes `is_active`, walking the ring
    /// `0..seat_count`. Returns `StreetEnded` once `to_act` is empty.
    pub fn next(&mut self, seat_count: usize, is_active: impl Fn(Position) -> bool) -> TurnOutcome {
        if self.to_act.is_empty() || seat_count == 0 {
            self.current_actor = None;
            return TurnOutcome::StreetEnded;
        }
        let start = self
            .current_actor
            .map(|p| (p + 1) % seat_count)
            .unwrap_or(0);
        for offset in 0..seat_count {
            let candidate = (start + offset) % seat_count;
            if self.to_act.contains(&candidate) && is_active(candidate) {
                self.current_actor = Some(candidate);
                return TurnOutcome::Actor(candidate);
            }
        }
        self.current_actor = None;
        TurnOutcome::StreetEnded
    }

    /// Corrects a drifted cursor (see concurrency notes) by forcing it to
    /// `expected`, provided that seat genuinely still owes action.
    pub fn fix_cursor(&mut self, expected: Position) -> Result<(), EngineError> {
        if self.to_act.contains(&expected) {
            self.current_actor = Some(expected);
            Ok(())
        } else {
            Err(EngineError::ActionFailed(format!(
                "cannot fix cursor to seat {expected}: not in to_act"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_sets_cursor_and_to_act() {
        let mut turn = TurnController::new();
        turn.seed([0, 1, 2], 1);
        assert_eq!(turn.current_actor(), Some(1));
        assert_eq!(turn.to_act().len(), 3);
    }

    #[test]
    fn next_wraps_clockwise_and_skips_inactive() {
        let mut turn = TurnController::new();
        turn.seed([0, 2, 3], 0);
        turn.consume(0);
        let outcome = turn.next(4, |_| true);
        assert_eq!(outcome, TurnOutcome::Actor(2));
    }

    #[test]
    fn empty_to_act_ends_street() {
        let mut turn = TurnController::new();
        turn.seed([0], 0);
        turn.consume(0);
        assert_eq!(turn.next(2, |_| true), TurnOutcome::StreetEnded);
    }

    #[test]
    fn reopen_excludes_raiser() {
        let mut turn = TurnController::new();
        turn.reopen(1, [0, 1, 2]);
        assert!(!turn.to_act().contains(&1));
        assert!(turn.to_act().contains(&0));
        assert!(turn.to_act().contains(&2));
    }

    #[test]
    fn fix_cursor_rejects_seat_not_owed_action() {
        let mut turn = TurnController::new();
        turn.seed([0], 0);
        assert!(turn.fix_cursor(1).is_err());
        assert!(turn.fix_cursor(0).is_ok());
    }

    #[test]
    fn next_skips_a_seat_that_has_already_acted_and_returns_to_the_other() {
        let mut turn = TurnController::new();
        turn.seed([0, 1], 0);
        turn.consume(0);
        assert_eq!(turn.next(2, |_| true), TurnOutcome::Actor(1));
    }
}
