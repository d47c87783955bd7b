use pcore::{Chips, Position, ID};
use engine::{Action, Game};
use serde::{Deserialize, Serialize};

/// Operator/debugging record of one played hand: dealer, starting
/// stacks, and the ordered action log. This is history for
/// after-the-fact inspection, not the analytics/statistics aggregation
/// the purpose statement excludes — no derived win-rate or EV figures
/// are computed anywhere near this type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HandContext {
    pub id: ID<HandContext>,
    pub hand_number: u64,
    pub dealer: Position,
    pub starting_stacks: Vec<(Position, Chips)>,
    pub actions: Vec<(Position, Action)>,
}

impl HandContext {
    pub fn new(game: &Game) -> Self {
        Self {
            id: ID::default(),
            hand_number: game.hand_number,
            dealer: game.button,
            starting_stacks: game
                .seats
                .iter()
                .map(|s| (s.position, s.chips + s.hand_bet))
                .collect(),
            actions: Vec::new(),
        }
    }

    pub fn record(&mut self, position: Position, action: Action) {
        self.actions.push((position, action));
    }
}
