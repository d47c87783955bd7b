use crate::action::Action;
use crate::errors::EngineError;
use cards::{Card, Street};
use pcore::{Chips, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    PlayerActionProcessed,
    BettingRoundCompleted,
    StreetDealingRequired,
    ShowdownTriggered,
    EarlyShowdownTriggered,
    HandCompleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationSequence {
    None,
    ChipCollection,
    StreetDealing,
    ShowdownReveal,
    HandConclusion,
}

/// The immutable outcome of one `HandStateMachine::apply` call. The state
/// machine never notifies clients itself; `EventOrchestrator` reads this
/// value and decides what to broadcast.
#[derive(Debug, Clone)]
pub struct GameActionResult {
    pub success: bool,
    pub error: Option<EngineError>,
    pub acting_seat: Position,
    pub action: Action,
    pub events: Vec<GameEvent>,
    pub animation_sequence: AnimationSequence,
    pub pending_streets_to_deal: Vec<(Street, Vec<Card>)>,
    pub post_street_bet: Chips,
    pub post_hand_bet: Chips,
    pub next_actor: Option<Position>,
}

impl GameActionResult {
    pub fn failure(acting_seat: Position, action: Action, error: EngineError) -> Self {
        Self {
            success: false,
            error: Some(error),
            acting_seat,
            action,
            events: Vec::new(),
            animation_sequence: AnimationSequence::None,
            pending_streets_to_deal: Vec::new(),
            post_street_bet: 0,
            post_hand_bet: 0,
            next_actor: None,
        }
    }

    pub fn has_event(&self, event: GameEvent) -> bool {
        self.events.contains(&event)
    }
}
