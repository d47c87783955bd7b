use crate::context::HandContext;
use pcore::{Chips, Position, ID};
use engine::{Game, HandConfig, Seat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// A marker type so `ID<GameRoom>` is distinct from every other
/// phantom-typed id in the workspace.
pub struct GameRoom {
    pub id: ID<GameRoom>,
    pub game: Game,
    pub max_seats: usize,
    /// Recorder for the hand currently in progress. Replaced every time
    /// a new hand starts; the caller is responsible for archiving the
    /// outgoing one before that happens.
    pub context: HandContext,
}

impl GameRoom {
    pub fn new(config: HandConfig, max_seats: usize) -> Self {
        Self {
            id: ID::default(),
            game: Game::new(Vec::new(), 0, config),
            max_seats,
            context: HandContext::default(),
        }
    }

    /// Starts a hand and resets the in-progress recorder to match.
    /// Callers that need the just-finished hand's record should read
    /// `self.context` before calling this.
    pub fn start_hand(&mut self) {
        self.game.start_hand();
        self.context = HandContext::new(&self.game);
    }

    /// Seats a new player in the first open slot; promotes to WAITING,
    /// which `start_hand` turns into ACTIVE once funded. Returns the
    /// assigned position, or `None` if the table is full.
    pub fn sit(&mut self, display_name: impl Into<String>, is_human: bool, buy_in: Chips) -> Option<Position> {
        if self.game.seats.len() >= self.max_seats {
            return None;
        }
        let position = self.game.seats.len();
        self.game.seats.push(Seat::new(position, display_name, is_human, buy_in));
        Some(position)
    }

    pub fn eligible_seat_count(&self) -> usize {
        self.game
            .seats
            .iter()
            .filter(|s| s.status != engine::SeatStatus::Out)
            .count()
    }
}

/// Operator/debugging record of a table's existence and stakes — not a
/// resumable mid-hand snapshot. Written once at table creation so the
/// `games` repository reflects which tables have been opened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub id: ID<GameRoom>,
    pub max_seats: usize,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub ante: Chips,
}

impl GameSnapshot {
    pub fn from_room(room: &GameRoom) -> Self {
        Self {
            id: room.id,
            max_seats: room.max_seats,
            small_blind: room.game.config.small_blind,
            big_blind: room.game.config.big_blind,
            ante: room.game.config.ante,
        }
    }
}

/// Process-wide map of game id → per-game state, each independently
/// mutex-guarded so that serialization is per-game rather than global
/// (§5). The outer lock guards only map membership and is never held
/// across a game's own critical section.
#[derive(Default)]
pub struct GameRegistry {
    rooms: RwLock<HashMap<ID<GameRoom>, Arc<Mutex<GameRoom>>>>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, config: HandConfig, max_seats: usize) -> ID<GameRoom> {
        let room = GameRoom::new(config, max_seats);
        let id = room.id;
        self.rooms.write().await.insert(id, Arc::new(Mutex::new(room)));
        id
    }

    pub async fn get(&self, id: ID<GameRoom>) -> Option<Arc<Mutex<GameRoom>>> {
        self.rooms.read().await.get(&id).cloned()
    }

    pub async fn remove(&self, id: ID<GameRoom>) -> Option<Arc<Mutex<GameRoom>>> {
        self.rooms.write().await.remove(&id)
    }

    pub async fn len(&self) -> usize {
        self.rooms.read().await.len()
    }

    pub async fn ids(&self) -> Vec<ID<GameRoom>> {
        self.rooms.read().await.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_and_fetch_round_trips() {
        let registry = GameRegistry::new();
        let id = registry.create(HandConfig::default(), 6).await;
        assert!(registry.get(id).await.is_some());
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn remove_drops_the_room() {
        let registry = GameRegistry::new();
        let id = registry.create(HandConfig::default(), 6).await;
        assert!(registry.remove(id).await.is_some());
        assert!(registry.get(id).await.is_none());
    }

    #[test]
    fn sit_assigns_sequential_positions_until_full() {
        let mut room = GameRoom::new(HandConfig::default(), 2);
        assert_eq!(room.sit("a", true, 1000), Some(0));
        assert_eq!(room.sit("b", true, 1000), Some(1));
        assert_eq!(room.sit("c", true, 1000), None);
    }

    /// A room seated through `sit` (the only path the real server uses)
    /// must give every seat a turn on every street, not just the first
    /// to act — regression for a turn controller that lost track of the
    /// table's size when seats arrived one at a time instead of all at
    /// once via `Game::new`.
    #[test]
    fn a_hand_seated_through_sit_gives_every_seat_a_turn_on_every_street() {
        use engine::{Action, ActionKind, Round};

        let mut room = GameRoom::new(HandConfig { small_blind: 5, big_blind: 10, ..HandConfig::default() }, 3);
        room.sit("a", true, 1000);
        room.sit("b", true, 1000);
        room.sit("c", true, 1000);
        room.start_hand();

        let mut actions_per_round: Vec<(Round, usize)> = Vec::new();
        loop {
            let Some(actor) = room.game.current_actor() else { break };
            let round = room.game.round;
            let options = room.game.legal_options(actor).expect("current actor has legal options");
            let action = if options.kinds.contains(&ActionKind::Check) {
                Action::Check
            } else {
                Action::Call(options.call_amount)
            };
            room.game.apply(actor, action);
            match actions_per_round.last_mut() {
                Some((last_round, count)) if *last_round == round => *count += 1,
                _ => actions_per_round.push((round, 1)),
            }
            if room.game.round == Round::Showdown {
                break;
            }
        }

        let streets_seen = actions_per_round.len();
        assert!(streets_seen >= 3, "hand with no folds should pass through several streets, saw {actions_per_round:?}");
        for (round, count) in &actions_per_round {
            assert!(*count > 1, "round {round:?} only saw {count} action(s), every seated player should act");
        }
    }
}
