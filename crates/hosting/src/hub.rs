use pcore::{Position, ID};
use gameroom::{filter_for_recipient, Broadcaster, GameRoom, ServerMessage};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Mutex;

/// Marker type so a subscriber's [`ID`] is distinct from a game's.
pub struct Subscriber;
pub type SubscriberId = ID<Subscriber>;

struct Entry {
    tx: UnboundedSender<String>,
    game_id: ID<GameRoom>,
    seat_id: Option<Position>,
}

#[derive(Default)]
struct HubState {
    by_game: HashMap<ID<GameRoom>, HashSet<SubscriberId>>,
    subscribers: HashMap<SubscriberId, Entry>,
}

impl HubState {
    fn remove(&mut self, id: SubscriberId) {
        if let Some(entry) = self.subscribers.remove(&id) {
            if let Some(set) = self.by_game.get_mut(&entry.game_id) {
                set.remove(&id);
                if set.is_empty() {
                    self.by_game.remove(&entry.game_id);
                }
            }
        }
    }
}

/// Tracks every live subscriber of every game and fans server messages
/// out to them. State lives under one mutex; every send happens after
/// it's released — a snapshot of (id, sender, seat) is cloned out first,
/// so a slow or dead subscriber never holds up the map.
#[derive(Default)]
pub struct ConnectionHub {
    inner: Mutex<HubState>,
}

impl ConnectionHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `tx` under `game_id`, optionally bound to a seat. A
    /// prior subscriber already bound to the same `(game_id, seat_id)`
    /// is evicted first — dropping the hub's only `Sender` clone to it
    /// closes that subscriber's receiving half, which is how a seat
    /// reconnect displaces a stale connection.
    pub async fn subscribe(
        &self,
        tx: UnboundedSender<String>,
        game_id: ID<GameRoom>,
        seat_id: Option<Position>,
    ) -> SubscriberId {
        let id = SubscriberId::default();
        let mut state = self.inner.lock().await;
        if let Some(seat) = seat_id {
            let stale: Vec<SubscriberId> = state
                .by_game
                .get(&game_id)
                .into_iter()
                .flatten()
                .copied()
                .filter(|existing| state.subscribers.get(existing).map(|e| e.seat_id) == Some(Some(seat)))
                .collect();
            for old in stale {
                state.remove(old);
            }
        }
        state.subscribers.insert(id, Entry { tx, game_id, seat_id });
        state.by_game.entry(game_id).or_default().insert(id);
        id
    }

    pub async fn unsubscribe(&self, id: SubscriberId) {
        self.inner.lock().await.remove(id);
    }

    pub async fn subscriber_count(&self, game_id: ID<GameRoom>) -> usize {
        self.inner.lock().await.by_game.get(&game_id).map(|s| s.len()).unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl Broadcaster for ConnectionHub {
    async fn broadcast(&self, game_id: ID<GameRoom>, message: ServerMessage) {
        let targets: Vec<(SubscriberId, UnboundedSender<String>, Option<Position>)> = {
            let state = self.inner.lock().await;
            state
                .by_game
                .get(&game_id)
                .into_iter()
                .flatten()
                .filter_map(|id| state.subscribers.get(id).map(|e| (*id, e.tx.clone(), e.seat_id)))
                .collect()
        };

        let mut dead = Vec::new();
        for (id, tx, seat_id) in targets {
            let mut personal = message.clone();
            if let ServerMessage::GameState(ref mut data) | ServerMessage::ChipsDistributed(ref mut data) = personal {
                filter_for_recipient(data, seat_id);
            }
            if tx.send(personal.to_json()).is_err() {
                dead.push(id);
            }
        }
        if !dead.is_empty() {
            let mut state = self.inner.lock().await;
            for id in dead {
                state.remove(id);
            }
        }
    }

    async fn send_to_seat(&self, game_id: ID<GameRoom>, seat: Position, message: ServerMessage) {
        for attempt in 0..=pcore::SEND_TO_SEAT_RETRIES {
            let target = {
                let state = self.inner.lock().await;
                state.by_game.get(&game_id).into_iter().flatten().find_map(|id| {
                    state
                        .subscribers
                        .get(id)
                        .filter(|e| e.seat_id == Some(seat))
                        .map(|e| e.tx.clone())
                })
            };
            if let Some(tx) = target {
                if tx.send(message.to_json()).is_ok() {
                    return;
                }
            }
            if attempt < pcore::SEND_TO_SEAT_RETRIES {
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }
        log::warn!("send_to_seat: seat {seat} in game {game_id} unreachable after retries");
    }
}
