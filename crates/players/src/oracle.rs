use crate::fallback::{coerce_legal, deterministic_fallback};
use crate::player::Player;
use pcore::{Chips, Position, ID};
use engine::{Action, ActionKind, Game, GameActionResult, LegalOptions};
use gameroom::{filter_for_recipient, GameRegistry, GameRoom, GameStateData};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct OracleRequest<'a> {
    view: &'a GameStateData,
    options: &'a [ActionKind],
    call_amount: Chips,
    min_raise: Chips,
    max_raise: Chips,
}

#[derive(Deserialize)]
struct OracleResponse {
    action: ActionKind,
    amount: Option<Chips>,
}

/// Calls the external decision oracle over HTTP with a bounded
/// deadline. Any timeout, transport error, or malformed response is
/// treated identically to §4.6 step 4: substitute the deterministic
/// fallback rather than propagate the failure.
pub struct OraclePlayer {
    http: reqwest::Client,
    url: String,
    deadline: Duration,
}

impl OraclePlayer {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_deadline(url, Duration::from_millis(pcore::AI_ORACLE_TIMEOUT_MILLIS))
    }

    pub fn with_deadline(url: impl Into<String>, deadline: Duration) -> Self {
        Self { http: reqwest::Client::new(), url: url.into(), deadline }
    }

    async fn call(&self, view: &GameStateData, options: &LegalOptions) -> Option<Action> {
        let body = OracleRequest {
            view,
            options: &options.kinds,
            call_amount: options.call_amount,
            min_raise: options.min_total,
            max_raise: options.max_total,
        };
        let request = self.http.post(&self.url).json(&body).send();
        let response = tokio::time::timeout(self.deadline, request).await.ok()?.ok()?;
        let decoded: OracleResponse = response.json().await.ok()?;
        Some(match decoded.action {
            ActionKind::Fold => Action::Fold,
            ActionKind::Check => Action::Check,
            ActionKind::Call => Action::Call(decoded.amount.unwrap_or(options.call_amount)),
            ActionKind::Bet => Action::Bet(decoded.amount.unwrap_or(options.min_total)),
            ActionKind::Raise => Action::Raise(decoded.amount.unwrap_or(options.min_total)),
            ActionKind::AllIn => Action::AllIn(decoded.amount.unwrap_or(options.max_total)),
        })
    }
}

#[async_trait::async_trait]
impl Player for OraclePlayer {
    async fn decide(&mut self, view: &GameStateData, options: &LegalOptions) -> Action {
        match self.call(view, options).await {
            Some(action) => coerce_legal(action, options),
            None => {
                log::warn!("oracle at {} unreachable or timed out, using deterministic fallback", self.url);
                deterministic_fallback(options)
            }
        }
    }
}

/// Drives one non-human seat's turn per §4.6: acquire the game lock,
/// re-verify the seat is still owed a turn (it may have folded to a
/// timeout elsewhere before this task got scheduled), build its public
/// view, solicit a decision, and apply it — all under the lock, which
/// is dropped the instant `apply` returns. The caller passes the
/// returned snapshots to `gameroom::orchestrator::run` outside any lock,
/// and re-invokes `act` again itself if the next actor is also
/// non-human, rather than this function recursing.
pub struct AIDriver<P: Player> {
    player: P,
}

impl<P: Player> AIDriver<P> {
    pub fn new(player: P) -> Self {
        Self { player }
    }

    pub async fn act(
        &mut self,
        registry: &GameRegistry,
        game_id: ID<GameRoom>,
        seat: Position,
    ) -> Option<(Game, Game, GameActionResult)> {
        let room = registry.get(game_id).await?;
        let mut guard = room.lock().await;
        if guard.game.current_actor() != Some(seat) || !guard.game.to_act().contains(&seat) {
            return None;
        }

        let pre = guard.game.clone();
        let mut view = GameStateData::from_game(&guard.game);
        filter_for_recipient(&mut view, Some(seat));
        let options = guard.game.legal_options(seat).ok()?;

        let action = self.player.decide(&view, &options).await;
        guard.context.record(seat, action);
        let result = guard.game.apply(seat, action);
        let post = guard.game.clone();
        Some((pre, post, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::HandConfig;

    struct AlwaysFold;

    #[async_trait::async_trait]
    impl Player for AlwaysFold {
        async fn decide(&mut self, _view: &GameStateData, _options: &LegalOptions) -> Action {
            Action::Fold
        }
    }

    #[tokio::test]
    async fn act_applies_the_players_decision_under_the_lock() {
        let registry = GameRegistry::new();
        let game_id = registry.create(HandConfig::default(), 2).await;
        {
            let room = registry.get(game_id).await.unwrap();
            let mut guard = room.lock().await;
            guard.sit("a", false, 1000);
            guard.sit("b", false, 1000);
            guard.start_hand();
        }
        let seat = {
            let room = registry.get(game_id).await.unwrap();
            room.lock().await.game.current_actor().unwrap()
        };

        let mut driver = AIDriver::new(AlwaysFold);
        let (_pre, post, result) = driver.act(&registry, game_id, seat).await.unwrap();
        assert!(result.success);
        assert_eq!(post.seats[seat].status, engine::SeatStatus::Folded);
    }

    #[tokio::test]
    async fn act_returns_none_when_the_seat_is_not_owed_a_turn() {
        let registry = GameRegistry::new();
        let game_id = registry.create(HandConfig::default(), 2).await;
        {
            let room = registry.get(game_id).await.unwrap();
            let mut guard = room.lock().await;
            guard.sit("a", false, 1000);
            guard.sit("b", false, 1000);
            guard.start_hand();
        }
        let actor = {
            let room = registry.get(game_id).await.unwrap();
            room.lock().await.game.current_actor().unwrap()
        };
        let idle_seat = 1 - actor;

        let mut driver = AIDriver::new(AlwaysFold);
        assert!(driver.act(&registry, game_id, idle_seat).await.is_none());
    }
}
