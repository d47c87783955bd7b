use crate::event::{describe_action, describe_street_header, describe_win, player_action_event, RoomEvent};
use crate::message::{
    ActionRequestData, GameStateData, PlayerActionData, PotResult, PotWinner, SeatBet, SeatHand,
    ServerMessage,
};
use crate::registry::GameRoom;
use crate::timer::TimerConfig;
use crate::event::now_millis;
use pcore::{Chips, Position, ID};
use engine::{Action, Game, GameActionResult, GameEvent, Round};
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::oneshot;

/// The network edge `EventOrchestrator` talks to, implemented by
/// `hosting::ConnectionHub`. Kept as a port rather than a direct
/// dependency since `hosting` already depends on this crate — the
/// opposite edge would be a cycle.
#[async_trait::async_trait]
pub trait Broadcaster: Send + Sync {
    async fn broadcast(&self, game_id: ID<GameRoom>, message: ServerMessage);
    async fn send_to_seat(&self, game_id: ID<GameRoom>, seat: Position, message: ServerMessage);
}

/// One-shot signals keyed by `(game, step_type)`, fired when a
/// subscriber's `animation_done` message names that step. A step
/// nobody is waiting on is just a no-op signal — not an error, since
/// the orchestrator may have already moved on after its own fallback.
#[derive(Default)]
pub struct AnimationLatches {
    pending: Mutex<HashMap<(ID<GameRoom>, String), oneshot::Sender<()>>>,
}

impl AnimationLatches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signal(&self, game_id: ID<GameRoom>, step_type: &str) {
        if let Some(tx) = self.pending.lock().unwrap().remove(&(game_id, step_type.to_string())) {
            let _ = tx.send(());
        }
    }

    /// Registers a wait for `step_type` and blocks until it's signalled
    /// or `fallback` elapses, whichever comes first. Either way the
    /// orchestrator proceeds — this is a latency bound, not a retry.
    async fn wait(&self, game_id: ID<GameRoom>, step_type: &str, fallback: std::time::Duration) {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().unwrap().insert((game_id, step_type.to_string()), tx);
        let _ = tokio::time::timeout(fallback, rx).await;
        self.pending.lock().unwrap().remove(&(game_id, step_type.to_string()));
    }
}

/// Walks §4.4's ordered notification sequence for one applied action.
/// `pre` is the game snapshot taken immediately before `apply` ran;
/// `post` is the snapshot taken immediately after. Both are plain
/// clones — `Game` derives `Clone` precisely so callers can hand them
/// here without holding the per-game mutex across any of this.
pub async fn run(
    game_id: ID<GameRoom>,
    pre: &Game,
    post: &Game,
    result: &GameActionResult,
    latches: &AnimationLatches,
    timers: &TimerConfig,
    hub: &dyn Broadcaster,
) {
    let acting = &post.seats[result.acting_seat];
    let pot_total: Chips = post.seats.iter().map(|s| s.hand_bet).sum();

    // 1. player_action
    hub.broadcast(game_id, player_action_to_message(player_action_event(result, pot_total))).await;
    let log_line = describe_action(&acting.display_name, result.action, result.post_street_bet, result.post_hand_bet);
    hub.broadcast(game_id, ServerMessage::ActionLog { text: log_line, timestamp: now_millis() }).await;

    // 2. turn_highlight_removed, whenever the acting seat is no longer owed a turn
    if !post.to_act().contains(&result.acting_seat) {
        hub.broadcast(game_id, ServerMessage::TurnHighlightRemoved { seat_id: result.acting_seat }).await;
    }

    let street_closed = result.has_event(GameEvent::BettingRoundCompleted);

    if street_closed {
        // 3. round_bets_finalized, then wait (state's own street_bet reset already happened inside apply)
        let player_bets: Vec<SeatBet> = post
            .seats
            .iter()
            .zip(pre.seats.iter())
            .map(|(after, before)| SeatBet { seat_id: after.position, amount: after.hand_bet - before.hand_bet })
            .collect();
        hub.broadcast(game_id, ServerMessage::RoundBetsFinalized { player_bets, pot: pot_total, timestamp: now_millis() }).await;
        latches.wait(game_id, "round_bets_finalized", timers.animation_fallback).await;
    }

    if result.has_event(GameEvent::ShowdownTriggered) || result.has_event(GameEvent::EarlyShowdownTriggered) {
        run_showdown(game_id, post, result, latches, timers, hub).await;
        return;
    }

    if street_closed {
        // 6. street already dealt inside apply; report it, wait, then prompt the next actor
        if let Some(round) = post.round.street() {
            let dealt = post.community.iter().copied().rev().take(round.n_revealed()).collect::<Vec<_>>();
            let dealt: Vec<_> = dealt.into_iter().rev().collect();
            let text = describe_street_header(round, &dealt);
            hub.broadcast(game_id, ServerMessage::ActionLog { text, timestamp: now_millis() }).await;
            hub.broadcast(
                game_id,
                ServerMessage::StreetDealt {
                    street: format!("{round:?}").to_uppercase(),
                    cards: dealt.iter().map(|c| c.to_string()).collect(),
                    timestamp: now_millis(),
                },
            )
            .await;
            latches.wait(game_id, &format!("street_dealt_{round:?}").to_lowercase(), timers.animation_fallback).await;
        }
    }

    // 7 (or the tail of 6): prompt whoever is up next
    if let Some(next) = result.next_actor {
        prompt_next_actor(game_id, post, next, hub).await;
    }
}

async fn run_showdown(
    game_id: ID<GameRoom>,
    post: &Game,
    result: &GameActionResult,
    latches: &AnimationLatches,
    timers: &TimerConfig,
    hub: &dyn Broadcaster,
) {
    hub.broadcast(game_id, ServerMessage::ShowdownTransition { timestamp: now_millis() }).await;

    for (street, cards) in &result.pending_streets_to_deal {
        let round = Round::from(*street);
        let text = describe_street_header(round, cards);
        hub.broadcast(game_id, ServerMessage::ActionLog { text, timestamp: now_millis() }).await;
        hub.broadcast(
            game_id,
            ServerMessage::StreetDealt {
                street: format!("{street:?}").to_uppercase(),
                cards: cards.iter().map(|c| c.to_string()).collect(),
                timestamp: now_millis(),
            },
        )
        .await;
        latches.wait(game_id, &format!("street_dealt_{street:?}").to_lowercase(), timers.animation_fallback).await;
    }

    let player_hands: Vec<SeatHand> = post
        .seats
        .iter()
        .filter_map(|s| s.hole_cards.map(|h| SeatHand { seat_id: s.position, cards: [h[0].to_string(), h[1].to_string()] }))
        .filter(|hand| post.seats[hand.seat_id].status != engine::SeatStatus::Folded)
        .collect();
    if !player_hands.is_empty() {
        hub.broadcast(game_id, ServerMessage::ShowdownHandsRevealed { player_hands }).await;
    }

    let pots: Vec<PotResult> = post
        .winners
        .iter()
        .map(|(pot_index, winners, strength)| {
            let pot = &post.pots[*pot_index];
            let share = if winners.is_empty() { 0 } else { pot.amount / winners.len() as Chips };
            let hand_rank = strength.map(|s| s.to_string()).unwrap_or_default();
            PotResult {
                pot_id: *pot_index,
                amount: pot.amount,
                winners: winners
                    .iter()
                    .map(|&seat_id| PotWinner { seat_id, hand_rank: hand_rank.clone(), share })
                    .collect(),
            }
        })
        .collect();
    hub.broadcast(game_id, ServerMessage::PotWinnersDetermined { pots: pots.clone() }).await;
    hub.broadcast(game_id, ServerMessage::ChipsDistributed(GameStateData::from_game(post))).await;

    for pot in &pots {
        for winner in &pot.winners {
            let display_name = &post.seats[winner.seat_id].display_name;
            let hand_description = if winner.hand_rank.is_empty() { "the winning hand" } else { &winner.hand_rank };
            let text = describe_win(display_name, winner.share, hand_description);
            hub.broadcast(game_id, ServerMessage::ActionLog { text, timestamp: now_millis() }).await;
        }
    }

    let winners: Vec<PotWinner> = pots.iter().flat_map(|p| p.winners.clone()).collect();
    hub.broadcast(
        game_id,
        ServerMessage::HandResult {
            hand_id: post.hand_number,
            winners,
            players: post.seats.iter().map(|s| s.position).collect(),
            board: post.community.iter().map(|c| c.to_string()).collect(),
            timestamp: now_millis(),
        },
    )
    .await;

    let _ = result;
}

pub async fn prompt_next_actor(game_id: ID<GameRoom>, post: &Game, next: Position, hub: &dyn Broadcaster) {
    hub.broadcast(game_id, ServerMessage::GameState(GameStateData::from_game(post))).await;
    if let Ok(options) = post.legal_options(next) {
        hub.send_to_seat(
            game_id,
            next,
            ServerMessage::ActionRequest(ActionRequestData {
                hand_id: post.hand_number,
                seat_id: next,
                options: options.kinds,
                call_amount: options.call_amount,
                min_raise: options.min_total,
                max_raise: options.max_total,
                time_limit: 30,
                timestamp: now_millis(),
            }),
        )
        .await;
    }
}

fn player_action_to_message(event: RoomEvent) -> ServerMessage {
    match event {
        RoomEvent::PlayerAction { seat, action, pot: _ } => {
            let amount = match action {
                Action::Fold | Action::Check => 0,
                Action::Call(n) | Action::Bet(n) | Action::AllIn(n) | Action::Blind(n) | Action::Raise(n) => n,
            };
            ServerMessage::PlayerAction(PlayerActionData {
                seat_id: seat,
                action: action.kind().to_string(),
                amount,
                timestamp: now_millis(),
            })
        }
        _ => unreachable!("player_action_event only ever returns RoomEvent::PlayerAction"),
    }
}
