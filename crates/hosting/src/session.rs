use crate::state::AppState;
use pcore::{Chips, Position, ID};
use engine::{Action, ActionKind, LegalOptions, Round};
use gameroom::{filter_for_recipient, now_millis, prompt_next_actor, orchestrator, GameRoom};
use gameroom::{ClientMessage, GameStateData, RoomError, ServerMessage};

/// §6's wire limit on a single chat frame's text.
pub const CHAT_MAX_LEN: usize = 500;

/// Resolves one inbound message into its side effects and returns the
/// direct replies the caller (owning this subscriber's actual socket)
/// must forward itself — `action`/`chat`/`animation_done` have no
/// direct reply, only hub-routed broadcasts performed here as a side
/// effect; `ping` is the only message a bare observer socket needs
/// answered without going through the hub's seat-addressed sends.
pub async fn dispatch(
    state: &AppState,
    game_id: ID<GameRoom>,
    seat_id: Option<Position>,
    message: ClientMessage,
) -> Result<Vec<ServerMessage>, RoomError> {
    match message {
        ClientMessage::Action { action, amount } => {
            let seat = seat_id.ok_or(RoomError::NotAuthorized)?;
            apply_human_action(state, game_id, seat, action, amount).await?;
            Ok(Vec::new())
        }
        ClientMessage::Chat { text, target } => {
            let text: String = if text.chars().count() > CHAT_MAX_LEN {
                text.chars().take(CHAT_MAX_LEN).collect()
            } else {
                text
            };
            let from = seat_id.map(|s| s.to_string()).unwrap_or_else(|| "observer".to_string());
            let chat = ServerMessage::Chat { from, text, timestamp: now_millis() };
            match target {
                Some(seat) => state.hub.send_to_seat(game_id, seat, chat).await,
                None => state.hub.broadcast(game_id, chat).await,
            }
            Ok(Vec::new())
        }
        ClientMessage::Ping { timestamp, needs_refresh } => {
            let mut replies = vec![ServerMessage::Pong { timestamp }];
            if needs_refresh.unwrap_or(false) {
                if let Some(room) = state.registry.get(game_id).await {
                    let game = room.lock().await.game.clone();
                    let mut view = GameStateData::from_game(&game);
                    filter_for_recipient(&mut view, seat_id);
                    replies.push(ServerMessage::GameState(view));
                }
            }
            Ok(replies)
        }
        ClientMessage::AnimationDone { step_type } => {
            state.latches.signal(game_id, &step_type);
            if step_type == "hand_visually_concluded" {
                maybe_start_next_hand(state, game_id).await;
            }
            Ok(Vec::new())
        }
    }
}

fn resolve_action(kind: ActionKind, amount: Option<Chips>, options: &LegalOptions) -> Action {
    match kind {
        ActionKind::Fold => Action::Fold,
        ActionKind::Check => Action::Check,
        ActionKind::Call => Action::Call(amount.unwrap_or(options.call_amount)),
        ActionKind::Bet => Action::Bet(amount.unwrap_or(options.min_total)),
        ActionKind::Raise => Action::Raise(amount.unwrap_or(options.min_total)),
        ActionKind::AllIn => Action::AllIn(amount.unwrap_or(options.max_total)),
    }
}

/// Validates, applies under the game lock, then orchestrates and drives
/// any run of AI turns that follows — all outside the lock, per §5.
async fn apply_human_action(
    state: &AppState,
    game_id: ID<GameRoom>,
    seat: Position,
    kind: ActionKind,
    amount: Option<Chips>,
) -> Result<(), RoomError> {
    let room = state.registry.get(game_id).await.ok_or(RoomError::GameNotFound)?;
    let (pre, post, result) = {
        let mut guard = room.lock().await;
        let options = guard.game.legal_options(seat)?;
        let action = resolve_action(kind, amount, &options);
        let pre = guard.game.clone();
        let result = guard.game.apply(seat, action);
        if !result.success {
            return Err(RoomError::Turn(result.error.clone().expect("failed result carries an error")));
        }
        guard.context.record(seat, action);
        let post = guard.game.clone();
        (pre, post, result)
    };
    orchestrator::run(game_id, &pre, &post, &result, &state.latches, &state.timers, &state.hub).await;
    drive_ai_until_human(state, game_id, post.current_actor()).await;
    Ok(())
}

/// Repeatedly calls `AIDriver::act` for as long as the current actor is
/// non-human, iterating rather than recursing so the stack never grows
/// with the length of an all-AI table's run of turns.
pub(crate) async fn drive_ai_until_human(state: &AppState, game_id: ID<GameRoom>, mut next: Option<Position>) {
    while let Some(seat) = next {
        let is_human = match state.registry.get(game_id).await {
            Some(room) => room.lock().await.game.seats.get(seat).map(|s| s.is_human).unwrap_or(true),
            None => return,
        };
        if is_human {
            return;
        }
        let acted = {
            let mut ai = state.ai.lock().await;
            ai.act(&state.registry, game_id, seat).await
        };
        match acted {
            Some((pre, post, result)) => {
                orchestrator::run(game_id, &pre, &post, &result, &state.latches, &state.timers, &state.hub).await;
                next = post.current_actor();
            }
            None => return,
        }
    }
}

/// P7: idempotent next-hand start. Guarded on `round == Showdown`, which
/// `start_hand` immediately flips to `Preflop` — a second
/// `hand_visually_concluded` for the same hand finds the guard already
/// false and is a no-op.
async fn maybe_start_next_hand(state: &AppState, game_id: ID<GameRoom>) {
    let room = match state.registry.get(game_id).await {
        Some(room) => room,
        None => return,
    };
    let (post, finished) = {
        let mut guard = room.lock().await;
        if guard.game.round != Round::Showdown || guard.eligible_seat_count() < 2 {
            return;
        }
        let finished = guard.context.clone();
        guard.start_hand();
        (guard.game.clone(), finished)
    };
    {
        let mut hands = state.hands.lock().await;
        hands.push(finished);
        if let Err(e) = hands.persist() {
            log::warn!("failed to persist hand history: {e}");
        }
    }
    state.hub.broadcast(game_id, ServerMessage::GameState(GameStateData::from_game(&post))).await;
    if let Some(next) = post.current_actor() {
        prompt_next_actor(game_id, &post, next, &state.hub).await;
    }
    drive_ai_until_human(state, game_id, post.current_actor()).await;
}
