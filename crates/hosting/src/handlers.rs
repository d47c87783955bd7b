use crate::session::{self, drive_ai_until_human};
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use pcore::{Chips, Position, ID};
use engine::HandConfig;
use gameroom::{prompt_next_actor, ClientMessage, GameRoom, GameStateData, ServerMessage};
use std::collections::HashMap;
use std::time::Duration;

pub async fn health() -> impl Responder {
    HttpResponse::Ok().body("ok")
}

#[derive(serde::Deserialize)]
pub struct CreateRoomRequest {
    #[serde(default = "default_max_seats")]
    max_seats: usize,
}

fn default_max_seats() -> usize {
    pcore::MAX_SEATS
}

pub async fn create_room(state: web::Data<AppState>, body: Option<web::Json<CreateRoomRequest>>) -> impl Responder {
    let max_seats = body.map(|b| b.max_seats).unwrap_or_else(default_max_seats);
    if !(pcore::MIN_SEATS..=pcore::MAX_SEATS).contains(&max_seats) {
        return HttpResponse::BadRequest().body("max_seats out of range");
    }
    let config: HandConfig = state.default_hand_config.clone();
    let id = state.registry.create(config, max_seats).await;
    if let Some(room) = state.registry.get(id).await {
        let snapshot = gameroom::GameSnapshot::from_room(&*room.lock().await);
        let mut games = state.games.lock().await;
        games.push(snapshot);
        if let Err(e) = games.persist() {
            log::warn!("failed to persist game snapshot: {e}");
        }
    }
    HttpResponse::Ok().json(serde_json::json!({ "game_id": id.to_string() }))
}

fn parse_game_id(raw: &str) -> Option<ID<GameRoom>> {
    raw.parse().ok()
}

#[derive(serde::Deserialize)]
pub struct SitRequest {
    display_name: String,
    #[serde(default)]
    is_human: bool,
    buy_in: Chips,
}

pub async fn sit(state: web::Data<AppState>, path: web::Path<String>, body: web::Json<SitRequest>) -> impl Responder {
    let Some(game_id) = parse_game_id(&path) else {
        return HttpResponse::BadRequest().body("invalid game id");
    };
    let Some(room) = state.registry.get(game_id).await else {
        return HttpResponse::NotFound().body("game not found");
    };
    let mut guard = room.lock().await;
    match guard.sit(body.display_name.clone(), body.is_human, body.buy_in) {
        Some(position) => HttpResponse::Ok().json(serde_json::json!({ "seat_id": position })),
        None => HttpResponse::Conflict().body("table is full"),
    }
}

pub async fn start_hand(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let Some(game_id) = parse_game_id(&path) else {
        return HttpResponse::BadRequest().body("invalid game id");
    };
    let Some(room) = state.registry.get(game_id).await else {
        return HttpResponse::NotFound().body("game not found");
    };
    let post = {
        let mut guard = room.lock().await;
        if guard.eligible_seat_count() < 2 {
            return HttpResponse::BadRequest().body("need at least 2 seated players");
        }
        guard.start_hand();
        guard.game.clone()
    };
    state.hub.broadcast(game_id, ServerMessage::GameState(GameStateData::from_game(&post))).await;
    if let Some(next) = post.current_actor() {
        prompt_next_actor(game_id, &post, next, &state.hub).await;
    }
    drive_ai_until_human(&state, game_id, post.current_actor()).await;
    HttpResponse::Ok().json(serde_json::json!({ "status": "started" }))
}

/// Upgrades to a WebSocket and spawns the per-subscriber bridge loop.
/// `player_id` in the query string binds the connection to a seat; its
/// absence makes the connection an observer (§6).
pub async fn connect(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
    body: web::Payload,
    req: HttpRequest,
) -> impl Responder {
    let Some(game_id) = parse_game_id(&path) else {
        return HttpResponse::BadRequest().body("invalid game id").map_into_right_body();
    };
    if state.registry.get(game_id).await.is_none() {
        return HttpResponse::NotFound().body("game not found").map_into_right_body();
    }
    let seat_id: Option<Position> = query.get("player_id").and_then(|raw| raw.parse().ok());

    match actix_ws::handle(&req, body) {
        Ok((response, session, stream)) => {
            actix_web::rt::spawn(bridge(state.clone(), game_id, seat_id, session, stream));
            response.map_into_left_body()
        }
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()).map_into_right_body(),
    }
}

/// One subscriber's full lifetime: subscribe, push the initial
/// snapshot, then race inbound frames, hub-routed outbound frames, and
/// the idle clock until one of them closes the connection. Grounded on
/// the same `tokio::select! biased` shape used to bridge a channel pair
/// to a socket elsewhere in this codebase's lineage, generalized from
/// exactly one client per room to many subscribers with per-seat
/// addressing.
async fn bridge(
    state: web::Data<AppState>,
    game_id: ID<GameRoom>,
    seat_id: Option<Position>,
    mut session: actix_ws::Session,
    mut stream: actix_ws::MessageStream,
) {
    use futures::StreamExt;

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<String>();
    let subscriber_id = state.hub.subscribe(tx, game_id, seat_id).await;

    if let Some(room) = state.registry.get(game_id).await {
        let game = room.lock().await.game.clone();
        let mut view = GameStateData::from_game(&game);
        gameroom::filter_for_recipient(&mut view, seat_id);
        let _ = session.text(ServerMessage::GameState(view).to_json()).await;
    }

    let keepalive_after = Duration::from_secs(pcore::IDLE_KEEPALIVE_SECS);
    let close_after = Duration::from_secs(pcore::IDLE_CLOSE_SECS);
    let tick = Duration::from_secs(1);
    let mut idle_for = Duration::ZERO;
    let mut keepalive_sent = false;

    'sesh: loop {
        tokio::select! {
            biased;
            outgoing = rx.recv() => match outgoing {
                Some(json) => {
                    if session.text(json).await.is_err() {
                        break 'sesh;
                    }
                }
                None => break 'sesh,
            },
            incoming = stream.next() => match incoming {
                Some(Ok(actix_ws::Message::Text(text))) => {
                    idle_for = Duration::ZERO;
                    keepalive_sent = false;
                    match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(message) => match session::dispatch(&state, game_id, seat_id, message).await {
                            Ok(replies) => {
                                for reply in replies {
                                    if session.text(reply.to_json()).await.is_err() {
                                        break 'sesh;
                                    }
                                }
                            }
                            Err(err) => {
                                let wire = ServerMessage::Error { code: err.code(), message: err.message() };
                                if session.text(wire.to_json()).await.is_err() {
                                    break 'sesh;
                                }
                            }
                        },
                        Err(e) => {
                            let wire = ServerMessage::Error { code: "invalid_format", message: e.to_string() };
                            if session.text(wire.to_json()).await.is_err() {
                                break 'sesh;
                            }
                        }
                    }
                }
                Some(Ok(actix_ws::Message::Close(_))) | None => break 'sesh,
                Some(Err(_)) => break 'sesh,
                _ => continue 'sesh,
            },
            _ = tokio::time::sleep(tick) => {
                idle_for += tick;
                if idle_for >= close_after {
                    break 'sesh;
                }
                if idle_for >= keepalive_after && !keepalive_sent {
                    keepalive_sent = true;
                    let wire = ServerMessage::Keepalive { timestamp: gameroom::now_millis() };
                    if session.text(wire.to_json()).await.is_err() {
                        break 'sesh;
                    }
                }
            }
        }
    }

    state.hub.unsubscribe(subscriber_id).await;
    let _ = session.close(None).await;
}
